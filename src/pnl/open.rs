//! Metrics knowable for a running position (no exit, no live price)

use super::PositionGeometry;
use crate::error::Result;
use crate::types::{OpenTrade, Trade};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMetricsFields {
    pub position_value: f64,
    pub position_size: f64,
    /// Planned risk amount from the trade's risk percent
    pub risk_amount_planned: f64,
    /// Stop-loss derived risk, falling back to the planned amount
    pub risk_amount_actual: f64,
    pub risk_amount_from_stop_loss: Option<f64>,
    pub stop_loss_percent: Option<f64>,
    pub reward_from_take_profit: Option<f64>,
    pub take_profit_percent: Option<f64>,
    pub rr_planned: Option<f64>,
}

impl OpenTrade {
    pub fn metrics(&self) -> OpenMetricsFields {
        let geometry = PositionGeometry::of(&self.setup);
        OpenMetricsFields {
            position_value: geometry.position_value,
            position_size: geometry.position_size,
            risk_amount_planned: geometry.risk_amount,
            risk_amount_actual: geometry.risk_amount_actual(),
            risk_amount_from_stop_loss: geometry.stop_loss.map(|l| l.amount),
            stop_loss_percent: geometry.stop_loss.map(|l| l.percent),
            reward_from_take_profit: geometry.take_profit.map(|l| l.amount),
            take_profit_percent: geometry.take_profit.map(|l| l.percent),
            rr_planned: geometry.rr_planned(),
        }
    }
}

/// Risk metrics for a stored trade that must still be open.
pub fn compute_open_trade_metrics(trade: &Trade) -> Result<OpenMetricsFields> {
    Ok(trade.as_open()?.metrics())
}
