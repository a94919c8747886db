//! Per-trade P&L and risk calculations
//!
//! Pure functions over a single trade:
//! - Realized P&L, ROI and R:R for closed trades
//! - Position size and stop-loss / take-profit derived risk for open trades
//! - Auto-calculated values for the trade entry form
//!
//! Degenerate numbers (zero entry price, zero margin, no risk basis) never
//! fail; each field resolves to `0` or `None` instead. The only error is
//! asking for the wrong lifecycle state.

mod open;
#[cfg(test)]
mod tests;

pub use open::{compute_open_trade_metrics, OpenMetricsFields};

use crate::error::Result;
use crate::types::{ClosedTrade, Trade, TradeSetup};
use serde::{Deserialize, Serialize};

/// `numerator / denominator`, or 0 when the denominator is zero.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// A stop-loss or take-profit price that sits on the correct side of entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevel {
    /// Favourable distance from entry, always > 0
    pub distance: f64,
    /// Distance times position size, in quote currency
    pub amount: f64,
    /// Distance as a percentage of entry price
    pub percent: f64,
}

impl PriceLevel {
    /// `distance = (price - entry) * sign`; anything not strictly positive is
    /// on the wrong side of entry and ignored.
    fn new(price: Option<f64>, entry_price: f64, sign: f64, position_size: f64) -> Option<Self> {
        let distance = (price? - entry_price) * sign;
        if distance > 0.0 {
            Some(Self {
                distance,
                amount: distance * position_size,
                percent: ratio(distance, entry_price) * 100.0,
            })
        } else {
            None
        }
    }
}

/// Sizing and risk geometry shared by open and closed trades
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionGeometry {
    /// margin × leverage
    pub position_value: f64,
    /// Position value in units of the traded asset
    pub position_size: f64,
    /// Planned risk: position value × risk%
    pub risk_amount: f64,
    pub stop_loss: Option<PriceLevel>,
    pub take_profit: Option<PriceLevel>,
}

impl PositionGeometry {
    pub fn of(setup: &TradeSetup) -> Self {
        let sign = setup.direction.sign();
        let position_value = setup.margin * setup.leverage;
        let position_size = ratio(position_value, setup.entry_price);
        Self {
            position_value,
            position_size,
            risk_amount: position_value * (setup.risk_percent / 100.0),
            stop_loss: PriceLevel::new(setup.stop_loss, setup.entry_price, -sign, position_size),
            take_profit: PriceLevel::new(setup.take_profit, setup.entry_price, sign, position_size),
        }
    }

    /// Stop-loss risk when a valid stop exists, planned risk otherwise.
    pub fn risk_amount_actual(&self) -> f64 {
        self.stop_loss
            .map(|level| level.amount)
            .unwrap_or(self.risk_amount)
    }

    /// Target reward over stop-loss risk; needs both levels valid.
    pub fn rr_planned(&self) -> Option<f64> {
        match (self.stop_loss, self.take_profit) {
            (Some(stop), Some(target)) if stop.amount > 0.0 => Some(target.amount / stop.amount),
            _ => None,
        }
    }
}

/// Realized outcome of one closed trade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedPnlFields {
    pub position_value: f64,
    pub position_size: f64,
    /// (exit - entry) × direction
    pub price_delta: f64,
    pub pnl_gross: f64,
    /// Gross P&L minus fees
    pub pnl_net: f64,
    pub pnl_asset_percent: f64,
    pub pnl_margin_percent: f64,
    /// Same value as `pnl_margin_percent`
    pub roi_percent: f64,
    /// Planned risk from risk percent
    pub risk_amount: f64,
    pub risk_amount_actual: f64,
    pub risk_amount_from_stop_loss: Option<f64>,
    pub stop_loss_percent: Option<f64>,
    pub reward_from_take_profit: Option<f64>,
    pub take_profit_percent: Option<f64>,
    /// Net P&L in units of actual risk; `None` without a risk basis
    pub rr_realized: Option<f64>,
    pub rr_planned: Option<f64>,
}

impl ClosedTrade {
    /// Realized P&L and risk metrics for this trade.
    pub fn pnl(&self) -> ClosedPnlFields {
        let setup = &self.setup;
        let geometry = PositionGeometry::of(setup);

        let price_delta = (self.exit_price - setup.entry_price) * setup.direction.sign();
        let pnl_gross = price_delta * geometry.position_size;
        let pnl_net = pnl_gross - self.fees;
        let pnl_margin_percent = ratio(pnl_net, setup.margin) * 100.0;

        let risk_amount_actual = geometry.risk_amount_actual();
        let rr_realized = (risk_amount_actual > 0.0).then(|| pnl_net / risk_amount_actual);

        ClosedPnlFields {
            position_value: geometry.position_value,
            position_size: geometry.position_size,
            price_delta,
            pnl_gross,
            pnl_net,
            pnl_asset_percent: ratio(price_delta, setup.entry_price) * 100.0,
            pnl_margin_percent,
            roi_percent: pnl_margin_percent,
            risk_amount: geometry.risk_amount,
            risk_amount_actual,
            risk_amount_from_stop_loss: geometry.stop_loss.map(|l| l.amount),
            stop_loss_percent: geometry.stop_loss.map(|l| l.percent),
            reward_from_take_profit: geometry.take_profit.map(|l| l.amount),
            take_profit_percent: geometry.take_profit.map(|l| l.percent),
            rr_realized,
            rr_planned: geometry.rr_planned(),
        }
    }
}

/// Realized P&L for a stored trade record.
///
/// Fails with `InvalidState` when the trade is still open and with
/// `IncompleteTrade` when a closed record lacks its exit price or fees.
pub fn compute_closed_trade_pnl(trade: &Trade) -> Result<ClosedPnlFields> {
    Ok(trade.as_closed()?.pnl())
}

/// Values shown live while a trade is being entered
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPreview {
    pub position_value: f64,
    pub position_size: f64,
    pub risk_amount: f64,
}

impl EntryPreview {
    pub fn new(margin: f64, leverage: f64, entry_price: f64, risk_percent: f64) -> Self {
        let position_value = margin * leverage;
        Self {
            position_value,
            position_size: ratio(position_value, entry_price),
            risk_amount: position_value * (risk_percent / 100.0),
        }
    }

    pub fn for_trade(trade: &Trade) -> Self {
        Self::new(trade.margin, trade.leverage, trade.entry_price, trade.risk_percent)
    }
}
