//! Performance analytics series
//!
//! Chart-ready views over a computed trade sequence:
//! - Equity curve
//! - P&L per trade
//! - Net P&L by strategy
//! - Realized vs planned R:R
//! - ROI per trade

use crate::aggregate::TradeWithPnl;
use crate::capital::Capital;
use serde::{Deserialize, Serialize};

/// Label used for trades logged without a strategy
pub const UNCATEGORIZED: &str = "Uncategorized";

/// One labelled point of a per-trade series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyPnl {
    pub strategy: String,
    pub pnl_net: f64,
    pub trade_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RrComparison {
    pub label: String,
    pub rr_realized: Option<f64>,
    pub rr_planned: Option<f64>,
}

fn trade_label(index: usize) -> String {
    format!("Trade {}", index + 1)
}

/// Capital base followed by each trade's closing capital.
pub fn equity_curve(capital: &Capital, trades: &[TradeWithPnl]) -> Vec<SeriesPoint> {
    std::iter::once(SeriesPoint {
        label: "Initial".to_string(),
        value: Some(capital.base()),
    })
    .chain(trades.iter().enumerate().map(|(i, t)| SeriesPoint {
        label: trade_label(i),
        value: Some(t.capital_end),
    }))
    .collect()
}

pub fn pnl_distribution(trades: &[TradeWithPnl]) -> Vec<SeriesPoint> {
    trades
        .iter()
        .enumerate()
        .map(|(i, t)| SeriesPoint {
            label: trade_label(i),
            value: Some(t.pnl.pnl_net),
        })
        .collect()
}

/// Net P&L grouped by strategy label, in order of first appearance.
pub fn strategy_breakdown(trades: &[TradeWithPnl]) -> Vec<StrategyPnl> {
    let mut groups: Vec<StrategyPnl> = Vec::new();
    for trade in trades {
        let name = trade.trade.setup.strategy.trim();
        let name = if name.is_empty() { UNCATEGORIZED } else { name };

        match groups.iter_mut().find(|g| g.strategy == name) {
            Some(group) => {
                group.pnl_net += trade.pnl.pnl_net;
                group.trade_count += 1;
            }
            None => groups.push(StrategyPnl {
                strategy: name.to_string(),
                pnl_net: trade.pnl.pnl_net,
                trade_count: 1,
            }),
        }
    }
    groups
}

pub fn rr_comparison(trades: &[TradeWithPnl]) -> Vec<RrComparison> {
    trades
        .iter()
        .enumerate()
        .map(|(i, t)| RrComparison {
            label: trade_label(i),
            rr_realized: t.pnl.rr_realized,
            rr_planned: t.pnl.rr_planned,
        })
        .collect()
}

pub fn roi_series(trades: &[TradeWithPnl]) -> Vec<SeriesPoint> {
    trades
        .iter()
        .enumerate()
        .map(|(i, t)| SeriesPoint {
            label: trade_label(i),
            value: Some(t.pnl.roi_percent).filter(|v| v.is_finite()),
        })
        .collect()
}
