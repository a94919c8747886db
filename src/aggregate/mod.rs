//! Sequence-level aggregation
//!
//! Folds closed trades, in chronological order, into a running-capital
//! sequence and derives the dashboard summary from it.


use crate::capital::Capital;
use crate::pnl::ClosedPnlFields;
use crate::types::{chronological_key, ClosedTrade};
use serde::{Deserialize, Serialize};

/// Closed trade with its realized outcome and capital threading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeWithPnl {
    #[serde(flatten)]
    pub trade: ClosedTrade,
    #[serde(flatten)]
    pub pnl: ClosedPnlFields,
    /// Actual risk as a percentage of `capital_start`
    pub account_risk_percent: Option<f64>,
    pub capital_start: f64,
    pub capital_end: f64,
}

/// Sort closed trades by open time and thread running capital through them.
///
/// The sort is stable, so trades sharing a timestamp keep their input order.
/// Timestamps that cannot be parsed sort after all parseable ones.
pub fn compute_trade_sequence(capital: &Capital, closed_trades: &[ClosedTrade]) -> Vec<TradeWithPnl> {
    let mut ordered: Vec<&ClosedTrade> = closed_trades.iter().collect();
    ordered.sort_by_key(|t| chronological_key(&t.setup.date_time));

    let mut running_capital = capital.base();
    ordered
        .into_iter()
        .map(|trade| {
            let pnl = trade.pnl();
            let capital_start = running_capital;
            let account_risk_percent =
                (capital_start > 0.0).then(|| pnl.risk_amount_actual / capital_start * 100.0);
            let capital_end = capital_start + pnl.pnl_net;
            running_capital = capital_end;

            TradeWithPnl {
                trade: trade.clone(),
                pnl,
                account_risk_percent,
                capital_start,
                capital_end,
            }
        })
        .collect()
}

/// Summary metrics over a trade sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub current_capital: f64,
    pub total_pnl: f64,
    /// Winning trades as a percentage (0-100)
    pub win_rate: f64,
    /// Gross profit / gross loss; `f64::INFINITY` when there are no losses.
    /// Serialized as the string `"Infinity"` in that case.
    #[serde(with = "profit_factor_repr")]
    pub profit_factor: f64,
    pub average_roi: Option<f64>,
    pub average_rr_realized: Option<f64>,
    pub average_account_risk_percent: Option<f64>,
    /// Lets callers tell "no trades" apart from "no losses"
    pub trade_count: usize,
    pub gross_profit: f64,
    pub gross_loss: f64,
}

/// JSON has no infinity, so the no-loss sentinel travels as a string.
mod profit_factor_repr {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const INFINITY: &str = "Infinity";

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if *value == f64::INFINITY {
            serializer.serialize_str(INFINITY)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) if text == INFINITY => Ok(f64::INFINITY),
            Repr::Text(text) => Err(D::Error::custom(format!("invalid profit factor: {text}"))),
        }
    }
}

impl DashboardMetrics {
    pub fn has_trades(&self) -> bool {
        self.trade_count > 0
    }
}

/// Arithmetic mean over finite values; `None` when nothing qualifies.
pub(crate) fn mean_finite<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, count) = values
        .into_iter()
        .flatten()
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

pub fn compute_dashboard_metrics(capital: &Capital, trades: &[TradeWithPnl]) -> DashboardMetrics {
    let total_pnl: f64 = trades.iter().map(|t| t.pnl.pnl_net).sum();

    let winning = trades.iter().filter(|t| t.pnl.pnl_net > 0.0).count();
    let win_rate = if trades.is_empty() {
        0.0
    } else {
        winning as f64 / trades.len() as f64 * 100.0
    };

    let gross_profit: f64 = trades
        .iter()
        .map(|t| t.pnl.pnl_net)
        .filter(|pnl| *pnl > 0.0)
        .sum();
    let gross_loss = trades
        .iter()
        .map(|t| t.pnl.pnl_net)
        .filter(|pnl| *pnl < 0.0)
        .sum::<f64>()
        .abs();
    let profit_factor = if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else {
        f64::INFINITY
    };

    DashboardMetrics {
        current_capital: capital.base() + total_pnl,
        total_pnl,
        win_rate,
        profit_factor,
        average_roi: mean_finite(trades.iter().map(|t| Some(t.pnl.roi_percent))),
        average_rr_realized: mean_finite(trades.iter().map(|t| t.pnl.rr_realized)),
        average_account_risk_percent: mean_finite(trades.iter().map(|t| t.account_risk_percent)),
        trade_count: trades.len(),
        gross_profit,
        gross_loss,
    }
}

/// Column sums shown under the trade log
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeLogTotals {
    pub margin: f64,
    pub risk_amount: f64,
    pub fees: f64,
    pub pnl_net: f64,
}

impl TradeLogTotals {
    pub fn of(trades: &[TradeWithPnl]) -> Self {
        trades.iter().fold(Self::default(), |acc, t| Self {
            margin: acc.margin + t.trade.setup.margin,
            risk_amount: acc.risk_amount + t.pnl.risk_amount,
            fees: acc.fees + t.trade.fees,
            pnl_net: acc.pnl_net + t.pnl.pnl_net,
        })
    }
}
