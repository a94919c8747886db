//! Journal view: everything the display layer needs, recomputed on demand
//!
//! There is no cached state here. The surrounding application calls
//! [`JournalView::compute`] with the latest store snapshot whenever the
//! store publishes one.

use crate::aggregate::{
    compute_dashboard_metrics, compute_trade_sequence, DashboardMetrics, TradeLogTotals,
    TradeWithPnl,
};
use crate::capital::Capital;
use crate::pnl::OpenMetricsFields;
use crate::store::JournalSnapshot;
use crate::types::{chronological_key, OpenTrade, TradeState};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Open trade with its risk metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenPosition {
    #[serde(flatten)]
    pub trade: OpenTrade,
    #[serde(flatten)]
    pub metrics: OpenMetricsFields,
}

/// A stored record left out of the computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTrade {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalView {
    pub capital: Capital,
    /// Closed trades in chronological order with capital threading
    pub closed: Vec<TradeWithPnl>,
    pub open: Vec<OpenPosition>,
    pub dashboard: DashboardMetrics,
    pub totals: TradeLogTotals,
    pub skipped: Vec<SkippedTrade>,
}

impl JournalView {
    pub fn compute(snapshot: &JournalSnapshot) -> Self {
        let mut open = Vec::new();
        let mut closed = Vec::new();
        let mut skipped = Vec::new();

        for trade in &snapshot.trades {
            match TradeState::try_from(trade) {
                Ok(TradeState::Open(t)) => open.push(t),
                Ok(TradeState::Closed(t)) => closed.push(t),
                Err(e) => {
                    warn!("Skipping trade {}: {}", trade.id, e);
                    skipped.push(SkippedTrade {
                        id: trade.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let capital = snapshot.capital;
        let closed = compute_trade_sequence(&capital, &closed);
        let dashboard = compute_dashboard_metrics(&capital, &closed);
        let totals = TradeLogTotals::of(&closed);

        open.sort_by_key(|t| chronological_key(&t.setup.date_time));
        let open = open
            .into_iter()
            .map(|trade| OpenPosition {
                metrics: trade.metrics(),
                trade,
            })
            .collect::<Vec<_>>();

        debug!(
            "Recomputed journal: {} closed, {} open, {} skipped",
            closed.len(),
            open.len(),
            skipped.len()
        );

        Self {
            capital,
            closed,
            open,
            dashboard,
            totals,
            skipped,
        }
    }
}
