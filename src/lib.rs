//! Trade Journal
//!
//! P&L and performance metrics for a manually kept trading journal.
//!
//! ## Architecture
//!
//! ```text
//! JournalStore (capital + trade records) ──watch──→ JournalView::compute
//!                                                     ├─ pnl        (per trade)
//!                                                     ├─ aggregate  (sequence + dashboard)
//!                                                     └─ analytics  (chart series)
//!                                                            ↓
//!                                                  format (truncated display text)
//! ```

pub mod aggregate;
pub mod analytics;
pub mod capital;
pub mod config;
pub mod error;
pub mod format;
pub mod journal;
pub mod pnl;
pub mod store;
pub mod types;

pub use aggregate::{compute_dashboard_metrics, compute_trade_sequence};
pub use pnl::{compute_closed_trade_pnl, compute_open_trade_metrics};

#[cfg(test)]
mod testing;
