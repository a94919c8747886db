//! Core journal types
//!
//! [`Trade`] is the flat record exactly as the document store keeps it. The
//! calculators work on the tagged union [`TradeState`] instead, so a closed
//! trade always carries its exit price, fees and close timestamp.

use crate::error::{JournalError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Price-move multiplier: +1 for longs, -1 for shorts.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Long => 1.0,
            Direction::Short => -1.0,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "Long"),
            Direction::Short => write!(f, "Short"),
        }
    }
}

/// Lifecycle state of a stored trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Open,
    /// Records written before open positions existed carry no status and
    /// were always closed.
    #[default]
    Closed,
}

impl TradeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeStatus::Open => "open",
            TradeStatus::Closed => "closed",
        }
    }
}

fn default_leverage() -> f64 {
    1.0
}

/// Trade record as stored by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Assigned by the store, never by the calculators
    #[serde(default)]
    pub id: String,
    /// Open timestamp, ISO-like local time (`2024-05-01T14:30`)
    pub date_time: String,
    #[serde(default)]
    pub close_date_time: Option<String>,
    #[serde(default)]
    pub pair: String,
    #[serde(default)]
    pub strategy: String,
    #[serde(default)]
    pub notes: String,
    pub direction: Direction,
    pub entry_price: f64,
    #[serde(default)]
    pub exit_price: Option<f64>,
    /// Capital committed before leverage
    #[serde(default)]
    pub margin: f64,
    #[serde(default = "default_leverage")]
    pub leverage: f64,
    /// Planned risk as a percentage of position value
    #[serde(default)]
    pub risk_percent: f64,
    #[serde(default)]
    pub fees: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    /// Free-text planned ratio (e.g. "2:1"), display only
    #[serde(default)]
    pub risk_reward: String,
    #[serde(default)]
    pub status: TradeStatus,
}

/// Fields shared by open and closed trades
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeSetup {
    pub id: String,
    pub date_time: String,
    pub pair: String,
    pub strategy: String,
    pub notes: String,
    pub direction: Direction,
    pub entry_price: f64,
    pub margin: f64,
    pub leverage: f64,
    pub risk_percent: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub risk_reward: String,
}

/// A position that is still running
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTrade {
    #[serde(flatten)]
    pub setup: TradeSetup,
}

/// A finished position with a realized outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedTrade {
    #[serde(flatten)]
    pub setup: TradeSetup,
    pub exit_price: f64,
    pub fees: f64,
    /// Absent on records logged before close times were tracked
    #[serde(default)]
    pub close_date_time: Option<String>,
}

/// Tagged union over the trade lifecycle
#[derive(Debug, Clone, PartialEq)]
pub enum TradeState {
    Open(OpenTrade),
    Closed(ClosedTrade),
}

impl TradeState {
    pub fn setup(&self) -> &TradeSetup {
        match self {
            TradeState::Open(t) => &t.setup,
            TradeState::Closed(t) => &t.setup,
        }
    }

    pub fn status(&self) -> TradeStatus {
        match self {
            TradeState::Open(_) => TradeStatus::Open,
            TradeState::Closed(_) => TradeStatus::Closed,
        }
    }
}

impl Trade {
    fn setup(&self) -> TradeSetup {
        TradeSetup {
            id: self.id.clone(),
            date_time: self.date_time.clone(),
            pair: self.pair.clone(),
            strategy: self.strategy.clone(),
            notes: self.notes.clone(),
            direction: self.direction,
            entry_price: self.entry_price,
            margin: self.margin,
            leverage: self.leverage,
            risk_percent: self.risk_percent,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            risk_reward: self.risk_reward.clone(),
        }
    }

    fn from_setup(setup: TradeSetup, status: TradeStatus) -> Self {
        Self {
            id: setup.id,
            date_time: setup.date_time,
            close_date_time: None,
            pair: setup.pair,
            strategy: setup.strategy,
            notes: setup.notes,
            direction: setup.direction,
            entry_price: setup.entry_price,
            exit_price: None,
            margin: setup.margin,
            leverage: setup.leverage,
            risk_percent: setup.risk_percent,
            fees: None,
            stop_loss: setup.stop_loss,
            take_profit: setup.take_profit,
            risk_reward: setup.risk_reward,
            status,
        }
    }

    /// Checked view as an open trade.
    pub fn as_open(&self) -> Result<OpenTrade> {
        match self.status {
            TradeStatus::Open => Ok(OpenTrade {
                setup: self.setup(),
            }),
            TradeStatus::Closed => Err(self.wrong_state(TradeStatus::Open)),
        }
    }

    /// Checked view as a closed trade.
    pub fn as_closed(&self) -> Result<ClosedTrade> {
        match TradeState::try_from(self)? {
            TradeState::Closed(closed) => Ok(closed),
            TradeState::Open(_) => Err(self.wrong_state(TradeStatus::Closed)),
        }
    }

    fn wrong_state(&self, expected: TradeStatus) -> JournalError {
        JournalError::InvalidState {
            id: self.id.clone(),
            expected: expected.as_str(),
            actual: self.status.as_str(),
        }
    }
}

impl TryFrom<&Trade> for TradeState {
    type Error = JournalError;

    fn try_from(trade: &Trade) -> Result<Self> {
        let setup = trade.setup();
        match trade.status {
            TradeStatus::Open => Ok(TradeState::Open(OpenTrade { setup })),
            TradeStatus::Closed => {
                let missing = |field| JournalError::IncompleteTrade {
                    id: trade.id.clone(),
                    field,
                };
                let exit_price = trade.exit_price.ok_or_else(|| missing("exitPrice"))?;
                let fees = trade.fees.ok_or_else(|| missing("fees"))?;
                Ok(TradeState::Closed(ClosedTrade {
                    setup,
                    exit_price,
                    fees,
                    close_date_time: trade.close_date_time.clone(),
                }))
            }
        }
    }
}

impl TryFrom<Trade> for TradeState {
    type Error = JournalError;

    fn try_from(trade: Trade) -> Result<Self> {
        TradeState::try_from(&trade)
    }
}

impl From<OpenTrade> for Trade {
    fn from(open: OpenTrade) -> Self {
        Trade::from_setup(open.setup, TradeStatus::Open)
    }
}

impl From<ClosedTrade> for Trade {
    fn from(closed: ClosedTrade) -> Self {
        let mut trade = Trade::from_setup(closed.setup, TradeStatus::Closed);
        trade.exit_price = Some(closed.exit_price);
        trade.fees = Some(closed.fees);
        trade.close_date_time = closed.close_date_time;
        trade
    }
}

impl From<TradeState> for Trade {
    fn from(state: TradeState) -> Self {
        match state {
            TradeState::Open(open) => open.into(),
            TradeState::Closed(closed) => closed.into(),
        }
    }
}

const LOCAL_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a stored timestamp into a sortable value.
///
/// Accepts the `datetime-local` shapes the entry form produces, a bare date,
/// and full RFC 3339 (normalized to UTC). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Sort key placing parseable timestamps first, in chronological order.
pub(crate) fn chronological_key(date_time: &str) -> (bool, Option<NaiveDateTime>) {
    let ts = parse_timestamp(date_time);
    (ts.is_none(), ts)
}
