//! Test fixtures

use crate::types::{ClosedTrade, Direction, OpenTrade, Trade, TradeSetup, TradeState, TradeStatus};

/// Builder for trade records with sensible defaults
#[derive(Debug, Clone)]
pub struct TradeBuilder {
    trade: Trade,
}

impl TradeBuilder {
    pub fn long(entry_price: f64) -> Self {
        Self::new(Direction::Long, entry_price)
    }

    pub fn short(entry_price: f64) -> Self {
        Self::new(Direction::Short, entry_price)
    }

    fn new(direction: Direction, entry_price: f64) -> Self {
        Self {
            trade: Trade {
                id: "t-1".to_string(),
                date_time: "2024-05-01T10:00".to_string(),
                close_date_time: None,
                pair: "BTC/USDT".to_string(),
                strategy: "Breakout".to_string(),
                notes: String::new(),
                direction,
                entry_price,
                exit_price: None,
                margin: 1000.0,
                leverage: 1.0,
                risk_percent: 1.0,
                fees: None,
                stop_loss: None,
                take_profit: None,
                risk_reward: "2:1".to_string(),
                status: TradeStatus::Open,
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.trade.id = id.to_string();
        self
    }

    pub fn opened(mut self, date_time: &str) -> Self {
        self.trade.date_time = date_time.to_string();
        self
    }

    pub fn strategy(mut self, strategy: &str) -> Self {
        self.trade.strategy = strategy.to_string();
        self
    }

    pub fn margin(mut self, margin: f64) -> Self {
        self.trade.margin = margin;
        self
    }

    pub fn leverage(mut self, leverage: f64) -> Self {
        self.trade.leverage = leverage;
        self
    }

    pub fn risk_percent(mut self, risk_percent: f64) -> Self {
        self.trade.risk_percent = risk_percent;
        self
    }

    pub fn stop_loss(mut self, price: f64) -> Self {
        self.trade.stop_loss = Some(price);
        self
    }

    pub fn take_profit(mut self, price: f64) -> Self {
        self.trade.take_profit = Some(price);
        self
    }

    /// Marks the trade closed with an exit price and fees.
    pub fn closed(mut self, exit_price: f64, fees: f64) -> Self {
        self.trade.status = TradeStatus::Closed;
        self.trade.exit_price = Some(exit_price);
        self.trade.fees = Some(fees);
        self.trade.close_date_time = Some("2024-05-02T10:00".to_string());
        self
    }

    pub fn build(self) -> Trade {
        self.trade
    }

    pub fn setup(self) -> TradeSetup {
        TradeState::try_from(&self.trade)
            .expect("builder trade is complete")
            .setup()
            .clone()
    }

    pub fn open_trade(self) -> OpenTrade {
        self.trade.as_open().expect("builder trade is open")
    }

    pub fn closed_trade(self) -> ClosedTrade {
        self.trade.as_closed().expect("builder trade is closed")
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
