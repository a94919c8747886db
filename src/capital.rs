//! Capital base: initial funding plus deposits. Withdrawals are not modelled.

use crate::error::{JournalError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capital {
    pub initial: f64,
    #[serde(default)]
    pub deposits: f64,
}

impl Default for Capital {
    fn default() -> Self {
        Self {
            initial: 1000.0,
            deposits: 0.0,
        }
    }
}

impl Capital {
    pub fn new(initial: f64, deposits: f64) -> Self {
        Self { initial, deposits }
    }

    /// Equity before any trade: initial + deposits.
    pub fn base(&self) -> f64 {
        self.initial + self.deposits
    }

    /// Returns the capital with `amount` added to deposits.
    pub fn add_deposit(&self, amount: f64) -> Result<Capital> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(JournalError::InvalidInput(format!(
                "deposit must be a positive amount, got {amount}"
            )));
        }
        Ok(Capital {
            deposits: self.deposits + amount,
            ..*self
        })
    }

    pub fn apply(&self, patch: &CapitalPatch) -> Capital {
        Capital {
            initial: patch.initial.unwrap_or(self.initial),
            deposits: patch.deposits.unwrap_or(self.deposits),
        }
    }
}

/// Partial capital update, merged field by field
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CapitalPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposits: Option<f64>,
}

impl CapitalPatch {
    pub fn initial(value: f64) -> Self {
        Self {
            initial: Some(value),
            deposits: None,
        }
    }

    pub fn deposits(value: f64) -> Self {
        Self {
            initial: None,
            deposits: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.initial.is_none() && self.deposits.is_none()
    }
}

/// Parse user-entered initial capital.
///
/// Reads the longest leading number and ignores trailing text (`"12abc"` is
/// 12). Input with no leading number, or a non-finite one, counts as zero.
pub fn parse_initial_capital(raw: &str) -> f64 {
    let raw = raw.trim_start();
    let candidate_len = raw
        .find(|c: char| !matches!(c, '0'..='9' | '.' | '+' | '-' | 'e' | 'E'))
        .unwrap_or(raw.len());

    (1..=candidate_len)
        .rev()
        .find_map(|len| raw[..len].parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
