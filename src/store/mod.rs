//! Journal document store
//!
//! Holds the full journal state (capital + trade records) and publishes every
//! change as a complete snapshot over a `watch` channel. Subscribers never see
//! partial updates; they recompute from whatever snapshot they receive.
//!
//! Optionally backed by a JSON file. With autosave on, each mutation writes
//! through best-effort: a failed write is logged, the in-memory update stands.


use crate::capital::{Capital, CapitalPatch};
use crate::error::{JournalError, Result};
use crate::types::Trade;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

/// Full current state of a journal
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JournalSnapshot {
    #[serde(default)]
    pub capital: Capital,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

pub struct JournalStore {
    state: watch::Sender<JournalSnapshot>,
    path: Option<PathBuf>,
    autosave: bool,
}

impl JournalStore {
    /// Store without file backing
    pub fn in_memory(snapshot: JournalSnapshot) -> Self {
        let (state, _) = watch::channel(snapshot);
        Self {
            state,
            path: None,
            autosave: false,
        }
    }

    /// Open a file-backed store, starting from the default journal when the
    /// file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let snapshot: JournalSnapshot = serde_json::from_str(&raw)?;
            debug!("Loaded {} trades from {}", snapshot.trades.len(), path.display());
            snapshot
        } else {
            info!("No journal at {}, starting with defaults", path.display());
            JournalSnapshot::default()
        };

        let (state, _) = watch::channel(snapshot);
        Ok(Self {
            state,
            path: Some(path),
            autosave: false,
        })
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Receiver that always holds the latest full snapshot.
    pub fn subscribe(&self) -> watch::Receiver<JournalSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> JournalSnapshot {
        self.state.borrow().clone()
    }

    /// Insert a trade under a fresh id and return that id.
    pub fn add_trade(&self, mut trade: Trade) -> String {
        let id = Uuid::new_v4().to_string();
        trade.id = id.clone();
        self.state.send_modify(|s| s.trades.push(trade));
        debug!("Added trade {}", id);
        self.write_through();
        id
    }

    /// Overwrite the stored trade that has the same id.
    pub fn replace_trade(&self, trade: Trade) -> Result<()> {
        let id = trade.id.clone();
        let replaced = self.state.send_if_modified(|s| {
            match s.trades.iter_mut().find(|t| t.id == id) {
                Some(slot) => {
                    *slot = trade;
                    true
                }
                None => false,
            }
        });
        if !replaced {
            return Err(JournalError::TradeNotFound(id));
        }
        self.write_through();
        Ok(())
    }

    pub fn delete_trade(&self, id: &str) -> Result<()> {
        let removed = self.state.send_if_modified(|s| {
            let before = s.trades.len();
            s.trades.retain(|t| t.id != id);
            s.trades.len() != before
        });
        if !removed {
            return Err(JournalError::TradeNotFound(id.to_string()));
        }
        debug!("Deleted trade {}", id);
        self.write_through();
        Ok(())
    }

    /// Merge-write capital fields; unset patch fields keep their value.
    pub fn update_capital(&self, patch: CapitalPatch) -> Capital {
        if patch.is_empty() {
            return self.state.borrow().capital;
        }
        self.state.send_modify(|s| s.capital = s.capital.apply(&patch));
        self.write_through();
        self.state.borrow().capital
    }

    pub fn add_deposit(&self, amount: f64) -> Result<Capital> {
        let current = self.state.borrow().capital;
        let updated = current.add_deposit(amount)?;
        Ok(self.update_capital(CapitalPatch::deposits(updated.deposits)))
    }

    /// Write the current snapshot to the backing file, if any.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            debug!("In-memory journal, nothing to save");
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&*self.state.borrow())?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        debug!("Saved journal to {}", path.display());
        Ok(())
    }

    fn write_through(&self) {
        if !self.autosave {
            return;
        }
        if let Err(e) = self.save() {
            error!("Failed to persist journal: {}", e);
        }
    }
}
