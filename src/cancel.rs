// src/cancel.rs
//! Cooperative cancellation for in-flight operations
//!
//! The controller checks the token at every state-machine transition; a
//! cancelled token takes the same rollback path as an ordinary failure.
//! Wiring an OS signal handler to `cancel()` is the embedder's choice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, VaultError};

#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from another thread or a signal
    /// handler shim.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Checkpoint: `Err(Interrupted)` once cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(VaultError::Interrupted)
        } else {
            Ok(())
        }
    }
}
