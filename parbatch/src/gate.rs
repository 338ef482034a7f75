//! Output Gating
//!
//! Per-facade suppression of informational output during the parallel
//! phase. The gate is owned by one executor instance, never shared process
//! state, so concurrent executors cannot trample each other's logging.
//! Restoration is tied to a guard's lifetime: every exit path out of a
//! batch, including job failures and pool errors, reopens the gate.

use std::sync::atomic::{AtomicBool, Ordering};

/// Gate in front of a facade's informational log output.
#[derive(Debug, Default)]
pub struct OutputGate {
    silenced: AtomicBool,
}

impl OutputGate {
    /// An open gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether output is currently suppressed.
    pub fn is_silenced(&self) -> bool {
        self.silenced.load(Ordering::Acquire)
    }

    /// Silence the gate until the returned guard drops.
    ///
    /// Guards nest: each guard restores the state it observed, so an inner
    /// guard dropping does not reopen a gate an outer guard still holds.
    pub fn silence(&self) -> SilenceGuard<'_> {
        let was_silenced = self.silenced.swap(true, Ordering::AcqRel);
        SilenceGuard {
            gate: self,
            was_silenced,
        }
    }

    /// Emit an info-level line unless the gate is silenced.
    pub fn info(&self, message: &str) {
        if !self.is_silenced() {
            for line in message.lines() {
                tracing::info!(target: "parbatch", "{line}");
            }
        }
    }

    /// Emit a warning unless the gate is silenced.
    pub fn warn(&self, message: &str) {
        if !self.is_silenced() {
            tracing::warn!(target: "parbatch", "{message}");
        }
    }
}

/// Restores the gate's prior state on drop.
#[derive(Debug)]
pub struct SilenceGuard<'a> {
    gate: &'a OutputGate,
    was_silenced: bool,
}

impl Drop for SilenceGuard<'_> {
    fn drop(&mut self) {
        self.gate.silenced.store(self.was_silenced, Ordering::Release);
    }
}
