//! Delivery of decoded tables to their consumers.

use super::types::Tot;
use log::warn;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Receives every TDT/TOT that passes validation, exactly once per section.
///
/// Ownership of the table moves to the handler; the decoder keeps nothing.
pub trait TotHandler {
    /// Called with a newly decoded table.
    fn on_tot(&mut self, tot: Tot);
}

impl<F> TotHandler for F
where
    F: FnMut(Tot),
{
    fn on_tot(&mut self, tot: Tot) {
        self(tot)
    }
}

/// Hands tables to a consumer task over an unbounded channel, so delivery
/// never blocks the demultiplexer.
#[derive(Debug, Clone)]
pub struct ChannelHandler {
    tx: UnboundedSender<Tot>,
}

impl ChannelHandler {
    /// Wraps the sending half of a channel.
    pub fn new(tx: UnboundedSender<Tot>) -> Self {
        Self { tx }
    }
}

impl TotHandler for ChannelHandler {
    fn on_tot(&mut self, tot: Tot) {
        if self.tx.send(tot).is_err() {
            warn!(target: "TDT/TOT decoder", "receiver dropped, discarding table");
        }
    }
}

/// Accumulates delivered tables for later inspection.
///
/// Clones share the same storage, so one clone can be attached to a decoder
/// while another is kept by the caller.
#[derive(Debug, Clone, Default)]
pub struct TotCollector {
    tables: Arc<Mutex<Vec<Tot>>>,
}

impl TotCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tables collected so far.
    pub fn len(&self) -> usize {
        self.tables.lock().len()
    }

    /// Returns true if nothing has been collected.
    pub fn is_empty(&self) -> bool {
        self.tables.lock().is_empty()
    }

    /// Removes and returns everything collected so far.
    pub fn take(&self) -> Vec<Tot> {
        std::mem::take(&mut *self.tables.lock())
    }
}

impl TotHandler for TotCollector {
    fn on_tot(&mut self, tot: Tot) {
        self.tables.lock().push(tot);
    }
}
