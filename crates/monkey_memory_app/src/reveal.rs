//! Cancellable reveal timer.

use std::time::Duration;

use monkey_memory::RevealTicket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// Timer that hands a [`RevealTicket`] back once the reveal is over.
///
/// At most one timer is pending; scheduling a new one aborts the previous
/// one. Expired tickets are collected from [`RevealScheduler::try_next`] or
/// [`RevealScheduler::next`].
#[derive(Debug)]
pub struct RevealScheduler {
    tx: mpsc::UnboundedSender<RevealTicket>,
    rx: mpsc::UnboundedReceiver<RevealTicket>,
    pending: Option<JoinHandle<()>>,
}

impl Default for RevealScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealScheduler {
    /// Creates a scheduler with nothing pending.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            pending: None,
        }
    }

    /// Arms the timer for `ticket`, replacing any pending one.
    ///
    /// Must be called from within a tokio runtime.
    #[instrument(skip(self))]
    pub fn schedule(&mut self, ticket: RevealTicket, after: Duration) {
        self.cancel();
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(after).await;
            debug!(?ticket, "Reveal elapsed");
            // Receiver lives as long as the scheduler; a send error only
            // means the scheduler is gone.
            let _ = tx.send(ticket);
        }));
    }

    /// Aborts the pending timer, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            debug!("Cancelling pending reveal");
            handle.abort();
        }
    }

    /// Returns true while a timer is armed and has not yet fired.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Returns an expired ticket without waiting.
    pub fn try_next(&mut self) -> Option<RevealTicket> {
        self.rx.try_recv().ok()
    }

    /// Waits for the next expired ticket.
    ///
    /// Returns `None` straight away when no timer is armed and nothing is
    /// queued.
    pub async fn next(&mut self) -> Option<RevealTicket> {
        // A finished timer has already sent, so check before draining.
        let armed = self.is_pending();
        if let Ok(ticket) = self.rx.try_recv() {
            return Some(ticket);
        }
        if !armed {
            return None;
        }
        self.rx.recv().await
    }
}

impl Drop for RevealScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
