use std::sync::Arc;
use tokio::sync::watch;

/// Turn generation counter shared between a session and whoever may interrupt it.
///
/// Beginning a turn bumps the generation, which cancels the signal handed out for
/// the previous turn. Cancelling bumps it again without starting anything.
#[derive(Debug, Clone)]
pub struct TurnControl {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for TurnControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnControl {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Start a new turn, superseding any turn still in flight
    pub fn begin(&self) -> CancelSignal {
        self.tx.send_modify(|generation| *generation += 1);
        let rx = self.tx.subscribe();
        let generation = *rx.borrow();
        CancelSignal { rx, generation }
    }

    /// Cancel the turn in flight, if any
    pub fn cancel(&self) {
        self.tx.send_modify(|generation| *generation += 1);
    }
}

/// Observed by the stream consumer; fires once its turn is superseded or cancelled
#[derive(Debug, Clone)]
pub struct CancelSignal {
    rx: watch::Receiver<u64>,
    generation: u64,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow() != self.generation
    }

    /// Resolves when the turn is cancelled; never resolves otherwise
    pub async fn cancelled(&mut self) {
        loop {
            if self.is_cancelled() {
                return;
            }
            if self.rx.changed().await.is_err() {
                // Control dropped, nothing can cancel this turn any more
                std::future::pending::<()>().await;
            }
        }
    }
}
