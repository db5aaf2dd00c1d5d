//! Cancellation and deadline signal shared by every stage of a run

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// Why a run was interrupted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupt {
    Cancelled,
    DeadlineExceeded(Duration),
}

/// Sender half used to cancel a run from elsewhere (e.g. a Ctrl-C handler)
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiver half observed by the orchestrator
///
/// Fires either when the paired [`CancelHandle`] is cancelled or when the
/// optional deadline passes, whichever comes first.
#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    signal: Option<watch::Receiver<bool>>,
    deadline: Option<(Instant, Duration)>,
}

impl Cancellation {
    pub fn new() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (
            CancelHandle { tx },
            Self {
                signal: Some(rx),
                deadline: None,
            },
        )
    }

    /// A signal that never fires
    pub fn none() -> Self {
        Self::default()
    }

    /// Adds a deadline measured from now
    pub fn with_deadline(mut self, timeout: Duration) -> Self {
        self.deadline = Some((Instant::now() + timeout, timeout));
        self
    }

    /// Non-blocking check, used between stages
    pub fn check(&self) -> Option<Interrupt> {
        if let Some(rx) = &self.signal {
            if *rx.borrow() {
                return Some(Interrupt::Cancelled);
            }
        }
        match self.deadline {
            Some((at, timeout)) if Instant::now() >= at => {
                Some(Interrupt::DeadlineExceeded(timeout))
            }
            _ => None,
        }
    }

    /// Resolves once the run is interrupted; pending forever otherwise
    pub async fn interrupted(&self) -> Interrupt {
        let cancelled = async {
            match &self.signal {
                Some(rx) => {
                    let mut rx = rx.clone();
                    // A dropped handle can no longer cancel
                    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };

        let expired = async {
            match self.deadline {
                Some((at, timeout)) => {
                    tokio::time::sleep_until(at).await;
                    timeout
                }
                None => std::future::pending::<Duration>().await,
            }
        };

        tokio::select! {
            _ = cancelled => Interrupt::Cancelled,
            timeout = expired => Interrupt::DeadlineExceeded(timeout),
        }
    }
}
