//! Polling status watcher

use std::sync::Arc;
use std::time::Duration;

use shared::models::{PaymentVerification, TransactionStatus};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::PaymentVerifier;
use crate::ClientConfig;

/// Observable watcher state
#[derive(Debug, Clone, PartialEq)]
pub enum WatchState {
    Idle,
    /// `attempts` verify calls issued so far, including the one in flight
    Polling { attempts: u32 },
    Confirmed(PaymentVerification),
    Failed(String),
    /// Horizon passed while the order was still pending. Not an error:
    /// the payment may still settle.
    TimedOut,
}

impl WatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed(_) | Self::Failed(_) | Self::TimedOut)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherConfig {
    pub interval: Duration,
    pub horizon: Duration,
}

impl WatcherConfig {
    /// Zero durations fall back to the defaults; the ticker needs a
    /// non-zero period
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            interval: if self.interval.is_zero() { defaults.interval } else { self.interval },
            horizon: if self.horizon.is_zero() { defaults.horizon } else { self.horizon },
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval: ClientConfig::DEFAULT_POLL_INTERVAL,
            horizon: ClientConfig::DEFAULT_POLL_HORIZON,
        }
    }
}

impl From<&ClientConfig> for WatcherConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            interval: config.poll_interval,
            horizon: config.poll_horizon,
        }
    }
}

/// Starts one polling task per order
pub struct PaymentWatcher<V> {
    verifier: Arc<V>,
    config: WatcherConfig,
}

impl<V> Clone for PaymentWatcher<V> {
    fn clone(&self) -> Self {
        Self {
            verifier: self.verifier.clone(),
            config: self.config,
        }
    }
}

impl<V: PaymentVerifier> PaymentWatcher<V> {
    pub fn new(verifier: Arc<V>, config: WatcherConfig) -> Self {
        let sanitized = config.sanitized();
        if sanitized != config {
            tracing::warn!(?config, "Zero polling duration replaced with the default");
        }
        Self {
            verifier,
            config: sanitized,
        }
    }

    /// Begin polling `order_id`. The first verify is issued immediately.
    ///
    /// Dropping the returned handle stops the task.
    pub fn start(&self, order_id: impl Into<String>) -> WatchHandle {
        let order_id = order_id.into();
        let (tx, rx) = watch::channel(WatchState::Idle);
        let cancel = CancellationToken::new();

        let task = tokio::spawn(poll_order(
            self.verifier.clone(),
            self.config,
            order_id,
            tx,
            cancel.clone(),
        ));

        WatchHandle {
            state: rx,
            cancel,
            task: Some(task),
        }
    }
}

async fn poll_order<V: PaymentVerifier>(
    verifier: Arc<V>,
    config: WatcherConfig,
    order_id: String,
    tx: watch::Sender<WatchState>,
    cancel: CancellationToken,
) {
    let deadline = tokio::time::sleep_until(Instant::now() + config.horizon);
    tokio::pin!(deadline);
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut attempts = 0u32;

    tracing::info!(order_id = %order_id, "Watching payment");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(order_id = %order_id, attempts, "Payment watch cancelled");
                return;
            }
            _ = &mut deadline => {
                tracing::info!(order_id = %order_id, attempts, "Payment still processing, giving up polling");
                tx.send_replace(WatchState::TimedOut);
                return;
            }
            _ = ticker.tick() => {}
        }

        attempts += 1;
        tx.send_replace(WatchState::Polling { attempts });

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(order_id = %order_id, attempts, "Payment watch cancelled mid-request");
                return;
            }
            _ = &mut deadline => {
                tracing::info!(order_id = %order_id, attempts, "Payment still processing, giving up polling");
                tx.send_replace(WatchState::TimedOut);
                return;
            }
            result = verifier.verify(&order_id) => result,
        };

        match result {
            Ok(verification) => match verification.status {
                TransactionStatus::Pending => {
                    tracing::debug!(order_id = %order_id, attempts, "Payment pending");
                }
                TransactionStatus::Success => {
                    tracing::info!(
                        order_id = %order_id,
                        receipt = ?verification.receipt_number,
                        "Payment confirmed"
                    );
                    tx.send_replace(WatchState::Confirmed(verification));
                    return;
                }
                TransactionStatus::Failed => {
                    tracing::warn!(order_id = %order_id, "Payment failed");
                    tx.send_replace(WatchState::Failed("Payment failed".to_string()));
                    return;
                }
            },
            Err(e) if e.is_transient() => {
                tracing::warn!(order_id = %order_id, attempts, error = %e, "Verify failed, will retry");
            }
            Err(e) => {
                tracing::warn!(order_id = %order_id, error = %e, "Verify failed");
                tx.send_replace(WatchState::Failed(e.message()));
                return;
            }
        }
    }
}

/// Handle to a running watch
#[derive(Debug)]
pub struct WatchHandle {
    state: watch::Receiver<WatchState>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl WatchHandle {
    /// Latest published state
    pub fn state(&self) -> WatchState {
        self.state.borrow().clone()
    }

    /// Receiver for rendering every change
    pub fn subscribe(&self) -> watch::Receiver<WatchState> {
        self.state.clone()
    }

    /// Wait for a terminal state.
    ///
    /// If the task stops without one (cancelled), the last state is returned.
    pub async fn finished(&mut self) -> WatchState {
        let terminal = self
            .state
            .wait_for(WatchState::is_terminal)
            .await
            .map(|state| state.clone());
        match terminal {
            Ok(state) => state,
            Err(_) => self.state.borrow().clone(),
        }
    }

    /// Stop polling; no further verify calls are issued
    pub fn cancel(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
