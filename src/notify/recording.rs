use super::{InvoiceMessage, Notifier, NotifyError, OrderConfirmation};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Keeps every message in memory. Test double for [`Notifier`].
///
/// With [`RecordingNotifier::failing`] every send returns an error, after still
/// recording the message.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    fail: AtomicBool,
    confirmations: Mutex<Vec<OrderConfirmation>>,
    invoices: Mutex<Vec<InvoiceMessage>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn confirmations(&self) -> Vec<OrderConfirmation> {
        self.confirmations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn invoices(&self) -> Vec<InvoiceMessage> {
        self.invoices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Waits until at least `count` confirmations arrived, or `timeout` elapsed.
    /// Confirmations are sent from a spawned task, so tests poll for them.
    pub async fn wait_for_confirmations(&self, count: usize, timeout: Duration) -> Vec<OrderConfirmation> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let seen = self.confirmations();
            if seen.len() >= count || tokio::time::Instant::now() >= deadline {
                return seen;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn outcome(&self) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(NotifyError::Rejected("delivery disabled".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_confirmation(&self, message: &OrderConfirmation) -> Result<(), NotifyError> {
        self.confirmations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        self.outcome()
    }

    async fn send_invoice(&self, message: &InvoiceMessage) -> Result<(), NotifyError> {
        self.invoices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        self.outcome()
    }
}
