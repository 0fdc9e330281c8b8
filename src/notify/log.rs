use super::{InvoiceMessage, Notifier, NotifyError, OrderConfirmation};
use async_trait::async_trait;
use tracing::info;

/// Writes every message to the log as JSON. The default notifier when no delivery
/// service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_confirmation(&self, message: &OrderConfirmation) -> Result<(), NotifyError> {
        let body = serde_json::to_string(message)?;
        info!(order_id = %message.order_id, to = %message.customer_email, %body, "Order confirmation");
        Ok(())
    }

    async fn send_invoice(&self, message: &InvoiceMessage) -> Result<(), NotifyError> {
        let body = serde_json::to_string(message)?;
        info!(number = %message.invoice.number, to = %message.customer_email, %body, "Invoice");
        Ok(())
    }
}
