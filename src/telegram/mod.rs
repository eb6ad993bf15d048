pub mod client;
pub mod format;
pub mod types;

use crate::errors::DeliveryError;
use std::future::Future;

/// Delivers one formatted message to a chat.
pub trait Notifier {
    fn notify(
        &self,
        chat_id: &str,
        text: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}
