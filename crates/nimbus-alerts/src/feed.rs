//! [`NotificationLog`] — history writes plus a live broadcast feed.

use nimbus_core::{
  history::{NewNotification, NotificationRecord},
  store::HistoryStore,
};
use tokio::sync::broadcast;

/// Records buffered per subscriber before the slowest one starts lagging.
const FEED_CAPACITY: usize = 64;

/// The single origination point for new notification records.
///
/// Every dispatch goes through [`NotificationLog::record`], which appends to
/// the history store and then publishes the stored record to all live
/// subscribers. Subscribers that fall behind lose the oldest buffered
/// records, never the store's copy.
#[derive(Clone)]
pub struct NotificationLog {
  sender: broadcast::Sender<NotificationRecord>,
}

impl NotificationLog {
  pub fn new() -> Self {
    let (sender, _) = broadcast::channel(FEED_CAPACITY);
    Self { sender }
  }

  /// A live feed of records as they are appended.
  pub fn subscribe(&self) -> broadcast::Receiver<NotificationRecord> {
    self.sender.subscribe()
  }

  /// Append one record and publish it. The append is authoritative; a send
  /// with no live subscribers is not an error.
  pub async fn record<S: HistoryStore>(
    &self,
    store: &S,
    input: NewNotification,
  ) -> Result<NotificationRecord, S::Error> {
    let record = store.append(input).await?;
    let _ = self.sender.send(record.clone());
    Ok(record)
  }
}

impl Default for NotificationLog {
  fn default() -> Self { Self::new() }
}
