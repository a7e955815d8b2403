//! Live full-list subscriptions.

use tokio::sync::broadcast::{self, error::RecvError};

/// Capacity of the per-store update channel.
pub(crate) const UPDATE_CAPACITY: usize = 16;

/// A stream of complete lists from a store.
///
/// The first item is the contents at subscription time; every later item is
/// the full contents after one mutation. Items are whole lists, not diffs, so
/// a subscriber that falls behind simply skips to the newest list.
pub struct Subscription<T> {
    initial: Option<Vec<T>>,
    receiver: broadcast::Receiver<Vec<T>>,
}

impl<T: Clone> Subscription<T> {
    pub(crate) fn new(initial: Vec<T>, receiver: broadcast::Receiver<Vec<T>>) -> Self {
        Self {
            initial: Some(initial),
            receiver,
        }
    }

    /// Wait for the next list.
    ///
    /// Returns `None` once the store and all its clones have been dropped.
    pub async fn next(&mut self) -> Option<Vec<T>> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            match self.receiver.recv().await {
                Ok(list) => return Some(list),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscriber lagged, skipped {} updates", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// The next list if one is already waiting.
    pub fn try_next(&mut self) -> Option<Vec<T>> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            match self.receiver.try_recv() {
                Ok(list) => return Some(list),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!("Subscriber lagged, skipped {} updates", skipped);
                }
                Err(_) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[tokio::test]
    async fn test_initial_then_updates() {
        let (tx, rx) = broadcast::channel(UPDATE_CAPACITY);
        let mut sub = Subscription::new(vec![1], rx);

        tx.send(vec![1, 2]).unwrap();
        assert_eq!(sub.next().await, Some(vec![1]));
        assert_eq!(sub.next().await, Some(vec![1, 2]));
        assert_eq!(sub.try_next(), None);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_gets_latest() {
        let (tx, rx) = broadcast::channel(2);
        let mut sub = Subscription::new(Vec::new(), rx);
        assert_eq!(sub.next().await, Some(Vec::new()));

        for n in 1..=5 {
            tx.send(vec![n]).unwrap();
        }
        // Oldest items were overwritten; the stream resumes with what is left.
        assert_eq!(sub.next().await, Some(vec![4]));
        assert_eq!(sub.next().await, Some(vec![5]));
    }

    #[tokio::test]
    async fn test_closed_when_sender_dropped() {
        let (tx, rx) = broadcast::channel::<Vec<u8>>(UPDATE_CAPACITY);
        let mut sub = Subscription::new(Vec::new(), rx);
        drop(tx);
        assert_eq!(sub.next().await, Some(Vec::new()));
        assert_eq!(sub.next().await, None);
    }
}
