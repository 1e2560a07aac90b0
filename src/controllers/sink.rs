//! Event sink handed to the controllers
//!
//! A controller only knows its own event type. Whoever owns the loop decides
//! how those events are wrapped and where they are queued.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

pub struct EventSink<T> {
    send: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T: 'static> EventSink<T> {
    pub fn new<F>(send: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self { send: Arc::new(send) }
    }

    /// Forward into a channel of a wider event type, wrapping with `wrap`.
    /// Sends after the receiver is gone are dropped.
    pub fn forward<E, W>(tx: UnboundedSender<E>, wrap: W) -> Self
    where
        E: Send + 'static,
        W: Fn(T) -> E + Send + Sync + 'static,
    {
        Self::new(move |event| {
            let _ = tx.send(wrap(event));
        })
    }

    pub fn send(&self, event: T) {
        (self.send)(event)
    }
}

impl<T> Clone for EventSink<T> {
    fn clone(&self) -> Self {
        Self {
            send: Arc::clone(&self.send),
        }
    }
}

impl<T> fmt::Debug for EventSink<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventSink")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum Wide {
        Narrow(u32),
    }

    #[test]
    fn test_forward_wraps_into_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = EventSink::forward(tx, Wide::Narrow);
        sink.clone().send(7);
        sink.send(8);
        assert_eq!(rx.try_recv().unwrap(), Wide::Narrow(7));
        assert_eq!(rx.try_recv().unwrap(), Wide::Narrow(8));
    }

    #[test]
    fn test_send_after_receiver_dropped_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel::<Wide>();
        drop(rx);
        EventSink::forward(tx, Wide::Narrow).send(1);
    }
}
