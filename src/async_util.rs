use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task;

use async_broadcast::{Receiver, Sender};
use async_lock::Mutex;

/// Sends notifications from "foreign" callbacks if there is any existing `NotifierReceiver`.
pub struct Notifier<T: Send + Clone> {
    capacity: usize,
    inner: Mutex<Weak<NotifierInner<T>>>,
}

struct NotifierInner<T: Send + Clone> {
    sender: Sender<Option<T>>,
}

pub struct NotifierReceiver<T: Send + Clone> {
    holder: Option<Arc<NotifierInner<T>>>,
    receiver: Receiver<Option<T>>,
}

impl<T: Send + Clone> Notifier<T> {
    /// Creates a new inactive `Notifier`.
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Weak::new()),
        }
    }

    /// Checks if any receiver is alive.
    pub fn is_notifying(&self) -> bool {
        self.inner.lock_blocking().strong_count() > 0
    }

    /// Creates a new `NotifierReceiver` for the caller to receive notifications sent
    /// after this call. When the channel overflows, the oldest values are dropped.
    pub fn subscribe(&self) -> NotifierReceiver<T> {
        let mut guard_inner = self.inner.lock_blocking();
        if let Some(inner) = guard_inner.upgrade() {
            let receiver = inner.sender.new_receiver();
            NotifierReceiver {
                holder: Some(inner),
                receiver,
            }
        } else {
            let (mut sender, receiver) = async_broadcast::broadcast(self.capacity.max(1));
            sender.set_overflow(true);
            let new_inner = Arc::new(NotifierInner { sender });
            *guard_inner = Arc::downgrade(&new_inner);
            NotifierReceiver {
                holder: Some(new_inner),
                receiver,
            }
        }
    }

    /// Sends a notifcation value from the "foreign" callback.
    pub fn notify(&self, value: T) {
        let inner = self.inner.lock_blocking().upgrade();
        if let Some(inner) = inner {
            let _ = inner.sender.try_broadcast(Some(value));
        }
    }

    /// Ends every existing receiver stream. Later subscriptions start a new channel.
    pub fn close(&self) {
        let inner = std::mem::take(&mut *self.inner.lock_blocking()).upgrade();
        if let Some(inner) = inner {
            let _ = inner.sender.try_broadcast(None);
        }
    }
}

impl<T: Send + Clone> futures_core::Stream for NotifierReceiver<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> task::Poll<Option<T>> {
        if self.holder.is_none() {
            task::Poll::Ready(None)
        } else if let task::Poll::Ready(result) = std::pin::pin!(&mut self.receiver).poll_next(cx) {
            if let Some(value) = result.flatten() {
                task::Poll::Ready(Some(value))
            } else {
                let _ = self.holder.take();
                task::Poll::Ready(None)
            }
        } else {
            task::Poll::Pending
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.receiver.size_hint()
    }
}

impl<T: Send + Clone> Drop for Notifier<T> {
    fn drop(&mut self) {
        self.close();
    }
}
