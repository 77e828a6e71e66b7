use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Debounces a rapidly-changing value: observers only see it once it has
/// been stable for the full delay window. Every `set` cancels the pending
/// window and starts a new one, so only the most recent value is ever
/// propagated. Dropping the debouncer aborts the timer task and no
/// propagation happens afterwards.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new(initial: T, delay: Duration) -> Self {
        let (tx, mut in_rx) = mpsc::unbounded_channel::<T>();
        let (out_tx, rx) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while let Some(mut value) = in_rx.recv().await {
                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => {
                            // Settled. Identical values are not re-announced.
                            if *out_tx.borrow() != value {
                                let _ = out_tx.send(value);
                            }
                            break;
                        }
                        next = in_rx.recv() => match next {
                            Some(v) => value = v,
                            None => return,
                        },
                    }
                }
            }
        });

        Self { tx, rx, task }
    }

    /// Feed a new raw value, restarting the delay window.
    pub fn set(&self, value: T) {
        let _ = self.tx.send(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }

    /// Last settled value.
    pub fn current(&self) -> T {
        self.rx.borrow().clone()
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}
