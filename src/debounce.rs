use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

type Action<T> = Arc<dyn Fn(T) -> BoxFuture<'static, ()> + Send + Sync>;

/// Collapses bursts of calls into a single run of `action`, `wait` after the
/// last call, using the arguments of that last call.
///
/// Must be driven from inside a tokio runtime. Dropping the debouncer drops
/// whatever is still scheduled.
pub struct Debouncer<T> {
    wait: Duration,
    action: Action<T>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(wait: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            wait,
            action: Arc::new(move |args| action(args).boxed()),
            pending: Mutex::new(None),
        }
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn call(&self, args: T) {
        let action = Arc::clone(&self.action);
        let wait = self.wait;
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            action(args).await;
        }));
    }

    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
    }

    /// True while a call is scheduled or its action is still running.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, Debouncer<u32>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let debouncer = Debouncer::new(Duration::from_millis(200), move |value: u32| {
            let sink = Arc::clone(&sink);
            async move {
                sink.lock().unwrap().push(value);
            }
        });
        (seen, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn burst_fires_once_with_last_arguments() {
        let (seen, debouncer) = recorder();
        for value in 1..=5 {
            debouncer.call(value);
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        assert!(seen.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(*seen.lock().unwrap(), vec![5]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn separate_windows_fire_separately() {
        let (seen, debouncer) = recorder();
        debouncer.call(1);
        tokio::time::sleep(Duration::from_millis(250)).await;
        debouncer.call(2);
        tokio::time::sleep(Duration::from_millis(250)).await;
        assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_discard_the_scheduled_call() {
        let (seen, debouncer) = recorder();
        debouncer.call(7);
        assert!(debouncer.is_pending());
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(seen.lock().unwrap().is_empty());

        debouncer.call(8);
        drop(debouncer);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sync_actions_can_use_ready_futures() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let debouncer = Debouncer::new(Duration::from_millis(10), move |_: ()| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(())
        });
        debouncer.call(());
        debouncer.call(());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
