use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

/// Source of delays, so rate-limited loops can run against a virtual clock.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await
    }
}

/// Clock that never waits, only accounts for the time it was asked to sleep.
#[derive(Debug, Default)]
pub struct VirtualClock {
    elapsed_millis: AtomicU64,
    sleeps: AtomicUsize,
}

impl VirtualClock {
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_millis.load(Ordering::SeqCst))
    }

    pub fn sleeps(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Clock for VirtualClock {
    async fn sleep(&self, duration: Duration) {
        self.elapsed_millis
            .fetch_add(duration.as_millis() as u64, Ordering::SeqCst);
        self.sleeps.fetch_add(1, Ordering::SeqCst);
    }
}

/// Yields items one at a time, waiting `interval` after each yielded item
/// before handing out the next one (or reporting the end).
///
/// With `n` items the clock is slept on exactly `n` times.
pub struct Throttle<'c, I> {
    items: I,
    interval: Duration,
    clock: &'c dyn Clock,
    pending_delay: bool,
}

impl<'c, I: Iterator> Throttle<'c, I> {
    pub fn new<T>(items: T, interval: Duration, clock: &'c dyn Clock) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            items: items.into_iter(),
            interval,
            clock,
            pending_delay: false,
        }
    }

    pub async fn next(&mut self) -> Option<I::Item> {
        if self.pending_delay {
            self.clock.sleep(self.interval).await;
        }

        let item = self.items.next();
        self.pending_delay = item.is_some();

        item
    }
}
