//! Paced dispatch for rate-limited lookups.
//!
//! A [`Pacer`] hands out dispatch slots no closer together than a fixed
//! interval. [`paced`] wraps any sequence so each item is yielded only once
//! its slot opens. The first item is never delayed.

use futures_util::stream::{self, Stream};
use std::time::Duration;
use tokio::time::Instant;

/// Spaces out successive dispatches by at least `interval`.
#[derive(Debug, Clone)]
pub struct Pacer {
    interval: Duration,
    last_dispatch: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_dispatch: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next dispatch is allowed, then claim it.
    pub async fn ready(&mut self) {
        if let Some(last) = self.last_dispatch {
            tokio::time::sleep_until(last + self.interval).await;
        }
        self.last_dispatch = Some(Instant::now());
    }
}

/// Yield `items` in order, each one no sooner than `interval` after the
/// previous one was yielded.
pub fn paced<I>(items: I, interval: Duration) -> impl Stream<Item = I::Item>
where
    I: IntoIterator,
{
    stream::unfold(
        (items.into_iter(), Pacer::new(interval)),
        |(mut iter, mut pacer)| async move {
            let item = iter.next()?;
            pacer.ready().await;
            Some((item, (iter, pacer)))
        },
    )
}
