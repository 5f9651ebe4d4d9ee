use crate::{EventPublisher, FeedEvent, Heartbeat, PriceWalk};
use log::*;
use rand::Rng;
use std::time::Duration;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Runs the heartbeat and the simulated feed as two independent background
/// tasks until [`Scheduler::shutdown`] is called or the token is cancelled.
///
/// Each source fires first one full period after start. The relative phase of
/// the two sources is unspecified.
pub struct Scheduler {
    token: CancellationToken,
    tracker: TaskTracker,
}

impl Scheduler {
    pub fn start<R>(
        publisher: EventPublisher,
        heartbeat_interval: Duration,
        feed_interval: Duration,
        price_walk: PriceWalk<R>,
    ) -> Self
    where
        R: Rng + Send + 'static,
    {
        let scheduler = Self {
            token: CancellationToken::new(),
            tracker: TaskTracker::new(),
        };

        let mut heartbeat = Heartbeat::new();
        scheduler.spawn_ticker("heartbeat", heartbeat_interval, publisher.clone(), move || {
            heartbeat.tick()
        });

        let mut price_walk = price_walk;
        scheduler.spawn_ticker("simulated feed", feed_interval, publisher, move || {
            price_walk.tick()
        });

        scheduler.tracker.close();
        scheduler
    }

    /// Token shared by both tasks; cancelling it stops them.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Cancels both tasks and waits for them to finish.
    pub async fn shutdown(self) {
        self.token.cancel();
        self.tracker.wait().await;
        info!("Background event sources stopped");
    }

    fn spawn_ticker<F>(
        &self,
        name: &'static str,
        period: Duration,
        publisher: EventPublisher,
        mut next: F,
    ) where
        F: FnMut() -> FeedEvent + Send + 'static,
    {
        // tokio rejects a zero period
        let period = period.max(Duration::from_millis(1));
        let token = self.token.clone();

        info!("Starting {name} source every {period:?}");

        self.tracker.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Stopping {name} source");
                        break;
                    }
                    _ = interval.tick() => {
                        let event = next();
                        trace!("{name} produced {event:?}");
                        publisher.publish(event).await;
                    }
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingHandler;
    use crate::PriceWalkConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn start(handler: Arc<RecordingHandler>) -> Scheduler {
        let publisher = EventPublisher::new().with_handler(handler);
        let walk = PriceWalk::with_rng(PriceWalkConfig::default(), StdRng::seed_from_u64(5));
        Scheduler::start(
            publisher,
            Duration::from_secs(5),
            Duration::from_secs(2),
            walk,
        )
    }

    fn heartbeat_counters(events: &[FeedEvent]) -> Vec<u64> {
        events
            .iter()
            .filter_map(|event| match event {
                FeedEvent::Heartbeat { counter } => Some(*counter),
                _ => None,
            })
            .collect()
    }

    fn price_ticks(events: &[FeedEvent]) -> usize {
        events
            .iter()
            .filter(|event| matches!(event, FeedEvent::PriceTick { .. }))
            .count()
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_follow_their_own_cadence() {
        let handler = Arc::new(RecordingHandler::default());
        let scheduler = start(handler.clone());

        time::sleep(Duration::from_millis(10_500)).await;
        scheduler.shutdown().await;

        let events = handler.events();
        assert_eq!(heartbeat_counters(&events), vec![1, 2]);
        assert_eq!(price_ticks(&events), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_first_period() {
        let handler = Arc::new(RecordingHandler::default());
        let scheduler = start(handler.clone());

        time::sleep(Duration::from_millis(1_900)).await;
        scheduler.shutdown().await;

        assert!(handler.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_events_after_shutdown() {
        let handler = Arc::new(RecordingHandler::default());
        let scheduler = start(handler.clone());

        time::sleep(Duration::from_millis(4_500)).await;
        scheduler.shutdown().await;
        let seen = handler.events().len();

        time::sleep(Duration::from_secs(60)).await;
        assert_eq!(handler.events().len(), seen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelling_token_stops_sources() {
        let handler = Arc::new(RecordingHandler::default());
        let scheduler = start(handler.clone());

        scheduler.cancellation_token().cancel();
        time::sleep(Duration::from_secs(30)).await;

        assert!(handler.events().is_empty());
        scheduler.shutdown().await;
    }
}
