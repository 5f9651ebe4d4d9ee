use crate::FeedEvent;

/// Counter behind the fixed-cadence heartbeat source.
#[derive(Debug, Default)]
pub struct Heartbeat {
    counter: u64,
}

impl Heartbeat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of heartbeats emitted so far.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Advances the counter and returns the heartbeat carrying it.
    pub fn tick(&mut self) -> FeedEvent {
        self.counter += 1;
        FeedEvent::Heartbeat {
            counter: self.counter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counts_up_from_one() {
        let mut heartbeat = Heartbeat::new();
        assert_eq!(heartbeat.counter(), 0);

        let counters: Vec<u64> = (0..3)
            .map(|_| match heartbeat.tick() {
                FeedEvent::Heartbeat { counter } => counter,
                other => panic!("unexpected event {other:?}"),
            })
            .collect();

        assert_eq!(counters, vec![1, 2, 3]);
        assert_eq!(heartbeat.counter(), 3);
    }
}
