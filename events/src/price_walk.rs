use crate::FeedEvent;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters of the simulated price feed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceWalkConfig {
    pub symbol: String,
    pub initial_price: f64,
    /// Lower bound the price is clamped to after every step.
    pub floor: f64,
    /// Width of the uniform step distribution, centred on zero.
    pub max_step: f64,
}

impl Default for PriceWalkConfig {
    fn default() -> Self {
        Self {
            symbol: "DEMO".to_string(),
            initial_price: 100.0,
            floor: 50.0,
            max_step: 10.0,
        }
    }
}

/// Bounded random walk over a single price, quoted in cents.
///
/// Every tick draws `delta ~ U(-max_step/2, max_step/2)` and moves to
/// `max(floor, price + delta)`. The reported change is the move that was
/// actually applied, so clamping at the floor shows up as a smaller change.
pub struct PriceWalk<R = StdRng> {
    config: PriceWalkConfig,
    price: f64,
    rng: R,
}

impl PriceWalk<StdRng> {
    pub fn new(config: PriceWalkConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> PriceWalk<R> {
    pub fn with_rng(config: PriceWalkConfig, rng: R) -> Self {
        let price = round_cents(config.initial_price).max(config.floor);
        Self { config, price, rng }
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Takes one step and returns the resulting price tick.
    pub fn tick(&mut self) -> FeedEvent {
        let half_step = self.config.max_step / 2.0;
        let delta = if half_step > 0.0 {
            self.rng.gen_range(-half_step..half_step)
        } else {
            0.0
        };

        let next =
            round_cents((self.price + delta).max(self.config.floor)).max(self.config.floor);
        let change = round_cents(next - self.price);
        self.price = next;

        FeedEvent::PriceTick {
            symbol: self.config.symbol.clone(),
            price: next,
            change,
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
