use super::value_objects::PriceLevel;
use crate::domain::subscription::Subscription;
use rust_decimal::Decimal;

/// Read-only, ordered access to both sides of an order book.
///
/// `bids()` yields from the best (highest) price downward and `asks()` from
/// the best (lowest) price upward. Levels are already merged per price.
/// Implementations must not mutate while an iterator is alive, so one
/// traversal always sees a consistent snapshot.
pub trait PriceLevelSource {
    fn bids(&self) -> Box<dyn Iterator<Item = PriceLevel> + '_>;
    fn asks(&self) -> Box<dyn Iterator<Item = PriceLevel> + '_>;

    fn best_bid(&self) -> Option<Decimal> {
        self.bids().next().map(|level| level.price)
    }

    fn best_ask(&self) -> Option<Decimal> {
        self.asks().next().map(|level| level.price)
    }

    /// `best_ask - best_bid`, when both sides are present
    fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }
}

/// Live order book stream for one market
pub trait OrderBookFeed {
    /// Register a callback fired on every top-of-book or level change. The
    /// callback stays registered until the returned handle is disposed.
    fn subscribe(&self, on_update: Box<dyn Fn()>) -> Subscription;

    /// Run `read` against a consistent snapshot of the current levels
    fn read_levels(&self, read: &mut dyn FnMut(&dyn PriceLevelSource));
}
