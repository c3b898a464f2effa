use super::value_objects::{PriceLevel, Symbol};
use super::repositories::PriceLevelSource;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::logging::LogComponent;
use crate::log_warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Incremental book change. A level with zero size removes that price.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookUpdate {
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
}

impl BookUpdate {
    pub fn new(bids: Vec<PriceLevel>, asks: Vec<PriceLevel>) -> Self {
        Self { bids, asks }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

/// Domain entity - aggregated order book for a single market
#[derive(Debug, Clone)]
pub struct OrderBook {
    pub symbol: Symbol,
    bids: BTreeMap<Decimal, Decimal>,
    asks: BTreeMap<Decimal, Decimal>,
    sequence: u64,
}

impl OrderBook {
    pub fn new(symbol: Symbol) -> Self {
        Self { symbol, bids: BTreeMap::new(), asks: BTreeMap::new(), sequence: 0 }
    }

    /// Replace both sides with a full snapshot
    pub fn replace_snapshot(&mut self, snapshot: BookUpdate) -> DomainResult<()> {
        validate_levels(&snapshot.bids)?;
        validate_levels(&snapshot.asks)?;

        self.bids = collect_side(&snapshot.bids);
        self.asks = collect_side(&snapshot.asks);
        self.after_change();
        Ok(())
    }

    /// Apply an incremental update. The update is rejected as a whole if any
    /// level is invalid.
    pub fn apply_update(&mut self, update: BookUpdate) -> DomainResult<()> {
        validate_levels(&update.bids)?;
        validate_levels(&update.asks)?;

        for level in &update.bids {
            upsert(&mut self.bids, level);
        }
        for level in &update.asks {
            upsert(&mut self.asks, level);
        }
        self.after_change();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.bids.clear();
        self.asks.clear();
        self.sequence += 1;
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    pub fn bid_depth(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_depth(&self) -> usize {
        self.asks.len()
    }

    /// Number of applied changes
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    fn after_change(&mut self) {
        self.sequence += 1;
        if let Err(err) = self.check_crossed() {
            // Can happen transiently during rapid updates.
            log_warn!(LogComponent::Domain("OrderBook"), "{} on {}", err, self.symbol);
        }
    }

    fn check_crossed(&self) -> DomainResult<()> {
        if let (Some(bid), Some(ask)) = (self.best_bid(), self.best_ask()) {
            if bid >= ask {
                return Err(DomainError::CrossedBook { bid, ask });
            }
        }
        Ok(())
    }
}

impl PriceLevelSource for OrderBook {
    fn bids(&self) -> Box<dyn Iterator<Item = PriceLevel> + '_> {
        Box::new(self.bids.iter().rev().map(|(price, size)| PriceLevel::new(*price, *size)))
    }

    fn asks(&self) -> Box<dyn Iterator<Item = PriceLevel> + '_> {
        Box::new(self.asks.iter().map(|(price, size)| PriceLevel::new(*price, *size)))
    }

    fn best_bid(&self) -> Option<Decimal> {
        self.bids.keys().next_back().copied()
    }

    fn best_ask(&self) -> Option<Decimal> {
        self.asks.keys().next().copied()
    }
}

fn validate_levels(levels: &[PriceLevel]) -> DomainResult<()> {
    match levels
        .iter()
        .find(|level| level.price <= Decimal::ZERO || level.size.is_sign_negative())
    {
        Some(level) => Err(DomainError::InvalidLevel { price: level.price, size: level.size }),
        None => Ok(()),
    }
}

fn collect_side(levels: &[PriceLevel]) -> BTreeMap<Decimal, Decimal> {
    let mut side = BTreeMap::new();
    for level in levels {
        upsert(&mut side, level);
    }
    side
}

fn upsert(side: &mut BTreeMap<Decimal, Decimal>, level: &PriceLevel) {
    if level.size.is_zero() {
        side.remove(&level.price);
    } else {
        side.insert(level.price, level.size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn book() -> OrderBook {
        let mut book = OrderBook::new(Symbol::from("TEST:BTC-USD"));
        book.replace_snapshot(BookUpdate::new(
            vec![PriceLevel::new(dec!(99), dec!(3)), PriceLevel::new(dec!(100), dec!(2))],
            vec![PriceLevel::new(dec!(102), dec!(4)), PriceLevel::new(dec!(101), dec!(1))],
        ))
        .unwrap();
        book
    }

    #[test]
    fn sides_iterate_from_best_price_outward() {
        let book = book();
        let bids: Vec<_> = book.bids().map(|l| l.price).collect();
        let asks: Vec<_> = book.asks().map(|l| l.price).collect();
        assert_eq!(bids, vec![dec!(100), dec!(99)]);
        assert_eq!(asks, vec![dec!(101), dec!(102)]);
        assert_eq!(book.spread(), Some(dec!(1)));
    }

    #[test]
    fn zero_size_removes_level() {
        let mut book = book();
        book.apply_update(BookUpdate::new(vec![PriceLevel::new(dec!(100), dec!(0))], vec![]))
            .unwrap();
        assert_eq!(book.best_bid(), Some(dec!(99)));
        assert_eq!(book.bid_depth(), 1);
    }

    #[test]
    fn invalid_update_is_rejected_whole() {
        let mut book = book();
        let result = book.apply_update(BookUpdate::new(
            vec![PriceLevel::new(dec!(98), dec!(1))],
            vec![PriceLevel::new(dec!(103), dec!(-1))],
        ));
        assert_eq!(
            result,
            Err(DomainError::InvalidLevel { price: dec!(103), size: dec!(-1) })
        );
        assert_eq!(book.bid_depth(), 2);
    }
}
