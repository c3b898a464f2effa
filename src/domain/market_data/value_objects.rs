use crate::domain::errors::{DomainError, DomainResult};
use derive_more::{Deref, Display};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};

/// Value Object - market identifier such as `GDAX:BTC-USD`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deref, Display, Serialize, Deserialize)]
#[display(fmt = "{}", _0)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: String) -> Result<Self, String> {
        if symbol.trim().is_empty() {
            return Err("Symbol cannot be empty".to_string());
        }
        Ok(Self(symbol.to_uppercase()))
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Self(value.to_uppercase())
    }
}

/// Value Object - order book side
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay, EnumIter, EnumString, AsRefStr,
    Serialize, Deserialize,
)]
pub enum BookSide {
    #[strum(serialize = "bids")]
    #[serde(rename = "bids")]
    Bids,
    #[strum(serialize = "asks")]
    #[serde(rename = "asks")]
    Asks,
}

impl BookSide {
    pub fn opposite(self) -> Self {
        match self {
            Self::Bids => Self::Asks,
            Self::Asks => Self::Bids,
        }
    }
}

/// Value Object - one aggregated resting level. The side is implied by the
/// iterator that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: Decimal,
    pub size: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal, size: Decimal) -> Self {
        Self { price, size }
    }

    /// `price * size`, `None` past the decimal range
    pub fn notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.size)
    }
}

/// Value Object - display metadata of a market. Used only for formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDescriptor {
    pub symbol: Symbol,
    pub base: String,
    pub quote: String,
    pub price_precision: u32,
    pub amount_precision: u32,
}

impl MarketDescriptor {
    pub fn new(symbol: Symbol, base: &str, quote: &str) -> Self {
        Self {
            symbol,
            base: base.to_string(),
            quote: quote.to_string(),
            price_precision: 2,
            amount_precision: 4,
        }
    }

    pub fn with_precision(mut self, price_precision: u32, amount_precision: u32) -> Self {
        self.price_precision = price_precision;
        self.amount_precision = amount_precision;
        self
    }

    pub fn identifier(&self) -> &str {
        self.symbol.value()
    }
}

/// Running totals from the best price outward
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthTotals {
    pub base: Decimal,
    pub quote: Decimal,
}

impl DepthTotals {
    pub const ZERO: Self = Self { base: Decimal::ZERO, quote: Decimal::ZERO };

    pub fn accumulate(self, level: &PriceLevel) -> DomainResult<Self> {
        let base = self.base.checked_add(level.size).ok_or(DomainError::Overflow("cumulative base"))?;
        let quote = level
            .notional()
            .and_then(|notional| self.quote.checked_add(notional))
            .ok_or(DomainError::Overflow("cumulative quote"))?;
        Ok(Self { base, quote })
    }
}

/// Value Object - one step of a cumulative depth curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    pub price: Decimal,
    pub cumulative_base: Decimal,
    pub cumulative_quote: Decimal,
}

impl CumulativePoint {
    pub fn new(price: Decimal, totals: DepthTotals) -> Self {
        Self { price, cumulative_base: totals.base, cumulative_quote: totals.quote }
    }

    pub fn totals(&self) -> DepthTotals {
        DepthTotals { base: self.cumulative_base, quote: self.cumulative_quote }
    }
}

/// Cumulative points for one side, ordered from the best price outward and
/// terminated by a boundary point at the visible domain edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthCurve {
    pub side: BookSide,
    pub points: Vec<CumulativePoint>,
}

impl DepthCurve {
    pub fn empty(side: BookSide) -> Self {
        Self { side, points: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Totals carried by the boundary point
    pub fn total(&self) -> DepthTotals {
        self.points.last().map(CumulativePoint::totals).unwrap_or(DepthTotals::ZERO)
    }

    /// Totals of the last point that has not crossed `target`, scanning from
    /// the best price. Bids hold while `price >= target`, asks while
    /// `price <= target`. Zero when the first point already crosses.
    pub fn held_at(&self, target: Decimal) -> DepthTotals {
        let held = match self.side {
            BookSide::Bids => self.points.partition_point(|point| point.price >= target),
            BookSide::Asks => self.points.partition_point(|point| point.price <= target),
        };
        match held {
            0 => DepthTotals::ZERO,
            n => self.points[n - 1].totals(),
        }
    }
}

/// Both sides of the book as cumulative curves
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthCurves {
    pub bids: DepthCurve,
    pub asks: DepthCurve,
}

impl DepthCurves {
    pub fn empty() -> Self {
        Self { bids: DepthCurve::empty(BookSide::Bids), asks: DepthCurve::empty(BookSide::Asks) }
    }

    pub fn side(&self, side: BookSide) -> &DepthCurve {
        match side {
            BookSide::Bids => &self.bids,
            BookSide::Asks => &self.asks,
        }
    }

    /// Largest cumulative base volume across both sides
    pub fn max_cumulative_base(&self) -> Decimal {
        self.bids.total().base.max(self.asks.total().base)
    }
}

impl Default for DepthCurves {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn symbol_is_normalized() {
        assert_eq!(Symbol::from("gdax:btc-usd").value(), "GDAX:BTC-USD");
        assert!(Symbol::new("  ".to_string()).is_err());
    }

    #[test]
    fn side_round_trips_through_strum() {
        assert_eq!(BookSide::from_str("bids").ok(), Some(BookSide::Bids));
        assert_eq!(BookSide::Asks.as_ref(), "asks");
        assert_eq!(BookSide::Asks.opposite(), BookSide::Bids);
    }
}
