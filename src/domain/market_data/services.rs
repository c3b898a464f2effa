use super::repositories::PriceLevelSource;
use super::value_objects::{BookSide, CumulativePoint, DepthCurve, DepthCurves, DepthTotals, PriceLevel};
use crate::domain::chart::PriceDomain;
use crate::domain::errors::DomainResult;
use rust_decimal::Decimal;

/// Domain service turning an ordered book into cumulative depth curves
#[derive(Debug, Default, Clone, Copy)]
pub struct DepthAggregator;

impl DepthAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Build both curves clipped to `domain`.
    ///
    /// Bids are walked from the best price down while `price >= lo`, asks
    /// from the best price up while `price <= hi`. Each curve ends with a
    /// boundary point at its domain edge carrying the last totals. A side
    /// with no level inside the domain yields `[(mid, 0), (edge, 0)]`.
    /// Totals past the decimal range fail with `DomainError::Overflow`.
    pub fn build_curves(
        &self,
        source: &dyn PriceLevelSource,
        mid: Decimal,
        domain: PriceDomain,
    ) -> DomainResult<DepthCurves> {
        domain.validate()?;

        let bids = accumulate_side(
            BookSide::Bids,
            source.bids(),
            |price| price >= domain.lo,
            mid,
            domain.lo,
        )?;
        let asks = accumulate_side(
            BookSide::Asks,
            source.asks(),
            |price| price <= domain.hi,
            mid,
            domain.hi,
        )?;

        Ok(DepthCurves { bids, asks })
    }

    /// `best_bid + spread / 2`. Falls back to the best price of whichever
    /// side exists, `None` for an empty book.
    pub fn mid_price(&self, source: &dyn PriceLevelSource) -> Option<Decimal> {
        match (source.best_bid(), source.best_ask()) {
            (Some(bid), Some(ask)) => ask
                .checked_sub(bid)
                .and_then(|spread| bid.checked_add(spread / Decimal::TWO))
                .or(Some(bid)),
            (Some(bid), None) => Some(bid),
            (None, Some(ask)) => Some(ask),
            (None, None) => None,
        }
    }
}

fn accumulate_side<'a>(
    side: BookSide,
    levels: Box<dyn Iterator<Item = PriceLevel> + 'a>,
    inside: impl Fn(Decimal) -> bool,
    mid: Decimal,
    edge: Decimal,
) -> DomainResult<DepthCurve> {
    let mut totals = DepthTotals::ZERO;
    let mut points = Vec::new();
    for level in levels.take_while(|level| inside(level.price)) {
        totals = totals.accumulate(&level)?;
        points.push(CumulativePoint::new(level.price, totals));
    }

    if points.is_empty() {
        points.push(CumulativePoint::new(mid, DepthTotals::ZERO));
    }
    points.push(CumulativePoint::new(edge, totals));

    Ok(DepthCurve { side, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::domain::market_data::{BookUpdate, OrderBook, Symbol};
    use rust_decimal_macros::dec;

    fn scenario_book() -> OrderBook {
        let mut book = OrderBook::new(Symbol::from("TEST:BTC-USD"));
        book.replace_snapshot(BookUpdate::new(
            vec![PriceLevel::new(dec!(100), dec!(2)), PriceLevel::new(dec!(99), dec!(3))],
            vec![PriceLevel::new(dec!(101), dec!(1)), PriceLevel::new(dec!(102), dec!(4))],
        ))
        .unwrap();
        book
    }

    #[test]
    fn mid_price_uses_half_spread() {
        let aggregator = DepthAggregator::new();
        assert_eq!(aggregator.mid_price(&scenario_book()), Some(dec!(100.5)));
    }

    #[test]
    fn one_sided_book_uses_existing_side() {
        let mut book = OrderBook::new(Symbol::from("TEST:BTC-USD"));
        book.replace_snapshot(BookUpdate::new(vec![], vec![PriceLevel::new(dec!(7), dec!(1))]))
            .unwrap();
        assert_eq!(DepthAggregator::new().mid_price(&book), Some(dec!(7)));

        book.clear();
        assert_eq!(DepthAggregator::new().mid_price(&book), None);
    }

    #[test]
    fn curves_stop_at_domain_edges() {
        let domain = PriceDomain::around(dec!(100.5), dec!(0.01)).unwrap();
        let curves = DepthAggregator::new()
            .build_curves(&scenario_book(), dec!(100.5), domain)
            .unwrap();

        let bids: Vec<_> = curves.bids.points.iter().map(|p| (p.price, p.cumulative_base)).collect();
        let asks: Vec<_> = curves.asks.points.iter().map(|p| (p.price, p.cumulative_base)).collect();
        assert_eq!(bids, vec![(dec!(100), dec!(2)), (dec!(99.495), dec!(2))]);
        assert_eq!(asks, vec![(dec!(101), dec!(1)), (dec!(101.505), dec!(1))]);
        assert_eq!(curves.bids.total().quote, dec!(200));
        assert_eq!(curves.asks.total().quote, dec!(101));
    }

    #[test]
    fn level_on_the_edge_is_included() {
        let domain = PriceDomain::new(dec!(99), dec!(102)).unwrap();
        let curves = DepthAggregator::new()
            .build_curves(&scenario_book(), dec!(100.5), domain)
            .unwrap();

        assert_eq!(curves.bids.len(), 3);
        assert_eq!(curves.bids.total().base, dec!(5));
        assert_eq!(curves.bids.total().quote, dec!(497));
        assert_eq!(curves.asks.total().base, dec!(5));
    }

    #[test]
    fn empty_side_spans_mid_to_edge() {
        let book = OrderBook::new(Symbol::from("TEST:BTC-USD"));
        let domain = PriceDomain::new(dec!(90), dec!(110)).unwrap();
        let curves = DepthAggregator::new().build_curves(&book, dec!(100), domain).unwrap();

        assert_eq!(
            curves.bids.points,
            vec![
                CumulativePoint::new(dec!(100), DepthTotals::ZERO),
                CumulativePoint::new(dec!(90), DepthTotals::ZERO),
            ]
        );
        assert_eq!(curves.asks.points.last().map(|p| p.price), Some(dec!(110)));
        assert_eq!(curves.max_cumulative_base(), Decimal::ZERO);
    }

    #[test]
    fn notional_past_decimal_range_is_an_error() {
        let mut book = OrderBook::new(Symbol::from("TEST:BTC-USD"));
        let price = Decimal::new(1_000_000_000_000_000, 0);
        book.replace_snapshot(BookUpdate::new(
            vec![PriceLevel::new(price, dec!(100000000000000))],
            vec![],
        ))
        .unwrap();
        let domain = PriceDomain::around(price, dec!(0.01)).unwrap();

        assert_eq!(
            DepthAggregator::new().build_curves(&book, price, domain),
            Err(DomainError::Overflow("cumulative quote"))
        );
    }
}
