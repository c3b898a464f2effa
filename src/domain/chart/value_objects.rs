use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::market_data::{BookSide, DepthTotals};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

pub(crate) fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

pub(crate) fn from_f64(value: f64, what: &'static str) -> DomainResult<Decimal> {
    if !value.is_finite() {
        return Err(DomainError::NonFiniteValue(what));
    }
    Decimal::from_f64(value).ok_or(DomainError::NonFiniteValue(what))
}

/// Value Object - visible price interval `[lo, hi]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceDomain {
    pub lo: Decimal,
    pub hi: Decimal,
}

impl PriceDomain {
    pub const EMPTY: Self = Self { lo: Decimal::ZERO, hi: Decimal::ZERO };

    pub fn new(lo: Decimal, hi: Decimal) -> DomainResult<Self> {
        let domain = Self { lo, hi };
        domain.validate()?;
        Ok(domain)
    }

    /// Tolerance band `[mid - mid*tolerance, mid + mid*tolerance]`
    pub fn around(mid: Decimal, tolerance: Decimal) -> DomainResult<Self> {
        let overflow = DomainError::Overflow("tolerance band");
        let band = mid.checked_mul(tolerance).ok_or(overflow.clone())?;
        let lo = mid.checked_sub(band).ok_or(overflow.clone())?;
        let hi = mid.checked_add(band).ok_or(overflow)?;
        Self::new(lo, hi)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.lo > self.hi {
            return Err(DomainError::InvalidDomain { lo: self.lo, hi: self.hi });
        }
        Ok(())
    }

    pub fn width(&self) -> Decimal {
        self.hi - self.lo
    }

    pub fn center(&self) -> Decimal {
        self.lo + self.width() / Decimal::TWO
    }

    pub fn contains(&self, price: Decimal) -> bool {
        self.lo <= price && price <= self.hi
    }

    /// Interval of the same center with its width divided by `scale`.
    /// Past the decimal range the interval collapses onto its center.
    pub fn zoomed(&self, scale: f64) -> DomainResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DomainError::InvalidZoomFactor(scale));
        }
        if scale == 1.0 {
            return Ok(*self);
        }
        let center = self.center();
        let half = match Decimal::from_f64(scale) {
            Some(scale) if !scale.is_zero() => self
                .width()
                .checked_div(scale)
                .and_then(|width| width.checked_div(Decimal::TWO))
                .ok_or(DomainError::Overflow("zoomed domain width"))?,
            _ if scale > 1.0 => Decimal::ZERO,
            _ => return Err(DomainError::InvalidZoomFactor(scale)),
        };
        let lo = center.checked_sub(half).ok_or(DomainError::Overflow("zoomed domain"))?;
        let hi = center.checked_add(half).ok_or(DomainError::Overflow("zoomed domain"))?;
        Self::new(lo, hi)
    }

    pub fn as_f64(&self) -> (f64, f64) {
        (to_f64(self.lo), to_f64(self.hi))
    }
}

/// Continuous linear mapping from a domain interval onto a range interval.
/// A zero-width domain maps every input to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn scale(&self, value: f64) -> f64 {
        interpolate(self.range, normalize(self.domain, value))
    }

    pub fn invert(&self, value: f64) -> f64 {
        interpolate(self.domain, normalize(self.range, value))
    }

    /// Human-friendly tick values (1, 2 or 5 times a power of ten) covering
    /// the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut start, mut stop) = self.domain;
        if count == 0 || !start.is_finite() || !stop.is_finite() {
            return Vec::new();
        }
        if start == stop {
            return vec![start];
        }
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut ticks: Vec<f64> = match tick_step(start, stop, count) {
            TickStep::Multiply(step) if step > 0.0 && step.is_finite() => {
                let (first, last) = ((start / step).ceil() as i64, (stop / step).floor() as i64);
                (first..=last).map(|i| i as f64 * step).collect()
            }
            TickStep::Divide(inverse) if inverse > 0.0 && inverse.is_finite() => {
                let (first, last) =
                    ((start * inverse).ceil() as i64, (stop * inverse).floor() as i64);
                (first..=last).map(|i| i as f64 / inverse).collect()
            }
            _ => return Vec::new(),
        };
        if reverse {
            ticks.reverse();
        }
        ticks
    }
}

fn normalize((a, b): (f64, f64), value: f64) -> f64 {
    let span = b - a;
    if span == 0.0 || !span.is_finite() { 0.5 } else { (value - a) / span }
}

fn interpolate((a, b): (f64, f64), t: f64) -> f64 {
    a + (b - a) * t
}

/// Sub-unit steps are kept as their inverse so ticks like 0.6 come out exact.
enum TickStep {
    Multiply(f64),
    Divide(f64),
}

fn tick_step(start: f64, stop: f64, count: usize) -> TickStep {
    let raw = (stop - start) / count.max(1) as f64;
    let power = raw.log10().floor();
    let error = raw / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        TickStep::Multiply(factor * 10f64.powf(power))
    } else {
        TickStep::Divide(10f64.powf(-power) / factor)
    }
}

/// Value Object - zoom transform `pixel' = k * pixel + x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomTransform {
    pub k: f64,
    pub x: f64,
}

impl ZoomTransform {
    pub const IDENTITY: Self = Self { k: 1.0, x: 0.0 };

    /// Transform of scale `k` keeping the middle of a `width` wide range fixed
    pub fn centered(k: f64, width: f64) -> Self {
        Self { k, x: (width - width * k) / 2.0 }
    }

    pub fn apply_x(&self, pixel: f64) -> f64 {
        pixel * self.k + self.x
    }

    pub fn invert_x(&self, pixel: f64) -> f64 {
        (pixel - self.x) / self.k
    }
}

impl Default for ZoomTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Cursor readout for the pointer position and its mirror `width - x`.
///
/// Every field is `None` when no market is bound, which is distinct from a
/// bound market with an empty book (zero volumes, real prices).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairReading {
    pub cursor_x: f64,
    pub shadow_x: f64,
    /// Side under the cursor: bids on the left half, asks on the right
    pub main_side: BookSide,
    pub main_price: Option<f64>,
    pub shadow_price: Option<f64>,
    pub main_volume: Option<DepthTotals>,
    pub shadow_volume: Option<DepthTotals>,
}

impl CrosshairReading {
    pub fn unavailable(cursor_x: f64, width: f64) -> Self {
        Self {
            cursor_x,
            shadow_x: width - cursor_x,
            main_side: side_at(cursor_x, width),
            main_price: None,
            shadow_price: None,
            main_volume: None,
            shadow_volume: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.main_price.is_some()
    }

    pub fn shadow_side(&self) -> BookSide {
        self.main_side.opposite()
    }

    pub fn price_for(&self, side: BookSide) -> Option<f64> {
        if side == self.main_side { self.main_price } else { self.shadow_price }
    }

    pub fn totals_for(&self, side: BookSide) -> Option<DepthTotals> {
        if side == self.main_side { self.main_volume } else { self.shadow_volume }
    }
}

/// Bids own the left half of the chart, asks the right half
pub fn side_at(cursor_x: f64, width: f64) -> BookSide {
    if cursor_x < width / 2.0 { BookSide::Bids } else { BookSide::Asks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tolerance_band_surrounds_mid() {
        let domain = PriceDomain::around(dec!(100.5), dec!(0.01)).unwrap();
        assert_eq!(domain.lo, dec!(99.495));
        assert_eq!(domain.hi, dec!(101.505));
        assert_eq!(domain.center(), dec!(100.5));
    }

    #[test]
    fn inverted_domain_is_rejected() {
        assert_eq!(
            PriceDomain::new(dec!(2), dec!(1)),
            Err(DomainError::InvalidDomain { lo: dec!(2), hi: dec!(1) })
        );
        // A negative mid flips the band.
        assert!(PriceDomain::around(dec!(-10), dec!(0.01)).is_err());
    }

    #[test]
    fn zoomed_domain_keeps_center() {
        let domain = PriceDomain::new(dec!(90), dec!(110)).unwrap();
        let zoomed = domain.zoomed(4.0).unwrap();
        assert_eq!(zoomed.lo, dec!(97.5));
        assert_eq!(zoomed.hi, dec!(102.5));
    }

    #[test]
    fn zoom_past_decimal_range_collapses_onto_center() {
        let domain = PriceDomain::new(dec!(90), dec!(110)).unwrap();
        let collapsed = domain.zoomed(1e300).unwrap();
        assert_eq!((collapsed.lo, collapsed.hi), (dec!(100), dec!(100)));

        let narrow = domain.zoomed(2f64.powi(100)).unwrap();
        assert!(narrow.lo <= dec!(100) && dec!(100) <= narrow.hi);
        assert_eq!(domain.zoomed(0.0), Err(DomainError::InvalidZoomFactor(0.0)));
    }

    #[test]
    fn degenerate_scale_maps_to_midpoint() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 200.0));
        assert_eq!(scale.scale(42.0), 100.0);
        assert_eq!(scale.invert(17.0), 5.0);
    }

    #[test]
    fn ticks_use_round_steps() {
        let scale = LinearScale::new((0.0, 1.0), (0.0, 100.0));
        assert_eq!(scale.ticks(5), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);

        let reversed = LinearScale::new((100.0, 0.0), (0.0, 100.0));
        assert_eq!(reversed.ticks(4), vec![100.0, 80.0, 60.0, 40.0, 20.0, 0.0]);
    }

    #[test]
    fn centered_transform_fixes_middle_pixel() {
        let transform = ZoomTransform::centered(3.0, 800.0);
        assert_eq!(transform.apply_x(400.0), 400.0);
        assert_eq!(transform.invert_x(transform.apply_x(123.0)), 123.0);
    }
}
