use super::value_objects::{LinearScale, PriceDomain, ZoomTransform, to_f64};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::market_data::{DepthCurves, MarketDescriptor};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Domain entity - price/volume to pixel mapping with a center-anchored zoom.
///
/// The basis domain is the un-zoomed tolerance band around mid. The
/// effective domain is the basis narrowed (or widened) by the zoom scale
/// around its own center and is what aggregation clips against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    basis: PriceDomain,
    domain: PriceDomain,
    zoom: ZoomTransform,
    width: f64,
    height: f64,
    axis_height: f64,
    scale_extent: f64,
    volume_top: Decimal,
}

impl Viewport {
    pub fn new(width: f64, height: f64, axis_height: f64, scale_extent: f64) -> DomainResult<Self> {
        validate_dimensions(width, height)?;
        if !scale_extent.is_finite() || scale_extent <= 0.0 {
            return Err(DomainError::InvalidZoomFactor(scale_extent));
        }
        Ok(Self {
            basis: PriceDomain::EMPTY,
            domain: PriceDomain::EMPTY,
            zoom: ZoomTransform::IDENTITY,
            width,
            height,
            axis_height: axis_height.max(0.0),
            scale_extent,
            volume_top: Decimal::ZERO,
        })
    }

    /// Set the un-zoomed basis and re-derive the effective domain under the
    /// current scale.
    pub fn set_domain(&mut self, lo: Decimal, hi: Decimal) -> DomainResult<PriceDomain> {
        let basis = PriceDomain::new(lo, hi)?;
        let domain = basis.zoomed(self.zoom.k)?;
        self.basis = basis;
        self.domain = domain;
        Ok(domain)
    }

    /// Forget the price domain, keeping zoom and dimensions
    pub fn clear_domain(&mut self) {
        self.basis = PriceDomain::EMPTY;
        self.domain = PriceDomain::EMPTY;
        self.volume_top = Decimal::ZERO;
    }

    /// Multiply the zoom scale by `factor`, clamped to the scale extent
    pub fn apply_zoom(&mut self, factor: f64) -> DomainResult<PriceDomain> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(DomainError::InvalidZoomFactor(factor));
        }
        self.zoom_to(self.zoom.k * factor)
    }

    /// Set an absolute zoom scale, clamped to the scale extent
    pub fn zoom_to(&mut self, scale: f64) -> DomainResult<PriceDomain> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DomainError::InvalidZoomFactor(scale));
        }
        let k = scale.max(self.scale_extent);
        let domain = self.basis.zoomed(k)?;
        self.zoom = ZoomTransform::centered(k, self.width);
        self.domain = domain;
        Ok(domain)
    }

    pub fn reset_zoom(&mut self) -> PriceDomain {
        self.zoom = ZoomTransform::IDENTITY;
        self.domain = self.basis;
        self.domain
    }

    /// Update the pixel ranges. The zoom scale is kept and its translation
    /// re-centered for the new width.
    pub fn resize(&mut self, width: f64, height: f64) -> DomainResult<()> {
        validate_dimensions(width, height)?;
        self.width = width;
        self.height = height;
        self.zoom = ZoomTransform::centered(self.zoom.k, width);
        Ok(())
    }

    /// Scale the y axis to `max * headroom` over zero, saturating at the
    /// decimal range
    pub fn set_volume_extent(&mut self, max: Decimal, headroom: Decimal) {
        self.volume_top = max.checked_mul(headroom).unwrap_or(Decimal::MAX);
    }

    pub fn basis(&self) -> PriceDomain {
        self.basis
    }

    /// Effective (zoomed) price domain
    pub fn domain(&self) -> PriceDomain {
        self.domain
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    pub fn scale(&self) -> f64 {
        self.zoom.k
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn axis_height(&self) -> f64 {
        self.axis_height
    }

    pub fn scale_extent(&self) -> f64 {
        self.scale_extent
    }

    pub fn volume_top(&self) -> Decimal {
        self.volume_top
    }

    /// Drawable height above the axis footer
    pub fn plot_height(&self) -> f64 {
        (self.height - self.axis_height).max(0.0)
    }

    /// Un-zoomed price scale over `[0, width]`
    pub fn basis_scale(&self) -> LinearScale {
        LinearScale::new(self.basis.as_f64(), (0.0, self.width))
    }

    /// Zoomed price scale over `[0, width]`, used for axis ticks
    pub fn x_scale(&self) -> LinearScale {
        LinearScale::new(self.domain.as_f64(), (0.0, self.width))
    }

    /// Volume scale: `[top, 0]` onto `[0, plot_height]`
    pub fn y_scale(&self) -> LinearScale {
        LinearScale::new((to_f64(self.volume_top), 0.0), (0.0, self.plot_height()))
    }

    pub fn price_to_pixel(&self, price: Decimal) -> f64 {
        self.zoom.apply_x(self.basis_scale().scale(to_f64(price)))
    }

    pub fn pixel_to_price(&self, pixel: f64) -> f64 {
        self.basis_scale().invert(self.zoom.invert_x(pixel))
    }

    pub fn volume_to_pixel(&self, volume: Decimal) -> f64 {
        self.y_scale().scale(to_f64(volume))
    }
}

fn validate_dimensions(width: f64, height: f64) -> DomainResult<()> {
    if !width.is_finite() || !height.is_finite() || width < 0.0 || height < 0.0 {
        return Err(DomainError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Domain entity - everything one chart displays, replaced wholesale on each
/// committed recompute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    /// Bumped on every commit
    pub version: u64,
    /// Bumped on every market change; recomputes from an older epoch are stale
    pub epoch: u64,
    pub market: Option<MarketDescriptor>,
    pub mid: Option<Decimal>,
    pub curves: DepthCurves,
    pub viewport: Viewport,
}

impl ChartState {
    pub fn unbound(viewport: Viewport) -> Self {
        Self {
            version: 0,
            epoch: 0,
            market: None,
            mid: None,
            curves: DepthCurves::empty(),
            viewport,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.market.is_some()
    }
}
