use super::entities::ChartState;
use super::value_objects::{CrosshairReading, from_f64, side_at};
use crate::domain::market_data::{DepthCurve, DepthTotals};

/// Domain service resolving a cursor position into price and volume readouts
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosshairResolver;

impl CrosshairResolver {
    pub fn new() -> Self {
        Self
    }

    /// Readout at `cursor_x` and its mirror `width - cursor_x`.
    ///
    /// Without a bound market, or before its first commit, every field is
    /// unavailable. A bound market with an empty book still reports prices,
    /// with zero volume.
    pub fn resolve(&self, state: &ChartState, cursor_x: f64) -> CrosshairReading {
        let viewport = &state.viewport;
        let width = viewport.width();
        if !state.is_bound() || state.mid.is_none() {
            return CrosshairReading::unavailable(cursor_x, width);
        }

        let shadow_x = width - cursor_x;
        let main_side = side_at(cursor_x, width);
        let main_price = viewport.pixel_to_price(cursor_x);
        let shadow_price = viewport.pixel_to_price(shadow_x);

        CrosshairReading {
            cursor_x,
            shadow_x,
            main_side,
            main_price: Some(main_price),
            shadow_price: Some(shadow_price),
            main_volume: volume_at(state.curves.side(main_side), main_price),
            shadow_volume: volume_at(state.curves.side(main_side.opposite()), shadow_price),
        }
    }
}

fn volume_at(curve: &DepthCurve, price: f64) -> Option<DepthTotals> {
    from_f64(price, "crosshair price").ok().map(|target| curve.held_at(target))
}
