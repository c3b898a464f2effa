use crate::domain::chart::{ChartState, LinearScale, Viewport};
use crate::domain::market_data::{BookSide, DepthCurve};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price axis tick count
pub const X_TICKS: usize = 10;
/// Volume axis tick count
pub const Y_TICKS: usize = 4;

/// Volume the area paths start from, just under the baseline so the stroke
/// of the closing edge stays hidden.
const BELOW_BASELINE: i64 = -3;

/// Closed step-area outline of one side in pixel space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaPath {
    pub side: BookSide,
    pub vertices: Vec<(f64, f64)>,
}

impl AreaPath {
    /// Start at the far boundary below the baseline, run to mid, rise to
    /// zero volume, then step horizontally and vertically through every
    /// cumulative point. Curves with fewer than two points draw nothing.
    pub fn trace(curve: &DepthCurve, mid: Decimal, viewport: &Viewport) -> Self {
        let mut vertices = Vec::new();
        let last = match curve.points.last() {
            Some(last) if curve.len() >= 2 => last,
            _ => return Self { side: curve.side, vertices },
        };

        let floor = viewport.volume_to_pixel(Decimal::from(BELOW_BASELINE));
        let mid_x = viewport.price_to_pixel(mid);
        let mut y = viewport.volume_to_pixel(Decimal::ZERO);

        vertices.push((viewport.price_to_pixel(last.price), floor));
        vertices.push((mid_x, floor));
        vertices.push((mid_x, y));
        for point in &curve.points {
            let x = viewport.price_to_pixel(point.price);
            vertices.push((x, y));
            y = viewport.volume_to_pixel(point.cumulative_base);
            vertices.push((x, y));
        }
        Self { side: curve.side, vertices }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Axis tick: domain value and its pixel position along the axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub value: f64,
    pub position: f64,
}

fn ticks(scale: &LinearScale, count: usize) -> Vec<AxisTick> {
    scale
        .ticks(count)
        .into_iter()
        .map(|value| AxisTick { value, position: scale.scale(value) })
        .collect()
}

/// Everything a renderer needs to draw one committed chart state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub version: u64,
    pub width: f64,
    pub height: f64,
    /// Top of the price axis footer
    pub axis_offset: f64,
    pub clip_height: f64,
    pub crosshair_line_height: f64,
    pub mid_x: Option<f64>,
    pub bids: AreaPath,
    pub asks: AreaPath,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
}

impl RenderSnapshot {
    pub fn capture(state: &ChartState) -> Self {
        let viewport = &state.viewport;
        let plot_height = viewport.height() - viewport.axis_height();
        let (bids, asks, mid_x) = match (state.is_bound(), state.mid) {
            (true, Some(mid)) => (
                AreaPath::trace(&state.curves.bids, mid, viewport),
                AreaPath::trace(&state.curves.asks, mid, viewport),
                Some(viewport.price_to_pixel(mid)),
            ),
            _ => (
                AreaPath { side: BookSide::Bids, vertices: Vec::new() },
                AreaPath { side: BookSide::Asks, vertices: Vec::new() },
                None,
            ),
        };

        Self {
            version: state.version,
            width: viewport.width(),
            height: viewport.height(),
            axis_offset: plot_height,
            clip_height: (plot_height + 1.0).max(0.0),
            crosshair_line_height: (plot_height - 1.0).max(0.0),
            mid_x,
            bids,
            asks,
            x_ticks: ticks(&viewport.x_scale(), X_TICKS),
            y_ticks: ticks(&viewport.y_scale(), Y_TICKS),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market_data::{CumulativePoint, DepthTotals};
    use rust_decimal_macros::dec;

    #[test]
    fn area_steps_through_every_point() {
        let mut viewport = Viewport::new(200.0, 124.0, 24.0, 0.5).unwrap();
        viewport.set_domain(dec!(90), dec!(110)).unwrap();
        viewport.set_volume_extent(dec!(100), dec!(1));
        let curve = DepthCurve {
            side: BookSide::Asks,
            points: vec![
                CumulativePoint::new(dec!(105), DepthTotals { base: dec!(50), quote: dec!(5250) }),
                CumulativePoint::new(dec!(110), DepthTotals { base: dec!(50), quote: dec!(5250) }),
            ],
        };

        let path = AreaPath::trace(&curve, dec!(100), &viewport);
        assert_eq!(
            path.vertices,
            vec![
                (200.0, 103.0),
                (100.0, 103.0),
                (100.0, 100.0),
                (150.0, 100.0),
                (150.0, 50.0),
                (200.0, 50.0),
                (200.0, 50.0),
            ]
        );
    }

    #[test]
    fn unbound_state_draws_nothing() {
        let viewport = Viewport::new(300.0, 200.0, 24.0, 0.5).unwrap();
        let snapshot = RenderSnapshot::capture(&ChartState::unbound(viewport));

        assert!(snapshot.bids.is_empty() && snapshot.asks.is_empty());
        assert_eq!(snapshot.mid_x, None);
        assert_eq!(snapshot.axis_offset, 176.0);
        assert_eq!(snapshot.crosshair_line_height, 175.0);
    }
}
