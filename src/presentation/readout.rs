use crate::domain::chart::{ChartState, CrosshairReading};
use crate::domain::market_data::{BookSide, DepthTotals, MarketDescriptor};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

pub const UNAVAILABLE: &str = "N/A";

fn fixed(value: Decimal, precision: u32) -> String {
    format!("{:.*}", precision as usize, value.round_dp(precision))
}

fn amount(value: Decimal, precision: u32, asset: &str) -> String {
    format!("{} {}", fixed(value, precision), asset)
}

/// Header texts: what the cursor position would sell into the bids and buy
/// from the asks, plus the mid market price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderReadout {
    pub bid_base: String,
    pub bid_quote: String,
    pub ask_base: String,
    pub ask_quote: String,
    pub mid: String,
}

impl HeaderReadout {
    pub fn unavailable() -> Self {
        Self {
            bid_base: UNAVAILABLE.to_string(),
            bid_quote: UNAVAILABLE.to_string(),
            ask_base: UNAVAILABLE.to_string(),
            ask_quote: UNAVAILABLE.to_string(),
            mid: UNAVAILABLE.to_string(),
        }
    }

    /// Format `reading` for the market bound in `state`. Without a reading
    /// (cursor outside the chart) the volumes show as zero.
    pub fn format(state: &ChartState, reading: Option<&CrosshairReading>) -> Self {
        let Some(market) = &state.market else {
            return Self::unavailable();
        };
        if reading.is_some_and(|reading| !reading.is_available()) {
            return Self::unavailable();
        }

        let totals = |side| {
            reading.and_then(|reading| reading.totals_for(side)).unwrap_or(DepthTotals::ZERO)
        };
        let bids = totals(BookSide::Bids);
        let asks = totals(BookSide::Asks);
        let MarketDescriptor { base, quote, price_precision, amount_precision, .. } = market;

        Self {
            bid_base: amount(bids.base, *amount_precision, base),
            bid_quote: amount(bids.quote, *amount_precision, quote),
            ask_base: amount(asks.base, *amount_precision, base),
            ask_quote: amount(asks.quote, *amount_precision, quote),
            mid: state
                .mid
                .map(|mid| fixed(mid, *price_precision))
                .unwrap_or_else(|| UNAVAILABLE.to_string()),
        }
    }

    pub fn sell_text(&self) -> String {
        format!("Sell {} For {}", self.bid_base, self.bid_quote)
    }

    pub fn buy_text(&self) -> String {
        format!("Buy {} For {}", self.ask_base, self.ask_quote)
    }
}

/// One crosshair label: horizontal offset of its box, the y of the volume
/// marker and the price text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairLabel {
    pub side: BookSide,
    pub offset_x: f64,
    pub marker_y: f64,
    pub text: String,
}

impl CrosshairLabel {
    /// CSS-style class of the label, `bids` or `asks`
    pub fn class(&self) -> &'static str {
        match self.side {
            BookSide::Bids => "bids",
            BookSide::Asks => "asks",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosshairLabels {
    pub main: CrosshairLabel,
    pub shadow: CrosshairLabel,
}

impl CrosshairLabels {
    /// Lay out both labels, or `None` when the reading is unavailable
    pub fn layout(
        state: &ChartState,
        reading: &CrosshairReading,
        crosshair_width: f64,
    ) -> Option<Self> {
        let market = state.market.as_ref()?;
        let half = (crosshair_width - 1.0) / 2.0;
        let viewport = &state.viewport;

        let label = |x: f64, side: BookSide| -> Option<CrosshairLabel> {
            let price = reading.price_for(side)?;
            let volume = reading.totals_for(side)?;
            Some(CrosshairLabel {
                side,
                offset_x: x - half,
                marker_y: viewport.volume_to_pixel(volume.base) - 2.0,
                text: Decimal::from_f64(price)
                    .map(|price| fixed(price, market.price_precision))
                    .unwrap_or_else(|| UNAVAILABLE.to_string()),
            })
        };

        Some(Self {
            main: label(reading.cursor_x, reading.main_side)?,
            shadow: label(reading.shadow_x, reading.shadow_side())?,
        })
    }
}
