//! Domain layer: order book data, depth aggregation, viewport math and the
//! cross-cutting logging, error and event abstractions.

pub mod chart;
pub mod errors;
pub mod events;
pub mod logging;
pub mod market_data;
pub mod subscription;
