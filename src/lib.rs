use crate::domain::logging::{LogComponent, LogLevel};
use tracing_subscriber::filter::LevelFilter;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use application::{
    ChartConfig, ChartController, FrameLoopStats, FrameOutcome, UpdateReason, UpdateScheduler,
    run_frame_loop,
};
pub use domain::chart::{ChartState, CrosshairReading, CrosshairResolver, PriceDomain, Viewport};
pub use domain::errors::{AppError, ConfigError, DomainError, DomainResult};
pub use domain::events::ChartEvent;
pub use domain::market_data::{
    BookSide, BookUpdate, CumulativePoint, DepthAggregator, DepthCurve, DepthCurves, DepthTotals,
    MarketDescriptor, OrderBook, OrderBookFeed, PriceLevel, PriceLevelSource, Symbol,
};
pub use domain::subscription::Subscription;
pub use infrastructure::InMemoryBookFeed;
pub use presentation::{CrosshairLabels, HeaderReadout, RenderSnapshot};

/// Install the `tracing` subscriber, the tracing-backed domain logger and
/// the system clock. Safe to call more than once.
pub fn initialize() {
    initialize_with(LevelFilter::INFO, LogLevel::Info);
}

/// Same as [`initialize`] with explicit thresholds for the subscriber and
/// the domain logger
pub fn initialize_with(default_filter: LevelFilter, min_level: LogLevel) {
    infrastructure::install_tracing_subscriber(default_filter);
    domain::logging::init_logger(Box::new(infrastructure::TracingLogger::new(min_level)));
    domain::logging::init_time_provider(Box::new(infrastructure::SystemTimeProvider::new()));

    crate::log_info!(LogComponent::Presentation("Initialize"), "market depth chart initialized");
}
