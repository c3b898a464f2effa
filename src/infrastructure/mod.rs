//! Infrastructure adapters: an in-memory order book feed and the
//! `tracing`-backed logger and clock.

pub mod book_feed;
pub mod services;

pub use book_feed::InMemoryBookFeed;
pub use services::{SystemTimeProvider, TracingLogger, install_tracing_subscriber};
