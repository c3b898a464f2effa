//! Market data aggregate: order book entities, the level source contract and
//! the depth aggregation service.

pub mod entities;
pub mod repositories;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use repositories::*;
pub use services::*;
pub use value_objects::*;
