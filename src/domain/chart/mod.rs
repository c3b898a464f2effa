//! Chart aggregate: viewport entity, committed chart state, crosshair
//! resolution and the scale value objects they share.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::*;
pub use value_objects::*;
