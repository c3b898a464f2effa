pub mod config;
pub mod controller;
pub mod frame_loop;
pub mod scheduler;

pub use config::*;
pub use controller::*;
pub use frame_loop::*;
pub use scheduler::*;
