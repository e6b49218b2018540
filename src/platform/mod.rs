//! Host platform integration: application context and environment defaults.

mod application;
pub mod environment;

pub use application::Application;
