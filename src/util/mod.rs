pub mod ids;

pub use ids::{generate_device_id, generate_session_id};
