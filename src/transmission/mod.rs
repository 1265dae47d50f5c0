/// Transmission layer modules
pub mod config;
pub mod sender;

pub use config::*;
pub use sender::*;
