pub mod config;
pub mod constant;
pub mod util;

pub use config::Settings;
