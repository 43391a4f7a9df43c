mod loader;
mod paths;
mod types;

pub use types::{Config, SpeedUnit};
