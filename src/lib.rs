pub mod advisor;
pub mod config;
pub mod models;
pub mod plugin;

pub use advisor::GlobalAdvisor;
pub use config::Config;
pub use plugin::{Outcome, ScorePlugin};
