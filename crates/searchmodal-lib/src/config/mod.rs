pub mod env;
pub mod manager;
pub mod settings;

pub use env::EnvConfig;
pub use manager::ConfigManager;
pub use settings::HarnessConfig;
