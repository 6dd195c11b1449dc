mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{Config, LaunchConfig, SearchConfig, StoreConfig};
pub use validation::warn_unknown_fields;
