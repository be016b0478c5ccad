mod loader;
mod types;

pub use loader::{load_settings, validate_settings};
pub use types::{PRODUCTION_LABEL, Settings};
