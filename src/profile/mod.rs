pub mod loader;
pub mod templates;

pub use loader::{ConfigOverrides, ProfileFile, ProfileLoader};
pub use templates::ScenarioTemplate;
