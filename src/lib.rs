pub mod compiler;
pub mod error;
pub mod generator;
pub mod logger;
pub mod model;
pub mod profile;
pub mod utils;
pub mod validator;

// Re-export commonly used types
pub use compiler::{compile, compile_options, emit_step};
pub use error::{ForgeError, Result, ValidationError};
pub use generator::generate_from_url;
pub use model::{Configuration, Script, Step};
pub use utils::format_for_display;
pub use validator::{validate, validate_config};
