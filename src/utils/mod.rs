pub mod formatter;

pub use formatter::{SummaryFormatter, format_for_display};
