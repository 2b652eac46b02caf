pub mod listing;
pub mod model;

// Re-export commonly used types/functions for the CLIs
pub use listing::{disassemble, source_listing, Line};
pub use model::load_raw_bin;
