#![deny(missing_docs)]
#![doc = "Shared error types and filesystem primitives for battery generation."]

pub mod errors;
pub mod fsio;

pub use errors::{BatteryError, ErrorInfo, PATH_KEY};
pub use fsio::{copy_tree, read_text, remove_tree, write_text, CopyStats};
