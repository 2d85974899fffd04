//! basicevent service parser module

pub mod parser;

pub use parser::{friendly_name, BinaryState};
