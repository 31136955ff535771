// src/lib.rs

#![no_std]
#![doc = "Loads and saves meshnode-rs operational datasets as XML commissioning files."]
#![doc = ""]
#![doc = "This `no_std + alloc` library provides:"]
#![doc = "- `load_commissioning_from_str`: Parsing an Active and optional Pending dataset."]
#![doc = "- `save_commissioning_to_string`: Serializing datasets back into a commissioning file."]

extern crate alloc;

// --- Crate Modules ---

mod builder;
mod error;
mod model;
mod parser;
mod types;

// --- Public API Re-exports ---

pub use builder::save_commissioning_to_string;
pub use error::DatasetFileError;
pub use parser::load_commissioning_from_str;
pub use types::{CommissioningFile, FILE_FORMAT_VERSION};
