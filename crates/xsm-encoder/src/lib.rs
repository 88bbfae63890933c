#![warn(clippy::pedantic)]

pub mod reader;
pub mod streaming;

pub use reader::EncoderReader;
pub use streaming::StreamingEncoder;
pub use xsm_wire::{STRUCTURED_BODY_TYPE, StructuredHeaders};
