#![warn(clippy::pedantic)]

pub mod error;
pub mod reader;

pub use error::DecodeError;
pub use reader::DecoderReader;
