#![warn(clippy::pedantic)]

pub mod crc64;
pub mod error;
pub mod header;
pub mod message;
pub mod properties;
pub mod segment;

pub use crc64::{Crc64, checksum};
pub use error::{ChecksumScope, HeaderFault, LengthFault, WireError};
pub use message::{
    MessageView, SegmentView, decode_message, encode_message, read_message, validate_message,
};
pub use properties::{STRUCTURED_BODY_TYPE, StructuredHeaders};
