//! Message parsing: header unfolding and decoding, header/body split.

pub mod header;
pub mod message;
