//! RESP (Redis Serialization Protocol) wire layer
//!
//! Only RESP2 is spoken: requests are arrays of bulk strings, replies are any
//! RESP2 frame.

pub mod codec;
pub mod types;

pub use codec::RespCodec;
pub use types::RespValue;
