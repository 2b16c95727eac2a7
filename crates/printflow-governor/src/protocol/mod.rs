//! Wire-level protocol parsing for firmware responses

pub mod ack;

pub use ack::{AckParser, AdvancedAck, ParsedAck};
