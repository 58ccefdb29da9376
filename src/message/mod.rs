//! The message value type: a fixed-size, cache-line-sized record copied
//! by value through the ring and mailbox — no allocation on the send path.

pub mod types;

pub use types::{ControlSignal, Message, MessageError, MessageKind, INLINE_CAP};
