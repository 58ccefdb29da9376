//! The wire-shaped message value.

// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU64, Ordering};

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::util::ActorId;

/// Maximum number of payload bytes a [`Message`] can carry inline.
///
/// Chosen so `size_of::<Message>() == 64`, one cache line: 3 `u64` fields
/// (24 bytes) + 3 tag bytes (kind, flags, payload_len) + `INLINE_CAP` bytes
/// of payload must sum to 64.
pub const INLINE_CAP: usize = 37;

const _: () = assert!(std::mem::size_of::<Message>() == 64);

/// Process-wide counter backing [`Message::monotonic_id`].
static NEXT_MONOTONIC_ID: AtomicU64 = AtomicU64::new(1);

/// Discriminates the three classes of message the core understands.
///
/// `User` messages are application payloads; `System` messages carry
/// runtime-internal notices (e.g. a supervisor's restart notice to a
/// monitoring hook); `Control` messages carry lifecycle directives such as
/// `Stop` and are the only kind processed while an actor is `Stopping`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageKind {
    User = 0,
    System = 1,
    Control = 2,
}

/// A well-known control directive carried by a `Control` message's first
/// payload byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlSignal {
    Stop = 0,
}

/// Errors raised while constructing or populating a [`Message`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// The caller attempted to inline more than [`INLINE_CAP`] bytes.
    #[error("payload of {len} bytes exceeds the inline capacity of {INLINE_CAP} bytes")]
    PayloadTooLarge { len: usize },
}

/// A fixed-size, cache-line-sized message value.
///
/// `Message` is a plain value type: no destructor beyond releasing its
/// inline bytes, no allocation, copied by assignment through the ring.
/// Payloads larger than [`INLINE_CAP`] are not supported by the core —
/// callers that need to move more must pass a handle (index, pointer,
/// whatever fits inline) to storage they own elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub sender: ActorId,
    pub receiver: ActorId,
    pub monotonic_id: u64,
    pub kind: MessageKind,
    pub flags: u8,
    payload_len: u8,
    payload: [u8; INLINE_CAP],
}

impl Message {
    /// Build a `User` message with an empty payload.
    pub fn user(sender: ActorId, receiver: ActorId) -> Self {
        Self::new(sender, receiver, MessageKind::User)
    }

    /// Build a `System` message with an empty payload.
    pub fn system(sender: ActorId, receiver: ActorId) -> Self {
        Self::new(sender, receiver, MessageKind::System)
    }

    /// Build a `Control` message carrying the given signal as its sole
    /// payload byte.
    pub fn control(sender: ActorId, receiver: ActorId, signal: ControlSignal) -> Self {
        let mut msg = Self::new(sender, receiver, MessageKind::Control);
        // A single byte always fits; the assert above guarantees INLINE_CAP >= 1.
        msg.payload[0] = signal as u8;
        msg.payload_len = 1;
        msg
    }

    fn new(sender: ActorId, receiver: ActorId, kind: MessageKind) -> Self {
        Self {
            sender,
            receiver,
            monotonic_id: NEXT_MONOTONIC_ID.fetch_add(1, Ordering::Relaxed),
            kind,
            flags: 0,
            payload_len: 0,
            payload: [0u8; INLINE_CAP],
        }
    }

    /// Copy `bytes` into the inline payload, replacing whatever was there.
    ///
    /// Fails with [`MessageError::PayloadTooLarge`] without modifying the
    /// message if `bytes` does not fit.
    pub fn set_data(&mut self, bytes: &[u8]) -> Result<(), MessageError> {
        if bytes.len() > INLINE_CAP {
            return Err(MessageError::PayloadTooLarge { len: bytes.len() });
        }
        self.payload[..bytes.len()].copy_from_slice(bytes);
        // Zero any bytes left over from a previous, longer payload.
        for b in &mut self.payload[bytes.len()..] {
            *b = 0;
        }
        self.payload_len = bytes.len() as u8;
        Ok(())
    }

    /// Builder-style variant of [`Message::set_data`].
    pub fn with_data(mut self, bytes: &[u8]) -> Result<Self, MessageError> {
        self.set_data(bytes)?;
        Ok(self)
    }

    /// The inline payload bytes currently set.
    pub fn data(&self) -> &[u8] {
        &self.payload[..self.payload_len as usize]
    }

    /// Number of payload bytes currently set.
    pub fn payload_len(&self) -> usize {
        self.payload_len as usize
    }

    /// Interpret a `Control` message's payload as a [`ControlSignal`].
    ///
    /// Returns `None` for any kind other than `Control`, or for an unknown
    /// signal byte.
    pub fn control_signal(&self) -> Option<ControlSignal> {
        if self.kind != MessageKind::Control || self.payload_len == 0 {
            return None;
        }
        match self.payload[0] {
            0 => Some(ControlSignal::Stop),
            _ => None,
        }
    }
}
