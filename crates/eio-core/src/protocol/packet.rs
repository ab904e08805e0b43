//! The packet value type: a kind plus an opaque body.
//!
//! Encoding and decoding live in [`crate::protocol::codec`]; this module only
//! holds the data and the JSON convenience helpers for MESSAGE bodies.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::protocol::codec::ProtocolError;
use crate::protocol::kind::PacketKind;

/// One protocol packet.
///
/// The kind is always a legal wire kind (see [`PacketKind`]).  The body is an
/// owned byte sequence, possibly empty, that the codec never inspects.
///
/// `Display` and `Debug` print the kind and the body *length* only, so logging
/// a packet never dumps its payload.
///
/// # Examples
///
/// ```rust
/// use eio_core::{Packet, PacketKind};
///
/// let packet = Packet::new(PacketKind::Message, "hello world!");
/// assert_eq!(packet.to_string(), "Packet(MESSAGE, <12 bytes>)");
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Packet {
    kind: PacketKind,
    body: Vec<u8>,
}

impl Packet {
    /// Creates a packet of `kind` carrying `body`.
    pub fn new(kind: PacketKind, body: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            body: body.into(),
        }
    }

    /// Creates a packet of `kind` with an empty body.
    pub fn empty(kind: PacketKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// Creates a MESSAGE packet.
    pub fn message(body: impl Into<Vec<u8>>) -> Self {
        Self::new(PacketKind::Message, body)
    }

    /// Creates a packet whose body is `value` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedPayload`] if `value` cannot be
    /// represented as JSON (e.g. a map with non-string keys).
    pub fn with_json_body<T: Serialize + ?Sized>(
        kind: PacketKind,
        value: &T,
    ) -> Result<Self, ProtocolError> {
        let body =
            serde_json::to_vec(value).map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;
        Ok(Self::new(kind, body))
    }

    pub fn kind(&self) -> PacketKind {
        self.kind
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Replaces the body.  No validation is performed.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Consumes the packet and returns its body, e.g. to hand the allocation
    /// back to [`Packet::read_from_reusing`].
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Size of this packet on the wire: the identifier byte plus the body.
    pub fn wire_len(&self) -> usize {
        1 + self.body.len()
    }

    /// Decodes the body as JSON into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedPayload`] if the body is not valid
    /// JSON or does not match the shape of `T`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eio_core::Packet;
    ///
    /// let packet = Packet::message(r#"{"sid":"abc","pingInterval":25000}"#);
    /// let value: serde_json::Value = packet.decode_body_json().unwrap();
    /// assert_eq!(value["pingInterval"], 25000);
    /// ```
    pub fn decode_body_json<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packet({}, <{} bytes>)", self.kind, self.body.len())
    }
}

impl fmt::Debug for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("kind", &self.kind)
            .field("body_len", &self.body.len())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
