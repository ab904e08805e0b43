//! The closed set of packet kinds and their single-byte wire identifiers.
//!
//! # Why no "unknown" variant? (for beginners)
//!
//! The protocol needs a way to say "this byte is not a packet kind".  Rather
//! than adding an `Unknown` variant that could accidentally end up inside a
//! [`crate::Packet`] and later be written to the wire, the lookup
//! [`PacketKind::from_id`] returns `Option<PacketKind>`: `None` *is* the
//! unknown case.  Every value of type `PacketKind` is therefore a legal wire
//! kind, and [`PacketKind::id`] never has to fail.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::codec::ProtocolError;

/// Packet kind.  The discriminant of each variant is its wire identifier,
/// the ASCII digits `'0'` to `'6'` in declaration order.
///
/// These values are fixed by the protocol and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum PacketKind {
    Open = b'0',
    Close = b'1',
    Ping = b'2',
    Pong = b'3',
    Message = b'4',
    Upgrade = b'5',
    Noop = b'6',
}

impl PacketKind {
    /// Every kind, in declaration (and therefore identifier) order.
    pub const ALL: [PacketKind; 7] = [
        PacketKind::Open,
        PacketKind::Close,
        PacketKind::Ping,
        PacketKind::Pong,
        PacketKind::Message,
        PacketKind::Upgrade,
        PacketKind::Noop,
    ];

    /// Returns the single wire byte identifying this kind.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eio_core::PacketKind;
    ///
    /// assert_eq!(PacketKind::Message.id(), b'4');
    /// ```
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Maps a wire byte back to its kind.
    ///
    /// Returns `None` for any byte outside `'0'..='6'`.  That is not an error
    /// by itself; the decoder turns it into
    /// [`ProtocolError::UnexpectedPacketType`].
    pub fn from_id(id: u8) -> Option<PacketKind> {
        match id {
            b'0' => Some(PacketKind::Open),
            b'1' => Some(PacketKind::Close),
            b'2' => Some(PacketKind::Ping),
            b'3' => Some(PacketKind::Pong),
            b'4' => Some(PacketKind::Message),
            b'5' => Some(PacketKind::Upgrade),
            b'6' => Some(PacketKind::Noop),
            _ => None,
        }
    }

    /// Human-readable name used in logs and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            PacketKind::Open => "OPEN",
            PacketKind::Close => "CLOSE",
            PacketKind::Ping => "PING",
            PacketKind::Pong => "PONG",
            PacketKind::Message => "MESSAGE",
            PacketKind::Upgrade => "UPGRADE",
            PacketKind::Noop => "NOOP",
        }
    }

    /// Names a raw identifier byte: the kind's name when the byte is valid,
    /// `PacketType(<n>)` otherwise.
    ///
    /// ```rust
    /// use eio_core::PacketKind;
    ///
    /// assert_eq!(PacketKind::describe_id(b'2'), "PING");
    /// assert_eq!(PacketKind::describe_id(b'9'), "PacketType(57)");
    /// ```
    pub fn describe_id(id: u8) -> Cow<'static, str> {
        match PacketKind::from_id(id) {
            Some(kind) => Cow::Borrowed(kind.name()),
            None => Cow::Owned(format!("PacketType({id})")),
        }
    }

    /// Every kind except MESSAGE is a control signal for the session layer.
    pub fn is_control(self) -> bool {
        self != PacketKind::Message
    }
}

impl fmt::Display for PacketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<PacketKind> for u8 {
    fn from(kind: PacketKind) -> u8 {
        kind.id()
    }
}

impl TryFrom<u8> for PacketKind {
    type Error = ProtocolError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        PacketKind::from_id(value).ok_or(ProtocolError::UnexpectedPacketType(value))
    }
}

/// Returned by [`PacketKind::from_str`] for text that names no kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown packet kind: {0:?}")]
pub struct ParseKindError(pub String);

impl FromStr for PacketKind {
    type Err = ParseKindError;

    /// Accepts a kind name in any letter case (`"message"`, `"PING"`) or the
    /// identifier digit itself (`"4"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let [digit] = trimmed.as_bytes() {
            if let Some(kind) = PacketKind::from_id(*digit) {
                return Ok(kind);
            }
        }
        PacketKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
