//! Frame codec: writes a [`Packet`] to a byte sink and reads one back from a
//! byte source.
//!
//! Wire format:
//! ```text
//! [kind_id:1][body:N]
//! ```
//! `kind_id` is the ASCII digit from [`PacketKind::id`]; the body follows
//! verbatim.  There is no length prefix, so the source handed to the decoder
//! must already be scoped to exactly one frame.

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::protocol::io::{
    self as byte_io, read_all_to, read_all_to_limited, read_byte, write_byte,
};
use crate::protocol::kind::PacketKind;
use crate::protocol::packet::Packet;

/// Errors that can occur while encoding or decoding a packet.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The identifier byte does not name one of the seven packet kinds.
    #[error("unexpected packet type: 0x{0:02X}")]
    UnexpectedPacketType(u8),

    /// The sink or source failed.  The error is carried as-is, including the
    /// `UnexpectedEof` produced when a source is empty before the first byte.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The body is not valid JSON or does not fit the requested type.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The frame body is longer than the caller's [`FrameLimits`] allow.
    #[error("packet body exceeds limit of {limit} bytes")]
    BodyTooLarge { limit: usize },
}

impl ProtocolError {
    /// `true` when the source had no bytes at all, i.e. "no more packets"
    /// rather than a protocol violation or a transport failure.
    ///
    /// An `UnexpectedEof` raised by the source itself, e.g. while the body is
    /// being read, is a truncated frame and does not count.
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, ProtocolError::Io(e) if byte_io::is_end_of_stream(e))
    }
}

/// Optional bounds applied while decoding.
///
/// The default is unbounded: frame size is the transport's responsibility
/// unless the caller opts in here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameLimits {
    /// Largest body accepted, in bytes.  `None` means no limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_body_size: Option<usize>,
}

impl FrameLimits {
    /// Limits that never reject a frame.
    pub const UNBOUNDED: FrameLimits = FrameLimits { max_body_size: None };

    /// Limits rejecting bodies longer than `max_body_size` bytes.
    pub fn with_max_body_size(max_body_size: usize) -> Self {
        Self {
            max_body_size: Some(max_body_size),
        }
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

impl Packet {
    /// Writes the identifier byte followed by the body to `w`.
    ///
    /// Returns the number of bytes written, always `1 + body.len()`.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Io`] with the sink's own error if any write
    /// fails.  No retry is attempted.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eio_core::{Packet, PacketKind};
    ///
    /// let mut wire = Vec::new();
    /// let n = Packet::new(PacketKind::Message, "hi").write_to(&mut wire).unwrap();
    /// assert_eq!(n, 3);
    /// assert_eq!(wire, b"4hi");
    /// ```
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<usize, ProtocolError> {
        write_byte(w, self.kind().id())?;
        w.write_all(self.body())?;
        let written = self.wire_len();
        trace!(kind = %self.kind(), bytes = written, "encoded packet");
        Ok(written)
    }

    /// Reads one packet from a source scoped to exactly one frame.
    ///
    /// Returns the packet and the number of bytes consumed (`1 + body.len()`).
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::Io`] if the source fails; an empty source yields
    ///   `UnexpectedEof` (see [`ProtocolError::is_end_of_stream`]).
    /// - [`ProtocolError::UnexpectedPacketType`] if the first byte is not a
    ///   packet kind.  The source position is then unspecified and the caller
    ///   should drop the connection.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use eio_core::{Packet, PacketKind};
    ///
    /// let mut frame: &[u8] = b"4hi";
    /// let (packet, n) = Packet::read_from(&mut frame).unwrap();
    /// assert_eq!(packet, Packet::new(PacketKind::Message, "hi"));
    /// assert_eq!(n, 3);
    /// ```
    pub fn read_from<R: Read>(r: &mut R) -> Result<(Packet, usize), ProtocolError> {
        Self::read_from_with(r, Vec::new(), &FrameLimits::UNBOUNDED)
    }

    /// Like [`Packet::read_from`], but reads the body into `buf`.
    ///
    /// `buf` is cleared first and keeps its capacity, so the allocation can be
    /// recycled across frames via [`Packet::into_body`].
    pub fn read_from_reusing<R: Read>(
        r: &mut R,
        buf: Vec<u8>,
    ) -> Result<(Packet, usize), ProtocolError> {
        Self::read_from_with(r, buf, &FrameLimits::UNBOUNDED)
    }

    /// Reads one packet into `buf`, enforcing `limits`.
    ///
    /// # Errors
    ///
    /// As [`Packet::read_from`], plus [`ProtocolError::BodyTooLarge`] when the
    /// body exceeds `limits.max_body_size`.
    pub fn read_from_with<R: Read>(
        r: &mut R,
        buf: Vec<u8>,
        limits: &FrameLimits,
    ) -> Result<(Packet, usize), ProtocolError> {
        let id = read_byte(r)?;
        let kind = PacketKind::from_id(id).ok_or_else(|| {
            debug!(id, kind = %PacketKind::describe_id(id), "rejecting frame");
            ProtocolError::UnexpectedPacketType(id)
        })?;

        let body = match limits.max_body_size {
            None => read_all_to(r, buf)?,
            Some(limit) => {
                let (body, overflowed) = read_all_to_limited(r, buf, limit)?;
                if overflowed {
                    debug!(%kind, limit, "frame body exceeds limit");
                    return Err(ProtocolError::BodyTooLarge { limit });
                }
                body
            }
        };

        let packet = Packet::new(kind, body);
        let consumed = packet.wire_len();
        trace!(%kind, bytes = consumed, "decoded packet");
        Ok((packet, consumed))
    }
}

/// Encodes `packet` into a freshly allocated, exactly sized buffer.
pub fn encode_packet(packet: &Packet) -> Vec<u8> {
    let mut buf = Vec::with_capacity(packet.wire_len());
    buf.push(packet.kind().id());
    buf.extend_from_slice(packet.body());
    buf
}

/// Decodes one frame held entirely in memory.
///
/// Returns the packet and the number of bytes consumed, which is always
/// `frame.len()` on success.
///
/// # Errors
///
/// See [`Packet::read_from`].
pub fn decode_packet(frame: &[u8]) -> Result<(Packet, usize), ProtocolError> {
    let mut src = frame;
    Packet::read_from(&mut src)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip(packet: &Packet) -> Packet {
        let mut wire = Vec::new();
        let written = packet.write_to(&mut wire).expect("encode failed");
        assert_eq!(written, wire.len(), "written bytes should equal buffer length");

        let (decoded, consumed) = decode_packet(&wire).expect("decode failed");
        assert_eq!(consumed, written, "consumed bytes should equal written bytes");
        decoded
    }

    // ── Encode ───────────────────────────────────────────────────────────────

    #[test]
    fn test_encode_message_hi() {
        let mut wire = Vec::new();
        let n = Packet::new(PacketKind::Message, "hi")
            .write_to(&mut wire)
            .unwrap();
        assert_eq!(n, 3);
        assert_eq!(wire, [b'4', b'h', b'i']);
    }

    #[test]
    fn test_encode_empty_noop_is_single_byte() {
        let mut wire = Vec::new();
        let n = Packet::empty(PacketKind::Noop).write_to(&mut wire).unwrap();
        assert_eq!(n, 1);
        assert_eq!(wire, [b'6']);
    }

    #[test]
    fn test_encode_appends_to_existing_sink_contents() {
        let mut wire = b"prefix:".to_vec();
        Packet::new(PacketKind::Ping, "probe")
            .write_to(&mut wire)
            .unwrap();
        assert_eq!(wire, b"prefix:2probe");
    }

    #[test]
    fn test_encode_packet_matches_write_to() {
        for kind in PacketKind::ALL {
            let packet = Packet::new(kind, vec![0x00, 0xFF, b'4']);
            let mut streamed = Vec::new();
            packet.write_to(&mut streamed).unwrap();
            assert_eq!(encode_packet(&packet), streamed);
        }
    }

    #[test]
    fn test_encode_packet_length_is_body_plus_one() {
        let packet = Packet::new(PacketKind::Message, vec![7u8; 100]);
        let wire = encode_packet(&packet);
        assert_eq!(wire.len(), 101);
        assert_eq!(wire[0], b'4');
    }

    // ── Decode ───────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_message_hi() {
        let (packet, n) = decode_packet(b"4hi").unwrap();
        assert_eq!(packet.kind(), PacketKind::Message);
        assert_eq!(packet.body(), b"hi");
        assert_eq!(n, 3);
    }

    #[test]
    fn test_decode_identifier_only_yields_empty_body() {
        let (packet, n) = decode_packet(b"3").unwrap();
        assert_eq!(packet, Packet::empty(PacketKind::Pong));
        assert_eq!(n, 1);
    }

    #[test]
    fn test_decode_empty_input_is_end_of_stream() {
        let err = decode_packet(b"").unwrap_err();
        assert!(err.is_end_of_stream(), "got {err:?}");
    }

    #[test]
    fn test_decode_unknown_identifier_carries_the_byte() {
        let err = decode_packet(b"9").unwrap_err();
        assert!(matches!(err, ProtocolError::UnexpectedPacketType(b'9')));
        assert!(!err.is_end_of_stream());
    }

    #[test]
    fn test_decode_rejects_every_non_digit_first_byte() {
        for byte in [b'7', b'a', 0x00, 0x80, b' '] {
            let err = decode_packet(&[byte, b'x']).unwrap_err();
            assert!(
                matches!(err, ProtocolError::UnexpectedPacketType(b) if b == byte),
                "byte {byte:#04x} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_decode_stops_after_unknown_identifier() {
        // Nothing past the bad identifier is consumed.
        let mut src: &[u8] = b"xrest";
        let _ = Packet::read_from(&mut src).unwrap_err();
        assert_eq!(src, b"rest");
    }

    #[test]
    fn test_decode_binary_body_verbatim() {
        let body: Vec<u8> = (0..=255).collect();
        let mut frame = vec![b'4'];
        frame.extend_from_slice(&body);

        let (packet, n) = decode_packet(&frame).unwrap();
        assert_eq!(packet.body(), body.as_slice());
        assert_eq!(n, 257);
    }

    #[test]
    fn test_decode_reusing_buffer_does_not_leak_previous_body() {
        // Arrange
        let mut src: &[u8] = b"4a much longer first message";
        let (first, _) = Packet::read_from(&mut src).unwrap();
        let buf = first.into_body();
        let capacity = buf.capacity();

        // Act
        let mut src: &[u8] = b"4ok";
        let (second, n) = Packet::read_from_reusing(&mut src, buf).unwrap();

        // Assert
        assert_eq!(second.body(), b"ok");
        assert_eq!(n, 3);
        assert_eq!(second.into_body().capacity(), capacity);
    }

    // ── Limits ───────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_with_limit_accepts_body_at_limit() {
        let limits = FrameLimits::with_max_body_size(4);
        let mut src: &[u8] = b"4abcd";
        let (packet, n) = Packet::read_from_with(&mut src, Vec::new(), &limits).unwrap();
        assert_eq!(packet.body(), b"abcd");
        assert_eq!(n, 5);
    }

    #[test]
    fn test_decode_with_limit_rejects_longer_body() {
        let limits = FrameLimits::with_max_body_size(4);
        let mut src: &[u8] = b"4abcde";
        let err = Packet::read_from_with(&mut src, Vec::new(), &limits).unwrap_err();
        assert!(matches!(err, ProtocolError::BodyTooLarge { limit: 4 }));
    }

    #[test]
    fn test_default_limits_are_unbounded() {
        assert_eq!(FrameLimits::default(), FrameLimits::UNBOUNDED);
        let body = vec![b'z'; 1 << 20];
        let packet = round_trip(&Packet::new(PacketKind::Message, body.clone()));
        assert_eq!(packet.body().len(), body.len());
    }

    // ── Round trips ──────────────────────────────────────────────────────────

    #[test]
    fn test_every_kind_round_trips_with_empty_body() {
        for kind in PacketKind::ALL {
            let packet = Packet::empty(kind);
            assert_eq!(round_trip(&packet), packet);
        }
    }

    #[test]
    fn test_every_kind_round_trips_with_body() {
        for kind in PacketKind::ALL {
            let packet = Packet::new(kind, "probe");
            assert_eq!(round_trip(&packet), packet);
        }
    }

    #[test]
    fn test_body_that_starts_with_a_digit_round_trips() {
        let packet = Packet::new(PacketKind::Message, "42[\"event\"]");
        assert_eq!(round_trip(&packet), packet);
    }

    // ── Errors ───────────────────────────────────────────────────────────────

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ProtocolError::UnexpectedPacketType(b'9').to_string(),
            "unexpected packet type: 0x39"
        );
        assert_eq!(
            ProtocolError::BodyTooLarge { limit: 10 }.to_string(),
            "packet body exceeds limit of 10 bytes"
        );
    }

    #[test]
    fn test_io_error_display_is_unchanged() {
        let inner = io::Error::new(io::ErrorKind::BrokenPipe, "sink closed");
        let err = ProtocolError::from(inner);
        assert_eq!(err.to_string(), "sink closed");
    }

    #[test]
    fn test_frame_limits_serde_omits_unbounded() {
        let json = serde_json::to_string(&FrameLimits::UNBOUNDED).unwrap();
        assert_eq!(json, "{}");
        let limits: FrameLimits = serde_json::from_str(r#"{"max_body_size":16}"#).unwrap();
        assert_eq!(limits, FrameLimits::with_max_body_size(16));
    }
}
