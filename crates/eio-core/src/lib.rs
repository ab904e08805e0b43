//! # eio-core
//!
//! Packet framing for the engine transport protocol: the small closed set of
//! packet kinds exchanged between a client and a server, and the rules for
//! turning a packet into bytes and back.
//!
//! This crate is used by every layer above it (handshake, heartbeat, upgrade,
//! application messages).  It has no dependencies on sockets, HTTP, or async
//! runtimes: it only ever sees a [`std::io::Write`] sink or a [`std::io::Read`]
//! source handed to it by the caller.
//!
//! # Wire format (for beginners)
//!
//! Every frame is one ASCII digit followed by the body, verbatim:
//!
//! ```text
//! byte 0:      '0'..'6'  packet kind (OPEN, CLOSE, PING, PONG, MESSAGE, UPGRADE, NOOP)
//! bytes 1..N:  body      opaque payload, length = frame length - 1
//! ```
//!
//! There is no length prefix and no delimiter.  The transport (a WebSocket
//! message, one HTTP polling chunk, ...) decides where a frame ends, and hands
//! the codec exactly one frame per call.
//!
//! - **`protocol`** – [`PacketKind`], [`Packet`], the encode/decode operations
//!   and the small byte-IO helpers they are built from.

pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `eio_core::Packet` instead of `eio_core::protocol::packet::Packet`.
pub use protocol::codec::{decode_packet, encode_packet, FrameLimits, ProtocolError};
pub use protocol::kind::PacketKind;
pub use protocol::packet::Packet;
