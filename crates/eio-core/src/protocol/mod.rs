//! Protocol module containing packet kinds, the packet value type and the codec.

pub mod codec;
pub mod io;
pub mod kind;
pub mod packet;

pub use codec::{decode_packet, encode_packet, FrameLimits, ProtocolError};
pub use kind::PacketKind;
pub use packet::Packet;
