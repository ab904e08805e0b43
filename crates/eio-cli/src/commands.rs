//! Handlers for `eio encode` and `eio decode`.
//!
//! Both work on `impl Read` / `impl Write` so tests can drive them with byte
//! slices and `Vec<u8>` instead of stdin and stdout.

use std::io::{Read, Write};

use eio_core::{FrameLimits, Packet, PacketKind, ProtocolError};
use tracing::{debug, info};

/// Line printed by `decode` when the input holds no bytes at all.
pub const END_OF_STREAM_NOTICE: &str = "no packet: end of stream";

/// How `decode` renders the packet body after the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// The body as UTF-8, with invalid sequences replaced.
    Text,
    /// The body parsed as JSON and pretty-printed.
    Json,
}

/// Result of decoding one input.
#[derive(Debug, PartialEq, Eq)]
pub enum DecodeOutcome {
    Packet(Packet),
    /// The input was empty: no frame, not an error.
    EndOfStream,
}

/// Encodes one frame of `kind` carrying `body` into `out`.
///
/// Returns the packet that was written so the caller can report it.
///
/// # Errors
///
/// Returns [`ProtocolError::Io`] if writing or flushing `out` fails.
pub fn encode<W: Write>(
    kind: PacketKind,
    body: Vec<u8>,
    out: &mut W,
) -> Result<Packet, ProtocolError> {
    let packet = Packet::new(kind, body);
    let written = packet.write_to(out)?;
    out.flush()?;
    info!(%packet, written, "encoded frame");
    Ok(packet)
}

/// Reads the whole of `input` as a single frame.
///
/// # Errors
///
/// Propagates codec errors other than end of stream, which becomes
/// [`DecodeOutcome::EndOfStream`].
pub fn decode<R: Read>(
    input: &mut R,
    limits: &FrameLimits,
) -> Result<DecodeOutcome, ProtocolError> {
    match Packet::read_from_with(input, Vec::new(), limits) {
        Ok((packet, consumed)) => {
            info!(%packet, consumed, "decoded frame");
            Ok(DecodeOutcome::Packet(packet))
        }
        Err(e) if e.is_end_of_stream() => {
            debug!("input was empty");
            Ok(DecodeOutcome::EndOfStream)
        }
        Err(e) => Err(e),
    }
}

/// Writes a human-readable view of `outcome` to `out`.
///
/// For a packet that is the summary line (`Packet(KIND, <n bytes>)`) followed
/// by the body, if any, in the requested format.
///
/// # Errors
///
/// Returns [`ProtocolError::MalformedPayload`] if `format` is
/// [`BodyFormat::Json`] and the body is not JSON, or
/// [`ProtocolError::Io`] if writing fails.
pub fn render<W: Write>(
    outcome: &DecodeOutcome,
    format: BodyFormat,
    out: &mut W,
) -> Result<(), ProtocolError> {
    let packet = match outcome {
        DecodeOutcome::EndOfStream => {
            writeln!(out, "{END_OF_STREAM_NOTICE}")?;
            return Ok(out.flush()?);
        }
        DecodeOutcome::Packet(packet) => packet,
    };

    writeln!(out, "{packet}")?;
    match format {
        BodyFormat::Text if packet.body().is_empty() => {}
        BodyFormat::Text => writeln!(out, "{}", String::from_utf8_lossy(packet.body()))?,
        BodyFormat::Json => {
            let value: serde_json::Value = packet.decode_body_json()?;
            let pretty = serde_json::to_string_pretty(&value)
                .map_err(|e| ProtocolError::MalformedPayload(e.to_string()))?;
            writeln!(out, "{pretty}")?;
        }
    }
    Ok(out.flush()?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
