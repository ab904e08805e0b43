//! Low-level byte helpers over `std::io` used by the codec.
//!
//! Errors from the underlying sink/source are returned exactly as they were
//! produced; nothing here retries except on `ErrorKind::Interrupted`, which
//! `std::io` itself treats as "try again".

use std::io::{self, Read, Write};

use thiserror::Error;

/// Payload of the `UnexpectedEof` that [`read_byte`] builds for an empty
/// source.  A source's own `UnexpectedEof` never carries it.
#[derive(Debug, Error)]
#[error("end of stream")]
struct EndOfStream;

/// `true` only for the error [`read_byte`] returns when the source had no
/// bytes left.
pub fn is_end_of_stream(e: &io::Error) -> bool {
    e.kind() == io::ErrorKind::UnexpectedEof
        && e.get_ref().is_some_and(|inner| inner.is::<EndOfStream>())
}

/// Writes a single byte to `w`.
pub fn write_byte<W: Write>(w: &mut W, byte: u8) -> io::Result<()> {
    w.write_all(&[byte])
}

/// Reads exactly one byte from `r`.
///
/// A source with no bytes left yields `ErrorKind::UnexpectedEof`, recognised
/// by [`is_end_of_stream`].
pub fn read_byte<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut byte = [0u8; 1];
    loop {
        match r.read(&mut byte) {
            Ok(0) => return Err(io::Error::new(io::ErrorKind::UnexpectedEof, EndOfStream)),
            Ok(_) => return Ok(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Reads everything left in `r` into `buf`, replacing its previous contents.
///
/// The buffer's length is reset to zero first, but its capacity is kept, so a
/// caller decoding many small frames can hand the same allocation back in
/// every time.
pub fn read_all_to<R: Read>(r: &mut R, mut buf: Vec<u8>) -> io::Result<Vec<u8>> {
    buf.clear();
    r.read_to_end(&mut buf)?;
    Ok(buf)
}

/// Like [`read_all_to`], but stops after `limit` bytes.
///
/// Returns the buffer and whether the source still had data past the limit.
/// At most `limit + 1` bytes are pulled from `r`.
pub fn read_all_to_limited<R: Read>(
    r: &mut R,
    mut buf: Vec<u8>,
    limit: usize,
) -> io::Result<(Vec<u8>, bool)> {
    buf.clear();
    let cap = (limit as u64).saturating_add(1);
    r.by_ref().take(cap).read_to_end(&mut buf)?;
    let overflowed = buf.len() > limit;
    if overflowed {
        buf.truncate(limit);
    }
    Ok((buf, overflowed))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
