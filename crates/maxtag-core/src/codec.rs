//! Binary codec primitives shared by the persisted formats.
//!
//! Persisted tagger state uses fixed big-endian layouts with no version tag:
//! any layout change breaks compatibility with previously trained models.
//! A string is written as a big-endian `u16` byte length followed by that
//! many UTF-8 bytes.
//!
//! A truncated or structurally invalid stream is reported as
//! [`CodecError::Corrupt`] rather than a bare I/O error, and the readers in
//! this crate never hand back a partially populated structure.

use std::io::{self, Read, Write};

/// Errors from encoding or decoding persisted tagger state.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt persisted state: {0}")]
    Corrupt(String),

    #[error("string of {0} bytes exceeds the u16 length prefix")]
    StringTooLong(usize),
}

/// Read exactly `buf.len()` bytes, mapping a short read to [`CodecError::Corrupt`].
fn fill(r: &mut impl Read, buf: &mut [u8]) -> Result<(), CodecError> {
    r.read_exact(buf).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            CodecError::Corrupt("unexpected end of stream".to_string())
        } else {
            CodecError::Io(e)
        }
    })
}

pub(crate) fn write_i32(w: &mut impl Write, value: i32) -> Result<(), CodecError> {
    w.write_all(&value.to_be_bytes())?;
    Ok(())
}

pub(crate) fn read_i32(r: &mut impl Read) -> Result<i32, CodecError> {
    let mut buf = [0u8; 4];
    fill(r, &mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

pub(crate) fn write_bool(w: &mut impl Write, value: bool) -> Result<(), CodecError> {
    w.write_all(&[u8::from(value)])?;
    Ok(())
}

pub(crate) fn read_bool(r: &mut impl Read) -> Result<bool, CodecError> {
    let mut buf = [0u8; 1];
    fill(r, &mut buf)?;
    match buf[0] {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(CodecError::Corrupt(format!(
            "invalid boolean byte {other:#04x}"
        ))),
    }
}

pub(crate) fn write_utf(w: &mut impl Write, s: &str) -> Result<(), CodecError> {
    let len = s.len();
    if len > usize::from(u16::MAX) {
        return Err(CodecError::StringTooLong(len));
    }
    w.write_all(&(len as u16).to_be_bytes())?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

pub(crate) fn read_utf(r: &mut impl Read) -> Result<String, CodecError> {
    let mut len_buf = [0u8; 2];
    fill(r, &mut len_buf)?;
    let len = usize::from(u16::from_be_bytes(len_buf));
    let mut bytes = vec![0u8; len];
    fill(r, &mut bytes)?;
    String::from_utf8(bytes)
        .map_err(|_| CodecError::Corrupt("invalid UTF-8 in string".to_string()))
}
