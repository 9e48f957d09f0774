//! RESP codec for encoding requests and parsing replies

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use super::types::RespValue;
use crate::error::{ProtocolError, ProtocolResult};

/// Default upper bound for a single bulk string (512MB, the server default)
pub const DEFAULT_MAX_FRAME_SIZE: usize = 512 * 1024 * 1024;

/// RESP2 codec
#[derive(Debug, Clone)]
pub struct RespCodec {
    max_frame_size: usize,
}

impl RespCodec {
    /// Create a new RESP codec
    pub fn new() -> Self {
        Self::with_max_frame_size(DEFAULT_MAX_FRAME_SIZE)
    }

    /// Create a codec with custom max frame size
    pub fn with_max_frame_size(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }

    /// Largest bulk string this codec accepts
    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }
}

impl Default for RespCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for RespCodec {
    type Item = RespValue;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let parsed = Parser::new(&src[..], self.max_frame_size).value(0)?;
        match parsed {
            Some((value, consumed)) => {
                src.advance(consumed);
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }
}

impl Encoder<RespValue> for RespCodec {
    type Error = ProtocolError;

    fn encode(&mut self, item: RespValue, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.extend_from_slice(&item.serialize());
        Ok(())
    }
}

/// Cursor-free parser over a borrowed buffer.
///
/// Every method takes the offset it starts at and returns the value together
/// with the offset just past it, or `None` if the buffer ends early.
struct Parser<'a> {
    buf: &'a [u8],
    max_frame_size: usize,
}

type Parsed = ProtocolResult<Option<(RespValue, usize)>>;

impl<'a> Parser<'a> {
    fn new(buf: &'a [u8], max_frame_size: usize) -> Self {
        Self {
            buf,
            max_frame_size,
        }
    }

    fn value(&self, pos: usize) -> Parsed {
        let Some(&type_byte) = self.buf.get(pos) else {
            return Ok(None);
        };

        match type_byte {
            b'+' => Ok(self
                .line(pos + 1)
                .map(|(s, end)| (RespValue::SimpleString(s), end))),
            b'-' => Ok(self
                .line(pos + 1)
                .map(|(s, end)| (RespValue::Error(s), end))),
            b':' => match self.number(pos + 1)? {
                Some((i, end)) => Ok(Some((RespValue::Integer(i), end))),
                None => Ok(None),
            },
            b'$' => self.bulk_string(pos + 1),
            b'*' => self.array(pos + 1),
            other => Err(ProtocolError::RespError(format!(
                "Invalid RESP type byte: {}",
                other as char
            ))),
        }
    }

    /// $6\r\nfoobar\r\n or $-1\r\n
    fn bulk_string(&self, pos: usize) -> Parsed {
        let Some((len, data_start)) = self.number(pos)? else {
            return Ok(None);
        };
        if len == -1 {
            return Ok(Some((RespValue::NullBulkString, data_start)));
        }
        let len = usize::try_from(len).map_err(|_| {
            ProtocolError::RespError(format!("Invalid bulk string length: {}", len))
        })?;
        if len > self.max_frame_size {
            return Err(ProtocolError::FrameTooLarge {
                size: len,
                limit: self.max_frame_size,
            });
        }

        let data_end = data_start + len;
        if self.buf.len() < data_end + 2 {
            return Ok(None);
        }
        if &self.buf[data_end..data_end + 2] != b"\r\n" {
            return Err(ProtocolError::RespError(
                "Bulk string is not terminated by CRLF".to_string(),
            ));
        }

        let data = bytes::Bytes::copy_from_slice(&self.buf[data_start..data_end]);
        Ok(Some((RespValue::BulkString(data), data_end + 2)))
    }

    /// *2\r\n... or *-1\r\n
    fn array(&self, pos: usize) -> Parsed {
        let Some((count, mut next)) = self.number(pos)? else {
            return Ok(None);
        };
        if count == -1 {
            return Ok(Some((RespValue::NullArray, next)));
        }
        let count = usize::try_from(count)
            .map_err(|_| ProtocolError::RespError(format!("Invalid array count: {}", count)))?;

        // Counts come from the peer; cap the up-front reservation.
        let mut elements = Vec::with_capacity(count.min(1024));
        for _ in 0..count {
            match self.value(next)? {
                Some((value, end)) => {
                    elements.push(value);
                    next = end;
                }
                None => return Ok(None),
            }
        }
        Ok(Some((RespValue::Array(elements), next)))
    }

    fn number(&self, pos: usize) -> ProtocolResult<Option<(i64, usize)>> {
        match self.line(pos) {
            Some((s, end)) => s
                .parse::<i64>()
                .map(|i| Some((i, end)))
                .map_err(|e| ProtocolError::RespError(format!("Invalid integer '{}': {}", s, e))),
            None => Ok(None),
        }
    }

    fn line(&self, pos: usize) -> Option<(String, usize)> {
        let end = find_crlf(self.buf, pos)?;
        let s = String::from_utf8_lossy(&self.buf[pos..end]).into_owned();
        Some((s, end + 2))
    }
}

/// Find CRLF position starting from offset
fn find_crlf(buf: &[u8], start: usize) -> Option<usize> {
    (start..buf.len().saturating_sub(1)).find(|&i| buf[i] == b'\r' && buf[i + 1] == b'\n')
}
