//! RESP2 value types exchanged with the server

use bytes::Bytes;
use std::fmt;

/// A single RESP2 frame
#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    /// Simple string: +OK\r\n
    SimpleString(String),
    /// Error: -ERR message\r\n
    Error(String),
    /// Integer: :1000\r\n
    Integer(i64),
    /// Bulk string: $6\r\nfoobar\r\n
    BulkString(Bytes),
    /// Null bulk string: $-1\r\n
    NullBulkString,
    /// Array: *2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n
    Array(Vec<RespValue>),
    /// Null array: *-1\r\n
    NullArray,
}

impl RespValue {
    /// Create a bulk string from a string
    pub fn bulk_string_from_str(s: impl Into<String>) -> Self {
        RespValue::BulkString(Bytes::from(s.into()))
    }

    /// Build the request frame for a command: an array of bulk strings
    pub fn command<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RespValue::Array(
            args.into_iter()
                .map(RespValue::bulk_string_from_str)
                .collect(),
        )
    }

    /// Extract as string if possible
    pub fn as_string(&self) -> Option<String> {
        match self {
            RespValue::SimpleString(s) => Some(s.clone()),
            RespValue::BulkString(b) => String::from_utf8(b.to_vec()).ok(),
            _ => None,
        }
    }

    /// Check if this is a null value
    pub fn is_null(&self) -> bool {
        matches!(self, RespValue::NullBulkString | RespValue::NullArray)
    }

    /// Short name of the frame type, used in decode errors
    pub fn kind(&self) -> &'static str {
        match self {
            RespValue::SimpleString(_) => "simple string",
            RespValue::Error(_) => "error",
            RespValue::Integer(_) => "integer",
            RespValue::BulkString(_) => "bulk string",
            RespValue::NullBulkString => "null bulk string",
            RespValue::Array(_) => "array",
            RespValue::NullArray => "null array",
        }
    }

    /// Serialize to RESP2 format
    pub fn serialize(&self) -> Bytes {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        Bytes::from(buf)
    }

    fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            RespValue::SimpleString(s) => {
                buf.push(b'+');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::Error(s) => {
                buf.push(b'-');
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::Integer(i) => {
                buf.push(b':');
                buf.extend_from_slice(i.to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::BulkString(bytes) => {
                buf.push(b'$');
                buf.extend_from_slice(bytes.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                buf.extend_from_slice(bytes);
                buf.extend_from_slice(b"\r\n");
            }
            RespValue::NullBulkString => buf.extend_from_slice(b"$-1\r\n"),
            RespValue::Array(arr) => {
                buf.push(b'*');
                buf.extend_from_slice(arr.len().to_string().as_bytes());
                buf.extend_from_slice(b"\r\n");
                for val in arr {
                    val.write_to(buf);
                }
            }
            RespValue::NullArray => buf.extend_from_slice(b"*-1\r\n"),
        }
    }
}

impl fmt::Display for RespValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RespValue::SimpleString(s) => write!(f, "\"{}\"", s),
            RespValue::Error(s) => write!(f, "ERROR: {}", s),
            RespValue::Integer(i) => write!(f, "{}", i),
            RespValue::BulkString(b) => match std::str::from_utf8(b) {
                Ok(s) => write!(f, "\"{}\"", s),
                Err(_) => write!(f, "<binary:{} bytes>", b.len()),
            },
            RespValue::NullBulkString | RespValue::NullArray => write!(f, "null"),
            RespValue::Array(arr) => {
                write!(f, "[")?;
                for (i, val) in arr.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", val)?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<&str> for RespValue {
    fn from(s: &str) -> Self {
        RespValue::bulk_string_from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_frame_serialization() {
        let frame = RespValue::command(["ZADD", "board", "1.5", "alice"]);
        assert_eq!(
            frame.serialize(),
            Bytes::from_static(b"*4\r\n$4\r\nZADD\r\n$5\r\nboard\r\n$3\r\n1.5\r\n$5\r\nalice\r\n")
        );
    }

    #[test]
    fn test_display() {
        let value = RespValue::Array(vec!["a".into(), RespValue::Integer(3), RespValue::NullBulkString]);
        assert_eq!(value.to_string(), "[\"a\", 3, null]");
        assert_eq!(RespValue::Error("ERR nope".to_string()).to_string(), "ERROR: ERR nope");
    }

    #[test]
    fn test_null_and_kind() {
        assert!(RespValue::NullArray.is_null());
        assert!(!RespValue::Integer(0).is_null());
        assert_eq!(RespValue::SimpleString("zset".to_string()).kind(), "simple string");
    }
}
