//! Reply decoders
//!
//! Turn a raw [`RespValue`] into the native type an accessor promises. Error
//! replies always map to [`ProtocolError::ServerError`].

use crate::error::{ProtocolError, ProtocolResult};
use crate::resp::RespValue;

fn server_error(reply: RespValue) -> ProtocolResult<RespValue> {
    match reply {
        RespValue::Error(message) => Err(ProtocolError::ServerError(message)),
        other => Ok(other),
    }
}

/// `:1` / `:0` as a flag
pub fn to_bool(reply: RespValue) -> ProtocolResult<bool> {
    match server_error(reply)? {
        RespValue::Integer(i) => Ok(i != 0),
        other => Err(ProtocolError::unexpected("integer", other.kind())),
    }
}

/// A non-negative integer such as a cardinality or a removal count
pub fn to_count(reply: RespValue) -> ProtocolResult<u64> {
    match server_error(reply)? {
        RespValue::Integer(i) => {
            u64::try_from(i).map_err(|_| ProtocolError::unexpected("non-negative integer", i))
        }
        other => Err(ProtocolError::unexpected("integer", other.kind())),
    }
}

/// A count that is null when the member is missing (`ZRANK`)
pub fn to_optional_count(reply: RespValue) -> ProtocolResult<Option<u64>> {
    match server_error(reply)? {
        reply if reply.is_null() => Ok(None),
        reply => to_count(reply).map(Some),
    }
}

/// A score sent as a string (`ZSCORE`, `ZINCRBY`)
pub fn to_score(reply: RespValue) -> ProtocolResult<f64> {
    match server_error(reply)? {
        RespValue::Integer(i) => Ok(i as f64),
        reply => match reply.as_string() {
            Some(text) => parse_score(&text),
            None => Err(ProtocolError::unexpected("score", reply.kind())),
        },
    }
}

/// A score that is null when the member is missing
pub fn to_optional_score(reply: RespValue) -> ProtocolResult<Option<f64>> {
    match server_error(reply)? {
        reply if reply.is_null() => Ok(None),
        reply => to_score(reply).map(Some),
    }
}

/// A status line such as the answer to `TYPE`
pub fn to_status(reply: RespValue) -> ProtocolResult<String> {
    let reply = server_error(reply)?;
    reply
        .as_string()
        .ok_or_else(|| ProtocolError::unexpected("string", reply.kind()))
}

/// A flat list of members
pub fn to_members(reply: RespValue) -> ProtocolResult<Vec<String>> {
    match server_error(reply)? {
        RespValue::Array(items) => items.into_iter().map(to_status).collect(),
        RespValue::NullArray => Ok(Vec::new()),
        other => Err(ProtocolError::unexpected("array", other.kind())),
    }
}

/// A `WITHSCORES` reply: `member, score, member, score, ...` in server order
pub fn to_scored_members(reply: RespValue) -> ProtocolResult<Vec<(String, f64)>> {
    let items = match server_error(reply)? {
        RespValue::Array(items) => items,
        RespValue::NullArray => return Ok(Vec::new()),
        other => return Err(ProtocolError::unexpected("array", other.kind())),
    };
    if items.len() % 2 != 0 {
        return Err(ProtocolError::unexpected(
            "member/score pairs",
            format!("array of {} elements", items.len()),
        ));
    }

    let mut pairs = Vec::with_capacity(items.len() / 2);
    let mut items = items.into_iter();
    while let (Some(member), Some(score)) = (items.next(), items.next()) {
        pairs.push((to_status(member)?, to_score(score)?));
    }
    Ok(pairs)
}

/// Parse a score as the server prints it, including `inf` / `-inf`
pub fn parse_score(text: &str) -> ProtocolResult<f64> {
    let score = match text {
        "inf" | "+inf" => f64::INFINITY,
        "-inf" => f64::NEG_INFINITY,
        _ => text
            .parse::<f64>()
            .map_err(|_| ProtocolError::unexpected("score", format!("'{}'", text)))?,
    };
    if score.is_nan() {
        return Err(ProtocolError::unexpected("score", "NaN"));
    }
    Ok(score)
}

/// Format a score for the wire: shortest round-trip decimal, `+inf` / `-inf`
pub fn format_score(score: f64) -> String {
    if score == f64::INFINITY {
        "+inf".to_string()
    } else if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        score.to_string()
    }
}
