use crate::proto::helloworld::HelloReply;
use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// One object from the REST backend, passed through untouched.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    /// `None` when the token endpoint did not report a lifetime.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// A token counts as expired once it is inside the clock skew window.
    pub fn is_expired(&self, now: DateTime<Utc>, clock_skew: Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => now + clock_skew >= expires_at,
            None => false,
        }
    }
}

/// Replies collected from a streaming call, rendered the way the endpoints
/// return them: `[message: "Hello Tom"\n, message: "Hello Tom"\n]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplyList(pub Vec<HelloReply>);

impl ReplyList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<HelloReply>> for ReplyList {
    fn from(replies: Vec<HelloReply>) -> Self {
        Self(replies)
    }
}

impl fmt::Display for ReplyList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, reply) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            writeln!(f, "message: \"{}\"", escape_text(&reply.message))?;
        }
        f.write_str("]")
    }
}

// Protobuf text format escaping: works on the UTF-8 bytes, printable ASCII
// passes through, everything else is written as a three-digit octal escape.
fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for &b in value.as_bytes() {
        match b {
            0x07 => escaped.push_str("\\a"),
            0x08 => escaped.push_str("\\b"),
            0x0c => escaped.push_str("\\f"),
            b'\n' => escaped.push_str("\\n"),
            b'\r' => escaped.push_str("\\r"),
            b'\t' => escaped.push_str("\\t"),
            0x0b => escaped.push_str("\\v"),
            b'\\' => escaped.push_str("\\\\"),
            b'\'' => escaped.push_str("\\'"),
            b'"' => escaped.push_str("\\\""),
            0x20..=0x7e => escaped.push(b as char),
            _ => {
                escaped.push('\\');
                escaped.push(char::from(b'0' + ((b >> 6) & 3)));
                escaped.push(char::from(b'0' + ((b >> 3) & 7)));
                escaped.push(char::from(b'0' + (b & 7)));
            }
        }
    }
    escaped
}
