//! Error types for frame encoding and decoding.

use thiserror::Error;

/// Errors produced while decoding an inbound frame.
///
/// None of these are fatal to a session. The caller logs the error and drops
/// the frame; existing state is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Frame text is not valid JSON.
    #[error("frame is not valid JSON: {0}")]
    Json(String),

    /// Frame is valid JSON but not an object.
    #[error("frame is not a JSON object")]
    NotAnObject,

    /// Frame object has no string `type` field.
    #[error("frame has no string `type` field")]
    MissingType,

    /// Frame `type` is not one this client understands.
    #[error("unknown frame type `{kind}`")]
    UnknownType {
        /// The unrecognized `type` value.
        kind: String,
    },

    /// Frame `type` is known but its fields do not match the expected shape.
    #[error("malformed `{kind}` frame: {reason}")]
    Malformed {
        /// The frame `type`.
        kind: String,
        /// What serde rejected.
        reason: String,
    },
}

impl DecodeError {
    /// Frame `type` the error refers to, if the frame got that far.
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::UnknownType { kind } | Self::Malformed { kind, .. } => Some(kind),
            Self::Json(_) | Self::NotAnObject | Self::MissingType => None,
        }
    }
}

/// Errors produced while encoding an outbound frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// serde_json refused the value.
    #[error("failed to encode `{kind}` frame: {reason}")]
    Json {
        /// The frame `type`.
        kind: &'static str,
        /// What serde_json reported.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_is_reported_for_typed_failures() {
        let unknown = DecodeError::UnknownType { kind: "typing".to_string() };
        assert_eq!(unknown.kind(), Some("typing"));

        let malformed =
            DecodeError::Malformed { kind: "refresh".to_string(), reason: "bad".to_string() };
        assert_eq!(malformed.kind(), Some("refresh"));

        assert_eq!(DecodeError::MissingType.kind(), None);
        assert_eq!(DecodeError::Json("eof".to_string()).kind(), None);
    }
}
