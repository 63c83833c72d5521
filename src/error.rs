//! Error taxonomy for the outbound PDU pipeline. Every fallible operation in this
//! crate surfaces one of these variants synchronously; none are recovered locally
//! (the access/transport/network layers never retry).
use thiserror::Error;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum CoreError {
    #[error("app_idx does not name a known application key or device key")]
    UnknownKey,

    #[error("model message is empty or exceeds the unsegmented payload limit ({0} bytes, max 11)")]
    PayloadTooLarge(usize),

    #[error("address or TTL is not valid for an outbound PDU")]
    InvalidAddress,

    #[error("a key in the network document is not exactly 16 bytes")]
    InvalidKeyMaterial,

    #[error("sequence number would exceed the 24-bit sequence space")]
    SequenceExhausted,

    #[error("malformed network document: {0}")]
    MalformedDocument(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::MalformedDocument(e.to_string())
    }
}
