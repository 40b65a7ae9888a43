use pixelwall_common::{PixelState, UpdateRequest, UpdateResponse};
use std::{fmt, io};

#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn fetch_pixels(&self) -> Result<PixelState, TransportError>;

    async fn send_update(&self, request: &UpdateRequest) -> Result<UpdateResponse, TransportError>;
}

#[derive(Debug)]
pub enum TransportError {
    Io(io::Error),
    Malformed(&'static str),
    /// Non-2xx status, with the server's own explanation if it gave one
    Status { code: u16, reason: Option<String> },
    Decode(serde_json::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "connection failed: {error}"),
            Self::Malformed(what) => write!(f, "malformed response: {what}"),
            Self::Status {
                code,
                reason: Some(reason),
            } => write!(f, "server answered {code}: {reason}"),
            Self::Status { code, reason: None } => write!(f, "server answered {code}"),
            Self::Decode(error) => write!(f, "invalid JSON body: {error}"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            Self::Decode(error) => Some(error),
            Self::Malformed(..) | Self::Status { .. } => None,
        }
    }
}

impl From<io::Error> for TransportError {
    fn from(error: io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(error: serde_json::Error) -> Self {
        Self::Decode(error)
    }
}
