use std::fmt;

use crate::rpc::RpcError;

/// Errors that stop startup.
#[derive(Debug)]
pub enum CoreError {
    /// Discovery produced no instrument with at least one preset.
    EmptyCatalog,
    /// The engine API never answered while waiting for it.
    EngineUnavailable(String),
    Rpc(RpcError),
    Io(std::io::Error),
}

impl From<RpcError> for CoreError {
    fn from(e: RpcError) -> Self {
        Self::Rpc(e)
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCatalog => write!(f, "no instruments found"),
            Self::EngineUnavailable(msg) => write!(f, "Pianoteq API unavailable: {}", msg),
            Self::Rpc(e) => write!(f, "JSON-RPC error: {}", e),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Rpc(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}
