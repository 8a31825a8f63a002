//! Client lifecycle shared by the terminal and hardware-panel clients.
//!
//! A client is built before the engine is ready so it can show progress, gets
//! its API once discovery finishes, and only then runs its input loop:
//! `Constructed -> Ready -> Running -> Finished`. Calls made out of order are
//! errors, not silently tolerated.

use std::fmt;
use std::io;
use std::str::FromStr;

use pipq_core::state_monitor::StateMonitor;
use pipq_types::ClientApi;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Constructed,
    Ready,
    Running,
    Finished,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleState::Constructed => "constructed",
            LifecycleState::Ready => "ready",
            LifecycleState::Running => "running",
            LifecycleState::Finished => "finished",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleError {
    pub operation: &'static str,
    pub state: LifecycleState,
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot call {} while the client is {}", self.operation, self.state)
    }
}

impl std::error::Error for LifecycleError {}

#[derive(Debug)]
pub enum ClientError {
    Lifecycle(LifecycleError),
    Io(io::Error),
    UnknownClient(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Lifecycle(e) => write!(f, "{}", e),
            ClientError::Io(e) => write!(f, "terminal error: {}", e),
            ClientError::UnknownClient(name) => write!(
                f,
                "unknown client '{}' (use --list-clients to see the choices)",
                name
            ),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Lifecycle(e) => Some(e),
            ClientError::Io(e) => Some(e),
            ClientError::UnknownClient(_) => None,
        }
    }
}

impl From<LifecycleError> for ClientError {
    fn from(e: LifecycleError) -> Self {
        ClientError::Lifecycle(e)
    }
}

impl From<io::Error> for ClientError {
    fn from(e: io::Error) -> Self {
        ClientError::Io(e)
    }
}

/// Tracks where a client is in its lifecycle.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: LifecycleState,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: LifecycleState::Constructed,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Fail unless the client is in `expected`.
    pub fn require(
        &self,
        operation: &'static str,
        expected: LifecycleState,
    ) -> Result<(), LifecycleError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(LifecycleError {
                operation,
                state: self.state,
            })
        }
    }

    pub fn advance(&mut self, next: LifecycleState) {
        log::debug!(target: "client", "lifecycle {} -> {}", self.state, next);
        self.state = next;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

pub trait Client {
    /// Show startup progress. Only valid before `set_api`.
    fn show_loading_message(&mut self, message: &str) -> Result<(), ClientError>;

    /// Hand over the API. Only valid once, before `start`.
    fn set_api(&mut self, api: Box<dyn ClientApi>) -> Result<(), ClientError>;

    /// Receive engine-side change notifications. Clients that have no use for
    /// them drop the monitor.
    fn attach_state_monitor(&mut self, monitor: StateMonitor) {
        drop(monitor);
    }

    /// Run the input loop until the user quits or the device shuts down.
    fn start(&mut self) -> Result<(), ClientError>;
}

/// Selectable clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientKind {
    Cli,
    Gfxhat,
}

impl ClientKind {
    pub const ALL: [ClientKind; 2] = [ClientKind::Gfxhat, ClientKind::Cli];

    pub fn name(self) -> &'static str {
        match self {
            ClientKind::Cli => "cli",
            ClientKind::Gfxhat => "gfxhat",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ClientKind::Cli => "Interactive terminal client with menus, search and a log view",
            ClientKind::Gfxhat => "Six-button 128x64 LCD panel (runs in the terminal emulator)",
        }
    }
}

impl FromStr for ClientKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cli" => Ok(ClientKind::Cli),
            "gfxhat" => Ok(ClientKind::Gfxhat),
            other => Err(ClientError::UnknownClient(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_rejects_out_of_order_calls() {
        let mut lifecycle = Lifecycle::new();
        assert!(lifecycle.require("set_api", LifecycleState::Constructed).is_ok());

        let err = lifecycle.require("start", LifecycleState::Ready).unwrap_err();
        assert_eq!(err.state, LifecycleState::Constructed);
        assert_eq!(err.to_string(), "cannot call start while the client is constructed");

        lifecycle.advance(LifecycleState::Ready);
        assert!(lifecycle.require("set_api", LifecycleState::Constructed).is_err());
        assert!(lifecycle.require("start", LifecycleState::Ready).is_ok());
    }

    #[test]
    fn client_kind_parses_names() {
        assert_eq!("cli".parse::<ClientKind>().unwrap(), ClientKind::Cli);
        assert_eq!(" GfxHat ".parse::<ClientKind>().unwrap(), ClientKind::Gfxhat);
        assert!(matches!(
            "web".parse::<ClientKind>(),
            Err(ClientError::UnknownClient(name)) if name == "web"
        ));
    }
}
