//! # pipq-core
//!
//! Backend library for pi-pianoteq: the instrument catalog, the selection state
//! machine and the bridge that keeps the Pianoteq engine in step with it,
//! independent of any UI.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pipq_core::bridge::{Backend, ShellPowerControl};
//! use pipq_core::config::Config;
//! use pipq_core::discovery::load_library;
//! use pipq_core::rpc::JsonRpcClient;
//! use pipq_types::ClientApi;
//!
//! let config = Config::load();
//! let gateway = Arc::new(JsonRpcClient::new(config.rpc_url()));
//! let library = load_library(&*gateway, false, config.api_attempts(), config.api_interval())?;
//! let power = ShellPowerControl::new(config.shutdown_command());
//! let mut api = Backend::new(Arc::new(library), gateway, Box::new(power))?;
//! api.set_preset_next();
//! ```
//!
//! ## Module Overview
//!
//! - [`library`]: immutable catalog of instruments and presets
//! - [`selector`]: `(instrument, preset)` cursor with wrap-around navigation
//! - [`bridge`]: `Backend`, the `ClientApi` implementation, and `PowerControl`
//! - [`rpc`]: `EngineGateway` trait and the JSON-RPC client
//! - [`discovery`]: grouping the engine's preset list into instruments
//! - [`display_name`]: short preset names for menus
//! - [`search`]: search filtering for the terminal client
//! - [`state_monitor`]: background poller for engine-side changes
//! - [`process`]: starting and stopping the Pianoteq executable
//! - [`config`]: TOML configuration (embedded default, user override, environment)

pub mod bridge;
pub mod config;
pub mod discovery;
pub mod display_name;
pub mod error;
pub mod library;
pub mod process;
pub mod rpc;
pub mod search;
pub mod selector;
pub mod state_monitor;

pub use error::CoreError;
pub use library::Library;
pub use selector::Selector;
