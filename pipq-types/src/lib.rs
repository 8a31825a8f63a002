//! # pipq-types
//!
//! Shared type definitions for pi-pianoteq.
//! This crate holds the instrument/preset data model, the `ClientApi` surface that
//! UI clients program against, and the payload types of Pianoteq's JSON-RPC API.
//! It has no dependencies beyond serde so that third-party clients can depend on it
//! without pulling in the backend.

pub mod api;
pub mod instrument;
pub mod rpc;

pub use api::{ClientApi, ExitCallback, API_VERSION};
pub use instrument::{Instrument, Preset, SelectionKey};
pub use rpc::{ActivationInfo, CurrentPreset, PianoteqInfo, PresetInfo};
