//! Pianoteq JSON-RPC gateway.
//!
//! Pianoteq started with `--serve` answers JSON-RPC 2.0 over HTTP POST on
//! `localhost:8081/jsonrpc`. `EngineGateway` is the seam the bridge, discovery
//! and the state monitor talk through; `JsonRpcClient` is the HTTP implementation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use pipq_types::{ActivationInfo, PianoteqInfo, PresetInfo};

pub const DEFAULT_RPC_URL: &str = "http://localhost:8081/jsonrpc";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub enum RpcError {
    /// Connection refused, timeout or a non-2xx status.
    Transport(String),
    /// The engine answered with a JSON-RPC `error` object.
    Remote { code: i64, message: String },
    /// The response was not the JSON shape we expected.
    Decode(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(msg) => write!(
                f,
                "failed to reach Pianoteq (is it running with --serve?): {}",
                msg
            ),
            Self::Remote { code, message } => write!(f, "remote error {}: {}", code, message),
            Self::Decode(msg) => write!(f, "invalid response: {}", msg),
        }
    }
}

impl std::error::Error for RpcError {}

impl From<serde_json::Error> for RpcError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

pub type RpcResult<T = ()> = Result<T, RpcError>;

/// Calls the controller makes on the audio engine.
///
/// Methods take `&self` so a gateway can be shared with reader threads; the
/// bridge still issues every mutating call from the UI thread.
pub trait EngineGateway: Send + Sync {
    /// Every preset the engine knows, in the engine's order.
    fn list_presets(&self) -> RpcResult<Vec<PresetInfo>>;

    /// Engine state, including the loaded preset.
    fn get_info(&self) -> RpcResult<PianoteqInfo>;

    fn get_activation_info(&self) -> RpcResult<ActivationInfo>;

    fn is_licensed(&self) -> RpcResult<bool> {
        Ok(self.get_activation_info()?.is_licensed())
    }

    /// Load a factory preset by name.
    fn load_preset(&self, name: &str) -> RpcResult;

    /// Randomize parameters; `amount` runs from 0.0 (no change) to 1.0.
    fn randomize_parameters(&self, amount: f64) -> RpcResult;

    /// Ask the engine to exit.
    fn quit(&self) -> RpcResult;
}

impl<G: EngineGateway + ?Sized> EngineGateway for std::sync::Arc<G> {
    fn list_presets(&self) -> RpcResult<Vec<PresetInfo>> {
        (**self).list_presets()
    }
    fn get_info(&self) -> RpcResult<PianoteqInfo> {
        (**self).get_info()
    }
    fn get_activation_info(&self) -> RpcResult<ActivationInfo> {
        (**self).get_activation_info()
    }
    fn is_licensed(&self) -> RpcResult<bool> {
        (**self).is_licensed()
    }
    fn load_preset(&self, name: &str) -> RpcResult {
        (**self).load_preset(name)
    }
    fn randomize_parameters(&self, amount: f64) -> RpcResult {
        (**self).randomize_parameters(amount)
    }
    fn quit(&self) -> RpcResult {
        (**self).quit()
    }
}

/// Blocking JSON-RPC client over `ureq`.
pub struct JsonRpcClient {
    url: String,
    agent: ureq::Agent,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            url: url.into(),
            agent,
            next_id: AtomicU64::new(0),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn call(&self, method: &str, params: Value) -> RpcResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let payload = request_envelope(method, params, id);
        log::trace!(target: "rpc", "-> {}", payload);

        let response = self
            .agent
            .post(&self.url)
            .set("Content-Type", "application/json")
            .send_json(payload)
            .map_err(|e| RpcError::Transport(e.to_string()))?;
        let body: Value = response
            .into_json()
            .map_err(|e| RpcError::Decode(e.to_string()))?;
        log::trace!(target: "rpc", "<- {}", body);

        parse_response(body)
    }

    fn call_as<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        let result = self.call(method, params)?;
        Ok(serde_json::from_value(result)?)
    }
}

impl Default for JsonRpcClient {
    fn default() -> Self {
        Self::new(DEFAULT_RPC_URL)
    }
}

pub(crate) fn request_envelope(method: &str, params: Value, id: u64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id,
    })
}

/// Pull `result` out of a response envelope, turning `error` into `RpcError::Remote`.
pub(crate) fn parse_response(mut body: Value) -> RpcResult<Value> {
    if let Some(error) = body.get("error").filter(|e| !e.is_null()) {
        return Err(RpcError::Remote {
            code: error.get("code").and_then(Value::as_i64).unwrap_or(0),
            message: error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error")
                .to_string(),
        });
    }
    match body.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(RpcError::Decode("response has neither result nor error".into())),
    }
}

/// `getInfo` and `getActivationInfo` wrap their object in a one-element list.
fn first_of<T: DeserializeOwned + Default>(result: Value) -> RpcResult<T> {
    match result {
        Value::Array(mut items) if !items.is_empty() => {
            Ok(serde_json::from_value(items.swap_remove(0))?)
        }
        Value::Array(_) | Value::Null => Ok(T::default()),
        other => Ok(serde_json::from_value(other)?),
    }
}

impl EngineGateway for JsonRpcClient {
    fn list_presets(&self) -> RpcResult<Vec<PresetInfo>> {
        log::debug!(target: "rpc", "fetching preset list");
        let presets: Vec<PresetInfo> = self.call_as("getListOfPresets", json!([]))?;
        log::info!(target: "rpc", "retrieved {} presets from Pianoteq", presets.len());
        Ok(presets)
    }

    fn get_info(&self) -> RpcResult<PianoteqInfo> {
        first_of(self.call("getInfo", json!([]))?)
    }

    fn get_activation_info(&self) -> RpcResult<ActivationInfo> {
        first_of(self.call("getActivationInfo", json!([]))?)
    }

    fn load_preset(&self, name: &str) -> RpcResult {
        log::debug!(target: "rpc", "loading preset: {}", name);
        self.call("loadPreset", json!([name, ""]))?;
        Ok(())
    }

    fn randomize_parameters(&self, amount: f64) -> RpcResult {
        log::debug!(target: "rpc", "randomizing parameters, amount={}", amount);
        self.call("randomizeParameters", json!([amount]))?;
        Ok(())
    }

    fn quit(&self) -> RpcResult {
        log::debug!(target: "rpc", "sending quit");
        self.call("quit", json!([]))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted in-memory engine for tests.

    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        LoadPreset(String),
        Randomize(f64),
        Quit,
    }

    #[derive(Default)]
    pub struct FakeEngine {
        pub presets: Mutex<Vec<PresetInfo>>,
        pub info: Mutex<Option<PianoteqInfo>>,
        pub licensed: Mutex<bool>,
        pub fail_writes: Mutex<bool>,
        pub calls: Mutex<Vec<Call>>,
    }

    impl FakeEngine {
        pub fn with_presets(presets: Vec<PresetInfo>) -> Self {
            let engine = Self::default();
            *engine.presets.lock().unwrap() = presets;
            *engine.licensed.lock().unwrap() = true;
            engine
        }

        pub fn set_current(&self, instrument: &str, preset: &str) {
            let mut info = PianoteqInfo::default();
            info.current_preset.instrument = instrument.to_string();
            info.current_preset.name = preset.to_string();
            *self.info.lock().unwrap() = Some(info);
        }

        pub fn set_modified(&self, modified: bool) {
            if let Some(info) = self.info.lock().unwrap().as_mut() {
                info.modified = modified;
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn clear_calls(&self) {
            self.calls.lock().unwrap().clear();
        }

        fn record(&self, call: Call) -> RpcResult {
            self.calls.lock().unwrap().push(call);
            if *self.fail_writes.lock().unwrap() {
                return Err(RpcError::Transport("connection refused".into()));
            }
            Ok(())
        }
    }

    pub fn preset(name: &str, instr: &str, class: &str, licensed: bool) -> PresetInfo {
        PresetInfo {
            name: name.to_string(),
            instr: instr.to_string(),
            instrument_class: class.to_string(),
            license_status: if licensed { "ok" } else { "demo" }.to_string(),
            ..Default::default()
        }
    }

    impl EngineGateway for FakeEngine {
        fn list_presets(&self) -> RpcResult<Vec<PresetInfo>> {
            Ok(self.presets.lock().unwrap().clone())
        }

        fn get_info(&self) -> RpcResult<PianoteqInfo> {
            self.info
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| RpcError::Transport("connection refused".into()))
        }

        fn get_activation_info(&self) -> RpcResult<ActivationInfo> {
            let error_msg = if *self.licensed.lock().unwrap() { "" } else { "Demo" };
            Ok(ActivationInfo {
                error_msg: error_msg.to_string(),
                ..Default::default()
            })
        }

        fn load_preset(&self, name: &str) -> RpcResult {
            let result = self.record(Call::LoadPreset(name.to_string()));
            if result.is_ok() {
                let instrument = self
                    .presets
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|p| p.name == name)
                    .map(|p| p.instr.clone())
                    .unwrap_or_default();
                self.set_current(&instrument, name);
            }
            result
        }

        fn randomize_parameters(&self, amount: f64) -> RpcResult {
            self.record(Call::Randomize(amount))
        }

        fn quit(&self) -> RpcResult {
            self.record(Call::Quit)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let env = request_envelope("loadPreset", json!(["K2 Bright", ""]), 7);
        assert_eq!(env["jsonrpc"], "2.0");
        assert_eq!(env["method"], "loadPreset");
        assert_eq!(env["params"], json!(["K2 Bright", ""]));
        assert_eq!(env["id"], 7);
    }

    #[test]
    fn error_object_becomes_remote_error() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32601, "message": "Method not found"}});
        match parse_response(body) {
            Err(RpcError::Remote { code, message }) => {
                assert_eq!(code, -32601);
                assert_eq!(message, "Method not found");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn null_error_is_success() {
        let body = json!({"jsonrpc": "2.0", "id": 1, "error": null, "result": true});
        assert_eq!(parse_response(body).unwrap(), json!(true));
    }

    #[test]
    fn missing_result_is_decode_error() {
        assert!(matches!(
            parse_response(json!({"jsonrpc": "2.0", "id": 1})),
            Err(RpcError::Decode(_))
        ));
    }

    #[test]
    fn info_is_unwrapped_from_list() {
        let info: PianoteqInfo =
            first_of(json!([{"current_preset": {"name": "K2 Soft"}, "modified": true}])).unwrap();
        assert_eq!(info.current_preset.name, "K2 Soft");
        assert!(info.modified);

        let empty: PianoteqInfo = first_of(json!([])).unwrap();
        assert_eq!(empty.current_preset.name, "");
    }

    #[test]
    fn unreachable_engine_is_transport_error() {
        // Port 9 (discard) is closed on test hosts.
        let client = JsonRpcClient::new("http://127.0.0.1:9/jsonrpc");
        assert!(matches!(client.get_info(), Err(RpcError::Transport(_))));
    }
}
