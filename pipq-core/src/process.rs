//! Pianoteq child process.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::rpc::EngineGateway;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct PianoteqProcess {
    executable: PathBuf,
    mapping_name: String,
    headless: bool,
    child: Option<Child>,
}

impl PianoteqProcess {
    pub fn new(executable: impl Into<PathBuf>, mapping_name: impl Into<String>, headless: bool) -> Self {
        Self {
            executable: executable.into(),
            mapping_name: mapping_name.into(),
            headless,
            child: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.pianoteq_executable(),
            config.midi_mapping_name(),
            config.headless(),
        )
    }

    /// Command-line arguments for a serving instance.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec![
            "--midimapping".to_string(),
            self.mapping_name.clone(),
            "--serve".to_string(),
            String::new(),
        ];
        if self.headless {
            args.push("--headless".to_string());
        }
        args
    }

    /// `Pianoteq --version` output on one line.
    pub fn version(&self) -> Result<String, String> {
        let output = Command::new(&self.executable)
            .arg("--version")
            .output()
            .map_err(|e| format!("failed to run {}: {}", self.executable.display(), e))?;
        if !output.status.success() {
            return Err(format!("{} --version exited with {}", self.executable.display(), output.status));
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text.lines().collect::<Vec<_>>().join(" "))
    }

    pub fn start(&mut self) -> std::io::Result<()> {
        log::info!(target: "process", "starting {}", self.executable.display());
        let child = Command::new(&self.executable)
            .args(self.launch_args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        log::debug!(target: "process", "Pianoteq pid {}", child.id());
        self.child = Some(child);
        Ok(())
    }

    pub fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    /// Ask the engine to quit over JSON-RPC, wait up to `timeout`, then kill it.
    pub fn quit<G: EngineGateway + ?Sized>(&mut self, gateway: &G, timeout: Duration) {
        if !self.is_running() {
            log::debug!(target: "process", "no Pianoteq process to quit");
            self.child = None;
            return;
        }

        log::info!(target: "process", "sending quit command to Pianoteq");
        // Pianoteq may drop the connection before answering
        if let Err(e) = gateway.quit() {
            log::debug!(target: "process", "quit request: {}", e);
        }

        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if !self.is_running() {
                log::info!(target: "process", "Pianoteq exited gracefully");
                self.child = None;
                return;
            }
            thread::sleep(POLL_INTERVAL);
        }

        log::warn!(target: "process", "Pianoteq did not exit within {:?}, killing it", timeout);
        self.kill();
    }

    pub fn kill(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                log::warn!(target: "process", "failed to kill Pianoteq: {}", e);
            }
            let _ = child.wait();
            log::info!(target: "process", "Pianoteq process killed");
        }
    }
}

impl Drop for PianoteqProcess {
    fn drop(&mut self) {
        if self.is_running() {
            self.kill();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::fake::{Call, FakeEngine};

    #[test]
    fn headless_launch_args() {
        let process = PianoteqProcess::new("/opt/Pianoteq", "Pi-PTQ-Mapping", true);
        assert_eq!(
            process.launch_args(),
            vec!["--midimapping", "Pi-PTQ-Mapping", "--serve", "", "--headless"]
        );

        let process = PianoteqProcess::new("/opt/Pianoteq", "Map", false);
        assert_eq!(process.launch_args().len(), 4);
    }

    #[test]
    fn quit_without_child_is_noop() {
        let engine = FakeEngine::default();
        let mut process = PianoteqProcess::new("/nonexistent/pianoteq", "Map", true);
        process.quit(&engine, Duration::from_millis(10));
        assert!(engine.calls().is_empty());
    }

    #[test]
    fn missing_executable_fails_to_start() {
        let mut process = PianoteqProcess::new("/nonexistent/pianoteq", "Map", true);
        assert!(process.start().is_err());
        assert!(process.version().is_err());
        assert!(!process.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn stubborn_child_is_killed_after_timeout() {
        let engine = FakeEngine::default();
        let mut process = PianoteqProcess::new("sleep", "Map", false);
        process.child = Some(Command::new("sleep").arg("30").spawn().unwrap());
        assert!(process.is_running());

        process.quit(&engine, Duration::from_millis(200));
        assert!(!process.is_running());
        assert_eq!(engine.calls(), vec![Call::Quit]);
    }
}
