// src/context.rs

//! Identity of one watchdog invocation, threaded into log events.

/// Captured once at startup and passed into the engine explicitly, instead
/// of each log site reading host state ambiently.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Hostname of the machine running the watchdog.
    pub hostname: String,
    /// Pid of the watchdog process itself.
    pub pid: u32,
}

impl RunContext {
    /// Capture the current host and process identity.
    pub fn capture() -> Self {
        let hostname = nix::unistd::gethostname()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_else(|_| "unknown".to_string());

        Self {
            hostname,
            pid: std::process::id(),
        }
    }
}
