use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Remote-execution channel errors, always attributable to a host.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("host {host} unreachable: {reason}")]
    Unreachable { host: String, reason: String },

    #[error("failed to spawn ssh for {host}: {source}")]
    Spawn {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("command on {host} exited with status {status}: {stderr}")]
    CommandFailed {
        host: String,
        status: i32,
        stderr: String,
    },

    #[error("no pid reported for process launched on {host}")]
    MissingPid { host: String },
}

/// Cluster lifecycle errors.
#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("cluster startup timed out after {timeout_secs}s; unready: {}", unready.join(", "))]
    StartupTimeout {
        timeout_secs: u64,
        unready: Vec<String>,
    },

    #[error("failed to launch {role} on {host}: {source}")]
    LaunchFailed {
        role: String,
        host: String,
        #[source]
        source: RemoteError,
    },

    #[error("cluster startup interrupted by operator")]
    Interrupted,
}

/// Console session multiplexer errors.
#[derive(Error, Debug)]
pub enum MuxError {
    #[error("session '{0}' already exists; attach with `tmux attach -t {0}` or kill it first")]
    SessionExists(String),

    #[error("a session needs at least one pane")]
    EmptySession,

    #[error("tmux {verb} failed: {stderr}")]
    Command { verb: &'static str, stderr: String },

    #[error("failed to run tmux: {0}")]
    Io(#[source] std::io::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error(transparent)]
    Mux(#[from] MuxError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
