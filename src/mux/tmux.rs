//! Driving tmux(1).

use std::process::Command;

use crate::error::MuxError;

/// The session primitives the multiplexer needs from a terminal
/// multiplexer. Narrow on purpose: create, split, send keys, broadcast a
/// session-level command, attach.
pub trait TmuxControl {
    fn has_session(&self, session: &str) -> Result<bool, MuxError>;
    fn new_session(&self, session: &str) -> Result<(), MuxError>;
    fn split_window(&self, session: &str) -> Result<(), MuxError>;
    fn select_layout(&self, session: &str, layout: &str) -> Result<(), MuxError>;
    /// Type `command` into pane `pane` (0-based) and press enter.
    fn send_keys(&self, session: &str, pane: usize, command: &str) -> Result<(), MuxError>;
    /// Run a session-level tmux command, e.g. `setw synchronize-panes on`.
    fn session_command(&self, session: &str, command: &str) -> Result<(), MuxError>;
    /// Blocking interactive hand-off; returns when the operator detaches.
    fn attach(&self, session: &str) -> Result<(), MuxError>;
}

/// The real tmux binary.
pub struct Tmux;

impl Tmux {
    fn run(&self, verb: &'static str, args: &[&str]) -> Result<(), MuxError> {
        let output = Command::new("tmux")
            .args(args)
            .output()
            .map_err(MuxError::Io)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(MuxError::Command {
                verb,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

impl TmuxControl for Tmux {
    fn has_session(&self, session: &str) -> Result<bool, MuxError> {
        // tmux exits non-zero when the session does not exist.
        let output = Command::new("tmux")
            .args(["has-session", "-t", session])
            .output()
            .map_err(MuxError::Io)?;
        Ok(output.status.success())
    }

    fn new_session(&self, session: &str) -> Result<(), MuxError> {
        self.run("new-session", &["new-session", "-d", "-s", session])
    }

    fn split_window(&self, session: &str) -> Result<(), MuxError> {
        self.run("split-window", &["split-window", "-t", session])
    }

    fn select_layout(&self, session: &str, layout: &str) -> Result<(), MuxError> {
        self.run("select-layout", &["select-layout", "-t", session, layout])
    }

    fn send_keys(&self, session: &str, pane: usize, command: &str) -> Result<(), MuxError> {
        let target = format!("{session}.{pane}");
        self.run("send-keys", &["send-keys", "-t", &target, command, "C-m"])
    }

    fn session_command(&self, session: &str, command: &str) -> Result<(), MuxError> {
        let mut parts = command.split_whitespace();
        let verb = parts.next().ok_or(MuxError::Command {
            verb: "session-command",
            stderr: "empty command".to_string(),
        })?;
        let mut args = vec![verb, "-t", session];
        args.extend(parts);
        self.run("session-command", &args)
    }

    fn attach(&self, session: &str) -> Result<(), MuxError> {
        let status = Command::new("tmux")
            .args(["attach-session", "-t", session])
            .status()
            .map_err(MuxError::Io)?;
        if status.success() {
            Ok(())
        } else {
            Err(MuxError::Command {
                verb: "attach-session",
                stderr: format!("tmux attach exited with {status}"),
            })
        }
    }
}
