//! Recording tmux mock.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::error::MuxError;
use crate::mux::TmuxControl;

/// One observed tmux call, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmuxCall {
    NewSession(String),
    SplitWindow(String),
    SelectLayout { session: String, layout: String },
    SendKeys {
        session: String,
        pane: usize,
        command: String,
    },
    SessionCommand { session: String, command: String },
    Attach(String),
}

/// Records every call instead of driving a real tmux.
#[derive(Default)]
pub struct RecordingTmux {
    existing: Mutex<HashSet<String>>,
    calls: Mutex<Vec<TmuxCall>>,
}

impl RecordingTmux {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend a session named `session` already exists.
    pub fn with_existing(self, session: &str) -> Self {
        self.existing.lock().unwrap().insert(session.to_string());
        self
    }

    pub fn calls(&self) -> Vec<TmuxCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: TmuxCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl TmuxControl for RecordingTmux {
    fn has_session(&self, session: &str) -> Result<bool, MuxError> {
        Ok(self.existing.lock().unwrap().contains(session))
    }

    fn new_session(&self, session: &str) -> Result<(), MuxError> {
        self.existing.lock().unwrap().insert(session.to_string());
        self.record(TmuxCall::NewSession(session.to_string()));
        Ok(())
    }

    fn split_window(&self, session: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::SplitWindow(session.to_string()));
        Ok(())
    }

    fn select_layout(&self, session: &str, layout: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::SelectLayout {
            session: session.to_string(),
            layout: layout.to_string(),
        });
        Ok(())
    }

    fn send_keys(&self, session: &str, pane: usize, command: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::SendKeys {
            session: session.to_string(),
            pane,
            command: command.to_string(),
        });
        Ok(())
    }

    fn session_command(&self, session: &str, command: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::SessionCommand {
            session: session.to_string(),
            command: command.to_string(),
        });
        Ok(())
    }

    fn attach(&self, session: &str) -> Result<(), MuxError> {
        self.record(TmuxCall::Attach(session.to_string()));
        Ok(())
    }
}
