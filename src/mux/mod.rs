//! Multiplexed console sessions across the fleet.
//!
//! One session, one pane per supplied command sequence, optional
//! input mirroring. Session setup is strictly sequential: panes are
//! created, every pane's commands are dispatched, the pre-attach hook
//! runs, and only then is the operator attached. That ordering matters
//! for the synchronize hook: enabling mirroring after dispatch means it
//! applies to the operator's interactive input, not to the per-pane
//! startup commands.

pub mod tmux;

pub use tmux::{Tmux, TmuxControl};

use crate::error::MuxError;

/// Commands typed into one pane once it exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaneSpec {
    commands: Vec<String>,
}

impl PaneSpec {
    pub fn new(commands: Vec<String>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

/// A console session: a reserved name plus ordered panes.
#[derive(Debug, Clone)]
pub struct SessionSpec {
    pub name: String,
    pub panes: Vec<PaneSpec>,
}

/// A no-argument action run against the session after panes exist and
/// their commands are dispatched, strictly before attach.
pub trait SessionHook {
    fn apply(&self, tmux: &dyn TmuxControl, session: &str) -> Result<(), MuxError>;
}

/// Mirrors interactive input to every pane in the session.
pub struct SynchronizePanes;

impl SessionHook for SynchronizePanes {
    fn apply(&self, tmux: &dyn TmuxControl, session: &str) -> Result<(), MuxError> {
        tmux.session_command(session, "setw synchronize-panes on")
    }
}

/// Create the session, dispatch every pane's commands, run the hook,
/// attach.
///
/// Refuses if a session with the reserved name already exists; reusing
/// one would silently attach the operator to stale panes.
pub fn create(
    tmux: &dyn TmuxControl,
    spec: &SessionSpec,
    hook: Option<&dyn SessionHook>,
) -> Result<(), MuxError> {
    if spec.panes.is_empty() {
        return Err(MuxError::EmptySession);
    }
    if tmux.has_session(&spec.name)? {
        return Err(MuxError::SessionExists(spec.name.clone()));
    }

    tmux.new_session(&spec.name)?;
    for _ in 1..spec.panes.len() {
        tmux.split_window(&spec.name)?;
        // Re-tile after every split; otherwise deep splits run out of room.
        tmux.select_layout(&spec.name, "tiled")?;
    }

    for (pane, pane_spec) in spec.panes.iter().enumerate() {
        for command in pane_spec.commands() {
            tmux.send_keys(&spec.name, pane, command)?;
        }
    }

    if let Some(hook) = hook {
        hook.apply(tmux, &spec.name)?;
    }

    tmux.attach(&spec.name)
}
