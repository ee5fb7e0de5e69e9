//! Annotation scripts: a recorded sequence of host actions replayed against
//! a session.

use anyhow::{Context, Result};
use inkpage_core::{AnnotationSession, HostConfig, PointerSample};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One host action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Replace the pen/eraser configuration.
    Configure(HostConfig),
    /// Feed a pointer sample (display coordinates).
    Pointer(PointerSample),
    /// Show a page (0-based).
    GoTo { page: usize },
    Next,
    Previous,
    Undo,
    Redo,
    Clear,
    /// Viewport width changed (e.g. rotation).
    Relayout { viewport_width: f64 },
}

/// A script file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// Width of the display the samples were captured on.
    pub viewport_width: f64,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Counters from a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub actions: usize,
    /// Navigation, undo, redo and clear requests that had no effect.
    pub ignored: usize,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid annotation script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("in {}", path.display()))
    }

    /// Replay every action against `session`, starting from `config`.
    pub fn replay(&self, session: &mut AnnotationSession, mut config: HostConfig) -> ReplayStats {
        let mut stats = ReplayStats::default();
        for action in &self.actions {
            stats.actions += 1;
            let applied = match action {
                Action::Configure(new_config) => {
                    config = new_config.clone();
                    config.set_pen_width(config.pen_width);
                    true
                }
                Action::Pointer(sample) => {
                    session.handle_pointer(*sample, &config);
                    true
                }
                Action::GoTo { page } => session.go_to_page(*page),
                Action::Next => session.next_page(),
                Action::Previous => session.previous_page(),
                Action::Undo => session.undo(),
                Action::Redo => session.redo(),
                Action::Clear => session.clear_page(),
                Action::Relayout { viewport_width } => {
                    session.relayout(*viewport_width);
                    true
                }
            };
            if !applied {
                log::debug!("No effect: {:?}", action);
                stats.ignored += 1;
            }
        }
        session.flush();
        stats
    }
}
