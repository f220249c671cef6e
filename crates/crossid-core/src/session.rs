//! Exploration session state.
//!
//! The session is an immutable value: every transition consumes `&self` and
//! returns a new state, so the owner replaces it wholesale instead of
//! mutating in place. The drill-down history is a list of levels plus the
//! selected namespace per level; selecting a namespace at level *i*
//! invalidates everything deeper, because deeper levels were computed from
//! the now-replaced selection.
//!
//! Expansion responses arrive asynchronously, so each history-shaping
//! transition bumps a generation counter. An [`ExpansionTicket`] captures
//! the generation at request time; a response carrying a stale ticket is
//! refused, which prevents a slow response from overwriting a newer
//! selection.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{classify, split_input, Level};
use crate::error::{CrossidError, Result};
use crate::patterns::PatternRegistry;

/// Where the input batch comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    TextField,
    Csv,
}

/// Which panel the session is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActiveTab {
    #[default]
    Explore,
    Data,
}

/// Proof that an expansion request was issued against the current history.
///
/// Obtained from [`SessionState::expansion_ticket`] before the network call
/// and handed back to [`SessionState::apply_expansion`] with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpansionTicket {
    generation: u64,
}

/// Immutable exploration session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub input_mode: InputMode,
    pub active_tab: ActiveTab,
    pub menu_open: bool,
    levels: Vec<Level>,
    path: Vec<String>,
    generation: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Drill-down levels, oldest first.
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Selected namespace name per level, oldest first.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Selected namespace at `index`, if one has been chosen.
    pub fn selected(&self, index: usize) -> Option<&str> {
        self.path.get(index).map(String::as_str)
    }

    /// Full classification entry behind the selection at `index`.
    pub fn selected_result(&self, index: usize) -> Option<&crate::ClassificationResult> {
        let name = self.path.get(index)?;
        self.levels.get(index)?.iter().find(|r| &r.name == name)
    }

    // ── UI-chrome transitions (do not touch the history) ──────────────────

    pub fn with_input_mode(&self, input_mode: InputMode) -> Self {
        Self {
            input_mode,
            ..self.clone()
        }
    }

    pub fn with_tab(&self, active_tab: ActiveTab) -> Self {
        Self {
            active_tab,
            ..self.clone()
        }
    }

    pub fn toggled_menu(&self) -> Self {
        Self {
            menu_open: !self.menu_open,
            ..self.clone()
        }
    }

    // ── History-shaping transitions ───────────────────────────────────────

    /// Classify a fresh input batch, replacing the whole history with a
    /// single level and auto-selecting its top-ranked namespace.
    ///
    /// A batch that matches nothing leaves the session unchanged.
    pub fn classify_input(&self, text: &str, registry: &PatternRegistry) -> Self {
        self.with_classification(classify(&split_input(text), registry))
    }

    /// As [`classify_input`](Self::classify_input), from an already-built level.
    pub fn with_classification(&self, level: Level) -> Self {
        let Some(top) = level.first() else {
            return self.clone();
        };
        debug!(namespaces = level.len(), top = %top.name, "classification replaces history");
        Self {
            path: vec![top.name.clone()],
            levels: vec![level],
            generation: self.generation + 1,
            ..self.clone()
        }
    }

    /// Select `name` at level `index`.
    ///
    /// Levels and selections deeper than `index` are discarded: they were
    /// derived from the previous selection and are no longer valid.
    /// Selections are contiguous: `index` may replace an existing
    /// selection or extend the path by one, never leave a gap.
    pub fn select_namespace(&self, index: usize, name: &str) -> Result<Self> {
        let level = self
            .levels
            .get(index)
            .ok_or(CrossidError::LevelOutOfRange {
                index,
                len: self.levels.len(),
            })?;
        if !level.iter().any(|r| r.name == name) {
            return Err(CrossidError::UnknownNamespace {
                name: name.to_string(),
                index,
            });
        }
        if index > self.path.len() {
            return Err(CrossidError::LevelOutOfRange {
                index,
                len: self.path.len(),
            });
        }

        let mut next = self.clone();
        next.levels.truncate(index + 1);
        next.path.truncate(index + 1);
        if next.path.len() == index {
            next.path.push(name.to_string());
        } else {
            next.path[index] = name.to_string();
        }
        next.generation += 1;
        debug!(index, name, depth = next.levels.len(), "namespace selected");
        Ok(next)
    }

    /// Capture the current generation before issuing an expansion request.
    pub fn expansion_ticket(&self) -> ExpansionTicket {
        ExpansionTicket {
            generation: self.generation,
        }
    }

    /// Append an expansion level produced for `ticket`.
    ///
    /// A ticket issued before any later history-shaping transition is
    /// stale; its response is refused and the session stays unchanged.
    pub fn apply_expansion(&self, ticket: ExpansionTicket, level: Level) -> Result<Self> {
        if ticket.generation != self.generation {
            return Err(CrossidError::StaleExpansion {
                ticket: ticket.generation,
                current: self.generation,
            });
        }
        let mut next = self.clone();
        next.levels.push(level);
        next.generation += 1;
        debug!(depth = next.levels.len(), "expansion level appended");
        Ok(next)
    }

    /// Drop the whole session back to its initial state.
    pub fn reset(&self) -> Self {
        Self::default()
    }
}
