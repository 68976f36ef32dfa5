//! Read-only dump configuration.
//!
//! The serializer never owns process configuration; the caller hands it a
//! `DumpConfig` snapshot per call.

use serde::{Deserialize, Serialize};

/// Output grammar selector.
///
/// The set is closed and matched exhaustively, so an out-of-range selector
/// is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Term syntax: `{name(args). ...}`.
    Default,
    /// Graphviz DOT graph description.
    Dot,
    /// Raw introspection dump, one line per atom.
    Debug,
}

/// Per-call dump flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Render boundary markers as ordinary atoms instead of eliding them.
    pub show_markers: bool,
    /// Append attached rule-set identifiers after a membrane's children.
    pub show_rulesets: bool,
    /// Selected output grammar.
    pub format: OutputFormat,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            show_markers: false,
            show_rulesets: true,
            format: OutputFormat::Default,
        }
    }
}
