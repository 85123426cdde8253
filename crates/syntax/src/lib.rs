// Chunk: docs/chunks/line_labeling - Incremental per-line lexical labeling

//! linelabel-syntax: incremental, line-based lexical labeling.
//!
//! Each line of a document is labeled on its own. Labels that are still open
//! at the end of a line (block comments, triple-quoted strings, embedded
//! script regions) are offered to the next line as continuations, and edits
//! relabel only the lines they touch plus whatever the change cascades to.
//! Colors are precomputed per line so the renderer's per-character query does
//! no work beyond a lookup.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`Scheme`]: an immutable grammar of [`LabelRule`]s, a precedence list and
//!   sub-schemes for embedded regions, assembled with [`SchemeBuilder`] or
//!   compiled from a JSON [`SchemeDefinition`].
//!
//! - [`SchemeRegistry`]: maps file extensions and names to schemes; holds the
//!   built-in JavaScript, CSS, HTML and Python schemes.
//!
//! - [`LabeledDocument`]: per-line labels for a buffer, kept current through
//!   [`LineEdit`](linelabel_buffer::LineEdit) notifications and drained a
//!   bounded number of lines per host frame.
//!
//! The per-line pipeline is exposed as free functions: [`find_labels`]
//! (candidate delimiters and tokens), [`track_span`] (pairing and
//! continuations), [`update_depths`] (containment), [`label_line`] (dispatch
//! into sub-schemes) and [`build_runs`] (colors).
//!
//! # Example
//!
//! ```
//! use std::time::Instant;
//! use linelabel_buffer::LineBuffer;
//! use linelabel_syntax::{LabeledDocument, LabelerConfig, SchemeRegistry};
//!
//! let registry = SchemeRegistry::with_builtin();
//! let scheme = registry.scheme_for_extension("js").unwrap();
//!
//! let buffer = LineBuffer::from_str("/* a\nb */ let c = 1;");
//! let mut doc = LabeledDocument::new(scheme, LabelerConfig::default(), buffer.line_count());
//! doc.run_until_idle(Instant::now(), &buffer);
//!
//! // The comment opened on line 0 colors the start of line 1
//! assert_eq!(doc.color_at(1, 0), doc.color_at(0, 0));
//! ```

mod brackets;
pub mod builtin;
mod coloring;
mod config;
mod definition;
mod dispatch;
mod document;
mod error;
mod finder;
mod label;
mod refresh_queue;
mod registry;
mod resolver;
mod scheme;
mod theme;
mod throttle;
mod tracker;

pub use brackets::{check_document, BracketChecker, BracketProblem, BracketProblemKind};
pub use coloring::{active_labels, build_runs, color_at, run_color, styled_line, ColorRun};
pub use config::LabelerConfig;
pub use definition::{
    AdjustDefinition, ExtensionDefinition, LabelDefinition, NamedAdjust, PrecedenceDefinition,
    SchemeDefinition, SearchKind,
};
pub use dispatch::{label_line, DispatchTask, DEFAULT_MAX_DISPATCH_DEPTH};
pub use document::{LabeledDocument, LineLabels};
pub use error::{ConfigError, SchemeError};
pub use finder::find_labels;
pub use label::{
    group_by_name, label_state, Label, LabelEnd, LabelId, LabelKey, LabelKind, LabelMap,
    LabelName, LabelState,
};
pub use refresh_queue::{RefreshQueue, DEFAULT_LINES_PER_FRAME};
pub use registry::SchemeRegistry;
pub use resolver::update_depths;
pub use scheme::{
    Adjust, LabelExtension, LabelRule, Precedence, Scheme, SchemeBuilder, SearchStrategy,
    DEFAULT_SEPARATORS,
};
pub use theme::{catppuccin, LabelTheme};
pub use throttle::{RefreshThrottle, ThrottleDecision, DEFAULT_MIN_REFRESH_INTERVAL_MS};
pub use tracker::{offered_continuations, track_span};
