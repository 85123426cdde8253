// Chunk: docs/chunks/line_labeling - Per-line records, continuation hand-off and frame draining
//!
//! The labeled document.
//!
//! [`LabeledDocument`] keeps one record per buffer line: the labels computed
//! for it, the precomputed color runs the renderer reads, the continuations
//! it inherited from its predecessor and the ones it offers its successor.
//!
//! Work is split the way a frame-driven editor needs it:
//!
//! - Edits (`apply_edits`) only shift records and queue refreshes.
//! - `on_frame` relabels a bounded number of queued lines.
//! - Queries (`color_at`, `styled_line`) never compute labels.
//!
//! A line never reaches into its neighbor's labels. After relabeling, it
//! compares what it now offers with what its successor inherited; on a
//! difference it updates the successor's inherited set and queues the
//! successor, which relabels and cascades further on a later pop.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use linelabel_buffer::{Color, LineEdit, LineSource, StyledLine};

use crate::coloring::{self, ColorRun};
use crate::config::LabelerConfig;
use crate::dispatch::label_line;
use crate::label::{self, Label, LabelKey, LabelMap, LabelState};
use crate::refresh_queue::RefreshQueue;
use crate::scheme::Scheme;
use crate::throttle::{RefreshThrottle, ThrottleDecision};
use crate::tracker::offered_continuations;

/// The labeling result of one line.
#[derive(Debug, Clone, Default)]
pub struct LineLabels {
    labels: Vec<Label>,
    runs: Vec<ColorRun>,
    offered: BTreeMap<LabelKey, Label>,
}

impl LineLabels {
    /// Labels in resolver order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn runs(&self) -> &[ColorRun] {
        &self.runs
    }

    /// Continuations handed to the next line.
    pub fn offered(&self) -> &BTreeMap<LabelKey, Label> {
        &self.offered
    }
}

#[derive(Debug, Default)]
struct LineRecord {
    /// Text as of the last relabel; `None` until the first one.
    labeled_text: Option<String>,
    labels: LineLabels,
    /// Continuations inherited from the previous line.
    continued: BTreeMap<LabelKey, Label>,
    throttle: RefreshThrottle,
}

/// Labels for every line of a buffer, kept current incrementally.
pub struct LabeledDocument {
    scheme: Arc<Scheme>,
    config: LabelerConfig,
    lines: Vec<LineRecord>,
    queue: RefreshQueue,
}

impl LabeledDocument {
    /// Creates a document for a buffer of `line_count` lines.
    ///
    /// Every line is queued for its first labeling.
    pub fn new(scheme: Arc<Scheme>, config: LabelerConfig, line_count: usize) -> Self {
        let line_count = line_count.max(1);
        let mut queue = RefreshQueue::new();
        for line in 0..line_count {
            queue.push(line);
        }
        Self {
            scheme,
            config,
            lines: (0..line_count).map(|_| LineRecord::default()).collect(),
            queue,
        }
    }

    pub fn scheme(&self) -> &Arc<Scheme> {
        &self.scheme
    }

    pub fn config(&self) -> &LabelerConfig {
        &self.config
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Switches to another scheme, discarding all labels.
    pub fn set_scheme(&mut self, scheme: Arc<Scheme>) {
        self.scheme = scheme;
        for record in &mut self.lines {
            *record = LineRecord::default();
        }
        self.queue.clear();
        for line in 0..self.lines.len() {
            self.queue.push(line);
        }
    }

    // ==================== Edits and requests ====================

    /// Applies buffer edit notifications in order.
    ///
    /// Changed lines go through the refresh throttle. Inserted lines get fresh
    /// records, seeded with what their predecessor offers, and are queued.
    /// When lines are removed, the line that now follows the gap is queued so
    /// any continuation it held from a removed line is rechecked.
    pub fn apply_edits(&mut self, edits: &[LineEdit], now: Instant) {
        for edit in edits {
            match *edit {
                LineEdit::Changed(line) => self.request_refresh(line, now, false),
                LineEdit::Inserted { at, count } => self.insert_lines(at, count),
                LineEdit::Removed { at, count } => self.remove_lines(at, count),
            }
        }
    }

    fn insert_lines(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        let at = at.min(self.lines.len());
        let seed = at
            .checked_sub(1)
            .map(|prev| self.lines[prev].labels.offered.clone())
            .unwrap_or_default();

        for _ in 0..count {
            self.lines.insert(at, LineRecord::default());
        }
        self.lines[at].continued = seed;

        self.queue.insert_lines(at, count);
        for line in at..at + count {
            self.queue.push(line);
        }
        tracing::debug!(at, count, "lines inserted");
    }

    fn remove_lines(&mut self, at: usize, count: usize) {
        if count == 0 || at >= self.lines.len() {
            return;
        }
        let end = (at + count).min(self.lines.len());
        self.lines.drain(at..end);
        self.queue.remove_lines(at, end - at);

        if self.lines.is_empty() {
            self.lines.push(LineRecord::default());
        }
        if at < self.lines.len() {
            self.queue.push(at);
        }
        tracing::debug!(at, count = end - at, "lines removed");
    }

    /// Asks for a line to be relabeled.
    ///
    /// Unless `force` is set or the line was never labeled, a line is
    /// relabeled at most once per minimum interval; early requests schedule
    /// one deferred re-check.
    pub fn request_refresh(&mut self, line: usize, now: Instant, force: bool) {
        let interval = self.config.min_refresh_interval();
        let Some(record) = self.lines.get_mut(line) else {
            return;
        };
        match record.throttle.request(now, interval, force) {
            ThrottleDecision::Run => {
                self.queue.push(line);
            }
            ThrottleDecision::Deferred(due) => {
                tracing::trace!(line, ?due, "refresh deferred");
            }
            ThrottleDecision::Coalesced => {}
        }
    }

    /// Queues every line, bypassing the throttle.
    pub fn refresh_all(&mut self) {
        for line in 0..self.lines.len() {
            self.queue.push(line);
        }
    }

    // ==================== Frame processing ====================

    /// Processes one host frame.
    ///
    /// Deferred re-checks that are due join the queue, then a batch of at
    /// most `lines_per_frame` queued lines is taken and relabeled. Returns
    /// how many were.
    pub fn on_frame(&mut self, now: Instant, source: &dyn LineSource) -> usize {
        for (line, record) in self.lines.iter_mut().enumerate() {
            if record.throttle.take_due(now) {
                self.queue.push(line);
            }
        }

        // Lines queued while this batch runs wait for the next frame
        let budget = self.config.frame_budget();
        let batch: Vec<usize> = std::iter::from_fn(|| self.queue.pop())
            .take(budget)
            .collect();
        let mut relabeled = 0;
        for line in batch {
            if line >= self.lines.len() {
                continue;
            }
            self.relabel(line, now, source);
            relabeled += 1;
        }
        if relabeled > 0 {
            tracing::trace!(relabeled, remaining = self.queue.len(), "frame drained");
        }
        relabeled
    }

    /// Runs frames at `now` until the queue is empty.
    ///
    /// Deferred re-checks not yet due stay deferred. Returns the number of
    /// lines relabeled.
    pub fn run_until_idle(&mut self, now: Instant, source: &dyn LineSource) -> usize {
        let mut total = 0;
        loop {
            let relabeled = self.on_frame(now, source);
            if relabeled == 0 {
                return total;
            }
            total += relabeled;
        }
    }

    /// Relabels a line immediately, bypassing throttle and queue.
    ///
    /// Neighbor effects are still queued.
    pub fn refresh_now(&mut self, line: usize, now: Instant, source: &dyn LineSource) {
        if line < self.lines.len() {
            self.relabel(line, now, source);
        }
    }

    fn relabel(&mut self, line: usize, now: Instant, source: &dyn LineSource) {
        let text = source.line(line).unwrap_or("");
        self.queue.remove(line);

        // Inherit exactly what the predecessor offers once it has been labeled
        if let Some(prev) = line.checked_sub(1) {
            if self.lines[prev].labeled_text.is_some() {
                let offered = self.lines[prev].labels.offered.clone();
                let record = &mut self.lines[line];
                for key in record.continued.keys() {
                    if !offered.contains_key(key) {
                        tracing::debug!(line, label = &*key.name, "continuation revoked");
                    }
                }
                record.continued = offered;
            }
        } else {
            self.lines[line].continued.clear();
        }

        let scheme = Arc::clone(&self.scheme);
        let max_depth = self.config.max_dispatch_depth;
        let record = &mut self.lines[line];
        let labels = label_line(text, &scheme, &record.continued, max_depth);
        let runs = coloring::build_runs(&labels, text.chars().count(), &scheme);
        let offered = offered_continuations(&labels);
        tracing::debug!(line, labels = labels.len(), "relabeled line");

        record.labels = LineLabels {
            labels,
            runs,
            offered,
        };
        record.labeled_text = Some(text.to_string());
        record.throttle.mark_ran(now);

        let offered = self.lines[line].labels.offered.clone();
        if let Some(next) = self.lines.get_mut(line + 1) {
            if next.continued != offered {
                next.continued = offered;
                self.queue.push(line + 1);
            }
        }
    }

    // ==================== Queries ====================

    /// Color of a character, from the runs of the last relabel.
    pub fn color_at(&self, line: usize, index: usize) -> Color {
        self.lines
            .get(line)
            .and_then(|record| coloring::run_color(&record.labels.runs, index))
            .unwrap_or_else(|| self.scheme.base_color())
    }

    /// Splits `text`, the line's current text, into colored spans.
    pub fn styled_line(&self, line: usize, text: &str) -> StyledLine {
        let runs = self
            .lines
            .get(line)
            .map(|record| record.labels.runs.as_slice())
            .unwrap_or(&[]);
        coloring::styled_line(runs, text, self.scheme.base_color())
    }

    /// Labels of a line in resolver order.
    pub fn labels(&self, line: usize) -> &[Label] {
        self.lines
            .get(line)
            .map(|record| record.labels.labels.as_slice())
            .unwrap_or(&[])
    }

    /// Labels of a line grouped by name.
    pub fn label_map(&self, line: usize) -> LabelMap {
        label::group_by_name(self.labels(line))
    }

    /// Full labeling result of a line, including what it offers the next one.
    pub fn line_labels(&self, line: usize) -> Option<&LineLabels> {
        self.lines.get(line).map(|record| &record.labels)
    }

    /// State of a label name on a line.
    pub fn label_state(&self, line: usize, name: &str) -> LabelState {
        label::label_state(self.labels(line), name)
    }

    /// Continuations the line inherited from its predecessor.
    pub fn inherited(&self, line: usize) -> Option<&BTreeMap<LabelKey, Label>> {
        self.lines.get(line).map(|record| &record.continued)
    }

    /// Text the line had when it was last labeled.
    pub fn labeled_text(&self, line: usize) -> Option<&str> {
        self.lines
            .get(line)
            .and_then(|record| record.labeled_text.as_deref())
    }

    pub fn is_labeled(&self, line: usize) -> bool {
        self.labeled_text(line).is_some()
    }

    /// Returns true if the line waits in the refresh queue.
    pub fn is_pending(&self, line: usize) -> bool {
        self.queue.contains(line)
    }

    /// Returns true if the line has a deferred re-check scheduled.
    pub fn is_deferred(&self, line: usize) -> bool {
        self.lines
            .get(line)
            .map_or(false, |record| record.throttle.is_deferred())
    }

    /// Returns true while lines wait in the refresh queue.
    pub fn has_pending_work(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }
}
