//! Per-line classification state machine.
//!
//! Every input line goes through [`Classifier::classify`], which combines
//! entry detection ([`crate::date`]) with the date window
//! ([`crate::filter`]) and returns the [`Action`] the run loop must take.
//!
//! # States
//!
//! | State | Entry line | Continuation line |
//! |-------|------------|-------------------|
//! | `NotStarted` | filter verdict decides | [`Action::Drop`] |
//! | `Collecting` | filter verdict decides | [`Action::Append`] |
//! | `SkippingRange` | filter verdict decides | [`Action::Pass`] |
//! | `Stopped` | [`Action::Stop`] | [`Action::Stop`] |
//!
//! For entry lines the verdict maps as: `Keep` -> `Collecting` +
//! [`Action::Retain`], `BeforeStart` -> `SkippingRange` + [`Action::Pass`],
//! `AfterEnd` -> `Stopped` + [`Action::Stop`].
//!
//! Continuation lines never re-evaluate the filter; they share the fate of
//! the entry they follow.

use crate::date::{DateKey, LineKind, classify_line};
use crate::filter::{RangeFilter, Verdict};

/// Where the classifier is within the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClassifierState {
    /// No entry line seen yet; lines cannot be attributed to a date.
    #[default]
    NotStarted,
    /// The current entry is kept.
    Collecting,
    /// The current entry is earlier than the lower bound.
    SkippingRange,
    /// An entry later than the upper bound was seen. Final.
    Stopped,
}

/// What the run loop must do with a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Discard; the line precedes the first entry.
    Drop,
    /// Discard; the line is outside the date window.
    Pass,
    /// Keep as a continuation of the current group.
    Append,
    /// Keep as a new entry dated with the given key.
    Retain(DateKey),
    /// Stop reading the input; the line is not counted.
    Stop,
}

/// Computes the next state and action for one classified line.
///
/// Pure function: the whole decision table lives here so it can be tested
/// without any I/O.
pub fn transition(
    state: ClassifierState,
    kind: LineKind,
    filter: &RangeFilter,
) -> (ClassifierState, Action) {
    use ClassifierState::{Collecting, NotStarted, SkippingRange, Stopped};

    match (state, kind) {
        (Stopped, _) => (Stopped, Action::Stop),
        (NotStarted, LineKind::Continuation) => (NotStarted, Action::Drop),
        (Collecting, LineKind::Continuation) => (Collecting, Action::Append),
        (SkippingRange, LineKind::Continuation) => (SkippingRange, Action::Pass),
        (NotStarted | Collecting | SkippingRange, LineKind::Entry(key)) => {
            match filter.check(&key) {
                Verdict::Keep => (Collecting, Action::Retain(key)),
                Verdict::BeforeStart => (SkippingRange, Action::Pass),
                Verdict::AfterEnd => (Stopped, Action::Stop),
            }
        }
    }
}

/// Stateful wrapper around [`transition`] for a single run.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    state: ClassifierState,
    filter: RangeFilter,
}

impl Classifier {
    /// Creates a classifier in the `NotStarted` state.
    pub fn new(filter: RangeFilter) -> Self {
        Self {
            state: ClassifierState::NotStarted,
            filter,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> ClassifierState {
        self.state
    }

    /// Returns `true` once the upper bound has stopped the run.
    pub fn is_stopped(&self) -> bool {
        self.state == ClassifierState::Stopped
    }

    /// Classifies one line and advances the state.
    pub fn classify(&mut self, line: impl AsRef<[u8]>) -> Action {
        let (next, action) = transition(self.state, classify_line(line), &self.filter);
        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, "classifier state changed");
        }
        self.state = next;
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str) -> LineKind {
        LineKind::Entry(DateKey::new(key))
    }

    fn window() -> RangeFilter {
        RangeFilter::new()
            .with_not_before(20230908)
            .with_not_after(20230910)
    }

    #[test]
    fn test_not_started_drops_continuations() {
        let (state, action) = transition(
            ClassifierState::NotStarted,
            LineKind::Continuation,
            &RangeFilter::new(),
        );
        assert_eq!(state, ClassifierState::NotStarted);
        assert_eq!(action, Action::Drop);
    }

    #[test]
    fn test_not_started_drops_regardless_of_filter() {
        let (_, action) = transition(ClassifierState::NotStarted, LineKind::Continuation, &window());
        assert_eq!(action, Action::Drop);
    }

    #[test]
    fn test_first_entry_starts_collecting() {
        let (state, action) = transition(
            ClassifierState::NotStarted,
            entry("2023-09-08"),
            &RangeFilter::new(),
        );
        assert_eq!(state, ClassifierState::Collecting);
        assert_eq!(action, Action::Retain(DateKey::new("2023-09-08")));
    }

    #[test]
    fn test_first_entry_is_filtered_too() {
        let (state, action) = transition(ClassifierState::NotStarted, entry("2023-09-01"), &window());
        assert_eq!(state, ClassifierState::SkippingRange);
        assert_eq!(action, Action::Pass);

        let (state, action) = transition(ClassifierState::NotStarted, entry("2023-09-30"), &window());
        assert_eq!(state, ClassifierState::Stopped);
        assert_eq!(action, Action::Stop);
    }

    #[test]
    fn test_collecting_appends_continuations() {
        let (state, action) =
            transition(ClassifierState::Collecting, LineKind::Continuation, &window());
        assert_eq!(state, ClassifierState::Collecting);
        assert_eq!(action, Action::Append);
    }

    #[test]
    fn test_collecting_enters_skip_mode() {
        let (state, action) = transition(ClassifierState::Collecting, entry("2023-09-07"), &window());
        assert_eq!(state, ClassifierState::SkippingRange);
        assert_eq!(action, Action::Pass);
    }

    #[test]
    fn test_skipping_passes_continuations() {
        let (state, action) =
            transition(ClassifierState::SkippingRange, LineKind::Continuation, &window());
        assert_eq!(state, ClassifierState::SkippingRange);
        assert_eq!(action, Action::Pass);
    }

    #[test]
    fn test_skipping_resumes_on_kept_entry() {
        let (state, action) =
            transition(ClassifierState::SkippingRange, entry("2023-09-09"), &window());
        assert_eq!(state, ClassifierState::Collecting);
        assert_eq!(action, Action::Retain(DateKey::new("2023-09-09")));
    }

    #[test]
    fn test_skipping_stays_on_early_entry() {
        let (state, action) =
            transition(ClassifierState::SkippingRange, entry("2023-09-07"), &window());
        assert_eq!(state, ClassifierState::SkippingRange);
        assert_eq!(action, Action::Pass);
    }

    #[test]
    fn test_after_end_stops_from_any_live_state() {
        for state in [
            ClassifierState::NotStarted,
            ClassifierState::Collecting,
            ClassifierState::SkippingRange,
        ] {
            let (next, action) = transition(state, entry("2023-09-11"), &window());
            assert_eq!(next, ClassifierState::Stopped);
            assert_eq!(action, Action::Stop);
        }
    }

    #[test]
    fn test_stopped_is_final() {
        for kind in [entry("2023-09-09"), LineKind::Continuation] {
            let (state, action) = transition(ClassifierState::Stopped, kind, &window());
            assert_eq!(state, ClassifierState::Stopped);
            assert_eq!(action, Action::Stop);
        }
    }

    #[test]
    fn test_classifier_walks_lines() {
        let mut classifier = Classifier::new(RangeFilter::new().with_not_before(20230909));
        assert_eq!(classifier.classify("header"), Action::Drop);
        assert_eq!(classifier.classify("2023-09-08 old"), Action::Pass);
        assert_eq!(classifier.classify("  trace"), Action::Pass);
        assert_eq!(
            classifier.classify("2023-09-09 new"),
            Action::Retain(DateKey::new("2023-09-09"))
        );
        assert_eq!(classifier.classify("  trace"), Action::Append);
        assert_eq!(classifier.state(), ClassifierState::Collecting);
        assert!(!classifier.is_stopped());
    }

    #[test]
    fn test_non_ascii_digits_do_not_escape_the_window() {
        let mut classifier = Classifier::new(RangeFilter::new().with_not_after(20230908));
        assert!(matches!(classifier.classify("2023-09-08 a"), Action::Retain(_)));
        assert_eq!(classifier.classify("٢٠٢٣-٠٩-٠٨ not ascii"), Action::Append);
        assert_eq!(classifier.classify("2023-09-09 b"), Action::Stop);
        assert!(classifier.is_stopped());
    }
}
