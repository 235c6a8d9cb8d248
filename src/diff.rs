//! Two-way structural diff over event streams.
//!
//! The top-level pass aligns whole events and emits them with insertion and
//! deletion annotations. Rewritten regions get a finer pairwise
//! reconciliation (`replace`), and paired text runs are re-diffed at word
//! granularity (`text`). A tag stack guards the output so it stays balanced
//! no matter how the two inputs relate to each other.
mod replace;
mod text;

use crate::align::{Opcode, OpcodeKind, align};
use crate::event::Event;
use crate::markup::{ParseError, parse_events, serialize_events};
use crate::tag_stack::TagStack;

/// Name of the element wrapped around inserted text.
pub const INSERTED_TAG: &str = "ins";

/// Name of the element wrapped around deleted text.
pub const DELETED_TAG: &str = "del";

/// Attribute added to a start tag that replaced another one.
pub const REPLACED_ATTRIBUTE: &str = "data-replaced";

/// Value of [`REPLACED_ATTRIBUTE`].
pub const REPLACED_ATTRIBUTE_VALUE: &str = "true";

/// Which side of the diff the events being emitted belong to. Decides whether
/// text runs get wrapped in an annotation element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DiffContext {
    Unchanged,
    Deleted,
    Inserted,
}

impl DiffContext {
    fn marker(self) -> Option<&'static str> {
        match self {
            DiffContext::Unchanged => None,
            DiffContext::Deleted => Some(DELETED_TAG),
            DiffContext::Inserted => Some(INSERTED_TAG),
        }
    }
}

/// Diffs two well-formed event streams into one annotated, well-formed stream.
///
/// Content only present in `old` comes back wrapped in a `del` element,
/// content only present in `new` in an `ins` element, and start tags that
/// replaced another tag carry a [`REPLACED_ATTRIBUTE`]. Equal streams are
/// returned as-is with no annotations at all.
///
/// ```
/// use markup_diff::{Event, diff_events, serialize_events};
///
/// let old = [Event::text("hello world")];
/// let new = [Event::text("hello mars")];
///
/// let merged = serialize_events(&diff_events(&old, &new));
/// assert_eq!(merged, "hello <del>world</del><ins>mars</ins>");
/// ```
#[must_use]
pub fn diff_events(old: &[Event], new: &[Event]) -> Vec<Event> {
    let opcodes = fold_lone_equals(align(old, new));
    log::debug!(
        "aligned {} old and {} new events into {} opcodes",
        old.len(),
        new.len(),
        opcodes.len()
    );

    let mut builder = DiffBuilder::new();

    for opcode in opcodes {
        match opcode.kind {
            OpcodeKind::Equal => {
                for event in &old[opcode.old_range] {
                    builder.push(event.clone(), DiffContext::Unchanged);
                }
            }
            OpcodeKind::Delete => {
                for event in &old[opcode.old_range] {
                    builder.push(event.clone(), DiffContext::Deleted);
                }
            }
            OpcodeKind::Insert => {
                for event in &new[opcode.new_range] {
                    builder.push(event.clone(), DiffContext::Inserted);
                }
            }
            OpcodeKind::Replace => {
                replace::reconcile_replace(
                    &mut builder,
                    &old[opcode.old_range],
                    &new[opcode.new_range],
                );
            }
        }
    }

    builder.finish()
}

/// Diffs two markup documents and renders the annotated result.
///
/// Convenience wrapper around [`parse_events`](crate::parse_events),
/// [`diff_events`], and [`serialize_events`](crate::serialize_events) for
/// callers that work with markup strings rather than event streams.
///
/// ```
/// let merged = markup_diff::diff_markup("<p>hello world</p>", "<p>hello mars</p>")?;
///
/// assert_eq!(merged, "<p>hello <del>world</del><ins>mars</ins></p>");
/// # Ok::<(), markup_diff::ParseError>(())
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] when either input is not well-formed markup.
pub fn diff_markup(old: &str, new: &str) -> Result<String, ParseError> {
    let old_events = parse_events(old)?;
    let new_events = parse_events(new)?;

    Ok(serialize_events(&diff_events(&old_events, &new_events)))
}

/// Folds a single-event `Equal` opcode sandwiched between two edits into one
/// surrounding `Replace`.
///
/// A one-event match inside an otherwise rewritten region would split the
/// rewrite into fragments and pair unrelated events with each other during
/// reconciliation. Folding keeps the region together; repeated folds collapse
/// chains of fragments left to right.
fn fold_lone_equals(opcodes: Vec<Opcode>) -> Vec<Opcode> {
    let mut result: Vec<Opcode> = Vec::with_capacity(opcodes.len());

    for opcode in opcodes {
        if opcode.kind != OpcodeKind::Equal {
            if let [.., before, middle] = result.as_slice() {
                if middle.kind == OpcodeKind::Equal
                    && middle.old_range.len() == 1
                    && before.kind != OpcodeKind::Equal
                {
                    log::trace!("folding lone equal {:?} into a replace", middle.old_range);

                    let folded = Opcode {
                        kind: OpcodeKind::Replace,
                        old_range: before.old_range.start..opcode.old_range.end,
                        new_range: before.new_range.start..opcode.new_range.end,
                    };
                    result.truncate(result.len() - 2);
                    result.push(folded);
                    continue;
                }
            }
        }

        result.push(opcode);
    }

    result
}

/// Accumulates the output stream while keeping it tag-balanced.
///
/// Start tags are recorded on the stack as they are emitted; an end tag is
/// only emitted when it closes the innermost open tag, otherwise it is
/// dropped. Whatever is still open when the diff completes is force-closed by
/// [`DiffBuilder::finish`].
struct DiffBuilder {
    output: Vec<Event>,
    stack: TagStack,
}

impl DiffBuilder {
    fn new() -> Self {
        DiffBuilder {
            output: Vec::new(),
            stack: TagStack::new(),
        }
    }

    /// Emits one input event. Tags update the stack in every context; text is
    /// wrapped in the context's annotation element unless it is blank.
    fn push(&mut self, event: Event, context: DiffContext) {
        match event {
            Event::StartTag { ref name, .. } => {
                self.stack.open(name);
                self.output.push(event);
            }
            Event::EndTag { ref name, .. } => {
                if self.stack.try_close(name) {
                    self.output.push(event);
                } else {
                    log::trace!("dropping close of {name:?}: it does not match the innermost open tag");
                }
            }
            Event::Text {
                ref content,
                position,
            } => match context.marker() {
                Some(marker) if !content.trim().is_empty() => {
                    self.output.push(Event::start(marker, Vec::new()).at(position));
                    self.output.push(event);
                    self.output.push(Event::end(marker).at(position));
                }
                _ => self.output.push(event),
            },
        }
    }

    /// Appends pre-balanced events without touching the tag stack. Only used
    /// for word-level diff results, which contain nothing but text and
    /// annotation wrappers.
    fn extend_inline(&mut self, events: Vec<Event>) { self.output.extend(events); }

    /// The name of the innermost open tag in the output, if any.
    fn innermost_open(&self) -> Option<&str> { self.stack.last() }

    /// Force-closes everything left open and returns the finished stream.
    fn finish(mut self) -> Vec<Event> {
        let position = self.output.last().map(Event::position).unwrap_or_default();

        for name in self.stack.unwind() {
            log::trace!("force closing {name:?} at the end of the stream");
            self.output.push(Event::end(name).at(position));
        }

        self.output
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rendered(old: &[Event], new: &[Event]) -> String { serialize_events(&diff_events(old, new)) }

    #[test]
    fn test_text_edit() {
        let old = [Event::text("hello world")];
        let new = [Event::text("hello mars")];

        assert_eq!(rendered(&old, &new), "hello <del>world</del><ins>mars</ins>");
    }

    #[test]
    fn test_identity() {
        let events = [
            Event::start("p", vec![]),
            Event::text("a"),
            Event::end("p"),
        ];

        assert_eq!(diff_events(&events, &events), events);
    }

    #[test]
    fn test_delete_whole_document() {
        let old = [
            Event::start("em", vec![]),
            Event::text("x"),
            Event::end("em"),
        ];

        assert_eq!(rendered(&old, &[]), "<em><del>x</del></em>");
    }

    #[test]
    fn test_insert_whole_document() {
        let new = [
            Event::start("em", vec![]),
            Event::text("x"),
            Event::end("em"),
        ];

        assert_eq!(rendered(&[], &new), "<em><ins>x</ins></em>");
    }

    #[test]
    fn test_text_wrapped_into_new_element() {
        let old = [Event::text("foo")];
        let new = [
            Event::start("b", vec![]),
            Event::text("foo"),
            Event::end("b"),
        ];

        assert_eq!(rendered(&old, &new), "<del>foo</del><b><ins>foo</ins></b>");
    }

    #[test]
    fn test_whitespace_only_text_is_not_annotated() {
        let old = [Event::text("a"), Event::text(" "), Event::text("b")];
        let new = [Event::text("a")];

        // the blank run survives unwrapped instead of becoming an empty `del`
        assert_eq!(rendered(&old, &new), "a <del>b</del>");
    }

    #[test]
    fn test_renamed_wrapper_is_marked_replaced() {
        let old = [
            Event::start("p", vec![]),
            Event::text("x"),
            Event::end("p"),
        ];
        let new = [
            Event::start("q", vec![]),
            Event::text("x"),
            Event::end("q"),
        ];

        assert_eq!(rendered(&old, &new), "<q data-replaced=\"true\">x</q>");
    }

    #[test]
    fn test_output_is_balanced_on_structural_mismatch() {
        let old = [
            Event::start("a", vec![]),
            Event::start("b", vec![]),
            Event::end("b"),
            Event::end("a"),
        ];
        let new = [
            Event::start("c", vec![]),
            Event::text("t"),
            Event::end("c"),
            Event::start("d", vec![]),
            Event::end("d"),
        ];

        let output = diff_events(&old, &new);

        let mut open = Vec::new();
        for event in &output {
            match event {
                Event::StartTag { name, .. } => open.push(name.clone()),
                Event::EndTag { name, .. } => assert_eq!(open.pop().as_deref(), Some(name.as_str())),
                Event::Text { .. } => {}
            }
        }
        assert_eq!(open, Vec::<String>::new());
    }

    #[test]
    fn test_diff_markup() {
        let merged = diff_markup("<p>one</p>", "<p>two</p>").unwrap();

        assert_eq!(merged, "<p><del>one</del><ins>two</ins></p>");
    }

    #[test]
    fn test_diff_markup_rejects_malformed_input() {
        assert!(diff_markup("<p>", "fine").is_err());
        assert!(diff_markup("fine", "</p>").is_err());
    }

    #[test]
    fn test_fold_lone_equals() {
        let insert = |old: usize, new_range: std::ops::Range<usize>| Opcode {
            kind: OpcodeKind::Insert,
            old_range: old..old,
            new_range,
        };
        let equal = |old_range: std::ops::Range<usize>, shift: usize| Opcode {
            kind: OpcodeKind::Equal,
            new_range: old_range.start + shift..old_range.end + shift,
            old_range,
        };

        // a lone equal between two inserts collapses into one replace
        assert_eq!(
            fold_lone_equals(vec![insert(0, 0..1), equal(0..1, 1), insert(1, 2..3)]),
            vec![Opcode {
                kind: OpcodeKind::Replace,
                old_range: 0..1,
                new_range: 0..3,
            }]
        );

        // a longer equal stays untouched
        let kept = vec![insert(0, 0..1), equal(0..2, 1), insert(2, 3..4)];
        assert_eq!(fold_lone_equals(kept.clone()), kept);

        // an equal at the stream boundary stays untouched
        let leading = vec![equal(0..1, 0), insert(1, 1..2)];
        assert_eq!(fold_lone_equals(leading.clone()), leading);
    }

    #[test]
    fn test_folding_cascades() {
        let opcodes = align(
            &[Event::text("a"), Event::text("b"), Event::text("c")],
            &[
                Event::text("x"),
                Event::text("a"),
                Event::text("y"),
                Event::text("b"),
                Event::text("z"),
            ],
        );

        let folded = fold_lone_equals(opcodes);

        assert_eq!(folded.len(), 1);
        assert_eq!(folded[0].kind, OpcodeKind::Replace);
        assert_eq!(folded[0].old_range, 0..3);
        assert_eq!(folded[0].new_range, 0..5);
    }
}
