//! Word-granularity diff of two text runs.
use super::{DELETED_TAG, INSERTED_TAG};
use crate::align::{OpcodeKind, align};
use crate::event::{Event, Position};
use crate::words::split_words;

/// Diffs two text contents word-by-word into an inline event list.
///
/// The result contains only text events and flat `ins`/`del` wrappers, so it
/// can be spliced into any surrounding structure. Old-side events carry
/// `old_position`, new-side events `new_position`.
pub(super) fn diff_text(
    old: &str,
    old_position: Position,
    new: &str,
    new_position: Position,
) -> Vec<Event> {
    let old_words = split_words(old);
    let new_words = split_words(new);

    let mut result = Vec::new();

    for opcode in align(&old_words, &new_words) {
        match opcode.kind {
            OpcodeKind::Equal => {
                result.push(Event::text(old_words[opcode.old_range].concat()).at(old_position));
            }
            OpcodeKind::Delete => {
                push_marked_run(
                    &mut result,
                    &old_words[opcode.old_range],
                    DELETED_TAG,
                    old_position,
                );
            }
            OpcodeKind::Insert => {
                push_marked_run(
                    &mut result,
                    &new_words[opcode.new_range],
                    INSERTED_TAG,
                    new_position,
                );
            }
            OpcodeKind::Replace => {
                push_marked_run(
                    &mut result,
                    &old_words[opcode.old_range],
                    DELETED_TAG,
                    old_position,
                );
                push_marked_run(
                    &mut result,
                    &new_words[opcode.new_range],
                    INSERTED_TAG,
                    new_position,
                );
            }
        }
    }

    result
}

/// Wraps one run of changed words in `marker`, emitting the run's leading
/// whitespace outside the wrapper. An annotation tag must never open inside
/// collapsible whitespace, and a run that is nothing but whitespace gets no
/// wrapper at all.
fn push_marked_run(result: &mut Vec<Event>, words: &[&str], marker: &str, position: Position) {
    let run = words.concat();
    let trimmed = run.trim_start();
    let leading = &run[..run.len() - trimmed.len()];

    if !leading.is_empty() {
        result.push(Event::text(leading).at(position));
    }

    if !trimmed.is_empty() {
        result.push(Event::start(marker, Vec::new()).at(position));
        result.push(Event::text(trimmed).at(position));
        result.push(Event::end(marker).at(position));
    }
}
