//! Pairwise reconciliation of a rewritten region.
//!
//! The two sides of a `Replace` opcode are walked index-by-index rather than
//! re-aligned: inside a rewrite, positional correspondence is the best guess
//! there is. Same-variant pairs merge in place, mismatched pairs degrade to
//! an independent deletion plus insertion.
use super::text::diff_text;
use super::{DiffBuilder, DiffContext, REPLACED_ATTRIBUTE, REPLACED_ATTRIBUTE_VALUE};
use crate::event::Event;

/// Merges the old and new slices of one `Replace` opcode into the output.
///
/// The shorter side simply runs out, at which point the remainder of the
/// longer side is flushed as a plain deletion or insertion.
pub(super) fn reconcile_replace(builder: &mut DiffBuilder, old: &[Event], new: &[Event]) {
    let mut old_iter = old.iter();
    let mut new_iter = new.iter();

    loop {
        match (old_iter.next(), new_iter.next()) {
            (Some(old_event), Some(new_event)) => reconcile_pair(builder, old_event, new_event),
            (Some(old_event), None) => builder.push(old_event.clone(), DiffContext::Deleted),
            (None, Some(new_event)) => builder.push(new_event.clone(), DiffContext::Inserted),
            (None, None) => break,
        }
    }
}

fn reconcile_pair(builder: &mut DiffBuilder, old_event: &Event, new_event: &Event) {
    match (old_event, new_event) {
        // the new tag goes forward, marked so renderers can style the swap;
        // the old tag is discarded
        (
            Event::StartTag { .. },
            Event::StartTag {
                name,
                attributes,
                position,
            },
        ) => {
            let mut attributes = attributes.clone();
            attributes.push((
                REPLACED_ATTRIBUTE.to_owned(),
                REPLACED_ATTRIBUTE_VALUE.to_owned(),
            ));

            builder.push(
                Event::start(name.clone(), attributes).at(*position),
                DiffContext::Unchanged,
            );
        }
        // close with whichever of the two names actually matches the output
        (Event::EndTag { name: old_name, .. }, Event::EndTag { name: new_name, .. }) => {
            if builder.innermost_open() == Some(new_name.as_str()) {
                builder.push(new_event.clone(), DiffContext::Unchanged);
            } else if builder.innermost_open() == Some(old_name.as_str()) {
                builder.push(old_event.clone(), DiffContext::Unchanged);
            } else {
                log::trace!(
                    "dropping paired closes {old_name:?}/{new_name:?}: neither matches the \
                     innermost open tag"
                );
            }
        }
        (
            Event::Text {
                content: old_content,
                position: old_position,
            },
            Event::Text {
                content: new_content,
                position: new_position,
            },
        ) => {
            builder.extend_inline(diff_text(
                old_content,
                *old_position,
                new_content,
                *new_position,
            ));
        }
        // dissimilar variants are never merged pairwise
        _ => {
            builder.push(old_event.clone(), DiffContext::Deleted);
            builder.push(new_event.clone(), DiffContext::Inserted);
        }
    }
}
