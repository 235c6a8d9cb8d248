use super::is_void_element;
use crate::event::Event;

/// Renders an event stream back into markup.
///
/// Text and attribute values are emitted verbatim, except that `"` inside an
/// attribute value becomes `&quot;` so the quoting can never break. End
/// events of void elements are skipped, the parser re-expands them from the
/// start tag alone; every other end event is rendered as a close tag.
/// Self-closing shorthand from the source does not survive a round trip.
#[must_use]
pub fn serialize_events(events: &[Event]) -> String {
    let mut result = String::new();

    for event in events {
        match event {
            Event::StartTag {
                name, attributes, ..
            } => {
                result.push('<');
                result.push_str(name);

                for (attribute, value) in attributes {
                    result.push(' ');
                    result.push_str(attribute);
                    result.push_str("=\"");
                    result.push_str(&value.replace('"', "&quot;"));
                    result.push('"');
                }

                result.push('>');
            }
            Event::EndTag { name, .. } if !is_void_element(name) => {
                result.push_str("</");
                result.push_str(name);
                result.push('>');
            }
            Event::EndTag { .. } => {}
            Event::Text { content, .. } => result.push_str(content),
        }
    }

    result
}
