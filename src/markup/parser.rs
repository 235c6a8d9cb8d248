//! Markup string to event stream.
//!
//! Covers the subset of HTML the surrounding system emits: plain tags with
//! optionally quoted attributes, self-closing syntax, and the standard void
//! elements. Entities are not decoded and text between tags is carried
//! verbatim. Comments, doctypes, and processing instructions are rejected.
use thiserror::Error;

use super::is_void_element;
use crate::event::{Attributes, Event, Position};

/// Error type for markup that cannot be turned into a well-formed stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A `<` was never followed by a matching `>`
    #[error("unterminated tag starting at {position}")]
    UnterminatedTag {
        /// Where the tag was opened
        position: Position,
    },

    /// A tag had no name or a name with unsupported characters
    #[error("invalid tag name at {position}")]
    InvalidTagName {
        /// Where the tag was opened
        position: Position,
    },

    /// A comment, doctype, or processing instruction was encountered
    #[error("unsupported markup construct at {position}")]
    UnsupportedMarkup {
        /// Where the construct starts
        position: Position,
    },

    /// An attribute could not be parsed
    #[error("malformed attribute in tag at {position}")]
    MalformedAttribute {
        /// Where the enclosing tag was opened
        position: Position,
    },

    /// A close tag did not match the innermost open tag
    #[error("close tag </{found}> at {position} does not match open tag <{expected}>")]
    MismatchedCloseTag {
        /// The innermost open tag name
        expected: String,
        /// The name in the close tag
        found: String,
        /// Where the close tag was found
        position: Position,
    },

    /// A close tag appeared with nothing open
    #[error("close tag </{found}> at {position} has no matching open tag")]
    UnexpectedCloseTag {
        /// The name in the close tag
        found: String,
        /// Where the close tag was found
        position: Position,
    },

    /// The document ended with tags still open
    #[error("tag <{name}> opened at {position} is never closed")]
    UnclosedTag {
        /// The name of the innermost unclosed tag
        name: String,
        /// Where that tag was opened
        position: Position,
    },
}

/// Parses a markup string into a well-formed event stream.
///
/// Self-closing tags and void elements come back as a start event directly
/// followed by its end event. Positions refer to the byte where the text run
/// or the tag's `<` starts.
///
/// ```
/// use markup_diff::{Event, parse_events};
///
/// let events = parse_events("<p>hi</p>")?;
/// assert_eq!(
///     events,
///     [Event::start("p", vec![]), Event::text("hi"), Event::end("p")]
/// );
/// # Ok::<(), markup_diff::ParseError>(())
/// ```
///
/// # Errors
///
/// Returns a [`ParseError`] when the input contains a malformed or
/// unbalanced tag, or a construct outside the supported subset.
pub fn parse_events(input: &str) -> Result<Vec<Event>, ParseError> {
    let bytes = input.as_bytes();
    let mut events = Vec::new();
    let mut open: Vec<(String, Position)> = Vec::new();

    let mut cursor = 0;
    let mut line = 1;

    while cursor < bytes.len() {
        let position = Position::new(line, cursor);

        if bytes[cursor] == b'<' {
            let end = find_tag_end(bytes, cursor)
                .ok_or(ParseError::UnterminatedTag { position })?;
            let content = &input[cursor + 1..end];

            parse_tag(content, position, &mut events, &mut open)?;

            line += count_lines(content);
            cursor = end + 1;
        } else {
            let end = next_tag_start(bytes, cursor);
            let content = &input[cursor..end];

            events.push(Event::text(content).at(position));

            line += count_lines(content);
            cursor = end;
        }
    }

    if let Some((name, position)) = open.pop() {
        return Err(ParseError::UnclosedTag { name, position });
    }

    Ok(events)
}

/// Byte index of the `>` closing the tag that starts at `start`, skipping
/// over quoted attribute values. All bytes inspected are ASCII, so the index
/// is always a character boundary.
fn find_tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;

    for (i, byte) in bytes.iter().enumerate().skip(start + 1) {
        match quote {
            Some(q) => {
                if *byte == q {
                    quote = None;
                }
            }
            None => match byte {
                b'"' | b'\'' => quote = Some(*byte),
                b'>' => return Some(i),
                _ => {}
            },
        }
    }

    None
}

fn next_tag_start(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|byte| *byte == b'<')
        .map_or(bytes.len(), |i| start + i)
}

fn count_lines(text: &str) -> usize { text.bytes().filter(|byte| *byte == b'\n').count() }

/// Handles the inside of one `<...>` pair.
fn parse_tag(
    content: &str,
    position: Position,
    events: &mut Vec<Event>,
    open: &mut Vec<(String, Position)>,
) -> Result<(), ParseError> {
    if content.starts_with('!') || content.starts_with('?') {
        return Err(ParseError::UnsupportedMarkup { position });
    }

    if let Some(rest) = content.strip_prefix('/') {
        let name = rest.trim();
        if !is_valid_name(name) {
            return Err(ParseError::InvalidTagName { position });
        }

        return match open.pop() {
            Some((expected, _)) if expected == name => {
                events.push(Event::end(name).at(position));
                Ok(())
            }
            Some((expected, _)) => Err(ParseError::MismatchedCloseTag {
                expected,
                found: name.to_owned(),
                position,
            }),
            None => Err(ParseError::UnexpectedCloseTag {
                found: name.to_owned(),
                position,
            }),
        };
    }

    let trimmed = content.trim_end();
    let (body, self_closing) = match trimmed.strip_suffix('/') {
        Some(body) => (body, true),
        None => (trimmed, false),
    };

    let name_len = body.bytes().take_while(|byte| is_name_byte(*byte)).count();
    let name = &body[..name_len];
    if !is_valid_name(name) {
        return Err(ParseError::InvalidTagName { position });
    }

    let attributes = parse_attributes(&body[name_len..], position)?;

    events.push(Event::start(name, attributes).at(position));

    if self_closing || is_void_element(name) {
        events.push(Event::end(name).at(position));
    } else {
        open.push((name.to_owned(), position));
    }

    Ok(())
}

/// Parses ` name="value"` pairs. A name without `=` becomes a pair with an
/// empty value; bare values run until the next whitespace.
fn parse_attributes(mut rest: &str, position: Position) -> Result<Attributes, ParseError> {
    let mut attributes = Vec::new();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(attributes);
        }

        let name_len = rest.bytes().take_while(|byte| is_name_byte(*byte)).count();
        let name = &rest[..name_len];
        if !is_valid_name(name) {
            return Err(ParseError::MalformedAttribute { position });
        }

        rest = &rest[name_len..];

        let Some(after_equals) = rest.strip_prefix('=') else {
            attributes.push((name.to_owned(), String::new()));
            continue;
        };

        let (value, remainder) = parse_attribute_value(after_equals, position)?;
        attributes.push((name.to_owned(), value.to_owned()));
        rest = remainder;
    }
}

fn parse_attribute_value(rest: &str, position: Position) -> Result<(&str, &str), ParseError> {
    if let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let inner = &rest[1..];
        let end = inner
            .find(quote)
            .ok_or(ParseError::MalformedAttribute { position })?;

        return Ok((&inner[..end], &inner[end + 1..]));
    }

    let end = rest
        .bytes()
        .position(|byte| byte.is_ascii_whitespace())
        .unwrap_or(rest.len());
    if end == 0 {
        return Err(ParseError::MalformedAttribute { position });
    }

    Ok((&rest[..end], &rest[end..]))
}

/// Tag and attribute names are ASCII alphanumeric plus `-` and start with a
/// letter.
fn is_valid_name(name: &str) -> bool {
    name.as_bytes().first().is_some_and(u8::is_ascii_alphabetic)
        && name.bytes().all(is_name_byte)
}

fn is_name_byte(byte: u8) -> bool { byte.is_ascii_alphanumeric() || byte == b'-' }
