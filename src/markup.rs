//! Boundary between raw markup strings and the event stream the diff works
//! on.
mod parser;
mod serializer;

pub use parser::{ParseError, parse_events};
pub use serializer::serialize_events;

/// Elements that never take a close tag: parsed without expecting one and
/// serialized without emitting one.
/// List from <https://html.spec.whatwg.org/multipage/syntax.html#void-elements>.
fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;

    #[test_case("" ; "empty")]
    #[test_case("plain text only" ; "no tags")]
    #[test_case("<p>hello <b>world</b></p>" ; "nested tags")]
    #[test_case("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>" ; "multiline")]
    #[test_case("<a href=\"/x\" rel=\"nofollow\">x</a>" ; "attributes")]
    #[test_case("5 &gt; 3 &amp;&amp; 2 &lt; 4" ; "entities stay encoded")]
    #[test_case("a<br>b" ; "void element")]
    #[test_case("<img src=\"x.png\">" ; "void element with attributes")]
    fn test_round_trip(input: &str) {
        assert_eq!(serialize_events(&parse_events(input).unwrap()), input);
    }
}
