/// Splits text into maximal runs of whitespace and non-whitespace characters.
///
/// The returned slices alternate between the two kinds and concatenate back to
/// the input exactly, so the split is lossless. Whitespace-ness follows
/// `char::is_whitespace`.
///
/// ## Example
///
/// ```not_rust
/// "Hi there!" -> ["Hi", " ", "there!"]
/// ```
#[must_use]
pub fn split_words(text: &str) -> Vec<&str> {
    let mut result = Vec::new();

    let mut previous_boundary_index = 0;
    let mut previous_char_is_whitespace = text.chars().next().is_none_or(char::is_whitespace);

    for (i, c) in text.char_indices() {
        let is_current_char_whitespace = c.is_whitespace();
        if previous_char_is_whitespace != is_current_char_whitespace {
            result.push(&text[previous_boundary_index..i]);
            previous_boundary_index = i;
        }

        previous_char_is_whitespace = is_current_char_whitespace;
    }

    if previous_boundary_index < text.len() {
        result.push(&text[previous_boundary_index..]);
    }

    result
}
