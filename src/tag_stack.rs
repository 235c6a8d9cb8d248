/// Tracks the tag names currently open in the output stream being built.
///
/// The stack only ever reflects what was actually emitted, independent of how
/// either input nests its tags. Closes that do not match the innermost open
/// tag are refused so the output can never become mis-nested.
#[derive(Debug, Default)]
pub struct TagStack {
    names: Vec<String>,
}

impl TagStack {
    #[must_use]
    pub fn new() -> Self { TagStack::default() }

    /// Records an emitted start tag.
    pub fn open(&mut self, name: &str) { self.names.push(name.to_owned()); }

    /// Pops the innermost open tag if it is named `name`. Returns whether the
    /// close may be emitted.
    pub fn try_close(&mut self, name: &str) -> bool {
        if self.names.last().is_some_and(|top| top == name) {
            self.names.pop();
            true
        } else {
            false
        }
    }

    /// The innermost open tag name, if any.
    #[must_use]
    pub fn last(&self) -> Option<&str> { self.names.last().map(String::as_str) }

    /// Removes every open tag and returns the names in the order they must be
    /// closed, innermost first.
    #[must_use]
    pub fn unwind(&mut self) -> Vec<String> {
        let mut names = std::mem::take(&mut self.names);
        names.reverse();
        names
    }
}
