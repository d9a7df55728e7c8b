//! Projection of an absolute cursor onto the line that contains it.
//!
//! Protocol 5 completion and inspection requests send a whole cell plus an
//! absolute cursor offset; protocol 4 sent one line and a cursor relative
//! to it. Offsets count characters, not bytes.

/// Returns the line containing `cursor_pos` and the cursor offset relative
/// to the start of that line.
///
/// The returned line keeps its terminator. A cursor sitting exactly on a
/// line terminator boundary belongs to the line it ends. Offsets past the
/// end of `code` resolve to the last line, clamped to its length; empty
/// input yields `("", 0)`.
///
/// # Examples
///
/// ```
/// use msgspec_adapter::message::domain::code_to_line;
///
/// assert_eq!(code_to_line("abc\ndef\n", 5), ("def\n", 1));
/// ```
#[must_use]
pub fn code_to_line(code: &str, cursor_pos: usize) -> (&str, usize) {
    let mut remaining = cursor_pos;
    let mut last = "";
    for line in LinesInclusive::new(code) {
        let len = line.chars().count();
        if remaining <= len {
            return (line, remaining);
        }
        remaining -= len;
        last = line;
    }
    (last, remaining.min(last.chars().count()))
}

/// Splits text into lines, keeping `\n`, `\r\n` or `\r` terminators.
struct LinesInclusive<'a> {
    rest: &'a str,
}

impl<'a> LinesInclusive<'a> {
    const fn new(text: &'a str) -> Self {
        Self { rest: text }
    }
}

impl<'a> Iterator for LinesInclusive<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let end = match self.rest.find(['\n', '\r']) {
            Some(idx) => {
                let crlf = self
                    .rest
                    .get(idx..)
                    .is_some_and(|tail| tail.starts_with("\r\n"));
                if crlf { idx + 2 } else { idx + 1 }
            }
            None => self.rest.len(),
        };
        let (line, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(line)
    }
}
