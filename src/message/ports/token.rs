//! Token resolver port.
//!
//! Protocol 4 inspection requests name an object directly; protocol 5 sends
//! code and a cursor. Downgrading needs something that can read the
//! identifier under the cursor.

/// Port for resolving the identifier at a cursor position.
pub trait TokenResolver: Send + Sync {
    /// Returns the identifier at `cursor_pos` (a character offset) in
    /// `code`, or an empty string when there is none.
    fn token_at_cursor(&self, code: &str, cursor_pos: usize) -> String;
}
