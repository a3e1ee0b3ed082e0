use crate::format::stringify;
use serde_json::Value;
use std::fmt::{Arguments, Result, Write};

/// Convert a [`Value`] to HTML-safe text.
///
/// `null` becomes an empty string and numbers are written in decimal form.
/// Any other value is converted to text, and then `&`, `>`, `<`, `"`, `'`
/// and `` ` `` are replaced with entities. The ampersand is replaced before
/// any entity is introduced, so entities are never escaped twice.
///
/// # Examples
///
/// ```
/// use hashblock::escape;
/// use serde_json::json;
///
/// assert_eq!(escape(&json!("<3")), "&lt;3");
/// assert_eq!(escape(&json!("\"hey\"")), "&quot;hey&quot;");
/// assert_eq!(escape(&json!(12)), "12");
/// ```
pub fn escape(value: &Value) -> String {
    let mut buffer = String::new();
    // Writing into a String cannot fail.
    let _ = Pipe::new(&mut buffer).write_escaped(value);

    buffer
}

/// Wraps some underlying buffer by providing methods that write to it
/// in different formats.
pub struct Pipe<'buffer> {
    buffer: &'buffer mut (dyn Write + 'buffer),
}

impl<'buffer> Pipe<'buffer> {
    /// Create a new Pipe that writes to the given buffer.
    pub fn new(buffer: &'buffer mut String) -> Self {
        Self { buffer }
    }

    /// Write the given Value to the Pipe buffer, escaped for HTML.
    ///
    /// # Errors
    ///
    /// The Pipe supports all Value types, so the only error that will
    /// be returned is propagated from the underlying buffer.
    pub fn write_escaped(&mut self, value: &Value) -> Result {
        match value {
            Value::Null => Ok(()),
            Value::Number(_) => self.buffer.write_str(&stringify(value)),
            _ => self.write_escaped_str(&stringify(value)),
        }
    }

    /// Write the text to the buffer with HTML special characters replaced.
    fn write_escaped_str(&mut self, text: &str) -> Result {
        let mut last = 0;
        for (index, char) in text.char_indices() {
            let entity = match char {
                '&' => "&amp;",
                '>' => "&gt;",
                '<' => "&lt;",
                '"' => "&quot;",
                '\'' => "&#39;",
                '`' => "&#96;",
                _ => continue,
            };
            self.buffer.write_str(&text[last..index])?;
            self.buffer.write_str(entity)?;
            last = index + char.len_utf8();
        }

        self.buffer.write_str(&text[last..])
    }
}

impl Write for Pipe<'_> {
    #[inline]
    fn write_str(&mut self, s: &str) -> Result {
        Write::write_str(self.buffer, s)
    }

    #[inline]
    fn write_char(&mut self, c: char) -> Result {
        Write::write_char(self.buffer, c)
    }

    #[inline]
    fn write_fmt(&mut self, args: Arguments<'_>) -> Result {
        Write::write_fmt(self.buffer, args)
    }
}
