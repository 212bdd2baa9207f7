//! Low-level DSN writer.
//!
//! [`DsnBuilder`] appends `key=value` tokens separated by single spaces.
//! In [`Mode::Escaped`], single quotes inside values are backslash-escaped
//! and values containing a space are wrapped in single quotes:
//!
//! ```rust
//! use pqdsn::builder::{DsnBuilder, Mode};
//!
//! let mut b = DsnBuilder::new(Mode::Escaped);
//! b.add_text("user", "space man");
//! b.add_text("password", "it's");
//! b.add_int("port", 5432);
//! assert_eq!(b.finish(), r"user='space man' password=it\'s port=5432");
//! ```

/// How text values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Values are written verbatim.
    #[default]
    Plain,
    /// Quotes are backslash-escaped; values with spaces are single-quoted.
    Escaped,
}

/// Accumulates DSN tokens into an owned buffer.
///
/// A builder is created for one DSN and consumed by [`DsnBuilder::finish`].
#[derive(Debug, Default)]
pub struct DsnBuilder {
    buf: String,
    mode: Mode,
    fields: usize,
}

impl DsnBuilder {
    /// Create an empty builder.
    pub fn new(mode: Mode) -> Self {
        Self {
            buf: String::new(),
            mode,
            fields: 0,
        }
    }

    /// Create an empty builder with room for `capacity` bytes.
    pub fn with_capacity(mode: Mode, capacity: usize) -> Self {
        Self {
            buf: String::with_capacity(capacity),
            mode,
            fields: 0,
        }
    }

    /// Number of tokens written so far.
    pub fn len(&self) -> usize {
        self.fields
    }

    /// Whether no token has been written.
    pub fn is_empty(&self) -> bool {
        self.fields == 0
    }

    fn add_key(&mut self, key: &str) {
        if self.fields > 0 {
            self.buf.push(' ');
        }
        self.buf.push_str(key);
        self.buf.push('=');
        self.fields += 1;
    }

    /// Append a numeric token.
    pub fn add_int(&mut self, key: &str, value: u32) {
        self.add_key(key);
        self.buf.push_str(&value.to_string());
    }

    /// Append a text token, escaping it according to the builder's mode.
    pub fn add_text(&mut self, key: &str, value: &str) {
        self.add_key(key);

        match self.mode {
            Mode::Plain => self.buf.push_str(value),
            Mode::Escaped => push_escaped(&mut self.buf, value),
        }
    }

    /// Consume the builder and return the DSN.
    pub fn finish(self) -> String {
        self.buf
    }
}

/// Escape a single value the way [`Mode::Escaped`] renders it.
pub fn escape_value(value: &str) -> String {
    let mut buf = String::with_capacity(value.len() + 2);
    push_escaped(&mut buf, value);
    buf
}

fn push_escaped(buf: &mut String, value: &str) {
    let quoted = value.contains(' ');
    if quoted {
        buf.push('\'');
    }
    for c in value.chars() {
        if c == '\'' {
            buf.push('\\');
        }
        buf.push(c);
    }
    if quoted {
        buf.push('\'');
    }
}
