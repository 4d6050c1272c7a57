//! Value display modes

use impress_identifiers::Value;

/// How encoders render values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// The short form, e.g. `9780123456786`
    #[default]
    Short,
    /// The URI-like long form, e.g. `urn:isbn:9780123456786`
    Long,
    /// The kind and short form, e.g. `isbn(9780123456786)`
    Repr,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Short, Mode::Long, Mode::Repr];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Short => "short",
            Mode::Long => "long",
            Mode::Repr => "repr",
        }
    }

    pub fn render(&self, value: &Value) -> String {
        match self {
            Mode::Short => value.short(),
            Mode::Long => value.long(),
            Mode::Repr => value.repr(),
        }
    }
}
