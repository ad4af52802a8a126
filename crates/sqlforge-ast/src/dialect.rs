//! Dialect configuration: identifier quoting and bind-parameter markers.
//!
//! The engine accepts one canonical grammar; dialect only affects how
//! quoted identifiers and bind placeholders are lexed and rendered. The
//! process-wide default is read-mostly state set once at startup; every
//! parse/format entry point also accepts an explicit [`Dialect`].

use std::sync::OnceLock;

/// Identifier quoting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuoteStyle {
    /// `"name"` (ANSI).
    #[default]
    DoubleQuote,
    /// `` `name` `` (MySQL).
    Backtick,
    /// `[name]` (SQL Server).
    Bracket,
}

impl QuoteStyle {
    /// The opening quote character.
    #[must_use]
    pub fn open(self) -> char {
        match self {
            Self::DoubleQuote => '"',
            Self::Backtick => '`',
            Self::Bracket => '[',
        }
    }

    /// The closing quote character.
    #[must_use]
    pub fn close(self) -> char {
        match self {
            Self::DoubleQuote => '"',
            Self::Backtick => '`',
            Self::Bracket => ']',
        }
    }
}

/// Bind-parameter marker character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BindMarker {
    /// `:name`.
    #[default]
    Colon,
    /// `@name`.
    At,
    /// `$name`.
    Dollar,
}

impl BindMarker {
    /// The marker character.
    #[must_use]
    pub fn char(self) -> char {
        match self {
            Self::Colon => ':',
            Self::At => '@',
            Self::Dollar => '$',
        }
    }
}

/// Lexical dialect configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dialect {
    pub quote: QuoteStyle,
    pub bind: BindMarker,
}

impl Dialect {
    /// ANSI double quotes and colon parameters.
    pub const ANSI: Self = Self {
        quote: QuoteStyle::DoubleQuote,
        bind: BindMarker::Colon,
    };

    /// Backtick quotes and at parameters.
    pub const MYSQL: Self = Self {
        quote: QuoteStyle::Backtick,
        bind: BindMarker::At,
    };

    /// Bracket quotes and at parameters.
    pub const MSSQL: Self = Self {
        quote: QuoteStyle::Bracket,
        bind: BindMarker::At,
    };
}

static DEFAULT_DIALECT: OnceLock<Dialect> = OnceLock::new();

/// Set the process-wide default dialect. Returns `false` if a default was
/// already set (the existing value is kept; dialect must never change
/// mid-parse).
pub fn set_default_dialect(dialect: Dialect) -> bool {
    DEFAULT_DIALECT.set(dialect).is_ok()
}

/// The process-wide default dialect (ANSI unless configured at startup).
#[must_use]
pub fn default_dialect() -> Dialect {
    *DEFAULT_DIALECT.get_or_init(Dialect::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_pairs() {
        assert_eq!(QuoteStyle::DoubleQuote.open(), '"');
        assert_eq!(QuoteStyle::DoubleQuote.close(), '"');
        assert_eq!(QuoteStyle::Bracket.open(), '[');
        assert_eq!(QuoteStyle::Bracket.close(), ']');
        assert_eq!(QuoteStyle::Backtick.open(), '`');
    }

    #[test]
    fn default_dialect_is_ansi() {
        let d = default_dialect();
        assert_eq!(d.quote, QuoteStyle::DoubleQuote);
        assert_eq!(d.bind, BindMarker::Colon);
    }
}
