//! Lexical spans: the unit of output of the lexer.

/// What a lexical span is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// A bare word: identifier or keyword candidate.
    Word,
    /// A quoted identifier, raw text including the quote characters.
    QuotedWord,
    /// A single-quoted string literal, raw text including the quotes.
    StringLit,
    /// A numeric literal, possibly carrying a folded leading sign.
    Number,
    /// A bind parameter, raw text including the marker character.
    Bind,
    /// An operator or punctuation symbol.
    Operator,
    /// A comment opener: `--` or `/*`.
    CommentOpen,
    /// A block comment closer: `*/`.
    CommentClose,
    /// The body of a line comment, up to but not including the newline.
    CommentBody,
}

impl SpanKind {
    /// Whether this span belongs to a comment.
    #[must_use]
    pub fn is_comment(self) -> bool {
        matches!(self, Self::CommentOpen | Self::CommentClose | Self::CommentBody)
    }
}

/// One span of the input text. Borrowed, never mutated; `offset` is the
/// byte position of `text` within the full input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexicalSpan<'a> {
    pub text: &'a str,
    pub offset: usize,
    pub kind: SpanKind,
}

impl<'a> LexicalSpan<'a> {
    /// Byte length of the span.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Case-insensitive match against a bare keyword. Only `Word` spans
    /// ever match; a quoted `"select"` is an identifier, not a keyword.
    #[must_use]
    pub fn is_word(&self, keyword: &str) -> bool {
        self.kind == SpanKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }

    /// Exact match against an operator or punctuation symbol.
    #[must_use]
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == SpanKind::Operator && self.text == symbol
    }

    /// Whether this span can end an operand, which decides if a following
    /// `-` or `+` is a binary operator or a numeric sign.
    #[must_use]
    pub fn ends_operand(&self) -> bool {
        match self.kind {
            SpanKind::Word | SpanKind::QuotedWord | SpanKind::StringLit | SpanKind::Number
            | SpanKind::Bind => true,
            SpanKind::Operator => matches!(self.text, ")" | "]"),
            SpanKind::CommentOpen | SpanKind::CommentClose | SpanKind::CommentBody => false,
        }
    }
}
