use thiserror::Error;

/// Compact byte-span used across the front end.
///
/// Offsets are `u32`; inputs past 4GiB are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

#[inline]
const fn clamp_u32(x: usize) -> u32 {
    if x > u32::MAX as usize {
        u32::MAX
    } else {
        x as u32
    }
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp_u32(start),
            end: clamp_u32(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        let p = clamp_u32(pos);
        Self { start: p, end: p }
    }

    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }

    /// Smallest span covering both `self` and `other`.
    #[inline]
    pub const fn to(self, other: Span) -> Self {
        let start = if self.start < other.start {
            self.start
        } else {
            other.start
        };
        let end = if self.end > other.end {
            self.end
        } else {
            other.end
        };
        Self { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub const fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind:?} error at {}..{}: {message}", span.start, span.end)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

/// A file that could not be parsed.
///
/// `diags` always holds at least one entry: lexer diagnostics first, then the
/// parse error that stopped the parser.
#[derive(Debug, Error)]
#[error("{} syntax error(s); first: {}", diags.len(), first_message(diags))]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

fn first_message(diags: &[Diag]) -> &str {
    diags.first().map(|d| d.message.as_str()).unwrap_or("<none>")
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid escape")]
    InvalidEscape,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unterminated comment")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq, Default)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}
