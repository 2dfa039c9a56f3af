use crate::ast::CommentKind;
use crate::error::{Diag, LexError, LexErrorKind, Span};
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

// =============================================================================
// 0. Shared helpers
// =============================================================================

#[inline(always)]
const fn first_newline_offset(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'\n' | b'\r') {
            return Some(i);
        }
        i += 1;
    }

    None
}

#[inline(always)]
const fn is_digit_in(b: u8, radix: u8) -> bool {
    match radix {
        2 => matches!(b, b'0' | b'1'),
        8 => matches!(b, b'0'..=b'7'),
        10 => b.is_ascii_digit(),
        _ => b.is_ascii_hexdigit(),
    }
}

// =============================================================================
// 1. Block comment scanner
// =============================================================================

#[inline]
fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    use memchr::memchr;

    let rem = lex.remainder().as_bytes();
    let mut from = 0;

    while let Some(star) = memchr(b'*', &rem[from..]) {
        let at = from + star;
        if rem.get(at + 1) == Some(&b'/') {
            lex.bump(at + 2);
            return Ok(());
        }
        from = at + 1;
    }

    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

// =============================================================================
// 2. String and rune literal validation
// =============================================================================

mod esc {
    use super::*;

    /// Validates one escape sequence starting right after the backslash at
    /// `body[at]`. Returns the number of bytes consumed after the backslash.
    pub(super) fn escape_len(body: &[u8], at: usize, quote: u8) -> Result<usize, LexErrorKind> {
        let Some(&c) = body.get(at) else {
            return Err(LexErrorKind::InvalidEscape);
        };

        let fixed = |n: usize, radix: u8| -> Result<usize, LexErrorKind> {
            let digits = body.get(at + 1..at + 1 + n).ok_or(LexErrorKind::InvalidEscape)?;
            if digits.iter().all(|&d| is_digit_in(d, radix)) {
                Ok(n + 1)
            } else {
                Err(LexErrorKind::InvalidEscape)
            }
        };

        match c {
            b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => Ok(1),
            b'x' => fixed(2, 16),
            b'u' => fixed(4, 16),
            b'U' => fixed(8, 16),
            b'0'..=b'7' => {
                let digits = body.get(at..at + 3).ok_or(LexErrorKind::InvalidEscape)?;
                if digits.iter().all(|&d| is_digit_in(d, 8)) {
                    Ok(3)
                } else {
                    Err(LexErrorKind::InvalidEscape)
                }
            }
            _ if c == quote => Ok(1),
            _ => Err(LexErrorKind::InvalidEscape),
        }
    }

    pub fn validate_interpreted_string(
        lex: &mut LogosLexer<'_, super::RawTok>,
    ) -> Result<(), LexErrorKind> {
        let s = lex.slice().as_bytes();
        if s.len() < 2 {
            return Err(LexErrorKind::UnterminatedString);
        }

        let body = &s[1..s.len() - 1];
        let mut i = 0;
        while i < body.len() {
            if body[i] == b'\\' {
                i += 1 + escape_len(body, i + 1, b'"')?;
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    pub fn validate_rune(lex: &mut LogosLexer<'_, super::RawTok>) -> Result<(), LexErrorKind> {
        let s = lex.slice();
        if s.len() < 3 {
            return Err(LexErrorKind::InvalidToken);
        }

        let body = &s[1..s.len() - 1];
        let bytes = body.as_bytes();
        let consumed = if bytes[0] == b'\\' {
            1 + escape_len(bytes, 1, b'\'')?
        } else {
            body.chars().next().map_or(0, char::len_utf8)
        };

        if consumed == bytes.len() {
            Ok(())
        } else {
            Err(LexErrorKind::InvalidToken)
        }
    }
}

// =============================================================================
// 3. Numbers: maximal munch, then classification
// =============================================================================

pub mod num {
    use super::*;

    /// `true` when `s` is a non-empty run of radix digits with single
    /// underscores between them.
    fn digit_run(s: &[u8], radix: u8, leading_underscore: bool) -> bool {
        let s = match s.split_first() {
            Some((b'_', rest)) if leading_underscore => rest,
            _ => s,
        };
        if s.is_empty() || s[0] == b'_' || s[s.len() - 1] == b'_' {
            return false;
        }
        let mut prev_underscore = false;
        for &b in s {
            if b == b'_' {
                if prev_underscore {
                    return false;
                }
                prev_underscore = true;
            } else if is_digit_in(b, radix) {
                prev_underscore = false;
            } else {
                return false;
            }
        }
        true
    }

    fn split_at_any<'a>(s: &'a [u8], needles: &[u8]) -> (&'a [u8], Option<&'a [u8]>) {
        match s.iter().position(|b| needles.contains(b)) {
            Some(p) => (&s[..p], Some(&s[p + 1..])),
            None => (s, None),
        }
    }

    fn exponent_ok(exp: &[u8]) -> bool {
        let digits = match exp.first() {
            Some(b'+' | b'-') => &exp[1..],
            _ => exp,
        };
        digit_run(digits, 10, false)
    }

    fn classify_decimal(lit: &[u8]) -> Result<bool, LexErrorKind> {
        let (mantissa, exp) = split_at_any(lit, b"eE");
        let (int_part, frac) = split_at_any(mantissa, b".");

        if let Some(exp) = exp
            && !exponent_ok(exp)
        {
            return Err(LexErrorKind::InvalidNumber);
        }

        let ok = match frac {
            None if exp.is_none() => {
                if int_part.len() > 1 && int_part[0] == b'0' {
                    digit_run(&int_part[1..], 8, true)
                } else {
                    digit_run(int_part, 10, false)
                }
            }
            None => digit_run(int_part, 10, false),
            Some(frac) => {
                let int_ok = int_part.is_empty() || digit_run(int_part, 10, false);
                let frac_ok = frac.is_empty() || digit_run(frac, 10, false);
                int_ok && frac_ok && !(int_part.is_empty() && frac.is_empty())
            }
        };

        if ok {
            Ok(frac.is_some() || exp.is_some())
        } else {
            Err(LexErrorKind::InvalidNumber)
        }
    }

    fn classify_hex(body: &[u8]) -> Result<bool, LexErrorKind> {
        let (mantissa, exp) = split_at_any(body, b"pP");
        let (int_part, frac) = split_at_any(mantissa, b".");

        let ok = match (frac, exp) {
            (None, None) => digit_run(int_part, 16, true),
            (Some(_), None) => false,
            (frac, Some(exp)) => {
                let frac = frac.unwrap_or_default();
                let int_ok = int_part.is_empty() || digit_run(int_part, 16, true);
                let frac_ok = frac.is_empty() || digit_run(frac, 16, false);
                int_ok && frac_ok && !(int_part.is_empty() && frac.is_empty()) && exponent_ok(exp)
            }
        };

        if ok {
            Ok(exp.is_some())
        } else {
            Err(LexErrorKind::InvalidNumber)
        }
    }

    /// Validates a numeric literal (without imaginary suffix).
    /// Returns `Ok(true)` for floats and `Ok(false)` for integers.
    pub fn classify_number(lit: &[u8]) -> Result<bool, LexErrorKind> {
        if lit.len() >= 2 && lit[0] == b'0' {
            match lit[1] | 0x20 {
                b'x' => return classify_hex(&lit[2..]),
                b'b' if digit_run(&lit[2..], 2, true) => return Ok(false),
                b'o' if digit_run(&lit[2..], 8, true) => return Ok(false),
                b'b' | b'o' => return Err(LexErrorKind::InvalidNumber),
                _ => {}
            }
        }
        classify_decimal(lit)
    }

    /// Logos callback: extends the token to the longest numeric shape.
    /// Digit ranges are not checked here (`0b2` stays one token and is
    /// rejected by `classify_number`).
    pub(super) fn lex_number(lex: &mut LogosLexer<'_, super::RawTok>) -> Result<(), LexErrorKind> {
        let src = lex.source().as_bytes();
        let n = src.len();
        let mut i = lex.span().start;

        let mut hex = false;
        if src[i] == b'0' && i + 1 < n && matches!(src[i + 1] | 0x20, b'x' | b'o' | b'b') {
            hex = src[i + 1] | 0x20 == b'x';
            i += 2;
        }

        let digit = |b: u8| b == b'_' || if hex { b.is_ascii_hexdigit() } else { b.is_ascii_digit() };

        while i < n && digit(src[i]) {
            i += 1;
        }

        // fraction, without stealing "..."
        if i < n && src[i] == b'.' && src.get(i + 1) != Some(&b'.') {
            i += 1;
            while i < n && digit(src[i]) {
                i += 1;
            }
        }

        if i < n {
            let e = src[i] | 0x20;
            if (!hex && e == b'e') || (hex && e == b'p') {
                i += 1;
                if i < n && matches!(src[i], b'+' | b'-') {
                    i += 1;
                }
                while i < n && (src[i].is_ascii_digit() || src[i] == b'_') {
                    i += 1;
                }
            }
        }

        let already = lex.span().end;
        if i > already {
            lex.bump(i - already);
        }
        Ok(())
    }
}

// =============================================================================
// 4. Raw token definition
// =============================================================================

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\f]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9]|\.[0-9]", num::lex_number)] Number,

    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, esc::validate_interpreted_string)] String,
    #[regex(r"'([^'\\\n\r]|\\.)+'", esc::validate_rune)] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    #[regex(r".", priority = 0)] Error,
}

const SEMI_INSERT_TABLE: [bool; 256] = {
    let mut t = [false; 256];
    t[RawTok::Ident as usize] = true;
    t[RawTok::Number as usize] = true;
    t[RawTok::Rune as usize] = true;
    t[RawTok::String as usize] = true;
    t[RawTok::RawString as usize] = true;
    t[RawTok::KwBreak as usize] = true;
    t[RawTok::KwContinue as usize] = true;
    t[RawTok::KwFallthrough as usize] = true;
    t[RawTok::KwReturn as usize] = true;
    t[RawTok::Inc as usize] = true;
    t[RawTok::Dec as usize] = true;
    t[RawTok::RParen as usize] = true;
    t[RawTok::RBrack as usize] = true;
    t[RawTok::RBrace as usize] = true;
    t
};

impl RawTok {
    #[inline(always)]
    const fn can_insert_semicolon(self) -> bool {
        SEMI_INSERT_TABLE[self as usize]
    }

    #[rustfmt::skip]
    fn to_token(self, slice: &str) -> Tok<'_> {
        match self {
            Self::Ident => Tok::Ident(slice),
            Self::Rune => Tok::RuneLit(slice),
            Self::String => Tok::StringLit(slice),
            Self::RawString => Tok::RawStringLit(slice),

            Self::KwBreak => Tok::KwBreak, Self::KwCase => Tok::KwCase, Self::KwChan => Tok::KwChan,
            Self::KwConst => Tok::KwConst, Self::KwContinue => Tok::KwContinue,
            Self::KwDefault => Tok::KwDefault, Self::KwDefer => Tok::KwDefer, Self::KwElse => Tok::KwElse,
            Self::KwFallthrough => Tok::KwFallthrough, Self::KwFor => Tok::KwFor, Self::KwFunc => Tok::KwFunc,
            Self::KwGo => Tok::KwGo, Self::KwGoto => Tok::KwGoto, Self::KwIf => Tok::KwIf,
            Self::KwImport => Tok::KwImport, Self::KwInterface => Tok::KwInterface, Self::KwMap => Tok::KwMap,
            Self::KwPackage => Tok::KwPackage, Self::KwRange => Tok::KwRange, Self::KwReturn => Tok::KwReturn,
            Self::KwSelect => Tok::KwSelect, Self::KwStruct => Tok::KwStruct, Self::KwSwitch => Tok::KwSwitch,
            Self::KwType => Tok::KwType, Self::KwVar => Tok::KwVar,

            Self::Ellipsis => Tok::Ellipsis, Self::ShlAssign => Tok::ShlAssign, Self::ShrAssign => Tok::ShrAssign,
            Self::AndNotAssign => Tok::AndNotAssign, Self::AddAssign => Tok::AddAssign,
            Self::SubAssign => Tok::SubAssign, Self::MulAssign => Tok::MulAssign, Self::DivAssign => Tok::DivAssign,
            Self::ModAssign => Tok::ModAssign, Self::AndAssign => Tok::AndAssign, Self::OrAssign => Tok::OrAssign,
            Self::XorAssign => Tok::XorAssign, Self::Shl => Tok::Shl, Self::Shr => Tok::Shr,
            Self::AndNot => Tok::AndNot, Self::LAnd => Tok::LAnd, Self::LOr => Tok::LOr, Self::EqEq => Tok::EqEq,
            Self::NotEq => Tok::NotEq, Self::Le => Tok::Le, Self::Ge => Tok::Ge, Self::Inc => Tok::Inc,
            Self::Dec => Tok::Dec, Self::Define => Tok::Define, Self::Arrow => Tok::Arrow,
            Self::Assign => Tok::Assign, Self::Plus => Tok::Plus, Self::Minus => Tok::Minus, Self::Star => Tok::Star,
            Self::Slash => Tok::Slash, Self::Percent => Tok::Percent, Self::Amp => Tok::Amp, Self::Pipe => Tok::Pipe,
            Self::Caret => Tok::Caret, Self::Tilde => Tok::Tilde, Self::Bang => Tok::Bang, Self::Lt => Tok::Lt,
            Self::Gt => Tok::Gt,

            Self::LParen => Tok::LParen, Self::RParen => Tok::RParen, Self::LBrack => Tok::LBrack,
            Self::RBrack => Tok::RBrack, Self::LBrace => Tok::LBrace, Self::RBrace => Tok::RBrace,
            Self::Comma => Tok::Comma, Self::Semi => Tok::Semi, Self::Colon => Tok::Colon, Self::Dot => Tok::Dot,

            // Numbers, trivia and BOM are routed by the wrapper before this point.
            Self::Number | Self::Newline | Self::LineComment | Self::BlockComment | Self::Bom | Self::Error => {
                Tok::Error
            }
        }
    }
}

// =============================================================================
// 5. Public token (zero-copy)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'input> {
    Ident(&'input str),
    IntLit(&'input str),
    FloatLit(&'input str),
    ImagLit(&'input str),
    RuneLit(&'input str),
    StringLit(&'input str),
    RawStringLit(&'input str),

    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
}

impl Tok<'_> {
    /// Literal tokens that can start a `BasicLit`.
    pub const fn is_basic_lit(&self) -> bool {
        matches!(
            self,
            Tok::IntLit(_)
                | Tok::FloatLit(_)
                | Tok::ImagLit(_)
                | Tok::RuneLit(_)
                | Tok::StringLit(_)
                | Tok::RawStringLit(_)
        )
    }
}

impl std::fmt::Display for Tok<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => write!(f, "{s:?}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A comment seen by the lexer, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawComment {
    pub kind: CommentKind,
    pub span: Span,
}

// =============================================================================
// 6. Lexer wrapper: semicolon insertion, imaginary suffix, comments, diags
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<(usize, Tok<'src>, usize)>,
    diags: Vec<Diag>,
    comments: Vec<RawComment>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::new(),
            comments: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    /// Comments collected so far, in source order.
    pub fn take_comments(&mut self) -> Vec<RawComment> {
        std::mem::take(&mut self.comments)
    }

    #[inline]
    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::from_range(span);
        self.diags.push(LexError { kind, span }.diag());
    }

    #[inline]
    fn emit_semi_at(&mut self, pos: usize) {
        self.pending = Some((pos, Tok::Semi, pos));
    }

    /// Handles newlines and comments. Returns `false` for non-trivia.
    fn handle_trivia(&mut self, raw: RawTok, span: &Range<usize>, slice: &str) -> bool {
        match raw {
            RawTok::Newline => {
                if self.last_can_insert_semi {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.start);
                }
                true
            }
            RawTok::LineComment => {
                self.comments.push(RawComment {
                    kind: CommentKind::Line,
                    span: Span::from_range(span.clone()),
                });
                true
            }
            RawTok::BlockComment => {
                self.comments.push(RawComment {
                    kind: CommentKind::Block,
                    span: Span::from_range(span.clone()),
                });
                if self.last_can_insert_semi
                    && let Some(off) = first_newline_offset(slice)
                {
                    self.last_can_insert_semi = false;
                    self.emit_semi_at(span.start + off);
                }
                true
            }
            _ => false,
        }
    }

    fn handle_eof(&mut self) {
        self.eof_done = true;
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.emit_semi_at(self.src_len);
        }
    }

    fn handle_lex_error(&mut self, kind: LexErrorKind) -> (usize, Tok<'src>, usize) {
        let span = self.logos.span();
        if kind == LexErrorKind::UnterminatedComment {
            self.comments.push(RawComment {
                kind: CommentKind::Block,
                span: Span::from_range(span.clone()),
            });
        }
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        (span.start, Tok::Error, span.end)
    }

    fn handle_raw_token(&mut self, raw: RawTok) -> Option<(usize, Tok<'src>, usize)> {
        let span = self.logos.span();
        let slice = self.logos.slice();

        if raw == RawTok::Bom {
            if span.start == 0 {
                return None;
            }
            self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
            self.last_can_insert_semi = false;
            return Some((span.start, Tok::Error, span.end));
        }

        if self.handle_trivia(raw, &span, slice) {
            return None;
        }

        if raw == RawTok::Error {
            self.push_lex_diag(LexErrorKind::InvalidToken, span.clone());
            self.last_can_insert_semi = false;
            return Some((span.start, Tok::Error, span.end));
        }

        if raw == RawTok::Number {
            return Some(self.handle_number_token(span, slice));
        }

        self.last_can_insert_semi = raw.can_insert_semicolon();
        Some((span.start, raw.to_token(slice), span.end))
    }

    fn handle_number_token(
        &mut self,
        span: Range<usize>,
        slice: &'src str,
    ) -> (usize, Tok<'src>, usize) {
        let src = self.logos.source();
        let classified = num::classify_number(slice.as_bytes());

        if src.as_bytes().get(span.end) == Some(&b'i') {
            // Go accepts any decimal digit run before `i` (legacy `0123i` included).
            let end = span.end + 1;
            let valid = classified.is_ok()
                || slice.bytes().all(|b| b.is_ascii_digit() || b == b'_');
            self.logos.bump(1);
            self.last_can_insert_semi = valid;
            if !valid {
                self.push_lex_diag(LexErrorKind::InvalidNumber, span.start..end);
                return (span.start, Tok::Error, end);
            }
            return (span.start, Tok::ImagLit(&src[span.start..end]), end);
        }

        match classified {
            Ok(is_float) => {
                self.last_can_insert_semi = true;
                let tok = if is_float {
                    Tok::FloatLit(slice)
                } else {
                    Tok::IntLit(slice)
                };
                (span.start, tok, span.end)
            }
            Err(kind) => {
                self.push_lex_diag(kind, span.clone());
                self.last_can_insert_semi = false;
                (span.start, Tok::Error, span.end)
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Tok<'src>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.eof_done {
                return None;
            }

            match self.logos.next() {
                // Loop again so a pending EOF semicolon is still emitted.
                None => self.handle_eof(),
                Some(Err(kind)) => return Some(self.handle_lex_error(kind)),
                Some(Ok(raw)) => {
                    if let Some(item) = self.handle_raw_token(raw) {
                        return Some(item);
                    }
                }
            }
        }
    }
}

/// Fully lexed file: tokens, comments and lexical diagnostics.
#[derive(Debug, Default)]
pub struct Tokens<'src> {
    pub toks: Vec<(usize, Tok<'src>, usize)>,
    pub comments: Vec<RawComment>,
    pub diags: Vec<Diag>,
}

pub fn tokenize(src: &str) -> Tokens<'_> {
    let mut lx = Lexer::new(src);
    let toks: Vec<_> = lx.by_ref().collect();
    Tokens {
        toks,
        comments: lx.take_comments(),
        diags: lx.take_diags(),
    }
}

#[cfg(test)]
mod tests {
    use super::num::classify_number;

    #[test]
    fn classifies_numbers() {
        assert_eq!(classify_number(b"42"), Ok(false));
        assert_eq!(classify_number(b"0x_FF"), Ok(false));
        assert_eq!(classify_number(b"0o17"), Ok(false));
        assert_eq!(classify_number(b"0b1010"), Ok(false));
        assert_eq!(classify_number(b"0755"), Ok(false));
        assert_eq!(classify_number(b"1_000"), Ok(false));
        assert_eq!(classify_number(b"1.5"), Ok(true));
        assert_eq!(classify_number(b".5"), Ok(true));
        assert_eq!(classify_number(b"1."), Ok(true));
        assert_eq!(classify_number(b"1e10"), Ok(true));
        assert_eq!(classify_number(b"09.5"), Ok(true));
        assert_eq!(classify_number(b"0x1p-2"), Ok(true));
        assert_eq!(classify_number(b"0x1.8p1"), Ok(true));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(classify_number(b"09").is_err());
        assert!(classify_number(b"0b2").is_err());
        assert!(classify_number(b"1__0").is_err());
        assert!(classify_number(b"1_").is_err());
        assert!(classify_number(b"0x1.8").is_err());
        assert!(classify_number(b"1e").is_err());
        assert!(classify_number(b"0x").is_err());
    }
}
