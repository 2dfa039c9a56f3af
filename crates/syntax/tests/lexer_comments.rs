use goreflect_syntax::ast::CommentKind;
use goreflect_syntax::lexer::{Lexer, Tok, tokenize};

fn lex_all(input: &str) -> Vec<(usize, Tok<'_>, usize)> {
    Lexer::new(input).collect()
}

#[test]
fn comments_are_collected_not_emitted() {
    let src = "x // one\n/* two */ y\n";
    let t = tokenize(src);
    assert!(t.diags.is_empty());
    let kinds: Vec<_> = t.comments.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, [CommentKind::Line, CommentKind::Block]);
    assert_eq!(&src[t.comments[0].span.range()], "// one");
    assert_eq!(&src[t.comments[1].span.range()], "/* two */");
    assert!(t.toks.iter().all(|(_, tok, _)| !matches!(tok, Tok::Error)));
}

#[test]
fn unterminated_block_comment_reports_diag() {
    let t = tokenize("x /* never closed");
    assert_eq!(t.diags.len(), 1);
    assert!(t.diags[0].message.contains("comment"));
    assert_eq!(t.comments.len(), 1);
}

#[test]
fn comment_markers_inside_strings_are_text() {
    let toks = lex_all("\"// not a comment\" `/* nor this */`");
    assert!(matches!(toks[0].1, Tok::StringLit("\"// not a comment\"")));
    assert!(matches!(toks[1].1, Tok::RawStringLit("`/* nor this */`")));
}
