//! Declaration-level Go front end (Logos lexer + recursive descent).
//!
//! - The lexer implements Go semicolon insertion and keeps comments.
//! - The parser builds an arena AST of package-level declarations. Function
//!   bodies are skipped, and initializers are parsed only as far as their head.
//! - Comments are grouped and attached as doc and trailing comments.

pub mod ast;
pub mod comments;
pub mod error;
pub mod lexer;
mod parser;
pub mod parser_support;
pub mod walk;

pub use ast::{AstArena, Interner, SourceFile, Span, Symbol};
pub use comments::LineIndex;
pub use error::{Diag, DiagKind, ParseFailure};
pub use lexer::{Lexer, Tok, tokenize};
pub use walk::{Visitor, Walk, walk_decl};

/// One parsed Go source file with everything needed to read it back.
#[derive(Debug)]
pub struct ParsedFile {
    pub source: String,
    pub arena: AstArena,
    pub interner: Interner,
    pub file: SourceFile,
    pub lines: LineIndex,
}

impl ParsedFile {
    /// Source text covered by `span`.
    pub fn text(&self, span: Span) -> &str {
        self.source.get(span.range()).unwrap_or("")
    }

    pub fn sym(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub fn ident(&self, name: ast::IdentName) -> &str {
        self.interner.resolve(name.sym)
    }

    /// One-based line of a byte offset.
    pub fn line_of(&self, offset: u32) -> u32 {
        self.lines.line_number(offset)
    }

    pub fn package_name(&self) -> &str {
        self.ident(self.file.name)
    }

    /// Raw text of every comment in a group, markers included, one per entry.
    pub fn comment_texts(&self, group: ast::CommentGroupId) -> impl Iterator<Item = &str> + '_ {
        let g = self.arena.comment_groups[group];
        self.arena
            .comment_ids(g.comments)
            .iter()
            .map(move |&c| self.text(self.arena.comments.span(c)))
    }
}

/// Lexes and parses one Go source file.
///
/// Any lexer diagnostic fails the file, as does the first parse error.
pub fn parse_source(src: &str) -> Result<ParsedFile, ParseFailure> {
    let tokens = lexer::tokenize(src);
    let mut diags = tokens.diags.clone();

    let mut p = parser::Parser::new(src, tokens);
    let file = match p.parse_file() {
        Ok(file) if diags.is_empty() => file,
        Ok(_) => return Err(ParseFailure { diags }),
        Err(d) => {
            diags.push(d);
            return Err(ParseFailure { diags });
        }
    };

    let lines = p.comments.lines().clone();
    Ok(ParsedFile {
        source: src.to_owned(),
        arena: p.arena,
        interner: p.interner,
        file,
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn parse(src: &str) -> ParsedFile {
        match parse_source(src) {
            Ok(p) => p,
            Err(e) => panic!("parse failed: {e}\n{:#?}", e.diags),
        }
    }

    fn type_specs(p: &ParsedFile) -> Vec<TypeSpec> {
        let mut out = Vec::new();
        for d in p.arena.top_decls(p.file.decls) {
            if let TopLevelDecl::Gen(id) = *d {
                for s in p.arena.specs_list(p.arena.decls[id].specs) {
                    if let Spec::Type(t) = s {
                        out.push(*t);
                    }
                }
            }
        }
        out
    }

    #[test]
    fn package_clause_and_doc() {
        let p = parse("// Package demo does things.\npackage demo\n");
        assert_eq!(p.package_name(), "demo");
        let doc = p.file.doc.expect("package doc");
        assert_eq!(p.comment_texts(doc).collect::<Vec<_>>(), ["// Package demo does things."]);
    }

    #[test]
    fn array_type_is_not_type_params() {
        let p = parse("package p\nconst N = 4\ntype A [N]int\ntype G[T any] []T\n");
        let specs = type_specs(&p);
        assert!(specs[0].type_params.is_none());
        assert!(matches!(p.arena.types[specs[0].typ], Type::Array { .. }));
        assert!(specs[1].type_params.is_some());
        assert!(matches!(p.arena.types[specs[1].typ], Type::Slice { .. }));
    }

    #[test]
    fn struct_fields_embeds_and_tags() {
        let src = "package p\ntype S struct {\n\tio.Reader\n\t*Base\n\tA, B int `json:\"a\"`\n\tItems [4]string\n\tG[int]\n}\n";
        let p = parse(src);
        let spec = type_specs(&p)[0];
        let Type::Struct { fields } = p.arena.types[spec.typ] else {
            panic!("not a struct");
        };
        let fields: Vec<_> = p
            .arena
            .fields_list(fields.fields)
            .iter()
            .map(|&f| p.arena.fields[f])
            .collect();
        assert_eq!(fields.len(), 5);
        assert!(fields[0].is_embed && fields[1].is_embed && fields[4].is_embed);
        assert_eq!(p.arena.ident_names(fields[2].names).len(), 2);
        assert_eq!(p.text(fields[2].tag.unwrap().raw), "`json:\"a\"`");
        assert!(!fields[3].is_embed);
    }

    #[test]
    fn skips_function_bodies() {
        let src = "package p\nfunc F() {\n\tif x := g(); x {\n\t\tfor {}\n\t}\n}\nfunc G() int { return 1 }\n";
        let p = parse(src);
        assert_eq!(p.arena.funcs.len(), 2);
    }

    #[test]
    fn expression_heads() {
        let src = "package p\nvar (\n\ta = -1\n\tb = &T{X: 1}\n\tc = f(1) + 2\n\td = func(x int) int { return x }\n)\n";
        let p = parse(src);
        let a = &p.arena;
        let kinds: Vec<Expr> = a
            .top_decls(p.file.decls)
            .iter()
            .filter_map(|d| match *d {
                TopLevelDecl::Gen(id) => Some(id),
                TopLevelDecl::Func(_) => None,
            })
            .flat_map(|id| a.specs_list(a.decls[id].specs))
            .filter_map(|s| match s {
                Spec::Value(v) => Some(v),
                _ => None,
            })
            .flat_map(|v| a.exprs_list(v.values))
            .map(|&e| a.exprs[e])
            .collect();
        assert_eq!(kinds.len(), 4);
        assert!(kinds.iter().any(|e| matches!(e, Expr::Unary { op: UnaryOp::Sub, .. })));
        assert!(kinds.iter().any(|e| matches!(e, Expr::Unary { op: UnaryOp::Addr, .. })));
        assert!(kinds.iter().any(|e| matches!(e, Expr::Other)));
        assert!(kinds.iter().any(|e| matches!(e, Expr::FuncLit { .. })));
    }

    #[test]
    fn reports_first_error() {
        let err = parse_source("package p\ntype = int\n").unwrap_err();
        assert_eq!(err.diags.len(), 1);
        assert!(err.diags[0].message.contains("identifier"));
    }
}
