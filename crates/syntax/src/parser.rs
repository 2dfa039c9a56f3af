//! Recursive-descent parser for Go declarations.
//!
//! Types and declarations are parsed fully. Function bodies are skipped by
//! brace matching, and initializer expressions are parsed only as far as
//! their head (literal, function literal, composite literal, unary operator);
//! the rest of an expression is skipped to the next `,` / `;` / closer at
//! nesting depth zero. The first syntax error stops the parser.

use crate::ast::*;
use crate::comments::CommentIndex;
use crate::error::Diag;
use crate::lexer::{Tok, Tokens};
use crate::parser_support::{ParamDecl, resolve_param_list};

type PResult<T> = Result<T, Diag>;

pub(crate) struct Parser<'src> {
    toks: Vec<(usize, Tok<'src>, usize)>,
    pos: usize,
    src_len: usize,
    pub(crate) arena: AstArena,
    pub(crate) interner: Interner,
    pub(crate) comments: CommentIndex,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(src: &'src str, tokens: Tokens<'src>) -> Self {
        let mut arena = AstArena::new();
        let comments = CommentIndex::build(src, &tokens.toks, &tokens.comments, &mut arena);
        Self {
            toks: tokens.toks,
            pos: 0,
            src_len: src.len(),
            arena,
            interner: Interner::new(),
            comments,
        }
    }

    // =========================================================================
    // Token cursor
    // =========================================================================

    #[inline]
    fn peek(&self) -> Option<Tok<'src>> {
        self.peek_at(0)
    }

    #[inline]
    fn peek_at(&self, n: usize) -> Option<Tok<'src>> {
        self.toks.get(self.pos + n).map(|t| t.1)
    }

    #[inline]
    fn at(&self, t: Tok<'_>) -> bool {
        self.peek() == Some(t)
    }

    fn here(&self) -> Span {
        match self.toks.get(self.pos) {
            Some(&(s, _, e)) => Span::new(s, e),
            None => Span::empty_at(self.src_len),
        }
    }

    fn prev_end(&self) -> usize {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.toks.get(i))
            .map_or(0, |t| t.2)
    }

    fn span_from(&self, start: Span) -> Span {
        Span::new(start.start as usize, self.prev_end().max(start.start as usize))
    }

    fn bump(&mut self) -> Span {
        let sp = self.here();
        if self.pos < self.toks.len() {
            self.pos += 1;
        }
        sp
    }

    fn eat(&mut self, t: Tok<'_>) -> Option<Span> {
        self.at(t).then(|| self.bump())
    }

    fn error<T>(&self, expected: &str) -> PResult<T> {
        let found = match self.peek() {
            Some(Tok::Semi) if self.here().is_empty() => "newline".to_string(),
            Some(t) => t.to_string(),
            None => "EOF".to_string(),
        };
        Err(Diag::parse(
            self.here(),
            format!("expected {expected}, found {found}"),
        ))
    }

    fn expect(&mut self, t: Tok<'static>, what: &str) -> PResult<Span> {
        match self.eat(t) {
            Some(sp) => Ok(sp),
            None => self.error(what),
        }
    }

    fn expect_ident(&mut self) -> PResult<IdentName> {
        match self.peek() {
            Some(Tok::Ident(s)) => {
                let pos = self.bump();
                Ok(IdentName {
                    sym: self.interner.intern(s),
                    pos,
                })
            }
            _ => self.error("identifier"),
        }
    }

    /// `;` between declarations; optional before a closing `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        match self.peek() {
            Some(Tok::Semi) => {
                self.bump();
                Ok(())
            }
            Some(Tok::RParen | Tok::RBrace) | None => Ok(()),
            _ => self.error("';' or newline"),
        }
    }

    fn doc_before(&self, at: Span) -> Option<CommentGroupId> {
        self.comments.doc_before(at.start)
    }

    fn comment_after_prev(&self) -> Option<CommentGroupId> {
        self.comments.comment_after(self.prev_end() as u32)
    }

    // =========================================================================
    // Source file and declarations
    // =========================================================================

    pub(crate) fn parse_file(&mut self) -> PResult<SourceFile> {
        let package_pos = self.expect(Tok::KwPackage, "'package'")?;
        let doc = self.doc_before(package_pos);
        let name = self.expect_ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(Tok::Semi) => {
                    self.bump();
                }
                Some(Tok::KwImport) => decls.push(self.parse_gen_decl(GenDeclKind::Import)?),
                Some(Tok::KwConst) => decls.push(self.parse_gen_decl(GenDeclKind::Const)?),
                Some(Tok::KwType) => decls.push(self.parse_gen_decl(GenDeclKind::Type)?),
                Some(Tok::KwVar) => decls.push(self.parse_gen_decl(GenDeclKind::Var)?),
                Some(Tok::KwFunc) => decls.push(self.parse_func_decl()?),
                Some(_) => return self.error("declaration"),
            }
        }

        let groups: Vec<_> = self.comments.group_ids().collect();
        Ok(SourceFile {
            package_pos,
            name,
            decls: self.arena.list_top_decls(decls),
            comments: self.arena.list_comment_group_ids(groups),
            doc,
        })
    }

    fn parse_gen_decl(&mut self, kind: GenDeclKind) -> PResult<TopLevelDecl> {
        let kw_pos = self.bump();
        let doc = self.doc_before(kw_pos);

        let mut specs = Vec::new();
        let (l_paren, r_paren) = if let Some(l) = self.eat(Tok::LParen) {
            while !self.at(Tok::RParen) && self.peek().is_some() {
                let doc = self.doc_before(self.here());
                specs.push(self.parse_spec(kind, doc)?);
                self.expect_semi()?;
            }
            (Some(l), Some(self.expect(Tok::RParen, "')'")?))
        } else {
            specs.push(self.parse_spec(kind, None)?);
            (None, None)
        };
        self.expect_semi()?;

        let decl = GenDecl {
            doc,
            kw_pos,
            kind,
            l_paren,
            specs: self.arena.list_specs(specs),
            r_paren,
        };
        let span = self.span_from(kw_pos);
        Ok(TopLevelDecl::Gen(self.arena.decls.alloc(decl, span)))
    }

    fn parse_spec(&mut self, kind: GenDeclKind, doc: Option<CommentGroupId>) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => self.parse_import_spec(doc).map(Spec::Import),
            GenDeclKind::Const | GenDeclKind::Var => self.parse_value_spec(doc).map(Spec::Value),
            GenDeclKind::Type => self.parse_type_spec(doc).map(Spec::Type),
        }
    }

    fn parse_import_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<ImportSpec> {
        let name = match self.peek() {
            Some(Tok::Dot) => Some(ImportName::Dot(self.bump())),
            Some(Tok::Ident("_")) => Some(ImportName::Blank(self.bump())),
            Some(Tok::Ident(_)) => Some(ImportName::Name(self.expect_ident()?)),
            _ => None,
        };
        let path = match self.peek() {
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => StringLit { raw: self.bump() },
            _ => return self.error("import path"),
        };
        Ok(ImportSpec { doc, name, path })
    }

    fn parse_value_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<ValueSpec> {
        let mut names = vec![self.expect_ident()?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.expect_ident()?);
        }

        let typ = if self.can_start_type() {
            Some(self.parse_type()?)
        } else {
            None
        };

        let values = if self.eat(Tok::Assign).is_some() {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        Ok(ValueSpec {
            doc,
            names: self.arena.list_ident_names(names),
            typ,
            values: self.arena.list_exprs(values),
            comment: self.comment_after_prev(),
        })
    }

    fn parse_type_spec(&mut self, doc: Option<CommentGroupId>) -> PResult<TypeSpec> {
        let name = self.expect_ident()?;
        let type_params = if self.at(Tok::LBrack) && self.brack_opens_type_params() {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        let assign_pos = self.eat(Tok::Assign);
        let typ = self.parse_type()?;

        Ok(TypeSpec {
            doc,
            name,
            type_params,
            assign_pos,
            typ,
            comment: self.comment_after_prev(),
        })
    }

    /// At `[` after a type name: `type T[P any] ...` versus `type T [N]E`.
    fn brack_opens_type_params(&self) -> bool {
        match (self.peek_at(1), self.peek_at(2)) {
            (Some(Tok::Ident(_)), Some(next)) => matches!(
                next,
                Tok::Ident(_)
                    | Tok::Comma
                    | Tok::Tilde
                    | Tok::LBrack
                    | Tok::KwInterface
                    | Tok::KwMap
                    | Tok::KwChan
                    | Tok::KwFunc
                    | Tok::LParen
            ),
            _ => false,
        }
    }

    fn parse_type_params(&mut self) -> PResult<TypeParamsId> {
        let l_brack = self.expect(Tok::LBrack, "'['")?;
        let mut entries = Vec::new();

        while !self.at(Tok::RBrack) {
            let start = self.here();
            let name = self.expect_ident()?;
            let typ = if self.at(Tok::Comma) || self.at(Tok::RBrack) {
                None
            } else {
                Some(self.parse_constraint()?)
            };
            entries.push(ParamDecl {
                name: Some(name),
                ellipsis_pos: None,
                typ,
                span: self.span_from(start),
            });
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        let r_brack = self.expect(Tok::RBrack, "']'")?;

        let params = resolve_param_list(&mut self.arena, entries);
        let params = self.arena.list_fields(params);
        let span = l_brack.to(r_brack);
        Ok(self.arena.type_params.alloc(
            TypeParams {
                l_brack,
                params,
                r_brack,
            },
            span,
        ))
    }

    /// `~int | string` or a single type.
    fn parse_constraint(&mut self) -> PResult<TypeId> {
        let start = self.here();
        let terms = self.parse_type_terms()?;
        match terms.as_slice() {
            [TypeTerm::Type { typ }] => Ok(*typ),
            _ => {
                let terms = self.arena.list_type_terms(terms);
                let span = self.span_from(start);
                Ok(self.arena.types.alloc(Type::Union { terms }, span))
            }
        }
    }

    fn parse_type_terms(&mut self) -> PResult<Vec<TypeTerm>> {
        let mut terms = Vec::new();
        loop {
            let term = match self.eat(Tok::Tilde) {
                Some(tilde_pos) => TypeTerm::Tilde {
                    tilde_pos,
                    typ: self.parse_type()?,
                },
                None => TypeTerm::Type {
                    typ: self.parse_type()?,
                },
            };
            terms.push(term);
            if self.eat(Tok::Pipe).is_none() {
                return Ok(terms);
            }
        }
    }

    fn parse_func_decl(&mut self) -> PResult<TopLevelDecl> {
        let func_pos = self.bump();
        let doc = self.doc_before(func_pos);

        let recv = if self.at(Tok::LParen) {
            Some(self.parse_receiver()?)
        } else {
            None
        };
        let name = self.expect_ident()?;
        let type_params = if self.at(Tok::LBrack) {
            Some(self.parse_type_params()?)
        } else {
            None
        };
        let signature = self.parse_signature()?;
        let body = if self.at(Tok::LBrace) {
            Some(self.skip_block()?)
        } else {
            None
        };
        self.expect_semi()?;

        let decl = FuncDecl {
            doc,
            func_pos,
            recv,
            name,
            type_params,
            signature,
            body,
        };
        let span = self.span_from(func_pos);
        Ok(TopLevelDecl::Func(self.arena.funcs.alloc(decl, span)))
    }

    fn parse_receiver(&mut self) -> PResult<Receiver> {
        let l_paren = self.bump();
        let name = match (self.peek(), self.peek_at(1)) {
            (Some(Tok::Ident(_)), Some(next))
                if !matches!(next, Tok::RParen | Tok::Dot | Tok::LBrack | Tok::Comma) =>
            {
                Some(self.expect_ident()?)
            }
            _ => None,
        };
        let typ = self.parse_type()?;
        self.eat(Tok::Comma);
        let r_paren = self.expect(Tok::RParen, "')'")?;
        Ok(Receiver {
            l_paren,
            name,
            typ,
            r_paren,
        })
    }

    // =========================================================================
    // Signatures and parameter lists
    // =========================================================================

    fn parse_signature(&mut self) -> PResult<SignatureId> {
        let start = self.here();
        let params = self.parse_params()?;
        let results = if self.at(Tok::LParen) {
            Some(Results::Params(self.parse_params()?))
        } else if self.can_start_type() {
            Some(Results::Type(self.parse_type()?))
        } else {
            None
        };
        let span = self.span_from(start);
        Ok(self.arena.signatures.alloc(Signature { params, results }, span))
    }

    fn parse_params(&mut self) -> PResult<FieldList> {
        let open = self.expect(Tok::LParen, "'('")?;
        let mut entries = Vec::new();
        while !self.at(Tok::RParen) {
            entries.push(self.parse_param_entry()?);
            if self.eat(Tok::Comma).is_none() {
                break;
            }
        }
        let close = self.expect(Tok::RParen, "')'")?;

        let fields = resolve_param_list(&mut self.arena, entries);
        Ok(FieldList {
            open,
            fields: self.arena.list_fields(fields),
            close,
        })
    }

    fn parse_param_entry(&mut self) -> PResult<ParamDecl> {
        let start = self.here();
        let mut entry = ParamDecl {
            name: None,
            ellipsis_pos: None,
            typ: None,
            span: start,
        };

        if let Some(Tok::Ident(_)) = self.peek() {
            let name_first = match self.peek_at(1) {
                Some(Tok::Comma | Tok::RParen) => {
                    entry.name = Some(self.expect_ident()?);
                    entry.span = self.span_from(start);
                    return Ok(entry);
                }
                Some(Tok::Dot) => false,
                Some(Tok::LBrack) => self.brack_after_name_is_array(),
                _ => true,
            };
            if name_first {
                entry.name = Some(self.expect_ident()?);
            }
        }

        entry.ellipsis_pos = self.eat(Tok::Ellipsis);
        entry.typ = Some(self.parse_type()?);
        entry.span = self.span_from(start);
        Ok(entry)
    }

    /// At `Name [`: decides between `name [N]T` / `name []T` and `G[T]`.
    ///
    /// The bracket belongs to an array or slice type when a type follows
    /// the matching `]`.
    fn brack_after_name_is_array(&self) -> bool {
        let mut depth = 0usize;
        let mut i = self.pos + 1;
        while let Some(&(_, t, _)) = self.toks.get(i) {
            match t {
                Tok::LBrack | Tok::LParen | Tok::LBrace => depth += 1,
                Tok::RBrack | Tok::RParen | Tok::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self
                            .toks
                            .get(i + 1)
                            .is_some_and(|&(_, next, _)| starts_type(next));
                    }
                }
                _ => {}
            }
            i += 1;
        }
        false
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn can_start_type(&self) -> bool {
        self.peek().is_some_and(starts_type)
    }

    pub(crate) fn parse_type(&mut self) -> PResult<TypeId> {
        let start = self.here();
        let typ = match self.peek() {
            Some(Tok::Ident(_)) => return self.parse_named_type(true),
            Some(Tok::Star) => {
                self.bump();
                Type::Pointer {
                    elem: self.parse_type()?,
                }
            }
            Some(Tok::LBrack) => {
                self.bump();
                if self.eat(Tok::RBrack).is_some() {
                    Type::Slice {
                        elem: self.parse_type()?,
                    }
                } else {
                    let len_start = self.here();
                    if self.eat(Tok::Ellipsis).is_none() {
                        self.skip_expr_rest();
                    }
                    let len = self.span_from(len_start);
                    self.expect(Tok::RBrack, "']'")?;
                    Type::Array {
                        len,
                        elem: self.parse_type()?,
                    }
                }
            }
            Some(Tok::KwMap) => {
                self.bump();
                self.expect(Tok::LBrack, "'['")?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack, "']'")?;
                Type::Map {
                    key,
                    val: self.parse_type()?,
                }
            }
            Some(Tok::KwChan) => {
                self.bump();
                let dir = if self.eat(Tok::Arrow).is_some() {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Type::Chan {
                    dir,
                    elem: self.parse_type()?,
                }
            }
            Some(Tok::Arrow) => {
                self.bump();
                self.expect(Tok::KwChan, "'chan'")?;
                Type::Chan {
                    dir: ChanDir::Recv,
                    elem: self.parse_type()?,
                }
            }
            Some(Tok::KwFunc) => {
                self.bump();
                Type::Func {
                    sig: self.parse_signature()?,
                }
            }
            Some(Tok::KwStruct) => Type::Struct {
                fields: self.parse_struct_body()?,
            },
            Some(Tok::KwInterface) => Type::Interface {
                elems: self.parse_interface_body()?,
            },
            Some(Tok::LParen) => {
                self.bump();
                let typ = self.parse_type()?;
                self.expect(Tok::RParen, "')'")?;
                Type::Paren { typ }
            }
            _ => return self.error("type"),
        };
        let span = self.span_from(start);
        Ok(self.arena.types.alloc(typ, span))
    }

    /// `Name`, `pkg.Name`, optionally followed by `[TypeArgs]`.
    fn parse_named_type(&mut self, with_args: bool) -> PResult<TypeId> {
        let start = self.here();
        let first = self.expect_ident()?;
        let (pkg, name) = if self.eat(Tok::Dot).is_some() {
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        let mut args = Vec::new();
        if with_args && self.eat(Tok::LBrack).is_some() {
            while !self.at(Tok::RBrack) {
                args.push(self.parse_type()?);
                if self.eat(Tok::Comma).is_none() {
                    break;
                }
            }
            self.expect(Tok::RBrack, "']'")?;
        }

        let typ = Type::Named {
            pkg,
            name,
            args: self.arena.list_types(args),
        };
        let span = self.span_from(start);
        Ok(self.arena.types.alloc(typ, span))
    }

    fn parse_struct_body(&mut self) -> PResult<FieldList> {
        self.bump();
        let open = self.expect(Tok::LBrace, "'{'")?;
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) && self.peek().is_some() {
            fields.push(self.parse_struct_field()?);
            self.expect_semi()?;
        }
        let close = self.expect(Tok::RBrace, "'}'")?;
        Ok(FieldList {
            open,
            fields: self.arena.list_fields(fields),
            close,
        })
    }

    fn parse_struct_field(&mut self) -> PResult<FieldId> {
        let start = self.here();
        let doc = self.doc_before(start);

        let embedded = match (self.peek(), self.peek_at(1)) {
            (Some(Tok::Star), _) => true,
            (Some(Tok::Ident(_)), Some(Tok::Dot)) => true,
            (
                Some(Tok::Ident(_)),
                None | Some(Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_)),
            ) => true,
            (Some(Tok::Ident(_)), Some(Tok::LBrack)) => !self.brack_after_name_is_array(),
            (Some(Tok::Ident(_)), _) => false,
            _ => return self.error("field name or embedded type"),
        };

        let mut names = Vec::new();
        if !embedded {
            names.push(self.expect_ident()?);
            while self.eat(Tok::Comma).is_some() {
                names.push(self.expect_ident()?);
            }
        }
        let typ = self.parse_type()?;
        let tag = match self.peek() {
            Some(Tok::StringLit(_) | Tok::RawStringLit(_)) => Some(StringLit { raw: self.bump() }),
            _ => None,
        };
        let span = self.span_from(start);

        let field = Field {
            names: self.arena.list_ident_names(names),
            ellipsis_pos: None,
            typ,
            tag,
            is_embed: embedded,
            doc,
            comment: self.comment_after_prev(),
        };
        Ok(self.arena.fields.alloc(field, span))
    }

    fn parse_interface_body(&mut self) -> PResult<ListRef<InterfaceElem>> {
        self.bump();
        self.expect(Tok::LBrace, "'{'")?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) && self.peek().is_some() {
            let start = self.here();
            let doc = self.doc_before(start);
            let elem = match (self.peek(), self.peek_at(1)) {
                (Some(Tok::Ident(_)), Some(Tok::LParen)) => {
                    let name = self.expect_ident()?;
                    let sig = self.parse_signature()?;
                    InterfaceElem::Method {
                        name,
                        sig,
                        doc,
                        comment: self.comment_after_prev(),
                    }
                }
                _ => {
                    let terms = self.parse_type_terms()?;
                    InterfaceElem::TypeElem {
                        terms: self.arena.list_type_terms(terms),
                        doc,
                        comment: self.comment_after_prev(),
                    }
                }
            };
            elems.push(elem);
            self.expect_semi()?;
        }
        self.expect(Tok::RBrace, "'}'")?;
        Ok(self.arena.list_interface_elems(elems))
    }

    // =========================================================================
    // Expressions and bodies
    // =========================================================================

    fn parse_expr_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut exprs = vec![self.parse_expr()?];
        while self.eat(Tok::Comma).is_some() {
            exprs.push(self.parse_expr()?);
        }
        Ok(exprs)
    }

    fn parse_expr(&mut self) -> PResult<ExprId> {
        let start = self.here();
        let head = self.parse_expr_head()?;
        match head {
            Some(id) if self.at_expr_end() => Ok(id),
            _ => {
                self.skip_expr_rest();
                if self.span_from(start).is_empty() {
                    return self.error("expression");
                }
                let span = self.span_from(start);
                Ok(self.arena.exprs.alloc(Expr::Other, span))
            }
        }
    }

    /// Parses the leading operand shapes reflection cares about; `None` for
    /// anything else (nothing consumed in that case).
    fn parse_expr_head(&mut self) -> PResult<Option<ExprId>> {
        let start = self.here();
        let expr = match self.peek() {
            Some(t) if t.is_basic_lit() => {
                let kind = match t {
                    Tok::IntLit(_) => BasicLitKind::Int,
                    Tok::FloatLit(_) => BasicLitKind::Float,
                    Tok::ImagLit(_) => BasicLitKind::Imag,
                    Tok::RuneLit(_) => BasicLitKind::Rune,
                    _ => BasicLitKind::String,
                };
                Expr::BasicLit(BasicLit {
                    kind,
                    raw: self.bump(),
                })
            }
            Some(Tok::KwFunc) => {
                let func_pos = self.bump();
                let sig = self.parse_signature()?;
                if !self.at(Tok::LBrace) {
                    // Function type used as a conversion; not a literal.
                    return Ok(None);
                }
                Expr::FuncLit {
                    func_pos,
                    sig,
                    body: self.skip_block()?,
                }
            }
            Some(t) if unary_op(t).is_some() => {
                let Some(op) = unary_op(t) else {
                    return Ok(None);
                };
                let op_pos = self.bump();
                let Some(expr) = self.parse_expr_head()? else {
                    return Ok(None);
                };
                Expr::Unary { op, op_pos, expr }
            }
            Some(Tok::LBrack | Tok::KwMap | Tok::KwStruct) => {
                let typ = self.parse_type()?;
                if !self.at(Tok::LBrace) {
                    return Ok(None);
                }
                Expr::CompositeLit {
                    typ,
                    body: self.skip_block()?,
                }
            }
            Some(Tok::Ident(_)) => {
                let qualified = self.peek_at(1) == Some(Tok::Dot)
                    && matches!(self.peek_at(2), Some(Tok::Ident(_)))
                    && self.peek_at(3) == Some(Tok::LBrace);
                let plain = self.peek_at(1) == Some(Tok::LBrace);
                if !(qualified || plain) {
                    return Ok(None);
                }
                let typ = self.parse_named_type(false)?;
                Expr::CompositeLit {
                    typ,
                    body: self.skip_block()?,
                }
            }
            _ => return Ok(None),
        };
        let span = self.span_from(start);
        Ok(Some(self.arena.exprs.alloc(expr, span)))
    }

    fn at_expr_end(&self) -> bool {
        matches!(
            self.peek(),
            None | Some(Tok::Comma | Tok::Semi | Tok::RParen | Tok::RBrace | Tok::RBrack | Tok::Colon)
        )
    }

    /// Skips tokens up to the next `,` `;` `)` `]` `}` `:` at depth zero.
    fn skip_expr_rest(&mut self) {
        let mut depth = 0usize;
        while let Some(t) = self.peek() {
            match t {
                Tok::LParen | Tok::LBrack | Tok::LBrace => depth += 1,
                Tok::RParen | Tok::RBrack | Tok::RBrace if depth == 0 => return,
                Tok::RParen | Tok::RBrack | Tok::RBrace => depth -= 1,
                Tok::Comma | Tok::Semi | Tok::Colon if depth == 0 => return,
                _ => {}
            }
            self.bump();
        }
    }

    /// Skips a `{ ... }` body by brace matching.
    fn skip_block(&mut self) -> PResult<Block> {
        let l_brace = self.expect(Tok::LBrace, "'{'")?;
        let mut depth = 1usize;
        while let Some(t) = self.peek() {
            let sp = self.bump();
            match t {
                Tok::LBrace => depth += 1,
                Tok::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Block { l_brace, r_brace: sp });
                    }
                }
                _ => {}
            }
        }
        self.error("'}'")
    }
}

fn starts_type(t: Tok<'_>) -> bool {
    matches!(
        t,
        Tok::Ident(_)
            | Tok::Star
            | Tok::LBrack
            | Tok::LParen
            | Tok::KwMap
            | Tok::KwChan
            | Tok::Arrow
            | Tok::KwFunc
            | Tok::KwStruct
            | Tok::KwInterface
    )
}

fn unary_op(t: Tok<'_>) -> Option<UnaryOp> {
    Some(match t {
        Tok::Plus => UnaryOp::Add,
        Tok::Minus => UnaryOp::Sub,
        Tok::Bang => UnaryOp::Not,
        Tok::Caret => UnaryOp::Xor,
        Tok::Star => UnaryOp::Deref,
        Tok::Amp => UnaryOp::Addr,
        Tok::Arrow => UnaryOp::Recv,
        _ => return None,
    })
}
