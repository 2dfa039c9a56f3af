use crate::ast::{self, Span};

/// One comma-separated entry of a parameter list before grouping.
///
/// A lone identifier is ambiguous: `func(a, b int)` names `a`, while
/// `func(int, string)` uses `int` as a type. Entries keep it as `name` with
/// `typ: None` until the whole list has been seen.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: Option<ast::IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: Option<ast::TypeId>,
    pub span: Span,
}

/// Applies Go's all-or-nothing naming rule and allocates the fields.
///
/// If any entry carries both a name and a type, every entry is named and
/// bare identifiers share the type of the next typed entry (`a, b int`).
/// Otherwise every bare identifier is a type name.
pub fn resolve_param_list(arena: &mut ast::AstArena, params: Vec<ParamDecl>) -> Vec<ast::FieldId> {
    let named = params.iter().any(|p| p.name.is_some() && p.typ.is_some());
    let mut out = Vec::with_capacity(params.len());

    if !named {
        for p in params {
            let typ = match (p.typ, p.name) {
                (Some(typ), _) => typ,
                (None, Some(name)) => named_type_from_ident(arena, name),
                (None, None) => continue,
            };
            out.push(alloc_param(arena, &[], p.ellipsis_pos, typ, p.span));
        }
        return out;
    }

    let mut pending: Vec<ast::IdentName> = Vec::new();
    let mut pending_start: Option<u32> = None;

    for p in params {
        match p.typ {
            Some(typ) => {
                pending.extend(p.name);
                let start = pending_start.take().unwrap_or(p.span.start);
                let span = Span {
                    start,
                    end: p.span.end,
                };
                out.push(alloc_param(arena, &pending, p.ellipsis_pos, typ, span));
                pending.clear();
            }
            None => {
                pending_start.get_or_insert(p.span.start);
                pending.extend(p.name);
            }
        }
    }

    // A dangling name without a type: keep it as a type so nothing is lost.
    for name in pending {
        let typ = named_type_from_ident(arena, name);
        out.push(alloc_param(arena, &[], None, typ, name.pos));
    }

    out
}

fn alloc_param(
    arena: &mut ast::AstArena,
    names: &[ast::IdentName],
    ellipsis_pos: Option<Span>,
    typ: ast::TypeId,
    span: Span,
) -> ast::FieldId {
    let names = if names.is_empty() {
        ast::ListRef::EMPTY
    } else {
        arena.list_ident_names(names.iter().copied())
    };
    let field = ast::Field {
        names,
        ellipsis_pos,
        typ,
        tag: None,
        is_embed: false,
        doc: None,
        comment: None,
    };
    arena.fields.alloc(field, span)
}

pub fn named_type_from_ident(arena: &mut ast::AstArena, name: ast::IdentName) -> ast::TypeId {
    arena.types.alloc(
        ast::Type::Named {
            pkg: None,
            name,
            args: ast::ListRef::EMPTY,
        },
        name.pos,
    )
}
