use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

/// Declaration-level visitor. Every method defaults to walking its children,
/// so implementors override only what they inspect.
pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_source_file(&mut self, a: &'ast AstArena, f: &'ast SourceFile) {
        f.walk(a, self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        walk_decl(a, id, self);
    }

    #[inline(always)]
    fn visit_import_spec(&mut self, _a: &'ast AstArena, _spec: &'ast ImportSpec) {}

    /// `decl` is the enclosing `const` or `var` declaration.
    #[inline(always)]
    fn visit_value_spec(&mut self, a: &'ast AstArena, _decl: DeclId, spec: &'ast ValueSpec) {
        spec.walk(a, self);
    }

    #[inline(always)]
    fn visit_type_spec(&mut self, a: &'ast AstArena, spec: &'ast TypeSpec) {
        spec.walk(a, self);
    }

    #[inline(always)]
    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        a.funcs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, _a: &'ast AstArena, _id: ExprId) {}

    #[inline(always)]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_signature(&mut self, a: &'ast AstArena, id: SignatureId) {
        a.signatures[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type_params(&mut self, a: &'ast AstArena, id: TypeParamsId) {
        for &f in a.fields_list(a.type_params[id].params) {
            self.visit_field(a, f);
        }
    }
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    FuncDeclId => visit_func_decl,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    SignatureId => visit_signature,
    TypeParamsId => visit_type_params,
}

impl<'ast> Walk<'ast> for SourceFile {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for d in a.top_decls(self.decls) {
            match *d {
                TopLevelDecl::Gen(id) => v.visit_decl(a, id),
                TopLevelDecl::Func(id) => v.visit_func_decl(a, id),
            }
        }
    }
}

/// Dispatches the specs of one `import`/`const`/`type`/`var` declaration.
pub fn walk_decl<'ast, V: Visitor<'ast> + ?Sized>(a: &'ast AstArena, decl: DeclId, v: &mut V) {
    for spec in a.specs_list(a.decls[decl].specs) {
        match spec {
            Spec::Import(s) => v.visit_import_spec(a, s),
            Spec::Value(s) => v.visit_value_spec(a, decl, s),
            Spec::Type(s) => v.visit_type_spec(a, s),
        }
    }
}

impl<'ast> Walk<'ast> for ValueSpec {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(t) = self.typ {
            v.visit_type(a, t);
        }
        for &e in a.exprs_list(self.values) {
            v.visit_expr(a, e);
        }
    }
}

impl<'ast> Walk<'ast> for TypeSpec {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(tp) = self.type_params {
            v.visit_type_params(a, tp);
        }
        v.visit_type(a, self.typ);
    }
}

impl<'ast> Walk<'ast> for FuncDecl {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(r) = self.recv {
            v.visit_type(a, r.typ);
        }
        if let Some(tp) = self.type_params {
            v.visit_type_params(a, tp);
        }
        v.visit_signature(a, self.signature);
    }
}

impl<'ast> Walk<'ast> for Signature {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for &f in a.fields_list(self.params.fields) {
            v.visit_field(a, f);
        }
        match self.results {
            Some(Results::Params(list)) => {
                for &f in a.fields_list(list.fields) {
                    v.visit_field(a, f);
                }
            }
            Some(Results::Type(t)) => v.visit_type(a, t),
            None => {}
        }
    }
}

impl<'ast> Walk<'ast> for Field {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        v.visit_type(a, self.typ);
    }
}

impl<'ast> Walk<'ast> for Type {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        match *self {
            Type::Named { args, .. } => {
                for &t in a.types_list(args) {
                    v.visit_type(a, t);
                }
            }
            Type::Pointer { elem }
            | Type::Array { elem, .. }
            | Type::Slice { elem }
            | Type::Chan { elem, .. } => v.visit_type(a, elem),
            Type::Paren { typ } => v.visit_type(a, typ),
            Type::Map { key, val } => {
                v.visit_type(a, key);
                v.visit_type(a, val);
            }
            Type::Struct { fields } => {
                for &f in a.fields_list(fields.fields) {
                    v.visit_field(a, f);
                }
            }
            Type::Interface { elems } => {
                for e in a.interface_elems(elems) {
                    match *e {
                        InterfaceElem::Method { sig, .. } => v.visit_signature(a, sig),
                        InterfaceElem::TypeElem { terms, .. } => {
                            for t in a.type_terms(terms) {
                                v.visit_type(a, t.typ());
                            }
                        }
                    }
                }
            }
            Type::Func { sig } => v.visit_signature(a, sig),
            Type::Union { terms } => {
                for t in a.type_terms(terms) {
                    v.visit_type(a, t.typ());
                }
            }
        }
    }
}
