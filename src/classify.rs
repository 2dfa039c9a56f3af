//! Per-file declaration classifier.
//!
//! Walks one file's declarations and hands the model entities it builds to a
//! [`PackageBuilder`]. Method linking happens later, once every file of the
//! package has been classified.

use std::sync::Arc;

use goreflect_syntax::ast::{
    AstArena, CommentGroupId, DeclId, ExprId, FieldList, FuncDeclId, GenDeclKind, IdentName,
    InterfaceElem, ListRef, Type, TypeId, TypeSpec, TypeTerm, ValueSpec,
};
use goreflect_syntax::{Visitor, walk_decl};

use crate::assemble::PackageBuilder;
use crate::markers::{parse_markers, parse_tags};
use crate::model::{
    AliasType, Constant, DefinedType, EmbeddedField, EmbeddedType, Field, Func, Interface,
    Markers, Struct, TypeDescriptor, Var,
};
use crate::resolve::{FileContext, Resolver, literal_kind};

pub(crate) struct Classifier<'r, 'a> {
    file: usize,
    fc: &'a FileContext,
    resolver: &'r mut Resolver<'a>,
    out: &'r mut PackageBuilder,
    /// Doc of the enclosing declaration when it is not parenthesized.
    decl_doc: Option<CommentGroupId>,
    /// Type and values of the previous const spec, for implicit repetition.
    last_const: Option<(Option<TypeId>, ListRef<ExprId>)>,
}

impl<'r, 'a> Classifier<'r, 'a> {
    pub(crate) fn new(
        file: usize,
        fc: &'a FileContext,
        resolver: &'r mut Resolver<'a>,
        out: &'r mut PackageBuilder,
    ) -> Self {
        Self {
            file,
            fc,
            resolver,
            out,
            decl_doc: None,
            last_const: None,
        }
    }

    pub(crate) fn run(mut self) {
        let fc = self.fc;
        self.visit_source_file(&fc.parsed.arena, &fc.parsed.file);
    }

    fn markers(&self, doc: Option<CommentGroupId>) -> Markers {
        match doc {
            Some(g) => parse_markers(self.fc.parsed.comment_texts(g)),
            None => Markers::new(),
        }
    }

    fn line(&self, offset: u32) -> u32 {
        self.fc.parsed.line_of(offset)
    }

    fn text(&self, a: &AstArena, expr: ExprId) -> String {
        self.fc.parsed.text(a.exprs.span(expr)).to_string()
    }

    fn classify_struct(&mut self, a: &AstArena, spec: &TypeSpec, fields: FieldList, markers: Markers) {
        let fc = self.fc;
        let parsed = &fc.parsed;
        let mut st = Struct {
            name: parsed.ident(spec.name).to_string(),
            markers,
            ..Struct::default()
        };

        for &id in a.fields_list(fields.fields) {
            let field = a.fields[id];
            let markers = self.markers(field.doc);
            let tags = field
                .tag
                .map(|t| parse_tags(parsed.text(t.raw)))
                .unwrap_or_default();

            if field.is_embed {
                let name = base_type_name(a, field.typ)
                    .map(|n| parsed.ident(n).to_string())
                    .unwrap_or_default();
                let typ = self.resolver.resolve(self.file, field.typ);
                st.embedded_fields.insert(
                    name.clone(),
                    EmbeddedField {
                        name,
                        type_name: typ.type_name,
                        markers,
                        tags,
                    },
                );
                continue;
            }

            let typ = self.resolver.resolve(self.file, field.typ);
            for &n in a.ident_names(field.names) {
                let name = parsed.ident(n).to_string();
                st.fields.insert(
                    name.clone(),
                    Field {
                        name,
                        markers: markers.clone(),
                        tags: tags.clone(),
                        typ: typ.clone(),
                    },
                );
            }
        }

        let line = self.line(spec.name.pos.start);
        self.out.add_struct(self.fc.path(), line, st);
    }

    fn classify_interface(
        &mut self,
        a: &AstArena,
        spec: &TypeSpec,
        elems: ListRef<InterfaceElem>,
        markers: Markers,
    ) {
        let fc = self.fc;
        let parsed = &fc.parsed;
        let mut iface = Interface {
            name: parsed.ident(spec.name).to_string(),
            markers,
            ..Interface::default()
        };

        for elem in a.interface_elems(elems) {
            match *elem {
                InterfaceElem::Method { name, sig, doc, .. } => {
                    let name = parsed.ident(name).to_string();
                    let func = Func {
                        name: name.clone(),
                        markers: self.markers(doc),
                        has_receiver: false,
                        receiver_name: String::new(),
                        def: self.resolver.func_def(self.file, sig),
                    };
                    iface.methods.insert(name, func);
                }
                InterfaceElem::TypeElem { terms, doc, .. } => {
                    // Unions and `~T` constrain the type set; they embed nothing.
                    let &[TypeTerm::Type { typ }] = a.type_terms(terms) else {
                        continue;
                    };
                    let Some(name) = base_type_name(a, typ) else {
                        continue;
                    };
                    let name = parsed.ident(name).to_string();
                    let type_name = self.resolver.resolve(self.file, typ).type_name;
                    iface.embedded_types.insert(
                        name.clone(),
                        EmbeddedType {
                            name,
                            type_name,
                            markers: self.markers(doc),
                        },
                    );
                }
            }
        }

        let line = self.line(spec.name.pos.start);
        self.out.add_interface(self.fc.path(), line, iface);
    }
}

impl<'ast, 'r, 'a> Visitor<'ast> for Classifier<'r, 'a> {
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        let decl = a.decls[id];
        self.decl_doc = if decl.is_grouped() { None } else { decl.doc };
        self.last_const = None;
        walk_decl(a, id, self);
    }

    fn visit_value_spec(&mut self, a: &'ast AstArena, decl: DeclId, spec: &'ast ValueSpec) {
        let kind = a.decls[decl].kind;
        let markers = self.markers(spec.doc.or(self.decl_doc));
        let names = a.ident_names(spec.names);
        let line = self.line(names.first().map_or(a.decls.span(decl).start, |n| n.pos.start));

        let (typ, values) = match kind {
            GenDeclKind::Const if spec.typ.is_none() && spec.values.is_empty() => {
                self.last_const.unwrap_or((None, ListRef::EMPTY))
            }
            GenDeclKind::Const => {
                self.last_const = Some((spec.typ, spec.values));
                (spec.typ, spec.values)
            }
            _ => (spec.typ, spec.values),
        };
        let values = a.exprs_list(values);

        if !values.is_empty() && values.len() != names.len() {
            let what = if kind == GenDeclKind::Const { "const" } else { "var" };
            self.out.diagnostic(
                self.fc.path(),
                line,
                format!(
                    "skipped {what} declaration: {} names but {} values",
                    names.len(),
                    values.len()
                ),
            );
            return;
        }

        let fc = self.fc;
        let parsed = &fc.parsed;
        let declared = typ.map(|t| self.resolver.resolve(self.file, t));

        for (i, &n) in names.iter().enumerate() {
            let name = parsed.ident(n);
            if name == "_" {
                continue;
            }
            let value = values.get(i).copied();
            let line = self.line(n.pos.start);

            if kind == GenDeclKind::Const {
                let type_name = match (&declared, value) {
                    (Some(d), _) => d.type_name.clone(),
                    (None, Some(v)) => literal_kind(parsed, v)
                        .map(|k| k.token_name().to_string())
                        .unwrap_or_default(),
                    (None, None) => String::new(),
                };
                let constant = Constant {
                    name: name.to_string(),
                    type_name,
                    markers: markers.clone(),
                    value: value.map(|v| self.text(a, v)).unwrap_or_default(),
                };
                self.out.add_constant(self.fc.path(), line, constant);
            } else {
                let typ = match (&declared, value) {
                    (Some(d), _) => d.clone(),
                    (None, Some(v)) => self.resolver.initializer(self.file, v),
                    (None, None) => TypeDescriptor::default(),
                };
                let var = Var {
                    name: name.to_string(),
                    markers: markers.clone(),
                    typ,
                };
                self.out.add_var(self.fc.path(), line, var);
            }
        }
    }

    fn visit_type_spec(&mut self, a: &'ast AstArena, spec: &'ast TypeSpec) {
        let markers = self.markers(spec.doc.or(self.decl_doc));
        let scope = self.resolver.enter_type_params(self.file, spec.type_params);

        match a.types[a.unparen(spec.typ)] {
            Type::Struct { fields } => self.classify_struct(a, spec, fields, markers),
            Type::Interface { elems } => self.classify_interface(a, spec, elems, markers),
            _ => {
                let name = self.fc.parsed.ident(spec.name).to_string();
                let typ = self.resolver.resolve(self.file, spec.typ);
                let line = self.line(spec.name.pos.start);
                if spec.is_alias() {
                    let alias = AliasType { name, markers, typ };
                    self.out.add_alias(self.fc.path(), line, alias);
                } else {
                    let defined = DefinedType { name, markers, typ };
                    self.out.add_defined_type(self.fc.path(), line, defined);
                }
            }
        }
        self.resolver.leave_scope(scope);
    }

    fn visit_func_decl(&mut self, a: &'ast AstArena, id: FuncDeclId) {
        let decl = a.funcs[id];
        let fc = self.fc;
        let parsed = &fc.parsed;

        let receiver_name = decl
            .recv
            .and_then(|r| base_type_name(a, r.typ))
            .map(|n| parsed.ident(n).to_string())
            .unwrap_or_default();

        let scope = self.resolver.enter_type_params(self.file, decl.type_params);
        if let Some(recv) = decl.recv {
            self.resolver.enter_receiver(self.file, recv.typ);
        }
        let def = self.resolver.func_def(self.file, decl.signature);
        self.resolver.leave_scope(scope);

        let func = Func {
            name: parsed.ident(decl.name).to_string(),
            markers: self.markers(decl.doc),
            has_receiver: decl.recv.is_some(),
            receiver_name,
            def,
        };
        let line = self.line(decl.name.pos.start);
        self.out.add_func(self.fc.path(), line, Arc::new(func));
    }
}

/// Bare identifier of a named type, through pointers, parentheses, package
/// qualifiers and type arguments: `*pkg.T[int]` gives `T`.
fn base_type_name(a: &AstArena, mut typ: TypeId) -> Option<IdentName> {
    loop {
        match a.types[typ] {
            Type::Pointer { elem } => typ = elem,
            Type::Paren { typ: inner } => typ = inner,
            Type::Named { name, .. } => return Some(name),
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble;
    use crate::model::Package;
    use goreflect_syntax::parse_source;

    fn classify(src: &str) -> (Package, Vec<String>) {
        let fc = FileContext::new("x.go", parse_source(src).unwrap());
        let mut r = assemble(vec![fc]);
        let diags = r.diagnostics.iter().map(|d| d.message.clone()).collect();
        (r.packages.remove("p").unwrap(), diags)
    }

    #[test]
    fn const_group_repeats_previous_spec() {
        let (p, diags) = classify("package p\nconst (\n\tA int = 1\n\tB\n\tC = \"c\"\n)\n");
        assert!(diags.is_empty());
        assert_eq!(p.constants["A"].type_name, "int");
        assert_eq!(p.constants["B"].type_name, "int");
        assert_eq!(p.constants["B"].value, "1");
        assert_eq!(p.constants["C"].type_name, "string");
        assert_eq!(p.constants["C"].value, "\"c\"");
    }

    #[test]
    fn mismatched_multi_name_spec_is_skipped() {
        let (p, diags) = classify("package p\nvar a, b = f()\nvar c, d = 1, 2.5\n");
        assert!(!p.vars.contains_key("a") && !p.vars.contains_key("b"));
        assert_eq!(p.vars["c"].typ.type_name, "int");
        assert_eq!(p.vars["d"].typ.type_name, "float64");
        assert_eq!(diags, ["skipped var declaration: 2 names but 1 values"]);
    }

    #[test]
    fn grouped_specs_use_their_own_doc() {
        let (p, _) = classify(
            "package p\n\n// +Group=true\nvar (\n\t// +X=1\n\tx = 1\n\ty = 2\n)\n\n// +Z=3\nvar z int\n",
        );
        assert_eq!(p.vars["x"].markers.len(), 1);
        assert_eq!(p.vars["x"].markers["+X"], "1");
        assert!(p.vars["y"].markers.is_empty());
        assert_eq!(p.vars["z"].markers["+Z"], "3");
        assert_eq!(p.vars["z"].typ.type_name, "int");
    }

    #[test]
    fn receivers_strip_pointers_and_type_arguments() {
        let (p, _) = classify("package p\ntype L[T any] struct{}\nfunc (l *L[T]) Len() int { return 0 }\n");
        let f = &p.functions["Len"];
        assert!(f.has_receiver);
        assert_eq!(f.receiver_name, "L");
        assert_eq!(p.structs["L"].methods.keys().collect::<Vec<_>>(), ["Len"]);
    }

    #[test]
    fn type_parameters_do_not_resolve_to_package_types() {
        let (p, _) = classify(
            "package p\ntype T struct{ A int }\nfunc Id[T any](v T) T { return v }\n\
             type Box[T any] struct{ V T }\nfunc (b Box[T]) Get() T { return b.V }\n",
        );
        let id = &p.functions["Id"].def;
        assert!(id.params[0].typ.is_named());
        assert_eq!(id.params[0].typ.external_type_name, "T");
        assert!(id.results[0].typ.is_named());

        let v = &p.structs["Box"].fields["V"].typ;
        assert!(v.is_named());
        assert_eq!(v.external_type_name, "T");

        let get = &p.functions["Get"];
        assert_eq!(get.receiver_name, "Box");
        assert!(get.def.results[0].typ.is_named());
        assert_eq!(get.def.results[0].typ.external_type_name, "T");
    }

    #[test]
    fn unions_embed_nothing() {
        let (p, _) = classify("package p\ntype Num interface {\n\t~int | float64\n\tString() string\n}\n");
        let i = &p.interfaces["Num"];
        assert!(i.embedded_types.is_empty());
        assert_eq!(i.methods.keys().collect::<Vec<_>>(), ["String"]);
    }
}
