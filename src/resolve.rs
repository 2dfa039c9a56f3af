//! Type expression to [`TypeDescriptor`] resolution.
//!
//! Resolution is package-wide: a plain identifier naming a type declared in
//! any file of the package resolves through that declaration, in the
//! declaring file's import context, and keeps the identifier as its name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use goreflect_syntax::ParsedFile;
use goreflect_syntax::ast::{
    BasicLitKind, ChanDir, Expr, ExprId, FieldId, ImportName, ListRef, Results, SignatureId,
    Spec, TopLevelDecl, Type, TypeId, TypeParamsId, TypeSpec, TypeTerm, UnaryOp,
};

use crate::model::{ChanDirection, FuncDef, ImportedType, Param, ResultInfo, Shape, TypeDescriptor};

/// One import as seen by a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub raw: String,
    pub path: String,
    pub default_alias: String,
    pub local_alias: Option<String>,
}

/// A parsed file plus the import mapping its qualifiers are looked up in.
#[derive(Debug)]
pub struct FileContext {
    pub path: PathBuf,
    pub parsed: ParsedFile,
    imports: HashMap<String, Import>,
}

impl FileContext {
    pub fn new(path: impl Into<PathBuf>, parsed: ParsedFile) -> Self {
        let imports = collect_imports(&parsed);
        Self {
            path: path.into(),
            parsed,
            imports,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Import bound to `qualifier` (explicit name, else last path segment).
    pub fn import(&self, qualifier: &str) -> Option<&Import> {
        self.imports.get(qualifier)
    }

    pub fn package_name(&self) -> &str {
        self.parsed.package_name()
    }
}

fn collect_imports(parsed: &ParsedFile) -> HashMap<String, Import> {
    let a = &parsed.arena;
    let mut imports = HashMap::new();

    for decl in a.top_decls(parsed.file.decls) {
        let TopLevelDecl::Gen(id) = *decl else {
            continue;
        };
        for spec in a.specs_list(a.decls[id].specs) {
            let Spec::Import(spec) = spec else {
                continue;
            };
            let raw = parsed.text(spec.path.raw).to_string();
            let path = raw.trim_matches(|c| c == '"' || c == '`').to_string();
            let default_alias = path.rsplit('/').next().unwrap_or_default().to_string();

            let (key, local_alias) = match spec.name {
                Some(ImportName::Dot(_) | ImportName::Blank(_)) => continue,
                Some(ImportName::Name(n)) => {
                    let alias = parsed.ident(n).to_string();
                    (alias.clone(), Some(alias))
                }
                None => (default_alias.clone(), None),
            };
            imports.insert(
                key,
                Import {
                    raw,
                    path,
                    default_alias,
                    local_alias,
                },
            );
        }
    }
    imports
}

/// Package-wide index of type declarations: name to (file index, spec).
#[derive(Debug, Default)]
pub struct TypeIndex {
    entries: HashMap<String, (usize, TypeSpec)>,
}

impl TypeIndex {
    pub fn build(files: &[FileContext]) -> Self {
        let mut entries = HashMap::new();
        for (idx, fc) in files.iter().enumerate() {
            let a = &fc.parsed.arena;
            for decl in a.top_decls(fc.parsed.file.decls) {
                let TopLevelDecl::Gen(id) = *decl else {
                    continue;
                };
                for spec in a.specs_list(a.decls[id].specs) {
                    if let Spec::Type(ts) = spec {
                        entries.insert(fc.parsed.ident(ts.name).to_string(), (idx, *ts));
                    }
                }
            }
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&(usize, TypeSpec)> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

pub struct Resolver<'a> {
    package: &'a str,
    files: &'a [FileContext],
    types: &'a TypeIndex,
    /// Named types currently being resolved; breaks cycles.
    in_progress: Vec<String>,
    /// Type parameters in scope; they shadow package types of the same name.
    type_params: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(package: &'a str, files: &'a [FileContext], types: &'a TypeIndex) -> Self {
        Self {
            package,
            files,
            types,
            in_progress: Vec::new(),
            type_params: Vec::new(),
        }
    }

    /// Brings the type parameters of a generic declaration into scope.
    /// Returns the mark to hand back to [`Resolver::leave_scope`].
    pub fn enter_type_params(&mut self, file: usize, params: Option<TypeParamsId>) -> usize {
        let mark = self.type_params.len();
        let Some(id) = params else {
            return mark;
        };
        let files = self.files;
        let parsed = &files[file].parsed;
        let a = &parsed.arena;
        for &field in a.fields_list(a.type_params[id].params) {
            for &n in a.ident_names(a.fields[field].names) {
                self.type_params.push(parsed.ident(n).to_string());
            }
        }
        mark
    }

    /// Brings receiver type arguments into scope: `K, V` in `(m *Map[K, V])`.
    pub fn enter_receiver(&mut self, file: usize, recv: TypeId) -> usize {
        let mark = self.type_params.len();
        let files = self.files;
        let parsed = &files[file].parsed;
        let a = &parsed.arena;

        let mut typ = recv;
        let args = loop {
            match a.types[typ] {
                Type::Pointer { elem } | Type::Paren { typ: elem } => typ = elem,
                Type::Named { args, .. } => break args,
                _ => return mark,
            }
        };
        for &arg in a.types_list(args) {
            if let Type::Named { pkg: None, name, args } = a.types[arg]
                && args.is_empty()
            {
                self.type_params.push(parsed.ident(name).to_string());
            }
        }
        mark
    }

    pub fn leave_scope(&mut self, mark: usize) {
        self.type_params.truncate(mark);
    }

    pub fn resolve(&mut self, file: usize, id: TypeId) -> TypeDescriptor {
        let files = self.files;
        let fc = &files[file];
        let a = &fc.parsed.arena;

        match a.types[id] {
            Type::Named { pkg: Some(q), name, args } => {
                let qualifier = fc.parsed.ident(q);
                let ident = fc.parsed.ident(name).to_string();
                let (args_local, args_ext) = self.render_args(file, args);

                let Some(import) = fc.import(qualifier) else {
                    let text = format!("{qualifier}.{ident}{args_local}");
                    let mut d = TypeDescriptor::named(text);
                    d.external_type_name = format!("{qualifier}.{ident}{args_ext}");
                    return d;
                };
                let mut d = TypeDescriptor::named(format!(
                    "{}.{ident}{args_local}",
                    import.default_alias
                ));
                d.external_type_name = format!("{}.{ident}{args_ext}", import.default_alias);
                d.imported = Some(ImportedType {
                    type_name: ident,
                    import_raw: import.raw.clone(),
                    package_path: import.path.clone(),
                    package_default_alias: import.default_alias.clone(),
                    local_alias: import.local_alias.clone(),
                });
                d
            }
            Type::Named { pkg: None, name, args } => {
                let ident = fc.parsed.ident(name).to_string();
                let (args_local, args_ext) = self.render_args(file, args);
                self.resolve_local(&ident, &args_local, &args_ext)
            }
            Type::Pointer { elem } => {
                let elem = self.resolve(file, elem);
                wrap("*", elem, |elem| Shape::Pointer { elem })
            }
            Type::Array { elem, .. } | Type::Slice { elem } => {
                let elem = self.resolve(file, elem);
                wrap("[]", elem, |elem| Shape::Slice { elem })
            }
            Type::Map { key, val } => {
                let key = self.resolve(file, key);
                let value = self.resolve(file, val);
                TypeDescriptor {
                    type_name: format!("map[{}]{}", key.type_name, value.type_name),
                    external_type_name: format!(
                        "map[{}]{}",
                        key.external_type_name, value.external_type_name
                    ),
                    imported: None,
                    shape: Shape::Map {
                        key: Box::new(key),
                        value: Box::new(value),
                    },
                }
            }
            Type::Chan { dir, elem } => {
                let elem = self.resolve(file, elem);
                let (prefix, dir) = match dir {
                    ChanDir::Both => ("chan ", ChanDirection::Both),
                    ChanDir::Send => ("chan<- ", ChanDirection::Send),
                    ChanDir::Recv => ("<-chan ", ChanDirection::Recv),
                };
                wrap(prefix, elem, |elem| Shape::Chan { dir, elem })
            }
            Type::Struct { .. } => TypeDescriptor {
                shape: Shape::Struct,
                ..TypeDescriptor::named("struct{}")
            },
            Type::Interface { .. } => TypeDescriptor {
                shape: Shape::Interface,
                ..TypeDescriptor::named("interface{}")
            },
            Type::Func { sig } => self.func_type(file, sig),
            Type::Paren { typ } => self.resolve(file, typ),
            Type::Union { terms } => {
                let mut local = Vec::new();
                let mut ext = Vec::new();
                for term in a.type_terms(terms) {
                    let tilde = if matches!(term, TypeTerm::Tilde { .. }) {
                        "~"
                    } else {
                        ""
                    };
                    let d = self.resolve(file, term.typ());
                    local.push(format!("{tilde}{}", d.type_name));
                    ext.push(format!("{tilde}{}", d.external_type_name));
                }
                let mut d = TypeDescriptor::named(local.join(" | "));
                d.external_type_name = ext.join(" | ");
                d
            }
        }
    }

    /// A plain identifier: a package type resolves through its declaration.
    fn resolve_local(&mut self, ident: &str, args_local: &str, args_ext: &str) -> TypeDescriptor {
        if self.type_params.iter().any(|p| p == ident) {
            return TypeDescriptor::named(ident);
        }
        let decl = match self.types.get(ident) {
            Some(&(file, spec)) if !self.in_progress.iter().any(|n| n == ident) => Some((file, spec)),
            _ => None,
        };
        let Some((file, spec)) = decl else {
            let mut d = TypeDescriptor::named(format!("{ident}{args_local}"));
            d.external_type_name = if self.types.get(ident).is_some() {
                format!("{}.{ident}{args_ext}", self.package)
            } else {
                format!("{ident}{args_ext}")
            };
            return d;
        };

        // The declaration sees its own type parameters, not the caller's.
        let outer = std::mem::take(&mut self.type_params);
        self.enter_type_params(file, spec.type_params);
        self.in_progress.push(ident.to_string());
        let mut d = self.resolve(file, spec.typ);
        self.in_progress.pop();
        self.type_params = outer;

        d.type_name = format!("{ident}{args_local}");
        d.external_type_name = format!("{}.{ident}{args_ext}", self.package);
        d.imported = None;
        d
    }

    fn render_args(&mut self, file: usize, args: ListRef<TypeId>) -> (String, String) {
        if args.is_empty() {
            return (String::new(), String::new());
        }
        let ids = self.files[file].parsed.arena.types_list(args).to_vec();
        let resolved: Vec<_> = ids.into_iter().map(|t| self.resolve(file, t)).collect();
        let local: Vec<_> = resolved.iter().map(|d| d.type_name.as_str()).collect();
        let ext: Vec<_> = resolved.iter().map(|d| d.external_type_name.as_str()).collect();
        (
            format!("[{}]", local.join(", ")),
            format!("[{}]", ext.join(", ")),
        )
    }

    fn func_type(&mut self, file: usize, sig: SignatureId) -> TypeDescriptor {
        let def = self.func_def(file, sig);
        TypeDescriptor {
            type_name: func_type_name(&def, false),
            external_type_name: func_type_name(&def, true),
            imported: None,
            shape: Shape::Func { def },
        }
    }

    /// Parameters and results of a signature, one entry per declared name.
    pub fn func_def(&mut self, file: usize, sig: SignatureId) -> FuncDef {
        let signature = self.files[file].parsed.arena.signatures[sig];

        let mut params = Vec::new();
        for (name, typ) in self.field_entries(file, signature.params.fields) {
            params.push(Param { name, typ });
        }

        let mut results = Vec::new();
        match signature.results {
            Some(Results::Params(list)) => {
                for (name, typ) in self.field_entries(file, list.fields) {
                    results.push(ResultInfo { name, typ });
                }
            }
            Some(Results::Type(t)) => results.push(ResultInfo {
                name: None,
                typ: self.resolve(file, t),
            }),
            None => {}
        }

        let is_variadic = params.last().is_some_and(|p| p.typ.is_ellipsis());
        FuncDef {
            is_variadic,
            params,
            results,
        }
    }

    fn field_entries(
        &mut self,
        file: usize,
        fields: ListRef<FieldId>,
    ) -> Vec<(Option<String>, TypeDescriptor)> {
        let files = self.files;
        let parsed = &files[file].parsed;
        let fields: Vec<_> = parsed
            .arena
            .fields_list(fields)
            .iter()
            .map(|&f| parsed.arena.fields[f])
            .collect();

        let mut out = Vec::new();
        for field in fields {
            let typ = self.field_type(file, field.typ, field.ellipsis_pos.is_some());
            let names = parsed.arena.ident_names(field.names);
            if names.is_empty() {
                out.push((None, typ));
            } else {
                for &n in names {
                    out.push((Some(parsed.ident(n).to_string()), typ.clone()));
                }
            }
        }
        out
    }

    fn field_type(&mut self, file: usize, typ: TypeId, variadic: bool) -> TypeDescriptor {
        let elem = self.resolve(file, typ);
        if variadic {
            wrap("...", elem, |elem| Shape::Ellipsis { elem })
        } else {
            elem
        }
    }

    /// Descriptor implied by an initializer expression.
    pub fn initializer(&mut self, file: usize, expr: ExprId) -> TypeDescriptor {
        let files = self.files;
        let a = &files[file].parsed.arena;
        match a.exprs[expr] {
            Expr::BasicLit(lit) => TypeDescriptor::named(default_type(lit.kind)),
            Expr::FuncLit { sig, .. } => self.func_type(file, sig),
            Expr::CompositeLit { typ, .. } => self.resolve(file, typ),
            Expr::Unary { op: UnaryOp::Addr, expr, .. } => {
                let elem = self.initializer(file, expr);
                if elem.type_name.is_empty() {
                    return TypeDescriptor::default();
                }
                wrap("*", elem, |elem| Shape::Pointer { elem })
            }
            Expr::Unary {
                op: UnaryOp::Add | UnaryOp::Sub | UnaryOp::Xor,
                expr,
                ..
            } => self.initializer(file, expr),
            Expr::Unary { op: UnaryOp::Not, .. } => TypeDescriptor::named("bool"),
            Expr::Unary { .. } | Expr::Other => TypeDescriptor::default(),
        }
    }
}

/// Literal kind name of an untyped constant initializer (`-1` is `int`).
pub fn literal_kind(parsed: &ParsedFile, expr: ExprId) -> Option<BasicLitKind> {
    match parsed.arena.exprs[expr] {
        Expr::BasicLit(lit) => Some(lit.kind),
        Expr::Unary {
            op: UnaryOp::Add | UnaryOp::Sub | UnaryOp::Xor,
            expr,
            ..
        } => literal_kind(parsed, expr),
        _ => None,
    }
}

fn default_type(kind: BasicLitKind) -> &'static str {
    match kind {
        BasicLitKind::Int => "int",
        BasicLitKind::Float => "float64",
        BasicLitKind::Imag => "complex128",
        BasicLitKind::Rune => "rune",
        BasicLitKind::String => "string",
    }
}

fn wrap(
    prefix: &str,
    elem: TypeDescriptor,
    shape: impl FnOnce(Box<TypeDescriptor>) -> Shape,
) -> TypeDescriptor {
    TypeDescriptor {
        type_name: format!("{prefix}{}", elem.type_name),
        external_type_name: format!("{prefix}{}", elem.external_type_name),
        imported: None,
        shape: shape(Box::new(elem)),
    }
}

/// `func(a, b)`, `func(a) r` or `func(a) (r1, r2)`.
pub fn func_type_name(def: &FuncDef, external: bool) -> String {
    let pick = |d: &TypeDescriptor| {
        if external {
            d.external_type_name.clone()
        } else {
            d.type_name.clone()
        }
    };
    let params: Vec<_> = def.params.iter().map(|p| pick(&p.typ)).collect();
    let results: Vec<_> = def.results.iter().map(|r| pick(&r.typ)).collect();

    match results.as_slice() {
        [] => format!("func({})", params.join(", ")),
        [one] => format!("func({}) {one}", params.join(", ")),
        many => format!("func({}) ({})", params.join(", "), many.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use goreflect_syntax::parse_source;

    fn package(srcs: &[&str]) -> (Vec<FileContext>, TypeIndex) {
        let files: Vec<_> = srcs
            .iter()
            .enumerate()
            .map(|(i, s)| FileContext::new(format!("f{i}.go"), parse_source(s).unwrap()))
            .collect();
        let index = TypeIndex::build(&files);
        (files, index)
    }

    /// Resolves the right-hand side of `type <name> ...` in file 0.
    fn resolve_spec(files: &[FileContext], index: &TypeIndex, name: &str) -> TypeDescriptor {
        let &(file, spec) = index.get(name).unwrap();
        let pkg = files[0].package_name();
        Resolver::new(pkg, files, index).resolve(file, spec.typ)
    }

    #[test]
    fn composite_shapes_render_bottom_up() {
        let (files, index) = package(&[
            "package p\ntype Sub struct{}\ntype M map[string][]*Sub\ntype C <-chan int\ntype A [4]byte\n",
        ]);
        let m = resolve_spec(&files, &index, "M");
        assert!(m.is_map());
        assert_eq!(m.type_name, "map[string][]*Sub");
        assert_eq!(m.external_type_name, "map[string][]*p.Sub");
        let Shape::Map { value, .. } = &m.shape else {
            unreachable!()
        };
        assert!(value.is_slice());

        assert_eq!(resolve_spec(&files, &index, "C").type_name, "<-chan int");
        assert_eq!(resolve_spec(&files, &index, "A").type_name, "[]byte");
    }

    #[test]
    fn imported_selector() {
        let (files, index) = package(&[
            "package p\nimport (\n\t\"time\"\n\tts \"google.golang.org/protobuf/types/known/timestamppb\"\n)\ntype D time.Duration\ntype T ts.Timestamp\ntype U unknown.Thing\n",
        ]);
        let d = resolve_spec(&files, &index, "D");
        assert_eq!(d.type_name, "time.Duration");
        let imp = d.imported.unwrap();
        assert_eq!(imp.type_name, "Duration");
        assert_eq!(imp.import_raw, "\"time\"");
        assert_eq!(imp.package_path, "time");
        assert_eq!(imp.package_default_alias, "time");
        assert_eq!(imp.local_alias, None);

        let t = resolve_spec(&files, &index, "T");
        assert_eq!(t.type_name, "timestamppb.Timestamp");
        assert_eq!(t.imported.unwrap().local_alias.as_deref(), Some("ts"));

        let u = resolve_spec(&files, &index, "U");
        assert_eq!(u.type_name, "unknown.Thing");
        assert!(!u.is_imported());
    }

    #[test]
    fn local_identifier_keeps_shape_and_name_across_files() {
        let (files, index) = package(&[
            "package p\ntype AStructType AStruct\n",
            "package p\nimport \"time\"\ntype AStruct struct{ T time.Time }\ntype Stamp time.Time\n",
        ]);
        let d = resolve_spec(&files, &index, "AStructType");
        assert!(d.is_struct());
        assert_eq!(d.type_name, "AStruct");
        assert_eq!(d.external_type_name, "p.AStruct");

        // A local name over an imported type resolves in the declaring file
        // and drops the import record.
        let (files, index) = package(&["package p\ntype Wrapper Stamp\n", files[1].parsed.source.as_str()]);
        let w = resolve_spec(&files, &index, "Wrapper");
        assert_eq!(w.type_name, "Stamp");
        assert!(!w.is_imported());
    }

    #[test]
    fn recursive_types_terminate() {
        let (files, index) = package(&["package p\ntype L []L\ntype A B\ntype B A\n"]);
        let l = resolve_spec(&files, &index, "L");
        assert_eq!(l.type_name, "[]L");
        let a = resolve_spec(&files, &index, "A");
        assert_eq!(a.type_name, "B");
        assert!(a.is_named());
    }

    #[test]
    fn func_types_and_variadics() {
        let (files, index) = package(&[
            "package p\ntype F0 func(a, b int)\ntype F1 func(string) error\ntype F2 func(...int) (int, error)\n",
        ]);
        let f0 = resolve_spec(&files, &index, "F0");
        assert_eq!(f0.type_name, "func(int, int)");
        assert_eq!(f0.func().unwrap().params.len(), 2);
        assert_eq!(resolve_spec(&files, &index, "F1").type_name, "func(string) error");

        let f2 = resolve_spec(&files, &index, "F2");
        assert_eq!(f2.type_name, "func(...int) (int, error)");
        assert!(f2.func().unwrap().is_variadic);
    }

    #[test]
    fn generic_instantiation_renders_arguments() {
        let (files, index) = package(&["package p\ntype Box[T any] struct{ V T }\ntype IntBox Box[int]\n"]);
        let d = resolve_spec(&files, &index, "IntBox");
        assert_eq!(d.type_name, "Box[int]");
        assert!(d.is_struct());
    }

    #[test]
    fn type_parameters_shadow_package_types() {
        let (files, index) = package(&[
            "package p\ntype T struct{ A int }\nfunc Id[T any](v T) T { return v }\n\
             type Pair[T any] func(T) T\ntype Use Pair[T]\n",
        ]);
        let pkg = files[0].package_name();
        let a = &files[0].parsed.arena;
        let Some(TopLevelDecl::Func(id)) = a.top_decls(files[0].parsed.file.decls).get(1).copied() else {
            panic!("expected func decl");
        };
        let decl = a.funcs[id];

        let mut r = Resolver::new(pkg, &files, &index);
        let mark = r.enter_type_params(0, decl.type_params);
        let def = r.func_def(0, decl.signature);
        r.leave_scope(mark);
        let v = &def.params[0].typ;
        assert!(v.is_named());
        assert_eq!(v.type_name, "T");
        assert_eq!(v.external_type_name, "T");
        assert_eq!(def.results[0].typ.external_type_name, "T");

        // Out of scope again, `T` is the package struct.
        let first = a.fields_list(a.signatures[decl.signature].params.fields)[0];
        let t = r.resolve(0, a.fields[first].typ);
        assert!(t.is_struct());
        assert_eq!(t.external_type_name, "p.T");

        // `Pair`'s own parameter stays a parameter when expanded through `Use`.
        let u = resolve_spec(&files, &index, "Use");
        assert_eq!(u.type_name, "Pair[T]");
        let f = u.func().unwrap();
        assert!(f.params[0].typ.is_named());
        assert_eq!(f.params[0].typ.external_type_name, "T");
    }

    #[test]
    fn receiver_type_arguments_are_in_scope() {
        let (files, index) = package(&[
            "package p\ntype K struct{}\ntype M[K comparable] struct{}\nfunc (m *M[K]) Has(k K) bool { return false }\n",
        ]);
        let pkg = files[0].package_name();
        let a = &files[0].parsed.arena;
        let Some(TopLevelDecl::Func(id)) = a.top_decls(files[0].parsed.file.decls).get(2).copied() else {
            panic!("expected func decl");
        };
        let decl = a.funcs[id];

        let mut r = Resolver::new(pkg, &files, &index);
        let mark = r.enter_receiver(0, decl.recv.unwrap().typ);
        let def = r.func_def(0, decl.signature);
        let k = &def.params[0].typ;
        assert!(k.is_named());
        assert_eq!(k.external_type_name, "K");
        r.leave_scope(mark);
        assert!(r.func_def(0, decl.signature).params[0].typ.is_struct());
    }
}
