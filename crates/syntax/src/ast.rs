//! # Declaration-level Go AST
//!
//! Arena-allocated syntax tree covering everything a reflection pass needs:
//! package clause, imports, const/var/type groups, functions and methods,
//! and every type expression. Statement bodies are kept as brace spans only.
//!
//! ## Architecture
//!
//! - **Nodes**: allocated in typed arenas (`SpannedArena<T>`) with side-table spans
//! - **Lists**: centralized buffers addressed by `ListRef<T>`
//! - **Symbols**: identifiers are interned once per file (`Interner`)
//! - **Comments**: every comment is kept; groups are attached as `doc` /
//!   `comment` on the nodes they document (see `crate::comments`)

use core::marker::PhantomData;
use core::ops::Index;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

pub use crate::error::Span;

// =============================================================================
// Ids and list references
// =============================================================================

/// Typed index into a `SpannedArena<T>`.
#[derive(Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }
}

/// Typed slice into one of the `ExtraData` buffers.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    const fn range(&self) -> core::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

// =============================================================================
// Symbol interning
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Symbol(u32);

pub type Ident = Symbol;

/// Identifier occurrence: interned symbol plus its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentName {
    pub sym: Ident,
    pub pos: Span,
}

/// Pass-through hasher: bucket keys are already hashes.
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = self.0.rotate_left(8) ^ u64::from(b);
        }
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let bucket = self.buckets.entry(h).or_default();

        if let Some(&sym) = bucket
            .iter()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
        {
            return sym;
        }

        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        bucket.push(sym);
        sym
    }

    /// Symbols only come from this interner, so lookup is infallible; a
    /// foreign symbol resolves to the empty string.
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.strings.get(sym.0 as usize).map_or("", |s| s.as_ref())
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arenas
// =============================================================================

/// Nodes and their spans in parallel vectors.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

pub type DeclId = Id<GenDecl>;
pub type FuncDeclId = Id<FuncDecl>;
pub type TypeId = Id<Type>;
pub type ExprId = Id<Expr>;
pub type FieldId = Id<Field>;
pub type SignatureId = Id<Signature>;
pub type TypeParamsId = Id<TypeParams>;
pub type CommentId = Id<Comment>;
pub type CommentGroupId = Id<CommentGroup>;

/// Centralized list buffers that `ListRef<T>` points into.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub ident_names: Vec<IdentName>,
    pub exprs: Vec<ExprId>,
    pub types: Vec<TypeId>,
    pub fields: Vec<FieldId>,
    pub specs: Vec<Spec>,
    pub top_decls: Vec<TopLevelDecl>,
    pub type_terms: Vec<TypeTerm>,
    pub interface_elems: Vec<InterfaceElem>,
    pub comment_ids: Vec<CommentId>,
    pub comment_group_ids: Vec<CommentGroupId>,
}

#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<GenDecl>,
    pub funcs: SpannedArena<FuncDecl>,
    pub types: SpannedArena<Type>,
    pub exprs: SpannedArena<Expr>,
    pub signatures: SpannedArena<Signature>,
    pub fields: SpannedArena<Field>,
    pub type_params: SpannedArena<TypeParams>,
    pub comments: SpannedArena<Comment>,
    pub comment_groups: SpannedArena<CommentGroup>,
    pub extras: ExtraData,
}

macro_rules! list_buffers {
    ($($builder:ident / $getter:ident : $t:ty => $buf:ident),* $(,)?) => {
        impl AstArena {
            $(
                pub fn $builder(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                    Self::push_list(&mut self.extras.$buf, items)
                }

                pub fn $getter(&self, r: ListRef<$t>) -> &[$t] {
                    &self.extras.$buf[r.range()]
                }
            )*
        }
    };
}

list_buffers! {
    list_ident_names / ident_names: IdentName => ident_names,
    list_exprs / exprs_list: ExprId => exprs,
    list_types / types_list: TypeId => types,
    list_fields / fields_list: FieldId => fields,
    list_specs / specs_list: Spec => specs,
    list_top_decls / top_decls: TopLevelDecl => top_decls,
    list_type_terms / type_terms: TypeTerm => type_terms,
    list_interface_elems / interface_elems: InterfaceElem => interface_elems,
    list_comment_ids / comment_ids: CommentId => comment_ids,
    list_comment_group_ids / comment_group_ids: CommentGroupId => comment_group_ids,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        ListRef::new(start as u32, (buf.len() - start) as u32)
    }

    /// Unwraps any number of parentheses around a type.
    pub fn unparen(&self, mut id: TypeId) -> TypeId {
        while let Type::Paren { typ } = self.types[id] {
            id = typ;
        }
        id
    }
}

// =============================================================================
// Comments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
}

/// Comment token; its text is recovered from source via the arena span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comment {
    pub kind: CommentKind,
}

/// Adjacent comments with no token and no blank line between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentGroup {
    pub comments: ListRef<CommentId>,
}

// =============================================================================
// Source file and declarations
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFile {
    pub package_pos: Span,
    pub name: IdentName,
    pub decls: ListRef<TopLevelDecl>,
    /// Every comment group of the file, in source order.
    pub comments: ListRef<CommentGroupId>,
    /// Package doc comment.
    pub doc: Option<CommentGroupId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopLevelDecl {
    Gen(DeclId),
    Func(FuncDeclId),
}

/// `import`, `const`, `type` or `var` declaration, grouped or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenDecl {
    pub doc: Option<CommentGroupId>,
    pub kw_pos: Span,
    pub kind: GenDeclKind,
    pub l_paren: Option<Span>,
    pub specs: ListRef<Spec>,
    pub r_paren: Option<Span>,
}

impl GenDecl {
    pub const fn is_grouped(&self) -> bool {
        self.l_paren.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

impl Spec {
    pub const fn doc(&self) -> Option<CommentGroupId> {
        match self {
            Spec::Import(s) => s.doc,
            Spec::Value(s) => s.doc,
            Spec::Type(s) => s.doc,
        }
    }
}

/// `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSpec {
    pub doc: Option<CommentGroupId>,
    pub name: Option<ImportName>,
    pub path: StringLit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportName {
    Dot(Span),
    Blank(Span),
    Name(IdentName),
}

/// `IdentifierList [ Type ] [ "=" ExpressionList ]`, for both const and var.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSpec {
    pub doc: Option<CommentGroupId>,
    pub names: ListRef<IdentName>,
    pub typ: Option<TypeId>,
    pub values: ListRef<ExprId>,
    pub comment: Option<CommentGroupId>,
}

/// `TypeSpec = AliasDecl | TypeDef`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub doc: Option<CommentGroupId>,
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    /// Position of `=` for `type X = Y`.
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
    pub comment: Option<CommentGroupId>,
}

impl TypeSpec {
    pub const fn is_alias(&self) -> bool {
        self.assign_pos.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuncDecl {
    pub doc: Option<CommentGroupId>,
    pub func_pos: Span,
    pub recv: Option<Receiver>,
    pub name: IdentName,
    pub type_params: Option<TypeParamsId>,
    pub signature: SignatureId,
    /// `None` for external (body-less) declarations.
    pub body: Option<Block>,
}

/// `(r *T[K, V])`; the receiver type keeps its pointer and type arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receiver {
    pub l_paren: Span,
    pub name: Option<IdentName>,
    pub typ: TypeId,
    pub r_paren: Span,
}

/// `[K comparable, V any]`; each entry is a field whose type is the constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeParams {
    pub l_brack: Span,
    pub params: ListRef<FieldId>,
    pub r_brack: Span,
}

/// Statement bodies are not modelled; only their braces are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub l_brace: Span,
    pub r_brace: Span,
}

// =============================================================================
// Signatures and fields
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    pub params: FieldList,
    pub results: Option<Results>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Results {
    /// `(x int, err error)` or `(int, error)`
    Params(FieldList),
    /// Single unparenthesized result.
    Type(TypeId),
}

/// Parameters, results or struct fields, with their delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldList {
    pub open: Span,
    pub fields: ListRef<FieldId>,
    pub close: Span,
}

/// `[ IdentifierList ] [ "..." ] Type [ Tag ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Empty for unnamed parameters and embedded struct members.
    pub names: ListRef<IdentName>,
    pub ellipsis_pos: Option<Span>,
    pub typ: TypeId,
    pub tag: Option<StringLit>,
    pub is_embed: bool,
    pub doc: Option<CommentGroupId>,
    /// Trailing comment on the same line.
    pub comment: Option<CommentGroupId>,
}

// =============================================================================
// Expressions (only the shapes reflection looks at)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expr {
    BasicLit(BasicLit),
    /// `func(x int) int { ... }`
    FuncLit { func_pos: Span, sig: SignatureId, body: Block },
    /// `T{...}`
    CompositeLit { typ: TypeId, body: Block },
    /// `&x`, `-1`, `<-ch`, ...
    Unary { op: UnaryOp, op_pos: Span, expr: ExprId },
    /// Anything else; the span still covers the full expression.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: BasicLitKind,
    pub raw: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BasicLitKind {
    Int,
    Float,
    Imag,
    Rune,
    String,
}

impl BasicLitKind {
    /// Lower-cased token kind name, the way Go's scanner spells it.
    pub const fn token_name(self) -> &'static str {
        match self {
            BasicLitKind::Int => "int",
            BasicLitKind::Float => "float",
            BasicLitKind::Imag => "imag",
            BasicLitKind::Rune => "char",
            BasicLitKind::String => "string",
        }
    }
}

/// Interpreted or raw string literal, quotes included in the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLit {
    pub raw: Span,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// `Name`, `pkg.Name`, `Name[A, B]`
    Named {
        pkg: Option<IdentName>,
        name: IdentName,
        args: ListRef<TypeId>,
    },
    /// `*T`
    Pointer { elem: TypeId },
    /// `[N]T` or `[...]T`; `len` is the span of the length expression.
    Array { len: Span, elem: TypeId },
    /// `[]T`
    Slice { elem: TypeId },
    /// `map[K]V`
    Map { key: TypeId, val: TypeId },
    /// `chan T`, `<-chan T`, `chan<- T`
    Chan { dir: ChanDir, elem: TypeId },
    /// `struct { ... }`
    Struct { fields: FieldList },
    /// `interface { ... }`
    Interface { elems: ListRef<InterfaceElem> },
    /// `func(...) ...`
    Func { sig: SignatureId },
    /// `(T)`
    Paren { typ: TypeId },
    /// `~int | string`, only in constraint position.
    Union { terms: ListRef<TypeTerm> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTerm {
    /// `~T`
    Tilde { tilde_pos: Span, typ: TypeId },
    /// `T`
    Type { typ: TypeId },
}

impl TypeTerm {
    pub const fn typ(&self) -> TypeId {
        match *self {
            TypeTerm::Tilde { typ, .. } | TypeTerm::Type { typ } => typ,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceElem {
    /// `Method(params) results`
    Method {
        name: IdentName,
        sig: SignatureId,
        doc: Option<CommentGroupId>,
        comment: Option<CommentGroupId>,
    },
    /// Embedded type (`io.Reader`) or union (`~int | ~float64`).
    TypeElem {
        terms: ListRef<TypeTerm>,
        doc: Option<CommentGroupId>,
        comment: Option<CommentGroupId>,
    },
}
