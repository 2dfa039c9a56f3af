//! Reflection model produced by analysis and consumed by the generation walk.
//!
//! Containers are `BTreeMap`s keyed by declared name, so iteration order (and
//! therefore generation order) is sorted and deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

/// Doc-comment markers: `// +Key=Value` becomes `"+Key" -> "Value"`.
pub type Markers = BTreeMap<String, String>;

/// Struct tags: namespace to ordered values (`json:"id,omitempty"`).
pub type Tags = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Results {
    pub packages: BTreeMap<String, Package>,
    /// Non-fatal findings: skipped declarations, overwritten duplicates.
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Package {
    pub name: String,
    pub structs: BTreeMap<String, Struct>,
    pub interfaces: BTreeMap<String, Interface>,
    pub defined_types: BTreeMap<String, DefinedType>,
    pub aliases: BTreeMap<String, AliasType>,
    pub vars: BTreeMap<String, Var>,
    pub constants: BTreeMap<String, Constant>,
    /// Free functions and methods. Methods are shared into their struct.
    pub functions: BTreeMap<String, Arc<Func>>,
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Functions declared without a receiver.
    pub fn free_functions(&self) -> impl Iterator<Item = &Arc<Func>> {
        self.functions.values().filter(|f| !f.has_receiver)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Struct {
    pub name: String,
    pub markers: Markers,
    pub fields: BTreeMap<String, Field>,
    /// Methods whose receiver is this struct, keyed by method name.
    ///
    /// Package functions share one name space, so when two receivers declare
    /// a method of the same name only the later declaration is kept, and
    /// only its struct lists it. The overwrite is reported as a diagnostic.
    pub methods: BTreeMap<String, Arc<Func>>,
    pub embedded_fields: BTreeMap<String, EmbeddedField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Field {
    pub name: String,
    pub markers: Markers,
    pub tags: Tags,
    #[serde(rename = "type")]
    pub typ: TypeDescriptor,
}

/// Struct member declared by type only (`io.Reader`, `*Base`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbeddedField {
    /// Bare identifier of the embedded type.
    pub name: String,
    pub type_name: String,
    pub markers: Markers,
    pub tags: Tags,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Interface {
    pub name: String,
    pub markers: Markers,
    pub methods: BTreeMap<String, Func>,
    pub embedded_types: BTreeMap<String, EmbeddedType>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbeddedType {
    pub name: String,
    pub type_name: String,
    pub markers: Markers,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Func {
    pub name: String,
    pub markers: Markers,
    pub has_receiver: bool,
    /// Receiver base type, pointer and type arguments stripped. Empty for
    /// free functions and interface methods.
    pub receiver_name: String,
    #[serde(flatten)]
    pub def: FuncDef,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FuncDef {
    pub is_variadic: bool,
    pub params: Vec<Param>,
    pub results: Vec<ResultInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub typ: TypeDescriptor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultInfo {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub typ: TypeDescriptor,
}

/// `type X Y`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DefinedType {
    pub name: String,
    pub markers: Markers,
    #[serde(rename = "type")]
    pub typ: TypeDescriptor,
}

/// `type X = Y`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AliasType {
    pub name: String,
    pub markers: Markers,
    #[serde(rename = "type")]
    pub typ: TypeDescriptor,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Constant {
    pub name: String,
    /// Declared type, else the literal kind (`int`, `float`, `imag`, `char`,
    /// `string`), else empty.
    pub type_name: String,
    pub markers: Markers,
    /// Value expression as written.
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Var {
    pub name: String,
    pub markers: Markers,
    #[serde(rename = "type")]
    pub typ: TypeDescriptor,
}

/// Resolved type expression.
///
/// `type_name` renders the type as written in its package; `external_type_name`
/// qualifies package-local named types (`map[string]models.User`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeDescriptor {
    pub type_name: String,
    pub external_type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imported: Option<ImportedType>,
    pub shape: Shape,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Named,
    Pointer {
        elem: Box<TypeDescriptor>,
    },
    Map {
        key: Box<TypeDescriptor>,
        value: Box<TypeDescriptor>,
    },
    Slice {
        elem: Box<TypeDescriptor>,
    },
    Struct,
    Chan {
        dir: ChanDirection,
        elem: Box<TypeDescriptor>,
    },
    Func {
        def: FuncDef,
    },
    Interface,
    /// Variadic parameter element (`...T`).
    Ellipsis {
        elem: Box<TypeDescriptor>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDirection {
    #[default]
    Both,
    Send,
    Recv,
}

impl TypeDescriptor {
    /// Named descriptor with the same text in both renderings.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            external_type_name: name.clone(),
            type_name: name,
            imported: None,
            shape: Shape::Named,
        }
    }

    pub fn is_named(&self) -> bool {
        matches!(self.shape, Shape::Named)
    }
    pub fn is_pointer(&self) -> bool {
        matches!(self.shape, Shape::Pointer { .. })
    }
    pub fn is_map(&self) -> bool {
        matches!(self.shape, Shape::Map { .. })
    }
    pub fn is_slice(&self) -> bool {
        matches!(self.shape, Shape::Slice { .. })
    }
    pub fn is_struct(&self) -> bool {
        matches!(self.shape, Shape::Struct)
    }
    pub fn is_chan(&self) -> bool {
        matches!(self.shape, Shape::Chan { .. })
    }
    pub fn is_func(&self) -> bool {
        matches!(self.shape, Shape::Func { .. })
    }
    pub fn is_interface(&self) -> bool {
        matches!(self.shape, Shape::Interface)
    }
    pub fn is_ellipsis(&self) -> bool {
        matches!(self.shape, Shape::Ellipsis { .. })
    }
    pub fn is_imported(&self) -> bool {
        self.imported.is_some()
    }

    /// Function definition for `Func`-shaped descriptors.
    pub fn func(&self) -> Option<&FuncDef> {
        match &self.shape {
            Shape::Func { def } => Some(def),
            _ => None,
        }
    }
}

/// Side record for a type referenced through an import qualifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportedType {
    /// Bare identifier (`Duration`).
    pub type_name: String,
    /// Import path as written, quotes included.
    pub import_raw: String,
    pub package_path: String,
    /// Last path segment.
    pub package_default_alias: String,
    /// Explicit import name, when one was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub path: PathBuf,
    /// One-based.
    pub line: u32,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.message)
    }
}
