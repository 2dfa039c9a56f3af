//! Static reflection over Go packages, plus a template generation walk.
//!
//! - [`Parser::parse_directory`] discovers `.go` files, parses them with
//!   `goreflect-syntax` and builds one [`Package`] per package clause.
//! - [`generate::execute`] walks the resulting [`Results`] and hands a
//!   [`generate::Context`] snapshot to an [`generate::Emitter`] for every
//!   registered template.

pub mod assemble;
mod classify;
pub mod error;
pub mod generate;
pub mod loader;
pub mod markers;
pub mod model;
pub mod resolve;

pub use assemble::assemble;
pub use error::AnalysisError;
pub use loader::{ParseOptions, Parser};
pub use markers::{parse_markers, parse_tags};
pub use model::{
    AliasType, ChanDirection, Constant, DefinedType, Diagnostic, EmbeddedField, EmbeddedType,
    Field, Func, FuncDef, ImportedType, Interface, Markers, Package, Param, ResultInfo, Results,
    Shape, Struct, Tags, TypeDescriptor, Var,
};
