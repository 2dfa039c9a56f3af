//! Template-driven generation walk over a [`Results`](crate::model::Results)
//! model. Rendering and writing files is left to an [`Emitter`].

mod context;
mod files;
mod granularity;
mod walker;

pub use context::Context;
pub use files::{FileSpec, Files};
pub use granularity::Granularity;
pub use walker::{EmissionFailure, EmitError, Emitter, GenerateError, execute};
