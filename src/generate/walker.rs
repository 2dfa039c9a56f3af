use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

use super::{Context, FileSpec, Files, Granularity};
use crate::model::{Package, Results};

pub type EmitError = Box<dyn StdError + Send + Sync + 'static>;

/// Renders one registered template against one context snapshot.
pub trait Emitter {
    fn emit(&mut self, file: &FileSpec, ctx: &Context<'_>) -> Result<(), EmitError>;
}

impl<F> Emitter for F
where
    F: FnMut(&FileSpec, &Context<'_>) -> Result<(), EmitError>,
{
    fn emit(&mut self, file: &FileSpec, ctx: &Context<'_>) -> Result<(), EmitError> {
        self(file, ctx)
    }
}

#[derive(Debug, Error)]
#[error("{granularity} template {template_path} -> {destination_path} at `{scope}`: {cause}")]
pub struct EmissionFailure {
    pub granularity: Granularity,
    pub template_path: String,
    pub destination_path: String,
    pub scope: String,
    #[source]
    pub cause: EmitError,
}

/// Every emission that failed during one walk, one per line when displayed.
#[derive(Debug, Error)]
#[error("{}", Lines(failures))]
pub struct GenerateError {
    pub failures: Vec<EmissionFailure>,
}

struct Lines<'a>(&'a [EmissionFailure]);

impl fmt::Display for Lines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

/// Walks `results` and emits every registered template at its granularity.
///
/// Order: global; then per package: the package, each struct (its fields,
/// then its methods), each interface (then its methods), vars, constants,
/// defined types, aliases and free functions. Siblings are visited in name
/// order. A failed emission is recorded and the walk goes on.
pub fn execute<E>(results: &Results, files: &Files, emitter: &mut E) -> Result<(), GenerateError>
where
    E: Emitter + ?Sized,
{
    let mut walk = Walk {
        files,
        emitter,
        emitted: 0,
        failures: Vec::new(),
    };

    let root = Context::default().with_results(results);
    walk.emit(Granularity::Global, &root);
    for package in results.packages.values() {
        walk.package(&root, package);
    }

    tracing::info!(
        emitted = walk.emitted,
        failed = walk.failures.len(),
        "generation walk finished"
    );
    if walk.failures.is_empty() {
        Ok(())
    } else {
        Err(GenerateError {
            failures: walk.failures,
        })
    }
}

struct Walk<'f, 'e, E: ?Sized> {
    files: &'f Files,
    emitter: &'e mut E,
    emitted: usize,
    failures: Vec<EmissionFailure>,
}

impl<E: Emitter + ?Sized> Walk<'_, '_, E> {
    fn package<'m>(&mut self, root: &Context<'m>, package: &'m Package) {
        tracing::debug!(package = %package.name, "walking package");
        let ctx = root.with_package(package);
        self.emit(Granularity::PerPackage, &ctx);

        for st in package.structs.values() {
            let ctx = ctx.with_struct(st);
            self.emit(Granularity::PerStruct, &ctx);
            for field in st.fields.values() {
                self.emit(Granularity::PerStructField, &ctx.with_field(field));
            }
            for method in st.methods.values() {
                self.emit(Granularity::PerStructMethod, &ctx.with_struct_method(method));
            }
        }

        for iface in package.interfaces.values() {
            let ctx = ctx.with_interface(iface);
            self.emit(Granularity::PerInterface, &ctx);
            for method in iface.methods.values() {
                self.emit(
                    Granularity::PerInterfaceMethod,
                    &ctx.with_interface_method(method),
                );
            }
        }

        for var in package.vars.values() {
            self.emit(Granularity::PerVar, &ctx.with_var(var));
        }
        for constant in package.constants.values() {
            self.emit(Granularity::PerConstant, &ctx.with_constant(constant));
        }
        for defined in package.defined_types.values() {
            self.emit(Granularity::PerDefinedType, &ctx.with_defined_type(defined));
        }
        for alias in package.aliases.values() {
            self.emit(Granularity::PerAlias, &ctx.with_alias(alias));
        }
        for func in package.free_functions() {
            self.emit(Granularity::PerFunc, &ctx.with_func(func));
        }
    }

    fn emit(&mut self, granularity: Granularity, ctx: &Context<'_>) {
        let files = self.files;
        for file in files.filter(granularity) {
            self.emitted += 1;
            if let Err(cause) = self.emitter.emit(file, ctx) {
                let scope = ctx.scope();
                tracing::warn!(
                    %granularity,
                    template = %file.template_path,
                    scope = %scope,
                    error = %cause,
                    "emission failed"
                );
                self.failures.push(EmissionFailure {
                    granularity,
                    template_path: file.template_path.clone(),
                    destination_path: file.destination_path.clone(),
                    scope,
                    cause,
                });
            }
        }
    }
}
