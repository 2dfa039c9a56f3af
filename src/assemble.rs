//! Package model assembly.
//!
//! Files are grouped by package clause. Each group is classified against a
//! package-wide type index, then methods are linked to their receiver structs
//! in one pass once every file has been seen.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::classify::Classifier;
use crate::model::{
    AliasType, Constant, DefinedType, Diagnostic, Func, Interface, Package, Results, Struct, Var,
};
use crate::resolve::{FileContext, Resolver, TypeIndex};

/// Collects one package's entities and the findings made while building it.
#[derive(Debug)]
pub(crate) struct PackageBuilder {
    package: Package,
    diagnostics: Vec<Diagnostic>,
}

impl PackageBuilder {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            package: Package::new(name),
            diagnostics: Vec::new(),
        }
    }

    pub(crate) fn diagnostic(&mut self, path: &Path, line: u32, message: String) {
        tracing::warn!(path = %path.display(), line, "{message}");
        self.diagnostics.push(Diagnostic {
            path: path.to_path_buf(),
            line,
            message,
        });
    }

    pub(crate) fn add_struct(&mut self, path: &Path, line: u32, value: Struct) {
        let name = value.name.clone();
        if self.package.structs.insert(name.clone(), value).is_some() {
            self.overwritten(path, line, "struct", &name);
        }
    }

    pub(crate) fn add_interface(&mut self, path: &Path, line: u32, value: Interface) {
        let name = value.name.clone();
        if self.package.interfaces.insert(name.clone(), value).is_some() {
            self.overwritten(path, line, "interface", &name);
        }
    }

    pub(crate) fn add_defined_type(&mut self, path: &Path, line: u32, value: DefinedType) {
        let name = value.name.clone();
        if self.package.defined_types.insert(name.clone(), value).is_some() {
            self.overwritten(path, line, "defined type", &name);
        }
    }

    pub(crate) fn add_alias(&mut self, path: &Path, line: u32, value: AliasType) {
        let name = value.name.clone();
        if self.package.aliases.insert(name.clone(), value).is_some() {
            self.overwritten(path, line, "alias", &name);
        }
    }

    pub(crate) fn add_var(&mut self, path: &Path, line: u32, value: Var) {
        let name = value.name.clone();
        if self.package.vars.insert(name.clone(), value).is_some() {
            self.overwritten(path, line, "var", &name);
        }
    }

    pub(crate) fn add_constant(&mut self, path: &Path, line: u32, value: Constant) {
        let name = value.name.clone();
        if self.package.constants.insert(name.clone(), value).is_some() {
            self.overwritten(path, line, "constant", &name);
        }
    }

    /// Functions and methods share one namespace keyed by name.
    pub(crate) fn add_func(&mut self, path: &Path, line: u32, value: Arc<Func>) {
        let name = value.name.clone();
        if self.package.functions.insert(name.clone(), value).is_some() {
            self.overwritten(path, line, "function", &name);
        }
    }

    fn overwritten(&mut self, path: &Path, line: u32, kind: &str, name: &str) {
        self.diagnostic(
            path,
            line,
            format!("duplicate {kind} `{name}` in package `{}` overwrites an earlier declaration", self.package.name),
        );
    }

    /// Shares every method into the struct named by its receiver.
    pub(crate) fn link_methods(&mut self) {
        let Package {
            structs, functions, ..
        } = &mut self.package;
        for func in functions.values().filter(|f| f.has_receiver) {
            if let Some(st) = structs.get_mut(&func.receiver_name) {
                st.methods.insert(func.name.clone(), Arc::clone(func));
            }
        }
    }

    pub(crate) fn finish(mut self) -> (Package, Vec<Diagnostic>) {
        self.link_methods();
        (self.package, self.diagnostics)
    }
}

/// Builds the model for a set of parsed files.
pub fn assemble(files: Vec<FileContext>) -> Results {
    let mut groups: BTreeMap<String, Vec<FileContext>> = BTreeMap::new();
    for fc in files {
        groups.entry(fc.package_name().to_string()).or_default().push(fc);
    }

    let mut results = Results::default();
    for (name, files) in groups {
        let (package, diagnostics) = assemble_package(&name, &files);
        tracing::debug!(
            package = %name,
            files = files.len(),
            structs = package.structs.len(),
            functions = package.functions.len(),
            "assembled package"
        );
        results.diagnostics.extend(diagnostics);
        results.packages.insert(name, package);
    }
    results
}

fn assemble_package(name: &str, files: &[FileContext]) -> (Package, Vec<Diagnostic>) {
    let index = TypeIndex::build(files);
    let mut resolver = Resolver::new(name, files, &index);
    let mut builder = PackageBuilder::new(name);

    for (i, fc) in files.iter().enumerate() {
        Classifier::new(i, fc, &mut resolver, &mut builder).run();
    }
    builder.finish()
}
