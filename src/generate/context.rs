use serde::Serialize;

use crate::model::{
    AliasType, Constant, DefinedType, Field, Func, Interface, Package, Results, Struct, Var,
};

/// Snapshot of the walk position handed to each emission.
///
/// Every level derives a new value from its parent. Slots that do not apply
/// to the current position are `None` and are left out when serialized.
///
/// `results` is set at every level, the global emission included, so a
/// global template can range over all packages.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Context<'m> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<&'m Results>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<&'m Package>,
    #[serde(rename = "struct", skip_serializing_if = "Option::is_none")]
    pub structure: Option<&'m Struct>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'m Field>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub struct_method: Option<&'m Func>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<&'m Interface>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface_method: Option<&'m Func>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub var: Option<&'m Var>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constant: Option<&'m Constant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defined_type: Option<&'m DefinedType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<&'m AliasType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub func: Option<&'m Func>,
}

impl<'m> Context<'m> {
    pub fn with_results(self, results: &'m Results) -> Self {
        Self {
            results: Some(results),
            ..self
        }
    }

    pub fn with_package(self, package: &'m Package) -> Self {
        Self {
            package: Some(package),
            ..self
        }
    }

    pub fn with_struct(self, structure: &'m Struct) -> Self {
        Self {
            structure: Some(structure),
            ..self
        }
    }

    pub fn with_field(self, field: &'m Field) -> Self {
        Self {
            field: Some(field),
            ..self
        }
    }

    pub fn with_struct_method(self, method: &'m Func) -> Self {
        Self {
            struct_method: Some(method),
            ..self
        }
    }

    pub fn with_interface(self, interface: &'m Interface) -> Self {
        Self {
            interface: Some(interface),
            ..self
        }
    }

    pub fn with_interface_method(self, method: &'m Func) -> Self {
        Self {
            interface_method: Some(method),
            ..self
        }
    }

    pub fn with_var(self, var: &'m Var) -> Self {
        Self {
            var: Some(var),
            ..self
        }
    }

    pub fn with_constant(self, constant: &'m Constant) -> Self {
        Self {
            constant: Some(constant),
            ..self
        }
    }

    pub fn with_defined_type(self, defined: &'m DefinedType) -> Self {
        Self {
            defined_type: Some(defined),
            ..self
        }
    }

    pub fn with_alias(self, alias: &'m AliasType) -> Self {
        Self {
            alias: Some(alias),
            ..self
        }
    }

    pub fn with_func(self, func: &'m Func) -> Self {
        Self {
            func: Some(func),
            ..self
        }
    }

    /// Slash-joined names from the package down, e.g. `pkg/User/ID`.
    /// Empty at global level.
    pub fn scope(&self) -> String {
        let owner = self
            .structure
            .map(|s| s.name.as_str())
            .or(self.interface.map(|i| i.name.as_str()));
        let member = [
            self.field.map(|f| f.name.as_str()),
            self.struct_method.map(|m| m.name.as_str()),
            self.interface_method.map(|m| m.name.as_str()),
            self.var.map(|v| v.name.as_str()),
            self.constant.map(|c| c.name.as_str()),
            self.defined_type.map(|d| d.name.as_str()),
            self.alias.map(|a| a.name.as_str()),
            self.func.map(|f| f.name.as_str()),
        ]
        .into_iter()
        .flatten()
        .next();

        [self.package.map(|p| p.name.as_str()), owner, member]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_paths() {
        let pkg = Package::new("pkg");
        let user = Struct {
            name: "User".into(),
            ..Struct::default()
        };
        let id = Field {
            name: "ID".into(),
            ..Field::default()
        };

        let root = Context::default();
        assert_eq!(root.scope(), "");

        let p = root.with_package(&pkg);
        let s = p.with_struct(&user);
        let f = s.with_field(&id);
        assert_eq!(p.scope(), "pkg");
        assert_eq!(s.scope(), "pkg/User");
        assert_eq!(f.scope(), "pkg/User/ID");
        // Deriving never touches the parent snapshot.
        assert!(s.field.is_none());
    }

    #[test]
    fn serializes_only_present_slots() {
        let pkg = Package::new("pkg");
        let v = serde_json::to_value(Context::default().with_package(&pkg)).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(v["package"]["name"], "pkg");
    }
}
