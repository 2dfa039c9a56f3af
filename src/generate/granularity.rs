use std::fmt;

use serde::{Deserialize, Serialize};

/// Nesting tier a template is registered at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    Global,
    PerPackage,
    PerStruct,
    PerStructField,
    PerStructMethod,
    PerInterface,
    PerInterfaceMethod,
    PerVar,
    PerConstant,
    PerDefinedType,
    PerAlias,
    PerFunc,
}

impl Granularity {
    /// Every granularity, in walk order.
    pub const ALL: [Granularity; 12] = [
        Granularity::Global,
        Granularity::PerPackage,
        Granularity::PerStruct,
        Granularity::PerStructField,
        Granularity::PerStructMethod,
        Granularity::PerInterface,
        Granularity::PerInterfaceMethod,
        Granularity::PerVar,
        Granularity::PerConstant,
        Granularity::PerDefinedType,
        Granularity::PerAlias,
        Granularity::PerFunc,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Granularity::Global => "global",
            Granularity::PerPackage => "per-package",
            Granularity::PerStruct => "per-struct",
            Granularity::PerStructField => "per-struct-field",
            Granularity::PerStructMethod => "per-struct-method",
            Granularity::PerInterface => "per-interface",
            Granularity::PerInterfaceMethod => "per-interface-method",
            Granularity::PerVar => "per-var",
            Granularity::PerConstant => "per-constant",
            Granularity::PerDefinedType => "per-defined-type",
            Granularity::PerAlias => "per-alias",
            Granularity::PerFunc => "per-func",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
