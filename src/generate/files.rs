use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Granularity;
use crate::error::AnalysisError;

/// One template registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSpec {
    /// Output path; itself a template over the context.
    pub destination_path: String,
    pub template_path: String,
    #[serde(default)]
    pub format_source: bool,
    #[serde(alias = "type")]
    pub granularity: Granularity,
}

impl FileSpec {
    pub fn new(
        granularity: Granularity,
        template_path: impl Into<String>,
        destination_path: impl Into<String>,
    ) -> Self {
        Self {
            destination_path: destination_path.into(),
            template_path: template_path.into(),
            format_source: false,
            granularity,
        }
    }

    pub fn format_source(mut self, format: bool) -> Self {
        self.format_source = format;
        self
    }
}

/// Registered templates, in registration order.
///
/// The TOML manifest form is a list of `[[file]]` tables:
///
/// ```toml
/// [[file]]
/// granularity = "per-struct"
/// template_path = "templates/struct.tmpl"
/// destination_path = "gen/{{.Struct.Name}}.go"
/// format_source = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Files {
    #[serde(rename = "file", default)]
    files: Vec<FileSpec>,
}

impl Files {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(manifest: &str) -> Result<Self, AnalysisError> {
        Ok(toml::from_str(manifest)?)
    }

    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let manifest = fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&manifest)
    }

    pub fn push(&mut self, file: FileSpec) {
        self.files.push(file);
    }

    /// Registrations of one granularity, in registration order.
    pub fn filter(&self, granularity: Granularity) -> impl Iterator<Item = &FileSpec> {
        self.files
            .iter()
            .filter(move |f| f.granularity == granularity)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileSpec> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl From<Vec<FileSpec>> for Files {
    fn from(files: Vec<FileSpec>) -> Self {
        Self { files }
    }
}

impl FromIterator<FileSpec> for Files {
    fn from_iter<I: IntoIterator<Item = FileSpec>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Files {
    type Item = &'a FileSpec;
    type IntoIter = std::slice::Iter<'a, FileSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}
