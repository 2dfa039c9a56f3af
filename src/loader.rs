//! Directory discovery and per-file parsing.

use std::fs;
use std::path::{Path, PathBuf};

use goreflect_syntax::{LineIndex, ParseFailure, Tok, parse_source, tokenize};
use regex::Regex;
use walkdir::{DirEntry, WalkDir};

use crate::assemble::assemble;
use crate::error::AnalysisError;
use crate::model::{Diagnostic, Results};
use crate::resolve::FileContext;

/// What to analyze and which files to leave out.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    pub path: PathBuf,
    /// Files whose contents match any of these are skipped.
    pub skip_files_with_contents: Vec<Regex>,
    /// Also analyze `_test.go` files.
    pub include_tests: bool,
}

impl ParseOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn skip_files_with_contents(mut self, pattern: Regex) -> Self {
        self.skip_files_with_contents.push(pattern);
        self
    }

    pub fn include_tests(mut self, include: bool) -> Self {
        self.include_tests = include;
        self
    }

    fn skips(&self, source: &str) -> bool {
        self.skip_files_with_contents
            .iter()
            .any(|re| re.is_match(source))
    }
}

/// Entry point for analysis runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parser;

impl Parser {
    pub fn new() -> Self {
        Self
    }

    /// Analyzes every Go package below `opts.path`.
    ///
    /// A file that does not parse is left out and reported as a
    /// [`Diagnostic`]; only traversal and read failures abort the run.
    pub fn parse_directory(&self, opts: &ParseOptions) -> Result<Results, AnalysisError> {
        let mut files = Vec::new();
        let mut skipped = Vec::new();

        for path in go_files(opts)? {
            let source = fs::read_to_string(&path).map_err(|source| AnalysisError::Io {
                path: path.clone(),
                source,
            })?;
            if opts.skips(&source) {
                tracing::debug!(path = %path.display(), "skipping file matching content filter");
                continue;
            }
            match parse_file(path, &source) {
                Ok(fc) => files.push(fc),
                Err(err) => skipped.push(unparsed(err)?),
            }
        }

        tracing::info!(
            root = %opts.path.display(),
            files = files.len(),
            unparsed = skipped.len(),
            "parsed go sources"
        );
        let mut results = assemble(files);
        skipped.append(&mut results.diagnostics);
        results.diagnostics = skipped;
        Ok(results)
    }

    /// Analyzes in-memory sources, one `(path, contents)` pair per file.
    /// Any source that does not parse fails the whole call.
    pub fn parse_sources<I, P, S>(&self, sources: I) -> Result<Results, AnalysisError>
    where
        I: IntoIterator<Item = (P, S)>,
        P: Into<PathBuf>,
        S: AsRef<str>,
    {
        let files = sources
            .into_iter()
            .map(|(path, source)| parse_file(path.into(), source.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(assemble(files))
    }
}

fn parse_file(path: PathBuf, source: &str) -> Result<FileContext, AnalysisError> {
    match parse_source(source) {
        Ok(parsed) => Ok(FileContext::new(path, parsed)),
        Err(_) if !starts_with_package_clause(source) => {
            Err(AnalysisError::MissingPackageClause { path })
        }
        Err(failure) => {
            let line = first_line(source, &failure);
            Err(AnalysisError::Parse {
                path,
                line,
                failure,
            })
        }
    }
}

/// Turns a per-file syntax failure into a diagnostic; other errors pass through.
fn unparsed(err: AnalysisError) -> Result<Diagnostic, AnalysisError> {
    let (path, line, message) = match err {
        AnalysisError::Parse {
            path,
            line,
            failure,
        } => (path, line, failure.to_string()),
        AnalysisError::MissingPackageClause { path } => {
            (path, 1, "missing package clause".to_string())
        }
        other => return Err(other),
    };
    tracing::warn!(path = %path.display(), line, "skipping unparsable file: {message}");
    Ok(Diagnostic {
        path,
        line,
        message,
    })
}

fn starts_with_package_clause(source: &str) -> bool {
    tokenize(source)
        .toks
        .first()
        .is_some_and(|(_, tok, _)| *tok == Tok::KwPackage)
}

fn first_line(source: &str, failure: &ParseFailure) -> u32 {
    let offset = failure.diags.first().map_or(0, |d| d.span.start);
    LineIndex::new(source).line_number(offset)
}

/// Go files below `opts.path` in sorted path order.
fn go_files(opts: &ParseOptions) -> Result<Vec<PathBuf>, AnalysisError> {
    let mut out = Vec::new();
    let walker = WalkDir::new(&opts.path)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_type().is_dir() || !ignored_dir(e));

    for entry in walker {
        let entry = entry.map_err(|source| AnalysisError::Walk {
            path: opts.path.clone(),
            source,
        })?;
        if !entry.file_type().is_file() || !is_go_source(entry.path(), opts.include_tests) {
            continue;
        }
        out.push(entry.into_path());
    }
    Ok(out)
}

fn ignored_dir(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name.starts_with('_') || name == "testdata"
}

fn is_go_source(path: &Path, include_tests: bool) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && (include_tests || !name.ends_with("_test.go"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_source_filter() {
        assert!(is_go_source(Path::new("a/b.go"), false));
        assert!(!is_go_source(Path::new("a/b_test.go"), false));
        assert!(is_go_source(Path::new("a/b_test.go"), true));
        assert!(!is_go_source(Path::new("a/b.rs"), true));
    }

    #[test]
    fn missing_package_clause_is_its_own_error() {
        let err = Parser::new()
            .parse_sources([("x.go", "type T int\n")])
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingPackageClause { .. }), "{err}");
    }

    #[test]
    fn parse_error_reports_line() {
        let err = Parser::new()
            .parse_sources([("x.go", "package p\n\ntype T struct {\n\tA int\n")])
            .unwrap_err();
        match err {
            AnalysisError::Parse { line, .. } => assert!(line >= 3, "line {line}"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn broken_file_is_reported_and_the_rest_is_analyzed() {
        let dir = tempfile::tempdir().unwrap();
        for (rel, src) in [
            ("good/a.go", "package good

type User struct{ ID int }
"),
            ("bad/b.go", "package bad
func broken( {
"),
            ("bad/c.go", "type Orphan int
"),
        ] {
            let path = dir.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, src).unwrap();
        }

        let r = Parser::new()
            .parse_directory(&ParseOptions::new(dir.path()))
            .unwrap();
        assert_eq!(r.packages.keys().collect::<Vec<_>>(), ["good"]);
        assert!(r.packages["good"].structs.contains_key("User"));

        assert_eq!(r.diagnostics.len(), 2);
        let b = &r.diagnostics[0];
        assert!(b.path.ends_with("bad/b.go"), "{b}");
        assert_eq!(b.line, 2);
        assert!(b.message.contains("syntax error"), "{b}");
        let c = &r.diagnostics[1];
        assert!(c.path.ends_with("bad/c.go"), "{c}");
        assert_eq!(c.message, "missing package clause");
    }
}
