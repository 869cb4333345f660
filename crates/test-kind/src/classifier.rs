//! Suffix-anchored classification of test file paths.

use crate::kind::TestKind;

/// Extensions recognised by [`Classifier::default`].
pub const DEFAULT_EXTENSIONS: &[&str] = &["ts"];

/// Error type for classification.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// The path ends in none of the recognised suffixes
    #[error("Unrecognized test kind: '{path}' does not end in .test-impl, .integration, .spec or .test followed by a known extension")]
    UnrecognizedKind { path: String },
}

/// Classifies paths by their test-kind suffix.
///
/// Matching is case-sensitive and anchored at the end of the file name; a
/// marker that merely appears inside the name does not count. Only the last
/// path component is inspected, so a directory named `x.spec.ts` does not
/// make its children e2e tests.
#[derive(Debug, Clone)]
pub struct Classifier {
    /// Extensions without the leading dot
    extensions: Vec<String>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_extensions(DEFAULT_EXTENSIONS.iter().copied())
    }
}

impl Classifier {
    /// Create a classifier for the default `ts` extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier recognising the given extensions.
    ///
    /// A leading dot is accepted and stripped; empty entries are ignored.
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for ext in extensions {
            let ext = ext.as_ref().trim().trim_start_matches('.');
            if !ext.is_empty() && !normalized.iter().any(|e| e == ext) {
                normalized.push(ext.to_string());
            }
        }
        Self {
            extensions: normalized,
        }
    }

    /// Extensions this classifier recognises.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Classify a single path.
    pub fn classify(&self, path: &str) -> Result<TestKind, ClassifyError> {
        let file_name = file_name(path);

        for kind in TestKind::PRECEDENCE {
            for ext in &self.extensions {
                let suffix = kind.suffix(ext);
                if file_name.ends_with(&suffix) {
                    return Ok(kind);
                }
            }
        }

        Err(ClassifyError::UnrecognizedKind {
            path: path.to_string(),
        })
    }

    /// Classify a batch of paths, keeping every failure instead of stopping
    /// at the first one.
    pub fn partition<'a, I>(&self, paths: I) -> (Vec<(&'a str, TestKind)>, Vec<ClassifyError>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut classified = Vec::new();
        let mut errors = Vec::new();
        for path in paths {
            match self.classify(path) {
                Ok(kind) => classified.push((path, kind)),
                Err(e) => errors.push(e),
            }
        }
        (classified, errors)
    }
}

/// Classify a path using the default extension set.
pub fn classify(path: &str) -> Result<TestKind, ClassifyError> {
    Classifier::default().classify(path)
}

/// Last component of a path, accepting both separators.
fn file_name(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}
