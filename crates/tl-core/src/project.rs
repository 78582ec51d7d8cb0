//! Colon-delimited project hierarchy.

/// Separator between hierarchy levels in a project path.
pub const SEPARATOR: char = ':';

/// A project path split into its aggregation levels.
///
/// `acme:backend:api:auth` has top project `acme`, sub-project `backend` and
/// remainder `api:auth`. Paths are never validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> ProjectPath<'a> {
    pub fn parse(path: &'a str) -> Self {
        Self {
            segments: path.split(SEPARATOR).collect(),
        }
    }

    /// Top-level project. Empty paths yield an empty string.
    pub fn project(&self) -> &'a str {
        self.segments.first().copied().unwrap_or_default()
    }

    pub fn subproject(&self) -> Option<&'a str> {
        self.segments.get(1).copied()
    }

    /// Everything below the sub-project, joined back with `:`.
    pub fn remainder(&self) -> Option<String> {
        (self.segments.len() > 2).then(|| self.segments[2..].join(":"))
    }
}
