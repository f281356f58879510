use crate::error::{InstallError, InstallResult};
use glob::Pattern;

/// Glob patterns for generator output that must never reach the destination.
///
/// A pattern matches if it matches either the path relative to the staged root
/// (always `/`-separated) or the bare file name.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> InstallResult<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| InstallError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<InstallResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, rel: &str) -> bool {
        let file_name = rel.rsplit('/').next().unwrap_or(rel);
        self.patterns
            .iter()
            .any(|p| p.matches(rel) || p.matches(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_file_name_at_any_depth() {
        let set = ExcludeSet::new(&["*.csproj"]).unwrap();
        assert!(set.matches("Acme.Sdk.csproj"));
        assert!(set.matches("src/Acme.Sdk/Acme.Sdk.csproj"));
        assert!(!set.matches("src/Acme.Sdk/Model/Account.cs"));
    }

    #[test]
    fn matches_relative_paths() {
        let set = ExcludeSet::new(&["docs/**"]).unwrap();
        assert!(set.matches("docs/Account.md"));
        assert!(!set.matches("Model/Account.cs"));
    }

    #[test]
    fn rejects_bad_pattern() {
        let err = ExcludeSet::new(&["[unterminated"]).unwrap_err();
        assert!(matches!(err, InstallError::InvalidPattern { .. }));
    }

    #[test]
    fn empty_set_matches_nothing() {
        let set = ExcludeSet::default();
        assert!(!set.matches("anything"));
    }
}
