use crate::types::{PackageName, ProjectVersion};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One installed distribution, as reported by an enumerator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageRecord {
    /// Project name with its original spelling (`Django`, `zope.interface`).
    pub project_name: String,
    pub version: ProjectVersion,
    /// Directory the distribution was found in. For develop installs this is
    /// the source checkout rather than the site-packages directory.
    pub location: PathBuf,
    #[serde(default)]
    pub editable: bool,
    /// Contents of the distribution's `dependency_links.txt`, if any.
    #[serde(default)]
    pub dependency_links: Vec<String>,
}

impl PackageRecord {
    pub fn new(project_name: &str, version: &str) -> Self {
        Self {
            project_name: project_name.trim().to_owned(),
            version: ProjectVersion::from(version),
            location: PathBuf::new(),
            editable: false,
            dependency_links: Vec::new(),
        }
    }

    #[must_use]
    pub fn at(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }

    #[must_use]
    pub fn with_dependency_links(mut self, links: Vec<String>) -> Self {
        self.dependency_links = links;
        self
    }

    pub fn key(&self) -> PackageName {
        PackageName::canonical(&self.project_name)
    }

    /// `Project==version`, the plain pinned form.
    pub fn exact_pin(&self) -> String {
        format!("{}=={}", self.project_name, self.version)
    }
}

/// The frozen form of one installed package.
///
/// `requirement` is the line that replays the install: either `Name==version`
/// or an `-e <source>` reference. `comments` are `#` lines emitted directly
/// above it, used to explain a fallback. The rendered text always ends with
/// exactly one newline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PinnedRequirement {
    pub name: PackageName,
    pub requirement: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl PinnedRequirement {
    pub fn exact(record: &PackageRecord) -> Self {
        Self {
            name: record.key(),
            requirement: record.exact_pin(),
            comments: Vec::new(),
        }
    }

    pub fn editable(name: PackageName, source: &str) -> Self {
        Self {
            name,
            requirement: format!("-e {source}"),
            comments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }

    pub fn is_editable(&self) -> bool {
        self.requirement.starts_with("-e ")
    }

    /// The full text for this package, newline-terminated.
    pub fn rendered(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for PinnedRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for comment in &self.comments {
            writeln!(f, "{comment}")?;
        }
        f.write_str(&self.requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_pin_keeps_project_spelling() {
        let record = PackageRecord::new("Django", "1.3.1");
        let pinned = PinnedRequirement::exact(&record);
        assert_eq!(pinned.name, "django");
        assert_eq!(pinned.rendered(), "Django==1.3.1\n");
        assert!(!pinned.is_editable());
    }

    #[test]
    fn editable_rendering() {
        let pinned =
            PinnedRequirement::editable(PackageName::canonical("foo"), "git+https://h/foo@abc#egg=foo-dev");
        assert!(pinned.is_editable());
        assert_eq!(pinned.rendered(), "-e git+https://h/foo@abc#egg=foo-dev\n");
    }

    #[test]
    fn comments_precede_requirement() {
        let record = PackageRecord::new("bar", "2.0");
        let pinned = PinnedRequirement::exact(&record).with_comment("## !! note");
        assert_eq!(pinned.rendered(), "## !! note\nbar==2.0\n");
    }

    #[test]
    fn rendered_ends_with_single_newline() {
        let pinned = PinnedRequirement::exact(&PackageRecord::new("a", "1"));
        let text = pinned.rendered();
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
    }

    #[test]
    fn record_builder_sets_fields() {
        let record = PackageRecord::new(" pkg ", " 0.1 ")
            .at("/src/pkg")
            .editable()
            .with_dependency_links(vec!["http://x/#egg=pkg-0.1".to_owned()]);
        assert_eq!(record.project_name, "pkg");
        assert_eq!(record.version, "0.1");
        assert!(record.editable);
        assert_eq!(record.location, PathBuf::from("/src/pkg"));
        assert_eq!(record.dependency_links.len(), 1);
    }
}
