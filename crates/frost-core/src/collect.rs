use crate::enumerate::{PackageEnumerator, Scope};
use crate::pin::pin_record;
use crate::CoreError;
use frost_schema::{PackageName, PinnedRequirement};
use std::collections::BTreeMap;
use tracing::debug;

/// Installed packages keyed by canonical name.
///
/// The reconciler removes entries as manifest lines claim them; whatever is
/// left afterwards was never mentioned by the manifest. Iteration is always
/// ascending by canonical name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledMapping {
    entries: BTreeMap<PackageName, PinnedRequirement>,
}

impl InstalledMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pinned requirement, returning the entry it replaced.
    pub fn insert(&mut self, pinned: PinnedRequirement) -> Option<PinnedRequirement> {
        self.entries.insert(pinned.name.clone(), pinned)
    }

    /// Remove and return the entry for `name`.
    pub fn take(&mut self, name: &PackageName) -> Option<PinnedRequirement> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &PackageName) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &PackageName) -> Option<&PinnedRequirement> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PinnedRequirement> {
        self.entries.values()
    }

    /// Drain every remaining entry, sorted by name.
    pub fn drain_sorted(&mut self) -> Vec<PinnedRequirement> {
        std::mem::take(&mut self.entries).into_values().collect()
    }
}

impl FromIterator<PinnedRequirement> for InstalledMapping {
    fn from_iter<I: IntoIterator<Item = PinnedRequirement>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for pinned in iter {
            mapping.insert(pinned);
        }
        mapping
    }
}

/// Builds the installed mapping from an enumerator.
pub struct Collector<'a> {
    enumerator: &'a dyn PackageEnumerator,
    dependency_links: Vec<String>,
}

impl<'a> Collector<'a> {
    pub fn new(enumerator: &'a dyn PackageEnumerator) -> Self {
        Self {
            enumerator,
            dependency_links: Vec::new(),
        }
    }

    /// Extra source links consulted for revision-pinned versions, in addition
    /// to each distribution's own `dependency_links.txt`.
    #[must_use]
    pub fn with_dependency_links(mut self, links: Vec<String>) -> Self {
        self.dependency_links = links;
        self
    }

    pub fn collect(&self, scope: Scope) -> Result<InstalledMapping, CoreError> {
        let records = self.enumerator.enumerate(scope)?;
        debug!(
            "{} enumerator reported {} distributions ({scope:?})",
            self.enumerator.name(),
            records.len()
        );

        // Links come from every installed distribution, whatever the scope.
        let everything;
        let link_sources = if scope == Scope::All {
            &records
        } else {
            everything = self.enumerator.enumerate(Scope::All)?;
            &everything
        };
        let mut links: Vec<String> = link_sources
            .iter()
            .flat_map(|r| r.dependency_links.iter().cloned())
            .collect();
        links.extend(self.dependency_links.iter().cloned());

        let mut mapping = InstalledMapping::new();
        for record in &records {
            let pinned = pin_record(record, &links);
            if let Some(previous) = mapping.insert(pinned) {
                debug!(
                    "duplicate distribution {}: replacing '{}'",
                    previous.name, previous.requirement
                );
            }
        }
        Ok(mapping)
    }
}
