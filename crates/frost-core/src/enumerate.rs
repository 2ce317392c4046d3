use crate::CoreError;
use frost_schema::PackageRecord;
use serde::{Deserialize, Serialize};

/// Which installed distributions to report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    /// Everything visible to the interpreter, including global site-packages.
    #[default]
    All,
    /// Only distributions installed inside the active virtual environment.
    LocalOnly,
}

impl Scope {
    pub fn from_local_flag(local_only: bool) -> Self {
        if local_only {
            Self::LocalOnly
        } else {
            Self::All
        }
    }
}

/// Source of installed package records.
///
/// Order of the returned records is implementation-defined and need not be
/// sorted.
pub trait PackageEnumerator {
    fn name(&self) -> &str;

    fn enumerate(&self, scope: Scope) -> Result<Vec<PackageRecord>, CoreError>;
}

/// Fixed set of records, split into local and global halves.
#[derive(Debug, Clone, Default)]
pub struct StaticEnumerator {
    local: Vec<PackageRecord>,
    global: Vec<PackageRecord>,
}

impl StaticEnumerator {
    pub fn new(local: Vec<PackageRecord>) -> Self {
        Self {
            local,
            global: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_global(mut self, global: Vec<PackageRecord>) -> Self {
        self.global = global;
        self
    }
}

impl PackageEnumerator for StaticEnumerator {
    fn name(&self) -> &str {
        "static"
    }

    fn enumerate(&self, scope: Scope) -> Result<Vec<PackageRecord>, CoreError> {
        let mut records = self.local.clone();
        if scope == Scope::All {
            records.extend(self.global.iter().cloned());
        }
        Ok(records)
    }
}
