//! Freeze engine for frost.
//!
//! This crate ties the schema layer to the live environment: an injected
//! `PackageEnumerator` reports installed distributions, the `Collector` turns
//! them into an `InstalledMapping` of pinned requirements, and the
//! `Reconciler` merges that mapping into an existing requirements file while
//! preserving its comments, ordering and directives. `freeze` runs the whole
//! pipeline against a `LineSink`.

pub mod collect;
pub mod config;
pub mod enumerate;
pub mod freeze;
pub mod pin;
pub mod reconcile;
pub mod site_packages;
pub mod sink;
pub mod vcs;

pub use collect::{Collector, InstalledMapping};
pub use config::{ConfigError, FreezeConfig, CONFIG_ENV};
pub use enumerate::{PackageEnumerator, Scope, StaticEnumerator};
pub use freeze::{freeze, FreezeOptions, FreezeReport, DEFAULT_BANNER_TOOL};
pub use pin::pin_record;
pub use reconcile::{Diagnostic, OutputLine, Reconciler};
pub use site_packages::{SitePackagesEnumerator, SiteRoot, DEFAULT_SKIP};
pub use sink::{LineSink, TextSink};
pub use vcs::{detect_git_source, VcsSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] frost_schema::ManifestError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to enumerate installed packages in {}: {source}", path.display())]
    Enumerate {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
}
