//! Requirement names, manifest lines, and pinned requirements for frost.
//!
//! This crate defines the schema layer: canonical package names
//! (`PackageName`), installed distribution records (`PackageRecord`), the
//! rendered form of a frozen package (`PinnedRequirement`), classification of
//! raw requirements-file lines (`ManifestLine`), name extraction for plain and
//! editable references, and line-by-line manifest reading (`ManifestReader`).

pub mod line;
pub mod manifest;
pub mod normalize;
pub mod reference;
pub mod requirement;
pub mod types;

pub use line::{classify_line, ManifestLine};
pub use manifest::{ManifestError, ManifestReader};
pub use normalize::{canonical_name, egg_project_name, is_valid_project_name};
pub use reference::{
    egg_fragment, parse_editable, requirement_name, EditableError, EditableRequirement,
    KNOWN_VCS,
};
pub use requirement::{PackageRecord, PinnedRequirement};
pub use types::{PackageName, ProjectVersion};
