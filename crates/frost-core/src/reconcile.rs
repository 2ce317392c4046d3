//! Merge the installed mapping into an existing requirements file.
//!
//! Lines are handled strictly in manifest order. Comments, blank lines,
//! skipped lines and option directives are copied through; lines naming a
//! package are replaced with that package's pinned form and the package is
//! removed from the mapping. Whatever remains in the mapping after the last
//! line is appended under a dated banner, sorted by name.

use crate::collect::InstalledMapping;
use crate::sink::LineSink;
use crate::CoreError;
use chrono::NaiveDate;
use frost_schema::{
    classify_line, parse_editable, requirement_name, EditableError, ManifestError, ManifestLine,
    PackageName, PinnedRequirement,
};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// One line of freeze output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    /// `-f <url>` for a configured find-links source.
    FindLinks(String),
    /// A manifest line copied verbatim.
    Passthrough(String),
    /// The frozen form of an installed package.
    Pinned(PinnedRequirement),
    /// Header above installed packages the manifest did not mention.
    Banner { tool: String, date: NaiveDate },
}

impl fmt::Display for OutputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FindLinks(url) => write!(f, "-f {url}"),
            Self::Passthrough(line) => f.write_str(line),
            Self::Pinned(pinned) => write!(f, "{pinned}"),
            Self::Banner { tool, date } => write!(
                f,
                "## The following requirements were added by {tool} on {}:",
                date.format("%Y-%m-%d")
            ),
        }
    }
}

/// A non-fatal problem with a manifest line. The line produces no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Diagnostic {
    /// The line names a package that is not installed.
    NotInstalled { line: String, name: PackageName },
    /// No package name could be extracted from the line.
    Unresolved {
        line: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInstalled { line, .. } => write!(
                f,
                "Requirement file contains {line}, but that package is not installed"
            ),
            Self::Unresolved { line, reason } => {
                write!(
                    f,
                    "Skipping line because it's not clear what it would install: {line}"
                )?;
                if let Some(reason) = reason {
                    write!(f, " ({reason})")?;
                }
                Ok(())
            }
        }
    }
}

enum Resolution {
    Verbatim,
    Named(PackageName),
    Unresolved(Option<String>),
}

/// Line-by-line reconciliation of a manifest against installed packages.
#[derive(Debug, Clone)]
pub struct Reconciler<'a> {
    changed_only: bool,
    skip_pattern: Option<&'a Regex>,
    default_vcs: Option<&'a str>,
    banner_tool: &'a str,
    today: NaiveDate,
}

impl<'a> Reconciler<'a> {
    pub fn new(banner_tool: &'a str, today: NaiveDate) -> Self {
        Self {
            changed_only: false,
            skip_pattern: None,
            default_vcs: None,
            banner_tool,
            today,
        }
    }

    /// Suppress the pinned line for packages the manifest already lists.
    #[must_use]
    pub fn changed_only(mut self, changed_only: bool) -> Self {
        self.changed_only = changed_only;
        self
    }

    #[must_use]
    pub fn skip_pattern(mut self, pattern: Option<&'a Regex>) -> Self {
        self.skip_pattern = pattern;
        self
    }

    #[must_use]
    pub fn default_vcs(mut self, vcs: Option<&'a str>) -> Self {
        self.default_vcs = vcs;
        self
    }

    /// Walk `lines` in order, emitting transformed output to `sink` and
    /// removing every matched package from `mapping`, then append the
    /// remaining packages under a banner.
    ///
    /// A read error on any line aborts the run; everything else is reported
    /// as a [`Diagnostic`].
    pub fn reconcile<I, S>(
        &self,
        mapping: &mut InstalledMapping,
        lines: I,
        sink: &mut S,
    ) -> Result<Vec<Diagnostic>, CoreError>
    where
        I: IntoIterator<Item = Result<String, ManifestError>>,
        S: LineSink + ?Sized,
    {
        let mut diagnostics = Vec::new();

        for raw in lines {
            let raw = raw?;
            let name = match self.resolve(&raw) {
                Resolution::Verbatim => {
                    sink.emit(OutputLine::Passthrough(raw))?;
                    continue;
                }
                Resolution::Named(name) => name,
                Resolution::Unresolved(reason) => {
                    warn!(
                        "Skipping line because it's not clear what it would install: {}",
                        raw.trim()
                    );
                    warn!("  (add #egg=PackageName to the URL to avoid this warning)");
                    diagnostics.push(Diagnostic::Unresolved {
                        line: raw.trim().to_owned(),
                        reason,
                    });
                    continue;
                }
            };

            match mapping.take(&name) {
                Some(_) if self.changed_only => {
                    debug!("{name} is listed in the manifest, not re-emitting");
                }
                Some(pinned) => sink.emit(OutputLine::Pinned(pinned))?,
                None => {
                    warn!(
                        "Requirement file contains {}, but that package is not installed",
                        raw.trim()
                    );
                    diagnostics.push(Diagnostic::NotInstalled {
                        line: raw.trim().to_owned(),
                        name,
                    });
                }
            }
        }

        if !mapping.is_empty() {
            sink.emit(OutputLine::Banner {
                tool: self.banner_tool.to_owned(),
                date: self.today,
            })?;
            Self::dump(mapping, sink)?;
        }

        Ok(diagnostics)
    }

    /// Emit every entry of `mapping`, sorted by name, leaving it empty.
    pub fn dump<S>(mapping: &mut InstalledMapping, sink: &mut S) -> Result<usize, CoreError>
    where
        S: LineSink + ?Sized,
    {
        let remaining = mapping.drain_sorted();
        let count = remaining.len();
        for pinned in remaining {
            sink.emit(OutputLine::Pinned(pinned))?;
        }
        Ok(count)
    }

    fn resolve(&self, raw: &str) -> Resolution {
        match classify_line(raw, self.skip_pattern) {
            ManifestLine::Passthrough(_) | ManifestLine::Skipped(_) | ManifestLine::Directive(_) => {
                Resolution::Verbatim
            }
            ManifestLine::Editable { spec, .. } => match parse_editable(spec, self.default_vcs) {
                Ok(editable) => match editable.name {
                    Some(name) => Resolution::Named(name),
                    None => Resolution::Unresolved(None),
                },
                Err(EditableError::MissingVcs {
                    spec,
                    name: Some(name),
                }) => {
                    warn!("'{spec}' has no vcs+ scheme, matching it by its #egg= name");
                    Resolution::Named(name)
                }
                Err(e) => Resolution::Unresolved(Some(e.to_string())),
            },
            ManifestLine::Requirement { reference, .. } => match requirement_name(reference) {
                Some(name) => Resolution::Named(name),
                None => Resolution::Unresolved(None),
            },
        }
    }
}
