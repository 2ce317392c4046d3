use crate::collect::Collector;
use crate::config::{ConfigError, FreezeConfig};
use crate::enumerate::{PackageEnumerator, Scope};
use crate::reconcile::{Diagnostic, OutputLine, Reconciler};
use crate::sink::LineSink;
use crate::CoreError;
use chrono::NaiveDate;
use frost_schema::{ManifestReader, KNOWN_VCS};
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Banner attribution, kept compatible with requirements files written by pip.
pub const DEFAULT_BANNER_TOOL: &str = "pip --freeze";

/// Everything a single freeze run needs besides the enumerator and sink.
#[derive(Debug, Clone)]
pub struct FreezeOptions {
    /// Requirements file to reconcile against; `None` dumps everything.
    pub requirement: Option<PathBuf>,
    /// Emitted first as `-f` lines. Entries with an `#egg=` fragment also
    /// serve as dependency links for revision-pinned versions.
    pub find_links: Vec<String>,
    pub scope: Scope,
    pub changed_only: bool,
    pub skip_pattern: Option<Regex>,
    pub default_vcs: Option<String>,
    pub banner_tool: String,
    /// Date stamped into the banner.
    pub today: NaiveDate,
}

impl FreezeOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            requirement: None,
            find_links: Vec::new(),
            scope: Scope::All,
            changed_only: false,
            skip_pattern: None,
            default_vcs: None,
            banner_tool: DEFAULT_BANNER_TOOL.to_owned(),
            today,
        }
    }

    pub fn from_config(config: &FreezeConfig, today: NaiveDate) -> Result<Self, ConfigError> {
        let default_vcs = config
            .default_vcs
            .as_deref()
            .map(|vcs| {
                let vcs = vcs.trim().to_lowercase();
                if KNOWN_VCS.contains(&vcs.as_str()) {
                    Ok(vcs)
                } else {
                    Err(ConfigError::UnknownVcs(vcs))
                }
            })
            .transpose()?;

        Ok(Self {
            requirement: config.requirement.clone(),
            find_links: config.find_links.clone(),
            scope: Scope::from_local_flag(config.local_only),
            changed_only: config.changed_only,
            skip_pattern: config.compile_skip_pattern()?,
            default_vcs,
            banner_tool: config
                .banner_tool
                .clone()
                .unwrap_or_else(|| DEFAULT_BANNER_TOOL.to_owned()),
            today,
        })
    }

    pub fn reconciler(&self) -> Reconciler<'_> {
        Reconciler::new(&self.banner_tool, self.today)
            .changed_only(self.changed_only)
            .skip_pattern(self.skip_pattern.as_ref())
            .default_vcs(self.default_vcs.as_deref())
    }

    fn egg_links(&self) -> Vec<String> {
        self.find_links
            .iter()
            .filter(|link| link.contains("#egg="))
            .cloned()
            .collect()
    }
}

/// Outcome of a freeze run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FreezeReport {
    /// Installed packages found within the requested scope.
    pub installed: usize,
    /// Whether a requirements file was reconciled.
    pub reconciled: bool,
    pub diagnostics: Vec<Diagnostic>,
}

/// Run a complete freeze: enumerate, collect, then either reconcile against
/// the requirements file or dump every installed package.
///
/// The requirements file is opened and the environment enumerated before
/// anything reaches `sink`, so those failures leave no partial output.
pub fn freeze<S>(
    enumerator: &dyn PackageEnumerator,
    options: &FreezeOptions,
    sink: &mut S,
) -> Result<FreezeReport, CoreError>
where
    S: LineSink + ?Sized,
{
    let manifest = options
        .requirement
        .as_deref()
        .map(ManifestReader::open)
        .transpose()?;

    let mut mapping = Collector::new(enumerator)
        .with_dependency_links(options.egg_links())
        .collect(options.scope)?;
    let installed = mapping.len();

    for link in &options.find_links {
        sink.emit(OutputLine::FindLinks(link.clone()))?;
    }

    let Some(reader) = manifest else {
        Reconciler::dump(&mut mapping, sink)?;
        return Ok(FreezeReport {
            installed,
            reconciled: false,
            diagnostics: Vec::new(),
        });
    };

    info!("reconciling {installed} packages against {}", reader.path().display());
    let diagnostics = options.reconciler().reconcile(&mut mapping, reader, sink)?;
    Ok(FreezeReport {
        installed,
        reconciled: true,
        diagnostics,
    })
}
