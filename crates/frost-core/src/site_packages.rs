//! Installed distributions discovered from site-packages metadata.
//!
//! Recognized entries in each root, scanned in sorted file-name order:
//! - `<name>.dist-info/METADATA`
//! - `<name>.egg-info/PKG-INFO`, or a bare `<name>.egg-info` file
//! - `<name>.egg-link`, a develop install whose first line points at the
//!   source checkout containing `<name>.egg-info/PKG-INFO`

use crate::enumerate::{PackageEnumerator, Scope};
use crate::CoreError;
use frost_schema::{PackageName, PackageRecord};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Distributions that are part of the installer itself and never frozen.
pub const DEFAULT_SKIP: &[&str] = &["setuptools", "pip", "python"];

/// A directory of installed distributions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRoot {
    pub path: PathBuf,
    /// Belongs to the active virtual environment.
    pub local: bool,
}

impl SiteRoot {
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            local: true,
        }
    }

    pub fn global(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            local: false,
        }
    }
}

pub struct SitePackagesEnumerator {
    roots: Vec<SiteRoot>,
    skip: Vec<PackageName>,
}

impl SitePackagesEnumerator {
    pub fn new(roots: Vec<SiteRoot>) -> Self {
        Self {
            roots,
            skip: DEFAULT_SKIP.iter().map(|s| PackageName::canonical(s)).collect(),
        }
    }

    /// Roots for the running process: the site-packages of `$VIRTUAL_ENV`
    /// (local) followed by `extra` (global).
    pub fn discover(extra: &[PathBuf]) -> Self {
        let mut roots: Vec<SiteRoot> = std::env::var_os("VIRTUAL_ENV")
            .map(PathBuf::from)
            .map(|venv| venv_site_packages(&venv))
            .unwrap_or_default()
            .into_iter()
            .map(SiteRoot::local)
            .collect();
        roots.extend(extra.iter().cloned().map(SiteRoot::global));
        Self::new(roots)
    }

    #[must_use]
    pub fn with_skip(mut self, names: &[&str]) -> Self {
        self.skip = names.iter().map(|s| PackageName::canonical(s)).collect();
        self
    }

    pub fn roots(&self) -> &[SiteRoot] {
        &self.roots
    }

    fn scan_root(&self, root: &Path, out: &mut Vec<PackageRecord>) -> Result<(), CoreError> {
        let io_err = |source| CoreError::Enumerate {
            path: root.to_path_buf(),
            source,
        };
        let mut entries: Vec<PathBuf> = fs::read_dir(root)
            .map_err(io_err)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()
            .map_err(io_err)?;
        entries.sort();

        for path in entries {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let record = if file_name.ends_with(".dist-info") {
                read_record(&path.join("METADATA"), root, &path)
            } else if file_name.ends_with(".egg-info") {
                if path.is_dir() {
                    read_record(&path.join("PKG-INFO"), root, &path)
                } else {
                    read_record(&path, root, &path)
                }
            } else if file_name.ends_with(".egg-link") {
                read_egg_link(&path, root)
            } else {
                continue;
            };

            match record {
                Some(record) if self.skip.contains(&record.key()) => {
                    debug!("skipping installer distribution {}", record.project_name);
                }
                Some(record) => out.push(record),
                None => warn!("unreadable distribution metadata in {}", path.display()),
            }
        }
        Ok(())
    }
}

impl PackageEnumerator for SitePackagesEnumerator {
    fn name(&self) -> &str {
        "site-packages"
    }

    fn enumerate(&self, scope: Scope) -> Result<Vec<PackageRecord>, CoreError> {
        // Outside a virtualenv every root counts as local.
        let in_venv = self.roots.iter().any(|r| r.local);
        let mut records = Vec::new();
        for root in &self.roots {
            if scope == Scope::LocalOnly && in_venv && !root.local {
                debug!("skipping global root {} (local only)", root.path.display());
                continue;
            }
            if !root.path.is_dir() {
                debug!("site-packages root {} does not exist", root.path.display());
                continue;
            }
            self.scan_root(&root.path, &mut records)?;
        }
        Ok(records)
    }
}

/// `lib/python*/site-packages` on POSIX, `Lib/site-packages` on Windows.
fn venv_site_packages(venv: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    if let Ok(entries) = fs::read_dir(venv.join("lib")) {
        let mut pythons: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("python"))
            })
            .map(|p| p.join("site-packages"))
            .filter(|p| p.is_dir())
            .collect();
        pythons.sort();
        found.extend(pythons);
    }
    let windows = venv.join("Lib").join("site-packages");
    if windows.is_dir() && !found.contains(&windows) {
        found.push(windows);
    }
    found
}

/// Read `Name:` and `Version:` from RFC 822 style distribution metadata.
fn parse_metadata(content: &str) -> Option<(String, String)> {
    let mut name = None;
    let mut version = None;
    for line in content.lines() {
        if line.trim().is_empty() {
            break;
        }
        if let Some(value) = line.strip_prefix("Name:") {
            name.get_or_insert_with(|| value.trim().to_owned());
        } else if let Some(value) = line.strip_prefix("Version:") {
            version.get_or_insert_with(|| value.trim().to_owned());
        }
    }
    match (name, version) {
        (Some(n), Some(v)) if !n.is_empty() && !v.is_empty() => Some((n, v)),
        _ => None,
    }
}

fn read_dependency_links(info_dir: &Path) -> Vec<String> {
    fs::read_to_string(info_dir.join("dependency_links.txt"))
        .map(|content| {
            content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#'))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn read_record(metadata: &Path, location: &Path, info_dir: &Path) -> Option<PackageRecord> {
    let content = fs::read_to_string(metadata).ok()?;
    let (name, version) = parse_metadata(&content)?;
    let links = if info_dir.is_dir() {
        read_dependency_links(info_dir)
    } else {
        Vec::new()
    };
    Some(
        PackageRecord::new(&name, &version)
            .at(location)
            .with_dependency_links(links),
    )
}

fn read_egg_link(link: &Path, root: &Path) -> Option<PackageRecord> {
    let content = fs::read_to_string(link).ok()?;
    let target = content.lines().map(str::trim).find(|l| !l.is_empty())?;
    let target = Path::new(target);
    let source = if target.is_absolute() {
        target.to_path_buf()
    } else {
        root.join(target)
    };

    let mut infos: Vec<PathBuf> = fs::read_dir(&source)
        .ok()?
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_dir()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(".egg-info"))
        })
        .collect();
    infos.sort();
    let info = infos.into_iter().next()?;
    read_record(&info.join("PKG-INFO"), &source, &info).map(PackageRecord::editable)
}
