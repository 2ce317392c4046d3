//! Source checkout detection for editable installs.
//!
//! The checkout is opened with `gix`; no subprocesses are spawned and nothing
//! is fetched.

use gix::remote::Direction;
use std::path::Path;
use tracing::debug;

/// Where an editable install's source lives and which revision is checked out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsSource {
    /// Requirement-style URL, e.g. `git+https://github.com/org/repo.git`.
    pub url: String,
    pub revision: String,
}

/// Discover the git checkout containing `location` and describe it.
///
/// Returns `None` when there is no checkout, no remote, or `HEAD` cannot be
/// resolved to an object.
pub fn detect_git_source(location: &Path) -> Option<VcsSource> {
    let repo = gix::discover(location)
        .map_err(|e| debug!("no git checkout at {}: {e}", location.display()))
        .ok()?;
    let revision = repo
        .head_id()
        .map_err(|e| debug!("unresolved HEAD in {}: {e}", repo.git_dir().display()))
        .ok()?
        .to_string();
    let remote = remote_url(&repo)?;
    let url = if remote.to_lowercase().starts_with("git:") {
        remote
    } else {
        format!("git+{remote}")
    };
    Some(VcsSource { url, revision })
}

/// Fetch URL of the default remote (branch upstream, the only remote, or
/// `origin`), else of the first remote by name.
fn remote_url(repo: &gix::Repository) -> Option<String> {
    let remote = match repo.find_default_remote(Direction::Fetch) {
        Some(found) => found
            .map_err(|e| debug!("invalid default remote: {e}"))
            .ok()?,
        None => {
            let names = repo.remote_names();
            let first = names.iter().next()?;
            repo.find_remote(&**first)
                .map_err(|e| debug!("invalid remote {first}: {e}"))
                .ok()?
        }
    };
    remote
        .url(Direction::Fetch)
        .map(|url| url.to_bstring().to_string())
}
