use crate::vcs::detect_git_source;
use frost_schema::{canonical_name, egg_fragment, egg_project_name, PackageRecord, PinnedRequirement};
use tracing::warn;

const NO_REPOSITORY: &str = "## !! Could not determine repository location";
const NO_SOURCE_LINK: &str =
    "## !! Could not find source URL in dependency_links for this package:";

/// Render the frozen requirement for one installed distribution.
///
/// Editable installs become `-e git+<url>@<rev>#egg=<name>-dev` when their
/// checkout can be read. Versions ending in a source revision (`-r1234`) or
/// snapshot date (`-20110321`) are rendered as editable references when a
/// matching dependency link is known. Everything else, including both
/// fallbacks, is pinned as `Name==version`.
pub fn pin_record(record: &PackageRecord, dependency_links: &[String]) -> PinnedRequirement {
    if record.editable {
        return pin_editable(record);
    }

    let Some(revision) = revision_marker(&record.version) else {
        return PinnedRequirement::exact(record);
    };

    match source_location(record, dependency_links) {
        Some(location) => {
            let egg = format!(
                "{}-{}",
                egg_project_name(&record.project_name),
                record.version.replace('-', "_")
            );
            PinnedRequirement::editable(record.key(), &format!("{location}@{revision}#egg={egg}"))
                .with_comment(format!(
                    "# Installing as editable to satisfy requirement {}:",
                    record.exact_pin()
                ))
        }
        None => {
            warn!(
                "cannot find source location for {} in dependency links",
                record.exact_pin()
            );
            PinnedRequirement::exact(record).with_comment(NO_SOURCE_LINK)
        }
    }
}

fn pin_editable(record: &PackageRecord) -> PinnedRequirement {
    match detect_git_source(&record.location) {
        Some(source) => PinnedRequirement::editable(
            record.key(),
            &format!(
                "{}@{}#egg={}-dev",
                source.url,
                source.revision,
                egg_project_name(&record.project_name)
            ),
        ),
        None => {
            warn!(
                "could not determine repository location of {} ({})",
                record.project_name,
                record.location.display()
            );
            PinnedRequirement::exact(record).with_comment(NO_REPOSITORY)
        }
    }
}

/// `1234` for `1.0-r1234`, `{20110321}` for `1.0-20110321`.
fn revision_marker(version: &str) -> Option<String> {
    let (_, suffix) = version.rsplit_once('-')?;
    if let Some(rev) = suffix.strip_prefix('r') {
        if !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()) {
            return Some(rev.to_owned());
        }
    }
    let is_date =
        suffix.len() == 8 && suffix.starts_with("20") && suffix.bytes().all(|b| b.is_ascii_digit());
    is_date.then(|| format!("{{{suffix}}}"))
}

/// First dependency link whose `#egg=name-version` fragment names this
/// project, with the fragment removed.
fn source_location(record: &PackageRecord, links: &[String]) -> Option<String> {
    let key = canonical_name(&record.project_name);
    links.iter().find_map(|link| {
        let egg = egg_fragment(link)?;
        let (name, _) = egg.rsplit_once('-')?;
        if canonical_name(name) != key {
            return None;
        }
        let base = link.split('#').next().unwrap_or(link);
        Some(base.to_owned())
    })
}
