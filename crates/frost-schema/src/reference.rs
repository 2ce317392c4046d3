//! Package name extraction from plain and editable requirement references.
//!
//! Only the name is extracted; version specifiers, extras and markers are
//! never validated.

use crate::normalize::is_valid_project_name;
use crate::types::PackageName;
use thiserror::Error;

/// Version control schemes accepted in `vcs+url` editable references.
pub const KNOWN_VCS: &[&str] = &["git", "hg", "svn", "bzr"];

const ARCHIVE_SUFFIXES: &[&str] = &[
    ".zip", ".tar.gz", ".tgz", ".tar.bz2", ".tbz", ".tar", ".whl", ".egg",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditableError {
    /// `name` is still read from the `#egg=` fragment when present.
    #[error("'{spec}' should be formatted with svn+URL, git+URL, hg+URL or bzr+URL")]
    MissingVcs {
        spec: String,
        name: Option<PackageName>,
    },
    #[error("unknown version control system '{vcs}' in '{spec}'")]
    UnknownVcs { vcs: String, spec: String },
    #[error("'{0}' is not the right format; it must have #egg=Package")]
    MissingEgg(String),
    #[error("empty editable reference")]
    Empty,
}

/// A parsed `-e` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableRequirement {
    /// Source URL with the VCS scheme applied, or a local path.
    pub url: String,
    /// Version control system, `None` for local paths.
    pub vcs: Option<String>,
    /// Package name from the `#egg=` fragment, if it could be determined.
    pub name: Option<PackageName>,
}

/// Value of the `#egg=` fragment of a URL, up to the next `&`.
pub fn egg_fragment(url: &str) -> Option<&str> {
    let (_, fragment) = url.split_once("#egg=")?;
    let value = fragment.split('&').next().unwrap_or(fragment).trim();
    (!value.is_empty()).then_some(value)
}

/// Drop a trailing `-dev` or `-<digit>...` version suffix from an egg name,
/// cutting at the leftmost dash where such a suffix begins.
fn strip_egg_version(egg: &str) -> &str {
    for (idx, _) in egg.match_indices('-') {
        let rest = &egg[idx + 1..];
        if rest == "dev" || rest.starts_with(|c: char| c.is_ascii_digit()) {
            return &egg[..idx];
        }
    }
    egg
}

fn name_from_egg(egg: &str) -> Option<PackageName> {
    let stem = strip_egg_version(egg);
    is_valid_project_name(stem).then(|| PackageName::canonical(stem))
}

/// Parse the text following `-e` / `--editable`.
///
/// URLs without a `vcs+` scheme get `default_vcs` applied when one is given.
/// Local paths are accepted and resolve a name only through an `#egg=`
/// fragment.
pub fn parse_editable(
    spec: &str,
    default_vcs: Option<&str>,
) -> Result<EditableRequirement, EditableError> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Err(EditableError::Empty);
    }

    let local = || EditableRequirement {
        url: spec.to_owned(),
        vcs: None,
        name: egg_fragment(spec).and_then(name_from_egg),
    };

    let (vcs, url) = if let Some(vcs) = vcs_prefix(spec) {
        (vcs.to_lowercase(), spec.to_owned())
    } else if let Some((scheme, _)) = spec.split_once("://") {
        if scheme.eq_ignore_ascii_case("file") {
            return Ok(local());
        }
        let Some(vcs) = default_vcs else {
            return Err(EditableError::MissingVcs {
                spec: spec.to_owned(),
                name: egg_fragment(spec).and_then(name_from_egg),
            });
        };
        (vcs.to_lowercase(), format!("{vcs}+{spec}"))
    } else {
        return Ok(local());
    };

    if !KNOWN_VCS.contains(&vcs.as_str()) {
        return Err(EditableError::UnknownVcs {
            vcs,
            spec: spec.to_owned(),
        });
    }

    let egg = egg_fragment(&url).ok_or_else(|| EditableError::MissingEgg(spec.to_owned()))?;
    Ok(EditableRequirement {
        name: name_from_egg(egg),
        url,
        vcs: Some(vcs),
    })
}

/// The `git` in `git+https://...` or `git+git@host:repo`.
fn vcs_prefix(spec: &str) -> Option<&str> {
    let (prefix, _) = spec.split_once('+')?;
    (!prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphanumeric())).then_some(prefix)
}

fn is_url_or_path(reference: &str) -> bool {
    let lower = reference.to_lowercase();
    let path_part = lower.split('#').next().unwrap_or(&lower);
    reference.contains("://")
        || reference.starts_with('.')
        || reference.starts_with('/')
        || reference.starts_with('~')
        || ARCHIVE_SUFFIXES.iter().any(|s| path_part.ends_with(s))
}

/// Strip an inline ` #` comment. A `#` glued to the preceding text is a URL
/// fragment, not a comment.
fn strip_inline_comment(reference: &str) -> &str {
    let bytes = reference.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return reference[..i].trim_end();
        }
    }
    reference
}

/// Extract the package name from a plain requirement line.
///
/// Returns `None` when no usable identifier can be found: URL or path
/// references without an `#egg=` fragment, or text that does not start with
/// a valid project name.
pub fn requirement_name(reference: &str) -> Option<PackageName> {
    let reference = strip_inline_comment(reference.trim());
    if reference.is_empty() {
        return None;
    }

    if is_url_or_path(reference) {
        return egg_fragment(reference).and_then(name_from_egg);
    }

    let without_marker = reference.split(';').next().unwrap_or(reference).trim();
    let end = without_marker
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(without_marker.len());
    let candidate = &without_marker[..end];
    if !is_valid_project_name(candidate) {
        return None;
    }

    // Anything after the name must look like extras, a specifier or a marker.
    let rest = without_marker[end..].trim_start();
    let follows_ok = rest.is_empty()
        || rest.starts_with(['[', '=', '<', '>', '!', '~', '(', ',']);
    follows_ok.then(|| PackageName::canonical(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_names() {
        assert_eq!(requirement_name("Django==1.3").unwrap(), "django");
        assert_eq!(requirement_name("requests").unwrap(), "requests");
        assert_eq!(requirement_name("zope.interface>=3.6").unwrap(), "zope-interface");
        assert_eq!(requirement_name("celery[redis]==2.4").unwrap(), "celery");
        assert_eq!(requirement_name("foo (>=1.0)").unwrap(), "foo");
        assert_eq!(requirement_name("foo ~= 1.0").unwrap(), "foo");
    }

    #[test]
    fn markers_and_inline_comments_are_ignored() {
        assert_eq!(
            requirement_name("pywin32==300; sys_platform == 'win32'").unwrap(),
            "pywin32"
        );
        assert_eq!(requirement_name("simplejson==2.1  # speedups").unwrap(), "simplejson");
    }

    #[test]
    fn url_requires_egg_fragment() {
        assert_eq!(
            requirement_name("http://example.com/pkg-1.0.tar.gz#egg=Pkg-1.0").unwrap(),
            "pkg"
        );
        assert!(requirement_name("http://example.com/pkg-1.0.tar.gz").is_none());
        assert!(requirement_name("./vendor/thing").is_none());
        assert!(requirement_name("dist/thing-1.0.zip").is_none());
    }

    #[test]
    fn garbage_is_unresolvable() {
        assert!(requirement_name("").is_none());
        assert!(requirement_name("!!!").is_none());
        assert!(requirement_name("two words").is_none());
        assert!(requirement_name("-x something").is_none());
    }

    #[test]
    fn egg_fragment_extraction() {
        assert_eq!(egg_fragment("http://h/x#egg=Foo-dev"), Some("Foo-dev"));
        assert_eq!(egg_fragment("http://h/x#egg=Foo&subdirectory=a"), Some("Foo"));
        assert_eq!(egg_fragment("http://h/x#egg="), None);
        assert_eq!(egg_fragment("http://h/x"), None);
    }

    #[test]
    fn egg_version_suffixes_are_stripped() {
        assert_eq!(strip_egg_version("Foo-dev"), "Foo");
        assert_eq!(strip_egg_version("Foo-1.0"), "Foo");
        assert_eq!(strip_egg_version("foo-bar-2.0-r12"), "foo-bar");
        assert_eq!(strip_egg_version("foo-bar"), "foo-bar");
        assert_eq!(strip_egg_version("py3-compat"), "py3-compat");
    }

    #[test]
    fn editable_with_vcs_scheme() {
        let req = parse_editable("git+https://github.com/org/Foo.git#egg=Foo-dev", None).unwrap();
        assert_eq!(req.vcs.as_deref(), Some("git"));
        assert_eq!(req.name.unwrap(), "foo");
        assert_eq!(req.url, "git+https://github.com/org/Foo.git#egg=Foo-dev");
    }

    #[test]
    fn editable_scp_style_git_url() {
        let req = parse_editable("git+git@github.com:org/bar.git#egg=bar", None).unwrap();
        assert_eq!(req.vcs.as_deref(), Some("git"));
        assert_eq!(req.name.unwrap(), "bar");
    }

    #[test]
    fn editable_default_vcs_is_applied() {
        let req = parse_editable("https://hg.example.com/repo#egg=Repo", Some("hg")).unwrap();
        assert_eq!(req.url, "hg+https://hg.example.com/repo#egg=Repo");
        assert_eq!(req.vcs.as_deref(), Some("hg"));
    }

    #[test]
    fn editable_without_vcs_or_default_fails() {
        let err = parse_editable("https://example.com/repo#egg=Repo", None).unwrap_err();
        assert_eq!(
            err,
            EditableError::MissingVcs {
                spec: "https://example.com/repo#egg=Repo".to_owned(),
                name: Some(PackageName::canonical("Repo")),
            }
        );
        assert!(err.to_string().contains("git+URL"));

        let err = parse_editable("https://example.com/repo", None).unwrap_err();
        assert!(matches!(err, EditableError::MissingVcs { name: None, .. }));
    }

    #[test]
    fn editable_unknown_vcs_fails() {
        let err = parse_editable("cvs+https://example.com/repo#egg=Repo", None).unwrap_err();
        assert!(matches!(err, EditableError::UnknownVcs { .. }));
    }

    #[test]
    fn editable_missing_egg_fails() {
        let err = parse_editable("git+https://example.com/repo.git", None).unwrap_err();
        assert_eq!(
            err,
            EditableError::MissingEgg("git+https://example.com/repo.git".to_owned())
        );
    }

    #[test]
    fn editable_local_path_has_no_name_without_egg() {
        let req = parse_editable("./src/mypkg", None).unwrap();
        assert!(req.vcs.is_none());
        assert!(req.name.is_none());

        let req = parse_editable("/abs/mypkg#egg=mypkg", None).unwrap();
        assert_eq!(req.name.unwrap(), "mypkg");
    }

    #[test]
    fn editable_file_url_is_local() {
        let req = parse_editable("file:///home/me/pkg#egg=pkg", None).unwrap();
        assert!(req.vcs.is_none());
        assert_eq!(req.name.unwrap(), "pkg");
    }

    #[test]
    fn empty_editable_fails() {
        assert_eq!(parse_editable("  ", None).unwrap_err(), EditableError::Empty);
    }
}
