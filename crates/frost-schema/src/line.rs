//! Classification of raw requirements-file lines.
//!
//! Rules are evaluated top to bottom on the line with leading whitespace
//! removed; the first match decides the variant:
//!
//! 1. blank or `#` comment → [`ManifestLine::Passthrough`]
//! 2. matches the configured skip pattern → [`ManifestLine::Skipped`]
//! 3. `-e` / `--editable` → [`ManifestLine::Editable`]
//! 4. any other option line (leading `-`) → [`ManifestLine::Directive`]
//! 5. anything else → [`ManifestLine::Requirement`]

use regex::Regex;

/// A manifest line together with its classification. Borrows the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestLine<'a> {
    /// Blank line or comment.
    Passthrough(&'a str),
    /// Matched the skip pattern; never classified further.
    Skipped(&'a str),
    /// Editable reference; `spec` is the text after the flag.
    Editable { raw: &'a str, spec: &'a str },
    /// Option directive such as `-r other.txt` or `--index-url ...`.
    Directive(&'a str),
    /// Plain package reference; `reference` is the trimmed text.
    Requirement { raw: &'a str, reference: &'a str },
}

impl<'a> ManifestLine<'a> {
    /// The line exactly as it appeared in the manifest.
    pub fn raw(&self) -> &'a str {
        match *self {
            Self::Passthrough(raw)
            | Self::Skipped(raw)
            | Self::Directive(raw)
            | Self::Editable { raw, .. }
            | Self::Requirement { raw, .. } => raw,
        }
    }

    /// Whether the line is copied to the output verbatim.
    pub fn is_verbatim(&self) -> bool {
        matches!(
            self,
            Self::Passthrough(_) | Self::Skipped(_) | Self::Directive(_)
        )
    }
}

pub fn classify_line<'a>(raw: &'a str, skip: Option<&Regex>) -> ManifestLine<'a> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return ManifestLine::Passthrough(raw);
    }
    if skip.is_some_and(|re| re.is_match(raw)) {
        return ManifestLine::Skipped(raw);
    }
    if let Some(spec) = editable_spec(trimmed) {
        return ManifestLine::Editable { raw, spec };
    }
    if trimmed.starts_with('-') {
        return ManifestLine::Directive(raw);
    }
    ManifestLine::Requirement {
        raw,
        reference: trimmed,
    }
}

fn editable_spec(trimmed: &str) -> Option<&str> {
    if let Some(rest) = trimmed.strip_prefix("--editable") {
        return Some(rest.trim().trim_start_matches('=').trim_start());
    }
    trimmed.strip_prefix("-e").map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_comment_lines_pass_through() {
        assert_eq!(classify_line("", None), ManifestLine::Passthrough(""));
        assert_eq!(classify_line("   ", None), ManifestLine::Passthrough("   "));
        assert_eq!(
            classify_line("# pinned for prod", None),
            ManifestLine::Passthrough("# pinned for prod")
        );
        assert_eq!(
            classify_line("  ## indented", None),
            ManifestLine::Passthrough("  ## indented")
        );
    }

    #[test]
    fn skip_pattern_wins_over_classification() {
        let re = Regex::new("^-e .*internal").unwrap();
        let line = "-e git+https://internal/repo#egg=secret";
        assert_eq!(classify_line(line, Some(&re)), ManifestLine::Skipped(line));
    }

    #[test]
    fn skip_pattern_does_not_apply_to_comments() {
        let re = Regex::new(".*").unwrap();
        assert_eq!(classify_line("# c", Some(&re)), ManifestLine::Passthrough("# c"));
    }

    #[test]
    fn short_editable_flag() {
        let line = "-e git+https://h/r.git#egg=Foo";
        assert_eq!(
            classify_line(line, None),
            ManifestLine::Editable {
                raw: line,
                spec: "git+https://h/r.git#egg=Foo"
            }
        );
    }

    #[test]
    fn long_editable_flag_with_equals() {
        let line = "--editable=svn+http://h/trunk#egg=Bar";
        match classify_line(line, None) {
            ManifestLine::Editable { spec, .. } => assert_eq!(spec, "svn+http://h/trunk#egg=Bar"),
            other => panic!("expected editable, got {other:?}"),
        }
        match classify_line("--editable  hg+http://h/x#egg=X", None) {
            ManifestLine::Editable { spec, .. } => assert_eq!(spec, "hg+http://h/x#egg=X"),
            other => panic!("expected editable, got {other:?}"),
        }
    }

    #[test]
    fn directives_are_recognized() {
        for line in [
            "-r base.txt",
            "--requirement=base.txt",
            "-Z",
            "--always-unzip",
            "-f http://dist.example.com/",
            "-i http://pypi.example.com/simple",
            "--extra-index-url http://mirror/simple",
            "--find-links=/tmp/wheels",
            "--index-url http://pypi/simple",
            "--no-index",
            "--trusted-host pypi.internal",
            "--pre",
            "-c constraints.txt",
            "--no-binary :all:",
            "--only-binary=:all:",
            "--prefer-binary",
            "--require-hashes",
        ] {
            let classified = classify_line(line, None);
            assert_eq!(classified, ManifestLine::Directive(line), "{line}");
            assert!(classified.is_verbatim());
        }
    }

    #[test]
    fn editable_flag_is_not_a_directive() {
        assert!(matches!(
            classify_line("-e ./local#egg=pkg", None),
            ManifestLine::Editable { .. }
        ));
        assert!(matches!(
            classify_line("--editable=./local", None),
            ManifestLine::Editable { .. }
        ));
    }

    #[test]
    fn plain_reference_is_trimmed() {
        let line = "  Django==1.3  ";
        assert_eq!(
            classify_line(line, None),
            ManifestLine::Requirement {
                raw: line,
                reference: "Django==1.3"
            }
        );
    }

    #[test]
    fn raw_returns_original_text() {
        let line = "  -e git+https://h/r#egg=x";
        assert_eq!(classify_line(line, None).raw(), line);
        assert!(!classify_line(line, None).is_verbatim());
    }
}
