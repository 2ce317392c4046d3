/// Fold a project name into its canonical lookup form.
///
/// Lowercases the name and collapses every run of `-`, `_` and `.` into a
/// single `-`, so `Zope.Interface`, `zope_interface` and `zope-interface` all
/// map to the same key.
pub fn canonical_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_separator = false;
    for c in raw.trim().chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}

/// A project name must be non-empty, start and end with an ASCII alphanumeric
/// character, and contain only alphanumerics and `-`, `_`, `.` in between.
pub fn is_valid_project_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    let (Some(first), Some(last)) = (bytes.first(), bytes.last()) else {
        return false;
    };
    first.is_ascii_alphanumeric()
        && last.is_ascii_alphanumeric()
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Project name as it appears in an `#egg=` fragment: dashes become
/// underscores so the version suffix stays unambiguous.
pub fn egg_project_name(project_name: &str) -> String {
    project_name.trim().replace('-', "_")
}
