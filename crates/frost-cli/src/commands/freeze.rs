use super::{json_pretty, write_atomic, EXIT_SUCCESS};
use clap::Args;
use frost_core::{
    freeze, CoreError, FreezeConfig, FreezeOptions, FreezeReport, OutputLine,
    SitePackagesEnumerator, TextSink,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Args)]
pub struct FreezeArgs {
    /// Use the order in the given requirements file and its comments when generating output.
    #[arg(short = 'r', long = "requirement", value_name = "FILE")]
    pub requirement: Option<PathBuf>,
    /// URL for finding packages, which will be added to the output.
    #[arg(short = 'f', long = "find-links", value_name = "URL")]
    pub find_links: Vec<String>,
    /// If in a virtualenv, do not report globally-installed packages.
    #[arg(short = 'l', long = "local", default_value_t = false)]
    pub local: bool,
    /// Only print requirements that are not already pinned in the requirements file.
    #[arg(short = 'c', long = "changed", default_value_t = false)]
    pub changed: bool,
    /// Copy requirements file lines matching this regular expression unchanged.
    #[arg(long, value_name = "REGEX")]
    pub skip_pattern: Option<String>,
    /// VCS assumed for editable URLs without a vcs+ prefix.
    #[arg(long, value_name = "VCS")]
    pub default_vcs: Option<String>,
    /// Additional global site-packages directory to scan.
    #[arg(long = "site-packages", value_name = "DIR")]
    pub site_packages: Vec<PathBuf>,
    /// Write the result to FILE instead of stdout, replacing it atomically.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl FreezeArgs {
    /// Flags override scalar keys and extend list keys.
    fn merge_into(&self, mut config: FreezeConfig) -> FreezeConfig {
        if let Some(path) = &self.requirement {
            config.requirement = Some(path.clone());
        }
        config.find_links.extend(self.find_links.iter().cloned());
        config.local_only |= self.local;
        config.changed_only |= self.changed;
        if let Some(pattern) = &self.skip_pattern {
            config.skip_pattern = Some(pattern.clone());
        }
        if let Some(vcs) = &self.default_vcs {
            config.default_vcs = Some(vcs.clone());
        }
        config.site_packages.extend(self.site_packages.iter().cloned());
        config
    }
}

pub fn run(config_path: Option<&Path>, args: &FreezeArgs, json: bool) -> Result<u8, String> {
    let config = FreezeConfig::locate(config_path).map_err(|e| CoreError::from(e).to_string())?;
    let config = args.merge_into(config);
    let today = chrono::Local::now().date_naive();
    let options =
        FreezeOptions::from_config(&config, today).map_err(|e| CoreError::from(e).to_string())?;
    let enumerator = SitePackagesEnumerator::discover(&config.site_packages);
    for root in enumerator.roots() {
        debug!(
            "site-packages root {} ({})",
            root.path.display(),
            if root.local { "local" } else { "global" }
        );
    }

    if json {
        let mut lines: Vec<OutputLine> = Vec::new();
        let report = freeze(&enumerator, &options, &mut lines).map_err(|e| e.to_string())?;
        let payload = json_payload(&lines, &report);
        let mut text = json_pretty(&payload)?;
        text.push('\n');
        return emit(args.output.as_deref(), text.as_bytes());
    }

    if let Some(dest) = &args.output {
        let mut sink = TextSink::new(Vec::new());
        freeze(&enumerator, &options, &mut sink).map_err(|e| e.to_string())?;
        return emit(Some(dest), &sink.into_inner());
    }

    let mut sink = TextSink::new(io::BufWriter::new(io::stdout().lock()));
    let result = freeze(&enumerator, &options, &mut sink)
        .and_then(|_| sink.into_inner().flush().map_err(CoreError::from));
    match result {
        Ok(()) => Ok(EXIT_SUCCESS),
        Err(CoreError::Output(e)) if e.kind() == io::ErrorKind::BrokenPipe => Ok(EXIT_SUCCESS),
        Err(e) => Err(e.to_string()),
    }
}

fn json_payload(lines: &[OutputLine], report: &FreezeReport) -> serde_json::Value {
    let lines: Vec<String> = lines.iter().map(ToString::to_string).collect();
    serde_json::json!({
        "lines": lines,
        "diagnostics": report.diagnostics,
        "installed": report.installed,
    })
}

fn emit(dest: Option<&Path>, content: &[u8]) -> Result<u8, String> {
    match dest {
        Some(dest) => write_atomic(dest, content)?,
        None => {
            let mut out = io::stdout().lock();
            out.write_all(content)
                .and_then(|()| out.flush())
                .map_err(|e| format!("output error: {e}"))?;
        }
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use frost_core::Diagnostic;
    use frost_schema::{PackageRecord, PinnedRequirement};

    #[test]
    fn flags_override_config_scalars() {
        let config = FreezeConfig {
            requirement: Some(PathBuf::from("base.txt")),
            default_vcs: Some("hg".to_owned()),
            ..FreezeConfig::default()
        };
        let args = FreezeArgs {
            requirement: Some(PathBuf::from("dev.txt")),
            default_vcs: Some("git".to_owned()),
            changed: true,
            ..FreezeArgs::default()
        };
        let merged = args.merge_into(config);
        assert_eq!(merged.requirement, Some(PathBuf::from("dev.txt")));
        assert_eq!(merged.default_vcs.as_deref(), Some("git"));
        assert!(merged.changed_only);
        assert!(!merged.local_only);
    }

    #[test]
    fn flags_extend_config_lists() {
        let config = FreezeConfig {
            find_links: vec!["http://a/".to_owned()],
            local_only: true,
            ..FreezeConfig::default()
        };
        let args = FreezeArgs {
            find_links: vec!["http://b/".to_owned()],
            ..FreezeArgs::default()
        };
        let merged = args.merge_into(config);
        assert_eq!(merged.find_links, vec!["http://a/", "http://b/"]);
        assert!(merged.local_only);
    }

    #[test]
    fn json_payload_shape() {
        let record = PackageRecord::new("foo", "1.0");
        let lines = vec![
            OutputLine::FindLinks("http://dist/".to_owned()),
            OutputLine::Pinned(PinnedRequirement::exact(&record)),
        ];
        let report = FreezeReport {
            installed: 1,
            reconciled: true,
            diagnostics: vec![Diagnostic::NotInstalled {
                line: "bar==1".to_owned(),
                name: "bar".into(),
            }],
        };
        let value = json_payload(&lines, &report);
        assert_eq!(value["lines"][0], "-f http://dist/");
        assert_eq!(value["lines"][1], "foo==1.0");
        assert_eq!(value["diagnostics"][0]["kind"], "not-installed");
        assert_eq!(value["installed"], 1);
    }
}
