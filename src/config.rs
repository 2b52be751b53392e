use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::cli::Cli;

/// Settings for a single run, fixed once the command line has been parsed.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Editor given on the command line. `Some("")` is distinct from `None`.
    pub editor: Option<String>,
    /// Temp file suffix, already dot-prefixed when non-empty.
    pub suffix: String,
    pub use_exact_path: bool,
    pub temp_dir: PathBuf,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new(cli: Cli) -> Self {
        Self {
            editor: cli.editor,
            suffix: normalize_suffix(&cli.suffix),
            use_exact_path: cli.use_exact_path,
            temp_dir: env::temp_dir(),
            log_level: cli.log_level,
            log_file: cli.log_file,
        }
    }
}

pub fn normalize_suffix(suffix: &str) -> String {
    if suffix.is_empty() || suffix.starts_with('.') {
        suffix.to_owned()
    } else {
        format!(".{suffix}")
    }
}

pub fn get_log_path() -> Result<PathBuf> {
    let dir = get_project_dir()?.data_dir().to_owned();
    Ok(dir.join(format!("{}.log", env!("CARGO_PKG_NAME"))))
}

pub fn get_project_dir() -> Result<ProjectDirs> {
    ProjectDirs::from("io.github", "", env!("CARGO_PKG_NAME"))
        .context("Fail to get project directory, no home directory for the current user")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_normalize_suffix() {
        assert_eq!(normalize_suffix(""), "");
        assert_eq!(normalize_suffix("md"), ".md");
        assert_eq!(normalize_suffix(".md"), ".md");
        assert_eq!(normalize_suffix("tar.gz"), ".tar.gz");
        assert_eq!(normalize_suffix(".."), "..");
    }

    #[test]
    fn test_config_from_cli() {
        let cli = Cli {
            editor: Some(String::new()),
            suffix: "json".to_owned(),
            use_exact_path: true,
            log_level: None,
            log_file: None,
            trailing: Vec::new(),
        };
        let config = Config::new(cli);
        assert_eq!(config.editor.as_deref(), Some(""));
        assert_eq!(config.suffix, ".json");
        assert!(config.use_exact_path);
        assert_eq!(config.temp_dir, env::temp_dir());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_log_path_in_data_dir() {
        let temp = assert_fs::TempDir::new().unwrap();
        unsafe {
            env::set_var("XDG_DATA_HOME", temp.path());
        }

        let path = get_log_path().unwrap();
        assert!(path.starts_with(temp.path()), "unexpected log path {}", path.display());
        assert_eq!(path.file_name().unwrap(), "vipe.log");

        temp.close().unwrap();
    }
}
