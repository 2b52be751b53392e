use std::fs::{self, OpenOptions};

use anyhow::{Context, Result};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::{self, Config};

/// Installs the file logger. Nothing is set up without a log level: stdout
/// carries data and the terminal belongs to the editor.
pub fn init(config: &Config) -> Result<()> {
    let Some(log_level) = config.log_level.as_deref() else {
        return Ok(());
    };
    let log_path = match &config.log_file {
        Some(path) => path.clone(),
        None => config::get_log_path()?,
    };
    if let Some(dir) = log_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Fail to create directory `{}`", dir.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Fail to open log file `{}`", log_path.display()))?;

    let env_filter = EnvFilter::try_new(log_level)
        .with_context(|| format!("Invalid log level `{log_level}`"))?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_level() {
        let config =
            Config { log_file: Some("/nonexistent/dir/vipe.log".into()), ..Config::default() };
        assert!(init(&config).is_ok());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let temp = assert_fs::TempDir::new().unwrap();
        let config = Config {
            log_level: Some("vipe=notalevel".to_owned()),
            log_file: Some(temp.path().join("logs").join("vipe.log")),
            ..Config::default()
        };
        let err = init(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid log level"), "got {err}");
        assert!(temp.path().join("logs").join("vipe.log").is_file());
    }
}
