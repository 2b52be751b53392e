use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::config::Config;
use crate::platform::{Platform, QuoteHandling};

const QUOTES: [char; 2] = ['"', '\''];

/// Program name followed by its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    parts: Vec<String>,
}

impl EditorCommand {
    pub fn single(program: impl Into<String>) -> Self {
        Self { parts: vec![program.into()] }
    }

    pub fn shell(script: impl Into<String>) -> Self {
        Self { parts: vec!["sh".to_owned(), "-c".to_owned(), script.into()] }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// True for `sh -c ...`, whether built by quoting or typed out by the user.
    pub fn is_shell_wrapped(&self) -> bool {
        matches!(self.parts.as_slice(), [sh, c, ..] if sh == "sh" && c == "-c")
    }

    /// The editor command applied to `file`.
    pub fn on_file(&self, file: &Path) -> Invocation {
        Invocation { command: self.clone(), file: file.to_owned() }
    }
}

impl<S: Into<String>> FromIterator<S> for EditorCommand {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self { parts: iter.into_iter().map(Into::into).collect() }
    }
}

/// A resolved editor command together with the file it edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub command: EditorCommand,
    pub file: PathBuf,
}

impl Invocation {
    pub fn to_command(&self) -> Command {
        let (program, args) = match self.command.parts() {
            [program, args @ ..] => (program.as_str(), args),
            [] => ("", &[][..]),
        };
        let mut command = Command::new(program);
        command.args(args).arg(self.file.as_os_str());
        command
    }
}

/// Renders the command the way it is reported to the user: `sh -c` is left
/// out and an empty rendering shows as `""`.
impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skip = if self.command.is_shell_wrapped() { 2 } else { 0 };
        let file = self.file.to_string_lossy();
        let parts: Vec<&str> = self.command.parts()[skip..]
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(file.as_ref()))
            .collect();
        let joined = parts.join(" ");
        if joined.is_empty() { f.write_str("\"\"") } else { f.write_str(&joined) }
    }
}

/// Converts one editor value, from the command line or the environment, into
/// a command line.
pub fn resolve_command_line(value: &str, exact: bool, platform: &dyn Platform) -> EditorCommand {
    if exact || value.is_empty() {
        return EditorCommand::single(value);
    }

    if value.starts_with(QUOTES) || value.ends_with(QUOTES) {
        let handling = platform.quote_handling();
        debug!(value, %handling, "editor value is quoted");
        return match handling {
            QuoteHandling::ShellWrap => EditorCommand::shell(value),
            QuoteHandling::Strip => EditorCommand::single(value.trim_matches(QUOTES)),
        };
    }

    let command: EditorCommand = value.split_whitespace().collect();
    if command.parts().is_empty() { EditorCommand::single(value) } else { command }
}

/// Picks the editor for this run.
///
/// An explicit `--editor` wins outright. Otherwise the platform default is
/// replaced by `EDITOR` and then by `VISUAL`, so `VISUAL` takes precedence
/// when both are set.
pub fn resolve_editor<E>(config: &Config, platform: &dyn Platform, lookup_env: E) -> EditorCommand
where
    E: Fn(&str) -> Option<String>,
{
    let exact = config.use_exact_path;
    if let Some(value) = config.editor.as_deref() {
        debug!(value, exact, "editor given on the command line");
        return resolve_command_line(value, exact, platform);
    }

    let mut command = platform.default_editor_command();
    for name in ["EDITOR", "VISUAL"] {
        if let Some(value) = lookup_env(name) {
            debug!(name, value, exact, "editor taken from the environment");
            command = resolve_command_line(&value, exact, platform);
        }
    }
    command
}

/// Reads an environment variable, keeping set-but-empty values.
pub fn lookup_env(name: &str) -> Option<String> {
    std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
}
