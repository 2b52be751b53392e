use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use strum::Display;

use crate::utils::editor::EditorCommand;

const DEBIAN_EDITOR: &str = "/usr/bin/editor";
const TERMUX_PREFIX: &str = "/data/data/com.termux/files";

/// What to do with an editor value wrapped in quote characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum QuoteHandling {
    /// Hand the value, quotes included, to `sh -c`.
    ShellWrap,
    /// Trim the quote characters and use the rest as the program.
    Strip,
}

/// Devices the editor talks to when our own streams are redirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalDevices {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Console output handles must be opened read-write.
    pub output_read_write: bool,
}

impl TerminalDevices {
    pub fn open_input(&self) -> io::Result<File> {
        File::open(&self.input)
    }

    pub fn open_output(&self) -> io::Result<File> {
        OpenOptions::new().read(self.output_read_write).write(true).open(&self.output)
    }
}

/// Operating-system specifics, chosen once at startup by [`current`].
pub trait Platform {
    fn name(&self) -> &'static str;

    fn terminal_device_paths(&self) -> TerminalDevices;

    fn default_editor_command(&self) -> EditorCommand;

    fn quote_handling(&self) -> QuoteHandling;
}

#[derive(Debug, Clone)]
pub struct Posix {
    pub terminal: PathBuf,
    /// Upgrades for the `vi` fallback, first existing path wins.
    pub editor_candidates: Vec<PathBuf>,
}

impl Posix {
    pub fn new() -> Self {
        let mut editor_candidates = vec![PathBuf::from(DEBIAN_EDITOR)];
        if cfg!(any(target_os = "linux", target_os = "android")) {
            editor_candidates.push(Path::new(TERMUX_PREFIX).join(&DEBIAN_EDITOR[1..]));
        }
        Self { terminal: PathBuf::from("/dev/tty"), editor_candidates }
    }
}

impl Default for Posix {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for Posix {
    fn name(&self) -> &'static str {
        "posix"
    }

    fn terminal_device_paths(&self) -> TerminalDevices {
        TerminalDevices {
            input: self.terminal.clone(),
            output: self.terminal.clone(),
            output_read_write: false,
        }
    }

    fn default_editor_command(&self) -> EditorCommand {
        let program = self
            .editor_candidates
            .iter()
            .find(|path| path.exists())
            .map(|path| path.to_string_lossy().into_owned())
            .unwrap_or_else(|| "vi".to_owned());
        EditorCommand::single(program)
    }

    fn quote_handling(&self) -> QuoteHandling {
        QuoteHandling::ShellWrap
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Windows;

impl Platform for Windows {
    fn name(&self) -> &'static str {
        "windows"
    }

    fn terminal_device_paths(&self) -> TerminalDevices {
        TerminalDevices {
            input: PathBuf::from("CONIN$"),
            output: PathBuf::from("CONOUT$"),
            output_read_write: true,
        }
    }

    fn default_editor_command(&self) -> EditorCommand {
        EditorCommand::single("notepad.exe")
    }

    fn quote_handling(&self) -> QuoteHandling {
        QuoteHandling::Strip
    }
}

pub fn current() -> Box<dyn Platform> {
    if cfg!(windows) { Box::new(Windows) } else { Box::new(Posix::new()) }
}
