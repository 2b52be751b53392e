use std::fmt;
use std::process::ExitStatus;

use crate::utils::editor::Invocation;

/// The editor ran but exited unsuccessfully. Reported as a plain sentence
/// rather than an I/O failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorExited {
    pub command: Box<str>,
    pub status: i32,
}

impl EditorExited {
    /// Signal terminations have no exit code and report `-1`.
    pub fn new(invocation: &Invocation, status: ExitStatus) -> Self {
        Self {
            command: invocation.to_string().into_boxed_str(),
            status: status.code().unwrap_or(-1),
        }
    }
}

impl fmt::Display for EditorExited {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} exited with a status of {}, aborting", self.command, self.status)
    }
}

impl std::error::Error for EditorExited {}
