use std::fs::File;
use std::io;
use std::process::Stdio;

use anyhow::{Context, Result};
use strum::{AsRefStr, Display};
use tracing::debug;

use crate::platform::TerminalDevices;

/// What one of our own standard streams is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StreamKind {
    Pipe,
    Terminal,
}

/// How a child stream was bound. Only `Owned` handles are ours to close.
#[derive(Debug, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Binding {
    Inherited,
    Owned(File),
}

impl Binding {
    pub fn stdio(&self) -> io::Result<Stdio> {
        match self {
            Binding::Inherited => Ok(Stdio::inherit()),
            Binding::Owned(file) => Ok(Stdio::from(file.try_clone()?)),
        }
    }

    pub fn release(self) {
        if let Binding::Owned(file) = self {
            debug!("closing rebound terminal handle");
            drop(file);
        }
    }
}

pub fn classify_stdin() -> Result<StreamKind> {
    classify(io::stdin()).context("failed to stat standard input")
}

pub fn classify_stdout() -> Result<StreamKind> {
    classify(io::stdout()).context("failed to stat standard output")
}

#[cfg(unix)]
fn classify<H: std::os::fd::AsFd>(handle: H) -> io::Result<StreamKind> {
    use std::os::unix::fs::FileTypeExt;

    let file = File::from(handle.as_fd().try_clone_to_owned()?);
    let file_type = file.metadata()?.file_type();
    Ok(if file_type.is_char_device() { StreamKind::Terminal } else { StreamKind::Pipe })
}

#[cfg(windows)]
fn classify<H: std::os::windows::io::AsHandle>(handle: H) -> io::Result<StreamKind> {
    use std::os::windows::io::AsRawHandle;

    use windows_sys::Win32::Foundation::{GetLastError, NO_ERROR};
    use windows_sys::Win32::Storage::FileSystem::{FILE_TYPE_CHAR, FILE_TYPE_UNKNOWN, GetFileType};

    // SAFETY: the handle is borrowed from a live std stream or file
    let file_type = unsafe { GetFileType(handle.as_handle().as_raw_handle() as _) };
    if file_type == FILE_TYPE_UNKNOWN && unsafe { GetLastError() } != NO_ERROR {
        return Err(io::Error::last_os_error());
    }
    Ok(if file_type == FILE_TYPE_CHAR { StreamKind::Terminal } else { StreamKind::Pipe })
}

/// A piped stdin is swapped for the terminal so the editor can read keys.
pub fn bind_input(kind: StreamKind, devices: &TerminalDevices) -> Result<Binding> {
    let binding = match kind {
        StreamKind::Terminal => Binding::Inherited,
        StreamKind::Pipe => Binding::Owned(devices.open_input().with_context(|| {
            format!("failed to open {} for reading", devices.input.display())
        })?),
    };
    debug!(%kind, binding = binding.as_ref(), "bound editor input");
    Ok(binding)
}

/// A redirected stdout is swapped for the terminal so the editor can draw.
pub fn bind_output(kind: StreamKind, devices: &TerminalDevices) -> Result<Binding> {
    let binding = match kind {
        StreamKind::Terminal => Binding::Inherited,
        StreamKind::Pipe => Binding::Owned(devices.open_output().with_context(|| {
            format!("failed to open {} for writing", devices.output.display())
        })?),
    };
    debug!(%kind, binding = binding.as_ref(), "bound editor output");
    Ok(binding)
}
