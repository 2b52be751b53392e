use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::{Builder, TempPath};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::EditorExited;
use crate::platform::Platform;
use crate::stream::{self, StreamKind};
use crate::utils::editor::{self, Invocation};

const TEMP_PREFIX: &str = "vipe-";

/// One run of the tool: stage input, edit it, emit the result.
pub struct Pipeline<'a> {
    config: &'a Config,
    platform: &'a dyn Platform,
    input_kind: StreamKind,
    output_kind: StreamKind,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        platform: &'a dyn Platform,
        input_kind: StreamKind,
        output_kind: StreamKind,
    ) -> Self {
        Self { config, platform, input_kind, output_kind }
    }

    pub fn execute<R, W, E>(&self, mut input: R, mut output: W, lookup_env: E) -> Result<()>
    where
        R: Read,
        W: Write,
        E: Fn(&str) -> Option<String>,
    {
        info!(
            platform = self.platform.name(),
            input = %self.input_kind,
            output = %self.output_kind,
            "starting"
        );

        let staged =
            stage_input(&self.config.temp_dir, &self.config.suffix, self.input_kind, &mut input)?;

        let command = editor::resolve_editor(self.config, self.platform, lookup_env);
        let invocation = command.on_file(&staged);
        self.run_editor(&invocation)?;

        let written = emit(&staged, &mut output)?;
        info!(bytes = written, "done");
        Ok(())
    }

    fn run_editor(&self, invocation: &Invocation) -> Result<()> {
        let devices = self.platform.terminal_device_paths();
        let stdin = stream::bind_input(self.input_kind, &devices)?;
        let stdout = stream::bind_output(self.output_kind, &devices)?;

        info!(command = ?invocation.command.parts(), file = ?invocation.file, "launching editor");
        let status = {
            let mut command = invocation.to_command();
            match (stdin.stdio(), stdout.stdio()) {
                (Ok(child_in), Ok(child_out)) => command
                    .stdin(child_in)
                    .stdout(child_out)
                    .stderr(std::process::Stdio::inherit())
                    .status(),
                (Err(e), _) | (_, Err(e)) => Err(e),
            }
        };
        stdin.release();
        stdout.release();

        let status = status.with_context(|| format!("failed to run editor `{invocation}`"))?;
        debug!(%status, "editor finished");
        if !status.success() {
            return Err(EditorExited::new(invocation, status).into());
        }
        Ok(())
    }
}

/// Creates the temp file and fills it from `input` when that is a pipe.
///
/// The returned path removes the file when dropped; the write handle is
/// already closed so the editor has the file to itself.
pub fn stage_input<R: Read>(
    dir: &Path,
    suffix: &str,
    kind: StreamKind,
    input: &mut R,
) -> Result<TempPath> {
    let mut file = Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(suffix)
        .tempfile_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    debug!(path = ?file.path(), "created temporary file");

    if kind == StreamKind::Pipe {
        let copied = io::copy(input, file.as_file_mut())
            .context("failed to copy standard input to temporary file")?;
        debug!(bytes = copied, "staged standard input");
    }

    Ok(file.into_temp_path())
}

/// Copies the edited file to `output` unchanged.
pub fn emit<W: Write>(path: &Path, output: &mut W) -> Result<u64> {
    let mut file = File::open(path)
        .with_context(|| format!("failed to reopen temporary file {}", path.display()))?;
    let written = io::copy(&mut file, output).context("failed to write standard output")?;
    output.flush().context("failed to flush standard output")?;
    Ok(written)
}

/// Runs against the real process streams.
pub fn run(config: &Config, platform: &dyn Platform) -> Result<()> {
    let input_kind = stream::classify_stdin()?;
    let output_kind = stream::classify_stdout()?;

    Pipeline::new(config, platform, input_kind, output_kind).execute(
        io::stdin().lock(),
        io::stdout().lock(),
        editor::lookup_env,
    )
}
