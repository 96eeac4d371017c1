use crate::{error::SomxError, io::readers::open_text_reader, utils::util::Result};
use std::{
    ffi::OsStr,
    fs::File,
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

/// An external command line program invoked as a blocking subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    pub name: String,
    pub program: PathBuf,
}

impl ExternalTool {
    /// Resolves `name` inside `tools_dir`, or leaves it to `PATH` lookup.
    pub fn locate(name: &str, tools_dir: Option<&Path>) -> Self {
        let program = match tools_dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };
        Self {
            name: name.to_string(),
            program,
        }
    }

    fn command<I, S>(&self, args: I) -> Command
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(args);
        command
    }

    fn wait(&self, mut command: Command) -> Result<()> {
        log::debug!("Running {:?}", command);
        let status = command.status().map_err(|source| SomxError::ToolLaunch {
            tool: self.name.clone(),
            source,
        })?;
        if !status.success() {
            return Err(SomxError::ToolFailed {
                tool: self.name.clone(),
                status,
            });
        }
        Ok(())
    }

    pub fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.wait(self.command(args))
    }

    /// Feeds the (decompressed) content of `input` on stdin and writes stdout to `output`.
    pub fn filter_file<I, S>(&self, args: I, input: &Path, output: &Path) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut reader = open_text_reader(input)?;
        let out = File::create(output)
            .map_err(|e| crate::somx_error!("Failed to create {}: {}", output.display(), e))?;
        let mut command = self.command(args);
        command.stdin(Stdio::piped()).stdout(Stdio::from(out));
        log::debug!("Running {:?} < {} > {}", command, input.display(), output.display());

        let mut child = command.spawn().map_err(|source| SomxError::ToolLaunch {
            tool: self.name.clone(),
            source,
        })?;
        let copied = match child.stdin.take() {
            Some(mut stdin) => io::copy(&mut reader, &mut stdin).map(|_| ()),
            None => Ok(()),
        };

        let status = child.wait()?;
        if !status.success() {
            return Err(SomxError::ToolFailed {
                tool: self.name.clone(),
                status,
            });
        }
        copied.map_err(|e| {
            crate::somx_error!("Failed to pipe {} into {}: {}", input.display(), self.name, e)
        })
    }
}
