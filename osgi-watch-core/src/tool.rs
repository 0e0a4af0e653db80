//! External process invocation.
//!
//! Every build tool, shell hook and helper process goes through a
//! [`ToolRunner`], which keeps the orchestration testable without Gradle or
//! Ant installed.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};

/// A single external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    /// Runs `command` through the platform shell.
    pub fn shell(command: &str, cwd: impl Into<PathBuf>) -> Self {
        if cfg!(windows) {
            Self::new("cmd", cwd).arg("/C").arg(command)
        } else {
            Self::new("sh", cwd).arg("-c").arg(command)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Runs external commands.
///
/// Implementations return the combined stdout and stderr on success and
/// [`Error::ToolFailed`] when the process exits non-zero.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    async fn run(&self, invocation: &Invocation) -> Result<String>;
}

/// Runs commands as child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<String> {
        tracing::debug!("Running {} in {}", invocation, invocation.cwd.display());

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::ToolSpawn {
                program: invocation.program.clone(),
                message: e.to_string(),
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            Err(Error::ToolFailed {
                program: invocation.program.clone(),
                status: output.status.to_string(),
                output: combined,
            })
        }
    }
}

/// Which Gradle and Ant executables to use for a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTools {
    pub gradle: String,
    pub ant: String,
}

impl BuildTools {
    /// Prefers the configured Gradle, then the project's wrapper, then
    /// `gradle` from `PATH`.
    pub fn locate(project_dir: &Path, config: &Config) -> Self {
        let wrapper = if cfg!(windows) { "gradlew.bat" } else { "gradlew" };
        let gradle = match &config.gradle {
            Some(gradle) => gradle.clone(),
            None if project_dir.join(wrapper).is_file() => {
                project_dir.join(wrapper).display().to_string()
            }
            None => "gradle".to_string(),
        };

        Self {
            gradle,
            ant: config.ant.clone(),
        }
    }
}
