//! External mapping engine.
//!
//! Graph generation is delegated to a declarative mapping processor run as a
//! subprocess. The [`MappingEngine`] trait is the seam the orchestrator
//! depends on, which lets tests substitute an in-process engine.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine archive not found: {path}")]
    MissingArchive { path: PathBuf },

    #[error("{program} exited with {}: {stderr}", status_text(.status))]
    Failed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },
}

fn status_text(status: &Option<i32>) -> String {
    status.map_or_else(
        || "no status (terminated by signal)".to_string(),
        |code| format!("status {code}"),
    )
}

/// Turns a mapping-rule file into a graph file.
pub trait MappingEngine {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Confirms the engine can be launched at all.
    fn check_available(&self) -> Result<(), EngineError>;

    /// Runs one mapping. A non-zero exit is an error; no retry.
    fn run(&self, mapping: &Path, output: &Path) -> Result<(), EngineError>;
}

/// RMLMapper launched as `java -jar <jar> -m <mapping> -o <output>`.
///
/// The mapping files reference their CSV inputs by relative path, so the
/// process runs in `working_dir`.
#[derive(Debug, Clone)]
pub struct RmlMapperEngine {
    java: String,
    jar: PathBuf,
    extra_args: Vec<String>,
    working_dir: PathBuf,
}

impl RmlMapperEngine {
    pub fn new(
        java: impl Into<String>,
        jar: impl Into<PathBuf>,
        working_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
            extra_args: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    #[must_use]
    pub fn with_extra_args(mut self, args: Vec<String>) -> Self {
        self.extra_args = args;
        self
    }

    fn command(&self, mapping: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.java);
        command
            .arg("-jar")
            .arg(&self.jar)
            .args(&self.extra_args)
            .arg("-m")
            .arg(mapping)
            .arg("-o")
            .arg(output)
            .current_dir(&self.working_dir);
        command
    }

    fn capture(&self, mut command: Command) -> Result<Output, EngineError> {
        command.output().map_err(|source| EngineError::Spawn {
            program: self.java.clone(),
            source,
        })
    }

    fn check_status(&self, output: &Output) -> Result<(), EngineError> {
        if output.status.success() {
            return Ok(());
        }
        Err(EngineError::Failed {
            program: self.java.clone(),
            status: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

impl MappingEngine for RmlMapperEngine {
    fn name(&self) -> &str {
        "rmlmapper"
    }

    fn check_available(&self) -> Result<(), EngineError> {
        let mut probe = Command::new(&self.java);
        probe.arg("-version");
        let output = self.capture(probe)?;
        self.check_status(&output)?;
        if !self.jar.is_file() {
            return Err(EngineError::MissingArchive {
                path: self.jar.clone(),
            });
        }
        tracing::debug!(java = %self.java, jar = %self.jar.display(), "mapping engine available");
        Ok(())
    }

    fn run(&self, mapping: &Path, output: &Path) -> Result<(), EngineError> {
        tracing::info!(
            engine = self.name(),
            mapping = %mapping.display(),
            output = %output.display(),
            "running mapping"
        );
        let result = self.capture(self.command(mapping, output))?;
        self.check_status(&result)
    }
}
