use std::fmt;

/// Errors that can occur while running benchmarks or reading results.
#[derive(Debug)]
pub enum BenchError {
    /// An external command exited with a non-zero status.
    CommandFailed {
        /// The command line that failed.
        command: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
    },
    /// Failed to parse a stat or results JSON document.
    Json(serde_json::Error),
    /// An IO error occurred (spawning a process, reading a stat file).
    Io(std::io::Error),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::CommandFailed { command, code } => match code {
                Some(code) => write!(f, "command failed with status {code}: {command}"),
                None => write!(f, "command terminated by signal: {command}"),
            },
            BenchError::Json(err) => write!(f, "JSON parse error: {err}"),
            BenchError::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BenchError::Json(err) => Some(err),
            BenchError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::Json(err)
    }
}

impl From<std::io::Error> for BenchError {
    fn from(err: std::io::Error) -> Self {
        BenchError::Io(err)
    }
}
