use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum CliError {
    InvalidArgument(String),
    Input { file: PathBuf, inner: geogen::Error },
    /// Template parse errors already carry their file name.
    Template(geogen::Error),
    Startup { file: PathBuf, inner: geogen::Error },
    Geogen(geogen::Error),
    Io(io::Error),
}

impl CliError {
    /// The process exit code for this error: 2 for input parse errors, 3 for
    /// template parse errors, 4 for analytic faults during startup, 1 for
    /// anything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Input { .. } => 2,
            CliError::Template(_) => 3,
            CliError::Startup { .. } => 4,
            _ => 1,
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<geogen::Error> for CliError {
    fn from(e: geogen::Error) -> Self {
        Self::Geogen(e)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::InvalidArgument(a) => write!(f, "invalid argument: {}", a),
            CliError::Input { file, inner } | CliError::Startup { file, inner } => {
                write!(f, "{}: {}", file.display(), inner)
            }
            CliError::Template(e) | CliError::Geogen(e) => write!(f, "{}", e),
            CliError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}
