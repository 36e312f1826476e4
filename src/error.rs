use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("nmap executable not found at {0:?}")]
    ExecutableNotFound(PathBuf),

    #[error("failed to launch nmap: {0}")]
    Launch(#[from] std::io::Error),

    #[error("nmap exited with code {code:?}")]
    NonZeroExit { code: Option<i32> },
}
