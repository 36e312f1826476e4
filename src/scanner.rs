use std::process::Stdio;

use chrono::Utc;
use tokio::process::Command;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::ScanError;

/// Runs nmap against the configured range and captures its output.
pub struct Scanner {
    config: Config,
}

impl Scanner {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Launch nmap and wait for it to exit, returning its captured stdout.
    ///
    /// stdout carries the XML report (`-oX -`); whatever nmap writes to its
    /// stderr is relayed to the diagnostic channel after capture. A non-zero
    /// exit code is an error and the report text is discarded.
    pub async fn scan(&self) -> Result<String, ScanError> {
        let path = &self.config.nmap_path;

        // a bare command name resolves through PATH; only explicit paths
        // can be checked up front
        if path.components().count() > 1 && !path.exists() {
            return Err(ScanError::ExecutableNotFound(path.clone()));
        }

        info!(
            "starting nmap scan of {} on ports {}",
            self.config.target_range, self.config.ports
        );

        let mut cmd = Command::new(path);
        cmd.arg("-p")
            .arg(&self.config.ports)
            .arg("-sV") // service version detection
            .arg("-T4") // aggressive timing
            .arg("--noninteractive")
            .arg("--system-dns")
            .arg("-oX")
            .arg("-") // XML report on stdout
            .arg(&self.config.target_range)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("running nmap command: {:?}", cmd);

        let start = Utc::now();
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScanError::ExecutableNotFound(path.clone())
            } else {
                ScanError::Launch(e)
            }
        })?;
        let elapsed = Utc::now() - start;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("nmap stderr:\n{}", stderr.trim_end());
        }

        if !output.status.success() {
            error!("nmap failed with exit code {:?}", output.status.code());
            return Err(ScanError::NonZeroExit {
                code: output.status.code(),
            });
        }

        info!("nmap scan completed in {}ms", elapsed.num_milliseconds());

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
