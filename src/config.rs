use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::render::ErrorCorrection;

/// Accepted range for the configured default image size.
pub const DEFAULT_SIZE_RANGE: RangeInclusive<u32> = 64..=512;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Directory the generated images are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Size used when a request does not carry one.
    #[serde(default = "default_size")]
    pub default_size: u32,
    /// Error-correction code (L, M, Q or H).
    #[serde(default = "default_error_correction")]
    pub error_correction: String,
    /// Public prefix under which the output directory is served.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let cfg: Config = serde_yaml::from_slice(&data)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;
        Ok(cfg)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            DEFAULT_SIZE_RANGE.contains(&self.default_size),
            "default-size must be within {}..={} (got {})",
            DEFAULT_SIZE_RANGE.start(),
            DEFAULT_SIZE_RANGE.end(),
            self.default_size
        );
        self.error_correction
            .parse::<ErrorCorrection>()
            .context("error-correction must be one of L, M, Q, H")?;
        ensure!(
            !self.output_dir.as_os_str().is_empty(),
            "output-dir must not be empty"
        );
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            default_size: default_size(),
            error_correction: default_error_correction(),
            url_prefix: default_url_prefix(),
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("www/qrcodes")
}

fn default_size() -> u32 {
    128
}

fn default_error_correction() -> String {
    ErrorCorrection::default().code().to_string()
}

fn default_url_prefix() -> String {
    "/local/qrcodes".to_string()
}
