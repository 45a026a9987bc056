//! Per-configuration QR generator: encodes credentials and renders them
//! under the configured output directory.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::config::Config;
use crate::error::Error;
use crate::payload::{Security, encode};
use crate::render::{self, RenderOptions};

#[derive(Debug, Clone)]
pub struct Generator {
    output_dir: PathBuf,
    default_size: u32,
    error_correction: String,
    url_prefix: String,
}

impl Generator {
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            default_size: config.default_size,
            error_correction: config.error_correction.clone(),
            url_prefix: config.url_prefix.clone(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it is missing.
    pub fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "failed to create output dir at {}",
                self.output_dir.display()
            )
        })?;
        info!(dir = %self.output_dir.display(), "QR codes will be saved here");
        Ok(())
    }

    /// Path an image with `filename` is written to.
    pub fn output_path(&self, filename: &str) -> Result<PathBuf, Error> {
        validate_filename(filename)?;
        Ok(self.output_dir.join(filename))
    }

    /// Relative URL the host serves `filename` under.
    pub fn public_url(&self, filename: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), filename)
    }

    /// Encode and render one image. Any failure is logged and yields `false`.
    pub fn generate_wifi_qr(
        &self,
        ssid: &str,
        password: &str,
        security: &Security,
        size: Option<u32>,
        filename: &str,
    ) -> bool {
        let output_path = match self.output_path(filename) {
            Ok(path) => path,
            Err(err) => {
                error!(error = %err, "failed to generate QR code");
                return false;
            }
        };
        let payload = encode(ssid, password, security);
        let options = RenderOptions {
            size: size.unwrap_or(self.default_size),
            error_correction: self.error_correction.clone(),
            output_path,
        };
        render::render(&payload, &options)
    }
}

/// Accept only a single plain path component.
fn validate_filename(filename: &str) -> Result<(), Error> {
    let invalid = || Error::InvalidFilename(filename.to_string());
    if filename.is_empty() || filename.contains(['/', '\\']) {
        return Err(invalid());
    }
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn generator_in(dir: &Path) -> Generator {
        let cfg = Config {
            output_dir: dir.to_path_buf(),
            ..Config::default()
        };
        Generator::new(&cfg)
    }

    #[test]
    fn plain_filenames_are_accepted() {
        for name in ["wifi_qr.png", "guest.png", "a..b.png", ".hidden.png"] {
            validate_filename(name).unwrap_or_else(|_| panic!("{name} should be valid"));
        }
    }

    #[test]
    fn traversal_and_separators_are_rejected() {
        let names = [
            "",
            ".",
            "..",
            "../x.png",
            "../../etc/passwd",
            "a/b.png",
            "/abs.png",
            r"a\b.png",
        ];
        for name in names {
            assert!(
                matches!(validate_filename(name), Err(Error::InvalidFilename(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn public_url_joins_prefix() {
        let tmp = tempdir().unwrap();
        let generator = generator_in(tmp.path());
        assert_eq!(generator.public_url("a.png"), "/local/qrcodes/a.png");
    }

    #[test]
    fn ensure_output_dir_creates_nested_dirs() {
        let tmp = tempdir().unwrap();
        let generator = generator_in(&tmp.path().join("www").join("qrcodes"));
        generator.ensure_output_dir().unwrap();
        assert!(generator.output_dir().is_dir());
    }

    #[test]
    fn missing_size_uses_configured_default() {
        let tmp = tempdir().unwrap();
        let cfg = Config {
            output_dir: tmp.path().to_path_buf(),
            default_size: 96,
            ..Config::default()
        };
        let generator = Generator::new(&cfg);
        assert!(generator.generate_wifi_qr("Home", "pw", &Security::Wpa, None, "d.png"));
        let img = image::open(tmp.path().join("d.png")).unwrap();
        assert_eq!((img.width(), img.height()), (96, 96));
    }

    #[test]
    fn traversal_filename_writes_nothing() {
        let tmp = tempdir().unwrap();
        let inner = tmp.path().join("out");
        let generator = generator_in(&inner);
        generator.ensure_output_dir().unwrap();
        assert!(!generator.generate_wifi_qr(
            "Home",
            "pw",
            &Security::Wpa,
            Some(64),
            "../x.png"
        ));
        assert!(!tmp.path().join("x.png").exists());
    }
}
