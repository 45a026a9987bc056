//! Service-call surface: runs the generator off the async runtime and
//! publishes a notification when an image lands on disk.

use std::sync::Arc;

use serde::Deserialize;
use tokio::task;
use tracing::{error, info};

use crate::events::{EventPublisher, QrGenerated};
use crate::generator::Generator;
use crate::payload::Security;

pub const DEFAULT_FILENAME: &str = "wifi_qr.png";
/// Image size used when a call does not name one.
pub const DEFAULT_REQUEST_SIZE: u32 = 128;

/// Arguments of a `generate_wifi_qr` call.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub ssid: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub security: Security,
    #[serde(default = "default_request_size")]
    pub size: u32,
    #[serde(default = "default_filename")]
    pub filename: String,
}

impl GenerateRequest {
    pub fn new(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: String::new(),
            security: Security::default(),
            size: default_request_size(),
            filename: default_filename(),
        }
    }
}

fn default_request_size() -> u32 {
    DEFAULT_REQUEST_SIZE
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

#[derive(Clone)]
pub struct Service {
    generator: Arc<Generator>,
    publisher: Arc<dyn EventPublisher>,
}

impl Service {
    pub fn new(generator: Generator, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            generator: Arc::new(generator),
            publisher,
        }
    }

    /// Handle one request. Never fails; the outcome is logged and returned.
    pub async fn generate_wifi_qr(&self, request: GenerateRequest) -> bool {
        info!(ssid = %request.ssid, "generating WiFi QR");

        let generator = self.generator.clone();
        let job = request.clone();
        let result = task::spawn_blocking(move || {
            generator.generate_wifi_qr(
                &job.ssid,
                &job.password,
                &job.security,
                Some(job.size),
                &job.filename,
            )
        })
        .await;

        let ok = match result {
            Ok(ok) => ok,
            Err(err) => {
                error!(error = %err, "QR generation task did not complete");
                false
            }
        };

        if ok {
            info!(filename = %request.filename, "QR code generated successfully");
            let url = self.generator.public_url(&request.filename);
            self.publisher.publish(QrGenerated {
                ssid: request.ssid,
                filename: request.filename,
                url,
            });
        } else {
            error!(ssid = %request.ssid, "failed to generate QR code");
        }
        ok
    }
}
