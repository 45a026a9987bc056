pub mod config;
pub mod error;
pub mod events;
pub mod generator;
pub mod logging;
pub mod payload;
pub mod render;
pub mod service;

pub use config::Config;
pub use error::{Error, Result};
pub use events::{EventBus, EventPublisher, QrGenerated};
pub use generator::Generator;
pub use payload::{Security, WifiCredential, WifiPayload, encode};
pub use render::{ErrorCorrection, RenderOptions, render};
pub use service::{GenerateRequest, Service};
