use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;

/// Event name published after a successful generation.
pub const QR_GENERATED: &str = "qrcservice_qr_generated";

const BUS_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrGenerated {
    pub ssid: String,
    pub filename: String,
    pub url: String,
}

/// Sink for generation notifications.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: QrGenerated);
}

/// Broadcast-backed publisher; every subscriber sees every event.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<QrGenerated>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QrGenerated> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: QrGenerated) {
        if let Err(broadcast::error::SendError(event)) = self.tx.send(event) {
            debug!(event = QR_GENERATED, filename = %event.filename, "no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QrGenerated {
        QrGenerated {
            ssid: "Home".to_string(),
            filename: "wifi_qr.png".to_string(),
            url: "/local/qrcodes/wifi_qr.png".to_string(),
        }
    }

    #[test]
    fn subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        bus.publish(sample());
        assert_eq!(rx.try_recv().unwrap(), sample());
    }

    #[test]
    fn publishing_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.publish(sample());
    }

    #[test]
    fn event_serializes_flat() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["ssid"], "Home");
        assert_eq!(json["url"], "/local/qrcodes/wifi_qr.png");
    }
}
