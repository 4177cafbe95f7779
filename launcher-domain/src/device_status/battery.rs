//! Push-driven battery monitoring.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::BatteryStatus;
use crate::live::{Emitter, LiveSequence, Producer, Subscription};
use crate::platform::{BatteryPlatform, ChargeState, RawBatteryReading};

impl From<RawBatteryReading> for BatteryStatus {
    fn from(reading: RawBatteryReading) -> Self {
        let percentage = if reading.scale <= 0 {
            0
        } else {
            (i64::from(reading.level) * 100 / i64::from(reading.scale)).clamp(0, 100) as u8
        };
        BatteryStatus {
            percentage,
            is_charging: matches!(reading.state, ChargeState::Charging | ChargeState::Full),
        }
    }
}

struct BatteryProducer {
    platform: Arc<dyn BatteryPlatform>,
}

#[async_trait]
impl Producer<BatteryStatus> for BatteryProducer {
    async fn produce(&self, emitter: Emitter<BatteryStatus>, mut stop: oneshot::Receiver<()>) {
        // Register before the eager read so no change between the two is missed.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let token = match self.platform.register_listener(tx).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Battery listener registration failed: {}", e);
                return;
            }
        };
        debug!(?token, "Battery listener registered");

        match self.platform.read_status().await {
            Ok(reading) => {
                emitter.emit(reading.into());
            }
            Err(e) => warn!("Initial battery read failed: {}", e),
        }

        loop {
            tokio::select! {
                _ = &mut stop => break,
                reading = rx.recv() => match reading {
                    Some(reading) => {
                        if !emitter.emit(reading.into()) {
                            break;
                        }
                    }
                    None => break,
                },
            }
        }

        self.platform.unregister_listener(token).await;
        debug!(?token, "Battery listener unregistered");
    }
}

/// Live sequence of [`BatteryStatus`]: one value on subscription, then one per
/// platform battery broadcast.
#[derive(Clone)]
pub struct BatteryMonitor {
    sequence: LiveSequence<BatteryStatus>,
}

impl BatteryMonitor {
    pub fn new(platform: Arc<dyn BatteryPlatform>) -> Self {
        Self {
            sequence: LiveSequence::new("battery", BatteryProducer { platform }),
        }
    }

    pub fn observe(&self) -> Subscription<BatteryStatus> {
        self.sequence.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.sequence.is_active()
    }
}
