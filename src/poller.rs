use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::controller::IncidentController;

/// Owned handle for the periodic notification reload. The task lives
/// exactly as long as this handle: `stop()` or dropping it aborts the
/// poll, so the timer cannot keep firing after its owner is gone.
#[derive(Debug)]
pub struct NotificationPoller {
    handle: JoinHandle<()>,
}

impl NotificationPoller {
    pub fn start(controller: IncidentController, period: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of an interval fires immediately; the
            // controller already did its initial load, so skip it.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                debug!("notification poll tick");
                controller.load_notifications().await;
            }
        });
        info!(period = ?period, "notification poller started");
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
        info!("notification poller stopped");
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
