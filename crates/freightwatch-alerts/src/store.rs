//! In-memory alert history.
//!
//! Alerts are held newest-first and capped; when the cap is reached the
//! oldest alert is discarded. The pipeline only ever appends; the sole
//! external mutation is acknowledgement, which is idempotent.

use freightwatch_types::{AlertId, AlertRecord};

/// Capped, newest-first alert store.
#[derive(Debug)]
pub struct AlertStore {
    alerts: Vec<AlertRecord>,
    capacity: usize,
}

impl AlertStore {
    /// Create a store retaining at most `capacity` alerts.
    #[must_use]
    pub const fn new(capacity: usize) -> Self {
        Self {
            alerts: Vec::new(),
            capacity,
        }
    }

    /// Insert an alert at the front, evicting the oldest past capacity.
    pub fn push(&mut self, alert: AlertRecord) {
        self.alerts.insert(0, alert);
        self.alerts.truncate(self.capacity.max(1));
    }

    /// Mark an alert acknowledged. Returns whether the alert exists;
    /// acknowledging twice is a no-op.
    pub fn acknowledge(&mut self, id: AlertId) -> bool {
        match self.alerts.iter_mut().find(|a| a.id == id) {
            Some(alert) => {
                alert.acknowledged = true;
                true
            }
            None => false,
        }
    }

    /// All alerts, newest first.
    #[must_use]
    pub fn all(&self) -> &[AlertRecord] {
        &self.alerts
    }

    /// Whether an unacknowledged alert exists for a container/geofence
    /// pair.
    #[must_use]
    pub fn has_active(&self, container: freightwatch_types::ContainerId, geofence: &str) -> bool {
        self.alerts
            .iter()
            .any(|a| !a.acknowledged && a.container_id == container && a.geofence_name == geofence)
    }

    /// Number of alerts currently retained.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.alerts.len()
    }

    /// Whether the store holds no alerts.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.alerts.is_empty()
    }
}
