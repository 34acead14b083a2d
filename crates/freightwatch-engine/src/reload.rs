//! Periodic geofence reload.
//!
//! When a GeoJSON source is configured with a nonzero reload interval,
//! a background task re-reads the file and swaps the shared index
//! snapshot. A failed reload keeps the last good snapshot, so a
//! half-written file never takes the simulation down.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use freightwatch_geo::{load_geojson, GeofenceIndex};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Spawn the reload loop. The task runs for the life of the process;
/// the handle is returned so callers can abort it on shutdown.
pub fn spawn_reload_task(
    path: PathBuf,
    interval: Duration,
    index: Arc<RwLock<Arc<GeofenceIndex>>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            match load_geojson(&path).and_then(GeofenceIndex::build) {
                Ok(fresh) => {
                    let count = fresh.len();
                    *index.write().await = Arc::new(fresh);
                    info!(path = %path.display(), geofences = count, "geofence index reloaded");
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "geofence reload failed, keeping previous snapshot"
                    );
                }
            }
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freightwatch_geo::geofence::square_fence;
    use freightwatch_types::{GeofenceKind, Position};

    use super::*;

    fn snapshot() -> Arc<RwLock<Arc<GeofenceIndex>>> {
        let fence = square_fence(
            "NLRTM Terminal",
            GeofenceKind::Terminal,
            Position::new(51.95, 4.14),
            0.05,
            None,
        )
        .unwrap();
        let index = GeofenceIndex::build(vec![fence]).unwrap();
        Arc::new(RwLock::new(Arc::new(index)))
    }

    #[tokio::test]
    async fn missing_file_keeps_the_previous_snapshot() {
        let shared = snapshot();
        let handle = spawn_reload_task(
            PathBuf::from("/nonexistent/fences.json"),
            Duration::from_millis(10),
            Arc::clone(&shared),
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
        assert_eq!(shared.read().await.len(), 1);
    }
}
