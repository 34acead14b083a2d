//! Errors raised by the simulation core.

use freightwatch_types::ContainerId;
use thiserror::Error;

/// Container tick and scheduling errors.
#[derive(Debug, Error)]
pub enum SimError {
    /// A container's route is empty or its waypoint cursor is out of
    /// range. The tick is skipped and the fault counter incremented;
    /// past the threshold the container is removed from the live set.
    #[error("container {container_id} has corrupt route state at waypoint {waypoint_index}")]
    CorruptContainerState {
        /// The affected container.
        container_id: ContainerId,
        /// The waypoint cursor at the time of the fault.
        waypoint_index: usize,
    },
}
