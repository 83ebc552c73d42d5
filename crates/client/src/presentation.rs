//! Logging presentation adapter.
//!
//! Stands where a renderer would: subscribes to the change bus and mirrors
//! each batch into the structured log. A real presentation layer replaces
//! this loop, mapping `Placed`/`Replaced` to mesh creation and `Cleared` to
//! destruction. Adapters only read notifications; the store itself is never
//! theirs to touch.

use sandbox_world::StoreChange;
use tokio::sync::broadcast;

use crate::event_bus::{ChangeSource, WorldChangeBatch};

/// Consume change batches until the bus closes.
pub async fn run(mut rx: broadcast::Receiver<WorldChangeBatch>) {
    loop {
        match rx.recv().await {
            Ok(batch) => render(&batch),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                // A renderer that falls this far behind resyncs visually on
                // the next full snapshot; here we just note the gap.
                tracing::warn!("Presentation adapter lagged, {} batches dropped", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn render(batch: &WorldChangeBatch) {
    let label = match batch.source {
        ChangeSource::FullSync => "full sync",
        ChangeSource::Tick => "tick",
        ChangeSource::Local => "local",
    };
    for change in batch.changes.iter() {
        match change {
            StoreChange::Placed { pos, kind } => {
                tracing::info!("[{}] block {} appears at {}", label, kind, pos);
            }
            StoreChange::Replaced { pos, kind } => {
                tracing::info!("[{}] block at {} becomes {}", label, pos, kind);
            }
            StoreChange::Cleared { pos } => {
                tracing::info!("[{}] block at {} removed", label, pos);
            }
        }
    }
}
