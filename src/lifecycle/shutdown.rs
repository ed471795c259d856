//! Closing the service once the server has stopped.

use std::sync::Arc;

use crate::exporter::Service;

/// Close the service if the router has released its handle.
///
/// Returns `false` when a handler still holds a reference, in which case the
/// client is dropped with the last reference instead.
pub fn close_service(service: Arc<Service>) -> bool {
    match Arc::try_unwrap(service) {
        Ok(service) => {
            service.close();
            true
        }
        Err(service) => {
            tracing::warn!(
                references = Arc::strong_count(&service),
                "Service still referenced at shutdown"
            );
            false
        }
    }
}
