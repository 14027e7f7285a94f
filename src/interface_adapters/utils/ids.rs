use std::sync::atomic::{AtomicU64, Ordering};

/// Returns a process-unique connection id of the form `c<N>`.
///
/// Backed by a monotonic counter, so ids never collide within a running server.
pub fn next_connection_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("c{}", COUNTER.fetch_add(1, Ordering::Relaxed))
}
