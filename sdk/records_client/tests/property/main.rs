//! Property-based tests for the records client.

#[path = "../common/mod.rs"]
mod common;

mod input;

/// Drives a future on a fresh current-thread runtime.
pub fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .expect("runtime")
        .block_on(future)
}
