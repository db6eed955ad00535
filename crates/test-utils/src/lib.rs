//! Shared helpers for taskwave's integration tests.
//!
//! - [`call_log`] records which tasks ran and in what order.
//! - [`fixtures`] builds common task specs on top of it.

pub mod call_log;
pub mod fixtures;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

static INIT: Once = Once::new();

/// Upper bound on any single async test body.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Install a global test subscriber once per test binary.
///
/// Output goes through the test writer, so it only shows up for failing
/// tests. The filter comes from `TASKWAVE_LOG` (e.g. `TASKWAVE_LOG=debug`)
/// and defaults to `info`.
///
/// Schedulers built with an explicit logger ignore this subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("TASKWAVE_LOG")
            .unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_names(true)
            .init();
    });
}

/// Await `f`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(TEST_TIMEOUT, f).await {
        Ok(out) => out,
        Err(_) => panic!("test did not finish within {TEST_TIMEOUT:?}"),
    }
}
