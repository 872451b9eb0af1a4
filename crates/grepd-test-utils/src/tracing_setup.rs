//! Tracing bootstrap for tests.
//!
//! Tests that want log lines interleaved with harness output — handler
//! tests asserting on refusal paths, shutdown timing tests — call
//! [`init_test_tracing`] first. Initialisation happens at most once per
//! test binary; later calls are no-ops, so every test can call it.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "info";

/// Install a subscriber that writes through the libtest capture writer.
///
/// Honors `RUST_LOG` when set. Calling this from several tests in the
/// same binary is fine; only the first call installs anything.
///
/// ```ignore
/// #[tokio::test]
/// async fn my_test() {
///     grepd_test_utils::tracing_setup::init_test_tracing();
///     // handler logs show up under `cargo test -- --nocapture`
/// }
/// ```
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
