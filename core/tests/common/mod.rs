use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Sets up test logging from `RUST_LOG` and the fault-aware panic hook, once per test binary.
pub fn init() {
  static INIT: Once = Once::new();
  INIT.call_once(|| {
    let _ = tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .with_test_writer()
      .try_init();
  });
  #[cfg(feature = "app_panic_handler")]
  oneof_core::app::panic_handler::install_panic_handler();
}
