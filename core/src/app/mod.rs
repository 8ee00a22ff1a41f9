#[cfg(feature = "app_panic_handler")]
pub mod panic_handler;
