use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// Diagnostic context captured where a failure was raised.
///
/// Whether frames are actually recorded follows the `RUST_BACKTRACE` and `RUST_LIB_BACKTRACE` environment variables,
/// as with [`Backtrace::capture`]. Cloning is cheap; clones share the same backtrace.
#[derive(Clone)]
pub struct Trace(Arc<Backtrace>);

impl Trace {
  #[inline]
  pub fn capture() -> Self { Self(Arc::new(Backtrace::capture())) }
  #[inline]
  pub fn force_capture() -> Self { Self(Arc::new(Backtrace::force_capture())) }
  #[inline]
  pub fn disabled() -> Self { Self(Arc::new(Backtrace::disabled())) }

  #[inline]
  pub fn status(&self) -> BacktraceStatus { self.0.status() }
  #[inline]
  pub fn is_captured(&self) -> bool { self.status() == BacktraceStatus::Captured }
  #[inline]
  pub fn backtrace(&self) -> &Backtrace { &self.0 }
}

impl From<Backtrace> for Trace {
  #[inline]
  fn from(backtrace: Backtrace) -> Self { Self(Arc::new(backtrace)) }
}

impl Display for Trace {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { Display::fmt(self.0.as_ref(), f) }
}
impl Debug for Trace {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self.status() {
      BacktraceStatus::Captured => f.write_str("Trace(captured)"),
      BacktraceStatus::Disabled => f.write_str("Trace(disabled)"),
      _ => f.write_str("Trace(unsupported)"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn disabled_trace_is_not_captured() {
    let trace = Trace::disabled();
    assert_eq!(trace.status(), BacktraceStatus::Disabled);
    assert!(!trace.is_captured());
    assert_eq!(format!("{trace:?}"), "Trace(disabled)");
  }

  #[test]
  fn clones_share_the_backtrace() {
    let trace = Trace::force_capture();
    let clone = trace.clone();
    assert!(std::ptr::eq(trace.backtrace(), clone.backtrace()));
  }
}
