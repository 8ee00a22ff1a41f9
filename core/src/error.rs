use std::fmt::Debug;

use thiserror::Error;

use crate::fault::Defect;
use crate::trace::Trace;

/// Illegal use of a container against its own invariant, such as unwrapping the wrong variant.
///
/// These are raised as plain message panics, which a capture boundary treats as defects.
#[derive(Debug, Error)]
pub enum IllegalState {
  #[error("called `{container}::{method}()` on a `{variant}` value")]
  WrongVariant {
    container: &'static str,
    method: &'static str,
    variant: &'static str,
  },
  #[error("{message}")]
  Expect {
    message: String,
  },
  #[error("{message}: {error}{trace}")]
  ExpectErr {
    message: String,
    error: String,
    trace: String,
  },
  #[error("lazy value is poisoned; its producer raised a defect or was re-entered")]
  Poisoned,
}
impl IllegalState {
  #[inline]
  pub fn wrong_variant(container: &'static str, method: &'static str, variant: &'static str) -> Self {
    Self::WrongVariant { container, method, variant }
  }
  #[inline]
  pub fn expect(message: impl Into<String>) -> Self {
    Self::Expect { message: message.into() }
  }
  pub fn expect_err(message: impl Into<String>, error: &impl Debug, trace: Option<&Trace>) -> Self {
    let trace = match trace {
      Some(trace) if trace.is_captured() => format!("\n\ntrace:\n{trace}"),
      _ => String::new(),
    };
    Self::ExpectErr { message: message.into(), error: format!("{error:?}"), trace }
  }
}
impl Defect for IllegalState {}

/// A captured fault could not be used as the declared error type without a conversion.
#[derive(Debug, Error)]
#[error("captured fault of type `{actual}` does not conform to the error type `{expected}`; supply an `on_error` conversion")]
pub struct TypeMismatch {
  pub expected: &'static str,
  pub actual: &'static str,
}
impl Defect for TypeMismatch {}
