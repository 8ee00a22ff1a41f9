use std::any::{type_name, Any};
use std::fmt::{self, Debug, Formatter};
use std::future::Future;

use crate::either::Either;
use crate::error::{IllegalState, TypeMismatch};
use crate::fault::{self, raise_defect, raise_traced, Fault};
use crate::optional::Optional;
use crate::trace::Trace;

/// Success ([`Ok`](Outcome::Ok)) or failure ([`Err`](Outcome::Err)) of an operation.
///
/// A failure carries a typed `error` and optionally the [`Trace`] captured where it was raised. The trace is diagnostic
/// only: it does not take part in equality.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome<T, E> {
  Ok(T),
  Err {
    error: E,
    #[cfg_attr(feature = "serde", serde(skip))]
    trace: Option<Trace>,
  },
}

impl<T, E> Outcome<T, E> {
  #[inline]
  pub const fn ok(value: T) -> Self { Self::Ok(value) }
  #[inline]
  pub const fn err(error: E) -> Self { Self::Err { error, trace: None } }
  #[inline]
  pub fn err_traced(error: E, trace: Trace) -> Self { Self::Err { error, trace: Some(trace) } }

  #[inline]
  pub const fn is_ok(&self) -> bool { matches!(self, Self::Ok(_)) }
  #[inline]
  pub const fn is_err(&self) -> bool { matches!(self, Self::Err { .. }) }

  #[inline]
  pub fn error(&self) -> Option<&E> {
    match self {
      Self::Ok(_) => None,
      Self::Err { error, .. } => Some(error),
    }
  }
  #[inline]
  pub fn trace(&self) -> Option<&Trace> {
    match self {
      Self::Ok(_) => None,
      Self::Err { trace, .. } => trace.as_ref(),
    }
  }

  #[inline]
  pub fn as_ref(&self) -> Outcome<&T, &E> {
    match self {
      Self::Ok(value) => Outcome::Ok(value),
      Self::Err { error, trace } => Outcome::Err { error, trace: trace.clone() },
    }
  }

  /// Returns the success value.
  ///
  /// On failure, the original error is raised again together with its trace (or a trace captured here if it had none).
  /// A capture boundary around this call therefore captures the same typed error.
  #[track_caller]
  pub fn unwrap(self) -> T where E: Debug + Send + 'static {
    match self {
      Self::Ok(value) => value,
      Self::Err { error, trace } => raise_traced(error, trace.or_else(|| Some(Trace::capture()))),
    }
  }

  /// Returns the success value.
  ///
  /// # Panics
  ///
  /// Panics with an [`IllegalState`] message combining `message` with the error and its trace, on failure.
  #[track_caller]
  pub fn expect(self, message: &str) -> T where E: Debug {
    match self {
      Self::Ok(value) => value,
      Self::Err { error, trace } => panic!("{}", IllegalState::expect_err(message, &error, trace.as_ref())),
    }
  }

  #[inline]
  pub fn get_or_else(self, fallback: impl FnOnce(E) -> T) -> T {
    match self {
      Self::Ok(value) => value,
      Self::Err { error, .. } => fallback(error),
    }
  }

  /// Maps the success value. A failure passes through with the same error and trace.
  #[inline]
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U, E> {
    match self {
      Self::Ok(value) => Outcome::Ok(f(value)),
      Self::Err { error, trace } => Outcome::Err { error, trace },
    }
  }

  /// Maps the error, keeping the trace.
  #[inline]
  pub fn map_err<F>(self, f: impl FnOnce(E) -> F) -> Outcome<T, F> {
    match self {
      Self::Ok(value) => Outcome::Ok(value),
      Self::Err { error, trace } => Outcome::Err { error: f(error), trace },
    }
  }

  #[inline]
  pub fn flat_map<U>(self, f: impl FnOnce(T) -> Outcome<U, E>) -> Outcome<U, E> {
    match self {
      Self::Ok(value) => f(value),
      Self::Err { error, trace } => Outcome::Err { error, trace },
    }
  }

  /// Collapses into a single value; exactly one of `on_ok` and `on_err` is called.
  #[inline]
  pub fn fold<U>(self, on_ok: impl FnOnce(T) -> U, on_err: impl FnOnce(E, Option<Trace>) -> U) -> U {
    match self {
      Self::Ok(value) => on_ok(value),
      Self::Err { error, trace } => on_err(error, trace),
    }
  }

  #[inline]
  pub fn or_else<F>(self, f: impl FnOnce(E, Option<Trace>) -> Outcome<T, F>) -> Outcome<T, F> {
    match self {
      Self::Ok(value) => Outcome::Ok(value),
      Self::Err { error, trace } => f(error, trace),
    }
  }

  #[inline]
  pub fn inspect(self, f: impl FnOnce(&T)) -> Self {
    if let Self::Ok(value) = &self {
      f(value);
    }
    self
  }
  #[inline]
  pub fn inspect_err(self, f: impl FnOnce(&E)) -> Self {
    if let Self::Err { error, .. } = &self {
      f(error);
    }
    self
  }

  /// Converts into an [`Optional`], discarding the error.
  #[inline]
  pub fn to_option(self) -> Optional<T> {
    match self {
      Self::Ok(value) => Optional::Some(value),
      Self::Err { .. } => Optional::None,
    }
  }

  /// Converts into an [`Either`] with the success value on the right and the error on the left.
  #[inline]
  pub fn to_either(self) -> Either<E, T> {
    match self {
      Self::Ok(value) => Either::Right(value),
      Self::Err { error, .. } => Either::Left(error),
    }
  }

  #[inline]
  pub fn into_result(self) -> Result<T, E> { self.into() }
}

impl<T, E: Any> Outcome<T, E> {
  /// Runs `producer`, returning `Ok` with its result, or `Err` with the recoverable fault it raised.
  ///
  /// The raised value itself becomes the error, so it must be an `E`. If it is not, a [`TypeMismatch`] defect is
  /// raised; use [`capture_with`](Self::capture_with) to convert other faults. Defects raised by `producer` propagate.
  pub fn capture(producer: impl FnOnce() -> T) -> Self {
    match fault::capture(producer) {
      Ok(value) => Self::Ok(value),
      Err(fault) => Self::conform(fault),
    }
  }

  /// Awaits `future` like [`capture`](Self::capture) does for a producer.
  pub async fn capture_async(future: impl Future<Output=T>) -> Self {
    match fault::capture_async(future).await {
      Ok(value) => Self::Ok(value),
      Err(fault) => Self::conform(fault),
    }
  }

  fn conform(fault: Fault) -> Self {
    // An `E` of `Fault` takes the fault as a whole; any other `E` must match the raised value.
    let trace = fault.trace().cloned();
    let mut slot = Some(fault);
    if let Some(error) = (&mut slot as &mut dyn Any).downcast_mut::<Option<E>>().and_then(Option::take) {
      return Self::Err { error, trace };
    }
    match slot.map(Fault::downcast::<E>) {
      Some(Ok((error, trace))) => Self::Err { error, trace },
      Some(Err(fault)) => raise_defect(TypeMismatch { expected: type_name::<E>(), actual: fault.type_name() }),
      None => unreachable!("fault taken only when `E` is `Fault`"),
    }
  }
}

impl<T, E> Outcome<T, E> {
  /// Runs `producer`, returning `Ok` with its result, or `Err` with `on_error` applied to the recoverable fault it
  /// raised. Defects raised by `producer` propagate without calling `on_error`.
  pub fn capture_with(producer: impl FnOnce() -> T, on_error: impl FnOnce(Fault) -> E) -> Self {
    match fault::capture(producer) {
      Ok(value) => Self::Ok(value),
      Err(fault) => Self::converted(fault, on_error),
    }
  }

  /// Awaits `future` like [`capture_with`](Self::capture_with) does for a producer.
  pub async fn capture_async_with(future: impl Future<Output=T>, on_error: impl FnOnce(Fault) -> E) -> Self {
    match fault::capture_async(future).await {
      Ok(value) => Self::Ok(value),
      Err(fault) => Self::converted(fault, on_error),
    }
  }

  fn converted(fault: Fault, on_error: impl FnOnce(Fault) -> E) -> Self {
    let trace = fault.trace().cloned();
    Self::Err { error: on_error(fault), trace }
  }
}

impl<T: PartialEq, E: PartialEq> PartialEq for Outcome<T, E> {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Ok(a), Self::Ok(b)) => a == b,
      (Self::Err { error: a, .. }, Self::Err { error: b, .. }) => a == b,
      _ => false,
    }
  }
}
impl<T: Eq, E: Eq> Eq for Outcome<T, E> {}

impl<T: Debug, E: Debug> Debug for Outcome<T, E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self {
      Self::Ok(value) => f.debug_tuple("Ok").field(value).finish(),
      Self::Err { error, .. } => f.debug_tuple("Err").field(error).finish(),
    }
  }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
  #[inline]
  fn from(result: Result<T, E>) -> Self {
    match result {
      Ok(value) => Self::Ok(value),
      Err(error) => Self::err(error),
    }
  }
}
impl<T, E> From<Outcome<T, E>> for Result<T, E> {
  #[inline]
  fn from(outcome: Outcome<T, E>) -> Self {
    match outcome {
      Outcome::Ok(value) => Ok(value),
      Outcome::Err { error, .. } => Err(error),
    }
  }
}
