use std::cell::{OnceCell, RefCell};
use std::fmt::{self, Debug, Formatter};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::either::Either;
use crate::error::IllegalState;
use crate::fault::{self, Fault};
use crate::optional::Optional;
use crate::outcome::Outcome;

type Producer<T> = Box<dyn FnOnce() -> T>;

struct State<T> {
  value: OnceCell<T>,
  producer: RefCell<Option<Producer<T>>>,
  failure: RefCell<Option<Fault>>,
}

/// A value computed by a producer on first access, then memoized.
///
/// The producer runs at most once. Clones share the same memoized value, as do the lazies derived with [`map`],
/// [`flat_map`], and [`inspect`] which hold on to their source: evaluating a derived lazy evaluates its source too.
///
/// `Lazy` is neither `Send` nor `Sync`; it is meant for single-threaded use.
///
/// If the producer raises a fault, the lazy becomes poisoned and stays unevaluated. When that fault was recoverable,
/// later accesses raise a [replay](Fault::replay) of it, so conversions keep returning the absent or failed branch.
/// When it was a defect, later accesses panic with [`IllegalState::Poisoned`].
///
/// [`map`]: Lazy::map
/// [`flat_map`]: Lazy::flat_map
/// [`inspect`]: Lazy::inspect
pub struct Lazy<T>(Rc<State<T>>);

impl<T> Lazy<T> {
  pub fn new(producer: impl FnOnce() -> T + 'static) -> Self {
    let producer: Producer<T> = Box::new(producer);
    let state = State { value: OnceCell::new(), producer: RefCell::new(Some(producer)), failure: RefCell::new(None) };
    Self(Rc::new(state))
  }

  /// Gets the value, running the producer if this is the first access.
  ///
  /// # Panics
  ///
  /// Re-raises whatever the producer raises. After a recoverable fault, later accesses raise a replay of it. Panics
  /// with [`IllegalState::Poisoned`] if an earlier evaluation raised a defect, or if the producer accesses this lazy
  /// while it runs.
  #[track_caller]
  pub fn value(&self) -> &T {
    self.0.value.get_or_init(|| Self::evaluate(&self.0))
  }
  /// Alias of [`value`](Self::value).
  #[inline]
  #[track_caller]
  pub fn force(&self) -> &T { self.value() }

  #[inline]
  pub fn is_evaluated(&self) -> bool { self.0.value.get().is_some() }
  #[inline]
  pub fn is_poisoned(&self) -> bool { !self.is_evaluated() && self.0.producer.borrow().is_none() }

  /// Takes the value out, evaluating it if needed. The value is cloned only if it is shared with other lazies.
  #[track_caller]
  pub fn into_value(self) -> T where T: Clone {
    match Rc::try_unwrap(self.0) {
      Ok(mut state) => match state.value.take() {
        Some(value) => value,
        None => Self::evaluate(&state),
      },
      Err(state) => Self(state).value().clone(),
    }
  }

  #[track_caller]
  fn evaluate(state: &State<T>) -> T {
    let failure = state.failure.borrow().as_ref().map(Fault::replay);
    if let Some(failure) = failure {
      failure.resume()
    }
    let producer = state.producer.borrow_mut().take();
    let Some(producer) = producer else {
      panic!("{}", IllegalState::Poisoned)
    };
    trace!("evaluating lazy value");
    match panic::catch_unwind(AssertUnwindSafe(producer)) {
      Ok(value) => value,
      Err(payload) if fault::is_defect(payload.as_ref()) => panic::resume_unwind(payload),
      Err(payload) => {
        let fault = Fault::from_payload(payload);
        debug!(%fault, "lazy value failed to evaluate");
        *state.failure.borrow_mut() = Some(fault.replay());
        fault.resume()
      }
    }
  }
}

impl<T: 'static> Lazy<T> {
  /// Creates an unevaluated lazy that applies `f` to the value of `self`.
  pub fn map<U>(&self, f: impl FnOnce(&T) -> U + 'static) -> Lazy<U> {
    let source = self.clone();
    Lazy::new(move || f(source.value()))
  }

  /// Creates an unevaluated lazy that applies `f` to the value of `self` and takes the value of the lazy it returns.
  pub fn flat_map<U: Clone>(&self, f: impl FnOnce(&T) -> Lazy<U> + 'static) -> Lazy<U> {
    let source = self.clone();
    Lazy::new(move || f(source.value()).into_value())
  }

  /// Creates an unevaluated lazy with the value of `self` that calls `f` with that value when evaluated.
  ///
  /// Creating it does not evaluate `self`.
  pub fn inspect(&self, f: impl FnOnce(&T) + 'static) -> Lazy<T> where T: Clone {
    let source = self.clone();
    Lazy::new(move || {
      let value = source.value();
      f(value);
      value.clone()
    })
  }
}

impl<T: Clone> Lazy<T> {
  /// Evaluates inside a capture boundary, returning `Ok` with the value or `Err` with the recoverable fault the
  /// producer raised. Defects propagate, as with every capture boundary.
  pub fn to_result(&self) -> Outcome<T, Fault> {
    match fault::capture(|| self.value().clone()) {
      Ok(value) => Outcome::Ok(value),
      Err(fault) => {
        let trace = fault.trace().cloned();
        Outcome::Err { error: fault, trace }
      }
    }
  }

  /// Evaluates inside a capture boundary, returning `None` if the producer raised a recoverable fault.
  pub fn to_option(&self) -> Optional<T> {
    fault::capture(|| self.value().clone()).ok().into()
  }

  /// Evaluates inside a capture boundary, returning `Left` with the recoverable fault the producer raised.
  pub fn to_either(&self) -> Either<Fault, T> {
    match fault::capture(|| self.value().clone()) {
      Ok(value) => Either::Right(value),
      Err(fault) => Either::Left(fault),
    }
  }
}

impl<T> Clone for Lazy<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T: Debug> Debug for Lazy<T> {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match self.0.value.get() {
      Some(value) => f.debug_tuple("Lazy").field(value).finish(),
      None if self.is_poisoned() => f.write_str("Lazy(<poisoned>)"),
      None => f.write_str("Lazy(<unevaluated>)"),
    }
  }
}
