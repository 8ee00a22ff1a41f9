use std::future::Future;

use crate::either::Either;
use crate::error::IllegalState;
use crate::fault;
use crate::outcome::Outcome;

/// A value that is either present ([`Some`](Optional::Some)) or absent ([`None`](Optional::None)).
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Optional<T> {
  Some(T),
  None,
}

impl<T> Default for Optional<T> {
  #[inline]
  fn default() -> Self { Self::None }
}

impl<T> Optional<T> {
  #[inline]
  pub const fn some(value: T) -> Self { Self::Some(value) }
  #[inline]
  pub const fn none() -> Self { Self::None }

  #[inline]
  pub const fn is_some(&self) -> bool { matches!(self, Self::Some(_)) }
  #[inline]
  pub const fn is_none(&self) -> bool { matches!(self, Self::None) }

  #[inline]
  pub const fn as_ref(&self) -> Optional<&T> {
    match self {
      Self::Some(value) => Optional::Some(value),
      Self::None => Optional::None,
    }
  }

  /// Returns the contained value.
  ///
  /// # Panics
  ///
  /// Panics with an [`IllegalState`] message if `self` is `None`.
  #[inline]
  #[track_caller]
  pub fn unwrap(self) -> T {
    match self {
      Self::Some(value) => value,
      Self::None => panic!("{}", IllegalState::wrong_variant("Optional", "unwrap", "None")),
    }
  }

  /// Returns the contained value.
  ///
  /// # Panics
  ///
  /// Panics with `message` if `self` is `None`.
  #[inline]
  #[track_caller]
  pub fn expect(self, message: &str) -> T {
    match self {
      Self::Some(value) => value,
      Self::None => panic!("{}", IllegalState::expect(message)),
    }
  }

  #[inline]
  pub fn get_or_else(self, fallback: impl FnOnce() -> T) -> T {
    match self {
      Self::Some(value) => value,
      Self::None => fallback(),
    }
  }

  #[inline]
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Optional<U> {
    match self {
      Self::Some(value) => Optional::Some(f(value)),
      Self::None => Optional::None,
    }
  }

  #[inline]
  pub fn flat_map<U>(self, f: impl FnOnce(T) -> Optional<U>) -> Optional<U> {
    match self {
      Self::Some(value) => f(value),
      Self::None => Optional::None,
    }
  }

  /// Keeps the value only if `predicate` holds for it.
  #[inline]
  pub fn filter(self, predicate: impl FnOnce(&T) -> bool) -> Self {
    match self {
      Self::Some(value) if predicate(&value) => Self::Some(value),
      _ => Self::None,
    }
  }

  /// Collapses into a single value; exactly one of `on_some` and `on_none` is called.
  #[inline]
  pub fn fold<U>(self, on_some: impl FnOnce(T) -> U, on_none: impl FnOnce() -> U) -> U {
    match self {
      Self::Some(value) => on_some(value),
      Self::None => on_none(),
    }
  }

  #[inline]
  pub fn or_else(self, f: impl FnOnce() -> Self) -> Self {
    match self {
      some @ Self::Some(_) => some,
      Self::None => f(),
    }
  }

  /// Calls `f` with the contained value, if any, and returns `self` unchanged.
  #[inline]
  pub fn inspect(self, f: impl FnOnce(&T)) -> Self {
    if let Self::Some(value) = &self {
      f(value);
    }
    self
  }

  #[inline]
  pub fn contains<U>(&self, value: &U) -> bool where T: PartialEq<U> {
    match self {
      Self::Some(contained) => contained == value,
      Self::None => false,
    }
  }

  /// Runs `producer`, returning `Some` with its result, or `None` if it raised a recoverable fault.
  ///
  /// Defects raised by `producer` propagate; see [`fault`](crate::fault).
  pub fn capture(producer: impl FnOnce() -> T) -> Self {
    fault::capture(producer).ok().into()
  }

  /// Awaits `future`, returning `Some` with its output, or `None` if it raised a recoverable fault.
  ///
  /// Defects raised while polling `future` propagate.
  pub async fn capture_async(future: impl Future<Output=T>) -> Self {
    fault::capture_async(future).await.ok().into()
  }

  /// Converts into an [`Outcome`], calling `err` only when `self` is `None`.
  #[inline]
  pub fn to_result<E>(self, err: impl FnOnce() -> E) -> Outcome<T, E> {
    match self {
      Self::Some(value) => Outcome::Ok(value),
      Self::None => Outcome::err(err()),
    }
  }

  /// Converts into an [`Either`] with the value on the right, calling `left` only when `self` is `None`.
  #[inline]
  pub fn to_either<L>(self, left: impl FnOnce() -> L) -> Either<L, T> {
    match self {
      Self::Some(value) => Either::Right(value),
      Self::None => Either::Left(left()),
    }
  }

  #[inline]
  pub fn into_option(self) -> Option<T> { self.into() }
}

impl<T> From<Option<T>> for Optional<T> {
  #[inline]
  fn from(option: Option<T>) -> Self {
    match option {
      Some(value) => Self::Some(value),
      None => Self::None,
    }
  }
}
impl<T> From<Optional<T>> for Option<T> {
  #[inline]
  fn from(optional: Optional<T>) -> Self {
    match optional {
      Optional::Some(value) => Some(value),
      Optional::None => None,
    }
  }
}
