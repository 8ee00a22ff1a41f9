use crate::error::IllegalState;
use crate::optional::Optional;
use crate::outcome::Outcome;

/// One of two alternatives: a [`Left`](Either::Left) or a [`Right`](Either::Right) value.
///
/// Neither side means success or failure. Combinators without a side in their name act on the right side, mirroring
/// [`Optional`] and [`Outcome`] which keep their value on the right after conversion.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Either<L, R> {
  Left(L),
  Right(R),
}

impl<L, R> Either<L, R> {
  #[inline]
  pub const fn is_left(&self) -> bool { matches!(self, Self::Left(_)) }
  #[inline]
  pub const fn is_right(&self) -> bool { matches!(self, Self::Right(_)) }

  #[inline]
  pub const fn left_or_none(&self) -> Option<&L> {
    match self {
      Self::Left(value) => Some(value),
      Self::Right(_) => None,
    }
  }
  #[inline]
  pub const fn right_or_none(&self) -> Option<&R> {
    match self {
      Self::Left(_) => None,
      Self::Right(value) => Some(value),
    }
  }

  #[inline]
  pub const fn as_ref(&self) -> Either<&L, &R> {
    match self {
      Self::Left(value) => Either::Left(value),
      Self::Right(value) => Either::Right(value),
    }
  }

  /// Returns the right value.
  ///
  /// # Panics
  ///
  /// Panics with an [`IllegalState`] message if `self` is `Left`.
  #[inline]
  #[track_caller]
  pub fn unwrap(self) -> R {
    match self {
      Self::Left(_) => panic!("{}", IllegalState::wrong_variant("Either", "unwrap", "Left")),
      Self::Right(value) => value,
    }
  }
  /// Returns the left value.
  ///
  /// # Panics
  ///
  /// Panics with an [`IllegalState`] message if `self` is `Right`.
  #[inline]
  #[track_caller]
  pub fn unwrap_left(self) -> L {
    match self {
      Self::Left(value) => value,
      Self::Right(_) => panic!("{}", IllegalState::wrong_variant("Either", "unwrap_left", "Right")),
    }
  }

  #[inline]
  pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Either<L, U> {
    match self {
      Self::Left(value) => Either::Left(value),
      Self::Right(value) => Either::Right(f(value)),
    }
  }
  #[inline]
  pub fn map_left<U>(self, f: impl FnOnce(L) -> U) -> Either<U, R> {
    match self {
      Self::Left(value) => Either::Left(f(value)),
      Self::Right(value) => Either::Right(value),
    }
  }

  #[inline]
  pub fn flat_map<U>(self, f: impl FnOnce(R) -> Either<L, U>) -> Either<L, U> {
    match self {
      Self::Left(value) => Either::Left(value),
      Self::Right(value) => f(value),
    }
  }
  #[inline]
  pub fn flat_map_left<U>(self, f: impl FnOnce(L) -> Either<U, R>) -> Either<U, R> {
    match self {
      Self::Left(value) => f(value),
      Self::Right(value) => Either::Right(value),
    }
  }

  /// Collapses into a single value; exactly one of `on_left` and `on_right` is called.
  #[inline]
  pub fn fold<U>(self, on_left: impl FnOnce(L) -> U, on_right: impl FnOnce(R) -> U) -> U {
    match self {
      Self::Left(value) => on_left(value),
      Self::Right(value) => on_right(value),
    }
  }

  /// Returns the right value, or computes one from the left value.
  #[inline]
  pub fn get_or_else(self, fallback: impl FnOnce(L) -> R) -> R {
    match self {
      Self::Left(value) => fallback(value),
      Self::Right(value) => value,
    }
  }
  /// Returns the left value, or computes one from the right value.
  #[inline]
  pub fn get_or_else_left(self, fallback: impl FnOnce(R) -> L) -> L {
    match self {
      Self::Left(value) => value,
      Self::Right(value) => fallback(value),
    }
  }

  /// Keeps `self` if it is `Right`, otherwise returns what `fallback` makes of the left value.
  #[inline]
  pub fn or_else<M>(self, fallback: impl FnOnce(L) -> Either<M, R>) -> Either<M, R> {
    match self {
      Self::Left(value) => fallback(value),
      Self::Right(value) => Either::Right(value),
    }
  }
  /// Keeps `self` if it is `Left`, otherwise returns what `fallback` makes of the right value.
  #[inline]
  pub fn or_else_left<S>(self, fallback: impl FnOnce(R) -> Either<L, S>) -> Either<L, S> {
    match self {
      Self::Left(value) => Either::Left(value),
      Self::Right(value) => fallback(value),
    }
  }

  #[inline]
  pub fn contains<U>(&self, value: &U) -> bool where R: PartialEq<U> {
    matches!(self, Self::Right(contained) if contained == value)
  }
  #[inline]
  pub fn contains_left<U>(&self, value: &U) -> bool where L: PartialEq<U> {
    matches!(self, Self::Left(contained) if contained == value)
  }

  #[inline]
  pub fn inspect(self, f: impl FnOnce(&R)) -> Self {
    if let Self::Right(value) = &self {
      f(value);
    }
    self
  }
  #[inline]
  pub fn inspect_left(self, f: impl FnOnce(&L)) -> Self {
    if let Self::Left(value) = &self {
      f(value);
    }
    self
  }

  #[inline]
  pub fn swap(self) -> Either<R, L> {
    match self {
      Self::Left(value) => Either::Right(value),
      Self::Right(value) => Either::Left(value),
    }
  }

  /// Converts into an [`Outcome`], mapping a left value into the error with `map_err`, which is only called for `Left`.
  #[inline]
  pub fn to_result<E>(self, map_err: impl FnOnce(L) -> E) -> Outcome<R, E> {
    match self {
      Self::Left(value) => Outcome::err(map_err(value)),
      Self::Right(value) => Outcome::Ok(value),
    }
  }
  /// Converts into an [`Outcome`] using the left value as the error.
  #[inline]
  pub fn into_outcome(self) -> Outcome<R, L> { self.to_result(|value| value) }

  #[inline]
  pub fn to_option(self) -> Optional<R> {
    match self {
      Self::Left(_) => Optional::None,
      Self::Right(value) => Optional::Some(value),
    }
  }
}
