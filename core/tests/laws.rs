use proptest::prelude::*;

use oneof_core::{Either, Optional, Outcome};

mod common;

fn optional() -> impl Strategy<Value=Optional<i32>> {
  proptest::option::of(any::<i32>()).prop_map(Optional::from)
}

fn outcome() -> impl Strategy<Value=Outcome<i32, String>> {
  prop_oneof![
    any::<i32>().prop_map(Outcome::ok),
    "[a-z]{1,8}".prop_map(Outcome::err),
  ]
}

fn either() -> impl Strategy<Value=Either<String, i32>> {
  prop_oneof![
    "[a-z]{1,8}".prop_map(Either::Left),
    any::<i32>().prop_map(Either::Right),
  ]
}

fn f(v: i32) -> i64 { i64::from(v) * 3 }
fn g(v: i64) -> String { format!("<{v}>") }

fn half(v: i32) -> Optional<i32> { if v % 2 == 0 { Optional::some(v / 2) } else { Optional::None } }
fn positive(v: i32) -> Optional<i32> { if v > 0 { Optional::some(v) } else { Optional::None } }

fn checked_half(v: i32) -> Outcome<i32, String> {
  if v % 2 == 0 { Outcome::ok(v / 2) } else { Outcome::err(format!("{v} is odd")) }
}
fn checked_positive(v: i32) -> Outcome<i32, String> {
  if v > 0 { Outcome::ok(v) } else { Outcome::err(format!("{v} is not positive")) }
}

fn either_half(v: i32) -> Either<String, i32> { checked_half(v).to_either() }
fn either_positive(v: i32) -> Either<String, i32> { checked_positive(v).to_either() }

proptest! {
  #[test]
  fn exactly_one_variant_holds(o in optional(), r in outcome(), e in either()) {
    common::init();
    prop_assert!(o.is_some() != o.is_none());
    prop_assert!(r.is_ok() != r.is_err());
    prop_assert!(e.is_left() != e.is_right());
    let o = o.map(f).filter(|v| v % 2 == 0);
    let r = r.map(f).map_err(|e| e.len());
    let e = e.map(f).swap();
    prop_assert!(o.is_some() != o.is_none());
    prop_assert!(r.is_ok() != r.is_err());
    prop_assert!(e.is_left() != e.is_right());
  }

  #[test]
  fn map_identity(o in optional(), r in outcome(), e in either()) {
    prop_assert_eq!(o.map(|v| v), o);
    prop_assert_eq!(r.clone().map(|v| v), r);
    prop_assert_eq!(e.clone().map(|v| v), e);
  }

  #[test]
  fn map_composition(o in optional(), r in outcome(), e in either()) {
    prop_assert_eq!(o.map(f).map(g), o.map(|v| g(f(v))));
    prop_assert_eq!(r.clone().map(f).map(g), r.map(|v| g(f(v))));
    prop_assert_eq!(e.clone().map(f).map(g), e.map(|v| g(f(v))));
  }

  #[test]
  fn flat_map_associativity(o in optional(), r in outcome(), e in either()) {
    prop_assert_eq!(o.flat_map(half).flat_map(positive), o.flat_map(|v| half(v).flat_map(positive)));
    prop_assert_eq!(
      r.clone().flat_map(checked_half).flat_map(checked_positive),
      r.flat_map(|v| checked_half(v).flat_map(checked_positive))
    );
    prop_assert_eq!(
      e.clone().flat_map(either_half).flat_map(either_positive),
      e.flat_map(|v| either_half(v).flat_map(either_positive))
    );
  }

  #[test]
  fn fold_calls_exactly_one_branch(o in optional(), r in outcome(), e in either()) {
    let calls = std::cell::Cell::new(0);
    let count = || calls.set(calls.get() + 1);
    o.fold(|_| count(), || count());
    r.fold(|_| count(), |_, _| count());
    e.fold(|_| count(), |_| count());
    prop_assert_eq!(calls.get(), 3);
  }

  #[test]
  fn round_trip_conversions(v in any::<i32>()) {
    prop_assert_eq!(Optional::some(v).to_result(|| "none").to_option(), Optional::some(v));
    prop_assert_eq!(Either::<&str, i32>::Right(v).to_result(|l| l.len()).to_either(), Either::Right(v));
    prop_assert_eq!(Outcome::<i32, &str>::ok(v).to_option().to_result(|| "none"), Outcome::ok(v));
  }

  #[test]
  fn swap_is_an_involution(e in either()) {
    prop_assert_eq!(e.clone().swap().swap(), e);
  }
}
