//! Raising faults and capturing them as data.
//!
//! Faults are unwinding panics, split in two tiers:
//!
//! - **Defects** signal programming errors. These are values raised with [`raise_defect`] (whose type implements the
//!   [`Defect`] marker trait), and plain message panics such as `panic!("..")`, misused `unwrap` calls, or out of
//!   bounds indexing. A capture boundary never captures a defect; it keeps unwinding.
//! - **Recoverable faults** are everything else: errors raised with [`raise`] or [`raise_traced`], or any other value
//!   passed to [`std::panic::panic_any`]. A capture boundary turns them into a [`Fault`].
//!
//! Capturing requires `panic = "unwind"`; with `panic = "abort"` every fault aborts the process.

use std::any::{type_name, Any};
use std::error::Error;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;
use tracing::{debug, warn};

use crate::trace::Trace;

/// Marker for faults that signal a programming error.
///
/// A defect raised with [`raise_defect`] is never captured: [`capture`], [`capture_async`], and every capturing
/// constructor built on them re-raise it to their caller.
pub trait Defect: Error + Send + Sync + 'static {}

/// Raises `error` as a recoverable fault, capturing a [`Trace`] at the call site.
#[track_caller]
pub fn raise<E: Debug + Send + 'static>(error: E) -> ! {
  raise_traced(error, Some(Trace::capture()))
}

/// Raises `error` as a recoverable fault together with an existing `trace`.
///
/// Re-raising a captured [`Fault`] raises its original payload, so a later capture boundary sees the original error
/// type again.
#[track_caller]
pub fn raise_traced<E: Debug + Send + 'static>(error: E, trace: Option<Trace>) -> ! {
  let rendered = format!("{error:?}");
  let error: Box<dyn Any + Send> = Box::new(error);
  let raised = match error.downcast::<Fault>() {
    Ok(fault) => {
      let Fault { payload, type_name, rendered, trace: fault_trace } = *fault;
      Raised { payload, type_name, rendered, trace: fault_trace.or(trace) }
    }
    Err(payload) => Raised { payload, type_name: type_name::<E>(), rendered: Some(rendered), trace },
  };
  panic::panic_any(raised)
}

/// Raises `defect`. It propagates through every capture boundary.
#[track_caller]
pub fn raise_defect<D: Defect>(defect: D) -> ! {
  panic::panic_any(DefectPayload(Box::new(defect)))
}


/// Payload of a panic started by [`raise_defect`].
struct DefectPayload(Box<dyn Defect>);

/// Payload of a panic started by [`raise`] or [`raise_traced`].
struct Raised {
  payload: Box<dyn Any + Send>,
  type_name: &'static str,
  rendered: Option<String>,
  trace: Option<Trace>,
}

/// Gets the defect raised with [`raise_defect`] from a panic `payload`, if any.
pub fn defect_of(payload: &(dyn Any + Send)) -> Option<&dyn Defect> {
  payload.downcast_ref::<DefectPayload>().map(|DefectPayload(defect)| &**defect)
}

/// Gets the typed error raised with [`raise`] or [`raise_traced`] from a panic `payload`, if it has type `E`.
pub fn raised_of<E: Any>(payload: &(dyn Any + Send)) -> Option<&E> {
  payload.downcast_ref::<Raised>().and_then(|raised| raised.payload.downcast_ref())
}

/// Returns whether a panic `payload` is a defect.
pub fn is_defect(payload: &(dyn Any + Send)) -> bool {
  payload.is::<DefectPayload>() || payload.is::<&'static str>() || payload.is::<String>()
}

/// Returns whether a panic `payload` was raised with [`raise`] or [`raise_traced`].
pub fn is_raised(payload: &(dyn Any + Send)) -> bool {
  payload.is::<Raised>()
}

/// Renders a panic `payload` for diagnostics, covering message panics, defects, and raised faults.
pub fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
  if let Some(message) = payload.downcast_ref::<&'static str>() {
    Some(message.to_string())
  } else if let Some(message) = payload.downcast_ref::<String>() {
    Some(message.clone())
  } else if let Some(defect) = defect_of(payload) {
    Some(defect.to_string())
  } else {
    payload.downcast_ref::<Raised>().and_then(|raised| raised.rendered.clone())
  }
}


/// A recoverable fault captured at a capture boundary.
///
/// Wraps whatever value was raised, so that faults of any type can be treated as an error value.
pub struct Fault {
  payload: Box<dyn Any + Send>,
  type_name: &'static str,
  rendered: Option<String>,
  trace: Option<Trace>,
}

impl Fault {
  /// Name of the raised value's type, or `"<unknown>"` when it was not raised through [`raise`].
  #[inline]
  pub fn type_name(&self) -> &'static str { self.type_name }
  #[inline]
  pub fn trace(&self) -> Option<&Trace> { self.trace.as_ref() }
  /// Debug rendering of the raised value, when it was raised through [`raise`].
  #[inline]
  pub fn message(&self) -> Option<&str> { self.rendered.as_deref() }

  #[inline]
  pub fn is<E: Any>(&self) -> bool { self.payload.is::<E>() }
  #[inline]
  pub fn downcast_ref<E: Any>(&self) -> Option<&E> { self.payload.downcast_ref() }

  /// Takes the raised value out as `E` together with its trace, or gives back `self` when it is not an `E`.
  pub fn downcast<E: Any>(self) -> Result<(E, Option<Trace>), Self> {
    let Fault { payload, type_name, rendered, trace } = self;
    match payload.downcast::<E>() {
      Ok(error) => Ok((*error, trace)),
      Err(payload) => Err(Fault { payload, type_name, rendered, trace }),
    }
  }

  /// Raises this fault again, keeping its payload and trace.
  #[track_caller]
  pub fn resume(self) -> ! {
    let Fault { payload, type_name, rendered, trace } = self;
    panic::panic_any(Raised { payload, type_name, rendered, trace })
  }

  /// Copies this fault for raising it again. The raised value itself cannot be copied: the copy holds a [`Replayed`]
  /// value instead, and keeps the type name, message, and trace of this fault.
  pub fn replay(&self) -> Self {
    let payload: Box<dyn Any + Send> = match self.payload.downcast_ref::<Replayed>() {
      Some(replayed) => Box::new(*replayed),
      None => Box::new(Replayed { type_name: self.type_name }),
    };
    Self { payload, type_name: self.type_name, rendered: self.rendered.clone(), trace: self.trace.clone() }
  }

  pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
    match payload.downcast::<Raised>() {
      Ok(raised) => {
        let Raised { payload, type_name, rendered, trace } = *raised;
        Self { payload, type_name, rendered, trace }
      }
      Err(payload) => Self { payload, type_name: "<unknown>", rendered: None, trace: None },
    }
  }
}

/// Value held by a [`Fault::replay`] copy in place of the value that was originally raised.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Replayed {
  pub type_name: &'static str,
}

impl Display for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.rendered {
      Some(rendered) => write!(f, "raised {}: {}", self.type_name, rendered),
      None => write!(f, "raised a value of type {}", self.type_name),
    }
  }
}
impl Debug for Fault {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    f.debug_struct("Fault")
      .field("type_name", &self.type_name)
      .field("message", &self.rendered)
      .field("trace", &self.trace)
      .finish()
  }
}
impl Error for Fault {}


/// Runs `producer`, capturing a recoverable fault it raises. Defects are re-raised.
pub fn capture<T>(producer: impl FnOnce() -> T) -> Result<T, Fault> {
  panic::catch_unwind(AssertUnwindSafe(producer)).map_err(recover)
}

/// Awaits `future`, capturing a recoverable fault it raises while being polled. Defects are re-raised.
pub async fn capture_async<F: Future>(future: F) -> Result<F::Output, Fault> {
  AssertUnwindSafe(future).catch_unwind().await.map_err(recover)
}

fn recover(payload: Box<dyn Any + Send>) -> Fault {
  if is_defect(payload.as_ref()) {
    let defect = panic_message(payload.as_ref());
    warn!(defect = defect.as_deref(), "propagating defect through capture boundary");
    panic::resume_unwind(payload)
  }
  let fault = Fault::from_payload(payload);
  debug!(%fault, "captured fault");
  fault
}


#[cfg(test)]
mod tests {
  use thiserror::Error;

  use super::*;

  #[derive(Debug, PartialEq)]
  struct Timeout(u32);

  #[derive(Debug, Error)]
  #[error("invariant broken: {0}")]
  struct Broken(&'static str);
  impl Defect for Broken {}

  #[test]
  fn raised_error_is_captured_with_its_type() {
    let fault = capture(|| -> u8 { raise(Timeout(3)) }).unwrap_err();
    assert!(fault.is::<Timeout>());
    assert_eq!(fault.downcast_ref::<Timeout>(), Some(&Timeout(3)));
    assert!(fault.type_name().ends_with("Timeout"));
    assert_eq!(fault.message(), Some("Timeout(3)"));
    assert!(fault.trace().is_some());
    let (error, _trace) = fault.downcast::<Timeout>().unwrap();
    assert_eq!(error, Timeout(3));
  }

  #[test]
  fn downcast_to_wrong_type_gives_fault_back() {
    let fault = capture(|| -> u8 { raise(Timeout(1)) }).unwrap_err();
    let fault = fault.downcast::<String>().unwrap_err();
    assert!(fault.is::<Timeout>());
  }

  #[test]
  fn panic_any_value_is_recoverable_without_trace() {
    let fault = capture(|| -> u8 { panic::panic_any(42u64) }).unwrap_err();
    assert_eq!(fault.downcast_ref::<u64>(), Some(&42));
    assert_eq!(fault.type_name(), "<unknown>");
    assert!(fault.trace().is_none());
    assert_eq!(fault.to_string(), "raised a value of type <unknown>");
  }

  #[test]
  fn success_passes_through() {
    assert_eq!(capture(|| 7).unwrap(), 7);
  }

  #[test]
  fn defect_propagates() {
    let payload = panic::catch_unwind(|| capture(|| -> u8 { raise_defect(Broken("x")) })).unwrap_err();
    let defect = defect_of(payload.as_ref()).unwrap();
    assert_eq!(defect.to_string(), "invariant broken: x");
    assert!(is_defect(payload.as_ref()));
  }

  #[test]
  fn message_panic_propagates() {
    let payload = panic::catch_unwind(|| capture(|| -> u8 { panic!("bug at {}", 1) })).unwrap_err();
    assert_eq!(panic_message(payload.as_ref()).as_deref(), Some("bug at 1"));
  }

  #[test]
  fn resumed_fault_is_captured_again_unchanged() {
    let fault = capture(|| -> u8 { raise(Timeout(9)) }).unwrap_err();
    let fault = capture(move || -> u8 { fault.resume() }).unwrap_err();
    assert_eq!(fault.downcast_ref::<Timeout>(), Some(&Timeout(9)));
  }

  #[test]
  fn replay_keeps_everything_but_the_value() {
    let fault = capture(|| -> u8 { raise(Timeout(6)) }).unwrap_err();
    let replay = fault.replay();
    assert_eq!(replay.type_name(), fault.type_name());
    assert_eq!(replay.message(), Some("Timeout(6)"));
    assert!(replay.trace().is_some());
    assert_eq!(replay.downcast_ref::<Replayed>(), Some(&Replayed { type_name: fault.type_name() }));
    assert_eq!(replay.replay().downcast_ref::<Replayed>(), replay.downcast_ref::<Replayed>());
    assert_eq!(replay.to_string(), fault.to_string());
  }

  #[test]
  fn raising_a_fault_raises_its_payload() {
    let fault = capture(|| -> u8 { raise(Timeout(5)) }).unwrap_err();
    let fault = capture(move || -> u8 { raise(fault) }).unwrap_err();
    assert!(fault.is::<Timeout>());
    assert!(fault.type_name().ends_with("Timeout"));
  }

  #[test]
  fn raised_payload_can_be_inspected() {
    let payload = panic::catch_unwind(|| -> u8 { raise(Timeout(2)) }).unwrap_err();
    assert!(is_raised(payload.as_ref()));
    assert!(!is_defect(payload.as_ref()));
    assert_eq!(raised_of::<Timeout>(payload.as_ref()), Some(&Timeout(2)));
    assert_eq!(panic_message(payload.as_ref()).as_deref(), Some("Timeout(2)"));
  }

  #[test]
  fn capture_async_captures_faults_raised_while_polling() {
    let fault = futures::executor::block_on(capture_async(async { raise::<Timeout>(Timeout(4)) })).unwrap_err();
    assert!(fault.is::<Timeout>());
    let value = futures::executor::block_on(capture_async(async { 11 })).unwrap();
    assert_eq!(value, 11);
  }
}
