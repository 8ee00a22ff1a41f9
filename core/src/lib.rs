//! Containers for values that may be absent, operations that may fail, values that are one of two alternatives, and
//! values computed on first access.
//!
//! - [`Optional`]: a present or absent value.
//! - [`Outcome`]: success, or a typed failure with an optional [`Trace`].
//! - [`Either`]: a left or a right value.
//! - [`Lazy`]: a memoized value computed by a producer.
//!
//! Raised faults follow the two tiers described in [`fault`]: recoverable faults are captured as data by the capturing
//! constructors ([`Optional::capture`], [`Outcome::capture`], ...), while defects always propagate.

pub mod app;
pub mod either;
pub mod error;
pub mod fault;
pub mod lazy;
pub mod optional;
pub mod outcome;
pub mod trace;

pub use either::Either;
pub use error::{IllegalState, TypeMismatch};
pub use fault::{Defect, Fault};
pub use lazy::Lazy;
pub use optional::Optional;
pub use outcome::Outcome;
pub use trace::Trace;
