//! Declarative path routing for the Press edge service.
//!
//! Routes are plain data: a [`Pattern`] is an ordered list of match steps
//! (literals, anchored regular expressions, alternatives, shared fragments,
//! an end-of-path assertion) that is interpreted against a cursor over the
//! request path. A [`Router`] tries registered routes in order and returns
//! the first route whose pattern runs to completion, together with the
//! payload its producer builds from the captured values.
//!
//! Matching involves no I/O and never fails with an error: "no route
//! matched" is an ordinary [`MatchOutcome::NotMatched`] value carrying one
//! diagnostic [`Attempt`] per tried route. The only fallible moment is
//! pattern construction, where a bad capture expression surfaces as a
//! [`RouteError`].

mod bindings;
mod cursor;
mod error;
mod pattern;
mod router;

pub use bindings::Bindings;
pub use cursor::Cursor;
pub use error::RouteError;
pub use pattern::{Pattern, PatternBuilder, Producer};
pub use router::{Attempt, MatchOutcome, Matched, Route, Router};
