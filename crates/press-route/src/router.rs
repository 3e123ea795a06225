//! The route table and dispatch.

use serde::Serialize;

use crate::bindings::Bindings;
use crate::cursor::Cursor;
use crate::error::RouteError;
use crate::pattern::Pattern;

/// One registered route: a named pattern with a terminal producer.
#[derive(Debug)]
pub struct Route<T> {
    name: &'static str,
    pattern: Pattern<T>,
}

impl<T> Route<T> {
    /// Registers `pattern` under `name`. The pattern must carry a producer,
    /// otherwise a successful match would have no payload to hand back.
    pub fn new(name: &'static str, pattern: Pattern<T>) -> Result<Self, RouteError> {
        if !pattern.has_producer() {
            return Err(RouteError::MissingProducer(name));
        }
        Ok(Self { name, pattern })
    }

    /// The route's registered name.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// A successful dispatch.
#[derive(Debug)]
pub struct Matched<T> {
    /// Name of the route that won.
    pub route: &'static str,
    /// The payload its producer built.
    pub value: T,
    /// Everything captured along the way.
    pub bindings: Bindings,
}

/// One tried-and-failed route, for 404 diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    /// Name of the route that was tried.
    pub route: &'static str,
    /// Furthest byte offset the route matched up to.
    pub offset: usize,
    /// What the failing step was looking for.
    pub expected: String,
}

/// Result of [`Router::dispatch`]: exactly one of the two shapes.
#[derive(Debug)]
pub enum MatchOutcome<T> {
    /// A route ran to completion.
    Matched(Matched<T>),
    /// Every route failed; one attempt per registered route.
    NotMatched { attempts: Vec<Attempt> },
}

impl<T> MatchOutcome<T> {
    /// True when a route matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }

    /// The successful match, if any.
    pub fn into_matched(self) -> Option<Matched<T>> {
        match self {
            MatchOutcome::Matched(matched) => Some(matched),
            MatchOutcome::NotMatched { .. } => None,
        }
    }
}

/// An ordered route table.
///
/// Registration order is the sole priority rule: the first route whose
/// pattern runs to completion wins, and no later route is attempted.
/// Dispatch is a pure function of the table and the path; the table is
/// built once at startup and shared read-only.
#[derive(Debug, Default)]
pub struct Router<T> {
    routes: Vec<Route<T>>,
}

impl<T> Router<T> {
    /// Creates a router over `routes`, tried in the given order.
    pub fn new(routes: Vec<Route<T>>) -> Self {
        Self { routes }
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Names of the registered routes, in priority order.
    pub fn route_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.routes.iter().map(Route::name)
    }

    /// Matches `path` against the registered routes in order.
    ///
    /// Each route gets a fresh cursor at offset 0. "Nothing matched" is a
    /// normal outcome, never an error.
    pub fn dispatch(&self, path: &str) -> MatchOutcome<T> {
        let mut attempts = Vec::with_capacity(self.routes.len());

        for route in &self.routes {
            let mut cursor = Cursor::new(path);
            let mut bindings = Bindings::default();
            match route.pattern.eval(&mut cursor, &mut bindings) {
                Ok(Some(value)) => {
                    return MatchOutcome::Matched(Matched {
                        route: route.name,
                        value,
                        bindings,
                    });
                }
                // Route::new guarantees a producer, so a completed pattern
                // always yields a payload; kept total for safety.
                Ok(None) => attempts.push(Attempt {
                    route: route.name,
                    offset: cursor.offset(),
                    expected: "terminal production".to_owned(),
                }),
                Err(failure) => attempts.push(Attempt {
                    route: route.name,
                    offset: failure.offset,
                    expected: failure.expected,
                }),
            }
        }

        MatchOutcome::NotMatched { attempts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(name: &'static str, prefix: &str) -> Route<&'static str> {
        Route::new(
            name,
            Pattern::build()
                .lit(prefix)
                .end()
                .produce(move |_, _| "")
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_first_matching_route_wins() {
        let router = Router::new(vec![route("a", "/x"), route("b", "/x")]);
        match router.dispatch("/x") {
            MatchOutcome::Matched(matched) => assert_eq!(matched.route, "a"),
            MatchOutcome::NotMatched { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn test_swapping_overlapping_routes_changes_priority() {
        let router = Router::new(vec![route("b", "/x"), route("a", "/x")]);
        match router.dispatch("/x") {
            MatchOutcome::Matched(matched) => assert_eq!(matched.route, "b"),
            MatchOutcome::NotMatched { .. } => panic!("expected a match"),
        }
    }

    #[test]
    fn test_no_match_records_attempt_per_route() {
        let router = Router::new(vec![route("a", "/a"), route("b", "/b")]);
        match router.dispatch("/unknown/path") {
            MatchOutcome::NotMatched { attempts } => {
                assert_eq!(attempts.len(), 2);
                assert_eq!(attempts[0].route, "a");
                assert_eq!(attempts[1].route, "b");
            }
            MatchOutcome::Matched(matched) => panic!("unexpected match: {}", matched.route),
        }
    }

    #[test]
    fn test_route_requires_producer() {
        let fragment: Pattern<()> = Pattern::build().lit("/x").finish().unwrap();
        assert!(matches!(
            Route::new("incomplete", fragment),
            Err(RouteError::MissingProducer("incomplete"))
        ));
    }
}
