//! Route patterns: match steps and the interpreter that runs them.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::bindings::Bindings;
use crate::cursor::Cursor;
use crate::error::RouteError;

/// Builds the route payload once every step has matched.
///
/// The second argument carries the payload produced by a delegated
/// sub-pattern, when the pattern contains one that terminated with its own
/// producer.
pub type Producer<T> = Arc<dyn Fn(&Bindings, Option<T>) -> T + Send + Sync>;

/// Where and why a pattern stopped matching. Internal to dispatch; surfaced
/// to callers as [`crate::Attempt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Failure {
    pub offset: usize,
    pub expected: String,
}

enum Step<T> {
    Literal {
        value: String,
        case_insensitive: bool,
    },
    Capture {
        regex: Regex,
        source: String,
        binds: Vec<(usize, String)>,
    },
    OneOf(Vec<Pattern<T>>),
    Fragment(Arc<Pattern<T>>),
    End,
}

impl<T> fmt::Debug for Step<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Literal {
                value,
                case_insensitive,
            } => f
                .debug_struct("Literal")
                .field("value", value)
                .field("case_insensitive", case_insensitive)
                .finish(),
            Step::Capture { source, binds, .. } => f
                .debug_struct("Capture")
                .field("source", source)
                .field("binds", binds)
                .finish(),
            Step::OneOf(alternatives) => f.debug_tuple("OneOf").field(alternatives).finish(),
            Step::Fragment(fragment) => f.debug_tuple("Fragment").field(fragment).finish(),
            Step::End => write!(f, "End"),
        }
    }
}

/// An ordered program of match steps, optionally ending in a producer.
///
/// Patterns are built once at startup and hold no per-dispatch state; each
/// evaluation runs over its own cursor and bindings.
pub struct Pattern<T> {
    steps: Vec<Step<T>>,
    producer: Option<Producer<T>>,
}

impl<T> fmt::Debug for Pattern<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pattern")
            .field("steps", &self.steps)
            .field("produces", &self.producer.is_some())
            .finish()
    }
}

impl<T> Pattern<T> {
    /// Starts building a pattern.
    pub fn build() -> PatternBuilder<T> {
        PatternBuilder {
            steps: Ok(Vec::new()),
        }
    }

    pub(crate) fn has_producer(&self) -> bool {
        self.producer.is_some()
    }

    /// Runs the steps against `cursor`, committing captures into
    /// `bindings`. Returns the produced payload (from this pattern's
    /// producer, or the last delegated sub-pattern that produced one), or
    /// the most specific failure.
    pub(crate) fn eval(
        &self,
        cursor: &mut Cursor<'_>,
        bindings: &mut Bindings,
    ) -> Result<Option<T>, Failure> {
        let mut produced: Option<T> = None;

        for step in &self.steps {
            match step {
                Step::Literal {
                    value,
                    case_insensitive,
                } => {
                    let rest = cursor.rest();
                    let matched = if *case_insensitive {
                        rest.len() >= value.len()
                            && rest.is_char_boundary(value.len())
                            && rest[..value.len()].eq_ignore_ascii_case(value)
                    } else {
                        rest.starts_with(value.as_str())
                    };
                    if !matched {
                        return Err(Failure {
                            offset: cursor.offset(),
                            expected: format!("literal {value:?}"),
                        });
                    }
                    cursor.advance(value.len());
                }
                Step::Capture {
                    regex,
                    source,
                    binds,
                } => match regex.captures(cursor.rest()) {
                    Some(caps) => {
                        for (index, name) in binds {
                            if let Some(group) = caps.get(*index) {
                                bindings.insert(name, group.as_str());
                            }
                        }
                        let len = caps.get(0).map_or(0, |whole| whole.end());
                        cursor.advance(len);
                    }
                    None => {
                        return Err(Failure {
                            offset: cursor.offset(),
                            expected: format!("pattern /{source}/"),
                        })
                    }
                },
                Step::OneOf(alternatives) => {
                    let start = cursor.offset();
                    let mark = bindings.mark();
                    let mut deepest: Option<Failure> = None;
                    let mut matched = false;

                    for alternative in alternatives {
                        cursor.reset_to(start);
                        bindings.rollback(mark);
                        match alternative.eval(cursor, bindings) {
                            Ok(inner) => {
                                if inner.is_some() {
                                    produced = inner;
                                }
                                matched = true;
                                break;
                            }
                            Err(failure) => {
                                let further =
                                    deepest.as_ref().map_or(true, |d| failure.offset > d.offset);
                                if further {
                                    deepest = Some(failure);
                                }
                            }
                        }
                    }

                    if !matched {
                        cursor.reset_to(start);
                        bindings.rollback(mark);
                        return Err(deepest.unwrap_or(Failure {
                            offset: start,
                            expected: "at least one alternative".to_owned(),
                        }));
                    }
                }
                Step::Fragment(fragment) => {
                    let inner = fragment.eval(cursor, bindings)?;
                    if inner.is_some() {
                        produced = inner;
                    }
                }
                Step::End => {
                    if !cursor.at_end() {
                        return Err(Failure {
                            offset: cursor.offset(),
                            expected: "end of path".to_owned(),
                        });
                    }
                }
            }
        }

        if let Some(producer) = &self.producer {
            produced = Some(producer(bindings, produced));
        }

        Ok(produced)
    }
}

/// Chained construction of a [`Pattern`].
///
/// A bad capture expression poisons the builder; the error surfaces when
/// the pattern is finished, so route tables can be assembled with one `?`
/// per route.
pub struct PatternBuilder<T> {
    steps: Result<Vec<Step<T>>, RouteError>,
}

impl<T> PatternBuilder<T> {
    fn push(mut self, step: Step<T>) -> Self {
        if let Ok(steps) = &mut self.steps {
            steps.push(step);
        }
        self
    }

    /// Matches `value` exactly at the cursor.
    pub fn lit(self, value: &str) -> Self {
        self.push(Step::Literal {
            value: value.to_owned(),
            case_insensitive: false,
        })
    }

    /// Matches `value` at the cursor, ignoring ASCII case.
    pub fn lit_ci(self, value: &str) -> Self {
        self.push(Step::Literal {
            value: value.to_owned(),
            case_insensitive: true,
        })
    }

    /// Matches `pattern` anchored at the cursor and binds the whole match
    /// to `name`.
    pub fn capture(self, name: &str, pattern: &str) -> Self {
        self.capture_groups(pattern, &[(0, name)])
    }

    /// Matches `pattern` anchored at the cursor and binds the listed
    /// capture groups by index (0 is the whole match).
    pub fn capture_groups(mut self, pattern: &str, binds: &[(usize, &str)]) -> Self {
        if self.steps.is_err() {
            return self;
        }
        match compile_anchored(pattern) {
            Ok(regex) => self.push(Step::Capture {
                regex,
                source: pattern.to_owned(),
                binds: binds
                    .iter()
                    .map(|(index, name)| (*index, (*name).to_owned()))
                    .collect(),
            }),
            Err(error) => {
                self.steps = Err(error);
                self
            }
        }
    }

    /// Matches `pattern` anchored at the cursor without binding anything.
    pub fn expect(self, pattern: &str) -> Self {
        self.capture_groups(pattern, &[])
    }

    /// Tries each alternative in order from the current cursor position;
    /// the first one that fully succeeds wins.
    pub fn one_of(self, alternatives: Vec<Pattern<T>>) -> Self {
        self.push(Step::OneOf(alternatives))
    }

    /// Delegates to a shared sub-pattern. Its captures merge into this
    /// pattern's scope (inner shadows outer) and its produced payload, if
    /// any, is handed to this pattern's producer.
    pub fn fragment(self, fragment: &Arc<Pattern<T>>) -> Self {
        self.push(Step::Fragment(Arc::clone(fragment)))
    }

    /// Asserts the whole path has been consumed.
    pub fn end(self) -> Self {
        self.push(Step::End)
    }

    /// Finishes the pattern without a producer, for use as a fragment or
    /// alternative.
    pub fn finish(self) -> Result<Pattern<T>, RouteError> {
        Ok(Pattern {
            steps: self.steps?,
            producer: None,
        })
    }

    /// Finishes the pattern with its terminal producer.
    pub fn produce<F>(self, producer: F) -> Result<Pattern<T>, RouteError>
    where
        F: Fn(&Bindings, Option<T>) -> T + Send + Sync + 'static,
    {
        Ok(Pattern {
            steps: self.steps?,
            producer: Some(Arc::new(producer)),
        })
    }
}

fn compile_anchored(pattern: &str) -> Result<Regex, RouteError> {
    Regex::new(&format!("^(?:{pattern})")).map_err(|source| RouteError::InvalidPattern {
        pattern: pattern.to_owned(),
        source: Box::new(source),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(pattern: &Pattern<&'static str>, path: &str) -> Result<Option<&'static str>, Failure> {
        let mut cursor = Cursor::new(path);
        let mut bindings = Bindings::default();
        pattern.eval(&mut cursor, &mut bindings)
    }

    #[test]
    fn test_literal_match_advances() {
        let pattern = Pattern::build()
            .lit("/health")
            .end()
            .produce(|_, _| "health")
            .unwrap();
        assert_eq!(run(&pattern, "/health").unwrap(), Some("health"));
    }

    #[test]
    fn test_literal_mismatch_reports_offset() {
        let pattern = Pattern::build()
            .lit("/a/")
            .lit("b")
            .produce(|_, _| "ab")
            .unwrap();
        let failure = run(&pattern, "/a/c").unwrap_err();
        assert_eq!(failure.offset, 3);
        assert!(failure.expected.contains("\"b\""));
    }

    #[test]
    fn test_literal_case_insensitive() {
        let pattern = Pattern::build()
            .lit_ci("/HEAD")
            .end()
            .produce(|_, _| "head")
            .unwrap();
        assert_eq!(run(&pattern, "/head").unwrap(), Some("head"));
        assert_eq!(run(&pattern, "/HeAd").unwrap(), Some("head"));
    }

    #[test]
    fn test_capture_binds_whole_match() {
        let pattern = Pattern::build()
            .lit("/users/")
            .capture("name", r"(?i)[-_a-z\d]+")
            .end()
            .produce(|_, _| "user")
            .unwrap();

        let mut cursor = Cursor::new("/users/Alice_1");
        let mut bindings = Bindings::default();
        pattern.eval(&mut cursor, &mut bindings).unwrap();
        assert_eq!(bindings.get("name"), Some("Alice_1"));
        assert!(cursor.at_end());
    }

    #[test]
    fn test_capture_group_binding() {
        let pattern = Pattern::build()
            .capture_groups(r"/(\d{4})", &[(1, "year")])
            .end()
            .produce(|_, _| "year")
            .unwrap();

        let mut cursor = Cursor::new("/2020");
        let mut bindings = Bindings::default();
        pattern.eval(&mut cursor, &mut bindings).unwrap();
        assert_eq!(bindings.get("year"), Some("2020"));
    }

    #[test]
    fn test_regex_is_anchored_at_cursor() {
        let pattern = Pattern::build()
            .capture("word", r"[a-z]+")
            .produce(|_, _| "word")
            .unwrap();
        // "123abc" contains a word, but not at the cursor.
        assert!(run(&pattern, "123abc").is_err());
    }

    #[test]
    fn test_invalid_regex_surfaces_at_build_time() {
        let result: Result<Pattern<()>, _> = Pattern::build()
            .capture("broken", r"[unclosed")
            .produce(|_, _| ());
        assert!(matches!(result, Err(RouteError::InvalidPattern { .. })));
    }

    #[test]
    fn test_end_rejects_unconsumed_suffix() {
        let pattern = Pattern::build()
            .lit("/docs")
            .end()
            .produce(|_, _| "docs")
            .unwrap();
        let failure = run(&pattern, "/docs/extra").unwrap_err();
        assert_eq!(failure.offset, 5);
        assert_eq!(failure.expected, "end of path");
    }

    #[test]
    fn test_alternatives_first_success_wins() {
        let pattern = Pattern::build()
            .lit("/docs/")
            .one_of(vec![
                Pattern::build().lit("api").finish().unwrap(),
                Pattern::build().lit("guide").finish().unwrap(),
            ])
            .end()
            .produce(|_, _| "doc")
            .unwrap();
        assert_eq!(run(&pattern, "/docs/api").unwrap(), Some("doc"));
        assert_eq!(run(&pattern, "/docs/guide").unwrap(), Some("doc"));
        assert!(run(&pattern, "/docs/other").is_err());
    }

    #[test]
    fn test_alternatives_reset_cursor_between_attempts() {
        // First alternative consumes "ab" then fails; second must start
        // back at the same offset.
        let pattern = Pattern::build()
            .one_of(vec![
                Pattern::build().lit("ab").lit("X").finish().unwrap(),
                Pattern::build().lit("abc").finish().unwrap(),
            ])
            .end()
            .produce(|_, _| "abc")
            .unwrap();
        assert_eq!(run(&pattern, "abc").unwrap(), Some("abc"));
    }

    #[test]
    fn test_alternatives_propagate_deepest_failure() {
        let pattern = Pattern::build()
            .one_of(vec![
                Pattern::build().lit("xyz").finish().unwrap(),
                Pattern::build().lit("ab").lit("cd").finish().unwrap(),
            ])
            .produce(|_, _| "")
            .unwrap();
        let failure = run(&pattern, "abQQ").unwrap_err();
        // The second alternative got further (offset 2) than the first
        // (offset 0); its failure is the one reported.
        assert_eq!(failure.offset, 2);
        assert!(failure.expected.contains("\"cd\""));
    }

    #[test]
    fn test_alternatives_roll_back_bindings() {
        let pattern = Pattern::build()
            .one_of(vec![
                Pattern::build()
                    .capture("first", r"[a-z]+")
                    .lit("!")
                    .finish()
                    .unwrap(),
                Pattern::build().capture("second", r"[a-z]+").finish().unwrap(),
            ])
            .end()
            .produce(|_, _| "")
            .unwrap();

        let mut cursor = Cursor::new("abc");
        let mut bindings = Bindings::default();
        pattern.eval(&mut cursor, &mut bindings).unwrap();
        assert_eq!(bindings.get("first"), None);
        assert_eq!(bindings.get("second"), Some("abc"));
    }

    #[test]
    fn test_fragment_merges_bindings() {
        let owner_repo = Arc::new(
            Pattern::<&'static str>::build()
                .capture("owner", r"(?i)[-_a-z\d]+")
                .lit("/")
                .capture("repo", r"(?i)[-_.a-z\d]+")
                .finish()
                .unwrap(),
        );
        let pattern = Pattern::build()
            .lit("/github/")
            .fragment(&owner_repo)
            .end()
            .produce(|_, _| "repo")
            .unwrap();

        let mut cursor = Cursor::new("/github/acme/widgets");
        let mut bindings = Bindings::default();
        pattern.eval(&mut cursor, &mut bindings).unwrap();
        assert_eq!(bindings.get("owner"), Some("acme"));
        assert_eq!(bindings.get("repo"), Some("widgets"));
    }

    #[test]
    fn test_fragment_produced_value_reaches_outer_producer() {
        let source = Arc::new(
            Pattern::build()
                .lit("file/")
                .capture("path", r".+")
                .produce(|bindings, _| format!("file:{}", bindings.get("path").unwrap_or("")))
                .unwrap(),
        );
        let pattern = Pattern::build()
            .lit("/view/")
            .fragment(&source)
            .produce(|_, inner| inner.unwrap_or_else(|| "missing".to_owned()))
            .unwrap();

        let mut cursor = Cursor::new("/view/file/a.md");
        let mut bindings = Bindings::default();
        let produced = pattern.eval(&mut cursor, &mut bindings).unwrap();
        assert_eq!(produced.as_deref(), Some("file:a.md"));
    }

    #[test]
    fn test_overlapping_capture_names_inner_shadows_outer() {
        let inner = Arc::new(
            Pattern::<&'static str>::build()
                .capture("name", r"[a-z]+")
                .finish()
                .unwrap(),
        );
        let pattern = Pattern::build()
            .capture("name", r"\d+")
            .lit("/")
            .fragment(&inner)
            .end()
            .produce(|_, _| "")
            .unwrap();

        let mut cursor = Cursor::new("42/abc");
        let mut bindings = Bindings::default();
        pattern.eval(&mut cursor, &mut bindings).unwrap();
        assert_eq!(bindings.get("name"), Some("abc"));
    }
}
