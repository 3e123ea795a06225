//! Values captured while matching a path.

/// Captured name/value pairs, in binding order.
///
/// Lookups scan from the most recent binding backwards, so when a nested
/// fragment binds a name the enclosing pattern already used, the inner
/// value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: Vec<(String, String)>,
}

impl Bindings {
    /// Returns the most recently bound value for `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value.as_str())
    }

    /// Number of bindings, including shadowed ones.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all bindings in the order they were captured.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub(crate) fn insert(&mut self, name: &str, value: &str) {
        self.values.push((name.to_owned(), value.to_owned()));
    }

    /// Marks the current length so a failed alternative can roll back.
    pub(crate) fn mark(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn rollback(&mut self, mark: usize) {
        self.values.truncate(mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_binding_wins() {
        let mut bindings = Bindings::default();
        bindings.insert("name", "outer");
        bindings.insert("name", "inner");
        assert_eq!(bindings.get("name"), Some("inner"));
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_rollback_discards_later_bindings() {
        let mut bindings = Bindings::default();
        bindings.insert("a", "1");
        let mark = bindings.mark();
        bindings.insert("b", "2");
        bindings.rollback(mark);
        assert_eq!(bindings.get("a"), Some("1"));
        assert_eq!(bindings.get("b"), None);
    }
}
