use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe Trie keyed by `/`-separated path patterns.
///
/// Wildcards:
/// - `+` matches exactly one level (`posts/+/like`)
/// - `#` matches any number of remaining levels, including zero (`chat/#`)
///
/// Used both for request routing and for state subscriptions.
pub struct Trie<T> {
    root: RwLock<TrieNode<T>>,
}

struct TrieNode<T> {
    children: HashMap<String, TrieNode<T>>,
    single: Option<Box<TrieNode<T>>>,
    multi: Option<Box<TrieNode<T>>>,
    values: Vec<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            single: None,
            multi: None,
            values: Vec::new(),
        }
    }
}

impl<T: Clone> Trie<T> {
    pub fn new() -> Self {
        Self {
            root: RwLock::new(TrieNode::default()),
        }
    }

    /// Insert a value under a pattern such as `"feed/state"` or `"posts/+/like"`.
    pub fn insert(&self, pattern: &str, value: T) {
        let mut root = self.root.write().unwrap();
        root.insert(pattern, value);
    }

    /// Collect every value whose pattern matches the concrete `path`.
    pub fn match_path(&self, path: &str) -> Vec<T> {
        let root = self.root.read().unwrap();
        let mut results = Vec::new();
        root.collect_matches(path, &mut results);
        results
    }

    /// Remove values stored under exactly `pattern` that satisfy `predicate`.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove<F>(&self, pattern: &str, predicate: F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        let mut root = self.root.write().unwrap();
        root.remove(pattern, &predicate)
    }
}

impl<T: Clone> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> TrieNode<T> {
    fn insert(&mut self, pattern: &str, value: T) {
        if pattern.is_empty() {
            self.values.push(value);
            return;
        }

        let (first, rest) = split_first(pattern);
        match first {
            "+" => self
                .single
                .get_or_insert_with(Default::default)
                .insert(rest, value),
            // `#` is terminal; anything after it is ignored.
            "#" => self
                .multi
                .get_or_insert_with(Default::default)
                .values
                .push(value),
            segment => self
                .children
                .entry(segment.to_string())
                .or_default()
                .insert(rest, value),
        }
    }

    fn collect_matches(&self, path: &str, results: &mut Vec<T>) {
        if let Some(multi) = &self.multi {
            results.extend(multi.values.iter().cloned());
        }

        if path.is_empty() {
            results.extend(self.values.iter().cloned());
            return;
        }

        let (first, rest) = split_first(path);
        if let Some(child) = self.children.get(first) {
            child.collect_matches(rest, results);
        }
        if let Some(single) = &self.single {
            single.collect_matches(rest, results);
        }
    }

    fn remove<F>(&mut self, pattern: &str, predicate: &F) -> bool
    where
        F: Fn(&T) -> bool,
    {
        fn retain<T, F: Fn(&T) -> bool>(values: &mut Vec<T>, predicate: &F) -> bool {
            let before = values.len();
            values.retain(|v| !predicate(v));
            values.len() < before
        }

        if pattern.is_empty() {
            return retain(&mut self.values, predicate);
        }

        let (first, rest) = split_first(pattern);
        match first {
            "+" => self
                .single
                .as_mut()
                .is_some_and(|child| child.remove(rest, predicate)),
            "#" => self
                .multi
                .as_mut()
                .is_some_and(|child| retain(&mut child.values, predicate)),
            segment => self
                .children
                .get_mut(segment)
                .is_some_and(|child| child.remove(rest, predicate)),
        }
    }
}

/// `"posts/12/like"` -> `("posts", "12/like")`, `"feed"` -> `("feed", "")`.
fn split_first(path: &str) -> (&str, &str) {
    match path.split_once('/') {
        Some((first, rest)) => (first, rest),
        None => (path, ""),
    }
}
