//! Prefix tree over word forms.
//!
//! Every inserted word ends at a terminal node whose value is the word itself,
//! so the string a node represents can be recovered without walking back up
//! the tree. The root carries the empty string.
//!
//! ```text
//!   ""            (root, terminal)
//!    └ w─a─l─k    "walk"     (terminal)
//!              ├ e─d          "walked"   (terminal)
//!              └ i─n─g        "walking"  (terminal)
//! ```
//!
//! [`TrieNode::expand_suffixes`] walks down from a terminal node and stops at
//! the nearest terminal descendants; the character path between the two is a
//! suffix candidate ("ed", "ing").

use std::collections::{BTreeMap, VecDeque};

/// A node in the word trie.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// Words ending here, in insertion order.
    values: VecDeque<String>,
}

/// A father/son pair found by [`TrieNode::expand_suffixes`].
#[derive(Debug, Clone)]
pub struct SuffixExpansion<'a> {
    /// Node the expansion started from.
    pub father: &'a TrieNode,
    /// Nearest terminal descendant.
    pub son: &'a TrieNode,
    /// Characters on the path from `father` to `son`.
    pub difference: String,
}

impl TrieNode {
    fn insert(&mut self, key: &str, value: String) {
        let mut node = self;
        for c in key.chars() {
            node = node.children.entry(c).or_default();
        }
        node.values.push_back(value);
    }

    /// Whether at least one word ends at this node.
    pub fn is_terminal(&self) -> bool {
        !self.values.is_empty()
    }

    /// The first word stored at this node.
    pub fn value(&self) -> Option<&str> {
        self.values.front().map(String::as_str)
    }

    /// All words stored at this node, in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Child reached through `c`.
    pub fn child(&self, c: char) -> Option<&TrieNode> {
        self.children.get(&c)
    }

    /// Outgoing edges, ordered by character.
    pub fn children(&self) -> impl Iterator<Item = (char, &TrieNode)> {
        self.children.iter().map(|(&c, node)| (c, node))
    }

    /// Node reached by following `path` from this node.
    pub fn find(&self, path: &str) -> Option<&TrieNode> {
        path.chars().try_fold(self, |node, c| node.child(c))
    }

    /// Nearest terminal descendants of this node.
    ///
    /// The search does not continue below a terminal descendant, so for
    /// `walk`, `walked`, `walkeds` expanding `walk` yields only `walked`.
    pub fn expand_suffixes(&self) -> Vec<SuffixExpansion<'_>> {
        let mut out = Vec::new();
        let mut path = String::new();
        self.search_children(self, &mut path, &mut out);
        out
    }

    fn search_children<'a>(
        &'a self,
        father: &'a TrieNode,
        path: &mut String,
        out: &mut Vec<SuffixExpansion<'a>>,
    ) {
        for (&key, child) in &self.children {
            path.push(key);
            if child.is_terminal() {
                out.push(SuffixExpansion {
                    father,
                    son: child,
                    difference: path.clone(),
                });
            } else {
                child.search_children(father, path, out);
            }
            path.pop();
        }
    }
}

/// Trie of word forms rooted at the empty string.
#[derive(Debug, Clone)]
pub struct Trie {
    root: TrieNode,
    insertions: usize,
}

impl Trie {
    /// Create a trie holding only the empty string at its root.
    pub fn new() -> Self {
        let mut root = TrieNode::default();
        root.insert("", String::new());
        Self {
            root,
            insertions: 0,
        }
    }

    /// Insert a word; its terminal value is the word itself.
    pub fn add(&mut self, word: &str) {
        self.add_with_value(word, word.to_string());
    }

    /// Insert `key` with an explicit terminal value.
    pub fn add_with_value(&mut self, key: &str, value: String) {
        self.root.insert(key, value);
        self.insertions += 1;
    }

    /// Whether `word` was inserted.
    pub fn contains(&self, word: &str) -> bool {
        !word.is_empty() && self.root.find(word).is_some_and(TrieNode::is_terminal)
    }

    /// Root node.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Number of insertions (repeated words counted each time).
    pub fn insertions(&self) -> usize {
        self.insertions
    }

    /// True if nothing was inserted.
    pub fn is_empty(&self) -> bool {
        self.insertions == 0
    }
}

impl Default for Trie {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: AsRef<str>> Extend<S> for Trie {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for word in iter {
            self.add(word.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for Trie {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut trie = Trie::new();
        trie.extend(iter);
        trie
    }
}
