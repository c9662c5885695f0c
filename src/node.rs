//! The BML tree model.
//!
//! A parsed file is a [`Document`] wrapping an unnamed root [`Node`] whose
//! children are the top-level entries. Every node owns its children outright;
//! there are no parent links, so a subtree can be cloned, moved or dropped
//! like any other value.
//!
//! ## Paths
//!
//! Descendants are addressed with `/`-separated names. Empty segments are
//! ignored, so `"Video//Driver"`, `"/Video/Driver/"` and `"Video/Driver"` all
//! name the same node, and the empty path names the receiver itself. When
//! several children share a name, the first one wins.
//!
//! ## Missing settings
//!
//! [`Node::get`] returns an `Option`, and the [`Lookup`] trait lets the whole
//! accessor vocabulary run on that `Option` directly, so a lookup chain
//! never has to branch on presence:
//!
//! ```rust
//! use serde_bml::{parse, Lookup};
//!
//! let doc = parse("Video\n  Driver: Metal\n  Multiplier: 2").unwrap();
//!
//! assert_eq!(doc.get("Video").get("Driver").string_or(""), "Metal");
//! assert_eq!(doc.get("Video/Multiplier").int_or(1), 2);
//! assert_eq!(doc.get("Audio").get("Volume").float_or(0.5), 0.5);
//! ```

use crate::options::BmlOptions;
use crate::ser::Serializer;
use crate::Result;
use std::fmt;
use std::str::FromStr;

/// A named entry with a string value and ordered children.
///
/// Inline attributes from the source text (`Node attr=1`) are stored as
/// ordinary children. An empty `value` means "no value".
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Node {
    /// Node name; empty for a document root.
    pub name: String,
    /// Raw value text, with continuation lines joined by `\n`.
    pub value: String,
    /// Children and attributes in source order.
    pub children: Vec<Node>,
}

/// Splits a path into its non-empty segments.
fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

impl Node {
    /// Creates the unnamed node used as a document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a node with no value and no children.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::Node;
    ///
    /// let node = Node::new("Video");
    /// assert_eq!(node.name, "Video");
    /// assert!(!node.has_value());
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates a childless node holding `value`.
    #[must_use]
    pub fn with_value(name: impl Into<String>, value: impl Into<String>) -> Self {
        Node {
            name: name.into(),
            value: value.into(),
            children: Vec::new(),
        }
    }

    /// True when the value is non-empty.
    #[must_use]
    pub fn has_value(&self) -> bool {
        !self.value.is_empty()
    }

    /// True when the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Appends `child` after the existing children and returns it.
    pub fn append(&mut self, child: Node) -> &mut Node {
        let index = self.children.len();
        self.children.push(child);
        &mut self.children[index]
    }

    /// First direct child called `name`.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Mutable form of [`Node::child`].
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children.iter_mut().find(|child| child.name == name)
    }

    pub(crate) fn child_or_insert(&mut self, name: &str) -> &mut Node {
        match self.children.iter().position(|child| child.name == name) {
            Some(index) => &mut self.children[index],
            None => self.append(Node::new(name)),
        }
    }

    /// Walks `path` from this node, taking the first matching child at each
    /// step.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::parse;
    ///
    /// let doc = parse("A\n  B\n    C: value").unwrap();
    /// assert_eq!(doc.root().get("A//B/C").map(|n| n.value.as_str()), Some("value"));
    /// assert!(doc.root().get("A/X").is_none());
    /// assert_eq!(doc.root().get(""), Some(doc.root()));
    /// ```
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Node> {
        segments(path).try_fold(self, |node, segment| node.child(segment))
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Node> {
        segments(path).try_fold(self, |node, segment| node.child_mut(segment))
    }

    /// Every node matching `path`, including later siblings that share the
    /// final name.
    ///
    /// Intermediate segments still resolve to their first match.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::parse;
    ///
    /// let doc = parse("Paths\n  Rom: a\n  Rom: b\n  Save: c").unwrap();
    /// let roms: Vec<_> = doc.root().get_all("Paths/Rom").iter().map(|n| n.value.as_str()).collect();
    /// assert_eq!(roms, vec!["a", "b"]);
    /// ```
    #[must_use]
    pub fn get_all(&self, path: &str) -> Vec<&Node> {
        let segments: Vec<&str> = segments(path).collect();
        let Some((last, parents)) = segments.split_last() else {
            return vec![self];
        };
        parents
            .iter()
            .try_fold(self, |node, segment| node.child(segment))
            .map(|parent| {
                parent
                    .children
                    .iter()
                    .filter(|child| child.name == *last)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The node's value trimmed of surrounding whitespace, or `fallback`
    /// when that is empty.
    #[must_use]
    pub fn string_or(&self, fallback: &str) -> String {
        Some(self).string_or(fallback)
    }

    /// `true` or `false` when the trimmed value is exactly that literal,
    /// otherwise `fallback`.
    #[must_use]
    pub fn bool_or(&self, fallback: bool) -> bool {
        Some(self).bool_or(fallback)
    }

    #[must_use]
    pub fn int_or(&self, fallback: i64) -> i64 {
        Some(self).int_or(fallback)
    }

    #[must_use]
    pub fn float_or(&self, fallback: f64) -> f64 {
        Some(self).float_or(fallback)
    }

    fn trimmed(&self) -> Option<&str> {
        let value = self.value.trim();
        (!value.is_empty()).then_some(value)
    }

    /// Assigns `value` at `path`, creating any missing node along the way.
    ///
    /// Existing nodes are reused, so repeating the same call never adds
    /// duplicates. An empty path returns the receiver untouched.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::Node;
    ///
    /// let mut root = Node::root();
    /// root.set("Video/Driver", "Metal");
    /// root.set("Video/Driver", "Vulkan");
    ///
    /// assert_eq!(root.children.len(), 1);
    /// assert_eq!(root.get("Video/Driver").unwrap().value, "Vulkan");
    /// ```
    pub fn set(&mut self, path: &str, value: impl Into<String>) -> &mut Node {
        let mut segments = segments(path).peekable();
        if segments.peek().is_none() {
            return self;
        }
        let node = segments.fold(self, |node, segment| node.child_or_insert(segment));
        node.value = value.into();
        node
    }

    pub fn set_bool(&mut self, path: &str, value: bool) -> &mut Node {
        self.set(path, if value { "true" } else { "false" })
    }

    pub fn set_int(&mut self, path: &str, value: i64) -> &mut Node {
        self.set(path, value.to_string())
    }

    /// Stores the shortest decimal text that reads back as the same `f64`
    /// (`2.0` becomes `"2"`, `0.1` stays `"0.1"`).
    pub fn set_float(&mut self, path: &str, value: f64) -> &mut Node {
        self.set(path, value.to_string())
    }

    /// Removes the first node matching `path`. Later siblings keep their
    /// order.
    ///
    /// Returns `false` when any segment is missing or the path is empty.
    pub fn remove(&mut self, path: &str) -> bool {
        let segments: Vec<&str> = segments(path).collect();
        let Some((target, parents)) = segments.split_last() else {
            return false;
        };
        let Some(parent) = parents
            .iter()
            .try_fold(self, |node, segment| node.child_mut(segment))
        else {
            return false;
        };
        match parent.children.iter().position(|child| child.name == *target) {
            Some(index) => {
                parent.children.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Read accessors over a possibly absent node.
///
/// Implemented for `Option<&Node>` so that lookups chain without checks.
/// Every method is total: an absent node yields `None` or the fallback.
pub trait Lookup<'a> {
    fn get(self, path: &str) -> Option<&'a Node>;
    fn string_or(self, fallback: &str) -> String;
    fn bool_or(self, fallback: bool) -> bool;
    fn int_or(self, fallback: i64) -> i64;
    fn float_or(self, fallback: f64) -> f64;
}

impl<'a> Lookup<'a> for Option<&'a Node> {
    fn get(self, path: &str) -> Option<&'a Node> {
        self.and_then(|node| node.get(path))
    }

    fn string_or(self, fallback: &str) -> String {
        self.and_then(Node::trimmed)
            .unwrap_or(fallback)
            .to_string()
    }

    fn bool_or(self, fallback: bool) -> bool {
        match self.and_then(Node::trimmed) {
            Some("true") => true,
            Some("false") => false,
            _ => fallback,
        }
    }

    fn int_or(self, fallback: i64) -> i64 {
        self.and_then(Node::trimmed)
            .and_then(|value| value.parse().ok())
            .unwrap_or(fallback)
    }

    fn float_or(self, fallback: f64) -> f64 {
        self.and_then(Node::trimmed)
            .and_then(|value| value.parse().ok())
            .unwrap_or(fallback)
    }
}

/// Mutators over a possibly absent node.
///
/// On `None` every call is a no-op that reports nothing was changed.
///
/// ```rust
/// use serde_bml::{parse, LookupMut};
///
/// let mut doc = parse("Video\n  Driver: OpenGL").unwrap();
/// assert!(doc.get_mut("Video").set("Driver", "Metal").is_some());
/// assert!(doc.get_mut("Audio").set("Volume", "1").is_none());
/// assert!(doc.get("Audio").is_none());
/// ```
pub trait LookupMut<'a> {
    fn get_mut(self, path: &str) -> Option<&'a mut Node>;
    fn set(self, path: &str, value: impl Into<String>) -> Option<&'a mut Node>;
    fn set_bool(self, path: &str, value: bool) -> Option<&'a mut Node>;
    fn set_int(self, path: &str, value: i64) -> Option<&'a mut Node>;
    fn set_float(self, path: &str, value: f64) -> Option<&'a mut Node>;
    fn remove(self, path: &str) -> bool;
}

impl<'a> LookupMut<'a> for Option<&'a mut Node> {
    fn get_mut(self, path: &str) -> Option<&'a mut Node> {
        self.and_then(|node| node.get_mut(path))
    }

    fn set(self, path: &str, value: impl Into<String>) -> Option<&'a mut Node> {
        self.map(|node| node.set(path, value))
    }

    fn set_bool(self, path: &str, value: bool) -> Option<&'a mut Node> {
        self.map(|node| node.set_bool(path, value))
    }

    fn set_int(self, path: &str, value: i64) -> Option<&'a mut Node> {
        self.map(|node| node.set_int(path, value))
    }

    fn set_float(self, path: &str, value: f64) -> Option<&'a mut Node> {
        self.map(|node| node.set_float(path, value))
    }

    fn remove(self, path: &str) -> bool {
        self.is_some_and(|node| node.remove(path))
    }
}

/// A parsed BML file.
///
/// The root node is never written out; only its children are.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Document {
    root: Node,
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses BML text. Equivalent to [`crate::parse`].
    pub fn parse(input: &str) -> Result<Self> {
        crate::parser::parse(input)
    }

    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Top-level nodes in source order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.root.children
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Node> {
        self.root.get(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut Node> {
        self.root.get_mut(path)
    }

    pub fn set(&mut self, path: &str, value: impl Into<String>) -> &mut Node {
        self.root.set(path, value)
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.root.remove(path)
    }

    /// Renders the document with custom formatting options.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_bml::{parse, BmlOptions};
    ///
    /// let doc = parse("Video\n  Driver: Metal").unwrap();
    /// let text = doc.to_string_with_options(&BmlOptions::new().with_indent(4));
    /// assert_eq!(text, "Video\n    Driver: Metal\n");
    /// ```
    #[must_use]
    pub fn to_string_with_options(&self, options: &BmlOptions) -> String {
        let mut serializer = Serializer::new(options.clone());
        serializer.serialize_document(self);
        serializer.into_inner()
    }
}

impl From<Node> for Document {
    fn from(root: Node) -> Self {
        Document { root }
    }
}

impl FromStr for Document {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_options(&BmlOptions::default()))
    }
}
