use crate::error::Result;
use crate::util::{escape, is_number, is_quoted, parse_number, unescape};

/// Children of an array or object.
///
/// `items` holds the anonymous prefix followed by the named suffix.
/// `index` is sorted by key and maps each named child to its offset
/// within the named suffix, so `items[size() + offset]` is the child.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Members {
    pub(crate) items: Vec<Node>,
    pub(crate) index: Vec<(String, usize)>,
}

impl Members {
    /// Number of anonymous items.
    pub fn size(&self) -> usize {
        self.items.len() - self.index.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(crate) fn find(&self, key: &str) -> std::result::Result<usize, usize> {
        self.index.binary_search_by(|(k, _)| k.as_str().cmp(key))
    }

    pub(crate) fn named(&self, key: &str) -> Option<&Node> {
        let pos = self.find(key).ok()?;
        self.items.get(self.size() + self.index[pos].1)
    }

    pub(crate) fn named_mut(&mut self, key: &str) -> Option<&mut Node> {
        let pos = self.find(key).ok()?;
        let at = self.size() + self.index[pos].1;
        self.items.get_mut(at)
    }

    /// Insert before the named suffix.
    pub(crate) fn push_anonymous(&mut self, node: Node) -> &mut Node {
        let at = self.size();
        self.items.insert(at, node);
        &mut self.items[at]
    }

    /// Store `node` at anonymous position `at`, padding with undefined slots.
    pub(crate) fn put_at(&mut self, at: usize, node: Node) -> &mut Node {
        let size = self.size();
        if at < size {
            self.items[at] = node;
        } else {
            let named = self.items.split_off(size);
            self.items.extend(std::iter::repeat_with(Node::undefined).take(at - size));
            self.items.push(node);
            self.items.extend(named);
        }
        &mut self.items[at]
    }

    /// Replace the entry for `key` in place, or append a new one and keep `index` sorted.
    pub(crate) fn insert_named(&mut self, key: &str, node: Node) -> &mut Node {
        let at = match self.find(key) {
            Ok(pos) => {
                let at = self.size() + self.index[pos].1;
                self.items[at] = node;
                at
            }
            Err(pos) => {
                let offset = self.index.len();
                self.items.push(node);
                self.index.insert(pos, (key.to_string(), offset));
                self.items.len() - 1
            }
        };
        &mut self.items[at]
    }

    /// Remove the entry for `key`, re-basing the offsets that followed it.
    pub(crate) fn remove_named(&mut self, key: &str) -> Option<Node> {
        let pos = self.find(key).ok()?;
        let offset = self.index[pos].1;
        let at = self.size() + offset;
        let removed = self.items.remove(at);
        self.index.remove(pos);
        for entry in self.index.iter_mut() {
            if entry.1 > offset {
                entry.1 -= 1;
            }
        }
        Some(removed)
    }

    /// Sorted `(key, offset)` pairs covering the named suffix.
    pub fn index(&self) -> &[(String, usize)] {
        &self.index
    }

    /// Keys of the named suffix in storage order.
    pub fn named_keys(&self) -> Vec<&str> {
        let mut keys = vec![""; self.index.len()];
        for (key, offset) in &self.index {
            keys[*offset] = key;
        }
        keys
    }

    /// Copy each entry's key from `index` onto its child and clear the keys
    /// of anonymous items.
    pub(crate) fn restamp(&mut self) {
        let size = self.size();
        for (key, offset) in &self.index {
            self.items[size + offset].key = Some(key.clone());
        }
        for item in &mut self.items[..size] {
            item.key = None;
        }
    }

    /// Every child in storage order with the key it is stored under.
    ///
    /// Keys come from `index`, not from the children, so a child replaced
    /// through a `&mut Node` still serializes under its entry's key.
    pub fn keyed(&self) -> impl Iterator<Item = (Option<&str>, &Node)> + '_ {
        let size = self.size();
        let keys = self.named_keys();
        self.items
            .iter()
            .enumerate()
            .map(move |(i, node)| (i.checked_sub(size).map(|at| keys[at]), node))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Array(Members),
    Object(Members),
    /// Literal token text; empty is the undefined sentinel.
    Primitive(String),
}

/// A JSON value: array, object or primitive, optionally carrying the key it
/// is stored under in its parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) key: Option<String>,
    pub(crate) kind: Kind,
}

impl Default for Node {
    fn default() -> Self {
        Node::undefined()
    }
}

impl Node {
    pub fn undefined() -> Self {
        Node::primitive("")
    }

    pub fn null() -> Self {
        Node::primitive("null")
    }

    /// A primitive holding `raw` verbatim, e.g. `42`, `true` or `"quoted"`.
    pub fn primitive(raw: impl Into<String>) -> Self {
        Node {
            key: None,
            kind: Kind::Primitive(raw.into()),
        }
    }

    pub fn string(text: &str) -> Self {
        Node::primitive(escape(text))
    }

    /// Non-finite numbers have no JSON literal and become `null`.
    pub fn number(value: f64) -> Self {
        if value.is_finite() {
            Node::primitive(value.to_string())
        } else {
            Node::null()
        }
    }

    pub fn boolean(value: bool) -> Self {
        Node::primitive(if value { "true" } else { "false" })
    }

    pub fn array() -> Self {
        Node {
            key: None,
            kind: Kind::Array(Members::default()),
        }
    }

    pub fn object() -> Self {
        Node {
            key: None,
            kind: Kind::Object(Members::default()),
        }
    }

    /// An array of `len` undefined slots.
    pub fn array_with_len(len: usize) -> Self {
        let items = (0..len).map(|_| Node::undefined()).collect();
        Node {
            key: None,
            kind: Kind::Array(Members {
                items,
                index: Vec::new(),
            }),
        }
    }

    /// Wrap already-anonymous items without re-checking their keys.
    pub(crate) fn array_of(items: Vec<Node>) -> Self {
        Node {
            key: None,
            kind: Kind::Array(Members {
                items,
                index: Vec::new(),
            }),
        }
    }

    pub fn array_from<I: IntoIterator<Item = Node>>(items: I) -> Result<Self> {
        let mut node = Node::array();
        for item in items {
            node.set(item)?;
        }
        Ok(node)
    }

    /// Fails unless every item carries a key.
    pub fn object_from<I: IntoIterator<Item = Node>>(items: I) -> Result<Self> {
        let mut node = Node::object();
        for item in items {
            node.set(item)?;
        }
        Ok(node)
    }

    /// An empty key means anonymous.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.set_key(key);
        self
    }

    pub(crate) fn set_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        self.key = if key.is_empty() { None } else { Some(key) };
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub(crate) fn members(&self) -> Option<&Members> {
        match &self.kind {
            Kind::Array(members) | Kind::Object(members) => Some(members),
            Kind::Primitive(_) => None,
        }
    }

    pub(crate) fn members_mut(&mut self) -> Option<&mut Members> {
        match &mut self.kind {
            Kind::Array(members) | Kind::Object(members) => Some(members),
            Kind::Primitive(_) => None,
        }
    }

    /// Literal text of a primitive.
    pub fn raw(&self) -> Option<&str> {
        match &self.kind {
            Kind::Primitive(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, Kind::Array(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self.kind, Kind::Object(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self.kind, Kind::Primitive(_))
    }

    pub fn is_null(&self) -> bool {
        self.raw() == Some("null")
    }

    pub fn is_undefined(&self) -> bool {
        self.raw() == Some("")
    }

    /// Number of anonymous items; always 0 for primitives.
    pub fn size(&self) -> usize {
        self.members().map_or(0, Members::size)
    }

    /// The anonymous prefix.
    pub fn items(&self) -> &[Node] {
        match self.members() {
            Some(members) => &members.items[..members.size()],
            None => &[],
        }
    }

    /// Every child in storage order: anonymous items, then named entries.
    pub fn children(&self) -> &[Node] {
        match self.members() {
            Some(members) => &members.items,
            None => &[],
        }
    }

    /// Primitive value as a number; NaN when it is not numeric.
    pub fn number_value(&self) -> f64 {
        self.raw().map_or(std::f64::NAN, parse_number)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.raw()? {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    /// Decoded text of a string literal.
    pub fn as_str(&self) -> Option<String> {
        unescape(self.raw()?)
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            Kind::Array(_) => "array",
            Kind::Object(_) => "object",
            Kind::Primitive(raw) => match raw.as_str() {
                "" => "undefined",
                "null" => "null",
                "true" | "false" => "boolean",
                raw if is_number(raw) => "number",
                raw if is_quoted(raw) => "string",
                _ => "unknown",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(key: &str, raw: &str) -> Node {
        Node::primitive(raw).with_key(key)
    }

    fn assert_sorted(members: &Members) {
        let keys: Vec<&str> = members.index.iter().map(|(k, _)| k.as_str()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        for (key, offset) in &members.index {
            let node = &members.items[members.size() + offset];
            assert_eq!(node.key(), Some(key.as_str()));
        }
    }

    #[test]
    fn test_undefined_and_null() {
        let null = Node::null();
        assert!(null.is_null());
        assert!(!null.is_undefined());

        let undefined = Node::undefined();
        assert!(undefined.is_undefined());
        assert!(!undefined.is_null());

        let array = Node::array_with_len(3);
        assert_eq!(array.size(), 3);
        for item in array.items() {
            assert!(item.is_undefined());
            assert!(!item.is_null());
        }
    }

    #[test]
    fn test_constructors() {
        #[rustfmt::skip]
        let tests = vec![
            (Node::string("a\"b"), r#""a\"b""#),
            (Node::number(1.5), "1.5"),
            (Node::number(-3.0), "-3"),
            (Node::number(std::f64::NAN), "null"),
            (Node::boolean(true), "true"),
            (Node::boolean(false), "false"),
        ];
        for (node, expected) in tests {
            assert_eq!(node.raw(), Some(expected));
        }
    }

    #[test]
    fn test_with_key() {
        assert_eq!(Node::null().with_key("a").key(), Some("a"));
        assert_eq!(Node::null().with_key("").key(), None);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Node::primitive("42").number_value(), 42.0);
        assert!(Node::primitive("\"42\"").number_value().is_nan());
        assert!(Node::array().number_value().is_nan());
        assert_eq!(Node::primitive("true").as_bool(), Some(true));
        assert_eq!(Node::primitive("1").as_bool(), None);
        assert_eq!(Node::string("hi").as_str().as_deref(), Some("hi"));
        assert_eq!(Node::primitive("12").as_str(), None);
    }

    #[test]
    fn test_type_name() {
        #[rustfmt::skip]
        let tests = vec![
            (Node::array(), "array"),
            (Node::object(), "object"),
            (Node::undefined(), "undefined"),
            (Node::null(), "null"),
            (Node::boolean(false), "boolean"),
            (Node::primitive("-1.5e3"), "number"),
            (Node::string("x"), "string"),
            (Node::primitive("bogus"), "unknown"),
        ];
        for (node, expected) in tests {
            assert_eq!(node.type_name(), expected);
        }
    }

    #[test]
    fn test_members_insert_and_remove() {
        let mut members = Members::default();
        members.push_anonymous(Node::primitive("1"));
        for key in &["m", "c", "x", "a"] {
            members.insert_named(key, named(key, "0"));
            assert_sorted(&members);
        }
        members.push_anonymous(Node::primitive("2"));
        assert_eq!(members.size(), 2);
        assert_eq!(members.len(), 6);
        assert_sorted(&members);

        members.insert_named("c", named("c", "9"));
        assert_eq!(members.len(), 6);
        assert_eq!(members.named("c").and_then(Node::raw), Some("9"));

        let removed = members.remove_named("m").map(|n| n.key);
        assert_eq!(removed, Some(Some("m".to_string())));
        assert_sorted(&members);
        assert!(members.named("m").is_none());
        assert_eq!(members.size(), 2);
        for key in &["a", "c", "x"] {
            assert_eq!(members.named(key).and_then(Node::key), Some(*key));
        }
        assert!(members.remove_named("missing").is_none());
    }

    #[test]
    fn test_binary_search_matches_linear_scan() {
        let mut members = Members::default();
        let keys = ["k5", "k1", "k9", "k3", "k7", "k2", "k8"];
        for (i, key) in keys.iter().enumerate() {
            members.insert_named(key, named(key, &i.to_string()));
            if i % 3 == 2 {
                members.remove_named(keys[i - 1]);
            }
        }
        for probe in &["k0", "k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8", "k9"] {
            let linear = members.items.iter().find(|n| n.key() == Some(*probe));
            assert_eq!(members.named(probe), linear, "{}", probe);
        }
    }
}
