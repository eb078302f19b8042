use crate::ast::{Kind, Node};
use crate::error::{Error, Result};
use crate::util::{is_integer, parse_integer};
use std::convert::TryFrom;

/// How an array reads a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Address {
    /// A non-negative integer: a slot of the anonymous prefix.
    Position(usize),
    /// A non-negative integer with no slot it could ever name.
    OutOfRange,
    Named,
}

pub(crate) fn address(key: &str) -> Address {
    if !is_integer(key) {
        return Address::Named;
    }
    match parse_integer(key) {
        Some(i) if i < 0 => Address::Named,
        Some(i) => usize::try_from(i).map_or(Address::OutOfRange, Address::Position),
        None if key.starts_with('-') => Address::Named,
        None => Address::OutOfRange,
    }
}

impl Node {
    /// Look up a child. Absence is `Ok(None)`; primitives cannot be indexed.
    pub fn get(&self, key: &str) -> Result<Option<&Node>> {
        match &self.kind {
            Kind::Array(members) => Ok(match address(key) {
                Address::Position(i) => members.items[..members.size()].get(i),
                Address::OutOfRange => None,
                Address::Named => members.named(key),
            }),
            Kind::Object(members) => Ok(members.named(key)),
            Kind::Primitive(_) => Err(Error::OperationNotPermitted),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Result<Option<&mut Node>> {
        match &mut self.kind {
            Kind::Array(members) => Ok(match address(key) {
                Address::Position(i) => {
                    let size = members.size();
                    members.items[..size].get_mut(i)
                }
                Address::OutOfRange => None,
                Address::Named => members.named_mut(key),
            }),
            Kind::Object(members) => Ok(members.named_mut(key)),
            Kind::Primitive(_) => Err(Error::OperationNotPermitted),
        }
    }

    /// Store `value` according to its key and return the stored node.
    ///
    /// On arrays a missing key appends, a non-negative integer key replaces
    /// that position (padding with undefined slots) and drops the key, and
    /// any other key adds a named entry. Objects require a key.
    pub fn set(&mut self, mut value: Node) -> Result<&mut Node> {
        match &mut self.kind {
            Kind::Array(members) => {
                let key = match &value.key {
                    Some(key) => key.clone(),
                    None => return Ok(members.push_anonymous(value)),
                };
                match address(&key) {
                    Address::Position(at) => {
                        value.key = None;
                        Ok(members.put_at(at, value))
                    }
                    Address::OutOfRange => Err(Error::OperationNotPermitted),
                    Address::Named => Ok(members.insert_named(&key, value)),
                }
            }
            Kind::Object(members) => match value.key.clone() {
                Some(key) => Ok(members.insert_named(&key, value)),
                None => Err(Error::OperationNotPermitted),
            },
            Kind::Primitive(_) => Err(Error::OperationNotPermitted),
        }
    }

    /// Reset to the undefined primitive, dropping all children. The key is kept.
    pub fn erase(&mut self) {
        self.kind = Kind::Primitive(String::new());
    }

    /// Reset to `null`, dropping all children. The key is kept.
    pub fn nullify(&mut self) {
        self.kind = Kind::Primitive("null".to_string());
    }

    /// Array positions are blanked in place; named entries are removed.
    pub fn erase_key(&mut self, key: &str) -> Result<()> {
        match &mut self.kind {
            Kind::Array(members) => {
                match address(key) {
                    Address::Position(i) => {
                        let size = members.size();
                        if let Some(item) = members.items[..size].get_mut(i) {
                            item.erase();
                        }
                    }
                    Address::OutOfRange => {}
                    Address::Named => {
                        members.remove_named(key);
                    }
                }
                Ok(())
            }
            Kind::Object(members) => {
                members.remove_named(key);
                Ok(())
            }
            Kind::Primitive(_) => Err(Error::OperationNotPermitted),
        }
    }

    pub fn erase_index(&mut self, index: usize) -> Result<()> {
        self.erase_key(&index.to_string())
    }

    /// Recursively drop named entries holding the undefined sentinel.
    /// Anonymous items keep their slot whatever their value. Every surviving
    /// child is left carrying the key its parent stores it under.
    pub fn sanitize(&mut self) -> &mut Self {
        if let Some(members) = self.members_mut() {
            let doomed: Vec<String> = members
                .keyed()
                .filter(|(_, node)| node.is_undefined())
                .filter_map(|(key, _)| key.map(str::to_string))
                .collect();
            for key in &doomed {
                members.remove_named(key);
            }
            if !doomed.is_empty() {
                log::trace!("sanitize removed {:?}", doomed);
            }
            members.restamp();
            for item in members.items.iter_mut() {
                item.sanitize();
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse, stringify};

    fn round(node: &Node) -> String {
        stringify(node).unwrap()
    }

    #[test]
    fn test_address() {
        #[rustfmt::skip]
        let tests = vec![
            ("0", Address::Position(0)),
            ("12", Address::Position(12)),
            ("+3", Address::Position(3)),
            ("99999999999999999999", Address::OutOfRange),
            ("+99999999999999999999", Address::OutOfRange),
            ("-1", Address::Named),
            ("-99999999999999999999", Address::Named),
            ("a", Address::Named),
            ("1.5", Address::Named),
            ("", Address::Named),
        ];
        for (input, expected) in tests {
            assert_eq!(address(input), expected, "{}", input);
        }
    }

    #[test]
    fn test_oversized_position() {
        let huge = "99999999999999999999";
        let mut node = parse(r#"[1, 2, "k": 3]"#).unwrap();
        assert!(node.get(huge).unwrap().is_none());
        assert!(node.get_mut(huge).unwrap().is_none());
        assert_eq!(
            node.set(Node::primitive("4").with_key(huge)).map(|_| ()),
            Err(Error::OperationNotPermitted)
        );
        node.erase_key(huge).unwrap();
        assert_eq!(round(&node), r#"[1,2,"k":3]"#);
    }

    #[test]
    fn test_replace_through_reference_keeps_entry_key() {
        let mut node = parse(r#"{"a": 1, "b": 2}"#).unwrap();
        *node.get_mut("a").unwrap().unwrap() = Node::primitive("9");
        let text = round(&node);
        assert_eq!(text, r#"{"a":9,"b":2}"#);
        assert_eq!(round(&parse(&text).unwrap()), text);

        *node.set(Node::primitive("3").with_key("c")).unwrap() = Node::undefined();
        node.sanitize();
        assert_eq!(round(&node), r#"{"a":9,"b":2}"#);
        assert_eq!(node.get("a").unwrap().and_then(Node::key), Some("a"));

        let mut array = parse(r#"[1, "k": 2]"#).unwrap();
        *array.get_mut("0").unwrap().unwrap() = Node::primitive("5").with_key("stray");
        *array.get_mut("k").unwrap().unwrap() = Node::primitive("6");
        assert_eq!(round(&array), r#"[5,"k":6]"#);
        assert_eq!(crate::keys(&array), vec!["0", "k"]);
    }

    #[test]
    fn test_get_array() {
        let node = parse(r#"[10, 20, "name": "x", "-1": "neg"]"#).unwrap();
        #[rustfmt::skip]
        let tests = vec![
            ("0", Some("10")),
            ("1", Some("20")),
            ("2", None),
            ("name", Some(r#""x""#)),
            ("-1", Some(r#""neg""#)),
            ("missing", None),
        ];
        for (key, expected) in tests {
            let got = node.get(key).unwrap().and_then(Node::raw);
            assert_eq!(got, expected, "{}", key);
        }
    }

    #[test]
    fn test_get_object() {
        let node = parse(r#"{"b": 2, "a": 1, "0": "zero"}"#).unwrap();
        assert_eq!(node.get("a").unwrap().and_then(Node::raw), Some("1"));
        assert_eq!(node.get("b").unwrap().and_then(Node::raw), Some("2"));
        assert_eq!(node.get("0").unwrap().and_then(Node::raw), Some(r#""zero""#));
        assert!(node.get("c").unwrap().is_none());
    }

    #[test]
    fn test_get_primitive_not_permitted() {
        let node = parse("42").unwrap();
        assert_eq!(node.get("a"), Err(Error::OperationNotPermitted));
    }

    #[test]
    fn test_get_mut() {
        let mut node = parse(r#"{"a": [1, 2]}"#).unwrap();
        node.get_mut("a")
            .unwrap()
            .unwrap()
            .set(Node::primitive("3"))
            .unwrap();
        assert_eq!(round(&node), r#"{"a":[1,2,3]}"#);
    }

    #[test]
    fn test_set_array() {
        let mut node = Node::array();
        node.set(Node::primitive("1")).unwrap();
        node.set(Node::primitive("\"v\"").with_key("name")).unwrap();
        node.set(Node::primitive("2")).unwrap();
        assert_eq!(round(&node), r#"[1,2,"name":"v"]"#);
        assert_eq!(node.size(), 2);

        let stored = node.set(Node::primitive("9").with_key("0")).unwrap();
        assert_eq!(stored.key(), None);
        assert_eq!(round(&node), r#"[9,2,"name":"v"]"#);

        node.set(Node::primitive("5").with_key("4")).unwrap();
        assert_eq!(round(&node), r#"[9,2,undefined,undefined,5,"name":"v"]"#);
        assert_eq!(node.size(), 5);

        node.set(Node::primitive("0").with_key("-1")).unwrap();
        assert_eq!(node.size(), 5);
        assert_eq!(node.get("-1").unwrap().and_then(Node::raw), Some("0"));
    }

    #[test]
    fn test_set_object() {
        let mut node = Node::object();
        node.set(Node::primitive("1").with_key("b")).unwrap();
        node.set(Node::primitive("2").with_key("a")).unwrap();
        node.set(Node::primitive("3").with_key("b")).unwrap();
        assert_eq!(round(&node), r#"{"b":3,"a":2}"#);
        assert_eq!(node.children().len(), 2);
        assert_eq!(
            node.set(Node::primitive("1")).map(|_| ()),
            Err(Error::OperationNotPermitted)
        );
    }

    #[test]
    fn test_set_primitive_not_permitted() {
        let mut node = Node::primitive("1");
        assert_eq!(
            node.set(Node::primitive("1")).map(|_| ()),
            Err(Error::OperationNotPermitted)
        );
    }

    #[test]
    fn test_erase() {
        let mut node = parse(r#"{"a": {"b": [1, 2]}}"#).unwrap();
        let child = node.get_mut("a").unwrap().unwrap();
        child.erase();
        assert!(child.is_undefined());
        assert_eq!(child.key(), Some("a"));
        assert!(child.children().is_empty());
        assert_eq!(round(&node), r#"{"a":undefined}"#);
    }

    #[test]
    fn test_nullify() {
        let mut node = parse("[[1, 2], 3]").unwrap();
        node.get_mut("0").unwrap().unwrap().nullify();
        assert_eq!(round(&node), "[null,3]");
    }

    #[test]
    fn test_erase_key_array() {
        let mut node = parse(r#"[1, 2, 3, "x": true, "y": false]"#).unwrap();
        node.erase_index(1).unwrap();
        assert_eq!(node.size(), 3);
        assert!(node.get("1").unwrap().unwrap().is_undefined());

        node.erase_key("x").unwrap();
        assert!(node.get("x").unwrap().is_none());
        assert_eq!(node.get("y").unwrap().and_then(Node::raw), Some("false"));
        assert_eq!(round(&node), r#"[1,undefined,3,"y":false]"#);

        node.erase_index(10).unwrap();
        node.erase_key("nope").unwrap();
        assert_eq!(round(&node), r#"[1,undefined,3,"y":false]"#);
    }

    #[test]
    fn test_erase_key_object() {
        let mut node = parse(r#"{"c": 3, "a": 1, "b": 2}"#).unwrap();
        node.erase_key("c").unwrap();
        assert_eq!(round(&node), r#"{"a":1,"b":2}"#);
        for key in &["a", "b"] {
            assert_eq!(node.get(key).unwrap().and_then(Node::key), Some(*key));
        }
        assert_eq!(
            Node::null().erase_key("a"),
            Err(Error::OperationNotPermitted)
        );
    }

    #[test]
    fn test_sanitize() {
        let mut node = parse(r#"{"x": 1, "y": 2, "z": {"w": 3, "v": [1, 2]}}"#).unwrap();
        node.erase_key("nothing").unwrap();
        node.get_mut("x").unwrap().unwrap().erase();
        let z = node.get_mut("z").unwrap().unwrap();
        z.get_mut("w").unwrap().unwrap().erase();
        z.get_mut("v").unwrap().unwrap().erase_index(0).unwrap();
        node.sanitize();
        assert_eq!(round(&node), r#"{"y":2,"z":{"v":[undefined,2]}}"#);
        assert_eq!(node.get("z").unwrap().unwrap().get("v").unwrap().unwrap().size(), 2);
    }

    #[test]
    fn test_sanitize_array_named_entries() {
        let mut node = parse(r#"[1, {"k": 1}, "n": 2]"#).unwrap();
        node.get_mut("n").unwrap().unwrap().erase();
        node.get_mut("1").unwrap().unwrap().get_mut("k").unwrap().unwrap().erase();
        node.sanitize();
        assert_eq!(round(&node), "[1,{}]");
    }
}
