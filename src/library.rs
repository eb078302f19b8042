//! Traversal and copy helpers built on the node operations.

use crate::ast::{Kind, Node};
use crate::error::{Error, Result};
use crate::util::unescape;
use std::borrow::Cow;

/// Characters of a string literal; `None` for every other primitive.
fn literal_chars(raw: &str) -> Option<Vec<char>> {
    unescape(raw).map(|s| s.chars().collect())
}

/// Array positions, then named keys in storage order. A string literal
/// yields one position per character.
pub fn keys(node: &Node) -> Vec<String> {
    match node.kind() {
        Kind::Primitive(raw) => literal_chars(raw)
            .map(|chars| (0..chars.len()).map(|i| i.to_string()).collect())
            .unwrap_or_default(),
        Kind::Array(members) | Kind::Object(members) => {
            let size = members.size();
            (0..size)
                .map(|i| i.to_string())
                .chain(members.named_keys().into_iter().map(str::to_string))
                .collect()
        }
    }
}

/// Children in storage order. A string literal yields a fresh one-character
/// string per character.
pub fn values(node: &Node) -> Vec<Cow<'_, Node>> {
    match node.kind() {
        Kind::Primitive(raw) => literal_chars(raw)
            .map(|chars| {
                chars
                    .iter()
                    .map(|c| Cow::Owned(Node::string(&c.to_string())))
                    .collect()
            })
            .unwrap_or_default(),
        Kind::Array(members) | Kind::Object(members) => {
            members.items.iter().map(Cow::Borrowed).collect()
        }
    }
}

pub fn entries(node: &Node) -> Vec<(String, Cow<'_, Node>)> {
    keys(node).into_iter().zip(values(node)).collect()
}

/// Deep-copy the members of `source` into `target`.
///
/// An array target takes the source's items position by position and
/// ignores anything that is not an array. An object target takes every
/// entry of the source, array items keyed by their position.
pub fn assign<'a>(target: &'a mut Node, source: &Node) -> Result<&'a mut Node> {
    if target.is_array() {
        if source.is_array() {
            for (i, item) in source.items().iter().enumerate() {
                target.set_at(i, item.clone())?;
            }
        }
    } else if target.is_object() {
        for (key, value) in entries(source) {
            let mut copy = value.into_owned();
            copy.set_key(key);
            target.set(copy)?;
        }
    } else {
        return Err(Error::OperationNotPermitted);
    }
    Ok(target)
}
