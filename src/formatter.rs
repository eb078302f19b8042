use crate::ast::{Kind, Members, Node};
use crate::error::{Error, Result};
use crate::util::escape;
use std::fmt;

const NULL: &str = "null";
const UNDEFINED: &str = "undefined";

/// Top-level `null`/`undefined` have no serialized form of their own.
fn check_root(node: &Node) -> Result<()> {
    if node.is_null() {
        return Err(Error::NullOrUndefined(NULL));
    }
    if node.is_undefined() {
        return Err(Error::NullOrUndefined(UNDEFINED));
    }
    Ok(())
}

// The node's own key belongs to its parent and is written there.
fn write_compact(out: &mut String, node: &Node) {
    match node.kind() {
        Kind::Primitive(raw) if raw.is_empty() => out.push_str(UNDEFINED),
        Kind::Primitive(raw) => out.push_str(raw),
        Kind::Array(members) | Kind::Object(members) => {
            let (open, close) = if node.is_array() { ('[', ']') } else { ('{', '}') };
            out.push(open);
            for (i, (key, child)) in members.keyed().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                if let Some(key) = key {
                    out.push_str(&escape(key));
                    out.push(':');
                }
                write_compact(out, child);
            }
            out.push(close);
        }
    }
}

/// Compact JSON text. Undefined slots are written as `undefined`; call
/// [`Node::sanitize`] first if the tree may hold any.
pub fn stringify(node: &Node) -> Result<String> {
    check_root(node)?;
    Ok(node.to_string())
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_compact(&mut out, self);
        f.write_str(&out)
    }
}

/// Indenting printer: one child per line, four spaces per level.
pub struct Formatter {
    depth: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self { depth: 0 }
    }
    fn indent(&self) -> String {
        " ".repeat(4).repeat(self.depth)
    }
    fn format_member(&mut self, key: Option<&str>, node: &Node) -> String {
        match key {
            Some(key) => format!("{}{}: {}", self.indent(), escape(key), self.format_value(node)),
            None => format!("{}{}", self.indent(), self.format_value(node)),
        }
    }
    fn format_container(&mut self, members: &Members, open: char, close: char) -> String {
        if members.is_empty() {
            return format!("{}{}", open, close);
        }
        self.depth += 1;
        let inner = members
            .keyed()
            .map(|(key, child)| self.format_member(key, child))
            .collect::<Vec<String>>()
            .join(",\n");
        self.depth -= 1;
        let close = format!("{}{}", self.indent(), close);
        format!("{}\n{}\n{}", open, inner, close)
    }
    fn format_value(&mut self, node: &Node) -> String {
        match node.kind() {
            Kind::Primitive(raw) if raw.is_empty() => UNDEFINED.to_string(),
            Kind::Primitive(raw) => raw.clone(),
            Kind::Array(members) => self.format_container(members, '[', ']'),
            Kind::Object(members) => self.format_container(members, '{', '}'),
        }
    }
    pub fn format(&mut self, node: &Node) -> Result<String> {
        check_root(node)?;
        Ok(self.format_value(node))
    }
}
