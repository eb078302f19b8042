use crate::ast::{Kind, Members, Node};
use crate::error::{Error, Result};
use crate::lexer::tokenize;
use crate::util::{is_number, is_quoted, unescape};

pub const DEFAULT_MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest array/object nesting accepted before failing.
    pub max_depth: usize,
}

impl ParseOptions {
    pub const fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

pub struct Parser {
    tokens: Vec<String>,
    options: ParseOptions,
}

fn decode_key(token: &str) -> Result<String> {
    if !is_quoted(token) {
        return Err(Error::unexpected(token));
    }
    unescape(token).ok_or_else(|| Error::unexpected(token))
}

fn is_literal(token: &str) -> bool {
    matches!(token, "true" | "false" | "null") || is_number(token) || unescape(token).is_some()
}

/// A scope holds a single value; anything after it is unexpected.
fn claim(target: &Node, token: &str) -> Result<()> {
    if target.is_undefined() {
        Ok(())
    } else {
        Err(Error::unexpected(token))
    }
}

/// Validate object scopes and build every sorted key index, depth first.
/// Array text must list its anonymous items ahead of its named entries; a
/// repeated key keeps its first position and takes the last value.
pub(crate) fn map_keys(node: &mut Node) -> Result<()> {
    let is_object = node.is_object();
    let members = match node.members_mut() {
        Some(members) => members,
        None => return Ok(()),
    };
    let items = std::mem::take(&mut members.items);
    members.index.clear();
    for mut item in items {
        map_keys(&mut item)?;
        match item.key.clone() {
            Some(key) => {
                members.insert_named(&key, item);
            }
            // Objects cannot hold anonymous properties.
            None if is_object => return Err(Error::OperationNotPermitted),
            // An anonymous item may not follow a named entry.
            None if !members.index.is_empty() => return Err(Error::OperationNotPermitted),
            None => {
                members.push_anonymous(item);
            }
        }
    }
    Ok(())
}

impl Parser {
    pub fn new(text: &str, options: ParseOptions) -> Self {
        Self {
            tokens: tokenize(text),
            options,
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn parse(&self) -> Result<Node> {
        if self.tokens.is_empty() {
            return Err(Error::EmptyInput);
        }
        let mut root = Node::undefined();
        self.parse_range(&mut root, 0, self.tokens.len(), 0)?;
        map_keys(&mut root)?;
        log::debug!(
            "parsed {} tokens into {}",
            self.tokens.len(),
            root.type_name()
        );
        Ok(root)
    }

    fn descend(&self, depth: usize) -> Result<usize> {
        if depth >= self.options.max_depth {
            return Err(Error::NestingTooDeep(self.options.max_depth));
        }
        Ok(depth + 1)
    }

    // `,` may not open, close or repeat inside a scope
    fn check_separator(&self, i: usize, start: usize, end: usize) -> Result<()> {
        if i == start || i + 1 == end || self.tokens[i + 1] == "," {
            return Err(Error::unexpected(","));
        }
        Ok(())
    }

    fn expect_separator(&self, i: usize, end: usize) -> Result<()> {
        if i < end && self.tokens[i] != "," {
            return Err(Error::unexpected(&self.tokens[i]));
        }
        Ok(())
    }

    fn find_closing(
        &self,
        open_at: usize,
        end: usize,
        open: &str,
        close: &str,
    ) -> Result<usize> {
        let mut depth = 1;
        for j in open_at + 1..end {
            if self.tokens[j] == open {
                depth += 1;
            } else if self.tokens[j] == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(j);
                }
            }
        }
        Err(Error::UnexpectedEnd)
    }

    /// End (exclusive) of the value starting at `start`.
    fn value_span(&self, start: usize, end: usize) -> Result<usize> {
        if start >= end {
            return Err(Error::UnexpectedEnd);
        }
        let mut depth = 0i64;
        let mut j = start;
        loop {
            match self.tokens[j].as_str() {
                "[" | "{" => depth += 1,
                "]" | "}" => depth -= 1,
                _ => {}
            }
            j += 1;
            if j >= end || depth == 0 {
                return Ok(j);
            }
        }
    }

    fn parse_child(
        &self,
        key: Option<String>,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<Node> {
        let mut child = Node::undefined();
        if let Some(key) = key {
            child.set_key(key);
        }
        self.parse_range(&mut child, start, end, depth)?;
        Ok(child)
    }

    fn parse_range(
        &self,
        target: &mut Node,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<()> {
        let mut i = start;
        while i < end {
            let token = self.tokens[i].as_str();
            match token {
                "," => {
                    self.check_separator(i, start, end)?;
                    i += 1;
                }
                "{" => {
                    claim(target, token)?;
                    let close = self.find_closing(i, end, "{", "}")?;
                    let depth = self.descend(depth)?;
                    target.kind = Kind::Object(Members::default());
                    self.parse_range(target, i + 1, close, depth)?;
                    i = close + 1;
                    self.expect_end(i, end)?;
                }
                "[" => {
                    claim(target, token)?;
                    let close = self.find_closing(i, end, "[", "]")?;
                    let depth = self.descend(depth)?;
                    let mut members = Members::default();
                    self.parse_items(&mut members, i + 1, close, depth)?;
                    target.kind = Kind::Array(members);
                    i = close + 1;
                    self.expect_end(i, end)?;
                }
                _ if i + 1 < end && self.tokens[i + 1] == ":" => {
                    let members = match &mut target.kind {
                        Kind::Object(members) => members,
                        _ => return Err(Error::unexpected(":")),
                    };
                    let key = decode_key(token)?;
                    let value_end = self.value_span(i + 2, end)?;
                    log::trace!("property {:?} spans tokens {}..{}", key, i + 2, value_end);
                    let child = self.parse_child(Some(key), i + 2, value_end, depth)?;
                    members.items.push(child);
                    i = value_end;
                    self.expect_separator(i, end)?;
                }
                "}" | "]" | ":" => return Err(Error::unexpected(token)),
                _ => {
                    claim(target, token)?;
                    if !is_literal(token) {
                        return Err(Error::unexpected(token));
                    }
                    target.kind = Kind::Primitive(token.to_string());
                    i += 1;
                    self.expect_end(i, end)?;
                }
            }
        }
        Ok(())
    }

    fn expect_end(&self, i: usize, end: usize) -> Result<()> {
        if i < end {
            return Err(Error::unexpected(&self.tokens[i]));
        }
        Ok(())
    }

    // Array items get their own nodes, anonymous or `key: value`.
    fn parse_items(
        &self,
        members: &mut Members,
        start: usize,
        end: usize,
        depth: usize,
    ) -> Result<()> {
        let mut k = start;
        while k < end {
            let token = self.tokens[k].as_str();
            if token == "," {
                self.check_separator(k, start, end)?;
                k += 1;
                continue;
            }
            if token == ":" {
                return Err(Error::unexpected(token));
            }
            let mut key = None;
            if k + 1 < end && self.tokens[k + 1] == ":" {
                key = Some(decode_key(token)?);
                k += 2;
            }
            let value_end = self.value_span(k, end)?;
            let child = self.parse_child(key, k, value_end, depth)?;
            members.items.push(child);
            k = value_end;
            self.expect_separator(k, end)?;
        }
        Ok(())
    }
}
