//! Operations that only make sense on arrays.
//!
//! Positions address the anonymous prefix; named entries are never moved,
//! copied or counted here except by `concat`, which copies the receiver whole.

use crate::ast::{Kind, Members, Node};
use crate::error::{Error, Result};

/// Negative positions count back from `size`; the result is clamped to `0..=size`.
fn resolve(position: i64, size: usize) -> usize {
    if position < 0 {
        (position + size as i64).max(0) as usize
    } else {
        (position as usize).min(size)
    }
}

impl Node {
    fn array_members(&self) -> Result<&Members> {
        match &self.kind {
            Kind::Array(members) => Ok(members),
            _ => Err(Error::OperationNotPermitted),
        }
    }

    fn array_members_mut(&mut self) -> Result<&mut Members> {
        match &mut self.kind {
            Kind::Array(members) => Ok(members),
            _ => Err(Error::OperationNotPermitted),
        }
    }

    pub fn get_index(&self, index: usize) -> Result<Option<&Node>> {
        self.get(&index.to_string())
    }

    /// Like [`Node::get_index`], with negative positions counting from the end.
    pub fn at(&self, index: i64) -> Result<Option<&Node>> {
        let members = self.array_members()?;
        let size = members.size() as i64;
        let index = if index < 0 { index + size } else { index };
        if index < 0 || index >= size {
            return Ok(None);
        }
        Ok(members.items.get(index as usize))
    }

    /// Store `value` at `index` as an anonymous item. Ownership moves into
    /// the array, so the subtree can never have two parents.
    pub fn set_at(&mut self, index: usize, mut value: Node) -> Result<&mut Node> {
        let members = self.array_members_mut()?;
        value.key = None;
        Ok(members.put_at(index, value))
    }

    /// Remove `delete_count` items from `start` and insert `items` in their
    /// place, returning the removed items as a new array.
    pub fn splice(&mut self, start: i64, delete_count: usize, items: Vec<Node>) -> Result<Node> {
        let members = self.array_members_mut()?;
        // Named entries cannot be spliced in.
        if items.iter().any(|item| item.key.is_some()) {
            return Err(Error::OperationNotPermitted);
        }
        let size = members.size();
        let start = resolve(start, size);
        let delete_count = delete_count.min(size - start);
        let removed = members
            .items
            .splice(start..start + delete_count, items)
            .collect();
        Ok(Node::array_of(removed))
    }

    /// Remove everything from `start` to the end.
    pub fn splice_from(&mut self, start: i64) -> Result<Node> {
        let size = self.array_members()?.size();
        self.splice(start, size, Vec::new())
    }

    /// Copies of the items in `[start, end)`.
    pub fn slice(&self, start: i64, end: i64) -> Result<Node> {
        let members = self.array_members()?;
        let size = members.size();
        let start = resolve(start, size);
        let end = resolve(end, size);
        let items = if start < end {
            members.items[start..end].to_vec()
        } else {
            Vec::new()
        };
        Ok(Node::array_of(items))
    }

    pub fn slice_from(&self, start: i64) -> Result<Node> {
        let size = self.array_members()?.size();
        self.slice(start, size as i64)
    }

    /// A copy of this array followed by the items of every array in
    /// `others`; any other value is appended as a single item.
    pub fn concat(&self, others: &[Node]) -> Result<Node> {
        let mut members = self.array_members()?.clone();
        for other in others {
            match &other.kind {
                Kind::Array(theirs) => {
                    for item in &theirs.items[..theirs.size()] {
                        members.push_anonymous(item.clone());
                    }
                }
                _ => {
                    let mut item = other.clone();
                    item.key = None;
                    members.push_anonymous(item);
                }
            }
        }
        Ok(Node {
            key: None,
            kind: Kind::Array(members),
        })
    }
}
