//
// Copyright 2020 bplist Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! Linearizes a `Plist` graph into the object table of a document.
//!
//! The table is produced in depth-first order starting with the root at index 0.
//! Every handle is added to the table once, no matter how many times it is
//! referenced. A container's slot is reserved before any of its members are
//! visited, so a container reachable from itself resolves to its own index.
//! Traversal uses an explicit stack and never recurses.
//!
//! Dictionary keys are compared by their string form. A dictionary holding the
//! same key twice is rejected with `Error::DuplicateKey`.

use std::collections::BTreeSet;
use std::vec;

use crate::error::{Error, Result};
use crate::object::{ObjectId, Plist, Value};

/// An entry of the object table.
#[derive(Debug, PartialEq)]
pub enum FlatObject<'a> {
    /// A non-container value borrowed from the property list.
    Scalar(&'a Value),
    /// A dictionary key converted to a string.
    Key(String),
    /// An array of object table indices.
    Array(Vec<usize>),
    /// A set of object table indices, in traversal order.
    Set(Vec<usize>),
    /// Parallel blocks of key and value object table indices.
    Dictionary {
        keys: Vec<usize>,
        values: Vec<usize>,
    },
}

/// A member of a container awaiting a visit.
#[derive(Copy, Clone, Debug)]
enum Member {
    /// An array or set element.
    Element(ObjectId),
    /// A dictionary key.
    Key(ObjectId),
    /// A dictionary value.
    Value(ObjectId),
}

/// A container whose members are being visited.
struct Frame {
    slot: usize,
    pending: vec::IntoIter<Member>,
    /// Keys of a dictionary visited so far.
    keys: BTreeSet<String>,
}

/// The string form of a dictionary key.
enum KeyText<'a> {
    /// A string key, which keeps its identity.
    Shared(&'a str),
    /// A scalar key converted to a new string.
    Coerced(String),
}

impl KeyText<'_> {
    fn as_str(&self) -> &str {
        match self {
            KeyText::Shared(text) => *text,
            KeyText::Coerced(text) => text.as_str(),
        }
    }
}

/// Converts a dictionary key to its string form.
///
/// Integers and booleans are written in decimal and as `true` or `false`. Reals
/// keep a fractional part, so `1.0` becomes `"1.0"` and stays distinct from `1`.
fn key_text(plist: &Plist, id: ObjectId) -> Result<KeyText<'_>> {
    let text = match plist.get(id).ok_or(Error::InvalidObjectReference)? {
        Value::String(text) =>
            return Ok(KeyText::Shared(text)),
        Value::Integer(value) =>
            value.to_string(),
        Value::Real(value) =>
            format!("{:?}", value.into_inner()),
        Value::Boolean(value) =>
            value.to_string(),
        other =>
            return Err(Error::KeyNotCoercible(other.kind())),
    };
    Ok(KeyText::Coerced(text))
}

/// Flattens the graph reachable from `root` into an object table.
pub fn flatten(plist: &Plist, root: ObjectId) -> Result<Vec<FlatObject<'_>>> {
    let mut flattener = Flattener {
        plist,
        table: Vec::new(),
        slots: vec![None; plist.len()],
        stack: Vec::new(),
    };

    flattener.visit(root)?;

    while let Some(frame) = flattener.stack.last_mut() {
        let slot = frame.slot;
        let member = match frame.pending.next() {
            Some(member) => member,
            None => {
                flattener.stack.pop();
                continue;
            }
        };

        let index = match member {
            Member::Element(id) | Member::Value(id) => flattener.visit(id)?,
            Member::Key(id) => {
                let key = key_text(flattener.plist, id)?;
                if !frame.keys.insert(key.as_str().to_owned()) {
                    return Err(Error::DuplicateKey(key.as_str().to_owned()));
                }
                flattener.visit_key(id, key)?
            }
        };

        match (&mut flattener.table[slot], member) {
            (FlatObject::Array(references), Member::Element(_)) |
            (FlatObject::Set(references), Member::Element(_)) |
            (FlatObject::Dictionary { keys: references, .. }, Member::Key(_)) |
            (FlatObject::Dictionary { values: references, .. }, Member::Value(_)) =>
                references.push(index),
            (entry, member) =>
                unreachable!("member {:?} pending for {:?}", member, entry),
        }
    }

    Ok(flattener.table)
}

struct Flattener<'a> {
    plist: &'a Plist,
    /// The object table under construction.
    table: Vec<FlatObject<'a>>,
    /// The object table index of each arena slot, once visited.
    slots: Vec<Option<usize>>,
    /// Containers whose members have not all been visited.
    stack: Vec<Frame>,
}

impl<'a> Flattener<'a> {

    /// Looks up a handle in the property list.
    fn value_of(&self, id: ObjectId) -> Result<&'a Value> {
        self.plist.get(id).ok_or(Error::InvalidObjectReference)
    }

    /// Appends an entry to the object table and returns its index.
    fn append(&mut self, object: FlatObject<'a>) -> usize {
        self.table.push(object);
        self.table.len() - 1
    }

    /// Returns the table index of the value, adding it to the table on first visit.
    /// A container on first visit is scheduled to have its members visited.
    fn visit(&mut self, id: ObjectId) -> Result<usize> {
        let value = self.value_of(id)?;
        if let Some(index) = self.slots[id.index()] {
            return Ok(index);
        }

        let (object, members): (FlatObject<'a>, Vec<Member>) = match value {
            Value::Array(elements) => (
                FlatObject::Array(Vec::with_capacity(elements.len())),
                elements.iter().cloned().map(Member::Element).collect(),
            ),
            Value::Set(elements) => (
                FlatObject::Set(Vec::with_capacity(elements.len())),
                elements.iter().cloned().map(Member::Element).collect(),
            ),
            Value::Dictionary(entries) => (
                FlatObject::Dictionary {
                    keys: Vec::with_capacity(entries.len()),
                    values: Vec::with_capacity(entries.len()),
                },
                entries.iter()
                    .flat_map(|&(key, item)| vec![Member::Key(key), Member::Value(item)])
                    .collect(),
            ),
            scalar => (FlatObject::Scalar(scalar), Vec::new()),
        };

        // The slot is recorded before any member is visited.
        let index = self.append(object);
        self.slots[id.index()] = Some(index);
        if !members.is_empty() {
            self.stack.push(Frame {
                slot: index,
                pending: members.into_iter(),
                keys: BTreeSet::new(),
            });
        }
        Ok(index)
    }

    /// Returns the table index of a dictionary key. String keys keep their identity,
    /// other scalar keys are added as a new string on every use.
    fn visit_key(&mut self, id: ObjectId, key: KeyText<'a>) -> Result<usize> {
        match key {
            KeyText::Shared(_) => self.visit(id),
            KeyText::Coerced(text) => Ok(self.append(FlatObject::Key(text))),
        }
    }

}
