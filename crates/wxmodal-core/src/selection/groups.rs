//! Ordered, named groups of codes.
//!
//! Order carries meaning twice over: groups declared earlier win ties between
//! groups, and codes listed earlier win ties inside a group.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::series::Code;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    /// Member codes in tie-break priority order.
    pub members: Vec<Code>,
}

impl Group {
    pub fn new(name: impl Into<String>, members: Vec<Code>) -> Self {
        Self { name: name.into(), members }
    }

    pub fn contains(&self, code: Code) -> bool {
        self.members.contains(&code)
    }
}

/// Groups in priority order. Serialises as a JSON object whose key order is
/// the priority order.
///
/// Deserialise from JSON text, not from a `serde_json::Value`: without
/// serde_json's `preserve_order` feature a `Value` object sorts its keys and
/// the priority order is lost.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupDefinitionSet {
    groups: Vec<Group>,
}

impl GroupDefinitionSet {
    pub fn new(groups: Vec<Group>) -> Self {
        Self { groups }
    }

    /// Build from `(name, members)` pairs, first pair highest priority.
    pub fn from_pairs<N, I>(pairs: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<Code>)>,
    {
        Self {
            groups: pairs.into_iter().map(|(n, m)| Group::new(n, m)).collect(),
        }
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Index of the first group listing `code`.
    pub fn group_of(&self, code: Code) -> Option<usize> {
        self.groups.iter().position(|g| g.contains(code))
    }

    /// Same groups with the declaration order reversed.
    pub fn with_reversed_priority(&self) -> Self {
        Self { groups: self.groups.iter().rev().cloned().collect() }
    }

    /// Same groups with every member list reversed.
    pub fn with_reversed_members(&self) -> Self {
        Self {
            groups: self
                .groups
                .iter()
                .map(|g| Group::new(g.name.clone(), g.members.iter().rev().copied().collect()))
                .collect(),
        }
    }
}

impl Serialize for GroupDefinitionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for g in &self.groups {
            map.serialize_entry(&g.name, &g.members)?;
        }
        map.end()
    }
}

struct GroupSetVisitor;

impl<'de> Visitor<'de> for GroupSetVisitor {
    type Value = GroupDefinitionSet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of group name to a list of weather codes")
    }

    // Entries arrive in document order, which is the priority order.
    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut groups = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, members)) = access.next_entry::<String, Vec<Code>>()? {
            groups.push(Group::new(name, members));
        }
        Ok(GroupDefinitionSet { groups })
    }
}

impl<'de> Deserialize<'de> for GroupDefinitionSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GroupSetVisitor)
    }
}
