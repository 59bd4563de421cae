use crate::Error;
use serde::{
    de::{self, DeserializeOwned},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::Value;
use std::collections::{btree_map, BTreeMap};

/// Custom members of an [`Extensible`] node.
///
/// Members can be read freely. They can only be added through [`Extensible::put`], which
/// guarantees that no custom member shadows a known one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Members(BTreeMap<String, Value>);

impl Members {
    pub(crate) fn insert(&mut self, key: String, value: Value) {
        self.0.insert(key, value);
    }

    /// Value of the custom member `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate over all custom members in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Names of all custom members in key order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Number of custom members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no custom members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Members {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

pub(crate) mod sealed {
    use super::Members;

    /// Write access to the custom members, limited to nodes defined in this crate.
    pub trait Sealed {
        /// Mutable access to the custom members.
        fn members_mut(&mut self) -> &mut Members;
    }
}

use sealed::Sealed;

/// A payload node that carries a fixed set of known members next to arbitrary custom ones.
///
/// Known members are typed fields, set once when the node is created and exposed through
/// dedicated accessors. Custom members may be added later with [`put`](Extensible::put),
/// which never modifies the node it is called on. The trait is sealed: only the nodes in
/// this crate implement it, and custom members cannot be changed other than through `put`:
///
/// ```compile_fail
/// use rollbar_reporter::models::{Extensible, Message};
///
/// let mut message = Message::new("hello").unwrap();
/// message.members_mut();
/// ```
pub trait Extensible: Clone + Sealed {
    /// Names of the known members, in serialization order.
    const KNOWN_KEYS: &'static [&'static str];

    /// JSON value of the known member `key`, if it is set.
    fn known_value(&self, key: &str) -> Option<Value>;

    /// The custom members.
    fn members(&self) -> &Members;

    /// Returns `true` if `key` names a known member.
    fn is_known(key: &str) -> bool {
        Self::KNOWN_KEYS.contains(&key)
    }

    /// Names of the known members.
    fn known_keys(&self) -> &'static [&'static str] {
        Self::KNOWN_KEYS
    }

    /// Value of the member `key`, known or custom.
    fn get(&self, key: &str) -> Option<Value> {
        if Self::is_known(key) {
            self.known_value(key)
        } else {
            self.members().get(key).cloned()
        }
    }

    /// Return a copy of this node with the custom member `key` set to `value`.
    ///
    /// Fails with [`Error::ReservedKey`] if `key` names a known member.
    fn put(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<Self, Error> {
        let key = key.into();
        if Self::is_known(&key) {
            return Err(Error::ReservedKey(key));
        }
        let mut copy = self.clone();
        copy.members_mut().insert(key, value.into());
        Ok(copy)
    }
}

/// Put every entry of `members` into `node`, failing on the first known key.
pub(crate) fn put_all<E: Extensible>(
    mut node: E,
    members: impl IntoIterator<Item = (String, Value)>,
) -> Result<E, Error> {
    for (key, value) in members {
        if E::is_known(&key) {
            return Err(Error::ReservedKey(key));
        }
        node.members_mut().insert(key, value);
    }
    Ok(node)
}

/// Serialize the node as one flat object: known members first (in declared order, skipping
/// unset ones), then custom members in key order.
pub(crate) fn serialize_extensible<E, S>(node: &E, serializer: S) -> Result<S::Ok, S::Error>
where
    E: Extensible,
    S: Serializer,
{
    let known: Vec<(&str, Value)> = E::KNOWN_KEYS
        .iter()
        .filter_map(|key| {
            node.known_value(key)
                .filter(|value| !value.is_null())
                .map(|value| (*key, value))
        })
        .collect();
    let mut map = serializer.serialize_map(Some(known.len() + node.members().len()))?;
    for (key, value) in &known {
        map.serialize_entry(key, value)?;
    }
    for (key, value) in node.members() {
        if !E::is_known(key) {
            map.serialize_entry(key, value)?;
        }
    }
    map.end()
}

/// Known members split off a deserialized extensible object.
pub(crate) struct KnownMembers(BTreeMap<String, Value>);

impl KnownMembers {
    pub(crate) fn take<T, E>(&mut self, key: &str) -> Result<Option<T>, E>
    where
        T: DeserializeOwned,
        E: de::Error,
    {
        match self.0.remove(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(E::custom),
        }
    }
}

pub(crate) fn deserialize_extensible<'de, D>(
    deserializer: D,
    known_keys: &[&str],
) -> Result<(KnownMembers, Members), D::Error>
where
    D: Deserializer<'de>,
{
    let all = BTreeMap::<String, Value>::deserialize(deserializer)?;
    let (known, custom): (BTreeMap<_, _>, BTreeMap<_, _>) = all
        .into_iter()
        .partition(|(key, _)| known_keys.contains(&key.as_str()));
    Ok((KnownMembers(known), Members(custom)))
}

impl Serialize for Members {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}
