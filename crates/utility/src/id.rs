use std::{cmp, fmt, hash, marker::PhantomData};

use serde::{Deserialize, Serialize};

pub trait HasId {
    type IdType;
}

/// Id of a `T`, typed so ids of different subjects can not be mixed up.
pub struct Id<T: HasId>(T::IdType, PhantomData<T>);

impl<T: HasId> Id<T> {
    pub fn new(inner: T::IdType) -> Self {
        Self(inner, PhantomData)
    }
}

impl<T: HasId> Id<T>
where
    T::IdType: Clone,
{
    pub fn raw(&self) -> T::IdType {
        self.0.clone()
    }
}

/// Hands out millisecond timestamps as ids. Two calls within the same
/// millisecond (or a clock jumping backwards) still yield increasing values.
#[derive(Debug, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure ids already present (e.g. loaded from storage) are never
    /// handed out again.
    pub fn observe(&mut self, id: i64) {
        self.last = cmp::max(self.last, id);
    }

    pub fn next(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last = cmp::max(now, self.last + 1);
        self.last
    }

    pub fn next_id<T: HasId<IdType = i64>>(&mut self) -> Id<T> {
        Id::new(self.next())
    }
}

impl<T: HasId> Default for Id<T>
where
    T::IdType: Default,
{
    fn default() -> Self {
        Self(Default::default(), PhantomData)
    }
}

impl<T: HasId> fmt::Debug for Id<T>
where
    T::IdType: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Id").field(&self.0).finish()
    }
}

impl<T: HasId> fmt::Display for Id<T>
where
    T::IdType: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: HasId> Clone for Id<T>
where
    T::IdType: Clone,
{
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T: HasId> Copy for Id<T> where T::IdType: Copy {}

impl<T: HasId> hash::Hash for Id<T>
where
    T::IdType: hash::Hash,
{
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state)
    }
}

impl<T: HasId> PartialEq for Id<T>
where
    T::IdType: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl<T: HasId> Eq for Id<T> where T::IdType: Eq {}

impl<T: HasId> PartialOrd for Id<T>
where
    T::IdType: Ord,
{
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: HasId> Ord for Id<T>
where
    T::IdType: Ord,
{
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl<'de, T: HasId> Deserialize<'de> for Id<T>
where
    T::IdType: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::IdType::deserialize(deserializer).map(Id::new)
    }
}

impl<T: HasId> Serialize for Id<T>
where
    T::IdType: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Thing;

    impl HasId for Thing {
        type IdType = i64;
    }

    #[test]
    fn clock_is_strictly_increasing() {
        let mut clock = IdClock::new();
        let ids: Vec<i64> = (0..100).map(|_| clock.next()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn clock_skips_observed_ids() {
        let mut clock = IdClock::new();
        let far_future = chrono::Utc::now().timestamp_millis() + 1_000_000;
        clock.observe(far_future);
        let id: Id<Thing> = clock.next_id();
        assert_eq!(id.raw(), far_future + 1);
    }

    #[test]
    fn id_serializes_as_its_inner_value() {
        let id: Id<Thing> = Id::new(1712345678901);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "1712345678901");
        let back: Id<Thing> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
