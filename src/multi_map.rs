use std::{borrow::Borrow, collections::HashMap, hash::Hash};

/// A map keeping every value inserted under a key, in insertion order.
#[derive(Debug)]
pub struct MultiMap<K, T>(HashMap<K, Vec<T>>);

impl<K, T> MultiMap<K, T>
where
    K: Eq + Hash,
{
    pub fn new_empty() -> Self {
        Self(HashMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn insert(&mut self, key: K, value: T) {
        self.0.entry(key).or_default().push(value);
    }

    /// The first value inserted under `key`.
    pub fn get_first<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.get(key).and_then(|values| values.first())
    }

    pub fn get_all<Q>(&self, key: &Q) -> Option<&[T]>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.0.get(key).map(|values| values.as_slice())
    }
}

impl<K, T> FromIterator<(K, T)> for MultiMap<K, T>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut mm = Self::new_empty();
        for (k, v) in iter {
            mm.insert(k, v);
        }
        mm
    }
}
