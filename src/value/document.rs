use std::{ops::Index, slice};

use crate::BsonValue;

/// An insertion-ordered BSON document.
///
/// Keys are unique: inserting an existing key replaces its value in place and
/// keeps the original position.
///
/// # Example
///
/// ```
/// use na_bson::{BsonValue, Document};
///
/// let mut doc = Document::new();
/// doc.insert("a", 1);
/// doc.insert("b", vec![2, 3]);
/// doc.insert("a", 10);
///
/// assert_eq!(doc.len(), 2);
/// assert_eq!(doc.keys().collect::<Vec<_>>(), ["a", "b"]);
/// assert_eq!(doc.get("a"), Some(&BsonValue::Int32(10)));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    entries: Vec<(String, BsonValue)>,
}

impl Document {
    #[inline]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts `value` under `key`, returning the previous value if the key
    /// was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<BsonValue>) -> Option<BsonValue> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style [`insert`](Self::insert).
    #[inline]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<BsonValue>) -> Self {
        self.insert(key, value);
        self
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&BsonValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<BsonValue> {
        let position = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(position).1)
    }

    #[inline]
    pub fn iter(&self) -> DocumentIter<'_> {
        DocumentIter {
            inner: self.entries.iter(),
        }
    }

    #[inline]
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[inline]
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &BsonValue> + ExactSizeIterator {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Borrowing iterator over a document's `(name, value)` pairs.
#[derive(Clone, Debug)]
pub struct DocumentIter<'a> {
    inner: slice::Iter<'a, (String, BsonValue)>,
}

impl<'a> Iterator for DocumentIter<'a> {
    type Item = (&'a str, &'a BsonValue);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for DocumentIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, v)| (k.as_str(), v))
    }
}

impl ExactSizeIterator for DocumentIter<'_> {}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a str, &'a BsonValue);
    type IntoIter = DocumentIter<'a>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Document {
    type Item = (String, BsonValue);
    type IntoIter = std::vec::IntoIter<(String, BsonValue)>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<BsonValue>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        doc.extend(iter);
        doc
    }
}

impl<K: Into<String>, V: Into<BsonValue>> Extend<(K, V)> for Document {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl Index<&str> for Document {
    type Output = BsonValue;

    /// # Panics
    ///
    /// Panics if `key` is not present.
    #[inline]
    fn index(&self, key: &str) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("no entry found for key {key:?}"),
        }
    }
}
