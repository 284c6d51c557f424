//! Name-keyed inspection registries

use hashbrown::HashMap;

use super::access_point::AccessPoint;
use super::member::MethodRef;
use crate::config::DuplicateNamePolicy;

/// Entries keyed by display name, kept in declaration order
pub(crate) struct NameIndex<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> NameIndex<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Insert under `name`.
    ///
    /// Returns false if the name is taken and `policy` rejects duplicates.
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, name: String, value: V, policy: DuplicateNamePolicy) -> bool {
        match self.index.get(&name) {
            Some(&idx) => match policy {
                DuplicateNamePolicy::Reject => false,
                DuplicateNamePolicy::LastWins => {
                    self.entries[idx].1 = value;
                    true
                }
            },
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.index.get(name).map(|&idx| &self.entries[idx].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}

/// Resolved attributes and methods of one type
pub(crate) struct Registry<T> {
    pub attributes: NameIndex<AccessPoint<T>>,
    pub methods: NameIndex<MethodRef<T>>,
}

impl<T> Registry<T> {
    pub fn new() -> Self {
        Self {
            attributes: NameIndex::new(),
            methods: NameIndex::new(),
        }
    }
}
