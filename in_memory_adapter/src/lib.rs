use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::collections::btree_map::{Iter, Values};

/// Outcome of a failed [`InMemoryRepo::rekey`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RekeyError {
    /// Nothing is stored under the source key
    MissingKey,
    /// Something is already stored under the target key
    KeyTaken,
}

impl std::fmt::Display for RekeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RekeyError::MissingKey => write!(f, "No item stored under the source key"),
            RekeyError::KeyTaken => write!(f, "An item is already stored under the target key"),
        }
    }
}

impl std::error::Error for RekeyError {}

/// Ordered in-memory store. Iteration follows key order.
#[derive(Debug, Clone)]
pub struct InMemoryRepo<T, Id> {
    storage: BTreeMap<Id, T>,
}

impl<T, Id> Default for InMemoryRepo<T, Id> {
    fn default() -> Self {
        Self {
            storage: BTreeMap::new(),
        }
    }
}

impl<T, Id> InMemoryRepo<T, Id>
where
    Id: Clone + Ord,
{
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `item` under `id`, returning whatever was stored there before.
    pub fn insert(&mut self, id: Id, item: T) -> Option<T> {
        self.storage.insert(id, item)
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&T>
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.storage.get(id)
    }

    pub fn get_mut<Q>(&mut self, id: &Q) -> Option<&mut T>
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.storage.get_mut(id)
    }

    pub fn remove<Q>(&mut self, id: &Q) -> Option<T>
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.storage.remove(id)
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.storage.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Id, T> {
        self.storage.iter()
    }

    pub fn values(&self) -> Values<'_, Id, T> {
        self.storage.values()
    }

    /// Moves the item stored under `from` to `to`, letting `update` adjust the
    /// item while it is detached. Either the whole move happens or nothing does:
    /// on error the store is left exactly as it was.
    /// # Errors
    /// - `RekeyError::MissingKey` if nothing is stored under `from`
    /// - `RekeyError::KeyTaken` if `to` is already occupied
    pub fn rekey<Q, F>(&mut self, from: &Q, to: Id, update: F) -> Result<(), RekeyError>
    where
        Id: Borrow<Q>,
        Q: Ord + ?Sized,
        F: FnOnce(&mut T),
    {
        if !self.storage.contains_key(from) {
            return Err(RekeyError::MissingKey);
        }
        if self.storage.contains_key::<Id>(&to) {
            return Err(RekeyError::KeyTaken);
        }
        let mut item = self.storage.remove(from).ok_or(RekeyError::MissingKey)?;
        update(&mut item);
        self.storage.insert(to, item);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> InMemoryRepo<u32, String> {
        let mut repo = InMemoryRepo::new();
        repo.insert("IL".to_string(), 120);
        repo.insert("FM".to_string(), 250);
        repo
    }

    #[test]
    fn test_iteration_follows_key_order() {
        let repo = repo();
        let keys: Vec<&String> = repo.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["FM", "IL"]);
    }

    #[test]
    fn test_rekey_moves_item() {
        let mut repo = repo();
        repo.rekey("IL", "BB".to_string(), |v| *v += 1).unwrap();
        assert!(!repo.contains("IL"));
        assert_eq!(repo.get("BB"), Some(&121));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_rekey_missing_key() {
        let mut repo = repo();
        let result = repo.rekey("XX", "BB".to_string(), |_| {});
        assert_eq!(result, Err(RekeyError::MissingKey));
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_rekey_onto_occupied_key_leaves_store_untouched() {
        let mut repo = repo();
        let result = repo.rekey("IL", "FM".to_string(), |v| *v = 0);
        assert_eq!(result, Err(RekeyError::KeyTaken));
        assert_eq!(repo.get("IL"), Some(&120));
        assert_eq!(repo.get("FM"), Some(&250));
    }
}
