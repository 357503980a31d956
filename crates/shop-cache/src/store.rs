//! Page store backends.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::page::{PageKey, StaticPage};
use crate::CacheError;

/// Storage for generated pages.
pub trait PageStore {
    /// Get a page. Returns `None` if the key doesn't exist.
    fn get(&self, key: &PageKey) -> Result<Option<StaticPage>, CacheError>;

    /// Store a page, replacing any previous one.
    fn set(&self, key: &PageKey, page: &StaticPage) -> Result<(), CacheError>;

    /// Delete a page.
    fn delete(&self, key: &PageKey) -> Result<(), CacheError>;

    /// All stored page keys.
    fn keys(&self) -> Result<Vec<PageKey>, CacheError>;
}

impl<S: PageStore + ?Sized> PageStore for &S {
    fn get(&self, key: &PageKey) -> Result<Option<StaticPage>, CacheError> {
        (**self).get(key)
    }

    fn set(&self, key: &PageKey, page: &StaticPage) -> Result<(), CacheError> {
        (**self).set(key, page)
    }

    fn delete(&self, key: &PageKey) -> Result<(), CacheError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<PageKey>, CacheError> {
        (**self).keys()
    }
}

/// In-memory page store, for tests and offline export.
#[derive(Debug, Default)]
pub struct InMemoryPageStore {
    pages: RefCell<BTreeMap<PageKey, StaticPage>>,
}

impl InMemoryPageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored pages.
    pub fn len(&self) -> usize {
        self.pages.borrow().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.pages.borrow().is_empty()
    }
}

impl PageStore for InMemoryPageStore {
    fn get(&self, key: &PageKey) -> Result<Option<StaticPage>, CacheError> {
        Ok(self.pages.borrow().get(key).cloned())
    }

    fn set(&self, key: &PageKey, page: &StaticPage) -> Result<(), CacheError> {
        self.pages.borrow_mut().insert(key.clone(), page.clone());
        Ok(())
    }

    fn delete(&self, key: &PageKey) -> Result<(), CacheError> {
        self.pages.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<PageKey>, CacheError> {
        Ok(self.pages.borrow().keys().cloned().collect())
    }
}

/// Page store backed by Spin's key-value store.
///
/// Pages are stored as JSON under their page key.
pub struct KvPageStore {
    store: spin_sdk::key_value::Store,
}

impl KvPageStore {
    /// Open the default key-value store.
    pub fn open_default() -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open_default()
            .map_err(|e| CacheError::Open(e.to_string()))?;
        Ok(Self { store })
    }

    /// Open a named key-value store.
    pub fn open(name: &str) -> Result<Self, CacheError> {
        let store = spin_sdk::key_value::Store::open(name)
            .map_err(|e| CacheError::Open(e.to_string()))?;
        Ok(Self { store })
    }
}

impl PageStore for KvPageStore {
    fn get(&self, key: &PageKey) -> Result<Option<StaticPage>, CacheError> {
        match self.store.get(key.as_str()) {
            Ok(Some(bytes)) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Ok(None) => Ok(None),
            Err(e) => Err(CacheError::Store(e.to_string())),
        }
    }

    fn set(&self, key: &PageKey, page: &StaticPage) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(page)?;
        self.store
            .set(key.as_str(), &bytes)
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    fn delete(&self, key: &PageKey) -> Result<(), CacheError> {
        self.store
            .delete(key.as_str())
            .map_err(|e| CacheError::Store(e.to_string()))
    }

    fn keys(&self) -> Result<Vec<PageKey>, CacheError> {
        let keys = self
            .store
            .get_keys()
            .map_err(|e| CacheError::Store(e.to_string()))?;
        Ok(keys.iter().filter_map(|k| PageKey::parse(k)).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{RenderedPage, RevalidatePolicy};

    #[test]
    fn test_in_memory_round_trip() {
        let store = InMemoryPageStore::new();
        let key = PageKey::product("prod_1");
        let page = StaticPage::from_rendered(
            RenderedPage::new("<p>hi</p>", serde_json::Value::Null),
            &RevalidatePolicy::every(Duration::from_secs(60)),
            10,
        );

        assert_eq!(store.get(&key).unwrap(), None);
        store.set(&key, &page).unwrap();
        assert_eq!(store.get(&key).unwrap(), Some(page));
        assert_eq!(store.keys().unwrap(), vec![key.clone()]);

        store.delete(&key).unwrap();
        assert!(store.is_empty());
    }
}
