//! Name-keyed cache of inspected objects
//!
//! Each entry holds one strong reference to its object. Other holders
//! (viewers, the presentation layer) keep their own references; the object
//! is released once every holder, the cache included, has let go.

use indexmap::IndexMap;
use ov_core::{same_object, InterfaceDescriptor, ObjectRef};
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

/// An object kept alive for an open session
#[derive(Clone)]
pub struct CachedObject {
    pub name: String,
    pub object: ObjectRef,
    pub interfaces: Vec<InterfaceDescriptor>,
}

impl fmt::Debug for CachedObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachedObject")
            .field("name", &self.name)
            .field("interfaces", &self.interfaces.len())
            .finish_non_exhaustive()
    }
}

type CacheMap = IndexMap<String, CachedObject>;

#[derive(Default)]
pub struct ObjectCache {
    entries: RwLock<CacheMap>,
}

impl ObjectCache {
    pub fn new() -> Self {
        Self::default()
    }

    // The map is never left half-updated, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, CacheMap> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheMap> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cache an object under `name`.
    ///
    /// An existing entry with the same name is replaced and its reference
    /// released. Returns true when an entry was displaced.
    pub fn add(
        &self,
        name: impl Into<String>,
        object: ObjectRef,
        interfaces: Vec<InterfaceDescriptor>,
    ) -> bool {
        let name = name.into();
        let entry = CachedObject {
            name: name.clone(),
            object,
            interfaces,
        };

        let displaced = self.write().insert(name.clone(), entry);

        match displaced {
            Some(previous) => {
                warn!("Replaced cached object '{}'", name);
                // Release outside the lock.
                drop(previous);
                true
            }
            None => {
                debug!("Cached object '{}'", name);
                false
            }
        }
    }

    /// Remove the first entry holding `object`. Absent objects are a no-op.
    pub fn remove(&self, object: &ObjectRef) -> bool {
        let removed = {
            let mut entries = self.write();
            let position = entries
                .values()
                .position(|entry| same_object(&entry.object, object));
            position.and_then(|index| entries.shift_remove_index(index))
        };

        match removed {
            Some((name, _entry)) => {
                debug!("Released cached object '{}'", name);
                true
            }
            None => {
                debug!("Object not in cache, nothing to release");
                false
            }
        }
    }

    /// Remove the entry named `name`. Absent names are a no-op.
    pub fn remove_named(&self, name: &str) -> bool {
        let removed = self.write().shift_remove(name);
        if removed.is_some() {
            debug!("Released cached object '{}'", name);
        }
        removed.is_some()
    }

    /// Remove the entry named `name` only while it still holds `object`.
    ///
    /// A same-name entry that replaced it, or an entry for the same object
    /// under another name, is left alone.
    pub fn remove_entry(&self, name: &str, object: &ObjectRef) -> bool {
        let removed = {
            let mut entries = self.write();
            match entries.get(name) {
                Some(entry) if same_object(&entry.object, object) => entries.shift_remove(name),
                _ => None,
            }
        };

        match removed {
            Some(_entry) => {
                debug!("Released cached object '{}'", name);
                true
            }
            None => {
                debug!("No cached entry '{}' for this object", name);
                false
            }
        }
    }

    /// Re-obtain an object by session name
    pub fn lookup(&self, name: &str) -> Option<CachedObject> {
        self.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ov_core::guid::{IID_IDISPATCH, IID_IUNKNOWN};
    use ov_core::{Error, Guid, InspectableObject, InterfaceRef, Result};
    use std::sync::Arc;

    struct Dummy;

    impl InspectableObject for Dummy {
        fn query_interface(&self, iid: &Guid) -> Result<InterfaceRef<'_>> {
            Err(Error::NoInterface(*iid))
        }
    }

    fn object() -> ObjectRef {
        Arc::new(Dummy)
    }

    fn interfaces() -> Vec<InterfaceDescriptor> {
        vec![InterfaceDescriptor::new(IID_IUNKNOWN, "IUnknown")]
    }

    #[test]
    fn test_add_and_lookup() {
        let cache = ObjectCache::new();
        let obj = object();
        assert!(!cache.add("calc", Arc::clone(&obj), interfaces()));

        let entry = cache.lookup("calc").unwrap();
        assert!(same_object(&entry.object, &obj));
        assert_eq!(entry.interfaces.len(), 1);
        assert!(cache.lookup("other").is_none());
    }

    #[test]
    fn test_add_holds_exactly_one_reference() {
        let cache = ObjectCache::new();
        let obj = object();
        cache.add("calc", Arc::clone(&obj), interfaces());
        assert_eq!(Arc::strong_count(&obj), 2);

        assert!(cache.remove(&obj));
        assert_eq!(Arc::strong_count(&obj), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_name_collision_releases_previous() {
        let cache = ObjectCache::new();
        let first = object();
        let second = object();

        cache.add("calc", Arc::clone(&first), interfaces());
        let displaced = cache.add(
            "calc",
            Arc::clone(&second),
            vec![InterfaceDescriptor::new(IID_IDISPATCH, "IDispatch")],
        );

        assert!(displaced);
        assert_eq!(Arc::strong_count(&first), 1);
        assert_eq!(Arc::strong_count(&second), 2);
        assert_eq!(cache.len(), 1);

        let entry = cache.lookup("calc").unwrap();
        assert!(same_object(&entry.object, &second));
        assert_eq!(entry.interfaces[0].iid, IID_IDISPATCH);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let cache = ObjectCache::new();
        let cached = object();
        let stranger = object();
        cache.add("calc", Arc::clone(&cached), interfaces());

        assert!(!cache.remove(&stranger));
        assert!(!cache.remove_named("missing"));
        assert_eq!(cache.len(), 1);
        assert_eq!(Arc::strong_count(&cached), 2);
    }

    #[test]
    fn test_double_remove_releases_once() {
        let cache = ObjectCache::new();
        let obj = object();
        cache.add("calc", Arc::clone(&obj), interfaces());

        assert!(cache.remove(&obj));
        assert!(!cache.remove(&obj));
        assert_eq!(Arc::strong_count(&obj), 1);
    }

    #[test]
    fn test_remove_takes_first_match_only() {
        let cache = ObjectCache::new();
        let obj = object();
        cache.add("first", Arc::clone(&obj), interfaces());
        cache.add("second", Arc::clone(&obj), interfaces());
        assert_eq!(Arc::strong_count(&obj), 3);

        assert!(cache.remove(&obj));
        assert_eq!(cache.names(), vec!["second".to_string()]);
        assert_eq!(Arc::strong_count(&obj), 2);
    }

    #[test]
    fn test_remove_entry_matches_name_and_object() {
        let cache = ObjectCache::new();
        let shared = object();
        let other = object();
        cache.add("first", Arc::clone(&shared), interfaces());
        cache.add("second", Arc::clone(&shared), interfaces());
        cache.add("third", Arc::clone(&other), interfaces());

        assert!(!cache.remove_entry("third", &shared));
        assert!(!cache.remove_entry("missing", &shared));
        assert!(cache.remove_entry("second", &shared));
        assert!(!cache.remove_entry("second", &shared));

        assert_eq!(cache.names(), vec!["first".to_string(), "third".to_string()]);
        assert_eq!(Arc::strong_count(&shared), 2);
    }

    #[test]
    fn test_live_references_track_present_names() {
        let cache = ObjectCache::new();
        let objects: Vec<ObjectRef> = (0..4).map(|_| object()).collect();
        let held = |objects: &[ObjectRef]| -> usize {
            objects.iter().map(|o| Arc::strong_count(o) - 1).sum()
        };

        cache.add("a", Arc::clone(&objects[0]), interfaces());
        cache.add("b", Arc::clone(&objects[1]), interfaces());
        cache.add("a", Arc::clone(&objects[2]), interfaces());
        assert_eq!(held(&objects), cache.len());

        cache.remove(&objects[0]);
        cache.remove(&objects[1]);
        cache.add("c", Arc::clone(&objects[3]), interfaces());
        assert_eq!(held(&objects), cache.len());

        cache.remove_named("a");
        cache.remove_named("c");
        assert_eq!(held(&objects), 0);
        assert!(cache.is_empty());
    }
}
