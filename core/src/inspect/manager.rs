//! Per-type registry cache

use std::any::{Any, TypeId};
use std::sync::{Arc, Mutex};

use hashbrown::HashMap;

use super::data::InspectionData;
use super::declaration::TypeDeclaration;
use super::error::InspectionError;
use crate::config::InspectionConfig;

/// Types that declare their inspectable members
pub trait Inspect: Sized + 'static {
    /// Declare the inspectable members of `Self`
    fn declare() -> TypeDeclaration<Self>;
}

type CachedData = Arc<dyn Any + Send + Sync>;

/// Builds [`InspectionData`] once per type and hands out shared handles
pub struct InspectionManager {
    config: InspectionConfig,
    cache: Mutex<HashMap<TypeId, CachedData>>,
}

impl Default for InspectionManager {
    fn default() -> Self {
        Self::new(InspectionConfig::default())
    }
}

impl InspectionManager {
    pub fn new(config: InspectionConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Configuration registries are built with
    pub fn config(&self) -> &InspectionConfig {
        &self.config
    }

    /// Registry of `T`, built on first use.
    ///
    /// # Errors
    ///
    /// Returns the construction fault if the declaration of `T` is invalid.
    /// Failed builds are not cached.
    pub fn data<T: Inspect>(&self) -> Result<Arc<InspectionData<T>>, InspectionError> {
        let key = TypeId::of::<T>();
        // A poisoned cache still holds only fully built entries
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(cached) = cache.get(&key)
            && let Ok(data) = Arc::clone(cached).downcast::<InspectionData<T>>()
        {
            tracing::debug!("Inspection data cache hit: {}", data.type_name());
            return Ok(data);
        }

        let data = Arc::new(InspectionData::with_config(T::declare(), &self.config)?);
        cache.insert(key, data.clone());
        Ok(data)
    }

    /// Number of cached registries
    pub fn cached_types(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or_else(|e| e.into_inner().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::{FieldRef, MethodRef};
    use crate::test_utils::{Entity, Robot};

    #[test]
    fn test_registry_is_built_once() {
        let manager = InspectionManager::default();

        let first = manager.data::<Robot>().unwrap();
        let second = manager.data::<Robot>().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        manager.data::<Entity>().unwrap();
        assert_eq!(manager.cached_types(), 2);
    }

    #[test]
    fn test_build_faults_are_not_cached() {
        struct Broken {
            level: i32,
        }

        impl Inspect for Broken {
            fn declare() -> TypeDeclaration<Self> {
                TypeDeclaration::new()
                    .field(FieldRef::new("level", |b: &Broken| &b.level, |b: &mut Broken| &mut b.level))
                    .attribute(MethodRef::call1("setHeight", |b: &mut Broken, v: i32| b.level = v))
            }
        }

        let manager = InspectionManager::default();
        let err = manager.data::<Broken>().unwrap_err();
        assert!(matches!(err, InspectionError::OrphanSetter { .. }));
        assert_eq!(manager.cached_types(), 0);
        assert!(manager.data::<Broken>().is_err());
    }

    #[test]
    fn test_manager_config_is_applied() {
        struct Twice {
            a: i32,
        }

        impl Inspect for Twice {
            fn declare() -> TypeDeclaration<Self> {
                TypeDeclaration::new()
                    .field(FieldRef::new("a", |t: &Twice| &t.a, |t: &mut Twice| &mut t.a))
                    .field(FieldRef::new("b", |t: &Twice| &t.a, |t: &mut Twice| &mut t.a).named("a"))
            }
        }

        assert!(InspectionManager::default().data::<Twice>().is_err());

        let manager = InspectionManager::new(InspectionConfig {
            duplicate_names: crate::config::DuplicateNamePolicy::LastWins,
            ..InspectionConfig::default()
        });
        let data = manager.data::<Twice>().unwrap();
        assert_eq!(data.attribute_names(), ["a"]);
        assert_eq!(data.attribute("a").unwrap().field().unwrap().name(), "b");
    }
}
