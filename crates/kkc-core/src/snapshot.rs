use std::sync::{Arc, PoisonError, RwLock};

/// Copy-on-write cell for state that conversions read while users edit it.
///
/// Readers take an `Arc` snapshot and never observe a half-applied write.
/// Writers mutate through `Arc::make_mut`, which clones the map only while a
/// snapshot of the previous version is still alive.
pub(crate) struct SnapshotCell<T> {
    inner: RwLock<Arc<T>>,
}

impl<T: Clone> SnapshotCell<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(Arc::new(value)),
        }
    }

    pub(crate) fn load(&self) -> Arc<T> {
        Arc::clone(&self.inner.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(Arc::make_mut(&mut guard))
    }
}

impl<T: Clone + Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
