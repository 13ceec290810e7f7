//! Explicit ownership of GPU-side allocations.
//!
//! GPU handles are not reclaimed when the last CPU reference goes away at a predictable
//! time, so anything that allocates them registers each handle here and releases it
//! through the tracker. Resources are keyed by identity (the `Arc` allocation), never by
//! value: two equal-looking buffers are still two allocations.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Something that owns an explicitly released resource.
///
/// Implementations must tolerate being called more than once; teardown paths often
/// release individually and then in bulk.
pub trait Dispose {
    fn dispose(&self);
}

/// Registry of resources awaiting release.
///
/// Each resource is either tracked or released. `add` after a release starts a fresh,
/// independent tracking. Mutation needs `&mut self`; sharing a tracker across threads
/// means wrapping it in a lock.
pub struct ResourceTracker<T: Dispose + ?Sized> {
    resources: IndexMap<usize, Arc<T>>,
}

impl<T: Dispose + ?Sized> ResourceTracker<T> {
    pub fn new() -> Self {
        Self {
            resources: IndexMap::new(),
        }
    }

    #[inline]
    fn key(resource: &Arc<T>) -> usize {
        Arc::as_ptr(resource).cast::<()>() as usize
    }

    /// Start tracking `resource`. Returns `false` if it was already tracked.
    pub fn add(&mut self, resource: Arc<T>) -> bool {
        let key = Self::key(&resource);
        if self.resources.contains_key(&key) {
            return false;
        }
        self.resources.insert(key, resource);
        true
    }

    pub fn contains(&self, resource: &Arc<T>) -> bool {
        self.resources.contains_key(&Self::key(resource))
    }

    /// Release `resource` and stop tracking it.
    ///
    /// The release is invoked even when the resource is not tracked; membership is
    /// simply left alone in that case.
    pub fn dispose(&mut self, resource: &Arc<T>) {
        resource.dispose();
        if self.resources.shift_remove(&Self::key(resource)).is_none() {
            log::trace!("disposed untracked resource");
        }
    }

    /// Release every tracked resource, in the order they were added, and empty the
    /// tracker. The tracker stays usable afterwards.
    pub fn dispose_all(&mut self) {
        let count = self.resources.len();
        for (_, resource) in self.resources.drain(..) {
            resource.dispose();
        }
        if count > 0 {
            log::debug!("disposed {} tracked resources", count);
        }
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<T: Dispose + ?Sized> Default for ResourceTracker<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Dispose + ?Sized> fmt::Debug for ResourceTracker<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceTracker")
            .field("tracked", &self.resources.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Counted {
        releases: Cell<u32>,
    }

    impl Dispose for Counted {
        fn dispose(&self) {
            self.releases.set(self.releases.get() + 1);
        }
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut tracker = ResourceTracker::new();
        let a = Arc::new(Counted::default());
        assert!(tracker.add(a.clone()));
        assert!(!tracker.add(a.clone()));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_identity_not_value() {
        let mut tracker = ResourceTracker::new();
        tracker.add(Arc::new(Counted::default()));
        tracker.add(Arc::new(Counted::default()));
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_dispose_single_then_again() {
        let mut tracker = ResourceTracker::new();
        let a = Arc::new(Counted::default());
        let b = Arc::new(Counted::default());
        tracker.add(a.clone());
        tracker.add(b.clone());

        tracker.dispose(&a);
        assert_eq!(a.releases.get(), 1);
        assert!(!tracker.contains(&a));
        assert_eq!(tracker.len(), 1);

        // Second release reaches the resource but leaves the tracked set alone.
        tracker.dispose(&a);
        assert_eq!(tracker.len(), 1);
        assert!(tracker.contains(&b));
        assert_eq!(b.releases.get(), 0);
    }

    #[test]
    fn test_dispose_untracked_does_not_panic() {
        let mut tracker: ResourceTracker<Counted> = ResourceTracker::new();
        let stray = Arc::new(Counted::default());
        tracker.dispose(&stray);
        assert_eq!(stray.releases.get(), 1);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_dispose_all_releases_each_once() {
        let mut tracker = ResourceTracker::new();
        let items: Vec<_> = (0..4).map(|_| Arc::new(Counted::default())).collect();
        for item in &items {
            tracker.add(item.clone());
            tracker.add(item.clone());
        }

        tracker.dispose_all();
        assert!(tracker.is_empty());
        for item in &items {
            assert_eq!(item.releases.get(), 1);
        }

        // Reusable after a bulk release.
        let fresh = Arc::new(Counted::default());
        tracker.add(fresh.clone());
        tracker.dispose_all();
        assert_eq!(fresh.releases.get(), 1);
        for item in &items {
            assert_eq!(item.releases.get(), 1);
        }
    }

    #[test]
    fn test_readd_after_release_tracks_again() {
        let mut tracker = ResourceTracker::new();
        let a = Arc::new(Counted::default());
        tracker.add(a.clone());
        tracker.dispose(&a);
        assert!(tracker.add(a.clone()));
        tracker.dispose_all();
        assert_eq!(a.releases.get(), 2);
    }

    #[test]
    fn test_trait_objects() {
        let mut tracker: ResourceTracker<dyn Dispose> = ResourceTracker::new();
        let a = Arc::new(Counted::default());
        let erased: Arc<dyn Dispose> = a.clone();
        tracker.add(erased.clone());
        assert!(!tracker.add(erased));
        tracker.dispose_all();
        assert_eq!(a.releases.get(), 1);
    }
}
