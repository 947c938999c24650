use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SHARED_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`SharedValue`], used to declare mapper inputs and outputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SharedId(pub u64);

type Listener<T> = Rc<dyn Fn(&T)>;

struct SharedInner<T> {
    id: SharedId,
    value: RefCell<T>,
    listeners: RefCell<Vec<Listener<T>>>,
}

/// Mutable cell with observable get/set, shared between the frame lane and its collaborators.
///
/// Clones share the same cell. Listeners run after the value has been stored and never while the
/// cell is borrowed, so a listener may read the value back.
pub struct SharedValue<T> {
    inner: Rc<SharedInner<T>>,
}

impl<T> Clone for SharedValue<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedValue")
            .field("id", &self.inner.id)
            .field("value", &self.inner.value.borrow())
            .finish()
    }
}

impl<T: Clone> SharedValue<T> {
    /// Create a cell holding `value`.
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SharedInner {
                id: SharedId(NEXT_SHARED_ID.fetch_add(1, Ordering::Relaxed)),
                value: RefCell::new(value),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Identity of the underlying cell.
    pub fn id(&self) -> SharedId {
        self.inner.id
    }

    /// Clone out the current value.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Store `value` and notify listeners.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Modify the value in place and notify listeners.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Register a listener invoked after every `set`/`update`.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn notify(&self) {
        let listeners = self.inner.listeners.borrow().clone();
        if listeners.is_empty() {
            return;
        }
        let snapshot = self.get();
        for l in listeners {
            l(&snapshot);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/shared.rs"]
mod tests;
