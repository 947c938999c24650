use crate::binding::producer::ProducerCaps;
use crate::foundation::core::Timestamp;
use crate::foundation::error::{RestyleError, RestyleResult};
use crate::foundation::shared::{SharedId, SharedValue};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use tracing::warn;

/// Re-run entry point handed to the mapper runtime.
pub type MapperFn = Box<dyn FnMut(Option<Timestamp>) -> RestyleResult<()>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MapperId(pub u64);

/// Registration metadata forwarded with every mapper.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapperMetadata {
    pub name: String,
    pub caps: ProducerCaps,
}

/// Reactive runtime that re-invokes mappers when one of their inputs changes.
pub trait MapperRuntime {
    fn register(
        &self,
        update: MapperFn,
        inputs: Vec<SharedId>,
        outputs: Vec<SharedId>,
        metadata: MapperMetadata,
    ) -> MapperId;

    fn unregister(&self, id: MapperId);
}

struct MapperEntry {
    update: Rc<RefCell<MapperFn>>,
    inputs: Vec<SharedId>,
    outputs: Vec<SharedId>,
    metadata: MapperMetadata,
}

/// Single-lane [`MapperRuntime`] driven by explicit notifications.
///
/// Mappers run in registration order. A mapper that is already running when one of its inputs
/// changes is not re-entered; the change is dropped with a warning.
#[derive(Default)]
pub struct LocalMapperRuntime {
    next_id: Cell<u64>,
    mappers: RefCell<BTreeMap<MapperId, MapperEntry>>,
}

impl std::fmt::Debug for LocalMapperRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalMapperRuntime")
            .field("mappers", &self.len())
            .finish()
    }
}

impl LocalMapperRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.mappers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metadata(&self, id: MapperId) -> Option<MapperMetadata> {
        self.mappers.borrow().get(&id).map(|e| e.metadata.clone())
    }

    pub fn inputs(&self, id: MapperId) -> Option<Vec<SharedId>> {
        self.mappers.borrow().get(&id).map(|e| e.inputs.clone())
    }

    pub fn outputs(&self, id: MapperId) -> Option<Vec<SharedId>> {
        self.mappers.borrow().get(&id).map(|e| e.outputs.clone())
    }

    /// Re-run every mapper that declared `input`. Returns the first error; later mappers still run.
    pub fn notify(&self, input: SharedId, now: Option<Timestamp>) -> RestyleResult<()> {
        let due: Vec<_> = self
            .mappers
            .borrow()
            .iter()
            .filter(|(_, e)| e.inputs.contains(&input))
            .map(|(id, e)| (*id, Rc::clone(&e.update)))
            .collect();
        run(due, now)
    }

    /// Re-run every registered mapper.
    pub fn run_all(&self, now: Option<Timestamp>) -> RestyleResult<()> {
        let due: Vec<_> = self
            .mappers
            .borrow()
            .iter()
            .map(|(id, e)| (*id, Rc::clone(&e.update)))
            .collect();
        run(due, now)
    }

    /// Notify dependents of `value` whenever it changes.
    pub fn watch<T: Clone + 'static>(self: &Rc<Self>, value: &SharedValue<T>) {
        let runtime: Weak<Self> = Rc::downgrade(self);
        let id = value.id();
        value.subscribe(move |_| {
            let Some(runtime) = runtime.upgrade() else {
                return;
            };
            // Errors were already logged per mapper.
            let _ = runtime.notify(id, None);
        });
    }
}

fn run(due: Vec<(MapperId, Rc<RefCell<MapperFn>>)>, now: Option<Timestamp>) -> RestyleResult<()> {
    let mut first: Option<RestyleError> = None;
    for (id, update) in due {
        let Ok(mut f) = update.try_borrow_mut() else {
            warn!(mapper = id.0, "mapper re-entered while running, skipping");
            continue;
        };
        if let Err(err) = (*f)(now) {
            warn!(mapper = id.0, error = %err, "mapper re-run failed");
            first.get_or_insert(err);
        }
    }
    first.map_or(Ok(()), Err)
}

impl MapperRuntime for LocalMapperRuntime {
    fn register(
        &self,
        update: MapperFn,
        inputs: Vec<SharedId>,
        outputs: Vec<SharedId>,
        metadata: MapperMetadata,
    ) -> MapperId {
        let id = MapperId(self.next_id.get() + 1);
        self.next_id.set(id.0);
        self.mappers.borrow_mut().insert(
            id,
            MapperEntry {
                update: Rc::new(RefCell::new(update)),
                inputs,
                outputs,
                metadata,
            },
        );
        id
    }

    fn unregister(&self, id: MapperId) {
        self.mappers.borrow_mut().remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/binding/runtime.rs"]
mod tests;
