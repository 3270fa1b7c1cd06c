use crate::storage::{SparseStorage, Storage};
use campuswalk_common::{Entity, Time};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

/// A component type attachable to entities.
///
/// `NAME` keys configuration errors and log lines; it must be unique
/// across all attached component types.
pub trait Component: 'static {
    const NAME: &'static str;
}

// The spatial pose is the one component every crate joins on, so its
// implementation lives next to the trait.
impl Component for campuswalk_common::Transform {
    const NAME: &'static str = "transform";
}

/// Scheduler phase a system runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Update,
    Draw,
}

/// A per-frame system. Configuration errors abort this invocation only;
/// the frame driver logs them and moves on to the next system.
pub type System<W> = fn(&mut W, Time) -> Result<(), EcsError>;

/// Errors from registry configuration misuse. These are programmer
/// errors: they are raised synchronously and never corrupt storage state.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EcsError {
    #[error("no such component storage '{0}'")]
    NotAttached(&'static str),
    #[error("component storage '{0}' is already attached")]
    AlreadyAttached(&'static str),
}

trait AnyStorage {
    fn remove(&self, id: Entity);
    fn as_any(&self) -> &dyn Any;
}

struct StorageCell<C: Component> {
    cell: RefCell<SparseStorage<C>>,
}

impl<C: Component> AnyStorage for StorageCell<C> {
    fn remove(&self, id: Entity) {
        self.cell.borrow_mut().remove(id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A set of components written together by [`Ecs::create`].
///
/// Implemented for tuples of 1 to 5 components; the arity cap mirrors the
/// largest entity archetype in the scene.
pub trait Bundle {
    fn validate<W>(ecs: &Ecs<W>) -> Result<(), EcsError>;
    fn write<W>(self, ecs: &Ecs<W>, id: Entity) -> Result<(), EcsError>;
}

macro_rules! impl_bundle {
    ($($c:ident),+) => {
        impl<$($c: Component),+> Bundle for ($($c,)+) {
            fn validate<W>(ecs: &Ecs<W>) -> Result<(), EcsError> {
                $(ecs.cell::<$c>()?;)+
                Ok(())
            }

            #[allow(non_snake_case)]
            fn write<W>(self, ecs: &Ecs<W>, id: Entity) -> Result<(), EcsError> {
                let ($($c,)+) = self;
                $(ecs.cell::<$c>()?.borrow_mut().write(id, $c);)+
                Ok(())
            }
        }
    };
}

impl_bundle!(A);
impl_bundle!(A, B);
impl_bundle!(A, B, C);
impl_bundle!(A, B, C, D);
impl_bundle!(A, B, C, D, E);

/// The ECS registry: typed storages keyed by component type, a monotonic
/// entity allocator, and the two ordered system lists.
///
/// `W` is the world type systems operate on; the registry itself never
/// inspects it.
pub struct Ecs<W> {
    storages: HashMap<TypeId, Box<dyn AnyStorage>>,
    update_systems: Vec<System<W>>,
    draw_systems: Vec<System<W>>,
    fresh_id: u64,
}

impl<W> Default for Ecs<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> Ecs<W> {
    pub fn new() -> Self {
        Self {
            storages: HashMap::new(),
            update_systems: Vec::new(),
            draw_systems: Vec::new(),
            fresh_id: 0,
        }
    }

    /// Register a new component type with an empty sparse storage.
    pub fn attach<C: Component>(&mut self) -> Result<(), EcsError> {
        let key = TypeId::of::<C>();
        if self.storages.contains_key(&key) {
            return Err(EcsError::AlreadyAttached(C::NAME));
        }
        self.storages.insert(
            key,
            Box::new(StorageCell::<C> {
                cell: RefCell::new(SparseStorage::new()),
            }),
        );
        Ok(())
    }

    fn cell<C: Component>(&self) -> Result<&RefCell<SparseStorage<C>>, EcsError> {
        self.storages
            .get(&TypeId::of::<C>())
            .and_then(|s| s.as_any().downcast_ref::<StorageCell<C>>())
            .map(|s| &s.cell)
            .ok_or(EcsError::NotAttached(C::NAME))
    }

    /// Append a system to a phase's ordered list. Systems run in
    /// registration order, once per phase per frame.
    pub fn register(&mut self, phase: Phase, system: System<W>) -> &mut Self {
        match phase {
            Phase::Update => self.update_systems.push(system),
            Phase::Draw => self.draw_systems.push(system),
        }
        self
    }

    /// The registered systems of a phase, in registration order.
    pub fn systems(&self, phase: Phase) -> &[System<W>] {
        match phase {
            Phase::Update => &self.update_systems,
            Phase::Draw => &self.draw_systems,
        }
    }

    /// Allocate a fresh entity id and write all bundle components.
    ///
    /// Every storage is validated before any write, so an unattached
    /// component type leaves the registry untouched.
    pub fn create<B: Bundle>(&mut self, bundle: B) -> Result<Entity, EcsError> {
        B::validate(self)?;
        let id = Entity(self.fresh_id);
        self.fresh_id += 1;
        bundle.write(self, id)?;
        Ok(id)
    }

    /// Remove the entity from every attached storage.
    pub fn remove(&self, id: Entity) {
        for storage in self.storages.values() {
            storage.remove(id);
        }
    }

    /// Insert or overwrite a single component on an existing entity.
    pub fn write<C: Component>(&self, id: Entity, value: C) -> Result<(), EcsError> {
        self.cell::<C>()?.borrow_mut().write(id, value);
        Ok(())
    }

    /// Read a component by value.
    pub fn read<C: Component + Clone>(&self, id: Entity) -> Result<Option<C>, EcsError> {
        Ok(self.cell::<C>()?.borrow().read(id).cloned())
    }

    /// Mutate a single component in place.
    pub fn edit<C: Component, R>(
        &self,
        id: Entity,
        f: impl FnOnce(&mut C) -> R,
    ) -> Result<Option<R>, EcsError> {
        Ok(self.cell::<C>()?.borrow_mut().get_mut(id).map(f))
    }

    /// Snapshot of ids present in a single storage.
    pub fn keys<C: Component>(&self) -> Result<Vec<Entity>, EcsError> {
        Ok(self.cell::<C>()?.borrow().keys())
    }

    /// Visit every entity holding component `A`.
    ///
    /// The id set is snapshotted before iteration; mutations through the
    /// callback are in place and visible to later joins this frame.
    /// Callbacks must not touch the joined storages re-entrantly.
    pub fn for_each1<A: Component>(
        &self,
        mut f: impl FnMut(Entity, &mut A),
    ) -> Result<(), EcsError> {
        let a = self.cell::<A>()?;
        let ids = a.borrow().keys();
        let mut a = a.borrow_mut();
        for id in ids {
            if let Some(va) = a.get_mut(id) {
                f(id, va);
            }
        }
        Ok(())
    }

    /// Visit every entity holding both `A` and `B` (key-set intersection).
    pub fn for_each2<A: Component, B: Component>(
        &self,
        mut f: impl FnMut(Entity, &mut A, &mut B),
    ) -> Result<(), EcsError> {
        let a = self.cell::<A>()?;
        let b = self.cell::<B>()?;
        let ids: Vec<Entity> = {
            let a = a.borrow();
            let b = b.borrow();
            a.keys().into_iter().filter(|id| b.contains(*id)).collect()
        };
        let mut a = a.borrow_mut();
        let mut b = b.borrow_mut();
        for id in ids {
            if let (Some(va), Some(vb)) = (a.get_mut(id), b.get_mut(id)) {
                f(id, va, vb);
            }
        }
        Ok(())
    }

    /// Visit every entity holding `A`, `B`, and `C`.
    pub fn for_each3<A: Component, B: Component, C: Component>(
        &self,
        mut f: impl FnMut(Entity, &mut A, &mut B, &mut C),
    ) -> Result<(), EcsError> {
        let a = self.cell::<A>()?;
        let b = self.cell::<B>()?;
        let c = self.cell::<C>()?;
        let ids: Vec<Entity> = {
            let a = a.borrow();
            let b = b.borrow();
            let c = c.borrow();
            a.keys()
                .into_iter()
                .filter(|id| b.contains(*id) && c.contains(*id))
                .collect()
        };
        let mut a = a.borrow_mut();
        let mut b = b.borrow_mut();
        let mut c = c.borrow_mut();
        for id in ids {
            if let (Some(va), Some(vb), Some(vc)) = (a.get_mut(id), b.get_mut(id), c.get_mut(id)) {
                f(id, va, vb, vc);
            }
        }
        Ok(())
    }

    /// Visit every entity holding `A`, `B`, `C`, and `D`.
    pub fn for_each4<A: Component, B: Component, C: Component, D: Component>(
        &self,
        mut f: impl FnMut(Entity, &mut A, &mut B, &mut C, &mut D),
    ) -> Result<(), EcsError> {
        let a = self.cell::<A>()?;
        let b = self.cell::<B>()?;
        let c = self.cell::<C>()?;
        let d = self.cell::<D>()?;
        let ids: Vec<Entity> = {
            let a = a.borrow();
            let b = b.borrow();
            let c = c.borrow();
            let d = d.borrow();
            a.keys()
                .into_iter()
                .filter(|id| b.contains(*id) && c.contains(*id) && d.contains(*id))
                .collect()
        };
        let mut a = a.borrow_mut();
        let mut b = b.borrow_mut();
        let mut c = c.borrow_mut();
        let mut d = d.borrow_mut();
        for id in ids {
            if let (Some(va), Some(vb), Some(vc), Some(vd)) =
                (a.get_mut(id), b.get_mut(id), c.get_mut(id), d.get_mut(id))
            {
                f(id, va, vb, vc, vd);
            }
        }
        Ok(())
    }
}
