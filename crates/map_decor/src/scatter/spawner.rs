//! Spawner seam between the scatter decisions and whatever instantiates objects.
//!
//! The scatter run computes what goes where; an [`ObjectSpawner`] turns each
//! [`SpawnRequest`] into a host object (a scene entity, a prefab instance, a record).
use glam::{Quat, Vec3};

use crate::graph::NodeId;
use crate::scatter::transform::PlacementTransform;

/// Everything a host needs to instantiate one object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRequest<'a> {
    /// Node that receives the object.
    pub node: NodeId,
    /// Object class handle from the settings.
    pub class_id: &'a str,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl<'a> SpawnRequest<'a> {
    pub fn new(node: NodeId, class_id: &'a str, transform: &PlacementTransform) -> Self {
        Self {
            node,
            class_id,
            position: transform.position,
            rotation: transform.rotation,
            scale: transform.scale,
        }
    }
}

/// Instantiates objects into a container on behalf of a scatter run.
pub trait ObjectSpawner {
    /// Identifies a spawned object on the host side.
    type Handle;

    /// Removes every object spawned into the container by earlier runs.
    fn clear(&mut self);

    fn spawn(&mut self, request: &SpawnRequest<'_>) -> Self::Handle;
}

/// A spawner that discards every request.
impl ObjectSpawner for () {
    type Handle = ();

    #[inline]
    fn clear(&mut self) {}

    #[inline]
    fn spawn(&mut self, _request: &SpawnRequest<'_>) {}
}

impl<S: ObjectSpawner + ?Sized> ObjectSpawner for &mut S {
    type Handle = S::Handle;

    fn clear(&mut self) {
        (**self).clear();
    }

    fn spawn(&mut self, request: &SpawnRequest<'_>) -> Self::Handle {
        (**self).spawn(request)
    }
}

/// Owned copy of a [`SpawnRequest`] kept by [`VecSpawner`].
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnedObject {
    pub node: NodeId,
    pub class_id: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl From<&SpawnRequest<'_>> for SpawnedObject {
    fn from(request: &SpawnRequest<'_>) -> Self {
        Self {
            node: request.node,
            class_id: request.class_id.to_owned(),
            position: request.position,
            rotation: request.rotation,
            scale: request.scale,
        }
    }
}

/// A spawner that records requests in a `Vec`. Handles are indices into it.
#[derive(Debug, Default)]
pub struct VecSpawner {
    objects: Vec<SpawnedObject>,
    clears: usize,
}

impl VecSpawner {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            clears: 0,
        }
    }

    pub fn objects(&self) -> &[SpawnedObject] {
        &self.objects
    }

    pub fn into_inner(self) -> Vec<SpawnedObject> {
        self.objects
    }

    /// Number of times the container was cleared.
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl ObjectSpawner for VecSpawner {
    type Handle = usize;

    fn clear(&mut self) {
        self.objects.clear();
        self.clears += 1;
    }

    fn spawn(&mut self, request: &SpawnRequest<'_>) -> usize {
        self.objects.push(SpawnedObject::from(request));
        self.objects.len() - 1
    }
}

/// A spawner that forwards requests to a closure. `clear` is a no-op.
pub struct FnSpawner<F> {
    f: F,
}

impl<F, H> FnSpawner<F>
where
    F: FnMut(&SpawnRequest<'_>) -> H,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F, H> ObjectSpawner for FnSpawner<F>
where
    F: FnMut(&SpawnRequest<'_>) -> H,
{
    type Handle = H;

    #[inline]
    fn clear(&mut self) {}

    #[inline]
    fn spawn(&mut self, request: &SpawnRequest<'_>) -> H {
        (self.f)(request)
    }
}
