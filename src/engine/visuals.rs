//! Rendering Collaborator Interface
//!
//! The engine never draws anything. It asks a `VisualSink` to spawn, remove and
//! dispose visuals, and only cares whether a spawn succeeded. The headless
//! runner plugs in `NullVisuals`; tests use `RecordingVisuals` to check that
//! every visual is released exactly once.

use bevy::prelude::*;
use std::collections::HashMap;

/// Opaque handle to a visual owned by the rendering side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Shape of a visual.
#[derive(Clone, Debug, PartialEq)]
pub enum VisualShape {
    /// Named sprite or mesh asset; may be missing on the rendering side.
    Sprite(String),
    Sphere { radius: f32 },
    Disc { radius: f32 },
    Capsule { radius: f32, height: f32 },
}

/// Everything the rendering side needs to create a visual.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualDescriptor {
    pub shape: VisualShape,
    pub position: Vec3,
    /// RGB color (0.0-1.0 range)
    pub color: [f32; 3],
}

impl VisualDescriptor {
    pub fn new(shape: VisualShape, position: Vec3, color: [f32; 3]) -> Self {
        Self {
            shape,
            position,
            color,
        }
    }

    /// The simple shape drawn when the requested sprite is unavailable.
    pub fn fallback(&self) -> Self {
        Self {
            shape: VisualShape::Sphere { radius: 0.5 },
            position: self.position,
            color: self.color,
        }
    }
}

/// Rendering surface consumed by the engine.
pub trait VisualSink: Send + Sync {
    /// Create a visual; `None` when the asset could not be provided.
    fn spawn_visual(&mut self, descriptor: &VisualDescriptor) -> Option<VisualHandle>;
    /// Detach a visual from the scene.
    fn remove_visual(&mut self, handle: VisualHandle);
    /// Free the resources behind a removed visual.
    fn dispose_visual(&mut self, handle: VisualHandle);
}

/// Spawn a visual, retrying with the fallback shape if a sprite is missing.
///
/// Returns `None` only if even the fallback could not be spawned; callers carry
/// on without a visual in that case.
pub fn spawn_with_fallback(
    sink: &mut dyn VisualSink,
    descriptor: &VisualDescriptor,
) -> Option<VisualHandle> {
    if let Some(handle) = sink.spawn_visual(descriptor) {
        return Some(handle);
    }
    if matches!(descriptor.shape, VisualShape::Sprite(_)) {
        debug!("Visual {:?} unavailable, using fallback shape", descriptor.shape);
        return sink.spawn_visual(&descriptor.fallback());
    }
    None
}

/// Remove and dispose a visual in one go.
pub fn release(sink: &mut dyn VisualSink, handle: VisualHandle) {
    sink.remove_visual(handle);
    sink.dispose_visual(handle);
}

/// Visual sink for headless runs: hands out handles and forgets them.
#[derive(Default)]
pub struct NullVisuals {
    next: u64,
}

impl VisualSink for NullVisuals {
    fn spawn_visual(&mut self, _descriptor: &VisualDescriptor) -> Option<VisualHandle> {
        self.next += 1;
        Some(VisualHandle(self.next))
    }

    fn remove_visual(&mut self, _handle: VisualHandle) {}

    fn dispose_visual(&mut self, _handle: VisualHandle) {}
}

/// Visual sink that records every call, for tests and diagnostics.
///
/// Sprites listed in `missing_sprites` fail to spawn, exercising the fallback path.
#[derive(Default)]
pub struct RecordingVisuals {
    next: u64,
    pub missing_sprites: Vec<String>,
    pub spawned: Vec<(VisualHandle, VisualDescriptor)>,
    pub removed: Vec<VisualHandle>,
    pub disposed: HashMap<VisualHandle, u32>,
}

impl RecordingVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of visuals spawned and not yet disposed.
    pub fn live_count(&self) -> usize {
        self.spawned
            .iter()
            .filter(|(handle, _)| !self.disposed.contains_key(handle))
            .count()
    }

    /// How many times `handle` has been disposed.
    pub fn dispose_count(&self, handle: VisualHandle) -> u32 {
        self.disposed.get(&handle).copied().unwrap_or(0)
    }
}

impl VisualSink for RecordingVisuals {
    fn spawn_visual(&mut self, descriptor: &VisualDescriptor) -> Option<VisualHandle> {
        if let VisualShape::Sprite(name) = &descriptor.shape {
            if self.missing_sprites.iter().any(|missing| missing == name) {
                return None;
            }
        }
        self.next += 1;
        let handle = VisualHandle(self.next);
        self.spawned.push((handle, descriptor.clone()));
        Some(handle)
    }

    fn remove_visual(&mut self, handle: VisualHandle) {
        self.removed.push(handle);
    }

    fn dispose_visual(&mut self, handle: VisualHandle) {
        *self.disposed.entry(handle).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_sprite_falls_back_to_sphere() {
        let mut sink = RecordingVisuals::new();
        sink.missing_sprites.push("fireball".to_string());

        let descriptor = VisualDescriptor::new(
            VisualShape::Sprite("fireball".to_string()),
            Vec3::ZERO,
            [1.0, 0.4, 0.1],
        );
        let handle = spawn_with_fallback(&mut sink, &descriptor);

        assert!(handle.is_some());
        assert_eq!(sink.spawned.len(), 1);
        assert!(matches!(sink.spawned[0].1.shape, VisualShape::Sphere { .. }));
    }

    #[test]
    fn test_release_removes_and_disposes() {
        let mut sink = RecordingVisuals::new();
        let descriptor = VisualDescriptor::new(VisualShape::Disc { radius: 2.0 }, Vec3::ZERO, [1.0; 3]);
        let handle = sink.spawn_visual(&descriptor).unwrap();
        release(&mut sink, handle);
        assert_eq!(sink.removed, vec![handle]);
        assert_eq!(sink.dispose_count(handle), 1);
        assert_eq!(sink.live_count(), 0);
    }
}
