//! Bounded shape registry.
//!
//! Holds the live shapes in insertion order, each paired with exactly one
//! voice. Adding past the capacity evicts the oldest shape first, so the
//! population never exceeds the cap. Voices are released the moment their
//! shape leaves the registry; the release ramp itself runs on the audio clock
//! and is never waited for.

use std::collections::VecDeque;
use std::time::Duration;

use log::{debug, info, trace};

use crate::audio::{Canvas, Release, SoundMapper, VoiceBackend};
use crate::error::RegistryError;
use crate::geometry::{Outline, Point};
use crate::shape::{Shape, ShapeId, ShapeStyle};

/// Construction options for [`ShapeRegistry`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RegistryOptions {
    /// Maximum number of live shapes. Must be at least 1.
    pub capacity: usize,
    pub canvas: Canvas,
    /// Fade-out time for evicted and removed voices.
    pub release_time: Duration,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self {
            capacity: 5,
            canvas: Canvas::default(),
            release_time: Duration::from_millis(500),
        }
    }
}

/// Live shapes with their voices, capped at a fixed population.
pub struct ShapeRegistry<B: VoiceBackend> {
    backend: B,
    mapper: SoundMapper,
    capacity: usize,
    release_time: Duration,
    shapes: VecDeque<Shape<B::Voice>>,
    next_id: u64,
}

impl<B: VoiceBackend> ShapeRegistry<B> {
    pub fn new(backend: B, options: RegistryOptions) -> Result<Self, RegistryError> {
        if options.capacity == 0 {
            return Err(RegistryError::ZeroCapacity);
        }
        let canvas = Canvas::new(options.canvas.width, options.canvas.height)?;
        info!(
            "shape registry ready: capacity {}, canvas {}x{}",
            options.capacity, canvas.width, canvas.height
        );
        Ok(Self {
            backend,
            mapper: SoundMapper::new(canvas),
            capacity: options.capacity,
            release_time: options.release_time,
            shapes: VecDeque::with_capacity(options.capacity),
            next_id: 0,
        })
    }

    /// Register a shape and start its voice, evicting the oldest shape if the
    /// registry is full.
    ///
    /// The voice is tuned from `position` through the registry's mapper. On
    /// error nothing changes: the voice is started before anything is evicted.
    pub fn add(&mut self, position: Point, outline: Outline, style: ShapeStyle) -> Result<ShapeId, RegistryError> {
        let position = position.ensure_finite()?;
        let params = self.mapper.params_for(position, style.waveform);
        let voice = self.backend.start(params)?;

        if self.shapes.len() >= self.capacity {
            self.evict_oldest();
        }

        let id = ShapeId(self.next_id);
        self.next_id += 1;
        self.shapes.push_back(Shape { id, position, outline, style, params, voice });
        debug!(
            "added shape {} at ({:.0}, {:.0}): {} {:.1}Hz gain {:.3} [{} live]",
            id,
            position.x,
            position.y,
            params.waveform,
            params.frequency,
            params.gain,
            self.shapes.len()
        );
        Ok(id)
    }

    /// Remove a shape, fading its voice out.
    pub fn remove(&mut self, id: ShapeId) -> Result<(), RegistryError> {
        let index = self.index_of(id).ok_or(RegistryError::NotFound(id))?;
        if let Some(shape) = self.shapes.remove(index) {
            debug!("removed shape {}", shape.id);
            self.backend.release(shape.voice, Release::Ramp(self.release_time));
        }
        Ok(())
    }

    /// Drop every shape and cut all voices off at once. Idempotent.
    pub fn clear(&mut self) {
        if self.shapes.is_empty() {
            return;
        }
        let count = self.shapes.len();
        for shape in self.shapes.drain(..) {
            self.backend.release(shape.voice, Release::Immediate);
        }
        debug!("cleared {count} shapes");
    }

    /// Topmost shape containing `point`, if any.
    ///
    /// Shapes are drawn in insertion order, so the scan runs newest first.
    pub fn hit_test(&self, point: Point) -> Option<ShapeId> {
        if !point.is_finite() {
            return None;
        }
        self.shapes.iter().rev().find(|s| s.contains(point)).map(|s| s.id)
    }

    /// Move a shape and retune its voice for the new position.
    pub fn move_shape(&mut self, id: ShapeId, position: Point) -> Result<(), RegistryError> {
        let position = position.ensure_finite()?;
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(RegistryError::NotFound(id))?;
        let params = self.mapper.params_for(position, shape.style.waveform);
        shape.position = position;
        if shape.params != params {
            self.backend.retune(&mut shape.voice, params);
            shape.params = params;
        }
        trace!("moved shape {} to ({:.1}, {:.1})", id, position.x, position.y);
        Ok(())
    }

    /// Move a shape by an offset. Returns the new position.
    pub fn translate(&mut self, id: ShapeId, dx: f32, dy: f32) -> Result<Point, RegistryError> {
        let current = self.get(id).ok_or(RegistryError::NotFound(id))?.position;
        let target = current + Point::new(dx, dy);
        self.move_shape(id, target)?;
        Ok(target)
    }

    /// Bulk position update, e.g. once per frame from a physics engine.
    ///
    /// Unknown ids and non-finite positions are skipped. Returns how many
    /// shapes were moved.
    pub fn apply_positions<I>(&mut self, positions: I) -> usize
    where
        I: IntoIterator<Item = (ShapeId, Point)>,
    {
        positions
            .into_iter()
            .filter(|&(id, position)| self.move_shape(id, position).is_ok())
            .count()
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape<B::Voice>> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.index_of(id).is_some()
    }

    /// Live shapes, oldest first (drawing order).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shape<B::Voice>> + '_ {
        self.shapes.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.iter().map(|s| s.id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn mapper(&self) -> &SoundMapper {
        &self.mapper
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn evict_oldest(&mut self) {
        if let Some(oldest) = self.shapes.pop_front() {
            debug!("evicting shape {} (capacity {})", oldest.id, self.capacity);
            self.backend.release(oldest.voice, Release::Ramp(self.release_time));
        }
    }

    fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }
}

impl<B: VoiceBackend> Drop for ShapeRegistry<B> {
    fn drop(&mut self) {
        self.clear();
    }
}
