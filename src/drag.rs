//! Pointer drag gestures over a [`ShapeRegistry`].
//!
//! Press picks the topmost shape under the pointer, each subsequent move
//! shifts it by the pointer delta (so the grab point stays under the cursor),
//! and release or leaving the canvas ends the gesture.

use log::trace;

use crate::audio::VoiceBackend;
use crate::error::RegistryError;
use crate::geometry::Point;
use crate::registry::ShapeRegistry;
use crate::shape::ShapeId;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DragGesture {
    selected: Option<ShapeId>,
    last: Point,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer down. Returns the grabbed shape, if the pointer is over one.
    pub fn press<B: VoiceBackend>(&mut self, registry: &ShapeRegistry<B>, at: Point) -> Option<ShapeId> {
        self.selected = registry.hit_test(at);
        self.last = at;
        if let Some(id) = self.selected {
            trace!("grabbed shape {id}");
        }
        self.selected
    }

    /// Pointer moved. Drags the grabbed shape along, retuning its voice.
    ///
    /// Returns the dragged shape, or `None` when nothing is grabbed. A shape
    /// that left the registry mid-gesture (evicted, cleared) silently ends
    /// the gesture.
    pub fn drag_to<B: VoiceBackend>(
        &mut self,
        registry: &mut ShapeRegistry<B>,
        at: Point,
    ) -> Result<Option<ShapeId>, RegistryError> {
        let Some(id) = self.selected else {
            return Ok(None);
        };
        let at = at.ensure_finite()?;
        let delta = at - self.last;
        self.last = at;
        match registry.translate(id, delta.x, delta.y) {
            Ok(_) => Ok(Some(id)),
            Err(RegistryError::NotFound(_)) => {
                self.selected = None;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Pointer up. Returns the shape that was being dragged.
    pub fn release(&mut self) -> Option<ShapeId> {
        self.selected.take()
    }

    /// Pointer left the canvas; same as a release.
    pub fn leave(&mut self) -> Option<ShapeId> {
        self.release()
    }

    pub fn selected(&self) -> Option<ShapeId> {
        self.selected
    }

    pub fn is_dragging(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{SilentBackend, Waveform};
    use crate::registry::RegistryOptions;
    use crate::shape::{Color, ShapeKind, ShapeStyle};

    fn setup() -> (ShapeRegistry<SilentBackend>, ShapeId) {
        let mut reg = ShapeRegistry::new(SilentBackend::new(), RegistryOptions::default()).unwrap();
        let style = ShapeStyle::solid(Color::rgb(0x82, 0xF1, 0xD6), Waveform::Sawtooth);
        let id = reg.add(Point::new(100.0, 100.0), ShapeKind::Square.outline(), style).unwrap();
        (reg, id)
    }

    #[test]
    fn drag_follows_pointer_delta() {
        let (mut reg, id) = setup();
        let mut drag = DragGesture::new();
        assert_eq!(drag.press(&reg, Point::new(110.0, 120.0)), Some(id));

        assert_eq!(drag.drag_to(&mut reg, Point::new(130.0, 100.0)).unwrap(), Some(id));
        assert_eq!(drag.drag_to(&mut reg, Point::new(140.0, 110.0)).unwrap(), Some(id));
        assert_eq!(reg.get(id).unwrap().position(), Point::new(130.0, 90.0));

        let expected = reg.mapper().params_for(Point::new(130.0, 90.0), Waveform::Sawtooth);
        assert_eq!(reg.get(id).unwrap().params(), expected);

        assert_eq!(drag.release(), Some(id));
        assert_eq!(drag.drag_to(&mut reg, Point::new(300.0, 300.0)).unwrap(), None);
        assert_eq!(reg.get(id).unwrap().position(), Point::new(130.0, 90.0));
    }

    #[test]
    fn press_on_empty_canvas_grabs_nothing() {
        let (mut reg, id) = setup();
        let mut drag = DragGesture::new();
        assert_eq!(drag.press(&reg, Point::new(10.0, 10.0)), None);
        assert!(!drag.is_dragging());
        assert_eq!(drag.drag_to(&mut reg, Point::new(50.0, 50.0)).unwrap(), None);
        assert_eq!(reg.get(id).unwrap().position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn leaving_ends_the_gesture() {
        let (reg, id) = setup();
        let mut drag = DragGesture::new();
        drag.press(&reg, Point::new(101.0, 101.0));
        assert_eq!(drag.leave(), Some(id));
        assert_eq!(drag.selected(), None);
    }

    #[test]
    fn vanished_shape_ends_the_gesture() {
        let (mut reg, _) = setup();
        let mut drag = DragGesture::new();
        drag.press(&reg, Point::new(101.0, 101.0));
        reg.clear();
        assert_eq!(drag.drag_to(&mut reg, Point::new(120.0, 120.0)).unwrap(), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn non_finite_pointer_is_rejected() {
        let (mut reg, _) = setup();
        let mut drag = DragGesture::new();
        drag.press(&reg, Point::new(101.0, 101.0));
        let err = drag.drag_to(&mut reg, Point::new(f32::NAN, 0.0)).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(drag.is_dragging());
    }
}
