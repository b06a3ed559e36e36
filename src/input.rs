use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, PointerEvent, WheelEvent};

use crate::app_core::AppCore;

const WHEEL_LINE_PX: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PointerKind {
    Mouse,
    Touch,
    Pen,
    Unknown,
}

impl PointerKind {
    pub(crate) fn from_pointer_type(value: &str) -> Self {
        match value {
            "mouse" => PointerKind::Mouse,
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Unknown,
        }
    }
}

/// Tracks the single pointer that is orbiting the camera.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct OrbitDrag {
    active: Option<(i32, [f32; 2])>,
}

impl OrbitDrag {
    /// Starts a drag unless another pointer already owns it.
    pub(crate) fn press(&mut self, id: i32, kind: PointerKind, button: i16, x: f32, y: f32) -> bool {
        if self.active.is_some() {
            return false;
        }
        if kind == PointerKind::Mouse && button != 0 {
            return false;
        }
        self.active = Some((id, [x, y]));
        true
    }

    /// Returns the delta since the last sample for the owning pointer.
    pub(crate) fn drag(&mut self, id: i32, x: f32, y: f32) -> Option<(f32, f32)> {
        let (owner, last) = self.active.as_mut()?;
        if *owner != id {
            return None;
        }
        let delta = (x - last[0], y - last[1]);
        *last = [x, y];
        Some(delta)
    }

    pub(crate) fn release(&mut self, id: i32) -> bool {
        match self.active {
            Some((owner, _)) if owner == id => {
                self.active = None;
                true
            }
            _ => false,
        }
    }
}

/// Converts a wheel delta into pixels. Mode 1 is lines, mode 2 is pages.
pub(crate) fn normalize_wheel_delta(delta_y: f32, delta_mode: u32, page_height: f32) -> f32 {
    match delta_mode {
        1 => delta_y * WHEEL_LINE_PX,
        2 => delta_y * page_height,
        _ => delta_y,
    }
}

/// Drag to orbit, wheel to zoom. Dropping the listeners detaches them.
pub(crate) fn install_orbit_controls(core: Rc<AppCore>, target: &Element) -> Vec<EventListener> {
    let drag = Rc::new(RefCell::new(OrbitDrag::default()));
    let options = EventListenerOptions::enable_prevent_default();
    let mut listeners = Vec::new();

    listeners.push(EventListener::new_with_options(
        target,
        "pointerdown",
        options,
        {
            let drag = drag.clone();
            let target = target.clone();
            move |event: &Event| {
                let Some(event) = event.dyn_ref::<PointerEvent>() else {
                    return;
                };
                let kind = PointerKind::from_pointer_type(&event.pointer_type());
                let pressed = drag.borrow_mut().press(
                    event.pointer_id(),
                    kind,
                    event.button(),
                    event.client_x() as f32,
                    event.client_y() as f32,
                );
                if pressed {
                    event.prevent_default();
                    let _ = target.set_pointer_capture(event.pointer_id());
                }
            }
        },
    ));

    listeners.push(EventListener::new(target, "pointermove", {
        let drag = drag.clone();
        let core = core.clone();
        move |event: &Event| {
            let Some(event) = event.dyn_ref::<PointerEvent>() else {
                return;
            };
            let delta = drag.borrow_mut().drag(
                event.pointer_id(),
                event.client_x() as f32,
                event.client_y() as f32,
            );
            if let Some((dx, dy)) = delta {
                core.orbit(dx, dy);
            }
        }
    }));

    for name in ["pointerup", "pointercancel", "lostpointercapture"] {
        listeners.push(EventListener::new(target, name, {
            let drag = drag.clone();
            move |event: &Event| {
                if let Some(event) = event.dyn_ref::<PointerEvent>() {
                    drag.borrow_mut().release(event.pointer_id());
                }
            }
        }));
    }

    listeners.push(EventListener::new_with_options(target, "wheel", options, {
        let target = target.clone();
        move |event: &Event| {
            let Some(event) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            event.prevent_default();
            let page_height = target.get_bounding_client_rect().height() as f32;
            let delta = normalize_wheel_delta(event.delta_y() as f32, event.delta_mode(), page_height);
            core.zoom(delta);
        }
    }));

    listeners
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_lines_and_pages_scale_to_pixels() {
        assert_eq!(normalize_wheel_delta(3.0, 0, 600.0), 3.0);
        assert_eq!(normalize_wheel_delta(3.0, 1, 600.0), 48.0);
        assert_eq!(normalize_wheel_delta(-1.0, 2, 600.0), -600.0);
    }

    #[test]
    fn only_the_owning_pointer_drags() {
        let mut drag = OrbitDrag::default();
        assert!(drag.press(1, PointerKind::Touch, 0, 10.0, 10.0));
        assert!(!drag.press(2, PointerKind::Touch, 0, 50.0, 50.0));
        assert_eq!(drag.drag(2, 60.0, 60.0), None);
        assert_eq!(drag.drag(1, 14.0, 7.0), Some((4.0, -3.0)));
        assert_eq!(drag.drag(1, 15.0, 7.0), Some((1.0, 0.0)));
        assert!(!drag.release(2));
        assert!(drag.release(1));
        assert_eq!(drag.drag(1, 20.0, 20.0), None);
    }

    #[test]
    fn secondary_mouse_button_does_not_orbit() {
        let mut drag = OrbitDrag::default();
        assert!(!drag.press(1, PointerKind::Mouse, 2, 0.0, 0.0));
        assert!(drag.press(1, PointerKind::Pen, 2, 0.0, 0.0));
    }
}
