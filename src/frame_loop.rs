use std::cell::RefCell;
use std::rc::Rc;

use gloo::render::{request_animation_frame, AnimationFrame};
use kyubu_core::FrameOutcome;

use crate::app_core::{AppCore, AppSubscription};

/// Steps the running turn once per display frame while the cube is animating.
struct FrameLoop {
    core: Rc<AppCore>,
    frame_handle: RefCell<Option<AnimationFrame>>,
}

thread_local! {
    static FRAME_LOOP: RefCell<Option<(Rc<FrameLoop>, AppSubscription)>> = const { RefCell::new(None) };
}

impl FrameLoop {
    fn queue_frame(self: &Rc<Self>) {
        if self.frame_handle.borrow().is_some() || !self.core.is_animating() {
            return;
        }
        let driver = Rc::clone(self);
        let handle = request_animation_frame(move |_| {
            driver.frame_handle.borrow_mut().take();
            if driver.core.advance_frame() == FrameOutcome::Animating {
                driver.queue_frame();
            }
        });
        *self.frame_handle.borrow_mut() = Some(handle);
    }
}

pub(crate) fn install(core: Rc<AppCore>) {
    let driver = Rc::new(FrameLoop {
        core: core.clone(),
        frame_handle: RefCell::new(None),
    });
    let subscription = core.subscribe(Rc::new({
        let driver = driver.clone();
        move || driver.queue_frame()
    }));
    FRAME_LOOP.with(|slot| {
        *slot.borrow_mut() = Some((driver, subscription));
    });
}
