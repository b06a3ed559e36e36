pub type Easing = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease in the first half, mirrored cubic ease out in the second.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Tick {
    /// Eased progress for this frame, strictly below 1.
    Running(f32),
    Finished,
}

/// Frame-count driven progress from 0 to 1.
///
/// Progress is `frame / steps`; the tick that reaches `steps` reports
/// `Finished` so callers snap to the exact target instead of the eased value.
#[derive(Clone, Copy, Debug)]
pub struct AnimationTask {
    frame: u32,
    steps: u32,
    easing: Easing,
    done: bool,
}

impl AnimationTask {
    pub fn new(steps: u32, easing: Easing) -> Self {
        Self {
            frame: 0,
            steps: steps.max(1),
            easing,
            done: false,
        }
    }

    pub fn progress(&self) -> f32 {
        self.frame as f32 / self.steps as f32
    }

    pub fn is_finished(&self) -> bool {
        self.done
    }

    pub fn tick(&mut self) -> Tick {
        if self.done {
            return Tick::Finished;
        }
        self.frame += 1;
        if self.frame >= self.steps {
            self.done = true;
            return Tick::Finished;
        }
        Tick::Running((self.easing)(self.progress()))
    }
}
