use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::Date;
use kyubu_core::{
    format_sequence, parse_algorithm, scramble, seeded_rng, splitmix64, AlgorithmError,
    ControllerAction, ControllerState, CubeAnimator, CubeModel, CubeRules, Effect, FrameOutcome,
    Move, OrbitCamera, Projection, RaceCommand, RaceError, RacePhase, RaceState, TurnStart,
};
use rand::rngs::StdRng;

use crate::app_router::InitConfig;

pub(crate) type AppSubscriber = Rc<dyn Fn()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RendererKind {
    Svg,
    Wgpu,
}

impl RendererKind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            RendererKind::Svg => "SVG",
            RendererKind::Wgpu => "wgpu",
        }
    }
}

impl Default for RendererKind {
    fn default() -> Self {
        RendererKind::Wgpu
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SubmitError {
    Invalid(AlgorithmError),
    /// A turn or race owns the cube; nothing was queued.
    Locked,
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Invalid(err) => err.fmt(f),
            SubmitError::Locked => f.write_str("wait for the cube to finish turning"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Invalid(err) => Some(err),
            SubmitError::Locked => None,
        }
    }
}

impl From<AlgorithmError> for SubmitError {
    fn from(err: AlgorithmError) -> Self {
        SubmitError::Invalid(err)
    }
}

pub(crate) struct AppCore {
    state: RefCell<AppState>,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

/// What the panel and the views render from.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct AppSnapshot {
    pub(crate) history_len: usize,
    pub(crate) queued: usize,
    pub(crate) in_flight: Option<Move>,
    pub(crate) animating: bool,
    pub(crate) controls_locked: bool,
    pub(crate) recent: Vec<Move>,
    pub(crate) race_phase: RacePhase,
    pub(crate) race_sequence: Vec<Move>,
    pub(crate) race_length_min: usize,
    pub(crate) race_length_max: usize,
    pub(crate) mount_epoch: u64,
    pub(crate) renderer_kind: RendererKind,
}

struct AppState {
    rules: CubeRules,
    model: Rc<CubeModel>,
    controller: ControllerState,
    animator: CubeAnimator,
    race: RaceState,
    recent: VecDeque<Move>,
    camera: OrbitCamera,
    rng: StdRng,
    renderer_kind: RendererKind,
}

impl AppCore {
    pub(crate) fn new(model: Rc<CubeModel>, init: &InitConfig) -> Rc<Self> {
        let state = AppState::new(model, init);
        Rc::new(Self {
            state: RefCell::new(state),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub(crate) fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        AppSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    fn notify(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }

    pub(crate) fn snapshot(&self) -> AppSnapshot {
        let state = self.state.borrow();
        AppSnapshot {
            history_len: state.controller.history().len(),
            queued: state.controller.queue().len(),
            in_flight: state.controller.in_flight(),
            animating: state.animator.is_animating(),
            controls_locked: state.controls_locked(),
            recent: state.recent.iter().copied().collect(),
            race_phase: state.race.phase(),
            race_sequence: state.race.sequence().to_vec(),
            race_length_min: state.rules.race_length_min,
            race_length_max: state.rules.race_length_max,
            mount_epoch: state.controller.mount_epoch(),
            renderer_kind: state.renderer_kind,
        }
    }

    pub(crate) fn set_renderer_kind(&self, kind: RendererKind) {
        {
            let mut state = self.state.borrow_mut();
            if state.renderer_kind == kind {
                return;
            }
            state.renderer_kind = kind;
        }
        self.notify();
    }

    pub(crate) fn is_animating(&self) -> bool {
        self.state.borrow().animator.is_animating()
    }

    /// Returns false when the panel is locked and the move was dropped.
    pub(crate) fn submit_move(&self, mv: Move) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if state.controls_locked() {
                return false;
            }
            state.remember(&[mv]);
            state.dispatch(ControllerAction::Submit(mv));
        }
        self.notify();
        true
    }

    /// Queues every token of `text`, or nothing if any token is invalid.
    pub(crate) fn submit_algorithm(&self, text: &str) -> Result<usize, SubmitError> {
        let moves = parse_algorithm(text)?;
        if moves.is_empty() {
            return Ok(0);
        }
        {
            let mut state = self.state.borrow_mut();
            if state.controls_locked() {
                return Err(SubmitError::Locked);
            }
            log_event("algorithm", format_sequence(&moves));
            state.remember(&moves);
            state.dispatch(ControllerAction::SubmitAll(moves.clone()));
        }
        self.notify();
        Ok(moves.len())
    }

    pub(crate) fn scramble(&self) -> Vec<Move> {
        let moves = {
            let mut state = self.state.borrow_mut();
            if state.controls_locked() {
                return Vec::new();
            }
            let length = state.rules.scramble_length;
            let moves = scramble(&mut state.rng, length);
            log_event("scramble", format_sequence(&moves));
            state.remember(&moves);
            state.dispatch(ControllerAction::SubmitAll(moves.clone()));
            moves
        };
        self.notify();
        moves
    }

    pub(crate) fn resolve(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.controls_locked() || state.controller.history().is_empty() {
                return;
            }
            log_event(
                "resolve",
                format_sequence(&kyubu_core::inverse_sequence(state.controller.history())),
            );
            state.dispatch(ControllerAction::Resolve);
        }
        self.notify();
    }

    /// Always allowed; also abandons a running race.
    pub(crate) fn reset(&self) {
        {
            let mut state = self.state.borrow_mut();
            if state.race.is_active() {
                log_event("race", "aborted by reset".to_string());
            }
            state.race.abort();
            state.dispatch(ControllerAction::Reset);
        }
        self.notify();
    }

    pub(crate) fn start_race(&self, length: usize) -> Result<(), RaceError> {
        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            let commands = state.race.start(length, &mut state.rng)?;
            log_event("race", format!("showing {length} moves"));
            state.apply_race(commands);
        }
        self.notify();
        Ok(())
    }

    /// The race start/stop key. Returns true if the race consumed it.
    pub(crate) fn race_key(&self) -> bool {
        let consumed = {
            let mut state = self.state.borrow_mut();
            let before = state.race.phase();
            let commands = state.race.on_key();
            state.apply_race(commands);
            let after = state.race.phase();
            if before != after {
                log_event("race", format!("{before:?} -> {after:?}"));
            }
            before != after
        };
        if consumed {
            self.notify();
        }
        consumed
    }

    pub(crate) fn try_again(&self) {
        {
            let mut state = self.state.borrow_mut();
            let commands = state.race.try_again();
            state.apply_race(commands);
        }
        self.notify();
    }

    /// Steps the running turn by one rendered frame.
    pub(crate) fn advance_frame(&self) -> FrameOutcome {
        let outcome = {
            let mut state = self.state.borrow_mut();
            let outcome = state.animator.frame();
            if let FrameOutcome::Completed(_) = outcome {
                state.dispatch(ControllerAction::MoveCompleted);
            }
            outcome
        };
        if outcome != FrameOutcome::Idle {
            self.notify();
        }
        outcome
    }

    pub(crate) fn orbit(&self, dx: f32, dy: f32) {
        {
            let mut state = self.state.borrow_mut();
            if state.animator.is_animating() {
                return;
            }
            state.camera.orbit(dx, dy);
        }
        self.notify();
    }

    pub(crate) fn zoom(&self, delta: f32) {
        {
            let mut state = self.state.borrow_mut();
            if state.animator.is_animating() {
                return;
            }
            state.camera.zoom(delta);
        }
        self.notify();
    }

    pub(crate) fn projection(&self, aspect: f32) -> Projection {
        let state = self.state.borrow();
        Projection::build(state.animator.scene(), &state.camera, aspect)
    }
}

pub(crate) struct AppSubscription {
    subscriber: AppSubscriber,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl Drop for AppSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}

impl AppState {
    fn new(model: Rc<CubeModel>, init: &InitConfig) -> Self {
        let mut rules = CubeRules::default();
        if let Some(steps) = init.steps {
            rules.animation_steps = steps;
        }
        let seed = init.seed.unwrap_or_else(time_seed);
        Self {
            animator: CubeAnimator::new(&model, &rules),
            controller: ControllerState::new(),
            race: RaceState::new(&rules),
            recent: VecDeque::with_capacity(rules.recent_moves_len),
            camera: OrbitCamera::new(&rules),
            rng: seeded_rng(seed),
            renderer_kind: init.renderer,
            model,
            rules,
        }
    }

    fn controls_locked(&self) -> bool {
        self.controller.is_busy() || self.race.is_active()
    }

    fn remember(&mut self, moves: &[Move]) {
        for mv in moves {
            if self.recent.len() == self.rules.recent_moves_len {
                self.recent.pop_front();
            }
            self.recent.push_back(*mv);
        }
    }

    fn apply_race(&mut self, commands: Vec<RaceCommand>) {
        for command in commands {
            let action = match command {
                RaceCommand::ResetCube => ControllerAction::Reset,
                RaceCommand::Submit(moves) => ControllerAction::SubmitAll(moves),
                RaceCommand::Resolve => ControllerAction::Resolve,
            };
            self.dispatch(action);
        }
    }

    /// Runs the controller and carries out its effects until nothing is pending.
    fn dispatch(&mut self, action: ControllerAction) {
        let mut pending = VecDeque::from([action]);
        let mut completed = false;
        while let Some(action) = pending.pop_front() {
            completed |= action == ControllerAction::MoveCompleted;
            for effect in self.controller.update(action) {
                match effect {
                    Effect::Start(mv) => match self.animator.begin(mv) {
                        Ok(TurnStart::Animating { .. }) => {}
                        Ok(TurnStart::Skipped) => {
                            pending.push_back(ControllerAction::MoveCompleted);
                        }
                        Err(err) => {
                            warn_event("turn", err.to_string());
                            pending.push_back(ControllerAction::MoveCompleted);
                        }
                    },
                    Effect::Remount => self.animator.remount(&self.model),
                }
            }
        }
        // Race phases only advance when a queue drains, not on a bare reset.
        if completed && self.controller.is_idle() {
            let before = self.race.phase();
            if self.race.on_queue_idle() {
                log_event("race", format!("{before:?} -> {:?}", self.race.phase()));
            }
        }
    }
}

fn time_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        splitmix64(Date::now() as u64)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_millis() as u64)
            .unwrap_or(0);
        splitmix64(now)
    }
}

fn log_event(label: &str, detail: String) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::log!(label, detail);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (label, detail);
}

fn warn_event(label: &str, detail: String) {
    #[cfg(target_arch = "wasm32")]
    gloo::console::warn!(label, detail);
    #[cfg(not(target_arch = "wasm32"))]
    let _ = (label, detail);
}
