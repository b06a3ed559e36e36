use std::collections::VecDeque;

use crate::notation::{inverse_sequence, Move};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControllerAction {
    Submit(Move),
    SubmitAll(Vec<Move>),
    Resolve,
    Reset,
    /// The renderer finished (or skipped) the move it was handed.
    MoveCompleted,
}

/// Work the renderer must carry out after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Start(Move),
    Remount,
}

/// Serial move queue with the history needed to undo it.
#[derive(Clone, Debug, Default)]
pub struct ControllerState {
    queue: VecDeque<Move>,
    history: Vec<Move>,
    in_flight: Option<Move>,
    animating: bool,
    mount_epoch: u64,
}

impl ControllerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, action: ControllerAction) -> Vec<Effect> {
        let mut effects = Vec::new();
        match action {
            ControllerAction::Submit(mv) => self.enqueue(mv),
            ControllerAction::SubmitAll(moves) => {
                for mv in moves {
                    self.enqueue(mv);
                }
            }
            ControllerAction::Resolve => {
                if !self.history.is_empty() {
                    self.queue.extend(inverse_sequence(&self.history));
                    self.history.clear();
                }
            }
            ControllerAction::Reset => {
                self.queue.clear();
                self.history.clear();
                self.in_flight = None;
                self.animating = false;
                self.mount_epoch += 1;
                effects.push(Effect::Remount);
            }
            ControllerAction::MoveCompleted => {
                if self.in_flight.take().is_none() {
                    return effects;
                }
                self.animating = false;
            }
        }
        if let Some(mv) = self.drain() {
            effects.push(Effect::Start(mv));
        }
        effects
    }

    fn enqueue(&mut self, mv: Move) {
        self.queue.push_back(mv);
        self.history.push(mv);
    }

    fn drain(&mut self) -> Option<Move> {
        if self.animating {
            return None;
        }
        let mv = self.queue.pop_front()?;
        self.in_flight = Some(mv);
        self.animating = true;
        Some(mv)
    }

    pub fn queue(&self) -> &VecDeque<Move> {
        &self.queue
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn in_flight(&self) -> Option<Move> {
        self.in_flight
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn mount_epoch(&self) -> u64 {
        self.mount_epoch
    }

    pub fn is_busy(&self) -> bool {
        self.animating || !self.queue.is_empty()
    }

    pub fn is_idle(&self) -> bool {
        !self.is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::parse_algorithm;

    fn moves(text: &str) -> Vec<Move> {
        parse_algorithm(text).expect("valid algorithm")
    }

    #[test]
    fn first_submit_starts_immediately() {
        let mut state = ControllerState::new();
        let r = moves("R")[0];
        assert_eq!(state.update(ControllerAction::Submit(r)), vec![Effect::Start(r)]);
        assert_eq!(state.in_flight(), Some(r));
        assert!(state.queue().is_empty());
        assert_eq!(state.history(), &[r]);
    }

    #[test]
    fn second_submit_waits_for_completion() {
        let mut state = ControllerState::new();
        let seq = moves("R U");
        state.update(ControllerAction::Submit(seq[0]));
        assert!(state.update(ControllerAction::Submit(seq[1])).is_empty());
        assert_eq!(
            state.update(ControllerAction::MoveCompleted),
            vec![Effect::Start(seq[1])]
        );
        assert!(state.update(ControllerAction::MoveCompleted).is_empty());
        assert!(state.is_idle());
    }

    #[test]
    fn resolve_queues_inverses_and_clears_history() {
        let mut state = ControllerState::new();
        state.update(ControllerAction::SubmitAll(moves("R U2 F'")));
        state.update(ControllerAction::Resolve);
        assert!(state.history().is_empty());
        let queued: Vec<Move> = state.queue().iter().copied().collect();
        assert_eq!(queued, moves("U2 F' F U2 R'"));
    }

    #[test]
    fn resolve_with_empty_history_is_noop() {
        let mut state = ControllerState::new();
        assert!(state.update(ControllerAction::Resolve).is_empty());
        assert!(state.is_idle());
    }

    #[test]
    fn reset_clears_and_ignores_stale_completion() {
        let mut state = ControllerState::new();
        state.update(ControllerAction::SubmitAll(moves("R U F")));
        assert_eq!(state.update(ControllerAction::Reset), vec![Effect::Remount]);
        assert_eq!(state.mount_epoch(), 1);
        assert!(state.queue().is_empty());
        assert!(state.history().is_empty());
        assert!(!state.is_animating());
        assert!(state.update(ControllerAction::MoveCompleted).is_empty());
    }
}
