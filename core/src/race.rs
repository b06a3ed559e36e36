use std::fmt;

use rand::Rng;

use crate::notation::Move;
use crate::rules::CubeRules;
use crate::scramble::scramble;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaceOutcome {
    Win,
    Lose,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RacePhase {
    Idle,
    /// The random sequence is playing on the cube.
    Showing,
    /// Waiting for the player to press the start key.
    Ready,
    /// The automatic resolve is running against the player.
    Racing,
    Finished(RaceOutcome),
}

/// What the app has to do to the cube for a race transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaceCommand {
    ResetCube,
    Submit(Vec<Move>),
    Resolve,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaceError {
    LengthOutOfRange {
        length: usize,
        min: usize,
        max: usize,
    },
    NotIdle,
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaceError::LengthOutOfRange { length, min, max } => {
                write!(f, "race length must be between {min} and {max}, got {length}")
            }
            RaceError::NotIdle => write!(f, "a race is already running"),
        }
    }
}

impl std::error::Error for RaceError {}

#[derive(Clone, Debug)]
pub struct RaceState {
    phase: RacePhase,
    sequence: Vec<Move>,
    min_length: usize,
    max_length: usize,
}

impl RaceState {
    pub fn new(rules: &CubeRules) -> Self {
        Self {
            phase: RacePhase::Idle,
            sequence: Vec::new(),
            min_length: rules.race_length_min,
            max_length: rules.race_length_max,
        }
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn sequence(&self) -> &[Move] {
        &self.sequence
    }

    /// Showing, Ready and Racing lock the regular move controls.
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            RacePhase::Showing | RacePhase::Ready | RacePhase::Racing
        )
    }

    /// Draws a fresh sequence and plays it from a solved cube.
    pub fn start<R: Rng + ?Sized>(
        &mut self,
        length: usize,
        rng: &mut R,
    ) -> Result<Vec<RaceCommand>, RaceError> {
        if self.phase != RacePhase::Idle {
            return Err(RaceError::NotIdle);
        }
        if !(self.min_length..=self.max_length).contains(&length) {
            return Err(RaceError::LengthOutOfRange {
                length,
                min: self.min_length,
                max: self.max_length,
            });
        }
        self.sequence = scramble(rng, length);
        self.phase = RacePhase::Showing;
        Ok(vec![
            RaceCommand::ResetCube,
            RaceCommand::Submit(self.sequence.clone()),
        ])
    }

    /// The move queue drained: the shown sequence or the automatic resolve is done.
    pub fn on_queue_idle(&mut self) -> bool {
        let next = match self.phase {
            RacePhase::Showing => RacePhase::Ready,
            RacePhase::Racing => RacePhase::Finished(RaceOutcome::Lose),
            _ => return false,
        };
        self.phase = next;
        true
    }

    /// The start/stop key was pressed.
    pub fn on_key(&mut self) -> Vec<RaceCommand> {
        match self.phase {
            RacePhase::Ready => {
                self.phase = RacePhase::Racing;
                vec![RaceCommand::Resolve]
            }
            RacePhase::Racing => {
                self.phase = RacePhase::Finished(RaceOutcome::Win);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn try_again(&mut self) -> Vec<RaceCommand> {
        if !matches!(self.phase, RacePhase::Finished(_)) {
            return Vec::new();
        }
        self.abort();
        vec![RaceCommand::ResetCube]
    }

    pub fn abort(&mut self) {
        self.phase = RacePhase::Idle;
        self.sequence.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scramble::seeded_rng;

    #[test]
    fn rejects_out_of_range_lengths() {
        let mut race = RaceState::new(&CubeRules::default());
        let mut rng = seeded_rng(1);
        assert_eq!(
            race.start(0, &mut rng),
            Err(RaceError::LengthOutOfRange {
                length: 0,
                min: 1,
                max: 50
            })
        );
        assert!(race.start(51, &mut rng).is_err());
        assert_eq!(race.phase(), RacePhase::Idle);
    }

    #[test]
    fn key_before_resolve_finishes_wins() {
        let mut race = RaceState::new(&CubeRules::default());
        let commands = race.start(3, &mut seeded_rng(9)).expect("in range");
        assert_eq!(commands.len(), 2);
        assert_eq!(race.sequence().len(), 3);
        assert!(race.on_key().is_empty());
        assert!(race.on_queue_idle());
        assert_eq!(race.phase(), RacePhase::Ready);
        assert_eq!(race.on_key(), vec![RaceCommand::Resolve]);
        race.on_key();
        assert_eq!(race.phase(), RacePhase::Finished(RaceOutcome::Win));
        assert!(!race.on_queue_idle());
    }

    #[test]
    fn resolve_finishing_first_loses() {
        let mut race = RaceState::new(&CubeRules::default());
        race.start(4, &mut seeded_rng(2)).expect("in range");
        race.on_queue_idle();
        race.on_key();
        race.on_queue_idle();
        assert_eq!(race.phase(), RacePhase::Finished(RaceOutcome::Lose));
        assert_eq!(race.try_again(), vec![RaceCommand::ResetCube]);
        assert_eq!(race.phase(), RacePhase::Idle);
    }
}
