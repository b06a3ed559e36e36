use kyubu_core::{
    seeded_rng, ControllerAction, ControllerState, CubeRules, Effect, RaceCommand, RaceOutcome,
    RacePhase, RaceState,
};

/// Applies race commands to a controller whose moves complete on demand.
fn apply(controller: &mut ControllerState, commands: Vec<RaceCommand>) -> Vec<Effect> {
    let mut effects = Vec::new();
    for command in commands {
        let action = match command {
            RaceCommand::ResetCube => ControllerAction::Reset,
            RaceCommand::Submit(moves) => ControllerAction::SubmitAll(moves),
            RaceCommand::Resolve => ControllerAction::Resolve,
        };
        effects.extend(controller.update(action));
    }
    effects
}

fn complete_one(controller: &mut ControllerState, race: &mut RaceState) {
    controller.update(ControllerAction::MoveCompleted);
    if controller.is_idle() {
        race.on_queue_idle();
    }
}

fn show_sequence(length: usize, seed: u64) -> (ControllerState, RaceState) {
    let rules = CubeRules::default();
    let mut controller = ControllerState::new();
    let mut race = RaceState::new(&rules);
    let commands = race.start(length, &mut seeded_rng(seed)).expect("valid length");
    let effects = apply(&mut controller, commands);
    assert_eq!(effects.first(), Some(&Effect::Remount));
    assert_eq!(race.phase(), RacePhase::Showing);
    while race.phase() == RacePhase::Showing {
        complete_one(&mut controller, &mut race);
    }
    (controller, race)
}

#[test]
fn pressing_during_resolve_wins() {
    let (mut controller, mut race) = show_sequence(6, 11);
    assert_eq!(race.phase(), RacePhase::Ready);
    let commands = race.on_key();
    apply(&mut controller, commands);
    assert_eq!(race.phase(), RacePhase::Racing);
    assert!(controller.is_busy());

    complete_one(&mut controller, &mut race);
    race.on_key();
    assert_eq!(race.phase(), RacePhase::Finished(RaceOutcome::Win));

    while controller.is_busy() {
        complete_one(&mut controller, &mut race);
    }
    assert_eq!(race.phase(), RacePhase::Finished(RaceOutcome::Win));
}

#[test]
fn waiting_for_resolve_loses() {
    let (mut controller, mut race) = show_sequence(3, 12);
    let commands = race.on_key();
    apply(&mut controller, commands);
    while controller.is_busy() {
        complete_one(&mut controller, &mut race);
    }
    assert_eq!(race.phase(), RacePhase::Finished(RaceOutcome::Lose));
    assert_eq!(race.sequence().len(), 3);
}

#[test]
fn same_seed_same_race() {
    let (_, a) = show_sequence(10, 99);
    let (_, b) = show_sequence(10, 99);
    assert_eq!(a.sequence(), b.sequence());
}

#[test]
fn try_again_resets_cube() {
    let (mut controller, mut race) = show_sequence(2, 3);
    race.on_key();
    race.on_key();
    let commands = race.try_again();
    let epoch = controller.mount_epoch();
    let effects = apply(&mut controller, commands);
    assert_eq!(effects, vec![Effect::Remount]);
    assert_eq!(controller.mount_epoch(), epoch + 1);
    assert_eq!(race.phase(), RacePhase::Idle);
    assert!(race.sequence().is_empty());
}
