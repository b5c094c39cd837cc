#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use bevy_ecs::prelude::*;
    use std::sync::Arc;

    use crate::components::{Input, Status};
    use crate::engine::GameEngine;
    use crate::shapes::PieceKind;
    use crate::systems::{drop_timer_system, input_system};
    use crate::tests::test_utils::{ManualClock, create_test_engine, piece};

    fn create_test_world() -> (World, Arc<ManualClock>) {
        let (engine, clock) = create_test_engine();
        let mut world = World::new();
        world.insert_resource(engine);
        world.init_resource::<Input>();
        (world, clock)
    }

    fn press(world: &mut World, apply: impl FnOnce(&mut Input)) {
        apply(world.resource_mut::<Input>().into_inner());
        input_system(world);
    }

    fn status(world: &World) -> Status {
        world.resource::<GameEngine>().status()
    }

    #[test]
    fn test_start_from_idle() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.start = true);
        assert_eq!(status(&world), Status::Running);
    }

    #[test]
    fn test_enter_starts_from_idle_without_dropping() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.hard_drop = true);

        let engine = world.resource::<GameEngine>();
        assert_eq!(engine.status(), Status::Running);
        assert!(engine.state().board.is_empty());
    }

    #[test]
    fn test_input_is_consumed() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.start = true);
        press(&mut world, |input| input.pause = true);
        assert_eq!(status(&world), Status::Paused);

        // Nothing pending, so the next frame changes nothing
        input_system(&mut world);
        assert_eq!(status(&world), Status::Paused);
    }

    #[test]
    fn test_movement_ignored_when_not_running() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.start = true);
        press(&mut world, |input| input.pause = true);
        let before = world.resource::<GameEngine>().state().clone();

        press(&mut world, |input| {
            input.left = true;
            input.rotate = true;
            input.soft_drop = true;
        });
        assert_eq!(world.resource::<GameEngine>().state(), &before);
    }

    #[test]
    fn test_moves_applied() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.start = true);
        world.resource_mut::<GameEngine>().state_mut().current = piece(PieceKind::T, 0, 4, 5);

        press(&mut world, |input| {
            input.right = true;
            input.rotate = true;
            input.soft_drop = true;
        });

        let current = world.resource::<GameEngine>().state().current;
        assert_eq!(current, piece(PieceKind::T, 1, 5, 6));
    }

    #[test]
    fn test_hard_drop_skips_other_actions() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.start = true);
        world.resource_mut::<GameEngine>().state_mut().current = piece(PieceKind::O, 0, 3, 0);

        press(&mut world, |input| {
            input.hard_drop = true;
            input.left = true;
        });

        // Landed straight below the spawn column
        let engine = world.resource::<GameEngine>();
        assert_eq!(engine.state().board.get(4, 19), Some(Some(PieceKind::O)));
        assert_eq!(engine.state().board.get(3, 19), Some(None));
    }

    #[test]
    fn test_reset_wins_over_start() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.start = true);
        press(&mut world, |input| {
            input.reset = true;
            input.start = true;
        });
        assert_eq!(status(&world), Status::Idle);
    }

    #[test]
    fn test_clear_best_applies_in_any_state() {
        let (mut world, _clock) = create_test_world();
        press(&mut world, |input| input.clear_best = true);
        assert_eq!(status(&world), Status::Idle);
        assert_eq!(world.resource::<GameEngine>().best().score, 0);
    }

    #[test]
    fn test_drop_timer_system() {
        let (mut world, clock) = create_test_world();
        press(&mut world, |input| input.start = true);
        let y = world.resource::<GameEngine>().state().current.y;

        drop_timer_system(&mut world);
        assert_eq!(world.resource::<GameEngine>().state().current.y, y);

        clock.advance_ms(800);
        drop_timer_system(&mut world);
        assert_eq!(world.resource::<GameEngine>().state().current.y, y + 1);
    }
}
