use bevy_ecs::prelude::*;
use log::{debug, trace};

use crate::components::{Input, Status};
use crate::engine::GameEngine;

/// Applies the actions collected since the last frame, then clears them.
/// Each flag maps onto exactly one engine call.
pub fn input_system(world: &mut World) {
    let input = {
        let mut input = world.resource_mut::<Input>();
        let pending = input.clone();
        input.clear();
        pending
    };

    let mut engine = world.resource_mut::<GameEngine>();

    if input.clear_best {
        engine.clear_best();
    }

    if input.reset {
        engine.reset_game();
        return;
    }

    // Enter doubles as "start" on the idle and game over screens
    let wants_start = input.start || input.hard_drop;
    if wants_start && matches!(engine.status(), Status::Idle | Status::Over) {
        debug!("Start requested in {:?}", engine.status());
        engine.restart_game();
        return;
    }

    if input.pause {
        engine.toggle_pause();
    }

    if engine.status() != Status::Running {
        return;
    }

    // Hard drop ends the piece, so nothing else applies to it this frame
    if input.hard_drop {
        engine.hard_drop();
        return;
    }

    if input.left {
        engine.move_horizontal(-1);
    }
    if input.right {
        engine.move_horizontal(1);
    }
    if input.rotate {
        engine.rotate();
    }
    if input.soft_drop {
        engine.soft_drop();
    }
}

/// Lets the engine deliver its automatic drop when one is due.
pub fn drop_timer_system(world: &mut World) {
    let mut engine = world.resource_mut::<GameEngine>();
    if engine.tick() {
        trace!("Automatic drop delivered");
    }
}
