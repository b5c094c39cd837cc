#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use log::debug;
use std::time::Instant;

use crate::components::{HorizontalRepeat, Input};
use crate::config::Config;
use crate::engine::{GameEngine, RenderState};
use crate::systems::{drop_timer_system, input_system};

pub struct App {
    pub world: World,
    pub should_quit: bool,
    pub config: Config,
}

impl App {
    #[must_use]
    pub fn new(engine: GameEngine, config: Config) -> Self {
        let mut world = World::new();
        world.insert_resource(engine);
        world.insert_resource(Input::default());
        world.insert_resource(HorizontalRepeat::default());

        Self {
            world,
            should_quit: false,
            config,
        }
    }

    #[must_use]
    pub fn engine(&self) -> &GameEngine {
        self.world.resource::<GameEngine>()
    }

    #[must_use]
    pub fn render_state(&self) -> RenderState {
        self.engine().render_state()
    }

    /// Translates one terminal key event into at most one logical action.
    /// Every press counts; key repeats only count for horizontal movement,
    /// and only at the configured repeat interval.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            if matches!(key.code, KeyCode::Left | KeyCode::Right) {
                self.world.resource_mut::<HorizontalRepeat>().release();
            }
            return;
        }

        let direction = match key.code {
            KeyCode::Left => Some(-1),
            KeyCode::Right => Some(1),
            _ => None,
        };
        if let Some(direction) = direction {
            let interval = self.config.controls.horizontal_repeat();
            let repeat = key.kind == KeyEventKind::Repeat;
            let accepted = self
                .world
                .resource_mut::<HorizontalRepeat>()
                .accept(direction, repeat, now, interval);
            if accepted {
                let mut input = self.world.resource_mut::<Input>();
                if direction < 0 {
                    input.left = true;
                } else {
                    input.right = true;
                }
            }
            return;
        }

        if key.kind == KeyEventKind::Repeat {
            return;
        }

        if key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        let mut input = self.world.resource_mut::<Input>();
        match key.code {
            KeyCode::Down => input.soft_drop = true,
            KeyCode::Up | KeyCode::Char(' ') => input.rotate = true,
            KeyCode::Enter => input.hard_drop = true,
            KeyCode::Char('p') => input.pause = true,
            KeyCode::Char('s') => input.start = true,
            KeyCode::Char('r') => input.reset = true,
            KeyCode::Char('c') => input.clear_best = true,
            other => debug!("Unmapped key: {other:?}"),
        }
    }

    /// One frame of game logic: pending input first, then the drop timer.
    pub fn on_tick(&mut self) {
        input_system(&mut self.world);
        drop_timer_system(&mut self.world);
    }
}
