use std::time::Instant;

use kiss3d::event::{Action, Key, WindowEvent};

use crate::model::World;

// Key config, all in one place
const KEY_QUIT: Key = Key::Escape;
const KEY_TOGGLE_ANIMATION: Key = Key::Space;
const KEY_TOGGLE_STARFIELD: Key = Key::S;
const KEY_SPEED_UP: Key = Key::Equals;
const KEY_SPEED_UP_NUMPAD: Key = Key::Add;
const KEY_SLOW_DOWN: Key = Key::Minus;
const KEY_SLOW_DOWN_NUMPAD: Key = Key::Subtract;
const KEY_TURN_LEFT: Key = Key::Left;
const KEY_TURN_RIGHT: Key = Key::Right;
const KEY_FORWARD: Key = Key::Up;
const KEY_BACKWARD: Key = Key::Down;

/// Maps key presses onto world transitions. Every press counts, including
/// key-repeat ones; movement works whether or not the animation runs.
pub struct Controller {
    quit_requested: bool,
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            quit_requested: false,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn process_event(&mut self, event: &WindowEvent, world: &mut World, now: Instant) {
        match *event {
            WindowEvent::Key(KEY_QUIT, Action::Press, _) => {
                self.quit_requested = true;
            }
            WindowEvent::Key(KEY_TOGGLE_ANIMATION, Action::Press, _) => {
                world.toggle_animation(now);
            }
            WindowEvent::Key(KEY_TOGGLE_STARFIELD, Action::Press, _) => {
                world.starfield.toggle();
            }
            WindowEvent::Key(KEY_SPEED_UP, Action::Press, _)
            | WindowEvent::Key(KEY_SPEED_UP_NUMPAD, Action::Press, _) => {
                world.shorten_frame_interval();
            }
            WindowEvent::Key(KEY_SLOW_DOWN, Action::Press, _)
            | WindowEvent::Key(KEY_SLOW_DOWN_NUMPAD, Action::Press, _) => {
                world.lengthen_frame_interval();
            }
            WindowEvent::Key(KEY_TURN_LEFT, Action::Press, _) => {
                world.craft.turn_left();
            }
            WindowEvent::Key(KEY_TURN_RIGHT, Action::Press, _) => {
                world.craft.turn_right();
            }
            WindowEvent::Key(KEY_FORWARD, Action::Press, _) => {
                world.craft.advance();
            }
            WindowEvent::Key(KEY_BACKWARD, Action::Press, _) => {
                world.craft.retreat();
            }
            _ => {}
        }
    }
}
