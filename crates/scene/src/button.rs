//! Screen-space buttons and the touch emotion picker built on them.

use campuswalk_common::{Rect, Time};
use campuswalk_ecs::{Component, EcsError, Entity};
use campuswalk_input::InputMode;
use campuswalk_render::{TextMode, TextStyle};
use campuswalk_world::World;
use glam::Vec3;

use crate::player::{Player, EMOTION_SPAN_MS};

/// A pressable region in pointer graphic coordinates.
#[derive(Debug, Clone, Copy)]
pub struct Button {
    pub mask: Rect,
    pub hover: bool,
    /// Latched while a press that started over the button is held.
    pub active: bool,
    /// True for exactly one frame, on release over the button while
    /// active.
    pub click: bool,
    pub disabled: bool,
}

impl Component for Button {
    const NAME: &'static str = "button";
}

impl Button {
    pub fn new(mask: Rect) -> Self {
        Self {
            mask,
            hover: false,
            active: false,
            click: false,
            disabled: false,
        }
    }
}

/// A button that applies an emotion to the local avatar when clicked.
#[derive(Debug, Clone)]
pub struct EmotionButton {
    pub text: String,
}

impl Component for EmotionButton {
    const NAME: &'static str = "emotion_button";
}

pub fn button_interact(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let World { ecs, input, .. } = world;
    let pointer = &input.pointer;

    ecs.for_each1(|_, button: &mut Button| {
        button.click = false;

        if button.disabled {
            button.hover = false;
            button.active = false;
            return;
        }

        button.hover = button.mask.contains(pointer.graphic_x, pointer.graphic_y);

        if button.hover && pointer.pressed {
            button.active = true;
        }

        if !pointer.down {
            if button.hover && button.active {
                button.click = true;
            }
            button.active = false;
        }
    })
}

pub fn emotion_button_interact(world: &mut World, time: Time) -> Result<(), EcsError> {
    let mut local: Option<Entity> = None;
    world.ecs.for_each1(|id, player: &mut Player| {
        if player.control {
            local = Some(id);
        }
    })?;
    let Some(local) = local else {
        return Ok(());
    };

    let mut picked: Option<String> = None;
    world.ecs.for_each2(|_, button: &mut Button, emotion: &mut EmotionButton| {
        if button.click {
            picked = Some(emotion.text.clone());
        }
    })?;

    if let Some(text) = picked {
        world.ecs.edit(local, |player: &mut Player| {
            player.emotion = text;
            player.emotion_until = time.total + EMOTION_SPAN_MS;
        })?;
    }
    Ok(())
}

/// The picker is pointless without a pointer, so keyboard mode hides it.
pub fn emotion_button_draw(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let World {
        ecs, input, draw, ..
    } = world;
    if input.mode == InputMode::Keyboard {
        return Ok(());
    }

    ecs.for_each2(|_, button: &mut Button, emotion: &mut EmotionButton| {
        let key_hash: u32 = emotion.text.chars().map(|c| c as u32).sum();
        let (x, y) = button.mask.center();
        draw.draw_text(
            &format!("emotionButton#{key_hash}"),
            &emotion.text,
            Vec3::new(x, y, 0.0),
            TextStyle {
                background: Some(
                    if button.active {
                        "#ccca"
                    } else if button.hover {
                        "#888a"
                    } else {
                        "#000a"
                    }
                    .to_owned(),
                ),
                border: button.hover.then(|| "1px solid white".to_owned()),
                padding: Some("0 12px".to_owned()),
                border_radius: Some("6px".to_owned()),
                font_size_rem: Some(2.4),
                ..TextStyle::default()
            },
            TextMode::Orthographic,
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::tests::{local_player, test_world};

    fn spawn_button(world: &mut World, text: &str, mask: Rect) -> Entity {
        world
            .ecs
            .create((Button::new(mask), EmotionButton { text: text.to_owned() }))
            .unwrap()
    }

    // pointer coordinates that land at graphic (0, 0) for an 800x600 view
    const CENTER: (f32, f32) = (400.0, 300.0);

    #[test]
    fn click_fires_once_on_release_over_the_button() {
        let mut world = test_world();
        let id = spawn_button(&mut world, "❤️", Rect::centered(0.5));

        world.input.on_pointer_down(CENTER.0, CENTER.1, InputMode::Touch, 0.0);
        world.frame(Time::new(16.0, 16.0));
        let button = world.ecs.read::<Button>(id).unwrap().unwrap();
        assert!(button.hover && button.active && !button.click);

        world.input.on_pointer_up(InputMode::Touch, 30.0);
        world.frame(Time::new(32.0, 16.0));
        let button = world.ecs.read::<Button>(id).unwrap().unwrap();
        assert!(button.click);
        assert!(!button.active);

        world.frame(Time::new(48.0, 16.0));
        let button = world.ecs.read::<Button>(id).unwrap().unwrap();
        assert!(!button.click, "click lasts one frame");
    }

    #[test]
    fn releasing_off_the_button_cancels_the_press() {
        let mut world = test_world();
        let id = spawn_button(&mut world, "❤️", Rect::centered(0.5));

        world.input.on_pointer_down(CENTER.0, CENTER.1, InputMode::Mouse, 0.0);
        world.frame(Time::new(16.0, 16.0));

        // drag away, then release
        world.input.on_pointer_move(0.0, 0.0);
        world.input.on_pointer_up(InputMode::Mouse, 400.0);
        world.frame(Time::new(32.0, 16.0));
        let button = world.ecs.read::<Button>(id).unwrap().unwrap();
        assert!(!button.click);
        assert!(!button.active);
    }

    #[test]
    fn disabled_buttons_never_react() {
        let mut world = test_world();
        let id = spawn_button(&mut world, "❤️", Rect::centered(0.5));
        world
            .ecs
            .edit(id, |b: &mut Button| b.disabled = true)
            .unwrap();

        world.input.on_pointer_down(CENTER.0, CENTER.1, InputMode::Touch, 0.0);
        world.frame(Time::new(16.0, 16.0));
        world.input.on_pointer_up(InputMode::Touch, 30.0);
        world.frame(Time::new(32.0, 16.0));

        let button = world.ecs.read::<Button>(id).unwrap().unwrap();
        assert!(!button.hover && !button.active && !button.click);
    }

    #[test]
    fn clicking_an_emotion_button_sets_the_player_emotion() {
        let mut world = test_world();
        let player = local_player(&mut world, Vec3::new(100.0, 100.0, 0.0));
        spawn_button(&mut world, "🎉", Rect::centered(0.5));

        world.input.on_pointer_down(CENTER.0, CENTER.1, InputMode::Touch, 0.0);
        world.frame(Time::new(16.0, 16.0));
        world.input.on_pointer_up(InputMode::Touch, 30.0);
        world.frame(Time::new(32.0, 16.0));

        let p = world.ecs.read::<Player>(player).unwrap().unwrap();
        assert_eq!(p.emotion, "🎉");
        assert_eq!(p.emotion_until, 32.0 + EMOTION_SPAN_MS);
    }

    #[test]
    fn picker_is_hidden_in_keyboard_mode() {
        let mut world = test_world();
        spawn_button(&mut world, "🎉", Rect::centered(0.5));

        world.frame(Time::new(16.0, 16.0));
        assert!(world.draw.overlay.is_empty());

        world.input.on_pointer_move(CENTER.0, CENTER.1);
        world.input.on_pointer_down(CENTER.0, CENTER.1, InputMode::Touch, 0.0);
        world.input.on_pointer_up(InputMode::Touch, 10.0);
        world.frame(Time::new(32.0, 16.0));
        assert!(!world.draw.overlay.is_empty());
    }
}
