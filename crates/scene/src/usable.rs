//! Interactable props: proximity detection and the hover label.

use campuswalk_common::{Rect, Time, Transform};
use campuswalk_ecs::{Component, EcsError};
use campuswalk_render::{TextMode, TextStyle};
use campuswalk_world::World;
use glam::Vec3;

use crate::player::{player_mask, Player};

/// Something the avatar can stand next to and use.
#[derive(Debug, Clone)]
pub struct Usable {
    /// Interaction range relative to the entity's translation.
    pub range: Rect,
    pub label: String,
    /// Recomputed every tick; true while the local avatar is in range.
    pub hover: bool,
}

impl Component for Usable {
    const NAME: &'static str = "usable";
}

/// Recompute `hover` for every usable from the local avatar's mask.
pub fn usable_use(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let mut local_mask: Option<Rect> = None;
    world.ecs.for_each2(|_, transform: &mut Transform, player: &mut Player| {
        if player.control {
            local_mask = Some(player_mask(transform.translation()));
        }
    })?;

    world.ecs.for_each2(|_, transform: &mut Transform, usable: &mut Usable| {
        usable.hover = false;
        if let Some(mask) = &local_mask {
            let p = transform.translation();
            if mask.overlaps(&usable.range.translate(p.x, p.y)) {
                usable.hover = true;
            }
        }
    })
}

/// Show the action label above a hovered usable.
pub fn usable_draw(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let World { ecs, draw, .. } = world;
    ecs.for_each2(|_, transform: &mut Transform, usable: &mut Usable| {
        if usable.hover {
            draw.draw_text(
                "usableLabel",
                &usable.label,
                transform.translation() + Vec3::new(0.0, 0.0, 1.75),
                TextStyle {
                    background: Some("#000a".to_owned()),
                    padding: Some("0 3px".to_owned()),
                    border_radius: Some("3px".to_owned()),
                    color: Some("yellow".to_owned()),
                    bold: true,
                    ..TextStyle::default()
                },
                TextMode::Immersive,
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::tests::{local_player, test_world};
    use campuswalk_input::Key;

    fn spawn_usable(world: &mut World, x: f32, y: f32) {
        world
            .ecs
            .create((
                Transform::from_translation(Vec3::new(x, y, 0.0)),
                Usable {
                    range: Rect::centered(2.0),
                    label: "📖 read".to_owned(),
                    hover: false,
                },
            ))
            .unwrap();
    }

    #[test]
    fn hover_tracks_player_proximity() {
        let mut world = test_world();
        local_player(&mut world, Vec3::ZERO);
        spawn_usable(&mut world, 0.5, 0.0);
        spawn_usable(&mut world, 50.0, 0.0);

        world.frame(Time::new(16.0, 16.0));
        let mut hovers = Vec::new();
        world
            .ecs
            .for_each1(|_, u: &mut Usable| hovers.push(u.hover))
            .unwrap();
        assert_eq!(hovers, vec![true, false]);
    }

    #[test]
    fn hover_clears_when_the_player_walks_away() {
        let mut world = test_world();
        local_player(&mut world, Vec3::ZERO);
        spawn_usable(&mut world, 0.5, 0.0);
        world.frame(Time::new(16.0, 16.0));

        // walk right, out of range, over a few frames
        world.input.on_key_down(Key::Right);
        for i in 2..40 {
            world.frame(Time::new(i as f64 * 100.0, 100.0));
        }

        let mut hover = true;
        world
            .ecs
            .for_each1(|_, u: &mut Usable| hover = u.hover)
            .unwrap();
        assert!(!hover);
    }

    #[test]
    fn hovered_usable_draws_its_label() {
        let mut world = test_world();
        local_player(&mut world, Vec3::ZERO);
        spawn_usable(&mut world, 0.5, 0.0);
        world.frame(Time::new(16.0, 16.0));
        assert!(world.draw.overlay.get("usableLabel").is_some());
    }
}
