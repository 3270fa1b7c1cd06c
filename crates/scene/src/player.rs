//! The avatar: local movement and publishing, remote interpolation and
//! reconciliation, and the shared billboard/label drawing.
//!
//! # Invariants
//! - Collision is resolved per axis against the aggregate of all walls,
//!   so a blocked axis never cancels the other (wall sliding).
//! - Facing flips on the sign of the resolved X displacement only.
//! - Remote positions interpolate source to target over the publish
//!   interval and never extrapolate past the target.

use campuswalk_common::{Rect, Time, Transform};
use campuswalk_ecs::{Component, EcsError};
use campuswalk_input::Key;
use campuswalk_render::{AvatarSkin, MeshId, TextMode, TextStyle, TextureKey};
use campuswalk_world::World;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::warn;

use crate::wall::Wall;

/// Walk-cycle frame length in milliseconds of animation phase.
pub const MOVE_ANIMATION_FRAME_SCALE: f64 = 100.0;

/// Side length of the avatar's square collision mask.
pub const PLAYER_MASK_SIZE: f32 = 0.3;

/// Spacing of outbound location updates; also the remote interpolation
/// window.
pub const PUBLISH_INTERVAL_MS: f64 = 200.0;

/// How long a picked emotion stays on the local avatar.
pub const EMOTION_SPAN_MS: f64 = 3000.0;

/// Display expiry applied to emotions arriving from remote peers.
const REMOTE_EMOTION_SPAN_MS: f64 = 500.0;

/// Remote players survive this long past their last message.
const PEER_GRACE_MS: f64 = 2000.0;

/// Units per second along each axis. Y is slower to match the camera
/// foreshortening.
const SPEED_X: f32 = 7.0;
const SPEED_Y: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// One avatar, local (`control`) or remote.
#[derive(Debug, Clone)]
pub struct Player {
    pub skin: AvatarSkin,
    pub username: String,
    /// Display name; also the identity key for remote reconciliation.
    pub name: String,
    pub direction: Facing,
    /// Walk animation phase in milliseconds, 0 at rest.
    pub move_animation: f64,
    pub last_location_updated: f64,
    pub control: bool,
    pub valid_until: f64,
    pub source_position: Vec3,
    pub target_position: Vec3,
    pub target_refreshed: f64,
    pub emotion: String,
    pub emotion_until: f64,
}

impl Component for Player {
    const NAME: &'static str = "player";
}

impl Player {
    pub fn local(skin: AvatarSkin, username: &str, name: &str) -> Self {
        Self {
            skin,
            username: username.to_owned(),
            name: name.to_owned(),
            direction: Facing::Right,
            move_animation: 0.0,
            last_location_updated: 0.0,
            control: true,
            valid_until: 0.0,
            source_position: Vec3::ZERO,
            target_position: Vec3::ZERO,
            target_refreshed: 0.0,
            emotion: String::new(),
            emotion_until: 0.0,
        }
    }

    fn remote(skin: AvatarSkin, name: &str, position: Vec3, now: f64) -> Self {
        Self {
            skin,
            username: name.to_owned(),
            name: name.to_owned(),
            direction: Facing::Left,
            move_animation: 0.0,
            last_location_updated: now,
            control: false,
            valid_until: now + PEER_GRACE_MS,
            source_position: position,
            target_position: position,
            target_refreshed: now,
            emotion: String::new(),
            emotion_until: 0.0,
        }
    }

    fn advance_walk_animation(&mut self, moved: bool, delta: f64) {
        if moved {
            if self.move_animation == 0.0 {
                // skip most of the idle frame so the first step shows fast
                self.move_animation = MOVE_ANIMATION_FRAME_SCALE * 0.8;
            } else {
                self.move_animation += delta;
            }
        } else {
            self.move_animation = 0.0;
        }
    }

    fn face_by_dx(&mut self, dx: f32) {
        if dx > 0.0 {
            self.direction = Facing::Right;
        } else if dx < 0.0 {
            self.direction = Facing::Left;
        }
    }

    fn active_emotion(&self, now: f64) -> &str {
        if self.emotion_until > now {
            &self.emotion
        } else {
            ""
        }
    }
}

/// Eight pickable emotions plus the four arrow hints shown around them.
/// A chord is the exact held state of (left, right, up, down).
struct EmotionOption {
    text: &'static str,
    offset: [f32; 2],
    font_size_rem: f32,
    chord: Option<[bool; 4]>,
}

const EMOTION_OPTIONS: [EmotionOption; 12] = [
    EmotionOption { text: "←", offset: [-3.0, 0.0], font_size_rem: 1.0, chord: None },
    EmotionOption { text: "→", offset: [3.0, 0.0], font_size_rem: 1.0, chord: None },
    EmotionOption { text: "↑", offset: [0.0, 3.0], font_size_rem: 1.0, chord: None },
    EmotionOption { text: "↓", offset: [0.0, -3.0], font_size_rem: 1.0, chord: None },
    EmotionOption { text: "❤️", offset: [-2.0, 0.0], font_size_rem: 1.5, chord: Some([true, false, false, false]) },
    EmotionOption { text: "🎉", offset: [2.0, 0.0], font_size_rem: 1.5, chord: Some([false, true, false, false]) },
    EmotionOption { text: "✅", offset: [0.0, 2.0], font_size_rem: 1.5, chord: Some([false, false, true, false]) },
    EmotionOption { text: "😭", offset: [0.0, -2.0], font_size_rem: 1.5, chord: Some([false, false, false, true]) },
    EmotionOption { text: "🔥", offset: [-2.0, 2.0], font_size_rem: 1.5, chord: Some([true, false, true, false]) },
    EmotionOption { text: "👀", offset: [2.0, 2.0], font_size_rem: 1.5, chord: Some([false, true, true, false]) },
    EmotionOption { text: "⬅️", offset: [-2.0, -2.0], font_size_rem: 1.5, chord: Some([true, false, false, true]) },
    EmotionOption { text: "➡️", offset: [2.0, -2.0], font_size_rem: 1.5, chord: Some([false, true, false, true]) },
];

fn text_key_hash(text: &str) -> u32 {
    text.chars().map(|c| c as u32).sum()
}

pub fn player_mask(position: Vec3) -> Rect {
    Rect::centered(PLAYER_MASK_SIZE).translate(position.x, position.y)
}

/// Local avatar movement, collision, facing, walk animation, location
/// publishing and the emotion chord picker.
pub fn player_move(world: &mut World, time: Time) -> Result<(), EcsError> {
    let mut walls: Vec<Rect> = Vec::new();
    world.ecs.for_each2(|_, t: &mut Transform, wall: &mut Wall| {
        let p = t.translation();
        walls.push(wall.mask.translate(p.x, p.y));
    })?;

    let World { ecs, input, net, .. } = world;

    ecs.for_each2(|_, transform: &mut Transform, player: &mut Player| {
        if !player.control {
            return;
        }

        let key_dir = Vec2::new(
            (input.held(Key::Right) as i32 - input.held(Key::Left) as i32) as f32,
            (input.held(Key::Up) as i32 - input.held(Key::Down) as i32) as f32,
        )
        .normalize_or_zero();

        // pointer steering: direction from screen center, like a stick
        let pointer_dir = if input.pointer.down {
            Vec2::new(input.pointer.graphic_x, input.pointer.graphic_y).normalize_or_zero()
        } else {
            Vec2::ZERO
        };

        let direction = if input.held(Key::Emotion) {
            Vec2::ZERO
        } else {
            (key_dir + pointer_dir).normalize_or_zero()
        };

        let position = transform.translation();
        let mask = player_mask(position);

        let mut dx = direction.x * time.delta as f32 * SPEED_X / 1000.0;
        let mut dy = direction.y * time.delta as f32 * SPEED_Y / 1000.0;
        for wall in &walls {
            if mask.translate(dx, 0.0).overlaps(wall) {
                dx = 0.0;
            }
            if mask.translate(0.0, dy).overlaps(wall) {
                dy = 0.0;
            }
        }

        transform.translate(Vec3::new(dx, dy, 0.0));
        player.face_by_dx(dx);
        player.advance_walk_animation(dx.abs() + dy.abs() > 0.0, time.delta);

        if time.total - player.last_location_updated > PUBLISH_INTERVAL_MS {
            let new_position = transform.translation();
            let emotion = player.active_emotion(time.total).to_owned();
            if let Err(err) = net.publish(
                time.total,
                &player.name,
                player.skin.as_str(),
                [new_position.x, new_position.y],
                &emotion,
            ) {
                warn!(%err, "location publish failed");
            }
            player.last_location_updated = time.total;
        }

        if input.released(Key::Emotion) {
            let chord = [
                input.held(Key::Left),
                input.held(Key::Right),
                input.held(Key::Up),
                input.held(Key::Down),
            ];
            for option in &EMOTION_OPTIONS {
                if option.chord == Some(chord) {
                    player.emotion = option.text.to_owned();
                    player.emotion_until = time.total + EMOTION_SPAN_MS;
                }
            }
        }
    })
}

/// Remote avatars glide from source toward target over the publish
/// interval; outside [0, 1] the position holds.
pub fn player_target_move(world: &mut World, time: Time) -> Result<(), EcsError> {
    world.ecs.for_each2(|_, transform: &mut Transform, player: &mut Player| {
        if player.control {
            return;
        }

        let k = (time.total - player.target_refreshed) / PUBLISH_INTERVAL_MS;
        if (0.0..=1.0).contains(&k) {
            let origin = transform.translation();
            let next = player.source_position.lerp(player.target_position, k as f32);
            *transform = Transform::from_translation(next);
            let delta = next - origin;
            player.face_by_dx(delta.x);
            player.advance_walk_animation(delta.length() > 0.0, time.delta);
        }
    })
}

/// Reconcile the inbound presence queue: spawn unseen peers, apply the
/// last message per peer, evict peers gone past their grace period. The
/// queue is consumed whole each frame.
pub fn player_remote_move(world: &mut World, time: Time) -> Result<(), EcsError> {
    let queue = world.net.drain();

    let mut local_name: Option<String> = None;
    let mut known: Vec<String> = Vec::new();
    world.ecs.for_each1(|_, player: &mut Player| {
        if player.control {
            local_name = Some(player.name.clone());
        }
        known.push(player.name.clone());
    })?;

    for body in &queue {
        if Some(&body.user_id) == local_name.as_ref() {
            continue;
        }
        if !known.contains(&body.user_id) {
            let position = Vec3::new(body.position[0], body.position[1], 0.0);
            let skin = AvatarSkin::parse(&body.player_type).unwrap_or_default();
            world.ecs.create((
                Transform::from_translation(position),
                Player::remote(skin, &body.user_id, position, time.total),
            ))?;
            known.push(body.user_id.clone());
        }
    }

    world.ecs.for_each2(|_, transform: &mut Transform, player: &mut Player| {
        if player.control {
            return;
        }
        // later messages win
        let Some(body) = queue.iter().rev().find(|b| b.user_id == player.name) else {
            return;
        };

        if let Some(skin) = AvatarSkin::parse(&body.player_type) {
            player.skin = skin;
        }
        player.source_position = transform.translation();
        player.target_position = Vec3::new(body.position[0], body.position[1], 0.0);
        player.target_refreshed = time.total;
        player.valid_until = time.total + PEER_GRACE_MS;
        player.emotion = body.emotion.clone();
        player.emotion_until = if body.emotion.is_empty() {
            0.0
        } else {
            time.total + REMOTE_EMOTION_SPAN_MS
        };
    })?;

    let mut stale = Vec::new();
    world.ecs.for_each1(|id, player: &mut Player| {
        if player.control {
            return;
        }
        let seen = queue.iter().any(|b| b.user_id == player.name);
        if !seen && player.valid_until < time.total {
            stale.push(id);
        }
    })?;
    for id in stale {
        world.ecs.remove(id);
    }

    Ok(())
}

/// Camera, warp, sky dome and billboard for the local avatar; billboard,
/// name label and emotion bubble for everyone.
pub fn player_draw(world: &mut World, time: Time) -> Result<(), EcsError> {
    let World { ecs, input, draw, .. } = world;

    ecs.for_each2(|_, transform: &mut Transform, player: &mut Player| {
        let position = transform.translation();

        if player.control {
            let view = Mat4::perspective_rh_gl(FRAC_PI_2, draw.aspect(), 0.1, 1000.0)
                * Mat4::from_rotation_x(PI * 0.17)
                * Mat4::from_rotation_x(-FRAC_PI_2)
                * Mat4::from_translation(Vec3::new(0.0, 8.0, -5.5))
                * Mat4::from_translation(-position);
            draw.set_view(view);

            let singularity = Vec3::new(0.0, 0.0, -60.0) + position;
            draw.set_warp(Vec4::new(0.0, 0.0, -1.0, 60.0), singularity, 60.0);
        }

        let frame = (player.move_animation / MOVE_ANIMATION_FRAME_SCALE).floor() as i64 % 2;
        draw.push_matrix();
        draw.add_matrix(transform.0);
        draw.add_matrix(Mat4::from_translation(Vec3::new(
            0.0,
            0.0,
            if frame == 0 { 1.0 } else { 1.1 },
        )));
        draw.add_matrix(Mat4::from_rotation_x(FRAC_PI_2));
        if player.control {
            draw.set_hider_pivot(Vec3::new(0.0, 0.0, 0.75));
        }
        draw.set_ambient(1.0);
        draw.set_texture(if frame == 0 {
            TextureKey::AvatarIdle(player.skin)
        } else {
            TextureKey::AvatarJump(player.skin)
        });
        let mesh = if player.direction == Facing::Left {
            MeshId::Sprite
        } else {
            MeshId::SpriteMirror
        };
        if let Some(command) = draw.command(mesh) {
            draw.draw_defer_position(position, command);
        }
        if player.control {
            draw.clear_hider_pivot();
        }
        draw.pop_matrix();

        if player.control && input.held(Key::Emotion) {
            let chord = [
                input.held(Key::Left),
                input.held(Key::Right),
                input.held(Key::Up),
                input.held(Key::Down),
            ];
            for option in &EMOTION_OPTIONS {
                let highlight = option.chord == Some(chord);
                draw.draw_text(
                    &format!(
                        "playerEmotionOption#{}#{}",
                        text_key_hash(option.text),
                        player.name
                    ),
                    option.text,
                    Vec3::new(option.offset[0] / 10.0, option.offset[1] / 10.0, 0.0),
                    TextStyle {
                        background: Some(if highlight { "#888a" } else { "#000a" }.to_owned()),
                        border: highlight.then(|| "1px solid white".to_owned()),
                        padding: Some("0 6px".to_owned()),
                        border_radius: Some("3px".to_owned()),
                        font_size_rem: Some(option.font_size_rem),
                        ..TextStyle::default()
                    },
                    TextMode::Orthographic,
                );
            }
        }

        draw.draw_text(
            &format!("playerName#{}", player.name),
            &player.name,
            position + Vec3::new(0.0, 0.0, -0.5),
            TextStyle {
                background: Some("#000a".to_owned()),
                padding: Some("0 3px".to_owned()),
                border_radius: Some("3px".to_owned()),
                font_size_rem: Some(0.8),
                ..TextStyle::default()
            },
            TextMode::Immersive,
        );

        if player.emotion_until > time.total {
            draw.draw_text(
                &format!("playerEmotion#{}", player.name),
                &player.emotion,
                position + Vec3::new(0.0, 0.0, 2.5),
                TextStyle {
                    animation: Some("bounce 0.5s infinite".to_owned()),
                    background: Some("#fff".to_owned()),
                    padding: Some("0 6px".to_owned()),
                    border_radius: Some("6px".to_owned()),
                    border: Some("1px solid #cba".to_owned()),
                    font_size_rem: Some(1.5),
                    ..TextStyle::default()
                },
                TextMode::Immersive,
            );
        }

        if player.control {
            draw.push_matrix();
            draw.add_matrix(transform.0);
            draw.add_matrix(Mat4::from_scale(Vec3::new(80.0, 80.0, -80.0)));
            draw.set_ambient(1.0);
            draw.set_texture(TextureKey::Sky);
            draw.draw(MeshId::Sphere);
            draw.pop_matrix();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::tests::{local_player, test_world};
    use campuswalk_net::UpdateLocation;

    fn update_msg(user: &str, x: f32, y: f32) -> UpdateLocation {
        UpdateLocation {
            auth_token: String::new(),
            user_id: user.to_owned(),
            player_type: "explorer".to_owned(),
            area: "campus".to_owned(),
            chunk: [0, 0],
            position: [x, y],
            emotion: String::new(),
            update_chunk: false,
        }
    }

    #[test]
    fn left_key_moves_at_seven_units_per_second() {
        let mut world = test_world();
        let id = local_player(&mut world, Vec3::ZERO);

        world.input.on_key_down(Key::Left);
        world.frame(Time::new(16.0, 16.0));

        let t = world.ecs.read::<Transform>(id).unwrap().unwrap();
        let p = t.translation();
        assert!((p.x - (-7.0 * 16.0 / 1000.0)).abs() < 1e-6, "x = {}", p.x);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn diagonal_movement_is_normalized_and_axis_asymmetric() {
        let mut world = test_world();
        let id = local_player(&mut world, Vec3::ZERO);

        world.input.on_key_down(Key::Left);
        world.input.on_key_down(Key::Up);
        world.frame(Time::new(16.0, 16.0));

        let p = world.ecs.read::<Transform>(id).unwrap().unwrap().translation();
        let inv_sqrt2 = 1.0 / 2.0_f32.sqrt();
        assert!((p.x - (-inv_sqrt2 * 16.0 * 7.0 / 1000.0)).abs() < 1e-6);
        assert!((p.y - (inv_sqrt2 * 16.0 * 5.0 / 1000.0)).abs() < 1e-6);
    }

    #[test]
    fn walls_slide_instead_of_stopping() {
        let mut world = test_world();
        let id = local_player(&mut world, Vec3::ZERO);
        // wall immediately to the left
        world
            .ecs
            .create((
                Transform::from_translation(Vec3::new(-0.5, 0.0, 0.0)),
                Wall { mask: Rect::centered(0.7) },
            ))
            .unwrap();

        world.input.on_key_down(Key::Left);
        world.input.on_key_down(Key::Up);
        world.frame(Time::new(16.0, 16.0));

        let p = world.ecs.read::<Transform>(id).unwrap().unwrap().translation();
        assert_eq!(p.x, 0.0, "x axis blocked by the wall");
        assert!(p.y > 0.0, "y axis still moves");
    }

    #[test]
    fn facing_follows_resolved_x_and_persists_at_rest() {
        let mut world = test_world();
        let id = local_player(&mut world, Vec3::ZERO);

        world.input.on_key_down(Key::Left);
        world.frame(Time::new(16.0, 16.0));
        assert_eq!(
            world.ecs.read::<Player>(id).unwrap().unwrap().direction,
            Facing::Left
        );

        world.input.on_key_up(Key::Left);
        world.frame(Time::new(32.0, 16.0));
        assert_eq!(
            world.ecs.read::<Player>(id).unwrap().unwrap().direction,
            Facing::Left
        );
    }

    #[test]
    fn walk_animation_starts_late_in_the_first_frame_and_resets() {
        let mut world = test_world();
        let id = local_player(&mut world, Vec3::ZERO);

        world.input.on_key_down(Key::Right);
        world.frame(Time::new(16.0, 16.0));
        let anim = world.ecs.read::<Player>(id).unwrap().unwrap().move_animation;
        assert_eq!(anim, MOVE_ANIMATION_FRAME_SCALE * 0.8);

        world.frame(Time::new(32.0, 16.0));
        let anim = world.ecs.read::<Player>(id).unwrap().unwrap().move_animation;
        assert_eq!(anim, MOVE_ANIMATION_FRAME_SCALE * 0.8 + 16.0);

        world.input.on_key_up(Key::Right);
        world.frame(Time::new(48.0, 16.0));
        let anim = world.ecs.read::<Player>(id).unwrap().unwrap().move_animation;
        assert_eq!(anim, 0.0);
    }

    #[test]
    fn emotion_modifier_freezes_movement_and_release_picks_by_chord() {
        let mut world = test_world();
        let id = local_player(&mut world, Vec3::ZERO);

        world.input.on_key_down(Key::Emotion);
        world.input.on_key_down(Key::Left);
        world.frame(Time::new(16.0, 16.0));
        let p = world.ecs.read::<Transform>(id).unwrap().unwrap().translation();
        assert_eq!(p.x, 0.0, "held emotion key freezes movement");

        world.input.on_key_up(Key::Emotion);
        world.frame(Time::new(32.0, 16.0));
        let player = world.ecs.read::<Player>(id).unwrap().unwrap();
        assert_eq!(player.emotion, "❤️");
        assert_eq!(player.emotion_until, 32.0 + EMOTION_SPAN_MS);
    }

    #[test]
    fn location_publishes_on_the_200ms_cadence() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let mut world = test_world();
        local_player(&mut world, Vec3::ZERO);
        let sent: Rc<RefCell<Vec<String>>> = Rc::default();
        let sink = sent.clone();
        world.init_socket(Box::new(move |raw| sink.borrow_mut().push(raw.to_owned())));

        for (total, delta) in [(100.0, 100.0), (201.0, 101.0), (300.0, 99.0), (402.0, 102.0)] {
            world.frame(Time::new(total, delta));
        }
        // publishes at t=201 and t=402 only
        assert_eq!(sent.borrow().len(), 2);
    }

    #[test]
    fn remote_messages_spawn_unseen_peers() {
        let mut world = test_world();
        local_player(&mut world, Vec3::ZERO);

        world.net.enqueue(update_msg("bob", 3.0, 4.0));
        world.frame(Time::new(16.0, 16.0));

        let mut found = None;
        world
            .ecs
            .for_each2(|_, t: &mut Transform, p: &mut Player| {
                if !p.control {
                    found = Some((t.translation(), p.clone()));
                }
            })
            .unwrap();
        let (pos, peer) = found.expect("peer spawned");
        assert_eq!(pos, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(peer.name, "bob");
        assert_eq!(peer.skin, AvatarSkin::Explorer);
        assert_eq!(peer.valid_until, 16.0 + PEER_GRACE_MS);
        assert_eq!(peer.target_position, peer.source_position);
    }

    #[test]
    fn last_message_wins_for_the_same_peer() {
        let mut world = test_world();
        world.net.enqueue(update_msg("bob", 0.0, 0.0));
        world.frame(Time::new(16.0, 16.0));

        world.net.enqueue(update_msg("bob", 1.0, 1.0));
        world.net.enqueue(update_msg("bob", 9.0, 9.0));
        world.frame(Time::new(32.0, 16.0));

        let mut target = None;
        world
            .ecs
            .for_each1(|_, p: &mut Player| target = Some(p.target_position))
            .unwrap();
        assert_eq!(target.unwrap(), Vec3::new(9.0, 9.0, 0.0));
        assert_eq!(world.net.pending(), 0, "queue fully consumed");
    }

    #[test]
    fn messages_about_the_local_player_are_ignored() {
        let mut world = test_world();
        let id = local_player(&mut world, Vec3::ZERO);

        world.net.enqueue(update_msg("alice", 50.0, 50.0));
        world.frame(Time::new(16.0, 16.0));

        assert_eq!(world.ecs.keys::<Player>().unwrap(), vec![id]);
        let p = world.ecs.read::<Transform>(id).unwrap().unwrap().translation();
        assert_eq!(p, Vec3::ZERO);
    }

    #[test]
    fn silent_peers_are_evicted_after_the_grace_period() {
        let mut world = test_world();
        local_player(&mut world, Vec3::ZERO);
        world.net.enqueue(update_msg("bob", 0.0, 0.0));
        world.frame(Time::new(16.0, 16.0));
        assert_eq!(world.ecs.keys::<Player>().unwrap().len(), 2);

        // within grace: survives
        world.frame(Time::new(1000.0, 984.0));
        assert_eq!(world.ecs.keys::<Player>().unwrap().len(), 2);

        // past grace with no traffic: evicted, local stays
        world.frame(Time::new(2100.0, 1100.0));
        let mut names = Vec::new();
        world
            .ecs
            .for_each1(|_, p: &mut Player| names.push(p.name.clone()))
            .unwrap();
        assert_eq!(names, vec!["alice".to_owned()]);
    }

    #[test]
    fn a_fresh_message_revives_an_evicted_peer() {
        let mut world = test_world();
        world.net.enqueue(update_msg("bob", 0.0, 0.0));
        world.frame(Time::new(16.0, 16.0));
        world.frame(Time::new(3000.0, 2984.0));
        assert!(world.ecs.keys::<Player>().unwrap().is_empty());

        world.net.enqueue(update_msg("bob", 5.0, 5.0));
        world.frame(Time::new(3016.0, 16.0));
        assert_eq!(world.ecs.keys::<Player>().unwrap().len(), 1);
    }

    #[test]
    fn remote_interpolation_is_bounded() {
        let mut world = test_world();
        world.net.enqueue(update_msg("bob", 0.0, 0.0));
        world.frame(Time::new(0.0, 0.0));

        world.net.enqueue(update_msg("bob", 10.0, 0.0));
        world.frame(Time::new(100.0, 100.0));

        // halfway through the window on the next frame
        world.frame(Time::new(200.0, 100.0));
        let mut pos = None;
        world
            .ecs
            .for_each2(|_, t: &mut Transform, _: &mut Player| pos = Some(t.translation()))
            .unwrap();
        let halfway = pos.unwrap();
        assert!((halfway.x - 5.0).abs() < 1e-4, "x = {}", halfway.x);

        // k > 1: position holds, no extrapolation
        world.frame(Time::new(290.0, 90.0));
        world.frame(Time::new(600.0, 310.0));
        let mut pos = None;
        world
            .ecs
            .for_each2(|_, t: &mut Transform, _: &mut Player| pos = Some(t.translation()))
            .unwrap();
        assert!(pos.unwrap().x <= 10.0 + 1e-4);
    }

    #[test]
    fn remote_emotion_displays_briefly() {
        let mut world = test_world();
        let mut msg = update_msg("bob", 0.0, 0.0);
        msg.emotion = "🎉".to_owned();
        world.net.enqueue(msg.clone());
        world.frame(Time::new(16.0, 16.0));
        world.net.enqueue(msg);
        world.frame(Time::new(32.0, 16.0));

        let mut peer = None;
        world
            .ecs
            .for_each1(|_, p: &mut Player| peer = Some(p.clone()))
            .unwrap();
        let peer = peer.unwrap();
        assert_eq!(peer.emotion, "🎉");
        assert_eq!(peer.emotion_until, 32.0 + 500.0);
    }
}
