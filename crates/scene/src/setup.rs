//! Registry wiring and the default campus scene.

use campuswalk_common::{Rect, Transform};
use campuswalk_ecs::{Ecs, EcsError, Entity, Phase};
use campuswalk_render::{AvatarSkin, MeshId, TextureKey};
use campuswalk_world::World;
use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::button::{self, Button, EmotionButton};
use crate::decoration::{self, next_unit, Tree};
use crate::player::{self, Player};
use crate::simple::{self, SimpleFlag, SimpleModal, SimpleModel, SimpleMultiModel};
use crate::usable::{self, Usable};
use crate::wall::Wall;

/// Attach every component storage and register the system lists.
///
/// Update order matters: movement and reconciliation run before
/// interaction, so hover and modal checks see this frame's positions.
pub fn build_ecs() -> Result<Ecs<World>, EcsError> {
    let mut ecs = Ecs::new();

    ecs.attach::<Transform>()?;
    ecs.attach::<Player>()?;
    ecs.attach::<Wall>()?;
    ecs.attach::<Usable>()?;
    ecs.attach::<SimpleModel>()?;
    ecs.attach::<SimpleMultiModel>()?;
    ecs.attach::<SimpleFlag>()?;
    ecs.attach::<SimpleModal>()?;
    ecs.attach::<Tree>()?;
    ecs.attach::<Button>()?;
    ecs.attach::<EmotionButton>()?;

    ecs.register(Phase::Update, player::player_move)
        .register(Phase::Update, player::player_target_move)
        .register(Phase::Update, player::player_remote_move)
        .register(Phase::Update, usable::usable_use)
        .register(Phase::Update, simple::launch_simple_modal)
        .register(Phase::Update, button::button_interact)
        .register(Phase::Update, button::emotion_button_interact);

    ecs.register(Phase::Draw, simple::simple_model_draw)
        .register(Phase::Draw, simple::simple_multi_model_draw)
        .register(Phase::Draw, simple::simple_flag_draw)
        .register(Phase::Draw, decoration::tree_draw)
        .register(Phase::Draw, player::player_draw)
        .register(Phase::Draw, usable::usable_draw)
        .register(Phase::Draw, button::emotion_button_draw);

    Ok(ecs)
}

/// Spawn the controllable avatar.
pub fn spawn_local_player(
    ecs: &mut Ecs<World>,
    skin: AvatarSkin,
    username: &str,
    name: &str,
    position: Vec3,
) -> Result<Entity, EcsError> {
    ecs.create((
        Transform::from_translation(position),
        Player::local(skin, username, name),
    ))
}

fn welcome_board_content() -> String {
    "welcome".to_owned()
}

/// The eight emotions offered to pointer users, along the bottom edge.
const PICKER_EMOTIONS: [&str; 8] = ["❤️", "🎉", "✅", "😭", "🔥", "👀", "⬅️", "➡️"];

/// Populate the default campus: ground, landmarks, tree line, grass
/// tufts and the touch emotion picker.
pub fn spawn_campus(ecs: &mut Ecs<World>) -> Result<(), EcsError> {
    // welcome signboard: readable, blocks movement
    ecs.create((
        Transform::default(),
        SimpleModel::new(MeshId::Signboard, TextureKey::Signboard),
        Wall {
            mask: Rect::new(-7.75, -0.3, 8.5, 0.3),
        },
        Usable {
            range: Rect::new(-8.75, -1.3, 9.5, 1.3),
            label: "📖 read the board".to_owned(),
            hover: false,
        },
        SimpleModal {
            provider: welcome_board_content,
        },
    ))?;

    // main hall, two parts under one transform
    ecs.create((
        Transform::from_translation(Vec3::new(10.0, 2.0, 0.0)),
        SimpleMultiModel {
            parts: vec![
                SimpleModel::new(MeshId::Building, TextureKey::Building),
                SimpleModel::new(MeshId::Ground, TextureKey::Ground),
            ],
        },
        Wall {
            mask: Rect::new(-1.75, -1.75, 1.75, 1.75),
        },
    ))?;

    ecs.create((
        Transform::from_translation(Vec3::new(-6.0, 4.0, 0.0)),
        SimpleFlag {
            cloth_texture: TextureKey::Flag,
        },
    ))?;

    // ground tiles
    for i in -3..4 {
        for j in -3..4 {
            ecs.create((
                Transform(
                    Mat4::from_translation(Vec3::new(j as f32 * 10.0, i as f32 * 10.0, 0.0))
                        * Mat4::from_scale(Vec3::new(5.0, 5.0, 1.0)),
                ),
                SimpleModel::new(MeshId::Ground, TextureKey::Ground),
            ))?;
        }
    }

    // jittered tree line across the north side
    let mut rng = 0x6b616d75_u64;
    for i in -3..0 {
        for j in -3..4 {
            let jitter_x = (next_unit(&mut rng) - 0.5) * 3.0;
            let jitter_y = (next_unit(&mut rng) - 0.5) * 3.0;
            ecs.create((
                Transform::from_translation(Vec3::new(
                    j as f32 * 4.0 + jitter_x,
                    i as f32 * 4.0 + 18.0 + jitter_y,
                    0.0,
                )),
                Tree {
                    seed: crate::decoration::splitmix64(&mut rng),
                },
                Wall {
                    mask: Rect::centered(1.0),
                },
            ))?;
        }
    }

    // scattered grass tufts
    for _ in 0..100 {
        let x = (next_unit(&mut rng) * 2.0 - 1.0) * 10.0;
        let y = (next_unit(&mut rng) * 2.0 - 1.0) * 10.0;
        ecs.create((
            Transform(
                Mat4::from_translation(Vec3::new(x, y, 0.35))
                    * Mat4::from_rotation_x(FRAC_PI_2)
                    * Mat4::from_scale(Vec3::splat(0.35)),
            ),
            SimpleModel {
                mesh: MeshId::Sprite,
                texture: TextureKey::Grass,
                ambient: 1.0,
            },
        ))?;
    }

    // touch emotion picker along the bottom of the screen
    for (i, text) in PICKER_EMOTIONS.iter().enumerate() {
        let x = (i as f32 - (PICKER_EMOTIONS.len() - 1) as f32 / 2.0) * 0.3;
        ecs.create((
            Button::new(Rect::new(x - 0.14, -0.95, x + 0.14, -0.7)),
            EmotionButton {
                text: (*text).to_owned(),
            },
        ))?;
    }

    Ok(())
}
