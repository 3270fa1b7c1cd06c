//! Procedural trees: a trunk plus a seed-deterministic cluster of bush
//! billboards, stable across frames and machines.

use campuswalk_common::{Time, Transform};
use campuswalk_ecs::{Component, EcsError};
use campuswalk_render::{MeshId, TextureKey};
use campuswalk_world::World;
use glam::{Mat4, Vec3};
use std::f32::consts::{FRAC_PI_2, TAU};

#[derive(Debug, Clone, Copy)]
pub struct Tree {
    pub seed: u64,
}

impl Component for Tree {
    const NAME: &'static str = "tree";
}

pub(crate) fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Uniform in [0, 1) from the top 24 bits.
pub(crate) fn next_unit(state: &mut u64) -> f32 {
    (splitmix64(state) >> 40) as f32 / (1u32 << 24) as f32
}

pub fn tree_draw(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let World { ecs, draw, .. } = world;
    ecs.for_each2(|_, transform: &mut Transform, tree: &mut Tree| {
        let mut rng = tree.seed;
        let base = transform.translation();

        draw.push_matrix();
        draw.add_matrix(transform.0);
        draw.add_matrix(Mat4::from_rotation_z(next_unit(&mut rng) * TAU));
        draw.set_ambient(0.5);
        draw.set_texture(TextureKey::Bark);
        draw.draw(MeshId::Stem);
        draw.pop_matrix();

        // three tiers of foliage, one more billboard per tier
        for i in 0..3 {
            for j in 0..=i {
                let factors = Vec3::new(
                    next_unit(&mut rng) - 0.5,
                    next_unit(&mut rng) - 0.5,
                    next_unit(&mut rng) - 0.5,
                );
                let displacement = (factors * Vec3::new(0.25, 0.5, 0.25)
                    + Vec3::new(
                        (j as f32 - i as f32 * 0.5) * 0.8,
                        -0.25,
                        1.0 - i as f32 * 0.5,
                    ))
                    * Vec3::new(1.5, 1.0, 1.5)
                    + Vec3::new(0.0, 0.0, 2.5);

                draw.push_matrix();
                draw.add_matrix(transform.0);
                draw.add_matrix(Mat4::from_translation(displacement));
                draw.add_matrix(Mat4::from_rotation_x(FRAC_PI_2));
                draw.add_matrix(Mat4::from_rotation_z(next_unit(&mut rng) * TAU));
                draw.set_ambient(1.0);
                draw.set_texture(TextureKey::Bush);
                if let Some(command) = draw.command(MeshId::Sprite) {
                    draw.draw_defer_position(base + displacement, command);
                }
                draw.pop_matrix();
            }
        }
    })
}
