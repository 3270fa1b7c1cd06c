//! Static props drawn straight from their transform, and the modal
//! launcher for usable props.

use campuswalk_common::{Time, Transform};
use campuswalk_ecs::{Component, EcsError};
use campuswalk_input::Key;
use campuswalk_render::{MeshId, TextureKey};
use campuswalk_world::World;
use glam::Mat4;

use crate::usable::Usable;

/// One mesh, one texture, drawn immediately under the entity transform.
#[derive(Debug, Clone, Copy)]
pub struct SimpleModel {
    pub mesh: MeshId,
    pub texture: TextureKey,
    pub ambient: f32,
}

impl Component for SimpleModel {
    const NAME: &'static str = "simple_model";
}

impl SimpleModel {
    pub fn new(mesh: MeshId, texture: TextureKey) -> Self {
        Self {
            mesh,
            texture,
            ambient: 0.5,
        }
    }
}

/// A prop assembled from several mesh/texture parts sharing one
/// transform.
#[derive(Debug, Clone)]
pub struct SimpleMultiModel {
    pub parts: Vec<SimpleModel>,
}

impl Component for SimpleMultiModel {
    const NAME: &'static str = "simple_multi_model";
}

/// A pole-mounted cloth that waves with the frame clock.
#[derive(Debug, Clone, Copy)]
pub struct SimpleFlag {
    pub cloth_texture: TextureKey,
}

impl Component for SimpleFlag {
    const NAME: &'static str = "simple_flag";
}

/// Content key handed to the modal sink when the prop is used.
#[derive(Debug, Clone)]
pub struct SimpleModal {
    pub provider: fn() -> String,
}

impl Component for SimpleModal {
    const NAME: &'static str = "simple_modal";
}

pub fn simple_model_draw(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let World { ecs, draw, .. } = world;
    ecs.for_each2(|_, transform: &mut Transform, model: &mut SimpleModel| {
        draw.push_matrix();
        draw.add_matrix(transform.0);
        draw.set_ambient(model.ambient);
        draw.set_texture(model.texture);
        draw.draw(model.mesh);
        draw.pop_matrix();
    })
}

pub fn simple_multi_model_draw(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let World { ecs, draw, .. } = world;
    ecs.for_each2(|_, transform: &mut Transform, multi: &mut SimpleMultiModel| {
        draw.push_matrix();
        draw.add_matrix(transform.0);
        for part in &multi.parts {
            draw.set_ambient(part.ambient);
            draw.set_texture(part.texture);
            draw.draw(part.mesh);
        }
        draw.pop_matrix();
    })
}

/// Pole immediately, waving cloth deferred by position.
pub fn simple_flag_draw(world: &mut World, time: Time) -> Result<(), EcsError> {
    let World { ecs, draw, .. } = world;
    let wave = (time.total * 0.002).sin() as f32 * 0.25;
    ecs.for_each2(|_, transform: &mut Transform, flag: &mut SimpleFlag| {
        draw.push_matrix();
        draw.add_matrix(transform.0);
        draw.set_ambient(0.5);
        draw.set_texture(TextureKey::Bark);
        draw.draw(MeshId::Stem);

        draw.add_matrix(Mat4::from_translation(glam::Vec3::new(0.0, 0.0, 2.0)));
        draw.add_matrix(Mat4::from_rotation_z(wave));
        draw.set_ambient(1.0);
        draw.set_texture(flag.cloth_texture);
        if let Some(command) = draw.command(MeshId::Flag) {
            draw.draw_defer_position(transform.translation(), command);
        }
        draw.pop_matrix();
    })
}

/// Open the modal when a hovered usable is activated by the Use key or a
/// pointer tap. The host owns presentation and is expected to disable
/// input while the modal is up.
pub fn launch_simple_modal(world: &mut World, _time: Time) -> Result<(), EcsError> {
    let World {
        ecs, input, modal, ..
    } = world;
    let activated = input.pressed(Key::Use) || input.pointer.tap;
    if !activated {
        return Ok(());
    }

    ecs.for_each3(|_, _: &mut Transform, usable: &mut Usable, modal_key: &mut SimpleModal| {
        if usable.hover {
            if let Some(sink) = modal.as_mut() {
                sink(&(modal_key.provider)());
            }
        }
    })
}
