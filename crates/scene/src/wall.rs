use campuswalk_common::Rect;
use campuswalk_ecs::Component;

/// Impassable collision volume. The mask is relative to the entity's
/// transform translation.
#[derive(Debug, Clone, Copy)]
pub struct Wall {
    pub mask: Rect,
}

impl Component for Wall {
    const NAME: &'static str = "wall";
}
