use std::collections::HashMap;

/// Avatar sprite set a player is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AvatarSkin {
    #[default]
    Ta,
    Analyst,
    Diplomat,
    Sentinel,
    Explorer,
}

impl AvatarSkin {
    /// Parse the over-the-wire player type. Unknown strings are rejected
    /// here so that remote-message handling can pick its own fallback.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ta" => Some(AvatarSkin::Ta),
            "analyst" => Some(AvatarSkin::Analyst),
            "diplomat" => Some(AvatarSkin::Diplomat),
            "sentinel" => Some(AvatarSkin::Sentinel),
            "explorer" => Some(AvatarSkin::Explorer),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AvatarSkin::Ta => "ta",
            AvatarSkin::Analyst => "analyst",
            AvatarSkin::Diplomat => "diplomat",
            AvatarSkin::Sentinel => "sentinel",
            AvatarSkin::Explorer => "explorer",
        }
    }
}

/// Geometry identifiers. The closed set doubles as the load manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    /// Unit quad facing +Z, pivot at the bottom edge.
    Sprite,
    /// Horizontally mirrored sprite quad.
    SpriteMirror,
    /// Unit sphere, used for tree foliage and the sky dome.
    Sphere,
    /// Thin vertical cylinder, used for tree trunks and flag poles.
    Stem,
    /// Flag cloth quad, pivot on the pole edge.
    Flag,
    Ground,
    Building,
    Signboard,
}

/// Texture identifiers, including per-skin avatar sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKey {
    AvatarIdle(AvatarSkin),
    AvatarJump(AvatarSkin),
    Sky,
    Bark,
    Bush,
    Grass,
    Ground,
    Building,
    Signboard,
    Flag,
    /// Radial dither mask sampled by the hider effect.
    AlphaMask,
}

/// Backend-owned mesh slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u64);

/// Backend-owned texture slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u64);

/// Mapping from draw-time identifiers to backend handles.
///
/// Assets load asynchronously; a handle is registered when its upload
/// finishes. Lookups for handles that have not arrived yet return `None`
/// and the corresponding draw is skipped for the frame.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    meshes: HashMap<MeshId, MeshHandle>,
    textures: HashMap<TextureKey, TextureHandle>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_mesh(&mut self, id: MeshId, handle: MeshHandle) {
        self.meshes.insert(id, handle);
    }

    pub fn register_texture(&mut self, key: TextureKey, handle: TextureHandle) {
        self.textures.insert(key, handle);
    }

    pub fn mesh(&self, id: MeshId) -> Option<MeshHandle> {
        self.meshes.get(&id).copied()
    }

    pub fn texture(&self, key: TextureKey) -> Option<TextureHandle> {
        self.textures.get(&key).copied()
    }

    /// Register every mesh and texture with sequential handles. Tests and
    /// the headless runner use this in place of a real asset loader.
    pub fn fully_loaded() -> Self {
        let mut registry = Self::new();
        let meshes = [
            MeshId::Sprite,
            MeshId::SpriteMirror,
            MeshId::Sphere,
            MeshId::Stem,
            MeshId::Flag,
            MeshId::Ground,
            MeshId::Building,
            MeshId::Signboard,
        ];
        for (i, id) in meshes.into_iter().enumerate() {
            registry.register_mesh(id, MeshHandle(i as u64));
        }
        let mut textures = vec![
            TextureKey::Sky,
            TextureKey::Bark,
            TextureKey::Bush,
            TextureKey::Grass,
            TextureKey::Ground,
            TextureKey::Building,
            TextureKey::Signboard,
            TextureKey::Flag,
            TextureKey::AlphaMask,
        ];
        for skin in [
            AvatarSkin::Ta,
            AvatarSkin::Analyst,
            AvatarSkin::Diplomat,
            AvatarSkin::Sentinel,
            AvatarSkin::Explorer,
        ] {
            textures.push(TextureKey::AvatarIdle(skin));
            textures.push(TextureKey::AvatarJump(skin));
        }
        for (i, key) in textures.into_iter().enumerate() {
            registry.register_texture(key, TextureHandle(i as u64));
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_player_type_is_rejected() {
        assert_eq!(AvatarSkin::parse("explorer"), Some(AvatarSkin::Explorer));
        assert_eq!(AvatarSkin::parse("wizard"), None);
        assert_eq!(AvatarSkin::parse(""), None);
    }

    #[test]
    fn registry_reports_missing_assets() {
        let mut registry = ResourceRegistry::new();
        assert!(registry.mesh(MeshId::Sprite).is_none());
        registry.register_mesh(MeshId::Sprite, MeshHandle(7));
        assert_eq!(registry.mesh(MeshId::Sprite), Some(MeshHandle(7)));
        assert!(registry.texture(TextureKey::Sky).is_none());
    }

    #[test]
    fn fully_loaded_covers_every_avatar_skin() {
        let registry = ResourceRegistry::fully_loaded();
        for skin in [
            AvatarSkin::Ta,
            AvatarSkin::Analyst,
            AvatarSkin::Diplomat,
            AvatarSkin::Sentinel,
            AvatarSkin::Explorer,
        ] {
            assert!(registry.texture(TextureKey::AvatarIdle(skin)).is_some());
            assert!(registry.texture(TextureKey::AvatarJump(skin)).is_some());
        }
    }
}
