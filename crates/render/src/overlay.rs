use std::collections::HashMap;

/// How a text position is projected onto the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Position is a world-space point, warped and view-projected.
    Immersive,
    /// Position is already in screen space (x in [-aspect, aspect],
    /// y in [-1, 1]).
    Orthographic,
}

/// CSS-ish styling forwarded verbatim to the host page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextStyle {
    pub color: Option<String>,
    pub background: Option<String>,
    pub border: Option<String>,
    pub border_radius: Option<String>,
    pub padding: Option<String>,
    pub font_size_rem: Option<f32>,
    pub bold: bool,
    pub animation: Option<String>,
}

/// Resolved viewport placement of one text node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPlacement {
    /// Horizontal center, percent of viewport width.
    pub x_percent: f32,
    /// Vertical center, percent of viewport height.
    pub y_percent: f32,
    /// Stacking order derived from view depth.
    pub z_index: i32,
    /// Font scale factor relative to the reference viewport height.
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayNode {
    pub text: String,
    pub style: TextStyle,
    pub placement: TextPlacement,
    fresh: bool,
}

/// Keyed text nodes overlaid on the canvas.
///
/// Nodes are upserted by key every frame they are drawn. `collect` at
/// frame end removes every node that was not drawn since the previous
/// `collect`, so callers never delete labels explicitly.
#[derive(Debug, Default)]
pub struct TextOverlay {
    nodes: HashMap<String, OverlayNode>,
}

impl TextOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, key: &str, text: &str, style: TextStyle, placement: TextPlacement) {
        match self.nodes.get_mut(key) {
            Some(node) => {
                node.text.clear();
                node.text.push_str(text);
                node.style = style;
                node.placement = placement;
                node.fresh = true;
            }
            None => {
                self.nodes.insert(
                    key.to_owned(),
                    OverlayNode {
                        text: text.to_owned(),
                        style,
                        placement,
                        fresh: true,
                    },
                );
            }
        }
    }

    /// Drop nodes not drawn this frame and age the survivors.
    pub fn collect(&mut self) {
        self.nodes.retain(|_, node| node.fresh);
        for node in self.nodes.values_mut() {
            node.fresh = false;
        }
    }

    pub fn get(&self, key: &str) -> Option<&OverlayNode> {
        self.nodes.get(key)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OverlayNode)> {
        self.nodes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}
