use glam::Vec2;

use crate::api::types::ItemId;
use crate::assets::bundle::TextureHandle;
use crate::assets::registry::ItemData;
use crate::core::color::Rgb;

/// Distance of a resting item from the section axis, per axis.
pub const QUADRANT_OFFSET: f32 = 350.0;
/// Depth step between consecutive items of a section.
pub const ITEM_DEPTH_STEP: f32 = -300.0;
pub const ITEM_DEPTH_BASE: f32 = -200.0;
/// Caption sits this far below the quad's bottom edge.
pub const CAPTION_GAP: f32 = 50.0;

/// Screen quadrant an item rests in, derived from its global index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    BottomLeft,
    BottomRight,
    TopRight,
    TopLeft,
}

impl Quadrant {
    pub fn from_index(index_total: u32) -> Self {
        match index_total % 4 {
            0 => Quadrant::BottomLeft,
            1 => Quadrant::BottomRight,
            2 => Quadrant::TopRight,
            _ => Quadrant::TopLeft,
        }
    }

    /// Resting position.
    pub fn offset(self) -> Vec2 {
        let o = QUADRANT_OFFSET;
        match self {
            Quadrant::BottomLeft => Vec2::new(-o, o),
            Quadrant::BottomRight => Vec2::new(o, o),
            Quadrant::TopRight => Vec2::new(o, -o),
            Quadrant::TopLeft => Vec2::new(-o, -o),
        }
    }

    /// Off-screen position used while another item is open.
    pub fn spread(self) -> Vec2 {
        self.offset() * 2.0
    }
}

/// Per-item shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemUniforms {
    pub opacity: f32,
    /// 0 = resting, 1 = opened.
    pub progress: f32,
    pub tint: Rgb,
}

impl Default for ItemUniforms {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            progress: 0.0,
            tint: Rgb::from_hex(0x1b42d8),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Caption {
    pub text: String,
    /// Local y below the quad.
    pub y: f32,
    /// Local z, animated in from -100 when opened.
    pub depth: f32,
    pub visible: bool,
}

/// A media quad with an optional caption.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub month: String,
    pub filename: String,
    /// Index inside the section.
    pub index: u32,
    /// Index across the whole timeline.
    pub index_total: u32,
    pub quadrant: Quadrant,
    /// Assigned once; close animations return here.
    pub base_position: Vec2,
    pub position: Vec2,
    pub depth: f32,
    pub size: Vec2,
    pub texture: TextureHandle,
    pub data: ItemData,
    pub uniforms: ItemUniforms,
    /// Quad z rotation (easter egg).
    pub spin: f32,
    pub caption: Option<Caption>,
}

impl Item {
    pub fn new(
        id: ItemId,
        month: &str,
        filename: &str,
        index: u32,
        index_total: u32,
        texture: TextureHandle,
        data: ItemData,
    ) -> Self {
        let quadrant = Quadrant::from_index(index_total);
        let size = texture.display_size();
        let caption = data.caption().map(|text| Caption {
            text: text.to_string(),
            y: caption_y(size),
            depth: 0.0,
            visible: false,
        });
        Self {
            id,
            month: month.to_string(),
            filename: filename.to_string(),
            index,
            index_total,
            quadrant,
            base_position: quadrant.offset(),
            position: quadrant.offset(),
            depth: index as f32 * ITEM_DEPTH_STEP + ITEM_DEPTH_BASE,
            size,
            texture,
            data,
            uniforms: ItemUniforms::default(),
            spin: 0.0,
            caption,
        }
    }

    /// Swap in a (re)loaded texture and resize the quad to match.
    pub fn attach_texture(&mut self, texture: TextureHandle) {
        self.texture = texture;
        self.size = texture.display_size();
        if let Some(caption) = self.caption.as_mut() {
            caption.y = caption_y(self.size);
        }
    }

    pub fn is_video(&self) -> bool {
        self.texture.is_video()
    }

    /// Only items with a decoded texture are drawn or picked.
    pub fn is_renderable(&self) -> bool {
        self.texture.is_ready()
    }

    pub fn link(&self) -> Option<&str> {
        self.data.link()
    }

    /// Where the link group goes when this item opens: under the caption,
    /// or where the caption would be.
    pub fn link_anchor_y(&self) -> f32 {
        match &self.caption {
            Some(caption) => caption.y - 40.0,
            None => caption_y(self.size),
        }
    }
}

fn caption_y(size: Vec2) -> f32 {
    -size.y / 2.0 - CAPTION_GAP
}
