use bytemuck::{Pod, Zeroable};

/// Per-item billboard written to the shared buffer for the TypeScript renderer.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BillboardInstance {
    /// Quad centre in world space.
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// World-space size (already scaled).
    pub width: f32,
    pub height: f32,
    /// z rotation in radians (timeline spin + item spin).
    pub rotation: f32,
    pub opacity: f32,
    /// 0 = resting, 1 = opened.
    pub progress: f32,
    pub tint_r: f32,
    pub tint_g: f32,
    pub tint_b: f32,
    /// Item id, so the renderer can bind the right texture.
    pub item: f32,
}

impl BillboardInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Where a section title (and its caption-colored lettering) is drawn.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TitleAnchor {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Section index in configuration order.
    pub section: f32,
}

impl TitleAnchor {
    pub const FLOATS: usize = 4;
}

/// Frame-wide values: camera, fog and material state.
/// Colors are linear rgb; material slots carry rgb + effective opacity.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view_projection: [f32; 16],
    pub backdrop: [f32; 3],
    pub fog_near: f32,
    pub fog_far: f32,
    pub global_scale: f32,
    pub timeline_visible: f32,
    pub contact_visible: f32,
    pub text: [f32; 4],
    pub caption: [f32; 4],
    pub link_underline: [f32; 4],
    pub outline: [f32; 4],
    pub contact: [f32; 3],
    pub link_visible: f32,
    /// Link group position in scene space.
    pub link: [f32; 3],
    /// Open item id, or -1.
    pub open_item: f32,
    pub camera_y: f32,
    pub arrow_depth: f32,
    pub arrow_rotation: [f32; 2],
    pub circle_rotation: f32,
    pub timeline_spin: f32,
    pub whoosh_hovered: f32,
    pub _pad: f32,
}

impl SceneUniforms {
    pub const FLOATS: usize = 56;
}

impl Default for SceneUniforms {
    fn default() -> Self {
        Self {
            open_item: -1.0,
            timeline_visible: 1.0,
            ..<Self as Zeroable>::zeroed()
        }
    }
}

/// Everything one frame hands to the renderer.
pub struct RenderBuffer {
    pub uniforms: SceneUniforms,
    pub billboards: Vec<BillboardInstance>,
    pub titles: Vec<TitleAnchor>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            uniforms: SceneUniforms::default(),
            billboards: Vec::with_capacity(256),
            titles: Vec::with_capacity(16),
        }
    }

    pub fn clear(&mut self) {
        self.billboards.clear();
        self.titles.clear();
    }

    pub fn push(&mut self, instance: BillboardInstance) {
        self.billboards.push(instance);
    }

    pub fn billboard_count(&self) -> u32 {
        self.billboards.len() as u32
    }

    pub fn title_count(&self) -> u32 {
        self.titles.len() as u32
    }

    pub fn billboards_as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.billboards)
    }

    pub fn titles_as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.titles)
    }

    pub fn uniforms_as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(std::slice::from_ref(&self.uniforms))
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_protocol() {
        assert_eq!(std::mem::size_of::<BillboardInstance>(), BillboardInstance::STRIDE_BYTES);
        assert_eq!(std::mem::size_of::<TitleAnchor>(), TitleAnchor::FLOATS * 4);
        assert_eq!(std::mem::size_of::<SceneUniforms>(), SceneUniforms::FLOATS * 4);
    }

    #[test]
    fn default_uniforms_have_no_open_item() {
        let buffer = RenderBuffer::new();
        let floats = buffer.uniforms_as_floats();
        assert_eq!(floats.len(), SceneUniforms::FLOATS);
        // open_item sits after the link position
        assert_eq!(floats[47], -1.0);
    }

    #[test]
    fn billboards_flatten_in_order() {
        let mut buffer = RenderBuffer::new();
        buffer.push(BillboardInstance { x: 1.0, item: 7.0, ..Default::default() });
        buffer.push(BillboardInstance { x: 2.0, ..Default::default() });
        let floats = buffer.billboards_as_floats();
        assert_eq!(floats.len(), 24);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[11], 7.0);
        assert_eq!(floats[12], 2.0);
    }
}
