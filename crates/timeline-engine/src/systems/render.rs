use crate::components::material::TextMaterial;
use crate::core::scene::SceneGraph;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::frustum::Frustum;
use crate::renderer::instance::{BillboardInstance, RenderBuffer, SceneUniforms, TitleAnchor};

/// Per-frame inputs that live outside the scene graph.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub camera: &'a PerspectiveCamera,
    pub frustum: &'a Frustum,
    pub fog: (f32, f32),
    /// Index of the open item, if any.
    pub open_item: Option<u32>,
    pub max_billboards: usize,
    pub max_titles: usize,
}

/// Build uniforms, billboards and title anchors for one frame.
/// Billboards are emitted for texture-ready items inside the frustum, in
/// build order, up to capacity.
pub fn build_render_buffer(scene: &SceneGraph, view: FrameView<'_>, buffer: &mut RenderBuffer) {
    buffer.clear();
    buffer.uniforms = scene_uniforms(scene, &view);

    if !scene.timeline.visible {
        return;
    }

    let scale = scene.global_scale;
    for item in scene.items.iter().filter(|item| item.is_renderable()) {
        if !view.frustum.intersects_quad(&scene.item_matrix(item)) {
            continue;
        }
        if buffer.billboards.len() >= view.max_billboards {
            log::warn!("billboard capacity {} reached", view.max_billboards);
            break;
        }
        let p = scene.item_world_position(item);
        buffer.push(BillboardInstance {
            x: p.x,
            y: p.y,
            z: p.z,
            width: item.size.x * scale,
            height: item.size.y * scale,
            rotation: scene.timeline.spin + item.spin,
            opacity: item.uniforms.opacity,
            progress: item.uniforms.progress,
            tint_r: item.uniforms.tint.r,
            tint_g: item.uniforms.tint.g,
            tint_b: item.uniforms.tint.b,
            item: item.id.0 as f32,
        });
    }

    for section in scene.sections.iter().filter(|s| s.title.text.is_some()) {
        if buffer.titles.len() >= view.max_titles {
            break;
        }
        let p = scene.title_world_position(section);
        buffer.titles.push(TitleAnchor {
            x: p.x,
            y: p.y,
            z: p.z,
            section: section.index as f32,
        });
    }
}

fn scene_uniforms(scene: &SceneGraph, view: &FrameView<'_>) -> SceneUniforms {
    let m = &scene.materials;
    let rgba = |mat: &TextMaterial| {
        let [r, g, b] = mat.color.to_array();
        [r, g, b, mat.effective_opacity()]
    };
    let flag = |b: bool| if b { 1.0 } else { 0.0 };

    SceneUniforms {
        view_projection: view.camera.view_projection().to_cols_array(),
        backdrop: scene.backdrop.to_array(),
        fog_near: view.fog.0,
        fog_far: view.fog.1,
        global_scale: scene.global_scale,
        timeline_visible: flag(scene.timeline.visible),
        contact_visible: flag(scene.contact.visible),
        text: rgba(&m.text),
        caption: rgba(&m.caption),
        link_underline: rgba(&m.link_underline),
        outline: rgba(&m.outline),
        contact: m.contact.color.to_array(),
        link_visible: flag(scene.link_group.visible),
        link: [0.0, scene.link_group.y * scene.global_scale, scene.link_group.z],
        open_item: view.open_item.map(|i| i as f32).unwrap_or(-1.0),
        camera_y: view.camera.position.y,
        arrow_depth: scene.whoosh.arrow_depth,
        arrow_rotation: scene.whoosh.arrow_rotation.to_array(),
        circle_rotation: scene.whoosh.circle_rotation,
        timeline_spin: scene.timeline.spin,
        whoosh_hovered: flag(scene.whoosh.hovered),
        _pad: 0.0,
    }
}
