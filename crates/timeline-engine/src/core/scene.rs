use glam::{Mat4, Vec2, Vec3};

use crate::api::config::EngineConfig;
use crate::api::types::ItemId;
use crate::assets::bundle::{AssetBundle, TextureHandle};
use crate::assets::manifest::MediaKind;
use crate::components::item::Item;
use crate::components::material::Materials;
use crate::components::section::{ContactSection, Section, SectionLayout, WhooshCluster, END};
use crate::config::months::TimelineConfig;
use crate::core::color::Rgb;
use crate::extensions::tween::{TweenProperty, TweenValue};

/// Hit box of the "SEE MORE" link, larger than the glyphs.
pub const LINK_BOX_SIZE: Vec2 = Vec2::new(70.0, 20.0);

/// Group every section hangs off. Its z is the rendered scroll offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineGroup {
    pub z: f32,
    /// z rotation (easter egg).
    pub spin: f32,
    pub visible: bool,
}

/// "SEE MORE" label, underline and hit box of the open item.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkGroup {
    pub visible: bool,
    pub y: f32,
    pub z: f32,
    pub url: Option<String>,
}

/// The whole timeline scene: a flat store of sections and items plus the
/// few singletons around them. Owned and mutated by the engine only.
#[derive(Debug, Clone)]
pub struct SceneGraph {
    pub timeline: TimelineGroup,
    pub sections: Vec<Section>,
    /// Indexed by `ItemId`.
    pub items: Vec<Item>,
    pub materials: Materials,
    pub link_group: LinkGroup,
    pub contact: ContactSection,
    pub whoosh: WhooshCluster,
    /// Fog and clear color.
    pub backdrop: Rgb,
    pub global_scale: f32,
    /// Largest scroll position.
    pub stop_position: f32,
}

impl SceneGraph {
    /// Build sections and items for every configured month, in order, and
    /// place them along -z. Files missing from `bundle` get a placeholder.
    pub fn build(timeline: &TimelineConfig, bundle: &AssetBundle, config: &EngineConfig) -> Self {
        let mut sections = Vec::with_capacity(timeline.months.len());
        let mut items = Vec::new();

        for (index, month) in timeline.months.iter().enumerate() {
            let mut section = Section::new(
                &month.key,
                index,
                month.display_name.as_deref(),
                month.camera_offset.unwrap_or(0.0),
            );

            if Section::holds_items(&month.key) {
                for (local, filename) in timeline.files(&month.key).iter().enumerate() {
                    let id = ItemId(items.len() as u32);
                    let texture = bundle
                        .texture(&month.key, filename)
                        .copied()
                        .unwrap_or_else(|| TextureHandle::placeholder(MediaKind::from_filename(filename)));
                    let mut item = Item::new(
                        id,
                        &month.key,
                        filename,
                        local as u32,
                        id.0,
                        texture,
                        timeline.items.get(&month.key, filename),
                    );
                    if let Some(first) = timeline.months.first() {
                        item.uniforms.tint = first.tint_color;
                    }
                    section.add_item(id, item.depth);
                    items.push(item);
                }
            }
            sections.push(section);
        }

        let mut layout = SectionLayout::new(config.section_gap, config.month_trigger_lead);
        for (key, gap) in &config.section_gap_overrides {
            layout = layout.with_gap(key, *gap);
        }
        let stop_position = layout.place(&mut sections);

        let (materials, backdrop) = match timeline.months.first() {
            Some(first) => {
                let palette = first.palette();
                (Materials::new(palette.text, palette.interface()), palette.background)
            }
            None => (Materials::default(), Rgb::WHITE),
        };

        let contact = &timeline.contact;
        let scene = Self {
            timeline: TimelineGroup {
                z: 0.0,
                spin: 0.0,
                visible: true,
            },
            sections,
            items,
            materials,
            link_group: LinkGroup {
                visible: false,
                y: 0.0,
                z: 0.0,
                url: None,
            },
            contact: ContactSection::new(
                contact.height,
                contact.link.clone(),
                Vec2::new(contact.link_x, contact.link_y),
                Vec2::new(contact.link_width, contact.link_height),
            ),
            whoosh: WhooshCluster::new(config.whoosh_size, config.arrow_rest_depth),
            backdrop,
            global_scale: config.global_scale(),
            stop_position,
        };

        log::info!(
            "timeline built: {} sections, {} items ({} videos), stop at {}",
            scene.sections.len(),
            scene.items.len(),
            scene.video_items().count(),
            scene.stop_position
        );
        scene
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0 as usize)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id.0 as usize)
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    pub fn section_of(&self, id: ItemId) -> Option<&Section> {
        let item = self.item(id)?;
        self.section(&item.month)
    }

    pub fn video_items(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|item| item.is_video())
    }

    /// Attach a freshly streamed month's textures to its items.
    /// Returns how many items received a texture.
    pub fn attach_month(&mut self, month: &str, bundle: &AssetBundle) -> usize {
        let Some(textures) = bundle.month(month) else {
            return 0;
        };
        let mut attached = 0;
        for item in self.items.iter_mut().filter(|item| item.month == month) {
            if let Some(texture) = textures.get(&item.filename) {
                item.attach_texture(*texture);
                attached += 1;
            }
        }
        attached
    }

    // -- World transforms --

    fn scale_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.global_scale, self.global_scale, 1.0))
    }

    pub fn timeline_matrix(&self) -> Mat4 {
        self.scale_matrix()
            * Mat4::from_translation(Vec3::new(0.0, 0.0, self.timeline.z))
            * Mat4::from_rotation_z(self.timeline.spin)
    }

    pub fn section_matrix(&self, section: &Section) -> Mat4 {
        self.timeline_matrix() * Mat4::from_translation(Vec3::new(0.0, 0.0, section.z))
    }

    /// The item's group (position and depth, no size).
    pub fn item_group_matrix(&self, item: &Item) -> Mat4 {
        let section_z = self.section(&item.month).map(|s| s.z).unwrap_or(0.0);
        self.timeline_matrix()
            * Mat4::from_translation(Vec3::new(item.position.x, item.position.y, section_z + item.depth))
    }

    /// Maps the unit quad centred on the origin onto the item's media quad.
    pub fn item_matrix(&self, item: &Item) -> Mat4 {
        self.item_group_matrix(item)
            * Mat4::from_rotation_z(item.spin)
            * Mat4::from_scale(Vec3::new(item.size.x, item.size.y, 1.0))
    }

    pub fn item_world_position(&self, item: &Item) -> Vec3 {
        self.item_group_matrix(item).transform_point3(Vec3::ZERO)
    }

    pub fn caption_world_position(&self, item: &Item) -> Option<Vec3> {
        let caption = item.caption.as_ref()?;
        Some(
            self.item_group_matrix(item)
                .transform_point3(Vec3::new(0.0, caption.y, caption.depth)),
        )
    }

    pub fn title_world_position(&self, section: &Section) -> Vec3 {
        self.section_matrix(section)
            .transform_point3(Vec3::new(0.0, section.title.y, section.title.depth))
    }

    /// The whoosh hit area, centred on the end section origin.
    pub fn whoosh_matrix(&self) -> Option<Mat4> {
        let end = self.section(END)?;
        Some(
            self.section_matrix(end)
                * Mat4::from_scale(Vec3::new(self.whoosh.size.x, self.whoosh.size.y, 1.0)),
        )
    }

    /// The link hit box, in scene space.
    pub fn link_box_matrix(&self) -> Mat4 {
        self.scale_matrix()
            * Mat4::from_translation(Vec3::new(0.0, self.link_group.y, self.link_group.z))
            * Mat4::from_scale(Vec3::new(LINK_BOX_SIZE.x, LINK_BOX_SIZE.y, 1.0))
    }

    pub fn contact_link_matrix(&self) -> Mat4 {
        let c = &self.contact;
        self.scale_matrix()
            * Mat4::from_translation(Vec3::new(c.link_offset.x, c.y + c.link_offset.y, 0.0))
            * Mat4::from_scale(Vec3::new(c.link_size.x, c.link_size.y, 1.0))
    }

    // -- Animated properties --

    /// Live value of a scene property, or `None` if it does not live in the
    /// scene (camera/scroll properties) or no longer exists.
    pub fn read_property(&self, property: TweenProperty) -> Option<TweenValue> {
        Some(match property {
            TweenProperty::ItemPosition(id) => self.item(id)?.position.into(),
            TweenProperty::ItemOpacity(id) => self.item(id)?.uniforms.opacity.into(),
            TweenProperty::ItemProgress(id) => self.item(id)?.uniforms.progress.into(),
            TweenProperty::ItemTint(id) => self.item(id)?.uniforms.tint.into(),
            TweenProperty::ItemSpin(id) => self.item(id)?.spin.into(),
            TweenProperty::CaptionDepth(id) => self.item(id)?.caption.as_ref()?.depth.into(),
            TweenProperty::TimelineDepth => self.timeline.z.into(),
            TweenProperty::TimelineSpin => self.timeline.spin.into(),
            TweenProperty::MaterialOpacity(kind) => self.materials.get(kind).opacity.into(),
            TweenProperty::MaterialColor(kind) => self.materials.get(kind).color.into(),
            TweenProperty::Backdrop => self.backdrop.into(),
            TweenProperty::LinkGroupDepth => self.link_group.z.into(),
            TweenProperty::ArrowDepth => self.whoosh.arrow_depth.into(),
            TweenProperty::ArrowRotation => self.whoosh.arrow_rotation.into(),
            TweenProperty::TitleDepth(index) => self.sections.get(index)?.title.depth.into(),
            TweenProperty::CameraHeight
            | TweenProperty::CameraRotation
            | TweenProperty::ScrollPosition
            | TweenProperty::AutoAdvance
            | TweenProperty::EnterTimer => return None,
        })
    }

    /// Write a scene property. Returns false if the property is not a scene
    /// property or the value has the wrong shape.
    pub fn write_property(&mut self, property: TweenProperty, value: TweenValue) -> bool {
        match property {
            TweenProperty::ItemPosition(id) => {
                if let (Some(item), Some(v)) = (self.item_mut(id), value.as_pair()) {
                    item.position = v;
                    return true;
                }
            }
            TweenProperty::ItemOpacity(id) => {
                if let (Some(item), Some(v)) = (self.item_mut(id), value.as_scalar()) {
                    item.uniforms.opacity = v;
                    return true;
                }
            }
            TweenProperty::ItemProgress(id) => {
                if let (Some(item), Some(v)) = (self.item_mut(id), value.as_scalar()) {
                    item.uniforms.progress = v;
                    return true;
                }
            }
            TweenProperty::ItemTint(id) => {
                if let (Some(item), Some(v)) = (self.item_mut(id), value.as_color()) {
                    item.uniforms.tint = v;
                    return true;
                }
            }
            TweenProperty::ItemSpin(id) => {
                if let (Some(item), Some(v)) = (self.item_mut(id), value.as_scalar()) {
                    item.spin = v;
                    return true;
                }
            }
            TweenProperty::CaptionDepth(id) => {
                let caption = self.item_mut(id).and_then(|item| item.caption.as_mut());
                if let (Some(caption), Some(v)) = (caption, value.as_scalar()) {
                    caption.depth = v;
                    return true;
                }
            }
            TweenProperty::TimelineDepth => {
                if let Some(v) = value.as_scalar() {
                    self.timeline.z = v;
                    return true;
                }
            }
            TweenProperty::TimelineSpin => {
                if let Some(v) = value.as_scalar() {
                    self.timeline.spin = v;
                    return true;
                }
            }
            TweenProperty::MaterialOpacity(kind) => {
                if let Some(v) = value.as_scalar() {
                    self.materials.get_mut(kind).opacity = v;
                    return true;
                }
            }
            TweenProperty::MaterialColor(kind) => {
                if let Some(v) = value.as_color() {
                    self.materials.get_mut(kind).color = v;
                    return true;
                }
            }
            TweenProperty::Backdrop => {
                if let Some(v) = value.as_color() {
                    self.backdrop = v;
                    return true;
                }
            }
            TweenProperty::LinkGroupDepth => {
                if let Some(v) = value.as_scalar() {
                    self.link_group.z = v;
                    return true;
                }
            }
            TweenProperty::ArrowDepth => {
                if let Some(v) = value.as_scalar() {
                    self.whoosh.arrow_depth = v;
                    return true;
                }
            }
            TweenProperty::ArrowRotation => {
                if let Some(v) = value.as_pair() {
                    self.whoosh.arrow_rotation = v;
                    return true;
                }
            }
            TweenProperty::TitleDepth(index) => {
                if let (Some(section), Some(v)) = (self.sections.get_mut(index), value.as_scalar()) {
                    section.title.depth = v;
                    return true;
                }
            }
            TweenProperty::CameraHeight
            | TweenProperty::CameraRotation
            | TweenProperty::ScrollPosition
            | TweenProperty::AutoAdvance
            | TweenProperty::EnterTimer => {}
        }
        false
    }
}
