use std::collections::HashMap;

use glam::Vec2;

use crate::api::types::ItemId;
use crate::extensions::tween::TweenId;

/// Opening section: no items, always active at scroll 0.
pub const INTRO: &str = "intro";
/// Closing section: hosts the whoosh cluster.
pub const END: &str = "end";

/// Depth range a section occupies in its own space.
/// Titles sit at z = 0, so `max_z` is never below 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionExtent {
    pub min_z: f32,
    pub max_z: f32,
}

impl Default for SectionExtent {
    fn default() -> Self {
        Self { min_z: 0.0, max_z: 0.0 }
    }
}

impl SectionExtent {
    pub fn include(&mut self, z: f32) {
        self.min_z = self.min_z.min(z);
        self.max_z = self.max_z.max(z);
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionTitle {
    pub text: Option<String>,
    pub y: f32,
    /// Local z (bobbed by the easter egg).
    pub depth: f32,
}

/// One month of the timeline.
#[derive(Debug, Clone)]
pub struct Section {
    pub key: String,
    /// Position in configuration order.
    pub index: usize,
    /// Assigned once by `SectionLayout::place`.
    pub z: f32,
    /// Scroll offset past which this month becomes a candidate for active.
    pub trigger: f32,
    pub items: Vec<ItemId>,
    pub extent: SectionExtent,
    pub title: SectionTitle,
}

impl Section {
    pub fn new(key: &str, index: usize, display_name: Option<&str>, title_offset: f32) -> Self {
        Self {
            key: key.to_string(),
            index,
            z: 0.0,
            trigger: 0.0,
            items: Vec::new(),
            extent: SectionExtent::default(),
            title: SectionTitle {
                text: display_name.map(str::to_string),
                y: title_offset,
                depth: 0.0,
            },
        }
    }

    pub fn add_item(&mut self, id: ItemId, depth: f32) {
        self.items.push(id);
        self.extent.include(depth);
    }

    /// Intro and end carry decoration only.
    pub fn holds_items(key: &str) -> bool {
        key != INTRO && key != END
    }
}

/// Placement contract: sections are stacked back along -z, each one gap
/// behind the deepest point of the previous.
#[derive(Debug, Clone)]
pub struct SectionLayout {
    pub gap: f32,
    pub gap_overrides: HashMap<String, f32>,
    /// Trigger sits this far in front of a section's origin.
    pub trigger_lead: f32,
}

impl SectionLayout {
    pub fn new(gap: f32, trigger_lead: f32) -> Self {
        Self {
            gap,
            gap_overrides: HashMap::new(),
            trigger_lead,
        }
    }

    pub fn with_gap(mut self, key: &str, gap: f32) -> Self {
        self.gap_overrides.insert(key.to_string(), gap);
        self
    }

    pub fn gap_after(&self, key: &str) -> f32 {
        self.gap_overrides.get(key).copied().unwrap_or(self.gap)
    }

    /// Assign `z` and `trigger` to every section, in order, and return the
    /// stop position (the negated z of the end section, or the last one).
    pub fn place(&self, sections: &mut [Section]) -> f32 {
        let mut next = 0.0;
        for section in sections.iter_mut() {
            section.z = next;
            section.trigger = next + self.trigger_lead;
            next += section.extent.min_z - self.gap_after(&section.key);
        }
        sections
            .iter()
            .find(|s| s.key == END)
            .or_else(|| sections.last())
            .map(|s| -s.z)
            .unwrap_or(0.0)
    }
}

/// End-of-timeline affordance: a clickable ring with a nudging arrow.
#[derive(Debug, Clone)]
pub struct WhooshCluster {
    /// Hit area centred on the end section origin.
    pub size: Vec2,
    pub arrow_rest_depth: f32,
    pub arrow_depth: f32,
    /// Arrow x/y rotation.
    pub arrow_rotation: Vec2,
    pub circle_rotation: f32,
    pub hovered: bool,
    /// The running nudge tween, while the end month is active.
    pub arrow_tween: Option<TweenId>,
}

impl WhooshCluster {
    pub const ARROW_REST_ROTATION: Vec2 = Vec2::new(-1.5, 0.0);

    pub fn new(size: Vec2, arrow_rest_depth: f32) -> Self {
        Self {
            size,
            arrow_rest_depth,
            arrow_depth: arrow_rest_depth,
            arrow_rotation: Self::ARROW_REST_ROTATION,
            circle_rotation: 0.0,
            hovered: false,
            arrow_tween: None,
        }
    }
}

/// The "say hello" panel, parked above or below the timeline.
#[derive(Debug, Clone)]
pub struct ContactSection {
    /// Authored y in scene space.
    pub y: f32,
    pub visible: bool,
    pub link: Option<String>,
    /// Link hit box centre, relative to the panel.
    pub link_offset: Vec2,
    pub link_size: Vec2,
}

impl ContactSection {
    pub fn new(y: f32, link: Option<String>, link_offset: Vec2, link_size: Vec2) -> Self {
        Self {
            y,
            visible: false,
            link,
            link_offset,
            link_size,
        }
    }
}
