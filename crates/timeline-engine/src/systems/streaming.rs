use std::collections::BTreeSet;

use crate::components::section::{Section, INTRO};

/// Tracks which months have been requested for lazy loading.
/// A month is requested once, when the scroll offset at which it becomes
/// active comes within `view_distance` of the rendered offset.
#[derive(Debug, Clone)]
pub struct StreamingTracker {
    view_distance: f32,
    loaded: BTreeSet<String>,
}

impl StreamingTracker {
    /// `preloaded` months (normally intro) count as loaded from the start.
    pub fn new<'a>(view_distance: f32, preloaded: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            view_distance,
            loaded: preloaded.into_iter().map(str::to_string).collect(),
        }
    }

    /// Intro only; everything else streams.
    pub fn intro_only(view_distance: f32) -> Self {
        Self::new(view_distance, [INTRO])
    }

    pub fn is_loaded(&self, month: &str) -> bool {
        self.loaded.contains(month)
    }

    /// Months that just came into range, in configuration order.
    /// They are marked loaded before being returned.
    pub fn nearby(&mut self, timeline_z: f32, sections: &[Section]) -> Vec<String> {
        let mut requested = Vec::new();
        for section in sections {
            if self.loaded.contains(&section.key) {
                continue;
            }
            let activation = -section.trigger;
            if (activation - timeline_z).abs() < self.view_distance {
                self.loaded.insert(section.key.clone());
                log::info!("streaming month '{}'", section.key);
                requested.push(section.key.clone());
            }
        }
        requested
    }
}
