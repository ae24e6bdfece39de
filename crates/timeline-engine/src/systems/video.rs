use std::collections::BTreeSet;

use crate::api::types::{HostEvent, ItemId};
use crate::core::scene::SceneGraph;
use crate::renderer::frustum::Frustum;

/// Plays videos inside the frustum and pauses the rest.
/// Only runs on frames where the timeline moved (or right after build).
#[derive(Debug, Clone, Default)]
pub struct VideoCuller {
    playing: BTreeSet<ItemId>,
    dirty: bool,
}

impl VideoCuller {
    pub fn new() -> Self {
        Self {
            playing: BTreeSet::new(),
            dirty: true,
        }
    }

    /// Evaluate on the next `cull`.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_playing(&self, item: ItemId) -> bool {
        self.playing.contains(&item)
    }

    /// Someone else (open/close) changed playback; keep the set honest.
    pub fn set_playing(&mut self, item: ItemId, playing: bool) {
        if playing {
            self.playing.insert(item);
        } else {
            self.playing.remove(&item);
        }
    }

    pub fn cull(&mut self, scene: &SceneGraph, frustum: &Frustum, events: &mut Vec<HostEvent>) {
        if !std::mem::take(&mut self.dirty) {
            return;
        }
        for item in scene.video_items().filter(|item| item.is_renderable()) {
            let visible = frustum.intersects_quad(&scene.item_matrix(item));
            let playing = self.playing.contains(&item.id);
            if visible && !playing {
                self.playing.insert(item.id);
                events.push(HostEvent::VideoPlay { item: item.id, reload: false });
            } else if !visible && playing {
                self.playing.remove(&item.id);
                events.push(HostEvent::VideoPause { item: item.id, unload: false });
            }
        }
    }
}
