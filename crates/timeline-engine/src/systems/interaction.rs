use thiserror::Error;

use crate::api::types::{CursorKind, ItemId};
use crate::components::section::END;
use crate::core::scene::SceneGraph;
use crate::renderer::raycast::{cast, Hit, Ray};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("no item to open or close")]
    NoItem,
    #[error("item {0:?} does not exist")]
    UnknownItem(ItemId),
    #[error("timeline has no sections yet")]
    NoSections,
    #[error("another transition is still animating")]
    Busy,
}

/// Mutually exclusive interaction modes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// `return_z` is the timeline depth to restore on close.
    ItemOpen { item: ItemId, return_z: f32 },
    ContactOpen,
}

/// Something the pointer can be over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Item(ItemId),
    Whoosh,
    ItemLink,
    ContactLink,
}

/// What a primary press asks the engine to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    None,
    OpenItem(ItemId),
    CloseItem,
    CloseContact,
    FollowItemLink,
    FollowContactLink,
    /// Glide back to the start.
    Whoosh,
    /// Start the delayed hold-to-advance ramp.
    PrimeAutoAdvance,
}

/// Whoosh hover changes reported by a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhooshHover {
    Entered,
    Left,
}

/// Pointer picking, cursor policy and the open/close sub-state machine.
/// Hits are computed on pointer move and cached until the next move or
/// state change.
#[derive(Debug, Clone)]
pub struct InteractionController {
    state: InteractionState,
    item_animating: bool,
    holding: bool,
    hovering_whoosh: bool,
    enabled: bool,
    hits: Vec<Hit<PointerTarget>>,
    link_hit: bool,
    cursor: CursorKind,
    cursor_changed: bool,
}

impl InteractionController {
    pub fn new(touch_enabled: bool) -> Self {
        Self {
            state: InteractionState::Idle,
            item_animating: false,
            holding: false,
            hovering_whoosh: false,
            enabled: true,
            hits: Vec::new(),
            link_hit: false,
            cursor: if touch_enabled { CursorKind::Default } else { CursorKind::Pointer },
            cursor_changed: false,
        }
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn item_open(&self) -> Option<ItemId> {
        match self.state {
            InteractionState::ItemOpen { item, .. } => Some(item),
            _ => None,
        }
    }

    pub fn contact_open(&self) -> bool {
        self.state == InteractionState::ContactOpen
    }

    pub fn is_animating(&self) -> bool {
        self.item_animating
    }

    pub fn is_holding(&self) -> bool {
        self.holding
    }

    pub fn hovering_whoosh(&self) -> bool {
        self.hovering_whoosh
    }

    pub fn hits(&self) -> &[Hit<PointerTarget>] {
        &self.hits
    }

    pub fn cursor(&self) -> CursorKind {
        self.cursor
    }

    /// Pointer picking off (easter egg).
    pub fn disable(&mut self) {
        self.enabled = false;
        self.invalidate();
    }

    pub fn set_cursor(&mut self, cursor: CursorKind) {
        if self.cursor != cursor {
            self.cursor = cursor;
            self.cursor_changed = true;
        }
    }

    /// The cursor, if it changed since the last call.
    pub fn take_cursor_change(&mut self) -> Option<CursorKind> {
        std::mem::take(&mut self.cursor_changed).then_some(self.cursor)
    }

    /// Drop cached hits. Returns `WhooshHover::Left` if the whoosh was hovered.
    pub fn invalidate(&mut self) -> Option<WhooshHover> {
        self.hits.clear();
        self.link_hit = false;
        if std::mem::take(&mut self.hovering_whoosh) {
            Some(WhooshHover::Left)
        } else {
            None
        }
    }

    /// Recompute hits for a pointer ray and update the cursor.
    pub fn pointer_move(&mut self, ray: &Ray, scene: &SceneGraph, active_month: Option<&str>) -> Option<WhooshHover> {
        if !self.enabled {
            return None;
        }
        let mut hover = None;

        match self.state {
            InteractionState::Idle if !self.holding => {
                if active_month == Some(END) {
                    self.hits.clear();
                    let over = scene
                        .whoosh_matrix()
                        .is_some_and(|m| ray.intersect_quad(&m).is_some());
                    if over && !self.hovering_whoosh {
                        self.hovering_whoosh = true;
                        self.set_cursor(CursorKind::Eye);
                        hover = Some(WhooshHover::Entered);
                    } else if !over && self.hovering_whoosh {
                        self.hovering_whoosh = false;
                        self.set_cursor(CursorKind::Pointer);
                        hover = Some(WhooshHover::Left);
                    }
                } else {
                    self.hits = cast(
                        ray,
                        scene
                            .items
                            .iter()
                            .filter(|item| item.is_renderable())
                            .map(|item| (PointerTarget::Item(item.id), scene.item_matrix(item))),
                    );
                    if self.hits.is_empty() {
                        self.set_cursor(CursorKind::Pointer);
                    } else {
                        self.set_cursor(CursorKind::Eye);
                    }
                }
            }
            InteractionState::ItemOpen { item, .. } => {
                if scene.item(item).and_then(|i| i.link()).is_some() {
                    self.link_hit = ray.intersect_quad(&scene.link_box_matrix()).is_some();
                    self.set_cursor(if self.link_hit { CursorKind::Eye } else { CursorKind::Cross });
                }
            }
            InteractionState::ContactOpen => {
                self.link_hit =
                    scene.contact.link.is_some() && ray.intersect_quad(&scene.contact_link_matrix()).is_some();
                self.set_cursor(if self.link_hit { CursorKind::Eye } else { CursorKind::Cross });
            }
            InteractionState::Idle => {}
        }
        hover
    }

    /// Decide what a primary press does, from the cached hits.
    pub fn pointer_down(&mut self) -> ClickAction {
        if !self.enabled {
            return ClickAction::None;
        }
        self.holding = true;

        match self.state {
            InteractionState::ContactOpen if self.link_hit => ClickAction::FollowContactLink,
            InteractionState::ContactOpen => ClickAction::CloseContact,
            InteractionState::ItemOpen { .. } if self.link_hit => ClickAction::FollowItemLink,
            InteractionState::ItemOpen { .. } => ClickAction::CloseItem,
            InteractionState::Idle => match self.hits.first() {
                Some(Hit { target: PointerTarget::Item(id), .. }) => ClickAction::OpenItem(*id),
                _ if self.hovering_whoosh => ClickAction::Whoosh,
                _ => ClickAction::PrimeAutoAdvance,
            },
        }
    }

    pub fn pointer_up(&mut self) {
        self.holding = false;
        if self.item_open().is_none() {
            self.set_cursor(CursorKind::Pointer);
        }
    }

    // -- Transitions --

    /// Idle → ItemOpen. The caller validated the item.
    pub fn begin_open(&mut self, item: ItemId, return_z: f32) -> Result<(), InteractionError> {
        if self.item_animating || self.state != InteractionState::Idle {
            return Err(InteractionError::Busy);
        }
        self.state = InteractionState::ItemOpen { item, return_z };
        self.item_animating = true;
        self.invalidate();
        self.set_cursor(CursorKind::Cross);
        Ok(())
    }

    /// The opening animation reached the centre.
    pub fn finish_open(&mut self) {
        self.item_animating = false;
        self.set_cursor(CursorKind::Cross);
    }

    /// Start closing; the state stays `ItemOpen` until `finish_close`.
    pub fn begin_close(&mut self) -> Result<(ItemId, f32), InteractionError> {
        let InteractionState::ItemOpen { item, return_z } = self.state else {
            return Err(InteractionError::NoItem);
        };
        if self.item_animating {
            return Err(InteractionError::Busy);
        }
        self.item_animating = true;
        self.link_hit = false;
        self.set_cursor(CursorKind::Pointer);
        Ok((item, return_z))
    }

    /// The timeline returned to its pre-open depth.
    pub fn finish_close(&mut self) {
        self.state = InteractionState::Idle;
        self.item_animating = false;
        self.invalidate();
    }

    /// Idle → ContactOpen.
    pub fn open_contact(&mut self) -> Result<(), InteractionError> {
        if self.item_animating || self.state != InteractionState::Idle {
            return Err(InteractionError::Busy);
        }
        self.state = InteractionState::ContactOpen;
        self.invalidate();
        self.set_cursor(CursorKind::Cross);
        Ok(())
    }

    /// ContactOpen → Idle, immediately; scrolling returns when the camera
    /// arrives.
    pub fn close_contact(&mut self) -> bool {
        if !self.contact_open() {
            return false;
        }
        self.state = InteractionState::Idle;
        self.invalidate();
        true
    }
}
