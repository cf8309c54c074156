//! Frame events
//!
//! Contact begin/end notifications are queued by the collision tracker
//! and drained by the player and enemy controllers later in the same
//! frame. Queueing keeps the tracker free of gameplay knowledge.

use super::components::Tag;
use super::entity::Entity;

/// A queue for events of a single type, drained once per frame.
#[derive(Debug)]
pub struct EventQueue<T> {
    items: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, event: T) {
        self.items.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn drain(&mut self) -> Vec<T> {
        std::mem::take(&mut self.items)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two tagged colliders started or stopped overlapping.
///
/// Sides follow the tracker's watched-pair order, so a Player/Enemy
/// contact always has the player on side `a`. Handlers should still
/// match through `between`, which accepts either order.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: Entity,
    pub a_tag: Tag,
    pub b: Entity,
    pub b_tag: Tag,
}

impl Contact {
    /// The two entities, if this contact is between the given tag pair
    /// (in either order). Returned in `(first, second)` tag order.
    pub fn between(&self, first: Tag, second: Tag) -> Option<(Entity, Entity)> {
        if self.a_tag == first && self.b_tag == second {
            Some((self.a, self.b))
        } else if self.a_tag == second && self.b_tag == first {
            Some((self.b, self.a))
        } else {
            None
        }
    }
}

/// All event queues for one frame of the gameplay scene.
#[derive(Default)]
pub struct Events {
    /// Overlap started this frame.
    pub contact_begin: EventQueue<Contact>,
    /// Overlap ended this frame (or one side despawned).
    pub contact_end: EventQueue<Contact>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.contact_begin.clear();
        self.contact_end.clear();
    }
}
