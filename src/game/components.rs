//! Game Components
//!
//! Components are plain data structs - behavior lives in the player and
//! enemy controllers. The set is fixed at compile time; every entity kind
//! in the game is some combination of these.

use macroquad::math::Vec2;

use super::entity::Entity;

// =============================================================================
// Movement / Physics
// =============================================================================

/// A dynamic physics body. Entities without one (platforms, exits, the
/// inhale zone) never move through the physics step.
#[derive(Debug, Clone, Copy)]
pub struct Body {
    pub velocity: Vec2,
    /// 0.0 for projectiles that fly straight, 1.0 for everything else.
    pub gravity_scale: f32,
    /// Whether the solver pushes this body out of platform geometry.
    /// Projectiles pass through and are despawned by the contact handler.
    pub collide_solids: bool,
    /// Set by the solver when the body lands on top of a platform.
    pub grounded: bool,
}

impl Body {
    pub fn new() -> Self {
        Self {
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            collide_solids: true,
            grounded: false,
        }
    }

    /// Body for straight-flying projectiles.
    pub fn projectile(velocity: Vec2) -> Self {
        Self {
            velocity,
            gravity_scale: 0.0,
            collide_solids: false,
            grounded: false,
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::new()
    }
}

/// Horizontal facing. Sprites are authored facing right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    pub fn flipped(&self) -> Facing {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Double-jump budget. Refilled when the body touches the ground.
#[derive(Debug, Clone, Copy)]
pub struct JumpCharges {
    pub remaining: u8,
    pub max: u8,
}

impl JumpCharges {
    pub fn new(max: u8) -> Self {
        Self { remaining: max, max }
    }

    /// Spend one charge. Returns false (no jump) when empty.
    pub fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }

    pub fn refill(&mut self) {
        self.remaining = self.max;
    }
}

// =============================================================================
// Collision
// =============================================================================

/// Collision group for an entity's collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Player,
    Enemy,
    InhaleZone,
    Star,
    Platform,
    Exit,
}

/// An axis-aligned collision box, offset from the entity position
/// (position is the box center plus `offset`).
#[derive(Debug, Clone)]
pub struct Collider {
    pub offset: Vec2,
    pub size: Vec2,
    pub tag: Tag,
    /// Tags this collider never reports contacts with.
    pub ignore: Vec<Tag>,
}

impl Collider {
    pub fn new(size: Vec2, tag: Tag) -> Self {
        Self {
            offset: Vec2::ZERO,
            size,
            tag,
            ignore: Vec::new(),
        }
    }

    pub fn with_offset(mut self, offset: Vec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn ignoring(mut self, tag: Tag) -> Self {
        self.ignore.push(tag);
        self
    }

    pub fn ignores(&self, tag: Tag) -> bool {
        self.ignore.contains(&tag)
    }
}

// =============================================================================
// Presentation
// =============================================================================

/// Player sprite pose, one variant per drawn expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PuffPose {
    Idle,
    Inhaling,
    Full,
}

/// What an entity looks like. The renderer maps each variant to a small
/// set of shape-drawing calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Look {
    Puff(PuffPose),
    Flame,
    Guy,
    Star,
    InhalePlume,
}

#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub look: Look,
    pub flip_x: bool,
    /// 0.0 (invisible) to 1.0. Driven by the hit-flash tween and the
    /// inhale-effect toggle.
    pub opacity: f32,
}

impl Sprite {
    pub fn new(look: Look) -> Self {
        Self {
            look,
            flip_x: false,
            opacity: 1.0,
        }
    }
}

// =============================================================================
// Gameplay
// =============================================================================

/// Integer hit points with a floor of zero.
#[derive(Debug, Clone, Copy)]
pub struct Health {
    pub current: i32,
}

impl Health {
    pub fn new(amount: i32) -> Self {
        Self { current: amount }
    }

    pub fn hurt(&mut self) {
        self.current = (self.current - 1).max(0);
    }

    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

/// The player's inhale cycle as a proper tagged state, not a pair of
/// booleans. Consuming an enemy mid-inhale lands directly in `Full`,
/// so "inhaling and full at once" is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PuffState {
    #[default]
    Idle,
    Inhaling,
    Full,
}

#[derive(Debug, Clone, Copy)]
pub struct Player {
    pub speed: f32,
    pub state: PuffState,
}

/// Which archetype an enemy is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Flame,
    Guy,
}

/// Shared enemy data. `inhalable` is true exactly while the enemy
/// overlaps the player's inhale zone.
#[derive(Debug, Clone, Copy)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub inhalable: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        Self {
            kind,
            inhalable: false,
        }
    }
}

/// Hopping-flame behavior states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlameState {
    Idle,
    Jump,
}

#[derive(Debug, Clone, Copy)]
pub struct Flame {
    pub state: FlameState,
}

/// Patrolling-guy behavior states. No timer ever schedules `Jump`; it
/// reads as "hold still" and is reserved for a hopping patrol variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuyState {
    Idle,
    Left,
    Right,
    #[allow(dead_code)]
    Jump,
}

#[derive(Debug, Clone, Copy)]
pub struct Guy {
    pub state: GuyState,
    pub speed: f32,
}

/// Marker for the shooting star projectile.
#[derive(Debug, Clone, Copy)]
pub struct Projectile;

/// The trigger box parked left or right of the player, repositioned
/// every tick from the owner's facing.
#[derive(Debug, Clone, Copy)]
pub struct InhaleZone {
    pub owner: Entity,
}

/// Purely visual swirl mirroring the zone's side. No collider.
#[derive(Debug, Clone, Copy)]
pub struct InhaleEffect {
    pub owner: Entity,
}
