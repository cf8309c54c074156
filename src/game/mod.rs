//! Game Foundation Module
//!
//! A small ECS-inspired foundation for the platformer: generational
//! entity handles, fixed compile-time component tables, frame event
//! queues, AABB collision glue, and a data-driven timer/tween scheduler.
//!
//! Design philosophy:
//! - Simple over flexible (we know what game we're making)
//! - Components are plain data; behavior lives in the controllers
//! - No runtime type registration (compile-time known components)

// Allow unused code - parts of this module are general-purpose surface
// used unevenly by the gameplay layer.
#![allow(dead_code)]

pub mod collision;
pub mod components;
pub mod entity;
pub mod events;
pub mod timers;
pub mod world;

pub use entity::Entity;
pub use events::Events;
pub use world::World;
