//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - agent: игрок-агент (жизнь, input gate, инвентарь, цвет, прыжки)
//! - world: объекты уровня (collectibles, checkpoints, switches, movers)
//!
//! Locomotion, camera, hazard и lifecycle компоненты живут в своих модулях.

pub mod agent;
pub mod world;

pub use agent::*;
pub use world::*;
