//! Collision Layers Constants
//!
//! Centralised битовые маски для всего проекта (headless и Rapier backend
//! используют одни и те же значения).
//!
//! ## Layers:
//! - bit 0: Default geometry (пол, стены, платформы)
//! - bit 3: Blue geometry
//! - bit 6: Yellow geometry
//! - bit 7: Agent (нейтральный цвет)
//! - bit 8: Agent, синий цвет
//! - bit 9: Agent, жёлтый цвет
//!
//! Цвет агента определяет его layer; матрица коллизий (кто сквозь кого
//! проходит) задаёт геометрия: `HeadlessCollider::blocks` в headless,
//! filters `CollisionGroups` в Rapier.

use crate::components::PaintColor;

// ============================================================================
// Geometry layers
// ============================================================================

pub const LAYER_DEFAULT: u32 = 1 << 0;

pub const LAYER_BLUE: u32 = 1 << 3;

pub const LAYER_YELLOW: u32 = 1 << 6;

// ============================================================================
// Agent layers
// ============================================================================

pub const LAYER_AGENT: u32 = 1 << 7;

pub const LAYER_AGENT_BLUE: u32 = 1 << 8;

pub const LAYER_AGENT_YELLOW: u32 = 1 << 9;

/// Все layer'ы агента (solid геометрия по умолчанию держит любой цвет)
pub const AGENT_LAYERS: u32 = LAYER_AGENT | LAYER_AGENT_BLUE | LAYER_AGENT_YELLOW;

/// Порядок проверки земли: дешёвый общий слой первым (early exit)
pub const GROUND_MASKS: [u32; 3] = [LAYER_DEFAULT, LAYER_BLUE, LAYER_YELLOW];

/// Layer агента для данного цвета
pub fn agent_layer_for(color: PaintColor) -> u32 {
    match color {
        PaintColor::Neutral => LAYER_AGENT,
        PaintColor::Blue => LAYER_AGENT_BLUE,
        PaintColor::Yellow => LAYER_AGENT_YELLOW,
    }
}

/// Название слоя для debug логов
pub fn get_layer_name(layer_bits: u32) -> &'static str {
    match layer_bits {
        LAYER_DEFAULT => "Default",
        LAYER_BLUE => "Blue",
        LAYER_YELLOW => "Yellow",
        LAYER_AGENT => "Agent",
        LAYER_AGENT_BLUE => "AgentBlue",
        LAYER_AGENT_YELLOW => "AgentYellow",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_layers_follow_color() {
        assert_eq!(agent_layer_for(PaintColor::Neutral), LAYER_AGENT);
        assert_eq!(agent_layer_for(PaintColor::Blue), LAYER_AGENT_BLUE);
        assert_eq!(agent_layer_for(PaintColor::Yellow), LAYER_AGENT_YELLOW);
    }

    #[test]
    fn test_layers_are_disjoint() {
        let all = [
            LAYER_DEFAULT,
            LAYER_BLUE,
            LAYER_YELLOW,
            LAYER_AGENT,
            LAYER_AGENT_BLUE,
            LAYER_AGENT_YELLOW,
        ];
        let combined = all.iter().fold(0u32, |acc, bits| acc | bits);
        assert_eq!(combined.count_ones() as usize, all.len());
        assert_eq!(get_layer_name(LAYER_BLUE), "Blue");
    }
}
