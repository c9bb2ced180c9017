//! Static game data: well-known effect ids and region bonus tables

use phf::phf_map;

use crate::field::{EntranceEffect, FieldRegion};

// well-known system effects, not exhaustive
pub mod effect_id {
    /// Max-health bonus granted inside the shadow realm
    pub const SHADOW_REALM_VIGOR: i32 = 70_000_101;
    /// Knockback/stagger protection granted inside the shadow realm
    pub const SHADOW_REALM_WARD: i32 = 70_000_102;
    /// Standard arena entry normalization
    pub const ARENA_PARITY: i32 = 70_000_201;
}

/// Standing bonus effects per region, applied on field entry after the
/// field's own entrance effects.
static REGION_BONUSES: phf::Map<u8, &'static [EntranceEffect]> = phf_map! {
    1u8 => &[
        EntranceEffect { id: effect_id::SHADOW_REALM_VIGOR, level: 1 },
        EntranceEffect { id: effect_id::SHADOW_REALM_WARD, level: 1 },
    ],
    2u8 => &[
        EntranceEffect { id: effect_id::ARENA_PARITY, level: 1 },
    ],
};

/// Bonus effects for a region; empty for regions without one.
pub fn region_bonus_effects(region: FieldRegion) -> &'static [EntranceEffect] {
    REGION_BONUSES.get(&(region as u8)).copied().unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_has_no_bonuses() {
        assert!(region_bonus_effects(FieldRegion::Default).is_empty());
    }

    #[test]
    fn shadow_realm_grants_both_wards() {
        let bonuses = region_bonus_effects(FieldRegion::ShadowRealm);
        assert_eq!(bonuses.len(), 2);
        assert_eq!(bonuses[0].id, effect_id::SHADOW_REALM_VIGOR);
    }
}
