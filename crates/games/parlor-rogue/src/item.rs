use serde::{Deserialize, Serialize};

use crate::actor::Pos;

/// Item species on the floor; consumed exactly once on pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Potion,
    Bread,
    RiceBall,
    Coins,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Potion,
        ItemKind::Bread,
        ItemKind::RiceBall,
        ItemKind::Coins,
    ];

    /// Healing granted on pickup. Currency heals nothing.
    pub const fn heal_amount(self) -> i32 {
        match self {
            ItemKind::Potion => 30,
            ItemKind::Bread | ItemKind::RiceBall => 15,
            ItemKind::Coins => 0,
        }
    }

    pub const fn is_currency(self) -> bool {
        matches!(self, ItemKind::Coins)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub pos: Pos,
}
