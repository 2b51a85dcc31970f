use serde::{Deserialize, Serialize};

/// Grid position in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Pos) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// The player: position, combat stats, and progression counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    pub gold: u32,
}

impl Player {
    pub fn new(pos: Pos) -> Self {
        Self {
            pos,
            hp: 100,
            max_hp: 100,
            attack: 10,
            defense: 5,
            level: 1,
            exp: 0,
            exp_to_next: 100,
            gold: 0,
        }
    }

    /// Heal up to the hp cap.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    /// Add experience and apply every level-up it pays for. A single large
    /// gain can cross several thresholds, so this loops rather than
    /// branching once. Returns the number of levels gained.
    pub fn gain_exp(&mut self, amount: u32) -> u32 {
        self.exp += amount;
        let mut gained = 0;
        while self.exp >= self.exp_to_next {
            self.exp -= self.exp_to_next;
            self.level += 1;
            self.max_hp += 20;
            self.attack += 3;
            self.defense += 2;
            // x1.5 rounded down, in integer arithmetic
            self.exp_to_next = self.exp_to_next * 3 / 2;
            // Leveling fully restores hp
            self.hp = self.max_hp;
            gained += 1;
        }
        gained
    }
}

/// Enemy species. Each maps to a fixed stat bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Slime,
    Goblin,
    Orc,
    Skeleton,
}

/// Per-species combat stats and kill reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStats {
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub exp_value: u32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Slime,
        EnemyKind::Goblin,
        EnemyKind::Orc,
        EnemyKind::Skeleton,
    ];

    pub const fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Slime => EnemyStats {
                hp: 20,
                attack: 5,
                defense: 1,
                exp_value: 10,
            },
            EnemyKind::Goblin => EnemyStats {
                hp: 35,
                attack: 8,
                defense: 3,
                exp_value: 20,
            },
            EnemyKind::Orc => EnemyStats {
                hp: 50,
                attack: 12,
                defense: 5,
                exp_value: 35,
            },
            EnemyKind::Skeleton => EnemyStats {
                hp: 40,
                attack: 10,
                defense: 8,
                exp_value: 30,
            },
        }
    }
}

/// An enemy on the current floor.
///
/// Dead enemies are soft-deleted: `alive` goes false and they stop acting
/// and colliding, but the entry stays in storage so the AI scan never
/// mutates the list it is iterating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Pos,
    pub hp: i32,
    pub max_hp: i32,
    pub alive: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Pos) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            pos,
            hp: stats.hp,
            max_hp: stats.hp,
            alive: true,
        }
    }
}
