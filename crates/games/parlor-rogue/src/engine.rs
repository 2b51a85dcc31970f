use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::actor::{Enemy, EnemyKind, Player, Pos};
use crate::item::{Item, ItemKind};
use crate::map::{DungeonMap, MAP_HEIGHT, MAP_WIDTH, Room, Tile};

/// Chance that a non-entry room spawns an enemy.
const ENEMY_SPAWN_CHANCE: f64 = 0.7;
/// Items per floor, before the per-floor bonus.
const BASE_ITEMS_PER_FLOOR: u32 = 5;
/// Enemies notice and chase the player within this Manhattan distance.
const ENEMY_SIGHT_RANGE: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }
}

/// Discrete player actions. Each accepted action advances exactly one
/// global turn; rejected actions (walking into a wall, picking up air)
/// cost nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move(Direction),
    Wait,
    PickUp,
    Descend,
}

/// Whether the run is still live. Defeat is terminal: the engine ignores
/// all further actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Playing,
    Defeat,
}

/// What happened during one turn. The rendering surface turns these into
/// log lines; the engine itself has no text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TurnEvent {
    PlayerHit { target: EnemyKind, damage: i32 },
    EnemyDefeated { kind: EnemyKind, exp: u32 },
    LeveledUp { level: u32 },
    PlayerDamaged { attacker: EnemyKind, damage: i32 },
    Defeated,
    Healed { amount: i32 },
    GoldFound { amount: u32 },
    Descended { floor: u32 },
}

/// One roguelike run: the current floor, the player, and everything on
/// the floor with them. Fully synchronous; one action in, one resolved
/// turn out.
#[derive(Debug, Clone)]
pub struct Crawl {
    pub floor: u32,
    pub map: DungeonMap,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub turn: u64,
    pub outcome: Outcome,
    rng: StdRng,
}

impl Crawl {
    /// Start a run on floor 1 with a seeded rng (same seed, same dungeon).
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let map = DungeonMap::generate(MAP_WIDTH, MAP_HEIGHT, &mut rng);
        let (px, py) = map.rooms[0].center();
        let mut crawl = Self {
            floor: 1,
            map,
            player: Player::new(Pos::new(px, py)),
            enemies: Vec::new(),
            items: Vec::new(),
            turn: 0,
            outcome: Outcome::Playing,
            rng,
        };
        crawl.populate_floor();
        crawl
    }

    /// Apply one player action. Returns the turn's events; an empty vec
    /// means the action was rejected and no turn passed.
    pub fn step(&mut self, action: Action) -> Vec<TurnEvent> {
        let mut events = Vec::new();
        if self.outcome == Outcome::Defeat {
            return events;
        }

        match action {
            Action::Move(dir) => {
                let (dx, dy) = dir.delta();
                let target = Pos::new(self.player.pos.x + dx, self.player.pos.y + dy);
                if !self.map.is_walkable(target.x, target.y) {
                    return events;
                }
                if let Some(idx) = self.living_enemy_at(target) {
                    self.attack_enemy(idx, &mut events);
                } else {
                    self.player.pos = target;
                }
            },
            Action::Wait => {},
            Action::PickUp => {
                let Some(idx) = self.items.iter().position(|i| i.pos == self.player.pos) else {
                    return events;
                };
                let item = self.items.remove(idx);
                self.apply_item(item.kind, &mut events);
            },
            Action::Descend => {
                if self.map.tile(self.player.pos.x, self.player.pos.y) != Tile::Stairs {
                    return events;
                }
                self.descend(&mut events);
                self.turn += 1;
                // The new floor's enemies have not seen the player yet;
                // no enemy phase on a transition turn.
                return events;
            },
        }

        self.turn += 1;
        self.enemy_phase(&mut events);
        events
    }

    fn living_enemy_at(&self, pos: Pos) -> Option<usize> {
        self.enemies
            .iter()
            .position(|e| e.alive && e.pos == pos)
    }

    fn attack_enemy(&mut self, idx: usize, events: &mut Vec<TurnEvent>) {
        let kind = self.enemies[idx].kind;
        let damage = combat_damage(self.player.attack, kind.stats().defense, &mut self.rng);
        self.enemies[idx].hp -= damage;
        events.push(TurnEvent::PlayerHit {
            target: kind,
            damage,
        });

        if self.enemies[idx].hp <= 0 {
            // Soft delete: the entry stays in storage, it just stops
            // acting and colliding.
            self.enemies[idx].alive = false;
            let exp = kind.stats().exp_value;
            events.push(TurnEvent::EnemyDefeated { kind, exp });
            if self.player.gain_exp(exp) > 0 {
                events.push(TurnEvent::LeveledUp {
                    level: self.player.level,
                });
            }
        }
    }

    fn apply_item(&mut self, kind: ItemKind, events: &mut Vec<TurnEvent>) {
        if kind.is_currency() {
            let amount = 10 + self.rng.random_range(0..20);
            self.player.gold += amount;
            events.push(TurnEvent::GoldFound { amount });
        } else {
            let amount = kind.heal_amount();
            self.player.heal(amount);
            events.push(TurnEvent::Healed { amount });
        }
    }

    fn descend(&mut self, events: &mut Vec<TurnEvent>) {
        self.floor += 1;
        self.map = DungeonMap::generate(MAP_WIDTH, MAP_HEIGHT, &mut self.rng);
        let (px, py) = self.map.rooms[0].center();
        self.player.pos = Pos::new(px, py);
        self.populate_floor();
        tracing::debug!(floor = self.floor, "descended to new floor");
        events.push(TurnEvent::Descended { floor: self.floor });
    }

    /// Wholesale floor population: enemies in non-entry rooms, items
    /// scattered across all rooms. Player stats are untouched.
    fn populate_floor(&mut self) {
        self.enemies.clear();
        self.items.clear();

        for room in self.map.rooms.iter().skip(1) {
            if self.rng.random_bool(ENEMY_SPAWN_CHANCE) {
                let kind = EnemyKind::ALL[self.rng.random_range(0..EnemyKind::ALL.len())];
                let pos = random_point_in(&mut self.rng, room);
                self.enemies.push(Enemy::new(kind, pos));
            }
        }

        let count = BASE_ITEMS_PER_FLOOR + self.floor;
        for _ in 0..count {
            let room = self.map.rooms[self.rng.random_range(0..self.map.rooms.len())];
            let kind = ItemKind::ALL[self.rng.random_range(0..ItemKind::ALL.len())];
            let pos = random_point_in(&mut self.rng, &room);
            self.items.push(Item { kind, pos });
        }
    }

    /// Every living enemy acts once, in list order. Adjacent enemies
    /// attack; enemies in sight range step one cell along the axis with
    /// the larger offset (ties go vertical); everyone else idles.
    fn enemy_phase(&mut self, events: &mut Vec<TurnEvent>) {
        for i in 0..self.enemies.len() {
            if !self.enemies[i].alive {
                continue;
            }
            let epos = self.enemies[i].pos;
            let dx = self.player.pos.x - epos.x;
            let dy = self.player.pos.y - epos.y;
            let dist = dx.abs() + dy.abs();

            if dist == 1 {
                let kind = self.enemies[i].kind;
                let damage =
                    combat_damage(kind.stats().attack, self.player.defense, &mut self.rng);
                self.player.hp -= damage;
                events.push(TurnEvent::PlayerDamaged {
                    attacker: kind,
                    damage,
                });
                if self.player.hp <= 0 {
                    self.outcome = Outcome::Defeat;
                    events.push(TurnEvent::Defeated);
                    tracing::debug!(turn = self.turn, "player defeated");
                    return;
                }
            } else if dist <= ENEMY_SIGHT_RANGE {
                let step = if dx.abs() > dy.abs() {
                    Pos::new(epos.x + dx.signum(), epos.y)
                } else {
                    Pos::new(epos.x, epos.y + dy.signum())
                };
                let blocked = !self.map.is_walkable(step.x, step.y)
                    || self
                        .enemies
                        .iter()
                        .enumerate()
                        .any(|(j, e)| j != i && e.alive && e.pos == step);
                if !blocked {
                    self.enemies[i].pos = step;
                }
            }
        }
    }
}

/// Damage roll: attack minus defense plus a small random swing, floored
/// at 1 so armor can never zero out a hit.
fn combat_damage(attack: i32, defense: i32, rng: &mut impl Rng) -> i32 {
    (attack - defense + rng.random_range(0..5) - 2).max(1)
}

fn random_point_in(rng: &mut StdRng, room: &Room) -> Pos {
    Pos::new(
        room.x + rng.random_range(0..room.width),
        room.y + rng.random_range(0..room.height),
    )
}
