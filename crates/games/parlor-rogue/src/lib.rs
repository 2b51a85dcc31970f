pub mod actor;
pub mod engine;
pub mod input;
pub mod item;
pub mod map;

pub use actor::{Enemy, EnemyKind, Player, Pos};
pub use engine::{Action, Crawl, Direction, Outcome, TurnEvent};
pub use input::action_for_key;
pub use item::{Item, ItemKind};
pub use map::{DungeonMap, Room, Tile};
