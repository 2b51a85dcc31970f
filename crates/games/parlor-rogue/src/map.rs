use rand::Rng;
use serde::{Deserialize, Serialize};

/// Tile types for the dungeon grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Floor,
    Stairs,
}

/// Axis-aligned room rectangle in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Room {
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Whether two rooms touch when separated by less than a 1-tile margin.
    pub fn overlaps_with_margin(&self, other: &Room) -> bool {
        self.x < other.x + other.width + 1
            && self.x + self.width + 1 > other.x
            && self.y < other.y + other.height + 1
            && self.y + self.height + 1 > other.y
    }
}

/// Candidate rooms attempted per floor; rejections are not retried, so a
/// floor may end up with fewer rooms.
const MAX_ROOM_ATTEMPTS: usize = 8;
/// Room side length range (inclusive min, exclusive max).
const MIN_ROOM_SIZE: i32 = 4;
const MAX_ROOM_SIZE: i32 = 8;

/// Default floor dimensions in tiles.
pub const MAP_WIDTH: i32 = 20;
pub const MAP_HEIGHT: i32 = 20;

/// One generated dungeon floor: a tile grid plus the accepted room list
/// in acceptance order. The first room is the entry, the last holds the
/// stairway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonMap {
    pub width: i32,
    pub height: i32,
    /// Tile data stored row-major (y * width + x).
    tiles: Vec<Tile>,
    pub rooms: Vec<Room>,
}

impl DungeonMap {
    /// Generate a fresh floor: random non-overlapping rooms carved out of
    /// solid wall, L-shaped corridors between consecutive rooms, and a
    /// stairway at the center of the last room.
    pub fn generate(width: i32, height: i32, rng: &mut impl Rng) -> Self {
        let mut map = Self {
            width,
            height,
            tiles: vec![Tile::Wall; (width * height) as usize],
            rooms: Vec::new(),
        };
        map.place_rooms(rng);
        map.connect_rooms(rng);
        map.place_stairs();
        map
    }

    pub fn tile(&self, x: i32, y: i32) -> Tile {
        if !self.in_bounds(x, y) {
            return Tile::Wall;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[(y * self.width + x) as usize] = tile;
        }
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Whether an actor can stand on (x, y).
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) != Tile::Wall
    }

    fn place_rooms(&mut self, rng: &mut impl Rng) {
        for _ in 0..MAX_ROOM_ATTEMPTS {
            let w = rng.random_range(MIN_ROOM_SIZE..MAX_ROOM_SIZE);
            let h = rng.random_range(MIN_ROOM_SIZE..MAX_ROOM_SIZE);
            if self.width - w - 1 <= 1 || self.height - h - 1 <= 1 {
                continue;
            }
            let candidate = Room {
                x: rng.random_range(1..self.width - w - 1),
                y: rng.random_range(1..self.height - h - 1),
                width: w,
                height: h,
            };

            if self
                .rooms
                .iter()
                .any(|room| candidate.overlaps_with_margin(room))
            {
                continue;
            }

            self.carve_room(&candidate);
            self.rooms.push(candidate);
        }
    }

    fn carve_room(&mut self, room: &Room) {
        for y in room.y..room.y + room.height {
            for x in room.x..room.x + room.width {
                self.set_tile(x, y, Tile::Floor);
            }
        }
    }

    fn connect_rooms(&mut self, rng: &mut impl Rng) {
        for i in 1..self.rooms.len() {
            let (px, py) = self.rooms[i - 1].center();
            let (cx, cy) = self.rooms[i].center();
            // L-shaped corridor; the bend orientation is a coin flip.
            if rng.random_bool(0.5) {
                self.carve_horizontal(px, cx, py);
                self.carve_vertical(py, cy, cx);
            } else {
                self.carve_vertical(py, cy, px);
                self.carve_horizontal(px, cx, cy);
            }
        }
    }

    fn carve_horizontal(&mut self, x1: i32, x2: i32, y: i32) {
        for x in x1.min(x2)..=x1.max(x2) {
            self.set_tile(x, y, Tile::Floor);
        }
    }

    fn carve_vertical(&mut self, y1: i32, y2: i32, x: i32) {
        for y in y1.min(y2)..=y1.max(y2) {
            self.set_tile(x, y, Tile::Floor);
        }
    }

    fn place_stairs(&mut self) {
        if let Some(last) = self.rooms.last().copied() {
            let (x, y) = last.center();
            self.set_tile(x, y, Tile::Stairs);
        }
    }

    /// A single all-floor room covering the interior; no stairs.
    #[cfg(test)]
    pub fn open_arena(width: i32, height: i32) -> Self {
        let mut map = Self {
            width,
            height,
            tiles: vec![Tile::Wall; (width * height) as usize],
            rooms: Vec::new(),
        };
        let room = Room {
            x: 1,
            y: 1,
            width: width - 2,
            height: height - 2,
        };
        map.carve_room(&room);
        map.rooms.push(room);
        map
    }
}
