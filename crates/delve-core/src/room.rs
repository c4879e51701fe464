//! Room rectangles and rejection-sampling placement.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::GenConfig;
use crate::grid::{Cell, Grid};
use crate::rng::DungeonRng;

/// Consecutive placement failures tolerated before giving up on reaching a
/// target room count.
const MAX_CONSECUTIVE_FAILURES: usize = 50;

/// An axis-aligned room rectangle. Its id is its index in the room list.
///
/// Immutable once placed; every cell in bounds carries the room's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Room {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Geometric center.
    pub fn center(&self) -> (f32, f32) {
        (
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Center rounded to the nearest grid cell.
    pub fn center_cell(&self) -> (i32, i32) {
        let (cx, cy) = self.center();
        (cx.round() as i32, cy.round() as i32)
    }

    /// Euclidean distance between room centers.
    pub fn center_distance(&self, other: &Room) -> f32 {
        let (ax, ay) = self.center();
        let (bx, by) = other.center();
        ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
    }

    /// Check overlap against another room, with each rectangle expanded by
    /// `gap` cells on every side.
    pub fn overlaps(&self, other: &Room, gap: usize) -> bool {
        let ax0 = self.x as i64 - gap as i64;
        let ay0 = self.y as i64 - gap as i64;
        let ax1 = (self.x + self.width + gap) as i64;
        let ay1 = (self.y + self.height + gap) as i64;

        let bx0 = other.x as i64;
        let by0 = other.y as i64;
        let bx1 = (other.x + other.width) as i64;
        let by1 = (other.y + other.height) as i64;

        ax0 < bx1 && bx0 < ax1 && ay0 < by1 && by0 < ay1
    }

    /// Check if a grid coordinate lies inside the room.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x as i32
            && x < (self.x + self.width) as i32
            && y >= self.y as i32
            && y < (self.y + self.height) as i32
    }

    /// Pick a uniformly random cell inside the room.
    pub fn random_point(&self, rng: &mut DungeonRng) -> (i32, i32) {
        (
            (self.x + rng.rn2(self.width as u32) as usize) as i32,
            (self.y + rng.rn2(self.height as u32) as usize) as i32,
        )
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Scatter non-overlapping rooms onto the grid by rejection sampling.
///
/// Rooms keep at least a 1-cell margin from the grid border and a 1-cell
/// gap from each other. Each accepted room gets the next sequential id and
/// its footprint is written into the grid. Stops when the attempt budget
/// runs out, the target count is reached, or placements keep failing
/// consecutively (the grid is full).
pub fn scatter(grid: &mut Grid, cfg: &GenConfig, rng: &mut DungeonRng) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();
    let mut total_attempts = 0usize;
    let mut consecutive_failures = 0usize;

    let target = cfg.room_count;
    // Targeted runs get a doubled budget but bail on sustained failure
    let budget = if target > 0 {
        cfg.attempts * 2
    } else {
        cfg.attempts
    };

    while total_attempts < budget
        && (target == 0 || rooms.len() < target)
        && (target == 0 || consecutive_failures < MAX_CONSECUTIVE_FAILURES)
    {
        total_attempts += 1;

        let rw = cfg.min_room_width
            + rng.rn2((cfg.max_room_width - cfg.min_room_width + 1) as u32) as usize;
        let rh = cfg.min_room_height
            + rng.rn2((cfg.max_room_height - cfg.min_room_height + 1) as u32) as usize;

        // Placement needs a 1-cell border margin on every side
        if cfg.width < rw + 3 || cfg.height < rh + 3 {
            consecutive_failures += 1;
            continue;
        }
        let rx = 1 + rng.rn2((cfg.width - rw - 2) as u32) as usize;
        let ry = 1 + rng.rn2((cfg.height - rh - 2) as u32) as usize;

        let candidate = Room::new(rx, ry, rw, rh);
        if rooms.iter().any(|r| r.overlaps(&candidate, 1)) {
            consecutive_failures += 1;
            continue;
        }

        let id = rooms.len() as i32;
        for x in candidate.x..candidate.x + candidate.width {
            for y in candidate.y..candidate.y + candidate.height {
                grid.set(x as i32, y as i32, Cell::room(id));
            }
        }
        rooms.push(candidate);
        consecutive_failures = 0;
    }

    debug!(
        "room placement: {} attempts, {} rooms placed",
        total_attempts,
        rooms.len()
    );
    rooms
}
