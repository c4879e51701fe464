//! The full generation pipeline and the finished dungeon.

use log::info;
use serde::Serialize;

use crate::carve::Carver;
use crate::config::{ConfigError, GenConfig};
use crate::graph;
use crate::grid::{CellType, Grid};
use crate::rng::DungeonRng;
use crate::room::{self, Room};

/// A finished dungeon layout.
#[derive(Debug, Clone, Serialize)]
pub struct Dungeon {
    grid: Grid,
    rooms: Vec<Room>,
    seed: u64,
}

impl Dungeon {
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// The seed that produced this layout. Feeding it back through the
    /// config reproduces the layout exactly.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.grid.in_bounds(x, y)
    }

    pub fn is_floor(&self, x: i32, y: i32) -> bool {
        self.grid.is_floor(x, y)
    }

    pub fn render_ascii(&self) -> String {
        self.grid.render_ascii()
    }

    /// Pick a safe spawn cell in the given room: floor with all four
    /// neighbors on floor, searched outward from the room center. Falls
    /// back to the center itself; `None` only for a bad room index.
    pub fn spawn_point(&self, room_index: usize) -> Option<(i32, i32)> {
        let room = self.rooms.get(room_index)?;
        let (cx, cy) = room.center_cell();
        let cx = cx.clamp(room.x as i32, (room.x + room.width) as i32 - 1);
        let cy = cy.clamp(room.y as i32, (room.y + room.height) as i32 - 1);

        let is_safe = |x: i32, y: i32| {
            self.grid.is_floor(x, y)
                && [(1, 0), (-1, 0), (0, 1), (0, -1)]
                    .iter()
                    .all(|&(dx, dy)| self.grid.is_floor(x + dx, y + dy))
        };

        let max_radius = room.width.max(room.height) as i32;
        for radius in 0..=max_radius {
            for ox in -radius..=radius {
                for oy in -radius..=radius {
                    if ox.abs().max(oy.abs()) != radius {
                        continue;
                    }
                    let (x, y) = (cx + ox, cy + oy);
                    if room.contains(x, y) && is_safe(x, y) {
                        return Some((x, y));
                    }
                }
            }
        }
        Some((cx, cy))
    }

    /// Enumerate wall faces: for every floor cell, each cardinal neighbor
    /// that is not floor yields one `(floor_cell, outward_direction)` pair.
    /// This is what a renderer instantiates wall geometry from.
    pub fn wall_faces(&self) -> Vec<((i32, i32), (i32, i32))> {
        let mut faces = Vec::new();
        for x in 0..self.grid.width() as i32 {
            for y in 0..self.grid.height() as i32 {
                if !self.grid.is_floor(x, y) {
                    continue;
                }
                for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                    if !self.grid.is_floor(x + dx, y + dy) {
                        faces.push(((x, y), (dx, dy)));
                    }
                }
            }
        }
        faces
    }
}

/// Run the full pipeline: validate, scatter rooms, build the connection
/// graph, carve corridors, prune, and repair connectivity.
pub fn generate(cfg: &GenConfig) -> Result<Dungeon, ConfigError> {
    cfg.validate()?;

    let mut rng = if cfg.seed == 0 {
        DungeonRng::from_entropy()
    } else {
        DungeonRng::new(cfg.seed)
    };
    let seed = rng.seed();

    let mut grid = Grid::new(cfg.width, cfg.height);
    let rooms = room::scatter(&mut grid, cfg, &mut rng);

    if rooms.len() >= 2 {
        let candidates = graph::candidate_edges(&rooms);
        let tree = graph::prim_mst(&candidates, &rooms);
        let full = graph::add_extra_edges(&candidates, &tree, cfg.extra_edge_ratio, &mut rng);

        let mut carver = Carver::new(&mut grid, &mut rng);
        carver.carve(&full, &rooms, cfg.corridor_width);
    }

    info!(
        "generated {}x{} dungeon: {} rooms, {} corridor cells, seed {}",
        cfg.width,
        cfg.height,
        rooms.len(),
        grid.count(CellType::Corridor),
        seed
    );

    Ok(Dungeon { grid, rooms, seed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rooms_is_fine() {
        let cfg = GenConfig {
            width: 4,
            height: 4,
            seed: 1,
            ..Default::default()
        };
        let d = generate(&cfg).unwrap();
        assert!(d.rooms().is_empty());
        assert_eq!(d.grid().count(CellType::Corridor), 0);
    }

    #[test]
    fn test_single_room_has_no_corridors() {
        let cfg = GenConfig {
            width: 16,
            height: 16,
            room_count: 1,
            seed: 5,
            ..Default::default()
        };
        let d = generate(&cfg).unwrap();
        assert_eq!(d.rooms().len(), 1);
        assert_eq!(d.grid().count(CellType::Corridor), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let cfg = GenConfig {
            width: 0,
            ..Default::default()
        };
        assert!(generate(&cfg).is_err());
    }

    #[test]
    fn test_seed_recorded() {
        let cfg = GenConfig {
            seed: 1234,
            ..Default::default()
        };
        let d = generate(&cfg).unwrap();
        assert_eq!(d.seed(), 1234);
    }

    #[test]
    fn test_spawn_point_is_safe_floor() {
        let cfg = GenConfig {
            seed: 77,
            ..Default::default()
        };
        let d = generate(&cfg).unwrap();
        for i in 0..d.rooms().len() {
            let (x, y) = d.spawn_point(i).unwrap();
            assert!(d.rooms()[i].contains(x, y));
            assert!(d.is_floor(x, y));
        }
        assert_eq!(d.spawn_point(d.rooms().len()), None);
    }

    #[test]
    fn test_wall_faces_border_floor() {
        let cfg = GenConfig {
            seed: 8,
            ..Default::default()
        };
        let d = generate(&cfg).unwrap();
        let faces = d.wall_faces();
        assert!(!faces.is_empty());
        for ((x, y), (dx, dy)) in faces {
            assert!(d.is_floor(x, y));
            assert!(!d.is_floor(x + dx, y + dy));
        }
    }
}
