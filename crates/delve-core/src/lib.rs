//! Procedural 2D dungeon layout generation.
//!
//! The pipeline scatters rooms onto a dense cell grid by rejection
//! sampling, connects them through a Delaunay-derived graph reduced to a
//! spanning tree plus a few loop edges, carves corridors along the graph
//! with a cost-shaped A*, prunes dead ends, and finally audits and
//! repairs connectivity so every room reaches every other room.
//!
//! Entry point is [`generate`] with a [`GenConfig`]; the result is a
//! [`Dungeon`] holding the cell grid and the placed rooms. Runs with the
//! same non-zero seed produce identical layouts.

pub mod carve;
pub mod config;
pub mod generate;
pub mod graph;
pub mod grid;
pub mod heap;
pub mod room;
pub mod triangulate;
pub mod union_find;

mod rng;

pub use config::{ConfigError, GenConfig};
pub use generate::{Dungeon, generate};
pub use graph::Edge;
pub use grid::{Cell, CellType, Grid, NO_ROOM};
pub use rng::DungeonRng;
pub use room::Room;
