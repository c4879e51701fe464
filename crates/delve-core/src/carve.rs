//! Corridor carving: cost-shaped A* between room entries, dead-end
//! pruning, and the connectivity repair net.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};

use crate::graph::Edge;
use crate::grid::{Cell, CellType, Grid, NO_ROOM};
use crate::heap::MinHeap;
use crate::rng::DungeonRng;
use crate::room::Room;
use crate::union_find::UnionFind;

/// Discount for changing direction, keeps corridors from running arrow
/// straight across the map.
const DIR_CHANGE_BONUS: i32 = -1;
/// Discount for stepping onto an existing corridor, encourages merging.
const CORRIDOR_BONUS: i32 = -4;
/// Straight steps tolerated before the run penalty kicks in.
const MAX_STRAIGHT_RUN: u32 = 1;
/// Per-excess-step factor of the straight-run penalty; the total scales
/// with how far past the tolerance the run has gone.
const STRAIGHT_RUN_PENALTY: i32 = 8;
/// Base cost of stepping through a room cell.
const ROOM_COST: i32 = 10;
/// Multiplier applied to the per-cell terrain noise.
const NOISE_FACTOR: i32 = 5;
/// Percent chance a direction change gets the extra turn discount.
const RANDOM_TURN_CHANCE: u32 = 50;
const RANDOM_TURN_BONUS: i32 = -10;
/// Jitter added to each enqueued priority.
const PRIORITY_JITTER: u32 = 20;
/// Node expansion cap per search before falling back.
const MAX_ASTAR_ITERATIONS: usize = 5000;
/// Reconstruction cap, guards against corrupt parent chains.
const MAX_PATH_LEN: usize = 1000;
/// Entry-point variants tried before giving up on the search.
const ENTRY_RETRIES: u32 = 3;
/// Pruning sweeps before declaring a fixed point by fiat.
const MAX_PRUNE_SWEEPS: usize = 100;

const CARDINAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const ALL_DIRS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

/// Carves corridors for one generation run.
///
/// Owns a per-cell noise field sampled up front; the noise shapes the A*
/// cost surface so corridors wander instead of hugging straight lines.
pub struct Carver<'a> {
    grid: &'a mut Grid,
    rng: &'a mut DungeonRng,
    noise: Vec<Vec<i32>>,
}

impl<'a> Carver<'a> {
    pub fn new(grid: &'a mut Grid, rng: &'a mut DungeonRng) -> Self {
        let (w, h) = (grid.width(), grid.height());
        let mut noise = vec![vec![0; h]; w];
        for col in noise.iter_mut() {
            for cell in col.iter_mut() {
                *cell = rng.rnd(4) as i32;
            }
        }
        Self { grid, rng, noise }
    }

    /// Carve every graph edge, prune dead ends, then audit and repair
    /// connectivity. After this returns, every room reaches every other
    /// room through floor cells.
    pub fn carve(&mut self, graph: &[Edge], rooms: &[Room], corridor_width: usize) {
        for edge in graph {
            if edge.a == edge.b {
                continue;
            }
            self.carve_edge(edge, rooms, corridor_width);
        }
        let pruned = self.prune_dead_ends();
        debug!("pruned {pruned} dead-end corridor cells");
        self.repair_connectivity(rooms, corridor_width);
    }

    fn carve_edge(&mut self, edge: &Edge, rooms: &[Room], corridor_width: usize) {
        let from = &rooms[edge.a];
        let to = &rooms[edge.b];

        // Centers resolving to the same room id means the rooms are
        // effectively merged already
        let (fx, fy) = clamped_center(from);
        let (tx, ty) = clamped_center(to);
        if self.grid.room_id(fx, fy) == self.grid.room_id(tx, ty) {
            return;
        }

        let mut path = None;
        for variant in 0..ENTRY_RETRIES {
            let start = self.entry_point(from, to.center(), variant);
            let goal = self.entry_point(to, from.center(), variant);
            if start == goal {
                return;
            }
            path = self.astar(start, goal, edge.a as i32, edge.b as i32);
            if path.is_some() {
                break;
            }
        }

        let path = match path {
            Some(p) => p,
            None => {
                let start = self.entry_point(from, to.center(), 0);
                let goal = self.entry_point(to, from.center(), 0);
                debug!(
                    "search failed for rooms {} -> {}, using fallback path",
                    edge.a, edge.b
                );
                self.fallback_path(start, goal)
            }
        };
        self.paint_path(&path, corridor_width);
    }

    /// Pick the cell where a corridor leaves `room` heading for `target`:
    /// the intersection of the center-to-target ray with the room wall
    /// facing the target. Retry variants slide the exit along the wall.
    fn entry_point(&self, room: &Room, target: (f32, f32), variant: u32) -> (i32, i32) {
        let (cx, cy) = room.center();
        let hw = room.width as f32 / 2.0;
        let hh = room.height as f32 / 2.0;
        let dx = target.0 - cx;
        let dy = target.1 - cy;
        let horizontal = dx.abs() >= dy.abs();

        let (mut ex, mut ey) = if horizontal {
            let t = hw / dx.abs().max(f32::EPSILON);
            (cx + hw.copysign(dx), cy + dy * t)
        } else {
            let t = hh / dy.abs().max(f32::EPSILON);
            (cx + dx * t, cy + hh.copysign(dy))
        };
        if variant > 0 {
            let shift = if variant % 2 == 0 { -0.5 } else { 0.5 };
            if horizontal {
                ey += hh * shift;
            } else {
                ex += hw * shift;
            }
        }

        (
            (ex.round() as i32).clamp(room.x as i32, (room.x + room.width) as i32 - 1),
            (ey.round() as i32).clamp(room.y as i32, (room.y + room.height) as i32 - 1),
        )
    }

    /// 8-directional A* with a shaped cost surface.
    ///
    /// Foreign room interiors are off limits unless the cell is the goal
    /// itself. Step cost combines terrain noise, turn and straight-run
    /// shaping, and a merge discount for existing corridors; the total is
    /// clamped to at least 1 so relaxation always terminates.
    fn astar(
        &mut self,
        start: (i32, i32),
        goal: (i32, i32),
        from_room: i32,
        to_room: i32,
    ) -> Option<Vec<(i32, i32)>> {
        let mut open: MinHeap<(i32, i32)> = MinHeap::with_capacity(256);
        let mut g: HashMap<(i32, i32), i32> = HashMap::new();
        let mut came: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
        let mut arrival_dir: HashMap<(i32, i32), (i32, i32)> = HashMap::new();
        let mut straight: HashMap<(i32, i32), u32> = HashMap::new();

        g.insert(start, 0);
        open.push(start, manhattan(start, goal));

        let mut iterations = 0;
        while let Some(cur) = open.pop() {
            if cur == goal {
                return self.reconstruct(&came, start, goal);
            }
            iterations += 1;
            if iterations > MAX_ASTAR_ITERATIONS {
                break;
            }

            let cur_g = match g.get(&cur) {
                Some(&v) => v,
                None => continue,
            };
            let cur_dir = arrival_dir.get(&cur).copied();
            let cur_run = straight.get(&cur).copied().unwrap_or(0);

            let mut dirs = ALL_DIRS;
            self.rng.shuffle(&mut dirs);

            for (dx, dy) in dirs {
                let next = (cur.0 + dx, cur.1 + dy);
                if !self.grid.in_bounds(next.0, next.1) {
                    continue;
                }

                let rid = self.grid.room_id(next.0, next.1);
                if rid != NO_ROOM && rid != from_room && rid != to_room && next != goal {
                    continue;
                }
                if dx != 0 && dy != 0 && self.cuts_room_corner(cur, dx, dy) {
                    continue;
                }

                let cell = match self.grid.cell(next.0, next.1) {
                    Some(c) => c,
                    None => continue,
                };
                let mut step = if cell.typ == CellType::Room {
                    ROOM_COST
                } else if dx != 0 && dy != 0 {
                    2
                } else {
                    1
                };
                step += self.noise[next.0 as usize][next.1 as usize] * NOISE_FACTOR;

                let dir = (dx, dy);
                let run = match cur_dir {
                    Some(d) if d == dir => cur_run + 1,
                    Some(_) => {
                        step += DIR_CHANGE_BONUS;
                        if self.rng.percent(RANDOM_TURN_CHANCE) {
                            step += RANDOM_TURN_BONUS;
                        }
                        0
                    }
                    None => 0,
                };
                step += straight_run_penalty(run);
                if cell.typ == CellType::Corridor {
                    step += CORRIDOR_BONUS;
                }
                let step = step.max(1);

                let tentative = cur_g + step;
                if g.get(&next).is_none_or(|&best| tentative < best) {
                    g.insert(next, tentative);
                    came.insert(next, cur);
                    arrival_dir.insert(next, dir);
                    straight.insert(next, run);
                    let priority =
                        tentative + manhattan(next, goal) + self.rng.rn2(PRIORITY_JITTER) as i32;
                    open.push(next, priority);
                }
            }
        }

        debug!("search exhausted after {iterations} expansions");
        None
    }

    /// Check whether a diagonal step out of `cur` would clip a room
    /// corner: either orthogonal in-between cell being a room cell, the
    /// searching edge's own rooms included, blocks the move.
    fn cuts_room_corner(&self, cur: (i32, i32), dx: i32, dy: i32) -> bool {
        let is_room = |x: i32, y: i32| {
            self.grid
                .cell(x, y)
                .is_some_and(|c| c.typ == CellType::Room)
        };
        is_room(cur.0 + dx, cur.1) || is_room(cur.0, cur.1 + dy)
    }

    fn reconstruct(
        &self,
        came: &HashMap<(i32, i32), (i32, i32)>,
        start: (i32, i32),
        goal: (i32, i32),
    ) -> Option<Vec<(i32, i32)>> {
        let mut path = vec![goal];
        let mut seen: HashSet<(i32, i32)> = HashSet::new();
        seen.insert(goal);
        let mut cur = goal;
        while cur != start {
            cur = *came.get(&cur)?;
            if path.len() > MAX_PATH_LEN || !seen.insert(cur) {
                warn!("corrupt parent chain while reconstructing path, discarding");
                return None;
            }
            path.push(cur);
        }
        path.reverse();
        Some(path)
    }

    /// Deterministic-shape zigzag walk used when the search fails and for
    /// repair bridges. Always reaches the goal: every chunk moves strictly
    /// toward it.
    fn fallback_path(&mut self, from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
        let mut path = vec![from];
        let mut cur = from;
        let mut horizontal = self.rng.one_in(2);

        while cur != to {
            let rdx = to.0 - cur.0;
            let rdy = to.1 - cur.1;
            if rdx == 0 {
                horizontal = false;
            }
            if rdy == 0 {
                horizontal = true;
            }
            let (sx, sy, remaining) = if horizontal {
                (rdx.signum(), 0, rdx.abs())
            } else {
                (0, rdy.signum(), rdy.abs())
            };
            let steps = (self.rng.rnd(3) as i32).min(remaining);
            for _ in 0..steps {
                cur = (cur.0 + sx, cur.1 + sy);
                path.push(cur);
            }
            if self.rng.percent(70) {
                horizontal = !horizontal;
            }
        }
        path
    }

    /// Paint a path onto the grid at the given corridor width.
    ///
    /// Room cells are never overwritten. Diagonal steps additionally paint
    /// an orthogonal bridging cell so the painted floor stays 4-connected.
    fn paint_path(&mut self, path: &[(i32, i32)], width: usize) {
        let half = (width / 2) as i32;
        let hi = (width as i32 - 1) - half;

        let mut prev: Option<(i32, i32)> = None;
        for &(x, y) in path {
            if let Some((px, py)) = prev {
                let (dx, dy) = (x - px, y - py);
                if dx != 0 && dy != 0 {
                    self.paint_cell(px + dx, py);
                }
            }
            for ox in -half..=hi {
                for oy in -half..=hi {
                    self.paint_cell(x + ox, y + oy);
                }
            }
            prev = Some((x, y));
        }
    }

    fn paint_cell(&mut self, x: i32, y: i32) {
        if let Some(cell) = self.grid.cell(x, y) {
            if cell.typ != CellType::Room {
                self.grid.set(x, y, Cell::corridor());
            }
        }
    }

    /// Remove dangling corridor stubs: a corridor cell with at most one
    /// corridor neighbor and no room neighbor serves nothing. Repeats to a
    /// fixed point. Returns the number of cells removed.
    pub fn prune_dead_ends(&mut self) -> usize {
        let mut removed_total = 0;
        for _ in 0..MAX_PRUNE_SWEEPS {
            let mut doomed: Vec<(i32, i32)> = Vec::new();
            for x in 0..self.grid.width() as i32 {
                for y in 0..self.grid.height() as i32 {
                    if self
                        .grid
                        .cell(x, y)
                        .is_none_or(|c| c.typ != CellType::Corridor)
                    {
                        continue;
                    }
                    let mut corridor_neighbors = 0;
                    let mut room_neighbors = 0;
                    for (dx, dy) in CARDINAL {
                        match self.grid.cell(x + dx, y + dy).map(|c| c.typ) {
                            Some(CellType::Corridor) => corridor_neighbors += 1,
                            Some(CellType::Room) => room_neighbors += 1,
                            _ => {}
                        }
                    }
                    if corridor_neighbors <= 1 && room_neighbors == 0 {
                        doomed.push((x, y));
                    }
                }
            }
            if doomed.is_empty() {
                break;
            }
            removed_total += doomed.len();
            for (x, y) in doomed {
                self.grid.set(x, y, Cell::empty());
            }
        }
        removed_total
    }

    /// Label 4-connected floor components and union rooms sharing one.
    fn audit(&mut self, rooms: &[Room]) -> UnionFind {
        let w = self.grid.width();
        let h = self.grid.height();
        let mut labels = vec![vec![-1i32; h]; w];
        let mut next_label = 0;

        for sx in 0..w as i32 {
            for sy in 0..h as i32 {
                if !self.grid.is_floor(sx, sy) || labels[sx as usize][sy as usize] != -1 {
                    continue;
                }
                let label = next_label;
                next_label += 1;
                let mut stack = vec![(sx, sy)];
                labels[sx as usize][sy as usize] = label;
                while let Some((x, y)) = stack.pop() {
                    for (dx, dy) in CARDINAL {
                        let (nx, ny) = (x + dx, y + dy);
                        if self.grid.is_floor(nx, ny) && labels[nx as usize][ny as usize] == -1 {
                            labels[nx as usize][ny as usize] = label;
                            stack.push((nx, ny));
                        }
                    }
                }
            }
        }

        let mut uf = UnionFind::new(rooms.len());
        let mut first_room_of: Vec<Option<usize>> = vec![None; next_label as usize];
        for (i, room) in rooms.iter().enumerate() {
            let (cx, cy) = clamped_center(room);
            let label = labels[cx as usize][cy as usize];
            debug_assert!(label >= 0, "room center must be floor");
            match first_room_of[label as usize] {
                Some(first) => {
                    uf.union(first, i);
                }
                None => first_room_of[label as usize] = Some(i),
            }
        }
        uf
    }

    /// Guarantee all-pairs room connectivity after carving.
    ///
    /// Bridges each stray component to the largest one with painted
    /// fallback paths, then straight-connects anything still stranded to
    /// room 0 as a last resort.
    fn repair_connectivity(&mut self, rooms: &[Room], corridor_width: usize) {
        if rooms.len() < 2 {
            return;
        }

        let mut uf = self.audit(rooms);
        if uf.set_count() > 1 {
            let components = room_components(&mut uf, rooms.len());
            warn!(
                "{} disconnected room components after carving, bridging",
                components.len()
            );
            let main_idx = components
                .iter()
                .enumerate()
                .max_by_key(|(_, c)| c.len())
                .map(|(i, _)| i)
                .unwrap_or(0);
            let main = components[main_idx].clone();
            let bridge_width = corridor_width.max(2);

            for (ci, comp) in components.iter().enumerate() {
                if ci == main_idx {
                    continue;
                }
                let (a, b) = closest_pair(comp, &main, rooms);
                let path = self.fallback_path(clamped_center(&rooms[a]), clamped_center(&rooms[b]));
                self.paint_path(&path, bridge_width);

                // A second bridge keeps multi-room components connected
                // even if the first one grazes something that later moves.
                if comp.len() >= 2 {
                    let second = comp.iter().copied().find(|&r| r != a).unwrap_or(a);
                    let (_, target) = closest_pair(&[second], &main, rooms);
                    let path = self
                        .fallback_path(clamped_center(&rooms[second]), clamped_center(&rooms[target]));
                    self.paint_path(&path, bridge_width);
                }
            }

            uf = self.audit(rooms);
        }

        // Emergency net: straight x-then-y connect to room 0
        for i in 1..rooms.len() {
            if uf.connected(0, i) {
                continue;
            }
            warn!("room {i} still unreachable, forcing straight connection");
            let (sx, sy) = clamped_center(&rooms[i]);
            let (gx, gy) = clamped_center(&rooms[0]);
            let mut path = vec![(sx, sy)];
            let mut cur = (sx, sy);
            while cur.0 != gx {
                cur.0 += (gx - cur.0).signum();
                path.push(cur);
            }
            while cur.1 != gy {
                cur.1 += (gy - cur.1).signum();
                path.push(cur);
            }
            self.paint_path(&path, 2);
            uf.union(0, i);
        }
    }
}

fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

/// Penalty for a straight run of the given length. Zero within the
/// tolerance, then grows with every step past it, so long straight runs
/// get progressively more expensive instead of paying a flat surcharge.
fn straight_run_penalty(run: u32) -> i32 {
    if run > MAX_STRAIGHT_RUN {
        (run - MAX_STRAIGHT_RUN) as i32 * STRAIGHT_RUN_PENALTY
    } else {
        0
    }
}

/// Room center cell, clamped into the room footprint.
fn clamped_center(room: &Room) -> (i32, i32) {
    let (cx, cy) = room.center_cell();
    (
        cx.clamp(room.x as i32, (room.x + room.width) as i32 - 1),
        cy.clamp(room.y as i32, (room.y + room.height) as i32 - 1),
    )
}

/// Group rooms into connectivity components, in room index order.
fn room_components(uf: &mut UnionFind, n: usize) -> Vec<Vec<usize>> {
    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut roots: Vec<usize> = Vec::new();
    for i in 0..n {
        let root = uf.find(i);
        match roots.iter().position(|&r| r == root) {
            Some(pos) => components[pos].push(i),
            None => {
                roots.push(root);
                components.push(vec![i]);
            }
        }
    }
    components
}

/// Closest room pair across two index sets, by center distance.
fn closest_pair(from: &[usize], to: &[usize], rooms: &[Room]) -> (usize, usize) {
    let mut best = (from[0], to[0]);
    let mut best_d = f32::INFINITY;
    for &a in from {
        for &b in to {
            let d = rooms[a].center_distance(&rooms[b]);
            if d < best_d {
                best_d = d;
                best = (a, b);
            }
        }
    }
    best
}
