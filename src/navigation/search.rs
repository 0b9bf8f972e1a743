//! A* shortest-path search over the occupancy grid
//!
//! Unit step cost, 4-directional moves, Manhattan heuristic. The heuristic is
//! consistent on this cost model, so the first time the goal is popped its
//! path is optimal.

use super::grid::{Coord, Grid};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Frontier entry. Ordered by `(f, seq)` so equal priorities pop FIFO.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Frontier {
    f: usize,
    seq: u64,
    g: usize,
    coord: Coord,
    parent: Option<Coord>,
}

/// Find a cost-optimal path from `start` to `goal`.
///
/// Returns `None` when the goal is unreachable. A path always starts with
/// `start` and ends with `goal`; when they are equal it has one element.
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Option<Vec<Coord>> {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut closed: HashSet<Coord> = HashSet::new();
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut seq = 0u64;

    open.push(Reverse(Frontier {
        f: start.manhattan(goal),
        seq,
        g: 0,
        coord: start,
        parent: None,
    }));

    while let Some(Reverse(node)) = open.pop() {
        if !closed.insert(node.coord) {
            continue;
        }
        if let Some(parent) = node.parent {
            came_from.insert(node.coord, parent);
        }

        if node.coord == goal {
            return Some(reconstruct(&came_from, goal));
        }

        for next in grid.neighbors(node.coord) {
            if grid.is_blocked(next) || closed.contains(&next) {
                continue;
            }
            seq += 1;
            let g = node.g + 1;
            open.push(Reverse(Frontier {
                f: g + next.manhattan(goal),
                seq,
                g,
                coord: next,
                parent: Some(node.coord),
            }));
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Coord, Coord>, goal: Coord) -> Vec<Coord> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
