//! Property-based tests for path search and location resolution

use super::grid::{Coord, Grid};
use super::resolver::resolve;
use super::search::find_path;
use super::Waypoint;
use proptest::prelude::*;
use std::collections::VecDeque;

// ============================================================================
// Reference implementation
// ============================================================================

/// Exhaustive breadth-first shortest distance, in moves
fn bfs_distance(grid: &Grid, start: Coord, goal: Coord) -> Option<usize> {
    if grid.is_blocked(start) || grid.is_blocked(goal) {
        return None;
    }
    let mut dist = vec![vec![None; grid.cols()]; grid.rows()];
    dist[start.row][start.col] = Some(0usize);
    let mut queue = VecDeque::from([start]);

    while let Some(cur) = queue.pop_front() {
        let d = dist[cur.row][cur.col]?;
        if cur == goal {
            return Some(d);
        }
        for next in grid.neighbors(cur) {
            if !grid.is_blocked(next) && dist[next.row][next.col].is_none() {
                dist[next.row][next.col] = Some(d + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Random grid with roughly 30% blocked cells, plus two in-bounds coordinates
fn arb_grid_and_endpoints() -> impl Strategy<Value = (Grid, Coord, Coord)> {
    (1usize..9, 1usize..9).prop_flat_map(|(rows, cols)| {
        (
            proptest::collection::vec(
                proptest::collection::vec(prop_oneof![7 => Just(0u8), 3 => Just(1u8)], cols),
                rows,
            ),
            (0..rows, 0..cols),
            (0..rows, 0..cols),
        )
            .prop_map(|(mut matrix, start, goal)| {
                // endpoints are always open, as the waypoint table guarantees
                matrix[start.0][start.1] = 0;
                matrix[goal.0][goal.1] = 0;
                let grid = Grid::from_matrix(&matrix).unwrap();
                (grid, Coord::from(start), Coord::from(goal))
            })
    })
}

fn arb_word() -> impl Strategy<Value = String> {
    "[a-z]{3,8}"
}

fn arb_waypoints() -> impl Strategy<Value = Vec<Waypoint>> {
    proptest::collection::vec(proptest::collection::vec(arb_word(), 1..3), 1..8).prop_map(
        |names| {
            let mut seen = std::collections::HashSet::new();
            names
                .into_iter()
                .map(|words| words.join(" "))
                .filter(|n| seen.insert(n.clone()))
                .enumerate()
                .map(|(i, n)| Waypoint::new(n, Coord::new(0, i)))
                .collect()
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // A* path length equals the BFS shortest distance
    #[test]
    fn prop_astar_is_optimal((grid, start, goal) in arb_grid_and_endpoints()) {
        let path = find_path(&grid, start, goal);
        let expected = bfs_distance(&grid, start, goal);
        prop_assert_eq!(path.map(|p| p.len() - 1), expected);
    }

    // Paths never cross walls and only take 4-directional unit steps
    #[test]
    fn prop_astar_is_sound((grid, start, goal) in arb_grid_and_endpoints()) {
        if let Some(path) = find_path(&grid, start, goal) {
            prop_assert_eq!(path.first().copied(), Some(start));
            prop_assert_eq!(path.last().copied(), Some(goal));
            for c in &path {
                prop_assert!(!grid.is_blocked(*c), "path crosses blocked cell {}", c);
            }
            for pair in path.windows(2) {
                prop_assert!(pair[0].is_adjacent(pair[1]), "{} -> {} is not a unit step", pair[0], pair[1]);
            }
        }
    }

    // A wall splitting the grid always yields None, never a panic
    #[test]
    fn prop_partitioned_grid_has_no_path(rows in 1usize..8, left in 1usize..4, right in 1usize..4) {
        let cols = left + 1 + right;
        let matrix: Vec<Vec<u8>> = (0..rows)
            .map(|_| (0..cols).map(|c| u8::from(c == left)).collect())
            .collect();
        let grid = Grid::from_matrix(&matrix).unwrap();
        prop_assert!(find_path(&grid, Coord::new(0, 0), Coord::new(rows - 1, cols - 1)).is_none());
    }

    // Exact (case-insensitive) names always resolve to themselves
    #[test]
    fn prop_resolver_exact_name_wins(waypoints in arb_waypoints(), pick in any::<prop::sample::Index>()) {
        let target = &waypoints[pick.index(waypoints.len())];
        let resolved = resolve(&waypoints, &target.name().to_uppercase());
        prop_assert_eq!(resolved.map(Waypoint::name), Some(target.name()));
    }

    // Candidates sharing nothing with any waypoint word do not resolve
    #[test]
    fn prop_resolver_rejects_unrelated(waypoints in arb_waypoints(), candidate in "[0-9]{1,6}( [0-9]{1,6})?") {
        prop_assert!(resolve(&waypoints, &candidate).is_none());
    }
}
