//! Facility navigation: grid, waypoints, A* search, and free-text route planning
//!
//! The facility map is loaded once at startup and shared read-only across
//! requests.

mod extract;
mod grid;
mod resolver;
mod search;

#[cfg(test)]
mod proptests;

pub use extract::{SpanExtractor, Spans};
pub use grid::{Coord, Grid};
pub use search::find_path;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Built-in floor plan used when no map file is configured
const SAMPLE_GRID: [[u8; 4]; 4] = [[0, 0, 0, 0], [0, 1, 0, 1], [0, 0, 0, 0], [0, 1, 0, 0]];

const SAMPLE_WAYPOINTS: &[(&str, usize, usize)] = &[
    ("main entrance", 0, 0),
    ("cafeteria", 1, 0),
    ("paper recycling", 2, 0),
    ("metal recycling", 3, 0),
    ("information desk", 0, 1),
    ("parking lot", 2, 1),
    ("reception", 0, 2),
    ("loading dock", 1, 2),
    ("plastic recycling", 2, 2),
    ("compost area", 3, 2),
    ("security office", 0, 3),
    ("electronics recycling", 2, 3),
    ("recycling zone", 3, 3),
];

/// Errors loading or validating a facility map
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Failed to read map file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed map file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Grid must be a non-empty rectangular matrix")]
    InvalidGrid,
    #[error("Map has no waypoints")]
    NoWaypoints,
    #[error("Waypoint name must not be empty")]
    EmptyName,
    #[error("Duplicate waypoint name: {0}")]
    DuplicateName(String),
    #[error("Waypoint '{name}' at {coord} is outside the grid")]
    OutOfBounds { name: String, coord: Coord },
    #[error("Waypoint '{name}' at {coord} is on a blocked cell")]
    OnBlockedCell { name: String, coord: Coord },
    #[error("Waypoints '{first}' and '{second}' share cell {coord}")]
    SharedCell {
        first: String,
        second: String,
        coord: Coord,
    },
    #[error("Invalid extraction pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// User-facing navigation outcomes that are not a route
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("❗ Please specify both start and end locations like: 'path from cafeteria to reception'")]
    MissingSpans,
    #[error("❌ Unknown starting location: '{phrase}'. Valid options: {options}")]
    UnknownStart { phrase: String, options: String },
    #[error("❌ Unknown destination: '{phrase}'. Valid options: {options}")]
    UnknownDestination { phrase: String, options: String },
    #[error("🚫 No available path from {start} to {destination} due to obstacles")]
    NoPathFound { start: String, destination: String },
    #[error("I couldn't find the location '{phrase}'. Available locations are: {options}. Please try again.")]
    AwaitingDestinationUnresolved { phrase: String, options: String },
}

/// A named location bound to one grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Waypoint {
    name: String,
    #[serde(skip)]
    key: String,
    coord: Coord,
}

impl Waypoint {
    pub fn new(name: impl Into<String>, coord: Coord) -> Self {
        let name = name.into().trim().to_string();
        let key = name.to_lowercase();
        Self { name, key, coord }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower-cased name used for matching
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }
}

/// On-disk map format
#[derive(Debug, Clone, Deserialize)]
pub struct MapFile {
    pub grid: Vec<Vec<u8>>,
    pub waypoints: Vec<MapWaypoint>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapWaypoint {
    pub name: String,
    pub row: usize,
    pub col: usize,
}

/// A computed route between two waypoints
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub start: String,
    pub destination: String,
    pub path: Vec<Coord>,
}

impl Route {
    /// Number of unit moves
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Immutable facility map plus the phrase extractor
#[derive(Debug, Clone)]
pub struct Facility {
    grid: Grid,
    waypoints: Vec<Waypoint>,
    by_coord: HashMap<Coord, usize>,
    extractor: SpanExtractor,
}

impl Facility {
    /// Validate and build. Waypoint order is kept and used for tie-breaks.
    pub fn new(grid: Grid, waypoints: Vec<Waypoint>) -> Result<Self, MapError> {
        if waypoints.is_empty() {
            return Err(MapError::NoWaypoints);
        }

        let mut by_key: HashMap<&str, usize> = HashMap::new();
        let mut by_coord: HashMap<Coord, usize> = HashMap::new();

        for (idx, wp) in waypoints.iter().enumerate() {
            if wp.key.is_empty() {
                return Err(MapError::EmptyName);
            }
            if by_key.insert(wp.key(), idx).is_some() {
                return Err(MapError::DuplicateName(wp.name.clone()));
            }
            if !grid.in_bounds(wp.coord) {
                return Err(MapError::OutOfBounds {
                    name: wp.name.clone(),
                    coord: wp.coord,
                });
            }
            if grid.is_blocked(wp.coord) {
                return Err(MapError::OnBlockedCell {
                    name: wp.name.clone(),
                    coord: wp.coord,
                });
            }
            if let Some(prev) = by_coord.insert(wp.coord, idx) {
                return Err(MapError::SharedCell {
                    first: waypoints[prev].name.clone(),
                    second: wp.name.clone(),
                    coord: wp.coord,
                });
            }
        }

        Ok(Self {
            grid,
            waypoints,
            by_coord,
            extractor: SpanExtractor::new()?,
        })
    }

    /// The built-in waste-management facility floor plan
    pub fn sample() -> Result<Self, MapError> {
        let matrix: Vec<Vec<u8>> = SAMPLE_GRID.iter().map(|r| r.to_vec()).collect();
        let grid = Grid::from_matrix(&matrix).ok_or(MapError::InvalidGrid)?;
        let waypoints = SAMPLE_WAYPOINTS
            .iter()
            .map(|&(name, row, col)| Waypoint::new(name, Coord::new(row, col)))
            .collect();
        Self::new(grid, waypoints)
    }

    pub fn from_map_file(map: MapFile) -> Result<Self, MapError> {
        let grid = Grid::from_matrix(&map.grid).ok_or(MapError::InvalidGrid)?;
        let waypoints = map
            .waypoints
            .into_iter()
            .map(|w| Waypoint::new(w.name, Coord::new(w.row, w.col)))
            .collect();
        Self::new(grid, waypoints)
    }

    /// Load a JSON map file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let raw = std::fs::read_to_string(path)?;
        let map: MapFile = serde_json::from_str(&raw)?;
        Self::from_map_file(map)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Exact (case-insensitive) lookup by name
    pub fn waypoint(&self, name: &str) -> Option<&Waypoint> {
        let key = name.trim().to_lowercase();
        self.waypoints.iter().find(|w| w.key == key)
    }

    pub fn name_at(&self, coord: Coord) -> Option<&str> {
        self.by_coord
            .get(&coord)
            .map(|&idx| self.waypoints[idx].name())
    }

    /// Fuzzy-resolve a free-text mention
    pub fn resolve(&self, candidate: &str) -> Option<&Waypoint> {
        resolver::resolve(&self.waypoints, candidate)
    }

    pub fn is_path_request(&self, utterance: &str) -> bool {
        self.extractor.is_path_request(utterance)
    }

    pub fn extract(&self, utterance: &str) -> Option<Spans> {
        self.extractor.extract(utterance)
    }

    /// All waypoint names, comma separated, in declaration order
    pub fn valid_options(&self) -> String {
        self.waypoints
            .iter()
            .map(Waypoint::name)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Plan a route from a free-text request like "path from A to B"
    pub fn plan(&self, utterance: &str) -> Result<Route, NavigationError> {
        let spans = self.extract(utterance).ok_or(NavigationError::MissingSpans)?;

        let start = self
            .resolve(&spans.start)
            .ok_or_else(|| NavigationError::UnknownStart {
                phrase: spans.start.clone(),
                options: self.valid_options(),
            })?;
        let destination =
            self.resolve(&spans.destination)
                .ok_or_else(|| NavigationError::UnknownDestination {
                    phrase: spans.destination.clone(),
                    options: self.valid_options(),
                })?;

        self.route(start, destination)
    }

    /// Search between two known waypoints
    pub fn route(&self, start: &Waypoint, destination: &Waypoint) -> Result<Route, NavigationError> {
        let path = find_path(&self.grid, start.coord(), destination.coord()).ok_or_else(|| {
            NavigationError::NoPathFound {
                start: start.name().to_string(),
                destination: destination.name().to_string(),
            }
        })?;

        let route = Route {
            start: start.name().to_string(),
            destination: destination.name().to_string(),
            path,
        };
        tracing::debug!(
            start = %route.start,
            destination = %route.destination,
            steps = route.steps(),
            "Route found"
        );
        Ok(route)
    }

    /// Render a route as the waypoint names it passes through
    pub fn render(&self, route: &Route) -> String {
        let steps: Vec<&str> = route
            .path
            .iter()
            .filter_map(|c| self.name_at(*c))
            .collect();

        if steps.is_empty() {
            let coords: Vec<String> = route.path.iter().map(ToString::to_string).collect();
            format!("🛣️ Direct path: {}", coords.join(" → "))
        } else {
            format!("🗺️ Path:\n{}", steps.join(" → "))
        }
    }
}
