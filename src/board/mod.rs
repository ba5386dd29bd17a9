//! Board: colors, cities, adjacency, and the built-in variant maps.
//!
//! Boards are static data. Everything that changes during play (cubes,
//! stations, legions, railroads) lives in `GameState`.

pub mod color;
pub mod map;
mod maps;

pub use color::{Color, ColorMap, ALL_COLORS};
pub use map::{Board, BoardBuilder, CityId, CityInfo, Route};
