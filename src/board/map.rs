//! City graph: identities, native colors, ports, and adjacency.
//!
//! A `Board` is static data shared by every snapshot of a game. It is
//! built once through `BoardBuilder` and never mutated afterwards.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::core::ConfigError;

/// City identifier: an index into a `Board`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CityId(pub u16);

impl CityId {
    /// Create a new city ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "City({})", self.0)
    }
}

/// Undirected connection between two cities, stored low id first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Route {
    pub a: CityId,
    pub b: CityId,
}

impl Route {
    /// Normalized route between two cities.
    #[must_use]
    pub fn new(x: CityId, y: CityId) -> Self {
        if x <= y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }

    /// The endpoint opposite `city`, if `city` is an endpoint.
    #[must_use]
    pub fn other(self, city: CityId) -> Option<CityId> {
        if city == self.a {
            Some(self.b)
        } else if city == self.b {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Static information about one city.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CityInfo {
    pub id: CityId,
    pub name: String,
    pub color: Color,
    pub port: bool,
}

/// The city graph for one variant.
#[derive(Clone, Debug)]
pub struct Board {
    cities: Vec<CityInfo>,
    adjacency: Vec<Vec<CityId>>,
    by_name: FxHashMap<String, CityId>,
    capital: Option<CityId>,
    start: CityId,
}

impl Board {
    /// Number of cities.
    #[must_use]
    pub fn city_count(&self) -> usize {
        self.cities.len()
    }

    /// All city IDs in index order.
    pub fn cities(&self) -> impl Iterator<Item = CityId> + '_ {
        self.cities.iter().map(|c| c.id)
    }

    /// Static info for a city.
    #[must_use]
    pub fn city(&self, id: CityId) -> &CityInfo {
        &self.cities[id.index()]
    }

    /// Look a city up by name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<CityId> {
        self.by_name.get(name).copied()
    }

    /// City name.
    #[must_use]
    pub fn name(&self, id: CityId) -> &str {
        &self.cities[id.index()].name
    }

    /// Native color of a city.
    #[must_use]
    pub fn color(&self, id: CityId) -> Color {
        self.cities[id.index()].color
    }

    /// True if ships may dock at this city.
    #[must_use]
    pub fn is_port(&self, id: CityId) -> bool {
        self.cities[id.index()].port
    }

    /// Cities directly connected to `id`.
    #[must_use]
    pub fn neighbors(&self, id: CityId) -> &[CityId] {
        &self.adjacency[id.index()]
    }

    /// True if `a` and `b` share a connection.
    #[must_use]
    pub fn are_adjacent(&self, a: CityId, b: CityId) -> bool {
        self.adjacency[a.index()].contains(&b)
    }

    /// The city whose sacking loses the game, if the variant has one.
    #[must_use]
    pub fn capital(&self) -> Option<CityId> {
        self.capital
    }

    /// Default starting city for pawns.
    #[must_use]
    pub fn start(&self) -> CityId {
        self.start
    }

    /// Cities whose native color is `color`.
    pub fn cities_of_color(&self, color: Color) -> impl Iterator<Item = CityId> + '_ {
        self.cities.iter().filter(move |c| c.color == color).map(|c| c.id)
    }

    /// True if `id` is a valid city on this board.
    #[must_use]
    pub fn contains(&self, id: CityId) -> bool {
        id.index() < self.cities.len()
    }
}

/// Builder for boards.
///
/// ```
/// use outbreak::board::{BoardBuilder, Color};
///
/// let board = BoardBuilder::new()
///     .city("Alpha", Color::Blue)
///     .port("Beta", Color::Red)
///     .connect("Alpha", "Beta")
///     .build()
///     .unwrap();
///
/// let alpha = board.id("Alpha").unwrap();
/// let beta = board.id("Beta").unwrap();
/// assert!(board.are_adjacent(alpha, beta));
/// assert!(board.is_port(beta));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BoardBuilder {
    cities: Vec<CityInfo>,
    edges: Vec<(String, String)>,
    capital: Option<String>,
    start: Option<String>,
}

impl BoardBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: &str, color: Color, port: bool) -> Self {
        let id = CityId::new(self.cities.len() as u16);
        self.cities.push(CityInfo {
            id,
            name: name.to_string(),
            color,
            port,
        });
        self
    }

    /// Add an inland city.
    pub fn city(self, name: &str, color: Color) -> Self {
        self.push(name, color, false)
    }

    /// Add a port city.
    pub fn port(self, name: &str, color: Color) -> Self {
        self.push(name, color, true)
    }

    /// Connect two cities (both directions).
    pub fn connect(mut self, a: &str, b: &str) -> Self {
        self.edges.push((a.to_string(), b.to_string()));
        self
    }

    /// Mark the capital city.
    pub fn capital(mut self, name: &str) -> Self {
        self.capital = Some(name.to_string());
        self
    }

    /// Set the default starting city (first city otherwise).
    pub fn start(mut self, name: &str) -> Self {
        self.start = Some(name.to_string());
        self
    }

    /// Build the board.
    ///
    /// Fails if there are no cities or a connection, the capital, or the
    /// start names a city that was never added.
    pub fn build(self) -> Result<Board, ConfigError> {
        if self.cities.is_empty() {
            return Err(ConfigError::EmptyBoard);
        }

        let by_name: FxHashMap<String, CityId> = self
            .cities
            .iter()
            .map(|c| (c.name.clone(), c.id))
            .collect();
        let lookup = |name: &str| -> Result<CityId, ConfigError> {
            by_name
                .get(name)
                .copied()
                .ok_or_else(|| ConfigError::UnknownCityName(name.to_string()))
        };

        let mut adjacency = vec![Vec::new(); self.cities.len()];
        for (a, b) in &self.edges {
            let (a, b) = (lookup(a)?, lookup(b)?);
            if !adjacency[a.index()].contains(&b) {
                adjacency[a.index()].push(b);
                adjacency[b.index()].push(a);
            }
        }

        let capital = self.capital.as_deref().map(lookup).transpose()?;
        let start = match self.start.as_deref() {
            Some(name) => lookup(name)?,
            None => CityId::new(0),
        };

        Ok(Board {
            cities: self.cities,
            adjacency,
            by_name,
            capital,
            start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Board {
        BoardBuilder::new()
            .city("A", Color::Blue)
            .city("B", Color::Blue)
            .port("C", Color::Red)
            .connect("A", "B")
            .connect("B", "C")
            .connect("C", "A")
            .connect("A", "B")
            .start("B")
            .build()
            .unwrap()
    }

    #[test]
    fn test_adjacency_is_symmetric_and_deduplicated() {
        let board = triangle();
        let a = board.id("A").unwrap();
        let b = board.id("B").unwrap();

        assert!(board.are_adjacent(a, b));
        assert!(board.are_adjacent(b, a));
        assert_eq!(board.neighbors(a).len(), 2);
    }

    #[test]
    fn test_start_and_capital() {
        let board = triangle();
        assert_eq!(board.start(), board.id("B").unwrap());
        assert_eq!(board.capital(), None);
    }

    #[test]
    fn test_route_normalization() {
        let r1 = Route::new(CityId(4), CityId(1));
        let r2 = Route::new(CityId(1), CityId(4));
        assert_eq!(r1, r2);
        assert_eq!(r1.other(CityId(1)), Some(CityId(4)));
        assert_eq!(r1.other(CityId(2)), None);
    }

    #[test]
    fn test_cities_of_color() {
        let board = triangle();
        assert_eq!(board.cities_of_color(Color::Blue).count(), 2);
        assert_eq!(board.cities_of_color(Color::Black).count(), 0);
    }

    #[test]
    fn test_unknown_city_in_connection() {
        let result = BoardBuilder::new()
            .city("A", Color::Blue)
            .connect("A", "Nowhere")
            .build();
        assert_eq!(
            result.err(),
            Some(ConfigError::UnknownCityName("Nowhere".to_string()))
        );
    }

    #[test]
    fn test_unknown_start_or_capital() {
        let base = BoardBuilder::new().city("A", Color::Blue);
        assert_eq!(
            base.clone().start("B").build().err(),
            Some(ConfigError::UnknownCityName("B".to_string()))
        );
        assert_eq!(
            base.capital("C").build().err(),
            Some(ConfigError::UnknownCityName("C".to_string()))
        );
        assert_eq!(BoardBuilder::new().build().err(), Some(ConfigError::EmptyBoard));
    }
}
