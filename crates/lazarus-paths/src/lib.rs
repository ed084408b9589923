//! Heuristic graph search for grid-based games.
//!
//! The crate separates three concerns:
//!
//! - the **map** answers adjacency and cost queries ([`SearchMap`]),
//! - the **strategy** decides which node to expand next ([`SearchStrategy`]),
//! - the **session** ([`Search`]) owns the bookkeeping and drives the
//!   strategy from `Ready` to `Success` or `Failed`.
//!
//! [`AStar`] is the bundled strategy; [`Search::astar`] builds an A* session
//! over [`Position2D`](lazarus_core::Position2D) guided by [`manhattan`].
//!
//! # Heuristics
//!
//! | Function | Metric |
//! |---|---|
//! | [`manhattan`] | L1 |
//! | [`euclidean`] | L2 |
//! | [`chebyshev`] | L∞ |
//! | [`octile`] | √2 diagonals |

mod astar;
mod error;
mod heuristics;
mod search;
mod traits;

pub use astar::{AStar, AStarSearch};
pub use error::{Result, SearchError};
pub use heuristics::{Heuristic, chebyshev, euclidean, manhattan, octile};
pub use search::{Frontier, Search, SearchState, SearchStrategy};
pub use traits::SearchMap;
