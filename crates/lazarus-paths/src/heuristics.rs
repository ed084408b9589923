use std::f32::consts::SQRT_2;

use lazarus_core::Position2D;

/// A distance estimate between two nodes, used to order the open set.
pub type Heuristic<P> = Box<dyn Fn(P, P) -> f32>;

/// Manhattan (L1) distance between two positions.
#[inline]
pub fn manhattan(a: Position2D, b: Position2D) -> f32 {
    ((a.x - b.x).abs() + (a.y - b.y).abs()) as f32
}

/// Euclidean (L2) distance between two positions.
#[inline]
pub fn euclidean(a: Position2D, b: Position2D) -> f32 {
    let dx = (a.x - b.x) as f32;
    let dy = (a.y - b.y) as f32;
    dx.hypot(dy)
}

/// Chebyshev (L∞) distance between two positions.
#[inline]
pub fn chebyshev(a: Position2D, b: Position2D) -> f32 {
    (a.x - b.x).abs().max((a.y - b.y).abs()) as f32
}

/// Octile distance: diagonal steps cost √2, straight steps cost 1.
#[inline]
pub fn octile(a: Position2D, b: Position2D) -> f32 {
    let dx = (a.x - b.x).abs() as f32;
    let dy = (a.y - b.y).abs() as f32;
    SQRT_2 * dx.min(dy) + (dx - dy).abs()
}
