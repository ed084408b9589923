//! Visibility: ray casting, line of sight, circles and field of view.
//!
//! Every query is built on a single primitive, an integer Bresenham walk
//! normalized to one octant (steep lines swap axes and swap back on emit).
//! [`cast_ray`] applies map rules to that walk:
//!
//! 1. stop, without emitting, when the next point is out of bounds;
//! 2. emit the point;
//! 3. when cancellable, stop after an opaque point;
//! 4. when `max_dist > 0`, stop once `max_dist` points were emitted.
//!
//! [`fov`] sweeps cancellable rays toward the rim of a circle-ish region
//! and unions what they touch.

use std::collections::BTreeSet;
use std::f32::consts::SQRT_2;
use std::fmt;
use std::str::FromStr;

use lazarus_core::Position2D;

use crate::error::MapError;

/// The bounds and transparency queries visibility needs from a map.
pub trait VisibilityMap {
    fn is_transparent(&self, pos: Position2D) -> bool;
    fn is_out_of_bounds(&self, pos: Position2D) -> bool;
}

/// Field-of-view algorithms known to [`fov`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FovAlgorithm {
    /// Rays toward a circle-approximating rim, with diagonal reach
    /// shortened by up to √2.
    #[default]
    Simple,
}

impl fmt::Display for FovAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
        }
    }
}

impl FromStr for FovAlgorithm {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("simple") {
            Ok(Self::Simple)
        } else {
            Err(MapError::UnsupportedAlgorithm(s.to_owned()))
        }
    }
}

/// Walk the digital line from `origin` to `dest`, calling `visit` on each
/// point until it returns `false` or `dest` has been visited.
fn bresenham(origin: Position2D, dest: Position2D, mut visit: impl FnMut(Position2D) -> bool) {
    let (mut x0, mut y0, mut x1, mut y1) = (origin.x, origin.y, dest.x, dest.y);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }

    let dx = (x1 - x0).abs();
    let dy = (y1 - y0).abs();
    let xstep = if x0 < x1 { 1 } else { -1 };
    let ystep = if y0 < y1 { 1 } else { -1 };

    let mut error = dx / 2;
    let mut y = y0;
    let mut x = x0;
    loop {
        let pos = if steep {
            Position2D::new(y, x)
        } else {
            Position2D::new(x, y)
        };
        if !visit(pos) || x == x1 {
            return;
        }
        error -= dy;
        if error < 0 {
            y += ystep;
            error += dx;
        }
        x += xstep;
    }
}

/// All points of the digital line from `origin` to `dest`, both inclusive.
pub fn line(origin: Position2D, dest: Position2D) -> Vec<Position2D> {
    let mut points = Vec::new();
    bresenham(origin, dest, |pos| {
        points.push(pos);
        true
    });
    points
}

/// Cast a ray from `origin` toward `dest` over `map`.
///
/// `max_dist` counts emitted points, origin included; 0 means unlimited.
pub fn cast_ray<M>(
    origin: Position2D,
    dest: Position2D,
    map: &M,
    max_dist: usize,
    cancellable: bool,
) -> Vec<Position2D>
where
    M: VisibilityMap + ?Sized,
{
    let mut points = Vec::new();
    bresenham(origin, dest, |pos| {
        if map.is_out_of_bounds(pos) {
            return false;
        }
        points.push(pos);
        if cancellable && !map.is_transparent(pos) {
            return false;
        }
        !(max_dist > 0 && points.len() >= max_dist)
    });
    points
}

/// Whether a cancellable ray from `origin` ends exactly on `dest`.
pub fn los<M>(origin: Position2D, dest: Position2D, map: &M) -> bool
where
    M: VisibilityMap + ?Sized,
{
    cast_ray(origin, dest, map, 0, true).last() == Some(&dest)
}

/// Insert the eight mirror images of the offset `(x, y)` around `origin`.
pub fn add_octants(origin: Position2D, x: i32, y: i32, points: &mut BTreeSet<Position2D>) {
    points.extend([
        origin.shift(x, y),
        origin.shift(-x, y),
        origin.shift(x, -y),
        origin.shift(-x, -y),
        origin.shift(y, x),
        origin.shift(-y, x),
        origin.shift(y, -x),
        origin.shift(-y, -x),
    ]);
}

/// Outline of a circle of `radius` around `origin` (midpoint algorithm).
///
/// A radius of zero or less yields just the origin.
pub fn circle2d(origin: Position2D, radius: i32) -> BTreeSet<Position2D> {
    if radius <= 0 {
        return BTreeSet::from([origin]);
    }
    let mut points = BTreeSet::new();
    let (mut x, mut y) = (0, radius);
    let mut d = 3 - 2 * radius;
    add_octants(origin, x, y, &mut points);
    while y >= x {
        x += 1;
        if d > 0 {
            y -= 1;
            d += 4 * (x - y) + 10;
        } else {
            d += 4 * x + 6;
        }
        add_octants(origin, x, y, &mut points);
    }
    points
}

/// Positions visible from `origin` within `range`.
///
/// The origin is always visible. Opaque tiles hit by a ray are visible
/// themselves; nothing past the map edge is.
pub fn fov<M>(
    origin: Position2D,
    range: i32,
    map: &M,
    algorithm: FovAlgorithm,
) -> BTreeSet<Position2D>
where
    M: VisibilityMap + ?Sized,
{
    match algorithm {
        FovAlgorithm::Simple => simple_fov(origin, range, map),
    }
}

fn simple_fov<M>(origin: Position2D, range: i32, map: &M) -> BTreeSet<Position2D>
where
    M: VisibilityMap + ?Sized,
{
    let mut visible = BTreeSet::from([origin]);
    if range <= 0 {
        return visible;
    }

    let mut targets = BTreeSet::new();
    for idx in 0..=range {
        let factor = 1.0 + (SQRT_2 - 1.0) * idx as f32 / range as f32;
        let reach = (range as f32 / factor).ceil() as usize;

        targets.clear();
        add_octants(origin, idx, range, &mut targets);
        for &target in &targets {
            // +1: the origin is the first emitted point
            visible.extend(cast_ray(origin, target, map, reach + 1, true));
        }
    }
    visible
}
