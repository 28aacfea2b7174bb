use std::fmt;

use serde::{Deserialize, Serialize};

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial neighbor offsets, starting east-ish and walking counter-clockwise.
const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// A single cell in axial `(q, r)` coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

impl Hex {
    pub const ORIGIN: Hex = Hex { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implicit third cube coordinate (`q + r + s == 0`).
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Cube distance in steps.
    pub fn distance(&self, other: Hex) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    pub fn neighbors(&self) -> [Hex; 6] {
        DIRECTIONS.map(|(dq, dr)| Hex::new(self.q + dq, self.r + dr))
    }
}

impl fmt::Display for Hex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

/// A point in world or screen space, depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    pub fn midpoint(&self, other: Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Pixel center of `hex` in a flat-top layout. `size` is the center-to-corner radius.
pub fn hex_to_pixel(hex: Hex, size: f64) -> Point {
    let q = hex.q as f64;
    let r = hex.r as f64;
    Point::new(size * 1.5 * q, size * SQRT_3 * (r + q / 2.0))
}

/// Nearest hex to a pixel position. Never fails for finite input.
pub fn pixel_to_hex(point: Point, size: f64) -> Hex {
    let q = (2.0 / 3.0 * point.x) / size;
    let r = (-1.0 / 3.0 * point.x + SQRT_3 / 3.0 * point.y) / size;
    cube_round(q, r)
}

/// Rounds fractional axial coordinates to the containing hex.
///
/// The component with the largest rounding error is recomputed from the other
/// two so the `q + r + s == 0` constraint holds.
pub fn cube_round(frac_q: f64, frac_r: f64) -> Hex {
    let frac_s = -frac_q - frac_r;
    let mut q = frac_q.round();
    let mut r = frac_r.round();
    let s = frac_s.round();

    let dq = (q - frac_q).abs();
    let dr = (r - frac_r).abs();
    let ds = (s - frac_s).abs();

    if dq > dr && dq > ds {
        q = -r - s;
    } else if dr > ds {
        r = -q - s;
    }

    // NaN/inf saturate to i32 bounds via `as`, which keeps this total.
    Hex::new(q as i32, r as i32)
}

/// Corner `i` (taken mod 6) of the hex centered at `center`, at `60° * i`.
pub fn hex_corner(center: Point, size: f64, i: usize) -> Point {
    let angle = (60.0 * (i % 6) as f64).to_radians();
    Point::new(center.x + size * angle.cos(), center.y + size * angle.sin())
}

/// All six corners in rotational order, ready to be used as a closed polygon.
pub fn hex_polygon(hex: Hex, size: f64) -> [Point; 6] {
    let center = hex_to_pixel(hex, size);
    std::array::from_fn(|i| hex_corner(center, size, i))
}

pub fn neighbors(hex: Hex) -> [Hex; 6] {
    hex.neighbors()
}
