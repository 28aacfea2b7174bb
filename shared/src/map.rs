use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::{Hex, Point};

/// CSS color string, e.g. `"#1a0024"` or `"hsl(270 100% 7%)"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new(css: impl Into<String>) -> Self {
        Self(css.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a glyph in an [`crate::icons::IconRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconId(pub String);

impl IconId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for IconId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Paintable attributes of one cell. Unset color/icon means "unpainted".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_color: Option<Color>,
}

impl TileData {
    pub fn is_unpainted(&self) -> bool {
        self.color.is_none() && self.icon.is_none()
    }

    /// The `(color, icon)` pair flood fill compares against.
    pub fn fill_key(&self) -> (Option<&Color>, Option<&IconId>) {
        (self.color.as_ref(), self.icon.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub hex: Hex,
    #[serde(default)]
    pub data: TileData,
}

impl Tile {
    pub fn blank(hex: Hex) -> Self {
        Self {
            hex,
            data: TileData::default(),
        }
    }

    /// Copy of this tile carrying `data`. Tiles are never edited in place.
    pub fn with_data(&self, data: TileData) -> Self {
        Self {
            hex: self.hex,
            data,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapShape {
    #[default]
    Rectangular,
    Radial,
}

/// Free-form polyline annotation in world coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Path {
    pub id: String,
    #[serde(default)]
    pub points: Vec<Point>,
    pub color: Color,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexMap {
    pub tiles: Vec<Tile>,
    #[serde(default)]
    pub shape: MapShape,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub paths: Vec<Path>,
}

impl HexMap {
    /// `width` columns by `height` rows in a flat-top, even-column-aligned layout.
    pub fn rectangular(width: u32, height: u32) -> Self {
        let mut tiles = Vec::with_capacity(width as usize * height as usize);
        for q in 0..width as i32 {
            let r_offset = q.div_euclid(2);
            for row in 0..height as i32 {
                tiles.push(Tile::blank(Hex::new(q, row - r_offset)));
            }
        }
        Self {
            tiles,
            shape: MapShape::Rectangular,
            width,
            height,
            paths: Vec::new(),
        }
    }

    /// Every hex within `radius` steps of the origin.
    pub fn radial(radius: u32) -> Self {
        let n = radius as i32;
        let mut tiles = Vec::new();
        for q in -n..=n {
            let r_min = (-n).max(-q - n);
            let r_max = n.min(-q + n);
            for r in r_min..=r_max {
                tiles.push(Tile::blank(Hex::new(q, r)));
            }
        }
        let diameter = radius * 2 + 1;
        Self {
            tiles,
            shape: MapShape::Radial,
            width: diameter,
            height: diameter,
            paths: Vec::new(),
        }
    }

    pub fn path(&self, id: &str) -> Option<&Path> {
        self.paths.iter().find(|p| p.id == id)
    }

    /// Adds an empty path. Returns `false` if the id is already taken.
    pub fn start_path(&mut self, id: impl Into<String>, color: Color, stroke_width: f64) -> bool {
        let id = id.into();
        if self.path(&id).is_some() {
            return false;
        }
        self.paths.push(Path {
            id,
            points: Vec::new(),
            color,
            stroke_width,
        });
        true
    }

    pub fn append_path_point(&mut self, id: &str, point: Point) -> bool {
        match self.paths.iter_mut().find(|p| p.id == id) {
            Some(path) => {
                path.points.push(point);
                true
            }
            None => false,
        }
    }

    /// Fingerprint of everything that affects the cached raster layers.
    pub fn content_signature(&self) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&[self.shape as u8]);
        hasher.update(&self.width.to_le_bytes());
        hasher.update(&self.height.to_le_bytes());
        for tile in &self.tiles {
            hasher.update(&tile.hex.q.to_le_bytes());
            hasher.update(&tile.hex.r.to_le_bytes());
            hash_optional(&mut hasher, tile.data.color.as_ref().map(Color::as_str));
            hash_optional(&mut hasher, tile.data.icon.as_ref().map(IconId::as_str));
            hash_optional(&mut hasher, tile.data.icon_color.as_ref().map(Color::as_str));
        }
        hasher.finalize()
    }
}

fn hash_optional(hasher: &mut crc32fast::Hasher, value: Option<&str>) {
    match value {
        Some(s) => {
            hasher.update(&[1]);
            hasher.update(&(s.len() as u32).to_le_bytes());
            hasher.update(s.as_bytes());
        }
        None => hasher.update(&[0]),
    }
}

/// Hex → position lookup over a fixed tile sequence.
#[derive(Debug, Clone, Default)]
pub struct TileIndex {
    positions: HashMap<Hex, usize>,
}

impl TileIndex {
    /// Later duplicates of a hex are ignored; the first occurrence wins.
    pub fn build(tiles: &[Tile]) -> Self {
        let mut positions = HashMap::with_capacity(tiles.len());
        for (idx, tile) in tiles.iter().enumerate() {
            positions.entry(tile.hex).or_insert(idx);
        }
        Self { positions }
    }

    pub fn position(&self, hex: Hex) -> Option<usize> {
        self.positions.get(&hex).copied()
    }

    pub fn contains(&self, hex: Hex) -> bool {
        self.positions.contains_key(&hex)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
