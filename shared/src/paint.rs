use std::collections::{HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::hex::Hex;
use crate::map::{Color, IconId, Tile, TileData, TileIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintMode {
    #[default]
    Brush,
    Bucket,
    Erase,
}

/// What a single-tile stroke writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrokeMode {
    Brush,
    Erase,
}

/// The active paint a brush or fill applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintAttributes {
    pub color: Color,
    #[serde(default)]
    pub icon: Option<IconId>,
    pub icon_color: Color,
}

impl Default for PaintAttributes {
    fn default() -> Self {
        Self {
            color: Color::from("#6b7280"),
            icon: None,
            icon_color: Color::from("#ffffff"),
        }
    }
}

impl PaintAttributes {
    pub fn to_tile_data(&self) -> TileData {
        TileData {
            color: Some(self.color.clone()),
            icon: self.icon.clone(),
            icon_color: Some(self.icon_color.clone()),
        }
    }

    /// Eyedropper: take a sampled tile's attributes as the active paint.
    ///
    /// Unset colors keep the current value; the icon is always replaced so
    /// sampling a bare tile clears the icon brush.
    pub fn absorb(&mut self, sampled: &TileData) {
        if let Some(color) = &sampled.color {
            self.color = color.clone();
        }
        if let Some(icon_color) = &sampled.icon_color {
            self.icon_color = icon_color.clone();
        }
        self.icon = sampled.icon.clone();
    }

    fn fill_key(&self) -> (Option<&Color>, Option<&IconId>) {
        (Some(&self.color), self.icon.as_ref())
    }
}

/// Replacement tile sequence produced by a paint operation.
#[derive(Debug, Clone, PartialEq)]
pub struct GridUpdate {
    pub tiles: Vec<Tile>,
    /// Number of tiles whose data was replaced.
    pub changed: usize,
}

/// Paint or erase one tile.
///
/// A hex outside the grid yields an update with `changed == 0` and the tiles
/// as they were.
pub fn paint_tile(
    tiles: &[Tile],
    index: &TileIndex,
    hex: Hex,
    mode: StrokeMode,
    paint: &PaintAttributes,
) -> GridUpdate {
    let mut next = tiles.to_vec();
    let Some(pos) = index.position(hex) else {
        debug!(%hex, "paint outside grid ignored");
        return GridUpdate {
            tiles: next,
            changed: 0,
        };
    };

    let data = match mode {
        StrokeMode::Brush => paint.to_tile_data(),
        StrokeMode::Erase => TileData::default(),
    };
    next[pos] = tiles[pos].with_data(data);
    debug!(%hex, ?mode, "tile painted");
    GridUpdate {
        tiles: next,
        changed: 1,
    }
}

/// Hexes of the 6-connected region sharing `start`'s `(color, icon)` pair.
///
/// Only hexes present in `index` are visited.
pub fn fill_region(tiles: &[Tile], index: &TileIndex, start: Hex) -> Vec<Hex> {
    let Some(start_pos) = index.position(start) else {
        return Vec::new();
    };
    let target = tiles[start_pos].data.fill_key();

    let mut region = vec![start];
    let mut visited: HashSet<Hex> = HashSet::from([start]);
    let mut queue: VecDeque<Hex> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        for neighbor in current.neighbors() {
            if !visited.insert(neighbor) {
                continue;
            }
            let Some(pos) = index.position(neighbor) else {
                continue;
            };
            if tiles[pos].data.fill_key() == target {
                region.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }

    region
}

/// Flood fill from `start`, applied as one update.
///
/// Returns `None` when `start` is not on the grid or already carries the
/// target color and icon.
pub fn bucket_fill(
    tiles: &[Tile],
    index: &TileIndex,
    start: Hex,
    paint: &PaintAttributes,
) -> Option<GridUpdate> {
    let start_pos = index.position(start)?;
    if tiles[start_pos].data.fill_key() == paint.fill_key() {
        return None;
    }

    let region = fill_region(tiles, index, start);
    let data = paint.to_tile_data();
    let mut next = tiles.to_vec();
    for hex in &region {
        if let Some(pos) = index.position(*hex) {
            next[pos] = tiles[pos].with_data(data.clone());
        }
    }

    debug!(%start, region = region.len(), "bucket fill applied");
    Some(GridUpdate {
        tiles: next,
        changed: region.len(),
    })
}

/// Current attributes of `hex`, if it is on the grid.
pub fn sample(tiles: &[Tile], index: &TileIndex, hex: Hex) -> Option<TileData> {
    index.position(hex).map(|pos| tiles[pos].data.clone())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::map::HexMap;

    fn seven_black() -> Vec<Tile> {
        let mut map = HexMap::radial(1);
        for tile in &mut map.tiles {
            tile.data.color = Some(Color::from("#000"));
        }
        map.tiles
    }

    fn white() -> PaintAttributes {
        PaintAttributes {
            color: Color::from("#fff"),
            icon: None,
            icon_color: Color::from("#fff"),
        }
    }

    fn colored(tiles: &[Tile], css: &str) -> usize {
        tiles
            .iter()
            .filter(|t| t.data.color.as_ref().map(Color::as_str) == Some(css))
            .count()
    }

    #[test]
    fn bucket_fill_paints_whole_seven_hex_grid_in_one_update() {
        let tiles = seven_black();
        let index = TileIndex::build(&tiles);
        let update = bucket_fill(&tiles, &index, Hex::ORIGIN, &white()).expect("fill applies");
        assert_eq!(update.changed, 7);
        assert_eq!(colored(&update.tiles, "#fff"), 7);
    }

    #[test]
    fn brush_paints_only_the_target_tile() {
        let tiles = seven_black();
        let index = TileIndex::build(&tiles);
        let update = paint_tile(&tiles, &index, Hex::ORIGIN, StrokeMode::Brush, &white());
        assert_eq!(update.changed, 1);
        assert_eq!(colored(&update.tiles, "#fff"), 1);
        assert_eq!(colored(&update.tiles, "#000"), 6);
        let center = update
            .tiles
            .iter()
            .find(|t| t.hex == Hex::ORIGIN)
            .expect("center tile");
        assert_eq!(center.data.icon_color, Some(Color::from("#fff")));
    }

    #[test]
    fn second_fill_with_same_paint_is_noop() {
        let tiles = seven_black();
        let index = TileIndex::build(&tiles);
        let first = bucket_fill(&tiles, &index, Hex::ORIGIN, &white()).expect("fill applies");
        assert!(bucket_fill(&first.tiles, &index, Hex::ORIGIN, &white()).is_none());
    }

    #[test]
    fn fill_stops_at_different_attributes() {
        let mut map = HexMap::radial(3);
        // A ring of red at distance 1 walls off the center.
        for tile in &mut map.tiles {
            if tile.hex.distance(Hex::ORIGIN) == 1 {
                tile.data.color = Some(Color::from("red"));
            }
        }
        let index = TileIndex::build(&map.tiles);

        let region: HashSet<Hex> = fill_region(&map.tiles, &index, Hex::ORIGIN)
            .into_iter()
            .collect();
        assert_eq!(region, HashSet::from([Hex::ORIGIN]));

        let outer: HashSet<Hex> = fill_region(&map.tiles, &index, Hex::new(3, 0))
            .into_iter()
            .collect();
        let expected: HashSet<Hex> = map
            .tiles
            .iter()
            .filter(|t| t.hex.distance(Hex::ORIGIN) >= 2)
            .map(|t| t.hex)
            .collect();
        assert_eq!(outer, expected);
    }

    #[test]
    fn fill_distinguishes_icons_with_same_color() {
        let mut tiles = seven_black();
        tiles[0].data.icon = Some(IconId::from("Tent"));
        let index = TileIndex::build(&tiles);
        let tent_hex = tiles[0].hex;
        let region = fill_region(&tiles, &index, tent_hex);
        assert_eq!(region, vec![tent_hex]);
    }

    #[test]
    fn fill_does_not_leave_the_grid() {
        let tiles: Vec<Tile> = [Hex::new(0, 0), Hex::new(1, 0), Hex::new(3, 0)]
            .into_iter()
            .map(Tile::blank)
            .collect();
        let index = TileIndex::build(&tiles);
        let update = bucket_fill(&tiles, &index, Hex::ORIGIN, &white()).expect("fill applies");
        assert_eq!(update.changed, 2);
        assert_eq!(update.tiles.len(), 3);
        assert!(update.tiles[2].data.is_unpainted());
    }

    #[test]
    fn paint_outside_grid_leaves_tiles_unchanged() {
        let tiles = seven_black();
        let index = TileIndex::build(&tiles);
        let far = Hex::new(40, 40);
        let update = paint_tile(&tiles, &index, far, StrokeMode::Brush, &white());
        assert_eq!(update.changed, 0);
        assert_eq!(update.tiles, tiles);
        assert!(bucket_fill(&tiles, &index, far, &white()).is_none());
    }

    #[test]
    fn erase_clears_all_attributes() {
        let mut tiles = seven_black();
        tiles[2].data.icon = Some(IconId::from("Skull"));
        tiles[2].data.icon_color = Some(Color::from("#f00"));
        let index = TileIndex::build(&tiles);
        let hex = tiles[2].hex;

        let update = paint_tile(&tiles, &index, hex, StrokeMode::Erase, &white());
        let data = sample(&update.tiles, &index, hex).expect("tile exists");
        assert_eq!(data, TileData::default());
    }

    #[test]
    fn absorb_keeps_unset_colors() {
        let mut paint = white();
        paint.icon = Some(IconId::from("Home"));
        paint.absorb(&TileData::default());
        assert_eq!(paint.color, Color::from("#fff"));
        assert_eq!(paint.icon, None);

        paint.absorb(&TileData {
            color: Some(Color::from("#123")),
            icon: Some(IconId::from("Waves")),
            icon_color: Some(Color::from("#456")),
        });
        assert_eq!(paint.color, Color::from("#123"));
        assert_eq!(paint.icon, Some(IconId::from("Waves")));
        assert_eq!(paint.icon_color, Color::from("#456"));
    }
}
