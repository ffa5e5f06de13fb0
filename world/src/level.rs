use glam::Vec3;
use shroom_sniff_core::{Tile, TileId};

/// Lays out `tile_count` tiles on a near-square grid centred on the origin.
///
/// The grid is `ceil(sqrt(n))` tiles wide and fills row by row, so the last
/// row may be partial.
pub(crate) fn generate_tiles(tile_count: u32, tile_size: Vec3) -> Vec<Tile> {
    let count = tile_count.max(1);
    let width = (f64::from(count)).sqrt().ceil() as u32;
    let height = count.div_ceil(width);
    let start_x = -((width / 2) as i64);
    let start_z = -((height / 2) as i64);

    (0..count)
        .map(|index| {
            let x = start_x + i64::from(index % width);
            let z = start_z + i64::from(index / width);
            let center = Vec3::new(x as f32 * tile_size.x, 0.0, z as f32 * tile_size.z);
            Tile::new(TileId::new(index), center, tile_size)
        })
        .collect()
}
