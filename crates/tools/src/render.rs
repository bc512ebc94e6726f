use delve_core::{FloorState, Pos, Tile};

/// Plain-text view of a floor, one character per tile.
///
/// Later layers win: terrain, then shop, exit, treasure, enemies and spawn.
pub fn render_ascii(floor: &FloorState) -> String {
    let width = floor.width();
    let mut cells: Vec<Vec<char>> = floor
        .grid
        .rows()
        .map(|row| {
            row.iter()
                .map(|tile| match tile {
                    Tile::Floor => '.',
                    Tile::WallSolid => '#',
                    Tile::WallBreakable => '%',
                })
                .collect()
        })
        .collect();

    let mut mark = |pos: Pos, glyph: char| {
        if pos.x < 0 || pos.y < 0 {
            return;
        }
        let cell = cells.get_mut(pos.y as usize).and_then(|row| row.get_mut(pos.x as usize));
        if let Some(cell) = cell {
            *cell = glyph;
        }
    };

    let shop = floor.shop;
    for y in shop.y..=shop.bottom() {
        for x in shop.x..=shop.right() {
            mark(Pos::new(x, y), 'M');
        }
    }
    if let Some(exit) = floor.exit {
        for y in exit.y..=exit.bottom() {
            for x in exit.x..=exit.right() {
                mark(Pos::new(x, y), 'X');
            }
        }
    }
    for treasure in &floor.treasures {
        mark(treasure.tile(), '$');
    }
    for enemy in &floor.enemies {
        mark(enemy.tile(), 'e');
    }
    mark(floor.spawn, '@');

    let mut out = String::with_capacity((width + 1) * floor.height());
    for row in cells {
        out.extend(row);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::mapgen::BreakableWalls;
    use delve_core::{Enemy, EnemyKind, TileGrid, TileRect, Treasure};

    #[test]
    fn layers_overwrite_terrain_in_order() {
        let mut grid = TileGrid::filled(8, 6, Tile::Floor).expect("valid size");
        grid.set(Pos::new(0, 0), Tile::WallSolid);
        grid.set(Pos::new(7, 0), Tile::WallBreakable);
        let floor = FloorState {
            grid,
            spawn: Pos::new(1, 1),
            shop: TileRect::new(0, 4, 2, 1),
            treasures: vec![Treasure::at_tile(Pos::new(3, 1), 0)],
            enemies: vec![Enemy::new(Pos::new(4, 1).center(), EnemyKind::Spitter)],
            exit: Some(TileRect::new(6, 4, 2, 2)),
            target_gold: 200,
            breakable_walls: BreakableWalls::new(),
        };

        let text = render_ascii(&floor);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "#......%");
        assert_eq!(lines[1], ".@.$e...");
        assert_eq!(lines[4], "MM....XX");
        assert_eq!(lines[5], "......XX");
    }
}
