use std::collections::HashMap;

use sparse_engine::ecs::{Entity, World};
use sparse_macros::Component;

const GRID_WIDTH: usize = 40;
const GRID_HEIGHT: usize = 20;
const GENERATIONS: usize = 30;

#[derive(Component)]
struct Cell;

#[derive(Component, PartialEq, Eq, Hash, Clone, Copy)]
struct Position {
    x: i32,
    y: i32,
}

/// Spawn a live cell at the given position.
fn spawn_cell(world: &mut World, x: i32, y: i32) -> Entity {
    let entity = world.spawn();
    world.add_component(entity, Position { x, y });
    world.add_component(entity, Cell);
    entity
}

/// Apply the Game of Life rules. Births are spawned straight away and deaths are only marked, so
/// every decision this generation reads the same set of cells.
fn update(world: &mut World) {
    let directions = [
        (-1, 1),
        (0, 1),
        (1, 1),
        (-1, 0),
        (1, 0),
        (-1, -1),
        (0, -1),
        (1, -1),
    ];

    // Positions of live cells for neighbour lookup
    let pos_map: HashMap<Position, Entity> = world
        .query::<(Position, Cell)>()
        .into_iter()
        .map(|entity| (*world.get::<Position>(entity), entity))
        .collect();

    let mut births = Vec::new();
    let mut deaths = Vec::new();

    let min_x = pos_map.keys().map(|p| p.x).min().unwrap_or(0);
    let max_x = pos_map.keys().map(|p| p.x).max().unwrap_or(0);
    let min_y = pos_map.keys().map(|p| p.y).min().unwrap_or(0);
    let max_y = pos_map.keys().map(|p| p.y).max().unwrap_or(0);

    for x in (min_x - 1)..=(max_x + 1) {
        for y in (min_y - 1)..=(max_y + 1) {
            let pos = Position { x, y };
            let live_neighbors = directions
                .iter()
                .filter(|(dx, dy)| {
                    pos_map.contains_key(&Position {
                        x: x + dx,
                        y: y + dy,
                    })
                })
                .count();

            match pos_map.get(&pos) {
                Some(entity) if !(2..=3).contains(&live_neighbors) => deaths.push(*entity),
                None if live_neighbors == 3 => births.push(pos),
                _ => {}
            }
        }
    }

    for entity in deaths {
        world.mark_for_deletion(entity);
    }
    for pos in births {
        spawn_cell(world, pos.x, pos.y);
    }
}

fn render(world: &World, generation: usize) {
    let mut grid = vec![vec!['.'; GRID_WIDTH]; GRID_HEIGHT];

    for pos in world.iter::<Position>() {
        if pos.x >= 0 && pos.x < GRID_WIDTH as i32 && pos.y >= 0 && pos.y < GRID_HEIGHT as i32 {
            grid[GRID_HEIGHT - pos.y as usize - 1][pos.x as usize] = '#';
        }
    }

    println!("\nGeneration {generation} ({} live cells):", world.len());
    for row in grid {
        let line: String = row.into_iter().collect();
        println!("{}", line);
    }
}

fn main() {
    println!("=============================================================");
    println!("Game of life!");
    println!("=============================================================");

    let mut world = World::builder()
        .max_entities(GRID_WIDTH * GRID_HEIGHT * 2)
        .register::<(Position, Cell)>()
        .build();

    // Glider
    for (x, y) in [(1, 15), (2, 14), (0, 13), (1, 13), (2, 13)] {
        spawn_cell(&mut world, x, y);
    }
    // Blinker
    for (x, y) in [(20, 5), (20, 6), (20, 7)] {
        spawn_cell(&mut world, x, y);
    }

    for generation in 0..GENERATIONS {
        update(&mut world);
        // Dead cells leave storage before anything is drawn
        world.flush();
        render(&world, generation);
    }
}
