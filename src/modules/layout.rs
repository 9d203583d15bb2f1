//! Board layout: peg pyramid, exit slots and ground.

use macroquad::prelude::Vec2;

use crate::modules::config::GameConfig;
use crate::modules::error::ConfigError;

/// Static round obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Peg {
    /// Row letter + 1-based column, e.g. "C4"
    pub id: String,
    pub pos: Vec2,
    pub radius: f32,
    pub restitution: f32,
}

/// Static scoring slot under the pyramid
#[derive(Debug, Clone, PartialEq)]
pub struct ExitBox {
    pub index: usize,
    /// Center
    pub pos: Vec2,
    /// Full width and height
    pub size: Vec2,
    pub multiplier: f64,
}

/// Static floor that catches balls missing every slot
#[derive(Debug, Clone, PartialEq)]
pub struct Ground {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Static side rail running along one slope of the pyramid, from above the
/// top row down to the exit row. Keeps balls from bouncing off the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Rail {
    pub from: Vec2,
    pub to: Vec2,
    pub thickness: f32,
}

impl Rail {
    pub fn center(&self) -> Vec2 {
        (self.from + self.to) / 2.0
    }

    pub fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    /// Angle of the rail against the x axis, radians
    pub fn angle(&self) -> f32 {
        let d = self.to - self.from;
        d.y.atan2(d.x)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardLayout {
    pub pegs: Vec<Peg>,
    pub exits: Vec<ExitBox>,
    /// Left rail first
    pub rails: Vec<Rail>,
    pub ground: Ground,
    /// Where new balls appear
    pub spawn: Vec2,
}

/// Row label: A..Z, then AA, AB, ...
pub fn row_label(row: usize) -> String {
    let mut n = row + 1;
    let mut label = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// `count` pegs centered on `center_x` at height `y`
pub fn peg_row(
    row: usize,
    count: usize,
    spacing: f32,
    center_x: f32,
    y: f32,
    radius: f32,
    restitution: f32,
) -> Vec<Peg> {
    let start_x = center_x - (count as f32 - 1.0) * spacing / 2.0;
    let letter = row_label(row);
    (0..count)
        .map(|i| Peg {
            id: format!("{letter}{}", i + 1),
            pos: Vec2::new(start_x + i as f32 * spacing, y),
            radius,
            restitution,
        })
        .collect()
}

/// Build the whole board. Fails if the multiplier table does not fit it.
pub fn build_layout(config: &GameConfig) -> Result<BoardLayout, ConfigError> {
    let board = &config.board;
    board.validate()?;

    let rows = board.rows as usize;
    let mut pegs = Vec::with_capacity((0..rows).map(|r| 3 + r).sum());
    for row in 0..rows {
        let y = board.start_y + row as f32 * board.row_spacing;
        pegs.extend(peg_row(
            row,
            3 + row,
            board.peg_spacing,
            board.center_x,
            y,
            board.peg_radius,
            board.peg_restitution,
        ));
    }

    // Bottom row has rows + 2 pegs, so rows + 1 gaps; one slot per gap
    let exit_y = board.start_y + (rows as f32 - 1.0) * board.row_spacing + board.exit_offset_y;
    let half = rows as f32 / 2.0;
    let exits = board
        .multipliers
        .iter()
        .enumerate()
        .map(|(index, &multiplier)| ExitBox {
            index,
            pos: Vec2::new(board.center_x + (index as f32 - half) * board.peg_spacing, exit_y),
            size: Vec2::new(board.exit_width, board.exit_height),
            multiplier,
        })
        .collect();

    // Row r's outermost peg sits (1 + r/2) spacings off center; the rails
    // follow that slope `rail_gap` further out, starting one row above the top
    let edge = |r: f32| (1.0 + r / 2.0) * board.peg_spacing + board.rail_gap;
    let row_at = |y: f32| (y - board.start_y) / board.row_spacing;
    let top_y = board.start_y - board.row_spacing;
    let (top, bottom) = (edge(row_at(top_y)), edge(row_at(exit_y)));
    let rails = [-1.0, 1.0]
        .into_iter()
        .map(|side: f32| Rail {
            from: Vec2::new(board.center_x + side * top, top_y),
            to: Vec2::new(board.center_x + side * bottom, exit_y),
            thickness: board.rail_thickness,
        })
        .collect();

    let ground = Ground {
        pos: Vec2::new(config.world_width / 2.0, config.ground_y()),
        size: Vec2::new(config.world_width, board.ground_height),
    };

    Ok(BoardLayout {
        pegs,
        exits,
        rails,
        ground,
        spawn: Vec2::new(board.center_x, config.ball.spawn_y),
    })
}
