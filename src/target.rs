//! Hidden target placement: orientation, core cell and the cross+tail shape

use rand::Rng;
use rand::rngs::StdRng;

use crate::board::{GameConfig, OwnerBoard, Position};

/// Direction the plane points, away from the tail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Right,
    Up,
    Left,
    Down,
}

/// Offsets of the 4-neighbor cross around the core cell.
const CROSS_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Per-orientation placement data: the valid core-cell rectangle and the
/// three tail offsets. The rectangle is chosen so that core, cross and
/// tail always stay within the grid; placement can therefore never fail.
struct Placement {
    /// Core row drawn from `row_min..height - row_margin`.
    row_min: i32,
    row_margin: i32,
    /// Core column drawn from `col_min..width - col_margin`.
    col_min: i32,
    col_margin: i32,
    /// Tail cells, relative to the core, two cells behind the nose.
    tail: [(i32, i32); 3],
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Right,
        Orientation::Up,
        Orientation::Left,
        Orientation::Down,
    ];

    fn placement(self) -> Placement {
        match self {
            Orientation::Right => Placement {
                row_min: 1,
                row_margin: 1,
                col_min: 2,
                col_margin: 1,
                tail: [(0, -2), (-1, -2), (1, -2)],
            },
            Orientation::Up => Placement {
                row_min: 1,
                row_margin: 2,
                col_min: 1,
                col_margin: 1,
                tail: [(2, 0), (2, 1), (2, -1)],
            },
            Orientation::Left => Placement {
                row_min: 1,
                row_margin: 1,
                col_min: 1,
                col_margin: 2,
                tail: [(0, 2), (-1, 2), (1, 2)],
            },
            Orientation::Down => Placement {
                row_min: 2,
                row_margin: 1,
                col_min: 1,
                col_margin: 1,
                tail: [(-2, 0), (-2, 1), (-2, -1)],
            },
        }
    }
}

/// A placed target: the core cell plus its cross and tail.
#[derive(Debug, Clone)]
pub struct Target {
    pub orientation: Orientation,
    pub core: Position,
    pub cells: Vec<Position>,
}

/// Places a hidden plane-shaped target on the grid.
#[derive(Debug, Clone)]
pub struct TargetGenerator {
    config: GameConfig,
}

impl TargetGenerator {
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Draw an orientation and a core cell uniformly from the valid
    /// rectangle, then mark core, cross and tail.
    pub fn generate(&self, rng: &mut StdRng) -> Target {
        let orientation = Orientation::ALL[rng.random_range(0..Orientation::ALL.len())];
        let placement = orientation.placement();

        let height = self.config.board_height as i32;
        let width = self.config.board_width as i32;
        let core = Position::new(
            rng.random_range(placement.row_min..height - placement.row_margin),
            rng.random_range(placement.col_min..width - placement.col_margin),
        );

        let mut cells = Vec::with_capacity(self.config.plane_size);
        cells.push(core);
        for (dr, dc) in CROSS_OFFSETS {
            cells.push(Position::new(core.row + dr, core.col + dc));
        }
        for (dr, dc) in placement.tail {
            cells.push(Position::new(core.row + dr, core.col + dc));
        }

        Target {
            orientation,
            core,
            cells,
        }
    }
}

impl OwnerBoard {
    /// Ground-truth board with the target's cells covered.
    pub fn with_target(config: &GameConfig, target: &Target) -> Self {
        let mut board = OwnerBoard::new(config);
        for &cell in &target.cells {
            board.cover(cell);
        }
        board
    }
}
