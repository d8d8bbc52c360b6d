use board::Cell;

/// A single hop of a move: from one cell to another, jumping over a victim or not
///
/// A capture chain `c0:c1:c2` is made of the hops `c0 → c1` and `c1 → c2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub from: Cell,
    pub to: Cell,
    pub is_capture: bool,
}
impl Step {
    pub const fn simple(from: Cell, to: Cell) -> Self {
        Self {
            from,
            to,
            is_capture: false,
        }
    }

    pub const fn capture(from: Cell, to: Cell) -> Self {
        Self {
            from,
            to,
            is_capture: true,
        }
    }

    /// Check the shape of this hop for a stack with the given crown state
    ///
    /// This only looks at distances, not at what stands in the way:
    ///  1. An uncrowned stack moves one cell diagonally, in any direction.
    ///  2. An uncrowned stack captures by jumping exactly two cells diagonally.
    ///  3. A crowned stack moves or captures any distance along a diagonal.
    pub const fn legality_check(self, crowned: bool) -> bool {
        let files = self.from.file().abs_diff(self.to.file());
        let ranks = self.from.rank().abs_diff(self.to.rank());
        if crowned {
            files == ranks && files > 0
        } else if self.is_capture {
            files == 2 && ranks == 2
        } else {
            files == 1 && ranks == 1
        }
    }

    /// The cells jumped over on the way, not counting either endpoint
    pub fn path(self) -> impl Iterator<Item = Cell> {
        self.from.squares_between(self.to)
    }

    /// The cell halfway between the endpoints
    ///
    /// For an uncrowned capture that passed [`Self::legality_check`], this is the victim's cell.
    pub const fn midpoint(self) -> Cell {
        Cell::new(
            (self.from.file() + self.to.file()) / 2,
            (self.from.rank() + self.to.rank()) / 2,
        )
    }
}
