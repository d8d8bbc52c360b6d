use core::iter;

use board::{Color, Piece};

/// A pile of pieces standing on one cell and moving as one
///
/// The top piece decides everything about how the stack behaves: its color is the stack's color,
/// and the stack moves like a king exactly when the top piece is crowned. The rest of the pile
/// only comes into play once the pieces above it have been captured.
///
/// A stack can't be empty. Taking the last piece away with [`Self::into_top`] consumes the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    top: Piece,
    /// The pieces under the top one, from the top down
    below: Vec<Piece>,
}
impl Stack {
    /// Build a stack from its pieces, listed from the top down
    ///
    /// Returns `None` if there are no pieces.
    pub fn new(pieces: Vec<Piece>) -> Option<Self> {
        let mut pieces = pieces.into_iter();
        let top = pieces.next()?;
        Some(Self {
            top,
            below: pieces.collect(),
        })
    }

    pub const fn top(&self) -> Piece {
        self.top
    }

    pub const fn color(&self) -> Color {
        self.top.color
    }

    pub const fn is_crowned(&self) -> bool {
        self.top.crowned
    }

    /// The number of pieces in the stack
    pub fn len(&self) -> usize {
        self.below.len() + 1
    }

    /// The pieces, from the top down
    pub fn pieces(&self) -> impl Iterator<Item = Piece> + '_ {
        iter::once(self.top).chain(self.below.iter().copied())
    }

    /// Crown the top piece. The pieces under it are left alone.
    pub fn crown(&mut self) {
        self.top.crown();
    }

    /// Put a captured piece at the very bottom of the stack
    pub fn push_bottom(&mut self, prisoner: Piece) {
        self.below.push(prisoner);
    }

    /// Take the top piece off, returning it along with what is left of the stack, if anything
    pub fn into_top(self) -> (Piece, Option<Stack>) {
        (self.top, Stack::new(self.below))
    }

    /// Whether the colors of this stack, from the top down, are those of `signature`
    ///
    /// Crowns are not compared.
    pub fn matches_signature(&self, signature: &[Piece]) -> bool {
        self.len() == signature.len()
            && self
                .pieces()
                .zip(signature)
                .all(|(piece, expected)| piece.color == expected.color)
    }
}
