//! Variants of the game, and the different behaviors we need to implement them
//!
//! Both variants share the rules engine. They differ in how placements, moves and positions are
//! written down, and in what happens to a captured piece.

use core::fmt;

use crate::{
    parse_signature, Cell, Color, Endpoint, MoveNotation, NotationError, Piece, Placement,
    RawToken,
};

/// The details handled differently by supported variants
pub trait Variant: Copy + Eq + fmt::Debug {
    /// A short name, used in logs and on the command line
    const NAME: &'static str;

    /// Whether a captured piece joins the bottom of the capturing stack
    ///
    /// If not, the captured piece leaves the board.
    const ABSORBS_CAPTURES: bool;

    /// Parse one placement token
    ///
    /// `side` is the color of the line the token was read from. Variants which spell out the
    /// colors in the token itself ignore it.
    fn parse_placement(token: &str, side: Option<Color>) -> Result<Placement, NotationError>;

    /// Parse a move
    fn parse_move(text: &str) -> Result<MoveNotation, NotationError>;

    /// The output token for the stack of `pieces` (top first) standing on `cell`
    fn describe(cell: Cell, pieces: &[Piece]) -> String;
}

/// Classic draughts: one piece per cell, captured pieces are removed
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Classic;
impl Variant for Classic {
    const NAME: &'static str = "classic";

    const ABSORBS_CAPTURES: bool = false;

    /// `[a-hA-H][1-8]`, where an upper case letter places a crowned piece
    fn parse_placement(token: &str, side: Option<Color>) -> Result<Placement, NotationError> {
        let raw = match RawToken::split(token) {
            Some(raw @ RawToken { codes: None, .. }) => raw,
            _ => return Err(NotationError::Placement(token.to_string())),
        };
        let color = side.ok_or(NotationError::MissingSide)?;
        let piece = if raw.upper {
            Piece::king(color)
        } else {
            Piece::new(color)
        };
        Ok(Placement {
            cell: raw.cell,
            pieces: vec![piece],
        })
    }

    /// `[a-hA-H][1-8]-[a-hA-H][1-8]` or `([a-hA-H][1-8]:)+[a-hA-H][1-8]`
    fn parse_move(text: &str) -> Result<MoveNotation, NotationError> {
        MoveNotation::parse_with(text, |part| match RawToken::split(part)? {
            RawToken {
                cell, codes: None, ..
            } => Some(Endpoint::bare(cell)),
            _ => None,
        })
    }

    /// The cell, with an upper case letter if the piece is crowned
    fn describe(cell: Cell, pieces: &[Piece]) -> String {
        let crowned = pieces.first().is_some_and(|piece| piece.crowned);
        cell.notation(crowned)
    }
}

/// Towers: a cell holds a stack of pieces, and captured pieces are taken prisoner under the
/// capturing stack
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Towers;
impl Variant for Towers {
    const NAME: &'static str = "towers";

    const ABSORBS_CAPTURES: bool = true;

    /// `[a-hA-H][1-8]_[wWbB]+`, listing the pieces from the top down
    ///
    /// The colors come from the token, so `side` is not used.
    fn parse_placement(token: &str, _side: Option<Color>) -> Result<Placement, NotationError> {
        let invalid = || NotationError::Placement(token.to_string());
        let raw = RawToken::split(token).ok_or_else(invalid)?;
        let pieces = raw.codes.and_then(parse_signature).ok_or_else(invalid)?;
        Ok(Placement {
            cell: raw.cell,
            pieces,
        })
    }

    /// Like [`Classic::parse_move`], but each endpoint may be followed by `_[wWbB]+`
    fn parse_move(text: &str) -> Result<MoveNotation, NotationError> {
        MoveNotation::parse_with(text, |part| {
            let raw = RawToken::split(part)?;
            let signature = match raw.codes {
                Some(codes) => Some(parse_signature(codes)?),
                None => None,
            };
            Some(Endpoint {
                cell: raw.cell,
                signature,
            })
        })
    }

    /// The cell followed by the pieces from the top down, as in `b6_Wwbbbb`
    fn describe(cell: Cell, pieces: &[Piece]) -> String {
        let mut description = cell.notation(false);
        description.push('_');
        description.extend(pieces.iter().map(|piece| piece.code()));
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_placement() {
        assert_eq!(
            Classic::parse_placement("c3", Some(Color::White)),
            Ok(Placement {
                cell: Cell::new(3, 3),
                pieces: vec![Piece::new(Color::White)],
            }),
        );
        assert_eq!(
            Classic::parse_placement("E1", Some(Color::Black)),
            Ok(Placement {
                cell: Cell::new(5, 1),
                pieces: vec![Piece::king(Color::Black)],
            }),
        );
        assert_eq!(
            Classic::parse_placement("c3", None),
            Err(NotationError::MissingSide)
        );
        for bad in ["42", "c3_w", "c", "c33", "i1", ""] {
            assert!(
                Classic::parse_placement(bad, Some(Color::White)).is_err(),
                "{bad:?} parsed"
            );
        }
    }

    #[test]
    fn test_towers_placement() {
        let placement = Towers::parse_placement("g5_wbB", None).unwrap();
        assert_eq!(placement.cell, Cell::new(7, 5));
        assert_eq!(
            placement.pieces,
            [
                Piece::new(Color::White),
                Piece::new(Color::Black),
                Piece::king(Color::Black),
            ],
        );
        for bad in ["h8", "42", "a1_", "a1_x", "a1_w_b", "_w"] {
            assert!(Towers::parse_placement(bad, None).is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn test_classic_rejects_signatures() {
        assert!(Classic::parse_move("g3-f4").is_ok());
        assert!(Classic::parse_move("g3_w-f4_w").is_err());
    }

    #[test]
    fn test_towers_move_signatures() {
        let mv = Towers::parse_move("f2_ww:d4_wwb:b6_wwbb").unwrap();
        let MoveNotation::Capture(endpoints) = &mv else {
            panic!("expected a capture, got {mv:?}");
        };
        assert_eq!(endpoints.len(), 3);
        assert_eq!(endpoints[1].cell, Cell::new(4, 4));
        assert_eq!(endpoints[1].signature.as_ref().map(Vec::len), Some(3));
        assert_eq!(mv.to_string(), "f2_ww:d4_wwb:b6_wwbb");
        assert!(Towers::parse_move("g7-f6").is_ok());
        assert!(Towers::parse_move("g7_-f6_b").is_err());
        assert!(Towers::parse_move("g7_bq-f6_b").is_err());
    }

    #[test]
    fn test_describe() {
        let stack = [Piece::king(Color::White), Piece::new(Color::Black)];
        assert_eq!(Classic::describe(Cell::new(8, 8), &stack), "H8");
        assert_eq!(Towers::describe(Cell::new(8, 8), &stack), "h8_Wb");
        assert_eq!(
            Classic::describe(Cell::new(4, 4), &[Piece::new(Color::Black)]),
            "d4"
        );
    }
}
