use core::{fmt, iter, str::FromStr};
use std::error;

pub mod variants;

pub use crate::variants::{Classic, Towers, Variant};

/// The number of files (and ranks) on the board
pub const BOARD_SIZE: i8 = 8;

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}
impl Color {
    /// Both colors, white first
    pub const COLORS: [Color; 2] = [Color::White, Color::Black];

    /// The rank on which a piece of this color gets crowned
    pub const fn promotion_rank(self) -> i8 {
        match self {
            Color::White => BOARD_SIZE,
            Color::Black => 1,
        }
    }
}

/// A single checker
///
/// Pieces never know where they are: a piece always stands wherever the stack holding it stands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub color: Color,
    /// Whether this piece has been crowned (and so moves any distance along a diagonal)
    pub crowned: bool,
}
impl Piece {
    /// An uncrowned piece of the given color
    pub const fn new(color: Color) -> Self {
        Self {
            color,
            crowned: false,
        }
    }

    /// A crowned piece of the given color
    pub const fn king(color: Color) -> Self {
        Self {
            color,
            crowned: true,
        }
    }

    /// Crown this piece. There is no way back.
    pub fn crown(&mut self) {
        self.crowned = true;
    }

    /// The letter used for this piece in a tower description
    ///
    /// ```
    /// # use board::{Color, Piece};
    /// assert_eq!(Piece::new(Color::White).code(), 'w');
    /// assert_eq!(Piece::king(Color::Black).code(), 'B');
    /// ```
    pub const fn code(self) -> char {
        match (self.color, self.crowned) {
            (Color::White, false) => 'w',
            (Color::White, true) => 'W',
            (Color::Black, false) => 'b',
            (Color::Black, true) => 'B',
        }
    }

    /// Parse the letter produced by [`Self::code`]
    pub const fn from_code(code: char) -> Option<Self> {
        match code {
            'w' => Some(Self::new(Color::White)),
            'W' => Some(Self::king(Color::White)),
            'b' => Some(Self::new(Color::Black)),
            'B' => Some(Self::king(Color::Black)),
            _ => None,
        }
    }
}

/// Why a cell can't hold a piece
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidCell {
    #[error("white cell")]
    WhiteCell,
    #[error("not on board")]
    NotOnBoard,
}

/// A cell on the board
///
/// Files and ranks both count from 1, so `a1` is `(1, 1)` and `h8` is `(8, 8)`. A cell may lie
/// outside the board: stepping off the edge is allowed, and callers check [`Self::in_bounds`]
/// or [`Self::is_playable`] on the result.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    file: i8,
    rank: i8,
}
impl Cell {
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    pub const fn file(self) -> i8 {
        self.file
    }

    pub const fn rank(self) -> i8 {
        self.rank
    }

    /// Whether this is one of the dark cells, which are the only ones pieces stand on
    ///
    /// ```
    /// # use board::Cell;
    /// assert!(Cell::new(1, 1).is_dark());
    /// assert!(!Cell::new(8, 1).is_dark());
    /// ```
    pub const fn is_dark(self) -> bool {
        self.file.rem_euclid(2) == self.rank.rem_euclid(2)
    }

    pub const fn in_bounds(self) -> bool {
        1 <= self.file && self.file <= BOARD_SIZE && 1 <= self.rank && self.rank <= BOARD_SIZE
    }

    /// Whether a piece may stand here
    pub const fn is_playable(self) -> bool {
        self.is_dark() && self.in_bounds()
    }

    /// Returns the cell if a piece may stand on it
    ///
    /// The color of the cell is checked before the bounds, so a light cell off the board reports
    /// [`InvalidCell::WhiteCell`].
    pub const fn validate(self) -> Result<Self, InvalidCell> {
        if !self.is_dark() {
            Err(InvalidCell::WhiteCell)
        } else if !self.in_bounds() {
            Err(InvalidCell::NotOnBoard)
        } else {
            Ok(self)
        }
    }

    /// Take one step in the given direction, without checking whether we're still on the board
    ///
    /// ```
    /// # use board::{Cell, Direction};
    /// assert_eq!(Cell::new(3, 3).translate(Direction::UP_LEFT), Cell::new(2, 4));
    /// assert!(!Cell::new(1, 1).translate(Direction::DOWN_LEFT).in_bounds());
    /// ```
    pub const fn translate(self, direction: Direction) -> Self {
        Self {
            file: self.file + direction.file,
            rank: self.rank + direction.rank,
        }
    }

    /// The cells strictly between `self` and `to`
    ///
    /// This is empty if the two cells don't share a diagonal.
    ///
    /// ```
    /// # use board::Cell;
    /// let between: Vec<_> = Cell::new(1, 1).squares_between(Cell::new(4, 4)).collect();
    /// assert_eq!(between, [Cell::new(2, 2), Cell::new(3, 3)]);
    /// assert_eq!(Cell::new(1, 1).squares_between(Cell::new(1, 3)).count(), 0);
    /// ```
    pub fn squares_between(self, to: Cell) -> impl Iterator<Item = Cell> {
        let direction = Direction::towards(self, to);
        iter::successors(direction.map(|d| self.translate(d)), move |cell| {
            direction.map(|d| cell.translate(d))
        })
        .take_while(move |cell| *cell != to)
    }

    /// An iterator over all the cells a piece may stand on
    ///
    /// ```
    /// assert_eq!(board::Cell::all_playable().count(), 32);
    /// ```
    pub fn all_playable() -> impl Iterator<Item = Self> {
        (1..=BOARD_SIZE)
            .flat_map(|rank| (1..=BOARD_SIZE).map(move |file| Cell::new(file, rank)))
            .filter(|cell| cell.is_playable())
    }

    /// The file letter of this cell, or `None` if the file is off the board
    pub const fn file_letter(self) -> Option<char> {
        if 1 <= self.file && self.file <= BOARD_SIZE {
            Some((b'a' + (self.file - 1) as u8) as char)
        } else {
            None
        }
    }

    /// Writes the name of this cell, with the file letter in upper case if `upper` is set
    ///
    /// Cells off the board are written as `"XX"`.
    pub fn notation(self, upper: bool) -> String {
        match (self.in_bounds(), self.file_letter()) {
            (true, Some(letter)) => {
                let letter = if upper {
                    letter.to_ascii_uppercase()
                } else {
                    letter
                };
                format!("{letter}{}", self.rank)
            }
            _ => "XX".to_string(),
        }
    }
}
impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("file", &self.file)
            .field("rank", &self.rank)
            .field("readable", &self.notation(false))
            .finish()
    }
}
impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation(false))
    }
}
#[derive(Debug)]
pub struct CellFromStrErr;
impl fmt::Display for CellFromStrErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cell name was invalid")
    }
}
impl error::Error for CellFromStrErr {}
/// Parses `[a-hA-H][1-8]`
///
/// The case of the letter is not kept; the notation layer reads it off the token itself.
impl FromStr for Cell {
    type Err = CellFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let &[letter, digit] = s.as_bytes() else {
            return Err(CellFromStrErr);
        };
        let file = match letter.to_ascii_lowercase() {
            letter @ b'a'..=b'h' => (letter - b'a' + 1) as i8,
            _ => return Err(CellFromStrErr),
        };
        let rank = match digit {
            digit @ b'1'..=b'8' => (digit - b'0') as i8,
            _ => return Err(CellFromStrErr),
        };
        Ok(Self::new(file, rank))
    }
}

/// One diagonal step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Direction {
    file: i8,
    rank: i8,
}
impl Direction {
    pub const UP_LEFT: Self = Self { file: -1, rank: 1 };
    pub const UP_RIGHT: Self = Self { file: 1, rank: 1 };
    pub const DOWN_LEFT: Self = Self { file: -1, rank: -1 };
    pub const DOWN_RIGHT: Self = Self { file: 1, rank: -1 };

    /// All four diagonal directions
    pub const DIAGONALS: [Self; 4] = [
        Self::UP_LEFT,
        Self::UP_RIGHT,
        Self::DOWN_LEFT,
        Self::DOWN_RIGHT,
    ];

    /// The step leading from `from` towards `to`, if they are distinct cells on one diagonal
    pub const fn towards(from: Cell, to: Cell) -> Option<Self> {
        let file = to.file - from.file;
        let rank = to.rank - from.rank;
        if file != 0 && file.abs() == rank.abs() {
            Some(Self {
                file: file.signum(),
                rank: rank.signum(),
            })
        } else {
            None
        }
    }
}

/// A problem with the text describing a placement or a move
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("invalid placement token {0:?}")]
    Placement(String),
    #[error("invalid move {0:?}")]
    Move(String),
    #[error("placement token needs a side in this variant")]
    MissingSide,
}

/// Read the pieces from a tower description such as `wwB`, top first
///
/// Returns `None` if the description is empty or contains anything but `w`, `W`, `b`, `B`.
pub fn parse_signature(codes: &str) -> Option<Vec<Piece>> {
    if codes.is_empty() {
        return None;
    }
    codes.chars().map(Piece::from_code).collect()
}

/// A token split into its parts: `<cell>` or `<cell>_<codes>`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawToken<'a> {
    pub cell: Cell,
    /// Whether the file letter was written in upper case
    pub upper: bool,
    /// Everything after the underscore, if there was one
    pub codes: Option<&'a str>,
}
impl<'a> RawToken<'a> {
    /// Split a token, checking that the cell part is `[a-hA-H][1-8]`
    pub fn split(token: &'a str) -> Option<Self> {
        let (position, codes) = match token.split_once('_') {
            Some((position, codes)) => (position, Some(codes)),
            None => (token, None),
        };
        let cell = position.parse().ok()?;
        let upper = position.starts_with(|c: char| c.is_ascii_uppercase());
        Some(Self { cell, upper, codes })
    }
}

/// A piece's stopping point in a move
///
/// In the towers variant, an endpoint may carry the colors of the moving tower as it is when it
/// stands there (`d4_wwb`). That is a description only: the board keeps its own record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    pub cell: Cell,
    pub signature: Option<Vec<Piece>>,
}
impl Endpoint {
    /// An endpoint without a tower description
    pub const fn bare(cell: Cell) -> Self {
        Self {
            cell,
            signature: None,
        }
    }
}
impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cell)?;
        if let Some(signature) = &self.signature {
            f.write_str("_")?;
            for piece in signature {
                write!(f, "{}", piece.code())?;
            }
        }
        Ok(())
    }
}

/// A parsed move
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MoveNotation {
    /// `<from>-<to>`: one step with no capture
    Simple { from: Endpoint, to: Endpoint },
    /// `<c0>:<c1>:...:<cn>`: `n` captures in a row by the same mover
    ///
    /// Always holds at least two endpoints.
    Capture(Vec<Endpoint>),
}
impl MoveNotation {
    /// Parse a move, reading each endpoint with `endpoint`
    ///
    /// The kind of move is picked purely by whether the text holds `-` or `:`; holding both (or
    /// neither) is an error, as is any endpoint `endpoint` rejects.
    pub fn parse_with(
        text: &str,
        endpoint: impl Fn(&str) -> Option<Endpoint>,
    ) -> Result<Self, NotationError> {
        let invalid = || NotationError::Move(text.to_string());
        match (text.contains('-'), text.contains(':')) {
            (true, false) => {
                let (from, to) = text.split_once('-').ok_or_else(invalid)?;
                Ok(Self::Simple {
                    from: endpoint(from).ok_or_else(invalid)?,
                    to: endpoint(to).ok_or_else(invalid)?,
                })
            }
            (false, true) => text
                .split(':')
                .map(|part| endpoint(part).ok_or_else(invalid))
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Capture),
            _ => Err(invalid()),
        }
    }

    pub const fn is_capture(&self) -> bool {
        matches!(self, Self::Capture(_))
    }
}
impl fmt::Display for MoveNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple { from, to } => write!(f, "{from}-{to}"),
            Self::Capture(endpoints) => {
                for (idx, endpoint) in endpoints.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{endpoint}")?;
                }
                Ok(())
            }
        }
    }
}

/// A parsed placement token: one stack and where it goes
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub cell: Cell,
    /// The pieces of the stack, top first. Never empty.
    pub pieces: Vec<Piece>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use quickcheck::{quickcheck, Arbitrary, Gen};

    impl Arbitrary for Cell {
        fn arbitrary(g: &mut Gen) -> Self {
            // Wander a little past the edges so off-board cells show up too
            Self::new(
                *g.choose(&[-1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap(),
                *g.choose(&[-1, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]).unwrap(),
            )
        }
    }

    macro_rules! test_all_cells {
        ($(
            $name:ident($cell:pat) $body:block
        )*) => {$(
            #[test]
            fn $name() {
                for file in -2..=BOARD_SIZE + 2 {
                    for rank in -2..=BOARD_SIZE + 2 {
                        let $cell = Cell::new(file, rank);
                        $body
                    }
                }
            }
        )*};
    }

    test_all_cells!(
        test_playable_is_dark_and_in_bounds(cell) {
            assert_eq!(cell.is_playable(), cell.is_dark() && cell.in_bounds());
        }
        test_validate_agrees_with_playable(cell) {
            assert_eq!(cell.validate().is_ok(), cell.is_playable(), "{cell:?}");
        }
        test_light_cells_report_white_first(cell) {
            if !cell.is_dark() {
                assert_eq!(cell.validate(), Err(InvalidCell::WhiteCell));
            }
        }
    );

    quickcheck! {
        fn test_translate_round_trip(cell: Cell) -> bool {
            cell.translate(Direction::UP_RIGHT).translate(Direction::DOWN_LEFT) == cell
                && cell.translate(Direction::UP_LEFT).translate(Direction::DOWN_RIGHT) == cell
        }

        fn test_diagonal_steps_keep_color(cell: Cell) -> bool {
            Direction::DIAGONALS
                .iter()
                .all(|&d| cell.translate(d).is_dark() == cell.is_dark())
        }

        fn test_squares_between_are_strictly_inside(from: Cell, to: Cell) -> bool {
            let between: Vec<_> = from.squares_between(to).collect();
            match Direction::towards(from, to) {
                Some(_) => between.len() as i8 == (to.file() - from.file()).abs() - 1,
                None => between.is_empty(),
            }
        }
    }

    #[test]
    fn test_cell_name_round_trip() {
        for cell in Cell::all_playable() {
            assert_eq!(cell, cell.to_string().parse::<Cell>().unwrap());
        }
    }

    #[test]
    fn test_cell_parse_ignores_case() {
        assert_eq!("C3".parse::<Cell>().unwrap(), Cell::new(3, 3));
        assert_eq!("h8".parse::<Cell>().unwrap(), Cell::new(8, 8));
    }

    #[test]
    fn test_cell_parse_rejects_garbage() {
        for bad in ["", "a", "a9", "i1", "a0", "42", "a1 ", "aa1", "é1"] {
            assert!(bad.parse::<Cell>().is_err(), "{bad:?} parsed");
        }
    }

    #[test]
    fn test_raw_token_split() {
        let token = RawToken::split("E1_wB").unwrap();
        assert_eq!(token.cell, Cell::new(5, 1));
        assert!(token.upper);
        assert_eq!(token.codes, Some("wB"));
        assert_eq!(RawToken::split("c3").unwrap().codes, None);
        assert!(RawToken::split("c3x_w").is_none());
    }

    #[test]
    fn test_signature_parsing() {
        assert_eq!(
            parse_signature("wB"),
            Some(vec![Piece::new(Color::White), Piece::king(Color::Black)]),
        );
        assert_eq!(parse_signature(""), None);
        assert_eq!(parse_signature("wx"), None);
    }

    #[test]
    fn test_move_display_round_trip() {
        let endpoint = |s: &str| RawToken::split(s).map(|t| Endpoint::bare(t.cell));
        for text in ["g3-f4", "e5:c3", "c3:e5:g7"] {
            let mv = MoveNotation::parse_with(text, endpoint).unwrap();
            assert_eq!(mv.to_string(), text);
        }
    }

    #[test]
    fn test_move_kind_from_separator() {
        let endpoint = |s: &str| RawToken::split(s).map(|t| Endpoint::bare(t.cell));
        assert!(!MoveNotation::parse_with("a1-b2", endpoint).unwrap().is_capture());
        assert!(MoveNotation::parse_with("a1:c3", endpoint).unwrap().is_capture());
        for bad in ["a1", "a1-b2-c3", "a1-b2:c3", "a1:", ":a1", "", "a1--b2"] {
            assert!(
                MoveNotation::parse_with(bad, endpoint).is_err(),
                "{bad:?} parsed"
            );
        }
    }

    #[test]
    fn test_promotion_ranks() {
        assert_eq!(Color::White.promotion_rank(), BOARD_SIZE);
        assert_eq!(Color::Black.promotion_rank(), 1);
    }
}
