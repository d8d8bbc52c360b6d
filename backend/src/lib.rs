use core::{fmt, marker::PhantomData};
use std::io::{self, BufRead};

use board::{Color, Variant};
use log::{debug, info};
use stacks::{Game, GameConfig};

/// Why a game file could not be played through
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Game(#[from] stacks::Error),
    #[error("failed to read the game: {0}")]
    Io(#[from] io::Error),
    #[error("missing the placement line for {0:?}")]
    MissingPlacement(Color),
}
impl BackendError {
    /// The one line reported for this error
    ///
    /// Only a few rule violations are reported by name: a stack on a cell no piece may stand on,
    /// a stack moving onto another, and a missed capture. Every other broken rule is a
    /// `general error`, and anything that isn't about the rules at all is reported as
    /// `something goes wrong`.
    pub fn verdict(&self) -> String {
        match self {
            Self::Game(e) if e.is_invalid_cell() => e.to_string(),
            Self::Game(e @ (stacks::Error::BusyCell | stacks::Error::NeedAttack)) => e.to_string(),
            Self::Game(stacks::Error::Internal(_)) => "something goes wrong".to_string(),
            Self::Game(_) => "general error".to_string(),
            Self::Io(_) | Self::MissingPlacement(_) => "something goes wrong".to_string(),
        }
    }
}

/// The surviving stacks of each side, once every move has been made
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub white: Vec<String>,
    pub black: Vec<String>,
}
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.white.join(" "))?;
        write!(f, "{}", self.black.join(" "))
    }
}

/// Plays a game written down as text, in the variant `V`
///
/// The text holds the white placement tokens on the first line, the black ones on the second,
/// and then the moves, separated by whitespace, on as many lines as needed.
#[derive(Clone, Copy, Debug)]
pub struct Backend<V: Variant> {
    config: GameConfig,
    variant: PhantomData<V>,
}

impl<V: Variant> Backend<V> {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            variant: PhantomData,
        }
    }

    /// Set up the board and make every move, stopping at the first error
    pub fn run(&self, reader: impl BufRead) -> Result<Outcome, BackendError> {
        let mut lines = reader.lines();
        let mut game: Game<V> = Game::with_config(self.config);
        for side in Color::COLORS {
            let line = lines.next().ok_or(BackendError::MissingPlacement(side))??;
            game.place_units(line.split_whitespace(), Some(side))?;
        }
        info!("{}: placed {} stacks", V::NAME, game.len());

        let mut made = 0;
        for line in lines {
            let line = line?;
            for mv in line.split_whitespace() {
                game.apply_move(mv)?;
                made += 1;
            }
        }
        debug!("{}: made {made} moves", V::NAME);

        Ok(Outcome {
            white: game.positions_of(Color::White),
            black: game.positions_of(Color::Black),
        })
    }
}

impl<V: Variant> Default for Backend<V> {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use board::{Classic, Towers};

    fn run<V: Variant>(input: &str) -> Result<Outcome, BackendError> {
        Backend::<V>::default().run(input.as_bytes())
    }

    #[test]
    fn test_classic_game() {
        let input = "a1 c1 e1 g1 b2 d2 f2 h2 a3 c3 e3 g3\n\
                     b6 d6 f6 h6 a7 c7 e7 g7 b8 d8 f8 h8\n\
                     g3-f4 f6-e5\n\
                     c3-d4 e5:c3\n\
                     \n\
                     b2:d4 d6-c5\n\
                     d2-c3 g7-f6\n\
                     h2-g3 h8-g7\n\
                     c1-b2 f6-g5\n\
                     g3-h4 g7-f6\n\
                     f4-e5 f8-g7\n";
        let outcome = run::<Classic>(input).unwrap();
        assert_eq!(
            outcome.to_string(),
            "a1 a3 b2 c3 d4 e1 e3 e5 f2 g1 h4\na7 b6 b8 c5 c7 d8 e7 f6 g5 g7 h6",
        );
    }

    #[test]
    fn test_towers_game() {
        let input = "a7_wbb b2_ww c1_w e1_w f2_w g1_w\n\
                     b4_bwww b8_b c3_b c7_b e5_bww e7_b f8_b g5_b g7_b h8_b\n\
                     b2_ww:d4_wwb:f6_wwbb:d8_wwbbb:b6_wwbbbb b4_bwww-a3_bwww\n";
        let outcome = run::<Towers>(input).unwrap();
        assert_eq!(
            outcome,
            Outcome {
                white: ["a7_wbb", "b6_Wwbbbb", "c1_w", "e1_w", "e5_ww", "f2_w", "g1_w"]
                    .map(String::from)
                    .to_vec(),
                black: ["a3_bwww", "b8_b", "f8_b", "g5_b", "g7_b", "h8_b"]
                    .map(String::from)
                    .to_vec(),
            },
        );
    }

    #[test]
    fn test_empty_side() {
        let outcome = run::<Classic>("C3\nd4 f6 e3 E1\nC3:E5:G7 e3-d4\nG7:C3 E1:A5\n").unwrap();
        assert_eq!(outcome.to_string(), "\nA5");
    }

    #[test]
    fn test_verdicts() {
        let verdict = |input: &str| run::<Classic>(input).unwrap_err().verdict();
        assert_eq!(verdict("g7 H8\nb2 A1\ng7-h8\n"), "busy cell");
        assert_eq!(verdict("h1\n\n"), "white cell");
        assert_eq!(verdict("B2\nG7\nB2-C3\n"), "invalid move");
        assert_eq!(verdict("a1 b2\n\na1:c3\n"), "general error");
        assert_eq!(verdict("42\n\n"), "general error");
        assert_eq!(verdict("b2\ng7\nb2-d4\n"), "general error");
        assert_eq!(verdict("a1\n"), "something goes wrong");
        assert_eq!(verdict(""), "something goes wrong");
    }

    #[test]
    fn test_cell_errors_are_named() {
        for e in [stacks::Error::WhiteCell, stacks::Error::NotOnBoard] {
            assert_eq!(BackendError::Game(e.clone()).verdict(), e.to_string());
        }
        assert_eq!(
            BackendError::Game(stacks::Error::EmptyCell).verdict(),
            "general error"
        );
    }

    #[test]
    fn test_missing_placement_names_the_side() {
        assert!(matches!(
            run::<Towers>("a1_w\n"),
            Err(BackendError::MissingPlacement(Color::Black))
        ));
    }
}
