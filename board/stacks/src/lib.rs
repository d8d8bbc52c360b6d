//! The rules of draughts, for single pieces and for towers
//!
//! A [`Game`] holds every stack on the board. Placements and moves come in as text, are checked
//! against the rules one hop at a time, and the first broken rule is reported as an [`Error`].

use core::marker::PhantomData;
use std::collections::HashMap;

use board::{Cell, Color, Direction, Endpoint, InvalidCell, MoveNotation, NotationError, Variant};
use log::{debug, trace};

mod stack;
mod step;

pub use crate::stack::Stack;
pub use crate::step::Step;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Why a placement or a move was rejected
///
/// The messages are the ones reported to players.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("incorrect input")]
    IncorrectInput(#[from] NotationError),
    #[error("white cell")]
    WhiteCell,
    #[error("not on board")]
    NotOnBoard,
    #[error("empty cell")]
    EmptyCell,
    #[error("busy cell")]
    BusyCell,
    #[error("invalid move")]
    NeedAttack,
    #[error("incorrect move")]
    IncorrectMove,
    #[error("kill friend")]
    KillFriend,
    #[error("internal error: {0}")]
    Internal(&'static str),
}
impl Error {
    /// Whether this error is about a cell no piece may stand on
    pub const fn is_invalid_cell(&self) -> bool {
        matches!(self, Self::WhiteCell | Self::NotOnBoard)
    }
}
impl From<InvalidCell> for Error {
    fn from(value: InvalidCell) -> Self {
        match value {
            InvalidCell::WhiteCell => Self::WhiteCell,
            InvalidCell::NotOnBoard => Self::NotOnBoard,
        }
    }
}

/// Rule options where players disagree on what should happen
///
/// The default follows the traditional referee: every hop of a capture counts as soon as it is
/// made, and tower descriptions on move endpoints are not checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameConfig {
    /// If a hop of a capture chain is illegal, also take back the hops before it
    pub atomic_captures: bool,
    /// Reject moves whose endpoint descriptions (`d4_wwb`) don't match the moving tower
    ///
    /// Only the colors are compared, since a tower crowned partway through a chain is often
    /// still written in lower case.
    pub strict_signatures: bool,
}

/// What lies in one direction from a stack, as far as capturing goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackStatus {
    /// Nothing decided yet: the cell looked at is empty
    Unknown,
    /// An enemy stack with an empty playable cell behind it
    PossibleAttack,
    /// Blocked by a friend, by a second stack, or by the edge of the board
    ImpossibleAttack,
}

/// A game in progress, in the variant `V`
#[derive(Clone, Debug)]
pub struct Game<V: Variant> {
    /// Every stack on the board, by the cell it stands on
    stacks: HashMap<Cell, Stack>,
    config: GameConfig,
    variant: PhantomData<V>,
}

impl<V: Variant> Game<V> {
    /// An empty board with the default rules
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// An empty board with the given rule options
    pub fn with_config(config: GameConfig) -> Self {
        Self {
            stacks: HashMap::new(),
            config,
            variant: PhantomData,
        }
    }

    /// Set up a board from the placement tokens of each side
    pub fn from_position<'a>(
        white: impl IntoIterator<Item = &'a str>,
        black: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let mut game = Self::new();
        game.place_units(white, Some(Color::White))?;
        game.place_units(black, Some(Color::Black))?;
        Ok(game)
    }

    /// The number of stacks on the board
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// The stack standing on `cell`, if any
    pub fn stack_at(&self, cell: Cell) -> Option<&Stack> {
        self.stacks.get(&cell)
    }

    /// Every stack on the board, in no particular order
    pub fn stacks(&self) -> impl Iterator<Item = (Cell, &Stack)> {
        self.stacks.iter().map(|(cell, stack)| (*cell, stack))
    }

    /// Put stacks on the board
    ///
    /// `side` is the color of the line the tokens came from (see [`Variant::parse_placement`]).
    /// Tokens are placed in order; a bad token stops the placement without being placed, but
    /// the tokens before it stay on the board. Placing onto a cell that already holds a stack
    /// fails with [`Error::BusyCell`] rather than replacing it.
    pub fn place_units<'a>(
        &mut self,
        tokens: impl IntoIterator<Item = &'a str>,
        side: Option<Color>,
    ) -> Result<()> {
        for token in tokens {
            self.place_unit(token, side)?;
        }
        Ok(())
    }

    fn place_unit(&mut self, token: &str, side: Option<Color>) -> Result<()> {
        let placement = V::parse_placement(token, side)?;
        let cell = placement.cell.validate()?;
        if self.stacks.contains_key(&cell) {
            return Err(Error::BusyCell);
        }
        let stack = Stack::new(placement.pieces).ok_or(Error::Internal("placement without pieces"))?;
        trace!("{}: placed {token} on {cell}", V::NAME);
        self.stacks.insert(cell, stack);
        Ok(())
    }

    /// Parse and make a move
    pub fn apply_move(&mut self, text: &str) -> Result<()> {
        let mv = V::parse_move(text)?;
        self.make_move(&mv)
    }

    /// Make the given moves in order, stopping at the first one which fails
    pub fn apply_moves<'a>(&mut self, moves: impl IntoIterator<Item = &'a str>) -> Result<()> {
        for mv in moves {
            self.apply_move(mv)?;
        }
        Ok(())
    }

    /// Make the given move
    ///
    /// Returns `Err(..)` with the first rule the move breaks. A capture chain is checked hop by
    /// hop, so unless [`GameConfig::atomic_captures`] is set the hops before a bad one stay made.
    pub fn make_move(&mut self, mv: &MoveNotation) -> Result<()> {
        let result = match mv {
            MoveNotation::Simple { from, to } => self.make_simple_move(from, to),
            MoveNotation::Capture(endpoints) if self.config.atomic_captures => {
                let before = self.stacks.clone();
                let result = self.make_capture_chain(endpoints);
                if result.is_err() {
                    self.stacks = before;
                }
                result
            }
            MoveNotation::Capture(endpoints) => self.make_capture_chain(endpoints),
        };
        let kind = if mv.is_capture() { "capture" } else { "move" };
        match &result {
            Ok(()) => debug!("{}: made {kind} {mv}", V::NAME),
            Err(e) => debug!("{}: rejected {kind} {mv}: {e}", V::NAME),
        }
        result
    }

    fn make_simple_move(&mut self, from: &Endpoint, to: &Endpoint) -> Result<()> {
        let color = self.check_occupied(from.cell)?.color();
        self.check_vacant(to.cell)?;
        if self.needs_to_capture(color) {
            return Err(Error::NeedAttack);
        }
        // A simple move never changes which pieces make up the stack
        self.check_signature(from, from.cell)?;
        self.check_signature(to, from.cell)?;
        self.hop(Step::simple(from.cell, to.cell))
    }

    fn make_capture_chain(&mut self, endpoints: &[Endpoint]) -> Result<()> {
        if endpoints.len() < 2 {
            return Err(Error::Internal("capture chain with fewer than two cells"));
        }
        for (idx, pair) in endpoints.windows(2).enumerate() {
            let [from, to] = pair else {
                return Err(Error::Internal("capture chain window of wrong size"));
            };
            self.check_occupied(from.cell)?;
            self.check_vacant(to.cell)?;
            if idx == 0 {
                self.check_signature(from, from.cell)?;
            }
            self.hop(Step::capture(from.cell, to.cell))?;
            self.check_signature(to, to.cell)?;
        }
        Ok(())
    }

    /// Move the stack for one hop, capturing and crowning as needed
    ///
    /// The caller has already checked that `step.from` holds a stack and `step.to` is a free
    /// playable cell.
    fn hop(&mut self, step: Step) -> Result<()> {
        let (color, crowned) = match self.stacks.get(&step.from) {
            Some(stack) => (stack.color(), stack.is_crowned()),
            None => return Err(Error::EmptyCell),
        };
        if !step.legality_check(crowned) {
            return Err(Error::IncorrectMove);
        }
        let victim = if step.is_capture {
            Some(self.find_victim(color, crowned, step)?)
        } else if step.path().any(|cell| self.stacks.contains_key(&cell)) {
            return Err(Error::IncorrectMove);
        } else {
            None
        };

        let mut stack = self
            .stacks
            .remove(&step.from)
            .ok_or(Error::Internal("moving stack disappeared"))?;
        if let Some(victim_cell) = victim {
            self.take_prisoner(&mut stack, victim_cell)?;
        }
        if !stack.is_crowned() && step.to.rank() == color.promotion_rank() {
            debug!("{}: crowned the {color:?} stack on {}", V::NAME, step.to);
            stack.crown();
        }
        self.stacks.insert(step.to, stack);
        Ok(())
    }

    /// Find the cell of the stack captured by `step`
    ///
    /// An uncrowned attacker captures the stack it jumps over. A crowned attacker may fly over
    /// any number of empty cells, but exactly one enemy stack and no friendly one.
    fn find_victim(&self, color: Color, crowned: bool, step: Step) -> Result<Cell> {
        if !crowned {
            let victim = step.midpoint();
            return match self.stacks.get(&victim) {
                None => Err(Error::IncorrectMove),
                Some(stack) if stack.color() == color => Err(Error::KillFriend),
                Some(_) => Ok(victim),
            };
        }
        let mut victim = None;
        let mut victims = 0;
        for cell in step.path() {
            match self.stacks.get(&cell) {
                None => {}
                Some(stack) if stack.color() == color => return Err(Error::KillFriend),
                Some(_) => {
                    victims += 1;
                    victim = Some(cell);
                }
            }
        }
        match victim {
            Some(cell) if victims == 1 => Ok(cell),
            _ => Err(Error::IncorrectMove),
        }
    }

    /// Take the top piece of the stack on `victim_cell`
    ///
    /// Depending on the variant, the piece joins the bottom of `attacker` or leaves the board.
    /// Whatever remains of the victim stays where it was, under the color of its new top piece.
    fn take_prisoner(&mut self, attacker: &mut Stack, victim_cell: Cell) -> Result<()> {
        let victim = self
            .stacks
            .remove(&victim_cell)
            .ok_or(Error::Internal("captured stack disappeared"))?;
        let (prisoner, rest) = victim.into_top();
        if V::ABSORBS_CAPTURES {
            attacker.push_bottom(prisoner);
        }
        match rest {
            Some(rest) => {
                debug!(
                    "{}: captured {prisoner:?} on {victim_cell}, {:?} stack of {} left",
                    V::NAME,
                    rest.color(),
                    rest.len(),
                );
                self.stacks.insert(victim_cell, rest);
            }
            None => debug!("{}: captured {prisoner:?} on {victim_cell}", V::NAME),
        }
        Ok(())
    }

    /// Whether any stack of the given color has a capture available
    ///
    /// While this holds, that side may not make a simple move with any of its stacks.
    pub fn needs_to_capture(&self, color: Color) -> bool {
        self.stacks
            .iter()
            .filter(|(_, stack)| stack.color() == color)
            .any(|(cell, stack)| self.stack_can_capture(*cell, stack))
    }

    /// Whether the stack on `cell` has a capture available
    ///
    /// Returns `false` if the cell is empty.
    pub fn can_capture(&self, cell: Cell) -> bool {
        self.stacks
            .get(&cell)
            .is_some_and(|stack| self.stack_can_capture(cell, stack))
    }

    fn stack_can_capture(&self, cell: Cell, stack: &Stack) -> bool {
        Direction::DIAGONALS.into_iter().any(|direction| {
            self.attack_status_towards(cell, stack, direction) == AttackStatus::PossibleAttack
        })
    }

    /// Look along one diagonal from `cell` for something `stack` can capture
    ///
    /// An uncrowned stack only looks at its neighbour and the cell behind it. A crowned stack
    /// keeps sliding outward over empty cells until it finds an answer.
    pub fn attack_status_towards(
        &self,
        cell: Cell,
        stack: &Stack,
        direction: Direction,
    ) -> AttackStatus {
        let mut victim = cell.translate(direction);
        loop {
            let landing = victim.translate(direction);
            let status = self.attack_status(stack.color(), victim, landing);
            if status != AttackStatus::Unknown || !stack.is_crowned() {
                if status == AttackStatus::PossibleAttack {
                    trace!("{}: {cell} can capture on {victim}", V::NAME);
                }
                return status;
            }
            victim = landing;
        }
    }

    /// Classify jumping over `victim` to land on `landing` for an attacker of color `color`
    fn attack_status(&self, color: Color, victim: Cell, landing: Cell) -> AttackStatus {
        if !landing.is_playable() {
            return AttackStatus::ImpossibleAttack;
        }
        match self.stacks.get(&victim) {
            None => AttackStatus::Unknown,
            Some(stack) if stack.color() == color => AttackStatus::ImpossibleAttack,
            Some(_) if self.stacks.contains_key(&landing) => AttackStatus::ImpossibleAttack,
            Some(_) => AttackStatus::PossibleAttack,
        }
    }

    /// The position of every stack controlled by `color`, sorted
    ///
    /// Each stack is written the way the variant describes it.
    pub fn positions_of(&self, color: Color) -> Vec<String> {
        let mut positions: Vec<_> = self
            .stacks
            .iter()
            .filter(|(_, stack)| stack.color() == color)
            .map(|(cell, stack)| V::describe(*cell, &stack.pieces().collect::<Vec<_>>()))
            .collect();
        positions.sort();
        positions
    }

    /// Returns the stack on `cell`, checking that the cell is playable and occupied
    fn check_occupied(&self, cell: Cell) -> Result<&Stack> {
        let cell = cell.validate()?;
        self.stacks.get(&cell).ok_or(Error::EmptyCell)
    }

    /// Check that `cell` is playable and free
    fn check_vacant(&self, cell: Cell) -> Result<()> {
        let cell = cell.validate()?;
        if self.stacks.contains_key(&cell) {
            Err(Error::BusyCell)
        } else {
            Ok(())
        }
    }

    /// With [`GameConfig::strict_signatures`], check the description on `endpoint` against the
    /// stack now standing on `cell`
    fn check_signature(&self, endpoint: &Endpoint, cell: Cell) -> Result<()> {
        let (true, Some(signature)) = (self.config.strict_signatures, &endpoint.signature) else {
            return Ok(());
        };
        let stack = self
            .stacks
            .get(&cell)
            .ok_or(Error::Internal("no stack to compare a signature with"))?;
        if stack.matches_signature(signature) {
            Ok(())
        } else {
            debug!("{}: {endpoint} does not describe the stack on {cell}", V::NAME);
            Err(Error::IncorrectMove)
        }
    }
}

impl<V: Variant> Default for Game<V> {
    fn default() -> Self {
        Self::new()
    }
}
