use std::io;

use log::{debug, info};
use rand::Rng;

use crate::{
    error::{Error, Result},
    grid::{Board, Direction},
    logic,
};

/// A recognised user command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Created but no tiles placed yet.
    Ready,
    Playing,
    /// No move can change the grid any more. Only quitting is possible.
    Lost,
    Terminated,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved { score_delta: u64 },
    /// The grid was already packed in that direction.
    Unchanged,
    /// The session is not accepting moves.
    Ignored,
}

/// Everything a screen needs to draw one frame.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    pub grid: &'a Board,
    pub moves: u32,
    pub score: u64,
    /// Score gained by the most recent move.
    pub score_delta: u64,
    /// False when the most recent command did not change the grid.
    pub moved: bool,
    pub lost: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub score: u64,
    pub moves: u32,
    pub max_tile: u32,
    pub lost: bool,
}

/// Draws the game. Called after every event that may have changed it.
pub trait Screen {
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// Supplies commands, blocking until one is available. Input that maps to no
/// command is skipped by the source; running out of input yields
/// [`Command::Quit`].
pub trait CommandSource {
    fn next_command(&mut self) -> io::Result<Command>;
}

pub struct Session<R> {
    grid: Board,
    rng: R,
    phase: Phase,
    moves: u32,
    score: u64,
    score_delta: u64,
    moved: bool,
}

impl<R> Session<R>
where
    R: Rng,
{
    pub fn new(rng: R) -> Self {
        Self {
            grid: Board::new(),
            rng,
            phase: Phase::Ready,
            moves: 0,
            score: 0,
            score_delta: 0,
            moved: true,
        }
    }

    /// Resumes play on an existing grid without placing any tiles.
    #[cfg(test)]
    pub(crate) fn from_grid(grid: Board, rng: R) -> Self {
        let phase = if logic::is_terminal(&grid) {
            Phase::Lost
        } else {
            Phase::Playing
        };

        Self {
            grid,
            phase,
            ..Self::new(rng)
        }
    }

    pub const fn grid(&self) -> &Board {
        &self.grid
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub const fn moves(&self) -> u32 {
        self.moves
    }

    pub const fn score(&self) -> u64 {
        self.score
    }

    pub fn frame(&self) -> Frame<'_> {
        Frame {
            grid: &self.grid,
            moves: self.moves,
            score: self.score,
            score_delta: self.score_delta,
            moved: self.moved,
            lost: self.phase == Phase::Lost,
        }
    }

    /// Places the two opening tiles.
    pub fn start(&mut self) -> Result<()> {
        if self.phase != Phase::Ready {
            return Err(Error::AlreadyStarted);
        }

        for _ in 0..2 {
            logic::place_random_tile(&mut self.grid, &mut self.rng)?;
        }

        self.phase = Phase::Playing;

        info!("game started\n{}", self.grid);

        Ok(())
    }

    pub fn attempt_move(&mut self, direction: Direction) -> Result<MoveOutcome> {
        if self.phase != Phase::Playing {
            return Ok(MoveOutcome::Ignored);
        }

        let slide = logic::slide(&self.grid, direction);

        if !slide.changed {
            self.moved = false;
            self.score_delta = 0;

            debug!("move {direction} changed nothing");

            return Ok(MoveOutcome::Unchanged);
        }

        self.moved = true;
        self.moves += 1;
        self.score += slide.score_delta;
        self.score_delta = slide.score_delta;
        self.grid = slide.grid;

        if !logic::is_terminal(&self.grid) {
            logic::place_random_tile(&mut self.grid, &mut self.rng)?;
        }

        debug!(
            "move {} {direction} scored {}\n{}",
            self.moves, slide.score_delta, self.grid
        );

        // The new tile may have filled the last gap.
        if logic::is_terminal(&self.grid) {
            self.phase = Phase::Lost;

            info!("game lost after {} moves with score {}", self.moves, self.score);
        }

        Ok(MoveOutcome::Moved {
            score_delta: slide.score_delta,
        })
    }

    pub fn summary(&self) -> Summary {
        Summary {
            score: self.score,
            moves: self.moves,
            max_tile: self.grid.max_tile(),
            lost: self.phase == Phase::Lost
                || (self.phase == Phase::Terminated && logic::is_terminal(&self.grid)),
        }
    }

    pub fn quit(&mut self) -> Summary {
        let summary = self.summary();

        self.phase = Phase::Terminated;

        info!("quit with score {} after {} moves", summary.score, summary.moves);

        summary
    }

    /// Runs the game until the user quits. Starts the session first if needed.
    pub fn play(
        &mut self,
        screen: &mut impl Screen,
        commands: &mut impl CommandSource,
    ) -> Result<Summary> {
        match self.phase {
            Phase::Ready => self.start()?,
            Phase::Terminated => return Ok(self.summary()),
            Phase::Playing | Phase::Lost => {}
        }

        screen.render(&self.frame())?;

        loop {
            match commands.next_command()? {
                Command::Quit => return Ok(self.quit()),
                Command::Move(direction) => match self.attempt_move(direction)? {
                    MoveOutcome::Ignored => {}
                    MoveOutcome::Moved { .. } | MoveOutcome::Unchanged => {
                        screen.render(&self.frame())?;
                    }
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::grid::{Grid, SIZE};

    #[derive(Default)]
    struct RecordingScreen {
        frames: Vec<(Board, u32, u64, bool, bool)>,
    }

    impl Screen for RecordingScreen {
        fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
            self.frames
                .push((*frame.grid, frame.moves, frame.score, frame.moved, frame.lost));

            Ok(())
        }
    }

    struct Script(VecDeque<Command>);

    impl Script {
        fn new(commands: impl IntoIterator<Item = Command>) -> Self {
            Self(commands.into_iter().collect())
        }
    }

    impl CommandSource for Script {
        fn next_command(&mut self) -> io::Result<Command> {
            Ok(self.0.pop_front().unwrap_or(Command::Quit))
        }
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn start_places_two_tiles() {
        let mut session = Session::new(rng());

        session.start().unwrap();

        assert_eq!(session.phase(), Phase::Playing);
        assert_eq!(session.grid().empty_count(), SIZE * SIZE - 2);
        assert!(session
            .grid()
            .rows()
            .iter()
            .flatten()
            .all(|&cell| matches!(cell, 0 | 2 | 4)));
        assert!(matches!(session.start(), Err(Error::AlreadyStarted)));
    }

    #[test]
    fn successful_move_updates_counters_and_spawns() {
        let grid = Grid::from_rows([[2, 0, 0, 2], [0; SIZE], [0; SIZE], [0; SIZE]]);
        let mut session = Session::from_grid(grid, rng());

        let outcome = session.attempt_move(Direction::Left).unwrap();

        assert_eq!(outcome, MoveOutcome::Moved { score_delta: 4 });
        assert_eq!(session.moves(), 1);
        assert_eq!(session.score(), 4);
        assert_eq!(session.grid().get(0, 0), 4);
        assert_eq!(session.grid().empty_count(), SIZE * SIZE - 2);
        assert!(session.frame().moved);
    }

    #[test]
    fn no_op_move_leaves_counters() {
        let grid = Grid::from_rows([[4, 0, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);
        let mut session = Session::from_grid(grid, rng());

        let outcome = session.attempt_move(Direction::Left).unwrap();

        assert_eq!(outcome, MoveOutcome::Unchanged);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(*session.grid(), grid);
        assert!(!session.frame().moved);
    }

    #[test]
    fn filling_the_last_gap_loses() {
        // Sliding right opens exactly one cell at (0, 0); whatever lands there
        // is next to an 8 and a 16, leaving no possible move.
        let grid = Grid::from_rows([
            [8, 16, 0, 32],
            [16, 32, 64, 128],
            [32, 64, 128, 256],
            [64, 128, 256, 512],
        ]);
        let mut session = Session::from_grid(grid, rng());

        let outcome = session.attempt_move(Direction::Right).unwrap();

        assert_eq!(outcome, MoveOutcome::Moved { score_delta: 0 });
        assert!(session.grid().is_full());
        assert_eq!(session.phase(), Phase::Lost);
        assert!(session.frame().lost);

        assert_eq!(
            session.attempt_move(Direction::Left).unwrap(),
            MoveOutcome::Ignored
        );
        assert_eq!(session.moves(), 1);

        let summary = session.quit();
        assert!(summary.lost);
        assert_eq!(summary.max_tile, 512);
        assert_eq!(session.phase(), Phase::Terminated);
    }

    #[test]
    fn terminal_grid_starts_lost() {
        let grid = Grid::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        let session = Session::from_grid(grid, rng());

        assert_eq!(session.phase(), Phase::Lost);
    }

    #[test]
    fn play_renders_each_processed_command() {
        let grid = Grid::from_rows([[2, 0, 0, 2], [0; SIZE], [0; SIZE], [0; SIZE]]);
        let mut session = Session::from_grid(grid, rng());
        let mut screen = RecordingScreen::default();
        let mut script = Script::new([
            Command::Move(Direction::Left),
            Command::Move(Direction::Left),
            Command::Quit,
            Command::Move(Direction::Right),
        ]);

        let summary = session.play(&mut screen, &mut script).unwrap();

        assert_eq!(summary.score, session.score());
        assert!(summary.score >= 4);
        assert_eq!(summary.moves, session.moves());
        assert!(!summary.lost);
        assert_eq!(session.phase(), Phase::Terminated);
        // Initial frame plus one per move; the command after quit is never read.
        assert_eq!(screen.frames.len(), 3);
        assert_eq!(screen.frames[0].0, grid);
        assert_eq!((screen.frames[1].1, screen.frames[1].2), (1, 4));
        assert_eq!(script.0.len(), 1);
    }

    #[test]
    fn play_starts_a_fresh_session() {
        let mut session = Session::new(rng());
        let mut screen = RecordingScreen::default();
        let mut script = Script(VecDeque::new());

        let summary = session.play(&mut screen, &mut script).unwrap();

        assert_eq!(summary.moves, 0);
        assert_eq!(screen.frames.len(), 1);
        assert_eq!(screen.frames[0].0.empty_count(), SIZE * SIZE - 2);
    }
}
