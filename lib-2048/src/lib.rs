pub mod error;
pub mod grid;
pub mod logic;
pub mod session;

pub use error::{Error, Result};
pub use grid::{Board, Direction, Grid, SIZE};
pub use logic::{is_terminal, place_random_tile, slide, Slide};
pub use session::{Command, CommandSource, Frame, MoveOutcome, Phase, Screen, Session, Summary};
