use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no empty cell left to place a tile on")]
    GridFull,
    #[error("session has already been started")]
    AlreadyStarted,
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
