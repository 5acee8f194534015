use std::io::{self, Write};

use lib_2048::{Board, Frame, Screen, SIZE};

const SQUARE_HEIGHT: usize = 3;
const BOARD_WIDTH: usize = 33;
const TOP_ROW: &[u8] = "┏━━━━━━━┳━━━━━━━┳━━━━━━━┳━━━━━━━┓\n".as_bytes();
const SEPERATOR_ROW: &[u8] = "┣━━━━━━━╋━━━━━━━╋━━━━━━━╋━━━━━━━┫\n".as_bytes();
const BOTTOM_ROW: &[u8] = "┗━━━━━━━┻━━━━━━━┻━━━━━━━┻━━━━━━━┛\n".as_bytes();
const EMPTY_ROW: &[u8] = "┃       ┃       ┃       ┃       ┃\n".as_bytes();
const EMPTY_CELL: &[u8] = "┃       ".as_bytes();
// White, cyan, magenta, yellow, green, red, grey; one colour per pair of
// exponents starting at 2.
const COLOUR_TABLE: [u8; 7] = [37, 36, 35, 33, 32, 31, 90];

const TITLE: &str = "Just another 2048 game";
const TITLE_LINE: usize = 1;
const MOVES_LINE: usize = 3;
const SCORE_LINE: usize = 4;
const STATUS_LINE: usize = 5;
const BOARD_LINE: usize = 7;
const END_LINE: usize = BOARD_LINE + SIZE * (SQUARE_HEIGHT + 1) + 1;

fn tile_colour(value: u32) -> Option<u8> {
    (value != 0).then(|| COLOUR_TABLE[(value.trailing_zeros() / 2) as usize % COLOUR_TABLE.len()])
}

const fn row_line(row: usize) -> usize {
    BOARD_LINE + 1 + row * (SQUARE_HEIGHT + 1)
}

fn draw_padding_line(out: &mut impl Write, row: &[u32; SIZE]) -> io::Result<()> {
    for &value in row {
        if let Some(colour) = tile_colour(value) {
            write!(out, "┃\x1b[{}m       \x1b[m", colour + 10)?;
        } else {
            out.write_all(EMPTY_CELL)?;
        }
    }

    Ok(())
}

fn draw_board_row(out: &mut impl Write, row: &[u32; SIZE]) -> io::Result<()> {
    for _ in 0..(SQUARE_HEIGHT - 1) / 2 {
        draw_padding_line(out, row)?;
        out.write_all(b"\x1b[E")?;
    }

    for &value in row {
        if let Some(colour) = tile_colour(value) {
            write!(out, "┃\x1b[7m\x1b[{colour}m{value:^7}\x1b[m")?;
        } else {
            out.write_all(EMPTY_CELL)?;
        }
    }

    for _ in 0..(SQUARE_HEIGHT - 1).div_ceil(2) {
        out.write_all(b"\x1b[E")?;
        draw_padding_line(out, row)?;
    }

    Ok(())
}

fn draw_skeleton(out: &mut impl Write) -> io::Result<()> {
    write!(out, "\x1b[2J\x1b[?25l\x1b[{TITLE_LINE};1H")?;
    write!(out, "\x1b[1;4m{TITLE:^BOARD_WIDTH$}\x1b[m")?;

    write!(out, "\x1b[{BOARD_LINE};1H")?;
    out.write_all(TOP_ROW)?;

    for i in 0..SIZE {
        if i != 0 {
            out.write_all(SEPERATOR_ROW)?;
        }

        for _ in 0..SQUARE_HEIGHT {
            out.write_all(EMPTY_ROW)?;
        }
    }

    out.write_all(BOTTOM_ROW)
}

/// Draws frames with ANSI escapes, rewriting only the grid rows that changed
/// since the previous frame.
pub struct TerminalScreen<W> {
    out: W,
    drawn: Option<Board>,
}

impl<W> TerminalScreen<W>
where
    W: Write,
{
    pub const fn new(out: W) -> Self {
        Self { out, drawn: None }
    }

    /// Parks the cursor below the board and makes it visible again.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.drawn.is_some() {
            write!(self.out, "\x1b[{END_LINE};1H")?;
        }

        self.out.write_all(b"\x1b[?25h")?;
        self.out.flush()
    }

    fn draw_header(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let flag = if frame.moved { ' ' } else { '!' };

        write!(
            self.out,
            "\x1b[{MOVES_LINE};1H\x1b[1mMoves: {} {flag}\x1b[m\x1b[K",
            frame.moves
        )?;

        write!(self.out, "\x1b[{SCORE_LINE};1H\x1b[1mScore: {}", frame.score)?;
        if frame.score_delta != 0 {
            write!(self.out, " (+{})", frame.score_delta)?;
        }
        self.out.write_all(b"\x1b[m\x1b[K")?;

        write!(self.out, "\x1b[{STATUS_LINE};1H\x1b[K")?;
        if frame.lost {
            write!(self.out, "\x1b[1m{:^BOARD_WIDTH$}\x1b[m", "You Lost!!! Press q to exit.")?;
        }

        Ok(())
    }
}

impl<W> Screen for TerminalScreen<W>
where
    W: Write,
{
    fn render(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        if self.drawn.is_none() {
            draw_skeleton(&mut self.out)?;
        }

        self.draw_header(frame)?;

        let previous = self.drawn;

        let changed_rows = (0..SIZE).filter(|&i| {
            previous.map_or(true, |previous| previous.rows()[i] != frame.grid.rows()[i])
        });

        for i in changed_rows {
            write!(self.out, "\x1b[{};1H", row_line(i))?;
            draw_board_row(&mut self.out, &frame.grid.rows()[i])?;
        }

        write!(self.out, "\x1b[{END_LINE};1H")?;
        self.out.flush()?;

        self.drawn = Some(*frame.grid);

        Ok(())
    }
}
