use std::{
    collections::VecDeque,
    io::{self, Read},
};

use aho_corasick::{AhoCorasick, BuildError, MatchKind};
use lib_2048::{Command, CommandSource, Direction};

const ESC: u8 = 0x1b;

const KEYS: [(&[u8], Command); 10] = [
    (b"\x1b[A", Command::Move(Direction::Up)),
    (b"\x1b[B", Command::Move(Direction::Down)),
    (b"\x1b[C", Command::Move(Direction::Right)),
    (b"\x1b[D", Command::Move(Direction::Left)),
    (b"k", Command::Move(Direction::Up)),
    (b"j", Command::Move(Direction::Down)),
    (b"l", Command::Move(Direction::Right)),
    (b"h", Command::Move(Direction::Left)),
    (b"q", Command::Quit),
    // Ctrl-C, delivered as a byte while signals are off.
    (b"\x03", Command::Quit),
];

/// Quits for every escape byte in `gap` that does not open a control
/// sequence.
fn stray_escapes(gap: &[u8]) -> impl Iterator<Item = Command> + '_ {
    gap.iter()
        .enumerate()
        .filter(move |&(i, &byte)| byte == ESC && gap.get(i + 1) != Some(&b'['))
        .map(|_| Command::Quit)
}

/// Turns raw terminal input into commands.
///
/// An escape sequence cut off at the end of a read is kept and completed by
/// the next one. An escape byte not followed by `[` is the Esc key, as is a
/// read holding nothing but an escape byte.
pub struct KeyReader<R> {
    input: R,
    searcher: AhoCorasick,
    buf: [u8; 128],
    buf_len: usize,
    pending: VecDeque<Command>,
}

impl<R> KeyReader<R>
where
    R: Read,
{
    pub fn new(input: R) -> Result<Self, BuildError> {
        let searcher = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostFirst)
            .build(KEYS.map(|(pattern, _)| pattern))?;

        Ok(Self {
            input,
            searcher,
            buf: [0; 128],
            buf_len: 0,
            pending: VecDeque::new(),
        })
    }
}

impl<R> CommandSource for KeyReader<R>
where
    R: Read,
{
    fn next_command(&mut self) -> io::Result<Command> {
        loop {
            if let Some(command) = self.pending.pop_front() {
                return Ok(command);
            }

            let read = self.input.read(&mut self.buf[self.buf_len..])?;

            if read == 0 {
                return Ok(Command::Quit);
            }

            self.buf_len += read;

            if self.buf[..self.buf_len] == [ESC] {
                self.buf_len = 0;

                return Ok(Command::Quit);
            }

            let haystack = &self.buf[..self.buf_len];
            let mut last = 0;

            for m in self.searcher.find_iter(haystack) {
                self.pending.extend(stray_escapes(&haystack[last..m.start()]));
                self.pending.push_back(KEYS[m.pattern().as_usize()].1);
                last = m.end();
            }

            let tail = &haystack[last..];
            let carry = match tail {
                [.., ESC, b'['] => 2,
                [.., ESC] => 1,
                _ => 0,
            };

            self.pending.extend(stray_escapes(&tail[..tail.len() - carry]));

            self.buf.copy_within(self.buf_len - carry..self.buf_len, 0);
            self.buf_len = carry;
        }
    }
}
