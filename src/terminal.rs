use std::{
    io,
    mem::MaybeUninit,
    os::fd::{AsRawFd, RawFd},
};

use log::warn;

/// Keeps the terminal out of canonical mode with echo and signal keys off,
/// putting the original settings back when dropped. Ctrl-C arrives as input
/// so the game can quit through its normal path.
pub struct RawTerminal {
    fd: RawFd,
    original: libc::termios,
}

fn set_attributes(fd: RawFd, termios: &libc::termios) -> io::Result<()> {
    unsafe {
        if libc::tcsetattr(fd, libc::TCSADRAIN, termios) != 0 {
            return Err(io::Error::last_os_error());
        }
    }

    Ok(())
}

impl RawTerminal {
    pub fn enable(fd: &impl AsRawFd) -> io::Result<Self> {
        let fd = fd.as_raw_fd();
        let mut termios = MaybeUninit::uninit();

        let original = unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                return Err(io::Error::last_os_error());
            }

            termios.assume_init()
        };

        let mut raw = original;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG);

        set_attributes(fd, &raw)?;

        Ok(Self { fd, original })
    }
}

impl Drop for RawTerminal {
    fn drop(&mut self) {
        if let Err(err) = set_attributes(self.fd, &self.original) {
            warn!("failed to restore terminal settings: {err}");
        }
    }
}
