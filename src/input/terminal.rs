//! Raw terminal mode via `libc`/`termios` directly, not a delegated
//! terminal-abstraction crate — the spec calls for owning this layer.
//!
//! Grounded on the teacher's own `libc`-based raw mode setup: zero the
//! `termios`, `tcgetattr` to save the original, clear the usual input and
//! output processing flags, force 8-bit characters, set `VMIN=1`/`VTIME=0`
//! for blocking byte-at-a-time reads, and `tcsetattr(TCSAFLUSH)`.

use crate::error::{Error, Result};

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::unix::io::RawFd;

    pub fn enable_raw_mode(fd: RawFd) -> Result<libc::termios> {
        unsafe {
            let mut original: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut original) != 0 {
                return Err(Error::TerminalAttrFailed(std::io::Error::last_os_error()));
            }

            let mut raw = original;
            raw.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            raw.c_oflag &= !libc::OPOST;
            raw.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            raw.c_cflag &= !(libc::CSIZE | libc::PARENB);
            raw.c_cflag |= libc::CS8;
            raw.c_cc[libc::VMIN] = 1;
            raw.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw) != 0 {
                return Err(Error::TerminalAttrFailed(std::io::Error::last_os_error()));
            }

            Ok(original)
        }
    }

    pub fn restore(fd: RawFd, original: &libc::termios) -> Result<()> {
        unsafe {
            if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                return Err(Error::TerminalAttrFailed(std::io::Error::last_os_error()));
            }
        }
        Ok(())
    }

    pub fn is_a_tty(fd: RawFd) -> bool {
        unsafe { libc::isatty(fd) == 1 }
    }
}

#[cfg(unix)]
pub use unix::*;

/// RAII guard: restores the terminal's original attributes on drop so a
/// panic or early return never leaves the user's shell in raw mode.
pub struct RawModeGuard {
    #[cfg(unix)]
    fd: std::os::unix::io::RawFd,
    #[cfg(unix)]
    original: libc::termios,
}

impl RawModeGuard {
    #[cfg(unix)]
    pub fn enable(fd: std::os::unix::io::RawFd) -> Result<Self> {
        let original = enable_raw_mode(fd)?;
        Ok(RawModeGuard { fd, original })
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = restore(self.fd, &self.original);
    }
}
