//! The input pipeline: one reader thread, one mutex-guarded event buffer.
//!
//! No condition variables — consumers poll [`InputPipeline::drain`] on tick
//! boundaries. Shutdown is driven by a caller-supplied, shared stop flag
//! (the Rust equivalent of the source's `volatile sig_atomic_t *`) rather
//! than a process-global, so a host embedding two pipelines never has them
//! race on the same flag unless it chooses to share one.

pub mod event;
pub mod parser;
pub mod terminal;

pub use event::{EventBuffer, InputEvent};

use crate::error::{Error, Result};
use crate::renderer::ansi;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::thread::JoinHandle;

/// Shared, injected shutdown signal. Built by construction into both
/// `InputPipeline` and `TickContext` so a caller can request fast shutdown
/// from anywhere by setting it.
pub type StopFlag = Arc<AtomicBool>;

#[cfg(unix)]
static INSTALL_WAKE_SIGNAL: Once = Once::new();

#[cfg(unix)]
extern "C" fn wake_signal_handler(_: libc::c_int) {}

/// The signal used purely to force a blocked `read()` back to userspace
/// with `EINTR`. `SIGUSR1` has no terminal-driven default behavior other
/// than terminating the process, so a no-op handler is installed once per
/// process before the reader thread is ever started.
#[cfg(unix)]
const WAKE_SIGNAL: libc::c_int = libc::SIGUSR1;

#[cfg(unix)]
fn install_wake_signal() {
    INSTALL_WAKE_SIGNAL.call_once(|| unsafe {
        libc::signal(WAKE_SIGNAL, wake_signal_handler as libc::sighandler_t);
    });
}

pub struct InputPipeline {
    stop: StopFlag,
    events: Arc<EventBuffer>,
    thread: Option<JoinHandle<()>>,
    #[cfg(unix)]
    reader_tid: Arc<Mutex<Option<libc::pthread_t>>>,
    #[cfg(unix)]
    raw_guard: Option<terminal::RawModeGuard>,
}

impl InputPipeline {
    pub fn new(capacity: usize, stop: StopFlag) -> Self {
        InputPipeline {
            stop,
            events: Arc::new(EventBuffer::new(capacity)),
            thread: None,
            #[cfg(unix)]
            reader_tid: Arc::new(Mutex::new(None)),
            #[cfg(unix)]
            raw_guard: None,
        }
    }

    /// Enter raw mode, enable mouse reporting, and spawn the reader thread.
    /// The mouse-enable escape is written immediately after raw mode is
    /// entered, not deferred to the first `render()` call.
    #[cfg(unix)]
    pub fn start_listen(&mut self) -> Result<()> {
        install_wake_signal();

        let guard = terminal::RawModeGuard::enable(libc::STDIN_FILENO)?;
        self.raw_guard = Some(guard);

        let mut stdout = io::stdout();
        stdout.write_all(ansi::MOUSE_ENABLE.as_bytes()).map_err(Error::FlushFailed)?;
        #[cfg(feature = "hide-cursor")]
        stdout.write_all(ansi::HIDE_CURSOR.as_bytes()).map_err(Error::FlushFailed)?;
        stdout.flush().map_err(Error::FlushFailed)?;

        let stop = self.stop.clone();
        let events = self.events.clone();
        let reader_tid = self.reader_tid.clone();

        self.thread = Some(
            std::thread::Builder::new()
                .name("input-reader".into())
                .spawn(move || {
                    *reader_tid.lock().unwrap_or_else(|p| p.into_inner()) = Some(unsafe { libc::pthread_self() });
                    reader_loop(&stop, &events);
                })
                .map_err(Error::FlushFailed)?,
        );
        Ok(())
    }

    /// Signal the reader thread to stop, force its blocked `read()` to
    /// return via an inert signal, join it, then restore terminal state.
    /// The join always happens before attributes are restored, even if the
    /// thread had already exited on its own (EOF or a read error).
    #[cfg(unix)]
    pub fn stop_listen(&mut self) -> Result<()> {
        self.stop.store(true, Ordering::SeqCst);

        if let Some(tid) = *self.reader_tid.lock().unwrap_or_else(|p| p.into_inner()) {
            unsafe {
                libc::pthread_kill(tid, WAKE_SIGNAL);
            }
        }
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }

        // Drop restores the saved termios before we write the disable
        // sequences, mirroring the source's "join, then restore" order.
        self.raw_guard = None;

        let mut stdout = io::stdout();
        #[cfg(feature = "hide-cursor")]
        stdout.write_all(ansi::SHOW_CURSOR.as_bytes()).map_err(Error::FlushFailed)?;
        stdout.write_all(ansi::MOUSE_DISABLE.as_bytes()).map_err(Error::FlushFailed)?;
        stdout.flush().map_err(Error::FlushFailed)?;
        Ok(())
    }

    /// Swap out everything collected since the last call.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.events.drain()
    }
}

#[cfg(unix)]
fn reader_loop(stop: &AtomicBool, events: &EventBuffer) {
    let stdin = io::stdin();
    let mut lock = stdin.lock();
    while !stop.load(Ordering::SeqCst) {
        match parser::read_event(&mut lock) {
            Ok(Some(parsed)) => {
                for event in parsed {
                    if events.push(event).is_err() {
                        log::warn!("dropped input event: event buffer allocation failed");
                    }
                }
            }
            Ok(None) => break,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                log::warn!("input reader stopped: {e}");
                break;
            }
        }
    }
}
