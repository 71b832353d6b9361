use std::io::{self, Write};

use crossterm::{
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use thiserror::Error;
use tracing::debug;

/// Signals the host environment delivers to the exam
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostSignal {
    FullScreenChanged(bool),
    VisibilityChanged { hidden: bool },
    FocusLost,
    UnloadRequested,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    #[error("terminal is {cols}x{rows}, full screen needs at least {min_cols}x{min_rows}")]
    WindowTooSmall {
        cols: u16,
        rows: u16,
        min_cols: u16,
        min_rows: u16,
    },
    #[error("full screen request denied")]
    Denied,
}

/// Host actions the exam may request
pub trait Host {
    fn request_full_screen(&mut self) -> Result<(), HostError>;
    fn exit_full_screen(&mut self);
    fn is_full_screen(&self) -> bool;
    /// Feed a new window size; returns the full-screen bit when it flips
    fn on_resize(&mut self, cols: u16, rows: u16) -> Option<bool>;
}

/// Full screen on a terminal: exam mode is engaged and the window is at
/// least `min_cols` x `min_rows`.
#[derive(Debug, Clone)]
pub struct TerminalHost {
    min_cols: u16,
    min_rows: u16,
    cols: u16,
    rows: u16,
    engaged: bool,
}

impl TerminalHost {
    pub fn new(min_cols: u16, min_rows: u16, (cols, rows): (u16, u16)) -> Self {
        Self {
            min_cols,
            min_rows,
            cols,
            rows,
            engaged: false,
        }
    }

    fn fits(&self) -> bool {
        self.cols >= self.min_cols && self.rows >= self.min_rows
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }
}

impl Host for TerminalHost {
    fn request_full_screen(&mut self) -> Result<(), HostError> {
        self.engaged = true;
        if self.fits() {
            Ok(())
        } else {
            Err(HostError::WindowTooSmall {
                cols: self.cols,
                rows: self.rows,
                min_cols: self.min_cols,
                min_rows: self.min_rows,
            })
        }
    }

    fn exit_full_screen(&mut self) {
        self.engaged = false;
    }

    fn is_full_screen(&self) -> bool {
        self.engaged && self.fits()
    }

    fn on_resize(&mut self, cols: u16, rows: u16) -> Option<bool> {
        let before = self.is_full_screen();
        self.cols = cols;
        self.rows = rows;
        let after = self.is_full_screen();
        (before != after).then_some(after)
    }
}

/// Records requests instead of acting on them
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub deny_full_screen: bool,
    pub full_screen: bool,
    pub requests: usize,
    pub exits: usize,
}

impl Host for RecordingHost {
    fn request_full_screen(&mut self) -> Result<(), HostError> {
        self.requests += 1;
        if self.deny_full_screen {
            self.full_screen = false;
            return Err(HostError::Denied);
        }
        self.full_screen = true;
        Ok(())
    }

    fn exit_full_screen(&mut self) {
        self.exits += 1;
        self.full_screen = false;
    }

    fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    fn on_resize(&mut self, _cols: u16, _rows: u16) -> Option<bool> {
        None
    }
}

/// Raw mode, alternate screen and focus reporting for as long as it lives.
/// Dropping it hands the terminal back, even on an early return.
pub struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    pub fn acquire(mut out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableFocusChange)?;
        debug!("terminal acquired");
        Ok(Self { out })
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        let _ = execute!(self.out, DisableFocusChange, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        debug!("terminal released");
    }
}
