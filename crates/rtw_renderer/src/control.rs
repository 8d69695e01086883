//! Start/stop control shared between the renderer and its front end.

use crate::{RenderError, RenderResult};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

const IDLE: u8 = 0;
const RENDERING: u8 = 1;
const STOP_REQUESTED: u8 = 2;

/// Where the renderer is in its pass lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Rendering,
    StopRequested,
}

/// Commands a front end (window, key handler, CLI) can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderCommand {
    Start,
    Stop,
}

/// Cloneable handle to the render state machine.
///
/// ```text
/// Idle --begin--> Rendering --request_stop--> StopRequested
///   ^                 |                            |
///   +----finish-------+-------------finish---------+
/// ```
///
/// Pixel tasks poll [`RenderControl::is_stop_requested`] without locking.
#[derive(Debug, Clone, Default)]
pub struct RenderControl {
    state: Arc<AtomicU8>,
}

impl RenderControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RenderState {
        match self.state.load(Ordering::Acquire) {
            IDLE => RenderState::Idle,
            RENDERING => RenderState::Rendering,
            _ => RenderState::StopRequested,
        }
    }

    /// Enter `Rendering`. Fails unless the renderer is idle.
    pub fn begin(&self) -> RenderResult<()> {
        self.state
            .compare_exchange(IDLE, RENDERING, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| RenderError::AlreadyRendering)
    }

    /// Ask the running pass to stop. Returns false if nothing was running.
    pub fn request_stop(&self) -> bool {
        let requested = self
            .state
            .compare_exchange(RENDERING, STOP_REQUESTED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if requested {
            log::warn!("Stop requested; remaining pixels will be skipped");
        }
        requested
    }

    #[inline]
    pub fn is_stop_requested(&self) -> bool {
        self.state.load(Ordering::Acquire) == STOP_REQUESTED
    }

    /// Return to `Idle` at the end of a pass.
    pub(crate) fn finish(&self) {
        self.state.store(IDLE, Ordering::Release);
    }
}
