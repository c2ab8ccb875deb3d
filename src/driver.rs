// driver.rs - Frame loop lifecycle
//
// The loop owns one pending frame handle at most. Every path that stops
// the loop (resize restart, teardown) cancels that handle first, so a
// stale callback can never schedule a second chain.

use crate::error::Result;

/// Opaque id of a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Display-refresh callback source (requestAnimationFrame in the browser).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running,
    TornDown,
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    pending: Option<FrameHandle>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self { state: LoopState::Stopped, pending: None }
    }

    pub fn state(&self) -> LoopState { self.state }
    pub fn pending(&self) -> Option<FrameHandle> { self.pending }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Schedule the first frame. No-op if already running or torn down.
    pub fn start<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> Result<()> {
        if self.state != LoopState::Stopped { return Ok(()); }
        self.pending = Some(scheduler.request_frame()?);
        self.state = LoopState::Running;
        Ok(())
    }

    /// Handle a fired frame: run `frame`, then schedule the next one.
    /// Returns false (and schedules nothing) when the loop is not running.
    pub fn on_frame<S, F>(&mut self, scheduler: &mut S, frame: F) -> Result<bool>
    where
        S: FrameScheduler + ?Sized,
        F: FnOnce(),
    {
        self.pending = None;
        if self.state != LoopState::Running { return Ok(false); }

        frame();

        match scheduler.request_frame() {
            Ok(handle) => {
                self.pending = Some(handle);
                Ok(true)
            }
            Err(err) => {
                self.state = LoopState::Stopped;
                Err(err)
            }
        }
    }

    /// Cancel the pending frame and schedule a fresh one (used on resize).
    pub fn restart<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) -> Result<()> {
        if self.state == LoopState::TornDown { return Ok(()); }
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.state = LoopState::Stopped;
        self.start(scheduler)
    }

    /// Cancel the pending frame; the loop never runs again.
    pub fn teardown<S: FrameScheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel_frame(handle);
        }
        self.state = LoopState::TornDown;
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}
