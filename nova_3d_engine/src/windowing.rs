//! Windowing capability interface
//!
//! Window creation, event delivery and swap-chain presentation live outside
//! the engine core; the renderer consumes them through [`WindowContext`].
//! [`HeadlessWindow`] is the in-memory implementation used by tests and the
//! demo binary.

/// Contract the renderer requires from a window/swap-chain provider
pub trait WindowContext {
    /// Make the graphics context of this window current
    fn make_current(&mut self);

    /// Pump the platform event queue
    fn poll_events(&mut self);

    /// Whether the user (or the provider) requested shutdown
    fn should_close(&self) -> bool;

    /// Current framebuffer width in pixels
    fn width(&self) -> u32;

    /// Current framebuffer height in pixels
    fn height(&self) -> u32;

    /// Present the back buffer
    fn swap_buffers(&mut self);

    /// Set the window title
    fn set_title(&mut self, title: &str);
}

/// Fixed-size window stub without a display
///
/// Requests shutdown once a frame budget is exhausted so demo loops
/// terminate on their own.
pub struct HeadlessWindow {
    width: u32,
    height: u32,
    title: String,
    frames_left: u32,
    swap_count: u32,
}

impl HeadlessWindow {
    /// Create a headless window that closes after `frame_budget` presents
    pub fn new(width: u32, height: u32, title: &str, frame_budget: u32) -> HeadlessWindow {
        HeadlessWindow {
            width,
            height,
            title: title.to_string(),
            frames_left: frame_budget,
            swap_count: 0,
        }
    }

    /// Simulate a resize by the windowing system
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Number of presents so far
    pub fn swap_count(&self) -> u32 {
        self.swap_count
    }

    pub fn title(&self) -> &str {
        &self.title
    }
}

impl WindowContext for HeadlessWindow {
    fn make_current(&mut self) {}

    fn poll_events(&mut self) {}

    fn should_close(&self) -> bool {
        self.frames_left == 0
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn swap_buffers(&mut self) {
        self.swap_count += 1;
        self.frames_left = self.frames_left.saturating_sub(1);
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "windowing_tests.rs"]
mod tests;
