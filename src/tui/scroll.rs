// Scroll state for the chat feed
//
// The feed follows new content by default: while following, every frame
// pins the viewport to the bottom so streamed tokens stay visible. Any
// upward scroll hands control to the user; scrolling back to the bottom
// resumes following.

/// Scroll offset + follow mode for one panel.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Line index at the top of the viewport
    offset: usize,
    /// Total content lines, updated each frame
    total: usize,
    /// Viewport height in lines, updated each frame
    viewport: usize,
    /// Pin the viewport to the bottom as content grows
    following: bool,
}

impl ScrollState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            total: 0,
            viewport: 0,
            following: true,
        }
    }

    /// Record this frame's content and viewport sizes.
    ///
    /// While following, the offset snaps to the bottom; otherwise it is
    /// clamped into the valid range.
    pub fn sync(&mut self, total: usize, viewport: usize) {
        self.total = total;
        self.viewport = viewport;
        if self.following {
            self.offset = self.bottom();
        } else {
            self.offset = self.offset.min(self.bottom());
        }
    }

    pub fn up(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.following = false;
    }

    pub fn down(&mut self, lines: usize) {
        self.offset = (self.offset + lines).min(self.bottom());
        if self.offset == self.bottom() {
            self.following = true;
        }
    }

    pub fn page_up(&mut self) {
        self.up(self.viewport.max(1));
    }

    pub fn page_down(&mut self) {
        self.down(self.viewport.max(1));
    }

    pub fn to_top(&mut self) {
        self.offset = 0;
        self.following = false;
    }

    pub fn to_bottom(&mut self) {
        self.offset = self.bottom();
        self.following = true;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn overflows(&self) -> bool {
        self.total > self.viewport
    }

    fn bottom(&self) -> usize {
        self.total.saturating_sub(self.viewport)
    }
}

impl Default for ScrollState {
    fn default() -> Self {
        Self::new()
    }
}
