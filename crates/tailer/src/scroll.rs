//! Scroll-position bookkeeping

/// Rows of slack still treated as "at the bottom".
const BOTTOM_TOLERANCE: usize = 1;

/// Whether a viewport showing rows from `scroll_top` is at the end of the content.
pub fn is_at_bottom(scroll_top: usize, viewport_height: usize, content_height: usize) -> bool {
    scroll_top + viewport_height + BOTTOM_TOLERANCE >= content_height
}

/// Keeps a console pinned to its newest line unless the user scrolled away.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    at_bottom: bool,
    scroll_requested: bool,
}

impl Default for ScrollTracker {
    fn default() -> Self {
        Self {
            at_bottom: true,
            scroll_requested: false,
        }
    }
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the viewport position reported by the renderer.
    pub fn report_viewport(&mut self, scroll_top: usize, viewport_height: usize, content_height: usize) {
        self.at_bottom = is_at_bottom(scroll_top, viewport_height, content_height);
    }

    pub fn at_bottom(&self) -> bool {
        self.at_bottom
    }

    /// Call right before content changes; requests a scroll if the view was at the bottom.
    pub fn before_update(&mut self) {
        if self.at_bottom {
            self.scroll_requested = true;
        }
    }

    /// Consume a pending scroll-to-bottom request after rendering.
    pub fn take_scroll_request(&mut self) -> bool {
        let requested = self.scroll_requested;
        self.scroll_requested = false;
        if requested {
            self.at_bottom = true;
        }
        requested
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bottom_detection() {
        assert!(is_at_bottom(80, 20, 100));
        assert!(is_at_bottom(79, 20, 100));
        assert!(!is_at_bottom(50, 20, 100));
        // Content shorter than the viewport
        assert!(is_at_bottom(0, 20, 5));
    }

    #[test]
    fn test_follows_when_at_bottom() {
        let mut tracker = ScrollTracker::new();
        tracker.before_update();
        assert!(tracker.take_scroll_request());
        assert!(!tracker.take_scroll_request());
    }

    #[test]
    fn test_stays_put_when_scrolled_up() {
        let mut tracker = ScrollTracker::new();
        tracker.report_viewport(10, 20, 200);
        tracker.before_update();
        assert!(!tracker.take_scroll_request());
        assert!(!tracker.at_bottom());

        tracker.report_viewport(180, 20, 200);
        tracker.before_update();
        assert!(tracker.take_scroll_request());
    }
}
