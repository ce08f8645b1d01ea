use std::path::PathBuf;

use crate::source::Frame;

/// What the session is currently doing.
///
/// Navigation, trigger and load actions are only valid while `Idle`; the
/// tagged enum (rather than a boolean "is live" flag) makes states like
/// "live with a static image list" unrepresentable in the UI logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No acquisition running; static images may be loaded and browsed
    Idle,
    /// Periodic acquisition from the camera
    Live,
    /// Periodic playback of a video file
    Video,
}

/// Outcome of the last decode pass, shown as the OK/NG lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Nothing scanned yet (or acquisition just stopped) - yellow
    Idle,
    /// Last frame produced no decoded text - red
    NoRead,
    /// Last frame produced at least one decoded text - green
    Read,
}

/// One entry of the static image list: the pristine frame plus where it
/// came from. Overlay is drawn on a clone at display time, never on the
/// stored frame, so re-visiting an entry re-runs a clean decode.
#[derive(Debug, Clone)]
pub struct ImageEntry {
    pub path: Option<PathBuf>,
    pub frame: Frame,
}

/// Session state owned by the top-level controller: current mode, the
/// loaded image list with its cursor, and the scan status lamp.
#[derive(Debug)]
pub struct Session {
    mode: Mode,
    images: Vec<ImageEntry>,
    index: usize,
    status: ScanStatus,
}

impl Session {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            images: Vec::new(),
            index: 0,
            status: ScanStatus::Idle,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    /// True while periodic acquisition is running (camera or video);
    /// navigation and load actions are rejected in this state.
    pub fn is_busy(&self) -> bool {
        matches!(self.mode, Mode::Live | Mode::Video)
    }

    pub fn status(&self) -> ScanStatus {
        self.status
    }

    pub fn set_status(&mut self, status: ScanStatus) {
        self.status = status;
    }

    /// Replace the image list, resetting the cursor to the first entry.
    pub fn set_images(&mut self, images: Vec<ImageEntry>) {
        self.images = images;
        self.index = 0;
    }

    pub fn clear_images(&mut self) {
        self.images.clear();
        self.index = 0;
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The entry under the cursor, if the list is non-empty.
    pub fn current(&self) -> Option<&ImageEntry> {
        self.images.get(self.index)
    }

    /// Move the cursor forward with wraparound and return the new entry.
    /// No-op on an empty list.
    pub fn next(&mut self) -> Option<&ImageEntry> {
        self.step(1)
    }

    /// Move the cursor backward with wraparound and return the new entry.
    /// No-op on an empty list.
    pub fn prev(&mut self) -> Option<&ImageEntry> {
        self.step(-1)
    }

    fn step(&mut self, delta: isize) -> Option<&ImageEntry> {
        if self.images.is_empty() {
            return None;
        }
        let len = self.images.len() as isize;
        // rem_euclid keeps the index in [0, len) for either direction
        self.index = (self.index as isize + delta).rem_euclid(len) as usize;
        self.images.get(self.index)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ImageEntry {
        ImageEntry {
            path: Some(PathBuf::from(name)),
            frame: Frame::new(2, 2),
        }
    }

    fn session_with(count: usize) -> Session {
        let mut session = Session::new();
        session.set_images((0..count).map(|i| entry(&format!("{i}.png"))).collect());
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.status(), ScanStatus::Idle);
        assert!(!session.is_busy());
        assert!(session.current().is_none());
    }

    #[test]
    fn test_set_images_resets_index() {
        let mut session = session_with(3);
        session.next();
        session.next();
        assert_eq!(session.index(), 2);

        session.set_images(vec![entry("a.png")]);
        assert_eq!(session.index(), 0);
        assert_eq!(session.image_count(), 1);
    }

    #[test]
    fn test_next_wraps_modulo_length() {
        let mut session = session_with(3);

        // N consecutive nexts land on (0 + N) mod 3
        for n in 1..=7 {
            session.next();
            assert_eq!(session.index(), n % 3);
        }
    }

    #[test]
    fn test_prev_wraps_modulo_length() {
        let mut session = session_with(3);

        session.prev();
        assert_eq!(session.index(), 2);
        session.prev();
        assert_eq!(session.index(), 1);
        session.prev();
        assert_eq!(session.index(), 0);
        session.prev();
        assert_eq!(session.index(), 2);
    }

    #[test]
    fn test_mixed_navigation_cancels_out() {
        let mut session = session_with(5);
        session.next();
        session.next();
        session.prev();
        session.next();
        assert_eq!(session.index(), 2);
    }

    #[test]
    fn test_empty_list_navigation_is_noop() {
        let mut session = Session::new();
        assert!(session.next().is_none());
        assert!(session.prev().is_none());
        assert_eq!(session.index(), 0);
    }

    #[test]
    fn test_busy_modes() {
        let mut session = Session::new();

        session.set_mode(Mode::Live);
        assert!(session.is_busy());

        session.set_mode(Mode::Video);
        assert!(session.is_busy());

        session.set_mode(Mode::Idle);
        assert!(!session.is_busy());
    }

    #[test]
    fn test_live_toggle_round_trip_resets_status() {
        // toggle on
        let mut session = Session::new();
        session.set_mode(Mode::Live);
        session.set_status(ScanStatus::Read);

        // toggle off: back to idle, lamp back to neutral
        session.set_mode(Mode::Idle);
        session.set_status(ScanStatus::Idle);

        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.status(), ScanStatus::Idle);
    }
}
