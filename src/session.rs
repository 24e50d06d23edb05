//! Edit session state.
//!
//! One mutable state object per editing session, mutated through small
//! reducer-style methods. Every mutation bumps a `revision` counter, which is
//! the *only* invalidation signal a renderer needs: take a [`snapshot`],
//! render from it, and before presenting the result check
//! [`EditSession::is_current`] — a stale snapshot means newer edits arrived
//! while the render was in flight, so the result is discarded and the latest
//! state wins. There is no queue of pending redraws to drain.
//!
//! Background-removal submissions are single-flight: [`begin_removal`] fails
//! while one is outstanding, and [`finish_removal`] closes it, so each
//! submission surfaces exactly one outcome.
//!
//! Sessions serialize to JSON (`--session` on the CLI) so an edit can be
//! replayed or resumed later. The revision and in-flight flag are runtime
//! bookkeeping and are not persisted.
//!
//! [`snapshot`]: EditSession::snapshot
//! [`begin_removal`]: EditSession::begin_removal
//! [`finish_removal`]: EditSession::finish_removal

use crate::compose::PhotoFilter;
use crate::placement::{CaptionPlacement, DEFAULT_CAPTION_POSITION, Placement};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("a background-removal request is already in flight")]
    RemovalInFlight,
}

/// Mutable editor state for one photo-framing session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditSession {
    /// Photo placement on the preview surface.
    pub placement: Placement,
    /// Caption text; empty means no caption.
    pub caption_text: String,
    /// Caption anchor `[x, y]` on the preview surface.
    pub caption_position: [f64; 2],
    /// Anchor the caption returns to on reset (configurable per deployment).
    pub caption_default: [f64; 2],
    /// Color filter applied to the photo.
    pub filter: PhotoFilter,
    /// Selected frame template name; `None` falls back to the configured default.
    pub frame: Option<String>,
    #[serde(skip)]
    revision: u64,
    #[serde(skip)]
    removal_in_flight: bool,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(DEFAULT_CAPTION_POSITION)
    }
}

/// Immutable copy of the render-relevant state, tagged with the revision it
/// was taken at.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub placement: Placement,
    pub caption: Option<CaptionPlacement>,
    pub filter: PhotoFilter,
    pub frame: Option<String>,
    revision: u64,
}

impl EditSession {
    /// Fresh session with a deployment-configured caption default.
    #[must_use]
    pub fn new(caption_default: [f64; 2]) -> Self {
        Self {
            placement: Placement::default(),
            caption_text: String::new(),
            caption_position: caption_default,
            caption_default,
            filter: PhotoFilter::None,
            frame: None,
            revision: 0,
            removal_in_flight: false,
        }
    }

    // -- reducer-style edits (each bumps the revision) --

    /// Pan the photo by a drag delta. Unbounded.
    pub fn apply_drag(&mut self, dx: f64, dy: f64) {
        self.placement = self.placement.dragged(dx, dy);
        self.touch();
    }

    /// Zoom the photo; the scale clamps to `[0.1, 5.0]`.
    pub fn apply_zoom(&mut self, delta: f64) {
        self.placement = self.placement.zoomed(delta);
        self.touch();
    }

    /// Replace the placement wholesale (clamped). Used when loading a saved
    /// session or applying absolute CLI coordinates.
    pub fn set_placement(&mut self, placement: Placement) {
        self.placement = Placement::new(placement.offset_x, placement.offset_y, placement.scale);
        self.touch();
    }

    /// Update the caption text. Empty text means no caption.
    pub fn set_caption(&mut self, text: impl Into<String>) {
        self.caption_text = text.into();
        self.touch();
    }

    /// Pan the caption anchor by a drag delta.
    pub fn drag_caption(&mut self, dx: f64, dy: f64) {
        self.caption_position[0] += dx;
        self.caption_position[1] += dy;
        self.touch();
    }

    /// Move the caption anchor to an absolute position.
    pub fn place_caption(&mut self, x: f64, y: f64) {
        self.caption_position = [x, y];
        self.touch();
    }

    pub fn set_filter(&mut self, filter: PhotoFilter) {
        self.filter = filter;
        self.touch();
    }

    pub fn select_frame(&mut self, name: impl Into<String>) {
        self.frame = Some(name.into());
        self.touch();
    }

    /// A new upload replaces the photo wholesale: placement and caption go
    /// back to their defaults. Frame and filter choices survive.
    pub fn replace_photo(&mut self) {
        self.reset();
        self.caption_text.clear();
        self.touch();
    }

    /// Restore the documented defaults: offset `(0, 0)`, scale `1.0`, caption
    /// anchor back at its configured default. Text, frame, and filter stay.
    pub fn reset(&mut self) {
        self.placement = Placement::default();
        self.caption_position = self.caption_default;
        self.touch();
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    // -- render coordination --

    /// Current caption, if any. Empty text normalizes to `None`.
    #[must_use]
    pub fn caption(&self) -> Option<CaptionPlacement> {
        CaptionPlacement::new(
            self.caption_text.clone(),
            self.caption_position[0],
            self.caption_position[1],
        )
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Capture the render-relevant state at the current revision.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            placement: self.placement,
            caption: self.caption(),
            filter: self.filter,
            frame: self.frame.clone(),
            revision: self.revision,
        }
    }

    /// Whether a snapshot still reflects the latest state. A render produced
    /// from a stale snapshot must be discarded (last-writer-wins).
    #[must_use]
    pub fn is_current(&self, snapshot: &SessionSnapshot) -> bool {
        snapshot.revision == self.revision
    }

    // -- background-removal gate --

    /// Open the single removal slot. Fails while a submission is outstanding.
    pub fn begin_removal(&mut self) -> Result<(), SessionError> {
        if self.removal_in_flight {
            return Err(SessionError::RemovalInFlight);
        }
        self.removal_in_flight = true;
        Ok(())
    }

    /// Close the removal slot after its one outcome (success or error) has
    /// been surfaced.
    pub fn finish_removal(&mut self) {
        self.removal_in_flight = false;
    }

    #[must_use]
    pub fn removal_in_flight(&self) -> bool {
        self.removal_in_flight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::{MAX_SCALE, MIN_SCALE};

    #[test]
    fn every_edit_bumps_the_revision() {
        let mut s = EditSession::default();
        let r0 = s.revision();
        s.apply_drag(1.0, 2.0);
        s.apply_zoom(0.1);
        s.set_caption("hi");
        s.drag_caption(5.0, 5.0);
        s.set_filter(PhotoFilter::Sepia);
        s.select_frame("gold");
        assert_eq!(s.revision(), r0 + 6);
    }

    #[test]
    fn stale_snapshots_are_detected() {
        let mut s = EditSession::default();
        let snap = s.snapshot();
        assert!(s.is_current(&snap));

        s.apply_drag(1.0, 0.0);
        assert!(!s.is_current(&snap), "edits supersede in-flight renders");
        assert!(s.is_current(&s.snapshot()));
    }

    #[test]
    fn zoom_clamps_at_both_bounds() {
        let mut s = EditSession::default();
        for _ in 0..10 {
            s.apply_zoom(10.0);
        }
        assert_eq!(s.placement.scale, MAX_SCALE);
        for _ in 0..10 {
            s.apply_zoom(-10.0);
        }
        assert_eq!(s.placement.scale, MIN_SCALE);
    }

    #[test]
    fn reset_restores_defaults_from_any_state() {
        let mut s = EditSession::new([100.0, 400.0]);
        s.apply_drag(999.0, -999.0);
        s.apply_zoom(3.0);
        s.drag_caption(50.0, 60.0);

        s.reset();
        assert_eq!(s.placement, Placement::default());
        assert_eq!(s.caption_position, [100.0, 400.0]);
    }

    #[test]
    fn replace_photo_also_clears_the_caption_text() {
        let mut s = EditSession::default();
        s.set_caption("old photo caption");
        s.apply_drag(10.0, 10.0);
        s.select_frame("gold");

        s.replace_photo();
        assert!(s.caption().is_none());
        assert_eq!(s.placement, Placement::default());
        // Frame choice survives a re-upload
        assert_eq!(s.frame.as_deref(), Some("gold"));
    }

    #[test]
    fn empty_caption_text_yields_no_caption() {
        let mut s = EditSession::default();
        assert!(s.caption().is_none());
        s.set_caption("hello");
        assert!(s.caption().is_some());
        s.set_caption("");
        assert!(s.caption().is_none());
    }

    #[test]
    fn removal_slot_is_single_flight() {
        let mut s = EditSession::default();
        s.begin_removal().unwrap();
        assert_eq!(s.begin_removal(), Err(SessionError::RemovalInFlight));

        s.finish_removal();
        s.begin_removal().unwrap();
    }

    #[test]
    fn session_round_trips_through_json() {
        let mut s = EditSession::default();
        s.apply_drag(12.0, -7.0);
        s.apply_zoom(0.5);
        s.set_caption("Team 2026");
        s.select_frame("gold");
        s.set_filter(PhotoFilter::Grayscale);

        let json = serde_json::to_string(&s).unwrap();
        let loaded: EditSession = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded.placement, s.placement);
        assert_eq!(loaded.caption_text, "Team 2026");
        assert_eq!(loaded.frame.as_deref(), Some("gold"));
        assert_eq!(loaded.filter, PhotoFilter::Grayscale);
        // Runtime bookkeeping starts fresh
        assert_eq!(loaded.revision(), 0);
        assert!(!loaded.removal_in_flight());
    }
}
