//! Display state that is not part of the tree: zoom, pan offset, the pan
//! gesture and display toggles.

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Smallest zoom, in percent.
pub const ZOOM_MIN_PERCENT: u16 = 50;
/// Largest zoom, in percent.
pub const ZOOM_MAX_PERCENT: u16 = 200;
/// Zoom in/out increment, in percent.
pub const ZOOM_STEP_PERCENT: u16 = 10;
pub const ZOOM_DEFAULT_PERCENT: u16 = 100;

/// Zoom factor kept on an integer percent grid so that repeated steps land
/// exactly on 1.1, 1.2, ... instead of accumulating float error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Zoom(u16);

impl Zoom {
    /// Zoom at `percent`, clamped into the allowed range.
    pub fn from_percent(percent: u16) -> Self {
        Self(percent.clamp(ZOOM_MIN_PERCENT, ZOOM_MAX_PERCENT))
    }

    pub fn percent(self) -> u16 {
        self.0
    }

    pub fn factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn step_in(self) -> Self {
        Self::from_percent(self.0.saturating_add(ZOOM_STEP_PERCENT))
    }

    pub fn step_out(self) -> Self {
        Self::from_percent(self.0.saturating_sub(ZOOM_STEP_PERCENT))
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(ZOOM_DEFAULT_PERCENT)
    }
}

/// Translation of the chart in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    pub const ORIGIN: PanOffset = PanOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

/// Zoom, pan and display toggles of the chart surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    zoom: Zoom,
    pan: PanOffset,
    /// Last pointer position while a pan drag is active
    pan_anchor: Option<(f64, f64)>,
    pub show_images: bool,
    /// Expand/collapse buttons and node menus; hidden while exporting
    pub controls_visible: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: Zoom::default(),
            pan: PanOffset::ORIGIN,
            pan_anchor: None,
            show_images: true,
            controls_visible: true,
        }
    }
}

impl ViewState {
    pub fn new(show_images: bool) -> Self {
        Self {
            show_images,
            ..Self::default()
        }
    }

    pub fn zoom_factor(&self) -> f64 {
        self.zoom.factor()
    }

    pub fn zoom_percent(&self) -> u16 {
        self.zoom.percent()
    }

    pub fn pan(&self) -> PanOffset {
        self.pan
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }

    pub fn zoom_in(&mut self) {
        self.zoom = self.zoom.step_in();
        trace!("zoom_in: {}%", self.zoom.percent());
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.step_out();
        trace!("zoom_out: {}%", self.zoom.percent());
    }

    pub fn set_pan(&mut self, pan: PanOffset) {
        self.pan = pan;
    }

    /// Zoom back to 100% and pan back to the origin.
    pub fn reset(&mut self) {
        self.zoom = Zoom::default();
        self.pan = PanOffset::ORIGIN;
    }

    /// Start a pan drag. Only the left button pans.
    pub fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64) {
        if button == PointerButton::Left {
            self.pan_anchor = Some((x, y));
        }
    }

    /// Accumulate the delta since the last pointer position while panning.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if let Some((last_x, last_y)) = self.pan_anchor {
            self.pan.x += x - last_x;
            self.pan.y += y - last_y;
            self.pan_anchor = Some((x, y));
        }
    }

    pub fn pointer_up(&mut self) {
        self.pan_anchor = None;
    }

    /// Pointer left the chart surface; ends any pan drag.
    pub fn pointer_leave(&mut self) {
        self.pan_anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_zoom_out_below_minimum_then_clamps_at_half() {
        let mut view = ViewState::default();
        for _ in 0..20 {
            view.zoom_out();
        }
        assert_eq!(view.zoom_factor(), 0.5);
    }

    #[test]
    fn given_right_button_drag_then_pan_is_unchanged() {
        let mut view = ViewState::default();
        view.pointer_down(PointerButton::Right, 10.0, 10.0);
        view.pointer_move(50.0, 60.0);
        assert!(!view.is_panning());
        assert_eq!(view.pan(), PanOffset::ORIGIN);
    }

    #[test]
    fn given_left_drag_then_pan_accumulates_deltas() {
        let mut view = ViewState::default();
        view.pointer_down(PointerButton::Left, 10.0, 10.0);
        view.pointer_move(15.0, 20.0);
        view.pointer_move(25.0, 18.0);
        view.pointer_leave();
        view.pointer_move(100.0, 100.0);

        assert_eq!(view.pan(), PanOffset::new(15.0, 8.0));
    }

    #[test]
    fn given_zoomed_and_panned_view_when_reset_then_back_to_origin_at_full_size() {
        let mut view = ViewState::new(false);
        view.zoom_in();
        view.zoom_in();
        view.pointer_down(PointerButton::Left, 0.0, 0.0);
        view.pointer_move(30.0, 40.0);
        view.pointer_up();

        view.reset();

        assert_eq!(view.zoom_percent(), ZOOM_DEFAULT_PERCENT);
        assert_eq!(view.pan(), PanOffset::ORIGIN);
        assert!(!view.show_images);
    }
}
