//! Overlay widget state machine
//!
//! Pure state: opacity, text, enabled/visible flags, the in-flight fade and
//! the auto-hide deadline. The shell feeds it `Instant`s and parent sizes;
//! it never touches the display server, so the whole lifecycle is testable
//! without a compositor.

use std::time::{Duration, Instant};

use crate::overlay::animation::FadeAnimation;
use crate::overlay::PANEL_OPACITY;

/// Transient status panel centered over a parent view.
///
/// Two steady states (hidden, visible) joined by two animated transitions
/// (fade-in, fade-out), plus an optional timer-driven transition back to
/// hidden. Visibility is driven by the opacity value itself: exactly 0.0
/// hides, any positive value shows.
#[derive(Debug)]
pub struct OverlayWidget {
    opacity: f32,
    text: String,
    enabled: bool,
    visible: bool,
    pos: (i32, i32),
    size: (u32, u32),
    fade: Option<FadeAnimation>,
    hide_at: Option<Instant>,
    needs_paint: bool,
}

impl OverlayWidget {
    pub fn new(width: u32, height: u32) -> Self {
        let mut widget = Self {
            opacity: 0.0,
            text: String::new(),
            enabled: true,
            visible: false,
            pos: (0, 0),
            size: (width, height),
            fade: None,
            hide_at: None,
            needs_paint: false,
        };
        widget.set_opacity(0.0);
        widget
    }

    /// Store a new opacity and apply the visibility rules.
    ///
    /// Exactly 0.0 hides a visible widget, any positive value shows a hidden
    /// one, and every call requests a repaint. The value is stored verbatim;
    /// out-of-range values are only clamped when painting.
    pub fn set_opacity(&mut self, value: f32) {
        self.opacity = value;

        if self.opacity == 0.0 && self.visible {
            self.visible = false;
        } else if self.opacity > 0.0 && !self.visible {
            self.visible = true;
        }

        self.needs_paint = true;
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Store the status text. Takes effect on the next paint cycle; no
    /// repaint is requested here.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Fade in to full opacity, optionally arming the auto-hide timer.
    ///
    /// Replaces any in-flight fade with one running from the current opacity
    /// to 1.0. A `timeout_secs` of 0 leaves a previously armed deadline
    /// untouched, so it can still fire.
    pub fn show(&mut self, now: Instant, timeout_secs: u64) {
        if !self.enabled {
            return;
        }

        self.fade = Some(FadeAnimation::new(now, self.opacity, 1.0));

        if timeout_secs > 0 {
            self.hide_at = Some(now + Duration::from_secs(timeout_secs));
        }
    }

    /// Fade out to zero opacity.
    ///
    /// The widget only becomes invisible once the fade actually reaches
    /// exactly 0.0 and `set_opacity` clears the visibility flag.
    pub fn hide(&mut self, now: Instant) {
        if !self.enabled {
            return;
        }

        self.fade = Some(FadeAnimation::new(now, self.opacity, 0.0));
    }

    /// Whether the widget counts as shown to its owner.
    ///
    /// Compares against the panel fill alpha constant, not the 1.0 fade
    /// target, so this is only true when the owner set 0.70 directly.
    pub fn shown(&self) -> bool {
        if !self.enabled {
            return false;
        }

        self.opacity == PANEL_OPACITY
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Advance the fade and fire the auto-hide deadline.
    pub fn tick(&mut self, now: Instant) {
        if let Some(fade) = self.fade {
            let (value, complete) = fade.tick(now);
            self.set_opacity(value);
            if complete {
                self.fade = None;
            }
        }

        if self.hide_at.is_some_and(|at| now >= at) {
            self.hide_at = None;
            self.hide(now);
        }
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// True once a fade-out has run to completion and nothing is pending.
    pub fn faded_out(&self) -> bool {
        !self.visible && self.fade.is_none() && self.hide_at.is_none()
    }

    /// Re-center over the parent. Returns true if the widget had to move, in
    /// which case the caller must defer drawing to the next paint cycle.
    pub fn sync_center(&mut self, parent_width: u32, parent_height: u32) -> bool {
        let (w, h) = self.size;
        let center = (
            (parent_width as i32 - w as i32) / 2,
            (parent_height as i32 - h as i32) / 2,
        );

        if center != self.pos {
            self.pos = center;
            self.needs_paint = true;
            return true;
        }

        false
    }

    pub fn position(&self) -> (i32, i32) {
        self.pos
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn needs_paint(&self) -> bool {
        self.needs_paint
    }

    pub fn request_paint(&mut self) {
        self.needs_paint = true;
    }

    pub fn mark_painted(&mut self) {
        self.needs_paint = false;
    }
}
