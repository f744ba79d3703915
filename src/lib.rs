//! tempo-osd - Transient status overlay for the Tempo music player
//!
//! This crate contains:
//! - The overlay widget state machine (opacity-driven visibility, fade
//!   animations, auto-hide timeout)
//! - Text layout (word wrap and shrink-to-fit against real font metrics)
//! - Panel painting with tiny-skia
//! - Wayland layer-shell integration and the frame-tick loop
//! - Configuration and logging setup
//!
//! The player shell embeds [`OverlayWidget`] (and the render/layout pieces)
//! directly; the `tempo-osd` binary shows a single message standalone.

pub mod config;
pub mod logger;
pub mod overlay;

pub use crate::config::Config;
pub use crate::overlay::widget::OverlayWidget;
