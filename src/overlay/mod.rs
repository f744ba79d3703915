//! Transient status overlay
//!
//! A semi-transparent rounded panel centered over the player's screen area,
//! showing short status text with fade-in/fade-out and an optional auto-hide
//! timeout. The widget state machine is pure; the Wayland layer-shell glue
//! and the frame-tick loop live here.

pub mod animation;
pub mod layout;
pub mod render;
pub mod wayland;
pub mod widget;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{info, warn};
use wayland_client::{globals::registry_queue_init, Connection};

use crate::config::Config;
use crate::overlay::layout::LoadedFont;
use crate::overlay::wayland::OverlayApp;

/// Corner radius of the panel, in pixels.
pub const CORNER_ROUNDNESS: f32 = 8.0;
/// Duration of both fade transitions.
pub const FADING_DURATION: Duration = Duration::from_millis(500);
/// Starting point size for the status text.
pub const BASE_FONT_PT: u16 = 16;
/// The shrink-to-fit loop never goes below this.
pub const MIN_FONT_PT: u16 = 4;
/// Alpha of the panel fill; also the value `shown()` compares against.
pub const PANEL_OPACITY: f32 = 0.70;
/// Padding between the panel edge and the text.
pub const TEXT_INSET: f32 = 8.0;
/// Default panel geometry.
pub const PANEL_WIDTH: u32 = 380;
pub const PANEL_HEIGHT: u32 = 128;
/// Frame-tick interval of the event loop (~60 fps).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Show `text` in the overlay until it fades back out.
///
/// With a non-zero `timeout_secs` the overlay auto-hides and this returns
/// once the fade-out completes; with 0 it stays up until the compositor
/// closes the surface.
pub fn run(config: &Config, text: &str, timeout_secs: u64) -> Result<()> {
    let font = LoadedFont::load(config.font_family.as_deref())?;

    let conn = Connection::connect_to_env().context("failed to connect to Wayland display")?;
    let (globals, mut event_queue) =
        registry_queue_init(&conn).context("failed to initialize Wayland registry")?;
    let qh = event_queue.handle();

    let exit_when_hidden = timeout_secs > 0;
    let mut app = OverlayApp::new(globals, &qh, config, font, exit_when_hidden)?;
    app.create_layer_surface(&qh)?;

    // Wait for the first configure so the parent size is known.
    event_queue.blocking_dispatch(&mut app)?;
    event_queue.flush()?;

    info!(timeout_secs, "showing overlay");
    app.widget().set_text(text);
    app.widget().show(Instant::now(), timeout_secs);

    loop {
        app.tick(Instant::now());

        if app.should_draw() {
            if let Err(err) = app.draw(&qh) {
                warn!("draw failed: {err}");
            }
        }

        event_queue.dispatch_pending(&mut app)?;
        event_queue.flush()?;

        if app.exit {
            break;
        }

        std::thread::sleep(FRAME_INTERVAL);
    }

    info!("overlay closed");
    Ok(())
}
