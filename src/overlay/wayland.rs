//! Wayland layer-shell integration
//!
//! The layer surface is anchored to all four edges with a zero requested
//! size, so the compositor hands us the output's work area in `configure`.
//! That area is the widget's parent view: the widget re-centers against it
//! every paint cycle.

use anyhow::{anyhow, Result};
use smithay_client_toolkit::{
    compositor::{CompositorHandler, CompositorState},
    delegate_compositor, delegate_layer, delegate_output, delegate_registry, delegate_shm,
    output::{OutputHandler, OutputState},
    registry::{ProvidesRegistryState, RegistryState},
    registry_handlers,
    shell::{
        wlr_layer::{
            Anchor, KeyboardInteractivity, Layer, LayerShell, LayerShellHandler, LayerSurface,
            LayerSurfaceConfigure,
        },
        WaylandSurface,
    },
    shm::{slot::SlotPool, Shm, ShmHandler},
};
use std::time::Instant;
use tracing::{debug, warn};
use wayland_client::{
    protocol::{wl_buffer::WlBuffer, wl_output, wl_shm, wl_surface},
    Connection, QueueHandle,
};

use crate::config::Config;
use crate::overlay::layout::LoadedFont;
use crate::overlay::{render, widget::OverlayWidget};

pub struct OverlayApp {
    // Registry state
    registry_state: RegistryState,
    output_state: OutputState,
    compositor_state: CompositorState,
    shm: Shm,
    layer_shell: LayerShell,

    // Overlay state
    widget: OverlayWidget,
    font: LoadedFont,
    exit_when_hidden: bool,
    was_shown: bool,

    // Wayland surface
    layer_surface: Option<LayerSurface>,
    pool: Option<SlotPool>,
    parent_width: u32,
    parent_height: u32,
    need_frame: bool,
    configured: bool,
    pub exit: bool,
}

impl OverlayApp {
    pub fn new(
        globals: wayland_client::globals::GlobalList,
        qh: &QueueHandle<Self>,
        config: &Config,
        font: LoadedFont,
        exit_when_hidden: bool,
    ) -> Result<Self> {
        let registry_state = RegistryState::new(&globals);
        let output_state = OutputState::new(&globals, qh);
        let compositor_state = CompositorState::bind(&globals, qh)?;
        let shm = Shm::bind(&globals, qh)?;
        let layer_shell = LayerShell::bind(&globals, qh)?;

        Ok(Self {
            registry_state,
            output_state,
            compositor_state,
            shm,
            layer_shell,
            widget: OverlayWidget::new(config.panel_width, config.panel_height),
            font,
            exit_when_hidden,
            was_shown: false,
            layer_surface: None,
            pool: None,
            parent_width: 0,
            parent_height: 0,
            need_frame: false,
            configured: false,
            exit: false,
        })
    }

    pub fn widget(&mut self) -> &mut OverlayWidget {
        &mut self.widget
    }

    pub fn create_layer_surface(&mut self, qh: &QueueHandle<Self>) -> Result<()> {
        let surface = self.compositor_state.create_surface(qh);

        let layer_surface = self.layer_shell.create_layer_surface(
            qh,
            surface,
            Layer::Overlay,
            Some("tempo-osd"),
            None, // compositor chooses the output
        );

        // Anchor to every edge and let the compositor size us to the work
        // area, which stands in for the parent view.
        layer_surface.set_anchor(Anchor::TOP | Anchor::BOTTOM | Anchor::LEFT | Anchor::RIGHT);
        layer_surface.set_keyboard_interactivity(KeyboardInteractivity::None);
        layer_surface.set_size(0, 0);
        layer_surface.set_exclusive_zone(0);

        layer_surface.wl_surface().commit();

        self.layer_surface = Some(layer_surface);

        Ok(())
    }

    /// Advance animations and the auto-hide deadline, and track the exit
    /// condition for one-shot runs.
    pub fn tick(&mut self, now: Instant) {
        self.widget.tick(now);

        if self.widget.visible() {
            self.was_shown = true;
        }
        if self.exit_when_hidden && self.was_shown && self.widget.faded_out() {
            self.exit = true;
        }
    }

    pub fn should_draw(&self) -> bool {
        self.configured && (self.need_frame || self.widget.needs_paint() || self.widget.is_fading())
    }

    pub fn draw(&mut self, _qh: &QueueHandle<Self>) -> Result<()> {
        let Some(layer_surface) = &self.layer_surface else {
            return Ok(());
        };
        if self.parent_width == 0 || self.parent_height == 0 {
            return Ok(());
        }

        // Re-center first; if the widget moved, drawing waits for the next
        // paint cycle.
        if self.widget.sync_center(self.parent_width, self.parent_height) {
            return Ok(());
        }

        if self.pool.is_none() {
            let pool = SlotPool::new((self.parent_width * self.parent_height * 4) as usize, &self.shm)?;
            self.pool = Some(pool);
        }
        let pool = self.pool.as_mut().ok_or_else(|| anyhow!("buffer pool missing"))?;

        let mut pixmap = tiny_skia::Pixmap::new(self.parent_width, self.parent_height)
            .ok_or_else(|| anyhow!("failed to create pixmap"))?;

        if self.widget.visible() {
            let face = self.font.face()?;
            render::draw_widget(&mut pixmap, &self.widget, &face);
        }

        let (buffer, canvas) = pool.create_buffer(
            self.parent_width as i32,
            self.parent_height as i32,
            (self.parent_width * 4) as i32,
            wl_shm::Format::Argb8888,
        )?;

        // Premultiplied RGBA to little-endian ARGB.
        for (dst, src) in canvas
            .chunks_exact_mut(4)
            .zip(pixmap.data().chunks_exact(4))
        {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            dst[3] = src[3];
        }

        let wl_buffer: &WlBuffer = buffer.wl_buffer();
        layer_surface.wl_surface().attach(Some(wl_buffer), 0, 0);
        layer_surface.wl_surface().damage_buffer(
            0,
            0,
            self.parent_width as i32,
            self.parent_height as i32,
        );
        layer_surface.wl_surface().commit();

        self.need_frame = false;
        self.widget.mark_painted();
        Ok(())
    }
}

delegate_compositor!(OverlayApp);
delegate_output!(OverlayApp);
delegate_shm!(OverlayApp);
delegate_layer!(OverlayApp);
delegate_registry!(OverlayApp);

impl CompositorHandler for OverlayApp {
    fn scale_factor_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_factor: i32,
    ) {
    }

    fn frame(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _time: u32,
    ) {
        self.need_frame = true;
    }

    fn transform_changed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _new_transform: wl_output::Transform,
    ) {
    }

    fn surface_enter(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }

    fn surface_leave(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _surface: &wl_surface::WlSurface,
        _output: &wl_output::WlOutput,
    ) {
    }
}

impl OutputHandler for OverlayApp {
    fn output_state(&mut self) -> &mut OutputState {
        &mut self.output_state
    }

    fn new_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn update_output(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }

    fn output_destroyed(
        &mut self,
        _conn: &Connection,
        _qh: &QueueHandle<Self>,
        _output: wl_output::WlOutput,
    ) {
    }
}

impl LayerShellHandler for OverlayApp {
    fn closed(&mut self, _conn: &Connection, _qh: &QueueHandle<Self>, _layer: &LayerSurface) {
        self.exit = true;
    }

    fn configure(
        &mut self,
        _conn: &Connection,
        qh: &QueueHandle<Self>,
        _layer: &LayerSurface,
        configure: LayerSurfaceConfigure,
        _serial: u32,
    ) {
        let (width, height) = configure.new_size;
        if width > 0 && height > 0 && (width, height) != (self.parent_width, self.parent_height) {
            debug!(width, height, "parent area configured");
            self.parent_width = width;
            self.parent_height = height;
            self.pool = None;
        }

        self.configured = true;
        self.need_frame = true;

        if let Err(err) = self.draw(qh) {
            warn!("initial draw failed: {err}");
        }
    }
}

impl ShmHandler for OverlayApp {
    fn shm_state(&mut self) -> &mut Shm {
        &mut self.shm
    }
}

impl ProvidesRegistryState for OverlayApp {
    fn registry(&mut self) -> &mut RegistryState {
        &mut self.registry_state
    }
    registry_handlers![OutputState];
}
