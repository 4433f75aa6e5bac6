//! The terminal host: window chrome, input handling and the event loop.

use std::time::{Duration, Instant};

use gitscape_diagram::{
    DiagramEvent, DiagramNode, DiagramRenderer, Point, RepoRef, ViewControl, Viewport,
};

use crate::buffer::Buffer;
use crate::error::AppError;
use crate::event::{Command, Input, Pointer};
use crate::raster::{self, Area, CellMetrics, ControlRegion, HitMap};
use crate::settings::Settings;
use crate::terminal::Terminal;
use crate::theme::Theme;

/// Redraw interval while something animates.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Poll timeout while idle.
const IDLE_INTERVAL: Duration = Duration::from_millis(250);

const OVERLAY_MESSAGE: &str = "Initializing Diagram...";
const HELP: &str =
    "click: open/toggle  drag: pan  wheel/+/-: zoom  e: expand  c: collapse  f: fullscreen  q: quit";
const FULLSCREEN_HELP: &str =
    "click: open/toggle  drag: pan  wheel/+/-: zoom  e: expand  c: collapse  esc: exit fullscreen  q: quit";

/// A left button press that has not been released yet.
#[derive(Debug, Clone, Copy)]
struct Press {
    last: (u16, u16),
    dragged: bool,
}

pub struct App {
    renderer: DiagramRenderer,
    repo: RepoRef,
    metrics: CellMetrics,
    zoom_step: f32,
    pan_step: u16,
    theme: Theme,
    size: (u16, u16),
    hits: HitMap,
    controls: Vec<ControlRegion>,
    press: Option<Press>,
    hovered: Option<String>,
    quit: bool,
}

impl App {
    pub fn new(
        settings: Settings,
        root: DiagramNode,
        repo: RepoRef,
        size: (u16, u16),
        now: Instant,
    ) -> Self {
        let Settings {
            diagram,
            cell_width,
            cell_height,
            zoom_step,
            pan_step,
        } = settings;
        let mut app = Self {
            renderer: DiagramRenderer::new(diagram),
            repo: repo.clone(),
            metrics: CellMetrics {
                width: cell_width,
                height: cell_height,
            },
            zoom_step,
            pan_step,
            theme: Theme::default(),
            size,
            hits: HitMap::default(),
            controls: Vec::new(),
            press: None,
            hovered: None,
            quit: false,
        };
        let viewport = app.viewport();
        app.renderer.initialize(root, repo, viewport, now);
        app
    }

    pub fn renderer(&self) -> &DiagramRenderer {
        &self.renderer
    }

    pub fn pan_step(&self) -> u16 {
        self.pan_step
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Cells the diagram is drawn into. The normal container sits inside a
    /// border; fullscreen takes everything between toolbar and status line.
    pub fn diagram_area(&self) -> Area {
        let (width, height) = self.size;
        if self.renderer.is_fullscreen() {
            Area::new(0, 1, width, height.saturating_sub(2))
        } else {
            Area::new(1, 2, width.saturating_sub(2), height.saturating_sub(4))
        }
    }

    fn frame_area(&self) -> Area {
        let (width, height) = self.size;
        Area::new(0, 1, width, height.saturating_sub(2))
    }

    fn viewport(&self) -> Viewport {
        let area = self.diagram_area();
        Viewport::new(
            area.width as f32 * self.metrics.width,
            area.height as f32 * self.metrics.height,
        )
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Apply one input. Returns an event the host has to carry out.
    pub fn handle(&mut self, input: Input, now: Instant) -> Option<DiagramEvent> {
        match input {
            Input::Command(command) => self.command(command, now),
            Input::Pointer(pointer) => self.pointer(pointer, now),
            Input::Resize { width, height } => {
                self.size = (width, height);
                let viewport = self.viewport();
                self.renderer.resize(viewport, now);
                None
            }
        }
    }

    fn command(&mut self, command: Command, now: Instant) -> Option<DiagramEvent> {
        match command {
            Command::Quit => {
                self.quit = true;
                None
            }
            Command::ExpandAll => self.renderer.activate_control(ViewControl::ExpandAll, now),
            Command::CollapseAll => self.renderer.activate_control(ViewControl::CollapseAll, now),
            Command::Maximize => self.renderer.activate_control(ViewControl::Maximize, now),
            Command::ExitFullscreen => {
                self.set_fullscreen(false, now);
                None
            }
            Command::Pan { dx, dy } => {
                self.renderer.pan(
                    dx as f32 * self.metrics.width,
                    dy as f32 * self.metrics.height,
                );
                None
            }
            Command::Zoom { zoom_in } => {
                let anchor = self.viewport().center();
                self.renderer.zoom_at(self.zoom_factor(zoom_in), anchor);
                None
            }
        }
    }

    fn pointer(&mut self, pointer: Pointer, now: Instant) -> Option<DiagramEvent> {
        match pointer {
            Pointer::Press { x, y } => {
                if let Some(region) = self.controls.iter().find(|r| r.contains(x, y)) {
                    let control = region.control;
                    return self.renderer.activate_control(control, now);
                }
                if self.diagram_area().contains(x, y) {
                    self.press = Some(Press {
                        last: (x, y),
                        dragged: false,
                    });
                }
                None
            }
            Pointer::Drag { x, y } => {
                if let Some(press) = self.press.as_mut() {
                    let dx = x as f32 - press.last.0 as f32;
                    let dy = y as f32 - press.last.1 as f32;
                    if dx != 0.0 || dy != 0.0 {
                        press.last = (x, y);
                        press.dragged = true;
                        self.renderer
                            .pan(dx * self.metrics.width, dy * self.metrics.height);
                    }
                }
                None
            }
            Pointer::Release { x, y } => {
                let press = self.press.take()?;
                if press.dragged {
                    return None;
                }
                let id = self.node_at(x, y, now)?;
                self.renderer.click_node(&id, now)
            }
            Pointer::Move { x, y } => {
                self.hovered = self.node_at(x, y, now);
                None
            }
            Pointer::Wheel { x, y, zoom_in } => {
                let area = self.diagram_area();
                if area.contains(x, y) {
                    let anchor = area.to_surface(x, y, self.metrics);
                    self.renderer.zoom_at(self.zoom_factor(zoom_in), anchor);
                }
                None
            }
        }
    }

    fn zoom_factor(&self, zoom_in: bool) -> f32 {
        if zoom_in {
            self.zoom_step
        } else {
            1.0 / self.zoom_step
        }
    }

    /// Node under cell `(x, y)`: its label or marker as last painted, else
    /// the nearest marker within about one cell.
    fn node_at(&self, x: u16, y: u16, now: Instant) -> Option<String> {
        let area = self.diagram_area();
        if !area.contains(x, y) {
            return None;
        }
        if let Some(id) = self.hits.at(x, y) {
            return Some(id.to_string());
        }
        let radius = self.metrics.width.max(self.metrics.height) * 0.6;
        self.renderer
            .hit_test(area.to_surface(x, y, self.metrics), radius, now)
            .map(str::to_string)
    }

    // -------------------------------------------------------------------------
    // Host events
    // -------------------------------------------------------------------------

    /// Carry out an event raised by the renderer.
    pub fn perform(&mut self, event: DiagramEvent, now: Instant) {
        match event {
            DiagramEvent::OpenExternal { url } => {
                log::info!("opening {url}");
                if let Err(e) = open::that_detached(&url) {
                    log::error!("failed to open {url}: {e}");
                }
            }
            DiagramEvent::RequestFullscreen {
                display_name,
                branch,
                ..
            } => {
                log::info!("fullscreen for {display_name} at {branch}");
                self.set_fullscreen(true, now);
            }
        }
    }

    /// Move the same renderer into the other container.
    fn set_fullscreen(&mut self, fullscreen: bool, now: Instant) {
        if self.renderer.is_fullscreen() == fullscreen {
            return;
        }
        self.renderer.set_fullscreen(fullscreen);
        self.press = None;
        let viewport = self.viewport();
        self.renderer.resize(viewport, now);
    }

    // -------------------------------------------------------------------------
    // Drawing
    // -------------------------------------------------------------------------

    /// Retire finished transitions. True while anything still moves.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.renderer.tick(now)
    }

    pub fn paint(&mut self, buf: &mut Buffer, now: Instant) {
        let (width, height) = (buf.width(), buf.height());
        if (width, height) != self.size {
            self.size = (width, height);
            let viewport = self.viewport();
            self.renderer.resize(viewport, now);
        }
        if width == 0 || height == 0 {
            return;
        }

        let title = format!("gitscape  {}  {}", self.repo.display_name, self.repo.branch);
        let controls: Vec<(ViewControl, bool)> = ViewControl::ALL
            .iter()
            .map(|&control| (control, self.renderer.control_enabled(control)))
            .collect();
        self.controls = raster::paint_toolbar(buf, 0, &title, &controls, &self.theme);

        let frame_area = self.frame_area();
        buf.fill(
            frame_area.x as i32,
            frame_area.y as i32,
            frame_area.width,
            frame_area.height,
            self.theme.background,
        );
        if !self.renderer.is_fullscreen() {
            raster::paint_border(buf, frame_area, "Repository structure", &self.theme);
        }

        let area = self.diagram_area();
        let frame = self.renderer.frame(now);
        let status = if self.renderer.is_initialized() {
            self.hits = raster::paint_diagram(buf, area, &frame, self.metrics, &self.theme);
            let hovered = self.hovered.as_deref().and_then(|id| {
                frame
                    .nodes
                    .iter()
                    .find(|node| node.id == id)
                    .map(|node| node.style.tooltip.clone())
            });
            hovered.unwrap_or_else(|| self.help().to_string())
        } else {
            self.hits = HitMap::default();
            raster::paint_overlay(buf, area, OVERLAY_MESSAGE, &self.theme);
            self.help().to_string()
        };

        if height > 1 {
            raster::paint_status(buf, height - 1, &status, &self.theme);
        }
    }

    fn help(&self) -> &'static str {
        if self.renderer.is_fullscreen() {
            FULLSCREEN_HELP
        } else {
            HELP
        }
    }
}

/// Draw, wait for input, apply it; until the user quits.
pub fn run(terminal: &mut Terminal, app: &mut App) -> Result<(), AppError> {
    loop {
        let now = Instant::now();
        let animating = app.tick(now);
        terminal.draw(|buf| app.paint(buf, now))?;

        let timeout = if animating {
            FRAME_INTERVAL
        } else {
            IDLE_INTERVAL
        };
        for event in terminal.poll(timeout)? {
            let Some(input) = Input::from_crossterm(&event, app.pan_step()) else {
                continue;
            };
            let now = Instant::now();
            if let Some(outward) = app.handle(input, now) {
                app.perform(outward, now);
            }
        }

        if app.should_quit() {
            log::info!("quit");
            return Ok(());
        }
    }
}
