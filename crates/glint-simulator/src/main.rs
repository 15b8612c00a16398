//! Desktop simulator for the glint widget engine.
//!
//! Builds a small demo screen (a counter with a few buttons) and renders it
//! in an SDL2 window via `embedded-graphics-simulator`. The mouse stands in
//! for the touch panel: holding the left button is a finger on the glass.
//!
//! Pass a path to a postcard-encoded `DisplayConfig` as the first argument to
//! start with a stored configuration.
//!
//! # Key bindings
//!
//! | Key | Action                          |
//! |-----|---------------------------------|
//! | T   | Swap between dark/light palette |
//! | S   | Save the config to `glint.cfg`  |
//! | R   | Force a full repaint            |
//! | Q   | Quit                            |

use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window, sdl2::Keycode,
};
use log::{info, warn};

use glint::{
    Button, ColorRole, Display, DisplayConfig, FrameBuffer, Label, Owner, Palette, Panel,
    TextSize, ThemeKind, TouchPoint, WidgetId, WidgetResult,
};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Where the `S` key writes the current configuration.
const CONFIG_PATH: &str = "glint.cfg";

// ---------------------------------------------------------------------------
// Demo screen
// ---------------------------------------------------------------------------

/// Handles of the demo widgets the main loop reacts to.
struct DemoScreen {
    screen: WidgetId,
    counter: WidgetId,
    status: WidgetId,
    increment: WidgetId,
    reset: WidgetId,
    toggle: WidgetId,
    count: u32,
}

fn place(
    display: &mut Display<FrameBuffer>,
    id: WidgetId,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
) -> WidgetResult<()> {
    display
        .widget_mut(id)?
        .set_bounds(Rectangle::new(Point::new(x, y), Size::new(width, height)));
    Ok(())
}

impl DemoScreen {
    fn build(display: &mut Display<FrameBuffer>) -> WidgetResult<Self> {
        let bounds = display.bounds();

        let screen = display.create_widget(Panel::new().with_frame(true));
        display.widget_mut(screen)?.set_bounds(bounds);
        display.set_owns_widgets(Owner::Widget(screen), true)?;

        let title = display.create_widget(Label::new("glint demo").with_size(TextSize::Large));
        place(display, title, 10, 10, bounds.size.width - 20, 28)?;

        let counter = display.create_widget(
            Label::new("0")
                .with_size(TextSize::Large)
                .with_frame(true),
        );
        place(display, counter, 10, 50, bounds.size.width - 20, 44)?;

        let increment = display.create_widget(Button::new("+1"));
        place(display, increment, 10, 110, 90, 40)?;
        let reset = display.create_widget(Button::new("Reset"));
        place(display, reset, 115, 110, 90, 40)?;
        let toggle = display.create_widget(Button::new("Hide"));
        place(display, toggle, 220, 110, 90, 40)?;

        let status = display.create_widget(Label::new("Ready").with_size(TextSize::Small));
        place(
            display,
            status,
            10,
            bounds.size.height as i32 - 26,
            bounds.size.width - 20,
            16,
        )?;

        for child in [title, counter, increment, reset, toggle, status] {
            display.add_child(screen, child)?;
        }
        display.add_widget(screen)?;

        Ok(Self {
            screen,
            counter,
            status,
            increment,
            reset,
            toggle,
            count: 0,
        })
    }

    fn clicked(display: &mut Display<FrameBuffer>, id: WidgetId) -> WidgetResult<bool> {
        let clicked = display
            .widget_mut(id)?
            .kind_mut()
            .as_button_mut()
            .is_some_and(|button| button.take_clicked());
        Ok(clicked)
    }

    /// React to button clicks latched during the last tick.
    fn handle_clicks(&mut self, display: &mut Display<FrameBuffer>) -> WidgetResult<()> {
        if Self::clicked(display, self.increment)? {
            self.count += 1;
            self.show_count(display)?;
        }

        if Self::clicked(display, self.reset)? {
            self.count = 0;
            self.show_count(display)?;
            display.widget_mut(self.status)?.set_text("Counter reset")?;
        }

        if Self::clicked(display, self.toggle)? {
            let counter = display.widget_mut(self.counter)?;
            let visible = !counter.is_visible();
            counter.set_visible(visible);

            let (button_text, status_text) = if visible {
                ("Hide", "Counter shown")
            } else {
                ("Show", "Counter hidden")
            };
            display.widget_mut(self.toggle)?.set_text(button_text)?;
            display.widget_mut(self.status)?.set_text(status_text)?;
        }

        Ok(())
    }

    fn show_count(&self, display: &mut Display<FrameBuffer>) -> WidgetResult<()> {
        let text = format!("{}", self.count);
        display.widget_mut(self.counter)?.set_text(&text)
    }

    /// Repaint the whole screen with another palette.
    fn apply_palette(&self, display: &mut Display<FrameBuffer>, palette: &Palette) -> WidgetResult<()> {
        for role in ColorRole::ALL {
            display.set_color(self.screen, role, palette.get(role))?;
        }
        Ok(())
    }
}

fn load_config() -> DisplayConfig {
    let Some(path) = std::env::args().nth(1) else {
        return DisplayConfig::default();
    };

    match std::fs::read(&path) {
        Ok(bytes) => match DisplayConfig::from_bytes(&bytes) {
            Ok(config) => {
                info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                warn!("Ignoring {}: {}", path, e);
                DisplayConfig::default()
            }
        },
        Err(e) => {
            warn!("Cannot read {}: {}", path, e);
            DisplayConfig::default()
        }
    }
}

fn save_config(config: &DisplayConfig) {
    match config.to_bytes() {
        Ok(bytes) => match std::fs::write(CONFIG_PATH, bytes) {
            Ok(()) => info!("Saved config to {}", CONFIG_PATH),
            Err(e) => warn!("Cannot write {}: {}", CONFIG_PATH, e),
        },
        Err(e) => warn!("Cannot encode config: {}", e),
    }
}

fn touch_point(point: Point) -> TouchPoint {
    TouchPoint::new(point.x.max(0) as u16, point.y.max(0) as u16)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> WidgetResult<()> {
    env_logger::init();
    info!("Starting glint simulator");

    let mut config = load_config();
    info!(
        "Display: {}×{} (scale {}×), theme {:?}",
        config.width, config.height, WINDOW_SCALE, config.theme
    );
    info!("Keys: T=Theme  S=Save config  R=Repaint  Q=Quit");

    // SDL2 display and window
    let mut sim_display = SimulatorDisplay::<Rgb565>::new(config.size());
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Glint Simulator", &output_settings);

    let mut display = Display::with_config(FrameBuffer::from_config(&config), config);
    let mut demo = DemoScreen::build(&mut display)?;

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    display.tick();
    let _ = display.canvas_mut().flush(&mut sim_display);
    window.update(&sim_display);

    let mut finger: Option<TouchPoint> = None;

    // -----------------------------------------------------------------------
    // Main loop
    // -----------------------------------------------------------------------
    'running: loop {
        let frame_start = Instant::now();
        let mut force_redraw = false;

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,

                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => break 'running,
                    Keycode::T => {
                        config.theme = match config.theme {
                            ThemeKind::Dark => ThemeKind::Light,
                            ThemeKind::Light => ThemeKind::Dark,
                        };
                        info!("Switching to {:?} theme", config.theme);
                        demo.apply_palette(&mut display, &config.theme.palette())?;
                    }
                    Keycode::S => save_config(&config),
                    Keycode::R => force_redraw = true,
                    _ => {}
                },

                SimulatorEvent::MouseButtonDown { point, .. } => finger = Some(touch_point(point)),
                SimulatorEvent::MouseMove { point } if finger.is_some() => {
                    finger = Some(touch_point(point));
                }
                SimulatorEvent::MouseButtonUp { .. } => finger = None,

                _ => {}
            }
        }

        // --- Widget tick --------------------------------------------------
        display.set_touch(finger);
        display.update_widgets(true, true, force_redraw);
        demo.handle_clicks(&mut display)?;

        // --- Render -------------------------------------------------------
        let _ = display.canvas_mut().flush(&mut sim_display);
        window.update(&sim_display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    display.clear_silent();
    info!("Simulator exiting ({} clicks counted)", demo.count);
    Ok(())
}
