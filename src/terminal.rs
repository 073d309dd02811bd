// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based capture screen
//!
//! Renders the viewfinder and the preview to the terminal using Unicode
//! half-block characters for improved vertical resolution. Key presses are
//! turned into controller messages; everything shown comes from the latest
//! published [`Snapshot`].

use crate::app::{AccessState, AppModel, CaptureView, Message, Runtime, RuntimeHandle, Snapshot};
use crate::backends::camera::{CameraDevice, MediaReference, SyntheticCamera};
use crate::config::Config;
use crate::constants::{TimerSetting, timing, zoom};
use crate::storage::MediaLibrary;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use image::RgbImage;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::{error, info};

/// Pinch scale sent by the `[` and `]` keys
const KEY_PINCH_SCALE: f32 = 1.1;

/// Run the terminal capture screen
pub fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    let camera = SyntheticCamera::from_config(&config);
    let library = MediaLibrary::from_config(&config);
    let model = AppModel::new(config, Arc::new(camera.clone()), Arc::new(library));
    let (runtime, handle) = Runtime::new(model);
    let session = rt.spawn(runtime.run());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &handle, &camera);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    handle.shutdown();
    if let Err(e) = rt.block_on(session) {
        error!(error = %e, "Capture runtime ended abnormally");
    }

    result
}

/// Front-end state that is not part of the capture session
struct ViewState {
    phase: u32,
    show_help: bool,
    preview: Option<(MediaReference, RgbImage)>,
}

impl ViewState {
    fn new() -> Self {
        Self {
            phase: 0,
            show_help: false,
            preview: None,
        }
    }

    /// Load the captured media when it changes
    fn sync_preview(&mut self, snapshot: &Snapshot) {
        let Some(media) = &snapshot.captured_media else {
            self.preview = None;
            return;
        };
        if self.preview.as_ref().map(|(loaded, _)| loaded) == Some(media) {
            return;
        }

        // GIF recordings show their first frame
        match image::open(media.path()) {
            Ok(image) => self.preview = Some((media.clone(), image.to_rgb8())),
            Err(e) => {
                error!(path = %media, error = %e, "Failed to load preview");
                self.preview = None;
            }
        }
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: &RuntimeHandle,
    camera: &SyntheticCamera,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = ViewState::new();
    info!("Terminal capture screen started");

    loop {
        let snapshot = handle.snapshot();
        view.sync_preview(&snapshot);

        let live = if camera.permission_granted() {
            Some(camera.render_frame(camera.settings(), view.phase))
        } else {
            None
        };
        terminal.draw(|f| draw(f, &snapshot, &view, live.as_ref()))?;
        view.phase = view.phase.wrapping_add(1);

        // Handle input with timeout for frame updates
        if event::poll(timing::TERMINAL_POLL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C or 'q' to quit
            if (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
                || key.code == KeyCode::Char('q')
            {
                break;
            }

            if key.code == KeyCode::Char('h') {
                view.show_help = !view.show_help;
            } else if let Some(message) = key_message(key, &snapshot) {
                view.show_help = false;
                if !handle.dispatch(message) {
                    return Err("Capture runtime stopped".into());
                }
            }
        }
    }

    Ok(())
}

/// Map a key press to a controller message for the current screen
fn key_message(key: KeyEvent, snapshot: &Snapshot) -> Option<Message> {
    if snapshot.timer_picker_visible {
        let setting = match key.code {
            KeyCode::Char('0') => Some(TimerSetting::Off),
            KeyCode::Char('3') => Some(TimerSetting::Three),
            KeyCode::Char('5') => Some(TimerSetting::Five),
            KeyCode::Char('1') => Some(TimerSetting::Ten),
            _ => None,
        };
        if let Some(setting) = setting {
            return Some(Message::SelectTimer(setting));
        }
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('t')) {
            return Some(Message::CloseTimerPicker);
        }
    }

    match snapshot.view() {
        CaptureView::NoAccess => None,
        CaptureView::Previewing(_) => match key.code {
            KeyCode::Char('s') | KeyCode::Enter => Some(Message::SavePreview),
            KeyCode::Char('d') | KeyCode::Char('x') | KeyCode::Backspace => {
                Some(Message::DiscardPreview)
            }
            _ => None,
        },
        CaptureView::Recording { .. } => match key.code {
            KeyCode::Char('v') | KeyCode::Char(' ') => Some(Message::RequestVideoStop),
            _ => camera_key_message(key),
        },
        CaptureView::CountingDown { .. } => match key.code {
            KeyCode::Esc | KeyCode::Char('c') => Some(Message::CancelCountdown),
            KeyCode::Char(' ') | KeyCode::Char('p') => Some(Message::RequestCapture),
            KeyCode::Char('v') => Some(Message::RequestVideoStart),
            _ => camera_key_message(key),
        },
        CaptureView::Live => match key.code {
            KeyCode::Char(' ') | KeyCode::Char('p') => Some(Message::RequestCapture),
            KeyCode::Char('v') => Some(Message::RequestVideoStart),
            KeyCode::Char('t') => Some(Message::ToggleTimerPicker),
            KeyCode::Char('T') => Some(Message::CycleTimer),
            _ => camera_key_message(key),
        },
    }
}

/// Camera controls available on the live viewfinder
fn camera_key_message(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Char('f') => Some(Message::ToggleFacing),
        KeyCode::Char('l') => Some(Message::ToggleFlash),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(Message::ZoomIn),
        KeyCode::Char('-') => Some(Message::ZoomOut),
        KeyCode::Char('0') => Some(Message::ResetZoom),
        KeyCode::Char(']') => Some(Message::PinchZoom {
            scale: KEY_PINCH_SCALE,
        }),
        KeyCode::Char('[') => Some(Message::PinchZoom {
            scale: 1.0 / KEY_PINCH_SCALE,
        }),
        KeyCode::Char(c @ '1'..='3') => {
            let index = (c as u8 - b'1') as usize;
            zoom::PRESETS.get(index).map(|level| Message::SetZoom(*level))
        }
        _ => None,
    }
}

fn draw(f: &mut Frame, snapshot: &Snapshot, view: &ViewState, live: Option<&RgbImage>) {
    let area = f.area();

    // Reserve the bottom two lines for notifications and status
    let main_area = Rect {
        height: area.height.saturating_sub(2),
        ..area
    };
    let notice_area = Rect {
        y: area.y + area.height.saturating_sub(2),
        height: area.height.min(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    match snapshot.view() {
        CaptureView::NoAccess => {
            f.render_widget(CenteredText::plain("No access to camera"), main_area);
        }
        CaptureView::Previewing(media) => {
            let frame = view.preview.as_ref().map(|(_, image)| image);
            f.render_widget(FrameWidget::new(frame, "Loading preview..."), main_area);
            f.render_widget(
                Banner::new(&format!(" Preview: {} ", media), Color::Blue),
                main_area,
            );
        }
        CaptureView::Live | CaptureView::CountingDown { .. } | CaptureView::Recording { .. } => {
            let placeholder = if snapshot.camera_access == AccessState::Pending {
                "Waiting for camera permission..."
            } else {
                "Waiting for camera..."
            };
            f.render_widget(FrameWidget::new(live, placeholder), main_area);
        }
    }

    match snapshot.view() {
        CaptureView::CountingDown { remaining } => {
            f.render_widget(CenteredText::emphasized(&format!("  {}  ", remaining)), main_area);
        }
        CaptureView::Recording { elapsed_secs } => {
            let label = format!(" ● REC {:02}:{:02} ", elapsed_secs / 60, elapsed_secs % 60);
            f.render_widget(Banner::new(&label, Color::Red), main_area);
        }
        _ => {}
    }

    if snapshot.timer_picker_visible {
        f.render_widget(Banner::new(&timer_picker_line(snapshot), Color::DarkGray), main_area);
    }

    let notice = match &snapshot.notification {
        Some(notification) => notification.message.clone(),
        None => hint_message(snapshot),
    };
    f.render_widget(StatusBar { message: &notice }, notice_area);

    let status = if view.show_help {
        help_message()
    } else {
        status_message(snapshot)
    };
    f.render_widget(StatusBar { message: &status }, status_area);
}

fn timer_picker_line(snapshot: &Snapshot) -> String {
    let options: Vec<String> = TimerSetting::ALL
        .iter()
        .map(|setting| {
            if *setting == snapshot.timer_setting {
                format!("[{}]", setting.label())
            } else {
                setting.label()
            }
        })
        .collect();
    format!(" Timer: {}  (0/3/5/1 pick, Esc close) ", options.join(" "))
}

fn status_message(snapshot: &Snapshot) -> String {
    let mut msg = format!(
        "{} camera | flash {} | zoom {:.2} | timer {}",
        snapshot.camera_facing,
        if snapshot.flash_mode.is_on() { "on" } else { "off" },
        snapshot.zoom_level,
        snapshot.timer_setting.label()
    );
    if snapshot.is_saving {
        msg.push_str(" | saving...");
    } else if let Some(name) = snapshot.last_saved.as_deref().and_then(|p| p.file_name()) {
        msg.push_str(&format!(" | saved {}", name.to_string_lossy()));
    }
    if snapshot.media_access == AccessState::Denied {
        msg.push_str(" | no media library access");
    }
    msg
}

fn hint_message(snapshot: &Snapshot) -> String {
    match snapshot.view() {
        CaptureView::NoAccess => "'q' quit".to_string(),
        CaptureView::Previewing(_) => "'s' save | 'd' discard | 'q' quit".to_string(),
        CaptureView::Recording { .. } => "'v' stop recording | 'q' quit".to_string(),
        CaptureView::CountingDown { .. } => "'c' cancel timer | 'q' quit".to_string(),
        CaptureView::Live => {
            "'space' picture | 'v' video | 't' timer | 'h' help | 'q' quit".to_string()
        }
    }
}

fn help_message() -> String {
    String::from(
        "space/p: Picture | v: Video | f: Flip | l: Flash | +/-: Zoom | [/]: Pinch | \
         1-3: Zoom preset | 0: Reset zoom | t: Timer | T: Cycle timer | q/Ctrl+C: Quit",
    )
}

/// Widget that renders an RGB frame using half-block characters
struct FrameWidget<'a> {
    frame: Option<&'a RgbImage>,
    placeholder: &'a str,
}

impl<'a> FrameWidget<'a> {
    fn new(frame: Option<&'a RgbImage>, placeholder: &'a str) -> Self {
        Self { frame, placeholder }
    }
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame else {
            CenteredText::plain(self.placeholder).render(area, buf);
            return;
        };
        if frame.width() == 0 || frame.height() == 0 || area.width == 0 || area.height == 0 {
            return;
        }

        // Calculate display dimensions maintaining aspect ratio
        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = frame.width() as f64 / frame.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width() as f64 / display_width as f64;
        let y_scale = frame.height() as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half with bg
        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;
                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(sample_pixel(frame, src_x, src_y_top));
                    cell.set_bg(sample_pixel(frame, src_x, src_y_bottom));
                }
            }
        }
    }
}

fn sample_pixel(frame: &RgbImage, x: u32, y: u32) -> Color {
    let x = x.min(frame.width() - 1);
    let y = y.min(frame.height() - 1);
    let [r, g, b] = frame.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// Text centered in the area
struct CenteredText<'a> {
    text: &'a str,
    style: Style,
}

impl<'a> CenteredText<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default(),
        }
    }

    fn emphasized(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

impl Widget for CenteredText<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.text.chars().count() as u16;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + area.height / 2;
        if y < area.y + area.height && x < area.x + area.width {
            buf.set_stringn(x, y, self.text, area.width as usize, self.style);
        }
    }
}

/// One-line label in the top-left corner
struct Banner<'a> {
    text: &'a str,
    color: Color,
}

impl<'a> Banner<'a> {
    fn new(text: &'a str, color: Color) -> Self {
        Self { text, color }
    }
}

impl Widget for Banner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        buf.set_stringn(
            area.x,
            area.y,
            self.text,
            area.width as usize,
            Style::default().fg(Color::White).bg(self.color),
        );
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        buf.set_stringn(
            area.x,
            area.y,
            self.message,
            area.width as usize,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}
