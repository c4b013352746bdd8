use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{info, warn};
use nimbus_config::{Config, ConfigError, DisplayConfig};
use nimbus_core::Scene;
use nimbus_engine::{CaptionHandle, ContainerHandle, Engine, EngineError, SpriteHandle};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Alignment, Constraint, Layout},
    style::{Style, Stylize},
    text::Line,
    widgets::Paragraph,
};

use crate::cli::Args;
use crate::color::{text_on, to_color};
use crate::render::{Canvas, Viewport, sprite_size};

mod cli;
mod color;
mod logging;
mod render;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let config = startup(&args)?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let app = App::new(config)?.with_scene(args.scene);
    let terminal = ratatui::init();
    let result = app.run(terminal);
    ratatui::restore();
    result
}

/// Install logging, then load the configuration so its warnings are recorded.
fn startup(args: &Args) -> Result<Config, ConfigError> {
    if let Some(path) = logging::init(args.log_file.as_deref()) {
        info!("nimbus {} logging to {}", env!("CARGO_PKG_VERSION"), path.display());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => match Config::load() {
            Err(ConfigError::NoConfigDir) => Config::default(),
            loaded => loaded?,
        },
    };
    args.apply(&mut config);
    Ok(config)
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    engine: Engine,
    display: DisplayConfig,
    viewport: Viewport,
    /// Scene to switch to right after the intro starts.
    initial_scene: Option<Scene>,
    /// Has the sprite size been reported to the engine?
    sprite_measured: bool,
}

impl App {
    /// Construct a new instance of [`App`]. The container stays unmeasured
    /// until the terminal size is known.
    pub fn new(config: Config) -> Result<Self, EngineError> {
        let engine = Engine::builder(config.engine)
            .container(ContainerHandle::new(nimbus_core::Size::ZERO))
            .sprite(SpriteHandle::unmeasured())
            .caption(CaptionHandle::hidden())
            .build()?;
        Ok(Self {
            running: false,
            engine,
            viewport: Viewport::new(0, 0, &config.display),
            display: config.display,
            initial_scene: None,
            sprite_measured: false,
        })
    }

    pub fn with_scene(mut self, scene: Option<Scene>) -> Self {
        self.initial_scene = scene;
        self
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let area = terminal.size()?;
        self.start(area.width, area.height);

        let frame_interval = Duration::from_secs(1) / u32::from(self.display.fps.max(1));
        let mut last = Instant::now();
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            if !self.sprite_measured {
                self.engine.sprite_measured(sprite_size(&self.display));
                self.sprite_measured = true;
            }
            self.handle_crossterm_events(frame_interval)?;

            let now = Instant::now();
            self.engine.advance(now - last);
            last = now;
            self.engine.retry_layout();
        }
        self.engine.teardown();
        Ok(())
    }

    /// Measure the container and let the engine play its intro.
    fn start(&mut self, cols: u16, rows: u16) {
        self.running = true;
        self.on_resize(cols, rows);
        self.engine.on_ready();
        if let Some(scene) = self.initial_scene {
            self.select(scene);
        }
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if (area.width, area.height) != (self.viewport.cols, self.viewport.rows) {
            self.on_resize(area.width, area.height);
        }

        let background = self.engine.background();
        let mut canvas = Canvas::new(self.viewport, background);
        for particle in self.engine.particles() {
            canvas.paint_particle(&particle);
        }
        canvas.paint_sprite(&self.engine.sprite());
        frame.render_widget(Paragraph::new(canvas.into_lines()), area);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Scene
            Constraint::Length(1), // Caption
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Help text
        ])
        .split(area);

        let ink = to_color(text_on(background.outer));
        let caption = self.engine.caption();
        if caption.visible {
            let caption = Paragraph::new(caption.text)
                .style(Style::new().fg(ink).bg(to_color(background.outer)).bold())
                .alignment(Alignment::Center);
            frame.render_widget(caption, chunks[1]);
        }

        if self.display.show_help {
            let help = Line::from(vec![
                "1".bold().fg(ink),
                " cloud  ".fg(ink),
                "2".bold().fg(ink),
                " rain  ".fg(ink),
                "3".bold().fg(ink),
                " wind  ".fg(ink),
                "n".bold().fg(ink),
                " next  ".fg(ink),
                "q".bold().fg(ink),
                " quit".fg(ink),
            ])
            .centered()
            .bg(to_color(background.outer));
            frame.render_widget(help, chunks[3]);
        }
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most one frame interval so the animation keeps moving.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Resize(cols, rows) => self.on_resize(cols, rows),
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('1')) => self.select(Scene::Cloud),
            (_, KeyCode::Char('2')) => self.select(Scene::Rain),
            (_, KeyCode::Char('3')) => self.select(Scene::Wind),
            (_, KeyCode::Char(' ') | KeyCode::Char('n')) => {
                self.engine.advance_cycle();
            }
            _ => {}
        }
    }

    fn on_resize(&mut self, cols: u16, rows: u16) {
        self.viewport = Viewport::new(cols, rows, &self.display);
        let container = self.viewport.container();
        if !container.is_valid() {
            warn!("terminal reports an empty area ({cols}x{rows})");
        }
        self.engine.resize(container);
    }

    fn select(&mut self, scene: Scene) {
        self.engine.select(scene);
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
