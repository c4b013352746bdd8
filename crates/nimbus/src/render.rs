//! Paints engine state onto a grid of terminal cells.
//!
//! The engine works in layout units; one terminal cell covers
//! `cell_width` x `cell_height` of them.

use nimbus_config::DisplayConfig;
use nimbus_core::{Gradient, Point, Rgb, Size};
use nimbus_engine::{ParticleKind, ParticleView, SpriteView};
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use crate::color::{INK, WHITE, blend, to_color};

/// Shades for cloud cells, from the dense core outwards.
const CLOUD_CHARS: [char; 3] = ['▓', '▒', '░'];

/// The sprite figure. All rows have the same width.
const SPRITE: [&str; 4] = [
    "  .---.  ",
    " ( o o ) ",
    "(   ^   )",
    " `-----' ",
];

/// Strength of the glow halo at full glow.
const HALO_STRENGTH: f32 = 0.5;

/// Size of the sprite figure in layout units.
pub fn sprite_size(display: &DisplayConfig) -> Size {
    let cols = SPRITE[0].chars().count() as f32;
    let rows = SPRITE.len() as f32;
    Size::new(cols * display.cell_width, rows * display.cell_height)
}

/// Mapping between terminal cells and layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    cell_width: f32,
    cell_height: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, display: &DisplayConfig) -> Self {
        Self {
            cols,
            rows,
            cell_width: display.cell_width,
            cell_height: display.cell_height,
        }
    }

    /// Container size in layout units.
    pub fn container(&self) -> Size {
        Size::new(
            self.cols as f32 * self.cell_width,
            self.rows as f32 * self.cell_height,
        )
    }

    /// Cell containing the layout point.
    fn cell_at(&self, point: Point) -> (i32, i32) {
        (
            (point.x / self.cell_width).floor() as i32,
            (point.y / self.cell_height).floor() as i32,
        )
    }

    /// Half-open cell span covered by a layout rectangle; at least one cell.
    fn cells_of(&self, position: Point, size: Size) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.cell_at(position);
        let x1 = ((position.x + size.width) / self.cell_width).ceil() as i32;
        let y1 = ((position.y + size.height) / self.cell_height).ceil() as i32;
        (x0, y0, x1.max(x0 + 1), y1.max(y0 + 1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

/// A frame being painted.
#[derive(Debug)]
pub struct Canvas {
    viewport: Viewport,
    cells: Vec<Cell>,
}

impl Canvas {
    /// A canvas filled with the scene's background gradient.
    pub fn new(viewport: Viewport, background: Gradient) -> Self {
        let (cols, rows) = (viewport.cols as usize, viewport.rows as usize);
        let mut cells = Vec::with_capacity(cols * rows);
        for y in 0..rows {
            let ny = (y as f32 + 0.5) / rows as f32;
            for x in 0..cols {
                let nx = (x as f32 + 0.5) / cols as f32;
                let bg = background.sample(nx, ny);
                cells.push(Cell { ch: ' ', fg: bg, bg });
            }
        }
        Self { viewport, cells }
    }

    fn cell_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if x < 0 || y < 0 || x >= self.viewport.cols as i32 || y >= self.viewport.rows as i32 {
            return None;
        }
        let index = y as usize * self.viewport.cols as usize + x as usize;
        self.cells.get_mut(index)
    }

    #[cfg(test)]
    fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        if x < 0 || y < 0 || x >= self.viewport.cols as i32 || y >= self.viewport.rows as i32 {
            return None;
        }
        self.cells.get(y as usize * self.viewport.cols as usize + x as usize)
    }

    /// Draw `ch` over whatever background the cell already has.
    fn stamp(&mut self, x: i32, y: i32, ch: char, color: Rgb, opacity: f32) {
        if let Some(cell) = self.cell_mut(x, y) {
            cell.ch = ch;
            cell.fg = blend(cell.bg, color, opacity);
        }
    }

    pub fn paint_particle(&mut self, particle: &ParticleView) {
        match particle.kind {
            ParticleKind::Cloud => self.paint_cloud(particle),
            ParticleKind::Rain => self.paint_drop(particle),
            ParticleKind::Wind => self.paint_stroke(particle),
        }
    }

    /// Clouds are elliptical blobs, densest in the middle.
    fn paint_cloud(&mut self, cloud: &ParticleView) {
        let (x0, y0, x1, y1) = self.viewport.cells_of(cloud.position, cloud.size);
        let (cx, cy) = ((x0 + x1) as f32 / 2.0, (y0 + y1) as f32 / 2.0);
        let (rx, ry) = ((x1 - x0) as f32 / 2.0, (y1 - y0) as f32 / 2.0);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = (x as f32 + 0.5 - cx) / rx;
                let dy = (y as f32 + 0.5 - cy) / ry;
                let distance = (dx * dx + dy * dy).sqrt();
                let ch = match distance {
                    d if d < 0.45 => CLOUD_CHARS[0],
                    d if d < 0.75 => CLOUD_CHARS[1],
                    d if d <= 1.0 => CLOUD_CHARS[2],
                    _ => continue,
                };
                self.stamp(x, y, ch, WHITE, cloud.opacity);
            }
        }
    }

    /// Drops are thinner than a cell; a drop leaning into the right half of
    /// its cell is drawn slanted.
    fn paint_drop(&mut self, drop: &ParticleView) {
        let center = Point::new(
            drop.position.x + drop.size.width / 2.0,
            drop.position.y + drop.size.height / 2.0,
        );
        let (x, y) = self.viewport.cell_at(center);
        let within = center.x / self.viewport.cell_width - x as f32;
        let ch = if within > 0.5 { '/' } else { '|' };
        self.stamp(x, y, ch, WHITE, drop.opacity);
    }

    fn paint_stroke(&mut self, stroke: &ParticleView) {
        let (x0, y0, x1, _) = self.viewport.cells_of(stroke.position, stroke.size);
        for x in x0..x1 {
            self.stamp(x, y0, '~', WHITE, stroke.opacity);
        }
    }

    /// Draw the sprite figure at its animated position.
    pub fn paint_sprite(&mut self, sprite: &SpriteView) {
        if sprite.size.is_none() || sprite.opacity <= 0.0 {
            return;
        }
        let origin = Point::new(sprite.position.x, sprite.position.y + sprite.bob_offset);
        let (ox, oy) = self.viewport.cell_at(origin);
        let cols = SPRITE[0].chars().count() as i32;
        let rows = SPRITE.len() as i32;

        if sprite.glow > 0.0 {
            // A cell of halo per 10% of scale above 90%.
            let radius = (1.0 + (sprite.scale - 1.0) * 10.0).round().clamp(0.0, 3.0) as i32;
            let strength = sprite.glow * sprite.opacity * HALO_STRENGTH;
            self.paint_halo(ox - radius, oy - radius / 2, cols + radius * 2, rows + radius, strength);
        }

        for (dy, row) in SPRITE.iter().enumerate() {
            for (dx, ch) in row.chars().enumerate() {
                if ch != ' ' {
                    self.stamp(ox + dx as i32, oy + dy as i32, ch, INK, sprite.opacity);
                }
            }
        }
    }

    fn paint_halo(&mut self, x0: i32, y0: i32, cols: i32, rows: i32, strength: f32) {
        for y in y0..y0 + rows {
            for x in x0..x0 + cols {
                if let Some(cell) = self.cell_mut(x, y) {
                    cell.bg = blend(cell.bg, WHITE, strength);
                    if cell.ch == ' ' {
                        cell.fg = cell.bg;
                    }
                }
            }
        }
    }

    /// Background color under a cell, if it is on screen.
    #[cfg(test)]
    pub fn background_at(&self, x: u16, y: u16) -> Option<Rgb> {
        self.cell(x as i32, y as i32).map(|cell| cell.bg)
    }

    #[cfg(test)]
    pub fn char_at(&self, x: u16, y: u16) -> Option<char> {
        self.cell(x as i32, y as i32).map(|cell| cell.ch)
    }

    pub fn into_lines(self) -> Vec<Line<'static>> {
        let cols = self.viewport.cols.max(1) as usize;
        self.cells
            .chunks(cols)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| {
                        Span::styled(
                            cell.ch.to_string(),
                            Style::new().fg(to_color(cell.fg)).bg(to_color(cell.bg)),
                        )
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use nimbus_core::Scene;

    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(40, 20, &DisplayConfig::default())
    }

    fn canvas() -> Canvas {
        Canvas::new(viewport(), Scene::Cloud.profile().background)
    }

    #[test]
    fn test_container_in_layout_units() {
        assert_eq!(viewport().container(), Size::new(320.0, 320.0));
    }

    #[test]
    fn test_background_fills_every_cell() {
        let canvas = canvas();
        let gradient = Scene::Cloud.profile().background;
        let center = canvas.background_at(20, 10).unwrap();
        let corner = canvas.background_at(0, 0).unwrap();
        assert_eq!(center, gradient.sample(20.5 / 40.0, 10.5 / 20.0));
        assert_ne!(center, corner);
        assert_eq!(canvas.char_at(5, 5), Some(' '));
        assert_eq!(canvas.background_at(40, 0), None);
    }

    #[test]
    fn test_cloud_is_shaded() {
        let mut canvas = canvas();
        canvas.paint_particle(&ParticleView {
            kind: ParticleKind::Cloud,
            position: Point::new(80.0, 64.0),
            size: Size::new(80.0, 64.0),
            opacity: 0.8,
        });
        assert_eq!(canvas.char_at(15, 6), Some('▓'));
        assert_eq!(canvas.char_at(0, 0), Some(' '));
    }

    #[test]
    fn test_offscreen_particles_are_clipped() {
        let mut canvas = canvas();
        canvas.paint_particle(&ParticleView {
            kind: ParticleKind::Wind,
            position: Point::new(-60.0, 100.0),
            size: Size::new(60.0, 10.0),
            opacity: 0.4,
        });
        canvas.paint_particle(&ParticleView {
            kind: ParticleKind::Rain,
            position: Point::new(100.0, -10.0),
            size: Size::new(3.0, 10.0),
            opacity: 0.4,
        });
        assert!((0..40).all(|x| canvas.char_at(x, 6) == Some(' ')));
    }

    #[test]
    fn test_rain_and_wind_glyphs() {
        let mut canvas = canvas();
        canvas.paint_particle(&ParticleView {
            kind: ParticleKind::Rain,
            position: Point::new(16.0, 32.0),
            size: Size::new(3.0, 10.0),
            opacity: 0.4,
        });
        canvas.paint_particle(&ParticleView {
            kind: ParticleKind::Wind,
            position: Point::new(80.0, 160.0),
            size: Size::new(60.0, 10.0),
            opacity: 0.4,
        });
        assert_eq!(canvas.char_at(2, 2), Some('|'));
        assert_eq!(canvas.char_at(10, 10), Some('~'));
        assert_eq!(canvas.char_at(17, 10), Some('~'));
        assert_eq!(canvas.char_at(18, 10), Some(' '));
    }

    #[test]
    fn test_sprite_with_glow() {
        let mut canvas = canvas();
        let before = canvas.background_at(9, 4).unwrap();
        canvas.paint_sprite(&SpriteView {
            position: Point::new(80.0, 64.0),
            size: Some(sprite_size(&DisplayConfig::default())),
            opacity: 1.0,
            scale: 1.0,
            bob_offset: 0.0,
            glow: 0.6,
        });
        assert_eq!(canvas.char_at(13, 5), Some('o'));
        assert_ne!(canvas.background_at(9, 4).unwrap(), before);
    }

    #[test]
    fn test_hidden_sprite_is_not_drawn() {
        let mut canvas = canvas();
        canvas.paint_sprite(&SpriteView {
            position: Point::new(80.0, 64.0),
            size: None,
            opacity: 1.0,
            scale: 1.0,
            bob_offset: 0.0,
            glow: 0.0,
        });
        assert_eq!(canvas.char_at(13, 5), Some(' '));
    }

    #[test]
    fn test_lines_match_viewport() {
        let lines = canvas().into_lines();
        assert_eq!(lines.len(), 20);
        assert!(lines.iter().all(|line| line.spans.len() == 40));
    }
}
