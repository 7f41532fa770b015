//! # Launch Graphic
//!
//! The 1600×900 "live on Product Hunt" announcement graphic, drawn entirely
//! from primitives: ascending chevrons, leaderboard bars, accent dots, a
//! progress bar, a badge pill, centred copy, feature pills and a call to action.

use std::path::Path;

use tracing::info;

use crate::{
    canvas::{Canvas, Rect},
    error::Result,
    palette::Color,
    text::{centered_x, FontHandle, FontResolver},
};

pub const WIDTH: u32 = 1600;
pub const HEIGHT: u32 = 900;

const DARK_BG: Color = Color::new(15, 17, 23);
const DARK_SECONDARY: Color = Color::new(24, 27, 38);
const GOLD: Color = Color::new(255, 183, 77);
const MOMENTUM_ORANGE: Color = Color::new(255, 138, 76);
const WHITE_MUTED: Color = Color::new(180, 185, 195);
const BADGE_ORANGE: Color = Color::new(255, 111, 66);

const FEATURES: [&str; 4] = ["POINTS", "LEVELS", "LEADERBOARDS", "REAL REWARDS"];
const DOTS: [(i32, i32); 6] = [(200, 200), (250, 280), (180, 350), (1400, 650), (1450, 720), (1380, 780)];

struct LaunchFonts {
    title: FontHandle,
    points: FontHandle,
    tagline: FontHandle,
    subtitle: FontHandle,
    small: FontHandle,
}

impl LaunchFonts {
    fn load(resolver: &FontResolver) -> Self {
        Self {
            title: resolver.load("BigShoulders-Bold", 120.0),
            points: resolver.load("BigShoulders-Bold", 64.0),
            tagline: resolver.load("InstrumentSans-Regular", 36.0),
            subtitle: resolver.load("InstrumentSans-Bold", 48.0),
            small: resolver.load("GeistMono-Regular", 24.0),
        }
    }
}

/// Renders the launch announcement graphic
pub struct LaunchGraphic {
    fonts: FontResolver,
}

impl LaunchGraphic {
    pub fn new(fonts: FontResolver) -> Self {
        Self { fonts }
    }

    /// Render and write the graphic; the encoder follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P, quality: u8) -> Result<()> {
        let path = path.as_ref();
        self.render().save(path, quality)?;
        info!("Saved launch graphic: {:?}", path);
        Ok(())
    }

    pub fn render(&self) -> Canvas {
        let fonts = LaunchFonts::load(&self.fonts);
        let mut canvas = Canvas::new_filled(WIDTH, HEIGHT, DARK_BG);

        draw_chevrons(&mut canvas);
        draw_leaderboard_bars(&mut canvas);
        for &(x, y) in &DOTS {
            canvas.fill_ellipse(Rect::new(x - 6, y - 6, x + 6, y + 6), MOMENTUM_ORANGE, 255);
        }
        draw_progress_bar(&mut canvas, 0.8);

        draw_badge(&mut canvas, &fonts.small, "LIVE ON PRODUCT HUNT", 60);
        draw_centered(&mut canvas, &fonts.title, "DAILY BAG", 200, Color::WHITE);
        draw_centered(
            &mut canvas,
            &fonts.tagline,
            "Chores become games. Points become cash.",
            340,
            WHITE_MUTED,
        );
        draw_feature_pills(&mut canvas, &fonts.small, 440);
        draw_centered(&mut canvas, &fonts.subtitle, "Support us today", 560, Color::WHITE);

        let arrow_x = WIDTH as i32 / 2;
        canvas.fill_polygon(
            &[(arrow_x - 20, 650), (arrow_x + 20, 650), (arrow_x, 675)],
            GOLD,
            255,
        );

        let corner_y = HEIGHT as i32 - 130;
        canvas.draw_text(&fonts.points, "+500", 60, corner_y, GOLD, 80);
        canvas.draw_text(&fonts.small, "LVL UP", WIDTH as i32 - 200, corner_y, MOMENTUM_ORANGE, 255);

        canvas
    }
}

/// Six chevrons climbing the left edge, each more opaque than the last.
fn draw_chevrons(canvas: &mut Canvas) {
    let x = 80;
    for i in 0..6 {
        let y = 700 - i * 100;
        let alpha = (40 + i * 25) as u8;
        let points = [
            (x, y),
            (x + 40, y - 30),
            (x + 80, y),
            (x + 80, y + 15),
            (x + 40, y - 15),
            (x, y + 15),
        ];
        canvas.fill_polygon(&points, GOLD, alpha);
    }
}

fn draw_leaderboard_bars(canvas: &mut Canvas) {
    let x = WIDTH as i32 - 200;
    for i in 0..5 {
        let bar_width = 180 - i * 25;
        let y = 250 + i * 45;
        let color = GOLD.shifted(-15 * i, -20 * i, 5 * i);
        canvas.fill_rounded_rect(Rect::new(x, y, x + bar_width, y + 20), 4.0, color, 255);
    }
}

fn draw_progress_bar(canvas: &mut Canvas, progress: f32) {
    let width = 400;
    let x = (WIDTH as i32 - width) / 2;
    let y = HEIGHT as i32 - 80;

    canvas.fill_rounded_rect(Rect::new(x, y, x + width, y + 12), 6.0, DARK_SECONDARY, 255);
    let filled = (width as f32 * progress) as i32;
    canvas.fill_rounded_rect(Rect::new(x, y, x + filled, y + 12), 6.0, GOLD, 255);
}

fn draw_badge(canvas: &mut Canvas, font: &FontHandle, text: &str, y: i32) {
    let metrics = font.measure(text);
    let width = metrics.width as i32 + 40;
    let x = centered_x(WIDTH, width as u32);

    canvas.fill_rounded_rect(Rect::new(x, y, x + width, y + 44), 22.0, BADGE_ORANGE, 255);
    canvas.draw_text(font, text, x + 20 - metrics.left, y + 10, Color::WHITE, 255);
}

fn draw_centered(canvas: &mut Canvas, font: &FontHandle, text: &str, y: i32, color: Color) {
    let metrics = font.measure(text);
    let x = centered_x(WIDTH, metrics.width);
    canvas.draw_text(font, text, x - metrics.left, y, color, 255);
}

/// Outlined pills for each feature, centred as a group.
fn draw_feature_pills(canvas: &mut Canvas, font: &FontHandle, y: i32) {
    let gap = 20;
    let metrics: Vec<_> = FEATURES.iter().map(|feature| font.measure(feature)).collect();
    let widths: Vec<i32> = metrics.iter().map(|m| m.width as i32 + 50).collect();
    let total: i32 = widths.iter().sum::<i32>() + gap * (FEATURES.len() as i32 - 1);

    let mut x = centered_x(WIDTH, total.max(0) as u32);
    for ((feature, width), m) in FEATURES.iter().zip(widths).zip(&metrics) {
        canvas.stroke_rounded_rect(Rect::new(x, y, x + width, y + 50), 25.0, 2, GOLD);
        canvas.draw_text(font, feature, x + 25 - m.left, y + 13, GOLD, 255);
        x += width + gap;
    }
}
