// Scatter plot of the like and dislike counts of the areas.

use image::{Rgb, RgbImage};

use crate::survey::render::draw_disc;
use crate::survey::*;

const WIDTH: u32 = 480;
const HEIGHT: u32 = 360;
const MARGIN_LEFT: u32 = 40;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 24;
const MARGIN_BOTTOM: u32 = 36;
const MARKER_RADIUS: u32 = 4;
const FONT_SCALE: u32 = 2;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
// One color per area, reused when there are more areas.
const PALETTE: [Rgb<u8>; 8] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([214, 39, 40]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
];

/// Plots every area at (like, dislike), labelled with its name.
///
/// Both axes start at 0 and end at the largest count (at least 1).
pub fn plot_areas(summaries: &[AreaSummary]) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, WHITE);
    let max_like = summaries.iter().map(|s| s.like).max().unwrap_or(0).max(1);
    let max_dislike = summaries.iter().map(|s| s.dislike).max().unwrap_or(0).max(1);

    let x0 = MARGIN_LEFT as i64;
    let y0 = (HEIGHT - MARGIN_BOTTOM) as i64;
    for x in x0..=(WIDTH - MARGIN_RIGHT) as i64 {
        set_pixel(&mut img, x, y0, BLACK);
    }
    for y in MARGIN_TOP as i64..=y0 {
        set_pixel(&mut img, x0, y, BLACK);
    }

    let glyph_h = 5 * FONT_SCALE as i64;
    draw_text(&mut img, "0", x0 - 10, y0 + 4, FONT_SCALE, BLACK);
    let like_tick = max_like.to_string();
    let like_x = (WIDTH - MARGIN_RIGHT) as i64 - text_width(&like_tick, FONT_SCALE) / 2;
    draw_text(&mut img, &like_tick, like_x, y0 + 4, FONT_SCALE, BLACK);
    let dislike_tick = max_dislike.to_string();
    let dislike_x = x0 - 4 - text_width(&dislike_tick, FONT_SCALE);
    draw_text(&mut img, &dislike_tick, dislike_x, MARGIN_TOP as i64 - glyph_h / 2, FONT_SCALE, BLACK);
    let like_title_x = (WIDTH as i64 - text_width("LIKE", FONT_SCALE)) / 2;
    draw_text(&mut img, "LIKE", like_title_x, y0 + 4 + glyph_h + 4, FONT_SCALE, BLACK);
    draw_text(&mut img, "DISLIKE", 4, 4, FONT_SCALE, BLACK);

    let points: Vec<Coord> = summaries
        .iter()
        .map(|s| to_pixel(s.like, s.dislike, max_like, max_dislike))
        .collect();
    for (idx, (s, p)) in summaries.iter().zip(points.iter()).enumerate() {
        let color = PALETTE[idx % PALETTE.len()];
        let width = text_width(&s.area, FONT_SCALE);
        let offset = MARKER_RADIUS as i64 + 2;
        let mut x = p.x as i64 + offset;
        if x + width > WIDTH as i64 {
            x = p.x as i64 - offset - width;
        }
        draw_text(&mut img, &s.area, x, p.y as i64 - offset - glyph_h, FONT_SCALE, color);
    }
    // Markers are drawn over the labels.
    for (idx, p) in points.iter().enumerate() {
        draw_disc(&mut img, *p, MARKER_RADIUS, PALETTE[idx % PALETTE.len()]);
    }
    img
}

pub(crate) fn to_pixel(like: u64, dislike: u64, max_like: u64, max_dislike: u64) -> Coord {
    let plot_w = (WIDTH - MARGIN_LEFT - MARGIN_RIGHT) as f64;
    let plot_h = (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM) as f64;
    let x = MARGIN_LEFT as f64 + like as f64 / max_like as f64 * plot_w;
    let y = (HEIGHT - MARGIN_BOTTOM) as f64 - dislike as f64 / max_dislike as f64 * plot_h;
    Coord::new(x.round(), y.round())
}

fn set_pixel(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

fn text_width(text: &str, scale: u32) -> i64 {
    (text.chars().count() as i64) * 4 * scale as i64
}

// 3x5 bitmap glyphs, one row per byte, bit 2 is the leftmost column.
// Lower case is drawn as upper case. Unknown characters are drawn as a checker.
fn glyph(c: char) -> [u8; 5] {
    match c.to_ascii_uppercase() {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ' ' => [0; 5],
        _ => [0b101, 0b010, 0b101, 0b010, 0b101],
    }
}

fn draw_text(img: &mut RgbImage, text: &str, x: i64, y: i64, scale: u32, color: Rgb<u8>) {
    let scale = scale as i64;
    for (idx, c) in text.chars().enumerate() {
        let left = x + idx as i64 * 4 * scale;
        for (row, bits) in glyph(c).into_iter().enumerate() {
            for col in 0..3 {
                if bits & (0b100u8 >> col) == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        set_pixel(
                            img,
                            left + col * scale + dx,
                            y + row as i64 * scale + dy,
                            color,
                        );
                    }
                }
            }
        }
    }
}
