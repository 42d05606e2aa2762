// Drawing of the touches on the reference image.

use image::{Rgb, RgbImage};

use crate::survey::*;

pub const DEFAULT_RADIUS: u32 = 10;
pub const LIKE_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const DISLIKE_COLOR: Rgb<u8> = Rgb([0, 0, 255]);

pub fn load_background(path: &str) -> TallyResult<RgbImage> {
    info!("Loading background image {:?}", path);
    let img = image::open(path).context(OpeningImageSnafu { path })?;
    Ok(img.to_rgb8())
}

/// Draws a filled disc for every present coordinate: red for likes, blue for
/// dislikes. Within a row, the touches are drawn slot by slot, like first.
pub fn draw_points(img: &mut RgbImage, rows: &[CoordinateRow], radius: u32) {
    for row in rows.iter() {
        for idx in 0..2 {
            if let Some(c) = row.like[idx] {
                draw_disc(img, c, radius, LIKE_COLOR);
            }
            if let Some(c) = row.dislike[idx] {
                draw_disc(img, c, radius, DISLIKE_COLOR);
            }
        }
    }
}

// Pixels outside of the image are skipped.
pub(crate) fn draw_disc(img: &mut RgbImage, center: Coord, radius: u32, color: Rgb<u8>) {
    let (width, height) = img.dimensions();
    let r = radius as f64;
    let x_min = (center.x - r).floor().max(0.0);
    let y_min = (center.y - r).floor().max(0.0);
    let x_max = (center.x + r).ceil().min(width as f64 - 1.0);
    let y_max = (center.y + r).ceil().min(height as f64 - 1.0);
    if x_min > x_max || y_min > y_max {
        return;
    }
    for py in (y_min as u32)..=(y_max as u32) {
        for px in (x_min as u32)..=(x_max as u32) {
            let dx = px as f64 - center.x;
            let dy = py as f64 - center.y;
            if dx * dx + dy * dy <= r * r {
                img.put_pixel(px, py, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(size: u32) -> RgbImage {
        RgbImage::from_pixel(size, size, Rgb([255, 255, 255]))
    }

    #[test]
    fn disc_shape() {
        let mut img = white(20);
        draw_disc(&mut img, Coord::new(10.0, 10.0), 2, LIKE_COLOR);
        assert_eq!(img.get_pixel(10, 10), &LIKE_COLOR);
        assert_eq!(img.get_pixel(12, 10), &LIKE_COLOR);
        assert_eq!(img.get_pixel(10, 8), &LIKE_COLOR);
        // Corner of the bounding box, outside of the disc.
        assert_eq!(img.get_pixel(12, 12), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(13, 10), &Rgb([255, 255, 255]));
    }

    #[test]
    fn clipped_at_the_border() {
        let mut img = white(10);
        draw_disc(&mut img, Coord::new(-1.0, 0.0), 3, DISLIKE_COLOR);
        assert_eq!(img.get_pixel(0, 0), &DISLIKE_COLOR);
        draw_disc(&mut img, Coord::new(100.0, 100.0), 3, DISLIKE_COLOR);
        draw_disc(&mut img, Coord::new(-50.0, 5.0), 3, DISLIKE_COLOR);
    }

    #[test]
    fn dislikes_drawn_over_likes() {
        let mut img = white(20);
        let row = CoordinateRow {
            respondent_id: "r".to_string(),
            like: [Some(Coord::new(5.0, 5.0)), None],
            dislike: [Some(Coord::new(5.0, 5.0)), None],
        };
        draw_points(&mut img, &[row], 1);
        assert_eq!(img.get_pixel(5, 5), &DISLIKE_COLOR);
    }
}
