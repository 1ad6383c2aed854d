//! Debug annotation of detections on a slice

use super::config::AnnotationStyle;
use super::region::Rect;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;

/// Draw a hollow rectangle `thickness` pixels wide, growing inwards
pub fn draw_region(image: &mut RgbImage, region: Rect, color: [u8; 3], thickness: u32) {
    for i in 0..thickness.max(1) as i32 {
        let width = region.width - 2 * i;
        let height = region.height - 2 * i;
        if width <= 0 || height <= 0 {
            break;
        }
        let rect = imageproc::rect::Rect::at(region.x + i, region.y + i)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(image, rect, Rgb(color));
    }
}

/// Boxes for one detection: coin, value strip and (when read) the name box
pub fn annotate_detection(
    image: &mut RgbImage,
    anchor: Rect,
    number: Rect,
    name: Option<Rect>,
    style: &AnnotationStyle,
) {
    draw_region(image, anchor, style.anchor_color, style.thickness);
    draw_region(image, number, style.number_color, style.thickness);
    if let Some(name) = name {
        draw_region(image, name, style.name_color, style.thickness);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_pixel_outline() {
        let mut image = RgbImage::new(20, 20);
        draw_region(&mut image, Rect::new(2, 2, 10, 10), [0, 255, 0], 2);
        assert_eq!(image.get_pixel(2, 2).0, [0, 255, 0]);
        assert_eq!(image.get_pixel(3, 3).0, [0, 255, 0]);
        assert_eq!(image.get_pixel(11, 5).0, [0, 255, 0]);
        // Interior untouched
        assert_eq!(image.get_pixel(6, 6).0, [0, 0, 0]);
    }

    #[test]
    fn test_name_box_only_when_present() {
        let style = AnnotationStyle::default();
        let mut image = RgbImage::new(100, 100);
        annotate_detection(
            &mut image,
            Rect::new(60, 50, 10, 10),
            Rect::new(70, 50, 30, 10),
            None,
            &style,
        );
        assert_eq!(image.get_pixel(60, 50).0, style.anchor_color);
        assert_eq!(image.get_pixel(75, 50).0, style.number_color);
        assert!(image.pixels().all(|p| p.0 != style.name_color));
    }
}
