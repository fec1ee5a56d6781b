use crate::CapturedFrame;
use glam::{DMat2, DVec2};

/// Draw `frame` rotated by `rotation_deg` (clockwise on screen) about its centre
/// into a canvas of the same size.
///
/// Nearest-neighbour sampling; canvas pixels that map outside the source stay black.
pub fn rotate_frame(frame: &CapturedFrame, rotation_deg: f64) -> CapturedFrame {
    let mut out = CapturedFrame::blank(frame.width, frame.height);
    if frame.width == 0 || frame.height == 0 {
        return out;
    }

    let center = DVec2::new(frame.width as f64, frame.height as f64) / 2.0;
    // Inverse mapping: for each canvas pixel, find where it came from.
    let inverse = DMat2::from_angle(-rotation_deg.to_radians());

    for y in 0..frame.height {
        for x in 0..frame.width {
            let dst = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) - center;
            let src = inverse * dst + center;
            if src.x < 0.0 || src.y < 0.0 {
                continue;
            }
            let (sx, sy) = (src.x.floor() as u32, src.y.floor() as u32);
            if sx < frame.width && sy < frame.height {
                out.set_pixel(x, y, frame.pixel(sx, sy));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn marked(width: u32, height: u32, x: u32, y: u32) -> CapturedFrame {
        let mut frame = CapturedFrame::blank(width, height);
        frame.set_pixel(x, y, RED);
        frame
    }

    #[test]
    fn zero_rotation_is_identity() {
        let frame = marked(4, 3, 1, 2);
        assert_eq!(rotate_frame(&frame, 0.0), frame);
    }

    #[test]
    fn quarter_turn_moves_top_to_right() {
        let frame = marked(3, 3, 1, 0);
        let rotated = rotate_frame(&frame, 90.0);
        assert_eq!(rotated.pixel(2, 1), RED);
        assert_eq!(rotated.pixel(1, 0), BLACK);
    }

    #[test]
    fn negative_turn_moves_top_to_left() {
        let frame = marked(3, 3, 1, 0);
        let rotated = rotate_frame(&frame, -90.0);
        assert_eq!(rotated.pixel(0, 1), RED);
    }

    #[test]
    fn corners_fall_outside_after_small_rotation() {
        let mut frame = CapturedFrame::blank(20, 10);
        frame.data.chunks_exact_mut(4).for_each(|px| px.copy_from_slice(&RED));
        let rotated = rotate_frame(&frame, 20.0);
        assert_eq!(rotated.pixel(0, 0), BLACK);
        assert_eq!(rotated.pixel(10, 5), RED);
        assert_eq!((rotated.width, rotated.height), (20, 10));
    }
}
