//! PNG overlay rendering of fitted cells
//!
//! Draws the fitted ellipse outline and centroid cross for each measured cell
//! on top of a grayscale rendering of one stack plane.

use crate::detection::cell::CellMeasurement;
use crate::io::configuration::{ELLIPSE_OUTLINE_SAMPLES, OVERLAY_CROSS_HALF_LENGTH};
use crate::io::error::{MeasureError, Result, invalid_parameter};
use crate::io::stack::ImageStack;
use image::{Rgba, RgbaImage};
use std::path::Path;

const OUTLINE_COLOR: Rgba<u8> = Rgba([255, 255, 0, 255]);
const CENTROID_COLOR: Rgba<u8> = Rgba([0, 255, 0, 255]);

/// Render measured cells over a stack plane and save the result as PNG
///
/// Cells measured on other frames are skipped so a per-frame overlay only
/// shows the cells found on that frame.
///
/// # Errors
///
/// Returns an error when the frame or channel is out of range, or the image
/// cannot be written.
pub fn export_overlay_png<P: AsRef<Path>>(
    stack: &ImageStack,
    frame: usize,
    channel: usize,
    cells: &[CellMeasurement],
    path: P,
) -> Result<()> {
    let plane = stack.plane(frame, channel).ok_or_else(|| {
        invalid_parameter(
            "frame",
            &frame,
            &format!(
                "frame {frame} channel {channel} not present in a {}x{} stack",
                stack.frames(),
                stack.channels()
            ),
        )
    })?;

    let (height, width) = plane.dim();
    let peak = plane.iter().copied().fold(0.0_f64, f64::max);
    // Values beyond 8 bits are assumed to be 16-bit camera counts
    let scale = if peak > 255.0 { 1.0 / 256.0 } else { 1.0 };

    let mut canvas = RgbaImage::new(width as u32, height as u32);
    for ((row, column), &value) in plane.indexed_iter() {
        let level = (value * scale).clamp(0.0, 255.0) as u8;
        canvas.put_pixel(column as u32, row as u32, Rgba([level, level, level, 255]));
    }

    for cell in cells.iter().filter(|cell| cell.frame == frame) {
        draw_ellipse(&mut canvas, cell);
        draw_centroid_cross(&mut canvas, cell);
    }

    let path_buf = path.as_ref().to_path_buf();
    if let Some(parent) = path_buf.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| MeasureError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create overlay directory",
            source: e,
        })?;
    }

    canvas
        .save(&path_buf)
        .map_err(|source| MeasureError::OverlayExport {
            path: path_buf,
            source,
        })
}

fn draw_ellipse(canvas: &mut RgbaImage, cell: &CellMeasurement) {
    let (x_points, y_points) = cell.ellipse.outline_points(ELLIPSE_OUTLINE_SAMPLES);
    for (&x, &y) in x_points.iter().zip(y_points.iter()) {
        put_pixel_checked(canvas, x.round() as i64, y.round() as i64, OUTLINE_COLOR);
    }
}

fn draw_centroid_cross(canvas: &mut RgbaImage, cell: &CellMeasurement) {
    let center_x = cell.ellipse.x_center().round() as i64;
    let center_y = cell.ellipse.y_center().round() as i64;

    for offset in -OVERLAY_CROSS_HALF_LENGTH..=OVERLAY_CROSS_HALF_LENGTH {
        put_pixel_checked(canvas, center_x + offset, center_y, CENTROID_COLOR);
        put_pixel_checked(canvas, center_x, center_y + offset, CENTROID_COLOR);
    }
}

fn put_pixel_checked(canvas: &mut RgbaImage, x: i64, y: i64, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && x < i64::from(canvas.width()) && y < i64::from(canvas.height()) {
        canvas.put_pixel(x as u32, y as u32, color);
    }
}
