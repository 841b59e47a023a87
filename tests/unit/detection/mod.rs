//! Shared synthetic image fixtures for detection tests

pub mod fluorescence;

use budquant::io::stack::ImageStack;
use ndarray::{Array2, Array4};

/// Brightfield frame with one synthetic cell: bright interior, dark wall,
/// uniform background
pub fn synthetic_cell_frame(
    height: usize,
    width: usize,
    center_x: f64,
    center_y: f64,
    radius: f64,
) -> Array2<f64> {
    Array2::from_shape_fn((height, width), |(row, col)| {
        let distance = (col as f64 - center_x).hypot(row as f64 - center_y);
        if distance < radius {
            200.0
        } else if distance < radius + 4.0 {
            20.0
        } else {
            100.0
        }
    })
}

/// Two-channel stack whose cell drifts two pixels per frame in x and whose
/// fluorescence channel is uniform at 400 + 100 per frame
pub fn synthetic_stack(frames: usize) -> ImageStack {
    let (height, width) = (200, 200);
    let mut data = Array4::zeros((frames, 2, height, width));

    for frame in 0..frames {
        let center = 100.0 + 2.0 * frame as f64;
        let bf = synthetic_cell_frame(height, width, center, 100.0, 30.0);
        data.slice_mut(ndarray::s![frame, 0, .., ..]).assign(&bf);
        data.slice_mut(ndarray::s![frame, 1, .., ..])
            .fill(400.0 + 100.0 * frame as f64);
    }

    ImageStack::from_array(data).unwrap()
}
