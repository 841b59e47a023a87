//! TIFF image stack loading
//!
//! Stacks are stored as (frames, channels, height, width) arrays of raw
//! intensity values. Multi-page TIFF files are read page by page with the
//! ImageJ hyperstack convention of channel-fastest page ordering; a plain
//! single-channel time series loads with channels = 1.

use crate::io::error::{MeasureError, Result};
use ndarray::{Array2, Array4, ArrayView2, s};
use num_traits::AsPrimitive;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};

/// A multi-frame, multi-channel microscopy image stack
#[derive(Debug, Clone)]
pub struct ImageStack {
    data: Array4<f64>,
}

impl ImageStack {
    /// Load a stack from a multi-page TIFF file
    ///
    /// Pages are grouped into frames of `channels` consecutive planes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or decoded, if pages have
    /// inconsistent dimensions or unsupported sample formats, or if the page
    /// count is not a multiple of `channels`.
    pub fn from_tiff_path<P: AsRef<Path>>(path: P, channels: usize) -> Result<Self> {
        let path_buf = path.as_ref().to_path_buf();
        let file = File::open(&path_buf).map_err(|e| MeasureError::FileSystem {
            path: path_buf.clone(),
            operation: "open stack",
            source: e,
        })?;

        let stack_error = |source: tiff::TiffError| MeasureError::StackLoad {
            path: path_buf.clone(),
            source,
        };

        let mut decoder = Decoder::new(BufReader::new(file)).map_err(stack_error)?;
        let mut pages: Vec<Array2<f64>> = Vec::new();

        loop {
            let (width, height) = decoder.dimensions().map_err(stack_error)?;
            let decoded = decoder.read_image().map_err(stack_error)?;
            pages.push(decode_plane(decoded, height as usize, width as usize)?);

            if !decoder.more_images() {
                break;
            }
            decoder.next_image().map_err(stack_error)?;
        }

        Self::from_pages(pages, channels)
    }

    /// Assemble a stack from already-decoded planes
    ///
    /// # Errors
    ///
    /// Returns an error if no pages are given, `channels` is zero, the page
    /// count is not a multiple of `channels`, or plane dimensions differ.
    pub fn from_pages(pages: Vec<Array2<f64>>, channels: usize) -> Result<Self> {
        if channels == 0 {
            return Err(MeasureError::InvalidStack {
                reason: "channel count must be at least 1".to_string(),
            });
        }
        let Some(first) = pages.first() else {
            return Err(MeasureError::InvalidStack {
                reason: "stack contains no pages".to_string(),
            });
        };
        if pages.len() % channels != 0 {
            return Err(MeasureError::InvalidStack {
                reason: format!(
                    "{} pages cannot be grouped into frames of {channels} channels",
                    pages.len()
                ),
            });
        }

        let (height, width) = first.dim();
        let frames = pages.len() / channels;
        let mut data = Array4::zeros((frames, channels, height, width));

        for (page_index, page) in pages.iter().enumerate() {
            if page.dim() != (height, width) {
                return Err(MeasureError::InvalidStack {
                    reason: format!(
                        "page {page_index} is {:?}, expected ({height}, {width})",
                        page.dim()
                    ),
                });
            }
            let frame = page_index / channels;
            let channel = page_index % channels;
            data.slice_mut(s![frame, channel, .., ..]).assign(page);
        }

        Ok(Self { data })
    }

    /// Wrap an existing (frames, channels, height, width) array
    ///
    /// # Errors
    ///
    /// Returns an error if any dimension is zero.
    pub fn from_array(data: Array4<f64>) -> Result<Self> {
        let (frames, channels, height, width) = data.dim();
        if frames == 0 || channels == 0 || height == 0 || width == 0 {
            return Err(MeasureError::InvalidStack {
                reason: format!("empty stack dimensions {:?}", data.dim()),
            });
        }
        Ok(Self { data })
    }

    /// Number of time frames
    pub fn frames(&self) -> usize {
        self.data.dim().0
    }

    /// Number of channels per frame
    pub fn channels(&self) -> usize {
        self.data.dim().1
    }

    /// Frame height in pixels
    pub fn height(&self) -> usize {
        self.data.dim().2
    }

    /// Frame width in pixels
    pub fn width(&self) -> usize {
        self.data.dim().3
    }

    /// View of a single frame/channel plane, or None when out of range
    pub fn plane(&self, frame: usize, channel: usize) -> Option<ArrayView2<'_, f64>> {
        if frame >= self.frames() || channel >= self.channels() {
            return None;
        }
        Some(self.data.slice(s![frame, channel, .., ..]))
    }
}

// Converts one decoded TIFF page into an f64 intensity plane
fn decode_plane(decoded: DecodingResult, height: usize, width: usize) -> Result<Array2<f64>> {
    let samples: Vec<f64> = match decoded {
        DecodingResult::U8(buffer) => samples_to_f64(buffer),
        DecodingResult::U16(buffer) => samples_to_f64(buffer),
        DecodingResult::U32(buffer) => samples_to_f64(buffer),
        DecodingResult::I16(buffer) => samples_to_f64(buffer),
        DecodingResult::F32(buffer) => samples_to_f64(buffer),
        _ => {
            return Err(MeasureError::InvalidStack {
                reason: "unsupported TIFF sample format".to_string(),
            });
        }
    };

    if samples.len() != height * width {
        return Err(MeasureError::InvalidStack {
            reason: format!(
                "page has {} samples, expected {} for a single-channel {height}x{width} plane",
                samples.len(),
                height * width
            ),
        });
    }

    Array2::from_shape_vec((height, width), samples).map_err(|e| MeasureError::InvalidStack {
        reason: e.to_string(),
    })
}

fn samples_to_f64<T>(samples: Vec<T>) -> Vec<f64>
where
    T: AsPrimitive<f64>,
{
    samples.into_iter().map(|sample| sample.as_()).collect()
}
