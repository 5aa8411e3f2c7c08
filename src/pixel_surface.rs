// src/pixel_surface.rs
//
// In-memory RGBA frame surface. Stands in for whatever the frames come from
// (camera, decoder); the evaluator only ever reads it through the
// PixelSampler seam.

use crate::color_classifier::PixelSample;
use crate::error::InvalidSampleError;
use crate::frame_evaluator::PixelSampler;
use crate::types::BoundingBox;

const BYTES_PER_PIXEL: usize = 4;

pub struct BufferSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl BufferSurface {
    /// Wrap a row-major RGBA buffer. The length must match the dimensions.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self, InvalidSampleError> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(InvalidSampleError::MalformedBuffer {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }
}

impl PixelSampler for BufferSurface {
    /// Cut out the integer pixel rectangle covering the requested region
    /// (floor origin, ceil extent). A region reaching outside the surface is
    /// an error, never a silently truncated sample.
    fn sample(&self, region: &BoundingBox) -> Result<PixelSample, InvalidSampleError> {
        if region.width <= 0.0 || region.height <= 0.0 {
            return Err(InvalidSampleError::EmptySample {
                width: 0,
                height: 0,
            });
        }

        let x0 = region.x.floor();
        let y0 = region.y.floor();
        let x1 = (region.x + region.width).ceil();
        let y1 = (region.y + region.height).ceil();

        if x0 < 0.0 || y0 < 0.0 || x1 > self.width as f32 || y1 > self.height as f32 {
            return Err(InvalidSampleError::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                surface_width: self.width,
                surface_height: self.height,
            });
        }

        let (x0, y0, x1, y1) = (x0 as usize, y0 as usize, x1 as usize, y1 as usize);
        let w = x1 - x0;
        let h = y1 - y0;

        let mut data = Vec::with_capacity(w * h * BYTES_PER_PIXEL);
        for y in y0..y1 {
            let start = (y * self.width as usize + x0) * BYTES_PER_PIXEL;
            data.extend_from_slice(&self.data[start..start + w * BYTES_PER_PIXEL]);
        }

        Ok(PixelSample {
            width: w as u32,
            height: h as u32,
            data,
        })
    }
}
