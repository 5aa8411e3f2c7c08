// src/error.rs

use thiserror::Error;

/// A pixel sample could not be produced or used.
///
/// Raised by the color classifier when handed an unusable sample, and by
/// pixel samplers that cannot cover a requested region. Never mapped to a
/// safety verdict; the frame loop decides what to do with the frame.
#[derive(Debug, Error)]
pub enum InvalidSampleError {
    #[error("pixel sample is empty ({width}x{height})")]
    EmptySample { width: u32, height: u32 },

    #[error("sample buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    MalformedBuffer {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error(
        "requested region ({x:.1},{y:.1}) {width:.1}x{height:.1} lies outside the {surface_width}x{surface_height} surface"
    )]
    RegionOutOfBounds {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        surface_width: u32,
        surface_height: u32,
    },
}
