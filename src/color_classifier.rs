// src/color_classifier.rs
//
// Average-color heuristic for traffic-light state.
//
// Works on the mean red/green channel values of the cropped light region.
// The blue channel is averaged only for diagnostics. A lit lens pushes its
// channel mean above 150 while the opposing channel stays under 100; yellow
// lights both channels. No hysteresis; every sample is judged on its own.

use crate::error::InvalidSampleError;
use tracing::debug;

// ============================================================================
// THRESHOLDS
// ============================================================================

/// A channel mean above this counts as a lit lens.
const LIT_CHANNEL_MIN: f32 = 150.0;
/// The opposing channel mean must stay below this for a clean red/green call.
const DARK_CHANNEL_MAX: f32 = 100.0;

// ============================================================================
// PUBLIC TYPES
// ============================================================================

/// Detected state of a traffic light, based on pixel analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficLightColor {
    Red,
    Green,
    Yellow,
    Unknown,
}

impl TrafficLightColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficLightColor::Red => "RED",
            TrafficLightColor::Green => "GREEN",
            TrafficLightColor::Yellow => "YELLOW",
            TrafficLightColor::Unknown => "UNKNOWN",
        }
    }
}

/// Rectangular grid of RGBA pixels cut from one frame. Produced by a pixel
/// sampler, consumed by `classify`, and discarded within the evaluation.
#[derive(Debug, Clone)]
pub struct PixelSample {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA, `width * height * 4` bytes.
    pub data: Vec<u8>,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

/// Classify the color of a traffic light from a pixel sample.
///
/// Rules are checked in order, first match wins; the comparisons are strict,
/// so a mean sitting exactly on a threshold falls through to the next rule.
pub fn classify(sample: &PixelSample) -> Result<TrafficLightColor, InvalidSampleError> {
    let pixel_count = sample.width as usize * sample.height as usize;
    if pixel_count == 0 {
        return Err(InvalidSampleError::EmptySample {
            width: sample.width,
            height: sample.height,
        });
    }

    let expected = pixel_count * 4;
    if sample.data.len() != expected {
        return Err(InvalidSampleError::MalformedBuffer {
            width: sample.width,
            height: sample.height,
            expected,
            actual: sample.data.len(),
        });
    }

    let mut r_sum: u64 = 0;
    let mut g_sum: u64 = 0;
    let mut b_sum: u64 = 0;

    for px in sample.data.chunks_exact(4) {
        r_sum += px[0] as u64;
        g_sum += px[1] as u64;
        b_sum += px[2] as u64;
        // px[3] is alpha, ignored
    }

    let n = pixel_count as f32;
    let r_avg = r_sum as f32 / n;
    let g_avg = g_sum as f32 / n;
    let b_avg = b_sum as f32 / n;

    let color = if r_avg > LIT_CHANNEL_MIN && g_avg < DARK_CHANNEL_MAX {
        TrafficLightColor::Red
    } else if g_avg > LIT_CHANNEL_MIN && r_avg < DARK_CHANNEL_MAX {
        TrafficLightColor::Green
    } else if r_avg > LIT_CHANNEL_MIN && g_avg > LIT_CHANNEL_MIN {
        TrafficLightColor::Yellow
    } else {
        TrafficLightColor::Unknown
    };

    debug!(
        "🎨 Light sample {}x{}: r={:.1} g={:.1} b={:.1} → {}",
        sample.width,
        sample.height,
        r_avg,
        g_avg,
        b_avg,
        color.as_str()
    );

    Ok(color)
}

// ============================================================================
// TESTS
// ============================================================================
