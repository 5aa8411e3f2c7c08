// src/frame_evaluator.rs
//
// Per-frame safety decision. Folds one frame's detections into a single
// stop/slow/safe verdict plus the recognized-object list and the clamped
// boxes a render sink should draw. Pure function of its inputs: the sampler
// and the frame dimensions come in as arguments, nothing is cached across
// frames.

use crate::color_classifier::{classify, PixelSample, TrafficLightColor};
use crate::error::InvalidSampleError;
use crate::types::{BoundingBox, Detection};
use tracing::debug;

/// Classes that force a stop on sight, whatever else is in the frame.
pub const STOP_CLASSES: [&str; 3] = ["person", "cat", "dog"];

/// Class label the detector assigns to traffic lights.
pub const TRAFFIC_LIGHT_CLASS: &str = "traffic light";

pub fn is_stop_object(class_name: &str) -> bool {
    STOP_CLASSES.contains(&class_name)
}

// ============================================================================
// PUBLIC TYPES
// ============================================================================

/// The single safety signal for one frame. Stop always dominates slow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SafetyVerdict {
    Stop,
    Slow,
    Safe,
}

impl SafetyVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyVerdict::Stop => "STOP",
            SafetyVerdict::Slow => "SLOW",
            SafetyVerdict::Safe => "SAFE",
        }
    }
}

/// One overlay instruction for the render sink: label + clamped box.
#[derive(Debug, Clone)]
pub struct Drawable {
    pub label: String,
    pub bbox: BoundingBox,
}

/// Everything one evaluation produces. `recognized` and `drawables` mirror
/// the input detection order; the verdict is order-independent.
#[derive(Debug, Clone)]
pub struct FrameResult {
    pub recognized: Vec<String>,
    pub verdict: SafetyVerdict,
    pub drawables: Vec<Drawable>,
}

impl FrameResult {
    /// Recognized labels joined for display, "none" when the frame is empty.
    pub fn recognized_summary(&self) -> String {
        if self.recognized.is_empty() {
            "none".to_string()
        } else {
            self.recognized.join(", ")
        }
    }
}

/// Seam to the external pixel surface. Implementations must return a sample
/// covering exactly the requested region or fail; a truncated sample would
/// skew the color means.
pub trait PixelSampler {
    fn sample(&self, region: &BoundingBox) -> Result<PixelSample, InvalidSampleError>;
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Evaluate one frame's detections against the frame geometry.
///
/// Per detection, in input order: record the label, clamp the box, check the
/// stop-trigger classes, and for traffic lights sample the clamped region and
/// fold the light color into the flags (red/yellow → stop, green → slow,
/// unknown → nothing). Degenerate boxes are recorded but never sampled.
///
/// A sampling failure on a non-degenerate box aborts the evaluation; no
/// partial result is returned.
pub fn evaluate_frame<S: PixelSampler>(
    detections: &[Detection],
    sampler: &S,
    frame_width: f32,
    frame_height: f32,
) -> Result<FrameResult, InvalidSampleError> {
    let mut stop_flag = false;
    let mut slow_flag = false;
    let mut recognized = Vec::with_capacity(detections.len());
    let mut drawables = Vec::with_capacity(detections.len());

    for detection in detections {
        recognized.push(detection.class_name.clone());

        let clamped = detection.bbox.clamped(frame_width, frame_height);
        drawables.push(Drawable {
            label: detection.class_name.clone(),
            bbox: clamped,
        });

        if is_stop_object(&detection.class_name) {
            stop_flag = true;
        }

        if detection.class_name == TRAFFIC_LIGHT_CLASS && !clamped.is_degenerate() {
            let sample = sampler.sample(&clamped)?;
            let color = classify(&sample)?;

            debug!(
                "🚦 Traffic light at ({:.0},{:.0}) {:.0}x{:.0}: {}",
                clamped.x,
                clamped.y,
                clamped.width,
                clamped.height,
                color.as_str()
            );

            match color {
                TrafficLightColor::Red | TrafficLightColor::Yellow => stop_flag = true,
                TrafficLightColor::Green => slow_flag = true,
                TrafficLightColor::Unknown => {}
            }
        }
    }

    let verdict = if stop_flag {
        SafetyVerdict::Stop
    } else if slow_flag {
        SafetyVerdict::Slow
    } else {
        SafetyVerdict::Safe
    };

    Ok(FrameResult {
        recognized,
        verdict,
        drawables,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn det(class_name: &str, x: f32, y: f32, width: f32, height: f32) -> Detection {
        Detection {
            class_name: class_name.to_string(),
            bbox: BoundingBox {
                x,
                y,
                width,
                height,
            },
            confidence: 0.9,
        }
    }

    fn solid_sample(width: u32, height: u32, rgb: [u8; 3]) -> PixelSample {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        PixelSample {
            width,
            height,
            data,
        }
    }

    /// Answers every request with a solid fill and records the regions asked
    /// for, so tests can assert what the evaluator sampled.
    struct RecordingSampler {
        fill: [u8; 3],
        requests: RefCell<Vec<BoundingBox>>,
    }

    impl RecordingSampler {
        fn new(fill: [u8; 3]) -> Self {
            Self {
                fill,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl PixelSampler for RecordingSampler {
        fn sample(&self, region: &BoundingBox) -> Result<PixelSample, InvalidSampleError> {
            self.requests.borrow_mut().push(*region);
            Ok(solid_sample(
                region.width.round() as u32,
                region.height.round() as u32,
                self.fill,
            ))
        }
    }

    /// For frames where sampling must never happen.
    struct PanicSampler;

    impl PixelSampler for PanicSampler {
        fn sample(&self, region: &BoundingBox) -> Result<PixelSample, InvalidSampleError> {
            panic!("sampler invoked for {:?}", region);
        }
    }

    struct FailingSampler;

    impl PixelSampler for FailingSampler {
        fn sample(&self, region: &BoundingBox) -> Result<PixelSample, InvalidSampleError> {
            Err(InvalidSampleError::RegionOutOfBounds {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                surface_width: 0,
                surface_height: 0,
            })
        }
    }

    const RED: [u8; 3] = [210, 40, 35];
    const GREEN: [u8; 3] = [30, 200, 70];
    const YELLOW: [u8; 3] = [230, 200, 40];
    const GRAY: [u8; 3] = [120, 120, 120];

    #[test]
    fn test_empty_frame_is_safe() {
        let result = evaluate_frame(&[], &PanicSampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Safe);
        assert!(result.recognized.is_empty());
        assert!(result.drawables.is_empty());
    }

    #[test]
    fn test_person_forces_stop_without_sampling() {
        let detections = [det("person", 0.0, 0.0, 10.0, 10.0)];
        let result = evaluate_frame(&detections, &PanicSampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Stop);
        assert_eq!(result.recognized, vec!["person"]);
    }

    #[test]
    fn test_non_trigger_class_is_safe() {
        let detections = [det("car", 10.0, 10.0, 40.0, 30.0)];
        let result = evaluate_frame(&detections, &PanicSampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Safe);
        assert_eq!(result.recognized, vec!["car"]);
        assert_eq!(result.drawables.len(), 1);
    }

    #[test]
    fn test_red_light_forces_stop() {
        let detections = [det(TRAFFIC_LIGHT_CLASS, 0.0, 0.0, 10.0, 10.0)];
        let sampler = RecordingSampler::new(RED);
        let result = evaluate_frame(&detections, &sampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Stop);
    }

    #[test]
    fn test_yellow_light_forces_stop() {
        let detections = [det(TRAFFIC_LIGHT_CLASS, 0.0, 0.0, 10.0, 10.0)];
        let sampler = RecordingSampler::new(YELLOW);
        let result = evaluate_frame(&detections, &sampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Stop);
    }

    #[test]
    fn test_green_light_means_slow() {
        let detections = [det(TRAFFIC_LIGHT_CLASS, 0.0, 0.0, 10.0, 10.0)];
        let sampler = RecordingSampler::new(GREEN);
        let result = evaluate_frame(&detections, &sampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Slow);
    }

    #[test]
    fn test_unreadable_light_means_safe() {
        let detections = [det(TRAFFIC_LIGHT_CLASS, 0.0, 0.0, 10.0, 10.0)];
        let sampler = RecordingSampler::new(GRAY);
        let result = evaluate_frame(&detections, &sampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Safe);
    }

    #[test]
    fn test_stop_dominates_slow_in_either_order() {
        let sampler = RecordingSampler::new(GREEN);

        let dog_first = [
            det("dog", 0.0, 0.0, 10.0, 10.0),
            det(TRAFFIC_LIGHT_CLASS, 20.0, 0.0, 10.0, 10.0),
        ];
        let result = evaluate_frame(&dog_first, &sampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Stop);

        let light_first = [
            det(TRAFFIC_LIGHT_CLASS, 20.0, 0.0, 10.0, 10.0),
            det("dog", 0.0, 0.0, 10.0, 10.0),
        ];
        let result = evaluate_frame(&light_first, &sampler, 100.0, 100.0).unwrap();
        assert_eq!(result.verdict, SafetyVerdict::Stop);
    }

    #[test]
    fn test_sampler_receives_clamped_box() {
        let detections = [det(TRAFFIC_LIGHT_CLASS, 90.0, 0.0, 30.0, 10.0)];
        let sampler = RecordingSampler::new(RED);
        evaluate_frame(&detections, &sampler, 100.0, 100.0).unwrap();

        let requests = sampler.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].x, 90.0);
        assert_eq!(requests[0].width, 10.0);
    }

    #[test]
    fn test_degenerate_box_skips_sampling_but_is_recorded() {
        let detections = [det(TRAFFIC_LIGHT_CLASS, 200.0, 10.0, 30.0, 30.0)];
        let result = evaluate_frame(&detections, &PanicSampler, 100.0, 100.0).unwrap();

        assert_eq!(result.verdict, SafetyVerdict::Safe);
        assert_eq!(result.recognized, vec![TRAFFIC_LIGHT_CLASS]);
        assert_eq!(result.drawables.len(), 1);
        assert!(result.drawables[0].bbox.is_degenerate());
    }

    #[test]
    fn test_sampler_failure_propagates() {
        let detections = [det(TRAFFIC_LIGHT_CLASS, 0.0, 0.0, 10.0, 10.0)];
        let result = evaluate_frame(&detections, &FailingSampler, 100.0, 100.0);
        assert!(matches!(
            result,
            Err(InvalidSampleError::RegionOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_duplicate_labels_and_order_are_preserved() {
        let detections = [
            det("car", 0.0, 0.0, 10.0, 10.0),
            det("person", 20.0, 0.0, 10.0, 10.0),
            det("car", 40.0, 0.0, 10.0, 10.0),
        ];
        let result = evaluate_frame(&detections, &PanicSampler, 100.0, 100.0).unwrap();
        assert_eq!(result.recognized, vec!["car", "person", "car"]);
        assert_eq!(result.drawables[1].label, "person");
    }

    #[test]
    fn test_recognized_summary() {
        let detections = [
            det("person", 0.0, 0.0, 10.0, 10.0),
            det("dog", 20.0, 0.0, 10.0, 10.0),
        ];
        let result = evaluate_frame(&detections, &PanicSampler, 100.0, 100.0).unwrap();
        assert_eq!(result.recognized_summary(), "person, dog");

        let empty = evaluate_frame(&[], &PanicSampler, 100.0, 100.0).unwrap();
        assert_eq!(empty.recognized_summary(), "none");
    }
}
