// src/render.rs
//
// Terminal render sink. The status indicator, recognized-object line and
// overlay instructions go to the log instead of a drawing surface; any real
// display would implement the same trait.

use crate::frame_evaluator::{FrameResult, SafetyVerdict};
use tracing::{debug, info, warn};

pub trait RenderSink {
    fn render(&mut self, frame_id: u64, result: &FrameResult);
}

pub struct TerminalRenderer;

impl TerminalRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn status_marker(verdict: SafetyVerdict) -> &'static str {
    match verdict {
        SafetyVerdict::Stop => "🛑",
        SafetyVerdict::Slow => "⚠️",
        SafetyVerdict::Safe => "✅",
    }
}

impl RenderSink for TerminalRenderer {
    fn render(&mut self, frame_id: u64, result: &FrameResult) {
        let marker = status_marker(result.verdict);
        let status = result.verdict.as_str();
        let recognized = result.recognized_summary();

        match result.verdict {
            SafetyVerdict::Stop => {
                warn!("Frame {}: {} {} | recognized: {}", frame_id, marker, status, recognized)
            }
            _ => info!("Frame {}: {} {} | recognized: {}", frame_id, marker, status, recognized),
        }

        for drawable in &result.drawables {
            debug!(
                "  box '{}' at ({:.0},{:.0}) {:.0}x{:.0}",
                drawable.label,
                drawable.bbox.x,
                drawable.bbox.y,
                drawable.bbox.width,
                drawable.bbox.height
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_markers_are_distinct() {
        let markers = [
            status_marker(SafetyVerdict::Stop),
            status_marker(SafetyVerdict::Slow),
            status_marker(SafetyVerdict::Safe),
        ];
        assert_ne!(markers[0], markers[1]);
        assert_ne!(markers[1], markers[2]);
        assert_ne!(markers[0], markers[2]);
    }
}
