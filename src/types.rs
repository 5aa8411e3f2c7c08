use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub video: VideoConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub input_dir: String,
    pub frame_width: usize,
    pub frame_height: usize,
    pub target_fps: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// 0 = replay every frame the scenario has.
    pub max_frames: u64,
    /// Abort the scenario on a sampling failure instead of skipping the frame.
    pub halt_on_sample_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// One object-recognition result for a frame, as delivered by the external
/// detection source. The evaluator never mutates these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub class_name: String,
    pub bbox: BoundingBox,
    pub confidence: f32,
}

/// Axis-aligned rectangle in frame pixel coordinates, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    /// Clamp the box against the frame edges. The clamped width/height can
    /// come out ≤ 0 for a box entirely outside the frame; callers check
    /// `is_degenerate` before sampling.
    pub fn clamped(&self, frame_width: f32, frame_height: f32) -> BoundingBox {
        let x = self.x.max(0.0);
        let y = self.y.max(0.0);
        BoundingBox {
            x,
            y,
            width: (frame_width - x).min(self.width),
            height: (frame_height - y).min(self.height),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
