// src/replay.rs
//
// Scenario replay. Recorded per-frame detection logs (JSONL, one frame per
// line) stand in for the live camera + detector, so the monitor can run
// without either. Each record carries the frame's detections and the solid
// color its synthetic surface is painted with.

use crate::types::Detection;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

const SCENARIO_EXTENSION: &str = "jsonl";

/// One recorded frame: what the detector reported, and the fill color the
/// synthetic camera frame is painted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFrame {
    pub detections: Vec<Detection>,
    pub fill: [u8; 3],
}

impl ScenarioFrame {
    /// Paint the frame-sized RGBA buffer the camera would have produced.
    pub fn render_rgba(&self, width: u32, height: u32) -> Vec<u8> {
        let [r, g, b] = self.fill;
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&[r, g, b, 255]);
        }
        data
    }
}

pub fn find_scenario_files(input_dir: &str) -> Result<Vec<PathBuf>> {
    let mut scenarios = Vec::new();

    for entry in WalkDir::new(input_dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) == Some(SCENARIO_EXTENSION) {
            scenarios.push(path.to_path_buf());
        }
    }

    scenarios.sort();
    info!("Found {} scenario file(s)", scenarios.len());
    Ok(scenarios)
}

pub struct ScenarioReader {
    reader: BufReader<File>,
    path: PathBuf,
    line_no: usize,
}

impl ScenarioReader {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open scenario {}", path.display()))?;
        Ok(Self {
            reader: BufReader::new(file),
            path: path.to_path_buf(),
            line_no: 0,
        })
    }

    /// Next recorded frame, `None` at end of scenario. Blank lines are
    /// skipped; a malformed line is an error with its location attached.
    pub fn next_frame(&mut self) -> Result<Option<ScenarioFrame>> {
        loop {
            let mut line = String::new();
            self.line_no += 1;
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let frame = serde_json::from_str(trimmed).with_context(|| {
                format!("{}:{}: malformed scenario frame", self.path.display(), self.line_no)
            })?;
            return Ok(Some(frame));
        }
    }
}
