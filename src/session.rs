// src/session.rs - per-session frame log and export
use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use serde::Serialize;

use crate::engine::{FrameOutput, StatusSnapshot};

#[derive(Debug, Serialize)]
struct FrameRecord {
    frame: u32,
    elapsed_s: f64,
    hand_present: bool,
    candidate: Option<String>,
    intent: String,
    volume_percent: Option<i32>,
}

#[derive(Debug, Serialize)]
struct TransitionRecord {
    timestamp: String,
    frame: u32,
    from: String,
    to: String,
}

/// Accumulates one record per processed frame plus every intent transition,
/// and writes them out under a timestamped session directory.
pub struct SessionLog {
    output_dir: PathBuf,
    session_name: String,
    records: Vec<FrameRecord>,
    transitions: Vec<TransitionRecord>,
}

impl SessionLog {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name
            .unwrap_or_else(|| format!("session_{}", Local::now().format("%Y%m%d_%H%M%S")));
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            records: Vec::new(),
            transitions: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, frame: u32, elapsed_s: f64, output: &FrameOutput) {
        self.records.push(FrameRecord {
            frame,
            elapsed_s,
            hand_present: output.candidate.is_some(),
            candidate: output.candidate.map(|c| c.as_str().to_string()),
            intent: output.intent.as_str().to_string(),
            volume_percent: output.volume.percent(),
        });
        if let Some(transition) = output.transition {
            self.transitions.push(TransitionRecord {
                timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
                frame,
                from: transition.from.as_str().to_string(),
                to: transition.to.as_str().to_string(),
            });
        }
    }

    pub fn frame_count(&self) -> usize {
        self.records.len()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    /// Write the per-frame log as CSV; returns the file path.
    pub fn export_frames(&self) -> Result<PathBuf> {
        let path = self.session_dir().join("frames.csv");
        let mut writer = self.csv_writer(&path)?;
        for record in &self.records {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Write the transition log as CSV; returns the file path.
    pub fn export_transitions(&self) -> Result<PathBuf> {
        let path = self.session_dir().join("transitions.csv");
        let mut writer = self.csv_writer(&path)?;
        for record in &self.transitions {
            writer.serialize(record)?;
        }
        writer.flush()?;
        Ok(path)
    }

    /// Dump the final status snapshot as JSON next to the CSVs.
    pub fn write_status(&self, snapshot: &StatusSnapshot) -> Result<PathBuf> {
        let path = self.session_dir().join("status.json");
        self.ensure_session_dir(&path)?;
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }

    fn csv_writer(&self, path: &Path) -> Result<Writer<File>> {
        self.ensure_session_dir(path)?;
        let file =
            File::create(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Writer::from_writer(file))
    }

    fn ensure_session_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        Ok(())
    }
}

/// Default root for session output, next to the user's documents when a
/// home directory exists.
pub fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("GestureIntent")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SimAudioEndpoint;
    use crate::detector::poses;
    use crate::engine::GestureEngine;
    use crate::landmarks::FrameSize;

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gesture_intent_test_{}_{}", tag, std::process::id()))
    }

    #[test]
    fn exports_frames_and_transitions() {
        let root = temp_root("export");
        let mut engine = GestureEngine::new(Some(Box::new(SimAudioEndpoint::new())));
        let mut log = SessionLog::new(&root, Some("unit".to_string()));

        let palm = poses::open_palm(FrameSize::VGA);
        for frame in 0..3u32 {
            let out = engine.process(Some(&palm), FrameSize::VGA);
            log.add_frame(frame, frame as f64 / 30.0, &out);
        }
        assert_eq!(log.frame_count(), 3);
        assert_eq!(log.transition_count(), 1);

        let frames_csv = log.export_frames().unwrap();
        let transitions_csv = log.export_transitions().unwrap();
        let status = log.write_status(&engine.status()).unwrap();

        let frames = std::fs::read_to_string(&frames_csv).unwrap();
        assert!(frames.contains("STOP"));
        let transitions = std::fs::read_to_string(&transitions_csv).unwrap();
        assert!(transitions.contains("Listening..."));
        assert!(transitions.contains("STOP"));
        let status_json = std::fs::read_to_string(&status).unwrap();
        assert!(status_json.contains("\"intent\""));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn no_hand_frames_are_recorded_without_a_candidate() {
        let root = temp_root("nohand");
        let mut engine = GestureEngine::new(None);
        let mut log = SessionLog::new(&root, Some("unit".to_string()));
        let out = engine.process(None, FrameSize::VGA);
        log.add_frame(0, 0.0, &out);

        let frames_csv = log.export_frames().unwrap();
        let frames = std::fs::read_to_string(&frames_csv).unwrap();
        // hand_present=false, empty candidate, empty volume.
        assert!(frames.contains("false"));
        assert!(frames.contains("Listening..."));

        let _ = std::fs::remove_dir_all(&root);
    }
}
