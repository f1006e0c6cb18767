//! Output sinks for crawled comments
//!
//! The crawler hands every emitted [`CommentRecord`] to a [`CommentSink`]
//! together with the video it belongs to. [`JsonLinesSink`] writes one
//! newline-delimited JSON file per video for downstream consumers.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::CommentRecord;
use crate::utils::sanitize_filename;

/// Receiver of the crawler's output stream
pub trait CommentSink {
    /// Called before the first record of a video
    fn begin_video(&mut self, video_id: &str) -> io::Result<()>;

    /// Accept one record
    fn emit(&mut self, video_id: &str, record: &CommentRecord) -> io::Result<()>;

    /// Called after the last record of a video, including after a failed crawl
    fn finish_video(&mut self, video_id: &str) -> io::Result<()>;
}

/// Writes `<output_dir>/<video_id>_comments.json`, one JSON object per line
pub struct JsonLinesSink {
    output_dir: PathBuf,
    current: Option<(String, BufWriter<File>)>,
}

impl JsonLinesSink {
    /// Create a sink writing into `output_dir`, creating it if needed
    pub fn new(output_dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(output_dir)?;

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            current: None,
        })
    }

    /// Output path for a video
    pub fn path_for(&self, video_id: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}_comments.json", sanitize_filename(video_id)))
    }
}

impl CommentSink for JsonLinesSink {
    fn begin_video(&mut self, video_id: &str) -> io::Result<()> {
        if let Some((previous, _)) = &self.current {
            tracing::warn!(video_id = %previous, "Previous video was not finished");
        }

        let path = self.path_for(video_id);
        let file = File::create(&path)?;
        tracing::debug!(path = %path.display(), "Opened comment output file");

        self.current = Some((video_id.to_string(), BufWriter::new(file)));
        Ok(())
    }

    fn emit(&mut self, video_id: &str, record: &CommentRecord) -> io::Result<()> {
        let writer = match &mut self.current {
            Some((current, writer)) if current.as_str() == video_id => writer,
            _ => {
                return Err(io::Error::other(format!(
                    "no open output for video {video_id}"
                )))
            }
        };

        serde_json::to_writer(&mut *writer, record)?;
        writer.write_all(b"\n")
    }

    fn finish_video(&mut self, video_id: &str) -> io::Result<()> {
        match self.current.take() {
            Some((current, mut writer)) if current == video_id => writer.flush(),
            Some(other) => {
                self.current = Some(other);
                Ok(())
            }
            None => Ok(()),
        }
    }
}

/// Keeps every record in memory, tagged with its video id
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<(String, CommentRecord)>,
    pub finished: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment ids emitted for a video, in emission order
    pub fn ids_for(&self, video_id: &str) -> Vec<String> {
        self.records
            .iter()
            .filter(|(v, _)| v == video_id)
            .map(|(_, r)| r.id.clone())
            .collect()
    }
}

impl CommentSink for MemorySink {
    fn begin_video(&mut self, _video_id: &str) -> io::Result<()> {
        Ok(())
    }

    fn emit(&mut self, video_id: &str, record: &CommentRecord) -> io::Result<()> {
        self.records.push((video_id.to_string(), record.clone()));
        Ok(())
    }

    fn finish_video(&mut self, video_id: &str) -> io::Result<()> {
        self.finished.push(video_id.to_string());
        Ok(())
    }
}
