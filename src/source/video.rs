use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};

use super::{Frame, FrameSource};
use crate::error::Error;

/// Video file source that streams raw RGB frames out of an ffmpeg child
/// process.
///
/// `ffprobe` reports the frame geometry up front, then `ffmpeg` writes
/// tightly packed rgb24 frames to its stdout, which `grab` slices into
/// frames. End of stream means the file is exhausted. Dropping the source
/// kills and reaps the child.
pub struct VideoSource {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    path: PathBuf,
}

impl VideoSource {
    pub fn open(path: &Path) -> Result<Self, Error> {
        let (width, height) = probe_dimensions(path)?;

        let mut child = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-i")
            .arg(path)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("pipe:1")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| tool_error("ffmpeg", e))?;

        // Piped stdout is always present after a successful spawn
        let stdout = child.stdout.take().ok_or_else(|| {
            Error::SourceUnavailable("ffmpeg produced no output pipe".to_string())
        })?;

        tracing::info!(path = %path.display(), width, height, "video opened");
        Ok(Self {
            child,
            stdout,
            width,
            height,
            path: path.to_path_buf(),
        })
    }
}

impl FrameSource for VideoSource {
    fn grab(&mut self) -> Result<Option<Frame>, Error> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];

        match self.stdout.read_exact(&mut buffer) {
            Ok(()) => {}
            // A clean or mid-frame EOF both mean the file is exhausted
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        }

        let frame = Frame::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            Error::SourceUnavailable("video produced a malformed frame".to_string())
        })?;

        Ok(Some(frame))
    }

    fn describe(&self) -> String {
        format!("video {}", self.path.display())
    }
}

impl Drop for VideoSource {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
        tracing::info!(path = %self.path.display(), "video source released");
    }
}

/// Ask ffprobe for the width and height of the first video stream.
fn probe_dimensions(path: &Path) -> Result<(u32, u32), Error> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-show_entries")
        .arg("stream=width,height")
        .arg("-of")
        .arg("csv=p=0")
        .arg(path)
        .output()
        .map_err(|e| tool_error("ffprobe", e))?;

    if !output.status.success() {
        return Err(Error::SourceUnavailable(format!(
            "ffprobe could not read {}",
            path.display()
        )));
    }

    parse_probe_output(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        Error::SourceUnavailable(format!("no video stream in {}", path.display()))
    })
}

/// Parse ffprobe's `csv=p=0` geometry line, e.g. `"640,480\n"`.
fn parse_probe_output(stdout: &str) -> Option<(u32, u32)> {
    let line = stdout.lines().next()?;
    let mut parts = line.trim().trim_end_matches(',').split(',');
    let width = parts.next()?.parse().ok()?;
    let height = parts.next()?.parse().ok()?;
    if width == 0 || height == 0 {
        return None;
    }
    Some((width, height))
}

fn tool_error(tool: &str, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::SourceUnavailable(format!(
            "{tool} not found on PATH (install ffmpeg for video playback)"
        ))
    } else {
        Error::SourceUnavailable(format!("{tool}: {e}"))
    }
}
