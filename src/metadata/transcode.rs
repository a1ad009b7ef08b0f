// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Cover embedding through an external transcoder.
//!
//! The transcoder copies the audio stream, attaches the image as the front
//! cover and stamps the text fields, writing to a sibling `<file>.tmp.mp3`.
//! Only when it succeeds is the temporary file renamed over the original; on
//! any failure the temporary file is removed and the original is untouched.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
};

use tracing::{debug, warn};

use crate::metadata::{Metadata, MetadataError};

const TEMP_SUFFIX: &str = ".tmp.mp3";

#[derive(Debug, thiserror::Error)]
pub(crate) enum CommandError {
    #[error("could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{output}: {status}")]
    Failed { output: String, status: ExitStatus },
}

/// Runs an external program to completion.
pub(crate) trait CommandRunner {
    /// Returns the combined stdout and stderr output on success.
    fn run(&self, program: &str, args: &[String]) -> Result<String, CommandError>;
}

/// Runs commands as real child processes.
pub(crate) struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String, CommandError> {
        debug!(program, ?args, "running external command");

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if output.status.success() {
            Ok(combined)
        } else {
            Err(CommandError::Failed {
                output: combined,
                status: output.status,
            })
        }
    }
}

pub(crate) struct Transcoder {
    program: String,
    runner: Box<dyn CommandRunner>,
}

impl Transcoder {
    pub(crate) fn new(program: &str, runner: Box<dyn CommandRunner>) -> Self {
        Self {
            program: program.to_string(),
            runner,
        }
    }

    /// Rewrites `path` with the cover image and text fields of `metadata`.
    pub(crate) fn embed_cover(&self, path: &Path, metadata: &Metadata) -> Result<(), MetadataError> {
        let temp = TempFile::new(temp_path(path));
        let args = transcode_args(path, metadata, temp.path());

        if let Err(e) = self.runner.run(&self.program, &args) {
            warn!(path = %path.display(), error = %e, "transcoder failed");
            return Err(MetadataError::SetCover(e));
        }

        temp.persist(path).map_err(MetadataError::ReplaceOriginal)
    }
}

/// The sibling file the transcoder writes to.
pub(crate) fn temp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

fn transcode_args(input: &Path, metadata: &Metadata, output: &Path) -> Vec<String> {
    let input = input.to_string_lossy();
    let output = output.to_string_lossy();
    let title = format!("title={}", metadata.track_name);
    let artist = format!("artist={}", metadata.artist);
    let album = format!("album={}", metadata.album);

    let args: [&str; 26] = [
        "-i", &input,
        "-i", &metadata.cover_path,
        "-map", "0:0",
        "-map", "1:0",
        "-c:v", "copy",
        "-id3v2_version", "3",
        "-metadata:s:v", "title=Album cover",
        "-metadata:s:v", "comment=Cover (front)",
        "-metadata", &title,
        "-metadata", &artist,
        "-metadata", &album,
        "-c:a", "copy",
        "-y", &output,
    ];
    args.iter().map(|arg| arg.to_string()).collect()
}

// Removes the temporary file on drop unless it has been renamed into place.
struct TempFile {
    path: PathBuf,
    persisted: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path, persisted: false }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn persist(mut self, target: &Path) -> std::io::Result<()> {
        fs::rename(&self.path, target)?;
        self.persisted = true;
        Ok(())
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.persisted && self.path.exists() {
            fs::remove_file(&self.path).ok();
        }
    }
}
