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

//! Reading, writing and comparing the editable tag fields of an audio file.
//!
//! Reads are forgiving: a missing file or a file without tags simply yields
//! empty [`Metadata`]. Saves are not, and every failure is wrapped with the
//! stage that failed so it can be shown to the user verbatim.
//!
//! A save that carries a cover image is performed with one of two
//! interchangeable strategies, selected by [`CoverStrategy`]:
//!
//! * [`CoverStrategy::Embed`] reads the image and attaches it in-process as a
//!   front-cover picture.
//! * [`CoverStrategy::Transcode`] hands the work to an external transcoder
//!   (see [`transcode`]), which rewrites the file with the image attached.
//!
//! Either way the file is re-read afterwards and the result compared with the
//! snapshot taken before the edit, see [`diff`].

pub(crate) mod transcode;

use std::{
    fs,
    path::{Path, PathBuf},
};

use lofty::{
    config::{ParseOptions, ParsingMode, WriteOptions},
    error::LoftyError,
    picture::{MimeType, Picture, PictureType},
    prelude::*,
    probe::Probe,
    tag::Tag,
};
use tracing::{debug, info};

use crate::{
    config::CoverStrategy,
    metadata::transcode::{CommandError, CommandRunner, SystemRunner, Transcoder},
};

const EMPTY_PLACEHOLDER: &str = "(empty)";
const COVER_LABEL: &str = "Cover Image";

/// The four editable fields of one audio file.
///
/// An empty string means "unset"; there is no separate null state.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub(crate) struct Metadata {
    pub(crate) track_name: String,
    pub(crate) artist: String,
    pub(crate) album: String,
    pub(crate) cover_path: String,
}

impl Metadata {
    #[cfg(test)]
    pub(crate) fn new(track_name: &str, artist: &str, album: &str) -> Self {
        Self {
            track_name: track_name.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            cover_path: String::new(),
        }
    }

    fn text_fields(&self) -> [(&'static str, &str); 3] {
        [
            ("Track Name", &self.track_name),
            ("Artist", &self.artist),
            ("Album", &self.album),
        ]
    }
}

#[derive(Debug, thiserror::Error)]
pub(crate) enum MetadataError {
    #[error("failed to open file: {0}")]
    OpenFile(#[source] LoftyError),

    #[error("failed to open file: {} does not support tags", .0.display())]
    Unsupported(PathBuf),

    #[error("failed to read cover image: {0}")]
    ReadCover(#[source] std::io::Error),

    #[error("failed to save metadata: {0}")]
    SaveTag(#[source] LoftyError),

    #[error("failed to set cover: {0}")]
    SetCover(#[source] CommandError),

    #[error("failed to replace original file: {0}")]
    ReplaceOriginal(#[source] std::io::Error),
}

/// Reads the tag fields of `path`.
///
/// Never fails: anything that prevents the tag from being read results in
/// empty metadata, since untagged files are an ordinary part of browsing.
pub(crate) fn read(path: &Path) -> Metadata {
    let tagged_file = match Probe::open(path).and_then(|p| p.options(parse_options(false)).read()) {
        Ok(file) => file,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no readable tag, using empty metadata");
            return Metadata::default();
        }
    };

    let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) else {
        debug!(path = %path.display(), "file has no tag");
        return Metadata::default();
    };

    Metadata {
        track_name: tag.title().map(|s| s.to_string()).unwrap_or_default(),
        artist: tag.artist().map(|s| s.to_string()).unwrap_or_default(),
        album: tag.album().map(|s| s.to_string()).unwrap_or_default(),
        cover_path: String::new(),
    }
}

/// Describes which of the text fields differ between two snapshots.
///
/// One line per changed field, `"<Field>: <before> → <after>"`, with empty
/// values shown as `(empty)`. An empty string means nothing changed.
pub(crate) fn diff(before: &Metadata, after: &Metadata) -> String {
    before
        .text_fields()
        .into_iter()
        .zip(after.text_fields())
        .filter(|((_, old), (_, new))| old != new)
        .map(|((label, old), (_, new))| {
            format!("{label}: {} → {}", or_placeholder(old), or_placeholder(new))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn or_placeholder(value: &str) -> &str {
    if value.is_empty() { EMPTY_PLACEHOLDER } else { value }
}

/// Picks the picture MIME type from the cover file's extension, defaulting to
/// JPEG for anything unrecognised.
pub(crate) fn cover_mime_type(path: &Path) -> MimeType {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => MimeType::Png,
        "gif" => MimeType::Gif,
        _ => MimeType::Jpeg,
    }
}

fn parse_options(read_cover_art: bool) -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .read_cover_art(read_cover_art)
        .parsing_mode(ParsingMode::BestAttempt)
}

/// The result of a successful save.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct SaveOutcome {
    /// What changed, as produced by [`diff`], plus a line naming the cover
    /// image when one was attached. Empty if nothing did.
    pub(crate) changes: String,
    /// The fields as re-read from the file after writing.
    pub(crate) saved: Metadata,
}

/// Persists edited metadata using the configured cover strategy.
pub(crate) struct MetadataStore {
    strategy: CoverStrategy,
    transcoder: Transcoder,
}

impl MetadataStore {
    pub(crate) fn new(strategy: CoverStrategy, transcoder_program: &str) -> Self {
        Self::with_runner(strategy, transcoder_program, Box::new(SystemRunner))
    }

    pub(crate) fn with_runner(
        strategy: CoverStrategy,
        transcoder_program: &str,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            strategy,
            transcoder: Transcoder::new(transcoder_program, runner),
        }
    }

    /// Writes `edited` to `path` and reports what changed relative to `before`.
    ///
    /// Without a cover path, only the non-empty text fields are written and
    /// empty ones leave the existing tag value alone. With a cover path, the
    /// configured [`CoverStrategy`] attaches the image as the front cover.
    ///
    /// The returned change description compares `before` with the file as re-read
    /// after the write and notes an attached cover; it is empty when no field
    /// effectively changed and no cover was given.
    pub(crate) fn save(
        &self,
        path: &Path,
        before: &Metadata,
        edited: &Metadata,
    ) -> Result<SaveOutcome, MetadataError> {
        info!(path = %path.display(), with_cover = !edited.cover_path.is_empty(), "saving metadata");

        if !edited.cover_path.is_empty() && self.strategy == CoverStrategy::Transcode {
            self.transcoder.embed_cover(path, edited)?;
        } else {
            write_tag(path, edited)?;
        }

        let saved = read(path);
        let mut changes = diff(before, &saved);
        if !edited.cover_path.is_empty() {
            if !changes.is_empty() {
                changes.push('\n');
            }
            changes.push_str(&format!("{COVER_LABEL}: attached {}", edited.cover_path));
        }
        debug!(path = %path.display(), changes = %changes, "metadata saved");
        Ok(SaveOutcome { changes, saved })
    }
}

// Writes the text fields (and optionally the cover) straight into the file's
// primary tag, creating the tag if the file has none.
fn write_tag(path: &Path, edited: &Metadata) -> Result<(), MetadataError> {
    let cover = if edited.cover_path.is_empty() {
        None
    } else {
        let cover_path = Path::new(&edited.cover_path);
        let data = fs::read(cover_path).map_err(MetadataError::ReadCover)?;
        Some(
            Picture::unchecked(data)
                .pic_type(PictureType::CoverFront)
                .mime_type(cover_mime_type(cover_path))
                .build(),
        )
    };

    // Cover art has to be read so existing pictures survive the rewrite
    let mut tagged_file = Probe::open(path)
        .and_then(|p| p.options(parse_options(true)).read())
        .map_err(MetadataError::OpenFile)?;

    let tag_type = tagged_file.file_type().primary_tag_type();
    if tagged_file.tag(tag_type).is_none() {
        tagged_file.insert_tag(Tag::new(tag_type));
    }
    let tag = tagged_file
        .tag_mut(tag_type)
        .ok_or_else(|| MetadataError::Unsupported(path.to_path_buf()))?;

    if !edited.track_name.is_empty() {
        tag.set_title(edited.track_name.clone());
    }
    if !edited.artist.is_empty() {
        tag.set_artist(edited.artist.clone());
    }
    if !edited.album.is_empty() {
        tag.set_album(edited.album.clone());
    }
    if let Some(picture) = cover {
        tag.remove_picture_type(PictureType::CoverFront);
        tag.push_picture(picture);
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(MetadataError::SaveTag)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::metadata::transcode::{self, tests::fake_runner};

    // MPEG-1 Layer III, 128 kbps, 44.1 kHz, joint stereo, no CRC
    const FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x64];
    const FRAME_LEN: usize = 417;

    /// Writes a short run of silent MP3 frames with no tag.
    pub(crate) fn silent_mp3(dir: &Path, name: &str) -> PathBuf {
        let mut data = Vec::with_capacity(FRAME_LEN * 16);
        for _ in 0..16 {
            data.extend_from_slice(&FRAME_HEADER);
            data.extend(std::iter::repeat_n(0u8, FRAME_LEN - FRAME_HEADER.len()));
        }
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        path
    }

    fn store() -> MetadataStore {
        MetadataStore::new(CoverStrategy::Embed, "ffmpeg")
    }

    fn front_cover(path: &Path) -> Option<Picture> {
        let tagged_file = Probe::open(path)
            .unwrap()
            .options(parse_options(true))
            .read()
            .unwrap();
        tagged_file
            .primary_tag()?
            .pictures()
            .iter()
            .find(|p| p.pic_type() == PictureType::CoverFront)
            .cloned()
    }

    #[test]
    fn read_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read(&dir.path().join("missing.mp3")), Metadata::default());
    }

    #[test]
    fn read_untagged_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "untagged.mp3");
        assert_eq!(read(&path), Metadata::default());
    }

    #[test]
    fn save_then_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");

        let edited = Metadata::new("Saved Song", "Saved Artist", "Saved Album");
        let outcome = store().save(&path, &Metadata::default(), &edited).unwrap();

        assert_eq!(outcome.changes.matches("(empty)").count(), 3);

        assert_eq!(read(&path), edited);
    }

    #[test]
    fn save_with_empty_fields_leaves_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");
        let original = Metadata::new("Test Song", "Test Artist", "Test Album");
        store().save(&path, &Metadata::default(), &original).unwrap();

        let changes = store()
            .save(&path, &original, &Metadata::default())
            .unwrap()
            .changes;

        assert_eq!(changes, "");
        assert_eq!(read(&path), original);
    }

    #[test]
    fn save_with_empty_fields_on_untagged_file_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");

        let changes = store()
            .save(&path, &Metadata::default(), &Metadata::default())
            .unwrap()
            .changes;

        assert_eq!(changes, "");
    }

    #[test]
    fn save_reports_only_changed_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");
        let original = Metadata::new("Song", "Artist", "Album");
        store().save(&path, &Metadata::default(), &original).unwrap();

        let edited = Metadata::new("Song", "Other Artist", "");
        let outcome = store().save(&path, &original, &edited).unwrap();

        assert_eq!(outcome.changes, "Artist: Artist → Other Artist");
        assert_eq!(outcome.saved, Metadata::new("Song", "Other Artist", "Album"));
    }

    #[test]
    fn save_embeds_front_cover() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");
        let cover = dir.path().join("cover.png");
        fs::write(&cover, [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]).unwrap();

        let mut edited = Metadata::new("Song", "Artist", "Album");
        edited.cover_path = cover.to_string_lossy().to_string();
        let outcome = store().save(&path, &Metadata::default(), &edited).unwrap();

        assert_eq!(
            outcome.changes.lines().last(),
            Some(format!("Cover Image: attached {}", cover.display()).as_str())
        );
        let picture = front_cover(&path).expect("front cover should be embedded");
        assert_eq!(picture.mime_type(), Some(&MimeType::Png));
        assert_eq!(read(&path), Metadata::new("Song", "Artist", "Album"));
    }

    #[test]
    fn cover_only_save_reports_the_cover() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");
        let original = Metadata::new("Song", "Artist", "Album");
        store().save(&path, &Metadata::default(), &original).unwrap();
        let cover = dir.path().join("cover.jpg");
        fs::write(&cover, [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let edited = Metadata {
            cover_path: cover.to_string_lossy().to_string(),
            ..Metadata::default()
        };
        let outcome = store().save(&path, &original, &edited).unwrap();

        assert_eq!(outcome.changes, format!("Cover Image: attached {}", cover.display()));
        assert_eq!(outcome.saved, original);
        assert!(front_cover(&path).is_some());
    }

    #[test]
    fn transcode_strategy_hands_cover_to_runner() {
        let dir = tempfile::tempdir().unwrap();
        // What the transcoder "produces": a tagged copy without a picture
        let produced = silent_mp3(dir.path(), "produced.mp3");
        let tagged = Metadata::new("Song", "Artist", "Album");
        store().save(&produced, &Metadata::default(), &tagged).unwrap();

        let path = silent_mp3(dir.path(), "test.mp3");
        let (runner, calls) = fake_runner(fs::read(&produced).unwrap(), true);
        let store = MetadataStore::with_runner(CoverStrategy::Transcode, "ffmpeg", runner);
        let mut edited = tagged.clone();
        edited.cover_path = dir.path().join("cover.jpg").to_string_lossy().to_string();

        let outcome = store.save(&path, &Metadata::default(), &edited).unwrap();

        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(calls.borrow()[0].0, "ffmpeg");
        assert!(front_cover(&path).is_none());
        assert_eq!(outcome.saved, tagged);
        assert_eq!(outcome.changes.lines().count(), 4);
        assert!(outcome.changes.contains("Track Name: (empty) → Song"));
        assert!(!transcode::temp_path(&path).exists());
    }

    #[test]
    fn transcode_failure_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");
        let before = fs::read(&path).unwrap();
        let (runner, calls) = fake_runner(b"partial".to_vec(), false);
        let store = MetadataStore::with_runner(CoverStrategy::Transcode, "ffmpeg", runner);
        let mut edited = Metadata::new("Song", "Artist", "Album");
        edited.cover_path = dir.path().join("cover.jpg").to_string_lossy().to_string();

        let err = store.save(&path, &Metadata::default(), &edited).unwrap_err();

        assert!(matches!(err, MetadataError::SetCover(_)));
        assert_eq!(calls.borrow().len(), 1);
        assert_eq!(fs::read(&path).unwrap(), before);
        assert!(!transcode::temp_path(&path).exists());
    }

    #[test]
    fn transcode_strategy_without_cover_writes_in_process() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");
        let (runner, calls) = fake_runner(Vec::new(), true);
        let store = MetadataStore::with_runner(CoverStrategy::Transcode, "ffmpeg", runner);
        let edited = Metadata::new("Song", "Artist", "Album");

        store.save(&path, &Metadata::default(), &edited).unwrap();

        assert!(calls.borrow().is_empty());
        assert_eq!(read(&path), edited);
    }

    #[test]
    fn save_with_unreadable_cover_fails_without_touching_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = silent_mp3(dir.path(), "test.mp3");
        let before = fs::read(&path).unwrap();

        let mut edited = Metadata::new("Song", "Artist", "Album");
        edited.cover_path = dir.path().join("missing.jpg").to_string_lossy().to_string();
        let err = store().save(&path, &Metadata::default(), &edited).unwrap_err();

        assert!(matches!(err, MetadataError::ReadCover(_)));
        assert!(err.to_string().starts_with("failed to read cover image"));
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn save_to_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let edited = Metadata::new("Song", "Artist", "Album");
        let err = store()
            .save(&dir.path().join("missing.mp3"), &Metadata::default(), &edited)
            .unwrap_err();
        assert!(matches!(err, MetadataError::OpenFile(_)));
    }

    #[test]
    fn diff_of_identical_snapshots_is_empty() {
        let m = Metadata::new("Song", "Artist", "Album");
        assert_eq!(diff(&m, &m), "");
        assert_eq!(diff(&Metadata::default(), &Metadata::default()), "");
    }

    #[test]
    fn diff_lists_every_changed_field() {
        let before = Metadata::new("Song", "Artist", "Album");
        let after = Metadata::new("New Song", "New Artist", "New Album");
        let changes = diff(&before, &after);

        assert!(changes.contains("Track Name"));
        assert!(changes.contains("Artist"));
        assert!(changes.contains("Album"));
        assert_eq!(changes.lines().count(), 3);
        assert_eq!(changes.lines().next(), Some("Track Name: Song → New Song"));
    }

    #[test]
    fn diff_uses_placeholder_for_empty_values() {
        let changes = diff(&Metadata::default(), &Metadata::new("Song", "Artist", "Album"));
        assert_eq!(changes.matches("(empty)").count(), 3);

        let changes = diff(&Metadata::new("Song", "", ""), &Metadata::default());
        assert_eq!(changes, "Track Name: Song → (empty)");
    }

    #[test]
    fn diff_ignores_cover_path() {
        let before = Metadata::new("Song", "Artist", "Album");
        let mut after = before.clone();
        after.cover_path = "/tmp/cover.jpg".to_string();
        assert_eq!(diff(&before, &after), "");
    }

    #[test]
    fn cover_mime_type_from_extension() {
        assert_eq!(cover_mime_type(Path::new("a.jpg")), MimeType::Jpeg);
        assert_eq!(cover_mime_type(Path::new("a.JPEG")), MimeType::Jpeg);
        assert_eq!(cover_mime_type(Path::new("a.png")), MimeType::Png);
        assert_eq!(cover_mime_type(Path::new("a.gif")), MimeType::Gif);
        assert_eq!(cover_mime_type(Path::new("a.webp")), MimeType::Jpeg);
        assert_eq!(cover_mime_type(Path::new("cover")), MimeType::Jpeg);
    }
}
