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

//! Application configuration.
//!
//! This module manages the application configuration file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const CONFIG_NAME: &str = "id3tui";

/// How a cover image gets into the file on save.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CoverStrategy {
    /// Attach the image in-process as a front-cover picture.
    #[default]
    Embed,
    /// Rewrite the file with an external transcoder.
    Transcode,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) version: u32,
    pub(crate) cover_strategy: CoverStrategy,
    pub(crate) ffmpeg: String,
    pub(crate) log_level: String,
    pub(crate) show_hidden: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            cover_strategy: CoverStrategy::Embed,
            ffmpeg: "ffmpeg".to_string(),
            log_level: "info".to_string(),
            show_hidden: true,
        }
    }
}

pub(crate) fn load_config() -> AppConfig {
    confy::load(CONFIG_NAME, None).unwrap_or_default()
}

pub(crate) fn config_path() -> Result<PathBuf, confy::ConfyError> {
    confy::get_configuration_file_path(CONFIG_NAME, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id3tui.toml");
        let config = AppConfig {
            cover_strategy: CoverStrategy::Transcode,
            show_hidden: false,
            ..AppConfig::default()
        };

        confy::store_path(&path, &config).unwrap();
        let loaded: AppConfig = confy::load_path(&path).unwrap();

        assert_eq!(loaded.cover_strategy, CoverStrategy::Transcode);
        assert!(!loaded.show_hidden);
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("id3tui.toml");
        std::fs::write(&path, "ffmpeg = \"/opt/bin/ffmpeg\"\n").unwrap();

        let loaded: AppConfig = confy::load_path(&path).unwrap();

        assert_eq!(loaded.ffmpeg, "/opt/bin/ffmpeg");
        assert_eq!(loaded.cover_strategy, CoverStrategy::Embed);
        assert!(loaded.show_hidden);
    }
}
