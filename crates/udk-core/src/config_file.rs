use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub paths: Option<PathsConfig>,
    pub parsing: Option<ParsingSection>,
    pub extraction: Option<ExtractionConfig>,
    pub tokenizer: Option<TokenizerConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    pub pdf_dir: Option<String>,
    pub text_dir: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsingSection {
    pub segment_marker: Option<String>,
    pub keywords_marker: Option<String>,
    pub literature_marker: Option<String>,
    pub extract_keywords: Option<bool>,
    pub trim_literature: Option<bool>,
    pub skip_empty_segments: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// `"mupdf"` or `"pdf-extract"`.
    pub backend: Option<String>,
    pub header_exclusion: Option<f32>,
    pub footer_exclusion: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub sample_size: Option<usize>,
    pub num_words: Option<usize>,
    pub maxlen: Option<usize>,
    /// `"pre"` or `"post"`.
    pub padding: Option<String>,
}

/// Platform config directory path: `<config_dir>/udk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("udk").join("config.toml"))
}

/// Load config by cascading CWD `.udk.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".udk.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

fn pick<S, T: Clone>(overlay: &Option<S>, base: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let (bp, op) = (&base.paths, &overlay.paths);
    let (bs, os) = (&base.parsing, &overlay.parsing);
    let (be, oe) = (&base.extraction, &overlay.extraction);
    let (bt, ot) = (&base.tokenizer, &overlay.tokenizer);

    ConfigFile {
        paths: Some(PathsConfig {
            pdf_dir: pick(op, bp, |p| p.pdf_dir.clone()),
            text_dir: pick(op, bp, |p| p.text_dir.clone()),
            database: pick(op, bp, |p| p.database.clone()),
        }),
        parsing: Some(ParsingSection {
            segment_marker: pick(os, bs, |s| s.segment_marker.clone()),
            keywords_marker: pick(os, bs, |s| s.keywords_marker.clone()),
            literature_marker: pick(os, bs, |s| s.literature_marker.clone()),
            extract_keywords: pick(os, bs, |s| s.extract_keywords),
            trim_literature: pick(os, bs, |s| s.trim_literature),
            skip_empty_segments: pick(os, bs, |s| s.skip_empty_segments),
        }),
        extraction: Some(ExtractionConfig {
            backend: pick(oe, be, |e| e.backend.clone()),
            header_exclusion: pick(oe, be, |e| e.header_exclusion),
            footer_exclusion: pick(oe, be, |e| e.footer_exclusion),
        }),
        tokenizer: Some(TokenizerConfig {
            sample_size: pick(ot, bt, |t| t.sample_size),
            num_words: pick(ot, bt, |t| t.num_words),
            maxlen: pick(ot, bt, |t| t.maxlen),
            padding: pick(ot, bt, |t| t.padding.clone()),
        }),
    }
}

/// Write `config` as pretty TOML to `path`, creating parent directories.
pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(path, content).map_err(|e| format!("Failed to write config: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_round_trip_toml() {
        let config = ConfigFile {
            paths: Some(PathsConfig {
                database: Some("/tmp/documents.db".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.paths.unwrap().database.unwrap(),
            "/tmp/documents.db"
        );
    }

    #[test]
    fn partial_config_parses() {
        let toml_str = "[parsing]\nsegment_marker = \"UDC \"\nextract_keywords = false\n";
        let parsed: ConfigFile = toml::from_str(toml_str).unwrap();
        let parsing = parsed.parsing.unwrap();
        assert_eq!(parsing.segment_marker.as_deref(), Some("UDC "));
        assert_eq!(parsing.extract_keywords, Some(false));
        assert!(parsing.trim_literature.is_none());
        assert!(parsed.paths.is_none());
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            tokenizer: Some(TokenizerConfig {
                num_words: Some(5),
                maxlen: Some(6),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            tokenizer: Some(TokenizerConfig {
                num_words: Some(100),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay).tokenizer.unwrap();
        assert_eq!(merged.num_words, Some(100));
        assert_eq!(merged.maxlen, Some(6));
    }

    #[test]
    fn merge_base_preserved_when_overlay_absent() {
        let base = ConfigFile {
            extraction: Some(ExtractionConfig {
                backend: Some("pdf-extract".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge(base, ConfigFile::default());
        assert_eq!(
            merged.extraction.unwrap().backend.as_deref(),
            Some("pdf-extract")
        );
    }

    #[test]
    fn load_from_path_handles_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_path(&dir.path().join("absent.toml")).is_none());

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[paths\npdf_dir = ").unwrap();
        assert!(load_from_path(&bad).is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("udk").join("config.toml");
        let config = ConfigFile {
            paths: Some(PathsConfig {
                pdf_dir: Some("Parsing units".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        save_to_path(&config, &path).unwrap();
        assert_eq!(load_from_path(&path).unwrap(), config);
    }
}
