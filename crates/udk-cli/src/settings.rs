//! Resolve effective settings: CLI flags > env vars > config file > defaults.

use std::path::PathBuf;

use udk_core::config_file::{
    ConfigFile, ExtractionConfig, ParsingSection, PathsConfig, TokenizerConfig,
};
use udk_ingest::{BackendKind, BackendOptions};
use udk_nlp::{NlpConfig, PadOptions, Padding, Truncating};
use udk_parsing::{ParsingConfig, ParsingConfigBuilder};

pub const DEFAULT_PDF_DIR: &str = "Parsing units";
pub const DEFAULT_TEXT_DIR: &str = "Parsing units text";
pub const DEFAULT_DATABASE: &str = "documents.db";

/// First of: flag, environment value, config file value, `default`.
fn resolve_path(
    flag: Option<PathBuf>,
    env: Option<String>,
    file: Option<&String>,
    default: &str,
) -> PathBuf {
    flag.or_else(|| env.map(PathBuf::from))
        .or_else(|| file.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(default))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

pub fn pdf_dir(flag: Option<PathBuf>, config: &ConfigFile) -> PathBuf {
    let file = config.paths.as_ref().and_then(|p| p.pdf_dir.as_ref());
    resolve_path(flag, env_value("UDK_PDF_DIR"), file, DEFAULT_PDF_DIR)
}

pub fn text_dir(flag: Option<PathBuf>, config: &ConfigFile) -> PathBuf {
    let file = config.paths.as_ref().and_then(|p| p.text_dir.as_ref());
    resolve_path(flag, env_value("UDK_TEXT_DIR"), file, DEFAULT_TEXT_DIR)
}

pub fn database(flag: Option<PathBuf>, config: &ConfigFile) -> PathBuf {
    let file = config.paths.as_ref().and_then(|p| p.database.as_ref());
    resolve_path(flag, env_value("UDK_DATABASE"), file, DEFAULT_DATABASE)
}

pub fn backend(flag: Option<String>, config: &ConfigFile) -> anyhow::Result<BackendOptions> {
    let extraction = config.extraction.as_ref();
    let kind = match flag
        .or_else(|| env_value("UDK_BACKEND"))
        .or_else(|| extraction.and_then(|e| e.backend.clone()))
    {
        Some(name) => name.parse::<BackendKind>()?,
        None => BackendKind::default(),
    };
    Ok(BackendOptions {
        kind,
        header_exclusion: extraction.and_then(|e| e.header_exclusion),
        footer_exclusion: extraction.and_then(|e| e.footer_exclusion),
    })
}

/// Parsing switches given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ParsingOverrides {
    pub segment_marker: Option<String>,
    pub no_keywords: bool,
    pub keep_literature: bool,
    pub keep_page_numbers: bool,
    pub skip_empty: bool,
}

pub fn parsing(
    overrides: &ParsingOverrides,
    config: &ConfigFile,
) -> anyhow::Result<ParsingConfig> {
    let mut builder = ParsingConfigBuilder::new();

    if let Some(ParsingSection {
        segment_marker,
        keywords_marker,
        literature_marker,
        extract_keywords,
        trim_literature,
        skip_empty_segments,
    }) = config.parsing.as_ref()
    {
        if let Some(m) = segment_marker {
            builder = builder.segment_marker(m);
        }
        if let Some(m) = keywords_marker {
            builder = builder.keywords_marker(m);
        }
        if let Some(m) = literature_marker {
            builder = builder.literature_marker(m);
        }
        if let Some(on) = *extract_keywords {
            builder = builder.extract_keywords(on);
        }
        if let Some(on) = *trim_literature {
            builder = builder.trim_literature(on);
        }
        if let Some(on) = *skip_empty_segments {
            builder = builder.skip_empty_segments(on);
        }
    }

    if let Some(ref m) = overrides.segment_marker {
        builder = builder.segment_marker(m);
    }
    if overrides.no_keywords {
        builder = builder.extract_keywords(false);
    }
    if overrides.keep_literature {
        builder = builder.trim_literature(false);
    }
    if overrides.keep_page_numbers {
        builder = builder.strip_page_numbers(false);
    }
    if overrides.skip_empty {
        builder = builder.skip_empty_segments(true);
    }

    Ok(builder.build()?)
}

/// Tokenizer switches given on the command line.
#[derive(Debug, Clone, Default)]
pub struct TokenizerOverrides {
    pub sample: Option<usize>,
    /// `0` disables the vocabulary cut-off.
    pub num_words: Option<usize>,
    pub maxlen: Option<usize>,
    pub padding: Option<String>,
}

pub fn tokenizer(overrides: &TokenizerOverrides, config: &ConfigFile) -> anyhow::Result<NlpConfig> {
    let defaults = NlpConfig::default();
    let file = config.tokenizer.as_ref();

    let sample_size = match overrides.sample.or_else(|| file.and_then(|t| t.sample_size)) {
        Some(0) => anyhow::bail!("sample size must be at least 1"),
        Some(n) => n,
        None => defaults.sample_size,
    };
    let num_words = match overrides.num_words.or_else(|| file.and_then(|t| t.num_words)) {
        Some(0) => None,
        Some(n) => Some(n),
        None => defaults.num_words,
    };
    let maxlen = match overrides.maxlen.or_else(|| file.and_then(|t| t.maxlen)) {
        Some(0) => anyhow::bail!("maxlen must be at least 1"),
        Some(n) => Some(n),
        None => defaults.pad.maxlen,
    };
    let padding = match overrides
        .padding
        .clone()
        .or_else(|| file.and_then(|t| t.padding.clone()))
    {
        Some(side) => side.parse::<Padding>()?,
        None => defaults.pad.padding,
    };

    Ok(NlpConfig {
        sample_size,
        num_words,
        pad: PadOptions {
            maxlen,
            padding,
            truncating: Truncating::Pre,
            value: 0,
        },
    })
}

/// A config file spelling out every default, for `udk config init`.
pub fn starter_config() -> ConfigFile {
    let parsing = ParsingConfig::default();
    let nlp = NlpConfig::default();
    ConfigFile {
        paths: Some(PathsConfig {
            pdf_dir: Some(DEFAULT_PDF_DIR.to_string()),
            text_dir: Some(DEFAULT_TEXT_DIR.to_string()),
            database: Some(DEFAULT_DATABASE.to_string()),
        }),
        parsing: Some(ParsingSection {
            segment_marker: Some(parsing.segment_marker().to_string()),
            keywords_marker: Some(parsing.keywords_marker().to_string()),
            literature_marker: Some(parsing.literature_marker().to_string()),
            extract_keywords: Some(parsing.extract_keywords()),
            trim_literature: Some(parsing.trim_literature()),
            skip_empty_segments: Some(parsing.skip_empty_segments()),
        }),
        extraction: Some(ExtractionConfig {
            backend: Some(BackendKind::default().to_string()),
            header_exclusion: None,
            footer_exclusion: None,
        }),
        tokenizer: Some(TokenizerConfig {
            sample_size: Some(nlp.sample_size),
            num_words: nlp.num_words,
            maxlen: nlp.pad.maxlen,
            padding: Some(nlp.pad.padding.to_string()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_config_file() {
        let config = ConfigFile {
            paths: Some(PathsConfig {
                database: Some("from-file.db".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(
            database(Some("flag.db".into()), &config),
            PathBuf::from("flag.db")
        );
    }

    #[test]
    fn path_layers_in_order() {
        let file = "from-file".to_string();
        let env = || Some("from-env".to_string());

        assert_eq!(resolve_path(None, None, None, "dflt"), PathBuf::from("dflt"));
        assert_eq!(
            resolve_path(None, None, Some(&file), "dflt"),
            PathBuf::from("from-file")
        );
        assert_eq!(
            resolve_path(None, env(), Some(&file), "dflt"),
            PathBuf::from("from-env")
        );
        assert_eq!(
            resolve_path(Some("from-flag".into()), env(), Some(&file), "dflt"),
            PathBuf::from("from-flag")
        );
    }

    // No other test reads UDK_PDF_DIR.
    #[test]
    fn env_var_sits_between_flag_and_config_file() {
        let config = ConfigFile {
            paths: Some(PathsConfig {
                pdf_dir: Some("file-pdfs".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        unsafe { std::env::set_var("UDK_PDF_DIR", "env-pdfs") };
        let from_env = pdf_dir(None, &config);
        let from_flag = pdf_dir(Some("flag-pdfs".into()), &config);
        unsafe { std::env::remove_var("UDK_PDF_DIR") };

        assert_eq!(from_env, PathBuf::from("env-pdfs"));
        assert_eq!(from_flag, PathBuf::from("flag-pdfs"));
        assert_eq!(pdf_dir(None, &config), PathBuf::from("file-pdfs"));
    }

    #[test]
    fn parsing_overrides_apply_last() {
        let config = ConfigFile {
            parsing: Some(ParsingSection {
                segment_marker: Some("UDC ".into()),
                extract_keywords: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let overrides = ParsingOverrides {
            no_keywords: true,
            skip_empty: true,
            ..Default::default()
        };
        let resolved = parsing(&overrides, &config).unwrap();
        assert_eq!(resolved.segment_marker(), "UDC ");
        assert!(!resolved.extract_keywords());
        assert!(resolved.skip_empty_segments());
    }

    #[test]
    fn empty_marker_is_rejected() {
        let overrides = ParsingOverrides {
            segment_marker: Some(String::new()),
            ..Default::default()
        };
        assert!(parsing(&overrides, &ConfigFile::default()).is_err());
    }

    #[test]
    fn tokenizer_defaults_and_unlimited_vocabulary() {
        let nlp = tokenizer(&TokenizerOverrides::default(), &ConfigFile::default()).unwrap();
        assert_eq!(nlp, NlpConfig::default());

        let config = ConfigFile {
            tokenizer: Some(TokenizerConfig {
                num_words: Some(0),
                padding: Some("pre".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let nlp = tokenizer(&TokenizerOverrides::default(), &config).unwrap();
        assert_eq!(nlp.num_words, None);
        assert_eq!(nlp.pad.padding, Padding::Pre);
    }

    #[test]
    fn tokenizer_rejects_bad_values() {
        let zero = TokenizerOverrides {
            maxlen: Some(0),
            ..Default::default()
        };
        assert!(tokenizer(&zero, &ConfigFile::default()).is_err());

        let no_sample = TokenizerOverrides {
            sample: Some(0),
            ..Default::default()
        };
        let err = tokenizer(&no_sample, &ConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("sample size"));

        let file_zero = ConfigFile {
            tokenizer: Some(TokenizerConfig {
                sample_size: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(tokenizer(&TokenizerOverrides::default(), &file_zero).is_err());
        let flagged = TokenizerOverrides {
            sample: Some(2),
            ..Default::default()
        };
        assert_eq!(tokenizer(&flagged, &file_zero).unwrap().sample_size, 2);

        let side = TokenizerOverrides {
            padding: Some("middle".into()),
            ..Default::default()
        };
        assert!(tokenizer(&side, &ConfigFile::default()).is_err());
    }

    #[test]
    fn starter_config_reproduces_defaults() {
        let starter = starter_config();
        assert_eq!(
            tokenizer(&TokenizerOverrides::default(), &starter).unwrap(),
            NlpConfig::default()
        );
        let resolved = parsing(&ParsingOverrides::default(), &starter).unwrap();
        assert_eq!(resolved.segment_marker(), "УДК ");
        assert_eq!(resolved.keywords_marker(), "Ключевые слова:");
        assert_eq!(backend(None, &starter).unwrap().kind, BackendKind::Mupdf);

        let text = toml::to_string_pretty(&starter).unwrap();
        let back: ConfigFile = toml::from_str(&text).unwrap();
        assert_eq!(back, starter);
    }
}
