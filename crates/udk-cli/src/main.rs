use std::io::{IsTerminal, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use udk_core::ArticleStore;
use udk_core::config_file::{self, ConfigFile};
use udk_ingest::{BackendOptions, IngestOptions, IngestProgress};
use udk_parsing::{ArticleExtractor, ParsingConfig};

mod logging;
mod output;
mod settings;

use output::ColorMode;
use settings::{ParsingOverrides, TokenizerOverrides};

/// UDK article splitter - cut journal issues into articles and store them in SQLite
#[derive(Parser, Debug)]
#[command(name = "udk", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// More log output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the text of one PDF into a UTF-8 text file
    Extract {
        /// PDF to extract
        pdf: PathBuf,

        /// Output text file [default: <text-dir>/<stem>_extracted_text.txt]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Folder for extracted text files
        #[arg(long)]
        text_dir: Option<PathBuf>,

        /// PDF backend: mupdf or pdf-extract
        #[arg(long)]
        backend: Option<String>,
    },

    /// Print the parts of a PDF or text file split at the UDK marker
    Split {
        /// PDF or extracted .txt file
        file: PathBuf,

        /// Segment delimiter
        #[arg(long)]
        marker: Option<String>,

        /// PDF backend: mupdf or pdf-extract
        #[arg(long)]
        backend: Option<String>,
    },

    /// Extract, split and store every PDF of a folder
    Ingest {
        /// Folder with the PDFs
        #[arg(long)]
        pdf_dir: Option<PathBuf>,

        /// Folder for extracted text files
        #[arg(long)]
        text_dir: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// PDF backend: mupdf or pdf-extract
        #[arg(long)]
        backend: Option<String>,

        #[command(flatten)]
        parsing: ParsingArgs,
    },

    /// Extract, split and store a single PDF under a given file number
    IngestFile {
        /// PDF to ingest
        pdf: PathBuf,

        /// File number stored with every record
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        number: u32,

        /// Folder for extracted text files
        #[arg(long)]
        text_dir: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// PDF backend: mupdf or pdf-extract
        #[arg(long)]
        backend: Option<String>,

        #[command(flatten)]
        parsing: ParsingArgs,
    },

    /// List stored records
    Records {
        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Only records of this file number
        #[arg(long)]
        file: Option<u32>,
    },

    /// Lemmatize stored articles and build padded token sequences
    Tokenize {
        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// Number of stored articles to read
        #[arg(long)]
        sample: Option<usize>,

        /// Vocabulary cut-off (0 = unlimited)
        #[arg(long)]
        num_words: Option<usize>,

        /// Padded sequence length
        #[arg(long)]
        maxlen: Option<usize>,

        /// Padding side: pre or post
        #[arg(long)]
        padding: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the lemmas of a text (reads stdin when TEXT is omitted)
    Lemmatize {
        text: Option<String>,
    },

    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration file contents
    Show,
    /// Write a config file populated with the defaults
    Init {
        /// Target file [default: platform config directory]
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Segmentation switches shared by the ingest commands.
#[derive(Args, Debug, Default)]
struct ParsingArgs {
    /// Segment delimiter
    #[arg(long)]
    marker: Option<String>,

    /// Do not extract keywords; keep the keyword prefix in the body
    #[arg(long)]
    no_keywords: bool,

    /// Keep the literature list in the body
    #[arg(long)]
    keep_literature: bool,

    /// Keep leading page numbers after the UDK line
    #[arg(long)]
    keep_page_numbers: bool,

    /// Do not store blank segments
    #[arg(long)]
    skip_empty: bool,
}

impl From<ParsingArgs> for ParsingOverrides {
    fn from(args: ParsingArgs) -> Self {
        Self {
            segment_marker: args.marker,
            no_keywords: args.no_keywords,
            keep_literature: args.keep_literature,
            keep_page_numbers: args.keep_page_numbers,
            skip_empty: args.skip_empty,
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _log_guard = logging::init(cli.verbose, cli.log_file.as_deref())?;
    let config = config_file::load_config();
    tracing::debug!(?config, "loaded configuration");
    let color = ColorMode(!cli.no_color && std::io::stdout().is_terminal());

    match cli.command {
        Command::Extract {
            pdf,
            output,
            text_dir,
            backend,
        } => extract(&pdf, output, text_dir, backend, &config, color),
        Command::Split {
            file,
            marker,
            backend,
        } => split(&file, marker, backend, &config, color),
        Command::Ingest {
            pdf_dir,
            text_dir,
            db,
            backend,
            parsing,
        } => {
            let opts = IngestOptions {
                pdf_dir: settings::pdf_dir(pdf_dir, &config),
                text_dir: settings::text_dir(text_dir, &config),
                database: settings::database(db, &config),
                parsing: settings::parsing(&parsing.into(), &config)?,
            };
            ingest(&opts, backend, &config, color)
        }
        Command::IngestFile {
            pdf,
            number,
            text_dir,
            db,
            backend,
            parsing,
        } => {
            let text_dir = settings::text_dir(text_dir, &config);
            let database = settings::database(db, &config);
            let parsing = settings::parsing(&parsing.into(), &config)?;
            let backend = settings::backend(backend, &config)?;
            ingest_file(&pdf, number, &text_dir, &database, parsing, &backend, color)
        }
        Command::Records { db, file } => {
            records(&settings::database(db, &config), file, color)
        }
        Command::Tokenize {
            db,
            sample,
            num_words,
            maxlen,
            padding,
            json,
        } => {
            let overrides = TokenizerOverrides {
                sample,
                num_words,
                maxlen,
                padding,
            };
            let nlp = settings::tokenizer(&overrides, &config)?;
            tokenize(&settings::database(db, &config), &nlp, json, color)
        }
        Command::Lemmatize { text } => lemmatize(text),
        Command::Config { action } => match action {
            ConfigAction::Show => show_config(&config),
            ConfigAction::Init { path, force } => init_config(path, force),
        },
    }
}

fn extract(
    pdf: &Path,
    output: Option<PathBuf>,
    text_dir: Option<PathBuf>,
    backend: Option<String>,
    config: &ConfigFile,
    color: ColorMode,
) -> anyhow::Result<()> {
    if !pdf.exists() {
        anyhow::bail!("File not found: {}", pdf.display());
    }
    let backend = udk_ingest::make_backend(&settings::backend(backend, config)?)?;
    let out_path = output.unwrap_or_else(|| {
        udk_ingest::text_output_path(pdf, &settings::text_dir(text_dir, config))
    });

    let text = udk_ingest::extract_to_text_file(pdf, &out_path, backend.as_ref())?;

    let mut out = std::io::stdout().lock();
    output::print_extraction(&mut out, pdf, &out_path, &text, backend.name(), color)?;
    Ok(())
}

fn split(
    file: &Path,
    marker: Option<String>,
    backend: Option<String>,
    config: &ConfigFile,
    color: ColorMode,
) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    let overrides = ParsingOverrides {
        segment_marker: marker,
        ..Default::default()
    };
    let parsing = settings::parsing(&overrides, config)?;
    let parts = split_parts(file, &parsing, &settings::backend(backend, config)?)?;

    let mut out = std::io::stdout().lock();
    output::print_parts(&mut out, file, &parts, color)?;
    Ok(())
}

/// Saved `.txt` extractions are split as-is; anything else goes through a backend first.
fn split_parts(
    file: &Path,
    parsing: &ParsingConfig,
    backend: &BackendOptions,
) -> anyhow::Result<Vec<String>> {
    let is_text = file
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
    if is_text {
        return Ok(udk_ingest::split_text_file(file, parsing)?);
    }

    let backend = udk_ingest::make_backend(backend)?;
    let text = backend.extract_text(file)?;
    Ok(udk_parsing::section::split_segments(&text, parsing)
        .into_iter()
        .map(str::to_string)
        .collect())
}

fn ingest(
    opts: &IngestOptions,
    backend: Option<String>,
    config: &ConfigFile,
    color: ColorMode,
) -> anyhow::Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Duration;

    if !opts.pdf_dir.is_dir() {
        anyhow::bail!(
            "PDF folder not found: {}. Pass --pdf-dir or set UDK_PDF_DIR",
            opts.pdf_dir.display()
        );
    }
    let backend = udk_ingest::make_backend(&settings::backend(backend, config)?)?;
    tracing::info!(
        pdf_dir = %opts.pdf_dir.display(),
        database = %opts.database.display(),
        backend = backend.name(),
        "starting folder ingestion"
    );

    let bar_style = ProgressStyle::with_template(
        "{spinner:.green} {msg} [{bar:40.green/dim}] {pos}/{len} (eta {eta})",
    )?
    .progress_chars("=> ");

    let bar = ProgressBar::new(0);
    bar.set_style(bar_style);
    bar.enable_steady_tick(Duration::from_millis(120));

    let report = udk_ingest::ingest_folder(opts, backend.as_ref(), |event| match event {
        IngestProgress::Started { total } => {
            bar.set_length(total as u64);
            bar.set_message(format!("Ingesting {} PDFs", total));
        }
        IngestProgress::FileStarted { path, .. } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            bar.set_message(name);
        }
        IngestProgress::FileDone { report, .. } => {
            let _ = bar.suspend(|| {
                output::print_file_report(&mut std::io::stdout(), &report, color)
            });
            bar.inc(1);
        }
        IngestProgress::FileFailed {
            index, path, error, ..
        } => {
            let _ = bar.suspend(|| {
                output::print_file_failure(&mut std::io::stdout(), index + 1, &path, &error, color)
            });
            bar.inc(1);
        }
        IngestProgress::Finished { .. } => bar.finish_and_clear(),
    })?;

    let mut out = std::io::stdout().lock();
    output::print_folder_summary(&mut out, &report, &opts.database, color)?;
    Ok(())
}

fn ingest_file(
    pdf: &Path,
    number: u32,
    text_dir: &Path,
    database: &Path,
    parsing: ParsingConfig,
    backend: &BackendOptions,
    color: ColorMode,
) -> anyhow::Result<()> {
    if !pdf.exists() {
        anyhow::bail!("File not found: {}", pdf.display());
    }
    let backend = udk_ingest::make_backend(backend)?;
    let extractor = ArticleExtractor::with_config(parsing);

    let mut store = ArticleStore::open(database)?;
    let report =
        udk_ingest::ingest_file(pdf, number, text_dir, backend.as_ref(), &extractor, &mut store)?;
    store.close()?;

    let mut out = std::io::stdout().lock();
    output::print_file_report(&mut out, &report, color)?;
    writeln!(out, "Stored in {}", database.display())?;
    Ok(())
}

fn open_existing_store(database: &Path) -> anyhow::Result<ArticleStore> {
    if !database.exists() {
        anyhow::bail!(
            "Database not found at {}. Build it with: udk ingest --db {}",
            database.display(),
            database.display()
        );
    }
    Ok(ArticleStore::open(database)?)
}

fn records(database: &Path, file_number: Option<u32>, color: ColorMode) -> anyhow::Result<()> {
    let store = open_existing_store(database)?;
    let rows = store.fetch_records(file_number)?;

    let mut out = std::io::stdout().lock();
    output::print_records(&mut out, &rows, color)?;
    Ok(())
}

fn tokenize(
    database: &Path,
    nlp: &udk_nlp::NlpConfig,
    json: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let store = open_existing_store(database)?;
    let contents = store.fetch_contents(nlp.sample_size)?;
    store.close()?;

    let mut out = std::io::stdout().lock();
    if contents.is_empty() {
        writeln!(out, "No stored articles in {}", database.display())?;
        return Ok(());
    }

    let report = udk_nlp::run_pass(&contents, nlp)?;
    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        output::print_tokenization(&mut out, &report, color)?;
    }
    Ok(())
}

fn lemmatize(text: Option<String>) -> anyhow::Result<()> {
    let text = match text {
        Some(t) => t,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let lemmas = udk_nlp::Lemmatizer::new().lemmatize(&text);

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", lemmas.join(" "))?;
    Ok(())
}

fn show_config(config: &ConfigFile) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    match config_file::config_path() {
        Some(p) => writeln!(out, "# platform config: {}", p.display())?,
        None => writeln!(out, "# platform config: <unavailable>")?,
    }
    writeln!(out, "# local override: ./.udk.toml")?;
    write!(out, "{}", toml::to_string_pretty(config)?)?;
    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path.or_else(config_file::config_path) {
        Some(p) => p,
        None => anyhow::bail!("Could not determine config directory; pass --path"),
    };
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    config_file::save_to_path(&settings::starter_config(), &path).map_err(anyhow::Error::msg)?;
    println!("Wrote {}", path.display());
    Ok(())
}
