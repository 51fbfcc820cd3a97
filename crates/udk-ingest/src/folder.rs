//! Folder scanning: every PDF in a directory becomes a text file and a
//! batch of rows in the documents table.

use std::path::{Path, PathBuf};

use udk_core::ArticleStore;
use udk_parsing::{ArticleExtractor, ParsingConfig};

use crate::{IngestError, PdfBackend, SegmentStats};

/// Where to read PDFs from and where to put the results.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub pdf_dir: PathBuf,
    pub text_dir: PathBuf,
    pub database: PathBuf,
    pub parsing: ParsingConfig,
}

/// Outcome for one PDF.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub pdf_path: PathBuf,
    pub text_path: PathBuf,
    pub file_number: u32,
    pub records_inserted: usize,
    pub stats: SegmentStats,
}

/// Outcome for a whole folder.
#[derive(Debug, Clone, Default)]
pub struct FolderReport {
    pub files: Vec<FileReport>,
    pub failed: Vec<(PathBuf, String)>,
}

impl FolderReport {
    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records_inserted).sum()
    }
}

/// Progress events emitted by [`ingest_folder`].
#[derive(Debug, Clone)]
pub enum IngestProgress {
    Started { total: usize },
    FileStarted { index: usize, total: usize, path: PathBuf },
    FileDone { index: usize, total: usize, report: FileReport },
    FileFailed { index: usize, total: usize, path: PathBuf, error: String },
    Finished { files: usize, failed: usize, records: usize },
}

/// All `.pdf` files (any case) directly inside `dir`, sorted by file name.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::NotADirectory(dir.to_path_buf()));
    }
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| IngestError::io(dir, e))? {
        let path = entry.map_err(|e| IngestError::io(dir, e))?.path();
        let is_pdf = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("pdf"))
            .unwrap_or(false);
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(pdfs)
}

/// `<out_dir>/<pdf stem>_extracted_text.txt`
pub fn text_output_path(pdf: &Path, out_dir: &Path) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    out_dir.join(format!("{stem}_extracted_text.txt"))
}

/// Extract `pdf` and write its text to `out_path` as UTF-8.
pub fn extract_to_text_file(
    pdf: &Path,
    out_path: &Path,
    backend: &dyn PdfBackend,
) -> Result<String, IngestError> {
    let text = backend.extract_text(pdf)?;
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| IngestError::io(parent, e))?;
    }
    std::fs::write(out_path, &text).map_err(|e| IngestError::io(out_path, e))?;
    tracing::info!(
        pdf = %pdf.display(),
        text = %out_path.display(),
        backend = backend.name(),
        "extracted text"
    );
    Ok(text)
}

/// Extract, save, segment and store one PDF.
pub fn ingest_file(
    pdf: &Path,
    file_number: u32,
    text_dir: &Path,
    backend: &dyn PdfBackend,
    extractor: &ArticleExtractor,
    store: &mut ArticleStore,
) -> Result<FileReport, IngestError> {
    let text_path = text_output_path(pdf, text_dir);
    let text = extract_to_text_file(pdf, &text_path, backend)?;

    let extraction = extractor.extract_articles_from_text(&text, file_number);
    let inserted = store.insert_records(&extraction.records)?;

    tracing::info!(
        pdf = %pdf.display(),
        file_number,
        segments = extraction.stats.total_segments,
        with_keywords = extraction.stats.with_keywords,
        inserted,
        "ingested file"
    );

    Ok(FileReport {
        pdf_path: pdf.to_path_buf(),
        text_path,
        file_number,
        records_inserted: inserted,
        stats: extraction.stats,
    })
}

/// Ingest every PDF of `opts.pdf_dir`, numbering files from 1 in name order.
///
/// The database is opened and closed around each file. Files whose text
/// cannot be extracted are reported and skipped; database errors abort.
pub fn ingest_folder(
    opts: &IngestOptions,
    backend: &dyn PdfBackend,
    mut progress: impl FnMut(IngestProgress),
) -> Result<FolderReport, IngestError> {
    let pdfs = list_pdfs(&opts.pdf_dir)?;
    let total = pdfs.len();
    progress(IngestProgress::Started { total });

    let extractor = ArticleExtractor::with_config(opts.parsing.clone());
    let mut report = FolderReport::default();

    for (index, pdf) in pdfs.iter().enumerate() {
        progress(IngestProgress::FileStarted {
            index,
            total,
            path: pdf.clone(),
        });

        let mut store = ArticleStore::open(&opts.database)?;
        let file_number = (index + 1) as u32;
        match ingest_file(pdf, file_number, &opts.text_dir, backend, &extractor, &mut store) {
            Ok(file_report) => {
                store.close()?;
                report.files.push(file_report.clone());
                progress(IngestProgress::FileDone {
                    index,
                    total,
                    report: file_report,
                });
            }
            Err(e @ (IngestError::Store(_) | IngestError::Io { .. })) => return Err(e),
            Err(e) => {
                tracing::warn!(pdf = %pdf.display(), error = %e, "skipping file");
                report.failed.push((pdf.clone(), e.to_string()));
                progress(IngestProgress::FileFailed {
                    index,
                    total,
                    path: pdf.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    progress(IngestProgress::Finished {
        files: report.files.len(),
        failed: report.failed.len(),
        records: report.total_records(),
    });
    Ok(report)
}

/// Re-read a saved text file and split it into raw segments.
pub fn split_text_file(path: &Path, config: &ParsingConfig) -> Result<Vec<String>, IngestError> {
    let bytes = std::fs::read(path).map_err(|e| IngestError::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(udk_parsing::section::split_segments(&text, config)
        .into_iter()
        .map(str::to_string)
        .collect())
}
