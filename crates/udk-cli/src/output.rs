use std::io::Write;
use std::path::Path;

use owo_colors::OwoColorize;
use udk_core::StoredRecord;
use udk_ingest::{FileReport, FolderReport};
use udk_nlp::TokenizationReport;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn header(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }
    Ok(())
}

/// Print the result of a plain text extraction.
pub fn print_extraction(
    w: &mut dyn Write,
    pdf: &Path,
    text_path: &Path,
    text: &str,
    backend: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    let chars = text.chars().count();
    let lines = text.lines().count();
    if color.enabled() {
        writeln!(
            w,
            "{} {} -> {}",
            "EXTRACTED".green(),
            display_name(pdf).bold(),
            text_path.display()
        )?;
        writeln!(
            w,
            "{}",
            format!("({} characters, {} lines, backend: {})", chars, lines, backend).dimmed()
        )?;
    } else {
        writeln!(w, "EXTRACTED {} -> {}", display_name(pdf), text_path.display())?;
        writeln!(w, "({} characters, {} lines, backend: {})", chars, lines, backend)?;
    }
    Ok(())
}

/// Print every segment of a document, numbered from 1.
pub fn print_parts(
    w: &mut dyn Write,
    source: &Path,
    parts: &[String],
    color: ColorMode,
) -> std::io::Result<()> {
    let title = format!("{} ({} parts)", display_name(source), parts.len());
    header(w, &title, color)?;

    for (i, part) in parts.iter().enumerate() {
        let label = format!("Part {}:", i + 1);
        if color.enabled() {
            writeln!(w, "{}", label.cyan().bold())?;
        } else {
            writeln!(w, "{}", label)?;
        }
        writeln!(w, "{}", part)?;
        if color.enabled() {
            writeln!(w, "{}", "-".repeat(20).dimmed())?;
        } else {
            writeln!(w, "{}", "-".repeat(20))?;
        }
    }
    Ok(())
}

/// One line per ingested file.
pub fn print_file_report(
    w: &mut dyn Write,
    report: &FileReport,
    color: ColorMode,
) -> std::io::Result<()> {
    let name = display_name(&report.pdf_path);
    let stats = &report.stats;
    let detail = format!(
        "{} records, {} with keywords, {} bibliographies cut",
        report.records_inserted, stats.with_keywords, stats.literature_trimmed
    );
    if color.enabled() {
        writeln!(
            w,
            "[{}] {} {} ({})",
            report.file_number,
            "OK".green(),
            name.bold(),
            detail
        )?;
    } else {
        writeln!(w, "[{}] OK {} ({})", report.file_number, name, detail)?;
    }
    if stats.empty_segments > 0 {
        let msg = format!("{} empty segments", stats.empty_segments);
        if color.enabled() {
            writeln!(w, "    {}", msg.dimmed())?;
        } else {
            writeln!(w, "    {}", msg)?;
        }
    }
    Ok(())
}

/// A file that was skipped during folder ingestion.
pub fn print_file_failure(
    w: &mut dyn Write,
    file_number: usize,
    path: &Path,
    error: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    let name = display_name(path);
    if color.enabled() {
        writeln!(w, "[{}] {} {}: {}", file_number, "FAILED".red(), name.bold(), error)?;
    } else {
        writeln!(w, "[{}] FAILED {}: {}", file_number, name, error)?;
    }
    Ok(())
}

/// Totals after a folder run.
pub fn print_folder_summary(
    w: &mut dyn Write,
    report: &FolderReport,
    database: &Path,
    color: ColorMode,
) -> std::io::Result<()> {
    let with_keywords: usize = report.files.iter().map(|f| f.stats.with_keywords).sum();

    writeln!(w)?;
    header(w, "SUMMARY", color)?;
    writeln!(w, "  Database: {}", database.display())?;
    writeln!(w, "  Files ingested: {}", report.files.len())?;
    writeln!(w, "  Records stored: {}", report.total_records())?;
    writeln!(w, "  Records with keywords: {}", with_keywords)?;

    if !report.failed.is_empty() {
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "  {} {}", "Failed files:".red(), report.failed.len())?;
        } else {
            writeln!(w, "  Failed files: {}", report.failed.len())?;
        }
        for (path, error) in &report.failed {
            writeln!(w, "    {}: {}", display_name(path), error)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Stored rows, shortened for the terminal.
pub fn print_records(
    w: &mut dyn Write,
    records: &[StoredRecord],
    color: ColorMode,
) -> std::io::Result<()> {
    for row in records {
        let r = &row.record;
        let udk = if r.udk.is_empty() { "-" } else { r.udk.as_str() };
        if color.enabled() {
            writeln!(
                w,
                "#{} file {} {} {}",
                row.id,
                r.file_number,
                "UDK".cyan(),
                udk.bold()
            )?;
        } else {
            writeln!(w, "#{} file {} UDK {}", row.id, r.file_number, udk)?;
        }
        if let Some(ref kw) = r.keywords {
            writeln!(w, "    keywords: {}", kw)?;
        }
        let preview: String = r.content.split_whitespace().collect::<Vec<_>>().join(" ");
        let preview = truncate(&preview, 120);
        if color.enabled() {
            writeln!(w, "    {}", preview.dimmed())?;
        } else {
            writeln!(w, "    {}", preview)?;
        }
    }
    writeln!(w, "{} records", records.len())?;
    Ok(())
}

/// Print the three arrays of a tokenization pass.
pub fn print_tokenization(
    w: &mut dyn Write,
    report: &TokenizationReport,
    color: ColorMode,
) -> std::io::Result<()> {
    label(w, "sequences:", color)?;
    for seq in &report.sequences {
        writeln!(w, "  {:?}", seq)?;
    }
    label(w, "padded_sequences:", color)?;
    for seq in &report.padded_sequences {
        writeln!(w, "  {:?}", seq)?;
    }
    label(w, "word_index:", color)?;
    for (word, index) in &report.word_index {
        writeln!(w, "  {:>4}  {}", index, word)?;
    }
    Ok(())
}

fn label(w: &mut dyn Write, s: &str, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", s.bold())
    } else {
        writeln!(w, "{}", s)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &s[..cut]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use udk_core::{ArticleRecord, SegmentStats};

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("абвгд", 3), "абв...");
        assert_eq!(truncate("абв", 3), "абв");
    }

    #[test]
    fn parts_are_numbered_from_one() {
        let parts = vec!["шапка".to_string(), "004\nтекст".to_string()];
        let out = render(|w| print_parts(w, Path::new("1.pdf"), &parts, ColorMode(false)));
        assert!(out.contains("1.pdf (2 parts)"));
        assert!(out.contains("Part 1:\nшапка\n"));
        assert!(out.contains("Part 2:\n004\nтекст\n"));
    }

    #[test]
    fn folder_summary_lists_failures() {
        let report = FolderReport {
            files: vec![FileReport {
                pdf_path: "pdfs/1.pdf".into(),
                text_path: "text/1_extracted_text.txt".into(),
                file_number: 1,
                records_inserted: 3,
                stats: SegmentStats {
                    total_segments: 3,
                    with_keywords: 2,
                    ..Default::default()
                },
            }],
            failed: vec![("pdfs/2.pdf".into(), "encrypted".to_string())],
        };
        let out = render(|w| {
            print_folder_summary(w, &report, Path::new("documents.db"), ColorMode(false))
        });
        assert!(out.contains("Records stored: 3"));
        assert!(out.contains("Records with keywords: 2"));
        assert!(out.contains("2.pdf: encrypted"));
    }

    #[test]
    fn records_show_keywords_and_preview() {
        let rows = vec![StoredRecord {
            id: 7,
            record: ArticleRecord {
                file_number: 2,
                udk: "004.8".into(),
                keywords: Some("сети".into()),
                content: "Тело\n статьи".into(),
            },
        }];
        let out = render(|w| print_records(w, &rows, ColorMode(false)));
        assert!(out.contains("#7 file 2 UDK 004.8"));
        assert!(out.contains("keywords: сети"));
        assert!(out.contains("Тело статьи"));
    }
}
