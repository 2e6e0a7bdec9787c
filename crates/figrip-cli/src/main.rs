use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;

use figrip_core::emit::emit_region;
use figrip_core::{segment_page, DocumentSource, FigureSettings, PageAnalysis};
use figrip_pdfium::{bind_pdfium, PdfiumSource};

#[derive(Parser)]
#[command(
    name = "figrip",
    version,
    about = "Extract figure regions from academic PDFs as PNG images"
)]
struct Args {
    /// Input PDF file
    pdf: PathBuf,

    /// Output directory (default: <pdf-basename>_vectors)
    out_dir: Option<PathBuf>,

    /// Write the per-page segmentation analysis as JSON to this path
    #[arg(long, value_name = "PATH")]
    dump_analysis: Option<PathBuf>,
}

#[derive(Serialize)]
struct PageDump {
    page: usize,
    analysis: PageAnalysis,
}

fn default_out_dir(pdf: &PathBuf) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    pdf.with_file_name(format!("{stem}_vectors"))
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    println!(
        "figrip {} (caption-aware figure extraction)",
        env!("CARGO_PKG_VERSION")
    );

    if !args.pdf.is_file() {
        bail!("file not found: {}", args.pdf.display());
    }

    let out_dir = args.out_dir.clone().unwrap_or_else(|| default_out_dir(&args.pdf));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;
    println!("Extracting to: {}", out_dir.display());

    let pdfium = bind_pdfium()?;
    let mut source = PdfiumSource::open(&pdfium, &args.pdf)?;
    let settings = FigureSettings::default();

    let mut total = 0usize;
    let mut dumps: Vec<PageDump> = Vec::new();

    for page_index in 0..source.page_count() {
        let content = match source.page_content(page_index) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("skipping page {}: {e}", page_index + 1);
                continue;
            }
        };
        if content.drawings.is_empty() && content.images.is_empty() {
            continue;
        }

        println!(
            "Page {}: analyzing {} vector paths...",
            page_index + 1,
            content.drawings.len()
        );
        let analysis = segment_page(&content, &settings);

        if analysis.regions.is_empty() {
            println!("  no figure regions found on page {}", page_index + 1);
        } else {
            println!(
                "  extracting {} figure region(s) on page {}",
                analysis.regions.len(),
                page_index + 1
            );
            for k in 0..analysis.regions.len() {
                let caption = analysis.regions[k]
                    .caption
                    .as_deref()
                    .unwrap_or("uncaptioned");
                println!("  Fig {}: {}", k + 1, caption);
                match emit_region(&mut source, page_index, &analysis, k, &out_dir, &settings) {
                    Ok(_) => total += 1,
                    Err(e) => {
                        log::warn!(
                            "failed to extract figure {} on page {}: {e}",
                            k + 1,
                            page_index + 1
                        );
                    }
                }
            }
        }

        if args.dump_analysis.is_some() {
            dumps.push(PageDump {
                page: page_index + 1,
                analysis,
            });
        }
    }

    if let Some(path) = &args.dump_analysis {
        let file = fs::File::create(path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &dumps)?;
        println!("Analysis dump written to {}", path.display());
    }

    println!("Successfully extracted {total} figure(s)");
    println!("OUTPUT_DIR:{}", out_dir.display());
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_out_dir() {
        let dir = default_out_dir(&PathBuf::from("/papers/smith2024.pdf"));
        assert_eq!(dir, PathBuf::from("/papers/smith2024_vectors"));

        let dir = default_out_dir(&PathBuf::from("local.pdf"));
        assert_eq!(dir, PathBuf::from("local_vectors"));
    }
}
