//! pagesent CLI - page-tagged sentence extraction from PDF files

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagesent::filter::{caption_count, evaluate, text_block_area_ratio};
use pagesent::{
    export, parse_skip_pages, AssembleReport, Assembler, ExportSummary, FilterConfig,
    LoadOptions, OutputFormat, Page, PdfLoader,
};

#[derive(Parser)]
#[command(name = "pagesent")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract page-tagged sentences from PDF files", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract sentences and write them to an output directory
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory (defaults to <FILE stem>_sentences)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Output layout
        #[arg(short, long, value_enum, default_value = "individual")]
        format: Format,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Show the include/skip decision for every page
    Pages {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print one JSON object per page instead of a table
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        load: LoadArgs,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One text file per sentence
    Individual,
    /// Per-sentence files plus all_sentences.csv
    Csv,
    /// Per-sentence files plus all_sentences.json
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Individual => OutputFormat::Individual,
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
        }
    }
}

/// Page filter flags shared by `extract` and `pages`.
#[derive(Args, Clone)]
struct FilterArgs {
    /// Pages to always skip (e.g., "1,2,5-7")
    #[arg(long, value_name = "PAGES", env = "PAGESENT_SKIP_PAGES")]
    skip_pages: Option<String>,

    /// Minimum number of characters on a page
    #[arg(long, default_value_t = 50)]
    min_text_len: usize,

    /// Number of table/figure captions at which a page is skipped
    #[arg(long, default_value_t = 3)]
    table_threshold: usize,

    /// Skip pages that contain images
    #[arg(long)]
    skip_if_image: bool,

    /// Minimum share of the page covered by text blocks
    #[arg(long, default_value_t = 0.05)]
    min_text_ratio: f32,

    /// Ignore text in the header and footer bands
    #[arg(long)]
    remove_header_footer: bool,

    /// Header band height as a fraction of page height
    #[arg(long, default_value_t = 0.05)]
    header_ratio: f32,

    /// Footer band height as a fraction of page height
    #[arg(long, default_value_t = 0.05)]
    footer_ratio: f32,
}

impl FilterArgs {
    /// Flag defaults, as if no filter flags were given.
    fn parse_defaults() -> Self {
        #[derive(Parser)]
        struct Defaults {
            #[command(flatten)]
            filter: FilterArgs,
        }
        Defaults::parse_from(["pagesent"]).filter
    }

    fn to_config(&self) -> FilterConfig {
        let skip_pages = self
            .skip_pages
            .as_deref()
            .map(parse_skip_pages)
            .unwrap_or_default();

        FilterConfig::new()
            .with_skip_pages(skip_pages)
            .with_min_text_len(self.min_text_len)
            .with_table_threshold(self.table_threshold)
            .with_skip_if_image(self.skip_if_image)
            .with_min_text_ratio(self.min_text_ratio)
            .with_header_footer_removal(self.remove_header_footer)
            .with_header_ratio(self.header_ratio)
            .with_footer_ratio(self.footer_ratio)
    }
}

/// Loader flags shared by `extract` and `pages`.
#[derive(Args, Clone, Default)]
struct LoadArgs {
    /// Fail on the first page that cannot be decoded
    #[arg(long)]
    strict: bool,

    /// Apply Unicode NFC normalization to page text
    #[arg(long)]
    nfc: bool,
}

impl LoadArgs {
    fn to_options(&self) -> LoadOptions {
        // Lenient unless asked otherwise, so one broken page doesn't lose a book
        let options = if self.strict {
            LoadOptions::new()
        } else {
            LoadOptions::new().lenient()
        };
        options.with_unicode_normalization(self.nfc)
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            format,
            filter,
            load,
        }) => cmd_extract(&input, output.as_deref(), format.into(), &filter, &load),
        Some(Commands::Pages {
            input,
            json,
            filter,
            load,
        }) => cmd_pages(&input, json, &filter, &load),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract with default settings
            if let Some(input) = cli.input {
                let filter = FilterArgs::parse_defaults();
                cmd_extract(
                    &input,
                    cli.output.as_deref(),
                    OutputFormat::Individual,
                    &filter,
                    &LoadArgs::default(),
                )
            } else {
                println!("{}", "Usage: pagesent <FILE> [OUTPUT]".yellow());
                println!("       pagesent --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn default_output_dir(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(format!("{}_sentences", stem))
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    filter: &FilterArgs,
    load: &LoadArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| default_output_dir(input));

    let loader = PdfLoader::open_with_options(input, load.to_options())?;
    let total = loader.page_count();

    let pb = ProgressBar::new(u64::from(total));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut assembler = Assembler::new(filter.to_config());
    let mut records = Vec::new();

    for page in loader.iter_pages() {
        let page = page?;
        pb.set_message(format!("page {}", page.number));
        records.extend(assembler.push_page(&page));
        pb.inc(1);
    }
    let report = assembler.finish();
    pb.finish_with_message("Done!");

    log::debug!(
        "Writing {} records to {} as {}",
        records.len(),
        output_dir.display(),
        format
    );
    let summary = export(&records, &output_dir, format)?;
    print_summary(&report, &summary);

    Ok(())
}

fn print_summary(report: &AssembleReport, summary: &ExportSummary) {
    println!("\n{}", "Summary".green().bold());
    println!(
        "  {}: {} of {}",
        "Pages used".bold(),
        report.pages_included,
        report.pages_seen
    );
    for (reason, count) in &report.pages_skipped {
        println!("  {} skipped ({}): {}", "├─".dimmed(), reason, count);
    }
    println!("  {}: {}", "Sentences".bold(), report.sentences);
    if report.carried_sentences > 0 {
        println!(
            "  {}: {}",
            "Across page breaks".bold(),
            report.carried_sentences
        );
    }
    if let Some(ref fragment) = report.dropped_fragment {
        println!(
            "  {} unterminated text from page {} was dropped",
            "Note:".yellow(),
            fragment.page
        );
    }

    println!("\n{}", "Output files:".green().bold());
    println!(
        "  {} {} sentence files in {}",
        "├─".dimmed(),
        summary.sentence_files.len(),
        summary.dir.display()
    );
    match summary.combined_file {
        Some(ref path) => println!("  {} {}", "└─".dimmed(), path.display()),
        None => println!("  {} no combined file", "└─".dimmed()),
    }
}

fn cmd_pages(
    input: &Path,
    json: bool,
    filter: &FilterArgs,
    load: &LoadArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = filter.to_config();
    let loader = PdfLoader::open_with_options(input, load.to_options())?;

    if !json {
        println!("{}", "Page Decisions".cyan().bold());
        println!("{}", "─".repeat(60).dimmed());
        println!(
            "{:>5}  {:<16} {:>8} {:>9} {:>7} {:>7}",
            "Page", "Decision", "Chars", "Captions", "Images", "Ratio"
        );
    }

    for page in loader.iter_pages() {
        let page = page?;
        let decision = evaluate(&page, page.number, &config);
        let chars = page_text_len(&page);
        let captions = caption_count(&page.text);
        let ratio = text_block_area_ratio(&page, config.header_ratio, config.footer_ratio);

        if json {
            let row = serde_json::json!({
                "page_num": page.number,
                "skip": decision.map(|r| r.as_str()),
                "chars": chars,
                "captions": captions,
                "images": page.image_count,
                "text_ratio": ratio,
            });
            println!("{}", row);
            continue;
        }

        let label = match decision {
            Some(reason) => format!("skip: {}", reason).yellow(),
            None => "include".green(),
        };
        println!(
            "{:>5}  {:<16} {:>8} {:>9} {:>7} {:>7.3}",
            page.number, label, chars, captions, page.image_count, ratio
        );
    }

    Ok(())
}

/// Character count the short-page check compares against.
fn page_text_len(page: &Page) -> usize {
    page.text.trim().chars().count()
}

fn cmd_version() {
    println!("{} {}", "pagesent".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Page-aware PDF sentence extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_match_library() {
        let config = FilterArgs::parse_defaults().to_config();
        assert_eq!(config, FilterConfig::default());
    }

    #[test]
    fn test_skip_pages_flag() {
        let cli = Cli::parse_from([
            "pagesent",
            "extract",
            "book.pdf",
            "--skip-pages",
            "1,3-4",
            "--format",
            "csv",
        ]);
        match cli.command {
            Some(Commands::Extract { filter, format, .. }) => {
                assert_eq!(
                    filter.to_config().skip_pages.into_iter().collect::<Vec<_>>(),
                    vec![1, 3, 4]
                );
                assert!(format == Format::Csv);
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_page_text_len_ignores_header_removal() {
        use pagesent::{BoundingBox, ContentBlock};

        let page = Page::new(1, 100.0, 100.0)
            .with_text("Running head\nBody.")
            .with_block(ContentBlock::text_lines(
                BoundingBox::new(0.0, 0.0, 100.0, 3.0),
                ["Running head"],
            ))
            .with_block(ContentBlock::text_lines(
                BoundingBox::new(0.0, 10.0, 100.0, 90.0),
                ["Body."],
            ));
        assert_eq!(page_text_len(&page), "Running head\nBody.".chars().count());
    }

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("/tmp/report.pdf")),
            PathBuf::from("report_sentences")
        );
    }

    #[test]
    fn test_extract_rejects_non_pdf() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"hello").unwrap();
        let out = tempfile::tempdir().unwrap();

        let result = cmd_extract(
            file.path(),
            Some(out.path()),
            OutputFormat::Individual,
            &FilterArgs::parse_defaults(),
            &LoadArgs::default(),
        );
        assert!(result.is_err());
    }
}
