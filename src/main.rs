use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use phontastit::patterns::extraction::phonenumber::extract_candidates;
use phontastit::{extract_phonenumbers, PhoneCategory, PhoneNumber, PhoneSet};
use rayon::prelude::*;
use serde_json::json;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::time::Instant;

/// Extracts and classifies Italian phone numbers found in a text file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the text file to scan
    #[arg(index = 1)]
    file_path: PathBuf,

    /// Process only first N lines (optional)
    #[arg(short, long)]
    limit: Option<usize>,

    /// Show only specific categories (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    categories: Vec<PhoneCategory>,

    /// Print numbers with the +39 prefix
    #[arg(short, long)]
    international: bool,

    /// Verbose output with every candidate found
    #[arg(short, long)]
    verbose: bool,

    /// Count numbers per category instead of listing them per line
    #[arg(short, long)]
    stats: bool,

    /// Where statistics are written in stats mode
    #[arg(short, long, default_value = "outputstats.json")]
    output: PathBuf,

    /// Number of threads to use in stats mode
    #[arg(short, long, default_value = "4")]
    threads: usize,

    /// Lines read and scanned together in stats mode
    #[arg(long, default_value = "10000")]
    chunk_lines: usize,
}

impl Args {
    fn wants(&self, category: PhoneCategory) -> bool {
        self.categories.is_empty() || self.categories.contains(&category)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let file = File::open(&args.file_path)
        .with_context(|| format!("cannot open {}", args.file_path.display()))?;
    let reader = BufReader::with_capacity(1_000_000, file);
    let limit = args.limit.unwrap_or(usize::MAX);

    if args.stats {
        write_stats(&args, reader, limit)
    } else {
        print_lines(&args, reader, limit)
    }
}

fn print_lines(args: &Args, reader: impl BufRead, limit: usize) -> anyhow::Result<()> {
    println!("Processing file: {}", args.file_path.display());

    for (index, line_result) in reader.lines().take(limit).enumerate() {
        let line = line_result?;
        println!("\nLine {}:", index + 1);

        if args.verbose {
            let candidates = extract_candidates(&line);
            println!("Extracted {} candidates:", candidates.len());
            for candidate in candidates {
                println!("  Candidate: {}", candidate);
            }
        }

        let mut found = false;
        for phone in extract_phonenumbers(&line) {
            let category = phone.category()?;
            if !args.wants(category) {
                continue;
            }
            println!("  \"{}\" => {}", phone.render(!args.international), category);
            found = true;
        }

        if !found {
            println!("  No phone numbers found");
        }
    }

    Ok(())
}

fn write_stats(args: &Args, reader: impl BufRead, limit: usize) -> anyhow::Result<()> {
    let start = Instant::now();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {pos} lines ({per_sec})")?);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()?;

    let mut lines = reader.lines().take(limit);
    let mut phones = PhoneSet::new();
    let mut processed = 0usize;
    loop {
        let chunk: Vec<String> = lines
            .by_ref()
            .take(args.chunk_lines.max(1))
            .collect::<io::Result<_>>()
            .with_context(|| format!("cannot read {}", args.file_path.display()))?;
        if chunk.is_empty() {
            break;
        }

        // collect keeps line order, so first-seen order survives the merge
        let per_line: Vec<Vec<PhoneNumber>> =
            pool.install(|| chunk.par_iter().map(|line| extract_phonenumbers(line)).collect());
        phones.extend(per_line.into_iter().flatten());

        processed += chunk.len();
        pb.inc(chunk.len() as u64);
    }
    pb.finish_and_clear();

    let mut counts: HashMap<PhoneCategory, usize> = HashMap::new();
    let mut numbers = Vec::new();
    for phone in phones.iter() {
        let category = phone.category()?;
        if args.wants(category) {
            *counts.entry(category).or_insert(0) += 1;
            numbers.push(phone);
        }
    }
    let total: usize = counts.values().sum();

    // Sort categories by count (highest first)
    let mut categories: Vec<_> = counts.into_iter().collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));

    let category_stats: Vec<serde_json::Value> = categories
        .iter()
        .map(|(category, count)| {
            let percentage = if total > 0 {
                ((*count as f64) / (total as f64) * 100.0).round()
            } else {
                0.0
            };
            json!({
                "category": category,
                "count": count,
                "percentage": percentage
            })
        })
        .collect();

    let stats_json = json!({
        "summary": {
            "total_lines_processed": processed,
            "total_numbers": total,
            "file_path": args.file_path.to_string_lossy()
        },
        "categories": category_stats,
        "numbers": numbers
    });

    fs::write(&args.output, serde_json::to_string_pretty(&stats_json)?)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    println!(
        "Statistics written to {} ({} lines in {:?})",
        args.output.display(),
        processed,
        start.elapsed()
    );

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .try_init();
}
