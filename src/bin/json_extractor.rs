use anyhow::Context;
use clap::Parser;
use phontastit::extract_phonenumbers;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Extract Italian phone numbers from text with JSON output")]
struct Args {
    /// Path to the text file to scan
    #[arg(index = 1)]
    file_path: PathBuf,

    /// Process only first N lines (default: 1000)
    #[arg(short, long, default_value = "1000")]
    limit: usize,

    /// Output JSON file path
    #[arg(short, long, default_value = "findings.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    println!("Processing file: {}", args.file_path.display());
    let file = File::open(&args.file_path)
        .with_context(|| format!("cannot open {}", args.file_path.display()))?;
    let reader = BufReader::with_capacity(1_000_000, file);

    let mut findings = Vec::new();
    let mut line_count = 0;

    for line_result in reader.lines().take(args.limit) {
        line_count += 1;
        let line = line_result?;

        for phone in extract_phonenumbers(&line) {
            findings.push(json!({
                "line": line_count,
                "type": phone.category()?,
                "value": phone.render(true),
                "international": phone.render(false)
            }));
        }
    }

    println!("Found {} phone numbers in {} lines", findings.len(), line_count);
    let json_output = serde_json::to_string_pretty(&findings)?;

    std::fs::write(&args.output, json_output)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    println!("Results written to {}", args.output.display());

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .try_init();
}
