//! mol2db CLI
//!
//! Thin glue over the library: flag parsing, logging init, exit codes. The
//! three operations mirror the library surface and can be combined in one
//! invocation (ingest, then export, then list).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use mol2db::{export, ingest, IngestConfig, Store};

/// Batch mol2 ingestion into a compressed SQLite store
#[derive(Parser, Debug)]
#[command(name = "mol2db")]
#[command(about = "Read mol2 files into a compressed SQLite store and back")]
#[command(version)]
struct Args {
    /// Input mol2 files to ingest
    #[arg(short, long, value_name = "INPUT_FILE", num_args = 1..)]
    input: Vec<PathBuf>,

    /// Output mol2 file to export into
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<PathBuf>,

    /// SQLite database file
    #[arg(short, long, value_name = "SQLITE_FILE")]
    sqlite: Option<PathBuf>,

    /// Append to the output mol2 file rather than truncate
    #[arg(short, long)]
    append: bool,

    /// Do not stage payloads through /dev/shm
    #[arg(long = "no-shm")]
    no_shm: bool,

    /// Description to tag records with on write, or filter by on read
    #[arg(long, default_value = "")]
    desc: String,

    /// Comment to tag records with on write, or filter by on read
    #[arg(long, default_value = "")]
    comment: String,

    /// Compression level for stored payloads, 0 means none
    #[arg(short, long, default_value_t = 3)]
    compression: i32,

    /// Add each filename to the desc field when ingesting a batch
    #[arg(long = "filename-desc")]
    filename_desc: bool,

    /// List the distinct descriptions present in the database
    #[arg(long = "list-desc")]
    list_desc: bool,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,mol2db=info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mol2db: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> mol2db::Result<()> {
    let Some(sqlite) = args.sqlite.as_deref() else {
        eprintln!("nothing to do: no --sqlite database given");
        return Ok(());
    };

    if !args.input.is_empty() {
        let config = IngestConfig::builder()
            .desc(&args.desc)
            .comment(&args.comment)
            .compression(args.compression)
            .use_fast_staging(!args.no_shm)
            .filename_desc(args.filename_desc)
            .build();

        let report = ingest(&args.input, sqlite, &config)?;
        for failure in &report.failures {
            eprintln!("failed: {}: {}", failure.path.display(), failure.reason);
        }
        println!(
            "{} records inserted ({} molecules, {} files failed)",
            report.records_inserted,
            report.molecules_read,
            report.failures.len()
        );
        if report.records_inserted == 0 && !report.failures.is_empty() {
            return Err(mol2db::Mol2DbError::Store(
                "every input file failed to ingest".to_string(),
            ));
        }
    }

    if let Some(output) = args.output.as_deref() {
        let written = export(
            sqlite,
            Some(args.desc.as_str()),
            Some(args.comment.as_str()),
            output,
            args.append,
        )?;
        println!("{} molecules written to {}", written, output.display());
    }

    if args.list_desc {
        let store = Store::open(sqlite)?;
        for desc in store.list_descriptions()? {
            println!("{}", desc);
        }
    }

    Ok(())
}
