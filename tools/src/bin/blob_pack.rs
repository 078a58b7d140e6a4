//! Blob archive packing and inspection.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use kiln_archive::{build_archive, Archive, ArchiveError};
use kiln_tools::parse_input_pair;

/// Pack loose files into a blob archive, or inspect one.
#[derive(Parser, Debug)]
#[command(name = "blob-pack", about = "Blob archive packing and inspection", version)]
struct Args {
    #[command(subcommand)]
    command: PackCommand,
}

#[derive(Subcommand, Debug)]
enum PackCommand {
    /// Build an archive from SOURCE::ARCHIVE_PATH pairs.
    ///
    /// A directory source expands recursively, joining the declared
    /// archive path with each file's path below the directory. A bare
    /// SOURCE uses its own file name as the archive path.
    Pack {
        /// Input pairs, packed in the given order.
        #[arg(required = true, value_name = "SOURCE::ARCHIVE_PATH")]
        inputs: Vec<String>,

        /// Output archive path.
        #[arg(long, short)]
        output: PathBuf,
    },
    /// List an archive's directory records.
    List {
        /// Archive to inspect.
        archive: PathBuf,
    },
    /// Extract one entry to a file.
    Extract {
        /// Archive to read.
        archive: PathBuf,

        /// Archive path of the entry to extract.
        entry: String,

        /// Destination file.
        #[arg(long, short)]
        output: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), ArchiveError> {
    match args.command {
        PackCommand::Pack { inputs, output } => {
            let inputs: Vec<_> = inputs.iter().map(|pair| parse_input_pair(pair)).collect();
            let entries = build_archive(&output, &inputs)?;
            let total: u64 = entries.iter().map(|entry| entry.size).sum();
            println!(
                "packed {} entries ({total} bytes) into {}",
                entries.len(),
                output.display()
            );
        }
        PackCommand::List { archive } => {
            let archive = Archive::open(&archive)?;
            println!("{:>12}  {:>12}  path", "offset", "size");
            for record in archive.records() {
                println!(
                    "{:>12}  {:>12}  {}",
                    record.offset, record.size, record.archive_path
                );
            }
        }
        PackCommand::Extract {
            archive,
            entry,
            output,
        } => {
            let archive = Archive::open(&archive)?;
            let data = archive
                .extract(&entry)
                .ok_or_else(|| ArchiveError::EntryNotFound(entry.clone()))?;
            std::fs::write(&output, data)?;
            println!("extracted {entry} ({} bytes) to {}", data.len(), output.display());
        }
    }
    Ok(())
}
