// src/cli.rs
use std::path::PathBuf;

use clap::Parser;

use crate::config::{Options, consts::{DEFAULT_FILES_DIR, FILES_DIR_ENV, KNOWN_FILE, STATUS_URL}};
use crate::error::Result;
use crate::progress::Progress;
use crate::reconcile::{self, Outcome};
use crate::specs::cassettes;

/// Append newly installed GMOS masks to masks.lut, using the cassette
/// change-request page as the source of mask names.
#[derive(Parser, Debug)]
#[command(name = "masksync", version, about)]
pub struct Args {
    /// Directory holding msk.lut and masks.lut
    #[arg(short = 'd', long, env = FILES_DIR_ENV, default_value = DEFAULT_FILES_DIR)]
    pub files_dir: PathBuf,

    /// Status page URL
    #[arg(long, default_value = STATUS_URL)]
    pub url: String,

    /// Show what would be appended without touching masks.lut
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print the cassette tables found on the page and exit
    #[arg(long)]
    pub list_cassettes: bool,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn options(&self) -> Options {
        Options {
            url: self.url.clone(),
            files_dir: self.files_dir.clone(),
            dry_run: self.dry_run,
        }
    }
}

/// Prints run progress to stdout.
pub struct ConsoleProgress {
    dry_run: bool,
}

impl Progress for ConsoleProgress {
    fn file_loaded(&mut self, name: &str, records: usize) {
        println!("Reading {name} ({records} records)");
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn mask_added(&mut self, name: &str, barcode: &str) {
        if self.dry_run {
            println!("Would add {name} - barcode {barcode}");
        } else {
            println!("Adding {name} - barcode {barcode}");
        }
    }
    fn mask_skipped(&mut self, barcode: &str, reason: &str) {
        println!("Skipping barcode {barcode}: {reason}");
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    crate::log::init(args.verbose);
    run_with(&args)
}

pub fn run_with(args: &Args) -> Result<()> {
    let opts = args.options();

    if args.list_cassettes {
        let table = cassettes::fetch(&opts.url)?;
        for (location, barcode, name) in table.iter() {
            println!("{location}\t{barcode}\t{name}");
        }
        return Ok(());
    }

    let mut progress = ConsoleProgress { dry_run: opts.dry_run };
    match reconcile::run(&opts, Some(&mut progress))? {
        Outcome::NothingToDo => println!("There are no unknown masks installed"),
        Outcome::DryRun(summary) => {
            for a in &summary.added {
                print!("{}", a.line);
            }
            println!("Dry run: {} line(s) not written to {KNOWN_FILE}", summary.added.len());
        }
        Outcome::Updated(summary) => {
            if let Some(backup) = &summary.backup {
                println!("Backup: {}", backup.display());
            }
            println!("{} mask(s) added, {} skipped", summary.added.len(), summary.skipped.len());
        }
    }
    Ok(())
}
