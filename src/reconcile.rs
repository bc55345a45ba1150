// src/reconcile.rs
use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::{
    config::{Options, consts::{INSTALLED_FILE, KNOWN_FILE}},
    error::Result,
    file, lut,
    progress::Progress,
    specs::cassettes::{self, CassetteTable},
    store::{self, InstalledIndex},
};

/// A registry line ready to be appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Addition {
    pub barcode: String,
    pub name: String,
    pub location: String,
    pub line: String,
}

/// An unknown barcode that could not be resolved to a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Skipped {
    pub barcode: String,
    pub reason: String,
}

/// Every unknown barcode, either formatted or skipped. Built before any write.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Plan {
    pub additions: Vec<Addition>,
    pub skipped: Vec<Skipped>,
}

/// Summary of what a run produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub added: Vec<Addition>,
    pub skipped: Vec<Skipped>,
    /// Dated copy of `masks.lut`, when one was taken.
    pub backup: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every installed mask is already registered.
    NothingToDo,
    /// Lines were computed but not written.
    DryRun(RunSummary),
    Updated(RunSummary),
}

/// Resolve names for `unknown` and format their lines.
///
/// A barcode with no name on the page is skipped; a name too long for the
/// fixed-width field fails the whole plan.
pub fn plan(unknown: &[String], installed: &InstalledIndex, table: &CassetteTable) -> Result<Plan> {
    let mut out = Plan::default();

    for barcode in unknown {
        let Some(number) = installed.get(barcode) else {
            out.skipped.push(Skipped {
                barcode: barcode.clone(),
                reason: format!("not listed in {INSTALLED_FILE}"),
            });
            continue;
        };
        let location = CassetteTable::location_id(number);

        let name = match (table.table(&location), table.name_for(&location, barcode)) {
            (_, Some(name)) => name,
            (None, None) => {
                out.skipped.push(Skipped {
                    barcode: barcode.clone(),
                    reason: format!("cassette {location} is not on the status page"),
                });
                continue;
            }
            (Some(_), None) => {
                out.skipped.push(Skipped {
                    barcode: barcode.clone(),
                    reason: format!("no name for it in cassette {location}"),
                });
                continue;
            }
        };

        let line = lut::format_line(name, barcode)?;
        out.additions.push(Addition {
            barcode: barcode.clone(),
            name: s!(name),
            location,
            line,
        });
    }

    Ok(out)
}

/// Fetch the status page, then reconcile the local files against it.
pub fn run(opts: &Options, progress: Option<&mut dyn Progress>) -> Result<Outcome> {
    let table = cassettes::fetch(&opts.url)?;
    reconcile(opts, &table, Local::now().date_naive(), progress)
}

/// Everything after the fetch: read, diff, plan, back up, append.
pub fn reconcile(
    opts: &Options,
    table: &CassetteTable,
    today: NaiveDate,
    mut progress: Option<&mut dyn Progress>,
) -> Result<Outcome> {
    let installed_path = opts.installed_path();
    let known_path = opts.known_path();

    let installed = store::load_installed(&installed_path)?;
    if let Some(p) = progress.as_deref_mut() {
        p.file_loaded(INSTALLED_FILE, installed.len());
    }
    let known = store::load_known(&known_path)?;
    if let Some(p) = progress.as_deref_mut() {
        p.file_loaded(KNOWN_FILE, known.len());
    }

    let unknown = store::unknown_masks(&installed, &known);
    info!(installed = installed.len(), known = known.len(), unknown = unknown.len(), "registry diff");
    if unknown.is_empty() {
        return Ok(Outcome::NothingToDo);
    }

    let plan = plan(&unknown, &installed, table)?;
    for s in &plan.skipped {
        warn!(barcode = %s.barcode, reason = %s.reason, "unknown mask skipped");
        if let Some(p) = progress.as_deref_mut() {
            p.mask_skipped(&s.barcode, &s.reason);
        }
    }

    let mut summary = RunSummary { added: Vec::new(), skipped: plan.skipped, backup: None };

    if opts.dry_run {
        if let Some(p) = progress.as_deref_mut() {
            for a in &plan.additions {
                p.mask_added(&a.name, &a.barcode);
            }
            p.finish();
        }
        summary.added = plan.additions;
        return Ok(Outcome::DryRun(summary));
    }

    if plan.additions.is_empty() {
        if let Some(p) = progress.as_deref_mut() {
            p.log(&format!("No new entries to write to {KNOWN_FILE}"));
            p.finish();
        }
        return Ok(Outcome::Updated(summary));
    }

    let backup = file::backup_file(&known_path, today)?;
    info!(backup = %backup.display(), "registry backed up");
    summary.backup = Some(backup);

    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Updating {KNOWN_FILE} ..."));
    }
    let additions = &plan.additions;
    file::append_lines(&known_path, additions.iter().map(|a| a.line.as_str()), |i| {
        if let Some(p) = progress.as_deref_mut() {
            p.mask_added(&additions[i].name, &additions[i].barcode);
        }
    })?;
    info!(added = additions.len(), "registry updated");

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    summary.added = plan.additions;
    Ok(Outcome::Updated(summary))
}
