use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::model::{DaySummary, WorldState};

/// One JSON document per line. Returns the number of lines written.
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut lines = 0;
    for item in items {
        serde_json::to_writer(&mut out, &item)?;
        out.write_all(b"\n")?;
        lines += 1;
    }
    out.flush()?;
    Ok(lines)
}

/// Dump a world snapshot into `output_dir`, creating it if needed:
/// - `companies.jsonl`, `parties.jsonl`, `segments.jsonl`: one entity per line, by id
/// - `policies.jsonl`: active policies followed by retired ones
/// - `history.jsonl`: one DaySummary per simulated day
pub fn flush_to_jsonl(world: &WorldState, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    let companies = write_jsonl(&output_dir.join("companies.jsonl"), world.companies.values())?;
    let parties = write_jsonl(&output_dir.join("parties.jsonl"), world.parties.values())?;
    let segments = write_jsonl(&output_dir.join("segments.jsonl"), world.segments.values())?;
    let policies = write_jsonl(&output_dir.join("policies.jsonl"), world.policy_history())?;
    write_history_jsonl(&world.history, &output_dir.join("history.jsonl"))?;

    tracing::debug!(
        day = world.day,
        companies,
        parties,
        segments,
        policies,
        dir = %output_dir.display(),
        "world flushed"
    );
    Ok(())
}

/// Write a sequence of day summaries, one per line.
pub fn write_history_jsonl(summaries: &[DaySummary], path: &Path) -> io::Result<()> {
    write_jsonl(path, summaries.iter()).map(|_| ())
}

/// Read back a file written by [`write_history_jsonl`]. Blank lines are skipped.
pub fn read_history_jsonl(path: &Path) -> io::Result<Vec<DaySummary>> {
    let reader = BufReader::new(File::open(path)?);
    let mut summaries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        summaries.push(serde_json::from_str(&line)?);
    }
    Ok(summaries)
}
