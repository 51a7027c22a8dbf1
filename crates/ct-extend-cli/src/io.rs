//! Reading and writing slice files

use anyhow::{Context, Result};
use ct_series::CtSlice;
use ct_uid::Uid;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Read a JSON array of slices
pub(crate) fn read_slices(path: &Path) -> Result<Vec<CtSlice>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing slices from {}", path.display()))
}

/// Write slices as a JSON array to `path`, or stdout when `None`
pub(crate) fn write_slices(path: Option<&Path>, slices: &[CtSlice]) -> Result<()> {
    match path {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_json(BufWriter::new(file), slices)
                .with_context(|| format!("writing {}", path.display()))
        }
        None => write_json(io::stdout().lock(), slices).context("writing to stdout"),
    }
}

fn write_json<W: Write>(mut writer: W, slices: &[CtSlice]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, slices)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Read one UID per line; blank lines and `#` comments are skipped
pub(crate) fn read_uids(path: &Path) -> Result<Vec<Uid>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    parse_uids(&text).with_context(|| format!("parsing uids from {}", path.display()))
}

pub(crate) fn parse_uids(text: &str) -> Result<Vec<Uid>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| Uid::new(line).with_context(|| format!("line {number}")))
        .collect()
}
