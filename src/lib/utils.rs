use anyhow::{bail, Context, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

static BATCH_SEPARATOR: OnceLock<Regex> = OnceLock::new();

fn batch_separator() -> &'static Regex {
    BATCH_SEPARATOR.get_or_init(|| {
        Regex::new(r"(?mi)^[ \t]*GO[ \t]*\r?$").expect("batch separator regex is valid")
    })
}

/// Splits a script on lines that hold nothing but `GO` (any case). Blank
/// batches are dropped, the rest are returned untouched and in order.
pub fn split_batches(sql: &str) -> Vec<&str> {
    batch_separator()
        .split(sql)
        .filter(|batch| !batch.trim().is_empty())
        .collect()
}

/// Reads a script the way SQL editors save them: UTF-8 with or without a BOM,
/// or UTF-16 with a BOM. The BOM itself is dropped.
pub fn read_file_content(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Couldn't read sql file {}", path.display()))?;

    decode_script(&bytes).with_context(|| format!("Couldn't read sql file {}", path.display()))
}

fn decode_script(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => Ok(std::str::from_utf8(rest)?.to_string()),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => Ok(std::str::from_utf8(bytes)?.to_string()),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Result<String> {
    if bytes.len() % 2 != 0 {
        bail!("UTF-16 content has an odd number of bytes");
    }

    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| to_unit([pair[0], pair[1]]))
        .collect();

    Ok(String::from_utf16(&units)?)
}
