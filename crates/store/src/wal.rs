// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The write-ahead log half of the State Store (C9): an append-only,
//! newline-delimited JSON journal of every [`Mutation`] applied to the
//! fleet, with a monotonic sequence number per line.
//!
//! Corruption is expected, not exceptional — a daemon can be killed
//! mid-write. [`Wal::open`] never fails on a torn or binary-garbage tail: it
//! keeps every entry it can still parse, rotates the original file into a
//! `.bak` generation (up to three kept), and starts a clean file from the
//! last good entry onward.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use nixfleet_core::Mutation;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Flush automatically once this many entries have been appended without one.
const FLUSH_THRESHOLD: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WalLine {
    seq: u64,
    mutation: Mutation,
}

/// One journal entry, as returned to callers replaying the log.
#[derive(Debug, Clone)]
pub struct Entry {
    pub seq: u64,
    pub mutation: Mutation,
}

pub struct Wal {
    path: PathBuf,
    file: File,
    write_seq: u64,
    processed_seq: u64,
    unflushed: u64,
    /// Byte offset [`Wal::next_unprocessed`] has already consumed, kept
    /// separate from `processed_seq` so a skipped corrupt line never gets
    /// re-read.
    read_cursor: u64,
}

/// Scans `bytes` line by line, parsing each as a [`WalLine`]. Returns the
/// parsed entries found before the first unparseable line (if any), and the
/// byte length of the valid prefix.
fn scan_valid_prefix(bytes: &[u8]) -> (Vec<WalLine>, usize) {
    let mut entries = Vec::new();
    let mut consumed = 0usize;
    let mut rest = bytes;

    loop {
        let Some(newline_pos) = rest.iter().position(|&b| b == b'\n') else {
            break;
        };
        let (line, remainder) = rest.split_at(newline_pos);
        let remainder = &remainder[1..]; // drop the newline itself

        if line.is_empty() {
            consumed += newline_pos + 1;
            rest = remainder;
            continue;
        }

        let Ok(text) = std::str::from_utf8(line) else {
            break;
        };
        let Ok(parsed) = serde_json::from_str::<WalLine>(text) else {
            break;
        };

        entries.push(parsed);
        consumed += newline_pos + 1;
        rest = remainder;
    }

    (entries, consumed)
}

/// Rotates `path`'s `.bak` generations (keeping at most three) and moves
/// `path` itself into the freshly vacated `.bak` slot.
fn rotate_backups(path: &Path) -> Result<(), StoreError> {
    let bak3 = path.with_extension("bak.3");
    let bak2 = path.with_extension("bak.2");
    let bak1 = path.with_extension("bak");

    if bak3.exists() {
        std::fs::remove_file(&bak3)?;
    }
    if bak2.exists() {
        std::fs::rename(&bak2, &bak3)?;
    }
    if bak1.exists() {
        std::fs::rename(&bak1, &bak2)?;
    }
    std::fs::rename(path, &bak1)?;
    Ok(())
}

impl Wal {
    pub fn open(path: impl AsRef<Path>, processed_seq: u64) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let raw = if path.exists() {
            std::fs::read(&path)?
        } else {
            Vec::new()
        };

        let (entries, valid_bytes) = scan_valid_prefix(&raw);
        let corrupt = valid_bytes < raw.len();

        if corrupt {
            tracing::warn!(
                path = %path.display(),
                valid_entries = entries.len(),
                discarded_bytes = raw.len() - valid_bytes,
                "write-ahead log tail failed to parse, rotating into .bak"
            );
            rotate_backups(&path)?;
            std::fs::write(&path, &raw[..valid_bytes])?;
        }

        let write_seq = entries.last().map(|e| e.seq).unwrap_or(0);

        let file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;

        Ok(Self { path, file, write_seq, processed_seq, unflushed: 0, read_cursor: 0 })
    }

    pub fn write_seq(&self) -> u64 {
        self.write_seq
    }

    pub fn processed_seq(&self) -> u64 {
        self.processed_seq
    }

    pub fn append(&mut self, mutation: &Mutation) -> Result<u64, StoreError> {
        let seq = self.write_seq + 1;
        let line = WalLine { seq, mutation: mutation.clone() };
        let mut json = serde_json::to_vec(&line)?;
        json.push(b'\n');
        self.file.write_all(&json)?;
        self.write_seq = seq;
        self.unflushed += 1;
        Ok(seq)
    }

    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.file.flush()?;
        self.unflushed = 0;
        Ok(())
    }

    pub fn needs_flush(&self) -> bool {
        self.unflushed >= FLUSH_THRESHOLD
    }

    pub fn mark_processed(&mut self, seq: u64) {
        self.processed_seq = self.processed_seq.max(seq);
    }

    /// Returns the next journal entry past `processed_seq`, skipping over
    /// (but not erroring on) any corrupt or binary line encountered along
    /// the way. `None` means "caught up", not "broken".
    pub fn next_unprocessed(&mut self) -> Result<Option<Entry>, StoreError> {
        let mut reader = BufReader::new(File::open(&self.path)?);
        reader.seek(SeekFrom::Start(self.read_cursor))?;

        loop {
            let mut raw = Vec::new();
            let consumed = read_raw_line(&mut reader, &mut raw)?;
            if consumed == 0 {
                return Ok(None);
            }
            self.read_cursor += consumed as u64;

            if raw.is_empty() {
                continue;
            }
            let Ok(text) = std::str::from_utf8(&raw) else {
                continue;
            };
            let Ok(parsed) = serde_json::from_str::<WalLine>(text) else {
                continue;
            };
            if parsed.seq <= self.processed_seq {
                continue;
            }
            return Ok(Some(Entry { seq: parsed.seq, mutation: parsed.mutation }));
        }
    }

    /// Returns every entry with `seq > after`, reading the file fresh from
    /// the start and stopping at the first line it can't parse.
    pub fn entries_after(&self, after: u64) -> Result<Vec<Entry>, StoreError> {
        let raw = std::fs::read(&self.path)?;
        let (entries, _) = scan_valid_prefix(&raw);
        Ok(entries
            .into_iter()
            .filter(|e| e.seq > after)
            .map(|e| Entry { seq: e.seq, mutation: e.mutation })
            .collect())
    }

    /// Rewrites the log keeping only entries with `seq >= keep_from`.
    pub fn truncate_before(&mut self, keep_from: u64) -> Result<(), StoreError> {
        let raw = std::fs::read(&self.path)?;
        let (entries, _) = scan_valid_prefix(&raw);

        let mut buf = Vec::new();
        for entry in entries.into_iter().filter(|e| e.seq >= keep_from) {
            let mut json = serde_json::to_vec(&entry)?;
            json.push(b'\n');
            buf.extend_from_slice(&json);
        }
        std::fs::write(&self.path, &buf)?;

        self.file = OpenOptions::new().create(true).read(true).append(true).open(&self.path)?;
        self.read_cursor = 0;
        Ok(())
    }
}

/// Reads up to and including the next `\n` into `buf` (without the
/// terminator), returning the number of bytes consumed from the reader
/// (including the terminator), or 0 at EOF.
fn read_raw_line<R: Read>(reader: &mut R, buf: &mut Vec<u8>) -> Result<usize, StoreError> {
    let mut byte = [0u8; 1];
    let mut consumed = 0usize;
    loop {
        let n = reader.read(&mut byte)?;
        if n == 0 {
            return Ok(consumed);
        }
        consumed += 1;
        if byte[0] == b'\n' {
            return Ok(consumed);
        }
        buf.push(byte[0]);
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
