//! File-backed log sheet.
//!
//! Persisted as one JSON array per line, in sheet column order. Line 1 is
//! the header row; data rows follow, oldest first. Appends extend the file
//! in place; deletions rewrite it through a temp file and a rename so a
//! trim is a single logical step on disk.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::info;

use scanlog_core::{Error, LogRecord, Result, SHEET_HEADER};

use crate::config::StoreConfig;
use crate::sheet::LogSheet;

const SHEET_FILE: &str = "scan-log.jsonl";

/// Log sheet persisted to a single file under the data directory.
///
/// The mutex guards the in-memory row cache and the file together; all
/// file I/O happens inside the critical section, which serializes
/// concurrent requests the way the single-writer model requires.
pub struct FileSheet {
    name: String,
    path: PathBuf,
    rows: Mutex<Vec<LogRecord>>,
}

impl FileSheet {
    /// Opens the sheet file, creating it with a header row when absent.
    pub fn open(config: &StoreConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;
        let path = config.data_dir.join(SHEET_FILE);

        let rows = if path.exists() {
            load_rows(&path)?
        } else {
            init_sheet_file(&path)?;
            Vec::new()
        };

        info!(
            sheet = %config.sheet_name,
            path = %path.display(),
            data_rows = rows.len(),
            "Opened log sheet"
        );

        Ok(Self {
            name: config.sheet_name.clone(),
            path,
            rows: Mutex::new(rows),
        })
    }

    fn rewrite(&self, rows: &[LogRecord]) -> Result<()> {
        let tmp = self.path.with_extension("jsonl.tmp");
        {
            let mut file = File::create(&tmp)?;
            writeln!(file, "{}", serde_json::to_string(&SHEET_HEADER)?)?;
            for row in rows {
                writeln!(file, "{}", serde_json::to_string(&row.cells())?)?;
            }
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[async_trait]
impl LogSheet for FileSheet {
    fn name(&self) -> &str {
        &self.name
    }

    async fn append_rows(&self, new_rows: Vec<LogRecord>) -> Result<usize> {
        if new_rows.is_empty() {
            return Ok(0);
        }

        let mut rows = self.rows.lock();
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        for row in &new_rows {
            writeln!(file, "{}", serde_json::to_string(&row.cells())?)?;
        }
        file.sync_all()?;

        let appended = new_rows.len();
        rows.extend(new_rows);
        Ok(appended)
    }

    async fn data_row_count(&self) -> Result<usize> {
        Ok(self.rows.lock().len())
    }

    async fn read_all(&self) -> Result<Vec<LogRecord>> {
        Ok(self.rows.lock().clone())
    }

    async fn delete_oldest(&self, n: usize) -> Result<usize> {
        let mut rows = self.rows.lock();
        let n = n.min(rows.len());
        if n == 0 {
            return Ok(0);
        }

        let remaining: Vec<LogRecord> = rows[n..].to_vec();
        self.rewrite(&remaining)?;
        *rows = remaining;
        Ok(n)
    }
}

/// Writes a fresh sheet file containing only the header row.
fn init_sheet_file(path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", serde_json::to_string(&SHEET_HEADER)?)?;
    file.sync_all()?;
    Ok(())
}

/// Loads data rows from an existing sheet file, skipping the header.
fn load_rows(path: &Path) -> Result<Vec<LogRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if idx == 0 {
            // header row
            continue;
        }
        if line.is_empty() {
            continue;
        }

        let cells: [String; 4] = serde_json::from_str(&line)
            .map_err(|e| Error::store(format!("corrupt sheet row {}: {}", idx + 1, e)))?;
        let [timestamp, carrier, processed_code, original_code] = cells;
        rows.push(LogRecord {
            timestamp,
            carrier,
            processed_code,
            original_code,
        });
    }

    Ok(rows)
}
