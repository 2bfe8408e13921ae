use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{ExpenseRecord, HEADER, MalformedRecord};

const TMP_SUFFIX: &str = "tmp";

/// Failures that stop the ledger file from being used at all.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Ledger file {path} is unavailable: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read or write CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// One data row as read from disk, with its line number.
///
/// Fields stay raw bytes so a row that is not valid UTF-8 can still be
/// carried through a rewrite unchanged.
#[derive(Debug, Clone)]
pub struct StoredRow {
    pub line: u64,
    pub fields: ByteRecord,
}

impl StoredRow {
    /// Interpret the row as an expense. Only the shape and text encoding are
    /// checked here.
    pub fn to_record(&self) -> std::result::Result<ExpenseRecord, MalformedRecord> {
        if self.fields.len() != HEADER.len() {
            return Err(MalformedRecord {
                line: self.line,
                reason: format!(
                    "expected {} fields, found {}",
                    HEADER.len(),
                    self.fields.len()
                ),
            });
        }

        Ok(ExpenseRecord {
            date: self.text_field(0)?,
            category: self.text_field(1)?,
            amount: self.text_field(2)?,
            description: self.text_field(3)?,
        })
    }

    fn text_field(&self, index: usize) -> std::result::Result<String, MalformedRecord> {
        let bytes = &self.fields[index];
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| MalformedRecord {
                line: self.line,
                reason: format!("invalid UTF-8 in {} field", HEADER[index].to_lowercase()),
            })
    }
}

/// Full contents of the ledger file.
#[derive(Debug, Clone)]
pub struct LedgerTable {
    pub header: ByteRecord,
    pub rows: Vec<StoredRow>,
}

impl LedgerTable {
    /// Well-shaped records in file order; badly shaped rows are logged and skipped.
    pub fn records(&self) -> Vec<ExpenseRecord> {
        self.rows
            .iter()
            .filter_map(|row| match row.to_record() {
                Ok(record) => Some(record),
                Err(malformed) => {
                    warn!(%malformed, "skipping malformed ledger row");
                    None
                }
            })
            .collect()
    }
}

/// Handle on the CSV file backing the ledger.
///
/// Every call opens the file fresh and closes it before returning.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header row if it is missing or empty.
    /// Existing content is never touched. Returns true if the header was written.
    pub fn initialize(&self) -> Result<bool> {
        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let len = fs::metadata(&self.path).map_err(|e| self.unavailable(e))?.len();
                if len > 0 {
                    return Ok(false);
                }
                OpenOptions::new()
                    .append(true)
                    .open(&self.path)
                    .map_err(|e| self.unavailable(e))?
            }
            Err(e) => return Err(self.unavailable(e)),
        };

        let mut writer = WriterBuilder::new().from_writer(file);
        writer.write_record(HEADER).map_err(|e| self.csv_error(e))?;
        writer.flush().map_err(|e| self.unavailable(e))?;

        debug!(path = %self.path.display(), "initialized ledger file");
        Ok(true)
    }

    /// Append one record at the end of the file.
    pub fn append(&self, record: &ExpenseRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.unavailable(e))?;

        // A hand-edited file may lack its trailing newline
        if !ends_with_newline(&mut file).map_err(|e| self.unavailable(e))? {
            file.write_all(b"\n").map_err(|e| self.unavailable(e))?;
        }

        let mut writer = WriterBuilder::new().from_writer(file);
        writer
            .write_record(record.to_row())
            .map_err(|e| self.csv_error(e))?;
        writer.flush().map_err(|e| self.unavailable(e))?;

        debug!(path = %self.path.display(), date = %record.date, "appended record");
        Ok(())
    }

    /// Read the header and every data row.
    pub fn read_table(&self) -> Result<LedgerTable> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(file);

        let header = reader
            .byte_headers()
            .map_err(|e| self.csv_error(e))?
            .clone();

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let fields = result.map_err(|e| self.csv_error(e))?;
            let line = fields.position().map(|p| p.line()).unwrap_or(0);
            rows.push(StoredRow { line, fields });
        }

        debug!(path = %self.path.display(), rows = rows.len(), "read ledger file");
        Ok(LedgerTable { header, rows })
    }

    /// Replace the whole file with `table`.
    ///
    /// The new content goes to a sibling temp file first and is then renamed
    /// over the ledger. A crash can still leave the temp file behind.
    pub fn rewrite(&self, table: &LedgerTable) -> Result<()> {
        let tmp = tmp_path(&self.path);
        let file = File::create(&tmp).map_err(|e| self.unavailable(e))?;

        let mut writer = WriterBuilder::new().flexible(true).from_writer(file);
        writer
            .write_record(&table.header)
            .map_err(|e| self.csv_error(e))?;
        for row in &table.rows {
            writer
                .write_record(&row.fields)
                .map_err(|e| self.csv_error(e))?;
        }
        let file = writer
            .into_inner()
            .map_err(|e| self.unavailable(e.into_error()))?;
        file.sync_all().map_err(|e| self.unavailable(e))?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| self.unavailable(e))?;

        debug!(path = %self.path.display(), rows = table.rows.len(), "rewrote ledger file");
        Ok(())
    }

    fn unavailable(&self, source: io::Error) -> StorageError {
        StorageError::Unavailable {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StorageError {
        StorageError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}
