use std::{
    fs::{self, File, OpenOptions},
    io::{BufReader, ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::{debug, warn};

use crate::{
    common::{
        config::{MalformedLinePolicy, StoreConfig},
        error::StoreError,
    },
    domain::{
        ledger::{AccountSink, AccountSource},
        record::{RECORD_WIDTH, Record},
    },
    io::{reader, writer},
};

/// File-backed storage for account lines plus an append-only error log.
///
/// The store holds only its configuration. Every operation opens the file it
/// needs, does its work and drops the handle before returning, so nothing is
/// created on disk until the first call.
#[derive(Debug, Clone)]
pub struct RecordStore {
    config: StoreConfig,
}

impl RecordStore {
    pub fn new(data_path: impl Into<PathBuf>, error_log_path: impl Into<PathBuf>) -> Self {
        Self::with_config(StoreConfig::new(data_path, error_log_path))
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn data_path(&self) -> &Path {
        &self.config.data_path
    }

    pub fn error_log_path(&self) -> &Path {
        &self.config.error_log_path
    }

    /// Appends every account in the data file to `target` and returns how many were added.
    ///
    /// Existing contents of `target` are kept. Lines are parsed in full before
    /// the first `add_account` call, so a failing load leaves `target`
    /// untouched. A missing file loads nothing when
    /// [`StoreConfig::treat_missing_as_empty`] is set.
    pub fn load<T: AccountSink + ?Sized>(&self, target: &mut T) -> Result<usize, StoreError> {
        let path = self.data_path();
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound && self.config.treat_missing_as_empty => {
                debug!("{} does not exist, starting empty", path.display());
                return Ok(0);
            }
            Err(err) => return Err(err.into()),
        };

        let mut staged: Vec<Record> = Vec::new();
        for row in reader::read_records(BufReader::new(file), self.config.quoting) {
            match row {
                Ok(record) => staged.push(record),
                Err(err)
                    if err.is_malformed_line()
                        && self.config.malformed_lines == MalformedLinePolicy::SkipAndLog =>
                {
                    warn!("skipping malformed line in {}: {err}", path.display());
                    self.log_error(&format!(
                        "skipped malformed line in {}: {err}",
                        path.display()
                    ))?;
                }
                Err(err) => return Err(err),
            }
        }

        for rec in &staged {
            target.add_account(rec.id, &rec.name, &rec.account_type, rec.balance);
        }
        debug!("loaded {} accounts from {}", staged.len(), path.display());
        Ok(staged.len())
    }

    /// Appends one account line, creating the data file if needed.
    ///
    /// Fields are written positionally as given; callers pass them in the
    /// canonical form produced by [`Record::fields`].
    pub fn append_record<S: AsRef<str>>(&self, fields: &[S; RECORD_WIDTH]) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.data_path())?;

        let mut wtr = writer::writer_builder(self.config.quoting).from_writer(file);
        writer::write_fields(&mut wtr, fields)?;
        wtr.flush()?;
        debug!("appended account {} to {}", fields[0].as_ref(), self.data_path().display());
        Ok(())
    }

    /// Replaces the data file with exactly the accounts in `source`, in order.
    ///
    /// `source` is read in full before the file is opened, so a source that
    /// cannot produce all of its accounts leaves the file as it was. Without
    /// [`StoreConfig::atomic_rewrite`] the file is then truncated in place and
    /// an interrupted write leaves it partial.
    pub fn rewrite_all<A: AccountSource + ?Sized>(&self, source: &A) -> Result<usize, StoreError> {
        let path = self.data_path();
        let rows = writer::collect_fields(source)?;
        let written = if self.config.atomic_rewrite {
            self.rewrite_via_temp(path, &rows)?
        } else {
            let file = File::create(path)?;
            writer::write_rows(file, self.config.quoting, &rows)?
        };
        debug!("rewrote {} with {written} accounts", path.display());
        Ok(written)
    }

    fn rewrite_via_temp(
        &self,
        path: &Path,
        rows: &[[String; RECORD_WIDTH]],
    ) -> Result<usize, StoreError> {
        let tmp = temp_path(path);
        let result = self.write_synced(&tmp, rows).and_then(|written| {
            fs::rename(&tmp, path)?;
            Ok(written)
        });

        if result.is_err() {
            if let Err(err) = fs::remove_file(&tmp) {
                if err.kind() != ErrorKind::NotFound {
                    warn!("could not remove {}: {err}", tmp.display());
                }
            }
        }
        result
    }

    fn write_synced(
        &self,
        path: &Path,
        rows: &[[String; RECORD_WIDTH]],
    ) -> Result<usize, StoreError> {
        let file = File::create(path)?;
        let written = writer::write_rows(&file, self.config.quoting, rows)?;
        file.sync_all()?;
        Ok(written)
    }

    /// Appends `message` as one line of the error log, creating the file if needed.
    pub fn log_error(&self, message: &str) -> Result<(), StoreError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.error_log_path())?;
        writeln!(file, "{message}")?;
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "records".to_string());
    path.with_file_name(format!("{name}.tmp"))
}
