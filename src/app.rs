use std::{ffi::OsString, io::Write, path::PathBuf};

use clap::{Parser, Subcommand};
use log::info;

use crate::{
    common::{
        config::{FieldQuoting, StoreConfig},
        error::AppError,
    },
    domain::{
        ledger::Ledger,
        record::{DELIMITER, Record},
    },
    io::{store::RecordStore, writer},
};

/// Keeps bank account records in a plain comma-separated file.
#[derive(Parser, Debug)]
#[command(name = "account_records", version, about, long_about = None)]
pub struct Cli {
    /// JSON file with store settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data file, overrides the config
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Error log file, overrides the config
    #[arg(long, global = true)]
    pub errors: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every stored account
    List,
    /// Append a new account
    Add {
        id: i64,
        name: String,
        account_type: String,
        #[arg(allow_hyphen_values = true)]
        balance: i64,
    },
    /// Delete an account and save the remaining ones
    Remove { id: i64 },
    /// Load and save the data file, dropping blank lines and padding
    Compact,
}

impl Cli {
    fn store_config(&self) -> Result<StoreConfig, AppError> {
        let mut cfg = match &self.config {
            Some(path) => StoreConfig::from_json_file(path)?,
            None => StoreConfig::default(),
        };
        if let Some(data) = &self.data {
            cfg.data_path = data.clone();
        }
        if let Some(errors) = &self.errors {
            cfg.error_log_path = errors.clone();
        }
        Ok(cfg)
    }
}

pub fn run<I, S, W>(args: I, out: &mut W) -> Result<(), AppError>
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    W: Write,
{
    let cli = Cli::try_parse_from(args)?;
    let store = RecordStore::with_config(cli.store_config()?);
    let mut ledger = open_ledger(&store)?;

    match cli.command {
        Command::List => {
            writer::write_records(&mut *out, store.config().quoting, &ledger)?;
        }
        Command::Add {
            id,
            name,
            account_type,
            balance,
        } => {
            if ledger.contains(id) {
                return Err(AppError::DuplicateAccount(id));
            }
            check_text_field("name", &name, store.config().quoting)?;
            check_text_field("type", &account_type, store.config().quoting)?;
            let record = Record::new(id, name, account_type, balance);
            store.append_record(&record.fields())?;
            info!("added account {id}");
        }
        Command::Remove { id } => {
            ledger.remove(id).ok_or(AppError::UnknownAccount(id))?;
            store.rewrite_all(&ledger)?;
            info!("removed account {id}, {} remain", ledger.len());
        }
        Command::Compact => {
            let written = store.rewrite_all(&ledger)?;
            info!("compacted {} to {written} accounts", store.data_path().display());
        }
    }

    Ok(())
}

/// Rejects text that would split or end a data line under `quoting`.
fn check_text_field(field: &'static str, value: &str, quoting: FieldQuoting) -> Result<(), AppError> {
    let breaks_line = value.contains(['\r', '\n']);
    let splits_line = quoting == FieldQuoting::Never && value.contains(char::from(DELIMITER));
    if breaks_line || splits_line {
        return Err(AppError::InvalidField {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Loads the ledger, noting a failed load in the error log before returning it.
fn open_ledger(store: &RecordStore) -> Result<Ledger, AppError> {
    let mut ledger = Ledger::new();
    if let Err(err) = store.load(&mut ledger) {
        store.log_error(&format!(
            "failed to load {}: {err}",
            store.data_path().display()
        ))?;
        return Err(err.into());
    }
    Ok(ledger)
}
