pub mod app;

pub mod common {
    pub mod config;
    pub mod error;
}

pub mod domain {
    pub mod ledger;
    pub mod record;
}

pub mod io {
    pub mod reader;
    pub mod store;
    pub mod writer;
}

pub use common::{
    config::{FieldQuoting, MalformedLinePolicy, StoreConfig},
    error::{AppError, StoreError},
};
pub use domain::{
    ledger::{AccountSink, AccountSource, Ledger},
    record::Record,
};
pub use io::store::RecordStore;
