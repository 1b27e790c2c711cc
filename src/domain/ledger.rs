use crate::domain::record::{RECORD_WIDTH, Record};

/// Receives accounts parsed by [`crate::io::store::RecordStore::load`].
pub trait AccountSink {
    fn add_account(&mut self, id: i64, name: &str, account_type: &str, balance: i64);
}

/// Supplies accounts to [`crate::io::store::RecordStore::rewrite_all`], by position.
pub trait AccountSource {
    fn size(&self) -> usize;
    /// Canonical string fields of the account at `index`, or `None` past the end.
    fn account_fields(&self, index: usize) -> Option<[String; RECORD_WIDTH]>;
}

/// In-memory, insertion-ordered set of accounts the application works on.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Ledger {
    accounts: Vec<Record>,
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: Vec::new(),
        }
    }

    pub fn accounts(&self) -> &[Record] {
        &self.accounts
    }

    pub fn find(&self, id: i64) -> Option<&Record> {
        self.accounts.iter().find(|acc| acc.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.find(id).is_some()
    }

    pub fn push(&mut self, record: Record) {
        self.accounts.push(record);
    }

    /// Removes the first account with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: i64) -> Option<Record> {
        let pos = self.accounts.iter().position(|acc| acc.id == id)?;
        Some(self.accounts.remove(pos))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountSink for Ledger {
    fn add_account(&mut self, id: i64, name: &str, account_type: &str, balance: i64) {
        self.accounts.add_account(id, name, account_type, balance);
    }
}

impl AccountSource for Ledger {
    fn size(&self) -> usize {
        self.accounts.size()
    }

    fn account_fields(&self, index: usize) -> Option<[String; RECORD_WIDTH]> {
        self.accounts.account_fields(index)
    }
}

impl AccountSink for Vec<Record> {
    fn add_account(&mut self, id: i64, name: &str, account_type: &str, balance: i64) {
        self.push(Record::new(id, name, account_type, balance));
    }
}

impl AccountSource for Vec<Record> {
    fn size(&self) -> usize {
        self.len()
    }

    fn account_fields(&self, index: usize) -> Option<[String; RECORD_WIDTH]> {
        self.get(index).map(Record::fields)
    }
}
