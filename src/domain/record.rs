/// Field separator of the data file.
pub const DELIMITER: u8 = b',';

/// Number of fields in every persisted account line.
pub const RECORD_WIDTH: usize = 4;

/// Field names in on-disk order, used in parse diagnostics.
pub const FIELD_NAMES: [&str; RECORD_WIDTH] = ["id", "name", "type", "balance"];

/// One persisted account: `id,name,type,balance`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: i64,
    pub name: String,
    /// Account category, e.g. `Checking`.
    pub account_type: String,
    /// Balance in the smallest currency unit.
    pub balance: i64,
}

impl Record {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        account_type: impl Into<String>,
        balance: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            account_type: account_type.into(),
            balance,
        }
    }

    /// The record's fields in the canonical string form written to disk.
    pub fn fields(&self) -> [String; RECORD_WIDTH] {
        [
            self.id.to_string(),
            self.name.clone(),
            self.account_type.clone(),
            self.balance.to_string(),
        ]
    }
}
