//! Prospect repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered listing over the `prospects` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Insertion order is the `seq` autoincrement column, never reused.
//! - Name ordering ties are broken by insertion order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::prospect::{Prospect, ProspectId};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const PROSPECT_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    email_address,
    is_contacted
FROM prospects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for prospect and settings persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ProspectId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "prospect not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Which prospects a list view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProspectFilter {
    #[default]
    All,
    Contacted,
    Uncontacted,
}

impl ProspectFilter {
    /// Stable string id used across the FFI boundary.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Contacted => "contacted",
            Self::Uncontacted => "uncontacted",
        }
    }

    /// Parses a stable string id; unknown values return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" | "none" | "everyone" => Some(Self::All),
            "contacted" => Some(Self::Contacted),
            "uncontacted" => Some(Self::Uncontacted),
            _ => None,
        }
    }

    /// Navigation title for a list showing this filter.
    pub fn title(self) -> &'static str {
        match self {
            Self::All => "Everyone",
            Self::Contacted => "Contacted people",
            Self::Uncontacted => "Uncontacted people",
        }
    }

    /// Returns whether `prospect` belongs to this filter.
    pub fn matches(self, prospect: &Prospect) -> bool {
        match self {
            Self::All => true,
            Self::Contacted => prospect.is_contacted,
            Self::Uncontacted => !prospect.is_contacted,
        }
    }
}

/// Ordering of a prospect list view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ProspectSort {
    /// Ascending by name, insertion order on ties.
    #[default]
    Name,
    /// Oldest first, in the order records were added.
    InsertionOrder,
}

impl ProspectSort {
    pub const ALL: [ProspectSort; 2] = [Self::Name, Self::InsertionOrder];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::InsertionOrder => "insertion",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "insertion" | "most_recent" | "recent" => Some(Self::InsertionOrder),
            _ => None,
        }
    }

    /// Label shown in the sort picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::InsertionOrder => "Most Recent",
        }
    }

    fn order_by_sql(self) -> &'static str {
        match self {
            Self::Name => " ORDER BY name ASC, seq ASC",
            Self::InsertionOrder => " ORDER BY seq ASC",
        }
    }
}

/// Query options for listing prospects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProspectListQuery {
    pub filter: ProspectFilter,
    pub sort: ProspectSort,
}

/// Repository interface for prospect CRUD operations.
pub trait ProspectRepository {
    fn create_prospect(&self, prospect: &Prospect) -> RepoResult<ProspectId>;
    fn update_prospect(&self, prospect: &Prospect) -> RepoResult<()>;
    fn get_prospect(&self, id: ProspectId) -> RepoResult<Option<Prospect>>;
    fn list_prospects(&self, query: &ProspectListQuery) -> RepoResult<Vec<Prospect>>;
    fn set_contacted(&self, id: ProspectId, is_contacted: bool) -> RepoResult<()>;
    fn delete_prospect(&self, id: ProspectId) -> RepoResult<()>;
    /// Deletes every listed prospect in one transaction.
    ///
    /// Unknown ids are skipped. Returns the number of rows removed.
    fn delete_prospects(&self, ids: &[ProspectId]) -> RepoResult<usize>;
}

/// SQLite-backed prospect repository.
pub struct SqliteProspectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProspectRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProspectRepository for SqliteProspectRepository<'_> {
    fn create_prospect(&self, prospect: &Prospect) -> RepoResult<ProspectId> {
        self.conn.execute(
            "INSERT INTO prospects (
                uuid,
                name,
                email_address,
                is_contacted
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                prospect.id.to_string(),
                prospect.name.as_str(),
                prospect.email_address.as_str(),
                bool_to_int(prospect.is_contacted),
            ],
        )?;

        Ok(prospect.id)
    }

    fn update_prospect(&self, prospect: &Prospect) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE prospects
             SET
                name = ?1,
                email_address = ?2,
                is_contacted = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4;",
            params![
                prospect.name.as_str(),
                prospect.email_address.as_str(),
                bool_to_int(prospect.is_contacted),
                prospect.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(prospect.id));
        }

        Ok(())
    }

    fn get_prospect(&self, id: ProspectId) -> RepoResult<Option<Prospect>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROSPECT_SELECT_SQL} WHERE uuid = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_prospect_row(row)?));
        }

        Ok(None)
    }

    fn list_prospects(&self, query: &ProspectListQuery) -> RepoResult<Vec<Prospect>> {
        let mut sql = String::from(PROSPECT_SELECT_SQL);
        match query.filter {
            ProspectFilter::All => {}
            ProspectFilter::Contacted => sql.push_str(" WHERE is_contacted = 1"),
            ProspectFilter::Uncontacted => sql.push_str(" WHERE is_contacted = 0"),
        }
        sql.push_str(query.sort.order_by_sql());

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut prospects = Vec::new();

        while let Some(row) = rows.next()? {
            prospects.push(parse_prospect_row(row)?);
        }

        Ok(prospects)
    }

    fn set_contacted(&self, id: ProspectId, is_contacted: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE prospects
             SET
                is_contacted = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?2;",
            params![bool_to_int(is_contacted), id.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_prospect(&self, id: ProspectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM prospects WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_prospects(&self, ids: &[ProspectId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        // The repository only borrows the connection, so the transaction is
        // opened through the unchecked variant; callers must not nest one.
        let tx = self.conn.unchecked_transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM prospects WHERE uuid = ?1;")?;
            for id in ids {
                removed += stmt.execute([id.to_string()])?;
            }
        }
        tx.commit()?;

        Ok(removed)
    }
}

fn parse_prospect_row(row: &Row<'_>) -> RepoResult<Prospect> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in prospects.uuid"))
    })?;

    let is_contacted = match row.get::<_, i64>("is_contacted")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid is_contacted value `{other}` in prospects.is_contacted"
            )));
        }
    };

    Ok(Prospect {
        id,
        name: row.get("name")?,
        email_address: row.get("email_address")?,
        is_contacted,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{ProspectFilter, ProspectSort};
    use crate::model::prospect::Prospect;

    #[test]
    fn filter_ids_parse_case_insensitively() {
        assert_eq!(ProspectFilter::parse(" Contacted "), Some(ProspectFilter::Contacted));
        assert_eq!(ProspectFilter::parse("none"), Some(ProspectFilter::All));
        assert_eq!(ProspectFilter::parse("later"), None);
    }

    #[test]
    fn sort_ids_roundtrip_through_as_str() {
        for sort in ProspectSort::ALL {
            assert_eq!(ProspectSort::parse(sort.as_str()), Some(sort));
        }
        assert_eq!(ProspectSort::InsertionOrder.label(), "Most Recent");
    }

    #[test]
    fn filters_partition_by_contacted_flag() {
        let mut contacted = Prospect::new("A", "a@x.com");
        contacted.is_contacted = true;
        let uncontacted = Prospect::new("B", "b@x.com");

        for prospect in [&contacted, &uncontacted] {
            assert!(ProspectFilter::All.matches(prospect));
            assert_ne!(
                ProspectFilter::Contacted.matches(prospect),
                ProspectFilter::Uncontacted.matches(prospect)
            );
        }
        assert_eq!(ProspectFilter::Uncontacted.title(), "Uncontacted people");
    }
}
