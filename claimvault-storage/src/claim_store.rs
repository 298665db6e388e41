//! Claim persistence — claim rows plus their append-only event log.

use crate::error::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use claimvault_types::{Claim, Event, EventCategory};
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Persists claims and their lifecycle events.
#[derive(Clone)]
pub struct ClaimStore {
    conn: Arc<Mutex<Connection>>,
}

impl ClaimStore {
    /// Opens or creates a claim store at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let conn = crate::open_duckdb(path, "128MB", 1)?;
        initialize_claim_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Opens an in-memory claim store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_claim_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Creates a claim with a fresh UUID for a claimant at an agency.
    pub fn create_claim(
        &self,
        swa_code: impl Into<String>,
        claimant_id: impl Into<String>,
    ) -> StorageResult<Claim> {
        let claim = Claim::new(swa_code, claimant_id);
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO claims (uuid, swa_code, claimant_id, status) VALUES (?, ?, ?, ?)",
            params![
                claim.id.to_string(),
                claim.swa_code,
                claim.claimant_id,
                claim.status,
            ],
        )?;
        Ok(claim)
    }

    /// Loads a claim with its events in occurrence order.
    pub fn get_claim(&self, claim_id: &Uuid) -> StorageResult<Option<Claim>> {
        let conn = self.conn.lock().unwrap();
        let row = conn.query_row(
            "SELECT uuid, swa_code, claimant_id, status FROM claims WHERE uuid = ?",
            params![claim_id.to_string()],
            |row| {
                let uuid: String = row.get(0)?;
                let swa_code: String = row.get(1)?;
                let claimant_id: String = row.get(2)?;
                let status: Option<String> = row.get(3)?;
                Ok((uuid, swa_code, claimant_id, status))
            },
        );

        let (uuid, swa_code, claimant_id, status) = match row {
            Ok(row) => row,
            Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let id = uuid
            .parse()
            .map_err(|_| StorageError::NotFound(uuid.clone()))?;
        let events = load_events(&conn, &id)?;
        Ok(Some(Claim {
            id,
            swa_code,
            claimant_id,
            status,
            events,
        }))
    }

    /// Appends an event to a claim's log and returns it.
    pub fn append_event(
        &self,
        claim_id: &Uuid,
        category: EventCategory,
        description: impl Into<String>,
    ) -> StorageResult<Event> {
        let event = Event::new(*claim_id, category, description);
        let conn = self.conn.lock().unwrap();
        insert_event(&conn, &event)?;
        Ok(event)
    }

    /// Events for a claim, ordered by occurrence time.
    pub fn events_for_claim(&self, claim_id: &Uuid) -> StorageResult<Vec<Event>> {
        let conn = self.conn.lock().unwrap();
        load_events(&conn, claim_id)
    }

    /// Changes a claim's status, recording the old→new transition as a
    /// STATUS_CHANGED event in the same transaction. The status and its
    /// audit record can never diverge.
    pub fn change_status(&self, claim_id: &Uuid, new_status: &str) -> StorageResult<Claim> {
        {
            let mut conn = self.conn.lock().unwrap();
            let tx = conn.transaction()?;

            let old_status: Option<String> = match tx.query_row(
                "SELECT status FROM claims WHERE uuid = ?",
                params![claim_id.to_string()],
                |row| row.get(0),
            ) {
                Ok(status) => status,
                Err(duckdb::Error::QueryReturnedNoRows) => {
                    return Err(StorageError::NotFound(claim_id.to_string()));
                }
                Err(e) => return Err(e.into()),
            };

            tx.execute(
                "UPDATE claims SET status = ? WHERE uuid = ?",
                params![new_status, claim_id.to_string()],
            )?;

            let description =
                serde_json::json!({ "old": old_status, "new": new_status }).to_string();
            let event = Event::new(*claim_id, EventCategory::StatusChanged, description);
            insert_event(&tx, &event)?;

            tx.commit()?;
        }

        self.get_claim(claim_id)?
            .ok_or_else(|| StorageError::NotFound(claim_id.to_string()))
    }

    /// True iff the claim has at least one COMPLETED event. Evaluated
    /// from the event log on every call.
    pub fn is_complete(&self, claim_id: &Uuid) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM claim_events WHERE claim_uuid = ? AND category = ?",
            params![claim_id.to_string(), EventCategory::Completed.code()],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Number of events of a category in a claim's log.
    pub fn count_events(
        &self,
        claim_id: &Uuid,
        category: EventCategory,
    ) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM claim_events WHERE claim_uuid = ? AND category = ?",
            params![claim_id.to_string(), category.code()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

fn insert_event(conn: &Connection, event: &Event) -> StorageResult<()> {
    conn.execute(
        "INSERT INTO claim_events (id, claim_uuid, category, description, happened_at) \
         VALUES (?, ?, ?, ?, ?)",
        params![
            event.id.to_string(),
            event.claim_id.to_string(),
            event.category.code(),
            event.description,
            event.happened_at.timestamp_micros(),
        ],
    )?;
    Ok(())
}

fn load_events(conn: &Connection, claim_id: &Uuid) -> StorageResult<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT id, claim_uuid, category, description, happened_at \
         FROM claim_events WHERE claim_uuid = ? ORDER BY happened_at, seq",
    )?;

    let events = stmt
        .query_map(params![claim_id.to_string()], row_to_event)?
        .filter_map(|r| r.ok())
        .collect();

    Ok(events)
}

fn row_to_event(row: &duckdb::Row<'_>) -> duckdb::Result<Event> {
    let id_str: String = row.get(0)?;
    let claim_id_str: String = row.get(1)?;
    let category_code: i32 = row.get(2)?;
    let description: String = row.get(3)?;
    let happened_micros: i64 = row.get(4)?;

    let id: Uuid = id_str.parse().unwrap_or_default();
    let claim_id: Uuid = claim_id_str.parse().unwrap_or_default();
    let category = EventCategory::from_code(category_code).unwrap_or(EventCategory::StatusChanged);
    let happened_at: DateTime<Utc> =
        DateTime::from_timestamp_micros(happened_micros).unwrap_or_default();

    Ok(Event {
        id,
        claim_id,
        category,
        description,
        happened_at,
    })
}

fn initialize_claim_schema(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS claims (
            uuid VARCHAR PRIMARY KEY,
            swa_code VARCHAR NOT NULL,
            claimant_id VARCHAR NOT NULL,
            status VARCHAR
        );

        CREATE SEQUENCE IF NOT EXISTS claim_events_seq;
        CREATE TABLE IF NOT EXISTS claim_events (
            id VARCHAR PRIMARY KEY,
            claim_uuid VARCHAR NOT NULL,
            category INTEGER NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            happened_at BIGINT NOT NULL,
            seq BIGINT DEFAULT nextval('claim_events_seq')
        );
        CREATE INDEX IF NOT EXISTS idx_claim_events_claim ON claim_events(claim_uuid);
        CREATE INDEX IF NOT EXISTS idx_claim_events_time ON claim_events(happened_at);
        "#,
    )?;
    Ok(())
}
