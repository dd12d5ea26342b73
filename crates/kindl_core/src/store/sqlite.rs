//! SQLite snapshot store.
//!
//! # Responsibility
//! - Persist intent views, reactions and profile views in normalized tables.
//! - Replace the whole snapshot inside one immediate transaction.
//!
//! # Invariants
//! - `intent_views.position` encodes first-reference order and is dense
//!   from zero after every save.
//! - Negative counters or non-finite depths read back as `InvalidData`.

use crate::db::{open_db, open_db_in_memory};
use crate::model::behavior::{
    BehaviorSnapshot, IntentViewEntry, IntentViewRecord, ProfileViewRecord, ReactionTally,
};
use crate::model::intent::{IntentId, ProfileId};
use crate::store::{BehaviorStore, StoreError, StoreResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

/// Snapshot store owning one migrated SQLite connection.
pub struct SqliteBehaviorStore {
    conn: Connection,
}

impl SqliteBehaviorStore {
    /// Opens (or creates) the behavior database at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Epoch milliseconds of the last successful save, if any.
    pub fn last_saved_at(&self) -> StoreResult<Option<i64>> {
        let saved_at = self
            .conn
            .query_row("SELECT saved_at FROM snapshot_meta WHERE id = 1;", [], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(saved_at)
    }

    fn write_snapshot(&mut self, snapshot: &BehaviorSnapshot) -> StoreResult<()> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(
            "DELETE FROM intent_views;
             DELETE FROM intent_reactions;
             DELETE FROM profile_views;",
        )?;

        {
            let mut insert_view = tx.prepare(
                "INSERT INTO intent_views (
                    intent_id,
                    position,
                    view_count,
                    last_viewed,
                    total_time_spent_ms,
                    scroll_depth
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            )?;
            for (position, entry) in snapshot.intent_views.iter().enumerate() {
                insert_view.execute(params![
                    entry.intent_id.as_str(),
                    to_db_int(position as u64, "intent_views.position")?,
                    entry.record.count,
                    entry.record.last_viewed,
                    to_db_int(
                        entry.record.total_time_spent_ms,
                        "intent_views.total_time_spent_ms"
                    )?,
                    entry.record.scroll_depth,
                ])?;
            }

            let mut insert_reaction = tx.prepare(
                "INSERT INTO intent_reactions (intent_id, feels_right, maybe_later, not_vibe)
                 VALUES (?1, ?2, ?3, ?4);",
            )?;
            for (intent_id, tally) in &snapshot.reactions {
                insert_reaction.execute(params![
                    intent_id.as_str(),
                    tally.feels_right,
                    tally.maybe_later,
                    tally.not_vibe,
                ])?;
            }

            let mut insert_profile = tx.prepare(
                "INSERT INTO profile_views (profile_id, view_count, time_spent_ms)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (profile_id, record) in &snapshot.profile_views {
                insert_profile.execute(params![
                    profile_id.as_str(),
                    record.count,
                    to_db_int(record.time_spent_ms, "profile_views.time_spent_ms")?,
                ])?;
            }
        }

        tx.execute(
            "INSERT INTO snapshot_meta (id, saved_at)
             VALUES (1, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(id) DO UPDATE SET saved_at = excluded.saved_at;",
            [],
        )?;
        tx.commit()?;
        Ok(())
    }
}

impl BehaviorStore for SqliteBehaviorStore {
    fn kind(&self) -> &'static str {
        "sqlite"
    }

    fn load(&self) -> StoreResult<Option<BehaviorSnapshot>> {
        if self.last_saved_at()?.is_none() {
            return Ok(None);
        }

        let snapshot = BehaviorSnapshot {
            intent_views: load_intent_views(&self.conn)?,
            reactions: load_reactions(&self.conn)?,
            profile_views: load_profile_views(&self.conn)?,
        };
        snapshot.validate()?;
        Ok(Some(snapshot))
    }

    fn save(&mut self, snapshot: &BehaviorSnapshot) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.write_snapshot(snapshot) {
            Ok(()) => {
                info!(
                    "event=behavior_save module=store status=ok store=sqlite intents={} duration_ms={}",
                    snapshot.intent_views.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=behavior_save module=store status=error store=sqlite duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }
}

fn load_intent_views(conn: &Connection) -> StoreResult<Vec<IntentViewEntry>> {
    let mut stmt = conn.prepare(
        "SELECT intent_id, view_count, last_viewed, total_time_spent_ms, scroll_depth
         FROM intent_views
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut views = Vec::new();
    while let Some(row) = rows.next()? {
        views.push(parse_view_row(row)?);
    }
    Ok(views)
}

fn load_reactions(conn: &Connection) -> StoreResult<BTreeMap<IntentId, ReactionTally>> {
    let mut stmt = conn.prepare(
        "SELECT intent_id, feels_right, maybe_later, not_vibe
         FROM intent_reactions;",
    )?;
    let mut rows = stmt.query([])?;
    let mut reactions = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let tally = ReactionTally {
            feels_right: row.get("feels_right")?,
            maybe_later: row.get("maybe_later")?,
            not_vibe: row.get("not_vibe")?,
        };
        reactions.insert(row.get("intent_id")?, tally);
    }
    Ok(reactions)
}

fn load_profile_views(conn: &Connection) -> StoreResult<BTreeMap<ProfileId, ProfileViewRecord>> {
    let mut stmt = conn.prepare(
        "SELECT profile_id, view_count, time_spent_ms
         FROM profile_views;",
    )?;
    let mut rows = stmt.query([])?;
    let mut profiles = BTreeMap::new();
    while let Some(row) = rows.next()? {
        let record = ProfileViewRecord {
            count: row.get("view_count")?,
            time_spent_ms: from_db_int(
                row.get("time_spent_ms")?,
                "profile_views.time_spent_ms",
            )?,
        };
        profiles.insert(row.get("profile_id")?, record);
    }
    Ok(profiles)
}

fn parse_view_row(row: &Row<'_>) -> StoreResult<IntentViewEntry> {
    Ok(IntentViewEntry {
        intent_id: row.get("intent_id")?,
        record: IntentViewRecord {
            count: row.get("view_count")?,
            last_viewed: row.get("last_viewed")?,
            total_time_spent_ms: from_db_int(
                row.get("total_time_spent_ms")?,
                "intent_views.total_time_spent_ms",
            )?,
            scroll_depth: row.get("scroll_depth")?,
        },
    })
}

fn to_db_int(value: u64, column: &str) -> StoreResult<i64> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("value {value} overflows {column}")))
}

fn from_db_int(value: i64, column: &str) -> StoreResult<u64> {
    u64::try_from(value)
        .map_err(|_| StoreError::InvalidData(format!("negative value {value} in {column}")))
}
