use chrono::{NaiveDate, Utc};
use std::collections::BTreeSet;
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::path::Path;
use tracing::{debug, info};

use crate::error::Result;
use crate::ledger::{format_date, mark_date_complete, parse_date};
use crate::models::{CompletionRecord, Level};

/// Per-user progress persistence.
pub trait ProgressStore {
    /// Loads the record, creating an empty one on first access.
    fn load(&self, user_id: &str) -> Result<CompletionRecord>;

    fn save(&self, user_id: &str, record: &CompletionRecord) -> Result<()>;

    /// Read-modify-write as a single transaction.
    fn update<F>(&self, user_id: &str, f: F) -> Result<CompletionRecord>
    where
        F: FnOnce(CompletionRecord) -> CompletionRecord;
}

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened database");
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS progress (
                user_id TEXT PRIMARY KEY,
                level TEXT NOT NULL DEFAULT 'beginner',
                streak INTEGER NOT NULL DEFAULT 0,
                total_completed INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS completed_days (
                user_id TEXT NOT NULL,
                day TEXT NOT NULL,
                PRIMARY KEY (user_id, day),
                FOREIGN KEY (user_id) REFERENCES progress(user_id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_completed_days_user ON completed_days(user_id);
            "#,
        )?;
        Ok(())
    }

    fn begin(&self) -> Result<Transaction<'_>> {
        // IMMEDIATE takes the write lock up front so two writers cannot both
        // read the same pre-completion state.
        Ok(Transaction::new_unchecked(
            &self.conn,
            TransactionBehavior::Immediate,
        )?)
    }

    fn read_record(conn: &Connection, user_id: &str) -> Result<CompletionRecord> {
        let created = conn.execute(
            "INSERT OR IGNORE INTO progress (user_id) VALUES (?1)",
            params![user_id],
        )?;
        if created > 0 {
            info!(user = user_id, "created progress record");
        }

        let (level, streak, total_completed): (String, u32, u32) = conn.query_row(
            "SELECT level, streak, total_completed FROM progress WHERE user_id = ?1",
            params![user_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let mut stmt = conn.prepare("SELECT day FROM completed_days WHERE user_id = ?1")?;
        let days = stmt
            .query_map(params![user_id], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        let completed_dates: BTreeSet<NaiveDate> = days
            .iter()
            .map(|d| parse_date(d))
            .collect::<Result<_>>()?;

        Ok(CompletionRecord {
            completed_dates,
            streak,
            total_completed,
            level: Level::from_str_or_default(&level),
        })
    }

    fn write_record(conn: &Connection, user_id: &str, record: &CompletionRecord) -> Result<()> {
        conn.execute(
            "INSERT OR IGNORE INTO progress (user_id) VALUES (?1)",
            params![user_id],
        )?;
        conn.execute(
            r#"
            UPDATE progress
            SET level = ?1,
                streak = ?2,
                total_completed = ?3,
                updated_at = ?4
            WHERE user_id = ?5
            "#,
            params![
                record.level.as_str(),
                record.streak,
                record.total_completed,
                Utc::now().to_rfc3339(),
                user_id
            ],
        )?;

        conn.execute(
            "DELETE FROM completed_days WHERE user_id = ?1",
            params![user_id],
        )?;
        let mut insert =
            conn.prepare("INSERT INTO completed_days (user_id, day) VALUES (?1, ?2)")?;
        for date in &record.completed_dates {
            insert.execute(params![user_id, format_date(*date)])?;
        }
        Ok(())
    }

    /// Marks `date` complete for the user. Returns the record after the
    /// update and whether this call added the day, both read inside the
    /// write transaction.
    pub fn complete_day(&self, user_id: &str, date: NaiveDate) -> Result<(CompletionRecord, bool)> {
        let mut added = false;
        let record = self.update(user_id, |record| {
            added = !record.is_completed(date);
            mark_date_complete(record, date)
        })?;
        Ok((record, added))
    }

    pub fn set_level(&self, user_id: &str, level: Level) -> Result<CompletionRecord> {
        let record = self.update(user_id, |mut record| {
            record.level = level;
            record
        })?;
        info!(user = user_id, level = level.as_str(), "level changed");
        Ok(record)
    }

    /// Removes all progress for the user.
    pub fn reset(&self, user_id: &str) -> Result<bool> {
        let tx = self.begin()?;
        tx.execute(
            "DELETE FROM completed_days WHERE user_id = ?1",
            params![user_id],
        )?;
        let rows = tx.execute("DELETE FROM progress WHERE user_id = ?1", params![user_id])?;
        tx.commit()?;
        if rows > 0 {
            info!(user = user_id, "progress record deleted");
        }
        Ok(rows > 0)
    }
}

impl ProgressStore for Database {
    fn load(&self, user_id: &str) -> Result<CompletionRecord> {
        Self::read_record(&self.conn, user_id)
    }

    fn save(&self, user_id: &str, record: &CompletionRecord) -> Result<()> {
        let tx = self.begin()?;
        Self::write_record(&tx, user_id, record)?;
        tx.commit()?;
        Ok(())
    }

    fn update<F>(&self, user_id: &str, f: F) -> Result<CompletionRecord>
    where
        F: FnOnce(CompletionRecord) -> CompletionRecord,
    {
        let tx = self.begin()?;
        let current = Self::read_record(&tx, user_id)?;
        let updated = f(current.clone());
        if updated != current {
            Self::write_record(&tx, user_id, &updated)?;
        }
        tx.commit()?;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn setup_db() -> Database {
        let db = Database::open(":memory:").expect("Failed to create in-memory database");
        db.init().expect("Failed to initialize database");
        db
    }

    fn d(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    mod init_tests {
        use super::*;

        #[test]
        fn init_creates_tables() {
            let db = setup_db();
            let progress: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM progress", [], |row| row.get(0))
                .expect("progress table should exist");
            assert_eq!(progress, 0);

            let days: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM completed_days", [], |row| row.get(0))
                .expect("completed_days table should exist");
            assert_eq!(days, 0);
        }

        #[test]
        fn init_is_idempotent() {
            let db = setup_db();
            db.init().expect("second init should succeed");
        }
    }

    mod load_save_tests {
        use super::*;

        #[test]
        fn first_load_creates_default_record() {
            let db = setup_db();
            let r = db.load("alice").unwrap();
            assert_eq!(r, CompletionRecord::default());

            let rows: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM progress", [], |row| row.get(0))
                .unwrap();
            assert_eq!(rows, 1);
        }

        #[test]
        fn save_then_load_round_trips() {
            let db = setup_db();
            let mut r = CompletionRecord::default();
            r = mark_date_complete(r, d("2024-01-01"));
            r = mark_date_complete(r, d("2024-01-02"));
            r.level = Level::Advanced;
            db.save("alice", &r).unwrap();

            assert_eq!(db.load("alice").unwrap(), r);
        }

        #[test]
        fn users_are_isolated() {
            let db = setup_db();
            db.complete_day("alice", d("2024-01-01")).unwrap();
            let bob = db.load("bob").unwrap();
            assert!(bob.completed_dates.is_empty());
            assert_eq!(db.load("alice").unwrap().total_completed, 1);
        }

        #[test]
        fn malformed_stored_date_is_reported() {
            let db = setup_db();
            db.load("alice").unwrap();
            db.conn
                .execute(
                    "INSERT INTO completed_days (user_id, day) VALUES ('alice', '2024-1-1')",
                    [],
                )
                .unwrap();
            assert!(matches!(db.load("alice"), Err(Error::InvalidDate(_))));
        }

        #[test]
        fn unknown_stored_level_loads_as_beginner() {
            let db = setup_db();
            db.load("alice").unwrap();
            db.conn
                .execute("UPDATE progress SET level = 'expert' WHERE user_id = 'alice'", [])
                .unwrap();
            assert_eq!(db.load("alice").unwrap().level, Level::Beginner);
        }
    }

    mod complete_day_tests {
        use super::*;

        #[test]
        fn complete_day_persists() {
            let db = setup_db();
            let r = db.complete_day("alice", d("2024-01-01")).unwrap().0;
            assert_eq!(r.streak, 1);
            assert_eq!(db.load("alice").unwrap(), r);
        }

        #[test]
        fn complete_day_twice_does_not_double_count() {
            let db = setup_db();
            db.complete_day("alice", d("2024-01-01")).unwrap();
            let r = db.complete_day("alice", d("2024-01-01")).unwrap().0;
            assert_eq!(r.total_completed, 1);
            assert_eq!(r.streak, 1);

            let days: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM completed_days", [], |row| row.get(0))
                .unwrap();
            assert_eq!(days, 1);
        }

        #[test]
        fn consecutive_days_build_streak() {
            let db = setup_db();
            db.complete_day("alice", d("2024-01-01")).unwrap();
            db.complete_day("alice", d("2024-01-02")).unwrap();
            let r = db.complete_day("alice", d("2024-01-03")).unwrap().0;
            assert_eq!(r.streak, 3);

            let r = db.complete_day("alice", d("2024-01-10")).unwrap().0;
            assert_eq!(r.streak, 1);
            assert_eq!(r.total_completed, 4);
        }

        #[test]
        fn complete_day_keeps_level() {
            let db = setup_db();
            db.set_level("alice", Level::Intermediate).unwrap();
            let r = db.complete_day("alice", d("2024-01-01")).unwrap().0;
            assert_eq!(r.level, Level::Intermediate);
        }
    }

    mod level_tests {
        use super::*;

        #[test]
        fn set_level_persists() {
            let db = setup_db();
            db.set_level("alice", Level::Advanced).unwrap();
            assert_eq!(db.load("alice").unwrap().level, Level::Advanced);
        }

        #[test]
        fn set_level_keeps_history() {
            let db = setup_db();
            db.complete_day("alice", d("2024-01-01")).unwrap();
            let r = db.set_level("alice", Level::Advanced).unwrap();
            assert_eq!(r.total_completed, 1);
            assert!(r.is_completed(d("2024-01-01")));
        }
    }

    mod reset_tests {
        use super::*;

        #[test]
        fn reset_removes_record() {
            let db = setup_db();
            db.complete_day("alice", d("2024-01-01")).unwrap();
            assert!(db.reset("alice").unwrap());
            assert_eq!(db.load("alice").unwrap(), CompletionRecord::default());
        }

        #[test]
        fn reset_unknown_user() {
            let db = setup_db();
            assert!(!db.reset("nobody").unwrap());
        }
    }

    mod update_tests {
        use super::*;

        #[test]
        fn complete_day_reports_whether_day_was_added() {
            let db = setup_db();
            let (_, added) = db.complete_day("alice", d("2024-01-01")).unwrap();
            assert!(added);
            let (r, added) = db.complete_day("alice", d("2024-01-01")).unwrap();
            assert!(!added);
            assert_eq!(r.total_completed, 1);
        }

        #[test]
        fn two_handles_completing_same_day_count_once() {
            let path = std::env::temp_dir().join(format!(
                "streakwell-db-shared-{}.db",
                std::process::id()
            ));
            let _ = std::fs::remove_file(&path);

            let first = Database::open(&path).unwrap();
            first.init().unwrap();
            let second = Database::open(&path).unwrap();

            let (a, added_a) = first.complete_day("alice", d("2024-01-01")).unwrap();
            let (b, added_b) = second.complete_day("alice", d("2024-01-01")).unwrap();
            assert!(added_a);
            assert!(!added_b);
            assert_eq!(a.total_completed, 1);
            assert_eq!(b.total_completed, 1);
            assert_eq!(b.streak, 1);

            let rows: i64 = first
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM completed_days WHERE user_id = ?1",
                    params!["alice"],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(rows, 1);
            assert_eq!(first.load("alice").unwrap().total_completed, 1);

            drop(first);
            drop(second);
            let _ = std::fs::remove_file(&path);
        }

        #[test]
        fn update_without_change_is_noop() {
            let db = setup_db();
            let r = db.update("alice", |r| r).unwrap();
            assert_eq!(r, CompletionRecord::default());
        }

        #[test]
        fn update_sees_latest_committed_state() {
            let db = setup_db();
            db.complete_day("alice", d("2024-01-01")).unwrap();
            let seen = db
                .update("alice", |r| {
                    assert!(r.is_completed(d("2024-01-01")));
                    r
                })
                .unwrap();
            assert_eq!(seen.total_completed, 1);
        }
    }
}
