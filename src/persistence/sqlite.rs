//! SQLite-backed prediction history

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::errors::{InferenceError, Result};
use crate::persistence::PredictionSink;
use crate::types::{PredictionRecord, PredictionTier};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS disease_predictions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    record_id TEXT NOT NULL UNIQUE,
    user_id INTEGER NOT NULL,
    symptoms TEXT NOT NULL,
    predicted_disease TEXT,
    confidence_score REAL,
    description TEXT,
    recommendations TEXT,
    tier TEXT,
    predicted_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_disease_predictions_user
    ON disease_predictions (user_id, predicted_at);
";

/// Prediction history table in a SQLite database
pub struct SqlitePredictionStore {
    conn: Mutex<Connection>,
}

impl SqlitePredictionStore {
    /// Open (and create if needed) a database file
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::initialize(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| InferenceError::PersistenceFailure("connection lock poisoned".to_string()))?;
        f(&conn)
    }

    /// Most recent predictions for a user, newest first
    pub fn recent_for_user(&self, user_id: i64, limit: usize) -> Result<Vec<PredictionRecord>> {
        let limit = sql_limit(limit);
        let rows = self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT record_id, user_id, symptoms, predicted_disease, confidence_score,
                        description, recommendations, tier, predicted_at
                 FROM disease_predictions
                 WHERE user_id = ?1
                 ORDER BY predicted_at DESC, id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![user_id, limit], |row| {
                    Ok(RawRow {
                        record_id: row.get(0)?,
                        user_id: row.get(1)?,
                        symptoms: row.get(2)?,
                        condition: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                        confidence: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
                        description: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                        precautions: row.get::<_, Option<String>>(6)?.unwrap_or_else(|| "[]".to_string()),
                        tier: row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                        predicted_at: row.get(8)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })?;

        rows.into_iter().map(RawRow::into_record).collect()
    }

    /// Number of stored predictions
    pub fn count(&self) -> Result<usize> {
        self.with_conn(|conn| {
            let n: i64 = conn.query_row("SELECT COUNT(*) FROM disease_predictions", [], |row| row.get(0))?;
            Ok(n as usize)
        })
    }
}

impl PredictionSink for SqlitePredictionStore {
    fn record_prediction(&self, record: &PredictionRecord) -> Result<()> {
        let symptoms = serde_json::to_string(&record.symptoms)?;
        let precautions = serde_json::to_string(&record.precautions)?;

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO disease_predictions
                    (record_id, user_id, symptoms, predicted_disease, confidence_score,
                     description, recommendations, tier, predicted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id.to_string(),
                    record.user_id,
                    symptoms,
                    record.condition,
                    record.confidence,
                    record.description,
                    precautions,
                    record.tier.name(),
                    record.predicted_at.to_rfc3339_opts(SecondsFormat::Micros, true),
                ],
            )?;
            Ok(())
        })
    }
}

/// LIMIT value that never wraps negative, which SQLite reads as unlimited
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

struct RawRow {
    record_id: String,
    user_id: i64,
    symptoms: String,
    condition: String,
    confidence: f64,
    description: String,
    precautions: String,
    tier: String,
    predicted_at: String,
}

impl RawRow {
    fn into_record(self) -> Result<PredictionRecord> {
        let corrupt = |what: &str| {
            InferenceError::PersistenceFailure(format!("stored prediction {} has invalid {}", self.record_id, what))
        };

        let id = Uuid::parse_str(&self.record_id).map_err(|_| corrupt("id"))?;
        let tier = PredictionTier::from_name(&self.tier).ok_or_else(|| corrupt("tier"))?;
        let predicted_at = DateTime::parse_from_rfc3339(&self.predicted_at)
            .map_err(|_| corrupt("timestamp"))?
            .with_timezone(&Utc);

        Ok(PredictionRecord {
            id,
            user_id: self.user_id,
            symptoms: serde_json::from_str(&self.symptoms)?,
            condition: self.condition,
            confidence: self.confidence,
            description: self.description,
            precautions: serde_json::from_str(&self.precautions)?,
            tier,
            predicted_at,
        })
    }
}
