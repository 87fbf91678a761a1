//! SQLite index sink.
//!
//! Persists index documents into two tables: `documents` carries the record
//! fields plus the IP octets, `document_tiles` carries one row per tile
//! level. Each submission is one transaction so a document is either fully
//! present or absent; documents only become durable at the final
//! WAL checkpoint issued by [`SqliteSink::commit`].
//!
//! All inserts use parameterized queries to prevent SQL injection.

use std::sync::Arc;

use log::{debug, info};
use sqlx::{Pool, Sqlite};

use crate::document::IndexDocument;
use crate::error_handling::{CommitFailure, StorageFailure};
use crate::sink::IndexSink;
use crate::tile::TIER_FIELD_PREFIX;

/// Index sink writing into a SQLite database.
pub struct SqliteSink {
    pool: Arc<Pool<Sqlite>>,
}

impl SqliteSink {
    /// Creates a sink over an initialized pool (schema already migrated).
    pub fn new(pool: Arc<Pool<Sqlite>>) -> Self {
        SqliteSink { pool }
    }
}

impl IndexSink for SqliteSink {
    async fn submit(&self, document: IndexDocument) -> Result<(), StorageFailure> {
        let mut tx = self.pool.begin().await.map_err(StorageFailure::new)?;
        let r = &document.record;

        let document_id = sqlx::query(
            "INSERT INTO documents (
                ip_start, country_code, country_name, region_code, region_name,
                city, postal_code, metro_code, latitude, longitude,
                octet_a, octet_b, octet_c, octet_d
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(i64::from(r.ip_start))
        .bind(&r.country_code)
        .bind(&r.country_name)
        .bind(&r.region_code)
        .bind(&r.region_name)
        .bind(&r.city)
        .bind(&r.postal_code)
        .bind(&r.metro_code)
        .bind(r.lat)
        .bind(r.lon)
        .bind(i64::from(document.octets.a))
        .bind(i64::from(document.octets.b))
        .bind(i64::from(document.octets.c))
        .bind(i64::from(document.octets.d))
        .execute(&mut *tx)
        .await
        .map_err(StorageFailure::new)?
        .last_insert_rowid();

        for (level, tile_id) in &document.tiles {
            sqlx::query(
                "INSERT INTO document_tiles (document_id, level, field, tile_id)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(document_id)
            .bind(i64::from(*level))
            .bind(format!("{TIER_FIELD_PREFIX}{level}"))
            .bind(*tile_id)
            .execute(&mut *tx)
            .await
            .map_err(StorageFailure::new)?;
        }

        tx.commit().await.map_err(StorageFailure::new)?;
        debug!("stored document for ip_start {}", r.ip_start);
        Ok(())
    }

    async fn commit(&self) -> Result<(), CommitFailure> {
        sqlx::query("PRAGMA wal_checkpoint(TRUNCATE)")
            .execute(&*self.pool)
            .await
            .map_err(CommitFailure::new)?;
        info!("WAL checkpoint complete; index is durable");
        Ok(())
    }

    async fn close(&self) -> Result<(), CommitFailure> {
        self.pool.close().await;
        Ok(())
    }
}
