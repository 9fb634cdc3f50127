use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use sme_screener_core::metrics::{CompanyMetrics, MetricsRepositoryTrait};
use sme_screener_core::Result;

use super::model::MetricsDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::company_metrics;

pub struct MetricsRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl MetricsRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        MetricsRepository { pool, writer }
    }
}

#[async_trait]
impl MetricsRepositoryTrait for MetricsRepository {
    fn get_metrics(&self, orgnr: &str) -> Result<Option<CompanyMetrics>> {
        let mut conn = get_connection(&self.pool)?;
        let row = company_metrics::table
            .find(orgnr)
            .select(MetricsDB::as_select())
            .first::<MetricsDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(row.map(CompanyMetrics::from))
    }

    fn load_all_metrics(&self) -> Result<Vec<CompanyMetrics>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = company_metrics::table
            .order(company_metrics::orgnr.asc())
            .select(MetricsDB::as_select())
            .load::<MetricsDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(CompanyMetrics::from).collect())
    }

    async fn upsert_metrics(&self, metrics: Vec<CompanyMetrics>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for m in metrics {
                    let row: MetricsDB = m.into();
                    affected_rows += diesel::insert_into(company_metrics::table)
                        .values(&row)
                        .on_conflict(company_metrics::orgnr)
                        .do_update()
                        .set(&row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }
}
