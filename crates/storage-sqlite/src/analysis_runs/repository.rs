use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use sme_screener_core::analysis_runs::{AnalysisResult, AnalysisRun, AnalysisRunRepositoryTrait};
use sme_screener_core::{Error, Result};

use super::model::{AnalysisResultDB, AnalysisRunDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{analysis_results, analysis_runs};

pub struct AnalysisRunRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AnalysisRunRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn save_run(conn: &mut SqliteConnection, run: AnalysisRun) -> Result<AnalysisRun> {
    let row: AnalysisRunDB = run.into();
    let affected = diesel::update(analysis_runs::table.find(&row.id))
        .set(&row)
        .execute(conn)
        .map_err(StorageError::from)?;
    if affected == 0 {
        return Err(Error::NotFound(format!("Analysis run {}", row.id)));
    }
    Ok(row.into())
}

#[async_trait]
impl AnalysisRunRepositoryTrait for AnalysisRunRepository {
    fn list_runs(&self) -> Result<Vec<AnalysisRun>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = analysis_runs::table
            .order((analysis_runs::created_at.desc(), analysis_runs::id.desc()))
            .select(AnalysisRunDB::as_select())
            .load::<AnalysisRunDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(AnalysisRun::from).collect())
    }

    fn get_run(&self, run_id: &str) -> Result<AnalysisRun> {
        let mut conn = get_connection(&self.pool)?;
        let row = analysis_runs::table
            .find(run_id)
            .select(AnalysisRunDB::as_select())
            .first::<AnalysisRunDB>(&mut conn)
            .map_err(not_found_as("Analysis run", run_id))?;
        Ok(row.into())
    }

    fn get_results(&self, run_id: &str) -> Result<Vec<AnalysisResult>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = analysis_results::table
            .filter(analysis_results::run_id.eq(run_id))
            .order(analysis_results::rank.asc())
            .select(AnalysisResultDB::as_select())
            .load::<AnalysisResultDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(rows.into_iter().map(AnalysisResult::from).collect())
    }

    async fn insert_run(&self, run: AnalysisRun) -> Result<AnalysisRun> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AnalysisRun> {
                let row: AnalysisRunDB = run.into();
                diesel::insert_into(analysis_runs::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(row.into())
            })
            .await
    }

    async fn update_run(&self, run: AnalysisRun) -> Result<AnalysisRun> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AnalysisRun> { save_run(conn, run) })
            .await
    }

    async fn complete_run(
        &self,
        run: AnalysisRun,
        results: Vec<AnalysisResult>,
    ) -> Result<AnalysisRun> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<AnalysisRun> {
                diesel::delete(analysis_results::table.filter(analysis_results::run_id.eq(&run.id)))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let rows: Vec<AnalysisResultDB> =
                    results.into_iter().map(AnalysisResultDB::from).collect();
                for chunk in rows.chunks(100) {
                    diesel::insert_into(analysis_results::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                save_run(conn, run)
            })
            .await
    }

    async fn delete_run(&self, run_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let affected = diesel::delete(analysis_runs::table.find(&run_id))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(affected)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{setup_db, ts};
    use sme_screener_core::analysis_runs::AnalysisStatus;
    use sme_screener_core::companies::CompanyFilter;
    use sme_screener_core::metrics::GrowthCategory;

    fn run(id: &str, created_at: &str) -> AnalysisRun {
        AnalysisRun {
            id: id.to_string(),
            name: format!("Run {}", id),
            description: None,
            status: AnalysisStatus::Pending,
            filter: CompanyFilter {
                growth_category: Some(GrowthCategory::HighGrowth),
                ..Default::default()
            },
            max_results: 10,
            result_count: 0,
            error_message: None,
            created_at: ts(created_at),
            completed_at: None,
        }
    }

    fn result(run_id: &str, rank: i32, orgnr: &str) -> AnalysisResult {
        AnalysisResult {
            id: format!("{}-{}", run_id, rank),
            run_id: run_id.to_string(),
            orgnr: orgnr.to_string(),
            company_name: format!("Bolag {}", rank),
            rank,
            fit_score: 90 - rank,
            summary: "High Growth · Profitable · Small".to_string(),
        }
    }

    #[tokio::test]
    async fn test_run_lifecycle() {
        let (pool, writer, _dir) = setup_db().await;
        let repo = AnalysisRunRepository::new(pool, writer);

        repo.insert_run(run("a", "2024-05-01 10:00:00")).await.unwrap();
        repo.insert_run(run("b", "2024-05-02 10:00:00")).await.unwrap();

        let listed: Vec<_> = repo.list_runs().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(listed, vec!["b", "a"]);

        let mut finished = repo.get_run("a").unwrap();
        assert_eq!(finished.filter.growth_category, Some(GrowthCategory::HighGrowth));
        finished.status = AnalysisStatus::Completed;
        finished.result_count = 2;
        finished.completed_at = Some(ts("2024-05-01 10:00:05"));
        repo.complete_run(
            finished,
            vec![result("a", 2, "5560000002"), result("a", 1, "5560000001")],
        )
        .await
        .unwrap();

        let stored = repo.get_run("a").unwrap();
        assert_eq!(stored.status, AnalysisStatus::Completed);
        assert_eq!(stored.result_count, 2);
        let ranks: Vec<_> = repo.get_results("a").unwrap().iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 2]);

        assert_eq!(repo.delete_run("a".to_string()).await.unwrap(), 1);
        assert!(repo.get_results("a").unwrap().is_empty());
        assert!(repo.get_run("a").unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_missing_run_is_not_found() {
        let (pool, writer, _dir) = setup_db().await;
        let repo = AnalysisRunRepository::new(pool, writer);
        let err = repo.update_run(run("ghost", "2024-05-01 10:00:00")).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
