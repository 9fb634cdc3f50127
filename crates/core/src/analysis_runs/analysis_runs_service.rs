use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info};
use uuid::Uuid;

use super::analysis_runs_model::{AnalysisResult, AnalysisRun, AnalysisStatus, NewAnalysisRun};
use super::analysis_runs_traits::{AnalysisRunRepositoryTrait, AnalysisRunServiceTrait};
use crate::companies::{CompanyListItem, CompanyRepositoryTrait, CompanySort};
use crate::errors::Result;
use crate::utils::time_utils::now_naive;

pub struct AnalysisRunService {
    repository: Arc<dyn AnalysisRunRepositoryTrait>,
    company_repository: Arc<dyn CompanyRepositoryTrait>,
}

impl AnalysisRunService {
    pub fn new(
        repository: Arc<dyn AnalysisRunRepositoryTrait>,
        company_repository: Arc<dyn CompanyRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            company_repository,
        }
    }

    fn screen(&self, run: &AnalysisRun) -> Result<Vec<AnalysisResult>> {
        let page = self.company_repository.search_companies(
            &run.filter,
            &CompanySort::default(),
            0,
            i64::from(run.max_results),
        )?;
        Ok(page
            .data
            .iter()
            .enumerate()
            .map(|(idx, item)| ranked_result(&run.id, idx as i32 + 1, item))
            .collect())
    }
}

/// One-line label of a screened company, e.g. `High Growth · Profitable · Small`.
pub fn result_summary(item: &CompanyListItem) -> String {
    match &item.metrics {
        Some(m) => format!(
            "{} · {} · {}",
            m.growth_category, m.profitability_category, m.size_category
        ),
        None => "Unknown · Unknown · Unknown".to_string(),
    }
}

fn ranked_result(run_id: &str, rank: i32, item: &CompanyListItem) -> AnalysisResult {
    AnalysisResult {
        id: Uuid::new_v4().to_string(),
        run_id: run_id.to_string(),
        orgnr: item.company.orgnr.clone(),
        company_name: item.company.company_name.clone(),
        rank,
        fit_score: item.metrics.as_ref().map(|m| m.fit_score).unwrap_or(0),
        summary: result_summary(item),
    }
}

#[async_trait]
impl AnalysisRunServiceTrait for AnalysisRunService {
    fn list_runs(&self) -> Result<Vec<AnalysisRun>> {
        self.repository.list_runs()
    }

    fn get_run(&self, run_id: &str) -> Result<AnalysisRun> {
        self.repository.get_run(run_id)
    }

    fn get_run_results(&self, run_id: &str) -> Result<Vec<AnalysisResult>> {
        self.repository.get_run(run_id)?;
        self.repository.get_results(run_id)
    }

    async fn create_run(&self, new_run: NewAnalysisRun) -> Result<AnalysisRun> {
        let (name, max_results) = new_run.validate()?;
        let run = AnalysisRun {
            id: Uuid::new_v4().to_string(),
            name,
            description: new_run
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            status: AnalysisStatus::Pending,
            filter: new_run.filter.normalized(),
            max_results,
            result_count: 0,
            error_message: None,
            created_at: now_naive(),
            completed_at: None,
        };
        let mut run = self.repository.insert_run(run).await?;

        run.status = AnalysisStatus::Running;
        let mut run = self.repository.update_run(run).await?;
        info!("Running analysis {} ('{}')", run.id, run.name);

        match self.screen(&run) {
            Ok(results) => {
                run.status = AnalysisStatus::Completed;
                run.result_count = results.len() as i32;
                run.completed_at = Some(now_naive());
                self.repository.complete_run(run, results).await
            }
            Err(e) => {
                error!("Analysis {} failed: {}", run.id, e);
                run.status = AnalysisStatus::Failed;
                run.error_message = Some(e.to_string());
                run.completed_at = Some(now_naive());
                self.repository.update_run(run).await?;
                Err(e)
            }
        }
    }

    async fn delete_run(&self, run_id: String) -> Result<usize> {
        self.repository.delete_run(run_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::{Company, CompanyFilter, CompanySearchResponse};
    use crate::errors::{DatabaseError, Error};
    use crate::metrics::{
        CompanyMetrics, GrowthCategory, ProfitabilityCategory, SizeCategory,
    };
    use std::sync::RwLock;

    #[derive(Default)]
    struct MockRunRepository {
        runs: RwLock<Vec<AnalysisRun>>,
        results: RwLock<Vec<AnalysisResult>>,
        status_history: RwLock<Vec<AnalysisStatus>>,
    }

    impl MockRunRepository {
        fn store(&self, run: AnalysisRun) {
            self.status_history.write().unwrap().push(run.status);
            let mut runs = self.runs.write().unwrap();
            runs.retain(|r| r.id != run.id);
            runs.push(run);
        }
    }

    #[async_trait]
    impl AnalysisRunRepositoryTrait for MockRunRepository {
        fn list_runs(&self) -> Result<Vec<AnalysisRun>> {
            Ok(self.runs.read().unwrap().clone())
        }
        fn get_run(&self, run_id: &str) -> Result<AnalysisRun> {
            self.runs
                .read()
                .unwrap()
                .iter()
                .find(|r| r.id == run_id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("Analysis run {}", run_id)))
        }
        fn get_results(&self, run_id: &str) -> Result<Vec<AnalysisResult>> {
            let mut results: Vec<_> = self
                .results
                .read()
                .unwrap()
                .iter()
                .filter(|r| r.run_id == run_id)
                .cloned()
                .collect();
            results.sort_by_key(|r| r.rank);
            Ok(results)
        }
        async fn insert_run(&self, run: AnalysisRun) -> Result<AnalysisRun> {
            self.store(run.clone());
            Ok(run)
        }
        async fn update_run(&self, run: AnalysisRun) -> Result<AnalysisRun> {
            self.store(run.clone());
            Ok(run)
        }
        async fn complete_run(
            &self,
            run: AnalysisRun,
            results: Vec<AnalysisResult>,
        ) -> Result<AnalysisRun> {
            self.results.write().unwrap().extend(results);
            self.store(run.clone());
            Ok(run)
        }
        async fn delete_run(&self, run_id: String) -> Result<usize> {
            let mut runs = self.runs.write().unwrap();
            let before = runs.len();
            runs.retain(|r| r.id != run_id);
            self.results.write().unwrap().retain(|r| r.run_id != run_id);
            Ok(before - runs.len())
        }
    }

    struct MockCompanyRepository {
        items: Vec<CompanyListItem>,
        fail: bool,
    }

    #[async_trait]
    impl CompanyRepositoryTrait for MockCompanyRepository {
        fn search_companies(
            &self,
            _: &CompanyFilter,
            _: &CompanySort,
            page: i64,
            page_size: i64,
        ) -> Result<CompanySearchResponse> {
            if self.fail {
                return Err(DatabaseError::QueryFailed("disk I/O error".to_string()).into());
            }
            Ok(CompanySearchResponse {
                data: self.items.iter().take(page_size as usize).cloned().collect(),
                total: self.items.len() as i64,
                page,
                page_size,
            })
        }
        fn get_company(&self, _: &str) -> Result<Company> {
            unimplemented!()
        }
        fn load_companies(&self) -> Result<Vec<Company>> {
            unimplemented!()
        }
        fn load_companies_by_orgnrs(&self, _: &[String]) -> Result<Vec<Company>> {
            unimplemented!()
        }
        fn count_companies(&self) -> Result<i64> {
            unimplemented!()
        }
        async fn upsert_companies(&self, _: Vec<Company>) -> Result<usize> {
            unimplemented!()
        }
    }

    fn item(orgnr: &str, fit_score: Option<i32>) -> CompanyListItem {
        let now = now_naive();
        CompanyListItem {
            company: Company {
                orgnr: orgnr.to_string(),
                company_name: format!("Bolag {}", orgnr),
                homepage: None,
                address: None,
                segment_names: vec![],
                employees: None,
                foundation_year: None,
                created_at: now,
                updated_at: now,
            },
            metrics: fit_score.map(|score| CompanyMetrics {
                orgnr: orgnr.to_string(),
                latest_year: Some(2023),
                latest_revenue: None,
                latest_profit: None,
                latest_ebit: None,
                latest_ebitda: None,
                revenue_growth_yoy: None,
                revenue_cagr_3y: None,
                ebit_margin: None,
                net_margin: None,
                ebitda_margin: None,
                size_category: SizeCategory::Small,
                growth_category: GrowthCategory::HighGrowth,
                profitability_category: ProfitabilityCategory::Profitable,
                fit_score: score,
                calculated_at: now,
            }),
        }
    }

    fn service(items: Vec<CompanyListItem>, fail: bool) -> (AnalysisRunService, Arc<MockRunRepository>) {
        let repo = Arc::new(MockRunRepository::default());
        let service = AnalysisRunService::new(
            repo.clone(),
            Arc::new(MockCompanyRepository { items, fail }),
        );
        (service, repo)
    }

    #[tokio::test]
    async fn test_create_run_stores_ranked_results() {
        let (service, repo) = service(
            vec![item("5560125790", Some(91)), item("5560360793", None), item("5566778899", Some(10))],
            false,
        );
        let run = service
            .create_run(NewAnalysisRun {
                name: "Top targets".to_string(),
                max_results: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(run.status, AnalysisStatus::Completed);
        assert_eq!(run.result_count, 2);
        assert!(run.completed_at.is_some());
        assert_eq!(
            *repo.status_history.read().unwrap(),
            vec![
                AnalysisStatus::Pending,
                AnalysisStatus::Running,
                AnalysisStatus::Completed
            ]
        );

        let results = service.get_run_results(&run.id).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[0].fit_score, 91);
        assert_eq!(results[0].summary, "High Growth · Profitable · Small");
        assert_eq!(results[1].summary, "Unknown · Unknown · Unknown");
        assert_eq!(results[1].fit_score, 0);
    }

    #[tokio::test]
    async fn test_failed_screening_marks_run_failed() {
        let (service, repo) = service(vec![], true);
        let err = service
            .create_run(NewAnalysisRun {
                name: "Broken".to_string(),
                ..Default::default()
            })
            .await;
        assert!(err.is_err());

        let runs = repo.list_runs().unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].status, AnalysisStatus::Failed);
        assert!(runs[0].error_message.as_deref().unwrap().contains("disk I/O"));
    }

    #[tokio::test]
    async fn test_invalid_run_is_not_stored() {
        let (service, repo) = service(vec![], false);
        assert!(service
            .create_run(NewAnalysisRun::default())
            .await
            .is_err());
        assert!(repo.list_runs().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_run_cascades() {
        let (service, repo) = service(vec![item("5560125790", Some(50))], false);
        let run = service
            .create_run(NewAnalysisRun {
                name: "Kortlista".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(service.delete_run(run.id.clone()).await.unwrap(), 1);
        assert!(repo.get_results(&run.id).unwrap().is_empty());
        assert!(service.get_run(&run.id).unwrap_err().is_not_found());
    }
}
