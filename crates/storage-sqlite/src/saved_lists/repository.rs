use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::collections::HashMap;
use std::sync::Arc;

use sme_screener_core::saved_lists::{SavedList, SavedListRepositoryTrait};
use sme_screener_core::utils::time_utils::now_naive;
use sme_screener_core::{Error, Result};

use super::model::{SavedListDB, SavedListItemDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::{not_found_as, StorageError};
use crate::schema::{saved_list_items, saved_lists};

pub struct SavedListRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl SavedListRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn load_list(conn: &mut SqliteConnection, list_id: &str) -> Result<SavedList> {
    let row = saved_lists::table
        .find(list_id)
        .select(SavedListDB::as_select())
        .first::<SavedListDB>(conn)
        .map_err(not_found_as("Saved list", list_id))?;
    let orgnrs = saved_list_items::table
        .filter(saved_list_items::list_id.eq(list_id))
        .order((saved_list_items::added_at.asc(), saved_list_items::orgnr.asc()))
        .select(saved_list_items::orgnr)
        .load::<String>(conn)
        .map_err(StorageError::from)?;
    Ok(row.into_domain(orgnrs))
}

fn insert_items(
    conn: &mut SqliteConnection,
    list_id: &str,
    orgnrs: Vec<String>,
) -> Result<usize> {
    let added_at = now_naive();
    let items: Vec<SavedListItemDB> = orgnrs
        .into_iter()
        .map(|orgnr| SavedListItemDB {
            list_id: list_id.to_string(),
            orgnr,
            added_at,
        })
        .collect();
    let mut inserted = 0;
    for item in &items {
        inserted += diesel::insert_or_ignore_into(saved_list_items::table)
            .values(item)
            .execute(conn)
            .map_err(StorageError::from)?;
    }
    Ok(inserted)
}

fn touch_list(conn: &mut SqliteConnection, list_id: &str) -> Result<()> {
    diesel::update(saved_lists::table.find(list_id))
        .set(saved_lists::updated_at.eq(now_naive()))
        .execute(conn)
        .map_err(StorageError::from)?;
    Ok(())
}

#[async_trait]
impl SavedListRepositoryTrait for SavedListRepository {
    fn list_saved_lists(&self) -> Result<Vec<SavedList>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = saved_lists::table
            .order((saved_lists::updated_at.desc(), saved_lists::name.asc()))
            .select(SavedListDB::as_select())
            .load::<SavedListDB>(&mut conn)
            .map_err(StorageError::from)?;

        let items = saved_list_items::table
            .order((saved_list_items::added_at.asc(), saved_list_items::orgnr.asc()))
            .select(SavedListItemDB::as_select())
            .load::<SavedListItemDB>(&mut conn)
            .map_err(StorageError::from)?;
        let mut by_list: HashMap<String, Vec<String>> = HashMap::new();
        for item in items {
            by_list.entry(item.list_id).or_default().push(item.orgnr);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let orgnrs = by_list.remove(&row.id).unwrap_or_default();
                row.into_domain(orgnrs)
            })
            .collect())
    }

    fn get_saved_list(&self, list_id: &str) -> Result<SavedList> {
        let mut conn = get_connection(&self.pool)?;
        load_list(&mut conn, list_id)
    }

    async fn insert_saved_list(&self, list: SavedList) -> Result<SavedList> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavedList> {
                let row = SavedListDB::from(&list);
                diesel::insert_into(saved_lists::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                insert_items(conn, &list.id, list.orgnrs.clone())?;
                load_list(conn, &list.id)
            })
            .await
    }

    async fn update_saved_list(&self, list: SavedList) -> Result<SavedList> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<SavedList> {
                let row = SavedListDB::from(&list);
                let affected = diesel::update(saved_lists::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                if affected == 0 {
                    return Err(Error::NotFound(format!("Saved list {}", row.id)));
                }
                load_list(conn, &list.id)
            })
            .await
    }

    async fn delete_saved_list(&self, list_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(saved_lists::table.find(&list_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }

    async fn add_list_items(&self, list_id: String, orgnrs: Vec<String>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let inserted = insert_items(conn, &list_id, orgnrs)?;
                if inserted > 0 {
                    touch_list(conn, &list_id)?;
                }
                Ok(inserted)
            })
            .await
    }

    async fn remove_list_item(&self, list_id: String, orgnr: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed = diesel::delete(
                    saved_list_items::table
                        .filter(saved_list_items::list_id.eq(&list_id))
                        .filter(saved_list_items::orgnr.eq(&orgnr)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                if removed > 0 {
                    touch_list(conn, &list_id)?;
                }
                Ok(removed)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::companies::CompanyRepository;
    use crate::test_support::{company, setup_db, ts};
    use sme_screener_core::companies::{CompanyFilter, CompanyRepositoryTrait};

    async fn repos() -> (SavedListRepository, tempfile::TempDir) {
        let (pool, writer, dir) = setup_db().await;
        CompanyRepository::new(pool.clone(), writer.clone())
            .upsert_companies(vec![
                company("5560000001", "Alfa AB"),
                company("5560000002", "Beta AB"),
            ])
            .await
            .unwrap();
        (SavedListRepository::new(pool, writer), dir)
    }

    fn list(id: &str) -> SavedList {
        SavedList {
            id: id.to_string(),
            name: "Norrland".to_string(),
            description: None,
            filter: Some(CompanyFilter {
                segment: Some("Bygg".to_string()),
                ..Default::default()
            }),
            orgnrs: vec!["5560000001".to_string()],
            created_at: ts("2024-01-01 00:00:00"),
            updated_at: ts("2024-01-01 00:00:00"),
        }
    }

    #[tokio::test]
    async fn test_items_are_added_once_and_removed() {
        let (repo, _dir) = repos().await;
        let created = repo.insert_saved_list(list("l1")).await.unwrap();
        assert_eq!(created.orgnrs, vec!["5560000001"]);
        assert_eq!(
            created.filter.and_then(|f| f.segment),
            Some("Bygg".to_string())
        );

        let added = repo
            .add_list_items(
                "l1".to_string(),
                vec!["5560000001".to_string(), "5560000002".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(added, 1);
        let stored = repo.get_saved_list("l1").unwrap();
        assert_eq!(stored.orgnrs.len(), 2);
        assert!(stored.updated_at > ts("2024-01-01 00:00:00"));

        assert_eq!(
            repo.remove_list_item("l1".to_string(), "5560000001".to_string())
                .await
                .unwrap(),
            1
        );
        assert_eq!(repo.get_saved_list("l1").unwrap().orgnrs, vec!["5560000002"]);
    }

    #[tokio::test]
    async fn test_unknown_company_violates_foreign_key() {
        let (repo, _dir) = repos().await;
        repo.insert_saved_list(list("l1")).await.unwrap();
        let err = repo
            .add_list_items("l1".to_string(), vec!["5569999999".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Database(_)));
        assert!(repo.get_saved_list("l1").unwrap().orgnrs.len() == 1);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, _dir) = repos().await;
        repo.insert_saved_list(list("l1")).await.unwrap();
        repo.insert_saved_list(list("l2")).await.unwrap();

        let mut renamed = repo.get_saved_list("l1").unwrap();
        renamed.name = "Norrland 2".to_string();
        renamed.filter = None;
        let updated = repo.update_saved_list(renamed).await.unwrap();
        assert_eq!(updated.name, "Norrland 2");
        assert!(updated.filter.is_none());
        assert_eq!(updated.orgnrs, vec!["5560000001"]);

        assert_eq!(repo.list_saved_lists().unwrap().len(), 2);
        assert_eq!(repo.delete_saved_list("l1".to_string()).await.unwrap(), 1);
        assert!(repo.get_saved_list("l1").unwrap_err().is_not_found());
        assert_eq!(repo.list_saved_lists().unwrap().len(), 1);
    }
}
