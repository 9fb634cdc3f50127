use chrono::NaiveDateTime;
use diesel::prelude::*;
use sme_screener_core::companies::CompanyFilter;
use sme_screener_core::saved_lists::SavedList;

use crate::utils::decode_json_column;

#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::saved_lists)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavedListDB {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub filter_json: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::saved_list_items)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SavedListItemDB {
    pub list_id: String,
    pub orgnr: String,
    pub added_at: NaiveDateTime,
}

impl SavedListDB {
    /// Builds the domain list from the row and its item orgnrs.
    pub fn into_domain(self, orgnrs: Vec<String>) -> SavedList {
        let filter = self
            .filter_json
            .as_deref()
            .map(|raw| decode_json_column::<CompanyFilter>("saved_lists.filter_json", raw));
        SavedList {
            id: self.id,
            name: self.name,
            description: self.description,
            filter,
            orgnrs,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<&SavedList> for SavedListDB {
    fn from(domain: &SavedList) -> Self {
        Self {
            id: domain.id.clone(),
            name: domain.name.clone(),
            description: domain.description.clone(),
            filter_json: domain
                .filter
                .as_ref()
                .and_then(|f| serde_json::to_string(f).ok()),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }
}
