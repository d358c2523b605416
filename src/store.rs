use std::collections::BTreeMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::{entities::title, error::AppResult};

pub const MOVIE_TYPE: &str = "Movie";

/// Handle on the title collection. Constructed once at startup and handed
/// to each handler through the router state, so tests can substitute an
/// in-memory store.
#[derive(Clone)]
pub struct TitleStore {
    db: DatabaseConnection,
}

impl TitleStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All records with `type = "Movie"`, in store order.
    pub async fn movies(&self) -> AppResult<Vec<title::Model>> {
        let rows = title::Entity::find()
            .filter(title::Column::MediaType.eq(MOVIE_TYPE))
            .all(&self.db)
            .await?;
        Ok(rows)
    }

    /// First record matching `show_id` with `type = "Movie"`. The schema
    /// does not force show_id unique, so ties break arbitrarily.
    pub async fn movie_by_show_id(&self, show_id: i64) -> AppResult<Option<title::Model>> {
        let row = title::Entity::find()
            .filter(title::Column::ShowId.eq(show_id))
            .filter(title::Column::MediaType.eq(MOVIE_TYPE))
            .one(&self.db)
            .await?;
        Ok(row)
    }

    /// Every record in the collection, partitioned by its literal country
    /// value. Multi-country strings stay one key; rows with no country
    /// land under "null", the key the upstream dataset's consumers expect.
    pub async fn titles_by_country(&self) -> AppResult<BTreeMap<String, Vec<title::Model>>> {
        let rows = title::Entity::find().all(&self.db).await?;

        let mut grouped: BTreeMap<String, Vec<title::Model>> = BTreeMap::new();
        for row in rows {
            let key = row.country.clone().unwrap_or_else(|| "null".to_string());
            grouped.entry(key).or_default().push(row);
        }
        Ok(grouped)
    }

    pub async fn insert(&self, model: title::ActiveModel) -> AppResult<()> {
        title::Entity::insert(model).exec(&self.db).await?;
        Ok(())
    }

    /// Unconditionally drops every record. Seeder-only.
    pub async fn clear(&self) -> AppResult<u64> {
        let res = title::Entity::delete_many().exec(&self.db).await?;
        Ok(res.rows_affected)
    }

    #[cfg(test)]
    pub async fn count(&self) -> AppResult<u64> {
        use sea_orm::PaginatorTrait;
        Ok(title::Entity::find().count(&self.db).await?)
    }
}

#[cfg(test)]
pub(crate) async fn memory_store() -> TitleStore {
    let db = crate::db::connect_and_migrate("sqlite::memory:")
        .await
        .expect("in-memory store");
    TitleStore::new(db)
}

#[cfg(test)]
pub(crate) fn fixture(
    show_id: i64,
    name: &str,
    media_type: &str,
    country: Option<&str>,
) -> title::ActiveModel {
    use sea_orm::Set;

    title::ActiveModel {
        id: Default::default(),
        show_id: Set(show_id),
        title: Set(name.to_string()),
        director: Set(None),
        cast: Set(None),
        country: Set(country.map(|c| c.to_string())),
        date_added: Set(None),
        release_year: Set(2020),
        rating: Set("PG-13".to_string()),
        duration: Set("90 min".to_string()),
        listed_in: Set("Dramas".to_string()),
        description: Set("A test title.".to_string()),
        media_type: Set(media_type.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn movies_filters_by_type() {
        let store = memory_store().await;
        store.insert(fixture(1, "A", "Movie", Some("US"))).await.unwrap();
        store.insert(fixture(2, "B", "TV Show", Some("US"))).await.unwrap();

        let movies = store.movies().await.unwrap();
        assert_eq!(movies.len(), 1);
        assert_eq!(movies[0].show_id, 1);
        assert_eq!(movies[0].media_type, "Movie");
    }

    #[tokio::test]
    async fn movies_empty_collection_is_ok() {
        let store = memory_store().await;
        assert!(store.movies().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn movie_by_show_id_skips_non_movies() {
        let store = memory_store().await;
        store.insert(fixture(7, "Show", "TV Show", None)).await.unwrap();

        assert!(store.movie_by_show_id(7).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn movie_by_show_id_finds_first_match() {
        let store = memory_store().await;
        store.insert(fixture(7, "First", "Movie", None)).await.unwrap();
        store.insert(fixture(7, "Second", "Movie", None)).await.unwrap();

        let found = store.movie_by_show_id(7).await.unwrap().unwrap();
        assert_eq!(found.show_id, 7);
    }

    #[tokio::test]
    async fn titles_by_country_partitions_every_record() {
        let store = memory_store().await;
        store.insert(fixture(1, "A", "Movie", Some("US"))).await.unwrap();
        store.insert(fixture(2, "B", "TV Show", Some("US"))).await.unwrap();
        store.insert(fixture(3, "C", "Movie", None)).await.unwrap();
        store
            .insert(fixture(4, "D", "Movie", Some("United States, India")))
            .await
            .unwrap();

        let grouped = store.titles_by_country().await.unwrap();

        assert_eq!(grouped.len(), 3);
        assert_eq!(grouped["US"].len(), 2);
        assert_eq!(grouped["null"].len(), 1);
        assert_eq!(grouped["null"][0].show_id, 3);
        // comma-separated countries are a single literal key
        assert_eq!(grouped["United States, India"].len(), 1);

        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total as u64, store.count().await.unwrap());
        for (key, members) in &grouped {
            for m in members {
                assert_eq!(m.country.as_deref().unwrap_or("null"), key);
            }
        }
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = memory_store().await;
        store.insert(fixture(1, "A", "Movie", None)).await.unwrap();
        store.insert(fixture(2, "B", "Movie", None)).await.unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
