use futures::{StreamExt, stream};
use sea_orm::Set;
use serde::Deserialize;
use tracing::debug;

use crate::{entities::title, error::AppResult, store::TitleStore};

const DATASET: &str = include_str!("../data/netflix_titles.json");

const INSERT_CONCURRENCY: usize = 8;

/// Aggregate result of one reset-and-reload pass. Individual record
/// failures are counted here instead of being raised.
#[derive(Debug)]
pub struct SeedOutcome {
    pub deleted: u64,
    pub inserted: usize,
    pub failed: usize,
}

/// Wipes the title collection and reloads it from the embedded dataset.
/// Best effort: a record that fails coercion or insert is dropped and
/// counted, it never aborts the batch. Not safe to run concurrently with
/// itself or with readers that need a consistent snapshot.
pub async fn run(store: &TitleStore) -> AppResult<SeedOutcome> {
    let rows: Vec<serde_json::Value> = serde_json::from_str(DATASET)?;
    let total = rows.len();

    let deleted = store.clear().await?;
    debug!(deleted = deleted, records = total, "collection cleared, reloading");

    let results: Vec<bool> = stream::iter(rows)
        .map(|row| async move {
            match coerce_row(row) {
                Ok(model) => match store.insert(model).await {
                    Ok(()) => true,
                    Err(err) => {
                        debug!(error = %err, "insert failed");
                        false
                    }
                },
                Err(err) => {
                    debug!(error = %err, "record failed coercion");
                    false
                }
            }
        })
        .buffer_unordered(INSERT_CONCURRENCY)
        .collect()
        .await;

    let inserted = results.iter().filter(|ok| **ok).count();
    Ok(SeedOutcome { deleted, inserted, failed: total - inserted })
}

#[derive(Debug, Deserialize)]
struct RawTitle {
    show_id: i64,
    title: String,
    director: Option<String>,
    cast: Option<String>,
    country: Option<String>,
    date_added: Option<String>,
    release_year: i32,
    rating: String,
    duration: String,
    listed_in: String,
    description: String,
    #[serde(rename = "type")]
    media_type: String,
}

fn coerce_row(row: serde_json::Value) -> anyhow::Result<title::ActiveModel> {
    let raw: RawTitle = serde_json::from_value(row)?;
    let date_added = raw.date_added.as_deref().map(coerce_date).transpose()?;

    Ok(title::ActiveModel {
        id: Default::default(),
        show_id: Set(raw.show_id),
        title: Set(raw.title),
        director: Set(raw.director),
        cast: Set(raw.cast),
        country: Set(raw.country),
        date_added: Set(date_added),
        release_year: Set(raw.release_year),
        rating: Set(raw.rating),
        duration: Set(raw.duration),
        listed_in: Set(raw.listed_in),
        description: Set(raw.description),
        media_type: Set(raw.media_type),
    })
}

/// The dataset carries human-format dates ("September 9, 2019"), some
/// with stray whitespace. Stored as ISO civil dates.
fn coerce_date(raw: &str) -> anyhow::Result<String> {
    let date = jiff::civil::Date::strptime("%B %-d, %Y", raw.trim())?;
    Ok(date.to_string())
}
