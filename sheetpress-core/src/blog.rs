//! The blog as a set of pollable pages over a spreadsheet.
//!
//! - [`ContentPage`]: posts stacked in a single column, one cell per field,
//!   posts separated by a delimiter cell. Posts cut short (no value for the
//!   last declared field) are dropped.
//! - [`UsersPage`]: one user per column over a fixed block of rows, keyed by
//!   the username; the header column is skipped.
//!
//! Both implement [`PageFetcher`], and [`Blog::pages`] hands them to a
//! [`crate::poller::Poller`] under their configured ids.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::{BlogConfig, ContentPageConfig, UsersPageConfig};
use crate::poller::{FetchError, PageFetcher};
use crate::record::{map_records, Record};
use crate::sheet::{transpose, SheetAdapter, SheetDb, SheetError};

pub struct ContentPage<A> {
    db: Arc<SheetDb<A>>,
    config: ContentPageConfig,
}

impl<A: SheetAdapter> ContentPage<A> {
    pub fn new(db: Arc<SheetDb<A>>, config: ContentPageConfig) -> Self {
        Self { db, config }
    }

    pub async fn read(&self) -> Result<Vec<Record>, SheetError> {
        let cfg = &self.config;
        let grid = self.db.read_columns(&cfg.page, cfg.column, cfg.column).await?;
        let column = transpose(&grid).into_iter().next().unwrap_or_default();

        let format = cfg.format();
        let last_field = format.last_field();
        let records: Vec<Record> = map_records(&column, &format)
            .into_iter()
            .map(Record::nulls_as_absent)
            .filter(|r| last_field.map_or(true, |f| r.is_present(f)))
            .collect();

        debug!(page = %cfg.page, cells = column.len(), posts = records.len(), "Read blog content");
        Ok(records)
    }
}

#[async_trait]
impl<A: SheetAdapter> PageFetcher for ContentPage<A> {
    async fn fetch(&self) -> Result<Value, FetchError> {
        let records = self.read().await?;
        Ok(serde_json::to_value(records)?)
    }
}

pub struct UsersPage<A> {
    db: Arc<SheetDb<A>>,
    config: UsersPageConfig,
}

impl<A: SheetAdapter> UsersPage<A> {
    pub fn new(db: Arc<SheetDb<A>>, config: UsersPageConfig) -> Self {
        Self { db, config }
    }

    /// Users keyed by their `key` field; each value holds the remaining fields.
    pub async fn read(&self) -> Result<Map<String, Value>, SheetError> {
        let cfg = &self.config;
        let grid = self
            .db
            .read_rows(&cfg.page, cfg.first_row, cfg.last_row)
            .await?;
        let format = cfg.format();

        let mut users = Map::new();
        for mut column in transpose(&grid) {
            while matches!(column.last(), Some(Value::Null)) {
                column.pop();
            }
            let Some(record) = map_records(&column, &format).into_iter().next() else {
                continue;
            };
            let record = record.nulls_as_absent();

            let Some(name) = record.get(&cfg.key).map(cell_text) else {
                debug!(page = %cfg.page, "Skipping column without a user key");
                continue;
            };
            if cfg.header.as_deref() == Some(name.as_str()) {
                continue;
            }

            let mut profile = record.into_json();
            profile.retain(|k, _| k != &cfg.key);
            users.insert(name, Value::Object(profile));
        }

        debug!(page = %cfg.page, users = users.len(), "Read user content");
        Ok(users)
    }
}

#[async_trait]
impl<A: SheetAdapter> PageFetcher for UsersPage<A> {
    async fn fetch(&self) -> Result<Value, FetchError> {
        Ok(Value::Object(self.read().await?))
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The blog's pages over one spreadsheet.
pub struct Blog<A> {
    content: Arc<ContentPage<A>>,
    users: Arc<UsersPage<A>>,
    config: BlogConfig,
}

impl<A: SheetAdapter + 'static> Blog<A> {
    pub fn new(db: Arc<SheetDb<A>>, config: BlogConfig) -> Self {
        Self {
            content: Arc::new(ContentPage::new(Arc::clone(&db), config.content.clone())),
            users: Arc::new(UsersPage::new(db, config.users.clone())),
            config,
        }
    }

    pub async fn content(&self) -> Result<Vec<Record>, SheetError> {
        self.content.read().await
    }

    pub async fn users(&self) -> Result<Map<String, Value>, SheetError> {
        self.users.read().await
    }

    /// Pollable pages, content first.
    pub fn pages(&self) -> Vec<(String, Arc<dyn PageFetcher>)> {
        vec![
            (
                self.config.content.id.clone(),
                Arc::clone(&self.content) as Arc<dyn PageFetcher>,
            ),
            (
                self.config.users.id.clone(),
                Arc::clone(&self.users) as Arc<dyn PageFetcher>,
            ),
        ]
    }
}
