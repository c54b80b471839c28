use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::query::{Collection, SortDirection, StoreQuery};
use super::{RecordStore, StoreError};
use crate::auth::AccessToken;

#[derive(Default)]
struct Tables {
    rows: HashMap<Collection, Vec<Value>>,
    failing: HashSet<Collection>,
}

/// In-process record store. Rows are plain JSON objects; `id` and
/// `created_at` are filled in on insert when absent. Policies are not
/// emulated, so every caller sees every row.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed(&self, collection: Collection, rows: Vec<Value>) {
        let mut tables = self.tables.write().await;
        tables.rows.entry(collection).or_default().extend(rows);
    }

    pub async fn rows(&self, collection: Collection) -> Vec<Value> {
        let tables = self.tables.read().await;
        tables.rows.get(&collection).cloned().unwrap_or_default()
    }

    /// Makes every call touching `collection` fail until [`recover`] is called.
    ///
    /// [`recover`]: MemoryStore::recover
    pub async fn fail(&self, collection: Collection) {
        self.tables.write().await.failing.insert(collection);
    }

    pub async fn recover(&self, collection: Collection) {
        self.tables.write().await.failing.remove(&collection);
    }

    fn check(tables: &Tables, collection: Collection) -> Result<(), StoreError> {
        if tables.failing.contains(&collection) {
            return Err(StoreError::Transport(format!(
                "{} is unavailable",
                collection.as_str()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn scoped(&self, _token: Option<&AccessToken>) -> Arc<dyn RecordStore> {
        Arc::new(self.clone())
    }

    async fn select(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError> {
        query.validate()?;
        let tables = self.tables.read().await;
        Self::check(&tables, query.collection)?;
        for embed in &query.embeds {
            Self::check(&tables, embed.target)?;
        }

        let mut rows: Vec<Value> = tables
            .rows
            .get(&query.collection)
            .map(|rows| rows.iter().filter(|row| matches(query, row)).cloned().collect())
            .unwrap_or_default();

        if !query.order.is_empty() {
            rows.sort_by(|a, b| {
                query
                    .order
                    .iter()
                    .map(|o| {
                        let ord = compare(&a[o.column.as_str()], &b[o.column.as_str()]);
                        match o.sort {
                            SortDirection::Asc => ord,
                            SortDirection::Desc => ord.reverse(),
                        }
                    })
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit as usize);
        }

        Ok(rows
            .into_iter()
            .map(|row| project(query, row, &tables))
            .collect())
    }

    async fn insert(&self, collection: Collection, row: Value) -> Result<Value, StoreError> {
        let mut object = match row {
            Value::Object(object) => object,
            _ => return Err(StoreError::InvalidQuery("insert expects an object".to_string())),
        };
        let mut tables = self.tables.write().await;
        Self::check(&tables, collection)?;

        object
            .entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        object
            .entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

        let row = Value::Object(object);
        tables.rows.entry(collection).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, query: &StoreQuery, patch: Value) -> Result<Vec<Value>, StoreError> {
        query.validate_scoped()?;
        let patch = match patch {
            Value::Object(patch) => patch,
            _ => return Err(StoreError::InvalidQuery("update expects an object".to_string())),
        };
        let mut tables = self.tables.write().await;
        Self::check(&tables, query.collection)?;

        let mut updated = vec![];
        if let Some(rows) = tables.rows.get_mut(&query.collection) {
            for row in rows.iter_mut().filter(|row| matches(query, row)) {
                if let Value::Object(object) = &mut *row {
                    for (key, value) in &patch {
                        object.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn delete(&self, query: &StoreQuery) -> Result<Vec<Value>, StoreError> {
        query.validate_scoped()?;
        let mut tables = self.tables.write().await;
        Self::check(&tables, query.collection)?;

        let mut removed = vec![];
        if let Some(rows) = tables.rows.get_mut(&query.collection) {
            let (gone, kept): (Vec<Value>, Vec<Value>) =
                rows.drain(..).partition(|row| matches(query, row));
            *rows = kept;
            removed = gone;
        }
        Ok(removed)
    }

    async fn health(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

fn matches(query: &StoreQuery, row: &Value) -> bool {
    query
        .filters
        .iter()
        .all(|f| row[f.column.as_str()] == f.value)
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(a), Value::String(b)) => {
            match (DateTime::parse_from_rfc3339(a), DateTime::parse_from_rfc3339(b)) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.cmp(b),
            }
        }
        (Value::Number(a), Value::Number(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn project(query: &StoreQuery, row: Value, tables: &Tables) -> Value {
    let source = match row {
        Value::Object(object) => object,
        other => return other,
    };

    let mut out = if query.columns.is_empty() || query.columns.iter().any(|c| c == "*") {
        source.clone()
    } else {
        query
            .columns
            .iter()
            .filter_map(|c| source.get(c).map(|v| (c.clone(), v.clone())))
            .collect::<Map<String, Value>>()
    };

    for embed in &query.embeds {
        let reference = source.get(&embed.via).cloned().unwrap_or(Value::Null);
        let target = tables.rows.get(&embed.target).and_then(|rows| {
            rows.iter().find(|candidate| candidate["id"] == reference && !reference.is_null())
        });
        let embedded = match target {
            Some(Value::Object(target)) => Value::Object(
                embed
                    .columns
                    .iter()
                    .map(|c| (c.clone(), target.get(c).cloned().unwrap_or(Value::Null)))
                    .collect(),
            ),
            _ => Value::Null,
        };
        out.insert(embed.alias.clone(), embedded);
    }

    Value::Object(out)
}
