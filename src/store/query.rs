use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StoreError;

/// Named collections of the hosted record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Profiles,
    Properties,
    UserRoles,
    Contacts,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::Properties => "properties",
            Collection::UserRoles => "user_roles",
            Collection::Contacts => "contacts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_param(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqFilter {
    pub column: String,
    pub value: Value,
}

/// Inline resolution of a referenced row, e.g. a listing's owner profile
/// embedded under `owner` through the `owner_id` reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Embed {
    pub alias: String,
    pub via: String,
    pub target: Collection,
    pub columns: Vec<String>,
}

/// Select/filter/order description shared by every store implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    pub collection: Collection,
    pub columns: Vec<String>,
    pub filters: Vec<EqFilter>,
    pub order: Vec<OrderInfo>,
    pub embeds: Vec<Embed>,
    pub limit: Option<u32>,
}

impl StoreQuery {
    pub fn table(collection: Collection) -> Self {
        Self {
            collection,
            columns: vec![],
            filters: vec![],
            order: vec![],
            embeds: vec![],
            limit: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.filters.push(EqFilter {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn order(mut self, column: &str, sort: SortDirection) -> Self {
        self.order.push(OrderInfo {
            column: column.to_string(),
            sort,
        });
        self
    }

    pub fn newest_first(self) -> Self {
        self.order("created_at", SortDirection::Desc)
    }

    pub fn embed(mut self, alias: &str, via: &str, target: Collection, columns: &[&str]) -> Self {
        self.embeds.push(Embed {
            alias: alias.to_string(),
            via: via.to_string(),
            target,
            columns: columns.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        for column in &self.columns {
            if column != "*" {
                validate_column(column)?;
            }
        }
        for filter in &self.filters {
            validate_column(&filter.column)?;
            if filter.value.is_array() || filter.value.is_object() {
                return Err(StoreError::InvalidQuery(format!(
                    "equality filter on '{}' must be a scalar",
                    filter.column
                )));
            }
        }
        for order in &self.order {
            validate_column(&order.column)?;
        }
        for embed in &self.embeds {
            validate_column(&embed.alias)?;
            validate_column(&embed.via)?;
            for column in &embed.columns {
                validate_column(column)?;
            }
        }
        Ok(())
    }

    /// Mutations must be narrowed by at least one filter.
    pub fn validate_scoped(&self) -> Result<(), StoreError> {
        self.validate()?;
        if self.filters.is_empty() {
            return Err(StoreError::InvalidQuery(format!(
                "refusing unfiltered mutation on '{}'",
                self.collection.as_str()
            )));
        }
        Ok(())
    }

    /// Renders the query-string pairs understood by the hosted store.
    pub fn to_params(&self) -> Result<Vec<(String, String)>, StoreError> {
        self.validate()?;
        let mut params = vec![("select".to_string(), self.select_param())];

        params.extend(self.filter_params());

        if !self.order.is_empty() {
            let order = self
                .order
                .iter()
                .map(|o| format!("{}.{}", o.column, o.sort.to_param()))
                .collect::<Vec<_>>()
                .join(",");
            params.push(("order".to_string(), order));
        }

        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        Ok(params)
    }

    pub fn filter_params(&self) -> Vec<(String, String)> {
        self.filters
            .iter()
            .map(|f| {
                let rendered = match &f.value {
                    Value::Null => "is.null".to_string(),
                    Value::String(s) => format!("eq.{}", s),
                    other => format!("eq.{}", other),
                };
                (f.column.clone(), rendered)
            })
            .collect()
    }

    fn select_param(&self) -> String {
        let mut parts: Vec<String> = if self.columns.is_empty() {
            vec!["*".to_string()]
        } else {
            self.columns.clone()
        };
        for embed in &self.embeds {
            parts.push(format!("{}:{}({})", embed.alias, embed.via, embed.columns.join(",")));
        }
        parts.join(",")
    }
}

fn validate_column(name: &str) -> Result<(), StoreError> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    if !valid_start || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(StoreError::InvalidQuery(format!("invalid column name: {}", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_owner_listing_query() {
        let query = StoreQuery::table(Collection::Properties)
            .eq("owner_id", "abc")
            .newest_first();
        let params = query.to_params().unwrap();
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("owner_id".to_string(), "eq.abc".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
            ]
        );
    }

    #[test]
    fn renders_embedded_owner() {
        let query = StoreQuery::table(Collection::Properties).embed(
            "owner",
            "owner_id",
            Collection::Profiles,
            &["name", "email", "phone"],
        );
        let params = query.to_params().unwrap();
        assert_eq!(params[0].1, "*,owner:owner_id(name,email,phone)");
    }

    #[test]
    fn renders_boolean_and_null_filters() {
        let query = StoreQuery::table(Collection::Properties)
            .eq("is_available", true)
            .eq("image_url", Value::Null);
        let params = query.filter_params();
        assert_eq!(params[0], ("is_available".to_string(), "eq.true".to_string()));
        assert_eq!(params[1], ("image_url".to_string(), "is.null".to_string()));
    }

    #[test]
    fn rejects_injected_column_names() {
        let query = StoreQuery::table(Collection::Profiles).eq("id;drop", "x");
        assert!(matches!(query.to_params(), Err(StoreError::InvalidQuery(_))));
    }

    #[test]
    fn unfiltered_mutation_is_refused() {
        let query = StoreQuery::table(Collection::Properties);
        assert!(query.validate_scoped().is_err());
        assert!(query.eq("id", "1").validate_scoped().is_ok());
    }
}
