//! Listing parameters to query plan.
//!
//! Input is taken exactly as it arrived on the query string. Anything that
//! does not parse falls back to the default instead of failing the request:
//! page 0, size 20, `amount` descending.

use std::sync::Arc;
use tracing::instrument;

use crate::models::{Card, CardField, Principal};
use crate::services::{CardStore, ServiceError};

pub const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Case-insensitive `asc` / `desc`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Requested ordering. `field` is kept verbatim; stores order by it only when
/// it names a [`CardField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn by_amount_desc() -> Self {
        Self {
            field: CardField::Amount.column().to_string(),
            direction: SortDirection::Desc,
        }
    }

    /// `field` or `field,direction`. Direction defaults to ascending.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(',');
        let field = parts.next()?.trim();
        let direction = parts.next().map(str::trim);

        if field.is_empty() || parts.next().is_some() {
            return None;
        }

        let direction = match direction {
            None | Some("") => SortDirection::Asc,
            Some(dir) => SortDirection::parse(dir)?,
        };

        Some(Self {
            field: field.to_string(),
            direction,
        })
    }

    pub fn known_field(&self) -> Option<CardField> {
        CardField::parse(&self.field)
    }
}

/// Normalised listing query, always scoped to one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    pub owner: String,
    pub offset: u64,
    pub limit: u64,
    pub sort: SortOrder,
}

#[derive(Clone)]
pub struct PaginationEngine {
    store: Arc<dyn CardStore>,
}

impl PaginationEngine {
    pub fn new(store: Arc<dyn CardStore>) -> Self {
        Self { store }
    }

    /// Negative page or size values are read as 0.
    pub fn plan(
        &self,
        principal: &Principal,
        page: Option<&str>,
        size: Option<&str>,
        sort: Option<&str>,
    ) -> QueryPlan {
        let page = parse_count(page).unwrap_or(0);
        let size = parse_count(size).unwrap_or(DEFAULT_PAGE_SIZE);
        let sort = sort
            .and_then(SortOrder::parse)
            .unwrap_or_else(SortOrder::by_amount_desc);

        QueryPlan {
            owner: principal.name.clone(),
            offset: page.saturating_mul(size),
            limit: size,
            sort,
        }
    }

    #[instrument(skip(self), fields(owner = %plan.owner))]
    pub async fn fetch(&self, plan: &QueryPlan) -> Result<Vec<Card>, ServiceError> {
        if plan.limit == 0 {
            return Ok(Vec::new());
        }

        self.store.find_page_by_owner(plan).await
    }
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    let value = raw?.trim().parse::<i64>().ok()?;
    Some(u64::try_from(value).unwrap_or(0))
}
