//! Headline counters ("120 projects shipped").

use folio_core::types::{DbId, Timestamp};
use folio_core::validation::Payload;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `statistics` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Statistic {
    pub id: DbId,
    pub label: String,
    pub value: i64,
    pub suffix: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateStatistic {
    #[validate(required, length(min = 1, max = 100))]
    pub label: Option<String>,
    #[validate(required, range(min = 0))]
    pub value: Option<i64>,
    #[validate(length(max = 10))]
    pub suffix: Option<String>,
    #[validate(length(max = 100))]
    pub icon: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
}

impl Payload for CreateStatistic {}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatistic {
    #[validate(length(min = 1, max = 100))]
    pub label: Option<String>,
    #[validate(range(min = 0))]
    pub value: Option<i64>,
    #[validate(length(max = 10))]
    pub suffix: Option<String>,
    #[validate(length(max = 100))]
    pub icon: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub sort_order: Option<i32>,
}

impl Payload for UpdateStatistic {
    const PARTIAL: bool = true;
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatisticFilter {
    pub q: Option<String>,
}

folio_core::sort_fields! {
    pub enum StatisticSort {
        Label => ("label", "s.label"),
        Value => ("value", "s.value"),
        SortOrder => ("sort_order", "s.sort_order"),
    }
    default = (SortOrder, Asc);
}
