use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::pointsmodel::{
    LeaderboardEntry, PointCategory, PointCategoryItem, RestrictionView, SystemStats,
    TransactionLogEntry,
};
use crate::service::levels::LevelInfo;

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateCategoryDto {
    #[validate(length(min = 1, message = "Category name is required"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Default points must not be negative"))]
    pub default_points: i32,

    pub is_positive: bool,

    #[serde(default)]
    pub is_mandatory: bool,

    #[serde(default)]
    pub is_restricted: bool,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct CreateItemDto {
    pub category_id: i32,

    #[validate(length(min = 1, message = "Item name is required"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(range(min = 0, message = "Points must not be negative"))]
    pub points: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct CategoryListQuery {
    /// "positive" or "negative"; anything else (or absent) lists all.
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ItemListQuery {
    #[serde(default)]
    pub active_only: bool,
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponseDto {
    pub status: String,
    pub categories: Vec<PointCategory>,
}

#[derive(Debug, Serialize)]
pub struct ItemListResponseDto {
    pub status: String,
    pub items: Vec<PointCategoryItem>,
}

/// Batch recorder input: comma-separated user codes, a point value and
/// sign, plus optional category/item/description. Mirrors the form the
/// admin points screen submits.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct BatchPointsDto {
    #[validate(length(min = 1, message = "At least one user code is required"))]
    pub user_codes: String,

    #[serde(default)]
    pub points: i32,

    pub is_positive: bool,

    pub category_id: Option<i32>,
    pub item_id: Option<i32>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchPointsResponseDto {
    pub status: String,
    pub message: String,
    pub processed_count: usize,
    pub missing_user_codes: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionPeriod {
    Day,
    Week,
    Month,
    Year,
    AllTime,
}

impl TransactionPeriod {
    /// Lower bound for the log query; `None` means no time filter.
    pub fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TransactionPeriod::Day => Some(now - Duration::days(1)),
            TransactionPeriod::Week => Some(now - Duration::weeks(1)),
            TransactionPeriod::Month => Some(now - Duration::days(30)),
            TransactionPeriod::Year => Some(now - Duration::days(365)),
            TransactionPeriod::AllTime => None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct TransactionLogQuery {
    pub period: Option<TransactionPeriod>,
    /// "all", "positive" or "negative".
    pub r#type: Option<String>,
    #[validate(range(min = 1, max = 100000))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u32>,
}

impl TransactionLogQuery {
    pub fn sign_filter(&self) -> Option<bool> {
        match self.r#type.as_deref() {
            Some("positive") => Some(true),
            Some("negative") => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionLogResponseDto {
    pub status: String,
    pub transactions: Vec<TransactionLogEntry>,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Serialize)]
pub struct BalanceResponseDto {
    pub status: String,
    pub user_id: Uuid,
    pub balance: i64,
    pub level: LevelInfo,
}

#[derive(Debug, Serialize)]
pub struct StatsResponseDto {
    pub status: String,
    pub stats: SystemStats,
}

#[derive(Debug, Serialize)]
pub struct LeaderboardResponseDto {
    pub status: String,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Serialize)]
pub struct RestrictionListResponseDto {
    pub status: String,
    pub restrictions: Vec<RestrictionView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_cutoffs() {
        let now = Utc::now();
        assert_eq!(
            TransactionPeriod::Day.cutoff(now),
            Some(now - Duration::days(1))
        );
        assert_eq!(TransactionPeriod::AllTime.cutoff(now), None);
    }

    #[test]
    fn huge_page_number_is_rejected() {
        let q = TransactionLogQuery {
            period: None,
            r#type: None,
            page: Some(u32::MAX),
            limit: Some(50),
        };
        assert!(q.validate().is_err());

        let q = TransactionLogQuery {
            period: None,
            r#type: None,
            page: Some(100000),
            limit: Some(50),
        };
        assert!(q.validate().is_ok());
    }

    #[test]
    fn sign_filter_parses_type() {
        let q = TransactionLogQuery {
            period: None,
            r#type: Some("negative".to_string()),
            page: None,
            limit: None,
        };
        assert_eq!(q.sign_filter(), Some(false));

        let q = TransactionLogQuery {
            period: None,
            r#type: Some("all".to_string()),
            page: None,
            limit: None,
        };
        assert_eq!(q.sign_filter(), None);
    }
}
