//! Statistics report aggregation.
//!
//! Pure computation over snapshots: the in-range article set, the full
//! category set, and the account set for author names. Date-range
//! validation and fetching happen in the article service.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::hierarchy::CategoryHierarchy;
use crate::models::{ArticleStatus, Category, NewsArticle, SystemAccount};

#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub total_articles_created: usize,
    pub total_categories: usize,
    pub inactive_categories_count: usize,
    pub inactive_articles_count: usize,
    pub daily_breakdown: Vec<DailyStatistic>,
    pub category_breakdown: Vec<StatisticBreakdown>,
    pub author_breakdown: Vec<StatisticBreakdown>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyStatistic {
    pub date: NaiveDate,
    pub total_articles: usize,
    pub active_articles: usize,
    pub inactive_articles: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatisticBreakdown {
    pub item_id: i32,
    pub item_name: String,
    pub total_articles: usize,
    pub percentage: f64,
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 100.0).round() / 100.0
}

pub fn build_report(
    start: NaiveDateTime,
    end: NaiveDateTime,
    in_range: &[NewsArticle],
    categories: &[Category],
    accounts: &[SystemAccount],
    hierarchy: &CategoryHierarchy,
) -> StatisticsReport {
    let total_articles = in_range.len();

    let inactive_articles_count = in_range
        .iter()
        .filter(|a| a.status == ArticleStatus::Inactive)
        .count();

    // Inactive categories are counted system-wide against the ancestor-aware
    // active state, not restricted to the reporting window.
    let inactive_categories_count = categories
        .iter()
        .filter(|c| !hierarchy.is_effectively_active(c.id))
        .count();

    // Daily breakdown, newest day first.
    let mut by_day: HashMap<NaiveDate, (usize, usize)> = HashMap::new();
    for article in in_range {
        let slot = by_day.entry(article.created_at.date()).or_default();
        slot.0 += 1;
        if article.status == ArticleStatus::Inactive {
            slot.1 += 1;
        }
    }
    let mut daily_breakdown: Vec<DailyStatistic> = by_day
        .into_iter()
        .map(|(date, (total, inactive))| DailyStatistic {
            date,
            total_articles: total,
            active_articles: total - inactive,
            inactive_articles: inactive,
        })
        .collect();
    daily_breakdown.sort_by(|a, b| b.date.cmp(&a.date));

    // Per-category breakdown includes every category in the system, even
    // those with no articles in range.
    let mut count_by_category: HashMap<i32, usize> = HashMap::new();
    for article in in_range {
        *count_by_category.entry(article.category_id).or_default() += 1;
    }
    let mut category_breakdown: Vec<StatisticBreakdown> = categories
        .iter()
        .map(|c| {
            let count = count_by_category.get(&c.id).copied().unwrap_or(0);
            let item_name = if hierarchy.is_effectively_active(c.id) {
                c.name.clone()
            } else {
                format!("{} (inactive)", c.name)
            };
            StatisticBreakdown {
                item_id: c.id,
                item_name,
                total_articles: count,
                percentage: percentage(count, total_articles),
            }
        })
        .collect();
    category_breakdown.sort_by(|a, b| {
        b.total_articles
            .cmp(&a.total_articles)
            .then_with(|| a.item_name.cmp(&b.item_name))
    });

    // Per-author breakdown covers only authors who published in range.
    let name_by_account: HashMap<i32, &str> =
        accounts.iter().map(|a| (a.id, a.name.as_str())).collect();
    let mut count_by_author: HashMap<i32, usize> = HashMap::new();
    for article in in_range {
        *count_by_author.entry(article.created_by).or_default() += 1;
    }
    let mut author_breakdown: Vec<StatisticBreakdown> = count_by_author
        .into_iter()
        .map(|(author, count)| StatisticBreakdown {
            item_id: author,
            item_name: name_by_account
                .get(&author)
                .map(|n| n.to_string())
                .unwrap_or_default(),
            total_articles: count,
            percentage: percentage(count, total_articles),
        })
        .collect();
    author_breakdown.sort_by(|a, b| {
        b.total_articles
            .cmp(&a.total_articles)
            .then_with(|| a.item_name.cmp(&b.item_name))
    });

    StatisticsReport {
        start_date: start,
        end_date: end,
        total_articles_created: total_articles,
        total_categories: categories.len(),
        inactive_categories_count,
        inactive_articles_count,
        daily_breakdown,
        category_breakdown,
        author_breakdown,
    }
}
