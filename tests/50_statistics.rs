mod common;

use anyhow::Result;

use news_api_rust::models::{AccountRole, ArticleStatus};
use news_api_rust::services::article_service::StatisticsRequest;

#[tokio::test]
async fn end_before_start_is_rejected_before_any_work() {
    let registry = common::seeded_registry();
    let err = registry
        .articles
        .statistics(&StatisticsRequest {
            start_date: common::day_of(2024, 3, 10),
            end_date: common::day_of(2024, 3, 1),
        })
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn two_day_scenario_orders_daily_breakdown_descending() -> Result<()> {
    let registry = common::registry_with(
        vec![common::account(
            1,
            "Ann",
            "ann@example.com",
            "pass-word",
            AccountRole::Staff,
        )],
        vec![common::category(1, "News", None, true)],
        vec![],
        vec![
            common::article(1, "one", 1, 1, vec![], ArticleStatus::Active, common::at(2024, 5, 1)),
            common::article(2, "two", 1, 1, vec![], ArticleStatus::Active, common::at(2024, 5, 1)),
            common::article(3, "three", 1, 1, vec![], ArticleStatus::Inactive, common::at(2024, 5, 2)),
        ],
    );

    let report = registry
        .articles
        .statistics(&StatisticsRequest {
            start_date: common::day_of(2024, 5, 1),
            end_date: common::day_of(2024, 5, 2),
        })
        .await?;

    assert_eq!(report.total_articles_created, 3);
    assert_eq!(report.inactive_articles_count, 1);
    assert_eq!(report.daily_breakdown.len(), 2);

    let newest = &report.daily_breakdown[0];
    assert_eq!(newest.date, common::day_of(2024, 5, 2));
    assert_eq!(
        (newest.total_articles, newest.active_articles, newest.inactive_articles),
        (1, 0, 1)
    );

    let oldest = &report.daily_breakdown[1];
    assert_eq!(oldest.date, common::day_of(2024, 5, 1));
    assert_eq!(
        (oldest.total_articles, oldest.active_articles, oldest.inactive_articles),
        (2, 2, 0)
    );
    Ok(())
}

#[tokio::test]
async fn category_breakdown_covers_all_categories_with_labels() -> Result<()> {
    let registry = common::seeded_registry();
    let report = registry
        .articles
        .statistics(&StatisticsRequest {
            start_date: common::day_of(2024, 3, 1),
            end_date: common::day_of(2024, 3, 31),
        })
        .await?;

    // every category appears, including the zero-count inactive root
    assert_eq!(report.total_categories, 4);
    assert_eq!(report.category_breakdown.len(), 4);

    let names: Vec<&str> = report
        .category_breakdown
        .iter()
        .map(|b| b.item_name.as_str())
        .collect();
    assert!(names.contains(&"Archive (inactive)"));
    assert!(names.contains(&"Dormant (inactive)"));
    assert!(names.contains(&"News"));

    // inactive categories are judged on the full ancestor chain
    assert_eq!(report.inactive_categories_count, 2);

    // sorted by article count descending, then name
    let counts: Vec<usize> = report
        .category_breakdown
        .iter()
        .map(|b| b.total_articles)
        .collect();
    let mut sorted = counts.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(counts, sorted);
    Ok(())
}

#[tokio::test]
async fn percentages_are_rounded_shares_of_in_range_total() -> Result<()> {
    let registry = common::seeded_registry();
    let report = registry
        .articles
        .statistics(&StatisticsRequest {
            start_date: common::day_of(2024, 3, 1),
            end_date: common::day_of(2024, 3, 31),
        })
        .await?;

    // 4 articles in range: News holds 2, Business and Dormant 1 each
    let news = report
        .category_breakdown
        .iter()
        .find(|b| b.item_name == "News")
        .expect("news row");
    assert_eq!(news.total_articles, 2);
    assert_eq!(news.percentage, 50.0);

    let dormant = report
        .category_breakdown
        .iter()
        .find(|b| b.item_name == "Dormant (inactive)")
        .expect("dormant row");
    assert_eq!(dormant.percentage, 25.0);
    Ok(())
}

#[tokio::test]
async fn author_breakdown_lists_only_authors_in_range() -> Result<()> {
    let registry = common::seeded_registry();
    let report = registry
        .articles
        .statistics(&StatisticsRequest {
            start_date: common::day_of(2024, 3, 1),
            end_date: common::day_of(2024, 3, 31),
        })
        .await?;

    // Chau never published; Binh wrote 3 of 4, Alice 1
    assert_eq!(report.author_breakdown.len(), 2);
    assert_eq!(report.author_breakdown[0].item_name, "Binh");
    assert_eq!(report.author_breakdown[0].total_articles, 3);
    assert_eq!(report.author_breakdown[0].percentage, 75.0);
    assert_eq!(report.author_breakdown[1].item_name, "Alice");
    assert_eq!(report.author_breakdown[1].percentage, 25.0);
    Ok(())
}

#[tokio::test]
async fn range_is_inclusive_of_the_whole_end_day() -> Result<()> {
    let registry = common::seeded_registry();
    // end date equals the creation day of article 4 (2024-03-03 09:00)
    let report = registry
        .articles
        .statistics(&StatisticsRequest {
            start_date: common::day_of(2024, 3, 3),
            end_date: common::day_of(2024, 3, 3),
        })
        .await?;
    assert_eq!(report.total_articles_created, 1);
    assert_eq!(report.inactive_articles_count, 1);
    Ok(())
}
