mod common;

use chrono::{Days, Duration, Utc};
use snaplink::domain::entities::{ClickEntry, MAX_DAILY_STATS, MAX_RECENT_CLICKS};
use snaplink::domain::repositories::UrlRepository;

async fn create_record(ctx: &common::TestContext) -> i64 {
    ctx.state
        .shortener_service
        .create_short_url("https://example.com/".to_string(), None, None, None)
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_concurrent_clicks_all_counted() {
    let ctx = common::create_test_context();
    let id = create_record(&ctx).await;

    let mut handles = Vec::new();
    for _ in 0..64 {
        let service = ctx.click_service.clone();
        handles.push(tokio::spawn(async move {
            service.record_click(id, common::click_entry(0, None)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let record = ctx.repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.click_count, 64);
    assert_eq!(record.recent_clicks.len(), 64);
}

#[tokio::test]
async fn test_recent_clicks_window_keeps_most_recent() {
    let ctx = common::create_test_context();
    let id = create_record(&ctx).await;

    // Tag each click through its ip so retained entries are identifiable.
    for i in 0..1500 {
        let entry = ClickEntry {
            ip: Some(i.to_string()),
            ..common::click_entry(0, None)
        };
        ctx.click_service.record_click(id, entry).await.unwrap();
    }

    let record = ctx.repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.click_count, 1500);
    assert_eq!(record.recent_clicks.len(), MAX_RECENT_CLICKS);

    // The oldest 500 were evicted; entries 500..1500 remain in order.
    assert_eq!(record.recent_clicks[0].ip.as_deref(), Some("500"));
    assert_eq!(record.recent_clicks[999].ip.as_deref(), Some("1499"));
}

#[tokio::test]
async fn test_daily_rollup_one_entry_per_day() {
    let ctx = common::create_test_context();
    let id = create_record(&ctx).await;

    // 3 days, 2 clicks each, interleaved.
    for _ in 0..2 {
        for day in 0..3 {
            let entry = ClickEntry {
                clicked_at: Utc::now() - Duration::days(day),
                ..common::click_entry(0, None)
            };
            ctx.click_service.record_click(id, entry).await.unwrap();
        }
    }

    let record = ctx.repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.daily_stats.len(), 3);
    for stat in &record.daily_stats {
        assert_eq!(stat.clicks, 2);
    }
}

#[tokio::test]
async fn test_daily_rollup_cap_evicts_oldest_days() {
    let ctx = common::create_test_context();
    let id = create_record(&ctx).await;

    // 400 distinct days, oldest first.
    for offset in (0..400i64).rev() {
        let entry = ClickEntry {
            clicked_at: Utc::now() - Duration::days(offset),
            ..common::click_entry(0, None)
        };
        ctx.click_service.record_click(id, entry).await.unwrap();
    }

    let record = ctx.repository.find_by_id(id).await.unwrap().unwrap();

    // Evicting rollup days never touches the click counter.
    assert_eq!(record.click_count, 400);
    assert_eq!(record.daily_stats.len(), MAX_DAILY_STATS);

    // The oldest 35 days fell out; the most recent 365 remain in order.
    let today = Utc::now().date_naive();
    assert_eq!(record.daily_stats[0].date, today - Days::new(364));
    assert_eq!(record.daily_stats.last().unwrap().date, today);
}

#[tokio::test]
async fn test_click_count_matches_rollup_sum() {
    let ctx = common::create_test_context();
    let id = create_record(&ctx).await;

    for day in 0..5 {
        for _ in 0..=day {
            let entry = ClickEntry {
                clicked_at: Utc::now() - Duration::days(day),
                ..common::click_entry(0, None)
            };
            ctx.click_service.record_click(id, entry).await.unwrap();
        }
    }

    let record = ctx.repository.find_by_id(id).await.unwrap().unwrap();
    let rollup_sum: i64 = record.daily_stats.iter().map(|d| d.clicks).sum();
    assert_eq!(record.click_count, rollup_sum);
    assert_eq!(record.click_count, 15);
}

#[tokio::test]
async fn test_last_clicked_at_tracks_latest_entry() {
    let ctx = common::create_test_context();
    let id = create_record(&ctx).await;

    let first = common::click_entry(2, None);
    let second = common::click_entry(0, None);
    let latest = second.clicked_at;

    ctx.click_service.record_click(id, first).await.unwrap();
    ctx.click_service.record_click(id, second).await.unwrap();

    let record = ctx.repository.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(record.last_clicked_at, Some(latest));
}

#[tokio::test]
async fn test_owner_clicks_forwarded_to_account_queue() {
    let mut ctx = common::create_test_context();

    let record = ctx
        .state
        .shortener_service
        .create_short_url("https://example.com/".to_string(), Some(7), None, None)
        .await
        .unwrap();

    // Creation itself queues a link event.
    let created = ctx.account_rx.recv().await.unwrap();
    assert!(matches!(
        created,
        snaplink::domain::account_worker::AccountEvent::LinkCreated { owner_id: 7 }
    ));

    ctx.click_service
        .record_click(record.id, common::click_entry(0, None))
        .await
        .unwrap();

    let clicked = ctx.account_rx.recv().await.unwrap();
    assert!(matches!(
        clicked,
        snaplink::domain::account_worker::AccountEvent::Click { owner_id: 7 }
    ));
}
