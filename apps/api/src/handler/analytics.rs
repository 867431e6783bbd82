//! # 集計データハンドラ
//!
//! 管理画面のダッシュボードに表示する訪問者数などの集計データを返す。
//! 実際の計測は行っておらず、固定のデモ値を返す。
//!
//! ## エンドポイント
//!
//! - `GET /api/analytics` - 集計データ取得

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::SecondsFormat;
use savoro_domain::clock::Clock;
use serde::Serialize;

/// 集計 API の共有状態
pub struct AnalyticsState {
    pub clock: Arc<dyn Clock>,
}

/// 集計データレスポンス DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_visitors:   u32,
    pub monthly_visitors: u32,
    pub weekly_visitors:  u32,
    pub page_views:       u32,
    pub visitor_change:   f64,
    pub page_view_change: f64,
    pub monthly_change:   f64,
    pub weekly_change:    f64,
    pub top_pages:        Vec<PageViews>,
    pub device_types:     DeviceTypes,
    pub traffic_sources:  TrafficSources,
    pub last_updated:     String,
    pub data_source:      &'static str,
}

#[derive(Debug, Serialize)]
pub struct PageViews {
    pub page:  &'static str,
    pub views: u32,
}

/// 端末種別ごとの割合（%）
#[derive(Debug, Serialize)]
pub struct DeviceTypes {
    pub desktop: u32,
    pub mobile:  u32,
    pub tablet:  u32,
}

/// 流入元ごとの割合（%）
#[derive(Debug, Serialize)]
pub struct TrafficSources {
    pub direct:   u32,
    pub search:   u32,
    pub social:   u32,
    pub referral: u32,
}

/// GET /api/analytics
///
/// `lastUpdated` 以外は固定値。
#[tracing::instrument(skip_all)]
pub async fn get_analytics(State(state): State<Arc<AnalyticsState>>) -> Json<AnalyticsResponse> {
    Json(AnalyticsResponse {
        total_visitors:   15234,
        monthly_visitors: 3456,
        weekly_visitors:  892,
        page_views:       45678,
        visitor_change:   12.5,
        page_view_change: 8.3,
        monthly_change:   15.2,
        weekly_change:    -3.4,
        top_pages:        vec![
            PageViews {
                page:  "Home",
                views: 12543,
            },
            PageViews {
                page:  "Menu",
                views: 8932,
            },
            PageViews {
                page:  "Contact",
                views: 6421,
            },
            PageViews {
                page:  "Gallery",
                views: 5234,
            },
            PageViews {
                page:  "About",
                views: 3456,
            },
        ],
        device_types:     DeviceTypes {
            desktop: 45,
            mobile:  48,
            tablet:  7,
        },
        traffic_sources:  TrafficSources {
            direct:   35,
            search:   40,
            social:   15,
            referral: 10,
        },
        last_updated:     state
            .clock
            .now()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        data_source:      "Demo Data",
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use chrono::DateTime;
    use pretty_assertions::assert_eq;
    use savoro_domain::clock::FixedClock;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_get_固定の集計データと更新時刻が返る() {
        // Given
        let now = DateTime::from_timestamp(1_766_222_100, 0).unwrap();
        let state = Arc::new(AnalyticsState {
            clock: Arc::new(FixedClock::new(now)),
        });
        let sut = Router::new()
            .route("/api/analytics", get(get_analytics))
            .with_state(state);
        let request = Request::builder()
            .uri("/api/analytics")
            .body(Body::empty())
            .unwrap();

        // When
        let response = sut.oneshot(request).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "totalVisitors": 15234,
                "monthlyVisitors": 3456,
                "weeklyVisitors": 892,
                "pageViews": 45678,
                "visitorChange": 12.5,
                "pageViewChange": 8.3,
                "monthlyChange": 15.2,
                "weeklyChange": -3.4,
                "topPages": [
                    { "page": "Home", "views": 12543 },
                    { "page": "Menu", "views": 8932 },
                    { "page": "Contact", "views": 6421 },
                    { "page": "Gallery", "views": 5234 },
                    { "page": "About", "views": 3456 }
                ],
                "deviceTypes": { "desktop": 45, "mobile": 48, "tablet": 7 },
                "trafficSources": { "direct": 35, "search": 40, "social": 15, "referral": 10 },
                "lastUpdated": "2025-12-20T09:15:00.000Z",
                "dataSource": "Demo Data"
            })
        );
    }
}
