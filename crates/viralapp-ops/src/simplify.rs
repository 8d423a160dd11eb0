//! Reduced field sets for `options.simplifyOutput`.

use serde_json::{Map, Value};
use viralapp_types::clean_value;

pub(crate) const ACCOUNT_ANALYTICS: &[&str] = &[
    "id",
    "username",
    "platform",
    "followerCount",
    "totalVideos",
    "totalViews",
    "avgViews",
    "engagementRate",
    "viralityRate",
    "createdAt",
];

pub(crate) const TRACKED_ACCOUNT: &[&str] = &[
    "id",
    "username",
    "platform",
    "status",
    "maxVideos",
    "lastSyncedAt",
    "createdAt",
    "videoCount",
];

pub(crate) const TRACKED_VIDEO: &[&str] = &[
    "id",
    "platformVideoId",
    "platform",
    "status",
    "lastSyncedAt",
    "createdAt",
    "viewCount",
    "engagementRate",
];

pub(crate) const APP: &[&str] = &["id", "title", "provider", "lastSeenAt", "nextSyncAt", "createdAt"];

pub(crate) const VIDEO: &[&str] = &[
    "id",
    "platformVideoId",
    "platform",
    "title",
    "accountUsername",
    "viewCount",
    "likeCount",
    "commentCount",
    "shareCount",
    "publishedAt",
];

pub(crate) const EXCLUDED_VIDEO: &[&str] = &[
    "id",
    "orgAccountId",
    "platform",
    "platformAccountId",
    "platformVideoId",
    "username",
    "accountDisplayName",
    "createdAt",
    "actorType",
];

pub(crate) const KPIS: &[&str] = &[
    "videoCount",
    "viewCount",
    "likeCount",
    "commentCount",
    "shareCount",
    "engagementRate",
];

pub(crate) const TOP_VIDEO: &[&str] = &[
    "id",
    "platform",
    "accountUsername",
    "caption",
    "viewCount",
    "likeCount",
    "engagementRate",
    "publishedAt",
];

pub(crate) const TOP_ACCOUNT: &[&str] = &[
    "id",
    "platform",
    "username",
    "followerCount",
    "totalVideos",
    "totalViews",
    "engagementRate",
];

pub(crate) const DAILY_METRIC: &[&str] = &["date", "views", "likes", "comments", "shares", "bookmarks"];

/// Copies `fields` out of `record`, skipping the ones it lacks.
pub(crate) fn pick(record: &Value, fields: &[&str]) -> Value {
    let picked: Map<String, Value> = fields
        .iter()
        .filter_map(|field| record.get(*field).map(|v| ((*field).to_string(), v.clone())))
        .collect();
    Value::Object(picked)
}

pub(crate) fn project(record: &Value) -> Value {
    let mut picked = pick(record, &["id", "name", "description", "logo"]);
    let count = match record.get("trackedAccounts") {
        Some(Value::Array(accounts)) => Some(Value::from(accounts.len())),
        _ => record.get("trackedAccountsCount").cloned(),
    };
    if let (Value::Object(map), Some(count)) = (&mut picked, count) {
        map.insert("trackedAccountsCount".to_string(), count);
    }
    if let (Value::Object(map), Some(created)) = (&mut picked, record.get("createdAt")) {
        map.insert("createdAt".to_string(), created.clone());
    }
    picked
}

pub(crate) fn excluded_video(record: &Value) -> Value {
    clean_value(&pick(record, EXCLUDED_VIDEO)).unwrap_or_else(|| Value::Object(Map::new()))
}
