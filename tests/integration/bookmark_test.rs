//! Integration tests for bookmarks and the profile views built on them.

use http::StatusCode;

use crate::helpers::{self, TestApp};

/// Full journey: register, publish a link, bookmark it, toggle it away,
/// and confirm the resource itself is untouched.
#[tokio::test]
async fn test_bookmark_lifecycle() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("alice"), "Password123")
        .await;
    let resource_id = app.create_link(&token, "X", "http://e").await;

    let response = app
        .request(
            "POST",
            "/api/bookmarks",
            Some(serde_json::json!({"resource_id": resource_id})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["resource"]["title"], "X");

    let response = app
        .request(
            "GET",
            &format!("/api/bookmarks/check/{resource_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.body["bookmarked"], true);
    assert!(response.body["bookmark_id"].is_string());

    let response = app
        .request(
            "POST",
            &format!("/api/bookmarks/toggle/{resource_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["bookmarked"], false);
    assert_eq!(response.body["action"], "removed");

    let response = app.request("GET", "/api/bookmarks", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().expect("bare array").len(), 0);

    // Removing a bookmark never touches the resource.
    let response = app
        .request(
            "GET",
            &format!("/api/resources/{resource_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_toggle_cycle() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("toggle"), "Password123")
        .await;
    let resource_id = app
        .create_link(&token, "Toggled", "https://example.com/toggled")
        .await;

    let response = app
        .request(
            "POST",
            &format!("/api/bookmarks/toggle/{resource_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["bookmarked"], true);
    assert_eq!(response.body["action"], "added");
    assert_eq!(response.body["message"], "Bookmark added");
    assert!(response.body["bookmark_id"].is_string());

    let response = app
        .request(
            "POST",
            &format!("/api/bookmarks/toggle/{resource_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.body["bookmarked"], false);
    assert_eq!(response.body["action"], "removed");
    assert_eq!(response.body["message"], "Bookmark removed");
    // No id on removal.
    assert!(response.body.get("bookmark_id").is_none());
}

#[tokio::test]
async fn test_duplicate_bookmark_conflict() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("twice"), "Password123")
        .await;
    let resource_id = app
        .create_link(&token, "Once", "https://example.com/once")
        .await;

    let body = serde_json::json!({"resource_id": resource_id});
    let response = app
        .request("POST", "/api/bookmarks", Some(body.clone()), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);

    let response = app
        .request("POST", "/api/bookmarks", Some(body), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Resource is already bookmarked");
}

#[tokio::test]
async fn test_bookmark_missing_resource() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("ghost"), "Password123")
        .await;

    let response = app
        .request(
            "POST",
            "/api/bookmarks",
            Some(serde_json::json!({"resource_id": uuid::Uuid::new_v4()})),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Resource not found");
}

#[tokio::test]
async fn test_delete_by_resource() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("byres"), "Password123")
        .await;
    let resource_id = app
        .create_link(&token, "Kept", "https://example.com/kept")
        .await;

    app.request(
        "POST",
        "/api/bookmarks",
        Some(serde_json::json!({"resource_id": resource_id})),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "DELETE",
            &format!("/api/bookmarks/resource/{resource_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    // A second delete has nothing to remove.
    let response = app
        .request(
            "DELETE",
            &format!("/api/bookmarks/resource/{resource_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Bookmark not found");
}

#[tokio::test]
async fn test_bookmarks_are_private() {
    let Some(app) = TestApp::spawn().await else { return };
    let alice_token = app
        .register_and_login(&helpers::unique_email("private-a"), "Password123")
        .await;
    let bob_token = app
        .register_and_login(&helpers::unique_email("private-b"), "Password123")
        .await;
    let resource_id = app
        .create_link(&alice_token, "Shared catalog", "https://example.com/shared")
        .await;

    let response = app
        .request(
            "POST",
            "/api/bookmarks",
            Some(serde_json::json!({"resource_id": resource_id})),
            Some(&alice_token),
        )
        .await;
    let bookmark_id = helpers::parse_id(&response.body);

    // Bob sees an empty list and cannot address Alice's bookmark.
    let response = app
        .request("GET", "/api/bookmarks", None, Some(&bob_token))
        .await;
    assert_eq!(response.body.as_array().expect("bare array").len(), 0);

    let response = app
        .request(
            "GET",
            &format!("/api/bookmarks/{bookmark_id}"),
            None,
            Some(&bob_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Bookmark not found");
}

#[tokio::test]
async fn test_bookmark_stats() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("bstats"), "Password123")
        .await;

    let link_id = app
        .create_link(&token, "Stat link", "https://example.com/stat")
        .await;
    let upload = app
        .upload_file(&token, "Stat file", "stat.txt", "text/plain", b"stat")
        .await;
    let file_id = helpers::parse_id(&upload.body);

    for id in [link_id, file_id] {
        let response = app
            .request(
                "POST",
                "/api/bookmarks",
                Some(serde_json::json!({"resource_id": id})),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }

    let response = app
        .request("GET", "/api/bookmarks/stats", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total_bookmarks"], 2);
    assert_eq!(response.body["file_bookmarks"], 1);
    assert_eq!(response.body["link_bookmarks"], 1);
}

#[tokio::test]
async fn test_user_stats_and_activity() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("profile"), "Password123")
        .await;

    app.upload_file(&token, "Slides", "slides.pdf", "application/pdf", b"%PDF")
        .await;
    let link_id = app
        .create_link(&token, "Article", "https://example.com/article")
        .await;
    app.request(
        "POST",
        "/api/bookmarks",
        Some(serde_json::json!({"resource_id": link_id})),
        Some(&token),
    )
    .await;

    let response = app
        .request("GET", "/api/users/me/stats", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["uploaded_resources"], 2);
    assert_eq!(response.body["bookmarks"], 1);
    assert_eq!(response.body["file_resources"], 1);
    assert_eq!(response.body["link_resources"], 1);
    assert!(response.body["account_created"].is_string());

    let response = app
        .request(
            "GET",
            "/api/users/me/recent-activity?limit=10",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let activities = response.body["activities"].as_array().expect("activities");
    assert_eq!(activities.len(), 3);

    // Newest first: the bookmark was the last action taken.
    assert_eq!(activities[0]["type"], "bookmark");
    assert_eq!(activities[0]["action"], "Bookmarked 'Article'");
    for activity in activities {
        assert!(activity["timestamp"].is_string());
        assert!(activity["resource_id"].is_string());
    }
}
