//! Integration tests for categories and tags: CRUD, normalization,
//! idempotent creation, and guarded deletes.

use http::StatusCode;

use crate::helpers::{self, TestApp};

#[tokio::test]
async fn test_category_crud() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("cat"), "Password123")
        .await;
    let name = format!("Mathematics {}", helpers::unique_marker());

    let response = app
        .request(
            "POST",
            "/api/categories",
            Some(serde_json::json!({
                "name": name,
                "description": "Numbers and structures",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["name"], name.as_str());
    let id = helpers::parse_id(&response.body);

    let renamed = format!("{name} II");
    let response = app
        .request(
            "PUT",
            &format!("/api/categories/{id}"),
            Some(serde_json::json!({"name": renamed})),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], renamed.as_str());

    let response = app
        .request("GET", "/api/categories", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response
        .body
        .as_array()
        .expect("bare array")
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert!(names.contains(&renamed.as_str()));

    let response = app
        .request(
            "DELETE",
            &format!("/api/categories/{id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_category_duplicate_name() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("dupcat"), "Password123")
        .await;
    let name = format!("Physics {}", helpers::unique_marker());

    for expected in [StatusCode::OK, StatusCode::CONFLICT] {
        let response = app
            .request(
                "POST",
                "/api/categories",
                Some(serde_json::json!({"name": name})),
                Some(&token),
            )
            .await;
        assert_eq!(response.status, expected, "{:?}", response.body);
    }
}

#[tokio::test]
async fn test_category_hierarchy() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("tree"), "Password123")
        .await;
    let marker = helpers::unique_marker();

    let parent = app
        .request(
            "POST",
            "/api/categories",
            Some(serde_json::json!({"name": format!("Science {marker}")})),
            Some(&token),
        )
        .await;
    let parent_id = helpers::parse_id(&parent.body);

    let child = app
        .request(
            "POST",
            "/api/categories",
            Some(serde_json::json!({
                "name": format!("Chemistry {marker}"),
                "parent_id": parent_id,
            })),
            Some(&token),
        )
        .await;
    assert_eq!(child.status, StatusCode::OK, "{:?}", child.body);
    assert_eq!(child.body["parent_id"], parent_id.to_string().as_str());
    let child_id = helpers::parse_id(&child.body);

    // A parent with children cannot be deleted.
    let response = app
        .request(
            "DELETE",
            &format!("/api/categories/{parent_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "Cannot delete category with 1 child categories. Please delete child categories first."
    );

    // Children first, then the parent.
    let response = app
        .request(
            "DELETE",
            &format!("/api/categories/{child_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .request(
            "DELETE",
            &format!("/api/categories/{parent_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_category_delete_blocked_by_resources() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("guard"), "Password123")
        .await;

    let category = app
        .request(
            "POST",
            "/api/categories",
            Some(serde_json::json!({"name": format!("History {}", helpers::unique_marker())})),
            Some(&token),
        )
        .await;
    let category_id = helpers::parse_id(&category.body);

    let response = app
        .request(
            "POST",
            "/api/resources",
            Some(serde_json::json!({
                "title": "Categorized",
                "resource_type": "LINK",
                "url": "https://example.com/history",
                "category_ids": [category_id],
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let resource_id = helpers::parse_id(&response.body);

    let response = app
        .request(
            "DELETE",
            &format!("/api/categories/{category_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "Cannot delete category with 1 resources. Please move or delete the resources first."
    );

    // Deleting the resource unblocks the category.
    app.request(
        "DELETE",
        &format!("/api/resources/{resource_id}"),
        None,
        Some(&token),
    )
    .await;
    let response = app
        .request(
            "DELETE",
            &format!("/api/categories/{category_id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_category_resources_listing() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("catres"), "Password123")
        .await;

    let category = app
        .request(
            "POST",
            "/api/categories",
            Some(serde_json::json!({"name": format!("Biology {}", helpers::unique_marker())})),
            Some(&token),
        )
        .await;
    let category_id = helpers::parse_id(&category.body);

    app.request(
        "POST",
        "/api/resources",
        Some(serde_json::json!({
            "title": "Cell structure",
            "resource_type": "LINK",
            "url": "https://example.com/cells",
            "category_ids": [category_id],
        })),
        Some(&token),
    )
    .await;

    let response = app
        .request(
            "GET",
            &format!("/api/categories/{category_id}/resources"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 1);
    assert_eq!(response.body["resources"][0]["title"], "Cell structure");

    let response = app
        .request(
            "GET",
            &format!("/api/categories/{}/resources", uuid::Uuid::new_v4()),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Category not found");
}

#[tokio::test]
async fn test_tag_create_is_idempotent_and_normalized() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("tag"), "Password123")
        .await;
    let marker = helpers::unique_marker();

    let response = app
        .request(
            "POST",
            &format!("/api/tags?tag_name=%20Rust-{marker}%20"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["name"], format!("rust-{marker}"));
    let first_id = helpers::parse_id(&response.body);

    // Same name in different case resolves to the same row.
    let response = app
        .request(
            "POST",
            &format!("/api/tags?tag_name=RUST-{marker}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(helpers::parse_id(&response.body), first_id);
}

#[tokio::test]
async fn test_tag_empty_name_rejected() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("emptytag"), "Password123")
        .await;

    let response = app
        .request("POST", "/api/tags?tag_name=%20%20", None, Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Tag name cannot be empty");
}

#[tokio::test]
async fn test_tag_rename_collision() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("rename"), "Password123")
        .await;
    let marker = helpers::unique_marker();

    let taken = app
        .request(
            "POST",
            &format!("/api/tags?tag_name=taken-{marker}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(taken.status, StatusCode::OK);

    let other = app
        .request(
            "POST",
            &format!("/api/tags?tag_name=other-{marker}"),
            None,
            Some(&token),
        )
        .await;
    let other_id = helpers::parse_id(&other.body);

    let response = app
        .request(
            "PUT",
            &format!("/api/tags/{other_id}?tag_name=TAKEN-{marker}"),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["message"], "Tag with this name already exists");
}

#[tokio::test]
async fn test_tag_delete_blocked_by_usage() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("tagguard"), "Password123")
        .await;
    let name = format!("pinned-{}", helpers::unique_marker());

    let response = app
        .request(
            "POST",
            "/api/resources",
            Some(serde_json::json!({
                "title": "Tagged",
                "resource_type": "LINK",
                "url": "https://example.com/tagged",
                "tag_names": [name],
            })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let resource_id = helpers::parse_id(&response.body);
    let tag_id = response.body["tags"][0]["id"]
        .as_str()
        .and_then(|s| uuid::Uuid::parse_str(s).ok())
        .expect("tag id");

    let response = app
        .request("DELETE", &format!("/api/tags/{tag_id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "Cannot delete tag used by 1 resources. Please remove the tag from resources first."
    );

    app.request(
        "DELETE",
        &format!("/api/resources/{resource_id}"),
        None,
        Some(&token),
    )
    .await;
    let response = app
        .request("DELETE", &format!("/api/tags/{tag_id}"), None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_tag_bulk_create_dedupes() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("bulk"), "Password123")
        .await;
    let marker = helpers::unique_marker();

    let response = app
        .request(
            "POST",
            "/api/tags/bulk",
            Some(serde_json::json!([
                format!("Alpha-{marker}"),
                format!("  alpha-{marker}  "),
                format!("beta-{marker}"),
                "",
            ])),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let names: Vec<&str> = response
        .body
        .as_array()
        .expect("bare array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![format!("alpha-{marker}"), format!("beta-{marker}")]
    );
}

#[tokio::test]
async fn test_tag_bulk_create_all_blank() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("blankbulk"), "Password123")
        .await;

    let response = app
        .request(
            "POST",
            "/api/tags/bulk",
            Some(serde_json::json!(["", "   "])),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.body["message"],
        "At least one valid tag name is required"
    );
}

#[tokio::test]
async fn test_tag_search() {
    let Some(app) = TestApp::spawn().await else { return };
    let token = app
        .register_and_login(&helpers::unique_email("tagsearch"), "Password123")
        .await;
    let marker = helpers::unique_marker();

    for name in ["calculus", "algebra"] {
        app.request(
            "POST",
            &format!("/api/tags?tag_name={name}-{marker}"),
            None,
            Some(&token),
        )
        .await;
    }

    let response = app
        .request(
            "GET",
            &format!("/api/tags?search=calculus-{marker}"),
            None,
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let names: Vec<&str> = response
        .body
        .as_array()
        .expect("bare array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(names, vec![format!("calculus-{marker}")]);
}
