//! Ticket lifecycle tests.

use super::common::*;
use serde_json::json;

// =============================================================================
// CREATE
// =============================================================================

pub async fn test_every_status_round_trips() {
    println!("  🧪 test_every_status_round_trips");
    let ctx = TestContext::setup().await;

    for status in ["open", "in-progress", "blocked", "closed"] {
        let created = ctx
            .call(
                "add_ticket",
                json!({"project_id": "web", "title": format!("Ticket {}", status), "status": status}),
            )
            .await;
        assert_success(&created, status);
        assert_eq!(created.payload["status"], status);

        let fetched = ctx
            .call("get_ticket", json!({"id": created.payload["id"]}))
            .await;
        assert_eq!(fetched.payload["status"], status);
    }
    assert_eq!(ticket_count(&ctx).await, 4);
}

pub async fn test_invalid_status_rejected_without_insert() {
    println!("  🧪 test_invalid_status_rejected_without_insert");
    let ctx = TestContext::setup().await;

    for status in ["OPEN", "done", "in_progress", ""] {
        let result = ctx
            .call(
                "add_ticket",
                json!({"project_id": "web", "title": "Bad", "status": status}),
            )
            .await;
        assert_error_kind(&result, "validation_error", status);
        assert_eq!(result.payload["error"]["field"], "status");
    }

    let result = ctx
        .call(
            "add_ticket",
            json!({"project_id": "web", "title": "Bad", "priority": "critical"}),
        )
        .await;
    assert_error_kind(&result, "validation_error", "priority");

    assert_eq!(ticket_count(&ctx).await, 0);
}

pub async fn test_defaults_and_trimming() {
    println!("  🧪 test_defaults_and_trimming");
    let ctx = TestContext::setup().await;

    let result = ctx
        .call(
            "add_ticket",
            json!({"project_id": "  web ", "title": " Login loop ", "description": "   "}),
        )
        .await;
    assert_success(&result, "add_ticket");
    assert_eq!(result.payload["project_id"], "web");
    assert_eq!(result.payload["title"], "Login loop");
    assert_eq!(result.payload["description"], serde_json::Value::Null);
    assert_eq!(result.payload["status"], "open");
    assert_eq!(result.payload["priority"], "medium");
    assert_eq!(result.payload["created_at"], result.payload["updated_at"]);
}

pub async fn test_required_fields_and_lengths() {
    println!("  🧪 test_required_fields_and_lengths");
    let ctx = TestContext::setup().await;

    let result = ctx.call("add_ticket", json!({"project_id": "web"})).await;
    assert_error_kind(&result, "validation_error", "missing title");
    assert_eq!(result.payload["error"]["field"], "title");

    let result = ctx
        .call("add_ticket", json!({"project_id": "web", "title": "   "}))
        .await;
    assert_error_kind(&result, "validation_error", "blank title");

    let result = ctx
        .call("add_ticket", json!({"project_id": "web", "title": "x".repeat(201)}))
        .await;
    assert_error_kind(&result, "validation_error", "long title");

    let result = ctx
        .call("add_ticket", json!({"project_id": "web", "title": "x".repeat(200)}))
        .await;
    assert_success(&result, "title at the limit");

    let result = ctx
        .call(
            "add_ticket",
            json!({"project_id": "web", "title": "Extra", "assignee": "sam"}),
        )
        .await;
    assert_error_kind(&result, "validation_error", "unknown field");

    let result = ctx
        .call("add_ticket", json!({"project_id": 7, "title": "Typed"}))
        .await;
    assert_error_kind(&result, "validation_error", "wrong type");

    assert_eq!(ticket_count(&ctx).await, 1);
}

// =============================================================================
// READ
// =============================================================================

pub async fn test_get_ticket_is_idempotent() {
    println!("  🧪 test_get_ticket_is_idempotent");
    let ctx = TestContext::setup().await;
    let id = add_ticket(&ctx, "web", "Login").await;

    let first = ctx.call("get_ticket", json!({"id": id})).await;
    let second = ctx.call("get_ticket", json!({"id": id})).await;
    let aliased = ctx.call("get_ticket", json!({"ticket_id": id})).await;
    assert_success(&first, "get_ticket");
    assert_eq!(first, second);
    assert_eq!(first, aliased);
    assert_eq!(ticket_count(&ctx).await, 1);
}

pub async fn test_get_missing_ticket() {
    println!("  🧪 test_get_missing_ticket");
    let ctx = TestContext::setup().await;

    let result = ctx.call("get_ticket", json!({"id": 12345})).await;
    assert_error_kind(&result, "not_found", "missing ticket");

    let result = ctx.call("get_ticket", json!({"id": 0})).await;
    assert_error_kind(&result, "validation_error", "zero id");
}

pub async fn test_list_tickets_newest_first() {
    println!("  🧪 test_list_tickets_newest_first");
    let ctx = TestContext::setup().await;
    let first = add_ticket(&ctx, "web", "First").await;
    let second = add_ticket(&ctx, "web", "Second").await;
    let third = add_ticket(&ctx, "api", "Third").await;

    let result = ctx.call("list_tickets", json!({})).await;
    let ids: Vec<i64> = result.payload["tickets"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![third, second, first]);
}

// =============================================================================
// UPDATE
// =============================================================================

pub async fn test_update_ticket() {
    println!("  🧪 test_update_ticket");
    let ctx = TestContext::setup().await;
    let created = ctx
        .call(
            "add_ticket",
            json!({"project_id": "web", "title": "Login", "description": "Loops forever"}),
        )
        .await;
    let id = created.payload["id"].as_i64().unwrap();

    let result = ctx
        .call(
            "update_ticket",
            json!({"id": id, "status": "in-progress", "priority": "urgent"}),
        )
        .await;
    assert_success(&result, "update_ticket");
    assert_eq!(result.payload["status"], "in-progress");
    assert_eq!(result.payload["priority"], "urgent");
    assert_eq!(result.payload["title"], "Login");
    assert_eq!(result.payload["description"], "Loops forever");
    assert_eq!(result.payload["created_at"], created.payload["created_at"]);

    let result = ctx
        .call("update_ticket", json!({"id": id, "description": null}))
        .await;
    assert_success(&result, "clear description");
    assert_eq!(result.payload["description"], serde_json::Value::Null);

    let result = ctx.call("update_ticket", json!({"id": id})).await;
    assert_error_kind(&result, "validation_error", "no changes");

    let result = ctx
        .call("update_ticket", json!({"id": id, "status": "reopened"}))
        .await;
    assert_error_kind(&result, "validation_error", "bad status");

    let result = ctx
        .call("update_ticket", json!({"id": 9999, "status": "closed"}))
        .await;
    assert_error_kind(&result, "not_found", "missing ticket");
}

// =============================================================================
// DELETE
// =============================================================================

pub async fn test_delete_ticket_cascades() {
    println!("  🧪 test_delete_ticket_cascades");
    let ctx = TestContext::setup().await;
    let doomed = add_ticket(&ctx, "web", "Doomed").await;
    let kept = add_ticket(&ctx, "web", "Kept").await;
    add_todo(&ctx, doomed, "One").await;
    add_todo(&ctx, doomed, "Two").await;
    add_todo(&ctx, kept, "Three").await;

    let result = ctx.call("delete_ticket", json!({"id": doomed})).await;
    assert_success(&result, "delete_ticket");
    assert_eq!(
        result.payload,
        json!({"id": doomed, "deleted": true, "todos_deleted": 2})
    );

    let result = ctx.call("get_ticket", json!({"id": doomed})).await;
    assert_error_kind(&result, "not_found", "deleted ticket");
    assert_eq!(todo_count(&ctx, doomed).await, 0);
    assert_eq!(todo_count(&ctx, kept).await, 1);

    let orphans = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT COUNT(*) AS n FROM todos WHERE ticket_id = :id", "params": {"id": doomed}}),
        )
        .await;
    assert_eq!(orphans.payload["rows"][0]["n"], 0);

    let result = ctx.call("delete_ticket", json!({"id": doomed})).await;
    assert_error_kind(&result, "not_found", "second delete");
}

pub async fn run_all_tests() {
    println!("\n🎫 Running Ticket Tests\n");

    test_every_status_round_trips().await;
    test_invalid_status_rejected_without_insert().await;
    test_defaults_and_trimming().await;
    test_required_fields_and_lengths().await;

    test_get_ticket_is_idempotent().await;
    test_get_missing_ticket().await;
    test_list_tickets_newest_first().await;

    test_update_ticket().await;
    test_delete_ticket_cascades().await;

    println!("\n✅ Ticket tests passed\n");
}
