//! Todo lifecycle tests.

use super::common::*;
use serde_json::{Value, json};

pub async fn test_add_todo_requires_existing_ticket() {
    println!("  🧪 test_add_todo_requires_existing_ticket");
    let ctx = TestContext::setup().await;

    let result = ctx
        .call("add_todo", json!({"ticket_id": 999, "description": "Orphan"}))
        .await;
    assert_error_kind(&result, "referential_integrity_error", "missing ticket");
    assert_eq!(result.payload["error"]["field"], "ticket_id");

    // Listing todos of a ticket that does not exist is simply empty.
    assert_eq!(todo_count(&ctx, 999).await, 0);
}

pub async fn test_add_todo_then_list() {
    println!("  🧪 test_add_todo_then_list");
    let ctx = TestContext::setup().await;
    let ticket = add_ticket(&ctx, "web", "Login").await;

    let first = ctx
        .call("add_todo", json!({"ticket_id": ticket, "description": "Reproduce"}))
        .await;
    assert_success(&first, "add_todo");
    assert_eq!(first.payload["status"], "pending");
    assert_eq!(first.payload["due_date"], Value::Null);
    assert_eq!(first.payload["ticket_id"], ticket);

    add_todo(&ctx, ticket, "Fix").await;

    let listed = ctx.call("list_todos", json!({"ticket_id": ticket})).await;
    let todos = listed.payload["todos"].as_array().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0], first.payload, "oldest first");
    assert_eq!(todos[1]["description"], "Fix");
}

pub async fn test_due_date_round_trip_and_rejections() {
    println!("  🧪 test_due_date_round_trip_and_rejections");
    let ctx = TestContext::setup().await;
    let ticket = add_ticket(&ctx, "web", "Release").await;

    let result = ctx
        .call(
            "add_todo",
            json!({"ticket_id": ticket, "description": "Ship", "due_date": "2024-03-15"}),
        )
        .await;
    assert_success(&result, "valid due date");
    assert_eq!(result.payload["due_date"], "2024-03-15");

    let listed = ctx.call("list_todos", json!({"ticket_id": ticket})).await;
    assert_eq!(listed.payload["todos"][0]["due_date"], "2024-03-15");

    for bad in ["2024-02-30", "15-03-2024", "2024-3-15", "tomorrow"] {
        let result = ctx
            .call(
                "add_todo",
                json!({"ticket_id": ticket, "description": "Bad", "due_date": bad}),
            )
            .await;
        assert_error_kind(&result, "validation_error", bad);
        assert_eq!(result.payload["error"]["field"], "due_date");
    }

    assert_eq!(todo_count(&ctx, ticket).await, 1);
}

pub async fn test_update_todo_status() {
    println!("  🧪 test_update_todo_status");
    let ctx = TestContext::setup().await;
    let ticket = add_ticket(&ctx, "web", "Login").await;
    let todo = add_todo(&ctx, ticket, "Fix").await;

    let result = ctx
        .call("update_todo_status", json!({"id": 999999, "status": "done"}))
        .await;
    assert_error_kind(&result, "not_found", "missing todo");

    let result = ctx
        .call("update_todo_status", json!({"todo_id": todo, "status": "done"}))
        .await;
    assert_success(&result, "update_todo_status");
    assert_eq!(result.payload["status"], "done");
    assert_eq!(result.payload["id"], todo);

    let result = ctx
        .call("update_todo_status", json!({"id": todo, "status": "finished"}))
        .await;
    assert_error_kind(&result, "validation_error", "bad status");

    let result = ctx.call("update_todo_status", json!({"id": todo})).await;
    assert_error_kind(&result, "validation_error", "missing status");
    assert_eq!(result.payload["error"]["field"], "status");
}

pub async fn test_update_todo_fields() {
    println!("  🧪 test_update_todo_fields");
    let ctx = TestContext::setup().await;
    let ticket = add_ticket(&ctx, "web", "Login").await;
    let todo = add_todo(&ctx, ticket, "Fix").await;

    let result = ctx
        .call(
            "update_todo",
            json!({"id": todo, "description": "Fix properly", "due_date": "2024-12-31"}),
        )
        .await;
    assert_success(&result, "update_todo");
    assert_eq!(result.payload["description"], "Fix properly");
    assert_eq!(result.payload["due_date"], "2024-12-31");
    assert_eq!(result.payload["status"], "pending");

    let result = ctx
        .call("update_todo", json!({"id": todo, "due_date": null}))
        .await;
    assert_success(&result, "clear due date");
    assert_eq!(result.payload["due_date"], Value::Null);
    assert_eq!(result.payload["description"], "Fix properly");

    let result = ctx.call("update_todo", json!({"id": todo})).await;
    assert_error_kind(&result, "validation_error", "no changes");

    let result = ctx
        .call("update_todo", json!({"id": todo, "due_date": "2023-02-29"}))
        .await;
    assert_error_kind(&result, "validation_error", "not a leap year");

    let result = ctx
        .call("update_todo", json!({"id": todo, "ticket_id": ticket}))
        .await;
    assert_error_kind(&result, "validation_error", "todos cannot move");

    let result = ctx
        .call("update_todo", json!({"id": 424242, "status": "done"}))
        .await;
    assert_error_kind(&result, "not_found", "missing todo");
}

pub async fn test_delete_todo() {
    println!("  🧪 test_delete_todo");
    let ctx = TestContext::setup().await;
    let ticket = add_ticket(&ctx, "web", "Login").await;
    let todo = add_todo(&ctx, ticket, "Fix").await;
    add_todo(&ctx, ticket, "Test").await;

    let result = ctx.call("delete_todo", json!({"id": todo})).await;
    assert_success(&result, "delete_todo");
    assert_eq!(result.payload, json!({"id": todo, "deleted": true}));
    assert_eq!(todo_count(&ctx, ticket).await, 1);

    let result = ctx.call("delete_todo", json!({"id": todo})).await;
    assert_error_kind(&result, "not_found", "second delete");

    // The owning ticket is untouched.
    let result = ctx.call("get_ticket", json!({"id": ticket})).await;
    assert_success(&result, "ticket survives");
}

pub async fn run_all_tests() {
    println!("\n📝 Running Todo Tests\n");

    test_add_todo_requires_existing_ticket().await;
    test_add_todo_then_list().await;
    test_due_date_round_trip_and_rejections().await;
    test_update_todo_status().await;
    test_update_todo_fields().await;
    test_delete_todo().await;

    println!("\n✅ Todo tests passed\n");
}
