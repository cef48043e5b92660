//! `run_select` and introspection tests.

use super::common::*;
use serde_json::{Value, json};
use slate_core::QueryConfig;

async fn seeded(ctx: &TestContext, count: usize) {
    for i in 0..count {
        let project = if i % 2 == 0 { "even" } else { "odd" };
        add_ticket(ctx, project, &format!("Ticket {}", i)).await;
    }
}

fn ids(result: &slate_mcp::ExecutionResult) -> Vec<i64> {
    result.payload["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

// =============================================================================
// SAFETY GATE
// =============================================================================

pub async fn test_multiple_statements_rejected() {
    println!("  🧪 test_multiple_statements_rejected");
    let ctx = TestContext::setup().await;
    seeded(&ctx, 2).await;

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT * FROM tickets; DROP TABLE tickets;"}),
        )
        .await;
    assert_error_kind(&result, "query_rejected", "stacked statements");
    assert_eq!(result.payload["error"]["field"], "sql");

    let tables = ctx.call("list_tables", json!({})).await;
    assert_eq!(tables.payload, json!({"tables": ["tickets", "todos"]}));
    assert_eq!(ticket_count(&ctx).await, 2);
}

pub async fn test_writes_rejected() {
    println!("  🧪 test_writes_rejected");
    let ctx = TestContext::setup().await;
    seeded(&ctx, 1).await;

    for sql in [
        "DELETE FROM tickets",
        "UPDATE tickets SET status = 'closed'",
        "INSERT INTO tickets (project_id, title, created_at, updated_at) VALUES ('a', 'b', 'c', 'd')",
        "DROP TABLE todos",
        "CREATE TABLE extra (id INTEGER)",
        "PRAGMA foreign_keys = 0",
        "SELECT * FROM tickets WHERE id = ?",
        "SELECT * FROM tickets WHERE id = ?1",
        "",
    ] {
        let result = ctx.call("run_select", json!({"sql": sql})).await;
        assert!(!result.success, "{} should be refused", sql);
        assert!(
            matches!(result.error_kind(), Some("query_rejected" | "validation_error")),
            "{}: {:?}",
            sql,
            result
        );
    }

    assert_eq!(ticket_count(&ctx).await, 1);
    let schema = ctx.call("schema", json!({"table": "extra"})).await;
    assert_error_kind(&schema, "not_found", "no table was created");
}

pub async fn test_accepted_read_shapes() {
    println!("  🧪 test_accepted_read_shapes");
    let ctx = TestContext::setup().await;
    seeded(&ctx, 3).await;

    for sql in [
        "SELECT id FROM tickets",
        "WITH recent AS (SELECT id FROM tickets ORDER BY id DESC) SELECT id FROM recent",
        "SELECT id FROM tickets WHERE project_id = 'even' UNION SELECT id FROM tickets",
        "VALUES (1), (2)",
        "/* leading comment */ SELECT id FROM tickets",
        "SELECT id FROM tickets -- trailing comment",
        "SELECT id FROM tickets;",
    ] {
        let result = ctx.call("run_select", json!({"sql": sql})).await;
        assert_success(&result, sql);
    }
}

pub async fn test_semicolon_inside_string_is_data() {
    println!("  🧪 test_semicolon_inside_string_is_data");
    let ctx = TestContext::setup().await;
    add_ticket(&ctx, "web", "a;b").await;
    add_ticket(&ctx, "web", "c").await;

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT title FROM tickets WHERE title = 'a;b'"}),
        )
        .await;
    assert_success(&result, "semicolon in literal");
    assert_eq!(result.payload["rows"], json!([{"title": "a;b"}]));
}

// =============================================================================
// LIMITS
// =============================================================================

pub async fn test_limit_clamped_to_max_rows() {
    println!("  🧪 test_limit_clamped_to_max_rows");
    let ctx = TestContext::with_query(QueryConfig {
        default_limit: 5,
        max_rows: 10,
        ..QueryConfig::default()
    })
    .await;
    seeded(&ctx, 15).await;

    let result = ctx
        .call("run_select", json!({"sql": "SELECT * FROM tickets", "limit": 5000}))
        .await;
    assert_success(&result, "clamped");
    assert_eq!(result.payload["limit"], 10);
    assert_eq!(result.payload["row_count"], 10);
    assert_eq!(result.payload["truncated"], true);

    let result = ctx
        .call("run_select", json!({"sql": "SELECT * FROM tickets"}))
        .await;
    assert_eq!(result.payload["limit"], 5);
    assert_eq!(result.payload["row_count"], 5);
    assert_eq!(result.payload["truncated"], true);

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT * FROM tickets WHERE project_id = 'odd'", "limit": 10}),
        )
        .await;
    assert_eq!(result.payload["row_count"], 7);
    assert_eq!(result.payload["truncated"], false);

    let result = ctx
        .call("run_select", json!({"sql": "SELECT 1", "limit": 0}))
        .await;
    assert_error_kind(&result, "validation_error", "zero limit");
}

pub async fn test_limit_respects_order_by_and_inner_limit() {
    println!("  🧪 test_limit_respects_order_by_and_inner_limit");
    let ctx = TestContext::setup().await;
    seeded(&ctx, 6).await;

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT id FROM tickets ORDER BY id DESC LIMIT 4", "limit": 2}),
        )
        .await;
    assert_eq!(ids(&result), vec![6, 5]);
    assert_eq!(result.payload["truncated"], true);

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT id FROM tickets ORDER BY id LIMIT 3 OFFSET 1", "limit": 10}),
        )
        .await;
    assert_eq!(ids(&result), vec![2, 3, 4]);
    assert_eq!(result.payload["truncated"], false);
}

// =============================================================================
// PARAMETERS
// =============================================================================

pub async fn test_named_parameters() {
    println!("  🧪 test_named_parameters");
    let ctx = TestContext::setup().await;
    seeded(&ctx, 5).await;

    let result = ctx
        .call(
            "run_select",
            json!({
                "sql": "SELECT COUNT(*) AS n FROM tickets WHERE project_id = :project AND id >= :min",
                "params": {"project": "even", ":min": 2}
            }),
        )
        .await;
    assert_success(&result, "bound");
    assert_eq!(result.payload["rows"], json!([{"n": 2}]));
    assert_eq!(result.payload["columns"], json!(["n"]));

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT * FROM tickets WHERE id = :id"}),
        )
        .await;
    assert_error_kind(&result, "validation_error", "missing value");
    assert_eq!(result.payload["error"]["field"], "params.id");

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT * FROM tickets", "params": {"unused": 1}}),
        )
        .await;
    assert_error_kind(&result, "validation_error", "unused value");

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT * FROM tickets WHERE id = :id", "params": {"id": [1, 2]}}),
        )
        .await;
    assert_error_kind(&result, "validation_error", "array value");
}

pub async fn test_result_shape() {
    println!("  🧪 test_result_shape");
    let ctx = TestContext::setup().await;

    let empty = ctx
        .call("run_select", json!({"sql": "SELECT id, title FROM tickets"}))
        .await;
    assert_eq!(
        empty.payload,
        json!({"columns": ["id", "title"], "rows": [], "row_count": 0, "truncated": false, "limit": 100})
    );

    let values = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT NULL AS blank, 2.5 AS ratio, 'x' AS label, x'cafe' AS raw"}),
        )
        .await;
    assert_eq!(
        values.payload["rows"][0],
        json!({"blank": Value::Null, "ratio": 2.5, "label": "x", "raw": "cafe"})
    );
}

pub async fn test_joined_columns_keep_their_aliases() {
    println!("  🧪 test_joined_columns_keep_their_aliases");
    let ctx = TestContext::setup().await;
    let ticket = add_ticket(&ctx, "alpha", "Joined").await;
    let todo = add_todo(&ctx, ticket, "Child").await;

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT t.id AS ticket_id, d.id AS todo_id \
                           FROM tickets t JOIN todos d ON d.ticket_id = t.id"}),
        )
        .await;
    assert_success(&result, "aliased join");
    assert_eq!(result.payload["columns"], json!(["ticket_id", "todo_id"]));
    assert_eq!(
        result.payload["rows"][0],
        json!({"ticket_id": ticket, "todo_id": todo})
    );

    let result = ctx
        .call(
            "run_select",
            json!({"sql": "SELECT t.id, d.id FROM tickets t JOIN todos d ON d.ticket_id = t.id"}),
        )
        .await;
    assert_success(&result, "unaliased join");
    let columns = result.payload["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 2);
    assert_ne!(columns[0], columns[1]);
}

pub async fn test_engine_errors_are_rejections() {
    println!("  🧪 test_engine_errors_are_rejections");
    let ctx = TestContext::setup().await;

    let result = ctx.call("run_select", json!({"sql": "SELECT * FROM nope"})).await;
    assert_error_kind(&result, "query_rejected", "unknown table");
    let message = result.payload["error"]["message"].as_str().unwrap();
    assert!(message.contains("no such table"), "message: {}", message);
    assert_eq!(result.payload["error"]["field"], "sql");
    assert!(result.payload["error"].get("retryable").is_none());

    let result = ctx
        .call("run_select", json!({"sql": "SELECT missing_column FROM tickets"}))
        .await;
    assert_error_kind(&result, "query_rejected", "unknown column");
    let message = result.payload["error"]["message"].as_str().unwrap();
    assert!(message.contains("no such column"), "message: {}", message);
}

// =============================================================================
// INTROSPECTION
// =============================================================================

pub async fn test_schema_tool() {
    println!("  🧪 test_schema_tool");
    let ctx = TestContext::setup().await;

    let result = ctx.call("schema", json!({"table": "todos"})).await;
    assert_success(&result, "schema");
    assert_eq!(result.payload["table"], "todos");
    assert_eq!(result.payload["primary_key"], json!(["id"]));
    assert_eq!(
        result.payload["foreign_keys"],
        json!([{
            "column": "ticket_id",
            "references_table": "tickets",
            "references_column": "id",
            "on_delete": "CASCADE"
        }])
    );

    let result = ctx.call("schema", json!({"table": "sqlite_master"})).await;
    assert_error_kind(&result, "not_found", "internal table");

    for internal in ["SQLITE_MASTER", "Sqlite_Sequence"] {
        let result = ctx.call("schema", json!({"table": internal})).await;
        assert_error_kind(&result, "not_found", internal);
    }

    let result = ctx.call("schema", json!({"table": "nope"})).await;
    assert_error_kind(&result, "not_found", "unknown table");

    let result = ctx.call("schema", json!({})).await;
    assert_error_kind(&result, "validation_error", "missing table");

    assert_eq!(ctx.store().list_tables().await.unwrap(), vec!["tickets", "todos"]);
}

pub async fn run_all_tests() {
    println!("\n🔍 Running Raw Query Tests\n");

    test_multiple_statements_rejected().await;
    test_writes_rejected().await;
    test_accepted_read_shapes().await;
    test_semicolon_inside_string_is_data().await;

    test_limit_clamped_to_max_rows().await;
    test_limit_respects_order_by_and_inner_limit().await;

    test_named_parameters().await;
    test_result_shape().await;
    test_joined_columns_keep_their_aliases().await;
    test_engine_errors_are_rejections().await;
    test_schema_tool().await;

    println!("\n✅ Raw query tests passed\n");
}
