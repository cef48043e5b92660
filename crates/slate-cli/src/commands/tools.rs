//! `slate tools` command implementation.

use anyhow::Result;
use slate_mcp::ToolRegistry;
use slate_mcp::protocol::ListToolsResponse;

pub fn run(json: bool) -> Result<()> {
    let registry = ToolRegistry::builtin();

    if json {
        let response = ListToolsResponse {
            tools: registry.list().into_iter().cloned().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("🔧 {} tools\n", registry.len());
    for tool in registry.list() {
        let flags = match tool.annotations {
            Some(a) if a.read_only_hint => "read-only",
            Some(a) if a.destructive_hint => "destructive",
            _ => "write",
        };
        println!("  {:<20} [{}]", tool.name, flags);
        if let Some(description) = &tool.description {
            println!("      {}", description);
        }
    }
    Ok(())
}
