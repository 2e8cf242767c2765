use axum::response::Html;

const INDEX_HTML: &str = r#"<h1>PO_INV MT700 MCP Server</h1>
<p>Server is running. Access MCP tools at /mcp or try /generate_mt700?po_number=PO-0001&inv_number=INV-0006</p>
"#;

/// GET / - Static landing page
pub async fn root_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
