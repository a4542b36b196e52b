//! HTML shell for the search pages.
//!
//! The real page templates live outside this crate; the server only has to
//! hand the initial search result to whatever renders the page. The default
//! [`ShellRenderer`] produces a bare document with the JSON embedded in a
//! `<script type="application/json">` element for the client to pick up.

use dbbe_search::entity::EntityKind;
use dbbe_search::types::SearchResponse;

/// Element id of the embedded initial data.
pub const INITIAL_DATA_ID: &str = "dbbe-search-data";

/// Renders the search page around the initial result.
pub trait ViewRenderer: Send + Sync {
    /// Returns the full HTML document.
    fn render_search(&self, entity: EntityKind, initial: &SearchResponse) -> String;
}

/// Minimal page embedding the initial data.
#[derive(Debug, Clone, Default)]
pub struct ShellRenderer;

impl ViewRenderer for ShellRenderer {
    fn render_search(&self, entity: EntityKind, initial: &SearchResponse) -> String {
        let data = serde_json::to_string(initial).unwrap_or_else(|_| "{}".to_string());
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Search {path} - DBBE</title>
</head>
<body>
    <div id="dbbe-search" data-entity="{entity}" data-api="/{path}/search_api"></div>
    <script id="{id}" type="application/json">{data}</script>
</body>
</html>
"#,
            path = entity.path(),
            entity = entity,
            id = INITIAL_DATA_ID,
            data = escape_script(&data),
        )
    }
}

/// Escapes JSON for embedding inside a `<script>` element.
///
/// Only `<` needs care: `</script>` or `<!--` in a record name would end
/// the element early.
pub fn escape_script(json: &str) -> String {
    json.replace('<', "\\u003c")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbbe_search::types::SearchPage;
    use serde_json::json;

    #[test]
    fn test_escape_script() {
        assert_eq!(
            escape_script(r#"{"name":"</script>"}"#),
            r#"{"name":"\u003c/script>"}"#
        );
    }

    #[test]
    fn test_shell_embeds_data() {
        let page = SearchPage::new(vec![json!({"id": 1, "name": "Athos"})], 1);
        let initial = SearchResponse::new(page, Default::default());
        let html = ShellRenderer.render_search(EntityKind::Manuscript, &initial);
        assert!(html.contains(r#"data-api="/manuscripts/search_api""#));
        assert!(html.contains(r#""name":"Athos""#));
        assert!(html.contains(INITIAL_DATA_ID));
    }
}
