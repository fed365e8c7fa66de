//! Catalog full-text search for free text typed outside any active flow.
//! Stateless relative to the session machine: the session ends up idle
//! whatever the outcome, and search results render as item buttons.

use tracing::debug;

use crate::catalog::{CatalogApi, Tier};
use crate::localization::t_args;
use crate::session::Session;

use super::payload::CallbackPayload;
use super::ui_builder::{Outbound, Render};

/// Per-item detail re-fetches are bounded; hits beyond this render with
/// their plain name.
const ENRICH_LIMIT: usize = 10;

pub async fn run(catalog: &dyn CatalogApi, session: &mut Session, query: &str) -> Vec<Outbound> {
    session.reset();

    let hits = catalog.search(query).await;
    debug!(user_id = session.user_id, query, hits = hits.len(), "Catalog search");

    if hits.is_empty() {
        return vec![Outbound::ToUser(Render::Text(t_args(
            "search-no-matches",
            &[("query", query)],
        )))];
    }

    let mut buttons = Vec::with_capacity(hits.len());
    for (index, hit) in hits.iter().enumerate() {
        let label = match (&hit.brand, &hit.model) {
            // The search endpoint embedded the names; no re-fetch needed
            (Some(brand), Some(model)) => format!("{} — {} {}", hit.name, brand, model),
            _ if index < ENRICH_LIMIT => enriched_label(catalog, hit.id, &hit.name).await,
            _ => hit.name.clone(),
        };
        buttons.push((label, CallbackPayload::select(Tier::Item, hit.id).encode()));
    }

    vec![Outbound::ToUser(Render::Menu {
        text: t_args("search-results", &[("query", query)]),
        buttons,
    })]
}

async fn enriched_label(catalog: &dyn CatalogApi, item_id: i64, name: &str) -> String {
    match catalog.get_item(item_id).await {
        Some(detail) => match (&detail.brand, &detail.model) {
            (Some(brand), Some(model)) => format!("{} — {} {}", name, brand, model),
            (Some(brand), None) => format!("{} — {}", name, brand),
            _ => name.to_string(),
        },
        None => name.to_string(),
    }
}
