//! Navigation Engine: one tier-parameterized drill-down through the catalog
//! hierarchy, replacing per-tier dispatch arms with a single `advance`.

use tracing::debug;

use crate::catalog::{CatalogApi, CatalogEntry, Tier};
use crate::localization::{t, t_args};
use crate::session::{ConversationState, Session};

use super::payload::CallbackPayload;
use super::ui_builder::{to_user, user_text, Outbound, Render};

fn choose_prompt(tier: Tier) -> String {
    t(match tier {
        Tier::Category => "choose-category",
        Tier::Subcategory => "choose-subcategory",
        Tier::Brand => "choose-brand",
        Tier::Model => "choose-model",
        Tier::Item => "choose-item",
    })
}

fn nothing_available(tier: Tier) -> String {
    t(match tier {
        Tier::Category => "no-categories",
        Tier::Subcategory => "no-subcategories",
        Tier::Brand => "no-brands",
        Tier::Model => "no-models",
        Tier::Item => "no-items",
    })
}

fn tier_menu(tier: Tier, entries: &[CatalogEntry]) -> Render {
    Render::Menu {
        text: choose_prompt(tier),
        buttons: entries
            .iter()
            .map(|entry| (entry.name.clone(), CallbackPayload::select(tier, entry.id).encode()))
            .collect(),
    }
}

/// Render the top-level category menu (the `/start` entry point).
///
/// An empty catalog is a terminal, non-fatal condition: the message is
/// rendered and the session is left as it was.
pub async fn show_categories(catalog: &dyn CatalogApi, session: &mut Session) -> Vec<Outbound> {
    let categories = catalog.list_categories().await;
    if categories.is_empty() {
        return user_text(nothing_available(Tier::Category));
    }

    session.state = ConversationState::AwaitingSelection(Tier::Category);
    to_user(tier_menu(Tier::Category, &categories))
}

/// Enter the tier `entering` below the selection `parent_id`.
///
/// A non-empty child listing renders the next menu and advances the session;
/// an empty one renders "nothing available" and leaves the session at the
/// prior menu, which stays usable.
pub async fn advance(
    catalog: &dyn CatalogApi,
    session: &mut Session,
    entering: Tier,
    parent_id: i64,
) -> Vec<Outbound> {
    let children = match entering {
        Tier::Category => catalog.list_categories().await,
        Tier::Subcategory => catalog.list_subcategories(parent_id).await,
        Tier::Brand => catalog.list_brands(parent_id).await,
        Tier::Model => catalog.list_models(parent_id).await,
        Tier::Item => catalog.list_items(parent_id).await,
    };

    debug!(
        user_id = session.user_id,
        tier = entering.tag(),
        parent_id,
        children = children.len(),
        "Catalog tier fetched"
    );

    if children.is_empty() {
        return user_text(nothing_available(entering));
    }

    session.state = ConversationState::AwaitingSelection(entering);
    to_user(tier_menu(entering, &children))
}

/// Enter the detail view for a selected item: detail and stock are fetched
/// independently and merged into one render with a follow-up request button.
pub async fn item_detail(
    catalog: &dyn CatalogApi,
    session: &mut Session,
    item_id: i64,
) -> Vec<Outbound> {
    let detail = catalog.get_item(item_id).await;
    let stock = catalog.get_stock(item_id).await;

    let Some(detail) = detail else {
        return user_text(t("detail-no-details"));
    };

    let mut lines = vec![detail.name.clone()];
    if let Some(brand) = &detail.brand {
        match &detail.model {
            Some(model) => lines.push(format!("{} {}", brand, model)),
            None => lines.push(brand.clone()),
        }
    }
    if let Some(description) = &detail.description {
        lines.push(description.clone());
    }
    if let Some(price) = detail.price {
        lines.push(t_args("detail-price", &[("price", &format!("{:.2}", price))]));
    }
    match stock {
        Some(stock) => {
            lines.push(t_args("detail-stock", &[("quantity", &stock.quantity.to_string())]));
            let available = if stock.is_available { t("yes") } else { t("no") };
            lines.push(t_args("detail-available", &[("available", &available)]));
        }
        None => lines.push(t("detail-stock-unknown")),
    }

    session.state = ConversationState::ItemDetail;
    session.set_field("item_id", item_id.to_string());

    to_user(Render::Menu {
        text: lines.join("\n"),
        buttons: vec![(
            t("request-item-button"),
            CallbackPayload::RequestItem { item_id }.encode(),
        )],
    })
}
