//! Form Engine: a strictly ordered field-collection pipeline with one
//! active slot at a time, finalized by a request store submission.

use tracing::{error, info};

use crate::catalog::CatalogApi;
use crate::localization::{t, t_args};
use crate::requests::{NewRequest, RequestStoreApi};
use crate::session::{ConversationState, RequestPurpose, Session};

use super::ui_builder::{Outbound, Render};

/// One field-collection step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Name,
    Phone,
    Address,
    AdditionalText,
}

impl Slot {
    pub fn field_name(self) -> &'static str {
        match self {
            Slot::Name => "name",
            Slot::Phone => "phone",
            Slot::Address => "address",
            Slot::AdditionalText => "additional_text",
        }
    }

    fn prompt_key(self) -> &'static str {
        match self {
            Slot::Name => "form-name-prompt",
            Slot::Phone => "form-phone-prompt",
            Slot::Address => "form-address-prompt",
            Slot::AdditionalText => "form-notes-prompt",
        }
    }

    /// Per-slot validation hook. Only non-empty is required; stricter
    /// checks (phone patterns and the like) slot in here per variant.
    pub fn validate(self, input: &str) -> Result<String, &'static str> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err("form-empty-input");
        }
        Ok(trimmed.to_string())
    }
}

impl RequestPurpose {
    /// The ordered slot pipeline for this purpose
    pub fn slots(self) -> &'static [Slot] {
        match self {
            RequestPurpose::Purchase => &[Slot::Name, Slot::Phone, Slot::Address],
            RequestPurpose::LiveAgent => {
                &[Slot::Name, Slot::Phone, Slot::Address, Slot::AdditionalText]
            }
        }
    }
}

fn intro_key(purpose: RequestPurpose) -> &'static str {
    match purpose {
        RequestPurpose::Purchase => "form-intro-purchase",
        RequestPurpose::LiveAgent => "form-intro-agent",
    }
}

/// Start a form flow: prior captured fields are dropped, purchase context
/// is pinned, and the first slot is prompted.
pub fn begin(session: &mut Session, purpose: RequestPurpose, item_id: Option<i64>) -> Vec<Outbound> {
    session.fields.clear();
    if let Some(item_id) = item_id {
        session.set_field("item_id", item_id.to_string());
    }
    session.state = ConversationState::CollectingForm { purpose, slot: 0 };

    let first = purpose.slots()[0];
    vec![
        Outbound::ToUser(Render::Text(t(intro_key(purpose)))),
        Outbound::ToUser(Render::Text(t(first.prompt_key()))),
    ]
}

/// Feed one free-text message into the active slot. Invalid input
/// re-prompts the same slot; the last slot triggers completion.
pub async fn advance(
    catalog: &dyn CatalogApi,
    store: &dyn RequestStoreApi,
    session: &mut Session,
    text: &str,
) -> Vec<Outbound> {
    let ConversationState::CollectingForm { purpose, slot } = session.state else {
        return vec![Outbound::ToUser(Render::Text(t("action-unavailable")))];
    };

    let slots = purpose.slots();
    let current = slots[slot];

    let value = match current.validate(text) {
        Ok(value) => value,
        Err(key) => {
            return vec![
                Outbound::ToUser(Render::Text(t(key))),
                Outbound::ToUser(Render::Text(t(current.prompt_key()))),
            ];
        }
    };
    session.set_field(current.field_name(), value);

    if slot + 1 < slots.len() {
        let next = slots[slot + 1];
        session.state = ConversationState::CollectingForm {
            purpose,
            slot: slot + 1,
        };
        return vec![Outbound::ToUser(Render::Text(t(next.prompt_key())))];
    }

    complete(catalog, store, session, purpose).await
}

/// Submit the completed form. The session returns to idle regardless of
/// the submission outcome; a failed submission is rendered distinctly and
/// the user restarts from scratch.
async fn complete(
    catalog: &dyn CatalogApi,
    store: &dyn RequestStoreApi,
    session: &mut Session,
    purpose: RequestPurpose,
) -> Vec<Outbound> {
    let item_id = session.field("item_id").and_then(|id| id.parse::<i64>().ok());

    // Purchase requests carry a product summary for the admin notification,
    // re-fetched so the notification reflects the catalog at submission time.
    let item_label = match (purpose, item_id) {
        (RequestPurpose::Purchase, Some(item_id)) => Some(describe_item(catalog, item_id).await),
        _ => None,
    };

    let new = NewRequest {
        user_id: session.user_id,
        username: session.username.clone(),
        name: session.field("name").unwrap_or_default().to_string(),
        phone: session.field("phone").unwrap_or_default().to_string(),
        address: session.field("address").unwrap_or_default().to_string(),
        additional_text: session.field("additional_text").map(str::to_string),
        item_id: match purpose {
            RequestPurpose::Purchase => item_id,
            RequestPurpose::LiveAgent => None,
        },
    };

    let result = store.create_request(new).await;
    session.reset();

    match result {
        Ok(request) => {
            info!(
                user_id = session.user_id,
                request_id = request.id,
                purpose = ?purpose,
                "Request submitted"
            );
            vec![
                Outbound::ToUser(Render::Text(t_args(
                    "form-submitted",
                    &[("id", &request.id.to_string())],
                ))),
                Outbound::ToAdmin(Render::Text(admin_notification(&request, purpose, item_label))),
            ]
        }
        Err(e) => {
            error!(user_id = session.user_id, error = %e, "Request submission failed");
            vec![Outbound::ToUser(Render::Text(t("form-failed")))]
        }
    }
}

async fn describe_item(catalog: &dyn CatalogApi, item_id: i64) -> String {
    match catalog.get_item(item_id).await {
        Some(detail) => match (&detail.brand, &detail.model) {
            (Some(brand), Some(model)) => format!("{} ({} {})", detail.name, brand, model),
            _ => detail.name,
        },
        None => format!("#{}", item_id),
    }
}

fn admin_notification(
    request: &crate::requests::Request,
    purpose: RequestPurpose,
    item_label: Option<String>,
) -> String {
    let user = request
        .username
        .as_ref()
        .map(|u| format!("@{}", u))
        .unwrap_or_else(|| request.user_id.to_string());

    let header_key = match purpose {
        RequestPurpose::Purchase => "admin-new-purchase",
        RequestPurpose::LiveAgent => "admin-new-agent",
    };

    let mut lines = vec![t_args(
        header_key,
        &[("id", &request.id.to_string()), ("user", &user)],
    )];
    if let Some(item) = item_label {
        lines.push(t_args("admin-request-item", &[("item", &item)]));
    }
    lines.push(t_args(
        "admin-contact",
        &[
            ("name", request.name.as_str()),
            ("phone", request.phone.as_str()),
            ("address", request.address.as_str()),
        ],
    ));
    if let Some(notes) = &request.additional_text {
        lines.push(t_args("admin-notes", &[("notes", notes)]));
    }

    lines.join("\n")
}
