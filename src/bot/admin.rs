//! Admin Flow: identity-gated listing of pending requests and the two-slot
//! respond sub-flow. Every entry point checks the sender against the
//! configured admin identity before touching a collaborator.

use tracing::{info, warn};

use crate::config::Config;
use crate::localization::{t, t_args};
use crate::requests::{Request, RequestStoreApi};
use crate::session::{ConversationState, Session};

use super::ui_builder::{user_text, Outbound, Render};

/// Ceiling for one outbound message, kept under the transport's 4096-char
/// limit with headroom. Chunk boundaries never split a request's block.
const MESSAGE_CHUNK_LIMIT: usize = 3500;

const FIELD_REQUEST_ID: &str = "request_id";
const FIELD_TARGET_USER: &str = "target_user_id";

fn denied() -> Vec<Outbound> {
    user_text(t("permission-denied"))
}

/// List all pending (unanswered) requests for the admin.
pub async fn list_pending(
    store: &dyn RequestStoreApi,
    config: &Config,
    sender_id: i64,
) -> Vec<Outbound> {
    if !config.is_admin(sender_id) {
        warn!(sender_id, "Non-admin attempted to list requests");
        return denied();
    }

    let pending: Vec<Request> = store
        .list_requests()
        .await
        .into_iter()
        .filter(|request| !request.is_responded)
        .collect();

    if pending.is_empty() {
        return user_text(t("admin-no-pending"));
    }

    let blocks: Vec<String> = pending.iter().map(format_request_block).collect();
    let mut outbounds = user_text(t("admin-pending-header"));
    for chunk in chunk_blocks(&blocks, MESSAGE_CHUNK_LIMIT) {
        outbounds.push(Outbound::ToUser(Render::Text(chunk)));
    }
    outbounds
}

/// Start the respond sub-flow by prompting for a request id.
pub fn begin_respond(config: &Config, session: &mut Session, sender_id: i64) -> Vec<Outbound> {
    if !config.is_admin(sender_id) {
        warn!(sender_id, "Non-admin attempted to respond");
        return denied();
    }

    session.fields.clear();
    session.state = ConversationState::AdminAwaitingRequestId;
    user_text(t("admin-respond-prompt"))
}

/// Resolve the request id the admin typed. A miss aborts the sub-flow.
pub async fn handle_request_id(
    store: &dyn RequestStoreApi,
    session: &mut Session,
    text: &str,
) -> Vec<Outbound> {
    let Ok(request_id) = text.trim().parse::<i64>() else {
        session.reset();
        return user_text(t("admin-invalid-id"));
    };

    let Some(request) = store.get_request(request_id).await else {
        session.reset();
        return user_text(t("admin-request-not-found"));
    };

    session.set_field(FIELD_REQUEST_ID, request.id.to_string());
    session.set_field(FIELD_TARGET_USER, request.user_id.to_string());
    session.state = ConversationState::AdminAwaitingResponseText;

    user_text(t_args(
        "admin-responding-to",
        &[
            ("id", request.id.to_string().as_str()),
            ("user", display_name(&request).as_str()),
        ],
    ))
}

/// Persist the admin's response and attempt direct delivery to the original
/// requester. Delivery failure is reported distinctly and never rolls back
/// the persisted message.
pub async fn handle_response_text(
    store: &dyn RequestStoreApi,
    session: &mut Session,
    sender_id: i64,
    text: &str,
) -> Vec<Outbound> {
    let content = text.trim();
    if content.is_empty() {
        return user_text(t("form-empty-input"));
    }

    let (Some(request_id), Some(target_user)) = (
        session.field(FIELD_REQUEST_ID).and_then(|id| id.parse::<i64>().ok()),
        session
            .field(FIELD_TARGET_USER)
            .and_then(|id| id.parse::<i64>().ok()),
    ) else {
        session.reset();
        return user_text(t("action-unavailable"));
    };

    let result = store.create_message(request_id, sender_id, content).await;
    session.reset();

    match result {
        Ok(message) => {
            info!(request_id, message_id = message.id, "Admin response logged");
            let delivery = format!(
                "{}\n{}",
                t_args("user-response-received", &[("id", request_id.to_string().as_str())]),
                content
            );
            vec![
                Outbound::ToChat {
                    chat_id: target_user,
                    render: Render::Text(delivery),
                    failure_notice: Some(t("admin-response-not-delivered")),
                },
                Outbound::ToUser(Render::Text(t("admin-response-saved"))),
            ]
        }
        Err(e) => {
            warn!(request_id, error = %e, "Admin response could not be saved");
            user_text(t("admin-save-failed"))
        }
    }
}

fn display_name(request: &Request) -> String {
    match &request.username {
        Some(username) => format!("{} (@{})", request.name, username),
        None => request.name.clone(),
    }
}

/// Render one request as a self-contained block for the pending list
fn format_request_block(request: &Request) -> String {
    let mut block = format!("#{} — {}", request.id, display_name(request));
    block.push_str(&format!("\nPhone: {}", request.phone));
    block.push_str(&format!("\nAddress: {}", request.address));
    if let Some(item_id) = request.item_id {
        block.push_str(&format!("\nItem: #{}", item_id));
    }
    if let Some(notes) = &request.additional_text {
        block.push_str(&format!("\nNotes: {}", notes));
    }
    block
}

/// Pack blocks into messages of at most `limit` characters without ever
/// splitting one block across two messages. A single oversized block gets
/// a message of its own.
fn chunk_blocks(blocks: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for block in blocks {
        if current.is_empty() {
            current = block.clone();
        } else if current.len() + 2 + block.len() <= limit {
            current.push_str("\n\n");
            current.push_str(block);
        } else {
            chunks.push(current);
            current = block.clone();
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
