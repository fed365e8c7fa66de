//! Message Handler module: the dispatcher half that processes commands and
//! free text. Resolves the sender's session, matches the event against the
//! current conversation state, delegates to an engine and emits the
//! resulting renders.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info};

use crate::localization::t;
use crate::session::{ConversationState, RequestPurpose, Session};

use super::ui_builder::{self, to_user, user_text, Outbound, Render};
use super::{admin, form, navigation, search, AppState};

pub async fn message_handler(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let chat_id = msg.chat.id;
    let admin_chat = ChatId(state.config.admin_chat_id);

    let Some(text) = msg.text() else {
        debug!(user_id = chat_id.0, "Ignoring non-text message");
        ui_builder::emit(&bot, chat_id, admin_chat, user_text(t("unsupported-message"))).await?;
        return Ok(());
    };

    // The session guard is held for the whole event: no other event for
    // this user interleaves until the handling is done.
    let mut session = state.sessions.acquire(chat_id.0).await;
    refresh_identity(&mut session, &msg);

    info!(user_id = chat_id.0, state = ?session.state, "Handling text message");

    let outbounds = match text.trim() {
        "/start" => navigation::show_categories(state.catalog.as_ref(), &mut session).await,
        "/help" => help_message(),
        "/agent" => form::begin(&mut session, RequestPurpose::LiveAgent, None),
        "/cancel" => cancel(&mut session),
        "/requests" => {
            admin::list_pending(state.store.as_ref(), &state.config, chat_id.0).await
        }
        "/respond" => admin::begin_respond(&state.config, &mut session, chat_id.0),
        trimmed => {
            route_free_text(&bot, chat_id, admin_chat, &state, &mut session, trimmed).await?
        }
    };

    ui_builder::emit(&bot, chat_id, admin_chat, outbounds).await?;

    Ok(())
}

/// Route non-command text by conversation state: an active form or admin
/// slot captures it; anything else is a catalog search.
async fn route_free_text(
    bot: &Bot,
    chat_id: ChatId,
    admin_chat: ChatId,
    state: &AppState,
    session: &mut Session,
    text: &str,
) -> Result<Vec<Outbound>> {
    let outbounds = match session.state {
        ConversationState::CollectingForm { .. } => {
            form::advance(state.catalog.as_ref(), state.store.as_ref(), session, text).await
        }
        ConversationState::AdminAwaitingRequestId => {
            admin::handle_request_id(state.store.as_ref(), session, text).await
        }
        ConversationState::AdminAwaitingResponseText => {
            admin::handle_response_text(state.store.as_ref(), session, chat_id.0, text).await
        }
        _ => {
            // Search can take a moment; show the typing indicator first
            ui_builder::emit(bot, chat_id, admin_chat, to_user(Render::Typing)).await?;
            search::run(state.catalog.as_ref(), session, text).await
        }
    };
    Ok(outbounds)
}

fn refresh_identity(session: &mut Session, msg: &Message) {
    if let Some(username) = msg.from.as_ref().and_then(|user| user.username.clone()) {
        session.username = Some(username);
    }
}

fn cancel(session: &mut Session) -> Vec<Outbound> {
    if session.state == ConversationState::Idle {
        return user_text(t("nothing-to-cancel"));
    }
    session.reset();
    user_text(t("cancelled"))
}

fn help_message() -> Vec<Outbound> {
    let help = [
        t("welcome-title"),
        t("welcome-description"),
        t("welcome-commands"),
        t("welcome-start"),
        t("welcome-agent"),
        t("welcome-cancel"),
        t("welcome-help"),
    ]
    .join("\n");
    user_text(help)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_resets_active_flow() {
        let mut session = Session::new(42);
        session.state = ConversationState::CollectingForm {
            purpose: RequestPurpose::Purchase,
            slot: 2,
        };
        session.set_field("name", "Jane");

        let outbounds = cancel(&mut session);

        assert_eq!(session.state, ConversationState::Idle);
        assert!(session.fields.is_empty());
        assert_eq!(outbounds.len(), 1);
    }

    #[test]
    fn test_cancel_when_idle_changes_nothing() {
        let mut session = Session::new(42);

        let outbounds = cancel(&mut session);

        assert_eq!(session.state, ConversationState::Idle);
        assert_eq!(outbounds, user_text(t("nothing-to-cancel")));
    }
}
