//! Callback Handler module: the dispatcher half that processes inline
//! keyboard taps. Decodes the payload at the boundary, validates it against
//! the conversation state and delegates to the navigation or form engine.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, warn};

use crate::catalog::Tier;
use crate::localization::t;
use crate::session::{ConversationState, RequestPurpose, Session};

use super::payload::CallbackPayload;
use super::ui_builder::{self, to_user, user_text, Outbound, Render};
use super::{form, navigation, AppState};

pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    state: Arc<AppState>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query");

    let Some(msg) = &q.message else {
        // Nothing to act on without the originating chat
        bot.answer_callback_query(q.id).await?;
        return Ok(());
    };
    let chat_id = msg.chat().id;
    let admin_chat = ChatId(state.config.admin_chat_id);

    let mut session = state.sessions.acquire(chat_id.0).await;
    if let Some(username) = &q.from.username {
        session.username = Some(username.clone());
    }

    let data = q.data.as_deref().unwrap_or("");
    let outbounds = match CallbackPayload::decode(data) {
        Some(payload) => {
            ui_builder::emit(&bot, chat_id, admin_chat, to_user(Render::Typing)).await?;
            dispatch(&state, &mut session, payload).await
        }
        None => {
            warn!(user_id = chat_id.0, data, "Undecodable callback payload");
            user_text(t("action-unavailable"))
        }
    };

    ui_builder::emit(&bot, chat_id, admin_chat, outbounds).await?;

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

/// Match the decoded tap against the conversation state. A tap that does
/// not fit the state is answered with a notice and changes nothing.
async fn dispatch(
    state: &AppState,
    session: &mut Session,
    payload: CallbackPayload,
) -> Vec<Outbound> {
    match payload {
        CallbackPayload::Select { tier: Tier::Item, id } => {
            // Item taps are valid from the item menu and from search
            // results, which render while the session is idle.
            let accepted = matches!(
                session.state,
                ConversationState::AwaitingSelection(Tier::Item) | ConversationState::Idle
            );
            if !accepted {
                return stale_tap(session);
            }
            navigation::item_detail(state.catalog.as_ref(), session, id).await
        }
        CallbackPayload::Select { tier, id } => {
            if session.state != ConversationState::AwaitingSelection(tier) {
                return stale_tap(session);
            }
            let Some(entering) = tier.child() else {
                return stale_tap(session);
            };
            navigation::advance(state.catalog.as_ref(), session, entering, id).await
        }
        CallbackPayload::RequestItem { item_id } => {
            if session.state != ConversationState::ItemDetail {
                return stale_tap(session);
            }
            form::begin(session, RequestPurpose::Purchase, Some(item_id))
        }
    }
}

fn stale_tap(session: &Session) -> Vec<Outbound> {
    debug!(user_id = session.user_id, state = ?session.state, "Tap does not match state");
    user_text(t("action-unavailable"))
}
