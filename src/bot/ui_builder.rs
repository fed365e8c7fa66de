//! UI Builder module: render instructions, keyboard construction, and the
//! transport adapter that turns them into Telegram calls.
//!
//! Engines never talk to the transport. They return [`Outbound`] values and
//! the dispatcher passes them to [`emit`], which is the only place that
//! knows about teloxide send calls, keyboards and delivery failures.

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{ChatAction, InlineKeyboardButton, InlineKeyboardMarkup};
use tracing::warn;

/// Telegram caps button labels; longer ones are cut with an ellipsis.
const MAX_BUTTON_LABEL: usize = 48;

/// One render instruction produced by an engine
#[derive(Debug, Clone, PartialEq)]
pub enum Render {
    /// Plain text message
    Text(String),
    /// Text with a one-button-per-row selectable menu of
    /// `(label, callback payload)` pairs
    Menu {
        text: String,
        buttons: Vec<(String, String)>,
    },
    /// Typing indicator ahead of a slow fetch
    Typing,
}

/// A render instruction with an addressee
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    /// To the user whose event is being handled
    ToUser(Render),
    /// Best-effort notification to the configured admin
    ToAdmin(Render),
    /// Best-effort direct delivery to some other chat. When delivery fails
    /// and `failure_notice` is set, the notice is sent to the event's
    /// originator instead of rolling anything back.
    ToChat {
        chat_id: i64,
        render: Render,
        failure_notice: Option<String>,
    },
}

pub fn to_user(render: Render) -> Vec<Outbound> {
    vec![Outbound::ToUser(render)]
}

pub fn user_text(text: String) -> Vec<Outbound> {
    to_user(Render::Text(text))
}

/// Build the inline keyboard for a menu render
pub fn menu_keyboard(buttons: &[(String, String)]) -> InlineKeyboardMarkup {
    let rows = buttons
        .iter()
        .map(|(label, payload)| {
            vec![InlineKeyboardButton::callback(
                truncate_label(label),
                payload.clone(),
            )]
        })
        .collect::<Vec<_>>();

    InlineKeyboardMarkup::new(rows)
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_BUTTON_LABEL {
        let cut: String = label.chars().take(MAX_BUTTON_LABEL - 3).collect();
        format!("{}...", cut.trim_end())
    } else {
        label.to_string()
    }
}

async fn send_render(bot: &Bot, chat: ChatId, render: Render) -> Result<()> {
    match render {
        Render::Typing => {
            bot.send_chat_action(chat, ChatAction::Typing).await?;
        }
        Render::Text(text) => {
            bot.send_message(chat, text).await?;
        }
        Render::Menu { text, buttons } => {
            bot.send_message(chat, text)
                .reply_markup(menu_keyboard(&buttons))
                .await?;
        }
    }
    Ok(())
}

/// Deliver a batch of render instructions.
///
/// Failures sending to the originating user propagate; admin notifications
/// and direct deliveries are best-effort and reported without rollback.
pub async fn emit(
    bot: &Bot,
    origin: ChatId,
    admin_chat: ChatId,
    outbounds: Vec<Outbound>,
) -> Result<()> {
    for outbound in outbounds {
        match outbound {
            Outbound::ToUser(render) => send_render(bot, origin, render).await?,
            Outbound::ToAdmin(render) => {
                if let Err(e) = send_render(bot, admin_chat, render).await {
                    warn!(error = %e, "Admin notification could not be delivered");
                }
            }
            Outbound::ToChat {
                chat_id,
                render,
                failure_notice,
            } => {
                if let Err(e) = send_render(bot, ChatId(chat_id), render).await {
                    warn!(chat_id, error = %e, "Direct delivery failed");
                    if let Some(notice) = failure_notice {
                        bot.send_message(origin, notice).await?;
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_keyboard_one_button_per_row() {
        let buttons = vec![
            ("Phones".to_string(), "category:5".to_string()),
            ("Tablets".to_string(), "category:9".to_string()),
        ];

        let keyboard = menu_keyboard(&buttons);
        assert_eq!(keyboard.inline_keyboard.len(), 2);
        assert_eq!(keyboard.inline_keyboard[0].len(), 1);
        assert_eq!(keyboard.inline_keyboard[0][0].text, "Phones");
    }

    #[test]
    fn test_long_labels_are_truncated() {
        let label = "a".repeat(80);
        let truncated = truncate_label(&label);
        assert!(truncated.chars().count() <= MAX_BUTTON_LABEL);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn test_short_labels_untouched() {
        assert_eq!(truncate_label("Galaxy S24"), "Galaxy S24");
    }
}
