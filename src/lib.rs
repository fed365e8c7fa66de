//! # Storefront Telegram Bot
//!
//! A Telegram bot that lets users browse a product catalog tier by tier
//! (category → subcategory → brand → model → item), check stock, and submit
//! purchase or live-agent requests that are routed to a human admin.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod localization;
pub mod requests;
pub mod session;
