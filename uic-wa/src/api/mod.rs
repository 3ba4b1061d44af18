//! HTTP surface: Twilio webhook, cleanup trigger, health endpoints

mod health;
mod webhook;

pub use health::{health_check, health_routes, service_info};
pub use webhook::{cleanup_sessions, whatsapp_webhook};
