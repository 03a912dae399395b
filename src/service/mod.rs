pub mod card_service;
pub mod notifier;
pub mod remaining_time;
