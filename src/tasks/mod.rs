pub mod clock;
pub mod reminder_loop;
