pub mod appointment;
pub mod lead_time;
pub mod locale;
