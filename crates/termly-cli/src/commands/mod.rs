pub mod add;
pub mod agenda;
pub mod delete;
pub mod list;
pub mod progress;
pub mod remind;
pub mod schedule;
