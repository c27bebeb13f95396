pub mod chat;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod ical;
pub mod league;
pub mod model;
pub mod reminder;
pub mod roster;
pub mod seed;
pub mod webhook;
