//! HTTP request handlers

pub mod dashboard;
pub mod details;
pub mod employees;
pub mod health;
pub mod live_search;
pub mod records;
pub mod spotlight;
pub mod uploads;
pub mod users;
