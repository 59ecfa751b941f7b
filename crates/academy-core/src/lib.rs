//! Core client library for the Sandpaper Academy backend (session, auth, routing).

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod login;
pub mod nav;
pub mod profile;
pub mod session;
pub mod students;
pub mod users;
