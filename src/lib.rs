//! Backend service for the marketing-analytics dashboard.
//!
//! Owns the relational schema and its CRUD surface, the ad-platform OAuth
//! and campaign-sync flows, the AI insight/assistant proxies, and an
//! in-process change feed streamed to clients over SSE.

pub mod ai;
pub mod api;
pub mod auth;
pub mod config;
pub mod constants;
pub mod db;
pub mod events;
pub mod models;
pub mod oauth;
pub mod platforms;
pub mod sync;
