//! HTTP route handlers.

pub mod auth;
pub mod campaigns;
pub mod characters;
pub mod downtime;
pub mod health;
pub mod invites;
pub mod join;
pub mod npcs;
pub mod quests;
pub mod sessions;
