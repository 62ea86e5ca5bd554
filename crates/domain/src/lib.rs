//! Domain layer for the Tavern backend.
//!
//! This crate contains:
//! - Domain models (Campaign, Character, CampaignInvite, PartyMember)
//! - Ownership resolution (`OwnerRef`)
//! - Pure business rules (invite usability)

pub mod models;
