//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod campaign;
pub mod character;
pub mod downtime;
pub mod invite;
pub mod npc;
pub mod party_member;
pub mod quest;
pub mod session_log;
pub mod user;

pub use campaign::CampaignEntity;
pub use character::CharacterEntity;
pub use downtime::DowntimeActivityEntity;
pub use invite::{CampaignInviteEntity, InviteWithCampaignEntity};
pub use npc::NpcEntity;
pub use party_member::{PartyMemberEntity, PartyMemberWithCharacterEntity};
pub use quest::QuestEntity;
pub use session_log::SessionLogEntity;
pub use user::UserEntity;
