//! Repository implementations for database operations.

pub mod campaign;
pub mod character;
pub mod downtime;
pub mod invite;
pub mod npc;
pub mod party_member;
pub mod quest;
pub mod session_log;
pub mod user;

pub use campaign::CampaignRepository;
pub use character::CharacterRepository;
pub use downtime::DowntimeRepository;
pub use invite::InviteRepository;
pub use npc::NpcRepository;
pub use party_member::{JoinOutcome, PartyMemberRepository};
pub use quest::QuestRepository;
pub use session_log::SessionLogRepository;
pub use user::UserRepository;
