//! Domain models for Tavern.

use serde::{Deserialize, Deserializer};

pub mod campaign;
pub mod character;
pub mod downtime;
pub mod invite;
pub mod npc;
pub mod owner;
pub mod party_member;
pub mod quest;
pub mod session_log;
pub mod user;

pub use campaign::Campaign;
pub use character::Character;
pub use invite::CampaignInvite;
pub use owner::{Identity, OwnerRef};
pub use party_member::PartyMember;

/// Deserializer for update-request fields where an explicit `null` clears
/// the stored value. An absent field deserializes to `None` (leave
/// unchanged), `null` to `Some(None)` (clear). Pair with
/// `#[serde(default, deserialize_with = "...")]`.
pub(crate) fn clearable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
