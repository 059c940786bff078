//! Study profile.
//!
//! Accumulates credited study time, pays tokens for it, keeps Tamo fed and
//! happy and unlocks achievements along the way.

pub mod achievements;
pub mod pet;
pub mod shop;
pub mod store;

pub use achievements::Achievement;
pub use pet::Pet;
pub use shop::{Food, ShopReceipt};
pub use store::{Profile, ProfileStore, UnlockedAchievement};
