mod digest;
mod link;
mod user;

pub use digest::Digest;
pub use link::Link;
pub use user::{User, TIER_FREE, TIER_PAID};
