pub mod banner;
pub mod permissions;
pub mod principal;
pub mod tiers;
pub mod validate;
