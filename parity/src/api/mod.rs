pub mod analytics;
pub mod banner;
pub mod heartbeat;
pub mod products;
pub mod subscription;
pub mod users;
