pub mod product_views;
pub mod products;
pub mod subscriptions;
pub mod tags;
