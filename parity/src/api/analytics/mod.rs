pub mod views_by_country;
