use cache::TagName;

pub const PRODUCTS: TagName = "products";
pub const PRODUCT_VIEWS: TagName = "product_views";
pub const SUBSCRIPTIONS: TagName = "subscriptions";
pub const COUNTRIES: TagName = "countries";
pub const COUNTRY_GROUPS: TagName = "country_groups";
