#[derive(sqlx::Type, serde::Serialize, serde::Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Basic,
    Standard,
    Premium,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct TierLimits {
    pub max_products: i64,
    pub max_visits_per_month: i64,
    pub can_access_analytics: bool,
    pub can_customize_banner: bool,
    pub can_remove_branding: bool,
}

impl Tier {
    pub fn limits(self) -> &'static TierLimits {
        match self {
            Tier::Free => &TierLimits {
                max_products: 1,
                max_visits_per_month: 5_000,
                can_access_analytics: false,
                can_customize_banner: false,
                can_remove_branding: false,
            },
            Tier::Basic => &TierLimits {
                max_products: 5,
                max_visits_per_month: 10_000,
                can_access_analytics: true,
                can_customize_banner: false,
                can_remove_branding: false,
            },
            Tier::Standard => &TierLimits {
                max_products: 30,
                max_visits_per_month: 100_000,
                can_access_analytics: true,
                can_customize_banner: true,
                can_remove_branding: false,
            },
            Tier::Premium => &TierLimits {
                max_products: 50,
                max_visits_per_month: 1_000_000,
                can_access_analytics: true,
                can_customize_banner: true,
                can_remove_branding: true,
            },
        }
    }
}
