use crate::db::products::ProductCustomization;

const BRANDING: &str = r#" <a href="https://parity.dev" style="color:inherit;text-decoration:underline;">Powered by Parity</a>"#;

pub struct Banner<'a> {
    pub customization: &'a ProductCustomization,
    pub country_name: &'a str,
    pub coupon: &'a str,
    /// Stored as a fraction (0.5 = 50% off).
    pub discount_percentage: f64,
    pub can_remove_branding: bool,
}

/// Builds the embed script served to sales pages: a self-contained snippet
/// that renders the banner div and prepends it to the configured container.
pub fn embed_script(banner: &Banner) -> String {
    let customization = banner.customization;

    let message = customization
        .location_message
        .replace("{country}", &html_escape(banner.country_name))
        .replace("{coupon}", &html_escape(banner.coupon))
        .replace("{discount}", &format_percent(banner.discount_percentage));

    let class_prefix = customization.class_prefix.as_deref().unwrap_or("");
    let position = match customization.is_sticky {
        true => "position:sticky;top:0;",
        false => "",
    };
    let branding = match banner.can_remove_branding {
        true => "",
        false => BRANDING,
    };

    let html = format!(
        r#"<div class="{class_prefix}parity-banner" style="{position}width:100%;text-align:center;padding:0.5rem;background-color:{background};color:{color};font-size:{font_size};">{message}{branding}</div>"#,
        background = html_escape(&customization.background_color),
        color = html_escape(&customization.text_color),
        font_size = html_escape(&customization.font_size),
    );

    format!(
        "const banner = document.createElement(\"div\");\
         banner.innerHTML = '{}';\
         document.querySelector('{}').prepend(...banner.children);",
        js_escape(&html),
        js_escape(&customization.banner_container),
    )
}

/// 0.5 -> "50", 0.125 -> "12.5"
fn format_percent(fraction: f64) -> String {
    let percent = fraction * 100.0;
    if percent.fract() == 0.0 {
        format!("{}", percent as i64)
    } else {
        format!("{percent:.1}")
    }
}

fn html_escape(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#39;".to_string(),
            c => c.to_string(),
        })
        .collect()
}

/// Escape for embedding inside a single-quoted javascript string literal.
fn js_escape(raw: &str) -> String {
    raw.chars()
        .flat_map(|c| match c {
            '\\' => vec!['\\', '\\'],
            '\'' => vec!['\\', '\''],
            '\n' | '\r' => vec![],
            c => vec![c],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customization() -> ProductCustomization {
        ProductCustomization {
            class_prefix: None,
            location_message: "Hello {country}! Use \"{coupon}\" for {discount}% off.".into(),
            background_color: "hsl(193, 82%, 31%)".into(),
            text_color: "hsl(0, 0%, 100%)".into(),
            font_size: "1rem".into(),
            banner_container: "body".into(),
            is_sticky: true,
        }
    }

    #[test]
    fn substitutes_placeholders() {
        let customization = customization();
        let script = embed_script(&Banner {
            customization: &customization,
            country_name: "India",
            coupon: "PARITY50",
            discount_percentage: 0.5,
            can_remove_branding: true,
        });

        assert!(script.contains("Hello India!"));
        assert!(script.contains("PARITY50"));
        assert!(script.contains("50% off"));
        assert!(!script.contains("Powered by Parity"));
    }

    #[test]
    fn branding_stays_for_lower_tiers() {
        let customization = customization();
        let script = embed_script(&Banner {
            customization: &customization,
            country_name: "Brazil",
            coupon: "BR25",
            discount_percentage: 0.25,
            can_remove_branding: false,
        });

        assert!(script.contains("Powered by Parity"));
    }

    #[test]
    fn escapes_for_single_quoted_js() {
        let mut customization = customization();
        customization.location_message = "It's {discount}% off in {country}".into();
        customization.banner_container = "#app's".into();

        let script = embed_script(&Banner {
            customization: &customization,
            country_name: "India",
            coupon: "X",
            discount_percentage: 0.125,
            can_remove_branding: false,
        });

        assert!(script.contains("It\\'s 12.5% off"));
        assert!(script.contains("document.querySelector('#app\\'s')"));
    }

    #[test]
    fn country_names_are_html_escaped() {
        let customization = customization();
        let script = embed_script(&Banner {
            customization: &customization,
            country_name: "<script>alert(1)</script>",
            coupon: "X",
            discount_percentage: 0.1,
            can_remove_branding: true,
        });

        assert!(!script.contains("<script>alert"));
        assert!(script.contains("&lt;script&gt;"));
    }
}
