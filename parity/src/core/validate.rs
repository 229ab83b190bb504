pub fn validate_product_name<T: AsRef<str>>(name: T) -> Result<T, &'static str> {
    let name_ref = name.as_ref().trim();

    if name_ref.is_empty() {
        return Err("product name must not be empty");
    }

    if name_ref.len() > 120 {
        return Err("product name must be at most 120 characters");
    }

    Ok(name)
}

pub fn validate_product_url<T: AsRef<str>>(url: T) -> Result<T, &'static str> {
    let url_ref = url.as_ref();

    if !url_ref.starts_with("http://") && !url_ref.starts_with("https://") {
        return Err("product url must start with http:// or https://");
    }

    if url_ref.len() > 2048 {
        return Err("product url must be at most 2048 characters");
    }

    Ok(url)
}

pub fn validate_coupon<T: AsRef<str>>(coupon: T) -> Result<T, &'static str> {
    let coupon_ref = coupon.as_ref();

    if coupon_ref.is_empty() {
        return Err("coupon must not be empty");
    }

    if coupon_ref.len() > 40 {
        return Err("coupon must be at most 40 characters");
    }

    if coupon_ref.chars().any(char::is_whitespace) {
        return Err("coupon must not contain whitespace");
    }

    Ok(coupon)
}

/// Discounts arrive as whole percentages (1-100) and are stored as fractions.
pub fn validate_discount_percentage(percentage: f64) -> Result<f64, &'static str> {
    if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
        return Err("discount percentage must be between 0 and 100");
    }

    Ok(percentage)
}

pub fn validate_banner_container<T: AsRef<str>>(selector: T) -> Result<T, &'static str> {
    let selector_ref = selector.as_ref().trim();

    if selector_ref.is_empty() {
        return Err("banner container selector must not be empty");
    }

    if selector_ref.len() > 200 {
        return Err("banner container selector must be at most 200 characters");
    }

    Ok(selector)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_name_bounds() {
        assert!(validate_product_name("PPP Course").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name("x".repeat(121)).is_err());
    }

    #[test]
    fn product_url_scheme() {
        assert!(validate_product_url("https://example.com/course").is_ok());
        assert!(validate_product_url("http://example.com").is_ok());
        assert!(validate_product_url("ftp://example.com").is_err());
        assert!(validate_product_url("example.com").is_err());
    }

    #[test]
    fn coupon_shape() {
        assert!(validate_coupon("PARITY50").is_ok());
        assert!(validate_coupon("").is_err());
        assert!(validate_coupon("HAS SPACE").is_err());
    }

    #[test]
    fn discount_range() {
        assert!(validate_discount_percentage(50.0).is_ok());
        assert!(validate_discount_percentage(100.0).is_ok());
        assert!(validate_discount_percentage(0.0).is_err());
        assert!(validate_discount_percentage(-5.0).is_err());
        assert!(validate_discount_percentage(101.0).is_err());
        assert!(validate_discount_percentage(f64::NAN).is_err());
    }
}
