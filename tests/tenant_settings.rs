use dancy_meals::{
    dto::tenants::{CreateTenantRequest, normalize_custom_domain, normalize_slug, validate_slug},
    error::AppError,
};

const MAIN: &str = "dancymeals.test";

fn request(slug: &str) -> CreateTenantRequest {
    CreateTenantRequest {
        name: "Mama Dancy".into(),
        slug: slug.into(),
        custom_domain: None,
        minimum_order_amount: 0,
        offers_delivery: true,
        offers_pickup: true,
    }
}

#[test]
fn mixed_case_slug_is_accepted_after_normalizing() {
    assert!(request("  Mama-Dancy ").validate().is_ok());
    assert_eq!(normalize_slug("  Mama-Dancy "), "mama-dancy");
}

#[test]
fn malformed_slugs_are_rejected() {
    for slug in ["", "-mama", "mama-", "mama dancy", "mama.dancy"] {
        assert!(
            matches!(request(slug).validate(), Err(AppError::BadRequest(_))),
            "{slug:?} should be rejected"
        );
    }
    assert!(validate_slug("mama-dancy-2").is_ok());
}

#[test]
fn tenant_must_offer_a_method() {
    let mut req = request("mama-dancy");
    req.offers_delivery = false;
    req.offers_pickup = false;
    assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
}

#[test]
fn custom_domain_is_normalized() {
    let domain = normalize_custom_domain(Some(" Order.MamaDancy.com. "), MAIN).expect("valid");
    assert_eq!(domain.as_deref(), Some("order.mamadancy.com"));
    assert_eq!(normalize_custom_domain(None, MAIN).expect("none"), None);
    assert_eq!(normalize_custom_domain(Some("  "), MAIN).expect("blank"), None);
}

#[test]
fn ip_literals_cannot_be_custom_domains() {
    for domain in ["203.0.113.7", "203.0.113.7:8080", "::1", "[2001:db8::1]:443"] {
        assert!(
            matches!(
                normalize_custom_domain(Some(domain), MAIN),
                Err(AppError::BadRequest(_))
            ),
            "{domain} should be rejected"
        );
    }
}

#[test]
fn platform_hosts_cannot_be_custom_domains() {
    for domain in ["dancymeals.test", "shop.dancymeals.test", "DancyMeals.Test:443"] {
        assert!(
            matches!(
                normalize_custom_domain(Some(domain), MAIN),
                Err(AppError::BadRequest(_))
            ),
            "{domain} should be rejected"
        );
    }
}
