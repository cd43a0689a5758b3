use dancy_meals::tenancy::{HostClass, classify_host};

const MAIN: &str = "dancymeals.test";

#[test]
fn ip_literals_are_ip() {
    assert_eq!(classify_host("127.0.0.1", MAIN), HostClass::Ip);
    assert_eq!(classify_host("127.0.0.1:8080", MAIN), HostClass::Ip);
    assert_eq!(classify_host("::1", MAIN), HostClass::Ip);
    assert_eq!(classify_host("[::1]:3000", MAIN), HostClass::Ip);
}

#[test]
fn main_domain_matches_exactly() {
    assert_eq!(classify_host("dancymeals.test", MAIN), HostClass::MainDomain);
    assert_eq!(classify_host("DancyMeals.Test:443", MAIN), HostClass::MainDomain);
    assert_eq!(classify_host("dancymeals.test.", MAIN), HostClass::MainDomain);
}

#[test]
fn subdomain_yields_slug() {
    assert_eq!(
        classify_host("mama-dancy.dancymeals.test", MAIN),
        HostClass::Subdomain("mama-dancy".into())
    );
    assert_eq!(
        classify_host("Mama-Dancy.dancymeals.test:3000", MAIN),
        HostClass::Subdomain("mama-dancy".into())
    );
}

#[test]
fn nested_subdomain_keeps_full_prefix() {
    assert_eq!(
        classify_host("a.b.dancymeals.test", MAIN),
        HostClass::Subdomain("a.b".into())
    );
}

#[test]
fn other_hosts_are_custom_domains() {
    assert_eq!(
        classify_host("order.mamadancy.com", MAIN),
        HostClass::CustomDomain("order.mamadancy.com".into())
    );
    // suffix match without a label boundary is not a subdomain
    assert_eq!(
        classify_host("notdancymeals.test", MAIN),
        HostClass::CustomDomain("notdancymeals.test".into())
    );
    assert_eq!(
        classify_host("ORDER.MamaDancy.com:8443", MAIN),
        HostClass::CustomDomain("order.mamadancy.com".into())
    );
}

#[test]
fn classification_is_deterministic() {
    for host in ["10.0.0.1", "dancymeals.test", "x.dancymeals.test", "food.example"] {
        assert_eq!(classify_host(host, MAIN), classify_host(host, MAIN));
    }
}
