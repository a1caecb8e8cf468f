use proptest::prelude::*;
use zolo_license::{LicenseError, Plan, PlanUnit, DEFAULT_MAX_PLAN_QUANTITY};

#[test]
fn parse_days() {
    let plan = Plan::parse("30D").unwrap();
    assert_eq!(plan.quantity(), 30);
    assert_eq!(plan.unit(), PlanUnit::Day);
    assert_eq!(plan.total_days(), 30);
}

#[test]
fn parse_years() {
    let plan = Plan::parse("2Y").unwrap();
    assert_eq!(plan.quantity(), 2);
    assert_eq!(plan.unit(), PlanUnit::Year);
    assert_eq!(plan.total_days(), 730);
}

#[test]
fn parse_bounds() {
    assert!(Plan::parse("1D").is_ok());
    assert!(Plan::parse("3650D").is_ok());
    assert!(Plan::parse("3650Y").is_ok());
    assert!(Plan::parse("3651D").is_err());
    assert!(Plan::parse("0D").is_err());
    assert!(Plan::parse("0Y").is_err());
}

#[test]
fn parse_rejects_malformed() {
    for token in [
        "", "D", "Y", "30", "30d", "1y", "30M", "-1D", "+1D", " 30D", "30D ", "3 0D", "30DD",
        "1.5Y", "ZOLO", "٣D",
    ] {
        assert!(
            matches!(Plan::parse(token), Err(LicenseError::InvalidPlan(_))),
            "{token:?} should be rejected"
        );
    }
}

#[test]
fn parse_rejects_overflowing_quantity() {
    let result = Plan::parse_with_max("99999999999999999999D", u32::MAX);
    assert!(matches!(result, Err(LicenseError::InvalidPlan(_))));
}

#[test]
fn parse_with_custom_max() {
    assert!(Plan::parse_with_max("10D", 10).is_ok());
    assert!(Plan::parse_with_max("11D", 10).is_err());
    assert!(Plan::parse_with_max("5000D", 10_000).is_ok());
}

#[test]
fn leading_zeros_normalize() {
    let plan = Plan::parse("030D").unwrap();
    assert_eq!(plan.to_string(), "30D");
}

#[test]
fn display_round_trips() {
    for token in ["1D", "30D", "1Y", "3650Y"] {
        assert_eq!(Plan::parse(token).unwrap().to_string(), token);
    }
}

#[test]
fn from_str_uses_default_max() {
    let plan: Plan = "7D".parse().unwrap();
    assert_eq!(plan, Plan::new(7, PlanUnit::Day));
    assert!("3651Y".parse::<Plan>().is_err());
}

#[test]
fn plan_serde_as_token() {
    let json = serde_json::to_string(&Plan::new(1, PlanUnit::Year)).unwrap();
    assert_eq!(json, r#""1Y""#);
    let parsed: Plan = serde_json::from_str(r#""90D""#).unwrap();
    assert_eq!(parsed, Plan::new(90, PlanUnit::Day));
    assert!(serde_json::from_str::<Plan>(r#""nope""#).is_err());
}

proptest! {
    #[test]
    fn valid_tokens_parse(n in 1u32..=DEFAULT_MAX_PLAN_QUANTITY, year in any::<bool>()) {
        let unit = if year { 'Y' } else { 'D' };
        let plan = Plan::parse(&format!("{n}{unit}")).unwrap();
        prop_assert_eq!(plan.quantity(), n);
        prop_assert_eq!(plan.unit(), if year { PlanUnit::Year } else { PlanUnit::Day });
    }

    #[test]
    fn out_of_range_tokens_fail(n in (DEFAULT_MAX_PLAN_QUANTITY + 1)..u32::MAX, year in any::<bool>()) {
        let unit = if year { 'Y' } else { 'D' };
        let result = Plan::parse(&format!("{n}{unit}"));
        prop_assert!(matches!(result, Err(LicenseError::InvalidPlan(_))));
    }

    #[test]
    fn arbitrary_strings_never_panic(token in "\\PC{0,12}") {
        let _ = Plan::parse(&token);
    }

    #[test]
    fn accepted_tokens_match_grammar(token in "[0-9]{1,5}[A-Za-z]") {
        if let Ok(plan) = Plan::parse(&token) {
            prop_assert!(token.ends_with('D') || token.ends_with('Y'));
            prop_assert!(plan.quantity() >= 1 && plan.quantity() <= DEFAULT_MAX_PLAN_QUANTITY);
        }
    }
}
