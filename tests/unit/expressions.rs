use docfill::facts::FactMap;
use docfill::templating::{ExpressionError, resolve_expressions};

fn facts(pairs: &[(&str, &str)]) -> FactMap {
    pairs.iter().map(|(k, v)| (k.to_string(), (*v).into())).collect()
}

#[test]
fn test_scenario_total_from_price_and_quantity() {
    let mut map = facts(&[("@valor", "1000"), ("@qtd", "3"), ("@total", "[calculo: @valor * @qtd]")]);
    assert!(resolve_expressions(&mut map).is_empty());
    assert_eq!(map["@total"].to_string(), "3000.00");
}

#[test]
fn test_three_level_chain_resolves() {
    // Key order visits each field before the one it depends on
    let mut map = facts(&[
        ("@c", "10"),
        ("@b", "[calculo: @c + 5]"),
        ("@a", "[calculo: @b * 2]"),
    ]);
    assert!(resolve_expressions(&mut map).is_empty());
    assert_eq!(map["@b"].to_string(), "15.00");
    assert_eq!(map["@a"].to_string(), "30.00");
}

#[test]
fn test_deep_chain_may_stay_unresolved() {
    let mut map = facts(&[
        ("@e", "1"),
        ("@d", "[calculo: @e + 1]"),
        ("@c", "[calculo: @d + 1]"),
        ("@b", "[calculo: @c + 1]"),
        ("@a", "[calculo: @b + 1]"),
    ]);
    let unresolved = resolve_expressions(&mut map);

    assert_eq!(map["@b"].to_string(), "4.00");
    assert_eq!(map["@a"].to_string(), "[calculo: @b + 1]");
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].key, "@a");
    assert!(matches!(unresolved[0].reason, ExpressionError::PendingDependency(_)));
}

#[test]
fn test_unsafe_expression_is_left_in_place() {
    let mut map = facts(&[("@nome", "Ana"), ("@x", "[calculo: __import__('os')]")]);
    let unresolved = resolve_expressions(&mut map);

    assert_eq!(unresolved.len(), 1);
    assert!(unresolved[0].is_unsafe());
    assert_eq!(map["@x"].to_string(), "[calculo: __import__('os')]");
}

#[test]
fn test_regional_numbers_feed_expressions() {
    let mut map = facts(&[
        ("@valorM2", "R$ 2.500,50"),
        ("@area", "100"),
        ("@desconto", "não se aplica"),
        ("@total", "[calculo: @valorM2 * @area - @desconto]"),
    ]);
    assert!(resolve_expressions(&mut map).is_empty());
    assert_eq!(map["@total"].to_string(), "250050.00");
}

#[test]
fn test_chain_result_does_not_depend_on_key_order() {
    let forward = facts(&[
        ("@a", "10"),
        ("@b", "[calculo: @a + 5]"),
        ("@c", "[calculo: @b * 2]"),
    ]);
    let backward = facts(&[
        ("@c", "10"),
        ("@b", "[calculo: @c + 5]"),
        ("@a", "[calculo: @b * 2]"),
    ]);

    for (mut map, outer) in [(forward, "@c"), (backward, "@a")] {
        assert!(resolve_expressions(&mut map).is_empty());
        assert_eq!(map["@b"].to_string(), "15.00");
        assert_eq!(map[outer].to_string(), "30.00");
    }
}

#[test]
fn test_field_over_failed_field_still_resolves() {
    let mut map = facts(&[
        ("@b", "5"),
        ("@a", "[calculo: @naoExiste * 2]"),
        ("@c", "[calculo: @b + @a]"),
    ]);
    let unresolved = resolve_expressions(&mut map);

    assert_eq!(map["@c"].to_string(), "5.00");
    assert_eq!(map["@a"].to_string(), "[calculo: @naoExiste * 2]");
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].key, "@a");
    assert!(unresolved[0].is_unsafe());
}
