use docfill::facts::FactMap;
use docfill::templating::grammar::{find_tokens, replace_key};
use docfill::templating::{RunConsolidation, SubstitutionEngine};

fn tokens(text: &str) -> Vec<String> {
    find_tokens(text).into_iter().map(|m| m.token).collect()
}

fn engine_for(pairs: &[(&str, &str)]) -> SubstitutionEngine {
    let facts: FactMap = pairs.iter().map(|(k, v)| (k.to_string(), (*v).into())).collect();
    SubstitutionEngine::new(&facts, RunConsolidation::Paragraph)
}

#[test]
fn test_extractor_ignores_email_domains() {
    assert!(tokens("Email: contato@nome.com").is_empty());
    assert!(tokens("financeiro@empresa.com.br").is_empty());
    assert_eq!(tokens("Responsável: @nome (ana@nome.com)"), vec!["@nome"]);
}

#[test]
fn test_extractor_and_substitution_agree() {
    let texts = [
        "Cliente: @nome.",
        "contato@nome.com",
        "Prazo: @prazo dias, @taxa% a.m.",
        "@nome.com",
        "x.@nome",
        "@a@b",
    ];
    let engine = engine_for(&[("@nome", "N"), ("@prazo", "P"), ("@taxa%", "T"), ("@a", "A"), ("@b", "B")]);

    for text in texts {
        let found = find_tokens(text).len();
        let (_, replaced) = engine.substitute_text(text);
        assert_eq!(found, replaced, "disagreement on {text:?}");
    }
}

#[test]
fn test_longest_key_first() {
    let engine = engine_for(&[("@a", "curto"), ("@ab", "longo")]);
    let (out, count) = engine.substitute_text("@ab @a");
    assert_eq!(out, "longo curto");
    assert_eq!(count, 2);

    let engine = engine_for(&[("@valor", "1"), ("@valorTotal", "2"), ("@valorTotalObra", "3")]);
    assert_eq!(engine.substitute_text("@valorTotalObra/@valorTotal/@valor").0, "3/2/1");
}

#[test]
fn test_email_survives_substitution() {
    let engine = engine_for(&[("@nome", "Ana")]);
    assert_eq!(engine.substitute_text("contact@nome.com").0, "contact@nome.com");
    assert_eq!(engine.substitute_text("Cliente: @nome.").0, "Cliente: Ana.");
}

#[test]
fn test_replaced_values_are_not_rescanned() {
    let (out, count) = replace_key("@nome e @nome", "@nome", "@nome @nome");
    assert_eq!(out, "@nome @nome e @nome @nome");
    assert_eq!(count, 2);
}
