use anyhow::Result;
use docfill::core::DocfillError;
use docfill::facts::{FactValue, load_fact_map};
use tempfile::tempdir;

#[test]
fn test_heading_format_splits_on_first_colon() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("dados.md");
    std::fs::write(
        &path,
        "# Proposta\n\nTexto livre sem separador\n@horario: 08:00 às 17:00\n@site: https://acme.example\n",
    )?;

    let facts = load_fact_map(&path)?;
    assert_eq!(facts.len(), 2);
    assert_eq!(facts["@horario"].to_string(), "08:00 às 17:00");
    assert_eq!(facts["@site"].to_string(), "https://acme.example");
    Ok(())
}

#[test]
fn test_delimited_format() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("dados.txt");
    std::fs::write(&path, "@nome;Ana\nlinha sem delimitador\n\n@obs;a;b\n")?;

    let facts = load_fact_map(&path)?;
    assert_eq!(facts.len(), 2);
    assert_eq!(facts["@nome"].to_string(), "Ana");
    assert_eq!(facts["@obs"].to_string(), "a;b");
    Ok(())
}

#[test]
fn test_object_format_keeps_value_types() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("dados.json");
    std::fs::write(
        &path,
        r#"{"@qtd": 3, "@ativo": true, "@nome": "Ana", "@cliente": {"cidade": "Goiânia"}}"#,
    )?;

    let facts = load_fact_map(&path)?;
    assert!(matches!(facts["@qtd"], FactValue::Number(_)));
    assert_eq!(facts["@ativo"], FactValue::Bool(true));
    assert_eq!(facts["@cliente_cidade"].to_string(), "Goiânia");
    Ok(())
}

#[test]
fn test_missing_file_is_empty() -> Result<()> {
    let temp = tempdir()?;
    assert!(load_fact_map(&temp.path().join("nao-existe.md"))?.is_empty());
    Ok(())
}

#[test]
fn test_malformed_object_is_an_error() -> Result<()> {
    let temp = tempdir()?;
    let path = temp.path().join("dados.json");
    std::fs::write(&path, "{ \"@nome\": ")?;

    let err = load_fact_map(&path).unwrap_err();
    assert!(matches!(err, DocfillError::DataSourceInvalid { .. }));
    Ok(())
}
