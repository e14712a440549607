use anyhow::Result;
use docfill::facts::{ContextResolver, FactMap, merge_layers, system_variables};

use crate::common::{TestWorkspace, today};

#[test]
fn test_leaf_overrides_parent() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file("ACME/ACM_DOC_CD_00_R00_INFO-ACME.md", "@nome: ACME Ltda\n@cidade: Goiânia\n")?;
    ws.write_client_file("ACME/OBRA1/OBR_DOC_CD_00_R00_INFO-OBRA1.md", "@nome: Obra Central\n@prazo: 90\n")?;

    let resolver = ContextResolver::new(ws.clients_root());
    let facts = resolver.resolve(&ws.clients_root().join("ACME/OBRA1"));

    assert_eq!(facts["@nome"].to_string(), "Obra Central");
    assert_eq!(facts["@cidade"].to_string(), "Goiânia");
    assert_eq!(facts["@prazo"].to_string(), "90");
    Ok(())
}

#[test]
fn test_latest_version_wins() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file("ACME/ACM_DOC_CD_00_R09_INFO-ACME.md", "@nome: antigo\n")?;
    ws.write_client_file("ACME/ACM_DOC_CD_00_R10_INFO-ACME.md", "@nome: revisado\n")?;
    ws.write_client_file("ACME/ACM_DOC_CD_01_R00_INFO-ACME.md", "@nome: nova versão\n")?;
    // Unpadded numbers that would sort wrong as strings
    ws.write_client_file("ACME/ACM_DOC_CD_2_R1_INFO-ACME.md", "@nome: versão 2\n")?;

    let resolver = ContextResolver::new(ws.clients_root());
    let latest = resolver.latest_fact_file(&ws.clients_root().join("ACME"), "ACME").unwrap();
    assert!(latest.ends_with("ACM_DOC_CD_2_R1_INFO-ACME.md"));
    Ok(())
}

#[test]
fn test_unversioned_fallback() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file("ACME/INFO-ACME.txt", "@nome;ACME\n")?;

    let resolver = ContextResolver::new(ws.clients_root());
    let facts = resolver.resolve(&ws.clients_root().join("ACME"));
    assert_eq!(facts["@nome"].to_string(), "ACME");
    Ok(())
}

#[test]
fn test_root_never_contributes() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file("INFO-clientes.md", "@nome: raiz\n")?;
    ws.client_dir("ACME")?;

    let resolver = ContextResolver::new(ws.clients_root());
    assert!(resolver.resolve(&ws.clients_root().join("ACME")).is_empty());
    Ok(())
}

#[test]
fn test_chain_skips_folders_without_facts() -> Result<()> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file("ACME/INFO-ACME.md", "@nome: ACME\n@cidade: Anápolis\n")?;
    ws.client_dir("ACME/2026")?;
    ws.write_client_file("ACME/2026/OBRA1/INFO-OBRA1.md", "@cidade: Goiânia\n")?;

    let resolver = ContextResolver::new(ws.clients_root());
    let target = ws.clients_root().join("ACME/2026/OBRA1");
    assert_eq!(resolver.context_chain(&target).len(), 3);

    let facts = resolver.resolve(&target);
    assert_eq!(facts["@nome"].to_string(), "ACME");
    assert_eq!(facts["@cidade"].to_string(), "Goiânia");
    Ok(())
}

#[test]
fn test_document_layer_beats_context_and_system() {
    let system = system_variables(today(), "https://cub.example");

    let mut context = FactMap::new();
    context.insert("@DataAtual".into(), "data do contexto".into());
    context.insert("@nome".into(), "ACME".into());

    let mut document = FactMap::new();
    document.insert("@nome".into(), "Ana".into());

    let merged = merge_layers([system, context, document]);
    assert_eq!(merged["@DataAtual"].to_string(), "data do contexto");
    assert_eq!(merged["@nome"].to_string(), "Ana");
    assert_eq!(merged["@ReferenciaCUB"].to_string(), "Dezembro/2025");
}
