use anyhow::Result;
use docfill::generator::GenerationRequest;
use docfill::test_utils::fixtures::{w_paragraph, write_docx};

use crate::common::TestWorkspace;

#[test]
fn test_history_appends_one_line_per_generation() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let data = ws.write_client_file("ACME/02-ACM_DOC_PC_00_R00_PROPOSTA.md", "@nome: Ana\n")?;
    let template = ws.template("proposta.docx");
    write_docx(&template, &w_paragraph(&["@nome"]), &[])?;

    let generator = ws.generator();
    let output = ws.clients_root().join("ACME/proposta.docx");
    generator.generate(&GenerationRequest::new(&template, &data, &output))?;
    generator.generate(&GenerationRequest::new(&template, &data, &output))?;

    let log = std::fs::read_to_string(ws.clients_root().join("ACME/history.log"))?;
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[0].ends_with(
        "Documento 'proposta.docx' (docx) gerado usando Template 'proposta.docx' e Dados '02-ACM_DOC_PC_00_R00_PROPOSTA.md'"
    ));
    Ok(())
}

#[test]
fn test_history_can_be_disabled() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let data = ws.write_client_file("ACME/dados.md", "@nome: Ana\n")?;
    let template = ws.template("proposta.docx");
    write_docx(&template, &w_paragraph(&["@nome"]), &[])?;

    let output = ws.clients_root().join("ACME/proposta.docx");
    ws.generator_with(|config| config.write_history = false)
        .generate(&GenerationRequest::new(&template, &data, &output))?;

    assert!(output.exists());
    assert!(!ws.clients_root().join("ACME/history.log").exists());
    Ok(())
}
