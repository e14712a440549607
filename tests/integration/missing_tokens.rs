use anyhow::Result;
use docfill::document::DocumentKind;
use docfill::generator::GenerationRequest;
use docfill::test_utils::fixtures::{region_texts, w_paragraph, w_text_box, write_docx};

use crate::common::TestWorkspace;

fn workspace() -> Result<(TestWorkspace, std::path::PathBuf, std::path::PathBuf)> {
    let ws = TestWorkspace::new()?;
    let data = ws.write_client_file("ACME/dados.md", "@nome: Ana\n@enderco: Rua 1\n")?;
    let template = ws.template("carta.docx");
    let body = [
        w_paragraph(&["Prezada @nome, confirme o @endereco."]),
        w_paragraph(&["Emitida em @DataAtual (contato@empresa.com)"]),
        w_text_box(&w_paragraph(&["Retorno até @prazoResposta"]), true),
    ]
    .concat();
    write_docx(&template, &body, &[])?;
    Ok((ws, data, template))
}

#[test]
fn test_preflight_lists_missing_tokens() -> Result<()> {
    let (ws, data, template) = workspace()?;
    let report = ws.generator().validate_template_keys(&template, &data, None)?;

    assert_eq!(report.tokens(), vec!["@endereco", "@prazoResposta"]);
    let endereco = &report.missing[0];
    assert_eq!(endereco.suggestions, vec!["@enderco"]);
    assert!(report.to_error().is_some());
    Ok(())
}

#[test]
fn test_preflight_writes_nothing() -> Result<()> {
    let (ws, data, template) = workspace()?;
    let before = std::fs::read(&template)?;
    ws.generator().validate_template_keys(&template, &data, Some(DocumentKind::Docx))?;

    assert_eq!(std::fs::read(&template)?, before);
    assert!(!ws.clients_root().join("ACME/history.log").exists());
    Ok(())
}

#[test]
fn test_placeholder_policy_fills_missing_tokens() -> Result<()> {
    let (ws, data, template) = workspace()?;
    let generator = ws.generator_with(|config| {
        config.clean_missing_variables = true;
        config.missing_variable_placeholder = "---".to_string();
    });

    let output = ws.clients_root().join("ACME/carta.docx");
    let report = generator.generate(&GenerationRequest::new(&template, &data, &output))?;

    assert!(report.placeholder_applied);
    assert_eq!(report.missing.tokens(), vec!["@endereco", "@prazoResposta"]);
    let texts = region_texts(&output)?;
    assert!(texts.contains(&"Prezada Ana, confirme o ---.".to_string()), "{texts:?}");
    assert!(texts.contains(&"Emitida em 29 de Janeiro de 2026 (contato@empresa.com)".to_string()));
    assert!(texts.contains(&"Retorno até ---".to_string()), "{texts:?}");
    Ok(())
}

#[test]
fn test_missing_tokens_stay_visible_by_default() -> Result<()> {
    let (ws, data, template) = workspace()?;
    let output = ws.clients_root().join("ACME/carta.docx");
    let report = ws.generator().generate(&GenerationRequest::new(&template, &data, &output))?;

    assert!(!report.placeholder_applied);
    assert_eq!(report.missing.len(), 2);
    let texts = region_texts(&output)?;
    assert!(texts.contains(&"Prezada Ana, confirme o @endereco.".to_string()), "{texts:?}");
    assert!(texts.contains(&"Retorno até @prazoResposta".to_string()), "{texts:?}");
    Ok(())
}
