use anyhow::Result;
use docfill::generator::GenerationRequest;
use docfill::templating::RunConsolidation;
use docfill::test_utils::fixtures::{
    a_paragraph, docx_footer, docx_header, p_shape, p_table, read_part, region_texts, w_bold_run,
    w_paragraph, w_run, w_table, w_text_box, write_docx, write_pptx,
};

use crate::common::TestWorkspace;

/// ACME > OBRA1 with a parent fact file, a leaf fact file and document data.
fn acme_workspace() -> Result<TestWorkspace> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file(
        "ACME/ACM_DOC_CD_00_R01_INFO-ACME.md",
        "# ACME\n@cliente: ACME Engenharia\n@cidade: Anápolis\n@email: contato@acme.com\n",
    )?;
    ws.write_client_file("ACME/ACM_DOC_CD_00_R00_INFO-ACME.md", "@cliente: ACME (desatualizado)\n")?;
    ws.write_client_file("ACME/OBRA1/OBR_DOC_CD_00_R00_INFO-OBRA1.md", "@cidade: Goiânia\n@area: 1250.5\n")?;
    ws.write_client_file(
        "ACME/OBRA1/02-OBR_DOC_PC_00_R00_PROPOSTA.md",
        "@numeroProposta: 042/2026\n@valorM2: 2.000,00\n@qtd: 3\n@valorTotal: [calculo: @valorM2 * @qtd]\n",
    )?;
    Ok(ws)
}

fn data_file(ws: &TestWorkspace) -> std::path::PathBuf {
    ws.clients_root().join("ACME/OBRA1/02-OBR_DOC_PC_00_R00_PROPOSTA.md")
}

#[test]
fn test_context_chain_and_computed_field() -> Result<()> {
    let ws = acme_workspace()?;
    let template = ws.template("proposta.docx");
    let body = [
        w_paragraph(&["Proposta @numeroProposta para @cliente"]),
        w_paragraph(&["Obra em @cidade, área de @area m²"]),
        w_paragraph(&["Total: @valorTotal"]),
        w_paragraph(&["Contato: @email"]),
    ]
    .concat();
    write_docx(&template, &body, &[])?;

    let output = ws.clients_root().join("ACME/OBRA1/proposta.docx");
    let report = ws.generator().generate(&GenerationRequest::new(&template, data_file(&ws), &output))?;

    assert!(report.missing.is_empty());
    assert!(report.unresolved.is_empty());
    assert_eq!(
        region_texts(&output)?,
        vec![
            "Proposta 042/2026 para ACME Engenharia",
            "Obra em Goiânia, área de 1.250,50 m²",
            "Total: R$ 6.000,00",
            "Contato: contato@acme.com",
        ]
    );
    Ok(())
}

#[test]
fn test_fragmented_runs_are_consolidated() -> Result<()> {
    let ws = acme_workspace()?;
    let template = ws.template("fragmentado.docx");
    let body = format!(
        "<w:p>{}{}{}{}</w:p>",
        w_run("Cliente: "),
        w_bold_run("@cli"),
        w_run("ente"),
        w_run(" (@cidade).")
    );
    write_docx(&template, &body, &[])?;

    let output = ws.path().join("saida/fragmentado.docx");
    let report = ws.generator().generate(&GenerationRequest::new(&template, data_file(&ws), &output))?;

    assert_eq!(report.replacements, 2);
    assert_eq!(region_texts(&output)?, vec!["Cliente: ACME Engenharia (Goiânia)."]);
    Ok(())
}

#[test]
fn test_token_spans_mode_keeps_untouched_runs() -> Result<()> {
    let ws = acme_workspace()?;
    let template = ws.template("negrito.docx");
    let body = format!("<w:p>{}{}{}</w:p>", w_bold_run("Importante: "), w_run("@cid"), w_run("ade"));
    write_docx(&template, &body, &[])?;

    let output = ws.path().join("negrito.docx");
    ws.generator_with(|config| config.run_consolidation = RunConsolidation::TokenSpans)
        .generate(&GenerationRequest::new(&template, data_file(&ws), &output))?;

    let xml = read_part(&output, "word/document.xml")?;
    assert!(xml.contains("<w:b/>"));
    assert!(xml.contains("Importante: "));
    assert_eq!(region_texts(&output)?, vec!["Importante: Goiânia"]);
    Ok(())
}

#[test]
fn test_every_word_surface_is_filled() -> Result<()> {
    let ws = acme_workspace()?;
    let template = ws.template("completo.docx");
    let body = [
        w_paragraph(&["Corpo @cliente"]),
        w_table(&[&["Cidade", "@cidade"], &["Número", "@numeroProposta"]]),
        w_text_box(&w_paragraph(&["Caixa inline @cliente"]), false),
        w_text_box(&w_paragraph(&["Caixa ancorada @cidade"]), true),
    ]
    .concat();
    let header = docx_header(&[
        w_paragraph(&["Cabeçalho @numeroProposta"]),
        w_text_box(&w_paragraph(&["Selo @cliente"]), true),
    ]
    .concat());
    let footer = docx_footer(&w_table(&[&["Rodapé @cidade"]]));
    write_docx(&template, &body, &[("word/header1.xml", header), ("word/footer1.xml", footer)])?;

    let output = ws.path().join("completo.docx");
    let report = ws.generator().generate(&GenerationRequest::new(&template, data_file(&ws), &output))?;
    assert!(report.missing.is_empty());
    assert_eq!(report.replacements, 8);

    let texts = region_texts(&output)?;
    for expected in [
        "Corpo ACME Engenharia",
        "Goiânia",
        "042/2026",
        "Caixa inline ACME Engenharia",
        "Caixa ancorada Goiânia",
        "Cabeçalho 042/2026",
        "Selo ACME Engenharia",
        "Rodapé Goiânia",
    ] {
        assert!(texts.iter().any(|t| t == expected), "missing {expected:?} in {texts:?}");
    }
    assert!(!texts.iter().any(|t| t.contains('@')), "unreplaced token in {texts:?}");
    Ok(())
}

#[test]
fn test_slide_deck_shapes_and_tables() -> Result<()> {
    let ws = acme_workspace()?;
    let template = ws.template("resumo.pptx");
    let first = p_shape(&[a_paragraph(&["Proposta ", "@numero", "Proposta"]), a_paragraph(&["@cliente"])].concat());
    let second = p_table(&[&["Total", "@valorTotal"], &["Área", "@area"]]);
    write_pptx(&template, &[&first, &second])?;

    let output = ws.path().join("resumo.pptx");
    let report = ws.generator().generate(&GenerationRequest::new(&template, data_file(&ws), &output))?;

    assert!(report.missing.is_empty());
    assert_eq!(
        region_texts(&output)?,
        vec!["Proposta 042/2026", "ACME Engenharia", "Total", "R$ 6.000,00", "Área", "1.250,50"]
    );
    Ok(())
}

#[test]
fn test_untouched_parts_survive() -> Result<()> {
    let ws = acme_workspace()?;
    let template = ws.template("estilos.docx");
    let styles = r#"<?xml version="1.0" encoding="UTF-8"?><w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
    write_docx(&template, &w_paragraph(&["@cliente"]), &[("word/styles.xml", styles.to_string())])?;

    let output = ws.path().join("estilos.docx");
    ws.generator().generate(&GenerationRequest::new(&template, data_file(&ws), &output))?;

    assert_eq!(read_part(&output, "word/styles.xml")?, styles);
    assert_eq!(region_texts(&template)?, vec!["@cliente"]);
    Ok(())
}

#[test]
fn test_unsafe_expression_is_reported_not_fatal() -> Result<()> {
    let ws = TestWorkspace::new()?;
    let data = ws.write_client_file("ACME/dados.txt", "@valorTotal;[calculo: abs(-1)]\n")?;
    let template = ws.template("t.docx");
    write_docx(&template, &w_paragraph(&["Total: @valorTotal"]), &[])?;

    let output = ws.path().join("t.docx");
    let report = ws.generator().generate(&GenerationRequest::new(&template, &data, &output))?;

    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].0, "@valorTotal");
    assert_eq!(region_texts(&output)?, vec!["Total: [calculo: abs(-1)]"]);
    Ok(())
}

#[test]
fn test_unreadable_template_is_fatal() -> Result<()> {
    let ws = acme_workspace()?;
    let template = ws.template("quebrado.docx");
    std::fs::write(&template, b"not a zip")?;

    let output = ws.path().join("quebrado.docx");
    let err = ws
        .generator()
        .generate(&GenerationRequest::new(&template, data_file(&ws), &output))
        .unwrap_err();

    assert!(matches!(err, docfill::core::DocfillError::TemplateUnreadable { .. }));
    assert!(!output.exists());
    Ok(())
}
