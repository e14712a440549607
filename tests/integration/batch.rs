use anyhow::Result;
use docfill::core::DocfillError;
use docfill::generator::{GenerationRequest, generate_batch};
use docfill::test_utils::fixtures::{a_paragraph, p_shape, region_texts, w_paragraph, write_docx, write_pptx};
use docfill::utils::progress::BatchProgress;

use crate::common::TestWorkspace;

fn workspace() -> Result<TestWorkspace> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file("ACME/INFO-ACME.md", "@cliente: ACME\n")?;
    ws.write_client_file("ACME/OBRA1/dados.md", "@obra: Obra 1\n")?;
    ws.write_client_file("ACME/OBRA2/dados.json", r#"{"@obra": "Obra 2"}"#)?;
    write_docx(&ws.template("proposta.docx"), &w_paragraph(&["@cliente - @obra"]), &[])?;
    write_pptx(&ws.template("resumo.pptx"), &[&p_shape(&a_paragraph(&["@obra para @cliente"]))])?;
    Ok(ws)
}

#[tokio::test]
async fn test_batch_generates_every_document() -> Result<()> {
    let ws = workspace()?;
    let obra1 = ws.clients_root().join("ACME/OBRA1");
    let obra2 = ws.clients_root().join("ACME/OBRA2");
    let requests = vec![
        GenerationRequest::new(ws.template("proposta.docx"), obra1.join("dados.md"), obra1.join("proposta.docx")),
        GenerationRequest::new(ws.template("resumo.pptx"), obra1.join("dados.md"), obra1.join("resumo.pptx")),
        GenerationRequest::new(ws.template("proposta.docx"), obra2.join("dados.json"), obra2.join("proposta.docx")),
    ];

    let progress = BatchProgress::hidden(requests.len());
    let results = generate_batch(ws.generator(), requests, progress.clone()).await?;

    assert_eq!(results.len(), 3);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(progress.position(), 3);

    assert_eq!(region_texts(&obra1.join("proposta.docx"))?, vec!["ACME - Obra 1"]);
    assert_eq!(region_texts(&obra1.join("resumo.pptx"))?, vec!["Obra 1 para ACME"]);
    assert_eq!(region_texts(&obra2.join("proposta.docx"))?, vec!["ACME - Obra 2"]);

    let history = std::fs::read_to_string(obra1.join("history.log"))?;
    assert_eq!(history.lines().count(), 2);
    Ok(())
}

#[tokio::test]
async fn test_batch_keeps_going_after_a_failure() -> Result<()> {
    let ws = workspace()?;
    let obra1 = ws.clients_root().join("ACME/OBRA1");
    let requests = vec![
        GenerationRequest::new(ws.template("nao-existe.docx"), obra1.join("dados.md"), obra1.join("a.docx")),
        GenerationRequest::new(ws.template("proposta.docx"), obra1.join("dados.md"), obra1.join("b.docx")),
    ];

    let results = generate_batch(ws.generator(), requests, BatchProgress::hidden(2)).await?;

    assert!(matches!(results[0], Err(DocfillError::TemplateUnreadable { .. })));
    assert!(results[1].is_ok());
    assert!(obra1.join("b.docx").exists());
    Ok(())
}

#[tokio::test]
async fn test_batch_rejects_shared_output() -> Result<()> {
    let ws = workspace()?;
    let obra1 = ws.clients_root().join("ACME/OBRA1");
    let output = obra1.join("proposta.docx");
    let requests = vec![
        GenerationRequest::new(ws.template("proposta.docx"), obra1.join("dados.md"), &output),
        GenerationRequest::new(ws.template("resumo.pptx"), obra1.join("dados.md"), &output),
    ];

    let err = generate_batch(ws.generator(), requests, BatchProgress::hidden(2)).await.unwrap_err();
    assert!(matches!(err, DocfillError::OutputConflict { .. }));
    assert!(!output.exists());
    Ok(())
}
