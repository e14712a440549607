use anyhow::Result;
use docfill::test_utils::fixtures::{region_texts, w_paragraph, write_docx};
use predicates::prelude::*;

use crate::common::{TestWorkspace, docfill_cmd};

/// Workspace with one template, one data file and a config file.
fn cli_workspace() -> Result<(TestWorkspace, std::path::PathBuf)> {
    let ws = TestWorkspace::new()?;
    ws.write_client_file("ACME/INFO-ACME.md", "@cliente: ACME\n")?;
    ws.write_client_file("ACME/OBRA1/dados.md", "@obra: Obra Central\n")?;
    write_docx(&ws.template("proposta.docx"), &w_paragraph(&["@cliente: @obra @endereco"]), &[])?;
    let config = ws.write_config("")?;
    Ok((ws, config))
}

#[test]
fn test_generate_by_template_name() -> Result<()> {
    let (ws, config) = cli_workspace()?;
    let obra = ws.clients_root().join("ACME/OBRA1");

    docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .args(["generate", "proposta"])
        .arg(obra.join("dados.md"))
        .arg(obra.join("proposta.docx"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated"))
        .stdout(predicate::str::contains("@endereco"));

    assert_eq!(region_texts(&obra.join("proposta.docx"))?, vec!["ACME: Obra Central @endereco"]);
    Ok(())
}

#[test]
fn test_config_from_environment() -> Result<()> {
    let (ws, config) = cli_workspace()?;
    std::fs::write(&config, format!("{}clean_missing_variables = true\n", std::fs::read_to_string(&config)?))?;
    let obra = ws.clients_root().join("ACME/OBRA1");

    docfill_cmd(ws.path())
        .env("DOCFILL_CONFIG_PATH", &config)
        .args(["-q", "generate", "proposta"])
        .arg(obra.join("dados.md"))
        .arg(obra.join("proposta.docx"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    assert_eq!(region_texts(&obra.join("proposta.docx"))?, vec!["ACME: Obra Central ---"]);
    Ok(())
}

#[test]
fn test_missing_config_file_fails() -> Result<()> {
    let ws = TestWorkspace::new()?;

    docfill_cmd(ws.path())
        .args(["--config", "nao-existe.toml", "templates"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nao-existe.toml"));
    Ok(())
}

#[test]
fn test_validate_json_report() -> Result<()> {
    let (ws, config) = cli_workspace()?;
    let data = ws.clients_root().join("ACME/OBRA1/dados.md");

    let output = docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .args(["validate", "proposta.docx"])
        .arg(&data)
        .args(["--format", "json"])
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["missing"][0]["token"], "@endereco");
    assert_eq!(report["missing"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[test]
fn test_validate_strict_fails_on_missing_tokens() -> Result<()> {
    let (ws, config) = cli_workspace()?;
    let data = ws.clients_root().join("ACME/OBRA1/dados.md");

    docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .args(["validate", "proposta", "--strict"])
        .arg(&data)
        .assert()
        .failure()
        .stdout(predicate::str::contains("@endereco"))
        .stderr(predicate::str::contains("@endereco"));

    assert!(!ws.clients_root().join("ACME/OBRA1/proposta.docx").exists());
    Ok(())
}

#[test]
fn test_unknown_template_name() -> Result<()> {
    let (ws, config) = cli_workspace()?;

    docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .args(["generate", "contrato", "dados.md", "saida.docx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("contrato"));
    Ok(())
}

#[test]
fn test_templates_and_data_files_listing() -> Result<()> {
    let (ws, config) = cli_workspace()?;
    std::fs::write(ws.template("~$proposta.docx"), b"lock")?;
    std::fs::write(ws.template("notas.txt"), b"")?;

    docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .arg("templates")
        .assert()
        .success()
        .stdout("proposta.docx\n");

    docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .arg("data-files")
        .arg(ws.clients_root().join("ACME"))
        .assert()
        .success()
        .stdout(predicate::str::contains("INFO-ACME.md"));
    Ok(())
}

#[test]
fn test_new_data_scaffold() -> Result<()> {
    let (ws, config) = cli_workspace()?;
    let obra = ws.clients_root().join("ACME/OBRA1");

    docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .arg("new-data")
        .arg(&obra)
        .args(["ACMOBR", "--desc", "ACEITE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("02-ACMOBR_DOC_PC_00_R00_ACEITE.md"));

    let content = std::fs::read_to_string(obra.join("02-ACMOBR_DOC_PC_00_R00_ACEITE.md"))?;
    assert!(content.contains("@numeroProposta:"));
    Ok(())
}

#[test]
fn test_batch_command() -> Result<()> {
    let (ws, config) = cli_workspace()?;
    let obra = ws.clients_root().join("ACME/OBRA1");
    let batch = ws.path().join("lote.toml");
    std::fs::write(
        &batch,
        format!(
            "[[document]]\ntemplate = \"proposta\"\ndata = {:?}\noutput = {:?}\n\n\
             [[document]]\ntemplate = \"proposta\"\ndata = {:?}\noutput = {:?}\n",
            obra.join("dados.md").display().to_string(),
            obra.join("a.docx").display().to_string(),
            obra.join("dados.md").display().to_string(),
            obra.join("b.docx").display().to_string(),
        ),
    )?;

    docfill_cmd(ws.path())
        .arg("--config")
        .arg(&config)
        .arg("batch")
        .arg(&batch)
        .assert()
        .success();

    assert!(obra.join("a.docx").exists());
    assert!(obra.join("b.docx").exists());
    Ok(())
}
