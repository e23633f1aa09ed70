//! The `adaptest fetch` command: generate a question bank via a supplier.

use std::path::PathBuf;

use anyhow::{Context, Result};

use adaptest_core::parser::{self, QuestionBank};
use adaptest_core::traits::SupplyRequest;
use adaptest_suppliers::config::{create_supplier, load_settings_from};
use adaptest_suppliers::intake::finalize_supply;

pub async fn execute(
    source: PathBuf,
    output: PathBuf,
    config_path: Option<PathBuf>,
    id: Option<String>,
    name: Option<String>,
) -> Result<()> {
    let settings = load_settings_from(config_path.as_deref())?;

    let text = std::fs::read_to_string(&source)
        .with_context(|| format!("failed to read source material: {}", source.display()))?;
    anyhow::ensure!(
        !text.trim().is_empty(),
        "source material is empty: {}",
        source.display()
    );

    let supplier = create_supplier(&settings)?;

    let mut request = SupplyRequest::for_text(text);
    request.main_count = settings.main_count;
    request.buffer_count = settings.buffer_count;

    eprintln!(
        "Generating {} + {} questions with {} via {}...",
        request.main_count,
        request.buffer_count,
        settings.model,
        supplier.name()
    );

    let response = supplier.supply(&request).await?;
    eprintln!(
        "Delivered {} main + {} buffer questions",
        response.main.len(),
        response.buffer.len()
    );

    let pool = finalize_supply(response)?;

    let bank_id = id.unwrap_or_else(|| {
        source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("bank")
            .to_string()
    });
    let bank = QuestionBank {
        name: name.unwrap_or_else(|| bank_id.clone()),
        id: bank_id,
        description: format!("Generated from {}", source.display()),
        pool,
    };

    parser::write_question_bank(&output, &bank)?;
    eprintln!(
        "Wrote {} questions ({} main + {} buffer) to {}",
        bank.pool.len(),
        bank.pool.main_len(),
        bank.pool.buffer_len(),
        output.display()
    );

    Ok(())
}
