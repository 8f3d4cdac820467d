use anyhow::{bail, Context};
use log::warn;
use schemagate_core::CompanyInput;
use std::path::Path;

pub fn validate(file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read `{}`", file.display()))?;

    let company = CompanyInput::from_json(&text).and_then(CompanyInput::into_company);
    match company {
        Ok(company) => {
            println!("{}", serde_json::to_string_pretty(&company)?);
            Ok(())
        }
        Err(errors) => {
            for error in errors.errors() {
                eprintln!("  - {error}");
            }
            warn!(
                "event=cli_validate module=cli status=error violations={}",
                errors.errors().len()
            );
            bail!("{} rejected with {} violation(s)", file.display(), errors.errors().len())
        }
    }
}
