//! Apply command handler.

use std::path::Path;

use color_eyre::Result;

use crate::di::FromRef;
use crate::services::FieldService;

use super::App;

impl App {
    /// Materialize a definition file on an empty schema and print it as JSON.
    pub fn run_apply(&self, path: &Path, report_only: bool) -> Result<()> {
        let ctx = &self.load_context()?;
        let service = FieldService::from_ref(ctx);
        let (schema, report) = service.materialize_file(path)?;

        tracing::info!(
            "Applied {} field(s) to '{}', skipped {}",
            report.applied.len(),
            schema.name,
            report.skipped.len()
        );

        let output = if report_only {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string_pretty(&schema)?
        };
        println!("{}", output);
        Ok(())
    }
}
