//! Check command handler.

use std::path::Path;

use color_eyre::eyre::eyre;
use color_eyre::Result;

use crate::di::FromRef;
use crate::services::{FieldService, ValidationService};

use super::App;

impl App {
    /// Validate every field of a definition file, failing if any issue is found.
    pub fn run_check(&self, path: &Path) -> Result<()> {
        let ctx = &self.load_context()?;
        let fields = FieldService::from_ref(ctx);
        let validation = ValidationService::from_ref(ctx);

        let definition = fields.load_definition(path)?;
        let parent = fields.build(&definition)?;
        tracing::info!(
            "Checking {} field(s) of '{}'",
            definition.fields.len(),
            definition.name
        );

        let issues = validation.find_issues(&parent);
        if issues.is_empty() {
            println!("{}: all fields valid", definition.name);
            return Ok(());
        }

        for issue in &issues {
            let label = if issue.label.is_empty() {
                "<no label>"
            } else {
                issue.label.as_str()
            };
            println!("{}.{} ({}): {}", issue.association, label, issue.field_id, issue.issue);
        }
        Err(eyre!("{} issue(s) found in {}", issues.len(), path.display()))
    }
}
