//! Field service: loads definitions and materializes them on schemas.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use figment::{
    providers::{Format, Json, Toml},
    Figment,
};
use serde::Serialize;

use crate::config::Config;
use crate::context::Context;
use crate::di::FromRef;
use crate::error::AppError;
use crate::models::{AppliedField, ApplyOutcome, Definition, INTERNAL_NAME_PREFIX};
use crate::parent::FieldSet;
use crate::registry::TypeRegistry;
use crate::schema::{Schema, TargetSchema};

/// Counter value encoded in a generated `custom_field_<n>` name.
fn generated_counter(name: &str) -> Option<u64> {
    name.strip_prefix(INTERNAL_NAME_PREFIX)?.parse().ok()
}

/// A field `apply` skipped because it failed validation.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedField {
    pub id: String,
    pub label: String,
    pub association: String,
    pub errors: Vec<String>,
}

/// Result of materializing a parent's fields.
#[derive(Debug, Default, Serialize)]
pub struct ApplyReport {
    pub applied: Vec<AppliedField>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedField>,
}

/// Service for turning definitions into parents and parents into schemas.
#[derive(Clone)]
pub struct FieldService {
    config: Arc<Config>,
    registry: Arc<TypeRegistry>,
}

impl FromRef<Context> for FieldService {
    fn from_ref(ctx: &Context) -> Self {
        Self {
            config: FromRef::from_ref(ctx),
            registry: FromRef::from_ref(ctx),
        }
    }
}

impl FieldService {
    /// Reads a definition from a `.toml` or `.json` file.
    pub fn load_definition(&self, path: &Path) -> Result<Definition, AppError> {
        if !path.is_file() {
            return Err(AppError::DefinitionNotFound(path.display().to_string()));
        }

        let figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Figment::from(Toml::file(path)),
            Some("json") => Figment::from(Json::file(path)),
            other => {
                return Err(AppError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };

        figment
            .extract()
            .map_err(|e| AppError::Definition(e.to_string()))
    }

    /// Builds an in-memory parent holding every field of `definition`.
    ///
    /// Fields are stored as declared, valid or not. The counter is raised past
    /// every declared `custom_field_<n>` name so generated names never reuse
    /// one; a name declared twice is rejected.
    pub fn build(&self, definition: &Definition) -> Result<FieldSet, AppError> {
        let association = definition
            .association
            .as_deref()
            .unwrap_or(&self.config.default_association);
        let parent = FieldSet::new(&definition.name);
        parent.restore_counter(association, definition.counter);

        let mut declared = HashSet::new();
        for name in definition.fields.iter().filter_map(|f| f.name.as_deref()) {
            if !declared.insert(name) {
                return Err(AppError::Definition(format!(
                    "internal name '{}' is declared twice",
                    name
                )));
            }
            if let Some(n) = generated_counter(name) {
                parent.restore_counter(association, n);
            }
        }

        for spec in &definition.fields {
            let mut field = parent
                .new_field(association, &spec.label, &spec.kind)
                .with_position(spec.position)
                .with_category_items(spec.items.clone());
            if let Some(alias) = &spec.alias {
                field = field.with_alias(alias);
            }
            if let Some(name) = &spec.name {
                field = field.with_internal_name(name);
            }
            parent.insert(field)?;
        }

        tracing::debug!(
            parent = %parent.name(),
            association = %association,
            fields = definition.fields.len(),
            "Built field set"
        );
        Ok(parent)
    }

    /// Applies every field of `parent` to `target`, in position order.
    ///
    /// Invalid fields are skipped and reported. Generated names and aliases
    /// are written back to `parent`. An unknown kind aborts with an error;
    /// fields applied before it stay applied.
    pub fn materialize<T: TargetSchema + ?Sized>(
        &self,
        parent: &FieldSet,
        target: &mut T,
    ) -> Result<ApplyReport, AppError> {
        let mut report = ApplyReport::default();

        for association in parent.associations() {
            for mut field in parent.ordered(&association) {
                match field.apply(parent, &self.registry, target)? {
                    ApplyOutcome::Applied(applied) => {
                        report.applied.push(applied);
                        parent.update(field);
                    }
                    ApplyOutcome::Skipped(errors) => {
                        tracing::warn!(
                            field_id = %field.id,
                            label = %field.label,
                            %errors,
                            "Field skipped"
                        );
                        report.skipped.push(SkippedField {
                            id: field.id,
                            label: field.label,
                            association: association.clone(),
                            errors: errors.messages(),
                        });
                    }
                }
            }
        }

        Ok(report)
    }

    /// Loads a definition and materializes it on a fresh schema named after it.
    pub fn materialize_file(&self, path: &Path) -> Result<(Schema, ApplyReport), AppError> {
        let definition = self.load_definition(path)?;
        let parent = self.build(&definition)?;
        let mut schema = Schema::new(&definition.name);
        let report = self.materialize(&parent, &mut schema)?;
        Ok((schema, report))
    }
}
