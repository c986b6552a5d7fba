//! Lifecycle tests: naming under contention, apply dispatch, definition files.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use custom_fields::config::{Config, TypeEntry};
use custom_fields::context::Context;
use custom_fields::error::{FieldError, ValidationError};
use custom_fields::models::{ApplyOutcome, CategoryItem, FieldDescriptor};
use custom_fields::parent::{FieldSet, ParentContext};
use custom_fields::registry::{StorageType, TypeRef, TypeRegistry};
use custom_fields::schema::{Binding, Schema, TargetSchema};
use custom_fields::services::FieldService;
use custom_fields::FromRef;

const ASSOCIATION: &str = "custom_fields";

/// Target that records every call instead of building a schema.
#[derive(Default)]
struct RecordingSchema {
    attributes: Vec<(String, TypeRef)>,
    category_wirings: Vec<(String, Vec<String>)>,
    default_wirings: Vec<String>,
}

impl RecordingSchema {
    fn mutations(&self) -> usize {
        self.attributes.len() + self.category_wirings.len() + self.default_wirings.len()
    }
}

impl TargetSchema for RecordingSchema {
    fn add_typed_attribute(&mut self, name: &str, type_ref: TypeRef) {
        self.attributes.push((name.to_string(), type_ref));
    }

    fn apply_category_wiring(&mut self, binding: &Binding<'_>, items: &[CategoryItem]) {
        self.category_wirings.push((
            binding.name.to_string(),
            items.iter().map(|i| i.name.clone()).collect(),
        ));
    }

    fn apply_default_wiring(&mut self, binding: &Binding<'_>) {
        self.default_wirings.push(binding.name.to_string());
    }
}

mod naming {
    use super::*;

    #[test]
    fn test_concurrent_naming_yields_contiguous_counters() {
        const N: u64 = 50;
        let parent = Arc::new(FieldSet::new("Article"));

        let handles: Vec<_> = (0..N)
            .map(|i| {
                let parent = Arc::clone(&parent);
                thread::spawn(move || {
                    let mut field = parent.new_field(ASSOCIATION, format!("Field {}", i), "String");
                    field.ensure_internal_name(&*parent).unwrap().to_string()
                })
            })
            .collect();

        let names: BTreeSet<String> = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect();
        let expected: BTreeSet<String> = (1..=N).map(|n| format!("custom_field_{}", n)).collect();

        assert_eq!(names, expected);
        assert_eq!(parent.counter(ASSOCIATION), N);
    }

    #[test]
    fn test_concurrent_next_counter_through_trait_object() {
        let parent: Arc<dyn ParentContext> = Arc::new(FieldSet::new("Article"));

        let values: Vec<u64> = thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let parent = Arc::clone(&parent);
                    s.spawn(move || {
                        (0..25)
                            .map(|_| parent.next_counter(ASSOCIATION))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });

        let unique: BTreeSet<u64> = values.iter().copied().collect();
        assert_eq!(unique.len(), 200);
        assert_eq!(unique.first(), Some(&1));
        assert_eq!(unique.last(), Some(&200));
    }
}

mod apply {
    use super::*;

    fn registry() -> TypeRegistry {
        TypeRegistry::with_builtins()
    }

    #[test]
    fn test_invalid_descriptor_is_silently_skipped() {
        let parent = FieldSet::new("Article");
        let mut target = RecordingSchema::default();
        let mut field = parent.new_field(ASSOCIATION, "", "String");

        let outcome = field.apply(&parent, &registry(), &mut target).unwrap();

        let ApplyOutcome::Skipped(errors) = outcome else {
            panic!("invalid field must be skipped");
        };
        assert!(errors.contains(&ValidationError::MissingLabel));
        assert_eq!(target.mutations(), 0);
        assert_eq!(field.internal_name(), None);
        assert_eq!(parent.counter(ASSOCIATION), 0);
    }

    #[test]
    fn test_duplicate_label_is_skipped_until_renamed() {
        let parent = FieldSet::new("Article");
        let first = parent.new_field(ASSOCIATION, "Author", "String");
        let second = parent.new_field(ASSOCIATION, "Author", "Text");
        parent.insert(first.clone()).unwrap();
        parent.insert(second.clone()).unwrap();

        assert!(first.validate(&parent).is_err());
        assert!(second.validate(&parent).is_err());

        let mut renamed = second.clone();
        renamed.label = "Editor".to_string();
        assert!(parent.update(renamed.clone()));

        assert_eq!(first.validate(&parent), Ok(()));
        assert_eq!(renamed.validate(&parent), Ok(()));
    }

    #[test]
    fn test_category_dispatches_category_wiring_only() {
        let parent = FieldSet::new("Article");
        let mut target = RecordingSchema::default();
        let mut field = parent
            .new_field(ASSOCIATION, "Section", "Category")
            .with_category_items(vec![
                CategoryItem::new("Opinion", 1),
                CategoryItem::new("News", 0),
            ]);

        let outcome = field.apply(&parent, &registry(), &mut target).unwrap();

        assert!(outcome.is_applied());
        assert_eq!(
            target.attributes,
            vec![("custom_field_1".to_string(), TypeRef::text())]
        );
        assert_eq!(
            target.category_wirings,
            vec![(
                "custom_field_1".to_string(),
                vec!["News".to_string(), "Opinion".to_string()]
            )]
        );
        assert!(target.default_wirings.is_empty());
    }

    #[test]
    fn test_other_kinds_dispatch_default_wiring_only() {
        let parent = FieldSet::new("Article");
        let registry = registry();

        for kind in ["String", "Text", "Date"] {
            let mut target = RecordingSchema::default();
            let mut field = parent.new_field(ASSOCIATION, format!("{} field", kind), kind);

            field.apply(&parent, &registry, &mut target).unwrap();

            assert_eq!(target.default_wirings.len(), 1, "kind {}", kind);
            assert!(target.category_wirings.is_empty(), "kind {}", kind);
        }
    }

    #[test]
    fn test_reapply_overwrites_same_attribute() {
        let parent = FieldSet::new("Article");
        let registry = registry();
        let mut schema = Schema::new("Article");
        let mut field = parent.new_field(ASSOCIATION, "Publication Date", "Date");

        field.apply(&parent, &registry, &mut schema).unwrap();
        field.apply(&parent, &registry, &mut schema).unwrap();

        assert_eq!(schema.len(), 1);
        assert_eq!(parent.counter(ASSOCIATION), 1);
        assert_eq!(
            schema.resolve("publication_date").map(|a| a.name.as_str()),
            Some("custom_field_1")
        );
    }

    #[test]
    fn test_unknown_kind_propagates() {
        let parent = FieldSet::new("Article");
        let mut target = RecordingSchema::default();
        let mut field: FieldDescriptor = parent.new_field(ASSOCIATION, "Score", "Rating");

        assert_eq!(
            field.apply(&parent, &registry(), &mut target),
            Err(FieldError::UnknownKind("Rating".to_string()))
        );
        assert_eq!(target.mutations(), 0);
    }
}

mod definitions {
    use super::*;

    fn service_with_rating() -> FieldService {
        let config = Config {
            types: vec![TypeEntry {
                name: "Rating".to_string(),
                storage: StorageType::Integer,
            }],
            ..Config::default()
        };
        FieldService::from_ref(&Context::new(config))
    }

    #[test]
    fn test_materialize_toml_definition() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("article.toml");
        std::fs::write(
            &path,
            r#"
name = "Article"
association = "article_fields"

[[fields]]
label = "Publication Date"
kind = "Date"
position = 1

[[fields]]
label = "Section"
kind = "Category"
items = [{ name = "Opinion", position = 1 }, { name = "News" }]

[[fields]]
label = "Score"
kind = "Rating"
alias = "stars"
position = 2

[[fields]]
kind = "String"
position = 3
"#,
        )
        .unwrap();

        let (schema, report) = service_with_rating().materialize_file(&path).unwrap();

        assert_eq!(schema.name, "Article");
        assert_eq!(report.applied.len(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].association, "article_fields");

        let section = schema.resolve("section").unwrap();
        assert_eq!(section.name, "custom_field_1");
        assert_eq!(
            section.options,
            Some(vec!["News".to_string(), "Opinion".to_string()])
        );
        assert_eq!(
            schema.resolve("publication_date").map(|a| a.type_ref.storage),
            Some(StorageType::Date)
        );
        assert_eq!(
            schema.resolve("stars").map(|a| a.type_ref.storage),
            Some(StorageType::Integer)
        );
    }

    #[test]
    fn test_materialize_json_definition_keeps_existing_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.json");
        std::fs::write(
            &path,
            r#"{
                "name": "Asset",
                "counter": 3,
                "fields": [
                    { "label": "Description", "kind": "Text", "name": "custom_field_3" },
                    { "label": "Credits", "kind": "String" }
                ]
            }"#,
        )
        .unwrap();

        let (schema, _) = service_with_rating().materialize_file(&path).unwrap();

        assert_eq!(
            schema.resolve("description").map(|a| a.name.as_str()),
            Some("custom_field_3")
        );
        assert_eq!(
            schema.resolve("credits").map(|a| a.name.as_str()),
            Some("custom_field_4")
        );
    }

    #[test]
    fn test_unknown_kind_aborts_materialization() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(
            &path,
            "name = \"Article\"\n\n[[fields]]\nlabel = \"Mood\"\nkind = \"Feeling\"\n",
        )
        .unwrap();

        let err = service_with_rating().materialize_file(&path).unwrap_err();
        assert_eq!(err.to_string(), "Unknown field kind: Feeling");
    }

    #[test]
    fn test_declared_names_are_never_generated_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.json");
        std::fs::write(
            &path,
            r#"{
                "name": "Asset",
                "fields": [
                    { "label": "Description", "kind": "Text", "name": "custom_field_2" },
                    { "label": "A", "kind": "String", "position": 1 },
                    { "label": "B", "kind": "String", "position": 2 }
                ]
            }"#,
        )
        .unwrap();

        let (schema, report) = service_with_rating().materialize_file(&path).unwrap();

        let applied: Vec<_> = report
            .applied
            .iter()
            .map(|f| (f.alias.as_str(), f.name.as_str()))
            .collect();
        assert_eq!(
            applied,
            vec![
                ("description", "custom_field_2"),
                ("a", "custom_field_3"),
                ("b", "custom_field_4"),
            ]
        );
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_name_declared_twice_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset.toml");
        std::fs::write(
            &path,
            r#"
name = "Asset"

[[fields]]
label = "Description"
kind = "Text"
name = "custom_field_1"

[[fields]]
label = "Summary"
kind = "Text"
name = "custom_field_1"
"#,
        )
        .unwrap();

        let err = service_with_rating().materialize_file(&path).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid definition: internal name 'custom_field_1' is declared twice"
        );
    }
}
