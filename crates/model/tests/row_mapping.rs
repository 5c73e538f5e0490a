use serde_json::{Value, json};
use std::sync::Arc;
use std::thread;
use tdl_domain::config::AdapterKind;
use tdl_model::{
    CollectionClass, CollectionClassRef, Descriptor, DocumentClass, DocumentCollection, Model,
    ModelClass, ModelClassRef, ModelError, ModelRegistry, Properties, RawRow, RowMapper,
    StorageConfig, construct_from_row, with_row_mapper,
};

#[derive(Debug)]
struct Task;

impl ModelClass for Task {
    fn name(&self) -> &str {
        "Task"
    }

    fn construct(&self, properties: Properties) -> Result<Box<dyn Model>, ModelError> {
        if properties.get("title").is_some_and(|t| !t.is_string()) {
            return Err(ModelError::Construct {
                message: "title must be a string".into(),
                context: None,
            });
        }
        DocumentClass::new("Task").construct(properties)
    }
}

#[derive(Debug)]
struct TaskRows;

impl RowMapper for TaskRows {
    fn map_row(
        &self,
        model: &dyn ModelClass,
        row: &dyn RawRow,
    ) -> Result<Box<dyn Model>, ModelError> {
        construct_from_row(model, row)
    }
}

fn add_map_row(base: CollectionClassRef) -> CollectionClassRef {
    with_row_mapper(base, TaskRows)
}

#[derive(Debug)]
struct Shouting(ModelClassRef);

impl ModelClass for Shouting {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn construct(&self, properties: Properties) -> Result<Box<dyn Model>, ModelError> {
        let mut instance = self.0.construct(properties)?;
        let loud = instance.get("title").and_then(Value::as_str).map(str::to_uppercase);
        if let Some(loud) = loud {
            instance.set("loud_title", json!(loud));
        }
        Ok(instance)
    }
}

fn shout(base: ModelClassRef) -> ModelClassRef {
    Arc::new(Shouting(base))
}

fn task_descriptor() -> Descriptor {
    Descriptor::builder("Task")
        .storage(StorageConfig::new(AdapterKind::Memory, "todolite").static_property("type", json!("task")))
        .extend_collection(add_map_row)
        .build()
        .expect("valid descriptor")
}

fn task_registry() -> ModelRegistry {
    ModelRegistry::builder()
        .register_with(task_descriptor(), Arc::new(Task), DocumentCollection::shared("Tasks"))
        .expect("register task")
        .build()
}

#[test]
fn mapped_instance_exposes_exactly_the_row_properties() {
    let registry = task_registry();
    let tasks = registry.get("Task").unwrap();

    let rows = [
        json!({ "documentProperties": {} }),
        json!({ "documentProperties": { "_id": "t1", "title": "Buy milk", "tags": ["home"], "due": null } }),
        json!({ "documentProperties": { "nested": { "a": { "b": 1 } }, "count": 3.5 } }),
    ];

    for row in &rows {
        let expected = row.document_properties().unwrap();
        let instance = tasks.map_row(row).unwrap();
        assert_eq!(instance.properties(), expected);
        assert_eq!(instance.type_name(), "Task");
    }
}

#[test]
fn buy_milk_row_maps_to_task() {
    let registry = task_registry();
    let raw_row = json!({ "documentProperties": { "title": "Buy milk", "done": false } });

    let task = registry.get("Task").unwrap().map_row(&raw_row).unwrap();
    assert_eq!(task.get("title"), Some(&json!("Buy milk")));
    assert_eq!(task.get("done"), Some(&json!(false)));
}

#[test]
fn row_without_properties_is_invalid() {
    let registry = task_registry();
    let err = registry.get("Task").unwrap().map_row(&json!({})).unwrap_err();
    assert!(matches!(err, ModelError::InvalidRow { .. }), "got {err:?}");
}

#[test]
fn constructor_errors_propagate_unchanged() {
    let registry = task_registry();
    let row = json!({ "documentProperties": { "title": 42 } });

    let err = registry.get("Task").unwrap().map_row(&row).unwrap_err();
    match err {
        ModelError::Construct { message, context } => {
            assert_eq!(message, "title must be a string");
            assert!(context.is_none());
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn map_row_is_idempotent() {
    let registry = task_registry();
    let tasks = registry.get("Task").unwrap();
    let row = json!({ "documentProperties": { "title": "Walk dog" } });

    let first = tasks.map_row(&row).unwrap();
    let second = tasks.map_row(&row).unwrap();
    assert_eq!(first.properties(), second.properties());
    assert_eq!(row, json!({ "documentProperties": { "title": "Walk dog" } }));
}

#[test]
fn map_row_is_absent_before_extension_and_present_after() {
    let base = DocumentCollection::shared("Tasks");
    assert!(base.row_mapper().is_none());

    let extended = task_descriptor().extend_collection(Arc::clone(&base));
    assert!(extended.row_mapper().is_some());
    assert_eq!(extended.name(), "Tasks");
}

#[test]
fn collections_without_map_row_fall_back_to_plain_construction() {
    let descriptor = Descriptor::builder("Note")
        .storage(StorageConfig::new(AdapterKind::Memory, "todolite"))
        .build()
        .unwrap();
    let registry = ModelRegistry::builder().register(descriptor).unwrap().build();
    let notes = registry.get("Note").unwrap();

    assert!(notes.collection().row_mapper().is_none());
    let note = notes.map_row(&json!({ "documentProperties": { "body": "hi" } })).unwrap();
    assert_eq!(note.get("body"), Some(&json!("hi")));
    assert!(matches!(notes.map_row(&json!({})), Err(ModelError::InvalidRow { .. })));
}

#[test]
fn model_extender_yields_independent_classes() {
    let descriptor = Descriptor::builder("Task")
        .storage(StorageConfig::new(AdapterKind::Memory, "todolite"))
        .extend_model(shout)
        .build()
        .unwrap();

    let plain = DocumentClass::shared("Task");
    let strict: ModelClassRef = Arc::new(Task);
    let a = descriptor.extend_model(Arc::clone(&plain));
    let b = descriptor.extend_model(Arc::clone(&strict));
    assert!(!Arc::ptr_eq(&a, &b));

    let mut props = Properties::new();
    props.insert("title".to_owned(), json!("milk"));
    let from_a = a.construct(props.clone()).unwrap();
    let from_b = b.construct(props.clone()).unwrap();
    assert_eq!(from_a.get("loud_title"), Some(&json!("MILK")));
    assert_eq!(from_b.get("loud_title"), Some(&json!("MILK")));

    // Bases are untouched by the extension.
    assert!(plain.construct(props.clone()).unwrap().get("loud_title").is_none());
    assert!(strict.construct(props).unwrap().get("loud_title").is_none());
}

#[test]
fn static_properties_cannot_be_changed_through_copies() {
    let registry = task_registry();
    let tasks = registry.get("Task").unwrap();

    let mut copy = tasks.descriptor().storage().static_properties().clone();
    copy.insert("type".to_owned(), json!("hacked"));
    copy.insert("extra".to_owned(), json!(true));

    assert_eq!(tasks.descriptor().storage().static_properties().len(), 1);
    let instance = tasks.instantiate(Properties::new()).unwrap();
    assert_eq!(instance.get("type"), Some(&json!("task")));
    assert!(instance.get("extra").is_none());
}

#[test]
fn instantiate_stamps_static_properties_over_user_fields() {
    let registry = task_registry();
    let mut props = Properties::new();
    props.insert("type".to_owned(), json!("list"));
    props.insert("title".to_owned(), json!("Buy milk"));

    let task = registry.get("Task").unwrap().instantiate(props).unwrap();
    assert_eq!(task.get("type"), Some(&json!("task")));
    assert_eq!(task.get("title"), Some(&json!("Buy milk")));
}

#[test]
fn duplicate_and_unknown_names_are_rejected() {
    let err = ModelRegistry::builder()
        .register(task_descriptor())
        .unwrap()
        .register(task_descriptor())
        .unwrap_err();
    assert!(matches!(err, ModelError::Duplicate { .. }));

    let registry = task_registry();
    assert!(matches!(registry.get("Profile"), Err(ModelError::NotFound { .. })));
    assert_eq!(registry.names(), vec!["Task"]);
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("Task"));
}

#[test]
fn registry_is_readable_from_many_threads() {
    let registry = task_registry();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = registry.clone();
            thread::spawn(move || {
                let row = json!({ "documentProperties": { "title": format!("task {i}") } });
                let task = registry.get("Task").unwrap().map_row(&row).unwrap();
                task.get("title").and_then(Value::as_str).map(str::to_owned)
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), Some(format!("task {i}")));
    }
}
