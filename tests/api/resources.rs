//! Behaviour shared by every registered resource.

use secretaria::resource::{Identity, Kind, Resource};
use secretaria::school::RESOURCES;
use serde_json::{Map, Value, json};

use super::harness;

fn sample(kind: Kind, resource: &Resource) -> Value {
    match kind {
        Kind::Integer => json!(1),
        Kind::Text => json!(format!("texto {}", resource.name)),
        Kind::Date => json!("2024-06-20"),
        Kind::Decimal => json!(8.5),
        Kind::Flag => json!(true),
    }
}

/// Required fields only, keyed by `prefix` + column.
fn body(resource: &Resource, prefix: &str) -> Value {
    let object: Map<String, Value> = resource
        .fields
        .iter()
        .filter(|f| f.required)
        .map(|f| (format!("{prefix}{}", f.name), sample(f.kind, resource)))
        .collect();
    Value::Object(object)
}

fn update_body(resource: &Resource) -> Value {
    match resource.identity {
        Identity::Serial(_) => body(resource, ""),
        Identity::Composite {
            replacement_prefix, ..
        } => body(resource, replacement_prefix),
    }
}

/// Item path with every key parameter set to `id`.
fn item(resource: &Resource, id: i64) -> String {
    let keys = resource.key_columns().len();
    let mut path = format!("/api{}", resource.path);
    for _ in 0..keys {
        path.push_str(&format!("/{id}"));
    }
    path
}

#[tokio::test]
async fn empty_database_behaviour() {
    let app = harness::start().await;

    for resource in RESOURCES {
        let base = format!("/api{}", resource.path);

        let (status, list) = app.get(&base).await;
        assert_eq!((status, list), (200, json!([])), "{}", resource.name);

        let (status, missing) = app.get(&item(resource, 999)).await;
        assert_eq!(status, 404, "{}", resource.name);
        assert_eq!(missing, json!({ "error": resource.messages.not_found }));

        let (status, invalid) = app.post(&base, &json!({})).await;
        assert_eq!(status, 400, "{}", resource.name);
        assert!(
            invalid["error"]
                .as_str()
                .is_some_and(|m| m.starts_with("Missing required field")),
            "{}: {invalid}",
            resource.name
        );

        let (status, updated) = app.put(&item(resource, 999), &update_body(resource)).await;
        assert_eq!(status, 200, "{}", resource.name);
        assert_eq!(updated, json!({ "message": resource.messages.updated }));

        let (status, deleted) = app.delete(&item(resource, 999)).await;
        assert_eq!(status, 200, "{}", resource.name);
        assert_eq!(deleted, json!({ "message": resource.messages.deleted }));
    }

    app.stop().await;
}

#[tokio::test]
async fn every_resource_round_trips() {
    let app = harness::start().await;

    // Registration order satisfies every foreign key
    for resource in RESOURCES {
        let (status, created) = app.post(&format!("/api{}", resource.path), &body(resource, "")).await;
        assert_eq!(status, 201, "{}: {created}", resource.name);
        assert_eq!(created, json!({ "message": resource.messages.created }));
    }

    for resource in RESOURCES {
        let (status, row) = app.get(&item(resource, 1)).await;
        assert_eq!(status, 200, "{}: {row}", resource.name);

        if let Identity::Serial(id) = resource.identity {
            assert_eq!(row[id], json!(1), "{}", resource.name);
        }
        for field in resource.fields {
            let expected = if field.required {
                sample(field.kind, resource)
            } else {
                Value::Null
            };
            assert_eq!(row[field.name], expected, "{}.{}", resource.name, field.name);
        }
        assert_eq!(
            row.as_object().map(Map::len),
            Some(resource.columns().len()),
            "{}",
            resource.name
        );
    }

    app.stop().await;
}
