//! Generation from YAML manifests through the document generator.

use std::io::Write;
use std::sync::Arc;

use serde_json::json;
use swagdoc_core::ParameterLocation;
use swagdoc_gen::{DocumentGenerator, SwaggerSettings};
use swagdoc_manifest::{ManifestError, ManifestIntrospection};

const SHOP: &str = r#"
schemas:
  - name: Widget
    module: shop.serializers
    fields:
      - {name: id, kind: integer, read_only: true}
      - {name: name, kind: string, help_text: Display name}
      - {name: colour, kind: choice, choices: [red, green], required: false}
handlers:
  - name: WidgetList
    module: shop.views
    serializer: Widget
    methods:
      - name: get
        doc: |
          List widgets.

          Ordered by name.
          ---
          tags: [widgets]
          responseMessages:
            - code: 200
              message: The widgets
              responseModel: Widget
      - name: post
        doc: Create a widget.
  - name: WidgetViewSet
    module: shop.views
    kind: viewset
    serializer: Widget
    methods:
      - {name: list, doc: Browse widgets.}
      - {name: retrieve, doc: One widget.}
  - name: ping
    module: shop.views
    kind: function_view
    methods:
      - name: options
  - name: Broken
    module: shop.views
    methods:
      - name: get
        doc: |
          Broken metadata.
          ---
          tags: [unclosed
      - name: delete
        doc: |
          Gone.
          ---
          responseMessages:
            - {code: 404, message: No such thing, responseModel: Ghost}
endpoints:
  - path: /widgets
    handler: WidgetList
  - path: /browse
    handler: WidgetViewSet
    actions: {get: list}
  - path: /browse/{pk}
    handler: WidgetViewSet
    actions: {get: retrieve}
  - path: /ping
    handler: ping
  - path: /broken
    handler: Broken
"#;

fn generate() -> swagdoc_core::Document {
    let layer = ManifestIntrospection::from_yaml_str(SHOP).unwrap();
    let endpoints = layer.endpoints();
    DocumentGenerator::new(&layer, Arc::new(SwaggerSettings::default())).generate(&endpoints)
}

#[test]
fn widget_model_from_manifest() {
    let document = generate();
    let widget = document.definitions["Widget"].as_model().unwrap();
    assert_eq!(
        serde_json::to_value(&widget.properties).unwrap(),
        json!({
            "id": {"type": "integer"},
            "name": {"type": "string", "description": "Display name"},
            "colour": {"type": "string", "enum": ["red", "green"]}
        })
    );
    assert_eq!(widget.required, vec!["name"]);
}

#[test]
fn docstring_drives_the_operation() {
    let document = generate();
    let get = &document.paths["/widgets"]["get"];
    assert_eq!(get.summary, "List widgets.");
    assert_eq!(get.description, "Ordered by name.");
    assert_eq!(get.tags.as_deref(), Some(&["widgets".to_string()][..]));
    assert_eq!(get.operation_id, "Widget_List_Get");
    let ok = &get.responses["200"];
    assert_eq!(ok.description, "The widgets");
    assert_eq!(
        serde_json::to_value(ok.schema.as_ref().unwrap()).unwrap(),
        json!({"$ref": "#/definitions/Widget"})
    );
}

#[test]
fn post_gets_body_parameter_and_default_response() {
    let document = generate();
    let post = &document.paths["/widgets"]["post"];
    assert_eq!(post.parameters.len(), 1);
    assert_eq!(post.parameters[0].location, ParameterLocation::Body);
    assert_eq!(
        post.parameters[0].schema.as_ref().and_then(|s| s.ref_path.as_deref()),
        Some("#/definitions/Widget")
    );
    assert_eq!(post.responses["default"].description, "Default response");
}

#[test]
fn viewset_paths_are_documented_separately() {
    let document = generate();
    assert_eq!(document.paths["/browse"]["get"].summary, "Browse widgets.");
    assert_eq!(document.paths["/browse"]["get"].operation_id, "Widget_List");
    let retrieve = &document.paths["/browse/{pk}"]["get"];
    assert_eq!(retrieve.summary, "One widget.");
    assert_eq!(retrieve.parameters[0].name, "pk");
    assert!(retrieve.parameters[0].required);
}

#[test]
fn options_only_handler_has_an_empty_path() {
    let document = generate();
    assert!(document.paths["/ping"].is_empty());
}

#[test]
fn malformed_metadata_is_marked_not_fatal() {
    let document = generate();
    let get = &document.paths["/broken"]["get"];
    assert_eq!(get.summary, "Broken metadata.");
    assert!(get.description.starts_with("<pre>YAMLError:\n "));
    assert!(get.description.ends_with("</pre>"));
    assert!(get.tags.is_none());
}

#[test]
fn unresolved_response_model_keeps_description() {
    let document = generate();
    let missing = &document.paths["/broken"]["delete"].responses["404"];
    assert_eq!(missing.description, "No such thing");
    assert!(missing.schema.is_none());
    assert!(!document.definitions.contains_key("Ghost"));
}

#[test]
fn manifest_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHOP.as_bytes()).unwrap();
    let layer = ManifestIntrospection::from_path(file.path()).unwrap();
    assert_eq!(layer.endpoints().len(), 5);
}

#[test]
fn missing_manifest_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = ManifestIntrospection::from_path(&dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, ManifestError::Read { .. }));
}
