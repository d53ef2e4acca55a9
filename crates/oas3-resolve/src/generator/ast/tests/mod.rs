use serde_json::json;

use super::{
  DiscriminatorDescriptor, DocumentId, FieldPresence, NodeKind, PresenceState, SchemaGraph, SchemaLocation, UnionKind,
};

#[test]
fn test_presence_classification() {
  let cases = [
    (true, false, FieldPresence::Required),
    (false, false, FieldPresence::Optional),
    (true, true, FieldPresence::RequiredNullable),
    (false, true, FieldPresence::OptionalNullable),
  ];
  for (required, nullable, expected) in cases {
    let presence = FieldPresence::classify(required, nullable);
    assert_eq!(presence, expected, "required={required} nullable={nullable}");
    assert_eq!(presence.is_required(), required);
    assert_eq!(presence.needs_tri_state(), nullable);
  }
}

#[test]
fn test_presence_states() {
  assert_eq!(FieldPresence::Required.states(), &[PresenceState::Present]);
  assert_eq!(FieldPresence::OptionalNullable.states().len(), 3);
  assert!(
    !FieldPresence::RequiredNullable
      .states()
      .contains(&PresenceState::Unspecified)
  );
}

#[test]
fn test_presence_observation() {
  let value = json!("x");
  let null = json!(null);
  assert_eq!(FieldPresence::OptionalNullable.observe(None), PresenceState::Unspecified);
  assert_eq!(
    FieldPresence::OptionalNullable.observe(Some(&null)),
    PresenceState::ExplicitNull
  );
  assert_eq!(FieldPresence::Optional.observe(Some(&value)), PresenceState::Present);
  assert_eq!(FieldPresence::RequiredNullable.observe(None), PresenceState::ExplicitNull);
}

#[test]
fn test_location_display() {
  let root = SchemaLocation::root("/components/schemas/Cat");
  assert_eq!(root.to_string(), "#/components/schemas/Cat");
  assert_eq!(root.schema_component().as_deref(), Some("Cat"));

  let external = SchemaLocation::new(DocumentId::External("common/pets.yaml".into()), "/Pet");
  assert_eq!(external.to_string(), "common/pets.yaml#/Pet");
  assert_eq!(external.bare_name().as_deref(), Some("Pet"));
  assert_eq!(external.document.dir(), "common");
}

#[test]
fn test_location_child_escapes_tokens() {
  let op = SchemaLocation::root("/paths");
  let body = op.child(["/foo", "post", "requestBody", "content", "application/json", "schema"]);
  assert_eq!(
    &*body.pointer,
    "/paths/~1foo/post/requestBody/content/application~1json/schema"
  );
  assert_eq!(body.bare_name(), None);
}

#[test]
fn test_graph_resolves_wrappers() {
  let mut graph = SchemaGraph::default();
  let target = graph.push(SchemaLocation::root("/components/schemas/Pet"));
  let wrapper = graph.push(SchemaLocation::root("/components/schemas/MaybePet"));
  let outer = graph.push(SchemaLocation::root("/components/schemas/Outer"));

  graph.get_mut(target).unwrap().kind = NodeKind::Object;
  let maybe = graph.get_mut(wrapper).unwrap();
  maybe.kind = NodeKind::Reference(target);
  maybe.nullable = true;
  graph.get_mut(outer).unwrap().kind = NodeKind::Reference(wrapper);

  assert_eq!(graph.resolve(outer), target);
  assert!(graph.is_nullable(outer));
  assert!(!graph.is_nullable(target));
}

#[test]
fn test_graph_wrapper_loop_terminates() {
  let mut graph = SchemaGraph::default();
  let a = graph.push(SchemaLocation::root("/components/schemas/A"));
  let b = graph.push(SchemaLocation::root("/components/schemas/B"));
  graph.get_mut(a).unwrap().kind = NodeKind::Reference(b);
  graph.get_mut(b).unwrap().kind = NodeKind::Reference(a);
  let resolved = graph.resolve(a);
  assert!(resolved == a || resolved == b);
  assert!(!graph.is_nullable(a));
}

#[test]
fn test_discriminator_tags_for_member() {
  let mut graph = SchemaGraph::default();
  let owner = graph.push(SchemaLocation::root("/components/schemas/Pet"));
  let cat = graph.push(SchemaLocation::root("/components/schemas/Cat"));
  let descriptor = DiscriminatorDescriptor {
    property_name: "petType".into(),
    mapping: [("cat".to_string(), cat), ("Cat".to_string(), cat)].into_iter().collect(),
    owner,
  };
  assert_eq!(descriptor.tags_for(cat), vec!["cat".to_string(), "Cat".to_string()]);
  assert_eq!(descriptor.member_for("cat"), Some(cat));
  assert_eq!(descriptor.member_for("dog"), None);
  assert_eq!(UnionKind::OneOf.to_string(), "oneOf");
}
