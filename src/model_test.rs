#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn wall(start: Point, end: Point) -> WallSegment {
    WallSegment {
        id: Uuid::new_v4(),
        start,
        end,
        thickness_mm: 150.0,
        kind: WallKind::Interior,
        color: "#374151".into(),
    }
}

fn door_in(wall_id: Option<EntityId>) -> Door {
    Door {
        id: Uuid::new_v4(),
        position: pt(0.0, 0.0),
        width_mm: 900.0,
        wall_id: None,
        wall_segment_id: wall_id,
        wall_position: wall_id.map(|_| 0.5),
        is_embedded: wall_id.is_some(),
    }
}

fn product(position: Point, length: f64, width: f64, rotation: f64) -> PlacedProduct {
    PlacedProduct {
        id: Uuid::new_v4(),
        product_id: "sofa-1".into(),
        name: "Sofa".into(),
        category: "seating".into(),
        position,
        rotation,
        dimensions: Dimensions { length, width, height: 800.0 },
        scale: 1.0,
        color: "#93C5FD".into(),
        model_path: None,
        thumbnail: None,
    }
}

// =============================================================
// Entities
// =============================================================

#[test]
fn wall_length_and_midpoint() {
    let w = wall(pt(0.0, 0.0), pt(30.0, 40.0));
    assert_eq!(w.length_px(), 50.0);
    assert_eq!(w.midpoint(), pt(15.0, 20.0));
}

#[test]
fn wall_serializes_kind_as_type() {
    let w = wall(pt(0.0, 0.0), pt(1.0, 0.0));
    let json = serde_json::to_value(&w).unwrap();
    assert_eq!(json["type"], "interior");
    assert_eq!(json["thicknessMm"], 150.0);
}

#[test]
fn room_recompute_converts_area_and_perimeter() {
    let mut room = Room {
        id: Uuid::new_v4(),
        name: "Room 1".into(),
        points: vec![pt(0.0, 0.0), pt(100.0, 0.0), pt(100.0, 100.0), pt(0.0, 100.0)],
        area_mm2: 0.0,
        perimeter_mm: 0.0,
        color: String::new(),
    };
    room.recompute(UnitConverter::new(1.0));
    assert_eq!(room.area_mm2, 10_000.0);
    assert_eq!(room.perimeter_mm, 400.0);
}

#[test]
fn product_footprint_scales_with_units_and_product_scale() {
    let mut p = product(pt(0.0, 0.0), 2000.0, 900.0, 0.0);
    p.scale = 0.5;
    let (w, h) = p.footprint_px(UnitConverter::new(0.1));
    assert!((w - 100.0).abs() < 1e-9);
    assert!((h - 45.0).abs() < 1e-9);
}

#[test]
fn product_contains_uses_rotation() {
    let p = product(pt(200.0, 200.0), 100.0, 50.0, std::f64::consts::FRAC_PI_2);
    let units = UnitConverter::new(1.0);
    assert!(p.contains(pt(200.0, 225.0), units));
    assert!(!p.contains(pt(240.0, 200.0), units));
}

// =============================================================
// Drop payload
// =============================================================

#[test]
fn payload_parses_string_id() {
    let raw = r#"{"id":"chair-7","name":"Chair","category":"seating","dimensions":{"length":500,"width":450,"height":900}}"#;
    let payload = ProductPayload::parse(raw).unwrap();
    assert_eq!(payload.id, "chair-7");
    assert_eq!(payload.dimensions.length, 500.0);
}

#[test]
fn payload_accepts_numeric_id() {
    let raw = r#"{"id":42,"name":"Desk","category":"office","dimensions":{"length":1200,"width":600}}"#;
    let payload = ProductPayload::parse(raw).unwrap();
    assert_eq!(payload.id, "42");
    assert_eq!(payload.dimensions.height, 0.0);
}

#[test]
fn payload_rejects_garbage() {
    assert!(matches!(ProductPayload::parse("not json"), Err(PayloadError::Json(_))));
}

#[test]
fn payload_rejects_missing_dimensions() {
    let raw = r#"{"id":"x","name":"X","category":"c"}"#;
    assert!(matches!(ProductPayload::parse(raw), Err(PayloadError::Json(_))));
}

#[test]
fn payload_rejects_zero_width() {
    let raw = r#"{"id":"x","name":"X","category":"c","dimensions":{"length":100,"width":0}}"#;
    assert!(matches!(
        ProductPayload::parse(raw),
        Err(PayloadError::InvalidDimensions { width, .. }) if width == 0.0
    ));
}

#[test]
fn payload_into_placement_centers_on_drop_point() {
    let raw = r##"{"id":"lamp","name":"Lamp","category":"lighting","dimensions":{"length":300,"width":300},"color":"#FDE68A"}"##;
    let placement = ProductPayload::parse(raw).unwrap().into_placement(pt(10.0, 20.0));
    assert_eq!(placement.position, pt(10.0, 20.0));
    assert_eq!(placement.rotation, 0.0);
    assert_eq!(placement.scale, 1.0);
    assert_eq!(placement.color.as_deref(), Some("#FDE68A"));
}

// =============================================================
// Store
// =============================================================

#[test]
fn store_starts_empty() {
    let store = PlanStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn remove_wall_drops_embedded_doors_only() {
    let mut store = PlanStore::new();
    let w = wall(pt(0.0, 0.0), pt(100.0, 0.0));
    let wid = w.id;
    store.push_wall(w);
    let embedded = door_in(Some(wid));
    let embedded_id = embedded.id;
    store.push_door(embedded);
    store.push_door(door_in(None));

    let (removed, doors) = store.remove_wall(&wid).unwrap();
    assert_eq!(removed.id, wid);
    assert_eq!(doors, vec![embedded_id]);
    assert_eq!(store.doors().len(), 1);
    assert!(store.walls().is_empty());
}

#[test]
fn remove_unknown_returns_none() {
    let mut store = PlanStore::new();
    assert!(store.remove_wall(&Uuid::new_v4()).is_none());
    assert!(store.remove_product(&Uuid::new_v4()).is_none());
}

#[test]
fn patch_applies_only_present_fields() {
    let mut store = PlanStore::new();
    let p = product(pt(0.0, 0.0), 100.0, 50.0, 0.0);
    let id = p.id;
    store.push_product(p);

    let patch = ProductPatch { rotation: Some(1.0), name: Some("Couch".into()), ..ProductPatch::default() };
    assert!(store.apply_product_patch(&id, &patch));

    let updated = store.product(&id).unwrap();
    assert_eq!(updated.rotation, 1.0);
    assert_eq!(updated.name, "Couch");
    assert_eq!(updated.position, pt(0.0, 0.0));
    assert_eq!(updated.dimensions.length, 100.0);
}

#[test]
fn patch_unknown_product_is_false() {
    let mut store = PlanStore::new();
    assert!(!store.apply_product_patch(&Uuid::new_v4(), &ProductPatch::default()));
}

#[test]
fn patch_serializes_sparse() {
    let patch = ProductPatch { position: Some(pt(1.0, 2.0)), ..ProductPatch::default() };
    let json = serde_json::to_string(&patch).unwrap();
    assert_eq!(json, r#"{"position":{"x":1.0,"y":2.0}}"#);
}

#[test]
fn snapshot_and_load_preserve_order() {
    let mut store = PlanStore::new();
    let a = product(pt(0.0, 0.0), 10.0, 10.0, 0.0);
    let b = product(pt(5.0, 5.0), 10.0, 10.0, 0.0);
    let ids = [a.id, b.id];
    store.push_product(a);
    store.push_product(b);
    store.push_wall(wall(pt(0.0, 0.0), pt(1.0, 1.0)));

    let snapshot = store.snapshot();
    let mut other = PlanStore::new();
    other.load(snapshot);
    let loaded: Vec<EntityId> = other.products().iter().map(|p| p.id).collect();
    assert_eq!(loaded, ids);
    assert_eq!(other.len(), 3);

    other.clear();
    assert!(other.is_empty());
}

#[test]
fn entities_deserialize_with_missing_collections() {
    let entities: Entities = serde_json::from_str(r#"{"walls":[]}"#).unwrap();
    assert!(entities.products.is_empty());
    assert!(entities.rooms.is_empty());
}
