use std::collections::{BTreeMap, BTreeSet};

use penumbra::attr::codec::{decode_attributes, encode_attributes};
use penumbra::{
    AttributeValue, Attributes, CodecOptions, Color, EdgeId, Graph, Point, Rect, Size, Uri,
    Vertex,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone)]
enum Operation {
    AddVertex { label: Option<String> },
    AddEdge { tail: usize, head: usize },
    RemoveVertex { pick: usize },
    RemoveEdge { pick: usize },
    SetVertexAttr { pick: usize, value: i64 },
}

fn arb_operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        3 => proptest::option::of("[A-Z][a-z]{2,8}")
            .prop_map(|label| Operation::AddVertex { label }),
        4 => (any::<usize>(), any::<usize>())
            .prop_map(|(tail, head)| Operation::AddEdge { tail, head }),
        1 => any::<usize>().prop_map(|pick| Operation::RemoveVertex { pick }),
        1 => any::<usize>().prop_map(|pick| Operation::RemoveEdge { pick }),
        1 => (any::<usize>(), any::<i64>())
            .prop_map(|(pick, value)| Operation::SetVertexAttr { pick, value }),
    ]
}

fn pick<T: Copy>(items: &BTreeSet<T>, idx: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        items.iter().nth(idx % items.len()).copied()
    }
}

fn apply(graph: &mut Graph, rng: &mut ChaCha8Rng, ops: &[Operation]) {
    for op in ops {
        match op {
            Operation::AddVertex { label } => {
                let mut vertex = Vertex::with_rng(rng);
                if let Some(label) = label {
                    vertex = vertex.with_attribute("label", label.as_str());
                }
                graph.insert_vertex(vertex).unwrap();
            }
            Operation::AddEdge { tail, head } => {
                let ids = graph.vertex_ids();
                if let (Some(t), Some(h)) = (pick(&ids, *tail), pick(&ids, *head)) {
                    graph
                        .insert_edge(penumbra::Edge::with_rng(t, h, rng))
                        .unwrap();
                }
            }
            Operation::RemoveVertex { pick: idx } => {
                if let Some(v) = pick(&graph.vertex_ids(), *idx) {
                    graph.remove_vertex(v).unwrap();
                }
            }
            Operation::RemoveEdge { pick: idx } => {
                if let Some(e) = pick(&graph.edge_ids(), *idx) {
                    graph.remove_edge(e).unwrap();
                }
            }
            Operation::SetVertexAttr { pick: idx, value } => {
                if let Some(v) = pick(&graph.vertex_ids(), *idx) {
                    graph.set_vertex_attr(v, "weight", *value).unwrap();
                }
            }
        }
    }
}

fn build(seed: u64, ops: &[Operation]) -> Graph {
    let mut graph = Graph::new();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    apply(&mut graph, &mut rng, ops);
    graph
}

fn dyadic() -> impl Strategy<Value = f64> {
    (-1_000_000i32..1_000_000).prop_map(|n| f64::from(n) / 64.0)
}

fn finite_bits() -> impl Strategy<Value = f64> {
    any::<u64>()
        .prop_map(f64::from_bits)
        .prop_filter("finite", |value| value.is_finite())
}

fn unit() -> impl Strategy<Value = f64> {
    (0u8..=64).prop_map(|n| f64::from(n) / 64.0)
}

fn arb_timestamp() -> impl Strategy<Value = OffsetDateTime> {
    (0i64..253_402_300_799, 0u32..1_000_000_000).prop_map(|(secs, nanos)| {
        OffsetDateTime::from_unix_timestamp(secs)
            .unwrap()
            .replace_nanosecond(nanos)
            .unwrap()
    })
}

fn arb_scalar() -> impl Strategy<Value = AttributeValue> {
    prop_oneof![
        any::<bool>().prop_map(AttributeValue::Bool),
        any::<i64>().prop_map(AttributeValue::Int),
        dyadic().prop_map(AttributeValue::Float),
        "\\PC{0,12}".prop_map(AttributeValue::String),
        arb_timestamp().prop_map(AttributeValue::Timestamp),
        "[a-z][a-z0-9+.-]{0,5}:[a-z0-9/]{0,10}"
            .prop_map(|text| AttributeValue::Uri(Uri::parse(&text).unwrap())),
        any::<u128>().prop_map(|n| AttributeValue::UniqueId(Uuid::from_u128(n))),
        (dyadic(), dyadic()).prop_map(|(x, y)| AttributeValue::Point(Point::new(x, y))),
        (dyadic(), dyadic()).prop_map(|(w, h)| AttributeValue::Size(Size::new(w, h))),
        (dyadic(), dyadic(), dyadic(), dyadic())
            .prop_map(|(x, y, w, h)| AttributeValue::Rect(Rect::new(x, y, w, h))),
        (unit(), unit(), unit(), unit())
            .prop_map(|(r, g, b, a)| AttributeValue::Color(Color::new(r, g, b, a))),
    ]
}

fn arb_value() -> impl Strategy<Value = AttributeValue> {
    arb_scalar().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(AttributeValue::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4).prop_map(AttributeValue::Map),
        ]
    })
}

fn arb_bag() -> impl Strategy<Value = BTreeMap<String, AttributeValue>> {
    prop::collection::btree_map("[a-z_]{1,8}", arb_value(), 0..6)
}

proptest! {
    #[test]
    fn prop_attribute_bags_round_trip(bag in arb_bag()) {
        let attrs: Attributes = bag.into_iter().collect();
        let strict = CodecOptions::default();
        match encode_attributes(&attrs).unwrap() {
            None => prop_assert!(attrs.is_empty()),
            Some(map) => {
                let decoded = decode_attributes(&map, &strict).unwrap();
                prop_assert_eq!(&decoded, &attrs);
                prop_assert_eq!(encode_attributes(&decoded).unwrap(), Some(map));
            }
        }
    }

    #[test]
    fn prop_any_sequence_keeps_integrity(seed in any::<u64>(), ops in prop::collection::vec(arb_operation(), 1..80)) {
        let graph = build(seed, &ops);
        prop_assert!(graph.check_integrity().is_ok());

        for vertex in graph.vertex_ids() {
            let expected_out: BTreeSet<EdgeId> =
                graph.edges().filter(|e| e.tail() == vertex).map(|e| e.id()).collect();
            let expected_in: BTreeSet<EdgeId> =
                graph.edges().filter(|e| e.head() == vertex).map(|e| e.id()).collect();
            prop_assert_eq!(graph.out_edges(vertex).unwrap(), expected_out.clone());
            prop_assert_eq!(graph.in_edges(vertex).unwrap(), expected_in.clone());
            prop_assert_eq!(
                graph.incident_edges_count(vertex).unwrap(),
                expected_out.len() + expected_in.len()
            );
        }
        for edge in graph.edges() {
            prop_assert!(graph.contains_vertex(edge.tail()));
            prop_assert!(graph.contains_vertex(edge.head()));
        }
    }

    #[test]
    fn prop_remove_vertex_cascades_exactly(seed in any::<u64>(), ops in prop::collection::vec(arb_operation(), 1..60), idx in any::<usize>()) {
        let mut graph = build(seed, &ops);
        let Some(victim) = pick(&graph.vertex_ids(), idx) else {
            return Ok(());
        };
        let incident = graph.incident_edges(victim).unwrap();
        let before = graph.edge_ids();

        graph.remove_vertex(victim).unwrap();

        let removed: BTreeSet<EdgeId> = before.difference(&graph.edge_ids()).copied().collect();
        prop_assert_eq!(removed, incident);
        prop_assert!(!graph.contains_vertex(victim));
        prop_assert!(graph.check_integrity().is_ok());
    }

    #[test]
    fn prop_document_round_trip_is_byte_stable(seed in any::<u64>(), ops in prop::collection::vec(arb_operation(), 1..60)) {
        let graph = build(seed, &ops);
        let text = graph.to_json().unwrap();
        let decoded = Graph::from_json(&text).unwrap();
        prop_assert_eq!(&decoded, &graph);
        prop_assert_eq!(decoded.to_json().unwrap(), text);
    }

    #[test]
    fn prop_mutating_a_clone_leaves_the_original(seed in any::<u64>(), base in prop::collection::vec(arb_operation(), 1..40), more in prop::collection::vec(arb_operation(), 1..40)) {
        let original = build(seed, &base);
        let snapshot = original.to_json().unwrap();

        let mut copy = original.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
        apply(&mut copy, &mut rng, &more);

        prop_assert_eq!(original.to_json().unwrap(), snapshot);
        prop_assert!(original.check_integrity().is_ok());
    }

    #[test]
    fn prop_duplicate_vertex_is_rejected_without_change(seed in any::<u64>(), ops in prop::collection::vec(arb_operation(), 1..40), idx in any::<usize>()) {
        let mut graph = build(seed, &ops);
        let Some(existing) = pick(&graph.vertex_ids(), idx) else {
            return Ok(());
        };
        let before = graph.clone();
        let result = graph.insert_vertex(Vertex::with_id(existing).with_attribute("weight", 0i64));
        prop_assert!(result.is_err());
        prop_assert_eq!(&graph, &before);
    }

    #[test]
    fn prop_floats_survive_json_text_bit_for_bit(values in prop::collection::vec(finite_bits(), 1..32)) {
        let mut graph = Graph::new();
        let vertex = graph.add_vertex();
        for (i, value) in values.iter().enumerate() {
            graph.set_vertex_attr(vertex, format!("f{i}"), *value).unwrap();
        }
        let decoded = Graph::from_json(&graph.to_json().unwrap()).unwrap();
        for (i, value) in values.iter().enumerate() {
            let back = decoded.vertex_attr::<f64>(vertex, format!("f{i}")).unwrap().unwrap();
            prop_assert_eq!(back.to_bits(), value.to_bits(), "{:e}", value);
        }
    }
}
