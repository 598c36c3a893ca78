//! Property tests for traversal and the analyzers built on it.

mod common;

use std::collections::{HashMap, HashSet, VecDeque};

use common::{asset, edge, numbered, numbered_with_status};
use faultline::analysis::{analyze_cascade_impact, compute_drift, find_root_cause};
use faultline::domain::{AssetId, ConfigMap, EdgeKind, EdgeKinds};
use faultline::graph::{GraphSnapshot, Traversal};
use proptest::prelude::*;

const NODES: usize = 12;

fn kind_strategy() -> impl Strategy<Value = EdgeKind> {
    prop::sample::select(EdgeKind::ALL.to_vec())
}

// Random edges, cycles and parallel edges included.
fn edge_strategy(n: usize) -> impl Strategy<Value = Vec<(usize, usize, EdgeKind)>> {
    prop::collection::vec((0..n, 0..n, kind_strategy()), 0..n * 3)
}

fn kinds_strategy() -> impl Strategy<Value = EdgeKinds> {
    prop::collection::vec(any::<bool>(), EdgeKind::ALL.len()).prop_map(|mask| {
        EdgeKind::ALL
            .into_iter()
            .zip(mask)
            .filter_map(|(kind, keep)| keep.then_some(kind))
            .collect()
    })
}

/// Plain BFS over the raw edge list, following edges forward or backward.
fn reference_depths(
    edges: &[(usize, usize, EdgeKind)],
    start: usize,
    kinds: EdgeKinds,
    max_depth: usize,
    backward: bool,
) -> HashMap<usize, usize> {
    let mut depths = HashMap::from([(start, 0)]);
    let mut queue = VecDeque::from([start]);
    while let Some(node) = queue.pop_front() {
        let depth = depths[&node];
        if depth == max_depth {
            continue;
        }
        for &(s, t, kind) in edges {
            if s == t || !kinds.contains(kind) {
                continue;
            }
            let (from, to) = if backward { (t, s) } else { (s, t) };
            if from == node && !depths.contains_key(&to) {
                depths.insert(to, depth + 1);
                queue.push_back(to);
            }
        }
    }
    depths.remove(&start);
    depths
}

fn node_index(id: &AssetId) -> usize {
    id.as_str()[1..].parse().unwrap()
}

proptest! {
    #[test]
    fn traversal_reports_each_asset_once(
        edges in edge_strategy(NODES),
        start in 0..NODES,
        max_depth in 1_usize..8,
    ) {
        let graph = numbered(NODES, &edges);
        let start_id = AssetId::new(format!("n{start}"));

        let visits = graph
            .traverse(&start_id, &Traversal::forward(EdgeKinds::ALL, max_depth))
            .unwrap();

        let mut seen = HashSet::new();
        for visit in &visits {
            prop_assert!(seen.insert(visit.asset.id.clone()), "{} reported twice", visit.asset.id);
            prop_assert_ne!(&visit.asset.id, &start_id);
            prop_assert!(visit.depth >= 1 && visit.depth <= max_depth);
            prop_assert_eq!(visit.path.len(), visit.depth);
        }
    }

    #[test]
    fn traversal_depth_is_shortest_hop_count(
        edges in edge_strategy(NODES),
        start in 0..NODES,
        kinds in kinds_strategy(),
        max_depth in 1_usize..6,
        backward in any::<bool>(),
    ) {
        let graph = numbered(NODES, &edges);
        let spec = if backward {
            Traversal::backward(kinds, max_depth)
        } else {
            Traversal::forward(kinds, max_depth)
        };

        let visits = graph
            .traverse(&AssetId::new(format!("n{start}")), &spec)
            .unwrap();

        let reported: HashMap<usize, usize> = visits
            .iter()
            .map(|v| (node_index(&v.asset.id), v.depth))
            .collect();
        let expected = reference_depths(&edges, start, kinds, max_depth, backward);
        prop_assert_eq!(reported, expected);
    }

    #[test]
    fn root_cause_is_deepest_unhealthy_ancestor(
        edges in edge_strategy(NODES),
        unhealthy in prop::collection::vec(any::<bool>(), NODES),
        target in 0..NODES,
    ) {
        let statuses: Vec<&str> = unhealthy
            .iter()
            .map(|&bad| if bad { "offline" } else { "online" })
            .collect();
        let graph = numbered_with_status(&statuses, &edges);

        let rc = find_root_cause(&graph, &format!("n{target}")).unwrap();

        let deepest = reference_depths(&edges, target, EdgeKinds::ROOT_CAUSE, 5, true)
            .into_iter()
            .filter(|(node, _)| unhealthy[*node])
            .map(|(_, depth)| depth)
            .max();
        match deepest {
            Some(depth) => {
                prop_assert_eq!(rc.depth, depth);
                prop_assert!(unhealthy[node_index(&rc.root.id)]);
                prop_assert!(!rc.isolated);
            }
            None => {
                prop_assert_eq!(rc.depth, 0);
                prop_assert!(rc.isolated);
            }
        }
        prop_assert_eq!(rc.chain.len(), rc.depth + 1);
        prop_assert_eq!(rc.edge_kinds.len(), rc.depth);
        prop_assert_eq!(&rc.chain[rc.depth].name, &format!("n{target}"));
    }

    #[test]
    fn new_downstream_edge_never_shrinks_cascade(
        edges in edge_strategy(NODES),
        source in 0..NODES,
        kind in kind_strategy(),
    ) {
        let before_graph = numbered(NODES, &edges);
        let source_name = format!("n{source}");
        let before = analyze_cascade_impact(&before_graph, &source_name).unwrap();

        let after_graph = GraphSnapshot::from_parts(
            before_graph.assets().cloned().chain([asset("extra", "Sensor", "online")]),
            before_graph.edges().chain([edge(&source_name, "extra", kind)]),
            2,
        )
        .unwrap();
        let after = analyze_cascade_impact(&after_graph, &source_name).unwrap();

        prop_assert!(after.total_downstream >= before.total_downstream);
        prop_assert!(after.impact_radius >= before.impact_radius);
        prop_assert!(after.severity >= before.severity);
    }

    #[test]
    fn config_never_drifts_from_itself(
        status in prop::option::of("[a-zA-Z]{1,10}"),
        ip_address in prop::option::of("[0-9.]{7,15}"),
        version in prop::option::of("[0-9]\\.[0-9]\\.[0-9]"),
        config_checksum in prop::option::of("[a-f0-9]{8}"),
        security_zone in prop::option::of("[A-Z]{2,6}"),
    ) {
        let config = ConfigMap {
            asset: "PLC-001".to_string(),
            status,
            ip_address,
            version,
            config_checksum,
            security_zone,
            ..ConfigMap::default()
        };

        let record = compute_drift(&config, &config);

        prop_assert!(record.is_in_sync(), "{:?}", record.fields);
        prop_assert!(record.severity.is_none());
        prop_assert!(record.actions.is_empty());
    }
}
