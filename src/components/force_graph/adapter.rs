//! Normalizes backend mind map payloads into [`GraphData`].
//!
//! The backend sends `{ nodes: [{id, notion_page_id, keyword}], edges:
//! [{keyword1, keyword2}] }`, but older revisions used `source`/`target` or
//! `from`/`to` for edges and numeric ids. Everything is read leniently from a
//! [`serde_json::Value`]: records that cannot be understood are skipped with a
//! warning and the result always satisfies the graph invariants (unique ids,
//! no dangling edges). This never fails; a payload that is not a graph at all
//! yields an empty graph.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use serde_json::Value;

use super::types::{Edge, GraphData, Node};

/// Edge endpoint field pairs, in order of preference, and whether their
/// values name keywords rather than ids.
const ENDPOINT_FIELDS: [(&str, &str, bool); 3] = [
	("keyword1", "keyword2", true),
	("source", "target", false),
	("from", "to", false),
];

/// Parse and normalize a JSON payload. Invalid JSON yields an empty graph.
pub fn adapt_str(json: &str) -> GraphData {
	match serde_json::from_str::<Value>(json) {
		Ok(value) => adapt(&value),
		Err(e) => {
			warn!("mindmap-graph: payload is not valid JSON: {}", e);
			GraphData::default()
		}
	}
}

/// Normalize an already-parsed payload.
pub fn adapt(payload: &Value) -> GraphData {
	let Some(records) = payload.get("nodes").and_then(Value::as_array) else {
		warn!("mindmap-graph: payload has no node list, treating as empty");
		return GraphData::default();
	};

	let mut nodes: Vec<Node> = Vec::with_capacity(records.len());
	let mut by_id: HashMap<String, usize> = HashMap::new();
	let mut by_keyword: HashMap<String, usize> = HashMap::new();

	for (i, record) in records.iter().enumerate() {
		let id = field_string(record, "id");
		let keyword = field_string(record, "keyword").or_else(|| field_string(record, "label"));
		let (id, keyword) = match (id, keyword) {
			(Some(id), Some(keyword)) => (id, keyword),
			(Some(id), None) => (id.clone(), id),
			(None, Some(keyword)) => (keyword.clone(), keyword),
			(None, None) => {
				warn!("mindmap-graph: node record {} has neither id nor keyword, skipped", i);
				continue;
			}
		};
		if by_id.contains_key(&id) {
			warn!("mindmap-graph: duplicate node id {:?}, keeping first", id);
			continue;
		}

		let mut node = Node::new(id.clone(), keyword.clone());
		node.page_id = field_string(record, "notion_page_id");
		by_id.insert(id, nodes.len());
		by_keyword.entry(keyword).or_insert(nodes.len());
		nodes.push(node);
	}

	let edge_records = payload
		.get("edges")
		.or_else(|| payload.get("links"))
		.and_then(Value::as_array)
		.map(Vec::as_slice)
		.unwrap_or_default();

	let resolve = |name: &str, keyword_first: bool| {
		let (primary, secondary) = if keyword_first {
			(&by_keyword, &by_id)
		} else {
			(&by_id, &by_keyword)
		};
		primary.get(name).or_else(|| secondary.get(name)).copied()
	};

	let mut edges = Vec::with_capacity(edge_records.len());
	let mut seen: HashSet<(usize, usize)> = HashSet::new();
	let mut dropped = 0usize;

	for record in edge_records {
		let Some((a, b, by_keyword)) = ENDPOINT_FIELDS.iter().find_map(|&(first, second, kw)| {
			Some((field_string(record, first)?, field_string(record, second)?, kw))
		}) else {
			warn!("mindmap-graph: edge record without endpoints: {}", record);
			dropped += 1;
			continue;
		};

		let (Some(src), Some(tgt)) = (resolve(&a, by_keyword), resolve(&b, by_keyword)) else {
			warn!("mindmap-graph: dropping dangling edge {:?} -> {:?}", a, b);
			dropped += 1;
			continue;
		};
		if src == tgt {
			debug!("mindmap-graph: dropping self-loop on {:?}", a);
			dropped += 1;
			continue;
		}
		if !seen.insert((src.min(tgt), src.max(tgt))) {
			debug!("mindmap-graph: dropping duplicate edge {:?} -> {:?}", a, b);
			dropped += 1;
			continue;
		}
		edges.push((src, tgt));
	}

	if dropped > 0 {
		warn!("mindmap-graph: {} edge(s) dropped during normalization", dropped);
	}

	assign_groups(&mut nodes, &edges);

	let edges = edges
		.into_iter()
		.map(|(s, t)| Edge::new(nodes[s].id.clone(), nodes[t].id.clone()))
		.collect();

	GraphData { nodes, edges }
}

/// Reads a field as a non-empty string. Numbers are accepted and stringified.
fn field_string(record: &Value, key: &str) -> Option<String> {
	match record.get(key)? {
		Value::String(s) => {
			let s = s.trim();
			(!s.is_empty()).then(|| s.to_string())
		}
		Value::Number(n) => Some(n.to_string()),
		_ => None,
	}
}

/// Labels each node with the index of its connected component. Components
/// are numbered in order of their first node.
fn assign_groups(nodes: &mut [Node], edges: &[(usize, usize)]) {
	let mut adjacency = vec![Vec::new(); nodes.len()];
	for &(s, t) in edges {
		adjacency[s].push(t);
		adjacency[t].push(s);
	}

	let mut group = vec![usize::MAX; nodes.len()];
	let mut next = 0;
	for start in 0..nodes.len() {
		if group[start] != usize::MAX {
			continue;
		}
		let mut stack = vec![start];
		group[start] = next;
		while let Some(i) = stack.pop() {
			for &j in &adjacency[i] {
				if group[j] == usize::MAX {
					group[j] = next;
					stack.push(j);
				}
			}
		}
		next += 1;
	}

	for (node, g) in nodes.iter_mut().zip(group) {
		node.group = g;
	}
}

/// Sample graph shown when the backend is unreachable and the demo fallback
/// is enabled: four small independent clusters.
pub fn demo_graph() -> GraphData {
	let clusters: [(&[&str], &[(&str, &str)]); 4] = [
		(&["a1", "a2", "a3"], &[("a1", "a2"), ("a2", "a3"), ("a1", "a3")]),
		(
			&["b1", "b2", "b3", "b4"],
			&[("b1", "b2"), ("b2", "b3"), ("b3", "b4"), ("b1", "b4")],
		),
		(&["c1", "c2"], &[("c1", "c2")]),
		(&["d1", "d2", "d3"], &[("d1", "d2"), ("d2", "d3"), ("d1", "d3")]),
	];

	let mut data = GraphData::default();
	for (group, (ids, links)) in clusters.into_iter().enumerate() {
		data.nodes.extend(ids.iter().map(|id| Node {
			group,
			..Node::new(*id, *id)
		}));
		data.edges
			.extend(links.iter().map(|(s, t)| Edge::new(*s, *t)));
	}
	data
}
