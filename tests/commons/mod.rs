use rand::{rngs::StdRng, Rng, SeedableRng};
use serde_json::json;
use std::fs;
use std::path::Path;

/// In-memory description of a dataset fixture
///
/// `graph[i]` is the neighbour listing of node i; `features` and
/// `embeddings` are indexed by node id.
pub struct FixtureSpec {
    pub graph: Vec<Vec<usize>>,
    pub features: Vec<Vec<f64>>,
    pub embeddings: Vec<Vec<f64>>,
}

impl FixtureSpec {
    pub fn n_nodes(&self) -> usize {
        self.graph.len()
    }

    /// Dense adjacency with the loader's semantics applied (self-loops
    /// discarded, duplicates collapsed, unit weights)
    pub fn dense_adjacency(&self) -> Vec<Vec<f64>> {
        let n = self.n_nodes();
        let mut adj = vec![vec![0.0; n]; n];
        for (src, dsts) in self.graph.iter().enumerate() {
            for &dst in dsts {
                if src != dst {
                    adj[src][dst] = 1.0;
                }
            }
        }
        adj
    }
}

/// Generate a random diffusion-graph fixture with dense node ids
pub fn random_fixture(
    n_nodes: usize,
    max_out_degree: usize,
    emb_dim: usize,
    feat_dim: usize,
    seed: u64,
) -> FixtureSpec {
    let mut rng = StdRng::seed_from_u64(seed);

    let graph = (0..n_nodes)
        .map(|_| {
            let out_degree = rng.random_range(0..=max_out_degree);
            (0..out_degree)
                .map(|_| rng.random_range(0..n_nodes))
                .collect()
        })
        .collect();

    let features = (0..n_nodes)
        .map(|_| (0..feat_dim).map(|_| rng.random::<f64>()).collect())
        .collect();

    let embeddings = (0..n_nodes)
        .map(|_| (0..emb_dim).map(|_| rng.random::<f64>() * 2.0 - 1.0).collect())
        .collect();

    FixtureSpec {
        graph,
        features,
        embeddings,
    }
}

/// Write a complete on-disk dataset under `<base>/Data/`
///
/// The splits are small placeholders; the interesting content is the graph,
/// the vertex features and the embedding file.
pub fn write_dataset(base: &Path, name: &str, spec: &FixtureSpec) {
    let data_dir = base.join("Data");
    fs::create_dir_all(&data_dir).unwrap();

    let n = spec.n_nodes();

    let graph_map: serde_json::Map<String, serde_json::Value> = spec
        .graph
        .iter()
        .enumerate()
        .map(|(i, dsts)| (i.to_string(), json!(dsts)))
        .collect();

    let blobs = [
        ("train.x", json!([[[0.0, 0], [1.0, n - 1]]])),
        ("train.y", json!([[n - 1]])),
        ("val.x", json!([[[0.5, 0]]])),
        ("val.y", json!([[0]])),
        ("test.x", json!([[[2.0, n - 1]]])),
        ("test.y", json!([[0]])),
        ("graph", serde_json::Value::Object(graph_map)),
        ("features", json!(spec.features)),
    ];

    for (blob, value) in blobs {
        fs::write(
            data_dir.join(format!("ind.{}.{}", name, blob)),
            serde_json::to_vec(&value).unwrap(),
        )
        .unwrap();
    }

    let emb_dim = spec.embeddings.first().map_or(0, |v| v.len());
    let mut emb_file = format!("{} {}\n", n, emb_dim);
    for (node_id, vector) in spec.embeddings.iter().enumerate() {
        emb_file.push_str(&node_id.to_string());
        for v in vector {
            emb_file.push(' ');
            emb_file.push_str(&v.to_string());
        }
        emb_file.push('\n');
    }
    fs::write(data_dir.join(format!("{}.emb_32", name)), emb_file).unwrap();
}
