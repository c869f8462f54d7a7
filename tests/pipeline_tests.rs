mod commons;
use commons::*;

use approx::assert_relative_eq;
use gcnprep_rs::prelude::*;

/// Dense reference for the normalisation: result = transpose(A · D^-1/2) ·
/// D^-1/2, i.e. result[i][j] = d_inv[i] * A[j][i] * d_inv[j]
fn dense_normalised(adj: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = adj.len();

    let degrees: Vec<f64> = adj.iter().map(|row| row.iter().sum()).collect();
    let d_inv: Vec<f64> = degrees
        .iter()
        .map(|&d| {
            let inv = 1.0 / d.sqrt();
            if inv.is_infinite() {
                0.0
            } else {
                inv
            }
        })
        .collect();

    let mut out = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            out[i][j] = d_inv[i] * adj[j][i] * d_inv[j];
        }
    }
    out
}

/// Test 1: full pipeline over the canonical three-node graph
#[test]
fn pipeline_01_known_graph() {
    let spec = FixtureSpec {
        graph: vec![vec![1, 2], vec![0], vec![]],
        features: vec![vec![10.0, 11.0], vec![20.0, 21.0], vec![30.0, 31.0]],
        embeddings: vec![vec![0.0, 0.1], vec![1.0, 1.1], vec![2.0, 2.1]],
    };
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "toy", &spec);

    let inputs = prepare_gcn_inputs::<f64>("toy", dir.path(), true, true).unwrap();

    println!("\n=== Pipeline over {{0:[1,2], 1:[0], 2:[]}} ===");
    println!("Adjacency entries: {}", inputs.data.adjacency.get_size());
    println!("Support entries:   {}", inputs.support.nnz());

    // Three directed edges, zero diagonal
    assert_eq!(inputs.data.adjacency.n_vertices, 3);
    assert_eq!(inputs.data.adjacency.get_size(), 3);
    for (src, dst, _) in inputs.data.adjacency.to_edge_list() {
        assert_ne!(src, dst);
    }

    // Node 2 has out-degree zero: d_inv_sqrt[2] = 0, so its entry vanishes
    let inv_sqrt_2 = 1.0 / 2.0_f64.sqrt();
    assert_eq!(inputs.support.coords, vec![[0, 1], [1, 0], [2, 0]]);
    assert_relative_eq!(inputs.support.values[0], inv_sqrt_2);
    assert_relative_eq!(inputs.support.values[1], inv_sqrt_2);
    assert_relative_eq!(inputs.support.values[2], 0.0);

    // Feed mapping: axes swapped, length preserved
    let indices = &inputs.feed_dict[SUPPORT_INDICES];
    assert_eq!(indices.as_slice(), &[[1, 0], [0, 1], [0, 2]]);

    // Feature rows are embedding ++ vertex features
    assert_eq!(inputs.data.features[0], vec![0.0, 0.1, 10.0, 11.0]);
    assert_eq!(inputs.data.features[2], vec![2.0, 2.1, 30.0, 31.0]);

    // Dense bridge agrees with the row layout
    let mat = features_to_mat(&inputs.data.features);
    assert_eq!(mat.nrows(), 3);
    assert_eq!(mat.ncols(), 4);
    assert_relative_eq!(mat[(1, 2)], 20.0);
}

/// Test 2: normalised support matches a dense reference on a random graph
#[test]
fn pipeline_02_normalisation_matches_dense_reference() {
    let spec = random_fixture(40, 6, 4, 3, 42);
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "rand", &spec);

    let inputs = prepare_gcn_inputs::<f64>("rand", dir.path(), true, false).unwrap();
    let n = spec.n_nodes();
    let reference = dense_normalised(&spec.dense_adjacency());

    println!("\n=== Dense cross-check on {} nodes ===", n);
    println!("Support entries: {}", inputs.support.nnz());

    // Densify the support triple and compare every cell
    let mut densified = vec![vec![0.0; n]; n];
    for (coord, &value) in inputs.support.coords.iter().zip(&inputs.support.values) {
        densified[coord[0]][coord[1]] = value;
    }

    for i in 0..n {
        for j in 0..n {
            assert_relative_eq!(densified[i][j], reference[i][j], epsilon = 1e-12);
        }
    }

    // Nothing non-finite may survive normalisation
    for &v in &inputs.support.values {
        assert!(v.is_finite());
    }
}

/// Test 3: the raw (non-normalised) support reproduces the edge set
#[test]
fn pipeline_03_raw_support_reproduces_edges() {
    let spec = random_fixture(25, 4, 2, 2, 7);
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "rawrand", &spec);

    let inputs = prepare_gcn_inputs::<f64>("rawrand", dir.path(), false, false).unwrap();
    let adj = spec.dense_adjacency();

    // Every stored entry is a unit-weight edge of the listing...
    for (coord, &value) in inputs.support.coords.iter().zip(&inputs.support.values) {
        assert_relative_eq!(value, 1.0);
        assert_relative_eq!(adj[coord[0]][coord[1]], 1.0);
    }

    // ...and every edge of the listing is stored exactly once
    let n_edges: usize = adj
        .iter()
        .map(|row| row.iter().filter(|&&w| w != 0.0).count())
        .sum();
    assert_eq!(inputs.support.nnz(), n_edges);
}

/// Test 4: feed indices stay element-wise aligned with the support triple
#[test]
fn pipeline_04_feed_indices_alignment() {
    let spec = random_fixture(30, 5, 2, 2, 99);
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "feedrand", &spec);

    let inputs = prepare_gcn_inputs::<f64>("feedrand", dir.path(), true, false).unwrap();
    let indices = &inputs.feed_dict[SUPPORT_INDICES];

    assert_eq!(indices.len(), inputs.support.nnz());
    for (swapped, coord) in indices.iter().zip(&inputs.support.coords) {
        assert_eq!(swapped[0], coord[1] as i64);
        assert_eq!(swapped[1], coord[0] as i64);
    }
}

/// Test 5: the same pipeline run twice is bit-for-bit identical
#[test]
fn pipeline_05_determinism() {
    let spec = random_fixture(20, 4, 2, 2, 3);
    let dir = tempfile::tempdir().unwrap();
    write_dataset(dir.path(), "det", &spec);

    let first = prepare_gcn_inputs::<f64>("det", dir.path(), true, false).unwrap();
    let second = prepare_gcn_inputs::<f64>("det", dir.path(), true, false).unwrap();

    assert_eq!(first.support, second.support);
    assert_eq!(
        first.feed_dict[SUPPORT_INDICES],
        second.feed_dict[SUPPORT_INDICES]
    );
}
