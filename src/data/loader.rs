//! Loader for the on-disk dataset layout consumed by the preparation
//! pipeline.
//!
//! A dataset `<name>` lives under `<base>/Data/` as eight serialized blobs
//! `ind.<name>.{train.x, train.y, val.x, val.y, test.x, test.y, graph,
//! features}` plus a plain-text embedding file `<name>.emb_32`:
//!
//! * `*.x` - one observation sequence per sample, each a list of
//!   `(timestamp, node_id)` pairs
//! * `*.y` - the target node-id set per sample, positionally aligned with
//!   `*.x`
//! * `graph` - adjacency listing `{node_id: [neighbour ids]}`
//! * `features` - one vertex-feature vector per node, in id order

use faer::{
    traits::{ComplexField, RealField},
    Mat,
};
use num_traits::{Float, FromPrimitive};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thousands::*;

use crate::data::embeddings::load_embeddings;
use crate::data::structures::SparseGraph;
use crate::error::LoadError;

/// A single `(timestamp, node_id)` observation
pub type Observation = (f64, usize);

/// One train/val/test split
///
/// ### Fields
///
/// * `x` - Observation sequences, one per sample
/// * `y` - Target node-id sets, parallel to `x`
///
/// Positional alignment between `x` and `y` is taken on trust from the
/// files; it is not validated here.
#[derive(Debug, Clone, Default)]
pub struct SplitData {
    pub x: Vec<Vec<Observation>>,
    pub y: Vec<FxHashSet<usize>>,
}

/// Everything a downstream model needs from one dataset
///
/// ### Fields
///
/// * `adjacency` - Directed adjacency in COO format, zero diagonal
/// * `train` / `val` / `test` - The three splits, loaded verbatim
/// * `features` - Per-node concatenation of embedding and vertex features
#[derive(Debug, Clone)]
pub struct LoadedDataset<T> {
    pub adjacency: SparseGraph<T>,
    pub train: SplitData,
    pub val: SplitData,
    pub test: SplitData,
    pub features: Vec<Vec<T>>,
}

/// Path of one serialized blob under the dataset layout
fn blob_path(base_path: &Path, dataset: &str, name: &str) -> PathBuf {
    base_path.join("Data").join(format!("ind.{}.{}", dataset, name))
}

/// Decode a single serialized blob
///
/// The file handle lives for the duration of this call only.
fn read_blob<D>(path: &Path) -> Result<D, LoadError>
where
    D: DeserializeOwned,
{
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the sparse adjacency matrix from an adjacency listing
///
/// Walks the listing once, collecting the distinct node-id set over both
/// endpoints and deduplicating directed edges through a map keyed by
/// `(src, dst)`. Self-loops are discarded; every surviving edge gets unit
/// weight. The matrix shape is `(|nodes|, |nodes|)`, which is only correct
/// when ids are dense in `0..|nodes|` - a gap would silently truncate the
/// matrix, so violations are rejected here.
///
/// ### Params
///
/// * `graph` - Adjacency listing `{node_id: [neighbour ids]}`
/// * `verbose` - Controls verbosity
///
/// ### Returns
///
/// The adjacency as a `SparseGraph` in COO format
pub fn build_adjacency<T>(
    graph: &FxHashMap<usize, Vec<usize>>,
    verbose: bool,
) -> Result<SparseGraph<T>, LoadError>
where
    T: Float,
{
    let mut edges: FxHashMap<(usize, usize), T> = FxHashMap::default();
    let mut nodes: FxHashSet<usize> = FxHashSet::default();

    for (&src, dsts) in graph {
        nodes.insert(src);
        for &dst in dsts {
            if src != dst {
                edges.insert((src, dst), T::one());
            }
            nodes.insert(dst);
        }
    }

    if verbose {
        println!(
            "Total number of nodes: {}",
            nodes.len().separate_with_underscores()
        );
        println!(
            "Total number of directed edges: {}",
            edges.len().separate_with_underscores()
        );
    }

    let n_nodes = nodes.len();
    if let Some(&max_id) = nodes.iter().max() {
        if max_id >= n_nodes {
            return Err(LoadError::NonDenseNodeIds { max_id, n_nodes });
        }
    }

    let mut row_indices = Vec::with_capacity(edges.len());
    let mut col_indices = Vec::with_capacity(edges.len());
    let mut values = Vec::with_capacity(edges.len());

    for (&(src, dst), &weight) in &edges {
        row_indices.push(src);
        col_indices.push(dst);
        values.push(weight);
    }

    Ok(SparseGraph::from_parts(
        row_indices,
        col_indices,
        values,
        n_nodes,
    ))
}

/// Concatenate node embeddings and vertex features per node
///
/// Row i of the result is `embeddings[i] ++ vertex_features[i]`. Either side
/// running short for a valid node id is fatal at the point of mismatch;
/// nothing is pre-validated.
fn assemble_features<T>(
    embeddings: &[Vec<T>],
    vertex_features: &[Vec<T>],
    n_nodes: usize,
    verbose: bool,
) -> Result<Vec<Vec<T>>, LoadError>
where
    T: Float + Send + Sync,
{
    if verbose {
        println!(
            "Dimension of node embeddings: {} x {}",
            embeddings.len(),
            embeddings.first().map_or(0, |v| v.len())
        );
        println!(
            "Dimension of vertex features: {} x {}",
            vertex_features.len(),
            vertex_features.first().map_or(0, |v| v.len())
        );
    }

    let combined: Vec<Vec<T>> = (0..n_nodes)
        .into_par_iter()
        .map(|node_id| {
            let embedding = embeddings
                .get(node_id)
                .ok_or(LoadError::MissingEmbedding { node_id })?;
            let features =
                vertex_features
                    .get(node_id)
                    .ok_or(LoadError::MissingVertexFeatures {
                        node_id,
                        available: vertex_features.len(),
                    })?;

            let mut row = Vec::with_capacity(embedding.len() + features.len());
            row.extend_from_slice(embedding);
            row.extend_from_slice(features);
            Ok(row)
        })
        .collect::<Result<_, LoadError>>()?;

    if verbose {
        println!(
            "Total number of input dimensions: {}",
            combined.first().map_or(0, |v| v.len())
        );
    }

    Ok(combined)
}

/// Load one dataset from disk
///
/// Deserializes the eight blobs, builds the adjacency matrix from the graph
/// listing, loads the node embeddings and concatenates them with the vertex
/// features into the per-node input matrix.
///
/// ### Params
///
/// * `dataset` - Dataset name, e.g. `"digg"`
/// * `base_path` - Directory containing the `Data/` subdirectory
/// * `verbose` - Controls verbosity
///
/// ### Returns
///
/// The adjacency matrix, the three splits and the assembled feature matrix
pub fn load_dataset<T>(
    dataset: &str,
    base_path: &Path,
    verbose: bool,
) -> Result<LoadedDataset<T>, LoadError>
where
    T: Float + FromPrimitive + DeserializeOwned + Send + Sync,
{
    let train = SplitData {
        x: read_blob(&blob_path(base_path, dataset, "train.x"))?,
        y: read_blob(&blob_path(base_path, dataset, "train.y"))?,
    };
    let val = SplitData {
        x: read_blob(&blob_path(base_path, dataset, "val.x"))?,
        y: read_blob(&blob_path(base_path, dataset, "val.y"))?,
    };
    let test = SplitData {
        x: read_blob(&blob_path(base_path, dataset, "test.x"))?,
        y: read_blob(&blob_path(base_path, dataset, "test.y"))?,
    };

    let graph: FxHashMap<usize, Vec<usize>> =
        read_blob(&blob_path(base_path, dataset, "graph"))?;
    let vertex_features: Vec<Vec<T>> = read_blob(&blob_path(base_path, dataset, "features"))?;

    let adjacency = build_adjacency(&graph, verbose)?;

    let embedding_path = base_path.join("Data").join(format!("{}.emb_32", dataset));
    let embeddings: Vec<Vec<T>> = load_embeddings(&embedding_path)?;

    let features = assemble_features(
        &embeddings,
        &vertex_features,
        adjacency.n_vertices,
        verbose,
    )?;

    Ok(LoadedDataset {
        adjacency,
        train,
        val,
        test,
        features,
    })
}

/// Densify the assembled feature matrix for the model boundary
///
/// ### Params
///
/// * `features` - Per-node feature vectors of uniform length
///
/// ### Returns
///
/// A dense `(n_nodes, n_dims)` matrix
pub fn features_to_mat<T>(features: &[Vec<T>]) -> Mat<T>
where
    T: Float + ComplexField + RealField,
{
    let n_dims = features.first().map_or(0, |v| v.len());
    Mat::from_fn(features.len(), n_dims, |i, j| features[i][j])
}

///////////
// Tests //
///////////
