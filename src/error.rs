use std::path::PathBuf;

/// Errors surfaced while loading a dataset from disk.
///
/// Every failure on the load path is fatal: there is no retry and no
/// partial-result recovery. Pure numeric transforms downstream of loading
/// are infallible and do not use this type.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A dataset file could not be opened.
    #[error("cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An I/O failure while reading an already-open file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialized blob failed to decode.
    #[error("cannot decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A malformed line in a plain-text embedding file.
    #[error("parse error in {path:?} (line {line}): {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The embedding table declared `n_nodes` entries but a node id in
    /// 0..n_nodes had no row.
    #[error("no embedding for node {node_id}")]
    MissingEmbedding { node_id: usize },

    /// The vertex-feature list is shorter than the adjacency node count.
    #[error("no vertex features for node {node_id} ({available} rows available)")]
    MissingVertexFeatures { node_id: usize, available: usize },

    /// The graph listing references node ids that are not dense in
    /// 0..|nodes|. The adjacency shape is derived from the distinct-id
    /// count, so gaps would silently truncate the matrix.
    #[error("node ids are not dense: max id {max_id} with only {n_nodes} distinct nodes")]
    NonDenseNodeIds { max_id: usize, n_nodes: usize },
}
