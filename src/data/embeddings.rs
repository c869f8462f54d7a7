//! Loader for plain-text node embeddings (e.g. the output of a DeepWalk run).

use num_traits::{Float, FromPrimitive};
use rayon::prelude::*;
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LoadError;

/// Load node embeddings from a plain-text file
///
/// Expected format: a header line `"<n_nodes> <dimension>"`, then one line
/// per node of the form `"<node_id> <v_1> <v_2> ... <v_dimension>"`. Tokens
/// past the declared dimension are ignored. Lines may arrive in any node
/// order.
///
/// If fewer rows are present than the header declares, a warning is printed
/// to stderr and loading continues; the gap only becomes fatal if one of the
/// missing ids lies in `0..n_nodes` and is therefore needed for the indexed
/// table.
///
/// ### Params
///
/// * `path` - Path of the embedding file
///
/// ### Returns
///
/// One vector of length `dimension` per node id in `0..n_nodes`, in id order
pub fn load_embeddings<T>(path: &Path) -> Result<Vec<Vec<T>>, LoadError>
where
    T: Float + FromPrimitive + Send,
{
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);

    let mut lines = reader.lines();

    let header = lines.next().ok_or_else(|| LoadError::Parse {
        path: path.to_path_buf(),
        line: 1,
        reason: "empty file".into(),
    })??;

    let (n_nodes, dimension) = parse_header(&header).ok_or_else(|| LoadError::Parse {
        path: path.to_path_buf(),
        line: 1,
        reason: format!("expected '<n_nodes> <dimension>', got {:?}", header),
    })?;

    let data_lines: Vec<String> = lines.collect::<Result<_, _>>()?;

    let rows: Vec<(usize, Vec<T>)> = data_lines
        .par_iter()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(offset, line)| {
            // line numbers are 1-based and the header is line 1
            parse_row(line, dimension).ok_or_else(|| LoadError::Parse {
                path: path.to_path_buf(),
                line: offset + 2,
                reason: format!("expected a node id and {} values", dimension),
            })
        })
        .collect::<Result<_, _>>()?;

    let mut table: FxHashMap<usize, Vec<T>> =
        FxHashMap::with_capacity_and_hasher(rows.len(), FxBuildHasher);
    for (node_id, vector) in rows {
        table.insert(node_id, vector);
    }

    if table.len() < n_nodes {
        eprintln!(
            "Warning: fewer embeddings than nodes ({} < {})",
            table.len(),
            n_nodes
        );
    }

    (0..n_nodes)
        .map(|node_id| {
            table
                .remove(&node_id)
                .ok_or(LoadError::MissingEmbedding { node_id })
        })
        .collect()
}

/// Parse the `"<n_nodes> <dimension>"` header line
fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut tokens = line.split_whitespace();
    let n_nodes = tokens.next()?.parse().ok()?;
    let dimension = tokens.next()?.parse().ok()?;
    Some((n_nodes, dimension))
}

/// Parse one `"<node_id> <v_1> ... <v_dimension>"` data line
fn parse_row<T>(line: &str, dimension: usize) -> Option<(usize, Vec<T>)>
where
    T: Float + FromPrimitive,
{
    let mut tokens = line.split_whitespace();
    let node_id = tokens.next()?.parse().ok()?;

    let mut vector = Vec::with_capacity(dimension);
    for _ in 0..dimension {
        let value: f64 = tokens.next()?.parse().ok()?;
        vector.push(T::from_f64(value).unwrap());
    }

    Some((node_id, vector))
}

///////////
// Tests //
///////////
