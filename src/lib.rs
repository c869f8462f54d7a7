pub mod data;
pub mod error;
pub mod feed;
pub mod macros;
pub mod prelude;
pub mod utils;

use num_traits::{Float, FromPrimitive};
use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Instant;
use thousands::*;

use crate::data::loader::{load_dataset, LoadedDataset};
use crate::data::structures::CooTriple;
use crate::error::LoadError;
use crate::feed::construct_feed_dict;
use crate::utils::sparse_ops::preprocess_adjacency;

//////////////
// Pipeline //
//////////////

/// Everything the preparation pipeline hands to a downstream model
///
/// ### Fields
///
/// * `data` - Adjacency, splits and the assembled feature matrix
/// * `support` - COO triple of the (optionally normalised) adjacency
/// * `feed_dict` - Feed mapping carrying the swapped support indices
#[derive(Debug, Clone)]
pub struct GcnInputs<T> {
    pub data: LoadedDataset<T>,
    pub support: CooTriple<T>,
    pub feed_dict: FxHashMap<String, Vec<[i64; 2]>>,
}

/// Run the full preparation pipeline for one dataset
///
/// Loads the dataset from disk, optionally applies the symmetric degree
/// normalisation to the adjacency, converts it to its COO triple and builds
/// the placeholder feed mapping.
///
/// ### Params
///
/// * `dataset` - Dataset name, e.g. `"digg"`
/// * `base_path` - Directory containing the `Data/` subdirectory
/// * `normalise` - Whether to normalise the adjacency matrix
/// * `verbose` - Controls verbosity
///
/// ### Returns
///
/// The loaded data together with the support triple and feed mapping
///
/// ### Example
///
/// ```ignore
/// use gcnprep_rs::prepare_gcn_inputs;
/// use std::path::Path;
///
/// let inputs = prepare_gcn_inputs::<f64>("digg", Path::new("."), true, true)?;
/// // inputs.support feeds the convolution; inputs.data carries the splits
/// ```
pub fn prepare_gcn_inputs<T>(
    dataset: &str,
    base_path: &Path,
    normalise: bool,
    verbose: bool,
) -> Result<GcnInputs<T>, LoadError>
where
    T: Float + FromPrimitive + DeserializeOwned + Send + Sync,
{
    let start_load = Instant::now();
    let data = load_dataset(dataset, base_path, verbose)?;

    if verbose {
        println!("Loaded dataset '{}' in {:.2?}.", dataset, start_load.elapsed());
    }

    let support = preprocess_adjacency(&data.adjacency, normalise);

    if verbose {
        println!(
            "Prepared support with {} stored entries ({}).",
            support.nnz().separate_with_underscores(),
            if normalise { "normalised" } else { "raw" }
        );
    }

    let feed_dict = construct_feed_dict(&support);

    Ok(GcnInputs {
        data,
        support,
        feed_dict,
    })
}

///////////
// Tests //
///////////

#[cfg(test)]
mod pipeline_unit_tests {
    use super::*;
    use crate::data::structures::SparseGraph;
    use crate::feed::SUPPORT_INDICES;
    use approx::assert_relative_eq;

    #[test]
    fn test_support_and_feed_for_known_graph() {
        // {0: [1, 2], 1: [0], 2: []}: three nodes, directed edges
        // (0,1), (0,2), (1,0). Node 2 has in-degree only, so its row-sum is
        // zero and its inverse-sqrt degree vanishes.
        let adjacency =
            SparseGraph::from_parts(vec![0, 0, 1], vec![1, 2, 0], vec![1.0, 1.0, 1.0], 3);

        let support = preprocess_adjacency(&adjacency, true);
        let inv_sqrt_2 = 1.0 / 2.0_f64.sqrt();

        assert_eq!(support.coords, vec![[0, 1], [1, 0], [2, 0]]);
        assert_relative_eq!(support.values[0], inv_sqrt_2);
        assert_relative_eq!(support.values[1], inv_sqrt_2);
        assert_relative_eq!(support.values[2], 0.0);

        let feed = construct_feed_dict(&support);
        let indices = &feed[SUPPORT_INDICES];

        // Axes swapped, order preserved
        assert_eq!(indices.as_slice(), &[[1, 0], [0, 1], [0, 2]]);
    }

    #[test]
    fn test_raw_support_keeps_unit_weights() {
        let adjacency =
            SparseGraph::from_parts(vec![0, 0, 1], vec![1, 2, 0], vec![1.0, 1.0, 1.0], 3);

        let support = preprocess_adjacency(&adjacency, false);

        assert_eq!(support.values, vec![1.0, 1.0, 1.0]);
        assert_eq!(support.shape, (3, 3));
    }
}
