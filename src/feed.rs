//! Construction of the feed mapping for a placeholder-driven computation
//! graph.

use num_traits::Float;
use rustc_hash::FxHashMap;

use crate::assert_same_len;
use crate::data::structures::CooTriple;

/// Input-slot name for the support coordinate indices
pub const SUPPORT_INDICES: &str = "support_indices";

/// Build the feed mapping for one support triple
///
/// Places, under [`SUPPORT_INDICES`], an `(E, 2)` integer array where row i
/// is `[col_i, row_i]` - the i-th support coordinate with its axes swapped.
/// Length and order follow the input triple exactly. Any further input
/// slots (features, labels, dropout) are the caller's to add.
///
/// ### Params
///
/// * `support` - COO triple of the (normalised) adjacency
///
/// ### Returns
///
/// The single-slot feed mapping
pub fn construct_feed_dict<T>(support: &CooTriple<T>) -> FxHashMap<String, Vec<[i64; 2]>>
where
    T: Float,
{
    assert_same_len!(support.coords, support.values);

    let indices_inverse: Vec<[i64; 2]> = support
        .coords
        .iter()
        .map(|&[row, col]| [col as i64, row as i64])
        .collect();

    let mut feed_dict = FxHashMap::default();
    feed_dict.insert(SUPPORT_INDICES.to_string(), indices_inverse);

    feed_dict
}

///////////
// Tests //
///////////
