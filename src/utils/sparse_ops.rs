//! Degree-based normalisation of sparse adjacency matrices.

use num_traits::Float;

use crate::data::structures::*;

/////////////////////
// Degree vectors  //
/////////////////////

/// Row sums of a CSR matrix
///
/// For an adjacency matrix this is the out-degree (total outgoing edge
/// weight) per node.
///
/// ### Params
///
/// * `csr` - The matrix to sum over, must be in CSR layout
///
/// ### Returns
///
/// One sum per row
pub fn degree_vector<T>(csr: &CompressedSparseData<T>) -> Vec<T>
where
    T: Float,
{
    assert!(csr.cs_type.is_csr(), "Matrix must be in CSR layout");

    let mut degrees = Vec::with_capacity(csr.nrows());
    for row in 0..csr.nrows() {
        let start = csr.indptr[row];
        let end = csr.indptr[row + 1];

        let mut sum = T::zero();
        for idx in start..end {
            sum = sum + csr.data[idx];
        }
        degrees.push(sum);
    }

    degrees
}

/// Elementwise d^(-1/2) with zero-degree guard
///
/// An isolated node has degree zero, and 0^(-1/2) is infinite; those entries
/// are replaced by zero so the node simply contributes nothing to the
/// normalised matrix. Negative degrees produce NaN and pass through
/// untouched.
///
/// ### Params
///
/// * `degrees` - Row sums, as produced by [`degree_vector`]
///
/// ### Returns
///
/// The inverse-square-root degrees
pub fn inv_sqrt_degrees<T>(degrees: &[T]) -> Vec<T>
where
    T: Float,
{
    degrees
        .iter()
        .map(|&d| {
            let inv = d.sqrt().recip();
            if inv.is_infinite() {
                T::zero()
            } else {
                inv
            }
        })
        .collect()
}

//////////////////////
// Diagonal scaling //
//////////////////////

/// Right-multiply a CSR matrix by a diagonal matrix
///
/// Computes `M · diag(scale)`, i.e. entry `(i, j)` is scaled by `scale[j]`.
/// Entries scaled to zero stay stored; sparsity structure is preserved.
///
/// ### Params
///
/// * `csr` - The matrix to scale, must be in CSR layout
/// * `scale` - One factor per column
///
/// ### Returns
///
/// The scaled matrix
pub fn scale_columns<T>(csr: &CompressedSparseData<T>, scale: &[T]) -> CompressedSparseData<T>
where
    T: Float,
{
    assert!(csr.cs_type.is_csr(), "Matrix must be in CSR layout");
    assert_eq!(csr.ncols(), scale.len(), "Dimension mismatch");

    let mut scaled = csr.clone();
    for (value, &col) in scaled.data.iter_mut().zip(&csr.indices) {
        *value = *value * scale[col];
    }

    scaled
}

///////////////////
// Normalisation //
///////////////////

/// Symmetric (spectral) normalisation of an adjacency matrix
///
/// Computes `transpose(A · D^(-1/2)) · D^(-1/2)` where D is the diagonal
/// out-degree matrix. For a symmetric A this equals the renormalisation
/// D^(-1/2)·A·D^(-1/2) used in spectral graph convolution; the adjacency
/// here is directional, so the operand order is semantic and must not be
/// rearranged.
///
/// Isolated nodes (zero row-sum) end up with zero rows and columns rather
/// than NaN or Inf.
///
/// ### Params
///
/// * `graph` - The adjacency in COO format
///
/// ### Returns
///
/// The normalised matrix in CSR layout
pub fn normalise_adjacency<T>(graph: &SparseGraph<T>) -> CompressedSparseData<T>
where
    T: Float + Send + Sync,
{
    let csr = coo_to_csr(graph);
    let d_inv_sqrt = inv_sqrt_degrees(&degree_vector(&csr));

    let scaled = scale_columns(&csr, &d_inv_sqrt);
    let transposed = scaled.transpose();

    scale_columns(&transposed, &d_inv_sqrt)
}

/// Preprocess an adjacency matrix for a spectral GCN
///
/// Normalises when requested, then converts to the COO triple the
/// computation graph feeds on. With `normalise` false the adjacency passes
/// through untouched apart from canonical row-major ordering.
///
/// ### Params
///
/// * `graph` - The adjacency in COO format
/// * `normalise` - Whether to apply the symmetric normalisation
///
/// ### Returns
///
/// The `(coords, values, shape)` triple of the (possibly normalised) matrix
pub fn preprocess_adjacency<T>(graph: &SparseGraph<T>, normalise: bool) -> CooTriple<T>
where
    T: Float + Send + Sync,
{
    let matrix = if normalise {
        normalise_adjacency(graph)
    } else {
        coo_to_csr(graph)
    };

    sparse_to_tuple(&matrix)
}

///////////
// Tests //
///////////
