use num_traits::Float;
use rayon::prelude::*;

use crate::assert_same_len;

/////////////////////
// Data structures //
/////////////////////

/////////
// COO //
/////////

/// Sparse adjacency in COO (Coordinate) format
///
/// Entry k is the directed edge `row_indices[k] -> col_indices[k]` with
/// weight `values[k]`. The loader only ever emits unit weights, but nothing
/// here assumes that.
///
/// ### Fields
///
/// * `row_indices` - Source node of each edge
/// * `col_indices` - Destination node of each edge
/// * `values` - Edge weights
/// * `n_vertices` - Number of nodes in the graph
#[derive(Debug, Clone)]
pub struct SparseGraph<T> {
    pub row_indices: Vec<usize>,
    pub col_indices: Vec<usize>,
    pub values: Vec<T>,
    pub n_vertices: usize,
}

impl<T> SparseGraph<T>
where
    T: Float,
{
    /// Build a graph from parallel COO arrays
    ///
    /// ### Params
    ///
    /// * `row_indices` - Source node per edge
    /// * `col_indices` - Destination node per edge
    /// * `values` - Weight per edge
    /// * `n_vertices` - Number of nodes
    ///
    /// ### Panics
    ///
    /// If the three arrays disagree in length.
    pub fn from_parts(
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
        n_vertices: usize,
    ) -> Self {
        assert_same_len!(row_indices, col_indices, values);

        Self {
            row_indices,
            col_indices,
            values,
            n_vertices,
        }
    }

    /// Generate an edge list from the COO
    ///
    /// ### Returns
    ///
    /// A vector of `(src, dst, weight)` tuples
    pub fn to_edge_list(&self) -> Vec<(usize, usize, T)> {
        self.row_indices
            .iter()
            .zip(&self.col_indices)
            .zip(&self.values)
            .map(|((&r, &c), &v)| (r, c, v))
            .collect()
    }

    /// The number of stored edges
    pub fn get_size(&self) -> usize {
        self.row_indices.len()
    }
}

/////////////
// CSR/CSC //
/////////////

/// Type to describe the compressed sparse layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressedSparseFormat {
    /// CSC-formatted data
    Csc,
    /// CSR-formatted data
    Csr,
}

impl CompressedSparseFormat {
    /// Returns boolean if it's CSC
    pub fn is_csc(&self) -> bool {
        matches!(self, CompressedSparseFormat::Csc)
    }
    /// Returns boolean if it's CSR
    pub fn is_csr(&self) -> bool {
        matches!(self, CompressedSparseFormat::Csr)
    }
}

/// Compressed sparse matrix in either CSR or CSC layout
///
/// ### Fields
///
/// * `data` - The stored values
/// * `indices` - Column indices (CSR) or row indices (CSC)
/// * `indptr` - Per-row (CSR) or per-column (CSC) offsets into `data`
/// * `cs_type` - Which of the two layouts the data is stored in
/// * `shape` - The shape of the underlying matrix
#[derive(Debug, Clone)]
pub struct CompressedSparseData<T>
where
    T: Clone + Float,
{
    pub data: Vec<T>,
    pub indices: Vec<usize>,
    pub indptr: Vec<usize>,
    pub cs_type: CompressedSparseFormat,
    pub shape: (usize, usize),
}

impl<T> CompressedSparseData<T>
where
    T: Float,
{
    /// Generate a new CSR version of the matrix
    ///
    /// ### Params
    ///
    /// * `data` - The underlying data
    /// * `indices` - The column indices
    /// * `indptr` - The row index pointers
    /// * `shape` - The matrix shape
    pub fn new_csr(data: &[T], indices: &[usize], indptr: &[usize], shape: (usize, usize)) -> Self {
        Self {
            data: data.to_vec(),
            indices: indices.to_vec(),
            indptr: indptr.to_vec(),
            cs_type: CompressedSparseFormat::Csr,
            shape,
        }
    }

    /// Generate a new CSC version of the matrix
    ///
    /// ### Params
    ///
    /// * `data` - The underlying data
    /// * `indices` - The row indices
    /// * `indptr` - The column index pointers
    /// * `shape` - The matrix shape
    pub fn new_csc(data: &[T], indices: &[usize], indptr: &[usize], shape: (usize, usize)) -> Self {
        Self {
            data: data.to_vec(),
            indices: indices.to_vec(),
            indptr: indptr.to_vec(),
            cs_type: CompressedSparseFormat::Csc,
            shape,
        }
    }

    /// Flip between the CSR and CSC layouts of the same matrix
    ///
    /// ### Returns
    ///
    /// The same matrix stored in the other layout
    pub fn transform(&self) -> Self {
        match self.cs_type {
            CompressedSparseFormat::Csc => csc_to_csr(self),
            CompressedSparseFormat::Csr => csr_to_csc(self),
        }
    }

    /// Transpose the matrix
    ///
    /// A CSR matrix's arrays, reinterpreted as CSC, describe the transpose
    /// (and vice versa), so this is a relabelling plus one layout flip.
    ///
    /// ### Returns
    ///
    /// The transposed matrix, always in CSR layout
    pub fn transpose(&self) -> Self {
        let flipped = Self {
            data: self.data.clone(),
            indices: self.indices.clone(),
            indptr: self.indptr.clone(),
            cs_type: match self.cs_type {
                CompressedSparseFormat::Csr => CompressedSparseFormat::Csc,
                CompressedSparseFormat::Csc => CompressedSparseFormat::Csr,
            },
            shape: (self.shape.1, self.shape.0),
        };

        match flipped.cs_type {
            CompressedSparseFormat::Csr => flipped,
            CompressedSparseFormat::Csc => csc_to_csr(&flipped),
        }
    }

    /// Returns the shape of the matrix as `(nrow, ncol)`
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Returns the number of stored entries
    pub fn get_nnz(&self) -> usize {
        self.data.len()
    }

    /// Returns the number of rows
    pub fn nrows(&self) -> usize {
        self.shape.0
    }

    /// Returns the number of columns
    pub fn ncols(&self) -> usize {
        self.shape.1
    }
}

/// Convert a CSC-stored matrix into CSR layout
///
/// Counting sort over rows; within each row the column indices come out
/// ascending because the CSC columns are walked in order.
///
/// ### Params
///
/// * `sparse_data` - The matrix to convert, must be in CSC layout
///
/// ### Returns
///
/// The same matrix in CSR layout
pub fn csc_to_csr<T>(sparse_data: &CompressedSparseData<T>) -> CompressedSparseData<T>
where
    T: Float,
{
    assert!(sparse_data.cs_type.is_csc(), "Matrix must be in CSC layout");

    let (nrow, _) = sparse_data.shape();
    let nnz = sparse_data.get_nnz();

    let mut row_ptr = vec![0usize; nrow + 1];
    for &r in &sparse_data.indices {
        row_ptr[r + 1] += 1;
    }
    for i in 0..nrow {
        row_ptr[i + 1] += row_ptr[i];
    }

    let mut data = vec![T::zero(); nnz];
    let mut col_ind = vec![0usize; nnz];
    let mut next = row_ptr[..nrow].to_vec();

    for col in 0..(sparse_data.indptr.len() - 1) {
        for idx in sparse_data.indptr[col]..sparse_data.indptr[col + 1] {
            let row = sparse_data.indices[idx];
            let pos = next[row];

            data[pos] = sparse_data.data[idx];
            col_ind[pos] = col;

            next[row] += 1;
        }
    }

    CompressedSparseData {
        data,
        indices: col_ind,
        indptr: row_ptr,
        cs_type: CompressedSparseFormat::Csr,
        shape: sparse_data.shape(),
    }
}

/// Convert a CSR-stored matrix into CSC layout
///
/// ### Params
///
/// * `sparse_data` - The matrix to convert, must be in CSR layout
///
/// ### Returns
///
/// The same matrix in CSC layout
pub fn csr_to_csc<T>(sparse_data: &CompressedSparseData<T>) -> CompressedSparseData<T>
where
    T: Float,
{
    assert!(sparse_data.cs_type.is_csr(), "Matrix must be in CSR layout");

    let (_, ncol) = sparse_data.shape();
    let nnz = sparse_data.get_nnz();

    let mut col_ptr = vec![0usize; ncol + 1];
    for &c in &sparse_data.indices {
        col_ptr[c + 1] += 1;
    }
    for i in 0..ncol {
        col_ptr[i + 1] += col_ptr[i];
    }

    let mut data = vec![T::zero(); nnz];
    let mut row_ind = vec![0usize; nnz];
    let mut next = col_ptr[..ncol].to_vec();

    for row in 0..(sparse_data.indptr.len() - 1) {
        for idx in sparse_data.indptr[row]..sparse_data.indptr[row + 1] {
            let col = sparse_data.indices[idx];
            let pos = next[col];

            data[pos] = sparse_data.data[idx];
            row_ind[pos] = row;

            next[col] += 1;
        }
    }

    CompressedSparseData {
        data,
        indices: row_ind,
        indptr: col_ptr,
        cs_type: CompressedSparseFormat::Csc,
        shape: sparse_data.shape(),
    }
}

////////////////
// Conversion //
////////////////

/// Convert a COO graph to CSR layout
///
/// Entries are sorted row-major, so the CSR (and any COO triple derived from
/// it) has a canonical, deterministic ordering regardless of the order edges
/// were recorded in.
///
/// ### Params
///
/// * `graph` - Input graph in COO format
///
/// ### Returns
///
/// Matrix in CSR layout with shape `(n_vertices, n_vertices)`
pub fn coo_to_csr<T>(graph: &SparseGraph<T>) -> CompressedSparseData<T>
where
    T: Float + Send + Sync,
{
    let n = graph.n_vertices;
    let nnz = graph.values.len();

    let mut triplets: Vec<(usize, usize, T)> = (0..nnz)
        .into_par_iter()
        .map(|i| (graph.row_indices[i], graph.col_indices[i], graph.values[i]))
        .collect();

    triplets.par_sort_unstable_by(|(r1, c1, _), (r2, c2, _)| r1.cmp(r2).then(c1.cmp(c2)));

    let mut data = Vec::with_capacity(nnz);
    let mut indices = Vec::with_capacity(nnz);

    for (_, c, v) in triplets.iter() {
        data.push(*v);
        indices.push(*c);
    }

    let mut indptr = vec![0usize; n + 1];
    for (r, _, _) in triplets.iter() {
        indptr[r + 1] += 1;
    }
    for i in 0..n {
        indptr[i + 1] += indptr[i];
    }

    CompressedSparseData::new_csr(&data, &indices, &indptr, (n, n))
}

////////////////
// COO triple //
////////////////

/// Sparse matrix as a coordinate/value/shape triple - tensor-friendly
///
/// This is the form a downstream computation graph consumes. Invariant:
/// `coords.len() == values.len()`, and `coords[k]` is the `[row, col]` of
/// `values[k]`. Coordinates follow the row-major CSR traversal order of the
/// source matrix; downstream consumers rely on the element-wise pairing of
/// `coords` and `values`, not on any particular sort.
///
/// ### Fields
///
/// * `coords` - `[row, col]` pairs of the stored entries
/// * `values` - The stored entries, parallel to `coords`
/// * `shape` - The shape of the underlying matrix
#[derive(Debug, Clone, PartialEq)]
pub struct CooTriple<T> {
    pub coords: Vec<[usize; 2]>,
    pub values: Vec<T>,
    pub shape: (usize, usize),
}

impl<T> CooTriple<T>
where
    T: Float,
{
    /// The number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }
}

/// Convert a compressed sparse matrix to its COO triple
///
/// CSC inputs are canonicalised through CSR first, so the coordinate order
/// is always row-major.
///
/// ### Params
///
/// * `mx` - The matrix to convert, in either layout
///
/// ### Returns
///
/// The `(coords, values, shape)` triple
pub fn sparse_to_tuple<T>(mx: &CompressedSparseData<T>) -> CooTriple<T>
where
    T: Float,
{
    let converted;
    let csr = if mx.cs_type.is_csr() {
        mx
    } else {
        converted = csc_to_csr(mx);
        &converted
    };

    let nnz = csr.get_nnz();
    let mut coords = Vec::with_capacity(nnz);
    let mut values = Vec::with_capacity(nnz);

    for row in 0..csr.nrows() {
        for idx in csr.indptr[row]..csr.indptr[row + 1] {
            coords.push([row, csr.indices[idx]]);
            values.push(csr.data[idx]);
        }
    }

    CooTriple {
        coords,
        values,
        shape: csr.shape(),
    }
}

/// Convert a homogeneous list of sparse matrices to COO triples
///
/// Order and length of the input list are preserved. This and
/// [`sparse_to_tuple`] together replace a single polymorphic entry point:
/// callers state up front whether they hold one matrix or many.
///
/// ### Params
///
/// * `matrices` - The matrices to convert
///
/// ### Returns
///
/// One triple per input matrix, in input order
pub fn sparse_to_tuples<T>(matrices: &[CompressedSparseData<T>]) -> Vec<CooTriple<T>>
where
    T: Float,
{
    matrices.iter().map(sparse_to_tuple).collect()
}

///////////
// Tests //
///////////
