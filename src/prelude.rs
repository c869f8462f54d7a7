pub use crate::data::embeddings::load_embeddings;
pub use crate::data::loader::{
    build_adjacency, features_to_mat, load_dataset, LoadedDataset, Observation, SplitData,
};
pub use crate::data::structures::{
    coo_to_csr, sparse_to_tuple, sparse_to_tuples, CompressedSparseData, CooTriple, SparseGraph,
};
pub use crate::error::LoadError;
pub use crate::feed::{construct_feed_dict, SUPPORT_INDICES};
pub use crate::utils::sparse_ops::{
    degree_vector, inv_sqrt_degrees, normalise_adjacency, preprocess_adjacency,
};
pub use crate::{prepare_gcn_inputs, GcnInputs};
