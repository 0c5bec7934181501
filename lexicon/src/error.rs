use thiserror::Error;

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("lexicon: store error: {0}")]
    Store(#[from] lexigraph_vecstore::StoreError),

    #[error("lexicon: cluster error: {0}")]
    Cluster(#[from] lexigraph_cluster::ClusterError),

    #[error("lexicon: empty vector for {0:?}")]
    EmptyVector(String),
}
