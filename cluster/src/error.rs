use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("cluster: card provider error: {0}")]
    Cards(String),

    #[error("cluster: store error: {0}")]
    Store(String),
}

impl From<lexigraph_vecstore::StoreError> for ClusterError {
    fn from(e: lexigraph_vecstore::StoreError) -> Self {
        ClusterError::Store(e.to_string())
    }
}
