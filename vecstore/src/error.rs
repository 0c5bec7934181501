use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("vecstore: storage error: {0}")]
    Storage(String),

    #[error("vecstore: serialization error: {0}")]
    Serialization(String),
}

impl From<lexigraph_kv::KVError> for StoreError {
    fn from(e: lexigraph_kv::KVError) -> Self {
        StoreError::Storage(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for StoreError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for StoreError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
