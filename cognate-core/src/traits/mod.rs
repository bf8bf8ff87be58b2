mod embedding;

pub use embedding::EmbeddingBackend;
