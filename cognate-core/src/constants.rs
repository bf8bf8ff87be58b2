/// Cognate engine version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default top-K candidates retrieved per (model, target corpus).
pub const DEFAULT_TOP_K: usize = 200;

/// Default maximum leads emitted per source record.
pub const DEFAULT_MAX_OUT: usize = 200;

/// Default embedding vector dimensionality.
pub const DEFAULT_DIMENSIONS: usize = 1024;

/// Default attempts against an unreachable backend before the run fails.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff between retries (milliseconds).
pub const DEFAULT_RETRY_BASE_MS: u64 = 250;

/// Default capacity of the in-memory hot cache tier (entries).
pub const DEFAULT_HOT_CACHE_ENTRIES: u64 = 16_384;

/// Approximate tokens per whitespace-separated word, for remote-backend
/// cost estimation of short lexeme strings.
pub const TOKENS_PER_WORD: f64 = 1.2;

/// Free-tier token allowance assumed for the remote embedding API.
pub const REMOTE_FREE_TIER_TOKENS: u64 = 3_500_000;

/// Paid-tier price per million tokens (USD) for the remote embedding API.
pub const REMOTE_PRICE_PER_MILLION: f64 = 0.15;
