//! Configuration types for the ancestry executor.

use crate::rank::RankingMode;

/// Configuration for the ancestry executor.
///
/// # Example
///
/// ```rust
/// use ancestry_joins::{ExecutorConfig, RankingMode};
///
/// let config = ExecutorConfig::builder()
///     .with_parallel(true)
///     .with_max_results(100_000)
///     .with_ranking(RankingMode::Standard)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfig {
    /// Rank independent trees in parallel (requires `parallel` feature).
    pub parallel: bool,
    /// Maximum number of result rows (None = unlimited).
    pub max_results: Option<usize>,
    /// How ties in reverse rank are numbered.
    pub ranking: RankingMode,
    /// Reject malformed ancestry paths instead of treating them as empty.
    pub strict_paths: bool,
}

impl ExecutorConfig {
    /// Creates a new builder for ExecutorConfig.
    pub fn builder() -> ExecutorConfigBuilder {
        ExecutorConfigBuilder::default()
    }
}

/// Builder for ExecutorConfig.
#[derive(Debug, Clone, Default)]
pub struct ExecutorConfigBuilder {
    parallel: bool,
    max_results: Option<usize>,
    ranking: RankingMode,
    strict_paths: bool,
}

impl ExecutorConfigBuilder {
    /// Enables or disables parallel ranking across trees.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the maximum number of result rows.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Sets the reverse-rank numbering.
    pub fn with_ranking(mut self, ranking: RankingMode) -> Self {
        self.ranking = ranking;
        self
    }

    /// Enables strict path auditing.
    pub fn with_strict_paths(mut self, strict: bool) -> Self {
        self.strict_paths = strict;
        self
    }

    /// Builds the ExecutorConfig.
    pub fn build(self) -> ExecutorConfig {
        ExecutorConfig {
            parallel: self.parallel,
            max_results: self.max_results,
            ranking: self.ranking,
            strict_paths: self.strict_paths,
        }
    }
}
