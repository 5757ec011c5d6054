use std::time::Duration;

// jackhmmer prefilter thresholds
pub const JACKHMMER_F1: f64 = 0.0005;
pub const JACKHMMER_F2: f64 = 0.00005;
pub const JACKHMMER_F3: f64 = 0.0000005;

// nhmmer uses a looser final filter for short queries
pub const NHMMER_SHORT_QUERY_LENGTH: usize = 50;
pub const NHMMER_F3_SHORT: f64 = 0.02;
pub const NHMMER_F3: f64 = 0.00001;

/// How often a running tool is polled for completion when a timeout is set.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// How long to keep reading a tool's stderr once the tool itself has exited.
pub const STDERR_GRACE: Duration = Duration::from_secs(2);

/// Number of trailing stderr lines kept in a tool failure.
pub const STDERR_TAIL_LINES: usize = 20;

pub const QUERY_FASTA: &str = "query.fasta";
pub const QUERY_STO: &str = "query.sto";
pub const QUERY_HMM: &str = "query.hmm";
pub const HITS_STO: &str = "hits.sto";
pub const HITS_FASTA: &str = "hits.fasta";
pub const HITS_TBL: &str = "hits.tbl";
pub const ALIGNED_STO: &str = "aligned.sto";
