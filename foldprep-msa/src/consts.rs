/// Description given to the query row when an MSA is built from a bare sequence.
pub const QUERY_DESCRIPTION: &str = "query";

/// Reference annotation character marking a match column in hand-built Stockholm.
pub const RF_MATCH: char = 'x';
