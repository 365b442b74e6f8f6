//! Dialect names understood by the converter.
//!
//! Every conversion writes SingleStore. Any other dialect the transpiler
//! knows can be used as a source.

/// The fixed write target.
pub const TARGET_DIALECT: &str = "singlestore";

/// Source dialect used when the caller does not name one.
pub const DEFAULT_SOURCE_DIALECT: &str = "tsql";

/// Dialect names accepted by the transpiler, target included.
const KNOWN_DIALECTS: &[&str] = &[
    "athena",
    "bigquery",
    "clickhouse",
    "cockroachdb",
    "databricks",
    "datafusion",
    "doris",
    "dremio",
    "drill",
    "druid",
    "duckdb",
    "dune",
    "exasol",
    "fabric",
    "generic",
    "hive",
    "materialize",
    "mysql",
    "oracle",
    "postgres",
    "presto",
    "redshift",
    "risingwave",
    "singlestore",
    "snowflake",
    "solr",
    "spark",
    "sqlite",
    "starrocks",
    "tableau",
    "teradata",
    "tidb",
    "trino",
    "tsql",
];

/// Sorted list of dialects that can be read, excluding the target.
pub fn source_dialects() -> Vec<String> {
    let mut names: Vec<String> = KNOWN_DIALECTS
        .iter()
        .filter(|d| **d != TARGET_DIALECT)
        .map(|d| d.to_string())
        .collect();
    names.sort();
    names
}

/// Resolve a user-supplied dialect name to its canonical spelling.
///
/// Matching is case-insensitive and accepts a few common aliases.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let lowered = name.trim().to_ascii_lowercase();
    let resolved = match lowered.as_str() {
        "postgresql" | "pg" => "postgres",
        "mssql" | "sqlserver" | "sql_server" => "tsql",
        "memsql" | "s2" => "singlestore",
        "bq" => "bigquery",
        other => other,
    };
    KNOWN_DIALECTS.iter().copied().find(|d| *d == resolved)
}

/// True when `name` resolves to the write target.
pub fn is_target(name: &str) -> bool {
    canonical_name(name) == Some(TARGET_DIALECT)
}
