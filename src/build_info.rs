//! Build metadata stamped in by `build.rs`

use std::fmt;

use serde::Serialize;

const BANNER_RULE: &str = "===============================================";

/// 0 when built without `build.rs` (e.g. some IDE checkers)
pub const BUILD_NUMBER: u64 = match option_env!("NUTRILIN_BUILD_NUMBER") {
    Some(digits) => digits_to_u64(digits),
    None => 0,
};

pub const BUILD_TIMESTAMP: &str = match option_env!("NUTRILIN_BUILD_TIMESTAMP") {
    Some(stamp) => stamp,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// const context: no str::parse, no iterators. Anything malformed reads as 0.
const fn digits_to_u64(digits: &str) -> u64 {
    let bytes = digits.as_bytes();
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            return 0;
        }
        value = value.saturating_mul(10).saturating_add((bytes[i] - b'0') as u64);
        i += 1;
    }
    value
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub const CURRENT: BuildInfo = BuildInfo {
        version: VERSION,
        build_number: BUILD_NUMBER,
        build_timestamp: BUILD_TIMESTAMP,
    };

    pub fn banner_lines(&self) -> [String; 3] {
        [
            "  Nutrilin - meal composer".to_string(),
            format!("  Version: {} | Build: {}", self.version, self.build_number),
            format!("  Compiled: {}", self.build_timestamp),
        ]
    }
}

/// One-line form used in log records: `1.0.0+b42`
impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+b{}", self.version, self.build_number)
    }
}

/// Startup banner on stderr; stdout is reserved for the rendered view
pub fn print_startup_banner() {
    eprintln!("{}", BANNER_RULE);
    for line in BuildInfo::CURRENT.banner_lines() {
        eprintln!("{}", line);
    }
    eprintln!("{}", BANNER_RULE);
    tracing::info!(build = %BuildInfo::CURRENT, compiled = BUILD_TIMESTAMP, "nutrilin starting");
}
