//! What binary is running: package version plus the counter, time and cargo
//! profile stamped in by `build.rs`. Reported by the status tool and the
//! startup banner.

use serde::Serialize;

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Local build counter; 0 when built without `build.rs`
pub const BUILD_NUMBER: u64 = match option_env!("GULPER_BUILD_NUMBER") {
    Some(s) => match parse_build_number(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

/// UTC, `YYYY-MM-DDTHH:MM:SSZ`
pub const BUILD_TIMESTAMP: &str = match option_env!("GULPER_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

/// `debug` or `release`
pub const BUILD_PROFILE: &str = match option_env!("GULPER_BUILD_PROFILE") {
    Some(s) => s,
    None => "unknown",
};

// `str::parse` is not const
const fn parse_build_number(s: &str) -> Option<u64> {
    let digits = s.as_bytes();
    if digits.is_empty() {
        return None;
    }
    let mut n: u64 = 0;
    let mut i = 0;
    while i < digits.len() {
        let d = digits[i];
        if !d.is_ascii_digit() {
            return None;
        }
        n = match n.checked_mul(10) {
            Some(v) => match v.checked_add((d - b'0') as u64) {
                Some(v) => v,
                None => return None,
            },
            None => return None,
        };
        i += 1;
    }
    Some(n)
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            name: NAME,
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
            build_profile: BUILD_PROFILE,
        }
    }

    /// One-line identity, e.g. `gulper 0.1.0 #12 (release, 2026-10-19T08:00:00Z)`
    pub fn label(&self) -> String {
        format!(
            "{} {} #{} ({}, {})",
            self.name, self.version, self.build_number, self.build_profile, self.build_timestamp
        )
    }
}

/// Startup line on stderr; stdout belongs to the MCP transport
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("{}", info.label());
    eprintln!("{}", DESCRIPTION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_number() {
        assert_eq!(parse_build_number("42"), Some(42));
        assert_eq!(parse_build_number("4a2"), None);
        assert_eq!(parse_build_number(""), None);
        assert_eq!(parse_build_number("99999999999999999999"), None);
    }

    #[test]
    fn test_label() {
        let info = BuildInfo {
            name: "gulper",
            version: "1.2.3",
            build_number: 7,
            build_timestamp: "2026-10-19T08:00:00Z",
            build_profile: "release",
        };
        assert_eq!(info.label(), "gulper 1.2.3 #7 (release, 2026-10-19T08:00:00Z)");

        let current = BuildInfo::current();
        assert!(current.label().starts_with(&format!("{} {}", NAME, VERSION)));
    }
}
