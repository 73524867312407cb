//! Built-in system variables.
//!
//! This module implements the `$`-prefixed dynamic variables such as
//! {{$timestamp}}, {{$randomUUID}} and {{$randomEmail}}. They take no
//! arguments, are never stored, and produce a fresh value on every resolution.

use chrono::{SecondsFormat, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

const LOWER_ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const LOWER_ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const MIXED_ALPHA: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const HEX: &[u8] = b"0123456789abcdef";

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "John", "Patricia", "Robert", "Jennifer", "Michael", "Linda", "William",
    "Elizabeth", "David", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Emma", "Olivia", "Liam", "Noah", "Ava",
];

const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Wilson", "Anderson", "Taylor", "Moore", "Jackson",
    "Martin", "Lee", "Thompson",
];

const EMAIL_DOMAINS: &[&str] = &["example", "mail", "test", "demo"];
const EMAIL_TLDS: &[&str] = &["com", "org", "net", "io"];

/// Group a system variable belongs to, used for UI discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemVariableCategory {
    Date,
    Random,
    Uuid,
    System,
}

/// Catalog entry describing a system variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemVariable {
    /// Name including the `$` prefix
    pub key: &'static str,
    pub category: SystemVariableCategory,
    pub description: &'static str,
    /// Sample output
    pub example: &'static str,
    /// Always true: system variables cannot be edited
    pub readonly: bool,
}

struct Generator {
    key: &'static str,
    category: SystemVariableCategory,
    description: &'static str,
    example: &'static str,
    generate: fn() -> String,
}

static CATALOG: &[Generator] = &[
    Generator {
        key: "$timestamp",
        category: SystemVariableCategory::Date,
        description: "Current Unix time in milliseconds",
        example: "1706284800000",
        generate: timestamp_millis,
    },
    Generator {
        key: "$unixTimestamp",
        category: SystemVariableCategory::Date,
        description: "Current Unix time in seconds",
        example: "1706284800",
        generate: timestamp_seconds,
    },
    Generator {
        key: "$isoTimestamp",
        category: SystemVariableCategory::Date,
        description: "Current time as ISO 8601 (UTC, milliseconds)",
        example: "2024-01-26T16:00:00.000Z",
        generate: iso_timestamp,
    },
    Generator {
        key: "$dateToday",
        category: SystemVariableCategory::Date,
        description: "Current date (YYYY-MM-DD)",
        example: "2024-01-26",
        generate: date_today,
    },
    Generator {
        key: "$timeNow",
        category: SystemVariableCategory::Date,
        description: "Current time (HH:MM:SS)",
        example: "16:00:00",
        generate: time_now,
    },
    Generator {
        key: "$dateTime",
        category: SystemVariableCategory::Date,
        description: "Current date and time (YYYY-MM-DD HH:MM:SS)",
        example: "2024-01-26 16:00:00",
        generate: date_time,
    },
    Generator {
        key: "$randomUUID",
        category: SystemVariableCategory::Uuid,
        description: "Random UUID v4",
        example: "550e8400-e29b-41d4-a716-446655440000",
        generate: uuid_v4,
    },
    Generator {
        key: "$guid",
        category: SystemVariableCategory::Uuid,
        description: "Random UUID v4 (alias of $randomUUID)",
        example: "550e8400-e29b-41d4-a716-446655440000",
        generate: uuid_v4,
    },
    Generator {
        key: "$randomInt",
        category: SystemVariableCategory::Random,
        description: "Random integer from 0 to 999999",
        example: "427913",
        generate: random_int,
    },
    Generator {
        key: "$randomInt1",
        category: SystemVariableCategory::Random,
        description: "Random single digit",
        example: "7",
        generate: random_digit,
    },
    Generator {
        key: "$randomFloat",
        category: SystemVariableCategory::Random,
        description: "Random decimal with two fractional digits",
        example: "512.37",
        generate: random_float,
    },
    Generator {
        key: "$randomString",
        category: SystemVariableCategory::Random,
        description: "Random lowercase alphanumeric string (13 chars)",
        example: "k3j9x0qz7m2ab",
        generate: random_string,
    },
    Generator {
        key: "$randomString5",
        category: SystemVariableCategory::Random,
        description: "Random lowercase alphanumeric string (5 chars)",
        example: "x8k2p",
        generate: random_string5,
    },
    Generator {
        key: "$randomString10",
        category: SystemVariableCategory::Random,
        description: "Random lowercase alphanumeric string (10 chars)",
        example: "q0w9e8r7t6",
        generate: random_string10,
    },
    Generator {
        key: "$randomAlpha",
        category: SystemVariableCategory::Random,
        description: "Random letters, mixed case (10 chars)",
        example: "aBcDeFgHiJ",
        generate: random_alpha,
    },
    Generator {
        key: "$randomHex",
        category: SystemVariableCategory::Random,
        description: "Random lowercase hex string (16 chars)",
        example: "9f86d081884c7d65",
        generate: random_hex,
    },
    Generator {
        key: "$randomEmail",
        category: SystemVariableCategory::Random,
        description: "Random email address",
        example: "jdoe482@example.com",
        generate: random_email,
    },
    Generator {
        key: "$randomFirstName",
        category: SystemVariableCategory::Random,
        description: "Random first name",
        example: "Emma",
        generate: random_first_name,
    },
    Generator {
        key: "$randomLastName",
        category: SystemVariableCategory::Random,
        description: "Random last name",
        example: "Garcia",
        generate: random_last_name,
    },
    Generator {
        key: "$randomFullName",
        category: SystemVariableCategory::Random,
        description: "Random first and last name",
        example: "Emma Garcia",
        generate: random_full_name,
    },
    Generator {
        key: "$randomBoolean",
        category: SystemVariableCategory::Random,
        description: "Random boolean (true/false)",
        example: "true",
        generate: random_boolean,
    },
    Generator {
        key: "$randomIP",
        category: SystemVariableCategory::Random,
        description: "Random IPv4 address",
        example: "192.168.14.7",
        generate: random_ip,
    },
    Generator {
        key: "$randomPort",
        category: SystemVariableCategory::Random,
        description: "Random port from 1 to 65535",
        example: "8080",
        generate: random_port,
    },
    Generator {
        key: "$userAgent",
        category: SystemVariableCategory::System,
        description: "Product identifier of this client",
        example: "rest-variables/0.2.0",
        generate: user_agent,
    },
    Generator {
        key: "$platform",
        category: SystemVariableCategory::System,
        description: "Operating system name",
        example: "linux",
        generate: platform,
    },
];

/// Resolves a system variable by name (including the `$` prefix).
///
/// Returns `None` for names that are not in the catalog.
///
/// # Examples
/// ```
/// use rest_variables::variables::system::resolve_system_variable;
///
/// let uuid = resolve_system_variable("$randomUUID").unwrap();
/// assert_eq!(uuid.len(), 36);
///
/// assert!(resolve_system_variable("$nope").is_none());
/// ```
pub fn resolve_system_variable(name: &str) -> Option<String> {
    CATALOG
        .iter()
        .find(|g| g.key == name)
        .map(|g| (g.generate)())
}

/// Checks whether `name` is a known system variable.
pub fn is_system_variable(name: &str) -> bool {
    CATALOG.iter().any(|g| g.key == name)
}

/// Lists the catalog for discovery (autocomplete, help panes).
pub fn get_system_variables() -> Vec<SystemVariable> {
    CATALOG
        .iter()
        .map(|g| SystemVariable {
            key: g.key,
            category: g.category,
            description: g.description,
            example: g.example,
            readonly: true,
        })
        .collect()
}

fn timestamp_millis() -> String {
    Utc::now().timestamp_millis().to_string()
}

fn timestamp_seconds() -> String {
    Utc::now().timestamp().to_string()
}

fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn date_today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

fn time_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

fn date_time() -> String {
    Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn uuid_v4() -> String {
    Uuid::new_v4().to_string()
}

fn random_int() -> String {
    rand::thread_rng().gen_range(0..1_000_000).to_string()
}

fn random_digit() -> String {
    rand::thread_rng().gen_range(0..10).to_string()
}

fn random_float() -> String {
    format!("{:.2}", rand::thread_rng().gen_range(0.0..1000.0))
}

/// Picks `len` characters from `charset`.
fn random_from(charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| charset[rng.gen_range(0..charset.len())] as char)
        .collect()
}

fn pick(words: &[&'static str]) -> &'static str {
    words[rand::thread_rng().gen_range(0..words.len())]
}

fn random_string() -> String {
    random_from(LOWER_ALPHANUMERIC, 13)
}

fn random_string5() -> String {
    random_from(LOWER_ALPHANUMERIC, 5)
}

fn random_string10() -> String {
    random_from(LOWER_ALPHANUMERIC, 10)
}

fn random_alpha() -> String {
    random_from(MIXED_ALPHA, 10)
}

fn random_hex() -> String {
    random_from(HEX, 16)
}

fn random_email() -> String {
    format!(
        "{}{}@{}.{}",
        random_from(LOWER_ALPHA, 6),
        random_from(DIGITS, 3),
        pick(EMAIL_DOMAINS),
        pick(EMAIL_TLDS)
    )
}

fn random_first_name() -> String {
    pick(FIRST_NAMES).to_string()
}

fn random_last_name() -> String {
    pick(LAST_NAMES).to_string()
}

fn random_full_name() -> String {
    format!("{} {}", pick(FIRST_NAMES), pick(LAST_NAMES))
}

fn random_boolean() -> String {
    rand::thread_rng().gen_bool(0.5).to_string()
}

fn random_ip() -> String {
    let mut rng = rand::thread_rng();
    let octets: Vec<String> = (0..4).map(|_| rng.gen_range(0..=255u8).to_string()).collect();
    octets.join(".")
}

fn random_port() -> String {
    rand::thread_rng().gen_range(1..=65535u32).to_string()
}

fn user_agent() -> String {
    format!("rest-variables/{}", env!("CARGO_PKG_VERSION"))
}

fn platform() -> String {
    std::env::consts::OS.to_string()
}
