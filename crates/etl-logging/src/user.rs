//! Invoking-user resolution.

/// Returned when no user variable is set.
pub const UNKNOWN_USER: &str = "unknown";

/// Environment variables consulted, in order.
const USER_ENV_VARS: [&str; 4] = ["LOGNAME", "USER", "LNAME", "USERNAME"];

/// Name of the OS user running this process.
pub fn current_user() -> String {
    user_from(|name| std::env::var(name).ok())
}

/// First non-empty value among the user variables, read through `lookup`.
pub fn user_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    USER_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}
