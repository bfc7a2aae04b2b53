//! Service path short-hands used on the command line.
//!
//! The client itself treats service paths as opaque; these helpers only turn
//! what a person types into the canonical form stored by the backend.

/// Canonical form of a service name: leading `/`, no trailing `/`
///
/// `service/name` becomes `/service/name`.
pub fn format_service_name(name: &str) -> String {
    let trimmed = name.trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Expand a comma-separated list of service paths
///
/// Each element may name several sibling environments with `+`:
/// `billing/dev+prod` expands to `/billing/dev` and `/billing/prod`.
pub fn parse_service_paths(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .flat_map(expand_environments)
        .collect()
}

fn expand_environments(service_path: &str) -> Vec<String> {
    let mut parts = service_path.split('+');
    let first = format_service_name(parts.next().unwrap_or_default());

    let (dir, first_env) = match first.rfind('/') {
        Some(idx) => (&first[..idx], &first[idx + 1..]),
        None => ("", first.as_str()),
    };

    std::iter::once(first_env)
        .chain(parts)
        .map(|env| format_service_name(&format!("{dir}/{env}")))
        .collect()
}
