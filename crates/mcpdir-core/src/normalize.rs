//! Normalization of upstream catalog records into [`Server`] rows.
//!
//! Everything here is pure: the same upstream record always yields the same
//! slug, id, tags and category, which is what lets a sync run be repeated
//! without creating duplicates.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::domain::{
    Category, HealthStatus, InstallInstructions, InstallStep, Server, ServerId,
};
use crate::ports::UpstreamServer;

/// Maximum number of tags kept per server.
pub const MAX_TAGS: usize = 10;

const STOP_WORDS: &[&str] = &["the", "and", "for", "with", "that", "this", "has", "are", "from"];

static GITHUB_REPO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)github\.com[/:]([\w.-]+)/([\w.-]+)").expect("static regex")
});

static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("static regex"));

static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9/-]+").expect("static regex"));

/// Extract `owner/repo` from a GitHub URL, if it is one.
pub fn github_owner_repo(url: &str) -> Option<(String, String)> {
    let caps = GITHUB_REPO.captures(url)?;
    let owner = caps.get(1)?.as_str().to_string();
    let repo = caps.get(2)?.as_str();
    let repo = repo.strip_suffix(".git").unwrap_or(repo).to_string();
    if owner.is_empty() || repo.is_empty() {
        return None;
    }
    Some((owner, repo))
}

/// Stable slug for a server.
///
/// GitHub-hosted servers use `owner/repo`; everything else falls back to the
/// name.
pub fn server_slug(name: &str, github_url: Option<&str>) -> String {
    if let Some((owner, repo)) = github_url.and_then(github_owner_repo) {
        let joined = format!("{owner}/{repo}").to_lowercase();
        let slug = NON_SLUG.replace_all(&joined, "-");
        return slug.trim_matches('-').to_string();
    }

    let lowered = name.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "unnamed".to_string()
    } else {
        slug.to_string()
    }
}

/// Deterministic id for a slug.
pub fn server_id(slug: &str) -> ServerId {
    ServerId::from_slug(slug)
}

/// Naive keyword tags from the name and description.
pub fn extract_tags(name: &str, description: &str) -> Vec<String> {
    let text = format!("{name} {description}").to_lowercase();
    let mut seen = HashSet::new();
    NON_ALNUM
        .split(&text)
        .filter(|token| token.len() > 2 && !STOP_WORDS.contains(token))
        .filter(|token| seen.insert(*token))
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

/// Keyword classification. The first matching rule wins.
pub fn classify_category(name: &str, description: &str) -> Category {
    let name = name.to_lowercase();
    let desc = description.to_lowercase();
    let desc_tokens: Vec<&str> = NON_ALNUM.split(&desc).collect();

    if name.contains("auth") || desc.contains("auth") || desc.contains("login") {
        Category::Auth
    } else if desc.contains("database") || desc.contains("storage") || name.contains("db") {
        Category::Database
    } else if desc_tokens.contains(&"ai") || desc.contains("llm") || desc.contains("language model")
    {
        Category::Ai
    } else if desc.contains("file") || desc.contains("document") {
        Category::Files
    } else if desc.contains("web") || desc.contains("http") {
        Category::Web
    } else {
        Category::Other
    }
}

/// Install steps implied by the package registry when upstream has none.
pub fn default_install_steps(registry: Option<&str>, package: Option<&str>) -> Vec<InstallStep> {
    let (Some(registry), Some(package)) = (registry, package) else {
        return Vec::new();
    };
    if package.trim().is_empty() {
        return Vec::new();
    }

    match registry.to_lowercase().as_str() {
        "npm" => vec![
            InstallStep::new("Node.js", format!("npm install {package}")),
            InstallStep::new("Yarn", format!("yarn add {package}")),
        ],
        "pip" | "pypi" => vec![InstallStep::new("Python", format!("pip install {package}"))],
        "cargo" | "crates.io" => vec![InstallStep::new("Rust", format!("cargo add {package}"))],
        "go" => vec![InstallStep::new("Go", format!("go get {package}"))],
        _ => Vec::new(),
    }
}

/// `(platform, install_method)` for a package registry.
fn platform_for_registry(registry: Option<&str>) -> (&'static str, &'static str) {
    match registry.map(str::to_lowercase).as_deref() {
        Some("npm") => ("node", "npm"),
        Some("pip" | "pypi") => ("python", "pip"),
        Some("cargo" | "crates.io") => ("rust", "cargo"),
        Some("go") => ("go", "go"),
        _ => ("any", "manual"),
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Build a catalog row from an upstream record.
///
/// Columns owned by other jobs (health, repository stats other than stars,
/// detection state) start at their defaults; the store keeps existing values
/// for those on update.
pub fn normalize(upstream: &UpstreamServer, now: DateTime<Utc>) -> Server {
    let github_url = non_empty(upstream.source_code_url.as_ref());
    let slug = server_slug(&upstream.name, github_url.as_deref());
    let description = non_empty(upstream.short_description.as_ref())
        .or_else(|| non_empty(upstream.ai_description.as_ref()))
        .unwrap_or_default();
    let registry = non_empty(upstream.package_registry.as_ref());
    let package = non_empty(upstream.package_name.as_ref());
    let (platform, install_method) = platform_for_registry(registry.as_deref());

    let steps = if upstream.install_instructions.is_empty() {
        default_install_steps(registry.as_deref(), package.as_deref())
    } else {
        upstream.install_instructions.clone()
    };
    let install_instructions = if steps.is_empty() {
        InstallInstructions::Missing
    } else {
        InstallInstructions::Parsed(steps)
    };

    Server {
        id: server_id(&slug),
        category: classify_category(&upstream.name, &description),
        tags: extract_tags(&upstream.name, &description),
        slug,
        name: upstream.name.trim().to_string(),
        description,
        platform: platform.to_string(),
        install_method: install_method.to_string(),
        install_instructions,
        github_url,
        external_url: non_empty(upstream.external_url.as_ref()),
        package_registry: registry,
        package_name: package,
        stars: upstream.github_stars.unwrap_or(0),
        forks: 0,
        open_issues: 0,
        contributors: 0,
        health_status: HealthStatus::Unknown,
        tools_detection_source: None,
        last_updated: now,
        last_checked: None,
    }
}
