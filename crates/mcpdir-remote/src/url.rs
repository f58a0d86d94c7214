//! URL construction helpers.
//!
//! Pure functions so every call site builds URLs the same way.

use url::Url;

use crate::error::{RemoteError, RemoteResult};

/// Parse a configured base URL.
pub fn parse_base(base: &str) -> RemoteResult<Url> {
    Ok(Url::parse(base.trim())?)
}

/// Append path segments to a base URL, keeping any base path.
pub fn join_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let base_path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{base_path}/{}", path.trim_start_matches('/')));
    url.set_query(None);
    url
}

/// PulseMCP listing: `/v0beta/servers?offset=&count_per_page=`.
pub fn build_servers_url(base: &Url, offset: u64, count: u32) -> Url {
    let mut url = join_path(base, "v0beta/servers");
    url.set_query(Some(&format!("offset={offset}&count_per_page={count}")));
    url
}

/// `/repos/{owner}/{repo}`.
pub fn build_repo_url(api: &Url, owner: &str, repo: &str) -> Url {
    join_path(
        api,
        &format!("repos/{}/{}", urlencoding::encode(owner), urlencoding::encode(repo)),
    )
}

/// First page of contributors (up to 100).
pub fn build_contributors_url(api: &Url, owner: &str, repo: &str) -> Url {
    let mut url = join_path(&build_repo_url(api, owner, repo), "contributors");
    url.set_query(Some("per_page=100&anon=1"));
    url
}

/// `/repos/{owner}/{repo}/readme`.
pub fn build_readme_url(api: &Url, owner: &str, repo: &str) -> Url {
    join_path(&build_repo_url(api, owner, repo), "readme")
}

/// `/repos/{owner}/{repo}/contents/{path}`; an empty path lists the root.
pub fn build_contents_url(api: &Url, owner: &str, repo: &str, path: &str) -> Url {
    let encoded: Vec<String> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| urlencoding::encode(s).into_owned())
        .collect();
    join_path(
        &build_repo_url(api, owner, repo),
        &format!("contents/{}", encoded.join("/")),
    )
}

/// Endpoint under a server's external URL, e.g. `list_resources`.
pub fn build_endpoint_url(external_url: &str, path: &str) -> RemoteResult<Url> {
    let base = Url::parse(external_url.trim())?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(RemoteError::invalid(format!(
            "unsupported scheme '{}' in {external_url}",
            base.scheme()
        )));
    }
    Ok(join_path(&base, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> Url {
        Url::parse("https://api.github.com").unwrap()
    }

    #[test]
    fn test_servers_url() {
        let base = Url::parse("https://api.pulsemcp.com").unwrap();
        assert_eq!(
            build_servers_url(&base, 200, 100).as_str(),
            "https://api.pulsemcp.com/v0beta/servers?offset=200&count_per_page=100"
        );
    }

    #[test]
    fn test_servers_url_keeps_base_path() {
        let base = Url::parse("http://localhost:8080/proxy/").unwrap();
        assert_eq!(
            build_servers_url(&base, 0, 10).as_str(),
            "http://localhost:8080/proxy/v0beta/servers?offset=0&count_per_page=10"
        );
    }

    #[test]
    fn test_github_urls() {
        assert_eq!(
            build_repo_url(&api(), "acme", "tools").as_str(),
            "https://api.github.com/repos/acme/tools"
        );
        assert_eq!(
            build_contributors_url(&api(), "acme", "tools").as_str(),
            "https://api.github.com/repos/acme/tools/contributors?per_page=100&anon=1"
        );
        assert_eq!(
            build_readme_url(&api(), "acme", "tools").as_str(),
            "https://api.github.com/repos/acme/tools/readme"
        );
        assert_eq!(
            build_contents_url(&api(), "acme", "tools", "").as_str(),
            "https://api.github.com/repos/acme/tools/contents/"
        );
        assert_eq!(
            build_contents_url(&api(), "acme", "tools", "src/mcp.json").as_str(),
            "https://api.github.com/repos/acme/tools/contents/src/mcp.json"
        );
    }

    #[test]
    fn test_endpoint_url() {
        assert_eq!(
            build_endpoint_url("https://mcp.example.com/", "list_resources")
                .unwrap()
                .as_str(),
            "https://mcp.example.com/list_resources"
        );
        assert_eq!(
            build_endpoint_url("https://mcp.example.com/v1?x=1", "api/tools")
                .unwrap()
                .as_str(),
            "https://mcp.example.com/v1/api/tools"
        );
        assert!(build_endpoint_url("not a url", "x").is_err());
        assert!(build_endpoint_url("ftp://files.example.com", "x").is_err());
    }
}
