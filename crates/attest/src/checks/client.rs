//! Check-run API client.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    CheckAnnotation, CheckRun, CheckRunFilter, CheckRunList, CheckRunUpdate, NewCheckRun,
};
use crate::address::RepoAddress;
use crate::auth::Credential;
use crate::error::{Error, Result, classify_response};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::pagination::{PageInfo, page_info_from_headers};
use crate::rate_limit::{ApiRateLimiter, RateLimitInfo, RateLimitResponse};

/// Default API root for github.com.
pub const GITHUB_API_ROOT: &str = "https://api.github.com";

/// Default page size for listings.
pub(crate) const PAGE_SIZE: u32 = 100;

/// Typed client for the check-runs resource.
///
/// Every operation takes a [`RepoAddress`], so a repository can be addressed
/// by `owner/name` slug or by numeric id interchangeably. The client is
/// `Clone` and stateless between calls; all I/O goes through the
/// [`HttpTransport`] it was built with.
#[derive(Clone)]
pub struct ChecksClient {
    transport: Arc<dyn HttpTransport>,
    api_root: String,
    credential: Credential,
    /// Optional proactive rate limiter for pacing API requests.
    rate_limiter: Option<ApiRateLimiter>,
}

impl ChecksClient {
    /// Create a client against api.github.com.
    pub fn new(credential: Credential) -> Result<Self> {
        Self::with_api_root(GITHUB_API_ROOT, credential)
    }

    /// Create a client against a specific API root.
    ///
    /// # Arguments
    ///
    /// * `api_root` - API root URL (e.g., "https://api.github.com" or a
    ///   GitHub Enterprise `https://ghe.example.com/api/v3`)
    /// * `credential` - Credential sent with every request
    pub fn with_api_root(api_root: &str, credential: Credential) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(StdDuration::from_secs(30))
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Self::new_with_transport(
            api_root,
            credential,
            None,
            Arc::new(transport),
        ))
    }

    pub fn new_with_transport(
        api_root: &str,
        credential: Credential,
        rate_limiter: Option<ApiRateLimiter>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let api_root = api_root.trim_end_matches('/').to_string();
        Self {
            transport,
            api_root,
            credential,
            rate_limiter,
        }
    }

    /// Pace all requests through the given limiter.
    #[must_use]
    pub fn with_rate_limiter(mut self, limiter: ApiRateLimiter) -> Self {
        self.rate_limiter = Some(limiter);
        self
    }

    /// Get the API root URL.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Wait for the rate limiter if one is configured.
    async fn wait_for_rate_limit(&self) {
        if let Some(ref limiter) = self.rate_limiter {
            limiter.wait().await;
        }
    }

    fn request_headers(&self, has_body: bool) -> Vec<(String, String)> {
        let mut headers = vec![
            (
                "Accept".to_string(),
                "application/vnd.github+json".to_string(),
            ),
            ("User-Agent".to_string(), "attest".to_string()),
            ("Authorization".to_string(), self.credential.authorization()),
        ];
        if has_body {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }
        headers
    }

    /// Issue a request and classify any non-2xx response.
    ///
    /// `resource` names what is being addressed, for error messages.
    async fn send(
        &self,
        method: HttpMethod,
        path: &str,
        body: Vec<u8>,
        resource: &str,
    ) -> Result<HttpResponse> {
        self.wait_for_rate_limit().await;
        let url = format!("{}{}", self.api_root, path);

        let request = HttpRequest {
            method,
            url,
            headers: self.request_headers(!body.is_empty()),
            body,
        };

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(classify_response(resource, &response));
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        let response = self.send(HttpMethod::Get, path, Vec::new(), resource).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
        resource: &str,
    ) -> Result<T> {
        let body = serde_json::to_vec(body)?;
        let response = self.send(method, path, body, resource).await?;
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Create a check run for a commit.
    ///
    /// Not idempotent: calling twice creates two runs. The API accepts this
    /// only from the App installation that owns the check; with a plain user
    /// token it fails with [`Error::Forbidden`].
    pub async fn create(&self, repo: &RepoAddress, new_run: &NewCheckRun) -> Result<CheckRun> {
        if !self.credential.is_installation() {
            tracing::debug!(
                repo = %repo,
                "creating a check run with a non-installation credential; the API rejects this for most repositories"
            );
        }

        let path = format!("{}/check-runs", repo.path());
        self.send_json(HttpMethod::Post, &path, new_run, &repo.to_string())
            .await
    }

    /// Apply a partial update to an existing check run.
    ///
    /// Fields left unset in `update` are not sent, so the server keeps their
    /// current values. Returns the full merged state.
    pub async fn update(
        &self,
        repo: &RepoAddress,
        check_run_id: u64,
        update: &CheckRunUpdate,
    ) -> Result<CheckRun> {
        let path = format!("{}/check-runs/{}", repo.path(), check_run_id);
        let resource = format!("check run {} in {}", check_run_id, repo);
        self.send_json(HttpMethod::Patch, &path, update, &resource)
            .await
    }

    /// Fetch a single check run by id.
    pub async fn get(&self, repo: &RepoAddress, check_run_id: u64) -> Result<CheckRun> {
        let path = format!("{}/check-runs/{}", repo.path(), check_run_id);
        let resource = format!("check run {} in {}", check_run_id, repo);
        self.get_json(&path, &resource).await
    }

    /// Fetch one page of check runs for a commit-ish reference.
    ///
    /// `git_ref` may be a SHA, branch, or tag. Returns the page envelope and
    /// pagination state from the Link header for callers paging manually.
    pub async fn list_for_reference_page(
        &self,
        repo: &RepoAddress,
        git_ref: &str,
        filter: &CheckRunFilter,
        page: u32,
    ) -> Result<(CheckRunList, PageInfo)> {
        let base = format!("{}/commits/{}/check-runs", repo.path(), git_ref);
        let path = list_path(base, filter, page);
        let resource = format!("{} in {}", git_ref, repo);

        let response = self.send(HttpMethod::Get, &path, Vec::new(), &resource).await?;
        let info = page_info_from_headers(&response.headers);
        let list: CheckRunList = serde_json::from_slice(&response.body)?;
        Ok((list, info))
    }

    /// List all check runs for a commit-ish reference.
    ///
    /// Walks every page. No matching runs is an empty `Ok`, not an error.
    pub async fn list_for_reference(
        &self,
        repo: &RepoAddress,
        git_ref: &str,
        filter: &CheckRunFilter,
    ) -> Result<Vec<CheckRun>> {
        let mut all_runs = Vec::new();
        let mut page = 1u32;

        loop {
            let (list, info) = self
                .list_for_reference_page(repo, git_ref, filter, page)
                .await?;

            let count = list.check_runs.len();
            all_runs.extend(list.check_runs);

            match next_page(page, count, &info) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(all_runs)
    }

    /// Fetch one page of check runs in a check suite.
    pub async fn list_for_suite_page(
        &self,
        repo: &RepoAddress,
        check_suite_id: u64,
        filter: &CheckRunFilter,
        page: u32,
    ) -> Result<(CheckRunList, PageInfo)> {
        let base = format!("{}/check-suites/{}/check-runs", repo.path(), check_suite_id);
        let path = list_path(base, filter, page);
        let resource = format!("check suite {} in {}", check_suite_id, repo);

        let response = self.send(HttpMethod::Get, &path, Vec::new(), &resource).await?;
        let info = page_info_from_headers(&response.headers);
        let list: CheckRunList = serde_json::from_slice(&response.body)?;
        Ok((list, info))
    }

    /// List all check runs in a check suite.
    pub async fn list_for_suite(
        &self,
        repo: &RepoAddress,
        check_suite_id: u64,
        filter: &CheckRunFilter,
    ) -> Result<Vec<CheckRun>> {
        let mut all_runs = Vec::new();
        let mut page = 1u32;

        loop {
            let (list, info) = self
                .list_for_suite_page(repo, check_suite_id, filter, page)
                .await?;

            let count = list.check_runs.len();
            all_runs.extend(list.check_runs);

            match next_page(page, count, &info) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(all_runs)
    }

    /// Fetch one page of annotations for a check run.
    ///
    /// The annotations endpoint returns a bare array rather than an envelope.
    pub async fn list_annotations_page(
        &self,
        repo: &RepoAddress,
        check_run_id: u64,
        page: u32,
    ) -> Result<(Vec<CheckAnnotation>, PageInfo)> {
        let path = format!(
            "{}/check-runs/{}/annotations?per_page={}&page={}",
            repo.path(),
            check_run_id,
            PAGE_SIZE,
            page
        );
        let resource = format!("check run {} in {}", check_run_id, repo);

        let response = self.send(HttpMethod::Get, &path, Vec::new(), &resource).await?;
        let info = page_info_from_headers(&response.headers);
        let annotations: Vec<CheckAnnotation> = serde_json::from_slice(&response.body)?;
        Ok((annotations, info))
    }

    /// List all annotations attached to a check run.
    pub async fn list_annotations(
        &self,
        repo: &RepoAddress,
        check_run_id: u64,
    ) -> Result<Vec<CheckAnnotation>> {
        let mut all_annotations = Vec::new();
        let mut page = 1u32;

        loop {
            let (annotations, info) = self
                .list_annotations_page(repo, check_run_id, page)
                .await?;

            let count = annotations.len();
            all_annotations.extend(annotations);

            match next_page(page, count, &info) {
                Some(next) => page = next,
                None => break,
            }
        }

        Ok(all_annotations)
    }

    /// Get current rate limit status (core API only).
    pub async fn rate_limit(&self) -> Result<RateLimitInfo> {
        let response: RateLimitResponse = self.get_json("/rate_limit", "rate limit").await?;
        Ok(response.resources.core.to_info())
    }
}

/// Decide where the page walk goes after a page of `count` items.
///
/// Prefers the Link header's `rel="next"`; without one, a partial page means
/// the end. A full page without a Link header probes the next page, which
/// then comes back partial (or empty) and terminates the walk.
pub(crate) fn next_page(page: u32, count: usize, info: &PageInfo) -> Option<u32> {
    if let Some(next) = info.next_page {
        Some(next)
    } else if count < PAGE_SIZE as usize {
        None
    } else {
        Some(page + 1)
    }
}

fn list_path(base: String, filter: &CheckRunFilter, page: u32) -> String {
    let mut query = format!("per_page={}&page={}", PAGE_SIZE, page);
    for (key, value) in filter.query_pairs() {
        query.push_str(&format!("&{}={}", key, value));
    }
    format!("{}?{}", base, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::types::{CheckConclusion, CheckStatus};
    use crate::http::{HttpHeaders, MockTransport};

    const HOST: &str = "https://api.test";

    fn client(transport: &MockTransport) -> ChecksClient {
        ChecksClient::new_with_transport(
            HOST,
            Credential::installation("ghs_install"),
            None,
            Arc::new(transport.clone()),
        )
    }

    fn to_headers(pairs: Vec<(&str, &str)>) -> HttpHeaders {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn response(status: u16, headers: Vec<(&str, &str)>, body: impl AsRef<[u8]>) -> HttpResponse {
        HttpResponse {
            status,
            headers: to_headers(headers),
            body: body.as_ref().to_vec(),
        }
    }

    fn run_json(id: u64, name: &str, head_sha: &str, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "name": name,
            "head_sha": head_sha,
            "status": status,
            "conclusion": null,
            "external_id": null,
            "details_url": null,
            "url": format!("{HOST}/repos/acme/widgets/check-runs/{id}"),
            "html_url": format!("https://github.test/acme/widgets/runs/{id}"),
            "started_at": "2024-03-01T10:00:00Z",
            "completed_at": null,
            "output": null
        })
    }

    fn list_json(total: u32, runs: Vec<serde_json::Value>) -> String {
        serde_json::json!({ "total_count": total, "check_runs": runs }).to_string()
    }

    #[test]
    fn checks_client_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<ChecksClient>();
    }

    #[test]
    fn new_normalizes_api_root() {
        let transport = MockTransport::new();
        let client = ChecksClient::new_with_transport(
            "https://api.test///",
            Credential::token("t"),
            None,
            Arc::new(transport),
        );
        assert_eq!(client.api_root(), "https://api.test");
    }

    #[tokio::test]
    async fn create_posts_payload_with_auth_headers() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/repos/acme/widgets/check-runs"),
            response(201, vec![], run_json(1, "build", "a1b2c3", "queued").to_string()),
        );

        let client = client(&transport);
        let new_run = NewCheckRun::new("build", "a1b2c3").with_status(CheckStatus::Queued);
        let run = client
            .create(&RepoAddress::slug("acme", "widgets"), &new_run)
            .await
            .expect("create should succeed");

        assert_eq!(run.id, 1);
        assert_eq!(run.status, CheckStatus::Queued);

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].header("authorization"), Some("Bearer ghs_install"));
        assert_eq!(
            requests[0].header("accept"),
            Some("application/vnd.github+json")
        );
        assert_eq!(requests[0].header("content-type"), Some("application/json"));

        let sent: serde_json::Value =
            serde_json::from_slice(&requests[0].body).expect("body should be JSON");
        assert_eq!(sent["name"], "build");
        assert_eq!(sent["head_sha"], "a1b2c3");
        assert_eq!(sent["status"], "queued");
    }

    #[tokio::test]
    async fn create_echoes_head_sha() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/repos/acme/widgets/check-runs"),
            response(
                201,
                vec![],
                run_json(7, "name", "feature-sha-123", "queued").to_string(),
            ),
        );

        let client = client(&transport);
        let new_run = NewCheckRun::new("name", "feature-sha-123").with_status(CheckStatus::Queued);
        let run = client
            .create(&RepoAddress::slug("acme", "widgets"), &new_run)
            .await
            .expect("create should succeed");

        assert_eq!(run.head_sha, "feature-sha-123");
    }

    #[tokio::test]
    async fn slug_and_id_addresses_reach_the_same_entity() {
        let transport = MockTransport::new();
        let body = run_json(1, "build", "a1b2c3", "queued").to_string();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/repos/acme/widgets/check-runs"),
            response(201, vec![], &body),
        );
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/repositories/5430905/check-runs"),
            response(201, vec![], &body),
        );

        let client = client(&transport);
        let new_run = NewCheckRun::new("build", "a1b2c3");

        let by_slug = client
            .create(&RepoAddress::slug("acme", "widgets"), &new_run)
            .await
            .expect("slug create should succeed");
        let by_id = client
            .create(&RepoAddress::id(5430905), &new_run)
            .await
            .expect("id create should succeed");

        assert_eq!(by_slug.id, by_id.id);
        assert_eq!(by_slug.name, by_id.name);
        assert_eq!(by_slug.head_sha, by_id.head_sha);
        assert_eq!(by_slug.status, by_id.status);

        let urls: Vec<String> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                format!("{HOST}/repos/acme/widgets/check-runs"),
                format!("{HOST}/repositories/5430905/check-runs"),
            ]
        );
    }

    #[tokio::test]
    async fn update_sends_patch_with_only_set_fields() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Patch,
            format!("{HOST}/repos/acme/widgets/check-runs/42"),
            response(200, vec![], run_json(42, "new-name", "a1b2c3", "queued").to_string()),
        );

        let client = client(&transport);
        let update = CheckRunUpdate::new().with_name("new-name");
        let run = client
            .update(&RepoAddress::slug("acme", "widgets"), 42, &update)
            .await
            .expect("update should succeed");

        // Status came back unchanged from the server
        assert_eq!(run.name, "new-name");
        assert_eq!(run.status, CheckStatus::Queued);

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Patch);
        let sent: serde_json::Value =
            serde_json::from_slice(&requests[0].body).expect("body should be JSON");
        let object = sent.as_object().expect("payload should be an object");
        assert_eq!(
            object.keys().collect::<Vec<_>>(),
            vec!["name"],
            "unset fields must be omitted, not sent as null"
        );
    }

    #[tokio::test]
    async fn create_then_update_keeps_head_sha_stable() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/repositories/99/check-runs"),
            response(201, vec![], run_json(7, "name", "sha-s", "queued").to_string()),
        );
        transport.push_response(
            HttpMethod::Patch,
            format!("{HOST}/repositories/99/check-runs/7"),
            response(
                200,
                vec![],
                run_json(7, "new-name", "sha-s", "in_progress").to_string(),
            ),
        );

        let client = client(&transport);
        let repo = RepoAddress::id(99);

        let created = client
            .create(
                &repo,
                &NewCheckRun::new("name", "sha-s").with_status(CheckStatus::Queued),
            )
            .await
            .expect("create should succeed");
        assert_eq!(created.status, CheckStatus::Queued);

        let update = CheckRunUpdate::new()
            .with_name("new-name")
            .with_status(CheckStatus::InProgress);
        let updated = client
            .update(&repo, created.id, &update)
            .await
            .expect("update should succeed");

        assert_eq!(updated.name, "new-name");
        assert_eq!(updated.status, CheckStatus::InProgress);
        assert_eq!(updated.head_sha, created.head_sha);
    }

    #[tokio::test]
    async fn get_fetches_a_single_run() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repos/acme/widgets/check-runs/42"),
            response(200, vec![], run_json(42, "build", "a1b2c3", "completed").to_string()),
        );

        let client = client(&transport);
        let run = client
            .get(&RepoAddress::slug("acme", "widgets"), 42)
            .await
            .expect("get should succeed");

        assert_eq!(run.id, 42);
        assert_eq!(run.status, CheckStatus::Completed);
    }

    #[tokio::test]
    async fn list_for_reference_sends_filter_query() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!(
                "{HOST}/repos/acme/widgets/commits/sha-s/check-runs?per_page=100&page=1&check_name=name&status=in_progress"
            ),
            response(
                200,
                vec![],
                list_json(1, vec![run_json(7, "name", "sha-s", "in_progress")]),
            ),
        );

        let client = client(&transport);
        let filter = CheckRunFilter::new()
            .with_check_name("name")
            .with_status(CheckStatus::InProgress);
        let runs = client
            .list_for_reference(&RepoAddress::slug("acme", "widgets"), "sha-s", &filter)
            .await
            .expect("list should succeed");

        assert!(!runs.is_empty());
        for run in &runs {
            assert_eq!(run.head_sha, "sha-s");
            assert_eq!(run.name, "name");
            assert_eq!(run.status, CheckStatus::InProgress);
        }
    }

    #[tokio::test]
    async fn list_for_reference_empty_is_ok() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repositories/99/commits/main/check-runs?per_page=100&page=1"),
            response(200, vec![], list_json(0, vec![])),
        );

        let client = client(&transport);
        let runs = client
            .list_for_reference(&RepoAddress::id(99), "main", &CheckRunFilter::new())
            .await
            .expect("empty list should succeed");

        assert!(runs.is_empty());
    }

    #[tokio::test]
    async fn list_for_reference_follows_link_header() {
        let first_page: Vec<serde_json::Value> = (0..PAGE_SIZE as u64)
            .map(|i| run_json(i, "build", "sha-s", "completed"))
            .collect();
        let link = format!(
            r#"<{HOST}/repos/acme/widgets/commits/sha-s/check-runs?per_page=100&page=2>; rel="next", <{HOST}/repos/acme/widgets/commits/sha-s/check-runs?per_page=100&page=2>; rel="last""#
        );

        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repos/acme/widgets/commits/sha-s/check-runs?per_page=100&page=1"),
            response(200, vec![("Link", &link)], list_json(101, first_page)),
        );
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repos/acme/widgets/commits/sha-s/check-runs?per_page=100&page=2"),
            response(
                200,
                vec![],
                list_json(101, vec![run_json(200, "build", "sha-s", "completed")]),
            ),
        );

        let client = client(&transport);
        let runs = client
            .list_for_reference(
                &RepoAddress::slug("acme", "widgets"),
                "sha-s",
                &CheckRunFilter::new(),
            )
            .await
            .expect("paginated list should succeed");

        assert_eq!(runs.len(), PAGE_SIZE as usize + 1);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn list_for_suite_paginates_until_partial_page() {
        let first_page: Vec<serde_json::Value> = (0..PAGE_SIZE as u64)
            .map(|i| run_json(i, "build", "sha-s", "completed"))
            .collect();

        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repositories/99/check-suites/5/check-runs?per_page=100&page=1"),
            response(200, vec![], list_json(101, first_page)),
        );
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repositories/99/check-suites/5/check-runs?per_page=100&page=2"),
            response(
                200,
                vec![],
                list_json(101, vec![run_json(200, "build", "sha-s", "completed")]),
            ),
        );

        let client = client(&transport);
        let runs = client
            .list_for_suite(&RepoAddress::id(99), 5, &CheckRunFilter::new())
            .await
            .expect("paginated list should succeed");

        assert_eq!(runs.len(), PAGE_SIZE as usize + 1);
    }

    #[tokio::test]
    async fn list_annotations_decodes_bare_array() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repos/acme/widgets/check-runs/42/annotations?per_page=100&page=1"),
            response(
                200,
                vec![],
                serde_json::json!([{
                    "path": "src/lib.rs",
                    "start_line": 10,
                    "end_line": 12,
                    "annotation_level": "failure",
                    "message": "does not compile",
                    "title": "build error",
                    "raw_details": null
                }])
                .to_string(),
            ),
        );

        let client = client(&transport);
        let annotations = client
            .list_annotations(&RepoAddress::slug("acme", "widgets"), 42)
            .await
            .expect("annotations should decode");

        assert_eq!(annotations.len(), 1);
        assert_eq!(annotations[0].path, "src/lib.rs");
        assert_eq!(annotations[0].start_line, 10);
    }

    #[tokio::test]
    async fn missing_check_run_maps_to_not_found() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repos/acme/widgets/check-runs/9000"),
            response(404, vec![], r#"{"message":"Not Found"}"#),
        );

        let client = client(&transport);
        let err = client
            .get(&RepoAddress::slug("acme", "widgets"), 9000)
            .await
            .expect_err("404 should map to NotFound");

        match err {
            Error::NotFound { resource } => {
                assert_eq!(resource, "check run 9000 in acme/widgets");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn user_credential_mutation_maps_to_forbidden() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/repos/acme/widgets/check-runs"),
            response(
                403,
                vec![],
                r#"{"message":"Resource not accessible by integration"}"#,
            ),
        );

        let client = ChecksClient::new_with_transport(
            HOST,
            Credential::token("ghp_user"),
            None,
            Arc::new(transport.clone()),
        );
        let err = client
            .create(
                &RepoAddress::slug("acme", "widgets"),
                &NewCheckRun::new("build", "a1b2c3"),
            )
            .await
            .expect_err("403 should map to Forbidden");

        match err {
            Error::Forbidden { message } => {
                assert_eq!(message, "Resource not accessible by integration");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn exhausted_quota_maps_to_rate_limited() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/repos/acme/widgets/check-runs/1"),
            response(
                403,
                vec![
                    ("x-ratelimit-remaining", "0"),
                    ("x-ratelimit-reset", "1706400000"),
                ],
                r#"{"message":"API rate limit exceeded"}"#,
            ),
        );

        let client = client(&transport);
        let err = client
            .get(&RepoAddress::slug("acme", "widgets"), 1)
            .await
            .expect_err("exhausted quota should map to RateLimited");

        assert!(matches!(err, Error::RateLimited { .. }));
    }

    #[tokio::test]
    async fn unresolvable_sha_maps_to_validation() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Post,
            format!("{HOST}/repositories/99/check-runs"),
            response(
                422,
                vec![],
                r#"{"message":"No commit found for SHA: deadbeef"}"#,
            ),
        );

        let client = client(&transport);
        let err = client
            .create(&RepoAddress::id(99), &NewCheckRun::new("build", "deadbeef"))
            .await
            .expect_err("422 should map to Validation");

        match err {
            Error::Validation { message } => {
                assert_eq!(message, "No commit found for SHA: deadbeef");
            }
            other => panic!("unexpected error variant: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limit_endpoint_decodes_core_bucket() {
        let transport = MockTransport::new();
        transport.push_response(
            HttpMethod::Get,
            format!("{HOST}/rate_limit"),
            response(
                200,
                vec![],
                r#"{"resources":{"core":{"limit":5000,"remaining":4999,"reset":1706400000,"used":1}}}"#,
            ),
        );

        let client = client(&transport);
        let info = client.rate_limit().await.expect("rate limit should decode");

        assert_eq!(info.limit, 5000);
        assert_eq!(info.remaining, 4999);
        assert_eq!(info.reset_at.timestamp(), 1706400000);
    }

    #[test]
    fn next_page_prefers_link_header_then_partial_page() {
        let with_next = PageInfo {
            next_page: Some(3),
            last_page: Some(5),
        };
        assert_eq!(next_page(2, PAGE_SIZE as usize, &with_next), Some(3));

        let no_link = PageInfo::default();
        assert_eq!(next_page(1, PAGE_SIZE as usize, &no_link), Some(2));
        assert_eq!(next_page(2, 3, &no_link), None);
        assert_eq!(next_page(1, 0, &no_link), None);
    }

    #[tokio::test]
    async fn conclusion_survives_update_round_trip() {
        let transport = MockTransport::new();
        let mut body = run_json(7, "build", "sha-s", "completed");
        body["conclusion"] = serde_json::json!("success");
        body["completed_at"] = serde_json::json!("2024-03-01T11:00:00Z");
        transport.push_response(
            HttpMethod::Patch,
            format!("{HOST}/repos/acme/widgets/check-runs/7"),
            response(200, vec![], body.to_string()),
        );

        let client = client(&transport);
        let update = CheckRunUpdate::new()
            .with_status(CheckStatus::Completed)
            .with_conclusion(CheckConclusion::Success);
        let run = client
            .update(&RepoAddress::slug("acme", "widgets"), 7, &update)
            .await
            .expect("update should succeed");

        assert_eq!(run.status, CheckStatus::Completed);
        assert_eq!(run.conclusion, Some(CheckConclusion::Success));
        assert!(run.completed_at.is_some());
    }
}
