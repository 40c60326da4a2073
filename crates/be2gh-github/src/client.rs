//! Blocking GitHub client built on `ureq`.
//!
//! [`GithubClient`] handles authentication, status checking and JSON
//! decoding; [`GithubRepo`] binds it to one repository and implements
//! [`IssueTracker`] and [`RepositoryAdmin`].

use be2gh_config::{MigrationConfig, Token};
use be2gh_core::IssueState;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, trace};
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use crate::error::{GithubError, Result};
use crate::tracker::{
    IssueNumber, IssueTracker, MilestoneNumber, MilestoneSummary, NewIssue, RepositoryAdmin,
};

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

const ISSUE_IDS_QUERY: &str = r#"
query IssueIds($owner: String!, $name: String!, $first: Int!) {
  repository(owner: $owner, name: $name) {
    issues(states: [OPEN, CLOSED], first: $first) {
      nodes { id }
    }
  }
}"#;

const DELETE_ISSUE_MUTATION: &str = r#"
mutation DeleteIssue($id: ID!) {
  deleteIssue(input: { issueId: $id }) {
    clientMutationId
  }
}"#;

/// Authenticated access to the GitHub REST and GraphQL APIs.
pub struct GithubClient {
    agent: Agent,
    api_base: String,
    graphql_url: String,
    user_agent: String,
    token: Token,
}

impl GithubClient {
    /// Creates a client. The token is used as a bearer credential on every
    /// request.
    pub fn new(config: &MigrationConfig, token: Token) -> Self {
        let agent_config = Agent::config_builder().http_status_as_error(false).build();
        Self {
            agent: Agent::new_with_config(agent_config),
            api_base: config.api_base().to_string(),
            graphql_url: config.graphql_url.clone(),
            user_agent: config.user_agent.clone(),
            token,
        }
    }

    /// Absolute URL for a REST path such as `/repos/o/r/issues`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("Authorization", format!("Bearer {}", self.token.expose()))
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", self.user_agent.as_str())
    }

    /// `GET` a REST resource and decode its JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        trace!(url, "GET");
        let response = self
            .authorize(self.agent.get(url))
            .call()
            .map_err(|e| transport("GET", url, e))?;
        read_json("GET", url, check("GET", url, response)?)
    }

    /// `POST` a JSON body and decode the JSON response.
    pub fn post_json<B: Serialize, T: DeserializeOwned>(&self, url: &str, body: &B) -> Result<T> {
        trace!(url, "POST");
        let response = self
            .authorize(self.agent.post(url))
            .send_json(body)
            .map_err(|e| transport("POST", url, e))?;
        read_json("POST", url, check("POST", url, response)?)
    }

    /// `PATCH` a JSON body; the response body is ignored.
    pub fn patch_json<B: Serialize>(&self, url: &str, body: &B) -> Result<()> {
        trace!(url, "PATCH");
        let response = self
            .authorize(self.agent.patch(url))
            .send_json(body)
            .map_err(|e| transport("PATCH", url, e))?;
        check("PATCH", url, response).map(drop)
    }

    /// `DELETE` a REST resource.
    pub fn delete(&self, url: &str) -> Result<()> {
        trace!(url, "DELETE");
        let response = self
            .authorize(self.agent.delete(url))
            .call()
            .map_err(|e| transport("DELETE", url, e))?;
        check("DELETE", url, response).map(drop)
    }

    /// Runs a GraphQL operation and returns its `data` member.
    ///
    /// GraphQL reports most failures with status 200 and an `errors`
    /// array; those become [`GithubError::GraphQl`].
    pub fn graphql<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let url = self.graphql_url.clone();
        let response: GraphQlResponse<T> =
            self.post_json(&url, &json!({ "query": query, "variables": variables }))?;
        if let Some(errors) = response.errors.filter(|e| !e.is_empty()) {
            return Err(GithubError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        response.data.ok_or_else(|| GithubError::UnexpectedResponse {
            url,
            reason: "GraphQL response has no data".into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

fn transport(method: &'static str, url: &str, source: ureq::Error) -> GithubError {
    GithubError::Transport {
        method,
        url: url.to_string(),
        source: Box::new(source),
    }
}

/// Turns a non-success status into [`GithubError::Http`].
fn check(method: &'static str, url: &str, mut response: Response<Body>) -> Result<Response<Body>> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.body_mut().read_to_string().unwrap_or_default();
    Err(GithubError::Http {
        method,
        url: url.to_string(),
        status: status.as_u16(),
        message: message.trim().to_string(),
    })
}

fn read_json<T: DeserializeOwned>(method: &'static str, url: &str, mut response: Response<Body>) -> Result<T> {
    response
        .body_mut()
        .read_json()
        .map_err(|e| transport(method, url, e))
}

// ---------------------------------------------------------------------------
// GithubRepo
// ---------------------------------------------------------------------------

/// A [`GithubClient`] bound to `owner/name`.
pub struct GithubRepo {
    client: GithubClient,
    owner: String,
    name: String,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
struct Numbered {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct IssueIdsData {
    repository: Option<IssueIdsRepository>,
}

#[derive(Debug, Deserialize)]
struct IssueIdsRepository {
    issues: IssueConnection,
}

#[derive(Debug, Deserialize)]
struct IssueConnection {
    nodes: Vec<IssueNode>,
}

#[derive(Debug, Deserialize)]
struct IssueNode {
    id: String,
}

impl GithubRepo {
    pub fn new(client: GithubClient, owner: impl Into<String>, name: impl Into<String>, page_size: u32) -> Self {
        Self {
            client,
            owner: owner.into(),
            name: name.into(),
            page_size,
        }
    }

    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    fn repo_url(&self, path: &str) -> String {
        self.client
            .url(&format!("/repos/{}/{}{}", self.owner, self.name, path))
    }
}

impl IssueTracker for GithubRepo {
    fn create_milestone(&mut self, title: &str, state: IssueState) -> Result<MilestoneNumber> {
        let url = self.repo_url("/milestones");
        let created: Numbered = self
            .client
            .post_json(&url, &json!({ "title": title, "state": state }))?;
        debug!(title, number = created.number, "created milestone");
        Ok(MilestoneNumber(created.number))
    }

    fn create_issue(&mut self, issue: &NewIssue<'_>) -> Result<IssueNumber> {
        let url = self.repo_url("/issues");
        let created: Numbered = self.client.post_json(&url, issue)?;
        debug!(title = issue.title, number = created.number, "created issue");
        Ok(IssueNumber(created.number))
    }

    fn set_issue_state(&mut self, issue: IssueNumber, state: IssueState) -> Result<()> {
        let url = self.repo_url(&format!("/issues/{}", issue.0));
        self.client.patch_json(&url, &json!({ "state": state }))
    }

    fn create_comment(&mut self, issue: IssueNumber, body: &str) -> Result<()> {
        let url = self.repo_url(&format!("/issues/{}/comments", issue.0));
        let _: Value = self.client.post_json(&url, &json!({ "body": body }))?;
        Ok(())
    }
}

impl RepositoryAdmin for GithubRepo {
    fn list_milestones(&mut self) -> Result<Vec<MilestoneSummary>> {
        let mut all = Vec::new();
        for page in 1.. {
            let url = self.repo_url(&format!(
                "/milestones?state=all&per_page={}&page={page}",
                self.page_size
            ));
            let batch: Vec<MilestoneSummary> = self.client.get_json(&url)?;
            if batch.is_empty() {
                break;
            }
            all.extend(batch);
        }
        Ok(all)
    }

    fn delete_milestone(&mut self, milestone: MilestoneNumber) -> Result<()> {
        let url = self.repo_url(&format!("/milestones/{}", milestone.0));
        self.client.delete(&url)
    }

    fn issue_node_ids(&mut self, first: u32) -> Result<Vec<String>> {
        let data: IssueIdsData = self.client.graphql(
            ISSUE_IDS_QUERY,
            json!({ "owner": self.owner, "name": self.name, "first": first }),
        )?;
        let repository = data
            .repository
            .ok_or_else(|| GithubError::UnexpectedResponse {
                url: self.client.graphql_url.clone(),
                reason: format!("repository {} not found", self.full_name()),
            })?;
        Ok(repository.issues.nodes.into_iter().map(|n| n.id).collect())
    }

    fn delete_issue(&mut self, node_id: &str) -> Result<()> {
        let _: Value = self
            .client
            .graphql(DELETE_ISSUE_MUTATION, json!({ "id": node_id }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    fn repo(api_url: &str) -> GithubRepo {
        let config = MigrationConfig {
            api_url: api_url.into(),
            ..MigrationConfig::default()
        };
        GithubRepo::new(GithubClient::new(&config, Token::new("t")), "octo", "proj", 100)
    }

    /// Answers one request with `status` and a JSON `body`, then returns the
    /// request it received (head and body).
    fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request = String::new();
            let mut content_length = 0;
            let mut chunked = false;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap();
                }
                if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                    chunked = true;
                }
                request.push_str(&line);
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            if chunked {
                loop {
                    let mut size = String::new();
                    reader.read_line(&mut size).unwrap();
                    let size = usize::from_str_radix(size.trim(), 16).unwrap();
                    let mut chunk = vec![0; size + 2];
                    reader.read_exact(&mut chunk).unwrap();
                    if size == 0 {
                        break;
                    }
                    request.push_str(&String::from_utf8_lossy(&chunk[..size]));
                }
            } else {
                let mut body = vec![0; content_length];
                reader.read_exact(&mut body).unwrap();
                request.push_str(&String::from_utf8_lossy(&body));
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            request
        });
        (url, handle)
    }

    #[test]
    fn error_status_becomes_http_error() {
        let (url, server) = serve_once("422 Unprocessable Entity", r#"{"message":"Validation Failed"}"#);
        let mut repo = repo(&url);

        let err = repo.create_milestone("Release 1", IssueState::Open).unwrap_err();
        let request = server.join().unwrap();

        match &err {
            GithubError::Http {
                method,
                status,
                message,
                ..
            } => {
                assert_eq!(*method, "POST");
                assert_eq!(*status, 422);
                assert!(message.contains("Validation Failed"), "message: {message}");
            }
            other => panic!("expected an HTTP error, got {other:?}"),
        }
        assert_eq!(err.status(), Some(422));

        assert!(request.starts_with("POST /repos/octo/proj/milestones "), "request: {request}");
        let lower = request.to_ascii_lowercase();
        assert!(lower.contains("authorization: bearer t\r\n"), "request: {request}");
        assert!(request.contains(r#""title":"Release 1""#), "request: {request}");
    }

    #[test]
    fn graphql_errors_become_graphql_error() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"data": null, "errors": [{"message": "Could not resolve to a Repository"}]}"#,
        );
        let config = MigrationConfig {
            graphql_url: format!("{url}/graphql"),
            ..MigrationConfig::default()
        };
        let mut repo = GithubRepo::new(GithubClient::new(&config, Token::new("t")), "octo", "proj", 100);

        let err = repo.issue_node_ids(100).unwrap_err();
        let request = server.join().unwrap();

        match err {
            GithubError::GraphQl(messages) => {
                assert_eq!(messages, vec!["Could not resolve to a Repository"]);
            }
            other => panic!("expected a GraphQL error, got {other:?}"),
        }
        assert!(request.starts_with("POST /graphql "), "request: {request}");
        assert!(request.contains("IssueIds"), "request: {request}");
    }

    #[test]
    fn repo_urls() {
        let repo = repo("https://api.github.com/");
        assert_eq!(repo.full_name(), "octo/proj");
        assert_eq!(
            repo.repo_url("/issues/3/comments"),
            "https://api.github.com/repos/octo/proj/issues/3/comments"
        );
    }

    #[test]
    fn enterprise_base_url() {
        let repo = repo("https://ghe.example.com/api/v3");
        assert_eq!(
            repo.repo_url("/milestones"),
            "https://ghe.example.com/api/v3/repos/octo/proj/milestones"
        );
    }

    #[test]
    fn graphql_response_decoding() {
        let ok: GraphQlResponse<IssueIdsData> = serde_json::from_str(
            r#"{"data": {"repository": {"issues": {"nodes": [{"id": "I_1"}, {"id": "I_2"}]}}}}"#,
        )
        .unwrap();
        let ids: Vec<String> = ok.data.unwrap().repository.unwrap().issues.nodes.into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["I_1", "I_2"]);

        let failed: GraphQlResponse<Value> =
            serde_json::from_str(r#"{"data": null, "errors": [{"message": "Bad credentials"}]}"#).unwrap();
        assert!(failed.data.is_none());
        assert_eq!(failed.errors.unwrap()[0].message, "Bad credentials");
    }

    #[test]
    fn new_issue_payload() {
        let labels = vec!["wontfix".to_string()];
        let issue = NewIssue {
            title: "Crash",
            body: "It crashes.",
            labels: &labels,
            milestone: Some(MilestoneNumber(3)),
        };
        assert_eq!(
            serde_json::to_value(&issue).unwrap(),
            json!({ "title": "Crash", "body": "It crashes.", "labels": ["wontfix"], "milestone": 3 })
        );

        let bare = NewIssue {
            title: "Crash",
            body: "",
            labels: &[],
            milestone: None,
        };
        assert_eq!(
            serde_json::to_value(&bare).unwrap(),
            json!({ "title": "Crash", "body": "" })
        );
    }

    #[test]
    fn milestone_listing_decodes() {
        let list: Vec<MilestoneSummary> = serde_json::from_str(
            r#"[{"number": 1, "title": "Release 1", "state": "closed", "open_issues": 0}]"#,
        )
        .unwrap();
        assert_eq!(list[0].number, MilestoneNumber(1));
        assert_eq!(list[0].state, IssueState::Closed);
    }
}
