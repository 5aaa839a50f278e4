//! Unit tests for pull request references and tokens.

use rstest::rstest;

use super::{GitHubError, PersonalAccessToken, PullRequestRef};

#[rstest]
#[case::public_api("https://api.github.com/repos/octo/widgets", "octo", "widgets")]
#[case::enterprise_api("https://ghe.example.com/api/v3/repos/acme/tools", "acme", "tools")]
#[case::trailing_slash("https://api.github.com/repos/octo/widgets/", "octo", "widgets")]
fn parses_owner_and_repository_from_repository_url(
    #[case] url: &str,
    #[case] owner: &str,
    #[case] repository: &str,
) {
    let reference =
        PullRequestRef::from_repository_url(url, 5).expect("repository URL should parse");
    assert_eq!(reference.owner().as_str(), owner, "owner mismatch");
    assert_eq!(reference.repository().as_str(), repository, "repository mismatch");
    assert_eq!(reference.number().get(), 5, "number mismatch");
}

#[rstest]
fn rejects_repository_url_with_one_segment() {
    let result = PullRequestRef::from_repository_url("https://api.github.com/widgets", 5);
    assert!(
        matches!(result, Err(GitHubError::MissingPathSegments)),
        "expected MissingPathSegments, got {result:?}"
    );
}

#[rstest]
fn rejects_unparseable_repository_url() {
    let result = PullRequestRef::from_repository_url("repos/octo/widgets", 5);
    assert!(
        matches!(result, Err(GitHubError::InvalidUrl(_))),
        "expected InvalidUrl, got {result:?}"
    );
}

#[rstest]
fn rejects_zero_number() {
    let result = PullRequestRef::new("octo", "widgets", 0);
    assert!(
        matches!(result, Err(GitHubError::InvalidPullRequestNumber)),
        "expected InvalidPullRequestNumber, got {result:?}"
    );
}

#[rstest]
fn displays_as_owner_repo_number() {
    let reference = PullRequestRef::new("octo", "widgets", 12).expect("reference should be valid");
    assert_eq!(reference.to_string(), "octo/widgets#12");
}

#[rstest]
fn fingerprint_matches_triple() {
    let reference = PullRequestRef::new("octo", "repo", 1).expect("reference should be valid");
    assert_eq!(reference.fingerprint().to_string(), "1308949531");
}

#[rstest]
fn rejects_empty_token() {
    let result = PersonalAccessToken::new("   ");
    assert!(
        matches!(result, Err(GitHubError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
fn token_debug_output_is_redacted() {
    let token = PersonalAccessToken::new("ghp_secret").expect("token should be valid");
    assert!(!format!("{token:?}").contains("ghp_secret"));
}
