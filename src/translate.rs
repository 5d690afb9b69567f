//! The event translation engine.
//!
//! Each recognized GitHub event type maps to one formatting rule. A rule
//! pulls its required fields out of the raw payload, formats a one-line
//! message plus a link, and either yields them or asks for the whole event
//! to be suppressed. Event types outside the table get a generic
//! "Unhandled event" notification rather than an error, so unexpected
//! platform additions stay visible.

use serde_json::Value;

use crate::notification::Notification;
use crate::payload::{self, FieldError};
use crate::utils::{short_ref, truncate};

const TITLE_MAX: usize = 20;
const BODY_MAX: usize = 40;

/// Successful translation outcome: a notification to deliver, or a
/// deliberate decision to stay silent.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Notify(Notification),
    Suppressed,
}

/// Translation failure: a field the rule needs is absent or mistyped.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TranslateError {
    #[error("missing field for '{event}' event: {source}")]
    MissingField {
        event: String,
        #[source]
        source: FieldError,
    },
}

impl TranslateError {
    fn missing(event: &str, source: FieldError) -> Self {
        Self::MissingField {
            event: event.to_string(),
            source,
        }
    }
}

/// Fields every rule gets for free, resolved before dispatch.
struct RuleCtx<'a> {
    repo: &'a str,
    login: &'a str,
}

/// What a single rule produces.
enum Formatted {
    Message { message: String, url: String },
    Suppress,
}

type Rule = fn(&Value, &RuleCtx<'_>) -> Result<Formatted, FieldError>;

/// Dispatch table: event-type label → formatting rule.
const RULES: &[(&str, Rule)] = &[
    ("create", create),
    ("delete", delete),
    ("watch", watch),
    ("fork", fork),
    ("push", push),
    ("pull_request", pull_request),
    ("issue_comment", issue_comment),
    ("pull_request_review", pull_request_review),
    ("pull_request_review_comment", pull_request_review_comment),
    ("issues", issues),
    ("ping", ping),
];

fn rule_for(event: &str) -> Option<Rule> {
    RULES
        .iter()
        .find(|(name, _)| *name == event)
        .map(|(_, rule)| *rule)
}

/// Translates one webhook delivery into a notification.
///
/// Pure function of its inputs; safe to call once per delivery from
/// concurrent workers. The returned notification carries a zero level --
/// assigning the configured level is the caller's job.
pub fn translate(event: &str, payload: &Value) -> Result<Outcome, TranslateError> {
    // Every rule needs these two; resolve them up front so a broken payload
    // fails the same way regardless of event type.
    let repo = payload::string_at(payload, &["repository", "full_name"])
        .map_err(|e| TranslateError::missing(event, e))?;
    let login = payload::string_at(payload, &["sender", "login"])
        .map_err(|e| TranslateError::missing(event, e))?;
    let ctx = RuleCtx { repo, login };

    let formatted = match rule_for(event) {
        Some(rule) => rule(payload, &ctx).map_err(|e| TranslateError::missing(event, e))?,
        None => Formatted::Message {
            message: format!("Unhandled event {} for {} by {}.", event, repo, login),
            url: String::new(),
        },
    };

    match formatted {
        Formatted::Message { message, url } => Ok(Outcome::Notify(Notification::new(message, url))),
        Formatted::Suppress => Ok(Outcome::Suppressed),
    }
}

fn create(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let ref_type = payload::string_at(payload, &["ref_type"])?;
    let git_ref = payload::string_at(payload, &["ref"])?;
    let base_url = payload::string_at(payload, &["repository", "html_url"])?;
    Ok(Formatted::Message {
        message: format!(
            "New {} ({}) for {} by {}.",
            ref_type, git_ref, ctx.repo, ctx.login
        ),
        url: format!("{}/tree/{}", base_url, git_ref),
    })
}

fn delete(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let ref_type = payload::string_at(payload, &["ref_type"])?;
    let git_ref = short_ref(payload::string_at(payload, &["ref"])?);
    let base_url = payload::string_at(payload, &["repository", "html_url"])?;
    Ok(Formatted::Message {
        message: format!(
            "Delete {} ({}) for {} by {}.",
            ref_type, git_ref, ctx.repo, ctx.login
        ),
        url: format!("{}/tree/{}", base_url, git_ref),
    })
}

fn watch(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    Ok(Formatted::Message {
        message: format!("New star for {} by {}.", ctx.repo, ctx.login),
        url: payload::string_at(payload, &["sender", "html_url"])?.to_string(),
    })
}

fn fork(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    Ok(Formatted::Message {
        message: format!("New fork for {} by {}.", ctx.repo, ctx.login),
        url: payload::string_at(payload, &["forkee", "html_url"])?.to_string(),
    })
}

fn push(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let commits = payload::len_at(payload, &["commits"])?;
    let git_ref = short_ref(payload::string_at(payload, &["ref"])?);
    let compare = payload::string_at(payload, &["compare"])?;

    // A push with no commits accompanies a branch create event; that event
    // already notifies, so this one stays silent.
    if commits == 0 {
        return Ok(Formatted::Suppress);
    }

    Ok(Formatted::Message {
        message: format!(
            "Push {} commit(s) to {} in {} by {}.",
            commits, git_ref, ctx.repo, ctx.login
        ),
        url: compare.to_string(),
    })
}

fn pull_request(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let action = payload::string_at(payload, &["action"])?;
    let number = payload::number_at(payload, &["pull_request", "number"])? as i64;
    let title = payload::string_at(payload, &["pull_request", "title"])?;
    let body = payload::string_at(payload, &["pull_request", "body"])?;
    Ok(Formatted::Message {
        message: format!(
            "Pull request {} #{} ({}) on {} by {}: {}",
            action,
            number,
            truncate(title, TITLE_MAX),
            ctx.repo,
            ctx.login,
            truncate(body, BODY_MAX)
        ),
        url: payload::string_at(payload, &["pull_request", "html_url"])?.to_string(),
    })
}

fn issue_comment(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let action = payload::string_at(payload, &["action"])?;
    let number = payload::number_at(payload, &["issue", "number"])? as i64;
    let title = payload::string_at(payload, &["issue", "title"])?;
    let body = payload::string_at(payload, &["comment", "body"])?;
    Ok(Formatted::Message {
        message: format!(
            "Comment {} on issue {} ({}) on {} by {}: {}",
            action,
            number,
            truncate(title, TITLE_MAX),
            ctx.repo,
            ctx.login,
            truncate(body, BODY_MAX)
        ),
        url: payload::string_at(payload, &["comment", "html_url"])?.to_string(),
    })
}

fn pull_request_review(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let action = payload::string_at(payload, &["action"])?;
    let state = payload::string_at(payload, &["review", "state"])?;
    let number = payload::number_at(payload, &["pull_request", "number"])? as i64;
    let title = payload::string_at(payload, &["pull_request", "title"])?;
    let body = payload::string_at(payload, &["review", "body"])?;
    Ok(Formatted::Message {
        message: format!(
            "PR Review {} ({}) on issue {} ({}) on {} by {}: {}",
            action,
            state,
            number,
            truncate(title, TITLE_MAX),
            ctx.repo,
            ctx.login,
            truncate(body, BODY_MAX)
        ),
        url: payload::string_at(payload, &["review", "html_url"])?.to_string(),
    })
}

fn pull_request_review_comment(
    payload: &Value,
    ctx: &RuleCtx<'_>,
) -> Result<Formatted, FieldError> {
    let action = payload::string_at(payload, &["action"])?;
    let number = payload::number_at(payload, &["pull_request", "number"])? as i64;
    let title = payload::string_at(payload, &["pull_request", "title"])?;
    let body = payload::string_at(payload, &["comment", "body"])?;
    Ok(Formatted::Message {
        message: format!(
            "PR Comment {} on issue {} ({}) on {} by {}: {}",
            action,
            number,
            truncate(title, TITLE_MAX),
            ctx.repo,
            ctx.login,
            truncate(body, BODY_MAX)
        ),
        url: payload::string_at(payload, &["comment", "html_url"])?.to_string(),
    })
}

fn issues(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let action = payload::string_at(payload, &["action"])?;
    let number = payload::number_at(payload, &["issue", "number"])? as i64;
    let title = payload::string_at(payload, &["issue", "title"])?;
    Ok(Formatted::Message {
        message: format!(
            "Issue {} ({}) {} on {} by {}.",
            number,
            truncate(title, TITLE_MAX),
            action,
            ctx.repo,
            ctx.login
        ),
        url: payload::string_at(payload, &["issue", "html_url"])?.to_string(),
    })
}

fn ping(payload: &Value, ctx: &RuleCtx<'_>) -> Result<Formatted, FieldError> {
    let zen = payload::string_at(payload, &["zen"])?;
    Ok(Formatted::Message {
        message: format!("Ping for {} by {}. Zen: {}", ctx.repo, ctx.login, zen),
        url: payload::string_at(payload, &["repository", "html_url"])?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Base payload carrying the fields every rule requires.
    fn base() -> Value {
        json!({
            "repository": {
                "full_name": "acme/repo",
                "html_url": "https://example.com/acme/repo",
            },
            "sender": {
                "login": "alice",
                "html_url": "https://example.com/alice",
            },
        })
    }

    fn merged(extra: Value) -> Value {
        let mut payload = base();
        merge(&mut payload, extra);
        payload
    }

    fn merge(into: &mut Value, from: Value) {
        match (into, from) {
            (Value::Object(into), Value::Object(from)) => {
                for (key, value) in from {
                    match into.entry(key) {
                        serde_json::map::Entry::Occupied(mut slot) => {
                            merge(slot.get_mut(), value)
                        }
                        serde_json::map::Entry::Vacant(slot) => {
                            slot.insert(value);
                        }
                    }
                }
            }
            (into, from) => *into = from,
        }
    }

    fn expect_notification(event: &str, payload: &Value) -> Notification {
        match translate(event, payload).unwrap() {
            Outcome::Notify(n) => n,
            Outcome::Suppressed => panic!("{} event was unexpectedly suppressed", event),
        }
    }

    #[test]
    fn create_event() {
        let payload = merged(json!({"ref_type": "branch", "ref": "feature-x"}));
        let n = expect_notification("create", &payload);
        assert_eq!(n.message, "New branch (feature-x) for acme/repo by alice.");
        assert_eq!(n.url, "https://example.com/acme/repo/tree/feature-x");
    }

    #[test]
    fn delete_event_strips_ref_prefix() {
        let payload = merged(json!({"ref_type": "branch", "ref": "refs/heads/feature-x"}));
        let n = expect_notification("delete", &payload);
        assert_eq!(
            n.message,
            "Delete branch (feature-x) for acme/repo by alice."
        );
        assert_eq!(n.url, "https://example.com/acme/repo/tree/feature-x");
    }

    #[test]
    fn watch_event() {
        let n = expect_notification("watch", &base());
        assert_eq!(n.message, "New star for acme/repo by alice.");
        assert_eq!(n.url, "https://example.com/alice");
    }

    #[test]
    fn fork_event() {
        let payload = merged(json!({"forkee": {"html_url": "https://example.com/alice/repo"}}));
        let n = expect_notification("fork", &payload);
        assert_eq!(n.message, "New fork for acme/repo by alice.");
        assert_eq!(n.url, "https://example.com/alice/repo");
    }

    #[test]
    fn push_event_counts_commits() {
        let payload = merged(json!({
            "ref": "refs/heads/main",
            "commits": [{}, {}, {}],
            "compare": "https://example.com/acme/repo/compare/abc...def",
        }));
        let n = expect_notification("push", &payload);
        assert_eq!(n.message, "Push 3 commit(s) to main in acme/repo by alice.");
        assert_eq!(n.url, "https://example.com/acme/repo/compare/abc...def");
    }

    #[test]
    fn push_with_zero_commits_is_suppressed() {
        let payload = merged(json!({
            "ref": "refs/heads/new-branch",
            "commits": [],
            "compare": "https://example.com/acme/repo/compare/abc...def",
        }));
        assert_eq!(translate("push", &payload).unwrap(), Outcome::Suppressed);
    }

    #[test]
    fn pull_request_event_truncates_title_and_body() {
        let payload = merged(json!({
            "action": "opened",
            "pull_request": {
                "number": 42,
                "title": "a title that runs well past twenty characters",
                "body": "a body that keeps going long enough to clear the forty character bound",
                "html_url": "https://example.com/acme/repo/pull/42",
            },
        }));
        let n = expect_notification("pull_request", &payload);
        assert_eq!(
            n.message,
            "Pull request opened #42 (a title that runs we...) on acme/repo by alice: \
             a body that keeps going long enough to c..."
        );
        assert_eq!(n.url, "https://example.com/acme/repo/pull/42");
    }

    #[test]
    fn issue_comment_event() {
        let payload = merged(json!({
            "action": "created",
            "issue": {"number": 7, "title": "Short title"},
            "comment": {
                "body": "Looks good.",
                "html_url": "https://example.com/acme/repo/issues/7#comment-1",
            },
        }));
        let n = expect_notification("issue_comment", &payload);
        assert_eq!(
            n.message,
            "Comment created on issue 7 (Short title) on acme/repo by alice: Looks good."
        );
        assert_eq!(n.url, "https://example.com/acme/repo/issues/7#comment-1");
    }

    #[test]
    fn pull_request_review_event() {
        let payload = merged(json!({
            "action": "submitted",
            "review": {
                "state": "approved",
                "body": "Ship it.",
                "html_url": "https://example.com/acme/repo/pull/42#review-9",
            },
            "pull_request": {"number": 42, "title": "Fix the bug"},
        }));
        let n = expect_notification("pull_request_review", &payload);
        assert_eq!(
            n.message,
            "PR Review submitted (approved) on issue 42 (Fix the bug) on acme/repo by alice: Ship it."
        );
        assert_eq!(n.url, "https://example.com/acme/repo/pull/42#review-9");
    }

    #[test]
    fn pull_request_review_comment_event() {
        let payload = merged(json!({
            "action": "created",
            "pull_request": {"number": 42, "title": "Fix the bug"},
            "comment": {
                "body": "Typo here.",
                "html_url": "https://example.com/acme/repo/pull/42#discussion-3",
            },
        }));
        let n = expect_notification("pull_request_review_comment", &payload);
        assert_eq!(
            n.message,
            "PR Comment created on issue 42 (Fix the bug) on acme/repo by alice: Typo here."
        );
        assert_eq!(n.url, "https://example.com/acme/repo/pull/42#discussion-3");
    }

    #[test]
    fn issues_event() {
        let payload = merged(json!({
            "action": "opened",
            "issue": {
                "number": 7,
                "title": "Crash on startup",
                "html_url": "https://example.com/acme/repo/issues/7",
            },
        }));
        let n = expect_notification("issues", &payload);
        assert_eq!(
            n.message,
            "Issue 7 (Crash on startup) opened on acme/repo by alice."
        );
        assert_eq!(n.url, "https://example.com/acme/repo/issues/7");
    }

    #[test]
    fn ping_event() {
        let payload = merged(json!({"zen": "Done is better than perfect."}));
        let n = expect_notification("ping", &payload);
        assert_eq!(
            n.message,
            "Ping for acme/repo by alice. Zen: Done is better than perfect."
        );
        assert_eq!(n.url, "https://example.com/acme/repo");
    }

    #[test]
    fn unrecognized_event_gets_the_default_rule() {
        let n = expect_notification("star_gazed", &base());
        assert_eq!(n.message, "Unhandled event star_gazed for acme/repo by alice.");
        assert_eq!(n.url, "");
    }

    #[test]
    fn notifications_carry_zero_level() {
        let n = expect_notification("watch", &base());
        assert_eq!(n.level, 0.0);
    }

    #[test]
    fn missing_repo_name_fails_before_any_rule() {
        let payload = json!({"sender": {"login": "alice"}, "zen": "hi"});
        for event in ["push", "ping", "watch", "star_gazed"] {
            let err = translate(event, &payload).unwrap_err();
            assert_eq!(
                err,
                TranslateError::MissingField {
                    event: event.to_string(),
                    source: crate::payload::FieldError::PathNotFound {
                        path: "repository.full_name".to_string()
                    },
                }
            );
        }
    }

    #[test]
    fn missing_rule_field_names_event_and_path() {
        // ping payload without its zen field
        let err = translate("ping", &base()).unwrap_err();
        assert_eq!(
            err,
            TranslateError::MissingField {
                event: "ping".to_string(),
                source: crate::payload::FieldError::PathNotFound {
                    path: "zen".to_string()
                },
            }
        );
    }

    #[test]
    fn mistyped_commits_field_is_an_error_not_a_suppression() {
        let payload = merged(json!({
            "ref": "refs/heads/main",
            "commits": 3,
            "compare": "https://example.com/cmp",
        }));
        assert!(translate("push", &payload).is_err());
    }
}
