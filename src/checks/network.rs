use url::Url;

use crate::action::NetworkRequest;
use crate::eval::{RiskVerdict, Severity};
use crate::rules::RuleSet;

/// Classify an outbound network request.
pub fn check(rules: &RuleSet, req: &NetworkRequest) -> RiskVerdict {
    if req.payload.is_none() {
        return RiskVerdict::safe();
    }
    if is_post(req) {
        return RiskVerdict::dangerous(Severity::Warning, "network POST request with data payload");
    }
    if !is_allowed_host(&rules.network_allowed_hosts, &req.url) {
        return RiskVerdict::dangerous(Severity::Warning, "sending data to external domain");
    }
    RiskVerdict::safe()
}

fn is_post(req: &NetworkRequest) -> bool {
    req.method.eq_ignore_ascii_case("POST") || req.options.to_ascii_uppercase().contains("POST")
}

/// True when the URL's host is an allowed host or one of its subdomains.
///
/// An unparseable URL has no host and is never allowed.
fn is_allowed_host(allowed: &[String], url: &str) -> bool {
    let Some(host) = Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    else {
        return false;
    };
    allowed.iter().any(|a| {
        let a = a.to_ascii_lowercase();
        host == a || host.ends_with(&format!(".{a}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(url: &str, method: &str, payload: Option<&str>, options: &str) -> NetworkRequest {
        NetworkRequest {
            url: url.into(),
            method: method.into(),
            payload: payload.map(String::from),
            options: options.into(),
        }
    }

    fn eval(r: &NetworkRequest) -> RiskVerdict {
        check(&RuleSet::builtin(), r)
    }

    #[test]
    fn post_with_payload() {
        let v = eval(&req("https://github.com/api", "POST", Some("{}"), ""));
        assert_eq!(v.reason, "network POST request with data payload");
        assert_eq!(v.severity, Severity::Warning);
    }

    #[test]
    fn post_in_options() {
        let v = eval(&req("https://api.example.com", "", Some("x=1"), r#"{"method":"post"}"#));
        assert_eq!(v.reason, "network POST request with data payload");
    }

    #[test]
    fn payload_to_external_domain() {
        let v = eval(&req("https://evil.example/upload", "PUT", Some("data"), ""));
        assert_eq!(v.reason, "sending data to external domain");
    }

    #[test]
    fn payload_to_allowed_domain() {
        assert!(!eval(&req("https://pypi.org/legacy/", "PUT", Some("pkg"), "")).dangerous);
        assert!(!eval(&req("https://api.github.com/x", "PATCH", Some("b"), "")).dangerous);
    }

    #[test]
    fn lookalike_domain_not_allowed() {
        assert!(eval(&req("https://notgithub.com/x", "PUT", Some("b"), "")).dangerous);
    }

    #[test]
    fn unparseable_url_with_payload_is_external() {
        assert!(eval(&req("not a url", "", Some("b"), "")).dangerous);
    }

    #[test]
    fn no_payload_is_safe() {
        assert!(!eval(&req("https://evil.example", "POST", None, "")).dangerous);
        assert!(!eval(&req("https://evil.example", "GET", None, "")).dangerous);
    }
}
