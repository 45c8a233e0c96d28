//! Basic credential authorizer
//!
//! Decides Allow or Deny for an `Authorization: Basic <base64(user:pass)>` token against a
//! single configured credential pair, and renders the decision as an execute-api policy.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

/// Principal reported when the token cannot be read at all.
pub const ANONYMOUS_PRINCIPAL: &str = "unauthorized";

const POLICY_VERSION: &str = "2012-10-17";
const INVOKE_ACTION: &str = "execute-api:Invoke";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// Token authorizer request as sent by the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizerEvent {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(rename = "authorizationToken", default)]
    pub authorization_token: Option<String>,
    #[serde(rename = "methodArn", default)]
    pub method_arn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorizerResponse {
    #[serde(rename = "principalId")]
    pub principal_id: String,
    #[serde(rename = "policyDocument")]
    pub policy_document: PolicyDocument,
}

impl AuthorizerResponse {
    pub fn effect(&self) -> Effect {
        self.policy_document
            .statement
            .first()
            .map(|s| s.effect)
            .unwrap_or(Effect::Deny)
    }
}

/// Outcome of checking one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub principal: String,
    pub effect: Effect,
}

impl Decision {
    fn deny_anonymous() -> Self {
        Decision {
            principal: ANONYMOUS_PRINCIPAL.to_string(),
            effect: Effect::Deny,
        }
    }
}

#[derive(Clone)]
pub struct BasicAuthorizer {
    credentials: Option<(String, String)>,
}

impl BasicAuthorizer {
    /// With no configured credentials every token is denied.
    pub fn new(username: Option<&str>, password: Option<&str>) -> Self {
        let credentials = match (username, password) {
            (Some(u), Some(p)) => Some((u.to_string(), p.to_string())),
            _ => None,
        };
        Self { credentials }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn decide(&self, token: Option<&str>) -> Decision {
        let Some((username, password)) = token.and_then(decode_basic_token) else {
            return Decision::deny_anonymous();
        };

        let allowed = match &self.credentials {
            Some((expected_user, expected_password)) => {
                // Evaluate both so the timing does not reveal which one matched.
                let user_ok = secure_compare(&username, expected_user);
                let password_ok = secure_compare(&password, expected_password);
                user_ok & password_ok
            }
            None => false,
        };

        Decision {
            principal: username,
            effect: if allowed { Effect::Allow } else { Effect::Deny },
        }
    }

    pub fn authorize(&self, event: &AuthorizerEvent) -> AuthorizerResponse {
        let decision = self.decide(event.authorization_token.as_deref());
        tracing::info!(
            principal = %decision.principal,
            effect = ?decision.effect,
            method_arn = %event.method_arn,
            "Authorization decided"
        );
        policy(decision, &event.method_arn)
    }
}

pub fn policy(decision: Decision, resource: &str) -> AuthorizerResponse {
    AuthorizerResponse {
        principal_id: decision.principal,
        policy_document: PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![PolicyStatement {
                action: INVOKE_ACTION.to_string(),
                effect: decision.effect,
                resource: resource.to_string(),
            }],
        },
    }
}

/// Split `Basic <base64(user:pass)>` into its username and password.
fn decode_basic_token(token: &str) -> Option<(String, String)> {
    let encoded = token.strip_prefix("Basic ")?.trim();
    if encoded.is_empty() {
        return None;
    }
    let decoded = STANDARD.decode(encoded).ok()?;
    let plain = String::from_utf8(decoded).ok()?;
    let (username, password) = plain.split_once(':')?;
    if username.is_empty() || password.contains(':') {
        return None;
    }
    Some((username.to_string(), password.to_string()))
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(plain: &str) -> String {
        format!("Basic {}", STANDARD.encode(plain))
    }

    fn authorizer() -> BasicAuthorizer {
        BasicAuthorizer::new(Some("admin"), Some("s3cret"))
    }

    #[test]
    fn test_matching_credentials_allow() {
        let decision = authorizer().decide(Some(&token("admin:s3cret")));
        assert_eq!(decision.effect, Effect::Allow);
        assert_eq!(decision.principal, "admin");
    }

    #[test]
    fn test_wrong_password_denies_with_supplied_principal() {
        let decision = authorizer().decide(Some(&token("admin:nope")));
        assert_eq!(decision.effect, Effect::Deny);
        assert_eq!(decision.principal, "admin");
    }

    #[test]
    fn test_unreadable_tokens_deny_anonymously() {
        let a = authorizer();
        for bad in [
            None,
            Some("Bearer abc".to_string()),
            Some("Basic".to_string()),
            Some("Basic !!!".to_string()),
            Some(token("no-colon")),
            Some(token(":only-password")),
        ] {
            let decision = a.decide(bad.as_deref());
            assert_eq!(decision.effect, Effect::Deny, "{bad:?}");
            assert_eq!(decision.principal, ANONYMOUS_PRINCIPAL, "{bad:?}");
        }
    }

    #[test]
    fn test_extra_colon_is_not_a_credential_pair() {
        let decision = authorizer().decide(Some(&token("admin:s3:cret")));
        assert_eq!(decision.effect, Effect::Deny);
        assert_eq!(decision.principal, ANONYMOUS_PRINCIPAL);
    }

    #[test]
    fn test_unconfigured_authorizer_denies_everything() {
        let a = BasicAuthorizer::new(None, None);
        assert!(!a.is_configured());
        assert_eq!(a.decide(Some(&token("admin:s3cret"))).effect, Effect::Deny);
    }

    #[test]
    fn test_policy_document_shape() {
        let response = authorizer().authorize(&AuthorizerEvent {
            event_type: Some("TOKEN".to_string()),
            authorization_token: Some(token("admin:s3cret")),
            method_arn: "arn:aws:execute-api:eu-west-1:123:api/dev/GET/import".to_string(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["principalId"], "admin");
        assert_eq!(json["policyDocument"]["Version"], "2012-10-17");
        assert_eq!(
            json["policyDocument"]["Statement"][0]["Action"],
            "execute-api:Invoke"
        );
        assert_eq!(json["policyDocument"]["Statement"][0]["Effect"], "Allow");
        assert_eq!(
            json["policyDocument"]["Statement"][0]["Resource"],
            "arn:aws:execute-api:eu-west-1:123:api/dev/GET/import"
        );
    }
}
