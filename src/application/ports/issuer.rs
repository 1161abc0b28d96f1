use url::Url;

/// Names the trusted identity source that issued entities for a request.
///
/// The returned label is opaque to the claims provider; it is embedded in the
/// original issuer of every resolved entity. An empty string means no issuer
/// could be determined.
pub trait IssuerNameProvider: Send + Sync {
    fn issuer_name(&self, context: Option<&Url>) -> String;
}
