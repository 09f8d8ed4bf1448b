//! Attaches the stored access token to outgoing requests.

use tracing::{trace, warn};

use learnverse_store::CredentialStore;

use crate::request::ApiRequest;

/// Adds `Authorization: Bearer <token>` to every request that has not opted
/// out, using the store's current access token.
///
/// The token read is a non-blocking snapshot of the last value the store
/// published, so this can run inside any async context.
#[derive(Debug, Clone)]
pub struct Authorizer {
    store: CredentialStore,
}

impl Authorizer {
    pub fn new(store: CredentialStore) -> Self {
        Self { store }
    }

    /// Authorize `request` in place.
    ///
    /// Skip-marked requests are left untouched apart from removing the
    /// marker header. Without a usable token the request goes out
    /// unauthenticated and the server decides.
    pub fn authorize(&self, request: &mut ApiRequest) {
        if request.take_skip_marker() {
            trace!(url = %request.url(), "Authorization skipped by request");
            return;
        }

        match self.store.access_token() {
            Some(token) if !token.is_blank() => {
                if let Err(e) = request.set_bearer(&token) {
                    warn!(error = %e, "Stored access token is not a valid header value");
                }
            }
            _ => trace!(url = %request.url(), "No access token, sending unauthenticated"),
        }
    }
}
