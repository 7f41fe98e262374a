// Account authentication
//
// Email/password sign-in stores a session cookie in the client's jar;
// bearer-token clients skip this step entirely.

use secrecy::{ExposeSecret, SecretString};
use serde::de::IgnoredAny;
use serde_json::json;
use tracing::debug;

use crate::client::{Service, WirelessTagClient};
use crate::error::Error;

impl WirelessTagClient {
    /// Sign in with the account's email and password.
    ///
    /// `POST ethAccount.asmx/SignIn`. A fault from the service is reported
    /// as [`Error::Authentication`].
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> Result<(), Error> {
        debug!(email, "signing in");

        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });

        match self
            .call::<IgnoredAny>(Service::Account, "SignIn", &body)
            .await
        {
            Ok(_) => {
                debug!("sign-in successful");
                Ok(())
            }
            Err(Error::Api { message, .. }) => Err(Error::Authentication { message }),
            Err(e) => Err(e),
        }
    }

    /// Ask the service whether the current session is still valid.
    ///
    /// `POST ethAccount.asmx/IsSignedIn`
    pub async fn is_signed_in(&self) -> Result<bool, Error> {
        self.call(Service::Account, "IsSignedIn", &json!({})).await
    }
}
