// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::{constants::*, Credential, Identity};
use async_trait::async_trait;
use authsign_core::{Env, OsEnv, ProvideIdentity, Result};
use log::debug;

/// EnvIdentityProvider loads AWS credentials from environment variables.
///
/// This provider looks for the following environment variables:
/// - `AWS_ACCESS_KEY_ID`: The AWS access key ID
/// - `AWS_SECRET_ACCESS_KEY`: The AWS secret access key
/// - `AWS_SESSION_TOKEN`: The AWS session token (optional)
///
/// Requests are signed anonymously if either key is missing.
#[derive(Debug, Clone)]
pub struct EnvIdentityProvider<E: Env = OsEnv> {
    env: E,
}

impl EnvIdentityProvider {
    /// Create a new EnvIdentityProvider reading the process environment.
    pub fn new() -> Self {
        Self { env: OsEnv }
    }
}

impl Default for EnvIdentityProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Env> EnvIdentityProvider<E> {
    /// Read variables from the given env instead.
    pub fn with_env<T: Env>(self, env: T) -> EnvIdentityProvider<T> {
        EnvIdentityProvider { env }
    }
}

#[async_trait]
impl<E: Env + Unpin> ProvideIdentity for EnvIdentityProvider<E> {
    type Identity = Identity;

    async fn provide_identity(&self) -> Result<Self::Identity> {
        let access_key_id = self.env.var(AWS_ACCESS_KEY_ID).filter(|v| !v.is_empty());
        let secret_access_key = self.env.var(AWS_SECRET_ACCESS_KEY).filter(|v| !v.is_empty());

        match (access_key_id, secret_access_key) {
            (Some(ak), Some(sk)) => {
                let mut cred = Credential::new(&ak, &sk);
                cred.session_token = self.env.var(AWS_SESSION_TOKEN).filter(|v| !v.is_empty());
                Ok(Identity::Keyed(cred))
            }
            _ => {
                debug!("aws access keys not found in env, use anonymous identity");
                Ok(Identity::Anonymous)
            }
        }
    }
}
