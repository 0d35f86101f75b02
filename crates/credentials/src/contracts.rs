//! Request catalog of the credential service.

use protocol::Request;
use serde::{Deserialize, Serialize};
use sqlkit::Credential;

/// Read the credential stored for a service.
pub enum ReadCredentialRequest {}

/// Parameters of [`ReadCredentialRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadCredentialParams {
    /// Service identifier the credential belongs to.
    pub credential_id: String,
}

impl Request for ReadCredentialRequest {
    const METHOD: &'static str = "credential/read";
    type Params = ReadCredentialParams;
    type Result = Credential;
}

/// Store a credential for a service.
pub enum SaveCredentialRequest {}

/// Parameters of [`SaveCredentialRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveCredentialParams {
    /// Service identifier the credential belongs to.
    pub credential_id: String,
    /// The secret to store.
    pub password: String,
}

impl Request for SaveCredentialRequest {
    const METHOD: &'static str = "credential/save";
    type Params = SaveCredentialParams;
    type Result = bool;
}

/// Delete the credential stored for a service.
pub enum DeleteCredentialRequest {}

/// Parameters of [`DeleteCredentialRequest`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCredentialParams {
    /// Service identifier the credential belongs to.
    pub credential_id: String,
}

impl Request for DeleteCredentialRequest {
    const METHOD: &'static str = "credential/delete";
    type Params = DeleteCredentialParams;
    type Result = bool;
}
