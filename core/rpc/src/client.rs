use distributor_types::{LogId, WitnessId};
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("invalid distributor url {0:?}")]
    InvalidUrl(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("distributor replied {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// A client of the distributor's HTTP API.
#[derive(Clone, Debug)]
pub struct RestClient {
    client: Client,
    base: Url,
}

impl RestClient {
    pub fn new(base: &str) -> Result<Self, ClientError> {
        let base = Url::parse(base).map_err(|_| ClientError::InvalidUrl(base.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base.to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base,
        })
    }

    pub async fn get_logs(&self) -> Result<Vec<LogId>, ClientError> {
        let url = self.url(&["distributor", "v0", "logs"])?;
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn get_witnesses(&self) -> Result<Vec<WitnessId>, ClientError> {
        let url = self.url(&["distributor", "v0", "witnesses"])?;
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.json().await?)
    }

    /// Fetch the freshest checkpoint of the log cosigned by `n` witnesses.
    pub async fn get_checkpoint_n(&self, log_id: &LogId, n: u32) -> Result<Vec<u8>, ClientError> {
        let checkpoint = format!("checkpoint.{n}");
        let url = self.url(&["distributor", "v0", "logs", log_id.as_str(), &checkpoint])?;
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Fetch the latest checkpoint of the log submitted by the witness.
    pub async fn get_checkpoint_witness(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
    ) -> Result<Vec<u8>, ClientError> {
        let url = self.witness_checkpoint_url(log_id, witness_id)?;
        let response = check(self.client.get(url).send().await?).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Submit a checkpoint of the log cosigned by the witness.
    pub async fn distribute(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
        checkpoint: Vec<u8>,
    ) -> Result<(), ClientError> {
        let url = self.witness_checkpoint_url(log_id, witness_id)?;
        check(self.client.put(url).body(checkpoint).send().await?).await?;
        Ok(())
    }

    fn witness_checkpoint_url(
        &self,
        log_id: &LogId,
        witness_id: &WitnessId,
    ) -> Result<Url, ClientError> {
        self.url(&[
            "distributor",
            "v0",
            "logs",
            log_id.as_str(),
            "byWitness",
            witness_id.as_str(),
            "checkpoint",
        ])
    }

    /// Append percent-encoded path segments to the base url.
    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}
