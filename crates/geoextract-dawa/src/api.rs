//! DAWA replication API client
//!
//! Two endpoints are used: `replikering/senestetransaktion` for the newest
//! transaction id and `replikering/udtraek` for a full NDJSON extract of one
//! entity as of a given transaction.

use std::future::Future;
use std::time::Duration;

use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use geoextract_core::{fetch_text, http_client, ndjson_lines, HttpSettings, StreamError};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::state::{Dataset, TransactionId};
use crate::transform::{AccessAddress, PostCode, Road, UnitAddress};

/// Public DAWA endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.dataforsyningen.dk";

/// Lazy stream of decoded records. Nothing is fetched until first poll.
pub type RecordStream<T> = BoxStream<'static, Result<T, StreamError>>;

/// Where records come from.
///
/// Implemented by [`DawaClient`] for the live service; tests substitute an
/// in-memory source.
pub trait DawaSource {
    /// Newest transaction id known to the service
    fn latest_transaction(
        &self,
    ) -> impl Future<Output = Result<TransactionId, StreamError>> + Send;

    fn access_addresses(&self, tx: TransactionId) -> RecordStream<AccessAddress>;
    fn unit_addresses(&self, tx: TransactionId) -> RecordStream<UnitAddress>;
    fn roads(&self, tx: TransactionId) -> RecordStream<Road>;
    fn post_codes(&self, tx: TransactionId) -> RecordStream<PostCode>;
}

/// HTTP client for the DAWA replication API
#[derive(Debug, Clone)]
pub struct DawaClient {
    client: reqwest::Client,
    base_url: String,
    read_timeout: Duration,
}

impl DawaClient {
    pub fn new(base_url: &str, http: &HttpSettings) -> Result<Self, StreamError> {
        Ok(Self {
            client: http_client(http)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            read_timeout: http.read_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn latest_transaction_url(&self) -> String {
        format!("{}/replikering/senestetransaktion", self.base_url)
    }

    /// Extract URL for one dataset at a fixed transaction
    pub fn extract_url(&self, dataset: Dataset, tx: TransactionId) -> String {
        format!(
            "{}/replikering/udtraek?entitet={}&txid={}&ndjson",
            self.base_url,
            dataset.entity(),
            tx
        )
    }

    fn records<T>(&self, dataset: Dataset, tx: TransactionId) -> RecordStream<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let url = self.extract_url(dataset, tx);
        log::debug!("{dataset}: streaming {url}");
        ndjson_lines(self.client.clone(), url, self.read_timeout)
            .enumerate()
            .map(|(idx, line)| decode_line(idx + 1, &line?))
            .boxed()
    }
}

impl DawaSource for DawaClient {
    async fn latest_transaction(&self) -> Result<TransactionId, StreamError> {
        let url = self.latest_transaction_url();
        log::debug!("Resolving latest transaction from {url}");
        let body = fetch_text(&self.client, &url, self.read_timeout).await?;
        parse_transaction(&body)
    }

    fn access_addresses(&self, tx: TransactionId) -> RecordStream<AccessAddress> {
        self.records(Dataset::AccessAddress, tx)
    }

    fn unit_addresses(&self, tx: TransactionId) -> RecordStream<UnitAddress> {
        self.records(Dataset::UnitAddress, tx)
    }

    fn roads(&self, tx: TransactionId) -> RecordStream<Road> {
        self.records(Dataset::Road, tx)
    }

    fn post_codes(&self, tx: TransactionId) -> RecordStream<PostCode> {
        self.records(Dataset::PostCode, tx)
    }
}

fn decode_line<T: DeserializeOwned>(line_no: usize, line: &str) -> Result<T, StreamError> {
    sonic_rs::from_str(line).map_err(|e| StreamError::Decode {
        line: line_no,
        message: e.to_string(),
    })
}

#[derive(Deserialize)]
struct LatestTransaction {
    #[serde(default)]
    txid: Option<TransactionId>,
}

/// Parse the body of `replikering/senestetransaktion`
pub fn parse_transaction(body: &str) -> Result<TransactionId, StreamError> {
    let parsed: LatestTransaction =
        sonic_rs::from_str(body).map_err(|e| StreamError::Http {
            status: None,
            message: format!("invalid transaction response: {e}"),
        })?;
    parsed.txid.ok_or_else(|| StreamError::Http {
        status: None,
        message: "no transaction id in response".to_string(),
    })
}
