//! Timestamp exchange between the requester and the echo responder.
//!
//! The responder answers with `{arrival_us}|{ordinal}` optionally followed by
//! `|{padding}\n`, where `ordinal` is the 1-based position of the request on
//! its TCP connection. The requester splits the body on `|` and derives the
//! latency breakdown from its own send/receive timestamps and the responder's
//! arrival timestamp. Clocks are never synchronised, the split figures only
//! make sense when both hosts keep reasonably aligned time.

use crate::error::BenchError;
use serde::{Deserialize, Serialize};

pub const FIELD_SEPARATOR: char = '|';
const FIRST_ORDINAL: &str = "1";

/// Form sent by the requester when payload sizing is enabled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EchoRequest {
    pub payload: String,
    #[serde(rename = "respSize")]
    pub response_size: String,
}

impl EchoRequest {
    pub fn new(request_size: usize, response_size: usize) -> Self {
        EchoRequest {
            payload: zero_string(request_size),
            response_size: response_size.to_string(),
        }
    }
}

/// Parameters the responder reads from the query string or the form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EchoParams {
    #[serde(rename = "respSize")]
    pub response_size: Option<String>,
}

impl EchoParams {
    /// Missing or unparsable sizes mean no padding.
    pub fn response_size(&self) -> usize {
        self.response_size
            .as_deref()
            .and_then(|size| size.trim().parse().ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoResponse {
    pub arrival_us: i64,
    pub ordinal: u64,
    pub padding: Option<String>,
}

impl EchoResponse {
    pub fn new(arrival_us: i64, ordinal: u64, response_size: usize) -> Self {
        let padding = (response_size != 0).then(|| zero_string(response_size));
        EchoResponse {
            arrival_us,
            ordinal,
            padding,
        }
    }

    pub fn encode(&self) -> String {
        match &self.padding {
            Some(padding) => format!(
                "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{padding}\n",
                self.arrival_us, self.ordinal
            ),
            None => format!("{}{FIELD_SEPARATOR}{}", self.arrival_us, self.ordinal),
        }
    }
}

/// What the requester extracts from an echo body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EchoReceipt {
    pub arrival_us: i64,
    pub is_first: bool,
}

impl EchoReceipt {
    /// An unparsable timestamp becomes 0 rather than an error, which shows up
    /// downstream as an absurd latency. A body without an ordinal field is not
    /// an echo response at all.
    pub fn parse(body: &str) -> Result<Self, BenchError> {
        let mut fields = body.splitn(3, FIELD_SEPARATOR);
        let timestamp = fields.next().unwrap_or_default();
        let Some(ordinal) = fields.next() else {
            return Err(BenchError::MalformedResponse(format!(
                "missing connection ordinal in: {}",
                truncate(body)
            )));
        };

        Ok(EchoReceipt {
            arrival_us: timestamp.parse().unwrap_or_default(),
            is_first: ordinal == FIRST_ORDINAL,
        })
    }
}

/// One latency measurement, serialized as a ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sample {
    #[serde(rename = "isFirst")]
    pub is_first: bool,
    #[serde(rename = "diff")]
    pub total_us: i64,
    #[serde(rename = "client to server")]
    pub client_to_server_us: i64,
    #[serde(rename = "server to client")]
    pub server_to_client_us: i64,
}

impl Sample {
    pub fn derive(sent_at_us: i64, received_at_us: i64, receipt: EchoReceipt) -> Self {
        Sample {
            is_first: receipt.is_first,
            total_us: received_at_us - sent_at_us,
            client_to_server_us: receipt.arrival_us - sent_at_us,
            server_to_client_us: received_at_us - receipt.arrival_us,
        }
    }

    /// Console form of a sample: `{isFirst} {diff} {cts} {stc}`.
    pub fn console_line(&self) -> String {
        format!(
            "{} {} {} {}",
            self.is_first, self.total_us, self.client_to_server_us, self.server_to_client_us
        )
    }
}

pub fn zero_string(len: usize) -> String {
    "0".repeat(len)
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(64) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_without_padding_should_have_two_fields() {
        let response = EchoResponse::new(1_700_000_000_000_000, 3, 0);
        assert_eq!(response.encode(), "1700000000000000|3");
    }

    #[test]
    fn response_padding_should_be_zero_filled() {
        let body = EchoResponse::new(42, 1, 10).encode();
        assert_eq!(body, "42|1|0000000000\n");
        let padding = body.splitn(3, '|').nth(2).unwrap().trim_end();
        assert_eq!(padding.len(), 10);
        assert!(padding.chars().all(|c| c == '0'));
    }

    #[test]
    fn receipt_should_flag_only_the_first_ordinal() {
        let first = EchoReceipt::parse("100|1").unwrap();
        assert_eq!(first.arrival_us, 100);
        assert!(first.is_first);

        let later = EchoReceipt::parse("100|11").unwrap();
        assert!(!later.is_first);

        let padded = EchoReceipt::parse("100|1|000\n").unwrap();
        assert!(padded.is_first);
    }

    #[test]
    fn unparsable_timestamp_should_yield_zero() {
        let receipt = EchoReceipt::parse("garbage|2").unwrap();
        assert_eq!(receipt.arrival_us, 0);

        let sample = Sample::derive(1_000, 1_500, receipt);
        assert_eq!(sample.client_to_server_us, -1_000);
        assert_eq!(sample.server_to_client_us, 1_500);
    }

    #[test]
    fn body_without_ordinal_should_be_malformed() {
        assert!(matches!(
            EchoReceipt::parse("<html>502 Bad Gateway</html>"),
            Err(BenchError::MalformedResponse(_))
        ));
        assert!(matches!(
            EchoReceipt::parse(""),
            Err(BenchError::MalformedResponse(_))
        ));
    }

    #[test]
    fn latency_split_should_add_up_to_total() {
        let clocks = [
            (0, 0, 0),
            (1_000, 1_900, 1_300),
            (5_000, 5_010, 4_000),
            (5_000, 5_010, 9_000),
            (10, 20, 0),
        ];
        for (sent, received, arrival) in clocks {
            let sample = Sample::derive(
                sent,
                received,
                EchoReceipt {
                    arrival_us: arrival,
                    is_first: false,
                },
            );
            assert_eq!(
                sample.total_us,
                sample.client_to_server_us + sample.server_to_client_us
            );
        }
    }

    #[test]
    fn echo_params_should_default_to_no_padding() {
        assert_eq!(EchoParams::default().response_size(), 0);
        let params = EchoParams {
            response_size: Some("abc".to_owned()),
        };
        assert_eq!(params.response_size(), 0);
        let params = EchoParams {
            response_size: Some("12".to_owned()),
        };
        assert_eq!(params.response_size(), 12);
    }

    #[test]
    fn request_payload_should_match_requested_size() {
        let request = EchoRequest::new(7, 3);
        assert_eq!(request.payload, "0000000");
        assert_eq!(request.response_size, "3");
    }

    #[test]
    fn console_line_should_be_space_separated() {
        let sample = Sample {
            is_first: true,
            total_us: 30,
            client_to_server_us: 10,
            server_to_client_us: 20,
        };
        assert_eq!(sample.console_line(), "true 30 10 20");
    }
}
