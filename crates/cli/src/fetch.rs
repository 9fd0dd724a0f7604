//! Mapping-sheet download over HTTP(S).
//!
//! The product-mapping workbook usually lives behind an "anyone with the
//! link" spreadsheet-export URL. Transient failures (429, 5xx, network)
//! are retried with exponential backoff; auth and other client errors
//! fail immediately.

use std::thread;
use std::time::Duration;

use url::Url;

use crate::exit_codes::EXIT_FETCH;
use crate::CliError;

const MAX_RETRIES: u32 = 3;
const USER_AGENT: &str = concat!("sbridge/", env!("CARGO_PKG_VERSION"));

/// Download `source` and return the raw response bytes.
pub fn fetch_bytes(source: &str) -> Result<Vec<u8>, CliError> {
    let url = Url::parse(source).map_err(|e| CliError {
        code: EXIT_FETCH,
        message: format!("invalid mapping URL {:?}: {}", source, e),
        hint: None,
    })?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| CliError {
            code: EXIT_FETCH,
            message: format!("cannot build HTTP client: {}", e),
            hint: None,
        })?;

    let mut backoff_secs = 1u64;

    for attempt in 0..=MAX_RETRIES {
        let result = client.get(url.clone()).send();

        match result {
            Ok(resp) => {
                let status = resp.status().as_u16();

                // Retryable: 429, 5xx
                if status == 429 || status >= 500 {
                    if attempt == MAX_RETRIES {
                        return Err(CliError {
                            code: EXIT_FETCH,
                            message: format!(
                                "mapping fetch failed (HTTP {}) after {} attempts",
                                status, MAX_RETRIES,
                            ),
                            hint: None,
                        });
                    }

                    // Respect Retry-After header for 429
                    let wait = if status == 429 {
                        resp.headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(backoff_secs)
                    } else {
                        backoff_secs
                    };

                    eprintln!(
                        "warning: retry {}/{} in {}s (HTTP {})",
                        attempt + 1,
                        MAX_RETRIES,
                        wait,
                        status,
                    );
                    thread::sleep(Duration::from_secs(wait));
                    backoff_secs *= 2;
                    continue;
                }

                // Other non-success statuses: fail immediately
                if status >= 400 {
                    let hint = if status == 401 || status == 403 {
                        Some(
                            "the mapping sheet must be shared as 'anyone with the link'"
                                .to_string(),
                        )
                    } else {
                        None
                    };
                    return Err(CliError {
                        code: EXIT_FETCH,
                        message: format!("mapping fetch rejected (HTTP {})", status),
                        hint,
                    });
                }

                let bytes = resp.bytes().map_err(|e| CliError {
                    code: EXIT_FETCH,
                    message: format!("failed to read mapping response body: {}", e),
                    hint: None,
                })?;

                return Ok(bytes.to_vec());
            }
            Err(e) => {
                // Network/timeout errors: retry
                if attempt == MAX_RETRIES {
                    return Err(CliError {
                        code: EXIT_FETCH,
                        message: format!(
                            "mapping fetch failed after {} attempts: {}",
                            MAX_RETRIES, e,
                        ),
                        hint: None,
                    });
                }

                eprintln!(
                    "warning: retry {}/{} in {}s ({})",
                    attempt + 1,
                    MAX_RETRIES,
                    backoff_secs,
                    e,
                );
                thread::sleep(Duration::from_secs(backoff_secs));
                backoff_secs *= 2;
            }
        }
    }

    unreachable!()
}
