//! HTTP client for the RapidAPI currency-conversion-and-exchange-rates service.
//!
//! Endpoints used:
//! - `GET /symbols` - supported currency codes and names
//! - `GET /convert?from=&to=&amount=` - converted amount in `result`
//! - `GET /timeseries?start_date=&end_date=&base=&symbols=` - daily rates in `rates`

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::error::ApiError;
use super::models::{Currency, RateSeries};

pub const DEFAULT_API_HOST: &str = "currency-conversion-and-exchange-rates.p.rapidapi.com";

const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Source of exchange-rate data
pub trait RatesProvider: Send {
    fn list_symbols(&self) -> Result<Vec<Currency>, ApiError>;

    fn convert(&self, from: &str, to: &str, amount: f64) -> Result<f64, ApiError>;

    fn timeseries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbol: &str,
    ) -> Result<RateSeries, ApiError>;
}

/// Error body shapes the API uses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    info: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SymbolsResponse {
    symbols: Option<BTreeMap<String, String>>,
    error: Option<ErrorBody>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    result: Option<f64>,
    error: Option<ErrorBody>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    base: Option<String>,
    rates: Option<BTreeMap<String, BTreeMap<String, Option<f64>>>>,
    error: Option<ErrorBody>,
    message: Option<String>,
}

/// Turn an error payload into an `ApiError::Api`, if there is one
fn api_error(error: Option<ErrorBody>, message: Option<String>) -> Option<ApiError> {
    if let Some(e) = error {
        let text = e
            .info
            .or(e.kind)
            .unwrap_or_else(|| "unknown error".to_string());
        return Some(ApiError::Api(text));
    }
    message.map(ApiError::Api)
}

fn parse_symbols(body: &str) -> Result<Vec<Currency>, ApiError> {
    let resp: SymbolsResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("symbols: {e}")))?;

    match resp.symbols {
        Some(symbols) => Ok(symbols
            .into_iter()
            .map(|(code, name)| Currency::new(code, name))
            .collect()),
        None => Err(api_error(resp.error, resp.message)
            .unwrap_or_else(|| ApiError::InvalidResponse("missing `symbols`".to_string()))),
    }
}

fn parse_convert(body: &str) -> Result<f64, ApiError> {
    let resp: ConvertResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("convert: {e}")))?;

    match resp.result {
        Some(result) => Ok(result),
        None => Err(api_error(resp.error, resp.message)
            .unwrap_or_else(|| ApiError::InvalidResponse("missing `result`".to_string()))),
    }
}

fn parse_timeseries(body: &str, base: &str) -> Result<RateSeries, ApiError> {
    let resp: TimeseriesResponse = serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("timeseries: {e}")))?;

    let Some(raw) = resp.rates else {
        return Err(api_error(resp.error, resp.message)
            .unwrap_or_else(|| ApiError::InvalidResponse("missing `rates`".to_string())));
    };

    let mut rates = BTreeMap::new();
    for (date, day) in raw {
        match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
            Ok(d) => {
                // null rates are left out and plot as missing
                let day = day
                    .into_iter()
                    .filter_map(|(symbol, rate)| rate.map(|r| (symbol, r)))
                    .collect();
                rates.insert(d, day);
            }
            Err(e) => tracing::warn!(%date, error = %e, "skipping unparseable timeseries date"),
        }
    }

    Ok(RateSeries {
        base: resp.base.unwrap_or_else(|| base.to_string()),
        rates,
    })
}

/// `RatesProvider` backed by the RapidAPI REST endpoints
pub struct HttpRatesProvider {
    client: Client,
    api_key: Option<String>,
    host: String,
    base_url: String,
}

impl HttpRatesProvider {
    pub fn new(api_key: Option<String>, host: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(HttpRatesProvider {
            client,
            api_key,
            base_url: format!("https://{host}"),
            host,
        })
    }

    /// Send requests to a local `base_url` instead of `https://<host>`
    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .no_proxy()
            .build()
            .unwrap();
        self.base_url = base_url.into();
        self
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, ApiError> {
        let key = self.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;
        let url = format!("{}/{}", self.base_url, path);

        tracing::debug!(%url, ?query, "api request");

        let response = self
            .client
            .get(&url)
            .query(query)
            .header("x-rapidapi-key", key)
            .header("x-rapidapi-host", &self.host)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            // Prefer the API's own message over the bare status when present
            if let Ok(resp) = serde_json::from_str::<ConvertResponse>(&body) {
                if let Some(err) = api_error(resp.error, resp.message) {
                    return Err(err);
                }
            }
            return Err(ApiError::Status(status));
        }

        Ok(body)
    }
}

impl RatesProvider for HttpRatesProvider {
    fn list_symbols(&self) -> Result<Vec<Currency>, ApiError> {
        let body = self.get("symbols", &[])?;
        parse_symbols(&body)
    }

    fn convert(&self, from: &str, to: &str, amount: f64) -> Result<f64, ApiError> {
        let body = self.get(
            "convert",
            &[
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("amount", amount.to_string()),
            ],
        )?;
        parse_convert(&body)
    }

    fn timeseries(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        base: &str,
        symbol: &str,
    ) -> Result<RateSeries, ApiError> {
        let body = self.get(
            "timeseries",
            &[
                ("start_date", start.format("%Y-%m-%d").to_string()),
                ("end_date", end.format("%Y-%m-%d").to_string()),
                ("base", base.to_string()),
                ("symbols", symbol.to_string()),
            ],
        )?;
        parse_timeseries(&body, base)
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    #[test]
    fn test_parse_symbols() {
        let body = r#"{"success": true, "symbols": {"USD": "United States Dollar", "EUR": "Euro"}}"#;
        let list = parse_symbols(body).unwrap();
        assert_eq!(list.len(), 2);
        // BTreeMap keeps codes ordered
        assert_eq!(list[0].code, "EUR");
        assert_eq!(list[1].label(), "USD - United States Dollar");
    }

    #[test]
    fn test_parse_convert() {
        let body = r#"{"success": true, "query": {"from": "USD", "to": "EUR", "amount": 10}, "info": {"rate": 0.92}, "result": 9.2}"#;
        assert_eq!(parse_convert(body).unwrap(), 9.2);
    }

    #[test]
    fn test_parse_convert_missing_result() {
        let body = r#"{"success": true}"#;
        assert!(matches!(
            parse_convert(body),
            Err(ApiError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_api_errors() {
        let body = r#"{"success": false, "error": {"code": 202, "type": "invalid_currency_codes", "info": "You have provided one or more invalid Currency Codes."}}"#;
        match parse_convert(body) {
            Err(ApiError::Api(msg)) => assert!(msg.contains("invalid Currency Codes")),
            other => panic!("unexpected: {other:?}"),
        }

        let body = r#"{"message": "You are not subscribed to this API."}"#;
        assert!(matches!(parse_symbols(body), Err(ApiError::Api(_))));
    }

    #[test]
    fn test_parse_timeseries() {
        let body = r#"{
            "success": true,
            "timeseries": true,
            "base": "USD",
            "rates": {
                "2024-01-02": {"UZS": 12350.5},
                "not-a-date": {"UZS": 1.0},
                "2024-01-01": {"UZS": 12340.0}
            }
        }"#;
        let series = parse_timeseries(body, "USD").unwrap();
        assert_eq!(series.base, "USD");
        assert_eq!(series.rates.len(), 2);
        let first = series.rates.keys().next().unwrap();
        assert_eq!(*first, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_null_rate_plots_as_zero() {
        let body = r#"{
            "base": "USD",
            "rates": {
                "2024-01-01": {"UZS": 12340.0},
                "2024-01-02": {"UZS": null}
            }
        }"#;
        let series = parse_timeseries(body, "USD").unwrap();
        assert_eq!(series.rates.len(), 2);

        let points = crate::data::chart_points(&series, "UZS");
        assert_eq!(points[0].price, 12340.0);
        assert_eq!(points[1].price, 0.0);
        assert_eq!(points[1].label, "Jan 2");
    }

    /// Serve one canned HTTP response on a local port and hand back the
    /// raw request head that was received
    fn serve_once(status: &str, body: &str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            head
        });

        (format!("http://{addr}"), handle)
    }

    fn local_provider(base_url: String) -> HttpRatesProvider {
        HttpRatesProvider::new(Some("secret".to_string()), DEFAULT_API_HOST.to_string())
            .unwrap()
            .with_base_url(base_url)
    }

    fn header<'a>(head: &'a str, name: &str) -> Option<&'a str> {
        head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }

    #[test]
    fn test_timeseries_request_shape() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"success": true, "base": "USD", "rates": {"2024-01-01": {"UZS": 12340.0}}}"#,
        );
        let provider = local_provider(url);
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();

        let series = provider.timeseries(start, end, "USD", "UZS").unwrap();
        assert_eq!(series.rates.len(), 1);

        let head = server.join().unwrap();
        assert!(head.starts_with(
            "GET /timeseries?start_date=2024-01-01&end_date=2024-01-31&base=USD&symbols=UZS HTTP/1.1\r\n"
        ));
        assert_eq!(header(&head, "x-rapidapi-key"), Some("secret"));
        assert_eq!(header(&head, "x-rapidapi-host"), Some(DEFAULT_API_HOST));
    }

    #[test]
    fn test_convert_request_shape() {
        let (url, server) = serve_once("200 OK", r#"{"success": true, "result": 23.0}"#);
        let provider = local_provider(url);

        assert_eq!(provider.convert("USD", "EUR", 2.5).unwrap(), 23.0);

        let head = server.join().unwrap();
        assert!(head.starts_with("GET /convert?from=USD&to=EUR&amount=2.5 HTTP/1.1\r\n"));
        assert_eq!(header(&head, "x-rapidapi-key"), Some("secret"));
    }

    #[test]
    fn test_error_status_with_message() {
        let (url, server) = serve_once(
            "403 Forbidden",
            r#"{"message": "You are not subscribed to this API."}"#,
        );
        let provider = local_provider(url);

        match provider.list_symbols() {
            Err(ApiError::Api(msg)) => assert_eq!(msg, "You are not subscribed to this API."),
            other => panic!("unexpected: {other:?}"),
        }
        let head = server.join().unwrap();
        assert!(head.starts_with("GET /symbols HTTP/1.1\r\n"));
    }

    #[test]
    fn test_error_status_without_message() {
        let (url, server) = serve_once("500 Internal Server Error", "upstream down");
        let provider = local_provider(url);

        match provider.list_symbols() {
            Err(ApiError::Status(status)) => {
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR)
            }
            other => panic!("unexpected: {other:?}"),
        }
        server.join().unwrap();
    }

    #[test]
    fn test_missing_api_key() {
        let provider = HttpRatesProvider::new(None, DEFAULT_API_HOST.to_string()).unwrap();
        assert!(matches!(
            provider.list_symbols(),
            Err(ApiError::MissingApiKey)
        ));
    }
}
