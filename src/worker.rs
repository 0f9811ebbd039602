//! Background thread that performs API calls off the UI thread.
//!
//! The UI sends `FetchRequest`s and polls `FetchResponse`s each frame.
//! Every conversion and history request carries an id so the receiver can
//! discard answers to requests it has since superseded. Requests that are
//! still queued when a newer one of the same kind arrives are never sent.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::data::{ApiError, Currency, RateSeries, RatesProvider};

/// Work items for the fetch thread
#[derive(Debug, Clone, PartialEq)]
pub enum FetchRequest {
    Symbols,
    Convert {
        id: u64,
        from: String,
        to: String,
        amount: f64,
    },
    History {
        id: u64,
        start: NaiveDate,
        end: NaiveDate,
        base: String,
        symbol: String,
    },
}

/// Results sent back to the UI thread
#[derive(Debug)]
pub enum FetchResponse {
    Symbols(Result<Vec<Currency>, ApiError>),
    Converted {
        id: u64,
        result: Result<f64, ApiError>,
    },
    History {
        id: u64,
        symbol: String,
        result: Result<RateSeries, ApiError>,
    },
}

/// Handle to the running fetch thread.
///
/// Dropping the handle closes the request channel, which ends the thread
/// once any in-flight call returns.
pub struct FetchWorker {
    requests: Sender<FetchRequest>,
    responses: Receiver<FetchResponse>,
}

impl FetchWorker {
    /// Spawn the fetch thread, which owns `provider` for its lifetime
    pub fn spawn(provider: Box<dyn RatesProvider>) -> Result<Self> {
        let (req_tx, req_rx) = mpsc::channel::<FetchRequest>();
        let (resp_tx, resp_rx) = mpsc::channel::<FetchResponse>();

        thread::Builder::new()
            .name("fxboard-fetch".to_string())
            .spawn(move || run_worker(provider, req_rx, resp_tx))
            .context("Failed to spawn fetch thread")?;

        Ok(FetchWorker {
            requests: req_tx,
            responses: resp_rx,
        })
    }

    /// Queue a request. Fails only if the thread has died.
    pub fn send(&self, request: FetchRequest) -> Result<()> {
        self.requests
            .send(request)
            .context("Fetch thread is no longer running")
    }

    /// Drain all responses that have arrived since the last call
    pub fn poll(&self) -> Vec<FetchResponse> {
        let mut out = Vec::new();
        loop {
            match self.responses.try_recv() {
                Ok(resp) => out.push(resp),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Block until the next response arrives
    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<FetchResponse> {
        self.responses.recv_timeout(timeout).ok()
    }
}

fn run_worker(
    provider: Box<dyn RatesProvider>,
    requests: Receiver<FetchRequest>,
    responses: Sender<FetchResponse>,
) {
    tracing::debug!("fetch worker started");

    let mut pending: Vec<FetchRequest> = Vec::new();
    loop {
        if pending.is_empty() {
            match requests.recv() {
                Ok(request) => pending.push(request),
                Err(_) => break,
            }
        }
        pending.extend(requests.try_iter());
        coalesce(&mut pending);

        let response = execute(provider.as_ref(), pending.remove(0));
        if responses.send(response).is_err() {
            break;
        }
    }

    tracing::debug!("fetch worker stopped");
}

/// Keep only the newest conversion and history request, and one symbols
/// request, preserving arrival order
fn coalesce(pending: &mut Vec<FetchRequest>) {
    let last_convert = pending
        .iter()
        .rposition(|r| matches!(r, FetchRequest::Convert { .. }));
    let last_history = pending
        .iter()
        .rposition(|r| matches!(r, FetchRequest::History { .. }));

    let before = pending.len();
    let mut seen_symbols = false;
    let mut index = 0;
    pending.retain(|request| {
        let i = index;
        index += 1;
        match request {
            FetchRequest::Symbols => !std::mem::replace(&mut seen_symbols, true),
            FetchRequest::Convert { .. } => Some(i) == last_convert,
            FetchRequest::History { .. } => Some(i) == last_history,
        }
    });

    let dropped = before - pending.len();
    if dropped > 0 {
        tracing::debug!(dropped, "skipped superseded requests");
    }
}

fn execute(provider: &dyn RatesProvider, request: FetchRequest) -> FetchResponse {
    match request {
        FetchRequest::Symbols => {
            let result = provider.list_symbols();
            if let Err(ref e) = result {
                tracing::warn!(error = %e, "symbols request failed");
            }
            FetchResponse::Symbols(result)
        }
        FetchRequest::Convert {
            id,
            from,
            to,
            amount,
        } => {
            let result = provider.convert(&from, &to, amount);
            match &result {
                Ok(v) => tracing::info!(id, %from, %to, amount, result = v, "converted"),
                Err(e) => tracing::warn!(id, %from, %to, amount, error = %e, "conversion failed"),
            }
            FetchResponse::Converted { id, result }
        }
        FetchRequest::History {
            id,
            start,
            end,
            base,
            symbol,
        } => {
            let result = provider.timeseries(start, end, &base, &symbol);
            match &result {
                Ok(s) => tracing::info!(id, base = %s.base, %symbol, %start, %end, days = s.rates.len(), "history loaded"),
                Err(e) => tracing::warn!(id, %base, %symbol, error = %e, "history request failed"),
            }
            FetchResponse::History { id, symbol, result }
        }
    }
}
