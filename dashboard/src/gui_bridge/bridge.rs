use crate::generator::template::sample_csv;
use crate::gui_bridge::model::DashboardModel;
use crate::workflow::runner::Runner;
use anyhow::Context;
use chrono::Local;
use log::{info, warn};
use rs422core::ingest::ImportError;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{mpsc, Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::{header::CONTENT_TYPE, StatusCode},
    hyper::body::Bytes,
    Filter,
};

/// Largest telemetry upload accepted by `POST /ingest`.
const MAX_UPLOAD_BYTES: u64 = 4 * 1024 * 1024;

type SharedModel = Arc<RwLock<DashboardModel>>;

/// Bridge that hosts the dashboard HTTP endpoints over the latest model.
pub struct GuiBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>, initial: DashboardModel) -> Self {
        Self {
            state: Arc::new(RwLock::new(initial)),
            runner,
        }
    }

    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone + Send + Sync + 'static
    {
        let state = self.state.clone();
        let runner = self.runner.clone();
        let state_filter = warp::any().map(move || state.clone());
        let runner_filter = warp::any().map(move || runner.clone());

        let payload_route = warp::path("payload")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedModel| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&*guard)
            });

        let parameters_route = warp::path("parameters")
            .and(warp::path::end())
            .and(warp::get())
            .and(runner_filter.clone())
            .map(|runner: Arc<Runner>| warp::reply::json(runner.table()));

        let template_route = warp::path("template")
            .and(warp::path::end())
            .and(warp::get())
            .and(runner_filter.clone())
            .map(|runner: Arc<Runner>| {
                match sample_csv(runner.table(), Local::now().naive_local()) {
                    Ok(body) => warp::reply::with_status(
                        warp::reply::with_header(body, CONTENT_TYPE, "text/csv"),
                        StatusCode::OK,
                    ),
                    Err(err) => {
                        warn!("template error: {:#}", err);
                        warp::reply::with_status(
                            warp::reply::with_header(err.to_string(), CONTENT_TYPE, "text/plain"),
                            StatusCode::INTERNAL_SERVER_ERROR,
                        )
                    }
                }
            });

        let ingest_route = warp::path("ingest")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::content_length_limit(MAX_UPLOAD_BYTES))
            .and(warp::body::bytes())
            .and(state_filter.clone())
            .and(runner_filter.clone())
            .and_then(ingest);

        let simulate_route = warp::path("simulate")
            .and(warp::path::end())
            .and(warp::post())
            .and(state_filter)
            .and(runner_filter)
            .and_then(simulate);

        payload_route
            .or(parameters_route)
            .or(template_route)
            .or(ingest_route)
            .or(simulate_route)
    }

    /// Binds `addr` and serves the routes from a background thread, returning
    /// the bound address once the listener is up.
    pub fn serve(&self, addr: SocketAddr) -> anyhow::Result<SocketAddr> {
        let routes = self.routes();
        let (bound_tx, bound_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = bound_tx.send(Err(anyhow::Error::new(err).context("building bridge runtime")));
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(routes).try_bind_ephemeral(addr) {
                    Ok((bound, server)) => {
                        let _ = bound_tx.send(Ok(bound));
                        server.await;
                    }
                    Err(err) => {
                        let _ = bound_tx.send(Err(anyhow::Error::new(err)
                            .context(format!("binding dashboard bridge to {addr}"))));
                    }
                }
            });
        });

        let bound = bound_rx
            .recv()
            .context("bridge thread exited before binding")??;
        info!("dashboard bridge listening on http://{}", bound);
        Ok(bound)
    }

    pub fn publish(&self, model: DashboardModel) {
        info!(
            "publishing {:?} model: {} parameters, {} samples",
            model.source,
            model.parameters.len(),
            model.sample_count()
        );
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = model;
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> DashboardModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn ingest(
    body: Bytes,
    state: SharedModel,
    runner: Arc<Runner>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, warp::Rejection> {
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(err) => {
            warn!("rejected telemetry upload: {}", err);
            return Ok(rejection_reply("encoding", "uploaded file is not valid UTF-8"));
        }
    };

    match runner.import_csv(text) {
        Ok(outcome) => {
            let accepted_rows = outcome.accepted_rows;
            let dropped_rows = outcome.dropped_rows;
            let model = runner.imported_model(outcome);
            let reply = json!({
                "status": "ok",
                "parameters": model.parameters.keys().collect::<Vec<_>>(),
                "accepted_rows": accepted_rows,
                "dropped_rows": dropped_rows,
                "notes": model.notes,
            });
            let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
            *guard = model;
            Ok(warp::reply::with_status(
                warp::reply::json(&reply),
                StatusCode::OK,
            ))
        }
        Err(err) => {
            let kind = match err {
                ImportError::Schema(_) => "schema",
                ImportError::Parse(_) => "parse",
            };
            Ok(rejection_reply(kind, &err.to_string()))
        }
    }
}

async fn simulate(
    state: SharedModel,
    runner: Arc<Runner>,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, warp::Rejection> {
    match runner.simulated_model() {
        Ok(model) => {
            let reply = json!({
                "status": "ok",
                "parameters": model.parameters.keys().collect::<Vec<_>>(),
                "samples": model.sample_count(),
            });
            let mut guard = state.write().unwrap_or_else(PoisonError::into_inner);
            *guard = model;
            Ok(warp::reply::with_status(
                warp::reply::json(&reply),
                StatusCode::OK,
            ))
        }
        Err(err) => {
            warn!("simulate error: {:#}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({"status": "error", "message": err.to_string()})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

fn rejection_reply(kind: &str, message: &str) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({"status": "error", "kind": kind, "message": message})),
        StatusCode::UNPROCESSABLE_ENTITY,
    )
}
