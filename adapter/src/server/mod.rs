//! HTTP intake for risk files and one-time download of generated missions.

pub mod model;
pub mod upload;

use crate::store::naming::is_valid_name;
use crate::store::MissionStore;
use crate::workflow::runner::{render_document, Runner};
use anyhow::Context;
use log::{info, warn};
use model::{
    ErrorResponse, ProcessResponse, KIND_INTERNAL, KIND_INVALID_FILENAME, KIND_INVALID_UPLOAD,
    KIND_NOT_FOUND,
};
use serde::Serialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use upload::read_form;
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

const GEOJSON_MEDIA_TYPE: &str = "application/geo+json";

fn json_reply<T: Serialize>(status: StatusCode, body: &T) -> Response {
    warp::reply::with_status(warp::reply::json(body), status).into_response()
}

fn error_reply(status: StatusCode, body: ErrorResponse) -> Response {
    json_reply(status, &body)
}

/// Owns the runner and the artifact store shared by every route.
#[derive(Clone)]
pub struct MissionServer {
    runner: Arc<Runner>,
    store: Arc<dyn MissionStore>,
}

impl MissionServer {
    pub fn new(runner: Arc<Runner>, store: Arc<dyn MissionStore>) -> Self {
        Self { runner, store }
    }

    pub fn routes(&self) -> impl Filter<Extract = (impl Reply,), Error = Infallible> + Clone {
        let server = self.clone();
        let with_server = warp::any().map(move || server.clone());

        let process = warp::path!("process")
            .and(warp::post())
            .and(warp::multipart::form().max_length(self.runner.config().max_upload_bytes))
            .and(with_server.clone())
            .and_then(|form: FormData, server: MissionServer| async move {
                Ok::<_, Infallible>(server.process(form).await)
            });

        let download = warp::path!("download" / String)
            .and(warp::get())
            .and(with_server.clone())
            .map(|name: String, server: MissionServer| server.download(&name));

        let status = warp::path!("status")
            .and(warp::get())
            .and(with_server)
            .map(|server: MissionServer| json_reply(StatusCode::OK, &server.runner.metrics()));

        process
            .or(download)
            .unify()
            .or(status)
            .unify()
            .recover(handle_rejection)
    }

    async fn process(&self, form: FormData) -> Response {
        let form = match read_form(form).await {
            Ok(form) => form,
            Err(err) => {
                return error_reply(
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(KIND_INVALID_UPLOAD, format!("could not read upload: {}", err)),
                )
            }
        };
        let altitude_m = form.altitude_m.clone();
        let hover_time_s = form.hover_time_s.clone();

        let file = match form.single_file() {
            Ok(file) => file,
            Err(detail) => {
                return error_reply(
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(KIND_INVALID_UPLOAD, detail),
                )
            }
        };
        if !file.is_json() {
            return error_reply(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(
                    KIND_INVALID_UPLOAD,
                    "Invalid file type. Please upload a JSON file.",
                ),
            );
        }

        let params = match self
            .runner
            .parameters(altitude_m.as_deref(), hover_time_s.as_deref())
        {
            Ok(params) => params,
            Err(err) => {
                return error_reply(StatusCode::BAD_REQUEST, ErrorResponse::from_run_error(&err))
            }
        };

        let conversion = match self.runner.execute(&file.bytes, &params) {
            Ok(conversion) => conversion,
            Err(err) => {
                return error_reply(StatusCode::BAD_REQUEST, ErrorResponse::from_run_error(&err))
            }
        };
        if conversion.document.is_empty() {
            return error_reply(
                StatusCode::BAD_REQUEST,
                ErrorResponse::no_waypoints(conversion.rejections),
            );
        }

        let stored = render_document(&conversion.document)
            .and_then(|rendered| self.store.put(&rendered));
        let name = match stored {
            Ok(name) => name,
            Err(err) => {
                warn!("storing mission for {}: {:#}", file.filename, err);
                return error_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(KIND_INTERNAL, "Error writing output file."),
                );
            }
        };

        info!(
            "{} -> {} ({} waypoints, {} rejected)",
            file.filename,
            name,
            conversion.waypoint_count(),
            conversion.rejections.len()
        );
        json_reply(
            StatusCode::OK,
            &ProcessResponse::new(name, conversion.waypoint_count(), conversion.rejections),
        )
    }

    fn download(&self, name: &str) -> Response {
        if !is_valid_name(name) {
            return error_reply(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(KIND_INVALID_FILENAME, "Invalid filename format."),
            );
        }

        match self.store.take(name) {
            Ok(Some(bytes)) => {
                let reply = warp::reply::with_header(bytes, "content-type", GEOJSON_MEDIA_TYPE);
                warp::reply::with_header(
                    reply,
                    "content-disposition",
                    format!("attachment; filename=\"{}\"", name),
                )
                .into_response()
            }
            Ok(None) => error_reply(
                StatusCode::NOT_FOUND,
                ErrorResponse::new(KIND_NOT_FOUND, "File not found."),
            ),
            Err(err) => {
                warn!("fetching {}: {:#}", name, err);
                error_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(KIND_INTERNAL, "Error reading output file."),
                )
            }
        }
    }

    /// Binds `addr` and serves until Ctrl+C, sweeping stale artifacts meanwhile.
    pub async fn serve(self, addr: SocketAddr) -> anyhow::Result<()> {
        let config = self.runner.config().clone();
        let sweeper = tokio::spawn(sweep_expired(
            self.store.clone(),
            config.retention(),
            config.sweep_interval(),
        ));

        let (bound, server) = warp::serve(self.routes())
            .try_bind_with_graceful_shutdown(addr, async {
                if let Err(err) = signal::ctrl_c().await {
                    warn!("awaiting Ctrl+C: {}", err);
                }
            })
            .with_context(|| format!("binding HTTP intake on {}", addr))?;

        info!("mission adapter listening on http://{}", bound);
        server.await;
        sweeper.abort();
        info!("mission adapter stopped");
        Ok(())
    }
}

async fn sweep_expired(store: Arc<dyn MissionStore>, retention: Duration, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    loop {
        ticker.tick().await;
        if let Err(err) = store.expire(retention) {
            warn!("expiring stored missions: {:#}", err);
        }
    }
}

async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    let (status, body) = if err.is_not_found() {
        (
            StatusCode::NOT_FOUND,
            ErrorResponse::new(KIND_NOT_FOUND, "No such route."),
        )
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorResponse::new(KIND_INVALID_UPLOAD, "Upload exceeds the size limit."),
        )
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new(KIND_INVALID_UPLOAD, "Method not allowed."),
        )
    } else {
        (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new(KIND_INVALID_UPLOAD, format!("{:?}", err)),
        )
    };
    Ok(error_reply(status, body))
}
