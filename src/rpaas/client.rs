/// Blocking HTTP client for the RPaaS API.
///
/// Requests go either straight to the RPaaS API or through the Tsuru service
/// proxy, which forwards `/services/{service}/proxy/{instance}?callback=PATH`
/// to `PATH` on the instance's RPaaS API.
use std::io::Write;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::{Method, Url};
use tracing::debug;

use super::errors::ClientError;
use super::models::{ApiErrorBody, Autoscale, AutoscalePatch, LogArgs};
use crate::config::{AppConfig, Endpoint};

enum Route {
    Direct {
        base: Url,
        user: Option<String>,
        password: Option<String>,
    },
    Tsuru {
        base: Url,
        token: String,
        service: String,
    },
}

/// Client bound to one endpoint (and, in Tsuru mode, one service).
pub struct RpaasClient {
    http: Client,
    route: Route,
    timeout: Duration,
}

impl RpaasClient {
    /// Build a client for `config`. `service` is only needed in Tsuru mode.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidUrl` for an unusable base address,
    /// `ClientError::MissingService` in Tsuru mode without a service, and
    /// `ClientError::Build` if the HTTP client cannot be created.
    pub fn new(config: &AppConfig, service: Option<&str>) -> Result<Self, ClientError> {
        let route = match &config.endpoint {
            Endpoint::Direct {
                url,
                user,
                password,
            } => Route::Direct {
                base: parse_base(url)?,
                user: user.clone(),
                password: password.clone(),
            },
            Endpoint::Tsuru { target, token } => Route::Tsuru {
                base: parse_base(target)?,
                token: token.clone(),
                service: service
                    .filter(|s| !s.is_empty())
                    .ok_or(ClientError::MissingService)?
                    .to_owned(),
            },
        };

        // No client-wide timeout: followed log streams stay open until the server closes them.
        let http = Client::builder()
            .connect_timeout(config.timeout)
            .timeout(None::<Duration>)
            .user_agent(concat!("rpaasctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http,
            route,
            timeout: config.timeout,
        })
    }

    /// `GET /resources/{instance}/autoscale`
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure, non-2xx status or a malformed body.
    pub fn get_autoscale(&self, instance: &str) -> Result<Autoscale, ClientError> {
        let url = self.url(instance, "autoscale", &[])?;
        let response = self.execute(self.request(Method::GET, url).timeout(self.timeout))?;
        response.json().map_err(ClientError::Decode)
    }

    /// `PATCH /resources/{instance}/autoscale` with the set fields of `patch`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or non-2xx status.
    pub fn update_autoscale(&self, instance: &str, patch: &AutoscalePatch) -> Result<(), ClientError> {
        let url = self.url(instance, "autoscale", &[])?;
        self.execute(
            self.request(Method::PATCH, url)
                .timeout(self.timeout)
                .json(patch),
        )?;
        Ok(())
    }

    /// `DELETE /resources/{instance}/autoscale`
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure or non-2xx status.
    pub fn remove_autoscale(&self, instance: &str) -> Result<(), ClientError> {
        let url = self.url(instance, "autoscale", &[])?;
        self.execute(self.request(Method::DELETE, url).timeout(self.timeout))?;
        Ok(())
    }

    /// `GET /resources/{instance}/log`, copying the body to `out` as it arrives.
    ///
    /// With `follow` set this blocks until the server ends the stream.
    ///
    /// # Errors
    ///
    /// Returns `ClientError` on transport failure, non-2xx status, or if
    /// writing to `out` fails mid-stream.
    pub fn log(&self, args: &LogArgs, out: &mut dyn Write) -> Result<(), ClientError> {
        let url = self.url(&args.instance, "log", &log_query(args))?;

        let mut request = self.request(Method::GET, url);
        if !args.follow {
            request = request.timeout(self.timeout);
        }

        let mut response = self.execute(request)?;
        std::io::copy(&mut response, out).map_err(ClientError::Stream)?;
        out.flush().map_err(ClientError::Stream)
    }

    fn url(
        &self,
        instance: &str,
        resource: &str,
        query: &[(&str, String)],
    ) -> Result<Url, ClientError> {
        let mut url = match &self.route {
            Route::Direct { base, .. } => with_segments(base, &["resources", instance, resource])?,
            Route::Tsuru { base, service, .. } => {
                let mut url = with_segments(base, &["services", service.as_str(), "proxy", instance])?;
                url.query_pairs_mut()
                    .append_pair("callback", &format!("/resources/{instance}/{resource}"));
                url
            }
        };

        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.route {
            Route::Direct {
                user: Some(user),
                password,
                ..
            } => builder.basic_auth(user, password.as_deref()),
            Route::Direct { .. } => builder,
            Route::Tsuru { token, .. } => builder.bearer_auth(token),
        }
    }

    fn execute(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let request = builder.build().map_err(ClientError::Transport)?;
        debug!(method = %request.method(), url = %request.url(), "sending request");

        let start = Instant::now();
        let response = self.http.execute(request).map_err(ClientError::Transport)?;
        let status = response.status();
        debug!(%status, elapsed = ?start.elapsed(), "received response");

        if status.is_success() {
            return Ok(response);
        }

        let message = response.json::<ApiErrorBody>().ok().and_then(|body| body.msg);
        debug!(%status, message = message.as_deref().unwrap_or_default(), "RPaaS API error");
        Err(ClientError::Status { status, message })
    }
}

fn log_query(args: &LogArgs) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("follow", args.follow.to_string()),
        ("color", args.color.to_string()),
    ];
    if let Some(lines) = args.lines {
        query.push(("lines", lines.to_string()));
    }
    if let Some(since) = args.since {
        query.push(("since", whole_seconds(since).to_string()));
    }
    if let Some(pod) = &args.pod {
        query.push(("pod", pod.clone()));
    }
    if let Some(container) = &args.container {
        query.push(("container", container.clone()));
    }
    query
}

/// Whole seconds, rounding any fraction up.
fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs() + u64::from(duration.subsec_nanos() > 0)
}

fn parse_base(raw: &str) -> Result<Url, ClientError> {
    let raw = raw.trim();
    let with_scheme = if raw.contains("://") {
        raw.to_owned()
    } else {
        format!("http://{raw}")
    };
    Url::parse(&with_scheme).map_err(|_| ClientError::InvalidUrl(raw.to_owned()))
}

fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, ClientError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ClientError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
