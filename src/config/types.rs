use serde::Deserialize;

use crate::args::{HttpMethod, LineFormat, RequestStyle, Scheme};

/// On-disk configuration; every field is optional and CLI flags win.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub workload_dir: Option<String>,
    #[serde(alias = "hosts")]
    pub targets: Option<Vec<String>>,
    pub scheme: Option<Scheme>,
    pub method: Option<HttpMethod>,
    pub format: Option<LineFormat>,
    pub identifier_field: Option<usize>,
    pub style: Option<RequestStyle>,
    pub trailers: Option<bool>,
    pub trailer_body: Option<String>,
    pub halt_on_error: Option<bool>,
    pub max_in_flight: Option<usize>,
    pub timeout: Option<String>,
    pub connect_timeout: Option<String>,
    pub progress_interval: Option<String>,
    pub summary_json: Option<String>,
}
