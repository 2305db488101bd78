use reqwest::Url;

use crate::args::{HttpMethod, RequestStyle, Scheme};
use crate::error::HttpError;
use crate::target::{TargetHost, TargetResolver};
use crate::workload::WorkloadLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Workload,
    Trailer,
}

/// A fully resolved outbound request.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub index: usize,
    pub kind: RequestKind,
    pub target: TargetHost,
    pub method: HttpMethod,
    pub url: Url,
    pub payload: Option<String>,
}

/// Shape shared by every request of a run.
#[derive(Debug, Clone)]
pub struct RequestPlan {
    pub scheme: Scheme,
    pub method: HttpMethod,
    pub style: RequestStyle,
    /// Control body sent once per target after the workload, if any.
    pub trailer: Option<String>,
}

impl RequestPlan {
    fn describe(
        &self,
        index: usize,
        kind: RequestKind,
        target: &TargetHost,
        body: &str,
    ) -> Result<RequestDescriptor, HttpError> {
        let base = format!("{}://{}", self.scheme.as_str(), target);
        let mut url = Url::parse(&base).map_err(|err| HttpError::InvalidUrl {
            url: base.clone(),
            source: err,
        })?;

        let payload = match self.style {
            RequestStyle::Body => match self.method {
                HttpMethod::Post => Some(body.to_owned()),
                HttpMethod::Get => None,
            },
            RequestStyle::Path => {
                append_command_path(&mut url, body)
                    .map_err(|()| HttpError::UrlCannotBeBase { url: base })?;
                None
            }
        };

        Ok(RequestDescriptor {
            index,
            kind,
            target: target.clone(),
            method: self.method,
            url,
            payload,
        })
    }
}

/// `ADD,alice,100` becomes `/add/alice/100`; a leading `[n] ` token on the
/// command is dropped, so `[7] ADD,alice,100` maps to the same path.
fn append_command_path(url: &mut Url, body: &str) -> Result<(), ()> {
    let mut segments = url.path_segments_mut()?;
    segments.pop_if_empty();
    let mut fields = body.split(',');
    if let Some(command) = fields.next() {
        let command = command.trim();
        let command = command
            .split_once(' ')
            .map_or(command, |(_, rest)| rest.trim());
        segments.push(&command.to_ascii_lowercase());
    }
    for field in fields {
        segments.push(field.trim());
    }
    Ok(())
}

/// Resolves a target for every line and builds the ordered request batch.
///
/// With a trailer configured, one trailer request per configured target is
/// appended after the workload requests, whether or not the target received
/// any workload line.
///
/// # Errors
///
/// Returns an error when a target cannot form a valid URL.
pub fn build_requests(
    lines: &[WorkloadLine],
    resolver: &mut TargetResolver,
    plan: &RequestPlan,
) -> Result<Vec<RequestDescriptor>, HttpError> {
    let trailer_count = if plan.trailer.is_some() {
        resolver.hosts().len()
    } else {
        0
    };
    let mut requests = Vec::with_capacity(lines.len().saturating_add(trailer_count));

    for line in lines {
        let target = resolver.resolve(line.identifier.as_deref());
        let descriptor = plan.describe(requests.len(), RequestKind::Workload, target, &line.body)?;
        requests.push(descriptor);
    }

    if let Some(trailer) = plan.trailer.as_deref() {
        for target in resolver.hosts() {
            let descriptor = plan.describe(requests.len(), RequestKind::Trailer, target, trailer)?;
            requests.push(descriptor);
        }
    }

    Ok(requests)
}
