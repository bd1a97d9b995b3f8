//! Primitive types shared by the harness crates.

pub use deployment::{Deployment, DeploymentSnapshot, Instance};
mod deployment;

pub use endpoint::resolve_base_url;
mod endpoint;

pub use http::{HeaderList, HttpResponse, ResponseBody, UnknownVerb, Verb, STATUS_LINE_HEADER};
mod http;

pub use inspect::{Inspector, PrettyInspector};
mod inspect;
