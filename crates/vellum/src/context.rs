//! Host-framework integration seams.
//!
//! The HTTP framework's request context and middleware chain are external
//! collaborators; this module defines the two traits the host implements
//! so the view layer never depends on a concrete framework.
//!
//! The view layer is single-threaded by design (one cooperative request at
//! a time per process tick), so neither trait carries `Send`/`Sync`
//! bounds.

use std::collections::BTreeMap;

use crate::views::Views;
use crate::Locals;

/// A per-request context the contextual render path reads and writes.
///
/// [`Views::render_into`] merges [`state`](Self::state) into the effective
/// locals, then writes the rendered output through
/// [`set_body`](Self::set_body) and marks the response as HTML via
/// [`set_content_type`](Self::set_content_type).
pub trait RequestContext {
    /// Request-scoped state (e.g. the user-agent category placed there by
    /// the host's middleware). Merged over default locals, under call-site
    /// locals.
    fn state(&self) -> &Locals;

    /// Sets the response body.
    fn set_body(&mut self, body: String);

    /// Sets the response content type.
    fn set_content_type(&mut self, content_type: &str);
}

/// A host application the view layer can be installed onto.
///
/// [`Views::install`] calls [`use_user_agent`](Self::use_user_agent) with
/// the configured category names (detection itself is the host's concern)
/// and then hands over a [`Views`] handle via
/// [`attach_render`](Self::attach_render); the host typically stores the
/// handle where per-request code can reach it.
pub trait HostApp {
    /// Installs the host's user-agent classification middleware using the
    /// configured category names.
    fn use_user_agent(&mut self, categories: &BTreeMap<String, String>);

    /// Attaches the render capability to the application's request context.
    fn attach_render(&mut self, views: Views);
}
