// Application layer: everything around the core that a front end would own
// (reading exports, persisting the session, writing result files).

pub mod demo;
pub mod pipelines;
pub mod session;
