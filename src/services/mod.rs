//! Service layer for the crawler application.
//!
//! - Site variants (`Site`, `SiteKind`)
//! - Problem fetching with retry (`ProblemFetcher`)

mod fetch;
mod site;

pub use fetch::{ProblemFetcher, ProblemSource};
pub use site::{LeetCodeCn, LeetCodeCom, Site, SiteKind};
