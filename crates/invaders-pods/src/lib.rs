//! invaders-pods — builds the pod list for each game round.
//!
//! Real pods come from a [`PodLister`] (the Kubernetes client in
//! production). When the cluster cannot supply enough, the round is topped
//! up with synthetic pods drawn from fixed name pools. The final list is
//! always shuffled so real and synthetic pods are indistinguishable by
//! position.

pub mod blend;
pub mod error;
pub mod fake;
pub mod lister;

pub use blend::{blend, source_pods};
pub use error::{ListerError, ListerResult};
pub use fake::{fake_pod, fake_pods};
pub use lister::{PodLister, StaticPodLister};
