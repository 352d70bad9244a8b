//! Round sourcing: real pods first, synthetic pods to fill the gap.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info, warn};

use invaders_state::Pod;

use crate::fake::fake_pod;
use crate::lister::PodLister;

const DEFAULT_NAMESPACE: &str = "default";

/// Build a round of exactly `count` pods.
///
/// Namespaces are visited in random order. A namespace that is missing or
/// fails to list is skipped; the round is completed with synthetic pods.
pub async fn source_pods(count: usize, namespaces: &[String], lister: &dyn PodLister) -> Vec<Pod> {
    let mut order: Vec<String> = if namespaces.is_empty() {
        vec![DEFAULT_NAMESPACE.to_string()]
    } else {
        namespaces.to_vec()
    };
    order.shuffle(&mut rand::thread_rng());

    let mut real = Vec::with_capacity(count);
    for namespace in order.iter().filter(|ns| !ns.is_empty()) {
        match lister.namespace_exists(namespace).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(%namespace, "namespace does not exist, skipping");
                continue;
            }
            Err(e) => {
                warn!(%namespace, error = %e, "namespace lookup failed, skipping");
                continue;
            }
        }

        match lister.list_running_pods(namespace).await {
            Ok(names) => {
                debug!(%namespace, pods = names.len(), "listed running pods");
                real.extend(names.into_iter().map(|name| Pod::real(name, namespace.as_str())));
            }
            Err(e) => warn!(%namespace, error = %e, "pod listing failed, skipping"),
        }
    }

    blend(real, count, &mut rand::thread_rng())
}

/// Shuffle `real` pods into a round of exactly `count`.
///
/// With enough real pods, a uniform sample of `count` is kept. Otherwise
/// every real pod is kept, the rest is synthetic, and the whole list is
/// shuffled.
pub fn blend<R: Rng + ?Sized>(mut pods: Vec<Pod>, count: usize, rng: &mut R) -> Vec<Pod> {
    if pods.len() >= count {
        pods.shuffle(rng);
        pods.truncate(count);
        return pods;
    }

    let real = pods.len();
    info!(real, fake = count - real, count, "topping up round with synthetic pods");
    while pods.len() < count {
        pods.push(fake_pod(rng));
    }
    pods.shuffle(rng);
    pods
}
