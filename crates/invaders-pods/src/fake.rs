//! Synthetic pods for rounds the cluster cannot fill.

use rand::Rng;
use rand::seq::SliceRandom;

use invaders_state::Pod;

const FAKE_POD_NAMES: [&str; 16] = [
    "lucius", "marcus", "tiberius", "gaius", "octavius", "julius", "claudius", "nero",
    "augustus", "constantine", "hadrian", "traianus", "vulcanus", "mercurius", "neptunus", "pluto",
];

const FAKE_NAMESPACE_NAMES: [&str; 16] = [
    "tiger", "lion", "elephant", "giraffe", "zebra", "panda", "koala", "kangaroo",
    "penguin", "dolphin", "whale", "shark", "octopus", "crab", "lobster", "jellyfish",
];

/// Draw one synthetic pod, name and namespace chosen uniformly.
pub fn fake_pod<R: Rng + ?Sized>(rng: &mut R) -> Pod {
    // Both pools are non-empty constants.
    let name = FAKE_POD_NAMES.choose(rng).copied().unwrap_or("lucius");
    let namespace = FAKE_NAMESPACE_NAMES.choose(rng).copied().unwrap_or("tiger");
    Pod::fake(name, namespace)
}

/// A fully synthetic round, used when the cluster integration is disabled.
pub fn fake_pods(count: usize) -> Vec<Pod> {
    let mut rng = rand::thread_rng();
    (0..count).map(|_| fake_pod(&mut rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn fake_pod_draws_from_pools() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let pod = fake_pod(&mut rng);
            assert!(!pod.is_real_pod);
            assert!(FAKE_POD_NAMES.contains(&pod.name.as_str()));
            assert!(FAKE_NAMESPACE_NAMES.contains(&pod.namespace.as_str()));
        }
    }

    #[test]
    fn fake_pod_covers_whole_pool() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..2_000 {
            seen.insert(fake_pod(&mut rng).name);
        }
        assert_eq!(seen.len(), FAKE_POD_NAMES.len());
    }

    #[test]
    fn fake_pods_exact_count() {
        assert!(fake_pods(0).is_empty());
        assert_eq!(fake_pods(25).len(), 25);
    }
}
