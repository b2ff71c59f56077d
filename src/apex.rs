//! Collection of fully-blocked apex domains.

use std::collections::HashSet;

use crate::aggregator::HostSet;
use crate::domain::{is_reserved, DomainClassifier};
use crate::normalizer::Host;

/// Apex domains that are blocked as whole zones.
pub type ApexSet = HashSet<Host>;

/// Every non-whitelisted, non-reserved candidate that is itself an apex
/// domain.
pub fn collect_apexes(
    hosts: &HostSet,
    whitelist: &HostSet,
    classifier: &DomainClassifier,
) -> ApexSet {
    hosts
        .iter()
        .filter(|host| !whitelist.contains(*host) && !is_reserved(host.as_str()))
        .filter(|host| classifier.is_apex_candidate(host.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::collect_hosts;

    #[test]
    fn test_collects_two_label_hosts() {
        let hosts = collect_hosts(["doubleclick.net", "ad1.doubleclick.net", "ads.example.com"]);
        let apexes = collect_apexes(&hosts, &HostSet::new(), &DomainClassifier::default());
        assert_eq!(apexes, collect_hosts(["doubleclick.net"]));
    }

    #[test]
    fn test_collects_multipart_apex() {
        let hosts = collect_hosts(["evil.co.uk", "ads.evil.co.uk", "shop.com.au"]);
        let apexes = collect_apexes(&hosts, &HostSet::new(), &DomainClassifier::default());
        assert_eq!(apexes, collect_hosts(["evil.co.uk", "shop.com.au"]));
    }

    #[test]
    fn test_skips_whitelisted() {
        let hosts = collect_hosts(["tracker.net", "evil.co.uk"]);
        let whitelist = collect_hosts(["tracker.net"]);
        let apexes = collect_apexes(&hosts, &whitelist, &DomainClassifier::default());
        assert_eq!(apexes, collect_hosts(["evil.co.uk"]));
    }

    #[test]
    fn test_skips_reserved() {
        let hosts = collect_hosts(["token.invalid", "x.token.invalid", "evil.co.uk"]);
        let apexes = collect_apexes(&hosts, &HostSet::new(), &DomainClassifier::default());
        assert_eq!(apexes, collect_hosts(["evil.co.uk"]));
    }

    #[test]
    fn test_bare_labels_are_not_apexes() {
        let hosts = collect_hosts(["localhost", "intranet"]);
        let apexes = collect_apexes(&hosts, &HostSet::new(), &DomainClassifier::default());
        assert!(apexes.is_empty());
    }
}
