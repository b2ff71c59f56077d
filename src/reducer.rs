//! Reduction of the candidate set to the final, collapsed blocklist.
//!
//! The output holds every fully-blocked apex plus every other candidate whose
//! registrable domain is neither fully blocked nor whitelisted. A blocked apex
//! therefore suppresses all of its subdomains.

use std::collections::BTreeSet;

use crate::aggregator::HostSet;
use crate::apex::ApexSet;
use crate::domain::{is_reserved, DomainClassifier};
use crate::normalizer::Host;

/// Never emitted, whatever the sources say.
pub const LOOPBACK_HOST: &str = "localhost";

/// Build the final blocklist, sorted ascending and free of duplicates.
pub fn reduce(
    hosts: &HostSet,
    apexes: &ApexSet,
    whitelist: &HostSet,
    classifier: &DomainClassifier,
) -> Vec<Host> {
    let mut blocked: BTreeSet<&Host> = apexes
        .iter()
        .filter(|apex| !whitelist.contains(*apex) && !is_reserved(apex.as_str()))
        .collect();

    for host in hosts {
        if whitelist.contains(host) || is_reserved(host.as_str()) {
            continue;
        }
        let domain = classifier.registrable_domain(host.as_str());
        if apexes.contains(domain) || whitelist.contains(domain) {
            continue;
        }
        blocked.insert(host);
    }

    blocked
        .into_iter()
        .filter(|host| host.as_str() != LOOPBACK_HOST)
        .cloned()
        .collect()
}

/// Why a host is or is not part of the reduced blocklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Blocked as a whole zone
    BlockedApex,
    /// Blocked as an individual host
    Blocked,
    /// Not listed itself, but its apex is blocked as a whole zone
    CoveredByApex(String),
    /// Listed, but its apex is blocked so it is not emitted separately
    CollapsedIntoApex(String),
    Whitelisted,
    /// Its registrable domain is whitelisted
    DomainWhitelisted(String),
    Loopback,
    Reserved,
    NotListed,
}

impl Verdict {
    /// True if DNS lookups for the host end up blackholed.
    pub fn is_blocked(&self) -> bool {
        matches!(
            self,
            Verdict::BlockedApex
                | Verdict::Blocked
                | Verdict::CoveredByApex(_)
                | Verdict::CollapsedIntoApex(_)
        )
    }
}

/// Explain the decision [`reduce`] makes (or would make) for `host`.
pub fn verdict(
    host: &Host,
    hosts: &HostSet,
    apexes: &ApexSet,
    whitelist: &HostSet,
    classifier: &DomainClassifier,
) -> Verdict {
    let name = host.as_str();
    if name == LOOPBACK_HOST {
        return Verdict::Loopback;
    }
    if whitelist.contains(name) {
        return Verdict::Whitelisted;
    }
    if is_reserved(name) {
        return Verdict::Reserved;
    }
    if apexes.contains(name) {
        return Verdict::BlockedApex;
    }

    let domain = classifier.registrable_domain(name);
    if whitelist.contains(domain) {
        return Verdict::DomainWhitelisted(domain.to_string());
    }
    let listed = hosts.contains(name);
    if apexes.contains(domain) {
        return if listed {
            Verdict::CollapsedIntoApex(domain.to_string())
        } else {
            Verdict::CoveredByApex(domain.to_string())
        };
    }
    if listed {
        Verdict::Blocked
    } else {
        Verdict::NotListed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::collect_hosts;
    use crate::apex::collect_apexes;

    fn run(hosts: &[&str], whitelist: &[&str]) -> Vec<String> {
        let classifier = DomainClassifier::default();
        let hosts = collect_hosts(hosts);
        let whitelist = collect_hosts(whitelist);
        let apexes = collect_apexes(&hosts, &whitelist, &classifier);
        reduce(&hosts, &apexes, &whitelist, &classifier)
            .into_iter()
            .map(Host::into_string)
            .collect()
    }

    #[test]
    fn test_apex_collapsing() {
        let out = run(
            &["doubleclick.net", "ad1.doubleclick.net", "ad2.doubleclick.net"],
            &[],
        );
        assert_eq!(out, vec!["doubleclick.net"]);
    }

    #[test]
    fn test_multipart_collapsing() {
        assert_eq!(run(&["ads.example.co.uk"], &[]), vec!["ads.example.co.uk"]);
        assert_eq!(
            run(&["ads.example.co.uk", "example.co.uk"], &[]),
            vec!["example.co.uk"]
        );
    }

    #[test]
    fn test_whitelist_precedence() {
        let out = run(
            &["tracker.net", "ads.tracker.net", "pixel.tracker.net", "other.org"],
            &["tracker.net"],
        );
        assert_eq!(out, vec!["other.org"]);
    }

    #[test]
    fn test_whitelisted_apex_suppresses_unlisted_subdomains() {
        // The whitelisted name need not be in any feed
        let out = run(&["ads.tracker.net"], &["tracker.net"]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_whitelisted_subdomain_only() {
        let out = run(&["a.example.com", "b.example.com"], &["a.example.com"]);
        assert_eq!(out, vec!["b.example.com"]);
    }

    #[test]
    fn test_localhost_dropped() {
        assert!(run(&["localhost"], &[]).is_empty());
        assert_eq!(run(&["localhost", "ads.com"], &[]), vec!["ads.com"]);
    }

    #[test]
    fn test_invalid_suffix_dropped() {
        assert!(run(&["token.invalid"], &[]).is_empty());
        assert!(run(&["a.token.invalid"], &[]).is_empty());
    }

    #[test]
    fn test_bare_label_passes_through() {
        assert_eq!(run(&["intranet"], &[]), vec!["intranet"]);
    }

    #[test]
    fn test_sorted_output() {
        let out = run(&["zeta.com", "alpha.net", "mid.org", "a.b.example.com"], &[]);
        assert_eq!(out, vec!["a.b.example.com", "alpha.net", "mid.org", "zeta.com"]);
    }

    #[test]
    fn test_verdicts_match_reduce() {
        let classifier = DomainClassifier::default();
        let hosts = collect_hosts([
            "doubleclick.net",
            "ad1.doubleclick.net",
            "ads.example.com",
            "tracker.net",
            "x.tracker.net",
            "token.invalid",
            "localhost",
        ]);
        let whitelist = collect_hosts(["tracker.net"]);
        let apexes = collect_apexes(&hosts, &whitelist, &classifier);
        let reduced = reduce(&hosts, &apexes, &whitelist, &classifier);

        let v = |name: &str| {
            let host: Host = name.parse().unwrap();
            verdict(&host, &hosts, &apexes, &whitelist, &classifier)
        };

        assert_eq!(v("doubleclick.net"), Verdict::BlockedApex);
        assert_eq!(
            v("ad1.doubleclick.net"),
            Verdict::CollapsedIntoApex("doubleclick.net".to_string())
        );
        assert_eq!(
            v("new.doubleclick.net"),
            Verdict::CoveredByApex("doubleclick.net".to_string())
        );
        assert_eq!(v("ads.example.com"), Verdict::Blocked);
        assert_eq!(v("tracker.net"), Verdict::Whitelisted);
        assert_eq!(
            v("x.tracker.net"),
            Verdict::DomainWhitelisted("tracker.net".to_string())
        );
        assert_eq!(v("token.invalid"), Verdict::Reserved);
        assert_eq!(v("localhost"), Verdict::Loopback);
        assert_eq!(v("unrelated.org"), Verdict::NotListed);

        for host in &hosts {
            let emitted = reduced.contains(host);
            let decision = verdict(host, &hosts, &apexes, &whitelist, &classifier);
            assert_eq!(
                emitted,
                matches!(decision, Verdict::BlockedApex | Verdict::Blocked),
                "{} -> {:?}",
                host,
                decision
            );
        }
    }
}
