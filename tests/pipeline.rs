//! End-to-end consolidation through the public API.

use chrono::NaiveDate;
use hostfold::aggregator::FeedLines;
use hostfold::config::Config;
use hostfold::domain::DomainClassifier;
use hostfold::emitter::{emit_all, OutputTarget};
use hostfold::fs_abstraction::real_fs;
use hostfold::pipeline::{consolidate, domain_counts, LocalLists};
use hostfold::reducer::Verdict;
use hostfold::Host;
use std::fs;
use tempfile::TempDir;

fn lines(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn names(hosts: &[Host]) -> Vec<&str> {
    hosts.iter().map(Host::as_str).collect()
}

#[test]
fn test_reference_scenario() {
    let feeds = vec![FeedLines::new(
        "A",
        lines(&["ads.example.com", "#comment", "", "tracker.net"]),
    )];
    let local = LocalLists {
        whitelist: lines(&["tracker.net"]),
        blacklist: lines(&["evil.co.uk"]),
    };
    let result = consolidate(&feeds, &local, &DomainClassifier::default());
    assert_eq!(names(&result.hosts), vec!["ads.example.com", "evil.co.uk"]);
}

#[test]
fn test_apex_collapses_subdomains_across_feeds() {
    let feeds = vec![
        FeedLines::new("A", lines(&["ad1.doubleclick.net", "www.ad2.doubleclick.net."])),
        FeedLines::new("B", lines(&["DoubleClick.net  # whole zone", "ads.example.com"])),
    ];
    let classifier = DomainClassifier::default();
    let result = consolidate(&feeds, &LocalLists::default(), &classifier);

    assert_eq!(names(&result.hosts), vec!["ads.example.com", "doubleclick.net"]);
    let ad2: Host = "ad2.doubleclick.net".parse().unwrap();
    assert_eq!(
        result.verdict(&ad2, &classifier),
        Verdict::CollapsedIntoApex("doubleclick.net".to_string())
    );
}

#[test]
fn test_feed_order_does_not_matter() {
    let a = FeedLines::new("A", lines(&["x.foo.com", "bar.co.uk", "y.bar.co.uk"]));
    let b = FeedLines::new("B", lines(&["foo.com", "localhost", "z.baz.org"]));
    let classifier = DomainClassifier::default();
    let local = LocalLists::default();

    let forward = consolidate(&[a.clone(), b.clone()], &local, &classifier);
    let backward = consolidate(&[b, a], &local, &classifier);
    assert_eq!(forward.hosts, backward.hosts);
    assert_eq!(names(&forward.hosts), vec!["bar.co.uk", "foo.com", "z.baz.org"]);
}

#[test]
fn test_domain_counts_report() {
    let feeds = vec![FeedLines::new(
        "A",
        lines(&["a.track.io", "b.track.io", "c.track.io", "one.other.io"]),
    )];
    let classifier = DomainClassifier::default();
    let result = consolidate(&feeds, &LocalLists::default(), &classifier);
    let counts = domain_counts(&result.hosts, &classifier, 2);
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].domain, "track.io");
    assert_eq!(counts[0].hosts, 3);
}

#[test]
fn test_emit_to_directory_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let config = Config::from_yaml(&Config::generate_default_yaml()).unwrap();

    let feeds = vec![FeedLines::new("A", lines(&["ads.example.com", "evil.co.uk"]))];
    let result = consolidate(&feeds, &LocalLists::default(), &config.classifier());

    let targets: Vec<OutputTarget> = config
        .targets
        .iter()
        .map(|t| {
            let mut target = OutputTarget::from(t);
            target.path = dir.path().join(target.path.file_name().unwrap());
            target
        })
        .collect();
    let at = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();

    let outcomes = emit_all(real_fs(), &targets, &result.hosts, at);
    assert!(outcomes.iter().all(|o| o.is_ok()));
    let first: Vec<String> = targets
        .iter()
        .map(|t| fs::read_to_string(&t.path).unwrap())
        .collect();

    emit_all(real_fs(), &targets, &result.hosts, at);
    let second: Vec<String> = targets
        .iter()
        .map(|t| fs::read_to_string(&t.path).unwrap())
        .collect();
    assert_eq!(first, second);

    let dnsmasq = fs::read_to_string(dir.path().join("blackhole-dnsmasq.conf")).unwrap();
    assert!(dnsmasq.contains("# Generated at 2024-01-02 03:04:05\n"));
    assert!(dnsmasq.ends_with("address=/ads.example.com/0.0.0.0\naddress=/evil.co.uk/0.0.0.0\n"));

    let nsd = fs::read_to_string(dir.path().join("blackhole-nsd.conf")).unwrap();
    assert!(nsd.contains("zone:\n  name: \"evil.co.uk\"\n  zonefile: \"/etc/nsd/blackhole.zone\"\n"));
}
