// src/core/scanner/dns_scanner.rs

use tracing::{debug, info, warn};

use crate::core::models::{DnsRecordKind, DnsReport, DnsSection, ScanResult};
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::rr::RecordType;
use std::fmt::Write;
use strum::IntoEnumIterator;

/// A source of DNS records, one record kind at a time.
///
/// `Ok(vec![])` means the name exists but holds no records of that kind.
#[async_trait]
pub trait RecordLookup: Send + Sync {
    async fn lookup(&self, domain: &str, kind: DnsRecordKind) -> Result<Vec<String>, String>;
}

/// Looks records up through the host's resolver configuration
/// (`/etc/resolv.conf` or the platform equivalent), so internal and
/// split-horizon names resolve the way they do for the tester.
///
/// When that configuration cannot be read, hickory's public-DNS preset is
/// used instead.
pub struct HickoryLookup {
    resolver: TokioAsyncResolver,
    system_config: bool,
}

impl HickoryLookup {
    pub fn new() -> Self {
        match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => {
                debug!("Using system resolver configuration.");
                Self { resolver, system_config: true }
            }
            Err(e) => {
                warn!(error = %e, "System resolver configuration unavailable, using public DNS.");
                Self {
                    resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default()),
                    system_config: false,
                }
            }
        }
    }
}

impl Default for HickoryLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordLookup for HickoryLookup {
    async fn lookup(&self, domain: &str, kind: DnsRecordKind) -> Result<Vec<String>, String> {
        let records = match kind {
            DnsRecordKind::Address => self
                .resolver
                .lookup_ip(domain)
                .await
                .map(|ips| ips.iter().map(|ip| ip.to_string()).collect()),
            DnsRecordKind::CanonicalName => self
                .resolver
                .lookup(domain, RecordType::CNAME)
                .await
                .map(|lookup| lookup.iter().map(|r| r.to_string()).collect()),
            // Exchangers are listed with their preference, lowest first.
            DnsRecordKind::MailExchanger => self.resolver.mx_lookup(domain).await.map(|mx| {
                let mut entries: Vec<_> = mx.iter().map(|r| (r.preference(), r.exchange().to_string())).collect();
                entries.sort();
                entries.into_iter().map(|(pref, host)| format!("{} {}", pref, host)).collect()
            }),
            DnsRecordKind::NameServer => self
                .resolver
                .ns_lookup(domain)
                .await
                .map(|ns| ns.iter().map(|r| r.to_string()).collect()),
            DnsRecordKind::Text => self
                .resolver
                .txt_lookup(domain)
                .await
                .map(|txt| txt.iter().map(|r| r.to_string()).collect()),
        };

        match records {
            Ok(records) => Ok(records),
            Err(e) if is_no_records(&e) => Ok(Vec::new()),
            Err(e) => Err(format!("DNS Error: {}", e)),
        }
    }
}

fn is_no_records(error: &ResolveError) -> bool {
    matches!(error.kind(), ResolveErrorKind::NoRecordsFound { .. })
}

/// Resolves every record kind for `domain`, one after the other.
///
/// Each lookup stands alone: a failure is stored in its own section and the
/// next kind is still queried.
pub async fn run_dns_scan<L: RecordLookup + ?Sized>(lookup: &L, domain: &str) -> DnsReport {
    let domain = domain.trim().trim_end_matches('.');
    info!(target = %domain, "Starting DNS scan.");

    let mut report = DnsReport { domain: domain.to_string(), sections: Vec::new() };
    for kind in DnsRecordKind::iter() {
        debug!(target = %domain, kind = %kind, "Looking up records.");
        let records: ScanResult<Vec<String>> = match lookup.lookup(domain, kind).await {
            Ok(records) if records.is_empty() => {
                debug!(kind = %kind, "No records found.");
                Ok(None)
            }
            Ok(records) => {
                debug!(kind = %kind, count = records.len(), "Records found.");
                Ok(Some(records))
            }
            Err(e) => {
                warn!(target = %domain, kind = %kind, error = %e, "Lookup failed.");
                Err(e)
            }
        };
        report.sections.push(DnsSection { kind, records });
    }

    let failed = report.sections.iter().filter(|s| s.records.is_err()).count();
    info!(failed, "DNS scan finished.");
    report
}

/// Formats a report as plain text, one `[+]` header per record kind.
pub fn render_report(report: &DnsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[*] DNS report for {}", report.domain);
    for section in DnsRecordKind::iter().filter_map(|kind| report.section(kind)) {
        let _ = writeln!(out, "[+] {} Records:", section.kind);
        match &section.records {
            Ok(Some(records)) => {
                for record in records {
                    let _ = writeln!(out, "    {}", record);
                }
            }
            Ok(None) => {
                let _ = writeln!(out, "    [-] No records found");
            }
            Err(e) => {
                let _ = writeln!(out, "    [-] Error: {}", e);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned answers per record kind; records every query it receives.
    #[derive(Default)]
    struct FixedLookup {
        answers: HashMap<&'static str, Result<Vec<String>, String>>,
        queried: Mutex<Vec<DnsRecordKind>>,
    }

    impl FixedLookup {
        fn with(mut self, kind: &'static str, answer: Result<Vec<&str>, &str>) -> Self {
            let answer = answer
                .map(|v| v.into_iter().map(String::from).collect())
                .map_err(String::from);
            self.answers.insert(kind, answer);
            self
        }
    }

    #[async_trait]
    impl RecordLookup for FixedLookup {
        async fn lookup(&self, _domain: &str, kind: DnsRecordKind) -> Result<Vec<String>, String> {
            self.queried.lock().unwrap().push(kind);
            let key = match kind {
                DnsRecordKind::Address => "A",
                DnsRecordKind::CanonicalName => "CNAME",
                DnsRecordKind::MailExchanger => "MX",
                DnsRecordKind::NameServer => "NS",
                DnsRecordKind::Text => "TXT",
            };
            self.answers.get(key).cloned().unwrap_or(Ok(Vec::new()))
        }
    }

    #[tokio::test]
    async fn failing_lookup_does_not_abort_the_rest() {
        let lookup = FixedLookup::default()
            .with("A", Ok(vec!["93.184.216.34"]))
            .with("MX", Err("DNS Error: request timed out"))
            .with("NS", Ok(vec!["a.iana-servers.net.", "b.iana-servers.net."]));

        let report = run_dns_scan(&lookup, "example.com.").await;

        assert_eq!(report.domain, "example.com");
        assert_eq!(report.sections.len(), 5);
        assert_eq!(lookup.queried.lock().unwrap().len(), 5);
        assert!(report.section(DnsRecordKind::MailExchanger).unwrap().records.is_err());
        assert_eq!(
            report.section(DnsRecordKind::NameServer).unwrap().records,
            Ok(Some(vec!["a.iana-servers.net.".to_string(), "b.iana-servers.net.".to_string()]))
        );
        assert_eq!(report.section(DnsRecordKind::CanonicalName).unwrap().records, Ok(None));
    }

    #[tokio::test]
    async fn lookups_run_in_report_order() {
        let lookup = FixedLookup::default();
        run_dns_scan(&lookup, "example.com").await;
        assert_eq!(
            *lookup.queried.lock().unwrap(),
            DnsRecordKind::iter().collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn missing_mx_is_annotated_inline() {
        let lookup = FixedLookup::default()
            .with("A", Ok(vec!["93.184.216.34"]))
            .with("NS", Ok(vec!["a.iana-servers.net."]));

        let text = render_report(&run_dns_scan(&lookup, "example.com").await);
        let lines: Vec<&str> = text.lines().collect();

        let mx = lines.iter().position(|l| *l == "[+] MX Records:").unwrap();
        assert_eq!(lines[mx + 1], "    [-] No records found");
        let a = lines.iter().position(|l| *l == "[+] A Records:").unwrap();
        assert_eq!(lines[a + 1], "    93.184.216.34");
        let ns = lines.iter().position(|l| *l == "[+] NS Records:").unwrap();
        assert_eq!(lines[ns + 1], "    a.iana-servers.net.");
    }

    #[tokio::test]
    async fn resolver_follows_the_host_configuration() {
        let lookup = HickoryLookup::new();
        let has_nameserver = std::fs::read_to_string("/etc/resolv.conf")
            .map(|conf| conf.lines().any(|l| l.trim_start().starts_with("nameserver")))
            .unwrap_or(false);
        if has_nameserver {
            assert!(lookup.system_config);
        }
    }

    #[test]
    fn errors_are_rendered_in_their_section() {
        let report = DnsReport {
            domain: "example.com".into(),
            sections: vec![DnsSection {
                kind: DnsRecordKind::MailExchanger,
                records: Err("DNS Error: servfail".into()),
            }],
        };
        assert_eq!(
            render_report(&report),
            "[*] DNS report for example.com\n[+] MX Records:\n    [-] Error: DNS Error: servfail\n"
        );
    }
}
